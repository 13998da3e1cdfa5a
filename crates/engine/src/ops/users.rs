use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, User, users,
    util::{normalize_email, normalize_required_name},
};

use super::{Engine, with_work};

/// Filters for [`Engine::list_users`].
///
/// Only one filter is applied: when both are set, `name` wins.
#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    /// Case-sensitive prefix of the email.
    pub email: Option<String>,
    /// Case-sensitive substring of the name.
    pub name: Option<String>,
}

impl Engine {
    /// Register a new user. The password is stored as a bcrypt hash.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ResultEngine<User> {
        let name = normalize_required_name(name, "user")?;
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        with_work!(self, |work| {
            let db = work.conn()?;
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey("email already exist".to_string()));
            }

            let hashed = bcrypt::hash(password, self.password_cost)?;
            let now = Utc::now();
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(hashed),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(None),
            }
            .insert(db)
            .await?;

            tracing::info!(user_id = %model.id, "user registered");
            Ok(User::from(model))
        })
    }

    /// Check the credentials of a registered user.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim();
        with_work!(self, |work| {
            let db = work.conn()?;
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .filter(users::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("email not registered".to_string()))?;

            if !bcrypt::verify(password, &model.password)? {
                return Err(EngineError::Unauthorized(
                    "credentials did not match".to_string(),
                ));
            }
            Ok(User::from(model))
        })
    }

    /// Return the user with the given id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_work!(self, |work| {
            let model = self.require_user(work.conn()?, user_id).await?;
            Ok(User::from(model))
        })
    }

    /// List active users, optionally filtered by email prefix or name.
    pub async fn list_users(&self, filter: &UserFilter) -> ResultEngine<Vec<User>> {
        let mut query = users::Entity::find()
            .filter(users::Column::DeletedAt.is_null())
            .order_by_asc(users::Column::CreatedAt);

        if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
            // instr() is case-sensitive, unlike LIKE on sqlite.
            query = query.filter(Expr::cust_with_values("instr(name, ?) > 0", [name]));
        } else if let Some(email) = filter.email.as_deref().filter(|e| !e.is_empty()) {
            query = query.filter(users::Column::Email.starts_with(email));
        }

        with_work!(self, |work| {
            let models = query.all(work.conn()?).await?;
            Ok(models.into_iter().map(User::from).collect())
        })
    }
}
