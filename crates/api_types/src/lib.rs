//! Request and response bodies of the HTTP API.
//!
//! Every body is JSON with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `limit`/`offset` query parameters, kept raw so the server can apply its
/// own fallbacks to values that do not parse.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// Returned by register and login. `token` is the bearer credential.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Session {
        pub user_id: Uuid,
        pub token: String,
        pub name: String,
        pub email: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct User {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    /// `GET /users` filters. Only one applies: `name` wins over `email`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserQuery {
        pub email: Option<String>,
        pub name: Option<String>,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub tag: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupUpdate {
        pub name: String,
        pub tag: Option<String>,
        pub total_spent: Option<i64>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Group {
        pub id: Uuid,
        pub name: String,
        pub tag: Option<String>,
        pub total_spent: i64,
        pub created_by: Uuid,
        pub created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub creator: Option<super::user::User>,
    }
}

pub mod membership {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberNew {
        pub user_id: Uuid,
    }

    /// Outstanding amounts, in minor units.
    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        pub user_id: Uuid,
        pub outgoing_amount: i64,
        pub incoming_amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Membership {
        pub id: Uuid,
        pub user_id: Uuid,
        pub group_id: Uuid,
        pub outgoing_amount: i64,
        pub incoming_amount: i64,
        pub created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user: Option<super::user::User>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub group: Option<super::group::Group>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub summary: Option<Summary>,
    }
}

pub mod invitation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvitationNew {
        pub user_id: Uuid,
        pub group_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvitationAnswer {
        pub is_accepted: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvitationQuery {
        pub user_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Invitation {
        pub id: Uuid,
        pub user_id: Uuid,
        pub invited_by: Uuid,
        pub group_id: Uuid,
        /// `null` while the invitation is pending.
        pub is_accepted: Option<bool>,
        pub expires_on: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user: Option<super::user::User>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub inviter: Option<super::user::User>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub group: Option<super::group::Group>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub payer_id: Uuid,
        pub payee_id: Uuid,
        /// Minor units (cents).
        pub amount: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: Uuid,
        pub group_id: Uuid,
        pub payer_id: Uuid,
        pub payee_id: Uuid,
        pub amount: i64,
        pub description: Option<String>,
        pub is_paid: bool,
        pub is_adjusted: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NetBalance {
        pub counterparty_id: Uuid,
        pub amount: i64,
    }
}
