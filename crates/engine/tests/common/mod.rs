#![allow(dead_code)]

use engine::{Engine, Group, User};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    // One connection: every pooled connection would open its own in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine() -> Engine {
    engine_with_db().await.0
}

pub async fn register(engine: &Engine, name: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    engine.register(name, &email, "secret").await.unwrap()
}

/// A group created by `owner` with `members` added after the owner.
pub async fn group_with_members(engine: &Engine, owner: &User, members: &[&User]) -> Group {
    let group = engine.create_group(owner.id, "Trip", None).await.unwrap();
    for member in members {
        engine.add_member(member.id, group.id).await.unwrap();
    }
    group
}
