#![cfg(test)]
use migration::MigratorTrait;
use models::toplist_item::{ItemFields, ItemPayload};
use sea_orm::DatabaseConnection;

/// Fresh in-memory SQLite database with the schema applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn payload(title: &str, category: &str, rank: i32) -> ItemPayload {
    ItemPayload {
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        rank: Some(rank),
        ..Default::default()
    }
}

pub fn fields(title: &str, category: &str, rank: i32, votes: i32) -> ItemFields {
    let mut p = payload(title, category, rank);
    p.vote_count = Some(votes);
    p.validate().expect("valid test payload")
}
