//! The `toplist_item` entity and its write-side validation.

use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "toplist_item")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: String,
    pub rank: i32,
    pub vote_count: i32,
    #[sea_orm(nullable)]
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Item fields as submitted by a client on create or update.
///
/// Every field is optional on the wire so that a missing `title` or
/// `category` is reported as a validation error rather than a
/// deserialization failure. A client-supplied `id` is never read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub vote_count: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Validated item fields, ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub rank: i32,
    pub vote_count: i32,
    pub image_url: Option<String>,
}

pub fn validate_title(t: &str) -> Result<(), errors::ModelError> {
    if t.trim().is_empty() {
        return Err(errors::ModelError::Validation("title is required".into()));
    }
    if t.chars().count() > 255 {
        return Err(errors::ModelError::Validation("title must be at most 255 characters".into()));
    }
    Ok(())
}

pub fn validate_category(c: &str) -> Result<(), errors::ModelError> {
    if c.trim().is_empty() {
        return Err(errors::ModelError::Validation("category is required".into()));
    }
    if c.chars().count() > 128 {
        return Err(errors::ModelError::Validation("category must be at most 128 characters".into()));
    }
    Ok(())
}

pub fn validate_vote_count(v: i32) -> Result<(), errors::ModelError> {
    if v < 0 {
        return Err(errors::ModelError::Validation("voteCount must not be negative".into()));
    }
    Ok(())
}

impl ItemPayload {
    pub fn validate(self) -> Result<ItemFields, errors::ModelError> {
        let title = self.title.unwrap_or_default();
        validate_title(&title)?;
        let category = self.category.unwrap_or_default();
        validate_category(&category)?;
        let vote_count = self.vote_count.unwrap_or(0);
        validate_vote_count(vote_count)?;
        Ok(ItemFields {
            title,
            description: self.description,
            category,
            rank: self.rank.unwrap_or(0),
            vote_count,
            image_url: self.image_url,
        })
    }
}

impl Model {
    /// Overwrite the client-editable fields; `id` and `vote_count` are kept.
    pub fn apply(&mut self, fields: ItemFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.category = fields.category;
        self.rank = fields.rank;
        self.image_url = fields.image_url;
    }
}

pub async fn create(db: &DatabaseConnection, fields: ItemFields) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        title: Set(fields.title),
        description: Set(fields.description),
        category: Set(fields.category),
        rank: Set(fields.rank),
        vote_count: Set(fields.vote_count),
        image_url: Set(fields.image_url),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Persist every column of `item` under its existing id.
pub async fn save(db: &DatabaseConnection, item: Model) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: sea_orm::ActiveValue::Unchanged(item.id),
        title: Set(item.title),
        description: Set(item.description),
        category: Set(item.category),
        rank: Set(item.rank),
        vote_count: Set(item.vote_count),
        image_url: Set(item.image_url),
    };
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
