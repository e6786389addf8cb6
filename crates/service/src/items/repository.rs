use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::debug;

use models::toplist_item::{self, Column, Entity as ItemEntity, ItemFields, Model};

use crate::errors::ServiceError;

/// Storage for item records.
///
/// Reads return every matching record with the stated ordering; ties are
/// broken by ascending id. Lookups by id report absence as `None`.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Store a new record; the repository assigns the id.
    async fn insert(&self, fields: ItemFields) -> Result<Model, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Model>, ServiceError>;
    async fn find_by_category_order_by_rank(&self, category: &str) -> Result<Vec<Model>, ServiceError>;
    async fn find_by_category_order_by_votes(&self, category: &str) -> Result<Vec<Model>, ServiceError>;
    /// Items of `category` with `start <= rank <= end`, ascending by rank.
    async fn find_by_category_and_rank_between(&self, category: &str, start: i32, end: i32) -> Result<Vec<Model>, ServiceError>;
    async fn find_all_order_by_votes(&self) -> Result<Vec<Model>, ServiceError>;
    /// Distinct category names, ascending.
    async fn find_categories(&self) -> Result<Vec<String>, ServiceError>;
    /// Overwrite the stored record with the same id. `NotFound` if it is gone.
    async fn update(&self, item: Model) -> Result<Model, ServiceError>;
    /// Write `(id, rank)` pairs as one unit of work. Unknown ids are skipped.
    async fn assign_ranks(&self, ranks: &[(i64, i32)]) -> Result<(), ServiceError>;
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmItemRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn insert(&self, fields: ItemFields) -> Result<Model, ServiceError> {
        match toplist_item::create(&self.db, fields).await {
            Ok(m) => Ok(m),
            Err(models::errors::ModelError::Db(msg)) => Err(ServiceError::Db(msg)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        ItemEntity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_all(&self) -> Result<Vec<Model>, ServiceError> {
        ItemEntity::find().order_by_asc(Column::Id).all(&self.db).await.map_err(db_err)
    }

    async fn find_by_category_order_by_rank(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        ItemEntity::find()
            .filter(Column::Category.eq(category))
            .order_by_asc(Column::Rank)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_by_category_order_by_votes(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        ItemEntity::find()
            .filter(Column::Category.eq(category))
            .order_by_desc(Column::VoteCount)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_by_category_and_rank_between(&self, category: &str, start: i32, end: i32) -> Result<Vec<Model>, ServiceError> {
        ItemEntity::find()
            .filter(Column::Category.eq(category))
            .filter(Column::Rank.between(start, end))
            .order_by_asc(Column::Rank)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_all_order_by_votes(&self) -> Result<Vec<Model>, ServiceError> {
        ItemEntity::find()
            .order_by_desc(Column::VoteCount)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_categories(&self) -> Result<Vec<String>, ServiceError> {
        ItemEntity::find()
            .select_only()
            .column(Column::Category)
            .distinct()
            .order_by_asc(Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn update(&self, item: Model) -> Result<Model, ServiceError> {
        let id = item.id;
        match toplist_item::save(&self.db, item).await {
            Ok(m) => Ok(m),
            Err(models::errors::ModelError::Db(msg)) => {
                // RecordNotUpdated: the row vanished between read and write
                if ItemEntity::find_by_id(id).one(&self.db).await.map_err(db_err)?.is_none() {
                    Err(ServiceError::item_not_found(id))
                } else {
                    Err(ServiceError::Db(msg))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn assign_ranks(&self, ranks: &[(i64, i32)]) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        for &(id, rank) in ranks {
            let res = ItemEntity::update_many()
                .col_expr(Column::Rank, Expr::value(rank))
                .filter(Column::Id.eq(id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            if res.rows_affected == 0 {
                debug!(id, rank, "rank target missing; skipped");
            }
        }
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let res = ItemEntity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}
