use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use models::toplist_item::{ItemFields, Model};

use crate::errors::ServiceError;
use crate::items::repository::ItemRepository;

/// Process-local item store.
///
/// Records live in a `BTreeMap` keyed by id, so `find_all` yields insertion
/// order. Ids come from a counter that only moves forward and are never reused.
#[derive(Default)]
pub struct InMemoryItemRepository {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    items: BTreeMap<i64, Model>,
    last_id: i64,
}

impl InMemoryItemRepository {
    pub fn new() -> Self { Self::default() }
}

fn by_rank(a: &Model, b: &Model) -> std::cmp::Ordering {
    a.rank.cmp(&b.rank).then(a.id.cmp(&b.id))
}

fn by_votes_desc(a: &Model, b: &Model) -> std::cmp::Ordering {
    b.vote_count.cmp(&a.vote_count).then(a.id.cmp(&b.id))
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, fields: ItemFields) -> Result<Model, ServiceError> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let item = Model {
            id: state.last_id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            rank: fields.rank,
            vote_count: fields.vote_count,
            image_url: fields.image_url,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        let state = self.inner.read().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Model>, ServiceError> {
        let state = self.inner.read().await;
        Ok(state.items.values().cloned().collect())
    }

    async fn find_by_category_order_by_rank(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        let state = self.inner.read().await;
        let mut out: Vec<Model> = state.items.values().filter(|m| m.category == category).cloned().collect();
        out.sort_by(by_rank);
        Ok(out)
    }

    async fn find_by_category_order_by_votes(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        let state = self.inner.read().await;
        let mut out: Vec<Model> = state.items.values().filter(|m| m.category == category).cloned().collect();
        out.sort_by(by_votes_desc);
        Ok(out)
    }

    async fn find_by_category_and_rank_between(&self, category: &str, start: i32, end: i32) -> Result<Vec<Model>, ServiceError> {
        let state = self.inner.read().await;
        let mut out: Vec<Model> = state
            .items
            .values()
            .filter(|m| m.category == category && (start..=end).contains(&m.rank))
            .cloned()
            .collect();
        out.sort_by(by_rank);
        Ok(out)
    }

    async fn find_all_order_by_votes(&self) -> Result<Vec<Model>, ServiceError> {
        let state = self.inner.read().await;
        let mut out: Vec<Model> = state.items.values().cloned().collect();
        out.sort_by(by_votes_desc);
        Ok(out)
    }

    async fn find_categories(&self) -> Result<Vec<String>, ServiceError> {
        let state = self.inner.read().await;
        let set: BTreeSet<&String> = state.items.values().map(|m| &m.category).collect();
        Ok(set.into_iter().cloned().collect())
    }

    async fn update(&self, item: Model) -> Result<Model, ServiceError> {
        let mut state = self.inner.write().await;
        match state.items.get_mut(&item.id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(item)
            }
            None => Err(ServiceError::item_not_found(item.id)),
        }
    }

    async fn assign_ranks(&self, ranks: &[(i64, i32)]) -> Result<(), ServiceError> {
        let mut state = self.inner.write().await;
        for &(id, rank) in ranks {
            if let Some(item) = state.items.get_mut(&id) {
                item.rank = rank;
            }
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let mut state = self.inner.write().await;
        Ok(state.items.remove(&id).is_some())
    }
}
