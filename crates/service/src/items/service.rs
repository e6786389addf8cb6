use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use models::toplist_item::{ItemPayload, Model};

use crate::errors::ServiceError;
use crate::items::repository::ItemRepository;

/// One element of a reorder request. Clients send whole items; only the id
/// is read, the list position decides the new rank.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Application service encapsulating item business rules.
///
/// Every call is a single attempt against the repository. Concurrent votes
/// or updates on one item are read-modify-write and the last write wins.
#[derive(Clone)]
pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self { Self { repo } }

    pub async fn get_all_items(&self) -> Result<Vec<Model>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn get_item_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Items of `category`, ascending by rank.
    pub async fn get_items_by_category(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        self.repo.find_by_category_order_by_rank(category).await
    }

    /// Items of `category`, descending by vote count.
    pub async fn get_items_by_category_order_by_votes(&self, category: &str) -> Result<Vec<Model>, ServiceError> {
        self.repo.find_by_category_order_by_votes(category).await
    }

    /// Items of `category` ranked within `start..=end`.
    pub async fn get_items_by_rank_range(&self, category: &str, start: i32, end: i32) -> Result<Vec<Model>, ServiceError> {
        if start > end {
            return Err(ServiceError::Validation(format!("start ({}) must not exceed end ({})", start, end)));
        }
        self.repo.find_by_category_and_rank_between(category, start, end).await
    }

    pub async fn get_all_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.repo.find_categories().await
    }

    pub async fn get_top_items_by_votes(&self) -> Result<Vec<Model>, ServiceError> {
        self.repo.find_all_order_by_votes().await
    }

    /// Store a new item. A submitted `voteCount` is kept as-is.
    #[instrument(skip(self, payload))]
    pub async fn create_item(&self, payload: ItemPayload) -> Result<Model, ServiceError> {
        let fields = payload.validate()?;
        let created = self.repo.insert(fields).await?;
        info!(id = created.id, category = %created.category, "created item");
        Ok(created)
    }

    /// Replace title, description, category, rank and image url. The vote
    /// count is never touched here.
    #[instrument(skip(self, payload))]
    pub async fn update_item(&self, id: i64, payload: ItemPayload) -> Result<Model, ServiceError> {
        let fields = payload.validate()?;
        let mut item = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::item_not_found(id))?;
        item.apply(fields);
        let updated = self.repo.update(item).await?;
        info!(id, "updated item");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn vote_for_item(&self, id: i64) -> Result<Model, ServiceError> {
        let mut item = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::item_not_found(id))?;
        item.vote_count = item
            .vote_count
            .checked_add(1)
            .ok_or_else(|| ServiceError::Db(format!("voteCount of item {} cannot grow past {}", id, i32::MAX)))?;
        let voted = self.repo.update(item).await?;
        info!(id, vote_count = voted.vote_count, "voted for item");
        Ok(voted)
    }

    /// Removing an id that does not exist is not an error.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<(), ServiceError> {
        let existed = self.repo.delete_by_id(id).await?;
        info!(id, existed, "deleted item");
        Ok(())
    }

    /// Rank the submitted items 1..N in list order, then return `category`
    /// as stored. Membership of the entries in `category` is not checked.
    /// Ranks are dense over entries that carry an id: `[a, {}, b]` ranks b 2.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn update_ranks(&self, category: &str, entries: Vec<ReorderEntry>) -> Result<Vec<Model>, ServiceError> {
        let ids: Vec<i64> = entries.iter().filter_map(|e| e.id).collect();
        if ids.len() < entries.len() {
            warn!(skipped = entries.len() - ids.len(), "reorder entries without id ignored");
        }
        let ranks = ids
            .into_iter()
            .enumerate()
            .map(|(pos, id)| {
                i32::try_from(pos + 1)
                    .map(|rank| (id, rank))
                    .map_err(|_| ServiceError::Validation("too many items to rank".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.repo.assign_ranks(&ranks).await?;
        info!(%category, ranked = ranks.len(), "reordered category");
        self.get_items_by_category(category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::memory::InMemoryItemRepository;
    use crate::items::repository::SeaOrmItemRepository;
    use crate::test_support::{get_db, payload};

    fn memory_service() -> ItemService {
        ItemService::new(Arc::new(InMemoryItemRepository::new()))
    }

    fn entries(ids: &[i64]) -> Vec<ReorderEntry> {
        ids.iter().map(|&id| ReorderEntry { id: Some(id) }).collect()
    }

    #[tokio::test]
    async fn create_assigns_unique_ids_and_keeps_votes() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("Inception", "Movies", 1)).await?;
        let b = svc.create_item(payload("Heat", "Movies", 2)).await?;
        assert_ne!(a.id, b.id);
        assert_eq!(a.vote_count, 0);

        let mut seeded = payload("Alien", "Movies", 3);
        seeded.vote_count = Some(10);
        let c = svc.create_item(seeded).await?;
        assert_eq!(c.vote_count, 10);
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_title_and_category() {
        let svc = memory_service();
        let no_title = ItemPayload { category: Some("Movies".into()), ..Default::default() };
        assert!(matches!(svc.create_item(no_title).await, Err(ServiceError::Model(_))));
        let no_category = ItemPayload { title: Some("Inception".into()), ..Default::default() };
        assert!(matches!(svc.create_item(no_category).await, Err(ServiceError::Model(_))));
        assert!(svc.get_all_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vote_increments_by_one_only() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("Inception", "Movies", 1)).await?;
        let voted = svc.vote_for_item(a.id).await?;
        assert_eq!(voted.vote_count, a.vote_count + 1);
        assert_eq!(Model { vote_count: a.vote_count, ..voted.clone() }, a);

        svc.vote_for_item(a.id).await?;
        svc.vote_for_item(a.id).await?;
        assert_eq!(svc.get_item_by_id(a.id).await?.unwrap().vote_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn vote_at_max_count_is_a_storage_error() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let mut full = payload("Inception", "Movies", 1);
        full.vote_count = Some(i32::MAX);
        let a = svc.create_item(full).await?;

        assert!(matches!(svc.vote_for_item(a.id).await, Err(ServiceError::Db(_))));
        assert_eq!(svc.get_item_by_id(a.id).await?.unwrap().vote_count, i32::MAX);
        Ok(())
    }

    #[tokio::test]
    async fn update_ranks_is_dense_over_entries_with_ids() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("a", "X", 9)).await?;
        let b = svc.create_item(payload("b", "X", 9)).await?;
        let submitted = vec![ReorderEntry { id: Some(a.id) }, ReorderEntry { id: None }, ReorderEntry { id: Some(b.id) }];
        let out = svc.update_ranks("X", submitted).await?;
        assert_eq!(out.iter().map(|m| (m.id, m.rank)).collect::<Vec<_>>(), vec![(a.id, 1), (b.id, 2)]);
        Ok(())
    }

    #[tokio::test]
    async fn vote_and_update_on_missing_id_are_not_found() {
        let svc = memory_service();
        assert!(matches!(svc.vote_for_item(404).await, Err(ServiceError::NotFound(_))));
        let res = svc.update_item(404, payload("x", "y", 1)).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_replaces_fields_but_not_votes() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("Inception", "Movies", 1)).await?;
        svc.vote_for_item(a.id).await?;

        let mut changes = payload("Interstellar", "Films", 4);
        changes.description = Some("space".into());
        changes.image_url = Some("http://img/1.png".into());
        changes.vote_count = Some(500);
        let updated = svc.update_item(a.id, changes).await?;

        assert_eq!(updated.id, a.id);
        assert_eq!(updated.title, "Interstellar");
        assert_eq!(updated.category, "Films");
        assert_eq!(updated.rank, 4);
        assert_eq!(updated.description.as_deref(), Some("space"));
        assert_eq!(updated.image_url.as_deref(), Some("http://img/1.png"));
        assert_eq!(updated.vote_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn category_views_filter_and_sort() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("A", "X", 2)).await?;
        let b = svc.create_item(payload("B", "X", 1)).await?;
        svc.create_item(payload("C", "Y", 1)).await?;
        svc.vote_for_item(a.id).await?;

        let by_rank = svc.get_items_by_category("X").await?;
        assert!(by_rank.iter().all(|m| m.category == "X"));
        assert_eq!(by_rank.iter().map(|m| m.id).collect::<Vec<_>>(), vec![b.id, a.id]);

        let by_votes = svc.get_items_by_category_order_by_votes("X").await?;
        assert_eq!(by_votes.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.id, b.id]);

        assert_eq!(svc.get_all_categories().await?, vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(svc.get_top_items_by_votes().await?[0].id, a.id);
        Ok(())
    }

    #[tokio::test]
    async fn update_ranks_follows_submitted_order() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("a", "X", 7)).await?;
        let b = svc.create_item(payload("b", "X", 7)).await?;
        let c = svc.create_item(payload("c", "X", 7)).await?;

        let out = svc.update_ranks("X", entries(&[c.id, a.id, b.id])).await?;
        assert_eq!(out.iter().map(|m| (m.id, m.rank)).collect::<Vec<_>>(), vec![(c.id, 1), (a.id, 2), (b.id, 3)]);

        let again = svc.get_items_by_category("X").await?;
        assert_eq!(again.iter().map(|m| m.id).collect::<Vec<_>>(), vec![c.id, a.id, b.id]);
        Ok(())
    }

    #[tokio::test]
    async fn update_ranks_does_not_check_category() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("a", "X", 5)).await?;
        let stray = svc.create_item(payload("stray", "Y", 5)).await?;

        let mut submitted = entries(&[stray.id, a.id]);
        submitted.insert(1, ReorderEntry { id: None });
        let out = svc.update_ranks("X", submitted).await?;
        assert_eq!(out.iter().map(|m| (m.id, m.rank)).collect::<Vec<_>>(), vec![(a.id, 2)]);
        assert_eq!(svc.get_item_by_id(stray.id).await?.unwrap().rank, 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_is_silent() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        let a = svc.create_item(payload("a", "X", 1)).await?;
        svc.delete_item(9999).await?;
        assert_eq!(svc.get_all_items().await?, vec![a.clone()]);
        svc.delete_item(a.id).await?;
        assert!(svc.get_item_by_id(a.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn rank_range_rejects_inverted_bounds() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        svc.create_item(payload("a", "X", 1)).await?;
        svc.create_item(payload("b", "X", 2)).await?;
        assert!(matches!(svc.get_items_by_rank_range("X", 3, 1).await, Err(ServiceError::Validation(_))));
        assert_eq!(svc.get_items_by_rank_range("X", 2, 9).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn inception_voted_three_times_on_database() -> Result<(), anyhow::Error> {
        let svc = ItemService::new(Arc::new(SeaOrmItemRepository::new(get_db().await?)));
        let created = svc.create_item(payload("Inception", "Movies", 1)).await?;
        assert_eq!(created.vote_count, 0);
        for _ in 0..3 {
            svc.vote_for_item(created.id).await?;
        }
        let found = svc.get_item_by_id(created.id).await?.expect("item exists");
        assert_eq!(found.vote_count, 3);
        assert_eq!(found.title, "Inception");
        Ok(())
    }
}
