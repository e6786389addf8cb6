use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_toplist_item::ToplistItem;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category listing ordered by rank
        manager
            .create_index(
                Index::create()
                    .name("idx_toplist_item_category_rank")
                    .table(ToplistItem::Table)
                    .col(ToplistItem::Category)
                    .col(ToplistItem::Rank)
                    .to_owned(),
            )
            .await?;

        // Leaderboards ordered by votes
        manager
            .create_index(
                Index::create()
                    .name("idx_toplist_item_vote_count")
                    .table(ToplistItem::Table)
                    .col(ToplistItem::VoteCount)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_toplist_item_vote_count").table(ToplistItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_toplist_item_category_rank").table(ToplistItem::Table).to_owned())
            .await
    }
}
