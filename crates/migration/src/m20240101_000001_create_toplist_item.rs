//! Create `toplist_item` table.
//! Stores ranked, voteable items grouped by a free-text category.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ToplistItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ToplistItem::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(ToplistItem::Title, 255).not_null())
                    .col(text_null(ToplistItem::Description))
                    .col(string_len(ToplistItem::Category, 128).not_null())
                    .col(integer(ToplistItem::Rank).not_null())
                    .col(integer(ToplistItem::VoteCount).not_null().default(0))
                    .col(string_len_null(ToplistItem::ImageUrl, 1024))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ToplistItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum ToplistItem {
    Table,
    Id,
    Title,
    Description,
    Category,
    Rank,
    VoteCount,
    ImageUrl,
}
