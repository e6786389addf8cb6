//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access through `ItemRepository`.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod items;
#[cfg(test)]
pub mod test_support;

pub use items::{
    memory::InMemoryItemRepository,
    repository::{ItemRepository, SeaOrmItemRepository},
    service::{ItemService, ReorderEntry},
};
