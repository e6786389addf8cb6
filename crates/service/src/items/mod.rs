//! Ranked, voteable items grouped by category.

pub mod memory;
pub mod repository;
pub mod service;
