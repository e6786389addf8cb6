pub mod errors;
pub mod db;
pub mod toplist_item;
