pub mod media_item;
pub mod row_model;

pub use media_item::{MediaItem, MediaType};
pub use row_model::{RowItem, RowModel};
