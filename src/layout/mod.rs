pub mod error;
pub mod justified;

pub use error::{LayoutError, LayoutResult};
pub use justified::{JustifiedLayout, RowBreak};
