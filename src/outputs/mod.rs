mod list;
pub use list::List;
mod list_format;
pub use list_format::{ListBuilder, ListFormat};
mod triangle_winding;
pub use triangle_winding::TriangleWinding;

pub mod formats;
