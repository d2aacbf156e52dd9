//! Layout model: ids, fields, rows, pages and the document

mod document;
mod field;
mod ids;
mod slug;

pub use document::*;
pub use field::*;
pub use ids::*;
pub use slug::*;
