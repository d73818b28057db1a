//! Request extractors.

mod json;
mod page;

pub use json::JsonBody;
pub use page::PageQuery;
