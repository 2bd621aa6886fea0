mod collection;
mod index;

pub use collection::CollectionSpec;
pub use index::{IndexKey, IndexSpec, SortDirection};
