// Service exports
pub mod cache;
pub mod catalog;

pub use cache::CatalogCache;
pub use catalog::{Catalog, CatalogError, CatalogSource, CsvCatalogLoader};
