//! Catalog data access for the lost-and-found application
//!
//! Repositories are traits so the surrounding application can back them with its own
//! database. [`MemoryStore`] implements every trait in memory and is what the CLI and
//! tests run against. [`CatalogService`] layers the catalog operations (search, claim,
//! reporting, staff review) over any set of repositories.

pub mod catalog;
pub mod memory;
pub mod traits;

pub use catalog::{CatalogService, Dashboard};
pub use memory::{MemoryStore, Seed};
pub use traits::{CategoryRepository, ItemRepository, LostRequestRepository, ReportRepository};
