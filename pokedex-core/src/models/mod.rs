//! Domain models for Pokedex.
//!
//! ## Submodules
//!
//! - [`entry`] - Catalog records (summary, detail, stats, sprites)
//! - [`type_name`] - The `TypeName` tag
//! - [`page`] - Page queries, upstream list pages and assembled page results

mod entry;
mod page;
mod type_name;

pub use entry::{CatalogEntryDetail, CatalogEntrySummary, Sprites, StatValue};
pub use page::{EntryList, FilterMode, PageQuery, PageResult};
pub use type_name::TypeName;
