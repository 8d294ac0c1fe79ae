// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pokedex Core
//!
//! Core types and models shared by every Pokedex crate.
//!
//! This crate has no I/O of its own. It defines:
//!
//! - Catalog records as the rest of the workspace sees them
//! - Page queries and page results exchanged with the page assembler
//! - The core error type
//!
//! ## Key Types
//!
//! ### Catalog Records
//! - [`CatalogEntrySummary`] - Name + URL reference from the list endpoint
//! - [`CatalogEntryDetail`] - Full record for one entry
//! - [`StatValue`] - One `(stat, base value)` pair
//! - [`Sprites`] - Image URLs for an entry
//! - [`TypeName`] - Elemental type tag
//!
//! ### Paging
//! - [`EntryList`] - One upstream list page
//! - [`PageQuery`] - Search term, type filter, page index and size
//! - [`FilterMode`] - Which assembly branch a query takes
//! - [`PageResult`] - One assembled page with totals

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Catalog records
    CatalogEntryDetail,
    CatalogEntrySummary,
    Sprites,
    StatValue,
    TypeName,
    // Paging
    EntryList,
    FilterMode,
    PageQuery,
    PageResult,
};
