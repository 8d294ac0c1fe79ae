// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pokedex Catalog
//!
//! Read access to the upstream catalog and page assembly on top of it.
//!
//! - [`CatalogApi`] - The four read operations the rest of the workspace needs
//! - [`CatalogClient`] - HTTP implementation of [`CatalogApi`]
//! - [`CatalogCache`] / [`MemoCache`] - Injectable, bounded, time-limited memo
//! - [`PageAssembler`] - Turns a [`PageQuery`](pokedex_core::PageQuery) into a
//!   [`PageResult`](pokedex_core::PageResult)
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pokedex_catalog::{CatalogCache, CatalogClient, PageAssembler};
//! use pokedex_core::PageQuery;
//!
//! let client = CatalogClient::new(CatalogClient::DEFAULT_BASE_URL)?
//!     .with_cache(Arc::new(CatalogCache::default()));
//! let assembler = PageAssembler::new(Arc::new(client));
//!
//! let page = assembler.get_page(&PageQuery::new("char", "fire", 0, 20)).await?;
//! ```

pub mod api;
pub mod assembler;
pub mod cache;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "tests"))]
pub mod fixture;
pub mod source;

pub use assembler::{DEFAULT_SEARCH_BATCH_LIMIT, PageAssembler};
pub use cache::{CatalogCache, MemoCache};
pub use client::CatalogClient;
pub use error::AssemblyError;
pub use source::CatalogApi;
