// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pokedex Store
//!
//! State management for Pokedex front ends.
//!
//! This crate provides:
//!
//! - **SearchState / reduce**: Pure accumulator state machine
//! - **SearchSession**: Drives the page assembler and publishes state
//! - **SearchDebouncer**: Settles raw keystrokes into filter changes
//! - **SettingsStore**: User preferences with persistence
//!
//! ## Usage
//!
//! ```ignore
//! use pokedex_store::SearchSession;
//!
//! let session = SearchSession::new(assembler, 20);
//! let mut rx = session.subscribe();
//!
//! if let Some(task) = session.set_filters("char", "fire").await {
//!     task.await?;
//! }
//! while rx.changed().await.is_ok() {
//!     println!("{} entries", rx.borrow().entries.len());
//! }
//! ```

pub mod debounce;
pub mod error;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod state;

pub use debounce::SearchDebouncer;
pub use error::StoreError;
pub use persistence::{default_config_dir, default_settings_path};
pub use session::SearchSession;
pub use settings::{LogLevel, Settings, SettingsStore};
pub use state::{DEFAULT_PAGE_SIZE, PageRequest, Phase, SearchEvent, SearchState, reduce};
