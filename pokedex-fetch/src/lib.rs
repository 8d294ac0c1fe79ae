// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pokedex Fetch
//!
//! Outbound HTTP for the Pokedex catalog client.
//!
//! Every request goes through [`HttpClient::fetch_json`], which:
//!
//! - bounds each attempt with a timeout (5 seconds by default), cancelling
//!   the in-flight request when it expires
//! - treats any non-2xx status, network error, timeout or undecodable body as
//!   a failed attempt
//! - retries up to [`RetryStrategy::max_attempts`] attempts in total with
//!   exponential backoff between attempts
//! - collapses the final failure into a single [`FetchError::Failed`]
//!
//! The client holds no per-call state and can be cloned and used from many
//! tasks at once.
//!
//! ## Example
//!
//! ```ignore
//! use pokedex_fetch::HttpClient;
//!
//! let client = HttpClient::new()?;
//! let url = url::Url::parse("https://pokeapi.co/api/v2/type")?;
//! let body: serde_json::Value = client.fetch_json(&url).await?;
//! ```

pub mod client;
pub mod error;
pub mod retry;

pub use client::{DEFAULT_TIMEOUT, HttpClient};
pub use error::{AttemptError, FetchError};
pub use retry::{Exhausted, RetryStrategy};
