//! Rust SDK for the memory inspection API
//!
//! Typed access to the five read endpoints the memory browser consumes:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | List memories | GET | `/api/memories` |
//! | Memory detail | GET | `/api/memories/{id}` |
//! | List events | GET | `/api/memories/{id}/events` |
//! | List records | GET | `/api/memories/{id}/records` |
//! | Retrieve records | POST | `/api/memories/{id}/retrieve` |
//!
//! Any non-2xx answer becomes [`Error::Api`] carrying the status code and its
//! reason phrase; error bodies are not parsed.
//!
//! ```rust,no_run
//! use memory_browser_sdk::{Client, RetrieveRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://localhost:8080")?;
//!
//!     let page = client
//!         .memories()
//!         .retrieve(
//!             "mem-1",
//!             &RetrieveRequest {
//!                 query: "favourite drink".into(),
//!                 namespace: "/strategies/s-1/".into(),
//!                 max_results: 20,
//!                 next_token: None,
//!             },
//!         )
//!         .await?;
//!     println!("found {} records", page.records.len());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod types;

#[cfg(feature = "http-client")]
pub mod client;

// Re-exports
pub use error::{Error, Result};
pub use types::*;

#[cfg(feature = "http-client")]
pub use client::{Client, MemoriesApi};
