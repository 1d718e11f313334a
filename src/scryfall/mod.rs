//! Scryfall card search provider.
//!
//! The discovery engine talks to the card database through the
//! [`CardProvider`] trait. [`ScryfallClient`] is the production implementation
//! backed by `https://api.scryfall.com`; tests substitute an in-memory provider.
//!
//! - `model`: card records and search options as returned by the API
//! - `provider`: the provider contract and the request scope used for cancellation
//! - `query`: construction of Scryfall filter expressions
//! - `client`: blocking HTTP client

pub mod client;
mod error;
pub mod model;
pub mod provider;
pub mod query;

pub use client::ScryfallClient;
pub use error::{ProviderError, ProviderResult};
pub use model::{Card, CardFace, RelatedCard, SearchOptions, SearchPage, UniqueMode};
pub use provider::{CancelGuard, CardProvider, RequestScope};
