//! Discovery domain module.
//!
//! This module classifies a card's rules text into keyword abilities and
//! themes, then turns the classification into related-card and synergy
//! categories by issuing follow-up queries against a [`CardProvider`].
//!
//! ## Architecture
//!
//! - `reference.rs` - Load-once cache of the reference datasets
//! - `keywords.rs` - Keyword ability extraction
//! - `themes.rs` - Theme patterns and classification
//! - `lookup.rs` - Main-card resolution and shared limits
//! - `related.rs` - Related-card categories
//! - `synergy.rs` - Synergy categories
//! - `service.rs` - Entry points used by the tools
//!
//! [`CardProvider`]: crate::scryfall::CardProvider

mod error;
pub mod keywords;
pub mod lookup;
pub mod reference;
pub mod related;
mod service;
pub mod synergy;
pub mod themes;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DiscoveryError, ReferenceError};
pub use keywords::extract_keywords;
pub use reference::{ReferenceCache, ReferenceSource};
pub use related::{RelatedCardCategory, RelationType};
pub use service::{
    CardSearchResult, CardSynergiesResult, DiscoveryService, RelatedCardsResult, SearchKind,
};
pub use synergy::SynergyCategory;
pub use themes::{extract_themes, ThemePattern, ThemePatterns};
