//! Card tools module.
//!
//! Tools backed by the Scryfall card database:
//! - `search_by_name`, `search_by_text`, `search_by_color`: direct card searches
//! - `related`: related-card categories for a card
//! - `synergies`: synergy categories for a card
//!
//! Each tool has handlers for both HTTP and STDIO/TCP transports.

pub mod common;
pub mod related;
pub mod search_by_color;
pub mod search_by_name;
pub mod search_by_text;
pub mod synergies;

#[cfg(test)]
pub(crate) mod testing;

pub use related::{FindRelatedCardsParams, FindRelatedCardsTool};
pub use search_by_color::{SearchCardByColorParams, SearchCardByColorTool};
pub use search_by_name::{SearchCardByNameParams, SearchCardByNameTool};
pub use search_by_text::{SearchCardByTextParams, SearchCardByTextTool};
pub use synergies::{FindCardSynergiesParams, FindCardSynergiesTool};
