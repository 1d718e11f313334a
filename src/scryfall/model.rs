//! Card records and search options.
//!
//! Field names follow the Scryfall card object. Only the fields the server
//! reads or returns are modelled; everything is optional except the identity
//! fields because Scryfall omits attributes that do not apply to a card
//! (tokens have no mana cost, double-faced cards keep their text in faces).

use std::borrow::Cow;
use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A card printing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Card {
    /// Scryfall id of this printing.
    pub id: String,

    /// Id shared by every printing of the same card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scryfall_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmc: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,

    /// Rules text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,

    /// Color symbols (`W`, `U`, `B`, `R`, `G`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,

    #[serde(default)]
    pub color_identity: Vec<String>,

    /// Keywords as reported by Scryfall.
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub legalities: BTreeMap<String, String>,

    /// Set code.
    #[serde(default)]
    pub set: String,

    #[serde(default)]
    pub set_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub prices: BTreeMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,

    /// Related objects (tokens, meld parts, combo pieces).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_parts: Option<Vec<RelatedCard>>,
}

impl Card {
    /// Rules text, empty when the card has none.
    ///
    /// Multi-faced cards without top-level text yield their faces' text,
    /// one face per line.
    pub fn oracle_text(&self) -> Cow<'_, str> {
        match &self.oracle_text {
            Some(text) => Cow::Borrowed(text),
            None => self.join_faces(|face| face.oracle_text.as_deref(), "\n"),
        }
    }

    /// Type line, empty when absent. Faces are joined with ` // `.
    pub fn type_line(&self) -> Cow<'_, str> {
        match &self.type_line {
            Some(type_line) => Cow::Borrowed(type_line),
            None => self.join_faces(|face| face.type_line.as_deref(), " // "),
        }
    }

    /// Artist, `None` when absent or blank.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Color symbols, empty when absent. Falls back to the union of the
    /// faces' colors in face order.
    pub fn colors(&self) -> Cow<'_, [String]> {
        if let Some(colors) = &self.colors {
            return Cow::Borrowed(colors);
        }
        let mut merged: Vec<String> = Vec::new();
        for color in self.faces().filter_map(|f| f.colors.as_ref()).flatten() {
            if !merged.contains(color) {
                merged.push(color.clone());
            }
        }
        Cow::Owned(merged)
    }

    fn faces(&self) -> impl Iterator<Item = &CardFace> {
        self.card_faces.iter().flatten()
    }

    fn join_faces<'a>(
        &'a self,
        field: impl Fn(&'a CardFace) -> Option<&'a str>,
        separator: &str,
    ) -> Cow<'a, str> {
        let parts: Vec<&str> = self
            .faces()
            .filter_map(field)
            .filter(|part| !part.is_empty())
            .collect();
        match parts.as_slice() {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(*single),
            _ => Cow::Owned(parts.join(separator)),
        }
    }

    /// Related parts whose component is `token`.
    pub fn token_parts(&self) -> impl Iterator<Item = &RelatedCard> {
        self.all_parts
            .iter()
            .flatten()
            .filter(|part| part.component == "token")
    }
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardFace {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
}

/// Reference to a related object in `all_parts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedCard {
    pub id: String,

    /// `token`, `meld_part`, `meld_result` or `combo_piece`.
    pub component: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub cards: Vec<Card>,

    /// Total number of matches reported by the provider.
    pub total_cards: usize,

    pub has_more: bool,
}

impl SearchPage {
    /// Build a complete single page from a list of cards.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            total_cards: cards.len(),
            cards,
            has_more: false,
        }
    }
}

/// Strategy for collapsing duplicate printings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueMode {
    /// One result per card (oracle identity).
    #[default]
    Cards,
    /// One result per unique artwork.
    Art,
    /// Every printing.
    Prints,
}

/// Options attached to a search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    pub unique: UniqueMode,
    pub include_extras: bool,
    pub include_multilingual: bool,
    pub include_variations: bool,
}

impl SearchOptions {
    /// Options used for reprint lookups, where every printing matters.
    pub fn prints() -> Self {
        Self {
            unique: UniqueMode::Prints,
            ..Self::default()
        }
    }
}
