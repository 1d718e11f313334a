//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod cards;

pub use cards::{
    FindCardSynergiesParams, FindCardSynergiesTool, FindRelatedCardsParams, FindRelatedCardsTool,
    SearchCardByColorParams, SearchCardByColorTool, SearchCardByNameParams, SearchCardByNameTool,
    SearchCardByTextParams, SearchCardByTextTool,
};
