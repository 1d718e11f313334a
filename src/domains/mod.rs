//! Domains module containing business logic organized by bounded contexts.
//!
//! - **discovery**: card lookup, theme extraction, related cards and synergies
//! - **tools**: MCP tools exposing discovery to clients
//! - **resources**: reference datasets and server information

pub mod discovery;
pub mod resources;
pub mod tools;
