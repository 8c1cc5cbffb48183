//! Mishap Content - RON loader and validated content library
//!
//! Loads the catalog the engine draws on:
//! - Character quirks, failings and useless bits (issuance and resolution)
//! - Item quirks and item types (the forge)
//! - Environmental quirks (rooms)
//! - Action types with their thresholds and unarmed fallbacks
//! - The reputation bias table
//!
//! Every definition kind implements [`ModifierSource`], so resolution can
//! treat all of them uniformly.

mod error;
mod library;
mod loader;
pub mod schema;
mod source;

pub use error::{Error, Result};
pub use library::ContentLibrary;
pub use loader::{LoadReport, Loader, Rejection};
pub use schema::{
    ActionDef, Discovery, EnvironmentalQuirkDef, FailingDef, Interaction, InteractionEffect,
    ItemQuirkDef, ItemTypeDef, QuirkDef, ReputationBias, Severity, UselessBitDef,
};
pub use source::{ModifierSource, SourceOrigin};
