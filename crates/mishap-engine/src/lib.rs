//! Mishap Engine - Deterministic, auditable action resolution
//!
//! Ties the workspace together:
//!
//! - **Issuer**: seeds characters with attributes, quirks, failings and useless bits
//! - **Forge**: makes items that carry a frozen snapshot of their maker
//! - **Resolver**: turns an action into six resolved axes, an outcome, blame and
//!   an interpretation, as a pure function of its inputs and seed
//! - **Engine**: the facade that validates requests, orders each character's
//!   actions and commits every result to the ledger
//!
//! # Example
//!
//! ```rust,ignore
//! use mishap_engine::{ActionRequest, Engine, EngineConfig, Room};
//!
//! let engine = Engine::with_builtin_content(EngineConfig::default())?;
//! engine.register_room(Room::new("harbour", "river").with_quirk("strong_current"))?;
//!
//! let character = engine.issue_character("acct-7", "female", "first")?;
//! let rod = engine.create_item("fishing_rod", character.id(), &[])?;
//!
//! let entry = engine.resolve(
//!     ActionRequest::new(character.id(), "fish", "harbour")
//!         .with_items([rod.id])
//!         .with_seed("dawn"),
//! )?;
//! println!("{} ({})", entry.outcome(), entry.interpretation());
//! ```

mod config;
mod engine;
mod error;
mod forge;
mod issuer;
mod locks;
mod registry;
mod resolver;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use engine::{ActionRequest, Engine};
pub use error::{Error, ErrorKind, Result};
pub use forge::Forge;
pub use issuer::Issuer;
pub use locks::CharacterLocks;
pub use registry::{Registry, Room};
pub use resolver::{Resolution, Resolver};
