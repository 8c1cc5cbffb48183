//! Mishap Core - Shared data model for deterministic action resolution
//!
//! This crate provides the types every other mishap crate agrees on:
//! - Identifiers for characters, items, rooms, definitions and ledger entries
//! - The six resolution axes and per-axis modifier maps
//! - The seven character attributes
//! - Trigger conditions and the action context they are evaluated against
//! - Immutable `Character` and `Item` records (with frozen maker profiles)
//! - The ledger record produced by a resolved action
//! - A deterministic, explicitly seeded RNG
//!
//! ## Determinism
//!
//! Nothing in this crate touches ambient randomness. Every random draw goes
//! through [`GameRng`], which is seeded from [`derive_seed`] so that the same
//! inputs always produce the same sequence on every platform.

mod attribute;
mod axis;
mod character;
mod error;
mod identity;
mod item;
mod record;
mod rng;
mod trigger;

pub use attribute::{Attribute, AttributeSet, ATTRIBUTE_MAX, ATTRIBUTE_MIN};
pub use axis::{Axis, AxisModifiers, ResolvedAxes, ResolvedAxis};
pub use character::{Character, CharacterParts, Reputation, Sex, MAX_QUIRKS, MIN_QUIRKS};
pub use error::{Error, Result};
pub use identity::{CharacterId, DefId, ItemId, LedgerId, RoomId};
pub use item::{Item, MakerProfile};
pub use record::{ActionRecord, Interpretation, LedgerEntry, Outcome};
pub use rng::{derive_seed, GameRng, SeedMaterial};
pub use trigger::{ActionContext, Trigger};
