//! Issued character records

use crate::attribute::AttributeSet;
use crate::error::{Error, Result};
use crate::identity::{CharacterId, DefId};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Fewest quirks an issued character may carry
pub const MIN_QUIRKS: usize = 2;
/// Most quirks an issued character may carry
pub const MAX_QUIRKS: usize = 4;

/// Character sex as accepted at issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Unspecified,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            "unspecified" | "x" => Ok(Sex::Unspecified),
            _ => Err(Error::InvalidSex(s.to_string())),
        }
    }
}

/// The one mutable part of a character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    pub score: i32,
    pub notes: String,
}

impl Reputation {
    pub fn new(score: i32, notes: impl Into<String>) -> Self {
        Self {
            score,
            notes: notes.into(),
        }
    }
}

/// An issued character
///
/// Everything except reputation and the active flag is fixed at issuance.
/// Fields are private so the only mutations possible are the two external
/// collaborators are allowed to make.
///
/// Deserializing goes through [`Character::new`], so a stored record that
/// breaks the trait invariants is rejected rather than loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    id: CharacterId,
    account_ref: String,
    sex: Sex,
    attributes: AttributeSet,
    quirks: Vec<DefId>,
    failings: Vec<DefId>,
    useless_bits: Vec<DefId>,
    reputation: Reputation,
    active: bool,
    issued_seed: String,
    created_at: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Stored {
            id: CharacterId,
            account_ref: String,
            sex: Sex,
            attributes: AttributeSet,
            quirks: Vec<DefId>,
            failings: Vec<DefId>,
            useless_bits: Vec<DefId>,
            reputation: Reputation,
            active: bool,
            issued_seed: String,
            created_at: DateTime<Utc>,
        }

        let stored = Stored::deserialize(deserializer)?;
        let mut character = Character::new(CharacterParts {
            id: stored.id,
            account_ref: stored.account_ref,
            sex: stored.sex,
            attributes: stored.attributes,
            quirks: stored.quirks,
            failings: stored.failings,
            useless_bits: stored.useless_bits,
            reputation: stored.reputation,
            issued_seed: stored.issued_seed,
            created_at: stored.created_at,
        })
        .map_err(de::Error::custom)?;
        character.active = stored.active;
        Ok(character)
    }
}

/// Parts of a character assembled by the issuer
#[derive(Debug, Clone)]
pub struct CharacterParts {
    pub id: CharacterId,
    pub account_ref: String,
    pub sex: Sex,
    pub attributes: AttributeSet,
    pub quirks: Vec<DefId>,
    pub failings: Vec<DefId>,
    pub useless_bits: Vec<DefId>,
    pub reputation: Reputation,
    pub issued_seed: String,
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Assemble an active character, checking trait invariants
    pub fn new(parts: CharacterParts) -> Result<Self> {
        if !(MIN_QUIRKS..=MAX_QUIRKS).contains(&parts.quirks.len()) {
            return Err(Error::InvalidCharacter(format!(
                "expected {}..={} quirks, got {}",
                MIN_QUIRKS,
                MAX_QUIRKS,
                parts.quirks.len()
            )));
        }
        if parts.useless_bits.is_empty() {
            return Err(Error::InvalidCharacter(
                "at least one useless bit is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let all = parts
            .quirks
            .iter()
            .chain(&parts.failings)
            .chain(&parts.useless_bits);
        for id in all {
            if !seen.insert(id) {
                return Err(Error::InvalidCharacter(format!("duplicate trait id: {}", id)));
            }
        }

        Ok(Self {
            id: parts.id,
            account_ref: parts.account_ref,
            sex: parts.sex,
            attributes: parts.attributes,
            quirks: parts.quirks,
            failings: parts.failings,
            useless_bits: parts.useless_bits,
            reputation: parts.reputation,
            active: true,
            issued_seed: parts.issued_seed,
            created_at: parts.created_at,
        })
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn account_ref(&self) -> &str {
        &self.account_ref
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn quirks(&self) -> &[DefId] {
        &self.quirks
    }

    pub fn failings(&self) -> &[DefId] {
        &self.failings
    }

    pub fn useless_bits(&self) -> &[DefId] {
        &self.useless_bits
    }

    pub fn has_quirk(&self, id: &DefId) -> bool {
        self.quirks.contains(id)
    }

    pub fn reputation(&self) -> &Reputation {
        &self.reputation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn issued_seed(&self) -> &str {
        &self.issued_seed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace reputation; the only field-level change an outside caller may make
    pub fn update_reputation(&mut self, reputation: Reputation) {
        self.reputation = reputation;
    }

    /// Mark the character inactive. There is no way back.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(quirks: &[&str], useless: &[&str]) -> CharacterParts {
        CharacterParts {
            id: CharacterId(1),
            account_ref: "acct-1".to_string(),
            sex: Sex::Unspecified,
            attributes: AttributeSet::new([9, 2, 3, 4, 5, 1, 3]).unwrap(),
            quirks: quirks.iter().map(|q| DefId::new(*q)).collect(),
            failings: vec![DefId::new("early_action")],
            useless_bits: useless.iter().map(|q| DefId::new(*q)).collect(),
            reputation: Reputation::new(0, "unknown"),
            issued_seed: "s".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_character_is_active() {
        let character = Character::new(parts(&["a", "b"], &["knots"])).unwrap();
        assert!(character.is_active());
        assert!(character.has_quirk(&DefId::new("a")));
    }

    #[test]
    fn test_quirk_count_enforced() {
        assert!(Character::new(parts(&["a"], &["knots"])).is_err());
        assert!(Character::new(parts(&["a", "b", "c", "d", "e"], &["knots"])).is_err());
    }

    #[test]
    fn test_useless_bit_required() {
        assert!(Character::new(parts(&["a", "b"], &[])).is_err());
    }

    #[test]
    fn test_duplicates_across_trait_kinds_rejected() {
        let err = Character::new(parts(&["a", "early_action"], &["knots"])).unwrap_err();
        assert!(matches!(err, Error::InvalidCharacter(msg) if msg.contains("early_action")));
    }

    #[test]
    fn test_only_reputation_and_active_change() {
        let mut character = Character::new(parts(&["a", "b"], &["knots"])).unwrap();
        let before = (character.attributes, character.quirks.clone());

        character.update_reputation(Reputation::new(5, "hero of the pier"));
        character.deactivate();

        assert_eq!((character.attributes, character.quirks.clone()), before);
        assert_eq!(character.reputation().score, 5);
        assert!(!character.is_active());
    }

    #[test]
    fn test_deserialize_rechecks_invariants() {
        let mut character = Character::new(parts(&["a", "b"], &["knots"])).unwrap();
        character.deactivate();
        let text = ron::to_string(&character).unwrap();
        let restored: Character = ron::from_str(&text).unwrap();
        assert_eq!(restored, character);
        assert!(!restored.is_active());

        let mut lonely = character.clone();
        lonely.quirks.truncate(1);
        let text = ron::to_string(&lonely).unwrap();
        assert!(ron::from_str::<Character>(&text).is_err());

        let mut doubled = character;
        doubled.useless_bits.push(DefId::new("a"));
        let text = ron::to_string(&doubled).unwrap();
        assert!(ron::from_str::<Character>(&text).is_err());
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" m ".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!(
            "dragon".parse::<Sex>(),
            Err(Error::InvalidSex("dragon".to_string()))
        );
    }
}
