//! Character issuance
//!
//! Issuance is a pure function of `(account_ref, sex, seed)` and the content
//! library. The same inputs always produce the same character, id included.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use mishap_content::ContentLibrary;
use mishap_core::{
    AttributeSet, Character, CharacterId, CharacterParts, DefId, GameRng, Reputation,
    SeedMaterial, Sex, MAX_QUIRKS, MIN_QUIRKS,
};
use tracing::{debug, instrument};

const HIGH_ATTRIBUTE: (i32, i32) = (8, 10);
const ORDINARY_ATTRIBUTE: (i32, i32) = (1, 6);
const LOW_ATTRIBUTE: (i32, i32) = (1, 3);
/// Smallest max-min an issued attribute set may have
const MIN_ATTRIBUTE_SPREAD: i32 = 4;

const MAX_FAILINGS: usize = 2;
const MIN_USELESS_BITS: usize = 1;
const MAX_USELESS_BITS: usize = 2;

/// Issues characters from a content library
pub struct Issuer<'a> {
    library: &'a ContentLibrary,
}

impl<'a> Issuer<'a> {
    pub fn new(library: &'a ContentLibrary) -> Self {
        Self { library }
    }

    /// Issue a character, stamping it with the current time
    pub fn issue(&self, account_ref: &str, sex: &str, seed: &str) -> Result<Character> {
        self.issue_at(account_ref, sex, seed, Utc::now())
    }

    /// Issue a character with an explicit creation time
    #[instrument(skip(self, created_at))]
    pub fn issue_at(
        &self,
        account_ref: &str,
        sex: &str,
        seed: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Character> {
        let sex: Sex = sex
            .parse()
            .map_err(|_| Error::InvalidSex(sex.to_string()))?;

        let mut rng = GameRng::new(
            SeedMaterial::new("issue")
                .with_str(account_ref)
                .with_str(sex.as_str())
                .with_str(seed)
                .finish(),
        );
        let id = CharacterId(
            SeedMaterial::new("character")
                .with_str(account_ref)
                .with_str(sex.as_str())
                .with_str(seed)
                .finish(),
        );

        let attributes = roll_attributes(&mut rng)?;

        let quirk_pool: Vec<(&DefId, f64)> = self
            .library
            .quirks()
            .map(|q| (&q.id, q.rarity_weight))
            .collect();
        if quirk_pool.len() < MIN_QUIRKS {
            return Err(Error::ContentLibrary(format!(
                "need at least {} quirks to issue a character, library has {}",
                MIN_QUIRKS,
                quirk_pool.len()
            )));
        }
        let quirk_count = rng.range_usize(MIN_QUIRKS, MAX_QUIRKS);
        let quirks = sample_distinct(&mut rng, quirk_pool, quirk_count);

        let failing_pool: Vec<(&DefId, f64)> = self
            .library
            .failings()
            .map(|f| (&f.id, f.rarity_weight))
            .collect();
        let failing_count = rng.range_usize(0, MAX_FAILINGS);
        let failings = sample_distinct(&mut rng, failing_pool, failing_count);

        let bit_pool: Vec<(&DefId, f64)> = self
            .library
            .useless_bits()
            .map(|b| (&b.id, b.rarity_weight))
            .collect();
        if bit_pool.is_empty() {
            return Err(Error::ContentLibrary(
                "library has no useless bits to issue".to_string(),
            ));
        }
        let bit_count = rng.range_usize(MIN_USELESS_BITS, MAX_USELESS_BITS);
        let useless_bits = sample_distinct(&mut rng, bit_pool, bit_count);

        let reputation = self.roll_reputation(&mut rng);

        let character = Character::new(CharacterParts {
            id,
            account_ref: account_ref.to_string(),
            sex,
            attributes,
            quirks,
            failings,
            useless_bits,
            reputation,
            issued_seed: seed.to_string(),
            created_at,
        })?;

        debug!(
            character = %character.id(),
            quirks = character.quirks().len(),
            failings = character.failings().len(),
            useless_bits = character.useless_bits().len(),
            "issued character"
        );
        Ok(character)
    }

    fn roll_reputation(&self, rng: &mut GameRng) -> Reputation {
        let biases: Vec<_> = self.library.reputation_biases().collect();
        let weights: Vec<f64> = biases.iter().map(|b| b.weight).collect();
        rng.weighted_index(&weights)
            .map(|i| biases[i].to_reputation())
            .unwrap_or_default()
    }
}

/// One high attribute, one forced low, the rest ordinary, in shuffled order
fn roll_attributes(rng: &mut GameRng) -> Result<AttributeSet> {
    loop {
        let mut values = [0i32; 7];
        values[0] = rng.range_i32(HIGH_ATTRIBUTE.0, HIGH_ATTRIBUTE.1);
        values[1] = rng.range_i32(LOW_ATTRIBUTE.0, LOW_ATTRIBUTE.1);
        for value in values.iter_mut().skip(2) {
            *value = rng.range_i32(ORDINARY_ATTRIBUTE.0, ORDINARY_ATTRIBUTE.1);
        }
        rng.shuffle(&mut values);

        let attributes = AttributeSet::new(values)?;
        if attributes.spread() >= MIN_ATTRIBUTE_SPREAD {
            return Ok(attributes);
        }
    }
}

/// Weighted sampling without replacement
///
/// Returns fewer than `count` ids when the pool runs out.
fn sample_distinct(rng: &mut GameRng, mut pool: Vec<(&DefId, f64)>, count: usize) -> Vec<DefId> {
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let weights: Vec<f64> = pool.iter().map(|(_, w)| *w).collect();
        let Some(index) = rng.weighted_index(&weights) else {
            break;
        };
        let (id, _) = pool.swap_remove(index);
        picked.push(id.clone());
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use mishap_content::Loader;
    use mishap_core::{ATTRIBUTE_MAX, ATTRIBUTE_MIN};
    use std::collections::HashSet;

    fn library() -> ContentLibrary {
        Loader::builtin().unwrap()
    }

    #[test]
    fn test_issuance_is_deterministic() {
        let library = library();
        let issuer = Issuer::new(&library);
        let at = Utc::now();

        let a = issuer.issue_at("acct-1", "female", "seed_1", at).unwrap();
        let b = issuer.issue_at("acct-1", "female", "seed_1", at).unwrap();
        assert_eq!(a, b);

        let c = issuer.issue_at("acct-1", "female", "seed_2", at).unwrap();
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_attribute_bounds_and_spread() {
        let library = library();
        let issuer = Issuer::new(&library);

        for n in 0..200 {
            let character = issuer.issue("acct", "x", &format!("seed_{n}")).unwrap();
            let attributes = character.attributes();
            for (_, value) in attributes.iter() {
                assert!((ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value));
            }
            assert!(attributes.spread() >= MIN_ATTRIBUTE_SPREAD);
            assert!(attributes.iter().any(|(_, v)| v >= HIGH_ATTRIBUTE.0));
            assert!(attributes.iter().any(|(_, v)| v <= LOW_ATTRIBUTE.1));
        }
    }

    #[test]
    fn test_trait_counts_and_no_duplicates() {
        let library = library();
        let issuer = Issuer::new(&library);

        for n in 0..200 {
            let character = issuer.issue("acct", "male", &format!("seed_{n}")).unwrap();
            assert!((MIN_QUIRKS..=MAX_QUIRKS).contains(&character.quirks().len()));
            assert!(character.failings().len() <= MAX_FAILINGS);
            assert!((MIN_USELESS_BITS..=MAX_USELESS_BITS).contains(&character.useless_bits().len()));

            let all: Vec<_> = character
                .quirks()
                .iter()
                .chain(character.failings())
                .chain(character.useless_bits())
                .collect();
            let unique: HashSet<_> = all.iter().collect();
            assert_eq!(unique.len(), all.len());
            assert!(character.is_active());
        }
    }

    #[test]
    fn test_invalid_sex_rejected() {
        let library = library();
        let err = Issuer::new(&library).issue("acct", "teapot", "s").unwrap_err();
        assert_eq!(err.kind().code(), "INVALID_SEX");
    }

    #[test]
    fn test_reputation_comes_from_bias_table() {
        let library = library();
        let issuer = Issuer::new(&library);
        let scores: HashSet<i32> = library.reputation_biases().map(|b| b.score).collect();

        for n in 0..50 {
            let character = issuer.issue("acct", "f", &format!("seed_{n}")).unwrap();
            assert!(scores.contains(&character.reputation().score));
        }
    }

    #[test]
    fn test_sample_distinct_stops_when_pool_runs_out() {
        let a = DefId::new("a");
        let b = DefId::new("b");
        let mut rng = GameRng::new(7);

        let picked = sample_distinct(&mut rng, vec![(&a, 1.0), (&b, 2.0)], 4);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
    }
}
