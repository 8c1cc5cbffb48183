//! RON content loader and library validation

use crate::error::{Error, Result};
use crate::library::ContentLibrary;
use crate::schema::action::RawActionDef;
use crate::schema::environment::RawEnvironmentalQuirkDef;
use crate::schema::failing::RawFailingDef;
use crate::schema::item::RawItemQuirkDef;
use crate::schema::quirk::RawQuirkDef;
use crate::schema::useless_bit::RawUselessBitDef;
use crate::schema::{
    check_weight, ActionDef, ContentFile, EnvironmentalQuirkDef, FailingDef, ItemQuirkDef,
    ItemTypeDef, Named, QuirkDef, ReputationBias, UselessBitDef, Validated,
};
use mishap_core::{DefId, MIN_QUIRKS};
use ron::value::RawValue;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const BUILTIN_CONTENT: &str = include_str!("../content/core.ron");

/// A definition that was left out of the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: &'static str,
    pub id: String,
    pub reason: String,
}

/// What happened during a load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<Rejection>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Loader for RON content files
///
/// Malformed definitions are skipped with a warning and recorded in the
/// [`LoadReport`]; in strict mode the first one aborts the load instead.
pub struct Loader {
    library: ContentLibrary,
    report: LoadReport,
    strict: bool,
}

impl Loader {
    /// Create a new, lenient loader
    pub fn new() -> Self {
        Self {
            library: ContentLibrary::default(),
            report: LoadReport::default(),
            strict: false,
        }
    }

    /// Treat every malformed definition as fatal
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load the content shipped with the crate
    pub fn builtin() -> Result<ContentLibrary> {
        let mut loader = Loader::new().strict(true);
        loader.load_str(BUILTIN_CONTENT)?;
        let (library, _) = loader.finish()?;
        Ok(library)
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading content file");
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Load all `.ron` files in a directory, recursing into subdirectories
    ///
    /// Files are visited in name order so id collisions resolve the same way
    /// on every platform.
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut paths = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for file_path in paths {
            if file_path.is_dir() {
                self.load_directory(&file_path)?;
            } else if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            }
        }

        Ok(())
    }

    /// Load every section of a RON content string
    ///
    /// Only a file that is not RON at all, or whose sections are not lists,
    /// fails the whole load. Each definition inside a section is
    /// deserialized and validated on its own.
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: ContentFile = ron::from_str(content)?;

        self.section("quirk", &file.quirks, RawQuirkDef::validate, Self::add_quirk)?;
        self.section("failing", &file.failings, RawFailingDef::validate, Self::add_failing)?;
        self.section(
            "useless bit",
            &file.useless_bits,
            RawUselessBitDef::validate,
            Self::add_useless_bit,
        )?;
        self.section(
            "item quirk",
            &file.item_quirks,
            RawItemQuirkDef::validate,
            Self::add_item_quirk,
        )?;
        self.section("item type", &file.item_types, Ok, Self::add_item_type)?;
        self.section(
            "environmental quirk",
            &file.environmental_quirks,
            RawEnvironmentalQuirkDef::validate,
            Self::add_environmental_quirk,
        )?;
        self.section("action", &file.actions, RawActionDef::validate, Self::add_action)?;
        self.section(
            "reputation bias",
            &file.reputation_biases,
            |bias: ReputationBias| check_weight(bias.weight).map(|_| bias),
            Self::add_reputation_bias,
        )?;

        Ok(())
    }

    pub fn add_quirk(&mut self, def: QuirkDef) -> std::result::Result<(), String> {
        self.claim_trait_id(&def.id)?;
        self.library.quirks.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn add_failing(&mut self, def: FailingDef) -> std::result::Result<(), String> {
        self.claim_trait_id(&def.id)?;
        self.library.failings.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn add_useless_bit(&mut self, def: UselessBitDef) -> std::result::Result<(), String> {
        self.claim_trait_id(&def.id)?;
        if def.nets_positive() {
            warn!(id = %def.id, net = def.combined().net(), "useless bit nets positive");
        }
        self.library.useless_bits.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn add_item_quirk(&mut self, def: ItemQuirkDef) -> std::result::Result<(), String> {
        insert_unique(&mut self.library.item_quirks, def.id.clone(), def)
    }

    pub fn add_item_type(&mut self, def: ItemTypeDef) -> std::result::Result<(), String> {
        insert_unique(&mut self.library.item_types, def.id.clone(), def)
    }

    pub fn add_environmental_quirk(&mut self, def: EnvironmentalQuirkDef) -> std::result::Result<(), String> {
        insert_unique(&mut self.library.environmental_quirks, def.id.clone(), def)
    }

    pub fn add_action(&mut self, def: ActionDef) -> std::result::Result<(), String> {
        insert_unique(&mut self.library.actions, def.id.clone(), def)
    }

    pub fn add_reputation_bias(&mut self, def: ReputationBias) -> std::result::Result<(), String> {
        insert_unique(&mut self.library.reputation_biases, def.id.clone(), def)
    }

    /// Cross-check references and make sure the library can do its job
    pub fn finish(mut self) -> Result<(ContentLibrary, LoadReport)> {
        let item_quirks = &self.library.item_quirks;
        let dangling: Vec<(DefId, DefId)> = self
            .library
            .item_types
            .values()
            .flat_map(|t| {
                t.default_quirks
                    .iter()
                    .filter(move |q| !item_quirks.contains_key(*q))
                    .map(move |q| (t.id.clone(), q.clone()))
            })
            .collect();
        for (item_type, quirk) in dangling {
            self.library.item_types.shift_remove(&item_type);
            self.reject(
                "item type",
                item_type.to_string(),
                format!("unknown default item quirk '{}'", quirk),
            )?;
        }

        if self.library.quirks.len() < MIN_QUIRKS {
            return Err(Error::Unusable(format!(
                "need at least {} quirks to issue characters, found {}",
                MIN_QUIRKS,
                self.library.quirks.len()
            )));
        }
        if self.library.useless_bits.is_empty() {
            return Err(Error::Unusable("no useless bits defined".to_string()));
        }
        if self.library.actions.is_empty() {
            return Err(Error::Unusable("no actions defined".to_string()));
        }

        self.report.loaded = self.library.len();
        info!(
            loaded = self.report.loaded,
            rejected = self.report.rejected.len(),
            "content library ready"
        );
        Ok((self.library, self.report))
    }

    /// Get the current definitions (for inspection during loading)
    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    fn section<R, T>(
        &mut self,
        kind: &'static str,
        entries: &[Box<RawValue>],
        validate: impl Fn(R) -> Validated<T>,
        insert: fn(&mut Self, T) -> Validated<()>,
    ) -> Result<()>
    where
        R: DeserializeOwned,
    {
        for entry in entries {
            let id = entry
                .into_rust::<Named>()
                .map(|named| named.id.to_string())
                .unwrap_or_else(|_| "<unnamed>".to_string());
            let admitted = entry
                .into_rust::<R>()
                .map_err(|e| e.to_string())
                .and_then(&validate)
                .and_then(|def| insert(self, def));
            if let Err(reason) = admitted {
                self.reject(kind, id, reason)?;
            }
        }
        Ok(())
    }

    fn reject(&mut self, kind: &'static str, id: String, reason: String) -> Result<()> {
        warn!(kind, id = %id, reason = %reason, "rejecting malformed definition");
        if self.strict {
            return Err(Error::MalformedDefinition { kind, id, reason });
        }
        self.report.rejected.push(Rejection { kind, id, reason });
        Ok(())
    }

    fn claim_trait_id(&self, id: &DefId) -> Validated<()> {
        if self.library.is_trait_id(id) {
            Err(format!("duplicate trait id '{}'", id))
        } else {
            Ok(())
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_unique<T>(map: &mut indexmap::IndexMap<DefId, T>, id: DefId, def: T) -> Validated<()> {
    if map.contains_key(&id) {
        return Err(format!("duplicate id '{}'", id));
    }
    map.insert(id, def);
    Ok(())
}
