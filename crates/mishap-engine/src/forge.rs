//! Item forging

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use mishap_content::ContentLibrary;
use mishap_core::{Character, DefId, Item, ItemId, MakerProfile};
use tracing::{debug, instrument};

/// Forges items, freezing a snapshot of their maker
pub struct Forge<'a> {
    library: &'a ContentLibrary,
}

impl<'a> Forge<'a> {
    pub fn new(library: &'a ContentLibrary) -> Self {
        Self { library }
    }

    /// Forge an item
    ///
    /// Quirks are the item type's defaults followed by `custom_quirks`, in
    /// first-seen order without repeats. An item type the library does not
    /// know simply has no defaults. Deactivated creators may still forge.
    #[instrument(skip(self, creator, created_at), fields(creator = %creator.id()))]
    pub fn create(
        &self,
        id: ItemId,
        item_type: &DefId,
        creator: &Character,
        custom_quirks: &[DefId],
        created_at: DateTime<Utc>,
    ) -> Result<Item> {
        if let Some(unknown) = custom_quirks
            .iter()
            .find(|q| self.library.item_quirk(q).is_none())
        {
            return Err(Error::UnknownItemQuirk(unknown.clone()));
        }

        let defaults = self
            .library
            .item_type(item_type)
            .map(|t| t.default_quirks.as_slice())
            .unwrap_or_default();

        let mut quirks: Vec<DefId> = Vec::with_capacity(defaults.len() + custom_quirks.len());
        for quirk in defaults.iter().chain(custom_quirks) {
            if !quirks.contains(quirk) {
                quirks.push(quirk.clone());
            }
        }

        let item = Item {
            id,
            item_type: item_type.clone(),
            creator: creator.id(),
            maker_profile: MakerProfile::capture(creator, created_at),
            quirks,
            created_at,
        };
        debug!(item = %item.id, quirks = item.quirks.len(), "forged item");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::Issuer;
    use mishap_content::Loader;
    use mishap_core::Reputation;

    fn setup() -> (ContentLibrary, Character) {
        let library = Loader::builtin().unwrap();
        let character = Issuer::new(&library).issue("acct", "f", "maker").unwrap();
        (library, character)
    }

    #[test]
    fn test_defaults_then_custom_without_repeats() {
        let (library, maker) = setup();
        let forge = Forge::new(&library);

        let item = forge
            .create(
                ItemId(1),
                &DefId::new("fishing_rod"),
                &maker,
                &[DefId::new("loud_hinge"), DefId::new("springy_rod")],
                Utc::now(),
            )
            .unwrap();

        assert_eq!(
            item.quirks,
            vec![DefId::new("springy_rod"), DefId::new("loud_hinge")]
        );
        assert_eq!(item.creator, maker.id());
    }

    #[test]
    fn test_unknown_custom_quirk_rejected() {
        let (library, maker) = setup();
        let err = Forge::new(&library)
            .create(
                ItemId(1),
                &DefId::new("lantern"),
                &maker,
                &[DefId::new("glows_ominously")],
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err.kind().code(), "UNKNOWN_ITEM_QUIRK");
    }

    #[test]
    fn test_unknown_type_is_a_baseline() {
        let (library, maker) = setup();
        let item = Forge::new(&library)
            .create(ItemId(2), &DefId::new("teaspoon"), &maker, &[], Utc::now())
            .unwrap();
        assert!(item.is_baseline());
    }

    #[test]
    fn test_maker_profile_is_frozen() {
        let (library, mut maker) = setup();
        let item = Forge::new(&library)
            .create(ItemId(3), &DefId::new("lockpick"), &maker, &[], Utc::now())
            .unwrap();
        let snapshot = item.maker_profile.clone();

        maker.update_reputation(Reputation::new(9, "famous now"));
        maker.deactivate();

        assert_eq!(item.maker_profile, snapshot);
        assert_eq!(item.maker_profile.attributes, *maker.attributes());
        assert_eq!(item.maker_profile.quirks, maker.quirks());

        // a deactivated maker can still forge
        assert!(Forge::new(&library)
            .create(ItemId(4), &DefId::new("lantern"), &maker, &[], Utc::now())
            .is_ok());
    }
}
