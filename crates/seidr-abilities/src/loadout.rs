//! Persisted loadout shape.
//!
//! Saves record only `(name, level)` per occupied slot. Charge counts and
//! regeneration timers are deliberately not persisted; a restored loadout
//! comes back with full charges and nothing scheduled.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::library::AbilityLibrary;
use crate::manager::{AbilityManager, SLOT_COUNT};

/// Errors that can occur while restoring a loadout.
#[derive(Debug, Clone, Error)]
pub enum LoadoutError {
    /// The save references an ability the library does not know.
    #[error("unknown ability in save: {0}")]
    UnknownAbility(String),

    /// The save payload could not be parsed.
    #[error("corrupted loadout payload: {0}")]
    Corrupted(String),
}

/// One saved slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAbility {
    /// Ability name (the library key).
    pub name: String,
    /// Saved level.
    pub level: u32,
}

/// The persisted shape of a player's equipped abilities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedLoadout {
    /// Per-slot entries; `None` for empty slots.
    pub slots: Vec<Option<SavedAbility>>,
}

impl SavedLoadout {
    /// Captures the current loadout from a manager.
    #[must_use]
    pub fn capture(manager: &AbilityManager) -> Self {
        let slots = (0..SLOT_COUNT)
            .map(|slot| {
                manager.ability_name(slot).map(|name| SavedAbility {
                    name: name.to_string(),
                    level: manager.ability_level(slot).unwrap_or(1),
                })
            })
            .collect();
        Self { slots }
    }

    /// Restores this loadout into a manager, equipping each saved ability
    /// at its saved level with full charges. Returns how many slots were
    /// filled.
    pub fn restore(
        &self,
        manager: &mut AbilityManager,
        library: &AbilityLibrary,
    ) -> Result<usize, LoadoutError> {
        let mut restored = 0;
        for (slot, saved) in self.slots.iter().take(SLOT_COUNT).enumerate() {
            match saved {
                Some(saved) => {
                    let ability = library
                        .get(&saved.name)
                        .ok_or_else(|| LoadoutError::UnknownAbility(saved.name.clone()))?;
                    manager.equip_at_level(ability.clone(), slot, saved.level);
                    restored += 1;
                },
                None => {
                    manager.unequip(slot);
                },
            }
        }
        info!(restored, "loadout restored");
        Ok(restored)
    }

    /// Serializes to the JSON save payload.
    pub fn to_json(&self) -> Result<String, LoadoutError> {
        serde_json::to_string(self).map_err(|e| LoadoutError::Corrupted(e.to_string()))
    }

    /// Deserializes from the JSON save payload.
    pub fn from_json(payload: &str) -> Result<Self, LoadoutError> {
        serde_json::from_str(payload).map_err(|e| LoadoutError::Corrupted(e.to_string()))
    }
}
