//! Ability registry and data loading.
//!
//! This module provides:
//! - The built-in ability roster, authored as code matrices
//! - Loading ability tables from `assets/abilities/*.toml`
//! - Table validation on load
//! - A registry with lookup by name and rarity

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::abilities::{
    Ability, AbilityKind, Dash, FrostNova, HammerSlam, HammerThrow, Mend, TimeFreeze,
};
use crate::definition::{AbilityDefinition, AbilityRarity, ActivationMode, LevelPatch, LEVEL_COUNT};

/// Default asset path for ability tables.
pub const DEFAULT_ABILITY_PATH: &str = "assets/abilities";

/// Errors that can occur during ability loading.
#[derive(Debug, Error)]
pub enum AbilityLoadError {
    /// File not found.
    #[error("Ability file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read ability file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse ability TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error.
    #[error("Ability validation error: {0}")]
    ValidationError(String),

    /// Duplicate ability name.
    #[error("Duplicate ability name: {0}")]
    DuplicateName(String),

    /// Behaviour key with no matching variant.
    #[error("Unknown ability behaviour: {0}")]
    UnknownBehavior(String),
}

/// Result type for ability loading operations.
pub type AbilityLoadResult<T> = Result<T, AbilityLoadError>;

/// An ability table as authored in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityTable {
    /// Unique display name.
    pub name: String,
    /// Behaviour key (e.g. `"hammer_slam"`).
    pub behavior: String,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
    /// Rarity tier.
    #[serde(default)]
    pub rarity: AbilityRarity,
    /// Activation mode.
    #[serde(default)]
    pub activation_mode: ActivationMode,
    /// Maximum aim distance; 0 disables clamping.
    #[serde(default)]
    pub max_targeting_range: f32,
    /// Custom aim cursor asset key.
    #[serde(default)]
    pub targeting_cursor: Option<String>,
    /// Per-level patches, applied in order from level 1.
    pub levels: Vec<LevelPatch>,
}

impl AbilityTable {
    /// Validates the table.
    pub fn validate(&self) -> AbilityLoadResult<()> {
        if self.name.is_empty() {
            return Err(AbilityLoadError::ValidationError(
                "ability has empty name".to_string(),
            ));
        }

        if self.levels.is_empty() || self.levels.len() > LEVEL_COUNT {
            return Err(AbilityLoadError::ValidationError(format!(
                "ability {} supplies {} levels (expected 1-{LEVEL_COUNT})",
                self.name,
                self.levels.len()
            )));
        }

        if self.max_targeting_range < 0.0 {
            return Err(AbilityLoadError::ValidationError(format!(
                "ability {} has negative targeting range",
                self.name
            )));
        }

        if self.levels.first().map_or(false, |l| l.max_charges == 0) {
            return Err(AbilityLoadError::ValidationError(format!(
                "ability {} starts with zero max charges",
                self.name
            )));
        }

        Ok(())
    }

    /// Builds the full ability from this table.
    pub fn build(&self) -> AbilityLoadResult<Ability> {
        self.validate()?;

        let kind = behavior_for_key(&self.behavior)
            .ok_or_else(|| AbilityLoadError::UnknownBehavior(self.behavior.clone()))?;

        let mut definition = AbilityDefinition::new(self.name.clone(), self.activation_mode)
            .with_description(self.description.clone())
            .with_rarity(self.rarity)
            .with_targeting_range(self.max_targeting_range);
        if let Some(cursor) = &self.targeting_cursor {
            definition = definition.with_targeting_cursor(cursor.clone());
        }
        for (index, patch) in self.levels.iter().enumerate() {
            definition.set_level_data(index as u32 + 1, *patch);
        }
        // Levels the file leaves off inherit the last authored one.
        for level in self.levels.len()..LEVEL_COUNT {
            definition.set_level_data(level as u32 + 1, LevelPatch::NONE);
        }

        Ok(Ability::new(definition, kind))
    }
}

/// Maps a behaviour key to its default-configured variant.
fn behavior_for_key(key: &str) -> Option<AbilityKind> {
    match key {
        "hammer_slam" => Some(AbilityKind::HammerSlam(HammerSlam::default())),
        "dash" => Some(AbilityKind::Dash(Dash::default())),
        "hammer_throw" => Some(AbilityKind::HammerThrow(HammerThrow::default())),
        "frost_nova" => Some(AbilityKind::FrostNova(FrostNova::default())),
        "time_freeze" => Some(AbilityKind::TimeFreeze(TimeFreeze::default())),
        "mend" => Some(AbilityKind::Mend(Mend::default())),
        _ => None,
    }
}

/// A collection of ability tables from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Tables in this file.
    pub abilities: Vec<AbilityTable>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Ability registry with lookup by name and rarity.
#[derive(Debug, Default)]
pub struct AbilityLibrary {
    by_name: HashMap<String, Ability>,
}

impl AbilityLibrary {
    /// Creates a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a library holding the built-in roster.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        for ability in builtin_roster() {
            // Builtin names are distinct; registration cannot collide.
            if let Err(error) = library.register(ability) {
                warn!(%error, "builtin registration skipped");
            }
        }
        library
    }

    /// Returns the number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registers an ability.
    pub fn register(&mut self, ability: Ability) -> AbilityLoadResult<()> {
        let key = ability.name().to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(AbilityLoadError::DuplicateName(ability.name().to_string()));
        }
        self.by_name.insert(key, ability);
        Ok(())
    }

    /// Gets an ability by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Ability> {
        self.by_name.get(&name.to_lowercase())
    }

    /// All abilities of a rarity tier.
    #[must_use]
    pub fn by_rarity(&self, rarity: AbilityRarity) -> Vec<&Ability> {
        self.by_name
            .values()
            .filter(|a| a.definition.rarity == rarity)
            .collect()
    }

    /// Iterates over all registered abilities.
    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.by_name.values()
    }

    /// Loads ability tables from a TOML string. Returns how many were
    /// registered.
    pub fn load_str(&mut self, content: &str) -> AbilityLoadResult<usize> {
        let file: AbilityFile = toml::from_str(content)?;
        let mut count = 0;
        for table in &file.abilities {
            self.register(table.build()?)?;
            count += 1;
        }
        Ok(count)
    }

    /// Loads one ability file.
    pub fn load_file(&mut self, path: &Path) -> AbilityLoadResult<usize> {
        if !path.exists() {
            return Err(AbilityLoadError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let count = self.load_str(&content)?;
        info!(path = %path.display(), count, "ability file loaded");
        Ok(count)
    }

    /// Loads every `*.toml` file in a directory. Returns how many
    /// abilities were registered.
    pub fn load_dir(&mut self, dir: &Path) -> AbilityLoadResult<usize> {
        if !dir.is_dir() {
            return Err(AbilityLoadError::NotFound(dir.to_path_buf()));
        }

        let mut count = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                count += self.load_file(&path)?;
            }
        }
        Ok(count)
    }
}

/// The built-in ability roster with its authored level matrices.
#[must_use]
pub fn builtin_roster() -> Vec<Ability> {
    vec![
        hammer_slam(),
        dash(),
        hammer_throw(),
        frost_nova(),
        time_freeze(),
        mend(),
    ]
}

/// Hammer Slam: radial damage, stun and knockback around the caster.
#[must_use]
pub fn hammer_slam() -> Ability {
    // Stat mapping: damage = center damage, duration = center stun,
    // speed = knockback speed, distance = center knockback,
    // special1 = edge knockback, special2 = edge damage,
    // special3 = damage variation.
    let definition = AbilityDefinition::new("Hammer Slam", ActivationMode::Instant)
        .with_description(
            "Slam a massive hammer into the ground, dealing heavy damage to nearby \
             enemies and knocking them back with devastating force.",
        )
        .with_rarity(AbilityRarity::Rare)
        .with_level(1, patch(10.0, 4.0, 1.0, 3.5, 11.0, 3.0, 1.25, 2.0, 0.5, 1, 10.0))
        .with_level(2, patch(9.0, 6.0, 1.2, 4.0, 13.0, 4.0, 1.75, 4.0, 0.5, 1, 9.0))
        .with_level(3, patch(8.0, 9.0, 1.5, 4.5, 15.0, 5.0, 2.25, 6.0, 0.7, 2, 8.0))
        .with_level(4, patch(7.0, 12.0, 1.8, 5.0, 18.0, 5.5, 2.75, 9.0, 0.8, 2, 7.0))
        .with_level(5, patch(6.0, 15.0, 2.0, 5.5, 20.0, 6.0, 3.25, 12.0, 1.0, 3, 6.0));
    Ability::new(definition, AbilityKind::HammerSlam(HammerSlam::default()))
}

/// Dash: aimed burst of movement with brief invulnerability frames
/// handled by the caster collaborator.
#[must_use]
pub fn dash() -> Ability {
    // Stat mapping: speed = dash speed, distance = dash length,
    // special1 = recovery hold.
    let definition = AbilityDefinition::new("Dash", ActivationMode::ClickToTarget)
        .with_description("Dash quickly in a target direction.")
        .with_rarity(AbilityRarity::Common)
        .with_targeting_line([0.0, 1.0, 1.0, 1.0])
        .with_targeting_range(3.0)
        .with_level(
            1,
            LevelPatch {
                cooldown: 4.0,
                speed: 15.0,
                distance: 3.0,
                special1: 0.1,
                max_charges: 1,
                charge_regen_time: 2.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            2,
            LevelPatch {
                cooldown: 3.25,
                speed: 16.0,
                distance: 4.5,
                special1: 0.15,
                max_charges: 2,
                charge_regen_time: 1.5,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            3,
            LevelPatch {
                cooldown: 2.5,
                speed: 17.0,
                distance: 5.25,
                special1: 0.2,
                max_charges: 2,
                charge_regen_time: 1.2,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            4,
            LevelPatch {
                cooldown: 1.75,
                speed: 18.0,
                distance: 6.5,
                special1: 0.25,
                max_charges: 3,
                charge_regen_time: 1.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            5,
            LevelPatch {
                cooldown: 1.5,
                speed: 20.0,
                distance: 7.5,
                special1: 0.3,
                max_charges: 4,
                charge_regen_time: 0.8,
                ..LevelPatch::NONE
            },
        );
    Ability::new(definition, AbilityKind::Dash(Dash::default()))
}

/// Hammer Throw: aimed returning projectile.
#[must_use]
pub fn hammer_throw() -> Ability {
    // Stat mapping: special1 = spin multiplier.
    let definition = AbilityDefinition::new("Hammer Throw", ActivationMode::ClickToTarget)
        .with_description("Throw a spinning hammer that deals damage and returns to you.")
        .with_rarity(AbilityRarity::Uncommon)
        .with_targeting_line([1.0, 0.0, 0.0, 1.0])
        .with_targeting_range(6.0)
        .with_level(1, patch(5.0, 4.0, 0.0, 0.0, 8.0, 6.0, 1.0, 0.0, 0.0, 1, 4.0))
        .with_level(2, patch(4.25, 7.5, 0.0, 0.0, 9.0, 7.0, 1.2, 0.0, 0.0, 1, 3.5))
        .with_level(3, patch(3.5, 10.0, 0.0, 0.0, 10.0, 8.0, 1.4, 0.0, 0.0, 2, 3.0))
        .with_level(4, patch(2.75, 12.5, 0.0, 0.0, 11.0, 9.0, 1.6, 0.0, 0.0, 2, 2.5))
        .with_level(5, patch(2.0, 14.0, 0.0, 0.0, 12.0, 10.0, 1.8, 0.0, 0.0, 3, 2.0));
    Ability::new(definition, AbilityKind::HammerThrow(HammerThrow::default()))
}

/// Frost Nova: radial freeze with no damage.
#[must_use]
pub fn frost_nova() -> Ability {
    // Stat mapping: duration = freeze length, special1 = visual scale.
    let definition = AbilityDefinition::new("Frost Nova", ActivationMode::Instant)
        .with_description("Freeze nearby enemies in place.")
        .with_rarity(AbilityRarity::Uncommon)
        .with_level(1, patch(12.0, 0.0, 2.0, 2.5, 0.0, 0.0, 1.0, 0.0, 0.0, 1, 12.0))
        .with_level(2, patch(11.0, 0.0, 2.5, 3.0, 0.0, 0.0, 1.2, 0.0, 0.0, 1, 11.0))
        .with_level(3, patch(10.0, 0.0, 3.0, 3.5, 0.0, 0.0, 1.4, 0.0, 0.0, 1, 10.0))
        .with_level(4, patch(8.0, 0.0, 3.5, 4.0, 0.0, 0.0, 1.6, 0.0, 0.0, 2, 8.0))
        .with_level(5, patch(6.0, 0.0, 4.0, 4.5, 0.0, 0.0, 1.8, 0.0, 0.0, 2, 6.0));
    Ability::new(definition, AbilityKind::FrostNova(FrostNova::default()))
}

/// Time Freeze: global slow-time effect.
#[must_use]
pub fn time_freeze() -> Ability {
    // Stat mapping: duration = effect length, special1 = camera pull-back
    // (collaborator data), special2 = recharge recovery factor.
    let definition = AbilityDefinition::new("Time Freeze", ActivationMode::Instant)
        .with_description(
            "Drastically slow down time for all enemies and projectiles while you move freely.",
        )
        .with_rarity(AbilityRarity::Legendary)
        .with_level(
            1,
            LevelPatch {
                cooldown: 15.0,
                duration: 3.0,
                special1: 5.8,
                special2: 0.1,
                max_charges: 1,
                charge_regen_time: 15.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            2,
            LevelPatch {
                cooldown: 12.0,
                duration: 4.0,
                special1: 6.0,
                special2: 0.3,
                max_charges: 1,
                charge_regen_time: 12.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            3,
            LevelPatch {
                cooldown: 10.0,
                duration: 5.0,
                special1: 6.2,
                special2: 0.5,
                max_charges: 1,
                charge_regen_time: 10.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            4,
            LevelPatch {
                cooldown: 8.0,
                duration: 6.0,
                special1: 6.4,
                special2: 0.7,
                max_charges: 2,
                charge_regen_time: 8.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            5,
            LevelPatch {
                cooldown: 6.0,
                duration: 7.0,
                special1: 6.6,
                special2: 0.8,
                max_charges: 3,
                charge_regen_time: 10.0,
                ..LevelPatch::NONE
            },
        );
    Ability::new(definition, AbilityKind::TimeFreeze(TimeFreeze::default()))
}

/// Mend: immediate self-heal.
#[must_use]
pub fn mend() -> Ability {
    // Stat mapping: damage = heal amount.
    let definition = AbilityDefinition::new("Mend", ActivationMode::Instant)
        .with_description("Restore a burst of health.")
        .with_rarity(AbilityRarity::Common)
        .with_level(
            1,
            LevelPatch {
                cooldown: 15.0,
                damage: 20.0,
                max_charges: 1,
                charge_regen_time: 15.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            2,
            LevelPatch {
                cooldown: 14.0,
                damage: 30.0,
                charge_regen_time: 14.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            3,
            LevelPatch {
                cooldown: 12.0,
                damage: 45.0,
                charge_regen_time: 12.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            4,
            LevelPatch {
                cooldown: 10.0,
                damage: 65.0,
                max_charges: 2,
                charge_regen_time: 10.0,
                ..LevelPatch::NONE
            },
        )
        .with_level(
            5,
            LevelPatch {
                cooldown: 8.0,
                damage: 100.0,
                charge_regen_time: 8.0,
                ..LevelPatch::NONE
            },
        );
    Ability::new(definition, AbilityKind::Mend(Mend::default()))
}

/// Full-matrix level patch, in the authored column order.
#[allow(clippy::too_many_arguments)]
const fn patch(
    cooldown: f32,
    damage: f32,
    duration: f32,
    radius: f32,
    speed: f32,
    distance: f32,
    special1: f32,
    special2: f32,
    special3: f32,
    max_charges: i32,
    charge_regen_time: f32,
) -> LevelPatch {
    LevelPatch {
        cooldown,
        damage,
        duration,
        radius,
        speed,
        distance,
        special1,
        special2,
        special3,
        max_charges,
        charge_regen_time,
    }
}
