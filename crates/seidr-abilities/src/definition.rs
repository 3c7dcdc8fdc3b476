//! Ability definitions and per-level stat tables.
//!
//! A definition is authored once (in code or from an asset file) and is
//! read-only afterwards. Levels are built by copying the previous level and
//! overwriting only the fields that are explicitly supplied, so progression
//! tables never have to restate every stat at every level.

use serde::{Deserialize, Serialize};

/// Number of levels every ability table holds.
pub const LEVEL_COUNT: usize = 5;

/// How an ability is triggered from its slot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Fires immediately on key press.
    Instant,
    /// Key press enters an aim session; a confirm click fires.
    ClickToTarget,
}

impl Default for ActivationMode {
    fn default() -> Self {
        Self::Instant
    }
}

/// Rarity tier used by selection screens to weight offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityRarity {
    /// Baseline drop weight.
    Common,
    /// Slightly rarer than common.
    Uncommon,
    /// Mid-tier.
    Rare,
    /// High-tier.
    Epic,
    /// Top-tier.
    Legendary,
}

impl Default for AbilityRarity {
    fn default() -> Self {
        Self::Common
    }
}

/// Stats for one level of an ability.
///
/// The three `special` values are generic per-ability knobs; each concrete
/// ability documents its own mapping (e.g. Hammer Slam reads `special1` as
/// minimum knockback distance and `special2` as minimum damage).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    /// Display cooldown in seconds.
    pub cooldown: f32,
    /// Primary damage value (or heal amount for support abilities).
    pub damage: f32,
    /// Effect duration in seconds.
    pub duration: f32,
    /// Effect radius in world units.
    pub radius: f32,
    /// Movement or projectile speed in units per second.
    pub speed: f32,
    /// Travel or knockback distance in world units.
    pub distance: f32,
    /// Ability-specific value 1.
    pub special1: f32,
    /// Ability-specific value 2.
    pub special2: f32,
    /// Ability-specific value 3.
    pub special3: f32,
    /// Maximum charges held at this level.
    pub max_charges: u32,
    /// Seconds to regenerate one charge.
    pub charge_regen_time: f32,
}

impl Default for LevelStats {
    fn default() -> Self {
        Self {
            cooldown: 5.0,
            damage: 0.0,
            duration: 0.0,
            radius: 0.0,
            speed: 0.0,
            distance: 0.0,
            special1: 0.0,
            special2: 0.0,
            special3: 0.0,
            max_charges: 1,
            charge_regen_time: 1.0,
        }
    }
}

/// Per-level overrides applied on top of the previous level's stats.
///
/// A negative value means "inherit from the previous level". This sentinel
/// is a deliberate modeling choice carried from the original tables: it
/// keeps authoring terse, at the cost of ruling out legitimately negative
/// stat values. Fields that must go negative cannot use the patch path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPatch {
    /// Cooldown override, negative to inherit.
    pub cooldown: f32,
    /// Damage override, negative to inherit.
    pub damage: f32,
    /// Duration override, negative to inherit.
    pub duration: f32,
    /// Radius override, negative to inherit.
    pub radius: f32,
    /// Speed override, negative to inherit.
    pub speed: f32,
    /// Distance override, negative to inherit.
    pub distance: f32,
    /// Special value 1 override, negative to inherit.
    pub special1: f32,
    /// Special value 2 override, negative to inherit.
    pub special2: f32,
    /// Special value 3 override, negative to inherit.
    pub special3: f32,
    /// Max charges override, negative to inherit.
    pub max_charges: i32,
    /// Charge regen time override, negative to inherit.
    pub charge_regen_time: f32,
}

impl LevelPatch {
    /// Patch that overrides nothing.
    pub const NONE: Self = Self {
        cooldown: -1.0,
        damage: -1.0,
        duration: -1.0,
        radius: -1.0,
        speed: -1.0,
        distance: -1.0,
        special1: -1.0,
        special2: -1.0,
        special3: -1.0,
        max_charges: -1,
        charge_regen_time: -1.0,
    };

    /// Applies the supplied (non-negative) fields onto `stats`.
    fn apply_to(&self, stats: &mut LevelStats) {
        if self.cooldown >= 0.0 {
            stats.cooldown = self.cooldown;
        }
        if self.damage >= 0.0 {
            stats.damage = self.damage;
        }
        if self.duration >= 0.0 {
            stats.duration = self.duration;
        }
        if self.radius >= 0.0 {
            stats.radius = self.radius;
        }
        if self.speed >= 0.0 {
            stats.speed = self.speed;
        }
        if self.distance >= 0.0 {
            stats.distance = self.distance;
        }
        if self.special1 >= 0.0 {
            stats.special1 = self.special1;
        }
        if self.special2 >= 0.0 {
            stats.special2 = self.special2;
        }
        if self.special3 >= 0.0 {
            stats.special3 = self.special3;
        }
        if self.max_charges >= 0 {
            stats.max_charges = self.max_charges as u32;
        }
        if self.charge_regen_time >= 0.0 {
            stats.charge_regen_time = self.charge_regen_time;
        }
    }
}

impl Default for LevelPatch {
    fn default() -> Self {
        Self::NONE
    }
}

/// RGBA colour handed to targeting-line collaborators.
pub type LineColor = [f32; 4];

/// Immutable per-ability data: identity, activation behaviour, targeting
/// configuration and the 5-entry level table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Unique display name, also the save-file key.
    pub name: String,
    /// Flavour text for selection screens.
    pub description: String,
    /// Selection-weighting tier.
    pub rarity: AbilityRarity,
    /// How slot input triggers this ability.
    pub activation_mode: ActivationMode,
    /// Maximum aim distance; 0 disables clamping.
    pub max_targeting_range: f32,
    /// Whether collaborators should draw an aim line while targeting.
    pub show_targeting_line: bool,
    /// Aim line colour.
    pub targeting_line_color: LineColor,
    /// Asset key of a custom aim cursor, if any.
    pub targeting_cursor: Option<String>,
    /// Stats for levels 1 through [`LEVEL_COUNT`].
    levels: [LevelStats; LEVEL_COUNT],
}

impl AbilityDefinition {
    /// Creates a definition with default targeting config and a default
    /// stat table.
    #[must_use]
    pub fn new(name: impl Into<String>, activation_mode: ActivationMode) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            rarity: AbilityRarity::Common,
            activation_mode,
            max_targeting_range: 10.0,
            show_targeting_line: false,
            targeting_line_color: [1.0, 1.0, 1.0, 1.0],
            targeting_cursor: None,
            levels: [LevelStats::default(); LEVEL_COUNT],
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the rarity tier.
    #[must_use]
    pub fn with_rarity(mut self, rarity: AbilityRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Sets the maximum targeting range (0 disables clamping).
    #[must_use]
    pub fn with_targeting_range(mut self, range: f32) -> Self {
        self.max_targeting_range = range;
        self
    }

    /// Enables the aim line with the given colour.
    #[must_use]
    pub fn with_targeting_line(mut self, color: LineColor) -> Self {
        self.show_targeting_line = true;
        self.targeting_line_color = color;
        self
    }

    /// Sets a custom aim cursor asset key.
    #[must_use]
    pub fn with_targeting_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.targeting_cursor = Some(cursor.into());
        self
    }

    /// Builds one level of the stat table.
    ///
    /// `level` is clamped to `[1, LEVEL_COUNT]`. Level 1 starts from the
    /// stat defaults; higher levels copy the previous level and then apply
    /// only the patch fields supplied with non-negative values, so tables
    /// compose monotonically without restating every stat.
    #[must_use]
    pub fn with_level(mut self, level: u32, patch: LevelPatch) -> Self {
        self.set_level_data(level, patch);
        self
    }

    /// In-place form of [`Self::with_level`].
    pub fn set_level_data(&mut self, level: u32, patch: LevelPatch) {
        let index = (level.clamp(1, LEVEL_COUNT as u32) - 1) as usize;

        let mut stats = if index > 0 {
            self.levels[index - 1]
        } else {
            LevelStats::default()
        };
        patch.apply_to(&mut stats);
        self.levels[index] = stats;
    }

    /// Stats for a level, clamping out-of-range requests to the nearest
    /// valid level. Never an error.
    #[must_use]
    pub fn stats_for_level(&self, level: u32) -> &LevelStats {
        let index = (level.clamp(1, LEVEL_COUNT as u32) - 1) as usize;
        &self.levels[index]
    }

    /// Highest level the table holds.
    #[must_use]
    pub const fn max_level(&self) -> u32 {
        LEVEL_COUNT as u32
    }
}
