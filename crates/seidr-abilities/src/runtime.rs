//! Per-slot mutable ability state.
//!
//! This module provides the runtime side of an equipped ability:
//! - Current level and level-up rules
//! - The charge economy with deadline-based, one-at-a-time regeneration
//! - Duplicate-ownership stacking and the derived stat multipliers
//!
//! Two similarly-flavoured counters live here and are deliberately kept
//! apart: `charges` is the consumable per-use resource, `owned_copies` is
//! how many duplicate grants of the ability the player holds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::{AbilityDefinition, LevelStats};

/// Damage gained per duplicate copy beyond the first.
const DAMAGE_PER_EXTRA_COPY: f32 = 0.5;
/// Cooldown reduction per duplicate copy beyond the first.
const COOLDOWN_REDUCTION_PER_EXTRA_COPY: f32 = 0.1;
/// Cooldown can never drop below this fraction of the base value.
const COOLDOWN_FLOOR: f32 = 0.2;

/// Mutable state for one equipped ability instance.
///
/// Each equip slot owns its own runtime; two slots holding the same
/// definition regenerate and level independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRuntime {
    /// Current level, 1-based.
    level: u32,
    /// Charges currently available.
    charges: u32,
    /// Clock value at which the next charge regenerates. Only meaningful
    /// while below max charges; never scheduled at max.
    regen_deadline: Option<f64>,
    /// Duplicate grants held, at least 1.
    owned_copies: u32,
}

impl AbilityRuntime {
    /// Creates runtime state for a freshly equipped ability: level 1, full
    /// charges, no regeneration pending.
    #[must_use]
    pub fn new(definition: &AbilityDefinition) -> Self {
        Self::at_level(definition, 1)
    }

    /// Creates runtime state restored from a saved `(name, level)` pair.
    /// Charges reset to full; regen timers are not persisted.
    #[must_use]
    pub fn at_level(definition: &AbilityDefinition, level: u32) -> Self {
        let level = level.clamp(1, definition.max_level());
        Self {
            level,
            charges: definition.stats_for_level(level).max_charges,
            regen_deadline: None,
            owned_copies: 1,
        }
    }

    /// Current level, 1-based.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Charges currently available.
    #[must_use]
    pub const fn charges(&self) -> u32 {
        self.charges
    }

    /// Duplicate grants held.
    #[must_use]
    pub const fn owned_copies(&self) -> u32 {
        self.owned_copies
    }

    /// Stats for the current level.
    #[must_use]
    pub fn current_stats<'a>(&self, definition: &'a AbilityDefinition) -> &'a LevelStats {
        definition.stats_for_level(self.level)
    }

    /// Whether another level exists in the table.
    #[must_use]
    pub fn can_level_up(&self, definition: &AbilityDefinition) -> bool {
        self.level < definition.max_level()
    }

    /// Advances one level if possible, returning the new level.
    ///
    /// Charges are clamped into the new level's bounds but never refilled;
    /// a higher max at the new level starts regenerating on the next tick.
    pub fn level_up(&mut self, definition: &AbilityDefinition) -> u32 {
        if self.can_level_up(definition) {
            self.level += 1;
            let max = definition.stats_for_level(self.level).max_charges;
            self.charges = self.charges.min(max);
            if self.charges >= max {
                self.regen_deadline = None;
            }
        }
        self.level
    }

    /// Records a duplicate pickup of this ability.
    pub fn add_owned_copy(&mut self) {
        self.owned_copies += 1;
    }

    /// Consumes one charge. Returns `false` (a no-op) when empty.
    ///
    /// Consuming from a full stack is what starts the regeneration chain:
    /// the next-charge deadline is scheduled from `now`. Consuming while
    /// already below max leaves the in-flight deadline untouched.
    pub fn consume_charge(&mut self, definition: &AbilityDefinition, now: f64) -> bool {
        if self.charges == 0 {
            return false;
        }

        let max = self.current_stats(definition).max_charges;
        if self.charges == max {
            let regen = f64::from(self.current_stats(definition).charge_regen_time);
            self.regen_deadline = Some(now + regen);
        }
        self.charges -= 1;
        true
    }

    /// Advances charge regeneration to `now`.
    ///
    /// At most one charge regenerates per call, regardless of how much time
    /// has passed: a long pause does not batch-refill the stack. When a
    /// regenerated charge still leaves the stack below max, the next
    /// deadline is chained from `now`.
    pub fn tick(&mut self, definition: &AbilityDefinition, now: f64) {
        let stats = self.current_stats(definition);
        let max = stats.max_charges;

        if self.charges >= max {
            self.regen_deadline = None;
            return;
        }

        let regen = f64::from(stats.charge_regen_time);
        let deadline = match self.regen_deadline {
            Some(deadline) => deadline,
            // Below max with nothing scheduled (level-up raised the cap):
            // start a fresh chain.
            None => {
                self.regen_deadline = Some(now + regen);
                return;
            },
        };

        if now >= deadline {
            self.charges += 1;
            debug!(charges = self.charges, max, "charge regenerated");
            if self.charges < max {
                self.regen_deadline = Some(now + regen);
            } else {
                self.regen_deadline = None;
            }
        }
    }

    /// Seconds until the next charge arrives: 0 at max charges.
    #[must_use]
    pub fn time_until_next_charge(&self, definition: &AbilityDefinition, now: f64) -> f32 {
        let stats = self.current_stats(definition);
        if self.charges >= stats.max_charges {
            return 0.0;
        }
        match self.regen_deadline {
            Some(deadline) => (deadline - now).max(0.0) as f32,
            None => stats.charge_regen_time,
        }
    }

    /// Derived stats for the current level and ownership count.
    #[must_use]
    pub fn stacked(&self, definition: &AbilityDefinition) -> StackedStats {
        StackedStats::derive(self.current_stats(definition), self.owned_copies)
    }
}

/// Stats after duplicate-ownership multipliers are applied.
///
/// Always derived on demand from `(LevelStats, owned_copies)`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackedStats {
    /// Display cooldown with diminishing reduction per copy.
    pub cooldown: f32,
    /// Damage with half-value gain per extra copy.
    pub damage: f32,
    /// Duration scaled linearly per copy.
    pub duration: f32,
    /// Radius scaled linearly per copy.
    pub radius: f32,
    /// Speed scaled linearly per copy.
    pub speed: f32,
    /// Distance scaled linearly per copy.
    pub distance: f32,
    /// Special value 1 scaled linearly per copy.
    pub special1: f32,
    /// Special value 2 scaled linearly per copy.
    pub special2: f32,
    /// Special value 3 scaled linearly per copy.
    pub special3: f32,
}

impl StackedStats {
    /// Applies the stacking multipliers to one level's stats.
    ///
    /// Damage stacks at half value per extra copy; the cooldown display
    /// value shrinks 10% per extra copy down to a hard 20% floor; every
    /// other stat scales linearly.
    #[must_use]
    pub fn derive(stats: &LevelStats, owned_copies: u32) -> Self {
        let copies = owned_copies.max(1) as f32;
        let extra = copies - 1.0;

        let cooldown_scale =
            (1.0 - COOLDOWN_REDUCTION_PER_EXTRA_COPY * extra).max(COOLDOWN_FLOOR);

        Self {
            cooldown: stats.cooldown * cooldown_scale,
            damage: stats.damage * (1.0 + extra * DAMAGE_PER_EXTRA_COPY),
            duration: stats.duration * copies,
            radius: stats.radius * copies,
            speed: stats.speed * copies,
            distance: stats.distance * copies,
            special1: stats.special1 * copies,
            special2: stats.special2 * copies,
            special3: stats.special3 * copies,
        }
    }
}
