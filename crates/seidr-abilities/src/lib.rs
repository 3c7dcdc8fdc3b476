//! # Seidr Abilities
//!
//! Ability systems for Seidr.
//!
//! This crate provides the full ability engine:
//! - Immutable per-level stat tables with inheriting level builders
//! - A charge economy with deadline-based, one-at-a-time regeneration
//! - Duplicate-ownership stacking with diminishing cooldown returns
//! - The dual-mode (instant / aim-and-confirm) activation state machine
//! - Falloff-based radial damage, stun and knockback resolution
//! - Resumable multi-frame effect tasks (dash, time freeze)
//! - Ability registry, TOML table loading and the persisted loadout shape
//!
//! The engine owns no entities: casters, targets, pointers and effect
//! sinks are collaborator capabilities (see [`combatant`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod abilities;
pub mod clock;
pub mod combatant;
pub mod definition;
pub mod events;
pub mod knockback;
pub mod library;
pub mod loadout;
pub mod manager;
pub mod radial;
pub mod runtime;
pub mod tasks;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::abilities::*;
    pub use crate::clock::*;
    pub use crate::combatant::*;
    pub use crate::definition::*;
    pub use crate::events::*;
    pub use crate::knockback::*;
    pub use crate::library::*;
    pub use crate::loadout::*;
    pub use crate::manager::*;
    pub use crate::radial::*;
    pub use crate::runtime::*;
    pub use crate::tasks::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{MockCaster, MockPointer, MockTarget, MockTargetStorage, RecordingSpawner};
    use seidr_common::Vec2;

    #[test]
    fn test_full_slam_flow_through_manager() {
        let library = AbilityLibrary::with_builtins();
        let mut manager = AbilityManager::default();
        manager.equip(library.get("Hammer Slam").expect("builtin").clone(), 0);

        let mut caster = MockCaster::new();
        let mut targets = MockTargetStorage::new();
        let mut effects = RecordingSpawner::new();
        let near = targets.add(MockTarget::new(Vec2::new(0.5, 0.0), 100.0));
        let outside = targets.add(MockTarget::new(Vec2::new(20.0, 0.0), 100.0));

        manager.handle_slot_input(0, &mut caster, &mut targets, &mut effects);

        assert!(targets.get(near).health < 100.0);
        assert_eq!(targets.get(outside).health, 100.0);
        assert!(effects.contains("abilities/hammer_slam/impact"));
        assert_eq!(manager.charges_available(0), Some((0, 1)));
    }

    #[test]
    fn test_full_dash_flow_with_confirm() {
        let library = AbilityLibrary::with_builtins();
        let mut manager = AbilityManager::default();
        manager.equip(library.get("Dash").expect("builtin").clone(), 1);

        let mut caster = MockCaster::new();
        let mut targets = MockTargetStorage::new();
        let mut effects = RecordingSpawner::new();
        let pointer = MockPointer(Vec2::new(8.0, 0.0));

        manager.handle_slot_input(1, &mut caster, &mut targets, &mut effects);
        assert_eq!(manager.is_targeting(), Some(1));

        manager.handle_confirm(&mut caster, &mut targets, &mut effects, &pointer);
        assert!(caster.movement_locked);

        // Drive the dash to completion; the trail spawns along the way.
        for _ in 0..120 {
            manager.fixed_tick(0.02, &mut caster, &mut targets);
            manager.frame_tick(FrameDelta::uniform(0.02), &caster, &mut effects);
        }

        assert!(!caster.movement_locked);
        assert!(effects.contains("abilities/dash/trail"));
    }

    #[test]
    fn test_time_freeze_slows_recharge_of_other_slots() {
        let library = AbilityLibrary::with_builtins();
        let mut manager = AbilityManager::default();
        manager.equip(library.get("Time Freeze").expect("builtin").clone(), 0);
        manager.equip(library.get("Mend").expect("builtin").clone(), 1);

        let mut caster = MockCaster::new();
        let mut targets = MockTargetStorage::new();
        let mut effects = RecordingSpawner::new();

        // Spend Mend, then freeze time.
        manager.handle_slot_input(1, &mut caster, &mut targets, &mut effects);
        manager.handle_slot_input(0, &mut caster, &mut targets, &mut effects);
        assert!(manager.time_scale() <= 1.0);

        // One second of wall-clock while frozen recharges far less than a
        // second of normal time would.
        let before = manager.cooldown_remaining(1);
        manager.frame_tick(FrameDelta::new(0.0, 1.0), &caster, &mut effects);
        let after = manager.cooldown_remaining(1);
        assert!(before - after < 0.5);
        assert!(before - after > 0.0);
    }
}
