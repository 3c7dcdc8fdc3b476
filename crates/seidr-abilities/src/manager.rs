//! Equip slots, input dispatch and the targeting state machine.
//!
//! The manager owns four equip slots (each a definition/behaviour pair with
//! its own runtime), ticks charge regeneration for every slot once per
//! frame, and drives the dual-mode activation state machine:
//!
//! - Instant abilities consume a charge and fire on key press.
//! - Click-to-target abilities enter an aim session; a confirm click
//!   resolves the target point, consumes the charge and fires; a cancel
//!   click or slot key exits without spending anything.
//!
//! At most one aim session exists system-wide. Within a frame, slot keys
//! are processed in ascending order before confirm and cancel clicks, and
//! at most one state-machine action is taken.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use seidr_common::Vec2;

use crate::abilities::{Ability, AbilityBehavior, ActivationBlock, CastContext};
use crate::clock::{FrameDelta, RechargeClock};
use crate::combatant::{Caster, EffectSpawner, PointerToWorld, TargetStorage};
use crate::events::{AbilityEvent, EventBus};
use crate::knockback::KnockbackTasks;
use crate::radial::RadialResolver;
use crate::runtime::AbilityRuntime;
use crate::tasks::EffectTasks;

/// Number of equip slots.
pub const SLOT_COUNT: usize = 4;

/// Input configuration for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// When true, pressing another slot key while aiming swaps to that
    /// ability; when false it only cancels the current aim.
    pub enable_swapping: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            enable_swapping: true,
        }
    }
}

/// One frame's worth of raw ability input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Slot keys pressed this frame.
    pub pressed_slots: [bool; SLOT_COUNT],
    /// Primary (confirm) click.
    pub confirm: bool,
    /// Secondary (cancel) click.
    pub cancel: bool,
}

/// The targeting state machine. Activation has no state of its own; it is
/// a transition side effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum TargetingState {
    /// No aim session.
    Idle,
    /// Aiming for one slot.
    Targeting {
        /// Slot being aimed.
        slot: usize,
        /// Clock value when the session began.
        started_at: f64,
        /// Effective aim range for this session (0 = unclamped).
        range: f32,
    },
}

/// An equipped slot: the authored ability plus its runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SlotEntry {
    ability: Ability,
    runtime: AbilityRuntime,
}

/// Resolved aim for a confirm click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimResolution {
    /// Unclamped normalized direction from caster to pointer.
    pub direction: Vec2,
    /// Range-clamped world point.
    pub position: Vec2,
}

/// Owns the equip slots and drives activation.
#[derive(Debug)]
pub struct AbilityManager {
    slots: [Option<SlotEntry>; SLOT_COUNT],
    state: TargetingState,
    config: InputConfig,
    clock: RechargeClock,
    events: EventBus,
    tasks: EffectTasks,
    knockback: KnockbackTasks,
    radial: RadialResolver,
}

impl Default for AbilityManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl AbilityManager {
    /// Creates a manager with empty slots.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            slots: [None, None, None, None],
            state: TargetingState::Idle,
            config,
            clock: RechargeClock::new(),
            events: EventBus::default(),
            tasks: EffectTasks::new(),
            knockback: KnockbackTasks::new(),
            radial: RadialResolver::new(),
        }
    }

    /// The event bus UI collaborators subscribe to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The recharge clock (pause and freeze control).
    #[must_use]
    pub fn clock_mut(&mut self) -> &mut RechargeClock {
        &mut self.clock
    }

    /// World time scale requested by active effects (1.0 normally).
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.tasks.time_scale()
    }

    /// Equips an ability into a slot at level 1, replacing any previous
    /// occupant. Returns `false` for an invalid slot index.
    pub fn equip(&mut self, ability: Ability, slot: usize) -> bool {
        self.equip_at_level(ability, slot, 1)
    }

    /// Equips an ability restored at a saved level. Charges start full.
    pub fn equip_at_level(&mut self, ability: Ability, slot: usize, level: u32) -> bool {
        if slot >= SLOT_COUNT {
            debug!(slot, "equip rejected: invalid slot");
            return false;
        }
        if self.targeting_slot() == Some(slot) {
            self.exit_targeting();
        }

        let runtime = AbilityRuntime::at_level(&ability.definition, level);
        info!(name = %ability.name(), slot, level = runtime.level(), "ability equipped");
        self.slots[slot] = Some(SlotEntry { ability, runtime });
        true
    }

    /// Removes and returns a slot's ability. An aim session for that slot
    /// is exited cleanly first.
    pub fn unequip(&mut self, slot: usize) -> Option<Ability> {
        if slot >= SLOT_COUNT {
            return None;
        }
        if self.targeting_slot() == Some(slot) {
            self.exit_targeting();
        }
        self.slots[slot].take().map(|entry| entry.ability)
    }

    /// Whether a slot holds an ability.
    #[must_use]
    pub fn is_equipped(&self, slot: usize) -> bool {
        slot < SLOT_COUNT && self.slots[slot].is_some()
    }

    /// Name of the ability in a slot.
    #[must_use]
    pub fn ability_name(&self, slot: usize) -> Option<&str> {
        self.entry(slot).map(|e| e.ability.name())
    }

    /// Current level of the ability in a slot.
    #[must_use]
    pub fn ability_level(&self, slot: usize) -> Option<u32> {
        self.entry(slot).map(|e| e.runtime.level())
    }

    /// Records a duplicate pickup for a slot.
    pub fn add_owned_copy(&mut self, slot: usize) -> bool {
        match self.entry_mut(slot) {
            Some(entry) => {
                entry.runtime.add_owned_copy();
                true
            },
            None => false,
        }
    }

    /// Levels up the ability in a slot, returning the new level.
    pub fn level_up(&mut self, slot: usize) -> Option<u32> {
        self.entry_mut(slot)
            .map(|entry| entry.runtime.level_up(&entry.ability.definition))
    }

    /// Current and maximum charges for a slot.
    #[must_use]
    pub fn charges_available(&self, slot: usize) -> Option<(u32, u32)> {
        self.entry(slot).map(|entry| {
            let max = entry.runtime.current_stats(&entry.ability.definition).max_charges;
            (entry.runtime.charges(), max)
        })
    }

    /// Seconds until the slot's next charge (0 when full or empty slot).
    #[must_use]
    pub fn cooldown_remaining(&self, slot: usize) -> f32 {
        self.entry(slot)
            .map(|entry| {
                entry
                    .runtime
                    .time_until_next_charge(&entry.ability.definition, self.clock.now())
            })
            .unwrap_or(0.0)
    }

    /// Slot currently being aimed, if any.
    #[must_use]
    pub fn is_targeting(&self) -> Option<usize> {
        self.targeting_slot()
    }

    /// Custom aim cursor for the slot being aimed, if configured.
    #[must_use]
    pub fn targeting_cursor(&self) -> Option<&str> {
        let slot = self.targeting_slot()?;
        self.entry(slot)?
            .ability
            .definition
            .targeting_cursor
            .as_deref()
    }

    /// Effective aim range of the active session.
    #[must_use]
    pub fn targeting_range(&self) -> Option<f32> {
        match self.state {
            TargetingState::Targeting { range, .. } => Some(range),
            TargetingState::Idle => None,
        }
    }

    /// Clock value at which the active aim session began.
    #[must_use]
    pub fn targeting_started_at(&self) -> Option<f64> {
        match self.state {
            TargetingState::Targeting { started_at, .. } => Some(started_at),
            TargetingState::Idle => None,
        }
    }

    /// One-line slot summary for HUD tooltips.
    #[must_use]
    pub fn slot_summary(&self, slot: usize) -> Option<String> {
        let entry = self.entry(slot)?;
        let stacked = entry.runtime.stacked(&entry.ability.definition);
        let (charges, max) = self.charges_available(slot)?;
        Some(format!(
            "{} L{} (x{})\nCooldown: {:.1}s\nCharges: {}/{}",
            entry.ability.name(),
            entry.runtime.level(),
            entry.runtime.owned_copies(),
            stacked.cooldown,
            charges,
            max,
        ))
    }

    /// Advances the frame tick: recharge clock, per-slot charge
    /// regeneration (every slot, every frame, targeting or not) and
    /// frame-driven effect tasks.
    pub fn frame_tick<C: Caster, E: EffectSpawner>(
        &mut self,
        frame: FrameDelta,
        caster: &C,
        effects: &mut E,
    ) {
        self.clock.advance(frame);
        let now = self.clock.now();
        for entry in self.slots.iter_mut().flatten() {
            entry.runtime.tick(&entry.ability.definition, now);
        }
        self.tasks
            .frame_tick(frame.unscaled, caster, &mut self.clock, effects);
    }

    /// Advances the fixed physics tick: dash motion and knockbacks.
    pub fn fixed_tick<C: Caster, T: TargetStorage>(
        &mut self,
        dt: f32,
        caster: &mut C,
        targets: &mut T,
    ) {
        self.tasks.fixed_tick(dt, caster);
        self.knockback.tick(dt, targets);
    }

    /// Processes one frame of raw input with the documented priority:
    /// slot keys in ascending order, then confirm, then cancel; at most
    /// one state-machine action per frame.
    pub fn process_input<C, T, E, P>(
        &mut self,
        input: FrameInput,
        caster: &mut C,
        targets: &mut T,
        effects: &mut E,
        pointer: &P,
    ) where
        C: Caster,
        T: TargetStorage,
        E: EffectSpawner,
        P: PointerToWorld,
    {
        for (slot, pressed) in input.pressed_slots.iter().enumerate() {
            if *pressed {
                self.handle_slot_input(slot, caster, targets, effects);
                return;
            }
        }
        if input.confirm {
            self.handle_confirm(caster, targets, effects, pointer);
            return;
        }
        if input.cancel {
            self.handle_cancel();
        }
    }

    /// Feeds a slot key press into the state machine.
    pub fn handle_slot_input<C, T, E>(
        &mut self,
        slot: usize,
        caster: &mut C,
        targets: &mut T,
        effects: &mut E,
    ) where
        C: Caster,
        T: TargetStorage,
        E: EffectSpawner,
    {
        if slot >= SLOT_COUNT {
            debug!(slot, "slot input ignored: invalid slot");
            return;
        }

        match self.state {
            TargetingState::Idle => self.try_activate(slot, caster, targets, effects),
            TargetingState::Targeting { slot: current, .. } => {
                if slot == current {
                    // Same key toggles the session off.
                    self.exit_targeting();
                } else if self.config.enable_swapping {
                    self.exit_targeting();
                    self.try_activate(slot, caster, targets, effects);
                } else {
                    self.exit_targeting();
                }
            },
        }
    }

    /// Feeds a primary (confirm) click into the state machine.
    pub fn handle_confirm<C, T, E, P>(
        &mut self,
        caster: &mut C,
        targets: &mut T,
        effects: &mut E,
        pointer: &P,
    ) where
        C: Caster,
        T: TargetStorage,
        E: EffectSpawner,
        P: PointerToWorld,
    {
        let (slot, range) = match self.state {
            TargetingState::Targeting { slot, range, .. } => (slot, range),
            TargetingState::Idle => return,
        };

        // A failed confirm must never leave the machine stuck aiming.
        if !caster.is_alive() {
            warn!(slot, "confirm aborted: caster dead");
            self.exit_targeting();
            return;
        }
        let Some(entry) = self.slots[slot].as_ref() else {
            warn!(slot, "confirm aborted: slot emptied mid-aim");
            self.exit_targeting();
            return;
        };
        if entry.runtime.charges() == 0 {
            debug!(slot, "confirm aborted: no charges");
            self.exit_targeting();
            return;
        }
        if let Some(block) = entry.ability.kind.can_activate(caster, &self.tasks) {
            debug!(slot, ?block, "confirm aborted");
            self.exit_targeting();
            return;
        }

        let aim = Self::resolve_aim(caster, pointer, range);

        let now = self.clock.now();
        let Some(entry) = self.slots[slot].as_mut() else {
            self.exit_targeting();
            return;
        };
        entry.runtime.consume_charge(&entry.ability.definition, now);

        let stats = *entry.runtime.current_stats(&entry.ability.definition);
        let stacked = entry.runtime.stacked(&entry.ability.definition);
        let kind = entry.ability.kind.clone();

        let mut ctx = CastContext {
            caster,
            targets,
            effects,
            tasks: &mut self.tasks,
            knockback: &mut self.knockback,
            radial: &mut self.radial,
            clock: &mut self.clock,
        };
        kind.activate_with_target(&stats, &stacked, aim.direction, aim.position, &mut ctx);

        info!(slot, "targeted ability fired");
        self.events.publish(AbilityEvent::AbilityUsed { slot });
        self.exit_targeting();
    }

    /// Feeds a secondary (cancel) click into the state machine.
    pub fn handle_cancel(&mut self) {
        if matches!(self.state, TargetingState::Targeting { .. }) {
            self.exit_targeting();
        }
    }

    /// Resolves the aim for the active session, for UI aim-line drawing.
    #[must_use]
    pub fn aim<C: Caster, P: PointerToWorld>(
        &self,
        caster: &C,
        pointer: &P,
    ) -> Option<AimResolution> {
        let range = self.targeting_range()?;
        Some(Self::resolve_aim(caster, pointer, range))
    }

    /// Computes direction and range-clamped position for a target point.
    ///
    /// The direction is always the unclamped normalized caster-to-pointer
    /// vector; only the position is pulled back to the range boundary.
    fn resolve_aim<C: Caster, P: PointerToWorld>(
        caster: &C,
        pointer: &P,
        range: f32,
    ) -> AimResolution {
        let origin = caster.position();
        let point = pointer.pointer_world_position();
        let offset = point - origin;
        let direction = offset.normalized();

        let position = if range > 0.0 && offset.length() > range {
            origin + direction.scale(range)
        } else {
            point
        };

        AimResolution {
            direction,
            position,
        }
    }

    /// Attempts to activate a slot from the idle state.
    fn try_activate<C, T, E>(&mut self, slot: usize, caster: &mut C, targets: &mut T, effects: &mut E)
    where
        C: Caster,
        T: TargetStorage,
        E: EffectSpawner,
    {
        if let Some(block) = self.activation_block(slot, caster) {
            debug!(slot, ?block, "activation rejected");
            return;
        }

        let mode = match self.entry(slot) {
            Some(entry) => entry.ability.definition.activation_mode,
            None => return,
        };
        match mode {
            crate::definition::ActivationMode::Instant => {
                self.activate_instant(slot, caster, targets, effects);
            },
            crate::definition::ActivationMode::ClickToTarget => {
                self.enter_targeting(slot);
            },
        }
    }

    /// Baseline gate plus the ability's own gate. `None` means clear.
    fn activation_block<C: Caster>(&self, slot: usize, caster: &C) -> Option<ActivationBlock> {
        let Some(entry) = self.entry(slot) else {
            return Some(ActivationBlock::EmptySlot);
        };
        if !caster.is_alive() {
            return Some(ActivationBlock::CasterDead);
        }
        if entry.runtime.charges() == 0 {
            return Some(ActivationBlock::NoCharges);
        }
        entry.ability.kind.can_activate(caster, &self.tasks)
    }

    fn activate_instant<C, T, E>(
        &mut self,
        slot: usize,
        caster: &mut C,
        targets: &mut T,
        effects: &mut E,
    ) where
        C: Caster,
        T: TargetStorage,
        E: EffectSpawner,
    {
        let now = self.clock.now();
        let Some(entry) = self.slots[slot].as_mut() else {
            return;
        };
        entry.runtime.consume_charge(&entry.ability.definition, now);

        let stats = *entry.runtime.current_stats(&entry.ability.definition);
        let stacked = entry.runtime.stacked(&entry.ability.definition);
        let kind = entry.ability.kind.clone();

        let mut ctx = CastContext {
            caster,
            targets,
            effects,
            tasks: &mut self.tasks,
            knockback: &mut self.knockback,
            radial: &mut self.radial,
            clock: &mut self.clock,
        };
        kind.activate(&stats, &stacked, &mut ctx);

        info!(slot, "instant ability fired");
        self.events.publish(AbilityEvent::AbilityUsed { slot });
    }

    fn enter_targeting(&mut self, slot: usize) {
        let Some(entry) = self.slots[slot].as_ref() else {
            return;
        };
        let stacked = entry.runtime.stacked(&entry.ability.definition);
        let range = entry
            .ability
            .kind
            .on_enter_targeting(&stacked)
            .unwrap_or(entry.ability.definition.max_targeting_range);

        self.state = TargetingState::Targeting {
            slot,
            started_at: self.clock.now(),
            range,
        };
        info!(slot, range, "targeting started");
        self.events.publish(AbilityEvent::TargetingStarted { slot });
    }

    /// Ends the active aim session, firing `TargetingEnded`.
    fn exit_targeting(&mut self) {
        if let TargetingState::Targeting { slot, .. } = self.state {
            if let Some(entry) = self.entry(slot) {
                entry.ability.kind.on_exit_targeting();
            }
            self.state = TargetingState::Idle;
            self.events.publish(AbilityEvent::TargetingEnded { slot });
        }
    }

    fn targeting_slot(&self) -> Option<usize> {
        match self.state {
            TargetingState::Targeting { slot, .. } => Some(slot),
            TargetingState::Idle => None,
        }
    }

    fn entry(&self, slot: usize) -> Option<&SlotEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, slot: usize) -> Option<&mut SlotEntry> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityKind, Dash, HammerSlam, Mend};
    use crate::combatant::{MockCaster, MockPointer, MockTarget, MockTargetStorage, RecordingSpawner};
    use crate::definition::{AbilityDefinition, ActivationMode, LevelPatch};

    fn instant_ability(name: &str) -> Ability {
        let definition = AbilityDefinition::new(name, ActivationMode::Instant).with_level(
            1,
            LevelPatch {
                damage: 5.0,
                radius: 3.0,
                duration: 1.0,
                speed: 10.0,
                distance: 2.0,
                special1: 0.5,
                special2: 1.0,
                max_charges: 1,
                charge_regen_time: 4.0,
                ..LevelPatch::NONE
            },
        );
        Ability::new(definition, AbilityKind::HammerSlam(HammerSlam::default()))
    }

    fn targeted_ability(name: &str) -> Ability {
        let definition = AbilityDefinition::new(name, ActivationMode::ClickToTarget)
            .with_targeting_range(5.0)
            .with_targeting_cursor("cursors/dash")
            .with_level(
                1,
                LevelPatch {
                    speed: 15.0,
                    distance: 3.0,
                    special1: 0.1,
                    max_charges: 1,
                    charge_regen_time: 2.0,
                    ..LevelPatch::NONE
                },
            );
        Ability::new(definition, AbilityKind::Dash(Dash::default()))
    }

    struct World {
        caster: MockCaster,
        targets: MockTargetStorage,
        effects: RecordingSpawner,
        pointer: MockPointer,
    }

    impl World {
        fn new() -> Self {
            Self {
                caster: MockCaster::new(),
                targets: MockTargetStorage::new(),
                effects: RecordingSpawner::new(),
                pointer: MockPointer(Vec2::new(10.0, 0.0)),
            }
        }
    }

    #[test]
    fn test_equip_rejects_invalid_slot() {
        let mut manager = AbilityManager::default();
        assert!(!manager.equip(instant_ability("Slam"), 4));
        assert!(manager.equip(instant_ability("Slam"), 3));
        assert!(manager.is_equipped(3));
        assert_eq!(manager.ability_name(3), Some("Slam"));
    }

    #[test]
    fn test_instant_activation_consumes_charge_and_fires_event() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(instant_ability("Slam"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        assert_eq!(manager.charges_available(0), Some((0, 1)));
        assert_eq!(
            manager.events().drain(),
            vec![AbilityEvent::AbilityUsed { slot: 0 }]
        );
        assert!(manager.is_targeting().is_none());
    }

    #[test]
    fn test_empty_charge_rejected_without_event() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(instant_ability("Slam"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        manager.events().drain();
        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        assert_eq!(manager.charges_available(0), Some((0, 1)));
        assert!(manager.events().drain().is_empty());
    }

    #[test]
    fn test_dead_caster_rejected() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        world.caster.alive = false;
        manager.equip(instant_ability("Slam"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        assert_eq!(manager.charges_available(0), Some((1, 1)));
    }

    #[test]
    fn test_targeting_enter_keeps_charge() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        assert_eq!(manager.is_targeting(), Some(0));
        assert_eq!(manager.charges_available(0), Some((1, 1)));
        assert_eq!(manager.targeting_cursor(), Some("cursors/dash"));
        // Dash derives its aim range from its stats, not the definition.
        assert_eq!(manager.targeting_range(), Some(3.0));
        assert_eq!(
            manager.events().drain(),
            vec![AbilityEvent::TargetingStarted { slot: 0 }]
        );
    }

    #[test]
    fn test_same_key_cancels_targeting() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        manager.events().drain();
        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(0), Some((1, 1)));
        assert_eq!(
            manager.events().drain(),
            vec![AbilityEvent::TargetingEnded { slot: 0 }]
        );
    }

    #[test]
    fn test_swap_trace_matches_state_machine() {
        // The documented determinism trace: targeting slot 0, then pressing
        // slot 1 with swapping enabled ends session 0 without a charge and
        // fires slot 1's instant ability.
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);
        manager.equip(instant_ability("Slam"), 1);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        assert_eq!(manager.is_targeting(), Some(0));
        assert_eq!(manager.charges_available(0), Some((1, 1)));
        manager.events().drain();

        manager.handle_slot_input(1, &mut world.caster, &mut world.targets, &mut world.effects);

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(0), Some((1, 1)));
        assert_eq!(manager.charges_available(1), Some((0, 1)));
        assert_eq!(
            manager.events().drain(),
            vec![
                AbilityEvent::TargetingEnded { slot: 0 },
                AbilityEvent::AbilityUsed { slot: 1 },
            ]
        );
    }

    #[test]
    fn test_swap_disabled_only_cancels() {
        let mut manager = AbilityManager::new(InputConfig {
            enable_swapping: false,
        });
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);
        manager.equip(instant_ability("Slam"), 1);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        manager.handle_slot_input(1, &mut world.caster, &mut world.targets, &mut world.effects);

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(1), Some((1, 1)), "no swap fire");
    }

    #[test]
    fn test_confirm_fires_with_clamped_point_and_unclamped_direction() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        world.pointer = MockPointer(Vec2::new(10.0, 0.0));
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        let aim = manager
            .aim(&world.caster, &world.pointer)
            .expect("aim while targeting");
        // Pointer is 10 units out; dash range is 3.
        assert!((aim.direction.x - 1.0).abs() < 1e-5);
        assert!((aim.position.x - 3.0).abs() < 1e-5);

        manager.events().drain();
        manager.handle_confirm(
            &mut world.caster,
            &mut world.targets,
            &mut world.effects,
            &world.pointer,
        );

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(0), Some((0, 1)));
        assert!(world.caster.movement_locked, "dash task started");
        assert_eq!(
            manager.events().drain(),
            vec![
                AbilityEvent::AbilityUsed { slot: 0 },
                AbilityEvent::TargetingEnded { slot: 0 },
            ]
        );
    }

    #[test]
    fn test_cancel_click_spends_nothing() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        manager.events().drain();
        manager.handle_cancel();

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(0), Some((1, 1)));
        assert_eq!(
            manager.events().drain(),
            vec![AbilityEvent::TargetingEnded { slot: 0 }]
        );
    }

    #[test]
    fn test_confirm_with_dead_caster_exits_cleanly() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        world.caster.alive = false;
        manager.handle_confirm(
            &mut world.caster,
            &mut world.targets,
            &mut world.effects,
            &world.pointer,
        );

        assert!(manager.is_targeting().is_none(), "never stuck aiming");
        assert_eq!(manager.charges_available(0), Some((1, 1)));
    }

    #[test]
    fn test_input_priority_slot_keys_before_clicks() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        // Enter targeting first.
        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        // Slot 0 press and confirm in the same frame: the slot key wins,
        // cancelling the session; the confirm is not processed.
        let input = FrameInput {
            pressed_slots: [true, false, false, false],
            confirm: true,
            cancel: false,
        };
        manager.process_input(
            input,
            &mut world.caster,
            &mut world.targets,
            &mut world.effects,
            &world.pointer,
        );

        assert!(manager.is_targeting().is_none());
        assert_eq!(manager.charges_available(0), Some((1, 1)));
    }

    #[test]
    fn test_regen_ticks_all_slots_every_frame() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(instant_ability("Slam"), 0);
        manager.equip(instant_ability("Slam II"), 2);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        manager.handle_slot_input(2, &mut world.caster, &mut world.targets, &mut world.effects);
        assert_eq!(manager.charges_available(0), Some((0, 1)));
        assert_eq!(manager.charges_available(2), Some((0, 1)));

        // 4s regen at 0.5s per frame.
        for _ in 0..9 {
            manager.frame_tick(FrameDelta::uniform(0.5), &world.caster, &mut world.effects);
        }

        assert_eq!(manager.charges_available(0), Some((1, 1)));
        assert_eq!(manager.charges_available(2), Some((1, 1)));
        assert_eq!(manager.cooldown_remaining(0), 0.0);
    }

    #[test]
    fn test_slot_independence_same_ability() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(instant_ability("Slam"), 0);
        manager.equip(instant_ability("Slam"), 1);

        manager.add_owned_copy(0);
        manager.level_up(1);
        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);

        assert_eq!(manager.charges_available(0), Some((0, 1)));
        assert_eq!(manager.charges_available(1), Some((1, 1)));
    }

    #[test]
    fn test_unequip_while_targeting_exits_cleanly() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        manager.equip(targeted_ability("Dash"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        let removed = manager.unequip(0);

        assert!(removed.is_some());
        assert!(manager.is_targeting().is_none());
        assert!(!manager.is_equipped(0));
    }

    #[test]
    fn test_mend_heals_through_manager() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        world.caster.health = 10.0;

        let definition = AbilityDefinition::new("Mend", ActivationMode::Instant).with_level(
            1,
            LevelPatch {
                damage: 20.0,
                max_charges: 1,
                charge_regen_time: 15.0,
                ..LevelPatch::NONE
            },
        );
        manager.equip(Ability::new(definition, AbilityKind::Mend(Mend::default())), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        assert_eq!(world.caster.health, 30.0);
    }

    #[test]
    fn test_fixed_tick_drives_knockback() {
        let mut manager = AbilityManager::default();
        let mut world = World::new();
        let id = world.targets.add(MockTarget::new(Vec2::new(1.0, 0.0), 100.0));
        manager.equip(instant_ability("Slam"), 0);

        manager.handle_slot_input(0, &mut world.caster, &mut world.targets, &mut world.effects);
        assert!(world.targets.get(id).speed == 0.0, "knockback suppressed speed");

        for _ in 0..200 {
            manager.fixed_tick(0.02, &mut world.caster, &mut world.targets);
        }
        let target = world.targets.get(id);
        assert!(target.position.x > 1.0, "pushed away from center");
        assert_eq!(target.speed, 2.0, "speed restored");
    }

    #[test]
    fn test_slot_summary_format() {
        let mut manager = AbilityManager::default();
        manager.equip(instant_ability("Slam"), 0);
        manager.add_owned_copy(0);

        let summary = manager.slot_summary(0).expect("summary");
        assert!(summary.contains("Slam L1 (x2)"));
        assert!(summary.contains("Charges: 1/1"));
        assert!(manager.slot_summary(3).is_none());
    }
}
