//! Concrete ability behaviours.
//!
//! Abilities are a closed set of variants behind the [`AbilityBehavior`]
//! trait. Each variant holds only its own extra fields; visual and audio
//! assets are collaborator handles (asset keys), never core state.
//!
//! The baseline activation gate (caster alive, charge available) is
//! enforced by the manager before a behaviour is consulted;
//! [`AbilityBehavior::can_activate`] can only tighten that gate, never
//! relax it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use seidr_common::Vec2;

use crate::clock::RechargeClock;
use crate::combatant::{Caster, EffectRequest, EffectSpawner, TargetStorage};
use crate::definition::LevelStats;
use crate::knockback::KnockbackTasks;
use crate::radial::{FalloffCurve, RadialResolver, RadialStrike};
use crate::runtime::StackedStats;
use crate::tasks::{DashTask, EffectTask, EffectTasks, TimeFreezeTask, TrailTask};

/// Minimum stun a hammer slam inflicts at the edge of its radius.
const SLAM_MIN_STUN: f32 = 0.8;
/// Radius the slam shockwave visual is authored at; larger slams scale it.
const SHOCKWAVE_BASE_RADIUS: f32 = 4.0;

/// The specific precondition that rejected an activation, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationBlock {
    /// Slot holds no ability.
    EmptySlot,
    /// Caster is dead.
    CasterDead,
    /// No charge available.
    NoCharges,
    /// Dodge abilities refuse while damage immunity is already up.
    Invincible,
    /// Only one time freeze may run at a time.
    TimeAlreadyFrozen,
    /// Heavy attacks refuse while movement is locked.
    MovementLocked,
}

/// Mutable engine state handed to a behaviour during activation.
#[derive(Debug)]
pub struct CastContext<'a, C, T, E> {
    /// The casting entity.
    pub caster: &'a mut C,
    /// Damageable entities around the caster.
    pub targets: &'a mut T,
    /// Fire-and-forget visual/audio sink.
    pub effects: &'a mut E,
    /// Multi-frame effect tasks.
    pub tasks: &'a mut EffectTasks,
    /// In-flight knockbacks.
    pub knockback: &'a mut KnockbackTasks,
    /// Radial strike resolver.
    pub radial: &'a mut RadialResolver,
    /// Recharge time source.
    pub clock: &'a mut RechargeClock,
}

/// Behaviour shared by every ability variant.
pub trait AbilityBehavior {
    /// Ability-specific activation gate on top of the baseline. Returns
    /// the failing precondition, or `None` when the activation may
    /// proceed.
    fn can_activate<C: Caster>(&self, caster: &C, tasks: &EffectTasks) -> Option<ActivationBlock> {
        let _ = (caster, tasks);
        None
    }

    /// Runs the instant activation.
    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    );

    /// Runs the targeted activation. `direction` is the unclamped
    /// normalized aim direction; `position` is the range-clamped world
    /// point. Defaults to the untargeted activation.
    fn activate_with_target<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        stats: &LevelStats,
        stacked: &StackedStats,
        direction: Vec2,
        position: Vec2,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        let _ = (direction, position);
        self.activate(stats, stacked, ctx);
    }

    /// Called when an aim session starts. Returns an override for the
    /// definition's targeting range, if the ability derives its range from
    /// its stats.
    fn on_enter_targeting(&self, stacked: &StackedStats) -> Option<f32> {
        let _ = stacked;
        None
    }

    /// Called when an aim session ends.
    fn on_exit_targeting(&self) {}
}

/// Ground slam dealing falloff damage, stun and knockback around the
/// caster.
///
/// Stat mapping: `damage` = center damage, `special2` = edge damage,
/// `special3` = damage variation fraction, `duration` = center stun,
/// `distance` = center knockback, `special1` = edge knockback,
/// `speed` = knockback speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HammerSlam {
    /// Impact visual at the slam center.
    pub impact_effect: String,
    /// Expanding shockwave visual.
    pub shockwave_effect: String,
    /// Damage curve from edge to center.
    pub damage_falloff: FalloffCurve,
    /// Knockback curve from edge to center.
    pub knockback_falloff: FalloffCurve,
    /// Stun curve from edge to center.
    pub stun_falloff: FalloffCurve,
}

impl Default for HammerSlam {
    fn default() -> Self {
        Self {
            impact_effect: "abilities/hammer_slam/impact".into(),
            shockwave_effect: "abilities/hammer_slam/shockwave".into(),
            damage_falloff: FalloffCurve::Smooth,
            knockback_falloff: FalloffCurve::Smooth,
            stun_falloff: FalloffCurve::Smooth,
        }
    }
}

impl AbilityBehavior for HammerSlam {
    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        let center = ctx.caster.position();

        ctx.effects
            .spawn(EffectRequest::new(self.impact_effect.clone(), center));
        ctx.effects.spawn(
            EffectRequest::new(self.shockwave_effect.clone(), center)
                .with_scale(stacked.radius / SHOCKWAVE_BASE_RADIUS),
        );

        let strike = RadialStrike::new(stacked.radius)
            .with_damage(stacked.special2, stacked.damage)
            .with_knockback(stacked.special1, stacked.distance, stacked.speed)
            .with_stun(SLAM_MIN_STUN, stacked.duration)
            .with_variation(stacked.special3, 0.0)
            .with_falloff(
                self.damage_falloff,
                self.knockback_falloff,
                self.stun_falloff,
            );

        let hits = ctx.radial.apply_radial(center, &strike, ctx.targets);
        debug!(count = hits.len(), "hammer slam resolved");
        for hit in hits {
            if let Some(impulse) = hit.knockback {
                ctx.knockback.spawn(hit.target, impulse, ctx.targets);
            }
        }
    }
}

/// Aimed burst of movement with a trail, briefly owning the movement lock.
///
/// Stat mapping: `speed` = dash speed, `distance` = dash length,
/// `special1` = post-dash recovery hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    /// Trail visual spawned behind the caster while dashing.
    pub trail_effect: String,
    /// Trail tint.
    pub trail_color: [f32; 4],
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            trail_effect: "abilities/dash/trail".into(),
            trail_color: [0.0, 1.0, 1.0, 1.0],
        }
    }
}

impl AbilityBehavior for Dash {
    fn can_activate<C: Caster>(&self, caster: &C, _tasks: &EffectTasks) -> Option<ActivationBlock> {
        if caster.is_invincible() {
            Some(ActivationBlock::Invincible)
        } else {
            None
        }
    }

    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        _stacked: &StackedStats,
        _ctx: &mut CastContext<'_, C, T, E>,
    ) {
        warn!("dash activated without an aim direction");
    }

    fn activate_with_target<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        stacked: &StackedStats,
        direction: Vec2,
        _position: Vec2,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        let trail = ctx.tasks.spawn(EffectTask::Trail(TrailTask::new(
            self.trail_effect.clone(),
            self.trail_color,
        )));
        let dash = DashTask::begin(
            ctx.caster,
            direction,
            stacked.speed,
            stacked.distance,
            stacked.special1,
            Some(trail),
        );
        ctx.tasks.spawn(EffectTask::Dash(dash));
    }

    fn on_enter_targeting(&self, stacked: &StackedStats) -> Option<f32> {
        Some(stacked.distance)
    }
}

/// Aimed heavy attack launching a returning projectile.
///
/// Projectile flight belongs to a collaborator; this behaviour hands the
/// spawn parameters to the effect sink. Stat mapping: `special1` = spin
/// multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HammerThrow {
    /// Projectile visual.
    pub projectile_effect: String,
    /// Whether the projectile returns to the caster.
    pub returns_to_caster: bool,
}

impl Default for HammerThrow {
    fn default() -> Self {
        Self {
            projectile_effect: "abilities/hammer_throw/projectile".into(),
            returns_to_caster: true,
        }
    }
}

impl AbilityBehavior for HammerThrow {
    fn can_activate<C: Caster>(&self, caster: &C, _tasks: &EffectTasks) -> Option<ActivationBlock> {
        if caster.movement_locked() {
            Some(ActivationBlock::MovementLocked)
        } else {
            None
        }
    }

    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        _stacked: &StackedStats,
        _ctx: &mut CastContext<'_, C, T, E>,
    ) {
        warn!("hammer throw activated without an aim direction");
    }

    fn activate_with_target<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        _stacked: &StackedStats,
        direction: Vec2,
        _position: Vec2,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        let rotation = direction.y.atan2(direction.x);
        ctx.effects.spawn(
            EffectRequest::new(self.projectile_effect.clone(), ctx.caster.position())
                .with_rotation(rotation),
        );
    }

    fn on_enter_targeting(&self, stacked: &StackedStats) -> Option<f32> {
        Some(stacked.distance)
    }
}

/// Radial freeze stunning everything in range for the full duration.
///
/// Stat mapping: `duration` = freeze length, `special1` = visual scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrostNova {
    /// Nova visual at the caster.
    pub nova_effect: String,
}

impl Default for FrostNova {
    fn default() -> Self {
        Self {
            nova_effect: "abilities/frost_nova/burst".into(),
        }
    }
}

impl AbilityBehavior for FrostNova {
    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        let center = ctx.caster.position();
        ctx.effects.spawn(
            EffectRequest::new(self.nova_effect.clone(), center)
                .with_scale(stacked.special1.max(1.0)),
        );

        // No damage, no knockback; everyone inside freezes equally long.
        let strike = RadialStrike::new(stacked.radius)
            .with_stun(stacked.duration, stacked.duration)
            .with_falloff(FalloffCurve::Flat, FalloffCurve::Flat, FalloffCurve::Flat);
        ctx.radial.apply_radial(center, &strike, ctx.targets);
    }
}

/// Global slow-time effect.
///
/// Stat mapping: `duration` = total effect length, `special2` = recharge
/// recovery factor (read unstacked). While held, ability recharging runs
/// on unscaled time at `lerp(intensity, 1, special2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFreeze {
    /// Held world time scale (0.05 = 5% speed).
    pub intensity: f32,
    /// Full-screen filter visual.
    pub filter_effect: String,
}

impl Default for TimeFreeze {
    fn default() -> Self {
        Self {
            intensity: 0.05,
            filter_effect: "abilities/time_freeze/filter".into(),
        }
    }
}

impl AbilityBehavior for TimeFreeze {
    fn can_activate<C: Caster>(&self, _caster: &C, tasks: &EffectTasks) -> Option<ActivationBlock> {
        if tasks.freezing() {
            Some(ActivationBlock::TimeAlreadyFrozen)
        } else {
            None
        }
    }

    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        ctx.effects.spawn(EffectRequest::new(
            self.filter_effect.clone(),
            ctx.caster.position(),
        ));

        // Recovery factor reads the raw level stat: duplicate copies
        // lengthen the freeze, they do not speed up recharging under it.
        let freeze = TimeFreezeTask::begin(
            ctx.clock,
            stacked.duration,
            self.intensity,
            stats.special2,
        );
        ctx.tasks.spawn(EffectTask::TimeFreeze(freeze));
    }
}

/// Immediate self-heal. Stat mapping: `damage` = heal amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mend {
    /// Heal visual on the caster.
    pub heal_effect: String,
}

impl Default for Mend {
    fn default() -> Self {
        Self {
            heal_effect: "abilities/mend/glow".into(),
        }
    }
}

impl AbilityBehavior for Mend {
    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        _stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        ctx.effects.spawn(EffectRequest::new(
            self.heal_effect.clone(),
            ctx.caster.position(),
        ));
        ctx.caster.apply_immediate_health_delta(stacked.damage);
    }
}

/// A complete authored ability: immutable definition plus behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Identity, targeting config and level table.
    pub definition: crate::definition::AbilityDefinition,
    /// The behaviour variant.
    pub kind: AbilityKind,
}

impl Ability {
    /// Bundles a definition with its behaviour.
    #[must_use]
    pub fn new(definition: crate::definition::AbilityDefinition, kind: AbilityKind) -> Self {
        Self { definition, kind }
    }

    /// The ability's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// The closed set of ability behaviours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Radial ground slam.
    HammerSlam(HammerSlam),
    /// Aimed movement burst.
    Dash(Dash),
    /// Aimed returning projectile.
    HammerThrow(HammerThrow),
    /// Radial freeze.
    FrostNova(FrostNova),
    /// Global slow-time.
    TimeFreeze(TimeFreeze),
    /// Self-heal.
    Mend(Mend),
}

impl AbilityBehavior for AbilityKind {
    fn can_activate<C: Caster>(&self, caster: &C, tasks: &EffectTasks) -> Option<ActivationBlock> {
        match self {
            Self::HammerSlam(a) => a.can_activate(caster, tasks),
            Self::Dash(a) => a.can_activate(caster, tasks),
            Self::HammerThrow(a) => a.can_activate(caster, tasks),
            Self::FrostNova(a) => a.can_activate(caster, tasks),
            Self::TimeFreeze(a) => a.can_activate(caster, tasks),
            Self::Mend(a) => a.can_activate(caster, tasks),
        }
    }

    fn activate<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        stats: &LevelStats,
        stacked: &StackedStats,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        match self {
            Self::HammerSlam(a) => a.activate(stats, stacked, ctx),
            Self::Dash(a) => a.activate(stats, stacked, ctx),
            Self::HammerThrow(a) => a.activate(stats, stacked, ctx),
            Self::FrostNova(a) => a.activate(stats, stacked, ctx),
            Self::TimeFreeze(a) => a.activate(stats, stacked, ctx),
            Self::Mend(a) => a.activate(stats, stacked, ctx),
        }
    }

    fn activate_with_target<C: Caster, T: TargetStorage, E: EffectSpawner>(
        &self,
        stats: &LevelStats,
        stacked: &StackedStats,
        direction: Vec2,
        position: Vec2,
        ctx: &mut CastContext<'_, C, T, E>,
    ) {
        match self {
            Self::HammerSlam(a) => a.activate_with_target(stats, stacked, direction, position, ctx),
            Self::Dash(a) => a.activate_with_target(stats, stacked, direction, position, ctx),
            Self::HammerThrow(a) => {
                a.activate_with_target(stats, stacked, direction, position, ctx);
            },
            Self::FrostNova(a) => a.activate_with_target(stats, stacked, direction, position, ctx),
            Self::TimeFreeze(a) => a.activate_with_target(stats, stacked, direction, position, ctx),
            Self::Mend(a) => a.activate_with_target(stats, stacked, direction, position, ctx),
        }
    }

    fn on_enter_targeting(&self, stacked: &StackedStats) -> Option<f32> {
        match self {
            Self::HammerSlam(a) => a.on_enter_targeting(stacked),
            Self::Dash(a) => a.on_enter_targeting(stacked),
            Self::HammerThrow(a) => a.on_enter_targeting(stacked),
            Self::FrostNova(a) => a.on_enter_targeting(stacked),
            Self::TimeFreeze(a) => a.on_enter_targeting(stacked),
            Self::Mend(a) => a.on_enter_targeting(stacked),
        }
    }

    fn on_exit_targeting(&self) {
        match self {
            Self::HammerSlam(a) => a.on_exit_targeting(),
            Self::Dash(a) => a.on_exit_targeting(),
            Self::HammerThrow(a) => a.on_exit_targeting(),
            Self::FrostNova(a) => a.on_exit_targeting(),
            Self::TimeFreeze(a) => a.on_exit_targeting(),
            Self::Mend(a) => a.on_exit_targeting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{MockCaster, MockTarget, MockTargetStorage, RecordingSpawner};

    struct Fixture {
        caster: MockCaster,
        targets: MockTargetStorage,
        effects: RecordingSpawner,
        tasks: EffectTasks,
        knockback: KnockbackTasks,
        radial: RadialResolver,
        clock: RechargeClock,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                caster: MockCaster::new(),
                targets: MockTargetStorage::new(),
                effects: RecordingSpawner::new(),
                tasks: EffectTasks::new(),
                knockback: KnockbackTasks::new(),
                radial: RadialResolver::with_seed(11),
                clock: RechargeClock::new(),
            }
        }

        fn ctx(
            &mut self,
        ) -> CastContext<'_, MockCaster, MockTargetStorage, RecordingSpawner> {
            CastContext {
                caster: &mut self.caster,
                targets: &mut self.targets,
                effects: &mut self.effects,
                tasks: &mut self.tasks,
                knockback: &mut self.knockback,
                radial: &mut self.radial,
                clock: &mut self.clock,
            }
        }
    }

    fn slam_stats() -> (LevelStats, StackedStats) {
        let stats = LevelStats {
            damage: 10.0,
            duration: 1.5,
            radius: 4.0,
            speed: 12.0,
            distance: 5.0,
            special1: 1.0,
            special2: 2.0,
            special3: 0.0,
            ..LevelStats::default()
        };
        (stats, StackedStats::derive(&stats, 1))
    }

    #[test]
    fn test_hammer_slam_damages_and_pushes() {
        let mut fx = Fixture::new();
        let id = fx.targets.add(MockTarget::new(Vec2::new(1.0, 0.0), 100.0));

        let (stats, stacked) = slam_stats();
        let slam = HammerSlam::default();
        slam.activate(&stats, &stacked, &mut fx.ctx());

        let target = fx.targets.get(id);
        assert!(!target.hits.is_empty());
        assert!(target.health < 100.0);
        assert!(fx.knockback.is_pushing(id));
        assert!(fx.effects.contains("abilities/hammer_slam/impact"));
        assert!(fx.effects.contains("abilities/hammer_slam/shockwave"));
    }

    #[test]
    fn test_hammer_slam_defers_lethal_damage() {
        let mut fx = Fixture::new();
        let id = fx.targets.add(MockTarget::new(Vec2::new(0.5, 0.0), 1.0));

        let (stats, stacked) = slam_stats();
        HammerSlam::default().activate(&stats, &stacked, &mut fx.ctx());

        let target = fx.targets.get(id);
        assert!(target.alive);
        assert!(target.pending_lethal > 0.0);
        assert_eq!(target.health, 1.0);
    }

    #[test]
    fn test_dash_locks_and_spawns_trail() {
        let mut fx = Fixture::new();
        let (stats, stacked) = slam_stats();

        let dash = Dash::default();
        dash.activate_with_target(
            &stats,
            &stacked,
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 5.0),
            &mut fx.ctx(),
        );

        assert!(fx.caster.movement_locked);
        assert_eq!(fx.tasks.active_count(), 2, "dash plus its trail");
    }

    #[test]
    fn test_dash_gate_blocks_invincible() {
        let mut caster = MockCaster::new();
        caster.invincible = true;
        let tasks = EffectTasks::new();

        assert_eq!(
            Dash::default().can_activate(&caster, &tasks),
            Some(ActivationBlock::Invincible)
        );
    }

    #[test]
    fn test_dash_targeting_range_follows_distance() {
        let (_, stacked) = slam_stats();
        assert_eq!(Dash::default().on_enter_targeting(&stacked), Some(5.0));
    }

    #[test]
    fn test_hammer_throw_spawns_projectile_toward_aim() {
        let mut fx = Fixture::new();
        let (stats, stacked) = slam_stats();

        let throw = HammerThrow::default();
        throw.activate_with_target(
            &stats,
            &stacked,
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 6.0),
            &mut fx.ctx(),
        );

        let spawn = fx
            .effects
            .spawned
            .iter()
            .find(|r| r.key == "abilities/hammer_throw/projectile")
            .expect("projectile spawn");
        assert!((spawn.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_hammer_throw_gate_blocks_while_locked() {
        let mut caster = MockCaster::new();
        caster.movement_locked = true;
        let tasks = EffectTasks::new();

        assert_eq!(
            HammerThrow::default().can_activate(&caster, &tasks),
            Some(ActivationBlock::MovementLocked)
        );
    }

    #[test]
    fn test_frost_nova_stuns_uniformly_without_damage() {
        let mut fx = Fixture::new();
        let near = fx.targets.add(MockTarget::new(Vec2::new(0.5, 0.0), 50.0));
        let edge = fx.targets.add(MockTarget::new(Vec2::new(4.0, 0.0), 50.0));

        let (stats, stacked) = slam_stats();
        FrostNova::default().activate(&stats, &stacked, &mut fx.ctx());

        for id in [near, edge] {
            let target = fx.targets.get(id);
            assert_eq!(target.health, 50.0, "no damage");
            assert_eq!(target.hits.len(), 1);
            assert!((target.hits[0].1 - 1.5).abs() < 1e-5, "full-duration stun");
        }
    }

    #[test]
    fn test_time_freeze_gate_and_recharge() {
        let mut fx = Fixture::new();
        let (mut stats, _) = slam_stats();
        stats.special2 = 0.5;
        let stacked = StackedStats::derive(&stats, 1);

        let freeze = TimeFreeze::default();
        assert!(freeze.can_activate(&fx.caster, &fx.tasks).is_none());

        freeze.activate(&stats, &stacked, &mut fx.ctx());
        assert!(fx.tasks.freezing());
        assert!(fx.clock.is_frozen());

        // A second freeze is refused while one is held.
        assert_eq!(
            freeze.can_activate(&fx.caster, &fx.tasks),
            Some(ActivationBlock::TimeAlreadyFrozen)
        );
    }

    #[test]
    fn test_mend_heals_caster() {
        let mut fx = Fixture::new();
        fx.caster.health = 40.0;
        let (stats, stacked) = slam_stats();

        Mend::default().activate(&stats, &stacked, &mut fx.ctx());
        assert_eq!(fx.caster.health, 50.0);
        assert!(fx.effects.contains("abilities/mend/glow"));
    }
}
