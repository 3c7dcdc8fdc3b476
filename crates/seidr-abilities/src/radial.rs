//! Falloff-based radial effect resolution.
//!
//! Area effects evaluate three independent falloff curves (damage,
//! knockback, stun) against every valid target inside a radius. Curves map
//! closeness to strength: they are evaluated at `1 - normalizedDistance`,
//! so the center reads the top of the curve and the edge reads the bottom.
//!
//! Damage known to be fatal is not applied directly; it is registered on
//! the target as pending lethal damage so stun and death visuals can be
//! sequenced before health reaches zero. This is an intentional two-phase
//! commit for kills inside an area effect, not a general damage path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use seidr_common::{lerp, EntityId, Vec2};

use crate::combatant::TargetStorage;

/// Targets closer to the center than this get a random knockback direction.
const CENTER_EPSILON: f32 = 0.1;

/// Monotonic closeness-to-strength curve on `[0, 1]`.
///
/// Replaces the hand-authored animation curves of the original content with
/// a closed set that satisfies the boundary convention: `evaluate(0) = 0`
/// (edge, minimum tier) and `evaluate(1) = 1` (center, maximum tier), with
/// [`FalloffCurve::Flat`] as the no-falloff escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffCurve {
    /// Straight line from edge to center.
    Linear,
    /// Smoothstep ease-in-out from edge to center.
    Smooth,
    /// Constant maximum tier everywhere inside the radius.
    Flat,
}

impl FalloffCurve {
    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => t * t * (3.0 - 2.0 * t),
            Self::Flat => 1.0,
        }
    }
}

impl Default for FalloffCurve {
    fn default() -> Self {
        Self::Linear
    }
}

/// Parameters for one radial strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialStrike {
    /// Effect radius in world units.
    pub radius: f32,
    /// Damage at the center.
    pub max_damage: f32,
    /// Damage at the edge.
    pub min_damage: f32,
    /// Knockback distance at the center.
    pub max_knockback: f32,
    /// Knockback distance at the edge.
    pub min_knockback: f32,
    /// Knockback travel speed in units per second.
    pub knockback_speed: f32,
    /// Stun duration at the center.
    pub max_stun: f32,
    /// Stun duration at the edge.
    pub min_stun: f32,
    /// Symmetric damage variation as a fraction of the rolled damage.
    pub damage_variation: f32,
    /// Symmetric knockback variation as a fraction of the rolled distance.
    pub knockback_variation: f32,
    /// Curve shaping damage from edge to center.
    pub damage_falloff: FalloffCurve,
    /// Curve shaping knockback from edge to center.
    pub knockback_falloff: FalloffCurve,
    /// Curve shaping stun from edge to center.
    pub stun_falloff: FalloffCurve,
}

impl Default for RadialStrike {
    fn default() -> Self {
        Self {
            radius: 5.0,
            max_damage: 0.0,
            min_damage: 0.0,
            max_knockback: 0.0,
            min_knockback: 0.0,
            knockback_speed: 15.0,
            max_stun: 0.0,
            min_stun: 0.0,
            damage_variation: 0.0,
            knockback_variation: 0.0,
            damage_falloff: FalloffCurve::Smooth,
            knockback_falloff: FalloffCurve::Smooth,
            stun_falloff: FalloffCurve::Smooth,
        }
    }
}

impl RadialStrike {
    /// Creates a strike with the given radius and no damage, knockback or
    /// stun configured.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    /// Sets the edge and center damage.
    #[must_use]
    pub fn with_damage(mut self, min: f32, max: f32) -> Self {
        self.min_damage = min;
        self.max_damage = max;
        self
    }

    /// Sets the edge and center knockback distance and the travel speed.
    #[must_use]
    pub fn with_knockback(mut self, min: f32, max: f32, speed: f32) -> Self {
        self.min_knockback = min;
        self.max_knockback = max;
        self.knockback_speed = speed;
        self
    }

    /// Sets the edge and center stun duration.
    #[must_use]
    pub fn with_stun(mut self, min: f32, max: f32) -> Self {
        self.min_stun = min;
        self.max_stun = max;
        self
    }

    /// Sets the damage and knockback variation fractions.
    #[must_use]
    pub fn with_variation(mut self, damage: f32, knockback: f32) -> Self {
        self.damage_variation = damage;
        self.knockback_variation = knockback;
        self
    }

    /// Sets all three falloff curves at once.
    #[must_use]
    pub fn with_falloff(
        mut self,
        damage: FalloffCurve,
        knockback: FalloffCurve,
        stun: FalloffCurve,
    ) -> Self {
        self.damage_falloff = damage;
        self.knockback_falloff = knockback;
        self.stun_falloff = stun;
        self
    }
}

/// Knockback motion parameters computed for one hit target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockbackImpulse {
    /// Normalized push direction.
    pub direction: Vec2,
    /// Distance the push should cover.
    pub distance: f32,
    /// Travel speed in units per second.
    pub speed: f32,
}

/// Outcome of a radial strike for one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialHit {
    /// The target hit.
    pub target: EntityId,
    /// Damage rolled (applied, or registered as pending when lethal).
    pub damage: f32,
    /// Stun duration applied.
    pub stun: f32,
    /// Whether the damage was registered as pending lethal damage.
    pub lethal: bool,
    /// Knockback to perform, when the target survived the hit.
    pub knockback: Option<KnockbackImpulse>,
}

/// Resolves radial strikes against target storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialResolver {
    /// Random state for variation rolls
    rng_state: u64,
}

impl Default for RadialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RadialResolver {
    /// Creates a resolver with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self { rng_state: 12345 }
    }

    /// Creates a resolver with an explicit seed (for reproducible tests).
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng_state: seed.max(1),
        }
    }

    /// Generates a pseudo-random value in `[0, 1)`.
    fn next_random(&mut self) -> f32 {
        // Simple xorshift
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;
        (self.rng_state as f32) / (u64::MAX as f32)
    }

    /// Generates a pseudo-random value in `[min, max)`.
    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_random()
    }

    /// Generates a uniformly random unit direction.
    fn random_direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.next_random() * std::f32::consts::TAU)
    }

    /// Applies a radial strike around `center`, pushing targets away from
    /// it. Returns the per-target outcomes.
    pub fn apply_radial<T: TargetStorage>(
        &mut self,
        center: Vec2,
        strike: &RadialStrike,
        targets: &mut T,
    ) -> Vec<RadialHit> {
        self.apply(center, strike, None, targets)
    }

    /// Applies a strike that pushes every target along one forced
    /// direction instead of radially.
    pub fn apply_directional<T: TargetStorage>(
        &mut self,
        center: Vec2,
        direction: Vec2,
        strike: &RadialStrike,
        targets: &mut T,
    ) -> Vec<RadialHit> {
        self.apply(center, strike, Some(direction.normalized()), targets)
    }

    fn apply<T: TargetStorage>(
        &mut self,
        center: Vec2,
        strike: &RadialStrike,
        forced_direction: Option<Vec2>,
        targets: &mut T,
    ) -> Vec<RadialHit> {
        let mut hits = Vec::new();
        if strike.radius <= 0.0 {
            return hits;
        }

        for id in targets.targets_within(center, strike.radius) {
            let Some(target) = targets.target_mut(id) else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }

            let distance = center.distance(target.position());
            let normalized = distance / strike.radius;
            if normalized > 1.0 {
                continue;
            }
            let closeness = 1.0 - normalized;

            let mut damage = lerp(
                strike.min_damage,
                strike.max_damage,
                strike.damage_falloff.evaluate(closeness),
            );
            let variation = damage * strike.damage_variation;
            damage += self.random_range(-variation, variation);

            let stun = lerp(
                strike.min_stun,
                strike.max_stun,
                strike.stun_falloff.evaluate(closeness),
            );

            let knockback_distance = lerp(
                strike.min_knockback,
                strike.max_knockback,
                strike.knockback_falloff.evaluate(closeness),
            ) * (1.0 + self.random_range(-strike.knockback_variation, strike.knockback_variation));

            let direction = match forced_direction {
                Some(dir) => dir,
                None if distance < CENTER_EPSILON => self.random_direction(),
                None => (target.position() - center).normalized(),
            };

            let lethal = damage >= target.current_health();
            if lethal {
                // Deferred kill: stun still lands, health stays untouched
                // until the pending damage is applied.
                target.register_pending_lethal_damage(damage);
                target.take_damage(0.0, stun);
            } else {
                target.take_damage(damage, stun);
            }

            let knockback = if target.is_alive() && knockback_distance > 0.0 {
                Some(KnockbackImpulse {
                    direction,
                    distance: knockback_distance,
                    speed: strike.knockback_speed,
                })
            } else {
                None
            };

            debug!(?id, damage, stun, lethal, "radial hit");
            hits.push(RadialHit {
                target: id,
                damage,
                stun,
                lethal,
                knockback,
            });
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{MockTarget, MockTargetStorage};

    fn strike_no_variation() -> RadialStrike {
        RadialStrike::new(4.0)
            .with_damage(2.0, 10.0)
            .with_knockback(1.0, 5.0, 12.0)
            .with_stun(0.5, 2.0)
            .with_falloff(
                FalloffCurve::Linear,
                FalloffCurve::Linear,
                FalloffCurve::Linear,
            )
    }

    #[test]
    fn test_edge_target_gets_minimum_tier() {
        let mut storage = MockTargetStorage::new();
        let id = storage.add(MockTarget::new(Vec2::new(4.0, 0.0), 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike_no_variation(), &mut storage);

        assert_eq!(hits.len(), 1);
        let hit = hits[0];
        assert_eq!(hit.target, id);
        assert!((hit.damage - 2.0).abs() < 1e-5);
        assert!((hit.stun - 0.5).abs() < 1e-5);
        let kb = hit.knockback.expect("edge hit still knocks back");
        assert!((kb.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_target_gets_maximum_tier() {
        let mut storage = MockTargetStorage::new();
        storage.add(MockTarget::new(Vec2::ZERO, 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike_no_variation(), &mut storage);

        let hit = hits[0];
        assert!((hit.damage - 10.0).abs() < 1e-5);
        assert!((hit.stun - 2.0).abs() < 1e-5);
        let kb = hit.knockback.expect("center hit knocks back");
        assert!((kb.distance - 5.0).abs() < 1e-5);
        // Direction is random at the center but always unit length.
        assert!((kb.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_outside_radius_excluded() {
        let mut storage = MockTargetStorage::new();
        storage.add(MockTarget::new(Vec2::new(4.1, 0.0), 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike_no_variation(), &mut storage);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_radial_direction_points_away_from_center() {
        let mut storage = MockTargetStorage::new();
        let id = storage.add(MockTarget::new(Vec2::new(0.0, 2.0), 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike_no_variation(), &mut storage);

        let kb = hits[0].knockback.expect("knockback");
        assert!((kb.direction.y - 1.0).abs() < 1e-5);
        assert_eq!(hits[0].target, id);
    }

    #[test]
    fn test_forced_direction_overrides_radial() {
        let mut storage = MockTargetStorage::new();
        storage.add(MockTarget::new(Vec2::new(0.0, 2.0), 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_directional(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            &strike_no_variation(),
            &mut storage,
        );

        let kb = hits[0].knockback.expect("knockback");
        assert!((kb.direction.x - 1.0).abs() < 1e-5);
        assert!(kb.direction.y.abs() < 1e-5);
    }

    #[test]
    fn test_lethal_damage_is_deferred() {
        let mut storage = MockTargetStorage::new();
        let id = storage.add(MockTarget::new(Vec2::ZERO, 5.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike_no_variation(), &mut storage);

        assert!(hits[0].lethal);
        let target = storage.get(id);
        assert!(target.alive, "death deferred until pending damage applies");
        assert_eq!(target.health, 5.0);
        assert!(target.pending_lethal > 0.0);
        // The stun still landed alongside the deferral.
        assert_eq!(target.hits.len(), 1);
        assert_eq!(target.hits[0].0, 0.0);
        assert!(target.hits[0].1 > 0.0);

        storage
            .target_mut(id)
            .expect("target")
            .apply_pending_lethal_damage();
        let target = storage.get(id);
        assert!(!target.alive);
        assert_eq!(target.health, 0.0);
    }

    #[test]
    fn test_damage_variation_bounds() {
        let strike = strike_no_variation().with_variation(0.5, 0.0);
        let mut resolver = RadialResolver::with_seed(99);

        for _ in 0..50 {
            let mut storage = MockTargetStorage::new();
            let id = storage.add(MockTarget::new(Vec2::ZERO, 1000.0));
            let hits = resolver.apply_radial(Vec2::ZERO, &strike, &mut storage);
            let damage = hits[0].damage;
            assert!((5.0..=15.0).contains(&damage), "damage {damage} out of band");
            assert_eq!(storage.get(id).hits[0].0, damage);
        }
    }

    #[test]
    fn test_flat_falloff_ignores_distance() {
        let strike = RadialStrike::new(4.0).with_stun(0.5, 2.0).with_falloff(
            FalloffCurve::Flat,
            FalloffCurve::Flat,
            FalloffCurve::Flat,
        );

        let mut storage = MockTargetStorage::new();
        storage.add(MockTarget::new(Vec2::new(4.0, 0.0), 100.0));

        let mut resolver = RadialResolver::with_seed(7);
        let hits = resolver.apply_radial(Vec2::ZERO, &strike, &mut storage);
        assert!((hits[0].stun - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_curve_boundaries() {
        for curve in [FalloffCurve::Linear, FalloffCurve::Smooth] {
            assert_eq!(curve.evaluate(0.0), 0.0);
            assert_eq!(curve.evaluate(1.0), 1.0);
            assert!(curve.evaluate(0.5) > 0.0);
        }
        assert_eq!(FalloffCurve::Flat.evaluate(0.0), 1.0);
        // Clamped outside the unit interval.
        assert_eq!(FalloffCurve::Linear.evaluate(-1.0), 0.0);
        assert_eq!(FalloffCurve::Linear.evaluate(2.0), 1.0);
    }
}
