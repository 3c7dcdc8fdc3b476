//! Capability traits implemented by collaborators.
//!
//! The engine never owns entities, cameras or audio; it talks to them
//! through these seams. Hosts implement the traits over their own entity
//! storage; tests use the mock implementations at the bottom of this
//! module.

use seidr_common::{EntityId, Vec2};

/// The entity casting abilities.
pub trait Caster {
    /// Whether the caster is alive.
    fn is_alive(&self) -> bool;

    /// Whether the caster currently has damage immunity.
    fn is_invincible(&self) -> bool;

    /// World position.
    fn position(&self) -> Vec2;

    /// Locks or unlocks normal movement input.
    fn set_movement_locked(&mut self, locked: bool);

    /// Current movement-lock state.
    fn movement_locked(&self) -> bool;

    /// Overrides the caster's velocity (used by forced-movement effects).
    fn set_velocity(&mut self, velocity: Vec2);

    /// Applies an immediate health change; positive heals, negative harms.
    fn apply_immediate_health_delta(&mut self, amount: f32);
}

/// An entity that area effects can damage, stun and push around.
pub trait Damageable {
    /// Stable identifier, used to key per-target motion tasks.
    fn entity_id(&self) -> EntityId;

    /// World position.
    fn position(&self) -> Vec2;

    /// Moves the entity (forced motion bypassing its own movement).
    fn set_position(&mut self, position: Vec2);

    /// Whether the entity is alive.
    fn is_alive(&self) -> bool;

    /// Current health.
    fn current_health(&self) -> f32;

    /// Applies damage and an optional stun in one call.
    fn take_damage(&mut self, amount: f32, stun_duration: f32);

    /// Records damage known to be fatal without applying it yet, so death
    /// visuals can be sequenced after stun/knockback.
    fn register_pending_lethal_damage(&mut self, amount: f32);

    /// Commits previously registered lethal damage: health drops to zero
    /// and the entity dies.
    fn apply_pending_lethal_damage(&mut self);

    /// Normal movement speed.
    fn move_speed(&self) -> f32;

    /// Overrides normal movement speed (0 suppresses movement).
    fn set_move_speed(&mut self, speed: f32);
}

/// Lookup and spatial query over damageable entities.
///
/// The radius query is the collaborator's collision system; the engine
/// only filters by exact distance afterwards.
pub trait TargetStorage {
    /// IDs of live targets within `radius` of `center`.
    fn targets_within(&self, center: Vec2, radius: f32) -> Vec<EntityId>;

    /// Gets a target by ID.
    fn target(&self, id: EntityId) -> Option<&dyn Damageable>;

    /// Gets a mutable target by ID.
    fn target_mut(&mut self, id: EntityId) -> Option<&mut dyn Damageable>;
}

/// Maps the pointer to a world position (owned by a camera collaborator).
pub trait PointerToWorld {
    /// World position under the pointer.
    fn pointer_world_position(&self) -> Vec2;
}

/// A fire-and-forget visual or audio trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
    /// Asset key, e.g. `"abilities/hammer_slam/shockwave"`.
    pub key: String,
    /// Spawn position.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Tint colour.
    pub color: [f32; 4],
}

impl EffectRequest {
    /// Creates a request at a position with default rotation, scale and
    /// colour.
    #[must_use]
    pub fn new(key: impl Into<String>, position: Vec2) -> Self {
        Self {
            key: key.into(),
            position,
            rotation: 0.0,
            scale: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Sets the rotation.
    #[must_use]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the tint colour.
    #[must_use]
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// Sink for visual/audio triggers. The engine never reads anything back.
pub trait EffectSpawner {
    /// Spawns a visual or audio effect.
    fn spawn(&mut self, request: EffectRequest);
}

/// Mock caster for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockCaster {
    /// Alive flag.
    pub alive: bool,
    /// Invincibility flag.
    pub invincible: bool,
    /// World position.
    pub position: Vec2,
    /// Movement-lock flag.
    pub movement_locked: bool,
    /// Last velocity override.
    pub velocity: Vec2,
    /// Current health.
    pub health: f32,
}

#[cfg(test)]
impl MockCaster {
    /// A live caster at the origin.
    pub fn new() -> Self {
        Self {
            alive: true,
            invincible: false,
            position: Vec2::ZERO,
            movement_locked: false,
            velocity: Vec2::ZERO,
            health: 100.0,
        }
    }
}

#[cfg(test)]
impl Caster for MockCaster {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_invincible(&self) -> bool {
        self.invincible
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_movement_locked(&mut self, locked: bool) {
        self.movement_locked = locked;
    }

    fn movement_locked(&self) -> bool {
        self.movement_locked
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_immediate_health_delta(&mut self, amount: f32) {
        self.health += amount;
    }
}

/// Mock damageable target for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockTarget {
    /// Entity ID.
    pub id: EntityId,
    /// World position.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Alive flag.
    pub alive: bool,
    /// Pending lethal damage, if registered.
    pub pending_lethal: f32,
    /// Normal movement speed.
    pub speed: f32,
    /// Damage events received as `(amount, stun)`.
    pub hits: Vec<(f32, f32)>,
}

#[cfg(test)]
impl MockTarget {
    /// A live target at a position.
    pub fn new(position: Vec2, health: f32) -> Self {
        Self {
            id: EntityId::new(),
            position,
            health,
            alive: true,
            pending_lethal: 0.0,
            speed: 2.0,
            hits: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Damageable for MockTarget {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn current_health(&self) -> f32 {
        self.health
    }

    fn take_damage(&mut self, amount: f32, stun_duration: f32) {
        if !self.alive {
            return;
        }
        self.hits.push((amount, stun_duration));
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
        }
    }

    fn register_pending_lethal_damage(&mut self, amount: f32) {
        self.pending_lethal = amount;
    }

    fn apply_pending_lethal_damage(&mut self) {
        if self.alive && self.pending_lethal > 0.0 {
            self.health = 0.0;
            self.pending_lethal = 0.0;
            self.alive = false;
        }
    }

    fn move_speed(&self) -> f32 {
        self.speed
    }

    fn set_move_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

/// Mock target storage backed by a vector.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockTargetStorage {
    /// Stored targets.
    pub targets: Vec<MockTarget>,
}

#[cfg(test)]
impl MockTargetStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target and returns its ID.
    pub fn add(&mut self, target: MockTarget) -> EntityId {
        let id = target.id;
        self.targets.push(target);
        id
    }

    /// Convenience lookup for assertions.
    pub fn get(&self, id: EntityId) -> &MockTarget {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| panic!("no target {id:?}"))
    }
}

#[cfg(test)]
impl TargetStorage for MockTargetStorage {
    fn targets_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.targets
            .iter()
            .filter(|t| t.alive && t.position.distance(center) <= radius)
            .map(|t| t.id)
            .collect()
    }

    fn target(&self, id: EntityId) -> Option<&dyn Damageable> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .map(|t| t as &dyn Damageable)
    }

    fn target_mut(&mut self, id: EntityId) -> Option<&mut dyn Damageable> {
        self.targets
            .iter_mut()
            .find(|t| t.id == id)
            .map(|t| t as &mut dyn Damageable)
    }
}

/// Mock pointer that reports a fixed world position.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct MockPointer(pub Vec2);

#[cfg(test)]
impl PointerToWorld for MockPointer {
    fn pointer_world_position(&self) -> Vec2 {
        self.0
    }
}

/// Effect spawner that records every request.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingSpawner {
    /// Requests received, in order.
    pub spawned: Vec<EffectRequest>,
}

#[cfg(test)]
impl RecordingSpawner {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any request used the given asset key.
    pub fn contains(&self, key: &str) -> bool {
        self.spawned.iter().any(|r| r.key == key)
    }
}

#[cfg(test)]
impl EffectSpawner for RecordingSpawner {
    fn spawn(&mut self, request: EffectRequest) {
        self.spawned.push(request);
    }
}
