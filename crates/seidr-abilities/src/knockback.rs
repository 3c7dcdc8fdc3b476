//! Knockback motion resolution.
//!
//! Each pushed target gets its own task: normal movement is suppressed for
//! the push, an initial velocity sized to cover the computed distance is
//! applied, the velocity decays linearly to zero over the push, and the
//! original move speed is restored at the end. Tasks are driven from the
//! fixed physics tick and cancel themselves when their target dies.

use serde::{Deserialize, Serialize};

use seidr_common::{EntityId, Vec2};

use crate::combatant::TargetStorage;
use crate::radial::KnockbackImpulse;

/// A single in-flight knockback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockbackTask {
    /// Target being pushed.
    pub target: EntityId,
    /// Normalized push direction.
    pub direction: Vec2,
    /// Initial velocity magnitude.
    initial_speed: f32,
    /// Total push duration.
    duration: f32,
    /// Time spent so far.
    elapsed: f32,
    /// Move speed to restore when the push ends.
    restore_speed: f32,
}

impl KnockbackTask {
    /// Creates a task from an impulse. Duration is `distance / speed`; the
    /// initial velocity is sized so that a linear decay to zero covers the
    /// requested distance.
    #[must_use]
    pub fn new(target: EntityId, impulse: KnockbackImpulse, restore_speed: f32) -> Self {
        let duration = if impulse.speed > 0.0 {
            impulse.distance / impulse.speed
        } else {
            0.0
        };
        Self::with_duration(target, impulse, restore_speed, duration)
    }

    /// Creates a task with an explicit duration instead of the derived one.
    #[must_use]
    pub fn with_duration(
        target: EntityId,
        impulse: KnockbackImpulse,
        restore_speed: f32,
        duration: f32,
    ) -> Self {
        let initial_speed = if duration > 0.0 {
            // Linear decay from v0 to 0 integrates to v0 * duration / 2.
            2.0 * impulse.distance / duration
        } else {
            0.0
        };
        Self {
            target,
            direction: impulse.direction.normalized(),
            initial_speed,
            duration,
            elapsed: 0.0,
            restore_speed,
        }
    }

    /// Remaining push time.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Whether the push has run its full duration.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current velocity magnitude after decay.
    fn current_speed(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let decay = 1.0 - (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.initial_speed * decay
    }
}

/// All in-flight knockbacks, ticked once per fixed physics step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnockbackTasks {
    tasks: Vec<KnockbackTask>,
}

impl KnockbackTasks {
    /// Empty task set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of targets currently being pushed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the given target is mid-push.
    #[must_use]
    pub fn is_pushing(&self, target: EntityId) -> bool {
        self.tasks.iter().any(|t| t.target == target)
    }

    /// Starts a knockback on a target: records its move speed, suppresses
    /// it, and queues the motion task.
    ///
    /// A second hit on a target already mid-push replaces the motion but
    /// keeps the originally recorded move speed, so the restore at the end
    /// never writes back the suppressed zero.
    pub fn spawn<T: TargetStorage>(
        &mut self,
        target_id: EntityId,
        impulse: KnockbackImpulse,
        targets: &mut T,
    ) {
        let Some(target) = targets.target_mut(target_id) else {
            return;
        };
        if !target.is_alive() {
            return;
        }

        let restore_speed = match self.tasks.iter().position(|t| t.target == target_id) {
            Some(index) => self.tasks.swap_remove(index).restore_speed,
            None => {
                let speed = target.move_speed();
                target.set_move_speed(0.0);
                speed
            },
        };

        self.tasks
            .push(KnockbackTask::new(target_id, impulse, restore_speed));
    }

    /// Advances every push by `dt` seconds of fixed-tick time.
    ///
    /// Finished pushes restore the target's move speed; pushes whose target
    /// died or disappeared are dropped without restoring anything.
    pub fn tick<T: TargetStorage>(&mut self, dt: f32, targets: &mut T) {
        let mut finished = Vec::new();

        for (index, task) in self.tasks.iter_mut().enumerate() {
            let Some(target) = targets.target_mut(task.target) else {
                finished.push((index, false));
                continue;
            };
            if !target.is_alive() {
                finished.push((index, false));
                continue;
            }

            task.elapsed += dt;
            let velocity = task.direction.scale(task.current_speed());
            target.set_position(target.position() + velocity.scale(dt));

            if task.finished() {
                finished.push((index, true));
            }
        }

        for (index, restore) in finished.into_iter().rev() {
            let task = self.tasks.swap_remove(index);
            if restore {
                if let Some(target) = targets.target_mut(task.target) {
                    if target.is_alive() {
                        target.set_move_speed(task.restore_speed);
                    }
                }
            }
        }
    }
}
