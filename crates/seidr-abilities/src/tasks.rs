//! Resumable multi-frame effect tasks.
//!
//! Effects that span many ticks are explicit task records driven by the
//! frame and fixed ticks, not coroutines: each task stores its phase and
//! elapsed time plus the values it captured at start. A task that owns the
//! caster's movement lock restores the value it captured, never an
//! unconditional `false`, so it composes with pre-existing locks.
//!
//! Tasks are fire-and-forget; the one exception is the trail sub-task,
//! which its parent holds a [`TaskHandle`] for and cancels explicitly when
//! the parent's motion ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use seidr_common::Vec2;

use crate::clock::RechargeClock;
use crate::combatant::{Caster, EffectRequest, EffectSpawner};

/// Seconds between trail spawns while dashing.
const TRAIL_SPAWN_INTERVAL: f32 = 0.05;
/// Time-freeze ramp-in duration.
const FREEZE_ENTRY_DURATION: f32 = 0.1;
/// Time-freeze ramp-out duration.
const FREEZE_EXIT_DURATION: f32 = 0.5;

/// Handle to a spawned task, used only for explicit cancellation of
/// auxiliary sub-tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(u64);

/// Phase of a dash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum DashPhase {
    /// Forced motion along the dash direction.
    Dashing,
    /// Post-dash hold before the task finishes.
    Recovering,
}

/// Forced-movement dash: locks movement, drives the caster at a constant
/// velocity for `distance / speed` seconds, then restores the previous
/// lock state and idles through a short recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashTask {
    direction: Vec2,
    speed: f32,
    dash_time: f32,
    recovery: f32,
    elapsed: f32,
    phase: DashPhase,
    restore_lock: bool,
    trail: Option<TaskHandle>,
}

impl DashTask {
    /// Starts a dash: captures the caster's current movement-lock value and
    /// locks movement. The caller is expected to have spawned the trail
    /// sub-task and pass its handle here.
    #[must_use]
    pub fn begin<C: Caster>(
        caster: &mut C,
        direction: Vec2,
        speed: f32,
        distance: f32,
        recovery: f32,
        trail: Option<TaskHandle>,
    ) -> Self {
        let restore_lock = caster.movement_locked();
        caster.set_movement_locked(true);

        let dash_time = if speed > 0.0 { distance / speed } else { 0.0 };
        Self {
            direction: direction.normalized(),
            speed,
            dash_time,
            recovery,
            elapsed: 0.0,
            phase: DashPhase::Dashing,
            restore_lock,
            trail,
        }
    }

    /// Advances the dash by one fixed step. Returns the trail handle to
    /// cancel when the motion just ended, and whether the task is done.
    fn fixed_tick<C: Caster>(&mut self, dt: f32, caster: &mut C) -> (Option<TaskHandle>, bool) {
        match self.phase {
            DashPhase::Dashing => {
                if caster.is_alive() && self.elapsed < self.dash_time {
                    caster.set_velocity(self.direction.scale(self.speed));
                    self.elapsed += dt;
                    if self.elapsed < self.dash_time {
                        return (None, false);
                    }
                }
                // Motion over (or caster died): stop, hand the lock back.
                caster.set_velocity(Vec2::ZERO);
                caster.set_movement_locked(self.restore_lock);
                self.phase = DashPhase::Recovering;
                self.elapsed = 0.0;
                let trail = self.trail.take();
                (trail, self.recovery <= 0.0 || !caster.is_alive())
            },
            DashPhase::Recovering => {
                self.elapsed += dt;
                (None, self.elapsed >= self.recovery)
            },
        }
    }
}

/// Phase of a time freeze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum FreezePhase {
    /// Time scale ramping down.
    Entry,
    /// Holding the frozen time scale.
    Hold,
    /// Time scale ramping back up.
    Exit,
}

/// Global slow-time effect with entry/hold/exit phases.
///
/// While active, the world time scale it reports ramps `1 -> intensity`,
/// holds, then ramps back; the recharge clock runs on unscaled time times
/// a recovery multiplier for the whole duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFreezeTask {
    intensity: f32,
    hold_duration: f32,
    recharge_multiplier: f32,
    phase: FreezePhase,
    elapsed: f32,
}

impl TimeFreezeTask {
    /// Starts a freeze: `duration` is the total effect length,
    /// `intensity` the held time scale, `recovery` the 0..1 factor lifting
    /// the recharge multiplier from `intensity` toward full speed.
    #[must_use]
    pub fn begin(clock: &mut RechargeClock, duration: f32, intensity: f32, recovery: f32) -> Self {
        let recharge_multiplier =
            seidr_common::lerp(intensity, 1.0, recovery.clamp(0.0, 1.0));
        clock.begin_freeze(recharge_multiplier);

        let hold_duration =
            (duration - FREEZE_ENTRY_DURATION - FREEZE_EXIT_DURATION).max(0.0);
        Self {
            intensity,
            hold_duration,
            recharge_multiplier,
            phase: FreezePhase::Entry,
            elapsed: 0.0,
        }
    }

    /// Recharge multiplier this freeze holds on the clock.
    #[must_use]
    pub fn recharge_multiplier(&self) -> f32 {
        self.recharge_multiplier
    }

    /// World time scale this freeze currently asks for.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        match self.phase {
            FreezePhase::Entry => {
                let progress = (self.elapsed / FREEZE_ENTRY_DURATION).clamp(0.0, 1.0);
                seidr_common::lerp(1.0, self.intensity, progress)
            },
            FreezePhase::Hold => self.intensity,
            FreezePhase::Exit => {
                let progress = (self.elapsed / FREEZE_EXIT_DURATION).clamp(0.0, 1.0);
                seidr_common::lerp(self.intensity, 1.0, progress)
            },
        }
    }

    /// Advances by one frame of unscaled time. Returns true when done.
    fn frame_tick(&mut self, dt_unscaled: f32, clock: &mut RechargeClock, alive: bool) -> bool {
        if !alive {
            clock.end_freeze();
            return true;
        }

        self.elapsed += dt_unscaled;
        match self.phase {
            FreezePhase::Entry => {
                if self.elapsed >= FREEZE_ENTRY_DURATION {
                    self.phase = FreezePhase::Hold;
                    self.elapsed = 0.0;
                }
                false
            },
            FreezePhase::Hold => {
                if self.elapsed >= self.hold_duration {
                    self.phase = FreezePhase::Exit;
                    self.elapsed = 0.0;
                }
                false
            },
            FreezePhase::Exit => {
                if self.elapsed >= FREEZE_EXIT_DURATION {
                    clock.end_freeze();
                    return true;
                }
                false
            },
        }
    }
}

/// Periodic trail spawner running while its parent task is active.
///
/// Runs until explicitly cancelled through the handle its parent holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailTask {
    effect_key: String,
    color: [f32; 4],
    since_spawn: f32,
}

impl TrailTask {
    /// Creates a trail that spawns `effect_key` every spawn interval.
    #[must_use]
    pub fn new(effect_key: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            effect_key: effect_key.into(),
            color,
            since_spawn: TRAIL_SPAWN_INTERVAL,
        }
    }

    fn frame_tick<C: Caster, E: EffectSpawner>(&mut self, dt: f32, caster: &C, effects: &mut E) {
        self.since_spawn += dt;
        while self.since_spawn >= TRAIL_SPAWN_INTERVAL {
            self.since_spawn -= TRAIL_SPAWN_INTERVAL;
            effects.spawn(
                EffectRequest::new(self.effect_key.clone(), caster.position())
                    .with_color(self.color),
            );
        }
    }
}

/// A task in the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectTask {
    /// Forced-movement dash (fixed tick).
    Dash(DashTask),
    /// Global slow-time effect (frame tick, unscaled).
    TimeFreeze(TimeFreezeTask),
    /// Auxiliary trail spawner (frame tick, cancelled by its parent).
    Trail(TrailTask),
}

/// Owns and drives all in-flight effect tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTasks {
    next_handle: u64,
    tasks: Vec<(TaskHandle, EffectTask)>,
}

impl EffectTasks {
    /// Empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether a time freeze is currently running.
    #[must_use]
    pub fn freezing(&self) -> bool {
        self.tasks
            .iter()
            .any(|(_, t)| matches!(t, EffectTask::TimeFreeze(_)))
    }

    /// World time scale requested by the active freeze, 1.0 otherwise.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.tasks
            .iter()
            .find_map(|(_, t)| match t {
                EffectTask::TimeFreeze(freeze) => Some(freeze.time_scale()),
                _ => None,
            })
            .unwrap_or(1.0)
    }

    /// Adds a task and returns its handle.
    pub fn spawn(&mut self, task: EffectTask) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push((handle, task));
        handle
    }

    /// Cancels a task by handle (used for auxiliary sub-tasks).
    pub fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|(h, _)| *h != handle);
    }

    /// Advances frame-driven tasks (freeze phases, trails).
    pub fn frame_tick<C: Caster, E: EffectSpawner>(
        &mut self,
        dt_unscaled: f32,
        caster: &C,
        clock: &mut RechargeClock,
        effects: &mut E,
    ) {
        let mut done = Vec::new();
        for (handle, task) in &mut self.tasks {
            match task {
                EffectTask::TimeFreeze(freeze) => {
                    if freeze.frame_tick(dt_unscaled, clock, caster.is_alive()) {
                        debug!("time freeze ended");
                        done.push(*handle);
                    }
                },
                EffectTask::Trail(trail) => {
                    trail.frame_tick(dt_unscaled, caster, effects);
                },
                EffectTask::Dash(_) => {},
            }
        }
        self.tasks.retain(|(h, _)| !done.contains(h));
    }

    /// Advances fixed-tick tasks (dash motion).
    pub fn fixed_tick<C: Caster>(&mut self, dt: f32, caster: &mut C) {
        let mut done = Vec::new();
        let mut cancelled = Vec::new();

        for (handle, task) in &mut self.tasks {
            if let EffectTask::Dash(dash) = task {
                let (trail, finished) = dash.fixed_tick(dt, caster);
                if let Some(trail) = trail {
                    cancelled.push(trail);
                }
                if finished {
                    done.push(*handle);
                }
            }
        }

        self.tasks
            .retain(|(h, _)| !done.contains(h) && !cancelled.contains(h));
    }
}
