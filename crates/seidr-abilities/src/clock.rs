//! Recharge time source.
//!
//! Charge regeneration must not sample a raw clock: the host loop hands the
//! engine both the scaled and unscaled frame deltas, and the pause/freeze
//! rules are applied here exactly once. Every equipped slot then consumes
//! the same effective delta, so a global pause or time-freeze behaves
//! identically for all abilities.

use serde::{Deserialize, Serialize};

/// Raw per-frame time deltas supplied by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameDelta {
    /// Delta with the global time scale applied (0 while paused).
    pub scaled: f32,
    /// Wall-clock delta, unaffected by time scale.
    pub unscaled: f32,
}

impl FrameDelta {
    /// Creates a frame delta.
    #[must_use]
    pub const fn new(scaled: f32, unscaled: f32) -> Self {
        Self { scaled, unscaled }
    }

    /// A delta where scaled and unscaled time agree (no slow-motion).
    #[must_use]
    pub const fn uniform(dt: f32) -> Self {
        Self {
            scaled: dt,
            unscaled: dt,
        }
    }
}

/// Accumulating clock that charge-regen deadlines are scheduled against.
///
/// The effective recharge delta per frame is:
/// - `0` while the game is paused,
/// - `unscaled * recharge multiplier` while a time-freeze effect is held
///   (abilities keep recharging at a reduced rate even though the world is
///   nearly stopped),
/// - the scaled frame delta otherwise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RechargeClock {
    now: f64,
    paused: bool,
    freeze_multiplier: Option<f32>,
}

impl RechargeClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated recharge time in seconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Sets the global pause flag.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether the clock is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Enters the time-freeze regime with the given recharge multiplier.
    pub fn begin_freeze(&mut self, recharge_multiplier: f32) {
        self.freeze_multiplier = Some(recharge_multiplier.clamp(0.0, 1.0));
    }

    /// Leaves the time-freeze regime.
    pub fn end_freeze(&mut self) {
        self.freeze_multiplier = None;
    }

    /// Whether a time-freeze effect currently shapes the recharge delta.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.freeze_multiplier.is_some()
    }

    /// Computes this frame's effective recharge delta, advances the clock
    /// by it, and returns it.
    pub fn advance(&mut self, frame: FrameDelta) -> f32 {
        let delta = if self.paused {
            0.0
        } else if let Some(multiplier) = self.freeze_multiplier {
            frame.unscaled * multiplier
        } else {
            frame.scaled
        };

        self.now += f64::from(delta);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_advance_uses_scaled_delta() {
        let mut clock = RechargeClock::new();
        let delta = clock.advance(FrameDelta::new(0.016, 0.032));
        assert!((delta - 0.016).abs() < 1e-6);
        assert!((clock.now() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_pause_zeroes_delta() {
        let mut clock = RechargeClock::new();
        clock.set_paused(true);
        let delta = clock.advance(FrameDelta::uniform(0.5));
        assert_eq!(delta, 0.0);
        assert_eq!(clock.now(), 0.0);

        clock.set_paused(false);
        clock.advance(FrameDelta::uniform(0.5));
        assert!((clock.now() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_freeze_uses_unscaled_delta_with_multiplier() {
        let mut clock = RechargeClock::new();
        clock.begin_freeze(0.25);
        assert!(clock.is_frozen());

        // World nearly stopped (scaled ~ 0) but recharge continues at a
        // quarter of wall-clock rate.
        let delta = clock.advance(FrameDelta::new(0.0008, 0.016));
        assert!((delta - 0.004).abs() < 1e-6);

        clock.end_freeze();
        assert!(!clock.is_frozen());
        let delta = clock.advance(FrameDelta::new(0.016, 0.016));
        assert!((delta - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_pause_wins_over_freeze() {
        let mut clock = RechargeClock::new();
        clock.begin_freeze(0.5);
        clock.set_paused(true);
        assert_eq!(clock.advance(FrameDelta::uniform(1.0)), 0.0);
    }

    #[test]
    fn test_freeze_multiplier_clamped() {
        let mut clock = RechargeClock::new();
        clock.begin_freeze(4.0);
        let delta = clock.advance(FrameDelta::new(0.0, 1.0));
        assert!((delta - 1.0).abs() < 1e-6);
    }
}
