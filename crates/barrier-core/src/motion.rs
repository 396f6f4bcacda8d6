//! Visual rotation of the barrier arm during a transition.
//!
//! The angle is feedback only. Authoritative state is always
//! [`crate::barrier::BarrierStatus`].

use serde::{Deserialize, Serialize};

/// How the arm moves while a transition is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionStrategy {
    /// Angle is interpolated every frame with [`ease_in_out`].
    #[default]
    Continuous,
    /// Angle stays put and jumps to the target on completion.
    Discrete,
}

/// Quadratic ease-in up to the midpoint, cubic ease-out after it.
///
/// Input is clamped to `0.0..=1.0`.
pub fn ease_in_out(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// Start and target angle of one transition, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmMotion {
    pub strategy: MotionStrategy,
    pub from_deg: f64,
    pub to_deg: f64,
}

impl ArmMotion {
    pub fn angle_at(&self, progress: f64) -> f64 {
        match self.strategy {
            MotionStrategy::Continuous => {
                self.from_deg + (self.to_deg - self.from_deg) * ease_in_out(progress)
            }
            MotionStrategy::Discrete => {
                if progress >= 1.0 {
                    self.to_deg
                } else {
                    self.from_deg
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_enough(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert!(close_enough(ease_in_out(0.0), 0.0));
        assert!(close_enough(ease_in_out(0.5), 0.5));
        assert!(close_enough(ease_in_out(1.0), 1.0));
        assert!(close_enough(ease_in_out(0.25), 0.125));
        assert!(close_enough(ease_in_out(0.75), 0.9375));
    }

    #[test]
    fn easing_clamps_out_of_range() {
        assert!(close_enough(ease_in_out(-3.0), 0.0));
        assert!(close_enough(ease_in_out(4.0), 1.0));
    }

    #[test]
    fn easing_is_monotonic() {
        let samples: Vec<f64> = (0..=100).map(|i| ease_in_out(i as f64 / 100.0)).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn continuous_motion_interpolates() {
        let motion = ArmMotion {
            strategy: MotionStrategy::Continuous,
            from_deg: 0.0,
            to_deg: -90.0,
        };
        assert!(close_enough(motion.angle_at(0.0), 0.0));
        assert!(close_enough(motion.angle_at(0.5), -45.0));
        assert!(close_enough(motion.angle_at(1.0), -90.0));
    }

    #[test]
    fn discrete_motion_jumps_on_completion() {
        let motion = ArmMotion {
            strategy: MotionStrategy::Discrete,
            from_deg: -90.0,
            to_deg: 0.0,
        };
        assert!(close_enough(motion.angle_at(0.99), -90.0));
        assert!(close_enough(motion.angle_at(1.0), 0.0));
    }
}
