//! Session tuning shared by the world, systems, and adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EndMessages, EndVariant, Heading};

/// Closest distance the camera may approach the volume centre.
pub const MIN_CAMERA_DISTANCE: f32 = 10.0;

/// Furthest distance the camera may retreat from the volume centre.
pub const MAX_CAMERA_DISTANCE: f32 = 200.0;

/// Rule that selects the head's destination each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStrategy {
    /// The head travels along the current heading and wraps through the faces.
    DirectionalWrap,
    /// The head homes in on the nearest remaining target.
    NearestPursuit,
}

/// How segment positions approach their per-frame destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMotion {
    /// The head snaps to its destination and every follower inherits the
    /// position its predecessor held before the frame.
    Rigid,
    /// Every segment moves a `blend_factor` fraction toward its destination.
    Smoothed,
}

/// Tunables for a single session.
///
/// Every field has a default, so configuration files may specify any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Side length of the cubic volume.
    pub volume_side: f32,
    /// Number of segments composing the chain, including the head.
    pub segment_count: usize,
    /// Initial distance between consecutive segments.
    pub segment_spacing: f32,
    /// Number of targets spawned when the session starts.
    pub target_count: usize,
    /// Distance below which the head consumes a target.
    pub capture_radius: f32,
    /// Per-frame displacement magnitude at session start.
    pub initial_speed: f32,
    /// Factor applied to the speed for every captured target.
    pub speed_growth: f32,
    /// Score awarded for each captured target.
    pub points_per_capture: u32,
    /// Score at which the end sequence triggers.
    pub end_threshold: u32,
    /// Rule that selects the head destination.
    pub strategy: MovementStrategy,
    /// How segments approach their destinations.
    pub motion: ChainMotion,
    /// Interpolation weight used by [`ChainMotion::Smoothed`].
    pub blend_factor: f32,
    /// Whether segments report a facing direction.
    pub track_orientation: bool,
    /// Scales per-frame displacement by elapsed time relative to 60 frames per second.
    pub scale_by_elapsed: bool,
    /// Heading the chain starts with.
    pub initial_heading: Heading,
    /// Camera distance at session start.
    pub camera_distance: f32,
    /// Staging of the end sequence.
    pub end_variant: EndVariant,
    /// Text payloads displayed by the end sequence.
    pub messages: EndMessages,
    /// Seed for target placement; sessions draw from OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SessionConfig {
    /// Five rigid segments steered through wrapping faces, one point per capture.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            volume_side: 50.0,
            segment_count: 5,
            segment_spacing: 1.0,
            target_count: 100,
            capture_radius: 1.0,
            initial_speed: 0.1,
            speed_growth: 1.02,
            points_per_capture: 1,
            end_threshold: 100,
            strategy: MovementStrategy::DirectionalWrap,
            motion: ChainMotion::Rigid,
            blend_factor: 0.5,
            track_orientation: false,
            scale_by_elapsed: false,
            initial_heading: Heading::PositiveX,
            camera_distance: 80.0,
            end_variant: EndVariant::Rotating,
            messages: EndMessages::default(),
            seed: None,
        }
    }

    /// Twenty smoothed segments homing in on targets, ten points per capture.
    #[must_use]
    pub fn pursuit() -> Self {
        Self {
            segment_count: 20,
            points_per_capture: 10,
            end_threshold: 1_000,
            strategy: MovementStrategy::NearestPursuit,
            motion: ChainMotion::Smoothed,
            track_orientation: true,
            end_variant: EndVariant::GlitchFade,
            messages: EndMessages::two_line(),
            ..Self::classic()
        }
    }

    /// Checks every tunable for values the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.volume_side.is_finite() && self.volume_side > 0.0) {
            return Err(ConfigError::InvalidVolumeSide {
                side: self.volume_side,
            });
        }
        if self.segment_count == 0 {
            return Err(ConfigError::EmptyChain);
        }
        if !(self.segment_spacing.is_finite() && self.segment_spacing >= 0.0) {
            return Err(ConfigError::InvalidSpacing {
                spacing: self.segment_spacing,
            });
        }
        if !(self.capture_radius.is_finite() && self.capture_radius > 0.0) {
            return Err(ConfigError::InvalidCaptureRadius {
                radius: self.capture_radius,
            });
        }
        if !(self.initial_speed.is_finite() && self.initial_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed {
                speed: self.initial_speed,
            });
        }
        if !(self.speed_growth.is_finite() && self.speed_growth >= 1.0) {
            return Err(ConfigError::InvalidSpeedGrowth {
                growth: self.speed_growth,
            });
        }
        if !(self.blend_factor > 0.0 && self.blend_factor <= 1.0) {
            return Err(ConfigError::InvalidBlendFactor {
                blend: self.blend_factor,
            });
        }
        if self.points_per_capture == 0 {
            return Err(ConfigError::ZeroReward);
        }
        if self.end_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(())
    }

    /// Camera distance clamped to the supported range.
    #[must_use]
    pub fn clamped_camera_distance(&self) -> f32 {
        clamp_camera_distance(self.camera_distance)
    }
}

/// Clamps `distance` to `[MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE]`.
#[must_use]
pub fn clamp_camera_distance(distance: f32) -> f32 {
    if distance.is_nan() {
        return MIN_CAMERA_DISTANCE;
    }
    distance.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE)
}

/// Reasons a [`SessionConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The volume must have a positive, finite side.
    #[error("volume side must be positive and finite (received {side})")]
    InvalidVolumeSide {
        /// Rejected side length.
        side: f32,
    },
    /// The chain needs at least a head.
    #[error("chain must contain at least one segment")]
    EmptyChain,
    /// Segment spacing must be non-negative.
    #[error("segment spacing must be non-negative and finite (received {spacing})")]
    InvalidSpacing {
        /// Rejected spacing.
        spacing: f32,
    },
    /// The capture radius must be positive.
    #[error("capture radius must be positive and finite (received {radius})")]
    InvalidCaptureRadius {
        /// Rejected radius.
        radius: f32,
    },
    /// The starting speed must be positive.
    #[error("initial speed must be positive and finite (received {speed})")]
    InvalidSpeed {
        /// Rejected speed.
        speed: f32,
    },
    /// Speed may never shrink after a capture.
    #[error("speed growth must be at least 1.0 (received {growth})")]
    InvalidSpeedGrowth {
        /// Rejected growth factor.
        growth: f32,
    },
    /// Blend factors outside `(0, 1]` either freeze or overshoot the chain.
    #[error("blend factor must lie in (0, 1] (received {blend})")]
    InvalidBlendFactor {
        /// Rejected blend factor.
        blend: f32,
    },
    /// Captures must be worth something.
    #[error("points per capture must be positive")]
    ZeroReward,
    /// A zero threshold would trigger the end sequence before the first frame.
    #[error("end threshold must be positive")]
    ZeroThreshold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(SessionConfig::classic().validate(), Ok(()));
        assert_eq!(SessionConfig::pursuit().validate(), Ok(()));
    }

    #[test]
    fn rejects_blend_factor_outside_unit_interval() {
        let config = SessionConfig {
            blend_factor: 0.0,
            ..SessionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBlendFactor { blend: 0.0 })
        );

        let config = SessionConfig {
            blend_factor: 1.5,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_shrinking_speed() {
        let config = SessionConfig {
            speed_growth: 0.9,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeedGrowth { .. })
        ));
    }

    #[test]
    fn rejects_empty_chain_and_zero_threshold() {
        let config = SessionConfig {
            segment_count: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyChain));

        let config = SessionConfig {
            end_threshold: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroThreshold));
    }

    #[test]
    fn camera_distance_is_clamped() {
        let config = SessionConfig {
            camera_distance: 500.0,
            ..SessionConfig::default()
        };
        assert_eq!(config.clamped_camera_distance(), MAX_CAMERA_DISTANCE);
        assert_eq!(clamp_camera_distance(2.0), MIN_CAMERA_DISTANCE);
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = SessionConfig {
            seed: Some(7),
            ..SessionConfig::pursuit()
        };
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: SessionConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
