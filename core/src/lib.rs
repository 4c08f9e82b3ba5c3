#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cubesnake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;
mod ending;

use std::time::Duration;

pub use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use config::{
    clamp_camera_distance, ChainMotion, ConfigError, MovementStrategy, SessionConfig,
    MAX_CAMERA_DISTANCE, MIN_CAMERA_DISTANCE,
};
pub use ending::{EndCue, EndMessages, EndScript, EndStage, EndStep, EndVariant};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single frame.
    Tick {
        /// Wall-clock duration that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that the chain head adopt a new heading.
    SetHeading {
        /// Heading the chain should travel along from the next frame onward.
        heading: Heading,
    },
    /// Moves the camera closer to or further from the volume.
    Zoom {
        /// Signed change applied to the camera distance in world units.
        delta: f32,
    },
    /// Requests that the end sequence enter the provided stage.
    AdvanceEndSequence {
        /// Stage the end sequence should enter.
        stage: EndStage,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a simulation frame was executed.
    TimeAdvanced {
        /// Wall-clock duration covered by the frame.
        dt: Duration,
    },
    /// Confirms that the chain adopted a new heading.
    HeadingChanged {
        /// Heading that was active before the change.
        from: Heading,
        /// Heading that is active after the change.
        to: Heading,
    },
    /// Reports that a heading request was dropped because it shares the current axis.
    HeadingRejected {
        /// Heading that was requested.
        requested: Heading,
        /// Heading that remains active.
        current: Heading,
    },
    /// Reports the head position after the chain advanced for a frame.
    ChainAdvanced {
        /// Position of the head segment after the frame.
        head: Vec3,
    },
    /// Confirms that the chain head consumed a target.
    TargetCaptured {
        /// Identifier of the consumed target.
        target: TargetId,
        /// Position the target occupied before it was removed.
        position: Vec3,
    },
    /// Announces the score and speed after one or more captures in a frame.
    ScoreChanged {
        /// Total score after the frame's captures were counted.
        score: u32,
        /// Per-frame displacement magnitude after the frame's captures.
        speed: f32,
        /// Number of targets captured during the frame.
        captured: u32,
    },
    /// Announces that the end sequence entered a new stage.
    EndSequenceAdvanced {
        /// Stage that became active.
        stage: EndStage,
    },
    /// Reports the camera distance after a zoom request.
    CameraZoomed {
        /// Clamped camera distance in world units.
        distance: f32,
    },
}

/// Coordinate axis of the cubic volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Depth axis.
    Z,
}

impl Axis {
    /// Extracts the component of `vector` that lies along the axis.
    #[must_use]
    pub fn component(self, vector: Vec3) -> f32 {
        match self {
            Self::X => vector.x,
            Self::Y => vector.y,
            Self::Z => vector.z,
        }
    }
}

/// Axis-aligned unit heading the chain head travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    /// Travel toward increasing x.
    PositiveX,
    /// Travel toward decreasing x.
    NegativeX,
    /// Travel toward increasing y.
    PositiveY,
    /// Travel toward decreasing y.
    NegativeY,
    /// Travel toward increasing z.
    PositiveZ,
    /// Travel toward decreasing z.
    NegativeZ,
}

impl Heading {
    /// Axis along which the heading has its single nonzero component.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::PositiveX | Self::NegativeX => Axis::X,
            Self::PositiveY | Self::NegativeY => Axis::Y,
            Self::PositiveZ | Self::NegativeZ => Axis::Z,
        }
    }

    /// Heading pointing the opposite way along the same axis.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::PositiveX => Self::NegativeX,
            Self::NegativeX => Self::PositiveX,
            Self::PositiveY => Self::NegativeY,
            Self::NegativeY => Self::PositiveY,
            Self::PositiveZ => Self::NegativeZ,
            Self::NegativeZ => Self::PositiveZ,
        }
    }

    /// Unit-length vector pointing along the heading.
    #[must_use]
    pub const fn unit_vector(self) -> Vec3 {
        match self {
            Self::PositiveX => Vec3::X,
            Self::NegativeX => Vec3::NEG_X,
            Self::PositiveY => Vec3::Y,
            Self::NegativeY => Vec3::NEG_Y,
            Self::PositiveZ => Vec3::Z,
            Self::NegativeZ => Vec3::NEG_Z,
        }
    }

    /// Reports whether `other` has a nonzero component on this heading's axis.
    ///
    /// Colinear requests are never accepted as a new heading, which rules out
    /// instant reversal as well as redundant re-selection of the current axis.
    #[must_use]
    pub fn is_colinear_with(self, other: Heading) -> bool {
        self.axis() == other.axis()
    }
}

/// Closed vocabulary of directional input accepted at the adapter boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionCommand {
    /// Steer toward positive y.
    Up,
    /// Steer toward negative y.
    Down,
    /// Steer toward negative x.
    Left,
    /// Steer toward positive x.
    Right,
    /// Steer toward positive z.
    Forward,
    /// Steer toward negative z.
    Backward,
}

impl DirectionCommand {
    /// Every directional command in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Forward,
        Self::Backward,
    ];

    /// Heading requested by the command.
    #[must_use]
    pub const fn heading(self) -> Heading {
        match self {
            Self::Up => Heading::PositiveY,
            Self::Down => Heading::NegativeY,
            Self::Left => Heading::NegativeX,
            Self::Right => Heading::PositiveX,
            Self::Forward => Heading::PositiveZ,
            Self::Backward => Heading::NegativeZ,
        }
    }
}

/// Cube of side length `side` centred at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    side: f32,
}

impl Volume {
    /// Creates a volume with the provided side length.
    #[must_use]
    pub const fn new(side: f32) -> Self {
        Self { side }
    }

    /// Side length of the cube in world units.
    #[must_use]
    pub const fn side(&self) -> f32 {
        self.side
    }

    /// Distance from the origin to each face.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.side * 0.5
    }

    /// Reports whether every coordinate of `position` lies within the cube.
    #[must_use]
    pub fn contains(&self, position: Vec3) -> bool {
        let half = self.half_extent();
        [position.x, position.y, position.z]
            .into_iter()
            .all(|value| (-half..=half).contains(&value))
    }

    /// Maps `position` back into the cube, re-entering through the opposite face.
    ///
    /// Coordinates that already lie within `[-side / 2, side / 2]` are returned
    /// untouched, so wrapping an in-range position is an exact no-op.
    #[must_use]
    pub fn wrap(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            self.wrap_coordinate(position.x),
            self.wrap_coordinate(position.y),
            self.wrap_coordinate(position.z),
        )
    }

    /// Copy of `to` shifted by whole sides so that it lies as close to `from` as possible.
    ///
    /// Two points on opposite faces are neighbours across the wrap, so the
    /// image lies just outside the cube next to `from`.
    #[must_use]
    pub fn nearest_image(&self, from: Vec3, to: Vec3) -> Vec3 {
        Vec3::new(
            self.nearest_coordinate(from.x, to.x),
            self.nearest_coordinate(from.y, to.y),
            self.nearest_coordinate(from.z, to.z),
        )
    }

    fn nearest_coordinate(&self, from: f32, to: f32) -> f32 {
        let offset = to - from;
        if offset > self.half_extent() {
            to - self.side
        } else if offset < -self.half_extent() {
            to + self.side
        } else {
            to
        }
    }

    fn wrap_coordinate(&self, value: f32) -> f32 {
        let half = self.half_extent();
        if (-half..=half).contains(&value) {
            return value;
        }

        if !value.is_finite() || self.side <= 0.0 {
            return 0.0;
        }

        ((value + half).rem_euclid(self.side) - half).clamp(-half, half)
    }
}

/// Unique identifier assigned to a target at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single chain segment used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnapshot {
    /// Position of the segment along the chain; zero is the head.
    pub index: usize,
    /// Location of the segment inside the volume.
    pub position: Vec3,
    /// Unit direction the segment faces, when orientation tracking is enabled.
    pub facing: Option<Vec3>,
}

/// Read-only snapshot of the chain ordered from head to tail.
#[derive(Clone, Debug, Default)]
pub struct ChainView {
    segments: Vec<SegmentSnapshot>,
}

impl ChainView {
    /// Creates a new chain view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut segments: Vec<SegmentSnapshot>) -> Self {
        segments.sort_by_key(|segment| segment.index);
        Self { segments }
    }

    /// Snapshot of the head segment, if the chain has any segments.
    #[must_use]
    pub fn head(&self) -> Option<&SegmentSnapshot> {
        self.segments.first()
    }

    /// Number of segments captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Reports whether the view captured no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterator over the segments from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentSnapshot> {
        self.segments.iter()
    }
}

/// Immutable representation of a remaining target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Identifier assigned to the target at spawn time.
    pub id: TargetId,
    /// Location of the target inside the volume.
    pub position: Vec3,
}

/// Read-only snapshot of the targets that have not been captured yet.
#[derive(Clone, Debug, Default)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Number of targets captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether every target has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Iterator over the targets in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}

/// Current end sequence stage paired with the presentation cue it implies.
#[derive(Clone, Debug, PartialEq)]
pub struct EndSequenceSnapshot {
    /// Active stage of the end sequence.
    pub stage: EndStage,
    /// Presentation instruction associated with the stage.
    pub cue: EndCue,
}
