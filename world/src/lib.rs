#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Cubesnake.

mod chain;
mod targets;

use std::time::Duration;

use cubesnake_core::{
    clamp_camera_distance, ChainMotion, Command, EndScript, EndStage, Event, Heading,
    MovementStrategy, SessionConfig, Vec3, Volume,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use self::{
    chain::{Approach, Chain, Follow},
    targets::TargetSet,
};

/// Frame rate the per-frame speed is expressed against when scaling by elapsed time.
const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Explicit starting arrangement for the chain head and the target batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Starting position of the head segment.
    pub head: Vec3,
    /// Positions of the targets spawned at session start.
    pub targets: Vec<Vec3>,
}

/// Represents the authoritative Cubesnake session state.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    volume: Volume,
    chain: Chain,
    targets: TargetSet,
    heading: Heading,
    speed: f32,
    score: u32,
    end_stage: EndStage,
    end_script: EndScript,
    camera_distance: f32,
    frame_index: u64,
}

impl World {
    /// Creates a session with the head at the origin and a randomly scattered target batch.
    ///
    /// Target placement is drawn from `config.seed` when present so sessions replay exactly.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let volume = Volume::new(config.volume_side);
        let targets = TargetSet::spawn_batch(config.target_count, &volume, &mut rng);
        Self::assemble(config, volume, Vec3::ZERO, targets)
    }

    /// Creates a session from an explicit layout, ignoring `config.target_count`.
    #[must_use]
    pub fn with_layout(config: SessionConfig, layout: Layout) -> Self {
        let volume = Volume::new(config.volume_side);
        let targets = TargetSet::from_positions(layout.targets, &volume);
        Self::assemble(config, volume, volume.wrap(layout.head), targets)
    }

    fn assemble(config: SessionConfig, volume: Volume, head: Vec3, targets: TargetSet) -> Self {
        let heading = config.initial_heading;
        let chain = Chain::new(
            head,
            config.segment_count,
            config.segment_spacing,
            heading,
            &volume,
        );
        let mut world = Self {
            volume,
            chain,
            targets,
            heading,
            speed: config.initial_speed,
            score: 0,
            end_stage: EndStage::Idle,
            end_script: EndScript::for_variant(config.end_variant),
            camera_distance: config.clamped_camera_distance(),
            frame_index: 0,
            config,
        };
        if world.config.track_orientation {
            world
                .chain
                .refresh_facing(Some(heading.unit_vector()), &world.volume);
        }
        info!(
            segments = world.config.segment_count,
            targets = world.targets.len(),
            strategy = ?world.config.strategy,
            "session started"
        );
        world
    }

    fn step(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.frame_index = self.frame_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let destination = self.head_destination(dt);
        let follow = match self.config.motion {
            ChainMotion::Rigid => Follow::Shift,
            ChainMotion::Smoothed => Follow::Blend(self.config.blend_factor),
        };
        self.chain.advance(
            destination.position,
            destination.approach,
            follow,
            &self.volume,
        );
        if self.config.track_orientation {
            self.chain.refresh_facing(destination.facing, &self.volume);
        }

        let head = self.chain.head();
        out_events.push(Event::ChainAdvanced { head });

        let captured = self
            .targets
            .remove_within_radius(head, self.config.capture_radius);
        for target in &captured {
            self.score = self.score.saturating_add(self.config.points_per_capture);
            self.speed *= self.config.speed_growth;
            debug!(
                target = target.id.get(),
                score = self.score,
                speed = self.speed,
                "target captured"
            );
            out_events.push(Event::TargetCaptured {
                target: target.id,
                position: target.position,
            });
        }

        if !captured.is_empty() {
            out_events.push(Event::ScoreChanged {
                score: self.score,
                speed: self.speed,
                captured: u32::try_from(captured.len()).unwrap_or(u32::MAX),
            });
        }

        if self.score >= self.config.end_threshold && self.end_stage == EndStage::Idle {
            self.end_stage = EndStage::Triggered;
            info!(
                score = self.score,
                frame = self.frame_index,
                "end sequence triggered"
            );
            out_events.push(Event::EndSequenceAdvanced {
                stage: EndStage::Triggered,
            });
        }
    }

    fn head_destination(&self, dt: Duration) -> Destination {
        let head = self.chain.head();
        if self.config.strategy == MovementStrategy::NearestPursuit {
            if let Some(target) = self.targets.nearest_to(head) {
                return Destination {
                    position: target.position,
                    approach: Approach::Blend(self.config.blend_factor),
                    facing: (target.position - head).try_normalize(),
                };
            }
        }

        let frame_scale = if self.config.scale_by_elapsed {
            dt.as_secs_f32() * REFERENCE_FRAME_RATE
        } else {
            1.0
        };
        let direction = self.heading.unit_vector();
        let unwrapped = head + direction * self.speed * frame_scale;
        let position = self.volume.wrap(unwrapped);
        let approach = match self.config.motion {
            ChainMotion::Smoothed if position == unwrapped => {
                Approach::Blend(self.config.blend_factor)
            }
            _ => Approach::Snap,
        };
        Destination {
            position,
            approach,
            facing: Some(direction),
        }
    }

    fn set_heading(&mut self, requested: Heading, out_events: &mut Vec<Event>) {
        let current = self.heading;
        if current.is_colinear_with(requested) {
            debug!(?requested, ?current, "heading rejected");
            out_events.push(Event::HeadingRejected { requested, current });
            return;
        }

        self.heading = requested;
        out_events.push(Event::HeadingChanged {
            from: current,
            to: requested,
        });
    }

    fn advance_end_sequence(&mut self, stage: EndStage, out_events: &mut Vec<Event>) {
        match self.end_script.next_after(self.end_stage) {
            Some(step) if step.stage == stage => {
                info!(from = ?self.end_stage, to = ?stage, "end sequence advanced");
                self.end_stage = stage;
                out_events.push(Event::EndSequenceAdvanced { stage });
            }
            _ => {
                warn!(
                    current = ?self.end_stage,
                    requested = ?stage,
                    "ignored out-of-order end sequence transition"
                );
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Destination {
    position: Vec3,
    approach: Approach,
    facing: Option<Vec3>,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.step(dt, out_events),
        Command::SetHeading { heading } => world.set_heading(heading, out_events),
        Command::Zoom { delta } => {
            if !delta.is_finite() {
                return;
            }
            world.camera_distance = clamp_camera_distance(world.camera_distance + delta);
            out_events.push(Event::CameraZoomed {
                distance: world.camera_distance,
            });
        }
        Command::AdvanceEndSequence { stage } => world.advance_end_sequence(stage, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cubesnake_core::{
        ChainView, EndScript, EndSequenceSnapshot, EndStage, Heading, SessionConfig, TargetView,
        Volume,
    };

    use super::World;

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Cubic region the session takes place in.
    #[must_use]
    pub fn volume(world: &World) -> Volume {
        world.volume
    }

    /// Captures a read-only view of the chain from head to tail.
    #[must_use]
    pub fn chain_view(world: &World) -> ChainView {
        ChainView::from_snapshots(world.chain.snapshots())
    }

    /// Captures a read-only view of the targets that remain.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        TargetView::from_snapshots(world.targets.snapshots())
    }

    /// Number of targets that remain.
    #[must_use]
    pub fn remaining_targets(world: &World) -> usize {
        world.targets.len()
    }

    /// Heading the head travels along under directional movement.
    #[must_use]
    pub fn heading(world: &World) -> Heading {
        world.heading
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current per-frame displacement magnitude.
    #[must_use]
    pub fn speed(world: &World) -> f32 {
        world.speed
    }

    /// Active end sequence stage.
    #[must_use]
    pub fn end_stage(world: &World) -> EndStage {
        world.end_stage
    }

    /// Scripted end sequence transitions for the session's staging variant.
    #[must_use]
    pub fn end_script(world: &World) -> &EndScript {
        &world.end_script
    }

    /// Active end sequence stage together with its presentation cue.
    #[must_use]
    pub fn end_sequence(world: &World) -> EndSequenceSnapshot {
        EndSequenceSnapshot {
            stage: world.end_stage,
            cue: world
                .config
                .messages
                .cue(world.end_stage, world.config.end_variant),
        }
    }

    /// Clamped distance between the camera and the volume centre.
    #[must_use]
    pub fn camera_distance(world: &World) -> f32 {
        world.camera_distance
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.frame_index
    }
}
