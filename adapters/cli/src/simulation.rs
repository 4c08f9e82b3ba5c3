//! Per-frame orchestration of the world and its systems.

use std::time::Duration;

use cubesnake_core::{Command, EndStage, Event, SessionConfig};
use cubesnake_rendering::{
    FrameInput, OverlayPresentation, Scene, SegmentPresentation, TargetPresentation,
};
use cubesnake_rendering_macroquad::{segment_color, target_color};
use cubesnake_system_end_sequence::EndSequence;
use cubesnake_system_steering::Steering;
use cubesnake_world::{self as world, query, Layout, World};

/// Owns the authoritative world together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    steering: Steering,
    end_sequence: EndSequence,
    pending_events: Vec<Event>,
}

impl Simulation {
    /// Starts a session from a validated configuration.
    pub(crate) fn new(config: SessionConfig, layout: Option<Layout>) -> Self {
        let steering = Steering::new(config.initial_heading);
        let world = match layout {
            Some(layout) => World::with_layout(config, layout),
            None => World::new(config),
        };
        let end_sequence = EndSequence::new(query::end_script(&world).clone());

        Self {
            world,
            steering,
            end_sequence,
            pending_events: Vec::new(),
        }
    }

    /// Advances the session by one frame.
    ///
    /// Input is applied before the tick so a heading change steers the very
    /// frame it was pressed on. End sequence transitions due this frame are
    /// applied after the tick.
    pub(crate) fn advance(&mut self, dt: Duration, input: &FrameInput) {
        let mut commands = Vec::new();
        self.steering
            .handle(&self.pending_events, &input.directions, &mut commands);
        if input.zoom_delta != 0.0 {
            commands.push(Command::Zoom {
                delta: input.zoom_delta,
            });
        }
        commands.push(Command::Tick { dt });

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut follow_ups = Vec::new();
        self.end_sequence.handle(&events, &mut follow_ups);
        for command in follow_ups {
            world::apply(&mut self.world, command, &mut events);
        }

        self.pending_events = events;
    }

    /// Read-only access to the world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the latest frame.
    pub(crate) fn last_events(&self) -> &[Event] {
        &self.pending_events
    }

    /// Fraction of the current end stage's delay that has elapsed.
    pub(crate) fn stage_progress(&self) -> f32 {
        let stage = query::end_stage(&self.world);
        match query::end_script(&self.world).next_after(stage) {
            Some(step) if !step.delay.is_zero() => {
                (self.end_sequence.elapsed().as_secs_f32() / step.delay.as_secs_f32()).min(1.0)
            }
            _ => 1.0,
        }
    }

    /// Copies the world state into `scene`, leaving presentation-only settings untouched.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let chain = query::chain_view(&self.world);
        let count = chain.len();
        scene.segments.clear();
        scene
            .segments
            .extend(chain.iter().map(|segment| SegmentPresentation {
                position: segment.position,
                facing: segment.facing,
                color: segment_color(segment.index, count),
            }));

        scene.targets.clear();
        scene.targets.extend(
            query::target_view(&self.world)
                .iter()
                .map(|target| TargetPresentation {
                    position: target.position,
                    color: target_color(),
                }),
        );

        scene.volume_side = query::volume(&self.world).side();
        scene.camera.distance = query::camera_distance(&self.world);
        scene.hud.score = query::score(&self.world);

        let end = query::end_sequence(&self.world);
        scene.hud.overlay = if end.stage == EndStage::Idle {
            None
        } else {
            OverlayPresentation::from_cue(end.stage, &end.cue, self.stage_progress())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubesnake_core::{DirectionCommand, Heading, Vec3};

    const FRAME: Duration = Duration::from_millis(16);

    fn quiet(config: SessionConfig, targets: Vec<Vec3>) -> Simulation {
        Simulation::new(
            config,
            Some(Layout {
                head: Vec3::ZERO,
                targets,
            }),
        )
    }

    #[test]
    fn directional_input_steers_in_the_same_frame() {
        let mut simulation = quiet(SessionConfig::classic(), Vec::new());
        let input = FrameInput {
            directions: vec![DirectionCommand::Up],
            ..FrameInput::default()
        };

        simulation.advance(FRAME, &input);

        assert_eq!(query::heading(simulation.world()), Heading::PositiveY);
        let head = query::chain_view(simulation.world())
            .head()
            .map(|segment| segment.position)
            .expect("chain has a head");
        assert!((head.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zoom_input_moves_the_camera() {
        let mut simulation = quiet(SessionConfig::classic(), Vec::new());
        let input = FrameInput {
            zoom_delta: -2.0,
            ..FrameInput::default()
        };

        simulation.advance(FRAME, &input);

        assert_eq!(query::camera_distance(simulation.world()), 78.0);
    }

    #[test]
    fn trigger_frame_already_shows_the_message() {
        let config = SessionConfig {
            end_threshold: 1,
            ..SessionConfig::classic()
        };
        let mut simulation = quiet(config, vec![Vec3::new(0.3, 0.0, 0.0)]);

        simulation.advance(FRAME, &FrameInput::default());

        assert_eq!(
            query::end_stage(simulation.world()),
            EndStage::MessageShown
        );
        let mut scene = Scene::new(50.0, 80.0);
        simulation.populate_scene(&mut scene);
        let overlay = scene.hud.overlay.expect("overlay is visible");
        assert_eq!(overlay.stage, EndStage::MessageShown);
        assert_eq!(overlay.opacity, 1.0);
    }

    #[test]
    fn scene_mirrors_world_state() {
        let mut simulation = quiet(
            SessionConfig::pursuit(),
            vec![Vec3::new(5.0, 5.0, 5.0), Vec3::new(-5.0, 0.0, 0.0)],
        );
        simulation.advance(FRAME, &FrameInput::default());

        let mut scene = Scene::new(1.0, 10.0);
        scene.camera.auto_rotate = true;
        simulation.populate_scene(&mut scene);

        assert_eq!(scene.segments.len(), 20);
        assert_eq!(scene.targets.len(), 2);
        assert_eq!(scene.volume_side, 50.0);
        assert_eq!(scene.camera.distance, 80.0);
        assert!(scene.camera.auto_rotate);
        assert!(scene.hud.overlay.is_none());
        assert!(scene.segments[0].facing.is_some());
    }

    #[test]
    fn progress_tracks_the_pending_delay() {
        let config = SessionConfig {
            end_threshold: 1,
            ..SessionConfig::classic()
        };
        let mut simulation = quiet(config, vec![Vec3::new(0.3, 0.0, 0.0)]);
        simulation.advance(FRAME, &FrameInput::default());
        simulation.advance(Duration::from_millis(1_500), &FrameInput::default());

        assert!((simulation.stage_progress() - 0.5).abs() < 1e-3);
    }
}
