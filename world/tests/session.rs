use std::time::Duration;

use cubesnake_core::{
    ChainMotion, Command, EndStage, Event, Heading, MovementStrategy, SessionConfig, Vec3,
};
use cubesnake_world::{self as world, query, Layout, World};

const FRAME: Duration = Duration::from_millis(16);

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    events
}

fn head_position(world: &World) -> Vec3 {
    query::chain_view(world)
        .head()
        .map(|segment| segment.position)
        .expect("chain always has a head")
}

#[test]
fn head_wraps_through_the_opposite_face() {
    let mut world = World::with_layout(
        SessionConfig::classic(),
        Layout {
            head: Vec3::new(24.95, 0.0, 0.0),
            targets: Vec::new(),
        },
    );

    let _ = tick(&mut world);

    let head = head_position(&world);
    assert!((head.x + 24.95).abs() < 1e-3, "head x was {}", head.x);
    assert_eq!(head.y, 0.0);
    assert_eq!(head.z, 0.0);
}

#[test]
fn nearby_target_is_captured_and_scored() {
    let config = SessionConfig::classic();
    let mut world = World::with_layout(
        config.clone(),
        Layout {
            head: Vec3::ZERO,
            targets: vec![Vec3::new(0.6, 0.0, 0.0), Vec3::new(20.0, 20.0, 20.0)],
        },
    );

    let events = tick(&mut world);

    assert_eq!(query::remaining_targets(&world), 1);
    assert_eq!(query::score(&world), config.points_per_capture);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ScoreChanged {
            captured: 1,
            ..
        }
    )));
}

#[test]
fn simultaneous_captures_all_count() {
    let config = SessionConfig {
        points_per_capture: 10,
        end_threshold: 1_000,
        ..SessionConfig::classic()
    };
    let mut world = World::with_layout(
        config.clone(),
        Layout {
            head: Vec3::ZERO,
            targets: vec![
                Vec3::new(0.1, 0.2, 0.0),
                Vec3::new(0.1, -0.2, 0.0),
                Vec3::new(0.3, 0.0, 0.4),
                Vec3::new(-12.0, 0.0, 0.0),
            ],
        },
    );

    let events = tick(&mut world);

    assert_eq!(query::score(&world), 30);
    let expected_speed = config.initial_speed * config.speed_growth.powi(3);
    assert!((query::speed(&world) - expected_speed).abs() < 1e-6);
    let captures = events
        .iter()
        .filter(|event| matches!(event, Event::TargetCaptured { .. }))
        .count();
    assert_eq!(captures, 3);
    assert_eq!(query::remaining_targets(&world), 1);
}

#[test]
fn crossing_threshold_with_several_captures_triggers_once() {
    let config = SessionConfig {
        points_per_capture: 10,
        end_threshold: 30,
        ..SessionConfig::classic()
    };
    let mut world = World::with_layout(
        config,
        Layout {
            head: Vec3::ZERO,
            targets: vec![
                Vec3::new(0.1, 0.2, 0.0),
                Vec3::new(0.1, -0.2, 0.0),
                Vec3::new(0.3, 0.0, 0.4),
            ],
        },
    );

    let events = tick(&mut world);

    let triggers: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::EndSequenceAdvanced { .. }))
        .collect();
    assert_eq!(
        triggers,
        vec![&Event::EndSequenceAdvanced {
            stage: EndStage::Triggered,
        }]
    );
    assert_eq!(query::end_stage(&world), EndStage::Triggered);
}

#[test]
fn later_captures_never_retrigger_the_end_sequence() {
    let config = SessionConfig {
        points_per_capture: 10,
        end_threshold: 10,
        ..SessionConfig::classic()
    };
    let mut world = World::with_layout(
        config,
        Layout {
            head: Vec3::ZERO,
            targets: vec![Vec3::new(0.1, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)],
        },
    );

    let mut triggers = 0;
    for _ in 0..40 {
        triggers += tick(&mut world)
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::EndSequenceAdvanced {
                        stage: EndStage::Triggered
                    }
                )
            })
            .count();
    }

    assert_eq!(query::score(&world), 20);
    assert_eq!(triggers, 1);
    assert_eq!(query::end_stage(&world), EndStage::Triggered);
}

#[test]
fn pursuit_falls_back_to_heading_when_no_targets_remain() {
    let config = SessionConfig {
        strategy: MovementStrategy::NearestPursuit,
        ..SessionConfig::classic()
    };
    let mut world = World::with_layout(config, Layout::default());

    let events = tick(&mut world);

    let head = head_position(&world);
    assert!((head.x - 0.1).abs() < 1e-6, "head x was {}", head.x);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ChainAdvanced { .. })));
}

#[test]
fn pursuit_blends_toward_nearest_target() {
    let config = SessionConfig {
        track_orientation: true,
        ..SessionConfig::pursuit()
    };
    let mut world = World::with_layout(
        config,
        Layout {
            head: Vec3::ZERO,
            targets: vec![Vec3::new(-10.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0)],
        },
    );

    let _ = tick(&mut world);

    let view = query::chain_view(&world);
    let head = view.head().expect("chain always has a head");
    assert!((head.position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    assert_eq!(head.facing, Some(Vec3::Y));
}

#[test]
fn rigid_followers_inherit_predecessor_positions() {
    let mut world = World::with_layout(SessionConfig::classic(), Layout::default());
    let before: Vec<_> = query::chain_view(&world)
        .iter()
        .map(|segment| segment.position)
        .collect();

    let _ = tick(&mut world);

    let after: Vec<_> = query::chain_view(&world)
        .iter()
        .map(|segment| segment.position)
        .collect();
    assert_eq!(&after[1..], &before[..before.len() - 1]);
}

#[test]
fn smoothed_followers_trail_the_head_across_the_face() {
    let config = SessionConfig {
        motion: ChainMotion::Smoothed,
        ..SessionConfig::classic()
    };
    let volume = cubesnake_core::Volume::new(config.volume_side);
    let mut world = World::with_layout(
        config,
        Layout {
            head: Vec3::new(24.95, 0.0, 0.0),
            targets: Vec::new(),
        },
    );
    let before: Vec<_> = query::chain_view(&world)
        .iter()
        .map(|segment| segment.position)
        .collect();

    let _ = tick(&mut world);

    let after: Vec<_> = query::chain_view(&world)
        .iter()
        .map(|segment| segment.position)
        .collect();
    assert_eq!(after.len(), 5);
    assert!((after[0].x + 24.95).abs() < 1e-3, "head x was {}", after[0].x);
    assert!((after[1].x - 24.5).abs() < 1e-3, "follower x was {}", after[1].x);
    for (index, (old, new)) in before.iter().zip(&after).enumerate().skip(1) {
        let travelled = (volume.nearest_image(*old, *new) - *old).length();
        assert!(
            travelled < 1.0,
            "follower {index} travelled {travelled} units in one frame"
        );
    }
}

#[test]
fn heading_changes_steer_the_head() {
    let mut world = World::with_layout(SessionConfig::classic(), Layout::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetHeading {
            heading: Heading::NegativeY,
        },
        &mut events,
    );

    let _ = tick(&mut world);

    let head = head_position(&world);
    assert!((head.y + 0.1).abs() < 1e-6);
    assert_eq!(head.x, 0.0);
}

#[test]
fn segments_stay_inside_the_volume_and_targets_only_shrink() {
    for motion in [ChainMotion::Rigid, ChainMotion::Smoothed] {
        for strategy in [
            MovementStrategy::DirectionalWrap,
            MovementStrategy::NearestPursuit,
        ] {
            let config = SessionConfig {
                seed: Some(2024),
                motion,
                strategy,
                initial_speed: 1.7,
                volume_side: 12.0,
                target_count: 40,
                ..SessionConfig::pursuit()
            };
            let volume = cubesnake_core::Volume::new(config.volume_side);
            let mut world = World::new(config);
            let mut remaining = query::remaining_targets(&world);
            let headings = [Heading::PositiveY, Heading::NegativeZ, Heading::PositiveX];

            for frame in 0..600 {
                if frame % 50 == 0 {
                    let mut events = Vec::new();
                    world::apply(
                        &mut world,
                        Command::SetHeading {
                            heading: headings[(frame / 50) % headings.len()],
                        },
                        &mut events,
                    );
                }
                let _ = tick(&mut world);

                for segment in query::chain_view(&world).iter() {
                    assert!(
                        volume.contains(segment.position),
                        "segment {} escaped to {:?}",
                        segment.index,
                        segment.position
                    );
                }
                let now = query::remaining_targets(&world);
                assert!(now <= remaining);
                remaining = now;
            }
        }
    }
}
