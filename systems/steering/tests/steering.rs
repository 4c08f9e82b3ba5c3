use std::time::Duration;

use cubesnake_core::{Command, DirectionCommand, Event, Heading, SessionConfig, Vec3};
use cubesnake_system_steering::Steering;
use cubesnake_world::{self as world, query, Layout, World};

fn frame(
    world: &mut World,
    steering: &mut Steering,
    pending: &[Event],
    inputs: &[DirectionCommand],
) -> Vec<Event> {
    let mut commands = Vec::new();
    steering.handle(pending, inputs, &mut commands);
    commands.push(Command::Tick {
        dt: Duration::from_millis(16),
    });

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn steering_drives_the_head_around_a_corner() {
    let config = SessionConfig::classic();
    let mut world = World::with_layout(config.clone(), Layout::default());
    let mut steering = Steering::new(config.initial_heading);

    let events = frame(&mut world, &mut steering, &[], &[DirectionCommand::Up]);
    let events = frame(&mut world, &mut steering, &events, &[]);
    let _ = frame(&mut world, &mut steering, &events, &[DirectionCommand::Down]);

    assert_eq!(query::heading(&world), Heading::PositiveY);
    let head = query::chain_view(&world)
        .head()
        .map(|segment| segment.position)
        .expect("chain always has a head");
    assert!((head - Vec3::new(0.0, 0.3, 0.0)).length() < 1e-5, "head was {head:?}");
}

#[test]
fn reversal_never_reaches_the_world() {
    let mut world = World::with_layout(SessionConfig::classic(), Layout::default());
    let mut steering = Steering::default();

    let events = frame(&mut world, &mut steering, &[], &[DirectionCommand::Left]);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::HeadingRejected { .. })));
    assert_eq!(query::heading(&world), Heading::PositiveX);
}
