use std::{f32::consts::TAU, time::Duration};

use cubesnake_rendering_macroquad::CameraOrbit;

fn run(orbit: &mut CameraOrbit, frames: &[(u64, bool)]) -> Vec<f32> {
    frames
        .iter()
        .map(|&(millis, auto_rotate)| {
            orbit.advance(Duration::from_millis(millis), auto_rotate);
            orbit.yaw()
        })
        .collect()
}

#[test]
fn orbit_only_turns_while_auto_rotate_is_enabled() {
    let mut orbit = CameraOrbit::new(1.0);
    let yaws = run(&mut orbit, &[(500, false), (500, true), (500, false)]);

    assert_eq!(yaws[0], 0.0);
    assert!((yaws[1] - 0.5).abs() < 1e-6);
    assert_eq!(yaws[1], yaws[2]);
}

#[test]
fn orbit_replay_is_deterministic_and_wraps() {
    let frames = [(1_000, true); 10];
    let first = run(&mut CameraOrbit::new(1.0), &frames);
    let second = run(&mut CameraOrbit::new(1.0), &frames);

    assert_eq!(first, second);
    assert!(first.iter().all(|yaw| (0.0..TAU).contains(yaw)));
}

#[test]
fn eye_keeps_the_requested_distance() {
    let mut orbit = CameraOrbit::new(0.7);
    orbit.advance(Duration::from_secs(3), true);

    let eye = orbit.eye(80.0);
    assert!((eye.length() - 80.0).abs() < 1e-3);
    assert_eq!(eye.y, 0.0);
}

#[test]
fn initial_eye_looks_down_the_z_axis() {
    let eye = CameraOrbit::default().eye(80.0);
    assert!(eye.x.abs() < 1e-6);
    assert!((eye.z - 80.0).abs() < 1e-6);
}
