#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Cubesnake.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default
//! `audio` feature.
//!
//! The backend only draws and reads input. Every simulation change travels
//! through the `update_scene` closure as a [`FrameInput`].

mod overlay;

use anyhow::{anyhow, Result};
use cubesnake_core::DirectionCommand;
use cubesnake_rendering::{
    Color, FrameInput, FrameSimulationBreakdown, Presentation, RenderingBackend, RenderingError,
    Scene,
};
use glam::{Vec2, Vec3};
use macroquad::{
    camera::{set_camera, set_default_camera, Camera3D},
    input::{is_key_pressed, mouse_wheel, KeyCode},
    math::vec3,
    models::{draw_cube, draw_cube_wires, draw_line_3d},
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};

/// World units the camera moves per wheel notch.
const ZOOM_STEP: f32 = 2.0;
/// Edge length of a drawn segment cube.
const SEGMENT_SIZE: f32 = 1.0;
/// Edge length of a drawn target cube.
const TARGET_SIZE: f32 = 0.5;
/// Length of the facing indicator drawn from each segment centre.
const FACING_LENGTH: f32 = 0.8;

const HEAD_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);
const TAIL_COLOR: Color = Color::from_rgb_u8(0x80, 0x80, 0x00);
const TARGET_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0xd1);
const VOLUME_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.25);

/// Orbit of the camera around the volume centre.
///
/// Auto-rotation only changes where the camera stands; the simulation never
/// observes it.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOrbit {
    yaw: f32,
    radians_per_second: f32,
}

impl CameraOrbit {
    /// Creates an orbit looking down the positive z axis that turns at the provided rate.
    #[must_use]
    pub const fn new(radians_per_second: f32) -> Self {
        Self {
            yaw: 0.0,
            radians_per_second,
        }
    }

    /// Current orbit angle around the vertical axis.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Turns the orbit by the elapsed time when `auto_rotate` is set.
    pub fn advance(&mut self, dt: Duration, auto_rotate: bool) {
        if !auto_rotate {
            return;
        }
        self.yaw = (self.yaw + self.radians_per_second * dt.as_secs_f32())
            .rem_euclid(std::f32::consts::TAU);
    }

    /// Camera position for the provided distance from the volume centre.
    #[must_use]
    pub fn eye(&self, distance: f32) -> Vec3 {
        Vec3::new(self.yaw.sin() * distance, 0.0, self.yaw.cos() * distance)
    }
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self::new(0.2)
    }
}

/// Snapshot of edge-triggered keyboard and wheel input observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` or `Q` quits the render loop.
    quit_requested: bool,
    /// `R` toggles camera auto-rotation.
    toggle_auto_rotate: bool,
    /// Arrow keys plus `W`/`S`, in polling order.
    directions: Vec<DirectionCommand>,
    /// Vertical wheel movement in notches.
    wheel: f32,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let toggle_auto_rotate = is_key_pressed(KeyCode::R);
        let directions = STEERING_KEYS
            .iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, direction)| *direction)
            .collect();
        let (_, wheel) = mouse_wheel();

        Self {
            quit_requested,
            toggle_auto_rotate,
            directions,
            wheel,
        }
    }
}

const STEERING_KEYS: [(KeyCode, DirectionCommand); 6] = [
    (KeyCode::Up, DirectionCommand::Up),
    (KeyCode::Down, DirectionCommand::Down),
    (KeyCode::Left, DirectionCommand::Left),
    (KeyCode::Right, DirectionCommand::Right),
    (KeyCode::W, DirectionCommand::Forward),
    (KeyCode::S, DirectionCommand::Backward),
];

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    orbit: CameraOrbit,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Timing of a single rendered frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            orbit,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        if !(scene.volume_side.is_finite() && scene.volume_side > 0.0) {
            return Err(anyhow!(RenderingError::DegenerateVolume));
        }

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 720,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (started_sender, started_receiver) = mpsc::channel::<()>();

        macroquad::Window::from_config(config, async move {
            let _ = started_sender.send(());
            let mut scene = scene;
            let mut orbit = orbit;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let viewport = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let frame_input = gather_frame_input(keyboard, viewport);

                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);
                orbit.advance(frame_dt, scene.camera.auto_rotate);

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                draw_volume(&scene, &orbit);
                overlay::draw_hud(&scene.hud, viewport);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        started_receiver
            .recv()
            .map_err(|_| anyhow!(RenderingError::WindowClosed))?;

        Ok(())
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts, viewport: Vec2) -> FrameInput {
    gather_frame_input_from_observations(
        keyboard.directions,
        keyboard.toggle_auto_rotate,
        keyboard.wheel,
        viewport,
    )
}

fn gather_frame_input_from_observations(
    directions: Vec<DirectionCommand>,
    toggle_auto_rotate: bool,
    wheel: f32,
    viewport: Vec2,
) -> FrameInput {
    // Scrolling up pulls the camera closer.
    let zoom_delta = if wheel.is_finite() && wheel != 0.0 {
        -wheel.signum() * ZOOM_STEP
    } else {
        0.0
    };
    let viewport = (viewport.x > 0.0 && viewport.y > 0.0).then_some(viewport);

    FrameInput {
        directions,
        toggle_auto_rotate,
        zoom_delta,
        viewport,
    }
}

fn draw_volume(scene: &Scene, orbit: &CameraOrbit) {
    let eye = orbit.eye(scene.camera.distance);
    set_camera(&Camera3D {
        position: to_macroquad_vec3(eye),
        target: vec3(0.0, 0.0, 0.0),
        up: vec3(0.0, 1.0, 0.0),
        fovy: 75f32.to_radians(),
        ..Camera3D::default()
    });

    let side = scene.volume_side;
    draw_cube_wires(
        vec3(0.0, 0.0, 0.0),
        vec3(side, side, side),
        to_macroquad_color(VOLUME_COLOR),
    );

    for target in &scene.targets {
        draw_cube(
            to_macroquad_vec3(target.position),
            vec3(TARGET_SIZE, TARGET_SIZE, TARGET_SIZE),
            None,
            to_macroquad_color(target.color),
        );
    }

    for segment in &scene.segments {
        let centre = to_macroquad_vec3(segment.position);
        draw_cube(
            centre,
            vec3(SEGMENT_SIZE, SEGMENT_SIZE, SEGMENT_SIZE),
            None,
            to_macroquad_color(segment.color),
        );
        if let Some(facing) = segment.facing {
            let tip = to_macroquad_vec3(segment.position + facing * FACING_LENGTH);
            draw_line_3d(centre, tip, to_macroquad_color(segment.color.lighten(0.6)));
        }
    }

    set_default_camera();
}

/// Color of the segment at `index` in a chain of `count` segments, fading from head to tail.
#[must_use]
pub fn segment_color(index: usize, count: usize) -> Color {
    if count <= 1 {
        return HEAD_COLOR;
    }
    let t = index.min(count - 1) as f32 / (count - 1) as f32;
    Color::new(
        HEAD_COLOR.red + (TAIL_COLOR.red - HEAD_COLOR.red) * t,
        HEAD_COLOR.green + (TAIL_COLOR.green - HEAD_COLOR.green) * t,
        HEAD_COLOR.blue + (TAIL_COLOR.blue - HEAD_COLOR.blue) * t,
        1.0,
    )
}

/// Color every target is drawn with.
#[must_use]
pub const fn target_color() -> Color {
    TARGET_COLOR
}

fn to_macroquad_vec3(position: Vec3) -> macroquad::math::Vec3 {
    vec3(position.x, position.y, position.z)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
