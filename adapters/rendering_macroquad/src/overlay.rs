//! Screen-space text for the score and the end sequence overlay.
//!
//! All uses of macroquad's text API live here so the 3D drawing code stays
//! free of font concerns.

use cubesnake_rendering::{Color, HudPresentation, OverlayPresentation, Perturbation};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    shapes::draw_rectangle,
    text::{draw_text, draw_text_ex, measure_text, TextParams},
};

use super::to_macroquad_color;

const TEXT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const BACKDROP_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.6);

const SCORE_FONT_SIZE: u16 = 28;
const HEADLINE_FONT_SIZE: u16 = 44;
const CAPTION_FONT_SIZE: u16 = 26;
const LINE_GAP: f32 = 12.0;
/// Largest jitter, in pixels, applied to glitching text.
const GLITCH_AMPLITUDE: f32 = 6.0;

pub(crate) fn draw_hud(hud: &HudPresentation, viewport: Vec2) {
    match &hud.overlay {
        Some(overlay) => draw_overlay(overlay, viewport),
        None => {
            let label = format!("Score: {}", hud.score);
            draw_text(&label, 16.0, 36.0, f32::from(SCORE_FONT_SIZE), WHITE);
        }
    }
}

fn draw_overlay(overlay: &OverlayPresentation, viewport: Vec2) {
    draw_rectangle(
        0.0,
        0.0,
        viewport.x,
        viewport.y,
        to_macroquad_color(BACKDROP_COLOR),
    );

    let color = to_macroquad_color(TEXT_COLOR.with_opacity(overlay.opacity));
    let line_height = f32::from(HEADLINE_FONT_SIZE) + LINE_GAP;
    let block_height = line_height * overlay.lines.len() as f32;
    let centre = viewport * 0.5;
    let (jitter, rotation) = match overlay.perturbation {
        Some(Perturbation::Glitch { intensity }) => {
            let amplitude = GLITCH_AMPLITUDE * intensity.clamp(0.0, 1.0);
            (
                Vec2::new(
                    macroquad::rand::gen_range(-amplitude, amplitude),
                    macroquad::rand::gen_range(-amplitude, amplitude),
                ),
                0.0,
            )
        }
        Some(Perturbation::Rotate { radians }) => (Vec2::ZERO, radians),
        None => (Vec2::ZERO, 0.0),
    };

    for (index, line) in overlay.lines.iter().enumerate() {
        let width = measure_text(line, None, HEADLINE_FONT_SIZE, 1.0).width;
        let local = Vec2::new(
            -width * 0.5,
            index as f32 * line_height - block_height * 0.5 + f32::from(HEADLINE_FONT_SIZE),
        );
        let origin = centre + Vec2::from_angle(rotation).rotate(local) + jitter;
        draw_text_ex(
            line,
            origin.x,
            origin.y,
            TextParams {
                font_size: HEADLINE_FONT_SIZE,
                rotation,
                color,
                ..TextParams::default()
            },
        );
    }

    if let Some(caption) = &overlay.caption {
        let width = measure_text(caption, None, CAPTION_FONT_SIZE, 1.0).width;
        draw_text(
            caption,
            centre.x - width * 0.5,
            centre.y + block_height * 0.5 + f32::from(CAPTION_FONT_SIZE) + LINE_GAP,
            f32::from(CAPTION_FONT_SIZE),
            color,
        );
    }
}
