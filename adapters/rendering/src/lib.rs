#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Cubesnake adapters.

use anyhow::Result as AnyResult;
use cubesnake_core::{DirectionCommand, EndCue, EndStage};
use glam::{Vec2, Vec3};
use std::{error::Error, f32::consts::TAU, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            alpha: self.alpha * opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directional commands pressed this frame, in the order they were observed.
    pub directions: Vec<DirectionCommand>,
    /// Whether the adapter detected an auto-rotate toggle press on this frame.
    pub toggle_auto_rotate: bool,
    /// Accumulated zoom delta in world units; positive moves the camera away.
    pub zoom_delta: f32,
    /// Viewport size in pixels when the adapter owns a window.
    pub viewport: Option<Vec2>,
}

/// Segment of the chain as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPresentation {
    /// Position of the segment centre.
    pub position: Vec3,
    /// Unit direction the segment faces, when tracked.
    pub facing: Option<Vec3>,
    /// Fill color of the segment.
    pub color: Color,
}

/// Target as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPresentation {
    /// Position of the target centre.
    pub position: Vec3,
    /// Fill color of the target.
    pub color: Color,
}

/// Transient distortion applied to the overlay text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Perturbation {
    /// Text jitters with the provided strength in the range 0.0..=1.0.
    Glitch {
        /// Jitter strength.
        intensity: f32,
    },
    /// Text is rotated by the provided angle.
    Rotate {
        /// Rotation applied to the text block.
        radians: f32,
    },
}

/// End sequence overlay drawn above the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayPresentation {
    /// Stage the overlay represents.
    pub stage: EndStage,
    /// Lines drawn in the overlay centre.
    pub lines: Vec<String>,
    /// Secondary caption drawn beneath the lines.
    pub caption: Option<String>,
    /// Optional distortion applied to the lines.
    pub perturbation: Option<Perturbation>,
    /// Text opacity in the range 0.0..=1.0.
    pub opacity: f32,
}

impl OverlayPresentation {
    /// Builds the overlay for `cue`.
    ///
    /// `progress` is the fraction of the current stage that has elapsed and
    /// drives the animated cues. Returns `None` when the cue hides the overlay.
    #[must_use]
    pub fn from_cue(stage: EndStage, cue: &EndCue, progress: f32) -> Option<Self> {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let overlay = |lines: &[String], perturbation, opacity| Self {
            stage,
            lines: lines.to_vec(),
            caption: None,
            perturbation,
            opacity,
        };

        match cue {
            EndCue::Hidden => None,
            EndCue::Message { lines } => Some(overlay(lines, None, 1.0)),
            EndCue::Glitch { lines } => Some(overlay(
                lines,
                Some(Perturbation::Glitch {
                    intensity: 1.0 - progress,
                }),
                1.0,
            )),
            EndCue::Rotate { lines } => Some(overlay(
                lines,
                Some(Perturbation::Rotate {
                    radians: progress * TAU,
                }),
                1.0,
            )),
            EndCue::FadeOut { lines } => Some(overlay(lines, None, 1.0 - progress)),
            EndCue::Reveal { title, caption } => Some(Self {
                stage,
                lines: vec![title.clone()],
                caption: Some(caption.clone()),
                perturbation: None,
                opacity: 1.0,
            }),
        }
    }
}

/// Heads-up display drawn in screen space.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Current score.
    pub score: u32,
    /// End sequence overlay; the score is hidden while it is present.
    pub overlay: Option<OverlayPresentation>,
}

/// Camera placement around the volume centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Distance from the volume centre.
    pub distance: f32,
    /// Whether the camera orbits the volume on its own.
    pub auto_rotate: bool,
}

/// Scene description combining the volume, chain, targets and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Side length of the cubic volume.
    pub volume_side: f32,
    /// Chain segments from head to tail.
    pub segments: Vec<SegmentPresentation>,
    /// Remaining targets.
    pub targets: Vec<TargetPresentation>,
    /// Screen-space overlays.
    pub hud: HudPresentation,
    /// Camera placement.
    pub camera: CameraPresentation,
}

impl Scene {
    /// Creates an empty scene for a volume of the provided side length.
    #[must_use]
    pub fn new(volume_side: f32, camera_distance: f32) -> Self {
        Self {
            volume_side,
            segments: Vec::new(),
            targets: Vec::new(),
            hud: HudPresentation::default(),
            camera: CameraPresentation {
                distance: camera_distance,
                auto_rotate: false,
            },
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Time spent by the simulation while producing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent stepping the world and its systems.
    pub simulation: Duration,
    /// Time spent copying world state into the scene.
    pub scene_population: Duration,
}

/// Rendering backend capable of presenting Cubesnake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when presenting a scene.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The window closed before the first frame was drawn.
    WindowClosed,
    /// The volume cannot be framed because its side is not a positive number.
    DegenerateVolume,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowClosed => write!(f, "window closed before the first frame"),
            Self::DegenerateVolume => write!(f, "volume side must be a positive number"),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline() -> Vec<String> {
        vec!["When The Pieces Fall Into Place,".to_owned()]
    }

    #[test]
    fn lighten_moves_channels_toward_white() {
        let color = Color::from_rgb_u8(0, 128, 255).lighten(0.5);
        assert!((color.red - 0.5).abs() < 1e-6);
        assert!((color.blue - 1.0).abs() < 1e-6);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn with_opacity_scales_alpha_and_clamps() {
        let backdrop = Color::new(0.0, 0.0, 0.0, 0.6);
        assert!((backdrop.with_opacity(0.5).alpha - 0.3).abs() < 1e-6);
        assert_eq!(backdrop.with_opacity(3.0).alpha, 0.6);
        assert_eq!(backdrop.with_opacity(-1.0).alpha, 0.0);
        assert_eq!(backdrop.with_opacity(0.5).red, 0.0);
    }

    #[test]
    fn hidden_cue_has_no_overlay() {
        assert!(OverlayPresentation::from_cue(EndStage::Idle, &EndCue::Hidden, 0.0).is_none());
    }

    #[test]
    fn fade_out_opacity_follows_progress() {
        let overlay = OverlayPresentation::from_cue(
            EndStage::FadingOut,
            &EndCue::FadeOut { lines: headline() },
            0.25,
        )
        .expect("fade keeps the overlay visible");
        assert!((overlay.opacity - 0.75).abs() < 1e-6);
        assert!(overlay.perturbation.is_none());
    }

    #[test]
    fn rotate_cue_spins_a_full_turn() {
        let overlay = OverlayPresentation::from_cue(
            EndStage::FadingOut,
            &EndCue::Rotate { lines: headline() },
            1.0,
        )
        .expect("rotation keeps the overlay visible");
        assert_eq!(
            overlay.perturbation,
            Some(Perturbation::Rotate { radians: TAU })
        );
    }

    #[test]
    fn reveal_carries_title_and_caption() {
        let overlay = OverlayPresentation::from_cue(
            EndStage::FinalReveal,
            &EndCue::Reveal {
                title: "Unsolvablr".to_owned(),
                caption: "a jigsaw company".to_owned(),
            },
            f32::NAN,
        )
        .expect("reveal is visible");
        assert_eq!(overlay.lines, vec!["Unsolvablr".to_owned()]);
        assert_eq!(overlay.caption.as_deref(), Some("a jigsaw company"));
        assert_eq!(overlay.opacity, 1.0);
    }

    #[test]
    fn rendering_error_messages_are_readable() {
        assert_eq!(
            RenderingError::DegenerateVolume.to_string(),
            "volume side must be a positive number"
        );
    }

    #[test]
    fn scene_new_starts_empty() {
        let scene = Scene::new(50.0, 80.0);
        assert!(scene.segments.is_empty());
        assert!(scene.targets.is_empty());
        assert!(scene.hud.overlay.is_none());
        assert!(!scene.camera.auto_rotate);
    }
}
