//! Staging and text payloads for the end-of-session reveal.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stages of the end sequence in the order they are entered.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EndStage {
    /// The score threshold has not been reached.
    #[default]
    Idle,
    /// The threshold was crossed; the overlay is being raised.
    Triggered,
    /// The headline message is on screen.
    MessageShown,
    /// A transient perturbation distorts the headline.
    GlitchActive,
    /// The headline transitions away.
    FadingOut,
    /// The brand payload replaced the headline. Terminal.
    FinalReveal,
}

/// Staging variants observed for the end sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndVariant {
    /// The headline rotates once, then is replaced by the brand payload.
    Rotating,
    /// The headline glitches briefly, fades out, then the brand payload appears.
    GlitchFade,
}

/// Single scripted transition of the end sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndStep {
    /// Stage entered by the transition.
    pub stage: EndStage,
    /// Delay measured from entry into the preceding stage.
    pub delay: Duration,
}

impl EndStep {
    const fn new(stage: EndStage, delay_millis: u64) -> Self {
        Self {
            stage,
            delay: Duration::from_millis(delay_millis),
        }
    }
}

/// Ordered transitions that follow [`EndStage::Triggered`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndScript {
    steps: Vec<EndStep>,
}

impl EndScript {
    /// Builds the script for the provided staging variant.
    #[must_use]
    pub fn for_variant(variant: EndVariant) -> Self {
        let steps = match variant {
            EndVariant::Rotating => vec![
                EndStep::new(EndStage::MessageShown, 0),
                EndStep::new(EndStage::FadingOut, 3_000),
                EndStep::new(EndStage::FinalReveal, 2_000),
            ],
            EndVariant::GlitchFade => vec![
                EndStep::new(EndStage::MessageShown, 0),
                EndStep::new(EndStage::GlitchActive, 3_000),
                EndStep::new(EndStage::FadingOut, 500),
                EndStep::new(EndStage::FinalReveal, 2_000),
            ],
        };
        Self { steps }
    }

    /// Scripted transitions in order.
    #[must_use]
    pub fn steps(&self) -> &[EndStep] {
        &self.steps
    }

    /// Transition that follows `stage`, if any.
    ///
    /// `Idle` has no scripted successor: leaving it is driven by the score.
    #[must_use]
    pub fn next_after(&self, stage: EndStage) -> Option<EndStep> {
        match stage {
            EndStage::Idle => None,
            EndStage::Triggered => self.steps.first().copied(),
            _ => {
                let index = self.steps.iter().position(|step| step.stage == stage)?;
                self.steps.get(index + 1).copied()
            }
        }
    }
}

/// Presentation instruction implied by the active end stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndCue {
    /// No overlay is visible.
    Hidden,
    /// The overlay shows the headline.
    Message {
        /// Lines of the headline.
        lines: Vec<String>,
    },
    /// The headline is distorted.
    Glitch {
        /// Lines of the headline.
        lines: Vec<String>,
    },
    /// The headline spins a full turn.
    Rotate {
        /// Lines of the headline.
        lines: Vec<String>,
    },
    /// The headline fades toward transparency.
    FadeOut {
        /// Lines of the headline.
        lines: Vec<String>,
    },
    /// The brand payload replaced the headline.
    Reveal {
        /// Brand name.
        title: String,
        /// Caption shown beneath the brand name.
        caption: String,
    },
}

/// Text payloads displayed by the end sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndMessages {
    /// Headline lines shown when the sequence triggers.
    pub headline: Vec<String>,
    /// Brand name revealed last.
    pub title: String,
    /// Caption revealed together with the brand name.
    pub caption: String,
}

impl Default for EndMessages {
    fn default() -> Self {
        Self {
            headline: vec!["When The Pieces Fall Into Place, The Magic Unfolds".to_owned()],
            title: "Unsolvablr".to_owned(),
            caption: "a jigsaw company".to_owned(),
        }
    }
}

impl EndMessages {
    /// Two-line static headline used by the glitch-and-fade staging.
    #[must_use]
    pub fn two_line() -> Self {
        Self {
            headline: vec![
                "When The Pieces Fall Into Place,".to_owned(),
                "The Magic Unfolds".to_owned(),
            ],
            ..Self::default()
        }
    }

    /// Presentation cue for `stage` under the provided staging variant.
    #[must_use]
    pub fn cue(&self, stage: EndStage, variant: EndVariant) -> EndCue {
        let lines = self.headline.clone();
        match stage {
            EndStage::Idle => EndCue::Hidden,
            EndStage::Triggered | EndStage::MessageShown => EndCue::Message { lines },
            EndStage::GlitchActive => EndCue::Glitch { lines },
            EndStage::FadingOut => match variant {
                EndVariant::Rotating => EndCue::Rotate { lines },
                EndVariant::GlitchFade => EndCue::FadeOut { lines },
            },
            EndStage::FinalReveal => EndCue::Reveal {
                title: self.title.clone(),
                caption: self.caption.clone(),
            },
        }
    }
}
