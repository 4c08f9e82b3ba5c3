#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed end sequence system that walks the world through its scripted stages.

use std::time::Duration;

use cubesnake_core::{Command, EndScript, EndStage, Event};
use tracing::debug;

/// Pure system that measures time spent in each end stage and requests the next one.
#[derive(Debug)]
pub struct EndSequence {
    script: EndScript,
    stage: EndStage,
    elapsed: Duration,
}

impl EndSequence {
    /// Creates a system that follows the provided script once the world triggers it.
    #[must_use]
    pub fn new(script: EndScript) -> Self {
        Self {
            script,
            stage: EndStage::Idle,
            elapsed: Duration::ZERO,
        }
    }

    /// Latest stage the system has observed or requested.
    #[must_use]
    pub fn stage(&self) -> EndStage {
        self.stage
    }

    /// Time accumulated since the latest stage was entered.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Consumes world events and emits every stage transition whose delay has elapsed.
    ///
    /// Time that overshoots a delay is carried into the following stage, so a
    /// single long frame may pass several stages at once.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } if self.stage != EndStage::Idle => {
                    self.elapsed = self.elapsed.saturating_add(*dt);
                }
                Event::EndSequenceAdvanced { stage } if *stage > self.stage => {
                    self.stage = *stage;
                    self.elapsed = Duration::ZERO;
                }
                _ => {}
            }
        }

        while let Some(step) = self.script.next_after(self.stage) {
            if self.elapsed < step.delay {
                break;
            }
            self.elapsed -= step.delay;
            debug!(
                from = ?self.stage,
                to = ?step.stage,
                carried = ?self.elapsed,
                "end sequence step due"
            );
            self.stage = step.stage;
            out.push(Command::AdvanceEndSequence { stage: step.stage });
        }
    }
}
