#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering system that turns directional input into heading commands.

use cubesnake_core::{Command, DirectionCommand, Event, Heading};
use tracing::trace;

/// Pure system that filters directional input against the latest heading.
#[derive(Debug)]
pub struct Steering {
    heading: Heading,
}

impl Steering {
    /// Creates a steering system that assumes the head currently travels along `heading`.
    #[must_use]
    pub const fn new(heading: Heading) -> Self {
        Self { heading }
    }

    /// Heading the system believes the head travels along.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Consumes world events and the frame's directional input to emit heading commands.
    ///
    /// Inputs are evaluated in order; each accepted request becomes the
    /// reference for the inputs that follow it within the same frame.
    pub fn handle(
        &mut self,
        events: &[Event],
        inputs: &[DirectionCommand],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::HeadingChanged { to, .. } => self.heading = *to,
                Event::HeadingRejected { current, .. } => self.heading = *current,
                _ => {}
            }
        }

        for input in inputs {
            let requested = input.heading();
            if requested.is_colinear_with(self.heading) {
                trace!(?input, current = ?self.heading, "dropped colinear steering input");
                continue;
            }
            self.heading = requested;
            out.push(Command::SetHeading { heading: requested });
        }
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self::new(Heading::PositiveX)
    }
}
