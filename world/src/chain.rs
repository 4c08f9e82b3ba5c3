//! Ordered segment storage and the per-frame following rule.

use cubesnake_core::{Heading, SegmentSnapshot, Vec3, Volume};

/// How the head reaches its destination this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Approach {
    /// Jump straight onto the destination.
    Snap,
    /// Move the provided fraction of the remaining distance.
    Blend(f32),
}

/// How followers trail their predecessor this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Follow {
    /// Take the position the predecessor held before the frame.
    Shift,
    /// Move the provided fraction toward the predecessor's updated position.
    Blend(f32),
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    position: Vec3,
    facing: Option<Vec3>,
}

/// Fixed-length sequence of segments ordered from head to tail.
#[derive(Clone, Debug)]
pub(crate) struct Chain {
    segments: Vec<Segment>,
}

impl Chain {
    /// Lays out `count` segments behind `head`, `spacing` apart along the reversed heading.
    pub(crate) fn new(
        head: Vec3,
        count: usize,
        spacing: f32,
        heading: Heading,
        volume: &Volume,
    ) -> Self {
        let trailing = heading.reversed().unit_vector() * spacing;
        let segments = (0..count.max(1))
            .map(|index| Segment {
                position: volume.wrap(head + trailing * index as f32),
                facing: None,
            })
            .collect();
        Self { segments }
    }

    /// Current position of the head segment.
    pub(crate) fn head(&self) -> Vec3 {
        self.segments[0].position
    }

    /// Moves the head toward `destination` and lets every follower trail its predecessor.
    ///
    /// Interpolated positions are passed back through `volume` so rounding can
    /// never leave a segment outside the cube.
    pub(crate) fn advance(
        &mut self,
        destination: Vec3,
        approach: Approach,
        follow: Follow,
        volume: &Volume,
    ) {
        if let Follow::Shift = follow {
            for index in (1..self.segments.len()).rev() {
                self.segments[index].position = self.segments[index - 1].position;
            }
        }

        let head = &mut self.segments[0];
        head.position = match approach {
            Approach::Snap => destination,
            Approach::Blend(weight) => volume.wrap(head.position.lerp(destination, weight)),
        };

        if let Follow::Blend(weight) = follow {
            for index in 1..self.segments.len() {
                let lead = self.segments[index - 1].position;
                let segment = &mut self.segments[index];
                let lead = volume.nearest_image(segment.position, lead);
                segment.position = volume.wrap(segment.position.lerp(lead, weight));
            }
        }
    }

    /// Points the head along `head_facing` and every follower at its predecessor.
    pub(crate) fn refresh_facing(&mut self, head_facing: Option<Vec3>, volume: &Volume) {
        self.segments[0].facing = head_facing;
        for index in 1..self.segments.len() {
            let lead = self.segments[index - 1].position;
            let segment = &mut self.segments[index];
            let lead = volume.nearest_image(segment.position, lead);
            segment.facing = (lead - segment.position).try_normalize();
        }
    }

    /// Captures snapshots of every segment from head to tail.
    pub(crate) fn snapshots(&self) -> Vec<SegmentSnapshot> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentSnapshot {
                index,
                position: segment.position,
                facing: segment.facing,
            })
            .collect()
    }
}
