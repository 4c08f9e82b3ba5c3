//! Capturable points scattered through the volume.

use cubesnake_core::{TargetId, TargetSnapshot, Vec3, Volume};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Target {
    pub(crate) id: TargetId,
    pub(crate) position: Vec3,
}

/// Collection of targets that only ever shrinks after the initial batch.
#[derive(Clone, Debug, Default)]
pub(crate) struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    /// Creates `count` targets drawn uniformly from the volume.
    pub(crate) fn spawn_batch<R: Rng>(count: usize, volume: &Volume, rng: &mut R) -> Self {
        let half = volume.half_extent();
        let positions = (0..count).map(|_| {
            Vec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
            )
        });
        Self::from_positions(positions, volume)
    }

    /// Creates targets at the provided positions, wrapped into the volume.
    pub(crate) fn from_positions<I>(positions: I, volume: &Volume) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let targets = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Target {
                id: TargetId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                position: volume.wrap(position),
            })
            .collect();
        Self { targets }
    }

    /// Number of remaining targets.
    pub(crate) fn len(&self) -> usize {
        self.targets.len()
    }

    /// Target closest to `point`, preferring the earliest one on ties.
    pub(crate) fn nearest_to(&self, point: Vec3) -> Option<&Target> {
        let mut best: Option<(&Target, f32)> = None;
        for target in &self.targets {
            let distance = target.position.distance_squared(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((target, distance)),
            }
        }
        best.map(|(target, _)| target)
    }

    /// Removes every target strictly closer than `radius` to `point`.
    ///
    /// Removal walks the collection back to front so pending indices stay
    /// valid; removed targets are returned in that order.
    pub(crate) fn remove_within_radius(&mut self, point: Vec3, radius: f32) -> Vec<Target> {
        let mut removed = Vec::new();
        for index in (0..self.targets.len()).rev() {
            if self.targets[index].position.distance(point) < radius {
                removed.push(self.targets.remove(index));
            }
        }
        removed
    }

    /// Captures snapshots of the remaining targets.
    pub(crate) fn snapshots(&self) -> Vec<TargetSnapshot> {
        self.targets
            .iter()
            .map(|target| TargetSnapshot {
                id: target.id,
                position: target.position,
            })
            .collect()
    }
}
