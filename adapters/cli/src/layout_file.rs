//! Hand-authored starting layouts loaded from TOML.
//!
//! A layout file pins the head position and every target, which makes a
//! session reproducible without relying on the random target batch:
//!
//! ```toml
//! head = [0.0, 0.0, 0.0]
//! targets = [[3.0, 0.0, 0.0], [0.0, -4.5, 2.0]]
//! ```

use std::{error::Error, fmt};

use cubesnake_core::Vec3;
use cubesnake_world::Layout;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    #[serde(default)]
    head: [f32; 3],
    targets: Vec<[f32; 3]>,
}

/// Parses a layout from the contents of a layout file.
pub(crate) fn parse(contents: &str) -> Result<Layout, LayoutFileError> {
    if contents.trim().is_empty() {
        return Err(LayoutFileError::EmptyFile);
    }

    let file: LayoutFile = toml::from_str(contents).map_err(LayoutFileError::InvalidToml)?;
    let head = point(file.head).ok_or(LayoutFileError::NonFiniteHead)?;
    let targets = file
        .targets
        .into_iter()
        .enumerate()
        .map(|(index, target)| point(target).ok_or(LayoutFileError::NonFiniteTarget { index }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Layout { head, targets })
}

fn point([x, y, z]: [f32; 3]) -> Option<Vec3> {
    let point = Vec3::new(x, y, z);
    point.is_finite().then_some(point)
}

/// Errors that can occur while reading a layout file.
#[derive(Debug)]
pub(crate) enum LayoutFileError {
    /// The file was empty or contained only whitespace.
    EmptyFile,
    /// The file was not a valid layout description.
    InvalidToml(toml::de::Error),
    /// The head position contained a non-finite coordinate.
    NonFiniteHead,
    /// A target position contained a non-finite coordinate.
    NonFiniteTarget {
        /// Position of the offending target within the file.
        index: usize,
    },
}

impl fmt::Display for LayoutFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFile => write!(f, "layout file was empty"),
            Self::InvalidToml(error) => write!(f, "could not parse layout file: {error}"),
            Self::NonFiniteHead => write!(f, "head position must be finite"),
            Self::NonFiniteTarget { index } => {
                write!(f, "target {index} has a non-finite coordinate")
            }
        }
    }
}

impl Error for LayoutFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidToml(error) => Some(error),
            _ => None,
        }
    }
}
