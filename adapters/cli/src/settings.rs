//! Session configuration assembled from presets, TOML files and flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use cubesnake_core::{MovementStrategy, SessionConfig};
use toml::{Table, Value};

/// Named starting points for the session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    /// Short rigid chain steered through the wrapping volume.
    Classic,
    /// Long smoothed chain that hunts the nearest target.
    Pursuit,
}

impl Preset {
    fn config(self) -> SessionConfig {
        match self {
            Self::Classic => SessionConfig::classic(),
            Self::Pursuit => SessionConfig::pursuit(),
        }
    }
}

/// Movement strategy selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// Steer along the heading and wrap through the faces.
    Wrap,
    /// Chase the nearest remaining target.
    Pursuit,
}

impl From<StrategyArg> for MovementStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Wrap => Self::DirectionalWrap,
            StrategyArg::Pursuit => Self::NearestPursuit,
        }
    }
}

/// Values given on the command line that take precedence over every file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) strategy: Option<StrategyArg>,
    pub(crate) seed: Option<u64>,
}

/// Builds the validated configuration for a session.
///
/// Keys present in the TOML file replace the preset's values; overrides from
/// the command line win over both.
pub(crate) fn resolve(
    preset: Preset,
    file: Option<&Path>,
    overrides: Overrides,
) -> Result<SessionConfig> {
    let mut config = match file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            layer(preset.config(), &contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => preset.config(),
    };

    if let Some(strategy) = overrides.strategy {
        config.strategy = strategy.into();
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }

    config.validate().context("invalid session configuration")?;
    Ok(config)
}

fn layer(base: SessionConfig, contents: &str) -> Result<SessionConfig> {
    let overlay: Table = contents.parse().context("config is not valid TOML")?;
    let mut merged = match Value::try_from(base).context("failed to encode base config")? {
        Value::Table(table) => table,
        _ => Table::new(),
    };
    merge(&mut merged, overlay);
    Value::Table(merged)
        .try_into()
        .context("config does not describe a session")
}

/// Copies `overlay` onto `base`, descending into tables present in both.
fn merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(nested)) => merge(existing, nested),
            (_, value) => {
                let _ = base.insert(key, value);
            }
        }
    }
}
