use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use glam::Vec3;
use globe_common::Facility;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    common::arc::DEFAULT_ARC_SAMPLES,
    render::color::{ColorParseError, parse_hex_color},
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("Invalid emissions color: {0}")]
    Color(#[from] ColorParseError),
    #[error("Invalid setting {name}: {reason}")]
    OutOfRange { name: &'static str, reason: String },
}

/// Tunables of the globe view.
///
/// Layered from built-in defaults, an optional TOML file and `GLOBE_*`
/// environment variables, in that order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    pub arc_samples: usize,
    pub particle_increment: f64,
    pub hover_threshold_px: f64,
    pub globe_margin: f64,
    pub graticule_step_deg: f64,
    pub low_emissions_color: String,
    pub high_emissions_color: String,
    pub particle_seed: Option<u64>,
    pub facility: Facility,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            arc_samples: DEFAULT_ARC_SAMPLES,
            particle_increment: 0.003,
            hover_threshold_px: 12.0,
            globe_margin: 0.9,
            graticule_step_deg: 10.0,
            low_emissions_color: "#22c55e".to_owned(),
            high_emissions_color: "#ef4444".to_owned(),
            particle_seed: None,
            facility: Facility::new("Main facility", -98.5795, 39.8283),
        }
    }
}

impl GlobeSettings {
    /// Loads `path` if given, otherwise an optional `Settings.toml` in the
    /// working directory, then applies `GLOBE_*` environment overrides
    /// (`GLOBE_FACILITY__NAME` for nested fields).
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("Settings").required(false),
        };
        Self::build(
            Config::builder().add_source(file).add_source(
                Environment::with_prefix("GLOBE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: GlobeSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        log::debug!("Loaded globe settings: {settings:?}");
        Ok(settings)
    }

    pub fn emission_colors(&self) -> Result<(Vec3, Vec3), SettingsError> {
        Ok((
            parse_hex_color(&self.low_emissions_color)?,
            parse_hex_color(&self.high_emissions_color)?,
        ))
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.emission_colors()?;

        let checks: [(&'static str, bool, &str); 4] = [
            (
                "particle_increment",
                self.particle_increment.is_finite() && self.particle_increment >= 0.0,
                "must be a finite, non-negative fraction of the arc",
            ),
            (
                "hover_threshold_px",
                self.hover_threshold_px.is_finite() && self.hover_threshold_px >= 0.0,
                "must be a finite, non-negative pixel distance",
            ),
            (
                "globe_margin",
                self.globe_margin > 0.0 && self.globe_margin <= 1.0,
                "must be in (0, 1]",
            ),
            (
                "graticule_step_deg",
                self.graticule_step_deg > 0.0 && self.graticule_step_deg <= 90.0,
                "must be in (0, 90]",
            ),
        ];

        match checks.into_iter().find(|(_, valid, _)| !valid) {
            Some((name, _, reason)) => Err(SettingsError::OutOfRange {
                name,
                reason: reason.to_owned(),
            }),
            None => Ok(()),
        }
    }
}
