//! Runtime settings and simulation tuning
//!
//! Read from the page query string on web, from an optional JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Tuned constants for the repulsion heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fraction of velocity kept each integration ("friction")
    pub damping: f32,
    /// Accumulated force is divided by `count^force_exponent`
    pub force_exponent: f32,
    /// Speeds below this snap to zero
    pub rest_threshold: f32,
    /// Hard speed cap (cells per tick)
    pub max_speed: f32,
    /// Fraction of velocity applied per move
    pub step_fraction: f32,
    /// Sampling window reach in cells
    pub sample_radius: i32,
    /// Exclusion window reach; cells with `|d| < half_extent` are walls
    pub exclusion_half_extent: i32,
    /// Chance per cell of spawning a square
    pub spawn_probability: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            force_exponent: FORCE_EXPONENT,
            rest_threshold: REST_THRESHOLD,
            max_speed: MAX_SPEED,
            step_fraction: STEP_FRACTION,
            sample_radius: SAMPLE_RADIUS,
            exclusion_half_extent: EXCLUSION_HALF_EXTENT,
            spawn_probability: SPAWN_PROBABILITY,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(Error::InvalidSettings(format!(
                "damping must be within 0..=1, got {}",
                self.damping
            )));
        }
        if !self.force_exponent.is_finite() || self.force_exponent < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "force_exponent must be finite and non-negative, got {}",
                self.force_exponent
            )));
        }
        if !(self.rest_threshold >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "rest_threshold must be non-negative, got {}",
                self.rest_threshold
            )));
        }
        if !(self.max_speed > 0.0) || self.max_speed < self.rest_threshold {
            return Err(Error::InvalidSettings(format!(
                "max_speed must be positive and above rest_threshold, got {}",
                self.max_speed
            )));
        }
        if !(self.step_fraction > 0.0 && self.step_fraction <= 1.0) {
            return Err(Error::InvalidSettings(format!(
                "step_fraction must be within (0, 1], got {}",
                self.step_fraction
            )));
        }
        if self.sample_radius < 1 {
            return Err(Error::InvalidSettings(format!(
                "sample_radius must be at least 1, got {}",
                self.sample_radius
            )));
        }
        if self.exclusion_half_extent < 0 {
            return Err(Error::InvalidSettings(format!(
                "exclusion_half_extent must be non-negative, got {}",
                self.exclusion_half_extent
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(Error::InvalidSettings(format!(
                "spawn_probability must be within 0..=1, got {}",
                self.spawn_probability
            )));
        }
        Ok(())
    }
}

/// Host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cell side in pixels
    pub cell_size: f32,
    /// Marker side in pixels
    pub marker_size: f32,
    /// Simulation steps per second
    pub fps: f64,
    /// Resize quiet period in milliseconds
    pub resize_debounce_ms: f64,
    /// Fixed RNG seed (clock-seeded when absent)
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            marker_size: MARKER_SIZE,
            fps: TARGET_FPS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Step interval in milliseconds
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size >= 1.0) || !self.cell_size.is_finite() {
            return Err(Error::InvalidSettings(format!(
                "cell_size must be at least 1px, got {}",
                self.cell_size
            )));
        }
        if !(self.marker_size > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "marker_size must be positive, got {}",
                self.marker_size
            )));
        }
        if !(self.fps > 0.0) || !self.fps.is_finite() {
            return Err(Error::InvalidSettings(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(self.resize_debounce_ms >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "resize_debounce_ms must be non-negative, got {}",
                self.resize_debounce_ms
            )));
        }
        self.tuning.validate()
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `key=value` pairs from a URL query string (`?fps=30&cell=4`).
    ///
    /// Unknown keys and unparsable values are logged and skipped. If the
    /// result fails validation the defaults are returned instead.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if !settings.apply_pair(key, value) {
                log::warn!("Ignoring setting {}={:?}", key, value);
            }
        }

        match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("{}; falling back to defaults", e);
                Self::default()
            }
        }
    }

    fn apply_pair(&mut self, key: &str, value: &str) -> bool {
        match key.to_lowercase().as_str() {
            "cell" | "cell_size" => parse_into(value, &mut self.cell_size),
            "marker" | "marker_size" => parse_into(value, &mut self.marker_size),
            "fps" => parse_into(value, &mut self.fps),
            "debounce" => parse_into(value, &mut self.resize_debounce_ms),
            "seed" => value.parse().map(|s| self.seed = Some(s)).is_ok(),
            "damping" => parse_into(value, &mut self.tuning.damping),
            "exponent" => parse_into(value, &mut self.tuning.force_exponent),
            "max_speed" => parse_into(value, &mut self.tuning.max_speed),
            "density" => parse_into(value, &mut self.tuning.spawn_probability),
            _ => false,
        }
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if query.is_empty() {
            log::info!("Using default settings");
        }
        Self::from_query(&query)
    }

    /// Load settings from an optional JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    Error::InvalidSettings(format!("cannot read {}: {}", path.display(), e))
                })?;
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }
}

fn parse_into<T: std::str::FromStr>(value: &str, slot: &mut T) -> bool {
    match value.parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.interval_ms(), 50.0);
        assert_eq!(settings.tuning.damping, 0.3);
    }

    #[test]
    fn test_from_query() {
        let settings = Settings::from_query("?fps=30&cell=4&seed=7&bogus=1");
        assert_eq!(settings.fps, 30.0);
        assert_eq!(settings.cell_size, 4.0);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_from_query_invalid_falls_back() {
        let settings = Settings::from_query("fps=0");
        assert_eq!(settings, Settings::default());

        // Unparsable value is skipped, the rest still applies
        let settings = Settings::from_query("fps=fast&damping=0.5");
        assert_eq!(settings.fps, TARGET_FPS);
        assert_eq!(settings.tuning.damping, 0.5);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"fps": 10, "tuning": {"max_speed": 2.5}}"#)
            .expect("valid settings");
        assert_eq!(settings.fps, 10.0);
        assert_eq!(settings.tuning.max_speed, 2.5);
        assert_eq!(settings.tuning.damping, DAMPING);
        assert_eq!(settings.cell_size, CELL_SIZE);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"tuning": {"spawn_probability": 2.0}}"#),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(Settings::from_json("{nope"), Err(Error::Parse(_))));
    }
}
