//! Centralized sketch options with TOML preset support.
//!
//! All tweakable settings (blob layout, spread tuning, flow noise, display)
//! are consolidated here. Options serialize to/from TOML for presets stored
//! in `assets/presets/`.

mod display;
mod noise;
mod seed;
mod spread;

use std::path::Path;

pub use display::DisplayOptions;
pub use noise::NoiseOptions;
use schemars::JsonSchema;
pub use seed::SeedOptions;
use serde::{Deserialize, Serialize};
pub use spread::SpreadOptions;

use crate::error::InkflowError;
use crate::params::MAX_BLOBS;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[spread]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Seed pass blob layout.
    pub seed: SeedOptions,
    /// Spread pass tuning.
    pub spread: SpreadOptions,
    /// Flow-field noise parameters.
    pub noise: NoiseOptions,
    /// Window, pacing, and presentation colors.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the tweakable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Io`] if the file cannot be read,
    /// [`InkflowError::OptionsParse`] for malformed TOML, and
    /// [`InkflowError::InvalidOptions`] if [`validate`](Self::validate)
    /// rejects the result.
    pub fn load(path: &Path) -> Result<Self, InkflowError> {
        let content = std::fs::read_to_string(path).map_err(InkflowError::Io)?;
        let options = Self::from_toml(&content)?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Parse and validate options from a TOML string.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn from_toml(content: &str) -> Result<Self, InkflowError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| InkflowError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::OptionsParse`] if serialization fails and
    /// [`InkflowError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), InkflowError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| InkflowError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(InkflowError::Io)?;
        }
        std::fs::write(path, content).map_err(InkflowError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Reject options the pipeline cannot render.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::InvalidOptions`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), InkflowError> {
        let invalid = |msg: String| Err(InkflowError::InvalidOptions(msg));

        let blobs = &self.seed.blobs;
        if blobs.is_empty() || blobs.len() > MAX_BLOBS {
            return invalid(format!(
                "seed.blobs must hold 1..={MAX_BLOBS} blobs, got {}",
                blobs.len()
            ));
        }
        for (i, blob) in blobs.iter().enumerate() {
            let finite = blob
                .amplitude
                .iter()
                .chain(&blob.speed)
                .all(|v| v.is_finite());
            if !finite || !(blob.radius.is_finite() && blob.radius > 0.0) {
                return invalid(format!(
                    "seed.blobs[{i}] needs finite values and a positive radius"
                ));
            }
        }

        let spread = &self.spread;
        for (name, value) in [
            ("flow_scale", spread.flow_scale),
            ("blur_radius", spread.blur_radius),
            ("decay_rate", spread.decay_rate),
            ("decay_floor", spread.decay_floor),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!(
                    "spread.{name} must be finite and >= 0, got {value}"
                ));
            }
        }

        let noise = &self.noise;
        if noise.width < 2 || noise.height < 2 {
            return invalid(format!(
                "noise field must be at least 2x2, got {}x{}",
                noise.width, noise.height
            ));
        }
        if !(noise.frequency.is_finite() && noise.frequency > 0.0)
            || !noise.speed.is_finite()
        {
            return invalid("noise.frequency must be > 0 and noise.speed finite".into());
        }

        let display = &self.display;
        if display.width == 0 || display.height == 0 {
            return invalid("display size must be non-zero".into());
        }
        if !(display.max_frame_delta.is_finite() && display.max_frame_delta > 0.0)
        {
            return invalid("display.max_frame_delta must be > 0".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DEFAULT_BLOBS, DECAY_FLOOR};

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn default_options_are_valid() {
        Options::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[spread]
decay_rate = 0.25
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.spread.decay_rate, 0.25);
        // Everything else should be default
        assert_eq!(opts.spread.decay_floor, DECAY_FLOOR);
        assert_eq!(opts.seed.blobs, DEFAULT_BLOBS.to_vec());
        assert_eq!(opts.noise.width, 16);
    }

    #[test]
    fn blob_tables_parse() {
        let toml_str = r"
[[seed.blobs]]
amplitude = [0.3, 0.1]
speed = [1.0, 2.0]
radius = 0.04
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.seed.blobs.len(), 1);
        assert_eq!(opts.seed.blobs[0].amplitude, [0.3, 0.1]);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut opts = Options::default();
        opts.seed.blobs.clear();
        assert!(matches!(opts.validate(), Err(InkflowError::InvalidOptions(_))));

        let mut opts = Options::default();
        opts.seed.blobs = vec![DEFAULT_BLOBS[0]; MAX_BLOBS + 1];
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.seed.blobs[1].radius = 0.0;
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.spread.decay_floor = f32::NAN;
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.noise.width = 1;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml("[spread\nflow_scale = ").unwrap_err();
        assert!(matches!(err, InkflowError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("inkflow-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.display.background = [0.1, 0.0, 0.2];
        opts.save(&dir.join("violet.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loaded = Options::load(&dir.join("violet.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["violet".to_owned()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_preset_is_valid() {
        let opts = Options::from_toml(include_str!(
            "../../assets/presets/default.toml"
        ))
        .unwrap();
        assert_eq!(opts.seed.blobs, DEFAULT_BLOBS.to_vec());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("seed"));
        assert!(props.contains_key("spread"));
        assert!(props.contains_key("noise"));
        assert!(props.contains_key("display"));

        // Skipped fields should be absent
        let noise = &props["noise"]["properties"];
        assert!(noise.get("frequency").is_some());
        assert!(noise.get("seed").is_none());
        let display = &props["display"]["properties"];
        assert!(display.get("title").is_none());
    }
}
