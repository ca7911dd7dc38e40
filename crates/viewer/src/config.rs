use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{SpriteKey, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_ENV_VAR: &str = "FARM_VIEWER_CONFIG";
const DEFAULT_FRAMES_PER_SNAPSHOT: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config json at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid config value at {path}: {message}")]
    Invalid { path: &'static str, message: String },
}

/// Local geometry of one farm, in map units before rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub farm_building_distance: f32,
    pub farm_building_width: f32,
    pub field_offset: f32,
    pub field_distance: f32,
    pub field_width: f32,
    pub field_row_margin: f32,
    pub soup_factory_distance: f32,
    pub soup_factory_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            farm_building_distance: 100.0,
            farm_building_width: 150.0,
            field_offset: 250.0,
            field_distance: 120.0,
            field_width: 100.0,
            field_row_margin: 30.0,
            soup_factory_distance: 900.0,
            soup_factory_width: 150.0,
        }
    }
}

/// Sprite keys handed to the draw backend, one per visual kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteSet {
    pub employee: SpriteKey,
    pub tractor: SpriteKey,
    pub soup: SpriteKey,
    pub flood: SpriteKey,
    pub fire: SpriteKey,
    pub frost: SpriteKey,
    pub heat_wave: SpriteKey,
    pub blocked: SpriteKey,
    pub closed: SpriteKey,
    pub potato: SpriteKey,
    pub leek: SpriteKey,
    pub tomato: SpriteKey,
    pub onion: SpriteKey,
    pub zucchini: SpriteKey,
    /// Used for crop names the viewer does not know.
    pub fallback: SpriteKey,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self {
            employee: builtin_key("farm/farmer"),
            tractor: builtin_key("farm/tractor"),
            soup: builtin_key("farm/soup"),
            flood: builtin_key("climate/drops"),
            fire: builtin_key("climate/fire"),
            frost: builtin_key("climate/frost"),
            heat_wave: builtin_key("climate/drought"),
            blocked: builtin_key("overlay/blocked"),
            closed: builtin_key("overlay/closed"),
            potato: builtin_key("crops/potato"),
            leek: builtin_key("crops/leek"),
            tomato: builtin_key("crops/tomato"),
            onion: builtin_key("crops/onion"),
            zucchini: builtin_key("crops/zucchini"),
            fallback: builtin_key("farm/crate"),
        }
    }
}

fn builtin_key(key: &'static str) -> SpriteKey {
    SpriteKey::parse(key).unwrap_or_else(|error| panic!("builtin sprite key '{key}': {error}"))
}

/// How farms are arranged on the shared map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub center_x: f32,
    pub center_y: f32,
    pub ring_radius: f32,
}

impl MapConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            ring_radius: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub sprites: SpriteSet,
    pub map: MapConfig,
    /// Frames rendered between two snapshots in headless replay.
    pub frames_per_snapshot: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            sprites: SpriteSet::default(),
            map: MapConfig::default(),
            frames_per_snapshot: DEFAULT_FRAMES_PER_SNAPSHOT,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config = match serde_path_to_error::deserialize::<_, ViewerConfig>(&mut deserializer)
        {
            Ok(config) => config,
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                return Err(ConfigError::Parse {
                    path,
                    message: source.to_string(),
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => {
                let path = PathBuf::from(value.trim());
                let config = Self::load(&path)?;
                info!(path = %path.display(), "config_loaded");
                Ok(config)
            }
            Ok(_) | Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(err) => {
                warn!(
                    env_var = CONFIG_ENV_VAR,
                    error = %err,
                    "unable to read config env var; falling back to defaults"
                );
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frames_per_snapshot == 0 {
            return Err(ConfigError::Invalid {
                path: "frames_per_snapshot",
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.map.ring_radius.is_finite() && self.map.ring_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                path: "map.ring_radius",
                message: format!(
                    "expected a finite non-negative radius, got {}",
                    self.map.ring_radius
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ViewerConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "layout": { "field_distance": 200.0 }, "sprites": { "soup": "fx/soup-bowl" } }"#,
        )
        .expect("config");
        assert_eq!(config.layout.field_distance, 200.0);
        assert_eq!(config.layout.field_offset, LayoutConfig::default().field_offset);
        assert_eq!(config.sprites.soup.as_str(), "fx/soup-bowl");
        assert_eq!(config.sprites.tractor, SpriteSet::default().tractor);
    }

    #[test]
    fn invalid_sprite_key_reports_json_path() {
        let error = ViewerConfig::from_json_str(r#"{ "sprites": { "fire": "Fire.png" } }"#)
            .expect_err("invalid key");
        match error {
            ConfigError::Parse { path, message } => {
                assert_eq!(path, "sprites.fire");
                assert!(message.contains("invalid character"), "message={message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = ViewerConfig::from_json_str(r#"{ "layout": { "barn_size": 3 } }"#)
            .expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse { .. }), "error={error}");
    }

    #[test]
    fn zero_frames_per_snapshot_is_invalid() {
        let error =
            ViewerConfig::from_json_str(r#"{ "frames_per_snapshot": 0 }"#).expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                path: "frames_per_snapshot",
                ..
            }
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "frames_per_snapshot": 4 }}"#).expect("write config");
        let config = ViewerConfig::load(file.path()).expect("config");
        assert_eq!(config.frames_per_snapshot, 4);

        let missing = file.path().with_extension("missing");
        let error = ViewerConfig::load(&missing).expect_err("missing file");
        assert!(matches!(error, ConfigError::Read { .. }));
    }
}
