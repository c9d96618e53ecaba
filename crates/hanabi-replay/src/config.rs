use hanabi_core::game::{TableConfig, TableOptions};
use hanabi_core::model::{IdentitySet, Variant};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const MIN_PLAYERS: usize = 2;
const MAX_PLAYERS: usize = 6;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root replay configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReplayConfig {
    pub run_id: String,
    pub table: TableSection,
    pub input: InputConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReplayConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ReplayConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.table.validate()?;
        self.input.validate(&self.run_id)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            actions: resolve_template(&self.run_id, &self.input.actions),
            snapshot: resolve_template(&self.run_id, &self.outputs.snapshot),
            reports: resolve_template(&self.run_id, &self.outputs.reports),
        }
    }

    pub fn table_config(&self) -> TableConfig {
        self.table.to_table_config()
    }
}

/// Players, seat and variant of the replayed game.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableSection {
    pub players: Vec<String>,
    #[serde(default)]
    pub our_player_index: usize,
    #[serde(default)]
    pub variant: VariantConfig,
    #[serde(default)]
    pub options: TableOptions,
}

impl TableSection {
    fn validate(&self) -> Result<(), ValidationError> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ValidationError::InvalidField {
                field: "table.players".to_string(),
                message: format!("expected {MIN_PLAYERS} to {MAX_PLAYERS} players, found {count}"),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.players {
            if name.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "table.players".to_string(),
                    message: "player name must not be empty".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::InvalidField {
                    field: "table.players".to_string(),
                    message: format!("player name '{name}' listed more than once"),
                });
            }
        }

        if self.our_player_index >= count {
            return Err(ValidationError::InvalidField {
                field: "table.our_player_index".to_string(),
                message: format!("seat {} is outside a {count}-player table", self.our_player_index),
            });
        }

        if self.options.one_less_card && self.options.one_extra_card {
            return Err(ValidationError::InvalidField {
                field: "table.options".to_string(),
                message: "one_less_card and one_extra_card are mutually exclusive".to_string(),
            });
        }

        self.variant.validate()
    }

    fn to_table_config(&self) -> TableConfig {
        TableConfig {
            player_names: self.players.clone(),
            our_player_index: self.our_player_index,
            variant: self.variant.to_variant(),
            options: self.options,
        }
    }
}

/// Variant block. Without explicit suits, the first five standard colours are used.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VariantConfig {
    #[serde(default = "default_variant_name")]
    pub name: String,
    #[serde(default)]
    pub suits: Option<Vec<String>>,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            name: default_variant_name(),
            suits: None,
        }
    }
}

impl VariantConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let Some(suits) = self.suits.as_ref() else {
            return Ok(());
        };

        if suits.is_empty() || suits.len() > IdentitySet::MAX_SUITS {
            return Err(ValidationError::InvalidField {
                field: "table.variant.suits".to_string(),
                message: format!(
                    "expected 1 to {} suits, found {}",
                    IdentitySet::MAX_SUITS,
                    suits.len()
                ),
            });
        }

        if suits.iter().any(|suit| suit.trim().is_empty()) {
            return Err(ValidationError::InvalidField {
                field: "table.variant.suits".to_string(),
                message: "suit name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    fn to_variant(&self) -> Variant {
        match self.suits.as_ref() {
            Some(suits) => Variant::new(self.name.clone(), suits.clone()),
            None => Variant::no_variant(5),
        }
    }
}

fn default_variant_name() -> String {
    "No Variant".to_string()
}

/// Source of the action log.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    pub actions: String,
}

impl InputConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        validate_path("input.actions", &self.actions, run_id)
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub snapshot: String,
    pub reports: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        validate_path("outputs.snapshot", &self.snapshot, run_id)?;
        validate_path("outputs.reports", &self.reports, run_id)
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub clue_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            clue_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_path(label: &str, value: &str, run_id: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: label.to_string(),
            message: "path must not be empty".to_string(),
        });
    }

    let resolved = resolve_template(run_id, value);
    if resolved.components().count() == 0 {
        return Err(ValidationError::InvalidField {
            field: label.to_string(),
            message: "resolved path is invalid".to_string(),
        });
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved input and output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub actions: PathBuf,
    pub snapshot: PathBuf,
    pub reports: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "replay_smoke"
table:
  players: ["Alice", "Bob", "Cathy"]
  our_player_index: 1
  variant:
    name: "Rainbow (5 Suits)"
    suits: ["Red", "Yellow", "Green", "Blue", "Rainbow"]
input:
  actions: "replay/{run_id}/actions.json"
outputs:
  snapshot: "replay/out/{run_id}/snapshot.json"
  reports: "replay/out/{run_id}/reports.jsonl"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: ReplayConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.reports,
            PathBuf::from("replay/out/replay_smoke/reports.jsonl")
        );
        assert_eq!(
            outputs.actions,
            PathBuf::from("replay/replay_smoke/actions.json")
        );

        let table = cfg.table_config();
        assert_eq!(table.our_player_index, 1);
        assert_eq!(table.variant.num_suits(), 5);
        assert!(table.variant.suit_kind(4).all_colours);
    }

    #[test]
    fn missing_variant_defaults_to_no_variant() {
        let yaml = BASIC_YAML.replace(
            "  variant:\n    name: \"Rainbow (5 Suits)\"\n    suits: [\"Red\", \"Yellow\", \"Green\", \"Blue\", \"Rainbow\"]\n",
            "",
        );
        let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.table_config().variant.name, "No Variant");
    }

    #[test]
    fn rejects_seat_outside_table() {
        let yaml = BASIC_YAML.replace("our_player_index: 1", "our_player_index: 3");
        let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table.our_player_index"
        ));
    }

    #[test]
    fn rejects_duplicate_players() {
        let yaml = BASIC_YAML.replace("\"Cathy\"", "\"Bob\"");
        let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table.players"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("replay_smoke", "replay smoke!");
        let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn empty_tracing_level_is_normalized() {
        let yaml = BASIC_YAML.replace("tracing_level: \"debug\"", "tracing_level: \"\"");
        let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.tracing_level, "info");
    }
}
