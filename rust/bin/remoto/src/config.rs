//! Tool configuration.
//!
//! Reads `remoto.toml` from the working directory (or the `--config` path).
//! Every key is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the working directory.
pub const DEFAULT_FILE: &str = "remoto.toml";

/// How `remoto parse` prints a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable rendering.
    #[default]
    Text,
    /// Pretty-printed JSON IR.
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotoConfig {
    /// Directory holding the `.remoto` schema files.
    pub schema_dir: PathBuf,

    /// Root of the code-generation template tree.
    pub templates_dir: PathBuf,

    pub format: Format,
}

impl Default for RemotoConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("."),
            templates_dir: PathBuf::from("templates"),
            format: Format::Text,
        }
    }
}

impl RemotoConfig {
    /// Load an explicitly named config file. A missing file is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read {}: {}", path.display(), e))?;
        let config: RemotoConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load `--config` if given, else `remoto.toml` in `cwd` if it exists,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = cwd.join(DEFAULT_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Apply command-line overrides.
    pub fn apply(
        &mut self,
        schema_dir: Option<PathBuf>,
        templates_dir: Option<PathBuf>,
        format: Option<Format>,
    ) {
        if let Some(dir) = schema_dir {
            self.schema_dir = dir;
        }
        if let Some(dir) = templates_dir {
            self.templates_dir = dir;
        }
        if let Some(format) = format {
            self.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RemotoConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("."));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.format, Format::Text);
    }

    #[test]
    fn file_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_FILE),
            "schema_dir = \"schema\"\nformat = \"json\"\n",
        )
        .unwrap();
        let config = RemotoConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("schema"));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.format, Format::Json);
    }

    #[test]
    fn flags_override_file() {
        let mut config: RemotoConfig = toml::from_str("schema_dir = \"a\"\nformat = \"json\"").unwrap();
        config.apply(Some(PathBuf::from("b")), None, Some(Format::Text));
        assert_eq!(config.schema_dir, PathBuf::from("b"));
        assert_eq!(config.format, Format::Text);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = RemotoConfig::resolve(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("read "));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(toml::from_str::<RemotoConfig>("format = \"yaml\"").is_err());
    }

    #[test]
    fn roundtrip() {
        let config = RemotoConfig {
            schema_dir: PathBuf::from("api"),
            templates_dir: PathBuf::from("tmpl"),
            format: Format::Json,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: RemotoConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.schema_dir, config.schema_dir);
        assert_eq!(back.templates_dir, config.templates_dir);
        assert_eq!(back.format, Format::Json);
    }
}
