//! Connector security configuration
//!
//! Seven independent capability flags, read once at startup. Sources are
//! layered: built-in defaults, then an optional file (TOML/JSON/YAML by
//! extension), then `LAKEGATE_*` environment variables. Every flag
//! defaults to `false`.

use ::config::Source;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix, e.g. `LAKEGATE_ALLOW_DROP_TABLE=true`
pub const ENV_PREFIX: &str = "LAKEGATE";

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load security config: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Capability flags for the legacy access-control policy.
///
/// File keys may use either `allow_drop_table` or `allow-drop-table`;
/// both are overridden by `LAKEGATE_ALLOW_DROP_TABLE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySecurityConfig {
    allow_drop_table: bool,
    allow_rename_table: bool,
    allow_add_column: bool,
    allow_drop_column: bool,
    allow_rename_column: bool,
    allow_drop_constraint: bool,
    allow_add_constraint: bool,
}

impl LegacySecurityConfig {
    /// Load the configuration from defaults, an optional file and the
    /// environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is missing or unreadable, or a
    /// flag is not a boolean.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layers(path, environment())
    }

    fn load_layers(
        path: Option<&Path>,
        environment: ::config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            let file = ::config::Config::builder()
                .add_source(::config::File::from(path).required(true))
                .build()?;
            // `allow-drop-table` and `LAKEGATE_ALLOW_DROP_TABLE` must land on one key.
            for (key, value) in file.collect()? {
                builder = builder.set_default(key.replace('-', "_"), value)?;
            }
        }
        let settings = builder.add_source(environment).build()?;
        let config: Self = settings.try_deserialize()?;
        tracing::debug!(?config, "Loaded connector security config");
        Ok(config)
    }

    #[must_use]
    pub const fn allow_drop_table(&self) -> bool {
        self.allow_drop_table
    }

    #[must_use]
    pub const fn allow_rename_table(&self) -> bool {
        self.allow_rename_table
    }

    #[must_use]
    pub const fn allow_add_column(&self) -> bool {
        self.allow_add_column
    }

    #[must_use]
    pub const fn allow_drop_column(&self) -> bool {
        self.allow_drop_column
    }

    #[must_use]
    pub const fn allow_rename_column(&self) -> bool {
        self.allow_rename_column
    }

    #[must_use]
    pub const fn allow_drop_constraint(&self) -> bool {
        self.allow_drop_constraint
    }

    #[must_use]
    pub const fn allow_add_constraint(&self) -> bool {
        self.allow_add_constraint
    }

    #[must_use]
    pub const fn with_allow_drop_table(mut self, allow: bool) -> Self {
        self.allow_drop_table = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_rename_table(mut self, allow: bool) -> Self {
        self.allow_rename_table = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_add_column(mut self, allow: bool) -> Self {
        self.allow_add_column = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_drop_column(mut self, allow: bool) -> Self {
        self.allow_drop_column = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_rename_column(mut self, allow: bool) -> Self {
        self.allow_rename_column = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_drop_constraint(mut self, allow: bool) -> Self {
        self.allow_drop_constraint = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_add_constraint(mut self, allow: bool) -> Self {
        self.allow_add_constraint = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env_vars(vars: &[(&str, &str)]) -> ::config::Environment {
        let vars: ::config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_default_denies_everything() {
        let config = LegacySecurityConfig::default();
        assert!(!config.allow_drop_table());
        assert!(!config.allow_rename_table());
        assert!(!config.allow_add_column());
        assert!(!config.allow_drop_column());
        assert!(!config.allow_rename_column());
        assert!(!config.allow_drop_constraint());
        assert!(!config.allow_add_constraint());
    }

    #[test]
    fn test_builder_sets_only_named_flag() {
        let config = LegacySecurityConfig::default().with_allow_rename_column(true);
        assert!(config.allow_rename_column());
        assert!(!config.allow_drop_table());
        assert!(!config.allow_add_constraint());
    }

    #[test]
    fn test_load_toml_snake_case() {
        let file = write_config(
            ".toml",
            "allow_drop_table = true\nallow_add_column = true\n",
        );
        let config = LegacySecurityConfig::load(Some(file.path())).unwrap();
        assert!(config.allow_drop_table());
        assert!(config.allow_add_column());
        assert!(!config.allow_rename_table());
    }

    #[test]
    fn test_load_toml_property_spelling() {
        let file = write_config(
            ".toml",
            "allow-rename-table = true\nallow-drop-constraint = true\nunrelated = 1\n",
        );
        let config = LegacySecurityConfig::load(Some(file.path())).unwrap();
        assert!(config.allow_rename_table());
        assert!(config.allow_drop_constraint());
        assert!(!config.allow_drop_table());
    }

    #[test]
    fn test_load_json() {
        let file = write_config(".json", r#"{"allow_drop_column": true}"#);
        let config = LegacySecurityConfig::load(Some(file.path())).unwrap();
        assert!(config.allow_drop_column());
    }

    #[test]
    fn test_load_rejects_non_boolean() {
        let file = write_config(".toml", "allow_drop_table = \"sometimes\"\n");
        assert!(LegacySecurityConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = LegacySecurityConfig::load(Some(Path::new("/nonexistent/security.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_env_alone_sets_flag() {
        let env = env_vars(&[("LAKEGATE_ALLOW_DROP_COLUMN", "true")]);
        let config = LegacySecurityConfig::load_layers(None, env).unwrap();
        assert!(config.allow_drop_column());
        assert!(!config.allow_drop_table());
    }

    #[test]
    fn test_env_ignores_other_prefixes() {
        let env = env_vars(&[("OTHER_ALLOW_DROP_TABLE", "true")]);
        let config = LegacySecurityConfig::load_layers(None, env).unwrap();
        assert_eq!(config, LegacySecurityConfig::default());
    }

    #[test]
    fn test_env_overrides_snake_case_file_key() {
        let file = write_config(".toml", "allow_drop_table = true\nallow_add_column = true\n");
        let config = LegacySecurityConfig::load_layers(
            Some(file.path()),
            env_vars(&[("LAKEGATE_ALLOW_DROP_TABLE", "false")]),
        )
        .unwrap();
        assert!(!config.allow_drop_table());
        assert!(config.allow_add_column());
    }

    #[test]
    fn test_env_overrides_property_spelling_file_key() {
        let file = write_config(
            ".toml",
            "allow-drop-table = true\nallow-rename-column = true\n",
        );
        let config = LegacySecurityConfig::load_layers(
            Some(file.path()),
            env_vars(&[("LAKEGATE_ALLOW_DROP_TABLE", "false")]),
        )
        .unwrap();
        assert!(!config.allow_drop_table());
        assert!(config.allow_rename_column());
    }

    #[test]
    fn test_env_rejects_non_boolean() {
        let result = LegacySecurityConfig::load_layers(
            None,
            env_vars(&[("LAKEGATE_ALLOW_RENAME_TABLE", "maybe")]),
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_values_stable_across_reads() {
        let config = LegacySecurityConfig::default()
            .with_allow_drop_table(true)
            .with_allow_add_constraint(true);
        for _ in 0..3 {
            assert!(config.allow_drop_table());
            assert!(config.allow_add_constraint());
            assert!(!config.allow_rename_table());
        }
    }
}
