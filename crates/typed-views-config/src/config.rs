//! Top-level configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, SchemaConfig};

/// Complete typed-views configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use typed_views_config::TypedViewsConfig;
///
/// let config = TypedViewsConfig::default();
/// assert!(config.schema.packages.is_empty());
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct TypedViewsConfig {
    /// Complex-schema configuration.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TypedViewsConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TypedViewsConfigBuilder {
        TypedViewsConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - a schema package does not name a known family
    /// - the log level is empty while logging is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schema.families()?;

        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty when logging is enabled",
            ));
        }

        Ok(())
    }

    /// Development preset: every schema family, pretty debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use typed_views_config::TypedViewsConfig;
    ///
    /// let config = TypedViewsConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.schema.packages.len(), 3);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            schema: SchemaConfig {
                packages: vec![
                    "serde".to_string(),
                    "validator".to_string(),
                    "declarative".to_string(),
                ],
            },
            logging: LoggingConfig {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ansi_enabled: true,
                include_location: true,
            },
        }
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Builder for [`TypedViewsConfig`].
#[derive(Debug, Default)]
pub struct TypedViewsConfigBuilder {
    schema: Option<SchemaConfig>,
    logging: Option<LoggingConfig>,
}

impl TypedViewsConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema configuration.
    #[must_use]
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Enable one schema family by name.
    #[must_use]
    pub fn schema_package(mut self, name: impl Into<String>) -> Self {
        self.schema
            .get_or_insert_with(SchemaConfig::default)
            .packages
            .push(name.into());
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TypedViewsConfig {
        TypedViewsConfig {
            schema: self.schema.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<TypedViewsConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TypedViewsConfig::default().validate().is_ok());
        assert!(TypedViewsConfig::development().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TypedViewsConfig::builder()
            .schema_package("serde")
            .schema_package("validator")
            .build();
        assert_eq!(config.schema.packages, vec!["serde", "validator"]);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_build_validated_rejects_unknown_package() {
        let result = TypedViewsConfig::builder()
            .schema_package("pydantic")
            .build_validated();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_level_rejected() {
        let config = TypedViewsConfig::builder()
            .logging(LoggingConfig {
                level: " ".to_string(),
                ..LoggingConfig::default()
            })
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<TypedViewsConfig, _> = toml::from_str("[server]\nport = 1");
        assert!(result.is_err());
    }
}
