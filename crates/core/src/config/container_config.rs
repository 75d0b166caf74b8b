use crate::config::{ConfigError, ConfigValidator, NonEmptyValidator};
use crate::container::ServiceScope;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// What happens when a key is registered a second time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The new registration replaces the old one
    #[default]
    Replace,
    /// The second registration fails
    Reject,
}

impl DuplicatePolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Replace => "replace",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(DuplicatePolicy::Replace),
            "reject" => Ok(DuplicatePolicy::Reject),
            _ => Err(ConfigError::invalid_value(
                "duplicate_policy",
                s,
                "replace or reject",
            )),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Container configuration
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// ```yaml
/// name: api
/// default_scope: transient
/// duplicate_policy: reject
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Name used in log output
    pub name: String,
    /// Scope applied to registrations that do not choose one
    pub default_scope: ServiceScope,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            default_scope: ServiceScope::Singleton,
            duplicate_policy: DuplicatePolicy::Replace,
        }
    }
}

impl ContainerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, picking the format from its extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::parsing_error(format!(
                "unsupported configuration file '{}': expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        NonEmptyValidator::new("name").validate(&self.name)?;

        if self.name.chars().any(char::is_control) {
            return Err(ConfigError::validation_failed(
                "container name must not contain control characters",
            ));
        }

        Ok(())
    }

    /// Set the container name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the scope for registrations that do not choose one
    pub fn with_default_scope(mut self, scope: ServiceScope) -> Self {
        self.default_scope = scope;
        self
    }

    /// Set what happens when a key is registered twice
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContainerConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.default_scope, ServiceScope::Singleton);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let config = ContainerConfig::from_yaml_str(
            "name: api\ndefault_scope: transient\nduplicate_policy: reject\n",
        )
        .unwrap();

        assert_eq!(config.name, "api");
        assert_eq!(config.default_scope, ServiceScope::Transient);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ContainerConfig::from_json_str(r#"{"duplicate_policy": "reject"}"#).unwrap();

        assert_eq!(config.name, "default");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            ContainerConfig::from_yaml_str("default_scope: scoped\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            ContainerConfig::from_json_str(r#"{"name": ""}"#),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = std::env::temp_dir().join(format!("servicekit-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let yaml = dir.join("container.yml");
        std::fs::write(&yaml, "name: from-file\n").unwrap();
        assert_eq!(ContainerConfig::from_file(&yaml).unwrap().name, "from-file");

        let json = dir.join("container.JSON");
        std::fs::write(&json, r#"{"name": "json-file", "default_scope": "transient"}"#).unwrap();
        let config = ContainerConfig::from_file(&json).unwrap();
        assert_eq!(config.name, "json-file");
        assert_eq!(config.default_scope, ServiceScope::Transient);

        let toml = dir.join("container.toml");
        std::fs::write(&toml, "name = 'x'\n").unwrap();
        assert!(matches!(
            ContainerConfig::from_file(&toml),
            Err(ConfigError::ParsingError { .. })
        ));

        assert!(matches!(
            ContainerConfig::from_file(dir.join("missing.json")),
            Err(ConfigError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_control_characters_in_name() {
        let result = ContainerConfig::from_json_str(r#"{"name": "api\nprod"}"#);
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));

        let config = ContainerConfig::default().with_name("api\tprod");
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Configuration validation failed: container name must not contain control characters"
        );
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("Reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!(DuplicatePolicy::Replace.to_string(), "replace");
        assert!("merge".parse::<DuplicatePolicy>().is_err());
    }
}
