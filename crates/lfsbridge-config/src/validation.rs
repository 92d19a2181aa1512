// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Configuration validation

use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;

/// Log levels accepted in `observability.log_level`
pub const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Formats accepted in `observability.log_format`
pub const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Validator for configuration settings
pub trait Validator {
    /// Checks the settings, returning the first problem found
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.filter.validate()?;
        self.helper.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl Validator for FilterConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingRequired("filter.name".to_string()));
        }

        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::invalid_value(
                "filter.name",
                format!(
                    "'{}' may only contain letters, digits, '-' and '_'",
                    self.name
                ),
            ));
        }

        for pattern in &self.patterns {
            if pattern.trim().is_empty() || pattern.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid_value(
                    "filter.patterns",
                    format!("'{}' must be non-empty and contain no whitespace", pattern),
                ));
            }
        }

        Ok(())
    }
}

impl Validator for HelperConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::MissingRequired("helper.program".to_string()));
        }
        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_level",
                format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_format",
                format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_filter_name_rules() {
        let mut filter = FilterConfig {
            name: String::new(),
            ..Default::default()
        };
        assert!(matches!(filter.validate(), Err(ConfigError::MissingRequired(_))));

        filter.name = "large files".to_string();
        assert!(matches!(filter.validate(), Err(ConfigError::InvalidValue { .. })));

        filter.name = "media_lfs-2".to_string();
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_pattern_rules() {
        let mut filter = FilterConfig {
            patterns: vec!["*.psd".to_string(), "Audio/*.wav".to_string()],
            ..Default::default()
        };
        assert!(filter.validate().is_ok());

        filter.patterns.push("My Files/*.bin".to_string());
        assert!(filter.validate().is_err());

        filter.patterns = vec!["*.bin\n".to_string()];
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_helper_program_required() {
        let helper = HelperConfig {
            program: "  ".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(helper.validate(), Err(ConfigError::MissingRequired(f)) if f == "helper.program"));
    }

    #[test]
    fn test_observability_rules() {
        let mut observability = ObservabilityConfig {
            log_level: "WARN".to_string(),
            log_format: "Json".to_string(),
        };
        assert!(observability.validate().is_ok());

        observability.log_level = "loud".to_string();
        assert!(observability.validate().is_err());

        observability.log_level = "info".to_string();
        observability.log_format = "xml".to_string();
        assert!(observability.validate().is_err());
    }
}
