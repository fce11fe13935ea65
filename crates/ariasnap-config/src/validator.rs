//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError::InvalidValue`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_snapshot(config, &mut result);
        Self::validate_tracks(config, &mut result);
        Self::validate_logging(config, &mut result);
        result
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        if config.snapshot.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "snapshot.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if config.snapshot.timeout_ms > 120_000 {
            result.add_warning(ValidationWarning::new(
                "snapshot.timeout_ms",
                "timeout_ms is very high (>2 minutes), a hung frame will stall captures that long",
            ));
        }
    }

    fn validate_tracks(config: &Config, result: &mut ValidationResult) {
        if config.tracks.max_tracks == 0 {
            result.add_error(ValidationError::new(
                "tracks.max_tracks",
                "max_tracks must be greater than 0",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!("Unknown log level '{}'", config.logging.level),
            ));
        }

        if let Some(dir) = &config.logging.dir {
            if dir.trim().is_empty() {
                result.add_error(ValidationError::new("logging.dir", "dir cannot be empty"));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
