use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{AnalysisConfig, LoggingConfig};

impl AnalysisConfig {
    /// Validate semantic invariants for a configuration.
    ///
    /// Validation is best-effort: it reports as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_resolve(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_resolve(config: &AnalysisConfig, out: &mut ValidationDiagnostics) {
    if matches!(config.resolve.max_implementors, Some(0)) {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "resolve.max_implementors".to_string(),
            message: "must be >= 1".to_string(),
        });
    }

}

fn validate_logging(config: &AnalysisConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}
