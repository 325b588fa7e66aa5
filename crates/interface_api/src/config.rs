//! API configuration
//!
//! Every field can be overridden from the environment with the `API_`
//! prefix, e.g. `API_PORT=9000` or `API_TEMPLATE_DIR=/srv/templates`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use core_kernel::{CoreError, Timezone};
use domain_sales::DocumentSettings;
use domain_template::{ImageConstraint, OfficeConverter, TemplateRef};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string for the submission ledger
    pub database_url: String,
    pub log_level: String,
    /// Directory holding `proposta.docx` and `contrato.docx`
    pub template_dir: PathBuf,
    pub proposal_template: String,
    pub contract_template: String,
    /// Intermediate files; defaults to the system temp directory
    pub work_dir: Option<PathBuf>,
    /// Set to false to always serve the DOCX
    pub converter_enabled: bool,
    pub converter_program: String,
    pub converter_timeout_secs: u64,
    pub fallback_to_docx: bool,
    /// IANA name of the timezone that decides "today"
    pub timezone: String,
    pub retention_days: u32,
    pub list_limit: u32,
    /// Height of merged images in millimetres
    pub image_height_mm: u32,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/sales_docs".to_string(),
            log_level: "info".to_string(),
            template_dir: PathBuf::from("templates"),
            proposal_template: "proposta.docx".to_string(),
            contract_template: "contrato.docx".to_string(),
            work_dir: None,
            converter_enabled: true,
            converter_program: OfficeConverter::DEFAULT_PROGRAM.to_string(),
            converter_timeout_secs: OfficeConverter::DEFAULT_TIMEOUT.as_secs(),
            fallback_to_docx: true,
            timezone: "America/Sao_Paulo".to_string(),
            retention_days: 30,
            list_limit: 50,
            image_height_mm: 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the document service
    ///
    /// # Errors
    ///
    /// `CoreError::Temporal` if `timezone` is not an IANA name, and
    /// `CoreError::Configuration` for a zero listing limit or converter
    /// timeout.
    pub fn document_settings(&self) -> Result<DocumentSettings, CoreError> {
        if self.list_limit == 0 {
            return Err(CoreError::configuration("list_limit must be at least 1"));
        }
        if self.converter_enabled && self.converter_timeout_secs == 0 {
            return Err(CoreError::configuration(
                "converter_timeout_secs must be at least 1",
            ));
        }

        Ok(DocumentSettings {
            proposal_template: TemplateRef::literal(&self.proposal_template),
            contract_template: TemplateRef::expression(&self.contract_template),
            work_dir: self.work_dir.clone().unwrap_or_else(std::env::temp_dir),
            fallback_to_docx: self.fallback_to_docx,
            timezone: Timezone::parse(&self.timezone)?,
            retention_days: self.retention_days,
            list_limit: self.list_limit,
        })
    }

    pub fn image_constraint(&self) -> ImageConstraint {
        ImageConstraint::Height(self.image_height_mm)
    }

    /// The configured converter, or None when conversion is disabled
    pub fn converter(&self) -> Option<OfficeConverter> {
        self.converter_enabled.then(|| {
            OfficeConverter::new(
                self.converter_program.clone(),
                Duration::from_secs(self.converter_timeout_secs),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build_settings() {
        let config = ApiConfig::default();
        let settings = config.document_settings().unwrap();
        assert_eq!(settings.proposal_template.name, "proposta.docx");
        assert_eq!(settings.retention_days, 30);
        assert!(config.converter().is_some());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let config = ApiConfig {
            timezone: "Mars/Olympus".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.document_settings(), Err(CoreError::Temporal(_))));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = ApiConfig {
            list_limit: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.document_settings(),
            Err(CoreError::Configuration(message)) if message.contains("list_limit")
        ));

        let config = ApiConfig {
            converter_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.document_settings(), Err(CoreError::Configuration(_))));

        let config = ApiConfig {
            converter_enabled: false,
            converter_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(config.document_settings().is_ok());
    }

    #[test]
    fn test_converter_can_be_disabled() {
        let config = ApiConfig {
            converter_enabled: false,
            ..ApiConfig::default()
        };
        assert!(config.converter().is_none());
    }
}
