//! External fixed-layout conversion
//!
//! The converter is an opaque command-line program. It is given the merged
//! `{id}.docx` and must leave `{id}.pdf` next to it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ConversionError;
use crate::output::OutputPaths;

/// Converts a merged document into its fixed-layout form
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Converts `paths.docx` and returns the path of the produced file
    async fn convert(&self, paths: &OutputPaths) -> Result<PathBuf, ConversionError>;

    /// Program or adapter name, for logs
    fn name(&self) -> &str;
}

/// Headless office suite invoked in batch mode
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: String,
    timeout: Duration,
}

impl OfficeConverter {
    pub const DEFAULT_PROGRAM: &'static str = "soffice";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Arguments passed to the program for one conversion
    ///
    /// Each run gets its own user profile directory; concurrent instances
    /// sharing a profile refuse to start.
    pub fn arguments(&self, paths: &OutputPaths, profile: &Path) -> Vec<String> {
        let out_dir = paths.docx.parent().unwrap_or_else(|| Path::new("."));
        vec![
            "--headless".to_string(),
            format!("-env:UserInstallation=file://{}", profile.display()),
            "--convert-to".to_string(),
            "pdf".to_string(),
            "--outdir".to_string(),
            out_dir.display().to_string(),
            paths.docx.display().to_string(),
        ]
    }

    fn profile_dir(paths: &OutputPaths) -> PathBuf {
        let stem = paths
            .docx
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("office-profile-{}", stem));
        if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir().map(|cwd| cwd.join(&dir)).unwrap_or(dir)
        }
    }
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM, Self::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl DocumentConverter for OfficeConverter {
    async fn convert(&self, paths: &OutputPaths) -> Result<PathBuf, ConversionError> {
        let profile = Self::profile_dir(paths);
        let args = self.arguments(paths, &profile);
        debug!(program = %self.program, ?args, "Starting converter");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let waited = tokio::time::timeout(self.timeout, child.wait_with_output()).await;
        if let Err(e) = tokio::fs::remove_dir_all(&profile).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %profile.display(), error = %e, "Failed to remove converter profile");
            }
        }

        let output = match waited {
            Ok(result) => result.map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ConversionError::TimedOut {
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ConversionError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match tokio::fs::try_exists(&paths.pdf).await {
            Ok(true) => Ok(paths.pdf.clone()),
            _ => Err(ConversionError::MissingOutput(paths.pdf.display().to_string())),
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
