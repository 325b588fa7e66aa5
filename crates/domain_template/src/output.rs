//! Merged documents and their on-disk names

use core_kernel::DocumentId;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extension of merged documents
pub const DOCX_EXTENSION: &str = "docx";

/// Extension produced by the fixed-layout converter
pub const PDF_EXTENSION: &str = "pdf";

/// Intermediate and converted file locations of one merge
///
/// Both paths share the document id as stem, so the converter output
/// (written next to its input) is known before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub docx: PathBuf,
    pub pdf: PathBuf,
}

impl OutputPaths {
    pub fn new(work_dir: &Path, id: &DocumentId) -> Self {
        let stem = id.file_stem();
        Self {
            docx: work_dir.join(format!("{}.{}", stem, DOCX_EXTENSION)),
            pdf: work_dir.join(format!("{}.{}", stem, PDF_EXTENSION)),
        }
    }

    /// Removes whichever of the files exist
    pub fn remove_all(&self) {
        for path in [&self.docx, &self.pdf] {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate file");
                }
            }
        }
    }
}

/// A merged DOCX together with the id naming its files
#[derive(Clone)]
pub struct MergedDocument {
    pub id: DocumentId,
    pub bytes: Vec<u8>,
}

impl MergedDocument {
    pub fn new(id: DocumentId, bytes: Vec<u8>) -> Self {
        Self { id, bytes }
    }

    pub fn paths(&self, work_dir: &Path) -> OutputPaths {
        OutputPaths::new(work_dir, &self.id)
    }

    /// Writes `{id}.docx` into `work_dir`
    ///
    /// The file is created exclusively; an existing file with the same name
    /// is an error rather than being overwritten.
    pub fn write_to(&self, work_dir: &Path) -> std::io::Result<OutputPaths> {
        let paths = self.paths(work_dir);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&paths.docx)?;
        file.write_all(&self.bytes)?;
        file.sync_all()?;
        Ok(paths)
    }
}

impl fmt::Debug for MergedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedDocument")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .finish()
    }
}
