//! Document generation service
//!
//! Orchestrates one request end to end: validate the raw form, build the
//! merge context, merge on the blocking pool, write `{id}.docx`, convert it
//! when a converter is configured, record the submission and hand back the
//! bytes to download. Intermediate files are removed before returning.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{DocumentId, SubmissionId, Timezone};
use domain_template::{
    DocumentConverter, InlineImage, OutputPaths, TemplateContext, TemplateEngine, TemplateRef,
};

use crate::contract::ContractForm;
use crate::error::SalesError;
use crate::ports::SubmissionLedger;
use crate::proposal::ProposalForm;
use crate::submission::{SubmissionKind, SubmissionRecord};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Settings of the document service
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    pub proposal_template: TemplateRef,
    pub contract_template: TemplateRef,
    /// Directory for intermediate `{id}.docx` / `{id}.pdf` files
    pub work_dir: PathBuf,
    /// Serve the DOCX when conversion fails instead of failing the request
    pub fallback_to_docx: bool,
    /// Timezone that decides "today" on generated documents
    pub timezone: Timezone,
    /// Submissions older than this are purged
    pub retention_days: u32,
    pub list_limit: u32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            proposal_template: TemplateRef::literal("proposta.docx"),
            contract_template: TemplateRef::expression("contrato.docx"),
            work_dir: std::env::temp_dir(),
            fallback_to_docx: true,
            timezone: Timezone::default(),
            retention_days: 30,
            list_limit: 50,
        }
    }
}

/// A document ready to be downloaded
#[derive(Clone)]
pub struct GeneratedDocument {
    pub submission_id: SubmissionId,
    pub document_id: DocumentId,
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// False when the DOCX is served because conversion was skipped or failed
    pub converted: bool,
}

impl std::fmt::Debug for GeneratedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedDocument")
            .field("submission_id", &self.submission_id)
            .field("document_id", &self.document_id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .field("converted", &self.converted)
            .finish()
    }
}

struct Rendered {
    bytes: Vec<u8>,
    extension: &'static str,
    content_type: &'static str,
    converted: bool,
}

/// Generates proposals and contracts
pub struct DocumentService {
    engine: Arc<TemplateEngine>,
    converter: Option<Arc<dyn DocumentConverter>>,
    ledger: Arc<dyn SubmissionLedger>,
    settings: DocumentSettings,
}

impl DocumentService {
    pub fn new(
        engine: TemplateEngine,
        ledger: Arc<dyn SubmissionLedger>,
        settings: DocumentSettings,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            converter: None,
            ledger,
            settings,
        }
    }

    /// Enables conversion of every generated document
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn ledger(&self) -> &Arc<dyn SubmissionLedger> {
        &self.ledger
    }

    /// Generates a proposal from its raw form
    #[instrument(skip(self, form, image), fields(cliente = %form.cliente.trim()))]
    pub async fn generate_proposal(
        &self,
        form: &ProposalForm,
        image: Option<InlineImage>,
    ) -> Result<GeneratedDocument, SalesError> {
        let proposal = form.validate_fields()?;
        let context = proposal.context(self.settings.timezone.today(), image)?;
        let template = self.settings.proposal_template.clone();

        self.generate(SubmissionKind::Proposal, template, context, |document_id| {
            SubmissionRecord::for_proposal(form, document_id)
        })
        .await
    }

    /// Generates a contract from its raw form
    #[instrument(skip(self, form), fields(denominacao = %form.denominacao.trim()))]
    pub async fn generate_contract(&self, form: &ContractForm) -> Result<GeneratedDocument, SalesError> {
        let contract = form.validate_fields()?;
        let context = contract.context(self.settings.timezone.today())?;
        let template = self.settings.contract_template.clone();

        self.generate(SubmissionKind::Contract, template, context, |document_id| {
            SubmissionRecord::for_contract(form, document_id)
        })
        .await
    }

    /// Contract form pre-filled from a stored proposal
    pub async fn contract_prefill(&self, proposal_id: SubmissionId) -> Result<ContractForm, SalesError> {
        let record = self.submission(proposal_id).await?;
        let proposal = record.proposal_form()?;
        Ok(ContractForm::prefill_from(&proposal, record.id))
    }

    /// Purges expired submissions, then lists the most recent of one kind
    ///
    /// `limit` is capped at the configured list limit.
    pub async fn recent(
        &self,
        kind: SubmissionKind,
        limit: Option<u32>,
    ) -> Result<Vec<SubmissionRecord>, SalesError> {
        let limit = limit
            .unwrap_or(self.settings.list_limit)
            .min(self.settings.list_limit);
        let purged = self.ledger.delete_expired(self.settings.retention_days).await?;
        if purged > 0 {
            info!(purged, retention_days = self.settings.retention_days, "Expired submissions purged");
        }
        Ok(self
            .ledger
            .list_recent(kind, self.settings.retention_days, limit)
            .await?)
    }

    pub async fn submission(&self, id: SubmissionId) -> Result<SubmissionRecord, SalesError> {
        self.ledger
            .get_by_id(id)
            .await?
            .ok_or_else(|| SalesError::SubmissionNotFound(id.to_string()))
    }

    pub async fn delete_submission(&self, id: SubmissionId) -> Result<(), SalesError> {
        if !self.ledger.delete(id).await? {
            return Err(SalesError::SubmissionNotFound(id.to_string()));
        }
        info!(submission_id = %id, "Submission deleted");
        Ok(())
    }

    async fn generate<F>(
        &self,
        kind: SubmissionKind,
        template: TemplateRef,
        context: TemplateContext,
        record: F,
    ) -> Result<GeneratedDocument, SalesError>
    where
        F: FnOnce(DocumentId) -> Result<SubmissionRecord, SalesError>,
    {
        let engine = Arc::clone(&self.engine);
        let work_dir = self.settings.work_dir.clone();
        let (document_id, paths, docx) = tokio::task::spawn_blocking(move || {
            let merged = engine.merge(&template, &context)?;
            let paths = merged.write_to(&work_dir)?;
            Ok::<_, SalesError>((merged.id, paths, merged.bytes))
        })
        .await
        .map_err(|e| SalesError::Internal(format!("merge task failed: {}", e)))??;

        let rendered = self.render(&paths, docx).await;
        paths.remove_all();
        let rendered = rendered?;

        let submission_id = self.ledger.create(record(document_id)?).await?;
        info!(
            kind = %kind,
            submission_id = %submission_id,
            document_id = %document_id,
            converted = rendered.converted,
            "Document generated"
        );

        Ok(GeneratedDocument {
            submission_id,
            document_id,
            file_name: format!("{}.{}", kind.file_prefix(), rendered.extension),
            content_type: rendered.content_type,
            bytes: rendered.bytes,
            converted: rendered.converted,
        })
    }

    async fn render(&self, paths: &OutputPaths, docx: Vec<u8>) -> Result<Rendered, SalesError> {
        let as_docx = |bytes| Rendered {
            bytes,
            extension: "docx",
            content_type: DOCX_CONTENT_TYPE,
            converted: false,
        };

        let Some(converter) = &self.converter else {
            return Ok(as_docx(docx));
        };

        match converter.convert(paths).await {
            Ok(pdf) => Ok(Rendered {
                bytes: tokio::fs::read(&pdf).await?,
                extension: "pdf",
                content_type: PDF_CONTENT_TYPE,
                converted: true,
            }),
            Err(e) if self.settings.fallback_to_docx => {
                warn!(converter = converter.name(), error = %e, "Conversion failed, serving DOCX");
                Ok(as_docx(docx))
            }
            Err(e) => Err(e.into()),
        }
    }
}
