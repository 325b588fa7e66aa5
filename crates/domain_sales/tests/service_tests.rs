//! Tests for the document generation service with the in-memory ledger

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use core_kernel::SubmissionId;
use domain_sales::{
    ContractForm, DocumentService, DocumentSettings, MockSubmissionLedger, ProposalForm, SalesError,
    SubmissionKind, SubmissionLedger, SubmissionRecord, DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE,
};
use domain_template::{
    ConversionError, DocumentConverter, InlineImage, OutputPaths, TemplateEngine, TemplateStore,
};
use test_utils::{
    assert_docx_contains, assert_docx_not_contains, docx_entries, png_image, with_field, write_template,
    ContractFieldFixtures, DocxTemplateBuilder, ProposalFieldFixtures,
};

/// Writes a marker file where the PDF is expected
struct CopyingConverter;

#[async_trait]
impl DocumentConverter for CopyingConverter {
    async fn convert(&self, paths: &OutputPaths) -> Result<PathBuf, ConversionError> {
        tokio::fs::write(&paths.pdf, b"%PDF-1.7 test").await.unwrap();
        Ok(paths.pdf.clone())
    }

    fn name(&self) -> &str {
        "copying"
    }
}

struct FailingConverter;

#[async_trait]
impl DocumentConverter for FailingConverter {
    async fn convert(&self, _paths: &OutputPaths) -> Result<PathBuf, ConversionError> {
        Err(ConversionError::TimedOut { secs: 1 })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct Fixture {
    _templates: TempDir,
    work: TempDir,
    ledger: MockSubmissionLedger,
    settings: DocumentSettings,
    engine: TemplateEngine,
}

impl Fixture {
    fn new() -> Self {
        let templates = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        write_template(
            templates.path(),
            "proposta.docx",
            &DocxTemplateBuilder::new()
                .paragraph("Cliente: {{CLIENTE}} CPF: {{CPF}}")
                .paragraph("Valor: {{VALOR}}")
                .paragraph("Franquia: {{FRANQUIA}} Data: {{DATA}}")
                .paragraph("{{IMAGEM}}"),
        );
        write_template(
            templates.path(),
            "contrato.docx",
            &DocxTemplateBuilder::new()
                .paragraph("{{ DENOMINACAO }} - {{ EMAIL }}")
                .paragraph("{{ VALOR_MENSAL_FORMATADO }} ({{ VALOR_MENSAL_EXTENSO }})")
                .paragraph("De {{ DATA_INICIO }} a {{ DATA_TERMINO }}"),
        );

        let settings = DocumentSettings {
            work_dir: work.path().to_path_buf(),
            ..DocumentSettings::default()
        };
        let engine = TemplateEngine::new(TemplateStore::new(templates.path()));

        Self {
            _templates: templates,
            work,
            ledger: MockSubmissionLedger::new(),
            settings,
            engine,
        }
    }

    fn service(&self) -> DocumentService {
        DocumentService::new(
            self.engine.clone(),
            Arc::new(self.ledger.clone()),
            self.settings.clone(),
        )
    }

    fn work_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.work.path()).unwrap().next().is_none()
    }
}

fn proposal() -> ProposalForm {
    let mut form = ProposalForm::default();
    for (name, value) in ProposalFieldFixtures::valid() {
        form.set_field(name, value);
    }
    form
}

fn contract() -> ContractForm {
    let mut form = ContractForm::default();
    for (name, value) in ContractFieldFixtures::valid() {
        form.set_field(name, value).unwrap();
    }
    form
}

// ============================================================================
// Generation
// ============================================================================

mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn test_proposal_without_converter_is_docx() {
        let fixture = Fixture::new();
        let document = fixture.service().generate_proposal(&proposal(), None).await.unwrap();

        assert_eq!(document.file_name, "proposta.docx");
        assert_eq!(document.content_type, DOCX_CONTENT_TYPE);
        assert!(!document.converted);
        assert_docx_contains(&document.bytes, "Cliente: Ana Souza CPF: 123.456.789-09");
        assert_docx_contains(&document.bytes, "Valor: 250,00 (duzentos e cinquenta)");
        assert_docx_contains(&document.bytes, "Franquia: 10.000");
        assert_docx_not_contains(&document.bytes, "{{IMAGEM}}");

        assert_eq!(fixture.ledger.len().await, 1);
        assert!(fixture.work_dir_is_empty(), "intermediate files are removed");
    }

    #[tokio::test]
    async fn test_proposal_with_image() {
        let fixture = Fixture::new();
        let image = InlineImage::new(png_image(30, 60)).with_file_name("foto.png");
        let document = fixture
            .service()
            .generate_proposal(&proposal(), Some(image))
            .await
            .unwrap();

        assert_docx_not_contains(&document.bytes, "{{IMAGEM}}");
        assert!(docx_entries(&document.bytes).iter().any(|e| e.starts_with("word/media/")));
    }

    #[tokio::test]
    async fn test_contract_is_recorded() {
        let fixture = Fixture::new();
        let document = fixture.service().generate_contract(&contract()).await.unwrap();

        assert_eq!(document.file_name, "contrato.docx");
        assert_docx_contains(&document.bytes, "Empresa Exemplo Ltda - contato@exemplo.com.br");
        assert_docx_contains(
            &document.bytes,
            "1250,50 (mil duzentos e cinquenta reais e cinquenta centavos)",
        );
        assert_docx_contains(&document.bytes, "De 01 de Março de 2026 a 28 de Fevereiro de 2027");

        let stored = fixture.ledger.get_by_id(document.submission_id).await.unwrap().unwrap();
        assert_eq!(stored.kind, SubmissionKind::Contract);
        assert_eq!(stored.document_id, document.document_id);
    }

    #[tokio::test]
    async fn test_invalid_input_records_nothing() {
        let fixture = Fixture::new();
        let mut form = proposal();
        form.valor = "dez reais".into();

        let result = fixture.service().generate_proposal(&form, None).await;
        assert!(matches!(result, Err(SalesError::MalformedAmount { .. })));
        assert_eq!(fixture.ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_missing_template_is_operational() {
        let mut fixture = Fixture::new();
        fixture.settings.proposal_template = domain_template::TemplateRef::literal("outro.docx");

        let error = fixture.service().generate_proposal(&proposal(), None).await.unwrap_err();
        assert_eq!(error.code(), "template_not_found");
        assert!(!error.is_user_correctable());
    }

    #[tokio::test]
    async fn test_concurrent_generation() {
        let fixture = Fixture::new();
        let service = Arc::new(fixture.service());

        let tasks: Vec<_> = (0..6)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let mut form = proposal();
                    form.cliente = format!("Cliente {}", i);
                    service.generate_proposal(&form, None).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(fixture.ledger.len().await, 6);
    }
}

// ============================================================================
// Conversion
// ============================================================================

mod conversion_tests {
    use super::*;

    #[tokio::test]
    async fn test_converted_document_is_pdf() {
        let fixture = Fixture::new();
        let service = fixture.service().with_converter(Arc::new(CopyingConverter));

        let document = service.generate_proposal(&proposal(), None).await.unwrap();
        assert_eq!(document.file_name, "proposta.pdf");
        assert_eq!(document.content_type, PDF_CONTENT_TYPE);
        assert!(document.converted);
        assert!(document.bytes.starts_with(b"%PDF"));
        assert!(fixture.work_dir_is_empty());
    }

    #[tokio::test]
    async fn test_failed_conversion_falls_back_to_docx() {
        let fixture = Fixture::new();
        let service = fixture.service().with_converter(Arc::new(FailingConverter));

        let document = service.generate_proposal(&proposal(), None).await.unwrap();
        assert_eq!(document.content_type, DOCX_CONTENT_TYPE);
        assert!(!document.converted);
    }

    #[tokio::test]
    async fn test_failed_conversion_without_fallback() {
        let mut fixture = Fixture::new();
        fixture.settings.fallback_to_docx = false;
        let service = fixture.service().with_converter(Arc::new(FailingConverter));

        let error = service.generate_proposal(&proposal(), None).await.unwrap_err();
        assert_eq!(error.code(), "conversion_failed");
        assert_eq!(fixture.ledger.len().await, 0);
        assert!(fixture.work_dir_is_empty());
    }
}

// ============================================================================
// Ledger workflow
// ============================================================================

mod ledger_tests {
    use super::*;

    #[tokio::test]
    async fn test_prefill_from_stored_proposal() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let document = service.generate_proposal(&proposal(), None).await.unwrap();

        let form = service.contract_prefill(document.submission_id).await.unwrap();
        assert_eq!(form.denominacao, "Ana Souza");
        assert_eq!(form.valor_mensal, "R$ 250,00");
        assert_eq!(form.proposal_id, Some(document.submission_id));
    }

    #[tokio::test]
    async fn test_prefill_from_contract_is_rejected() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let document = service.generate_contract(&contract()).await.unwrap();

        let result = service.contract_prefill(document.submission_id).await;
        assert!(matches!(result, Err(SalesError::WrongKind { .. })));
    }

    #[tokio::test]
    async fn test_recent_purges_expired_records() {
        let fixture = Fixture::new();
        let mut old = SubmissionRecord::for_proposal(&proposal(), core_kernel::DocumentId::new()).unwrap();
        old.created_at = chrono::Utc::now() - chrono::Duration::days(90);
        fixture.ledger.create(old.clone()).await.unwrap();

        let service = fixture.service();
        let fresh = service
            .generate_proposal(&with_proposal_client("Bruno"), None)
            .await
            .unwrap();

        let recent = service.recent(SubmissionKind::Proposal, None).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, fresh.submission_id);
        assert!(fixture.ledger.get_by_id(old.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_limit_is_capped() {
        let fixture = Fixture::new();
        let service = fixture.service();
        for name in ["Ana", "Bruno", "Carla"] {
            service
                .generate_proposal(&with_proposal_client(name), None)
                .await
                .unwrap();
        }

        assert_eq!(service.recent(SubmissionKind::Proposal, Some(2)).await.unwrap().len(), 2);
        assert_eq!(service.recent(SubmissionKind::Proposal, Some(10_000)).await.unwrap().len(), 3);
        assert!(service.recent(SubmissionKind::Contract, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_submission() {
        let fixture = Fixture::new();
        let result = fixture.service().delete_submission(SubmissionId::new()).await;
        assert!(matches!(result, Err(SalesError::SubmissionNotFound(_))));
    }

    #[tokio::test]
    async fn test_ledger_outage_surfaces() {
        let fixture = Fixture::new();
        fixture.ledger.set_unavailable(true).await;

        let error = fixture.service().generate_proposal(&proposal(), None).await.unwrap_err();
        assert_eq!(error.code(), "ledger_error");
    }

    fn with_proposal_client(name: &str) -> ProposalForm {
        let mut form = ProposalForm::default();
        for (field, value) in with_field(ProposalFieldFixtures::valid(), "cliente", name) {
            form.set_field(field, value);
        }
        form
    }
}
