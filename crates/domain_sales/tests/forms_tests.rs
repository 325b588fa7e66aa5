//! Tests for proposal and contract forms

use chrono::NaiveDate;

use core_kernel::{DocumentId, SubmissionId};
use domain_sales::{ContractForm, ProposalForm, SalesError, SubmissionRecord};
use test_utils::{with_field, ContractFieldFixtures, ProposalFieldFixtures};

fn proposal_form(fields: Vec<(&'static str, String)>) -> ProposalForm {
    let mut form = ProposalForm::default();
    for (name, value) in fields {
        assert!(form.set_field(name, value), "unknown field {}", name);
    }
    form
}

fn contract_form(fields: Vec<(&'static str, String)>) -> ContractForm {
    let mut form = ContractForm::default();
    for (name, value) in fields {
        assert!(form.set_field(name, value).unwrap(), "unknown field {}", name);
    }
    form
}

fn signature_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 11).unwrap()
}

// ============================================================================
// Proposal Tests
// ============================================================================

mod proposal_tests {
    use super::*;

    #[test]
    fn test_valid_proposal_context() {
        let form = proposal_form(ProposalFieldFixtures::valid());
        let ctx = form.validate_fields().unwrap().context(signature_day(), None).unwrap();

        assert_eq!(ctx.text("CLIENTE"), Some("Ana Souza"));
        assert_eq!(ctx.text("CPF"), Some("123.456.789-09"));
        assert_eq!(ctx.text("MODELO"), Some("Impressora X200"));
        assert_eq!(ctx.text("FRANQUIA"), Some("10.000"));
        assert_eq!(ctx.text("VALOR"), Some("250,00 (duzentos e cinquenta)"));
        assert_eq!(ctx.text("VALIDADE"), Some("15 dias"));
        assert_eq!(ctx.text("DATA"), Some("11/02/2026"));
        assert_eq!(ctx.text("CONTRATO"), Some("12 meses"));
        assert_eq!(ctx.text("EXCEDENTE"), Some("0,05"));
    }

    #[test]
    fn test_value_with_centavos_uses_full_words() {
        let form = proposal_form(with_field(ProposalFieldFixtures::valid(), "valor", "200,50"));
        let ctx = form.validate_fields().unwrap().context(signature_day(), None).unwrap();
        assert_eq!(
            ctx.text("VALOR"),
            Some("200,50 (duzentos reais e cinquenta centavos)")
        );
    }

    #[test]
    fn test_each_input_error_names_its_field() {
        let cases = [
            ("valor", "duzentos", "malformed_amount"),
            ("franquia", "10k", "invalid_quantity"),
            ("cliente", "  ", "missing_field"),
            ("excedente", "abc", "malformed_amount"),
            ("excedente", "999999999999999999999999999", "malformed_amount"),
        ];
        for (field, value, code) in cases {
            let form = proposal_form(with_field(ProposalFieldFixtures::valid(), field, value));
            let error = form.validate_fields().unwrap_err();
            assert_eq!(error.code(), code, "field {}", field);
            assert_eq!(error.field(), Some(field));
            assert!(error.is_user_correctable());
        }
    }

    #[test]
    fn test_blank_optional_fields_are_empty() {
        let fields = with_field(ProposalFieldFixtures::valid(), "excedente", "");
        let ctx = proposal_form(fields)
            .validate_fields()
            .unwrap()
            .context(signature_day(), None)
            .unwrap();
        assert_eq!(ctx.text("EXCEDENTE"), Some(""));
    }

    #[test]
    fn test_generated_names_validate() {
        let form = proposal_form(ProposalFieldFixtures::random());
        assert!(form.validate_fields().is_ok());
    }
}

// ============================================================================
// Contract Tests
// ============================================================================

mod contract_tests {
    use super::*;

    #[test]
    fn test_valid_contract_context() {
        let form = contract_form(ContractFieldFixtures::valid());
        let ctx = form.validate_fields().unwrap().context(signature_day()).unwrap();

        assert_eq!(ctx.text("DENOMINACAO"), Some("Empresa Exemplo Ltda"));
        assert_eq!(ctx.text("CPF_CNPJ"), Some("12.345.678/0001-90"));
        assert_eq!(ctx.text("DATA_INICIO"), Some("01 de Março de 2026"));
        assert_eq!(ctx.text("DATA_TERMINO"), Some("28 de Fevereiro de 2027"));
        assert_eq!(ctx.text("FRANQUIA_FORMATADA"), Some("5.000"));
        assert_eq!(ctx.text("FRANQUIA_EXTENSO"), Some("cinco mil"));
        assert_eq!(ctx.text("VALOR_MENSAL_FORMATADO"), Some("1250,50"));
        assert_eq!(
            ctx.text("VALOR_MENSAL_EXTENSO"),
            Some("mil duzentos e cinquenta reais e cinquenta centavos")
        );
        assert_eq!(ctx.text("DATA_ASSINATURA"), Some("11 de Fevereiro de 2026"));
        assert_eq!(ctx.len(), 14);
    }

    #[test]
    fn test_invalid_dates() {
        let form = contract_form(with_field(ContractFieldFixtures::valid(), "data_inicio", "2026-03-01"));
        assert!(matches!(
            form.validate_fields(),
            Err(SalesError::InvalidDate { field, .. }) if field == "data_inicio"
        ));

        let form = contract_form(with_field(ContractFieldFixtures::valid(), "data_termino", "01/01/2026"));
        assert!(matches!(
            form.validate_fields(),
            Err(SalesError::InvalidField { field, .. }) if field == "data_termino"
        ));
    }

    #[test]
    fn test_invalid_email() {
        let form = contract_form(with_field(ContractFieldFixtures::valid(), "email", "nao-e-email"));
        let error = form.validate_fields().unwrap_err();
        assert_eq!(error.code(), "invalid_field");
        assert_eq!(error.field(), Some("email"));
    }

    #[test]
    fn test_accessories_may_be_blank() {
        let form = contract_form(with_field(ContractFieldFixtures::valid(), "acessorios", ""));
        let ctx = form.validate_fields().unwrap().context(signature_day()).unwrap();
        assert_eq!(ctx.text("ACESSORIOS"), Some(""));
    }

    #[test]
    fn test_bad_proposal_id() {
        let mut form = ContractForm::default();
        assert!(form.set_field("proposal_id", "xyz".into()).is_err());
        assert!(form.set_field("proposal_id", " ".into()).unwrap());
        assert_eq!(form.proposal_id, None);
    }

    #[test]
    fn test_generated_contact_data_validates() {
        let form = contract_form(ContractFieldFixtures::random());
        assert!(form.validate_fields().is_ok());
    }
}

// ============================================================================
// Pre-fill Tests
// ============================================================================

mod prefill_tests {
    use super::*;

    #[test]
    fn test_prefill_copies_proposal_fields() {
        let proposal = proposal_form(ProposalFieldFixtures::valid());
        let id = SubmissionId::new_v7();
        let contract = ContractForm::prefill_from(&proposal, id);

        assert_eq!(contract.denominacao, "Ana Souza");
        assert_eq!(contract.cpf_cnpj, "123.456.789-09");
        assert_eq!(contract.equipamento, "Impressora X200");
        assert_eq!(contract.franquia, "10.000");
        assert_eq!(contract.valor_mensal, "R$ 250,00");
        assert_eq!(contract.proposal_id, Some(id));
        assert!(contract.email.is_empty());
    }

    #[test]
    fn test_stored_payload_round_trips() {
        let proposal = proposal_form(ProposalFieldFixtures::valid());
        let record = SubmissionRecord::for_proposal(&proposal, DocumentId::new_v7()).unwrap();
        assert_eq!(record.client_name, "Ana Souza");
        assert_eq!(record.proposal_form().unwrap(), proposal);
    }
}
