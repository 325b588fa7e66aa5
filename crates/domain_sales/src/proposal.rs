//! Price proposals
//!
//! A proposal quotes an equipment rental to a client: model, page
//! allowance ("franquia"), monthly value and how long the offer stands.

use chrono::NaiveDate;
use core_kernel::{LongFormDate, Money, Quantity};
use domain_template::{InlineImage, TemplateContext};
use serde::{Deserialize, Serialize};

use crate::error::SalesError;
use crate::fields;

/// Raw proposal form, exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalForm {
    pub cliente: String,
    pub cpf: String,
    pub modelo: String,
    pub franquia: String,
    pub valor: String,
    pub validade: String,
    /// Contract term, free text ("12 meses")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrato: Option<String>,
    /// Price per page above the allowance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excedente: Option<String>,
}

impl ProposalForm {
    /// Sets a field by its form name; returns false for unknown names
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "cliente" => self.cliente = value,
            "cpf" => self.cpf = value,
            "modelo" => self.modelo = value,
            "franquia" => self.franquia = value,
            "valor" => self.valor = value,
            "validade" => self.validade = value,
            "contrato" => self.contrato = Some(value),
            "excedente" => self.excedente = Some(value),
            _ => return false,
        }
        true
    }

    /// Checks required fields and parses the numeric ones
    ///
    /// # Errors
    ///
    /// The first failing field, in form order.
    pub fn validate_fields(&self) -> Result<Proposal, SalesError> {
        Ok(Proposal {
            cliente: fields::required("cliente", &self.cliente)?.to_string(),
            cpf: fields::required("cpf", &self.cpf)?.to_string(),
            modelo: fields::required("modelo", &self.modelo)?.to_string(),
            franquia: fields::quantity("franquia", &self.franquia)?,
            valor: fields::money("valor", &self.valor)?,
            validade: fields::required("validade", &self.validade)?.to_string(),
            contrato: fields::optional(self.contrato.as_ref()).map(str::to_string),
            excedente: fields::optional(self.excedente.as_ref())
                .map(|raw| fields::money("excedente", raw))
                .transpose()?,
        })
    }
}

/// A validated proposal
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub cliente: String,
    pub cpf: String,
    pub modelo: String,
    pub franquia: Quantity,
    pub valor: Money,
    pub validade: String,
    pub contrato: Option<String>,
    pub excedente: Option<Money>,
}

impl Proposal {
    /// Builds the merge context
    ///
    /// `today` is the issue date in the business timezone; it fills `DATA`.
    pub fn context(
        &self,
        today: NaiveDate,
        image: Option<InlineImage>,
    ) -> Result<TemplateContext, SalesError> {
        let valor = self
            .valor
            .format_with_words()
            .map_err(|e| SalesError::amount("valor", e))?;

        Ok(TemplateContext::new()
            .with("CLIENTE", self.cliente.as_str())
            .with("CPF", self.cpf.as_str())
            .with("MODELO", self.modelo.as_str())
            .with("FRANQUIA", self.franquia.format_grouped())
            .with("VALOR", valor)
            .with("VALIDADE", self.validade.as_str())
            .with("DATA", LongFormDate::from(today).to_short())
            .with("CONTRATO", self.contrato.clone().unwrap_or_default())
            .with(
                "EXCEDENTE",
                self.excedente.as_ref().map(Money::format_plain).unwrap_or_default(),
            )
            .with_image_or_blank("IMAGEM", image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProposalForm {
        ProposalForm {
            cliente: "Ana".into(),
            cpf: "123.456.789-09".into(),
            modelo: "X200".into(),
            franquia: "10.000".into(),
            valor: "R$ 250,00".into(),
            validade: "15 dias".into(),
            contrato: None,
            excedente: Some("0,05".into()),
        }
    }

    #[test]
    fn test_context_values() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
        let ctx = form().validate_fields().unwrap().context(today, None).unwrap();

        assert_eq!(ctx.text("FRANQUIA"), Some("10.000"));
        assert_eq!(ctx.text("VALOR"), Some("250,00 (duzentos e cinquenta)"));
        assert_eq!(ctx.text("DATA"), Some("11/02/2026"));
        assert_eq!(ctx.text("EXCEDENTE"), Some("0,05"));
        assert_eq!(ctx.text("CONTRATO"), Some(""));
        assert_eq!(ctx.text("IMAGEM"), Some(""));
    }

    #[test]
    fn test_blank_required_field() {
        let mut form = form();
        form.modelo = "   ".into();
        assert!(matches!(form.validate_fields(), Err(SalesError::MissingField(f)) if f == "modelo"));
    }

    #[test]
    fn test_set_field() {
        let mut form = ProposalForm::default();
        assert!(form.set_field("excedente", "0,10".into()));
        assert!(!form.set_field("imagem", String::new()));
        assert_eq!(form.excedente.as_deref(), Some("0,10"));
    }
}
