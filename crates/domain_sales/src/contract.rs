//! Rental contracts
//!
//! A contract can be filled from scratch or pre-filled from a stored
//! proposal, carrying over client, document, equipment, allowance and value.

use chrono::NaiveDate;
use core_kernel::{LongFormDate, Money, Quantity, SubmissionId};
use domain_template::TemplateContext;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::SalesError;
use crate::fields;
use crate::proposal::ProposalForm;

/// Raw contract form, exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContractForm {
    pub denominacao: String,
    pub cpf_cnpj: String,
    pub endereco: String,
    pub telefone: String,
    #[validate(email)]
    pub email: String,
    pub equipamento: String,
    pub acessorios: String,
    pub data_inicio: String,
    pub data_termino: String,
    pub franquia: String,
    pub valor_mensal: String,
    /// Proposal this contract was pre-filled from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<SubmissionId>,
}

impl ContractForm {
    /// Pre-fills a contract from a stored proposal
    pub fn prefill_from(proposal: &ProposalForm, proposal_id: SubmissionId) -> Self {
        Self {
            denominacao: proposal.cliente.clone(),
            cpf_cnpj: proposal.cpf.clone(),
            equipamento: proposal.modelo.clone(),
            franquia: proposal.franquia.clone(),
            valor_mensal: proposal.valor.clone(),
            proposal_id: Some(proposal_id),
            ..Self::default()
        }
    }

    /// Sets a field by its form name; returns false for unknown names
    ///
    /// An unparsable `proposal_id` is reported as an invalid field.
    pub fn set_field(&mut self, name: &str, value: String) -> Result<bool, SalesError> {
        match name {
            "denominacao" => self.denominacao = value,
            "cpf_cnpj" => self.cpf_cnpj = value,
            "endereco" => self.endereco = value,
            "telefone" => self.telefone = value,
            "email" => self.email = value,
            "equipamento" => self.equipamento = value,
            "acessorios" => self.acessorios = value,
            "data_inicio" => self.data_inicio = value,
            "data_termino" => self.data_termino = value,
            "franquia" => self.franquia = value,
            "valor_mensal" => self.valor_mensal = value,
            "proposal_id" if value.trim().is_empty() => self.proposal_id = None,
            "proposal_id" => {
                let id = value
                    .trim()
                    .parse()
                    .map_err(|_| SalesError::invalid("proposal_id", "not a submission id"))?;
                self.proposal_id = Some(id);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Checks required fields, parses dates and amounts
    ///
    /// Accessories may be left blank. The end date must not precede the
    /// start date.
    pub fn validate_fields(&self) -> Result<Contract, SalesError> {
        let denominacao = fields::required("denominacao", &self.denominacao)?.to_string();
        let cpf_cnpj = fields::required("cpf_cnpj", &self.cpf_cnpj)?.to_string();
        let endereco = fields::required("endereco", &self.endereco)?.to_string();
        let telefone = fields::required("telefone", &self.telefone)?.to_string();
        let email = fields::required("email", &self.email)?.to_string();

        if let Err(errors) = self.validate() {
            let field = errors
                .field_errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "email".to_string());
            return Err(SalesError::invalid(&field, "not a valid e-mail address"));
        }

        let equipamento = fields::required("equipamento", &self.equipamento)?.to_string();
        let data_inicio = fields::date("data_inicio", &self.data_inicio)?;
        let data_termino = fields::date("data_termino", &self.data_termino)?;
        if data_termino < data_inicio {
            return Err(SalesError::invalid("data_termino", "ends before data_inicio"));
        }

        Ok(Contract {
            denominacao,
            cpf_cnpj,
            endereco,
            telefone,
            email,
            equipamento,
            acessorios: self.acessorios.trim().to_string(),
            data_inicio,
            data_termino,
            franquia: fields::quantity("franquia", &self.franquia)?,
            valor_mensal: fields::money("valor_mensal", &self.valor_mensal)?,
        })
    }
}

/// A validated contract
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub denominacao: String,
    pub cpf_cnpj: String,
    pub endereco: String,
    pub telefone: String,
    pub email: String,
    pub equipamento: String,
    pub acessorios: String,
    pub data_inicio: LongFormDate,
    pub data_termino: LongFormDate,
    pub franquia: Quantity,
    pub valor_mensal: Money,
}

impl Contract {
    /// Builds the merge context; `today` is the signature date
    pub fn context(&self, today: NaiveDate) -> Result<TemplateContext, SalesError> {
        Ok(TemplateContext::new()
            .with("DENOMINACAO", self.denominacao.as_str())
            .with("CPF_CNPJ", self.cpf_cnpj.as_str())
            .with("ENDERECO", self.endereco.as_str())
            .with("TELEFONE", self.telefone.as_str())
            .with("EMAIL", self.email.as_str())
            .with("EQUIPAMENTO", self.equipamento.as_str())
            .with("ACESSORIOS", self.acessorios.as_str())
            .with("DATA_INICIO", self.data_inicio.to_words())
            .with("DATA_TERMINO", self.data_termino.to_words())
            .with("FRANQUIA_FORMATADA", self.franquia.format_grouped())
            .with("FRANQUIA_EXTENSO", self.franquia.to_words())
            .with("VALOR_MENSAL_FORMATADO", self.valor_mensal.format_plain())
            .with(
                "VALOR_MENSAL_EXTENSO",
                fields::money_words("valor_mensal", &self.valor_mensal)?,
            )
            .with("DATA_ASSINATURA", LongFormDate::from(today).to_words()))
    }
}
