//! Ledger records of generated documents

use chrono::{DateTime, Utc};
use core_kernel::{DocumentId, SubmissionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::contract::ContractForm;
use crate::error::SalesError;
use crate::proposal::ProposalForm;

/// What a submission generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Proposal,
    Contract,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Proposal => "proposal",
            SubmissionKind::Contract => "contract",
        }
    }

    /// Base name of downloaded files
    pub fn file_prefix(&self) -> &'static str {
        match self {
            SubmissionKind::Proposal => "proposta",
            SubmissionKind::Contract => "contrato",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposal" => Ok(SubmissionKind::Proposal),
            "contract" => Ok(SubmissionKind::Contract),
            other => Err(format!("unknown submission kind '{}'", other)),
        }
    }
}

/// One stored submission
///
/// `payload` holds the raw form fields as JSON so a proposal can later
/// pre-fill a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub kind: SubmissionKind,
    pub client_name: String,
    pub document_id: DocumentId,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(
        kind: SubmissionKind,
        client_name: impl Into<String>,
        document_id: DocumentId,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: SubmissionId::new_v7(),
            kind,
            client_name: client_name.into(),
            document_id,
            payload,
            created_at: Utc::now(),
        }
    }

    pub fn for_proposal(form: &ProposalForm, document_id: DocumentId) -> Result<Self, SalesError> {
        let payload = serde_json::to_value(form).map_err(|e| SalesError::Internal(e.to_string()))?;
        Ok(Self::new(SubmissionKind::Proposal, form.cliente.trim(), document_id, payload))
    }

    pub fn for_contract(form: &ContractForm, document_id: DocumentId) -> Result<Self, SalesError> {
        let payload = serde_json::to_value(form).map_err(|e| SalesError::Internal(e.to_string()))?;
        Ok(Self::new(SubmissionKind::Contract, form.denominacao.trim(), document_id, payload))
    }

    /// Recovers the proposal form stored in this record
    ///
    /// # Errors
    ///
    /// `WrongKind` if the record is a contract, `Internal` if the payload
    /// does not decode.
    pub fn proposal_form(&self) -> Result<ProposalForm, SalesError> {
        if self.kind != SubmissionKind::Proposal {
            return Err(SalesError::WrongKind {
                id: self.id.to_string(),
                expected: SubmissionKind::Proposal.to_string(),
                actual: self.kind.to_string(),
            });
        }
        serde_json::from_value(self.payload.clone())
            .map_err(|e| SalesError::Internal(format!("stored proposal does not decode: {}", e)))
    }

    /// True if the record is older than `max_age_days` at `now`
    pub fn is_expired(&self, max_age_days: u32, now: DateTime<Utc>) -> bool {
        self.created_at < now - chrono::Duration::days(i64::from(max_age_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [SubmissionKind::Proposal, SubmissionKind::Contract] {
            assert_eq!(kind.as_str().parse::<SubmissionKind>().unwrap(), kind);
        }
        assert!("invoice".parse::<SubmissionKind>().is_err());
    }

    #[test]
    fn test_contract_record_is_not_a_proposal() {
        let record = SubmissionRecord::for_contract(&ContractForm::default(), DocumentId::new()).unwrap();
        assert!(matches!(record.proposal_form(), Err(SalesError::WrongKind { .. })));
    }

    #[test]
    fn test_expiry() {
        let mut record = SubmissionRecord::new(
            SubmissionKind::Proposal,
            "Ana",
            DocumentId::new(),
            serde_json::json!({}),
        );
        let now = Utc::now();
        record.created_at = now - chrono::Duration::days(31);
        assert!(record.is_expired(30, now));
        assert!(!record.is_expired(45, now));
    }
}
