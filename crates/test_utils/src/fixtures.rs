//! Pre-built Test Fixtures
//!
//! Raw form values as users type them, together with their expected
//! renderings. The field names match the HTML form.

use chrono::NaiveDate;
use fake::faker::address::raw::StreetName;
use fake::faker::internet::raw::FreeEmail;
use fake::faker::name::raw::Name;
use fake::locales::PT_BR;
use fake::Fake;

/// Fixture for monetary input
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Raw inputs paired with their plain formatting
    pub fn plain_formatting() -> Vec<(&'static str, &'static str)> {
        vec![
            ("250", "250,00"),
            ("250,00", "250,00"),
            ("R$ 250,00", "250,00"),
            ("1.234,56", "1234,56"),
            ("1234.56", "1234,56"),
            ("R$1.000.000,10", "1000000,10"),
        ]
    }

    /// Inputs that must be rejected as malformed
    pub fn malformed() -> Vec<&'static str> {
        vec!["", "R$", "abc", "1,2,3", "12a", "-5", "1e3", "1.2.3"]
    }
}

/// Fixture for date input
pub struct DateFixtures;

impl DateFixtures {
    pub fn signature_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 11).expect("valid date")
    }

    /// Raw dates paired with their long form
    pub fn long_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("11/02/2026", "11 de Fevereiro de 2026"),
            ("01/01/2025", "01 de Janeiro de 2025"),
            ("31/12/2030", "31 de Dezembro de 2030"),
        ]
    }

    pub fn malformed() -> Vec<&'static str> {
        vec!["2026-02-11", "11-02-2026", "1/2/2026", "11/02/26", "31/02/2026", "11/13/2026", ""]
    }
}

/// Raw proposal form fields
pub struct ProposalFieldFixtures;

impl ProposalFieldFixtures {
    pub fn valid() -> Vec<(&'static str, String)> {
        vec![
            ("cliente", "Ana Souza".to_string()),
            ("cpf", "123.456.789-09".to_string()),
            ("modelo", "Impressora X200".to_string()),
            ("franquia", "10.000".to_string()),
            ("valor", "R$ 250,00".to_string()),
            ("validade", "15 dias".to_string()),
            ("contrato", "12 meses".to_string()),
            ("excedente", "0,05".to_string()),
        ]
    }

    /// Valid fields with a generated client name
    pub fn random() -> Vec<(&'static str, String)> {
        let mut fields = Self::valid();
        fields[0].1 = Name(PT_BR).fake();
        fields
    }
}

/// Raw contract form fields
pub struct ContractFieldFixtures;

impl ContractFieldFixtures {
    pub fn valid() -> Vec<(&'static str, String)> {
        vec![
            ("denominacao", "Empresa Exemplo Ltda".to_string()),
            ("cpf_cnpj", "12.345.678/0001-90".to_string()),
            ("endereco", "Rua das Flores, 100".to_string()),
            ("telefone", "(11) 99999-0000".to_string()),
            ("email", "contato@exemplo.com.br".to_string()),
            ("equipamento", "Impressora X200".to_string()),
            ("acessorios", "Cabo USB".to_string()),
            ("data_inicio", "01/03/2026".to_string()),
            ("data_termino", "28/02/2027".to_string()),
            ("franquia", "5.000".to_string()),
            ("valor_mensal", "1.250,50".to_string()),
        ]
    }

    /// Valid fields with generated contact data
    pub fn random() -> Vec<(&'static str, String)> {
        let mut fields = Self::valid();
        fields[0].1 = Name(PT_BR).fake();
        fields[2].1 = StreetName(PT_BR).fake();
        fields[4].1 = FreeEmail(PT_BR).fake();
        fields
    }
}

/// Replaces one field in a fixture list
pub fn with_field(
    mut fields: Vec<(&'static str, String)>,
    name: &str,
    value: &str,
) -> Vec<(&'static str, String)> {
    for field in fields.iter_mut() {
        if field.0 == name {
            field.1 = value.to_string();
        }
    }
    fields
}

/// The 19 unit and teen words, indexed by value - 1
pub const UNIT_AND_TEEN_WORDS: [&str; 19] = [
    "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove", "dez",
    "onze", "doze", "treze", "quatorze", "quinze", "dezesseis", "dezessete", "dezoito", "dezenove",
];
