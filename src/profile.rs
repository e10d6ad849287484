//! Branding and boilerplate text printed on every document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    /// Address and contact lines under the company name.
    pub contact_lines: Vec<String>,
    pub service_notes: Vec<String>,
    pub payment_terms: Vec<String>,
    pub confirmation: Vec<String>,
    pub footer_lines: Vec<String>,
    /// Appended to the grand total, e.g. "IVA ESCLUSA".
    pub vat_note: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Coop. Sociale I Piosi".to_string(),
            contact_lines: vec![
                "Via 2 Giugno, 11 - 37066 Sommacampagna (Verona)".to_string(),
                "Tel: 045 515882 - Fax: 045 515480".to_string(),
                "E-mail: info@ipiosi.it".to_string(),
            ],
            service_notes: vec![
                "Il servizio verrà fornito con materiale usa e getta riciclabile.".to_string(),
                "Per l'utilizzo di stoviglie di diverso genere, contattare per una modifica al preventivo.".to_string(),
                "Allestimento del buffet e riordino finale sono compresi nel servizio.".to_string(),
            ],
            payment_terms: vec![
                "Pagamento tramite bonifico bancario entro 30 giorni dalla data della fattura.".to_string(),
            ],
            confirmation: vec![
                "Si prega di confermare il preventivo almeno 7 giorni prima della data dell'evento.".to_string(),
            ],
            footer_lines: vec![
                "Grazie per averci scelto per il vostro evento!".to_string(),
                "Il preventivo è valido per 30 giorni dalla data di emissione.".to_string(),
                "La cooperativa sociale \"i Piosi\" si impegna per la qualità e la solidarietà.".to_string(),
            ],
            vat_note: "IVA ESCLUSA".to_string(),
        }
    }
}

impl CompanyProfile {
    /// Reads a JSON profile; fields it omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuoteError::Input(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> QuoteResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| QuoteError::Input(format!("Invalid company profile: {}", e)))
    }

    /// Company name followed by the contact lines.
    pub fn letterhead(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.contact_lines.iter().map(String::as_str))
    }
}
