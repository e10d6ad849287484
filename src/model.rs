//! Quote data model consumed by the layout core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};

/// A selected menu product with a per-person price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    /// Absent when the production cost was never recorded.
    #[serde(default)]
    pub unit_production_cost: Option<Decimal>,
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            unit_production_cost: None,
        }
    }

    pub fn with_production_cost(mut self, cost: Decimal) -> Self {
        self.unit_production_cost = Some(cost);
        self
    }
}

/// A flat charge added once per quote, independent of headcount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostEntry {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "costo")]
    pub amount: Decimal,
}

impl FixedCostEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
        }
    }
}

/// Optional client reference printed below the document header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub client_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub event_title: String,
    pub event_date: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Returns the trimmed field when it carries text.
pub fn present(field: &str) -> Option<&str> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn present_opt(field: &Option<String>) -> Option<&str> {
    field.as_deref().and_then(present)
}

impl ClientInfo {
    /// Labelled lines in print order, skipping empty fields.
    pub fn labelled_fields(&self) -> Vec<(&'static str, &str)> {
        let candidates = [
            ("Cliente", present(&self.client_name)),
            ("Referente", present(&self.contact_person)),
            ("Email", present(&self.email)),
            ("Telefono", present_opt(&self.phone)),
            ("Evento", present(&self.event_title)),
            ("Data evento", present(&self.event_date)),
            ("Luogo", present_opt(&self.location)),
            ("Note", present_opt(&self.notes)),
        ];
        candidates
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.labelled_fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ClientQuote,
    InternalAnalysis,
    MenuListing,
}

impl DocumentKind {
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::ClientQuote => "PREVENTIVO CATERING",
            DocumentKind::InternalAnalysis => "ANALISI PROFITTO",
            DocumentKind::MenuListing => "MENU CATERING",
        }
    }
}

/// Everything one render pass needs. Built fresh per generate action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub line_items: Vec<LineItem>,
    pub headcount: u32,
    pub fixed_costs: Vec<FixedCostEntry>,
    pub include_fixed_costs: bool,
    pub include_service_details: bool,
    pub client: Option<ClientInfo>,
    pub kind: DocumentKind,
}

impl QuoteRequest {
    pub fn new(kind: DocumentKind, line_items: Vec<LineItem>, headcount: u32) -> Self {
        Self {
            line_items,
            headcount,
            fixed_costs: Vec::new(),
            include_fixed_costs: true,
            include_service_details: false,
            client: None,
            kind,
        }
    }

    /// Fixed costs that take part in this quote: all of them or none.
    pub fn included_fixed_costs(&self) -> &[FixedCostEntry] {
        if self.include_fixed_costs {
            &self.fixed_costs
        } else {
            &[]
        }
    }

    /// Client data when at least one field carries text.
    pub fn client(&self) -> Option<&ClientInfo> {
        self.client.as_ref().filter(|c| !c.is_empty())
    }

    pub fn validate(&self) -> QuoteResult<()> {
        if self.line_items.is_empty() {
            return Err(QuoteError::NothingSelected);
        }
        if self.headcount == 0 {
            return Err(QuoteError::InvalidHeadcount(self.headcount));
        }
        for item in &self.line_items {
            require_non_negative(&format!("price of '{}'", item.name), item.unit_price)?;
            if let Some(cost) = item.unit_production_cost {
                require_non_negative(&format!("production cost of '{}'", item.name), cost)?;
            }
        }
        for entry in &self.fixed_costs {
            require_non_negative(&format!("fixed cost '{}'", entry.name), entry.amount)?;
        }
        Ok(())
    }
}

fn require_non_negative(field: &str, value: Decimal) -> QuoteResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(QuoteError::InvalidAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
