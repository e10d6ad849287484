//! JSON quote file read by the command line tool.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{QuoteError, QuoteResult};
use crate::model::{ClientInfo, DocumentKind, FixedCostEntry, LineItem, QuoteRequest};

/// Catalog product as stored by the product list.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "prezzo")]
    pub price: Decimal,
    #[serde(default, alias = "costoProduzione")]
    pub production_cost: Option<Decimal>,
    #[serde(default)]
    pub selected: bool,
}

impl From<CatalogProduct> for LineItem {
    fn from(product: CatalogProduct) -> Self {
        LineItem {
            id: product.id,
            name: product.name,
            unit_price: product.price,
            unit_production_cost: product.production_cost,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteFile {
    pub products: Vec<CatalogProduct>,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    #[serde(default)]
    pub fixed_costs: Vec<FixedCostEntry>,
    #[serde(default = "default_true")]
    pub include_fixed_costs: bool,
    #[serde(default)]
    pub include_service_details: bool,
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

fn default_headcount() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl QuoteFile {
    pub fn load(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuoteError::Input(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> QuoteResult<Self> {
        serde_json::from_str(content).map_err(|e| QuoteError::Input(format!("Invalid JSON: {}", e)))
    }

    /// Builds the request for `kind`. Menus list the whole catalog, other
    /// documents only the selected products.
    pub fn into_request(self, kind: DocumentKind) -> QuoteRequest {
        let line_items = self
            .products
            .into_iter()
            .filter(|p| kind == DocumentKind::MenuListing || p.selected)
            .map(LineItem::from)
            .collect();

        QuoteRequest {
            line_items,
            headcount: self.headcount,
            fixed_costs: self.fixed_costs,
            include_fixed_costs: self.include_fixed_costs,
            include_service_details: self.include_service_details,
            client: self.client,
            kind,
        }
    }
}
