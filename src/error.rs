use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("No items selected: select at least one product to generate a quote")]
    NothingSelected,
    #[error("Invalid headcount: {0} (at least one person is required)")]
    InvalidHeadcount(u32),
    #[error("Invalid amount for {field}: {value} (must not be negative)")]
    InvalidAmount { field: String, value: Decimal },
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Failed to read input: {0}")]
    Input(String),
    #[error("Invalid date format: {0}")]
    Date(String),
    #[error("Failed to load logo: {0}")]
    Logo(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type QuoteResult<T> = Result<T, QuoteError>;
