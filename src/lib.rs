//! Catering quote PDF generation: money arithmetic, a paginated layout engine
//! and the section pipeline for client quotes, internal profit analyses and
//! menu listings.

pub mod assets;
pub mod canvas;
pub mod document;
pub mod error;
pub mod input;
pub mod model;
pub mod money;
pub mod paginator;
pub mod profile;
pub mod sections;
pub mod text;

pub use assets::{fetch_logo, Logo, LogoStatus, DEFAULT_LOGO_TIMEOUT};
pub use canvas::{Canvas, LayoutRecorder, PdfCanvas};
pub use document::{layout, pipeline, render, suggested_filename, RenderOptions, RenderedDocument};
pub use error::{QuoteError, QuoteResult};
pub use input::QuoteFile;
pub use model::{ClientInfo, DocumentKind, FixedCostEntry, LineItem, QuoteRequest};
pub use money::{ProfitAnalysis, ProfitOutcome, QuoteTotals};
pub use paginator::{PageGeometry, Paginator};
pub use profile::CompanyProfile;
