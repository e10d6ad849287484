//! Chooses the section pipeline for a document kind and produces the PDF.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::assets::Logo;
use crate::canvas::{Canvas, PdfCanvas};
use crate::error::{QuoteError, QuoteResult};
use crate::model::{DocumentKind, QuoteRequest};
use crate::paginator::{PageGeometry, Paginator};
use crate::profile::CompanyProfile;
use crate::sections::{render_section, RenderContext, Section};

/// Sections printed for a request, in order.
pub fn pipeline(request: &QuoteRequest) -> Vec<Section> {
    let mut sections = vec![Section::Header, Section::LineItems];
    match request.kind {
        DocumentKind::ClientQuote => {
            if !request.included_fixed_costs().is_empty() {
                sections.push(Section::FixedCosts);
            }
            sections.push(Section::Totals);
            if request.include_service_details {
                sections.push(Section::ServiceDetails);
            }
        }
        DocumentKind::InternalAnalysis => {
            sections.push(Section::FixedCosts);
            sections.push(Section::Totals);
        }
        DocumentKind::MenuListing => {}
    }
    sections.push(Section::Footer);
    sections
}

/// Everything besides the request that shapes the output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub date: NaiveDate,
    /// User-supplied file name, without extension.
    pub file_name: Option<String>,
    pub logo: Option<Logo>,
    pub profile: CompanyProfile,
    pub geometry: PageGeometry,
}

impl RenderOptions {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            file_name: None,
            logo: None,
            profile: CompanyProfile::default(),
            geometry: PageGeometry::default(),
        }
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn logo(mut self, logo: Option<Logo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn profile(mut self, profile: CompanyProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

/// Lays the request out on `canvas` and returns the page count.
pub fn layout<C: Canvas>(
    request: &QuoteRequest,
    options: &RenderOptions,
    canvas: &mut C,
) -> QuoteResult<usize> {
    request.validate()?;

    let sections = pipeline(request);
    log::debug!("{:?} pipeline: {:?}", request.kind, sections);

    let ctx = RenderContext::new(request, &options.profile, options.date, options.logo.as_ref());
    let mut paginator = Paginator::new(canvas, options.geometry, request.kind.title());
    for section in sections {
        render_section(section, &mut paginator, &ctx);
    }
    Ok(paginator.finish())
}

/// Renders the request to PDF bytes with a suggested filename.
pub fn render(request: &QuoteRequest, options: &RenderOptions) -> QuoteResult<RenderedDocument> {
    request.validate()?;

    let geometry = &options.geometry;
    let mut canvas = PdfCanvas::new(
        request.kind.title(),
        document_id(request, options)?,
        options.date,
        geometry.page_width,
        geometry.page_height,
    )?;
    let page_count = layout(request, options, &mut canvas)?;
    let bytes = canvas.finish()?;

    let filename = suggested_filename(
        request.kind,
        request.client().is_some(),
        options.file_name.as_deref(),
        options.date,
    );
    log::info!(
        "Rendered {} ({} items, {} page(s), {} bytes)",
        filename,
        request.line_items.len(),
        page_count,
        bytes.len()
    );

    Ok(RenderedDocument {
        bytes,
        filename,
        page_count,
    })
}

/// Default file name for a document, ending in `.pdf`.
pub fn suggested_filename(
    kind: DocumentKind,
    has_client: bool,
    user_name: Option<&str>,
    date: NaiveDate,
) -> String {
    let date_name = date.format("%d-%m-%Y").to_string();
    let name = user_name
        .map(|n| n.trim().trim_end_matches(".pdf"))
        .map(sanitize)
        .filter(|n| !n.is_empty());

    let (prefix, default_name) = match kind {
        DocumentKind::InternalAnalysis => ("analisi-profitto-", date_name),
        DocumentKind::ClientQuote if has_client => ("preventivo-", date_name),
        DocumentKind::ClientQuote => ("", format!("preventivo-catering-{}", date_name)),
        DocumentKind::MenuListing => ("", format!("menu-{}", date_name)),
    };

    let name = name.unwrap_or(default_name);
    if name.starts_with(prefix) {
        format!("{}.pdf", name)
    } else {
        format!("{}{}.pdf", prefix, name)
    }
}

fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

/// Content-derived PDF identifier: the first 16 bytes of a SHA-256 over the
/// request, the company profile and the document date, hex encoded.
fn document_id(request: &QuoteRequest, options: &RenderOptions) -> QuoteResult<String> {
    let serialize = |e: serde_json::Error| QuoteError::Input(format!("Failed to serialize request: {}", e));

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(request).map_err(serialize)?);
    hasher.update(serde_json::to_vec(&options.profile).map_err(serialize)?);
    hasher.update(options.date.to_string());
    Ok(hex::encode(&hasher.finalize()[..16]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::LayoutRecorder;
    use crate::model::{ClientInfo, FixedCostEntry, LineItem};
    use rust_decimal::Decimal;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 22).expect("valid date")
    }

    fn items(count: usize) -> Vec<LineItem> {
        (1..=count)
            .map(|n| {
                LineItem::new(n.to_string(), format!("Piatto numero {}", n), Decimal::new(1000 + n as i64, 2))
                    .with_production_cost(Decimal::new(4, 0))
            })
            .collect()
    }

    fn request(kind: DocumentKind, count: usize) -> QuoteRequest {
        let mut request = QuoteRequest::new(kind, items(count), 4);
        request.fixed_costs = vec![
            FixedCostEntry::new("1", "Setup", Decimal::new(100, 0)),
            FixedCostEntry::new("2", "Staff", Decimal::new(120, 0)),
        ];
        request
    }

    fn record(request: &QuoteRequest) -> LayoutRecorder {
        let mut recorder = LayoutRecorder::new();
        let pages = layout(request, &RenderOptions::new(date()), &mut recorder).expect("layout");
        assert_eq!(pages, recorder.page_count());
        recorder
    }

    #[test]
    fn client_pipeline_follows_flags() {
        let mut req = request(DocumentKind::ClientQuote, 2);
        assert_eq!(
            pipeline(&req),
            vec![Section::Header, Section::LineItems, Section::FixedCosts, Section::Totals, Section::Footer]
        );

        req.include_fixed_costs = false;
        req.include_service_details = true;
        assert_eq!(
            pipeline(&req),
            vec![Section::Header, Section::LineItems, Section::Totals, Section::ServiceDetails, Section::Footer]
        );
    }

    #[test]
    fn internal_pipeline_always_has_fixed_costs() {
        let mut req = request(DocumentKind::InternalAnalysis, 2);
        req.include_fixed_costs = false;
        req.include_service_details = true;
        assert_eq!(
            pipeline(&req),
            vec![Section::Header, Section::LineItems, Section::FixedCosts, Section::Totals, Section::Footer]
        );
    }

    #[test]
    fn menu_pipeline_has_no_totals() {
        let req = request(DocumentKind::MenuListing, 2);
        assert_eq!(pipeline(&req), vec![Section::Header, Section::LineItems, Section::Footer]);
    }

    #[test]
    fn empty_selection_is_reported() {
        let req = QuoteRequest::new(DocumentKind::ClientQuote, Vec::new(), 4);
        let mut recorder = LayoutRecorder::new();
        let result = layout(&req, &RenderOptions::new(date()), &mut recorder);
        assert!(matches!(result, Err(QuoteError::NothingSelected)));
        assert!(recorder.page(1).is_empty());
        assert!(matches!(render(&req, &RenderOptions::new(date())), Err(QuoteError::NothingSelected)));
    }

    #[test]
    fn filenames_per_kind() {
        let d = date();
        assert_eq!(
            suggested_filename(DocumentKind::InternalAnalysis, false, None, d),
            "analisi-profitto-22-04-2025.pdf"
        );
        assert_eq!(
            suggested_filename(DocumentKind::ClientQuote, true, Some("Festa CINI"), d),
            "preventivo-festa-cini.pdf"
        );
        assert_eq!(
            suggested_filename(DocumentKind::ClientQuote, false, None, d),
            "preventivo-catering-22-04-2025.pdf"
        );
        assert_eq!(suggested_filename(DocumentKind::MenuListing, false, None, d), "menu-22-04-2025.pdf");
        assert_eq!(
            suggested_filename(DocumentKind::ClientQuote, false, Some("Pranzo Sociale.pdf"), d),
            "pranzo-sociale.pdf"
        );
    }

    #[test]
    fn filename_prefix_is_not_doubled() {
        assert_eq!(
            suggested_filename(DocumentKind::InternalAnalysis, false, Some("analisi-profitto-maggio"), date()),
            "analisi-profitto-maggio.pdf"
        );
        assert_eq!(
            suggested_filename(DocumentKind::ClientQuote, true, Some("  "), date()),
            "preventivo-22-04-2025.pdf"
        );
    }

    #[test]
    fn layout_is_deterministic() {
        for kind in [DocumentKind::ClientQuote, DocumentKind::InternalAnalysis, DocumentKind::MenuListing] {
            let req = request(kind, 30);
            assert_eq!(record(&req), record(&req));
        }
    }

    #[test]
    fn document_id_follows_content() {
        let options = RenderOptions::new(date());
        let req = request(DocumentKind::ClientQuote, 3);
        let id = document_id(&req, &options).expect("id");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, document_id(&req, &options).expect("id"));

        let mut other = req.clone();
        other.headcount = 5;
        assert_ne!(id, document_id(&other, &options).expect("id"));
    }

    #[test]
    fn repeated_renders_are_byte_identical() {
        let options = RenderOptions::new(date());
        let mut req = request(DocumentKind::InternalAnalysis, 25);
        req.client = Some(ClientInfo {
            client_name: "CINI".to_string(),
            ..Default::default()
        });

        let first = render(&req, &options).expect("render");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = render(&req, &options).expect("render");
        assert_eq!(first.bytes, second.bytes);

        let id = document_id(&req, &options).expect("id");
        let trailer_id = format!("/ID[({})({})]", id, id);
        assert!(
            String::from_utf8_lossy(&first.bytes).contains(&trailer_id),
            "trailer does not carry the document id"
        );
    }

    #[test]
    fn long_documents_respect_page_bounds() {
        let geometry = PageGeometry::default();
        for kind in [DocumentKind::ClientQuote, DocumentKind::InternalAnalysis, DocumentKind::MenuListing] {
            let mut req = request(kind, 60);
            req.include_service_details = true;
            let recorder = record(&req);
            assert!(recorder.page_count() > 1, "{:?} should span pages", kind);

            for page in 1..=recorder.page_count() {
                for (text, y) in recorder.texts(page) {
                    assert!(y <= geometry.limit, "{:?} '{}' at {} on page {}", kind, text, y, page);
                }
                if page > 1 {
                    let (title, y) = recorder.texts(page)[0];
                    assert_eq!(title, format!("{} - Continua", kind.title()));
                    assert_eq!(y, 20.0);
                }
            }
        }
    }

    #[test]
    fn footer_lands_on_the_last_page() {
        let req = request(DocumentKind::ClientQuote, 40);
        let recorder = record(&req);
        let (page, _) = recorder.find_text("Grazie per averci scelto").expect("footer");
        assert_eq!(page, recorder.page_count());
    }

    #[test]
    fn items_are_numbered_from_one() {
        let recorder = record(&request(DocumentKind::ClientQuote, 12));
        assert!(recorder.find_text("1. Piatto numero 1").is_some());
        assert!(recorder.find_text("12. Piatto numero 12").is_some());
    }

    #[test]
    fn render_produces_a_pdf() {
        let mut req = request(DocumentKind::ClientQuote, 3);
        req.client = Some(ClientInfo {
            client_name: "CINI".to_string(),
            ..Default::default()
        });
        let doc = render(&req, &RenderOptions::new(date()).file_name("evento")).expect("render");
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.filename, "preventivo-evento.pdf");
        assert_eq!(doc.page_count, record(&req).page_count());
    }
}
