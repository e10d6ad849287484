//! Section writers that make up a quote document.
//!
//! Each writer draws through the shared `Paginator` and leaves the cursor
//! below its own content. Sections reserve the room they need up front so
//! headings are never left alone at the bottom of a page.

use chrono::NaiveDate;

use crate::assets::Logo;
use crate::canvas::Canvas;
use crate::model::{DocumentKind, LineItem, QuoteRequest};
use crate::money::{format_euro, format_percent, unit_margin, ProfitAnalysis, QuoteTotals};
use crate::paginator::{BlockLine, LineOptions, PageGeometry, Paginator};
use crate::profile::CompanyProfile;
use crate::text::{wrap_text, TextStyle};

// ============================================================================
// Constants
// ============================================================================

/// Logo slot, top-left. Fixed so the layout does not depend on the logo.
const LOGO_X_MM: f32 = 20.0;
const LOGO_Y_MM: f32 = 15.0;
const LOGO_MAX_WIDTH_MM: f32 = 40.0;
const LOGO_MAX_HEIGHT_MM: f32 = 20.0;

const TITLE_X_MM: f32 = 70.0;
const TITLE_Y_MM: f32 = 30.0;
const MARKER_Y_MM: f32 = 36.0;
const HEADER_RULE_Y_MM: f32 = 40.0;
const LETTERHEAD_Y_MM: f32 = 55.0;
const LETTERHEAD_STEP_MM: f32 = 8.0;
/// Letterhead lines placed at fixed positions; the rest flow.
const LETTERHEAD_FIXED_LINES: usize = 6;
const INFO_X_MM: f32 = 130.0;
/// Gap between the last letterhead line and the flowing content.
const LETTERHEAD_GAP_MM: f32 = 13.0;

const ITEM_INDENT_MM: f32 = 5.0;
const DETAIL_INDENT_MM: f32 = 10.0;
/// Room kept free on the right for amounts.
const PRICE_COLUMN_MM: f32 = 30.0;

const HEADING_LINE_HEIGHT: f32 = 15.0;
const SUBHEADING_LINE_HEIGHT: f32 = 10.0;
const GRAND_TOTAL_LINE_HEIGHT: f32 = 10.0;
const ITEM_SPACER_MM: f32 = 2.0;

/// Distance from the top of the totals box to the first baseline.
const BOX_FIRST_BASELINE_MM: f32 = 8.0;
const BOX_BOTTOM_PADDING_MM: f32 = 4.0;
const BOX_INSET_MM: f32 = 4.0;

const SECTION_GAP_MM: f32 = 10.0;
const FOOTER_GAP_MM: f32 = 15.0;

/// Font sizes in points
const TITLE_STYLE: TextStyle = TextStyle::bold(20.0);
const MARKER_STYLE: TextStyle = TextStyle::bold(9.0);
const LETTERHEAD_STYLE: TextStyle = TextStyle::regular(12.0);
const HEADING_STYLE: TextStyle = TextStyle::bold(14.0);
const SUBHEADING_STYLE: TextStyle = TextStyle::bold(12.0);
const ITEM_STYLE: TextStyle = TextStyle::regular(11.0);
const ITEM_BOLD_STYLE: TextStyle = TextStyle::bold(11.0);
const DETAIL_STYLE: TextStyle = TextStyle::regular(10.0);
const ROW_STYLE: TextStyle = TextStyle::regular(12.0);
const ROW_BOLD_STYLE: TextStyle = TextStyle::bold(12.0);
const TOTAL_STYLE: TextStyle = TextStyle::bold(16.0);
const FOOTER_STYLE: TextStyle = TextStyle::italic(10.0);

// ============================================================================
// Pipeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    LineItems,
    FixedCosts,
    Totals,
    ServiceDetails,
    Footer,
}

/// Read-only data shared by all sections of one render.
pub struct RenderContext<'a> {
    pub request: &'a QuoteRequest,
    pub totals: QuoteTotals,
    pub analysis: ProfitAnalysis,
    pub profile: &'a CompanyProfile,
    pub date: NaiveDate,
    pub logo: Option<&'a Logo>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        request: &'a QuoteRequest,
        profile: &'a CompanyProfile,
        date: NaiveDate,
        logo: Option<&'a Logo>,
    ) -> Self {
        let totals = QuoteTotals::for_request(request);
        let analysis = ProfitAnalysis::compute(&totals, &request.line_items);
        Self {
            request,
            totals,
            analysis,
            profile,
            date,
            logo,
        }
    }

    fn kind(&self) -> DocumentKind {
        self.request.kind
    }
}

pub fn render_section<C: Canvas>(section: Section, pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    match section {
        Section::Header => render_header(pag, ctx),
        Section::LineItems => render_line_items(pag, ctx),
        Section::FixedCosts => render_fixed_costs(pag, ctx),
        Section::Totals => render_totals(pag, ctx),
        Section::ServiceDetails => render_service_details(pag, ctx),
        Section::Footer => render_footer(pag, ctx),
    }
}

// ============================================================================
// Header
// ============================================================================

pub fn render_header<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let left = geometry.left_margin;

    if let Some(logo) = ctx.logo {
        pag.image_at(logo, LOGO_X_MM, LOGO_Y_MM, LOGO_MAX_WIDTH_MM, LOGO_MAX_HEIGHT_MM);
    }

    pag.text_at(ctx.kind().title(), TITLE_X_MM, TITLE_Y_MM, TITLE_STYLE);
    if ctx.kind() == DocumentKind::InternalAnalysis {
        pag.text_at("USO INTERNO - NON DIVULGARE", TITLE_X_MM, MARKER_Y_MM, MARKER_STYLE);
    }

    pag.line_at(left, HEADER_RULE_Y_MM, geometry.right_edge, HEADER_RULE_Y_MM, 0.5);

    let mut letterhead = ctx.profile.letterhead();
    let mut y = LETTERHEAD_Y_MM;
    for line in letterhead.by_ref().take(LETTERHEAD_FIXED_LINES) {
        pag.text_at(line, left, y, LETTERHEAD_STYLE);
        y += LETTERHEAD_STEP_MM;
    }

    let date = format!("Data: {}", ctx.date.format("%d/%m/%Y"));
    pag.text_at(&date, INFO_X_MM, LETTERHEAD_Y_MM, LETTERHEAD_STYLE);
    if ctx.kind() != DocumentKind::MenuListing {
        let people = format!("Numero persone: {}", ctx.request.headcount);
        pag.text_at(&people, INFO_X_MM, LETTERHEAD_Y_MM + LETTERHEAD_STEP_MM, LETTERHEAD_STYLE);
    }

    // Lines past the fixed block flow like body text and may break the page.
    pag.advance_to(y);
    let flowing = LineOptions::new(LETTERHEAD_STYLE, LETTERHEAD_STEP_MM);
    for line in letterhead {
        pag.write_line(line, &flowing);
    }
    pag.advance(LETTERHEAD_GAP_MM - LETTERHEAD_STEP_MM);

    if ctx.kind() != DocumentKind::MenuListing {
        render_client_block(pag, ctx, &geometry);
    }
}

fn render_client_block<C: Canvas>(
    pag: &mut Paginator<'_, C>,
    ctx: &RenderContext,
    geometry: &PageGeometry,
) {
    let Some(client) = ctx.request.client() else {
        return;
    };

    let field = LineOptions::new(DETAIL_STYLE, geometry.small_line_height).wrap(geometry.wrap_width);
    pag.ensure_space(SUBHEADING_LINE_HEIGHT + geometry.small_line_height);
    pag.write_line(
        "DATI CLIENTE:",
        &LineOptions::new(SUBHEADING_STYLE, SUBHEADING_LINE_HEIGHT),
    );
    for (label, value) in client.labelled_fields() {
        pag.write_line(&format!("{}: {}", label, value), &field);
    }
}

// ============================================================================
// Line Items
// ============================================================================

pub fn render_line_items<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let heading = match ctx.kind() {
        DocumentKind::ClientQuote => "PRODOTTI SELEZIONATI:",
        DocumentKind::InternalAnalysis => "DETTAGLIO PRODOTTI E COSTI:",
        DocumentKind::MenuListing => "MENU:",
    };

    pag.advance(LETTERHEAD_STEP_MM);
    pag.ensure_space(HEADING_LINE_HEIGHT + 2.0 * geometry.line_height);
    pag.write_line(heading, &LineOptions::new(HEADING_STYLE, HEADING_LINE_HEIGHT));

    for (index, item) in ctx.request.line_items.iter().enumerate() {
        pag.write_block(&item_block(ctx.kind(), index + 1, item, &geometry));
    }
}

/// Lines printed for one item, numbered from 1.
fn item_block(kind: DocumentKind, number: usize, item: &LineItem, geometry: &PageGeometry) -> Vec<BlockLine> {
    let label = format!("{}. {}", number, item.name);
    let name_width = geometry.wrap_width - ITEM_INDENT_MM;
    let item_line = |style: TextStyle| {
        LineOptions::new(style, geometry.line_height).indent(ITEM_INDENT_MM)
    };

    match kind {
        DocumentKind::ClientQuote => {
            vec![BlockLine::new(label, item_line(ITEM_STYLE).wrap(name_width))]
        }
        DocumentKind::MenuListing => vec![BlockLine::new(
            label,
            item_line(ITEM_STYLE)
                .wrap(name_width - PRICE_COLUMN_MM)
                .trailing(format_euro(item.unit_price)),
        )],
        DocumentKind::InternalAnalysis => {
            let detail = LineOptions::new(DETAIL_STYLE, geometry.small_line_height).indent(DETAIL_INDENT_MM);
            let cost = item
                .unit_production_cost
                .map(format_euro)
                .unwrap_or_else(|| "non indicato".to_string());
            vec![
                BlockLine::new(label, item_line(ITEM_BOLD_STYLE).wrap(name_width)),
                BlockLine::new(format!("Prezzo di vendita: {}", format_euro(item.unit_price)), detail.clone()),
                BlockLine::new(format!("Costo di produzione: {}", cost), detail.clone()),
                BlockLine::new(format!("Margine unitario: {}", format_euro(unit_margin(item))), detail),
                BlockLine::new("", LineOptions::new(DETAIL_STYLE, ITEM_SPACER_MM)),
            ]
        }
    }
}

// ============================================================================
// Fixed Costs
// ============================================================================

pub fn render_fixed_costs<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let entries = ctx.request.included_fixed_costs();

    pag.advance(SECTION_GAP_MM);
    pag.ensure_space(SUBHEADING_LINE_HEIGHT + 2.0 * geometry.line_height);
    pag.write_line("COSTI FISSI:", &LineOptions::new(HEADING_STYLE, SUBHEADING_LINE_HEIGHT));

    if entries.is_empty() {
        pag.write_line(
            "Nessun costo fisso incluso",
            &LineOptions::new(DETAIL_STYLE, geometry.line_height).indent(ITEM_INDENT_MM),
        );
        return;
    }

    for entry in entries {
        let options = LineOptions::new(ITEM_STYLE, geometry.line_height)
            .indent(ITEM_INDENT_MM)
            .wrap(geometry.wrap_width - ITEM_INDENT_MM - PRICE_COLUMN_MM)
            .trailing(format_euro(entry.amount));
        pag.write_line(&entry.name, &options);
    }

    // Rule and total stay together.
    pag.ensure_space(ITEM_SPACER_MM + geometry.line_height);
    let rule_y = pag.cursor() - 5.0;
    pag.line_at(geometry.left_margin, rule_y, geometry.right_edge, rule_y, 0.3);
    pag.advance(ITEM_SPACER_MM);
    pag.write_line(
        "Totale costi fissi:",
        &LineOptions::new(ROW_BOLD_STYLE, geometry.line_height)
            .trailing(format_euro(ctx.totals.fixed_costs_total)),
    );
}

// ============================================================================
// Totals
// ============================================================================

struct TotalRow {
    label: String,
    value: String,
    style: TextStyle,
    height: f32,
}

impl TotalRow {
    fn new(label: impl Into<String>, value: impl Into<String>, style: TextStyle, height: f32) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            style,
            height,
        }
    }
}

fn client_rows(ctx: &RenderContext, line_height: f32) -> Vec<TotalRow> {
    let totals = &ctx.totals;
    let mut rows = vec![
        TotalRow::new("Subtotale per persona:", format_euro(totals.per_person_subtotal), ROW_STYLE, line_height),
        TotalRow::new("Numero persone:", totals.headcount.to_string(), ROW_STYLE, line_height),
        TotalRow::new("Totale cibo:", format_euro(totals.food_total), ROW_STYLE, line_height),
    ];
    if !ctx.request.included_fixed_costs().is_empty() {
        rows.push(TotalRow::new("Costi fissi:", format_euro(totals.fixed_costs_total), ROW_STYLE, line_height));
    }
    rows.push(TotalRow::new(
        format!("TOTALE COMPLESSIVO ({}):", ctx.profile.vat_note),
        format_euro(totals.grand_total),
        TOTAL_STYLE,
        GRAND_TOTAL_LINE_HEIGHT,
    ));
    rows
}

fn profit_rows(ctx: &RenderContext, line_height: f32) -> Vec<TotalRow> {
    let analysis = &ctx.analysis;
    let outcome = analysis.outcome();
    vec![
        TotalRow::new("Ricavo totale:", format_euro(analysis.revenue), ROW_STYLE, line_height),
        TotalRow::new(
            format!(
                "Costi di produzione ({} x {}):",
                format_euro(analysis.production_subtotal),
                ctx.totals.headcount
            ),
            format_euro(analysis.food_production_total),
            ROW_STYLE,
            line_height,
        ),
        TotalRow::new("Costi fissi:", format_euro(analysis.fixed_costs_total), ROW_STYLE, line_height),
        TotalRow::new("Costi totali:", format_euro(analysis.total_costs), ROW_BOLD_STYLE, line_height),
        TotalRow::new(
            format!("{}:", outcome.label()),
            format_euro(outcome.amount()),
            TOTAL_STYLE,
            GRAND_TOTAL_LINE_HEIGHT,
        ),
        TotalRow::new(
            "Margine di profitto:",
            format_percent(analysis.margin_percent),
            ROW_STYLE,
            line_height,
        ),
    ]
}

pub fn render_totals<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let rows = match ctx.kind() {
        DocumentKind::InternalAnalysis => profit_rows(ctx, geometry.line_height),
        _ => client_rows(ctx, geometry.line_height),
    };
    let Some(last) = rows.last() else {
        return;
    };

    let all_rows: f32 = rows.iter().map(|row| row.height).sum();
    let box_height = BOX_FIRST_BASELINE_MM + all_rows - last.height + BOX_BOTTOM_PADDING_MM;

    pag.advance(SECTION_GAP_MM);
    // Reserve the whole box, including the advance past its last row.
    pag.ensure_space(BOX_FIRST_BASELINE_MM + all_rows.max(all_rows - last.height + BOX_BOTTOM_PADDING_MM));
    let top = pag.cursor();
    pag.boxed(box_height, 0.5);
    pag.advance_to(top + BOX_FIRST_BASELINE_MM);

    for row in &rows {
        let options = LineOptions::new(row.style, row.height)
            .indent(BOX_INSET_MM)
            .right_indent(BOX_INSET_MM)
            .trailing(row.value.clone());
        pag.write_line(&row.label, &options);
    }
    pag.advance_to(top + box_height);
}

// ============================================================================
// Service Details
// ============================================================================

pub fn render_service_details<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let profile = ctx.profile;
    let groups = [
        ("DETTAGLI DEL SERVIZIO:", &profile.service_notes),
        ("MODALITÀ DI PAGAMENTO:", &profile.payment_terms),
        ("CONFERMA DEL SERVIZIO:", &profile.confirmation),
    ];
    let paragraph = LineOptions::new(DETAIL_STYLE, geometry.small_line_height)
        .indent(2.0)
        .wrap(geometry.wrap_width - 2.0);

    pag.advance(SECTION_GAP_MM);
    for (title, paragraphs) in groups {
        if paragraphs.is_empty() {
            continue;
        }
        pag.ensure_space(geometry.line_height + 2.0 * geometry.small_line_height);
        pag.write_line(title, &LineOptions::new(SUBHEADING_STYLE, geometry.line_height));
        for text in paragraphs {
            pag.write_line(&format!("• {}", text), &paragraph);
        }
        pag.advance(4.0);
    }
}

// ============================================================================
// Footer
// ============================================================================

/// Closing lines pinned to the bottom of the last page.
pub fn render_footer<C: Canvas>(pag: &mut Paginator<'_, C>, ctx: &RenderContext) {
    let geometry = *pag.geometry();
    let lines: Vec<String> = ctx
        .profile
        .footer_lines
        .iter()
        .flat_map(|line| wrap_text(line, FOOTER_STYLE, geometry.wrap_width))
        .collect();
    if lines.is_empty() {
        return;
    }

    let height = lines.len() as f32 * geometry.line_height;
    pag.advance(FOOTER_GAP_MM);
    pag.ensure_space(height);
    pag.advance_to(geometry.limit - height);

    let options = LineOptions::new(FOOTER_STYLE, geometry.line_height);
    for line in &lines {
        pag.write_line(line, &options);
    }
}
