//! Vertical cursor and page-break engine.
//!
//! A `Paginator` owns the write position of one document. Every flowing write
//! first checks that it fits above the usable limit and otherwise opens a new
//! page with a continuation header. The engine is consumed by `finish`.

use crate::assets::Logo;
use crate::canvas::Canvas;
use crate::text::{text_width, wrap_text, TextStyle};

/// Baseline of the continuation title on pages after the first.
const CONTINUATION_TITLE_Y: f32 = 20.0;
const CONTINUATION_RULE_Y: f32 = 25.0;
const CONTINUATION_STYLE: TextStyle = TextStyle::bold(12.0);

/// Page geometry in millimetres, top-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// No baseline may be placed below this offset.
    pub limit: f32,
    pub top_margin: f32,
    pub left_margin: f32,
    pub right_edge: f32,
    pub wrap_width: f32,
    pub line_height: f32,
    pub small_line_height: f32,
    /// Cursor position after a page break, below the continuation header.
    pub continuation_top: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            limit: 280.0,
            top_margin: 15.0,
            left_margin: 20.0,
            right_edge: 190.0,
            wrap_width: 170.0,
            line_height: 8.0,
            small_line_height: 6.0,
            continuation_top: 40.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.right_edge - self.left_margin
    }

    /// Height available for flowing content on a continuation page.
    pub fn page_capacity(&self) -> f32 {
        self.limit - self.continuation_top
    }
}

/// How a flowing line is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOptions {
    pub style: TextStyle,
    pub line_height: f32,
    /// Offset from the left margin.
    pub indent: f32,
    /// Offset of trailing text from the right edge.
    pub right_indent: f32,
    pub wrap_width: Option<f32>,
    /// Right-aligned text on the first line, such as an amount.
    pub trailing: Option<String>,
}

impl LineOptions {
    pub fn new(style: TextStyle, line_height: f32) -> Self {
        Self {
            style,
            line_height,
            indent: 0.0,
            right_indent: 0.0,
            wrap_width: None,
            trailing: None,
        }
    }

    pub fn indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn right_indent(mut self, indent: f32) -> Self {
        self.right_indent = indent;
        self
    }

    pub fn wrap(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn trailing(mut self, text: impl Into<String>) -> Self {
        self.trailing = Some(text.into());
        self
    }
}

/// One line of a block that should stay on a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLine {
    pub text: String,
    pub options: LineOptions,
}

impl BlockLine {
    pub fn new(text: impl Into<String>, options: LineOptions) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

pub struct Paginator<'c, C: Canvas> {
    canvas: &'c mut C,
    geometry: PageGeometry,
    continuation_title: String,
    cursor_y: f32,
    page: usize,
    /// True from a page break until something is drawn on the new page.
    fresh_page: bool,
}

impl<'c, C: Canvas> Paginator<'c, C> {
    pub fn new(
        canvas: &'c mut C,
        geometry: PageGeometry,
        continuation_title: impl Into<String>,
    ) -> Self {
        Self {
            canvas,
            geometry,
            continuation_title: continuation_title.into(),
            cursor_y: geometry.top_margin,
            page: 1,
            fresh_page: false,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor_y
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    // ========================================================================
    // Flow control
    // ========================================================================

    /// Breaks the page unless `height` fits above the limit. Returns the cursor.
    pub fn ensure_space(&mut self, height: f32) -> f32 {
        if self.cursor_y + height > self.geometry.limit && !self.fresh_page {
            self.page_break();
        }
        self.cursor_y
    }

    /// Opens a new page, draws the continuation header and resets the cursor.
    pub fn page_break(&mut self) {
        self.canvas.new_page();
        self.page += 1;
        log::debug!("Page break, continuing on page {}", self.page);

        let left = self.geometry.left_margin;
        let right = self.geometry.right_edge;
        let title = format!("{} - Continua", self.continuation_title);
        self.canvas
            .text(&title, left, CONTINUATION_TITLE_Y, CONTINUATION_STYLE);
        self.canvas
            .line(left, CONTINUATION_RULE_Y, right, CONTINUATION_RULE_Y, 0.3);

        self.cursor_y = self.geometry.continuation_top;
        self.fresh_page = true;
    }

    /// Blank spacing. A gap that would cross the limit becomes a page break.
    pub fn advance(&mut self, delta: f32) {
        if self.cursor_y + delta > self.geometry.limit {
            if !self.fresh_page {
                self.page_break();
            }
            return;
        }
        self.cursor_y += delta;
    }

    /// Moves the cursor down to `y` on the current page, never up.
    pub fn advance_to(&mut self, y: f32) {
        self.cursor_y = self.cursor_y.max(y.min(self.geometry.limit));
    }

    // ========================================================================
    // Flowing writes
    // ========================================================================

    /// Writes text at the cursor, wrapping when the options ask for it.
    /// Each wrapped line is checked for space on its own.
    pub fn write_line(&mut self, text: &str, options: &LineOptions) {
        for (index, line) in self.wrap(text, options).iter().enumerate() {
            self.ensure_space(options.line_height);
            self.emit(line, options, index == 0);
        }
    }

    /// Writes lines as one unit, moving them to a new page together when
    /// they fit on one. Taller blocks flow line by line.
    pub fn write_block(&mut self, lines: &[BlockLine]) {
        let mut expanded = Vec::new();
        for line in lines {
            for (index, text) in self.wrap(&line.text, &line.options).into_iter().enumerate() {
                expanded.push((text, &line.options, index == 0));
            }
        }

        let total: f32 = expanded.iter().map(|(_, options, _)| options.line_height).sum();
        if total <= self.geometry.page_capacity() {
            self.ensure_space(total);
        } else {
            log::debug!("Block of {:.1} mm exceeds a page, flowing line by line", total);
        }

        for (text, options, first) in expanded {
            self.ensure_space(options.line_height);
            self.emit(&text, options, first);
        }
    }

    fn wrap(&self, text: &str, options: &LineOptions) -> Vec<String> {
        match options.wrap_width {
            Some(width) => wrap_text(text, options.style, width),
            None => vec![text.to_string()],
        }
    }

    fn emit(&mut self, text: &str, options: &LineOptions, first: bool) {
        let x = self.geometry.left_margin + options.indent;
        if !text.is_empty() {
            self.canvas.text(text, x, self.cursor_y, options.style);
        }
        if first {
            if let Some(trailing) = &options.trailing {
                let width = text_width(trailing, options.style);
                self.canvas.text(
                    trailing,
                    self.geometry.right_edge - options.right_indent - width,
                    self.cursor_y,
                    options.style,
                );
            }
        }
        self.cursor_y += options.line_height;
        self.fresh_page = false;
    }

    // ========================================================================
    // Fixed-position drawing
    // ========================================================================

    pub fn text_at(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.canvas.text(text, x, y, style);
        self.fresh_page = false;
    }

    pub fn line_at(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) {
        self.canvas.line(x1, y1, x2, y2, thickness);
        self.fresh_page = false;
    }

    /// Outlined box across the content width, starting at the cursor.
    pub fn boxed(&mut self, height: f32, thickness: f32) {
        let width = self.geometry.content_width();
        self.canvas
            .rect(self.geometry.left_margin, self.cursor_y, width, height, thickness);
        self.fresh_page = false;
    }

    pub fn image_at(&mut self, logo: &Logo, x: f32, y: f32, max_width: f32, max_height: f32) {
        self.canvas.image(logo, x, y, max_width, max_height);
        self.fresh_page = false;
    }

    /// Ends the layout and returns the number of pages produced.
    pub fn finish(self) -> usize {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, LayoutRecorder};

    const BODY: TextStyle = TextStyle::regular(11.0);

    fn body() -> LineOptions {
        LineOptions::new(BODY, 8.0)
    }

    fn all_baselines(recorder: &LayoutRecorder) -> Vec<f32> {
        (1..=recorder.page_count())
            .flat_map(|page| recorder.texts(page).into_iter().map(|(_, y)| y))
            .collect()
    }

    #[test]
    fn writes_advance_the_cursor_without_breaking() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "PREVENTIVO CATERING");
        pag.advance_to(100.0);
        pag.write_line("1. Lasagne della casa", &body());
        pag.write_line("2. Risotto ai funghi porcini", &body());
        assert_eq!(pag.cursor(), 116.0);
        assert_eq!(pag.finish(), 1);
        assert_eq!(recorder.texts(1), vec![("1. Lasagne della casa", 100.0), ("2. Risotto ai funghi porcini", 108.0)]);
    }

    #[test]
    fn break_draws_continuation_header_and_resets_cursor() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "PREVENTIVO CATERING");
        pag.advance_to(275.0);
        pag.write_line("ultima riga", &body());
        assert_eq!(pag.page(), 2);
        assert_eq!(pag.cursor(), 48.0);
        pag.finish();

        let page2 = recorder.texts(2);
        assert_eq!(page2[0], ("PREVENTIVO CATERING - Continua", 20.0));
        assert_eq!(page2[1], ("ultima riga", 40.0));
        assert!(recorder
            .page(2)
            .iter()
            .any(|op| matches!(op, DrawOp::Line { y1, .. } if *y1 == 25.0)));
    }

    #[test]
    fn two_line_items_move_to_next_page_together() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "PREVENTIVO CATERING");
        // Leaves room for exactly 8 blocks of 16 mm on the first page.
        pag.advance_to(152.0);
        for n in 1..=20 {
            pag.write_block(&[
                BlockLine::new(format!("{}. Portata numero {}", n, n), body()),
                BlockLine::new("   descrizione", body()),
            ]);
        }
        assert_eq!(pag.finish(), 2);

        assert_eq!(recorder.find_text("8. "), Some((1, 264.0)));
        assert_eq!(recorder.find_text("9. "), Some((2, 40.0)));
        assert_eq!(recorder.find_text("20. "), Some((2, 40.0 + 11.0 * 16.0)));
        assert_eq!(recorder.texts(2)[0].0, "PREVENTIVO CATERING - Continua");
    }

    #[test]
    fn page_count_matches_capacity() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "MENU CATERING");
        pag.advance_to(40.0);
        for n in 0..100 {
            pag.write_line(&format!("riga {}", n), &body());
        }
        // 240 mm of usable height per page holds 30 lines of 8 mm.
        assert_eq!(pag.finish(), 4);
    }

    #[test]
    fn no_baseline_exceeds_the_limit() {
        let mut recorder = LayoutRecorder::new();
        let geometry = PageGeometry::default();
        let mut pag = Paginator::new(&mut recorder, geometry, "ANALISI PROFITTO");
        pag.advance_to(115.0);
        for n in 0..137 {
            let options = if n % 3 == 0 { LineOptions::new(TextStyle::regular(10.0), 6.0) } else { body() };
            pag.write_line(&format!("voce {}", n), &options);
            if n % 7 == 0 {
                pag.advance(13.0);
            }
        }
        pag.finish();
        assert!(recorder.page_count() > 1);
        assert!(all_baselines(&recorder).iter().all(|&y| y <= geometry.limit));
    }

    #[test]
    fn wrapped_text_consumes_one_line_height_per_line() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "PREVENTIVO CATERING");
        pag.advance_to(100.0);
        let long = "Servizio catering con allestimento buffet e personale di sala \
                    per tutta la durata dell'evento aziendale";
        pag.write_line(long, &body().wrap(60.0));
        let cursor = pag.cursor();
        pag.finish();

        let lines = recorder.texts(1);
        assert!(lines.len() >= 2);
        assert_eq!(cursor, 100.0 + 8.0 * lines.len() as f32);
        assert!(lines.iter().all(|(text, _)| text_width(text, BODY) <= 60.0));
    }

    #[test]
    fn advance_past_limit_breaks_once() {
        let mut recorder = LayoutRecorder::new();
        let mut pag = Paginator::new(&mut recorder, PageGeometry::default(), "PREVENTIVO CATERING");
        pag.advance_to(270.0);
        pag.text_at("contenuto", 20.0, 270.0, BODY);
        pag.advance(20.0);
        assert_eq!((pag.page(), pag.cursor()), (2, 40.0));
        // Already at the top of a fresh page: no second break.
        pag.advance(500.0);
        pag.ensure_space(400.0);
        assert_eq!(pag.finish(), 2);
    }

    #[test]
    fn oversized_block_flows_line_by_line() {
        let mut recorder = LayoutRecorder::new();
        let geometry = PageGeometry::default();
        let mut pag = Paginator::new(&mut recorder, geometry, "MENU CATERING");
        pag.advance_to(200.0);
        let block: Vec<BlockLine> = (0..40).map(|n| BlockLine::new(format!("riga {}", n), body())).collect();
        pag.write_block(&block);
        pag.finish();
        // The block starts where the cursor was instead of jumping a page.
        assert_eq!(recorder.find_text("riga 0"), Some((1, 200.0)));
        assert!(all_baselines(&recorder).iter().all(|&y| y <= geometry.limit));
    }

    #[test]
    fn trailing_text_is_right_aligned() {
        let mut recorder = LayoutRecorder::new();
        let geometry = PageGeometry::default();
        let mut pag = Paginator::new(&mut recorder, geometry, "MENU CATERING");
        pag.advance_to(60.0);
        pag.write_line("Lasagne", &body().trailing("€12.50"));
        pag.finish();
        let (x, style) = recorder
            .page(1)
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, x, style, .. } if text == "€12.50" => Some((*x, *style)),
                _ => None,
            })
            .expect("trailing amount drawn");
        assert!((x + text_width("€12.50", style) - geometry.right_edge).abs() < 0.001);
    }
}
