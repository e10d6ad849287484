//! Drawing surfaces for the layout engine.
//!
//! Coordinates are millimetres measured from the top-left corner of the page,
//! with `y` growing downwards. Text is positioned by its baseline.

use chrono::NaiveDate;
use printpdf::lopdf::{Object, StringFormat};
use printpdf::*;

use crate::assets::Logo;
use crate::error::{QuoteError, QuoteResult};
use crate::text::{Face, TextStyle};

/// A page-oriented drawing target. A fresh canvas starts with page 1 open.
pub trait Canvas {
    /// Opens a new page; subsequent draws land on it.
    fn new_page(&mut self);
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32);
    /// Outlined rectangle with its top-left corner at (`x`, `y`).
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, thickness: f32);
    /// Draws `logo` scaled into the box, top-left aligned.
    fn image(&mut self, logo: &Logo, x: f32, y: f32, max_width: f32, max_height: f32);
}

// ============================================================================
// PDF Output
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        }
    }
}

/// Canvas backed by a printpdf document.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    document_id: String,
    page_width: f32,
    page_height: f32,
}

impl PdfCanvas {
    /// `document_id` goes into the trailer `/ID`; `created` pins every
    /// date printpdf writes, so equal input gives equal bytes.
    pub fn new(
        title: &str,
        document_id: String,
        created: NaiveDate,
        page_width: f32,
        page_height: f32,
    ) -> QuoteResult<Self> {
        let timestamp = pdf_timestamp(created)?;
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(page_width), Mm(page_height), "Layer 1");
        let doc = doc
            .with_creation_date(timestamp)
            .with_mod_date(timestamp)
            .with_metadata_date(timestamp);

        let layer = doc.get_page(page1).get_layer(layer1);

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| QuoteError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| QuoteError::Pdf(e.to_string()))?,
            italic: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(|e| QuoteError::Pdf(e.to_string()))?,
        };

        Ok(Self {
            doc,
            layer,
            fonts,
            document_id,
            page_width,
            page_height,
        })
    }

    /// Serializes the finished document.
    pub fn finish(self) -> QuoteResult<Vec<u8>> {
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| QuoteError::Pdf(e.to_string()))?;
        stamp_document_id(&bytes, &self.document_id)
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(self.page_height - y))
    }

    fn stroke(&self, thickness: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(thickness);
    }
}

/// Midnight UTC of `date`.
fn pdf_timestamp(date: NaiveDate) -> QuoteResult<OffsetDateTime> {
    let seconds = date
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| QuoteError::Date(date.to_string()))?;
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|e| QuoteError::Date(e.to_string()))
}

/// printpdf fills the trailer `/ID` pair with random strings on every save.
/// Both entries are replaced with the given id.
fn stamp_document_id(bytes: &[u8], id: &str) -> QuoteResult<Vec<u8>> {
    let mut pdf = lopdf::Document::load_mem(bytes).map_err(|e| QuoteError::Pdf(e.to_string()))?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    pdf.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::new();
    pdf.save_to(&mut out).map_err(|e| QuoteError::Pdf(e.to_string()))?;
    Ok(out)
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(Mm(self.page_width), Mm(self.page_height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.layer.use_text(
            text,
            style.size,
            Mm(x),
            Mm(self.page_height - y),
            self.fonts.get(style.face),
        );
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) {
        self.stroke(thickness);
        let points = vec![(self.point(x1, y1), false), (self.point(x2, y2), false)];
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, thickness: f32) {
        self.stroke(thickness);
        let points = vec![
            (self.point(x, y), false),
            (self.point(x + width, y), false),
            (self.point(x + width, y + height), false),
            (self.point(x, y + height), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    fn image(&mut self, logo: &Logo, x: f32, y: f32, max_width: f32, max_height: f32) {
        let (width_mm, height_mm) = logo.fitted_size(max_width, max_height);

        let image = Image::from(ImageXObject {
            width: Px(logo.width() as usize),
            height: Px(logo.height() as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: logo.rgb().to_vec(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI = pixels / (mm / 25.4)
        let dpi = logo.width() as f32 / (width_mm / 25.4);

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(self.page_height - y - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }
}

// ============================================================================
// Layout Recording
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Canvas that records draw operations per page instead of producing PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRecorder {
    pages: Vec<Vec<DrawOp>>,
}

impl Default for LayoutRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutRecorder {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Operations of a 1-based page.
    pub fn page(&self, number: usize) -> &[DrawOp] {
        &self.pages[number - 1]
    }

    /// Text runs of a 1-based page as (text, baseline).
    pub fn texts(&self, number: usize) -> Vec<(&str, f32)> {
        self.page(number)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect()
    }

    /// First text run starting with `prefix`, as (page, baseline).
    pub fn find_text(&self, prefix: &str) -> Option<(usize, f32)> {
        (1..=self.page_count()).find_map(|number| {
            self.texts(number)
                .into_iter()
                .find(|(text, _)| text.starts_with(prefix))
                .map(|(_, y)| (number, y))
        })
    }

    /// Plain-text rendering of the layout, one text run per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for number in 1..=self.page_count() {
            out.push_str(&format!("--- page {} ---\n", number));
            for (text, y) in self.texts(number) {
                out.push_str(&format!("{:6.1}  {}\n", y, text));
            }
        }
        out
    }

    fn current(&mut self) -> &mut Vec<DrawOp> {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl Canvas for LayoutRecorder {
    fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.current().push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) {
        self.current().push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, _thickness: f32) {
        self.current().push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn image(&mut self, logo: &Logo, x: f32, y: f32, max_width: f32, max_height: f32) {
        let (width, height) = logo.fitted_size(max_width, max_height);
        self.current().push(DrawOp::Image {
            x,
            y,
            width,
            height,
        });
    }
}
