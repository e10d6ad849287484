//! Best-effort branding image loading.

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ::image::{DynamicImage, Rgba, RgbImage};

use crate::error::{QuoteError, QuoteResult};

/// Default bound on how long rendering waits for the logo.
pub const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_millis(2000);

/// A decoded logo, flattened to 8-bit RGB on a white background.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Logo {
    pub fn from_image(image: &DynamicImage) -> Self {
        // Convert to RGBA first to handle transparency
        let rgba_image = image.to_rgba8();
        let (width, height) = rgba_image.dimensions();

        // Composite against white background
        let mut rgb_image = RgbImage::new(width, height);
        for (x, y, pixel) in rgba_image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            let alpha = a as f32 / 255.0;
            let bg = 255.0;
            let blend = |c: u8| (c as f32 * alpha + bg * (1.0 - alpha)) as u8;
            rgb_image.put_pixel(x, y, ::image::Rgb([blend(r), blend(g), blend(b)]));
        }

        Self {
            width,
            height,
            rgb: rgb_image.into_raw(),
        }
    }

    pub fn decode(bytes: &[u8]) -> QuoteResult<Self> {
        let image = ::image::load_from_memory(bytes)
            .map_err(|e| QuoteError::Logo(format!("Failed to decode image: {}", e)))?;
        if image.width() == 0 || image.height() == 0 {
            return Err(QuoteError::Logo("image has no pixels".to_string()));
        }
        Ok(Self::from_image(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Largest size within the box that preserves the aspect ratio.
    pub fn fitted_size(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect_ratio = self.width as f32 / self.height as f32;
        if max_width / max_height > aspect_ratio {
            // Height-constrained
            (max_height * aspect_ratio, max_height)
        } else {
            // Width-constrained
            (max_width, max_width / aspect_ratio)
        }
    }
}

/// Outcome of a bounded logo wait.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoStatus {
    Loaded(Logo),
    Unavailable,
}

impl LogoStatus {
    pub fn into_logo(self) -> Option<Logo> {
        match self {
            LogoStatus::Loaded(logo) => Some(logo),
            LogoStatus::Unavailable => None,
        }
    }
}

/// Loads a logo from a file path or an http(s) URL, waiting at most `timeout`.
///
/// The load runs on a worker thread and its result is received exactly once.
/// A result arriving after the deadline is dropped with the channel.
pub fn fetch_logo(source: &str, timeout: Duration) -> LogoStatus {
    let (tx, rx) = mpsc::channel();
    let owned = source.to_string();

    thread::spawn(move || {
        let result = read_source(&owned, timeout).and_then(|bytes| Logo::decode(&bytes));
        // The receiver is gone when the wait already timed out.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(logo)) => {
            log::debug!("Logo loaded from {} ({}x{})", source, logo.width, logo.height);
            LogoStatus::Loaded(logo)
        }
        Ok(Err(e)) => {
            log::warn!("Logo unavailable, continuing without it: {}", e);
            LogoStatus::Unavailable
        }
        Err(_) => {
            log::warn!(
                "Logo not loaded within {} ms, continuing without it",
                timeout.as_millis()
            );
            LogoStatus::Unavailable
        }
    }
}

fn read_source(source: &str, timeout: Duration) -> QuoteResult<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let response = agent
            .get(source)
            .call()
            .map_err(|e| QuoteError::Logo(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| QuoteError::Logo(format!("Failed to read response: {}", e)))?;
        Ok(bytes)
    } else {
        std::fs::read(source).map_err(|e| QuoteError::Logo(format!("{}: {}", source, e)))
    }
}
