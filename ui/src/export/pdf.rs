//! Single-page A4 report holding the dashboard image, rendered with genpdf.

use std::io::Cursor;

use genpdf::{
    elements::Image,
    fonts::{FontData, FontFamily},
    Document, Position, Scale, Size,
};

use super::ExportError;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;
pub const TOP_MARGIN_MM: f64 = 20.0;

/// Resolution genpdf uses to turn image pixels into millimetres.
const IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// DejaVu Sans, embedded so rendering never depends on fonts installed on the host.
pub(crate) const REPORT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Where the image lands on the page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub orientation: Orientation,
    pub page_width: f64,
    pub page_height: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageLayout {
    /// Landscape A4 for wide images, portrait otherwise. The image keeps its
    /// aspect ratio, fits the area below the top margin and is centred
    /// horizontally.
    pub fn fit(image_width: u32, image_height: u32) -> Self {
        let orientation = if image_width > image_height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let (page_width, page_height) = match orientation {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        };

        let img_w = f64::from(image_width.max(1));
        let img_h = f64::from(image_height.max(1));
        let ratio = (page_width / img_w).min((page_height - TOP_MARGIN_MM) / img_h);
        let width = img_w * ratio;
        let height = img_h * ratio;

        Self {
            orientation,
            page_width,
            page_height,
            x: (page_width - width) / 2.0,
            y: TOP_MARGIN_MM,
            width,
            height,
        }
    }

    /// Factor that stretches an image of `pixel_width` at [`IMAGE_DPI`] to
    /// the laid-out width.
    fn scale_for(&self, pixel_width: u32) -> f64 {
        let natural_mm = f64::from(pixel_width.max(1)) * MM_PER_INCH / IMAGE_DPI;
        self.width / natural_mm
    }
}

/// Baseline JPEG ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

fn report_fonts() -> Result<FontFamily<FontData>, ExportError> {
    let regular = FontData::new(REPORT_FONT.to_vec(), None).map_err(encode_error)?;
    Ok(FontFamily {
        regular: regular.clone(),
        bold: regular.clone(),
        italic: regular.clone(),
        bold_italic: regular,
    })
}

fn encode_error(err: genpdf::error::Error) -> ExportError {
    ExportError::Encode(err.to_string())
}

/// Render a one-page document showing `image` as laid out by
/// [`PageLayout::fit`].
pub fn write_pdf(image: &JpegImage, title: &str) -> Result<Vec<u8>, ExportError> {
    let layout = PageLayout::fit(image.width, image.height);
    let scale = layout.scale_for(image.width);

    let mut doc = Document::new(report_fonts()?);
    doc.set_title(title);
    doc.set_paper_size(Size::new(layout.page_width, layout.page_height));

    let picture = Image::from_reader(Cursor::new(image.bytes.as_slice()))
        .map_err(encode_error)?
        .with_dpi(IMAGE_DPI)
        .with_scale(Scale::new(scale, scale))
        .with_position(Position::new(layout.x, layout.y));
    doc.push(picture);

    let mut bytes = Vec::new();
    doc.render(&mut bytes).map_err(encode_error)?;
    Ok(bytes)
}
