//! Single-page PDF export using `printpdf` 0.8.
//!
//! The image spans the full page width with its height scaled by the
//! raster's own aspect ratio, anchored at the top-left corner of the page.
//! PDF user space has its origin at the bottom-left, so the image is
//! translated down from the top edge.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};

use super::{validate_raster, EncodeError};
use crate::decode::RasterImage;

/// Page geometry for PDF export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPageSpec {
    pub width_mm: f32,
    pub height_mm: f32,
    /// Resolution the raster is embedded at before scaling to the page.
    pub dpi: f32,
}

impl PdfPageSpec {
    /// A4 portrait.
    pub const A4: PdfPageSpec = PdfPageSpec {
        width_mm: 210.0,
        height_mm: 297.0,
        dpi: 300.0,
    };
}

impl Default for PdfPageSpec {
    fn default() -> Self {
        Self::A4
    }
}

/// Where the image lands on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub image_width_mm: f32,
    pub image_height_mm: f32,
    /// Bottom-left corner of the image in PDF points.
    pub translate_x_pt: f32,
    pub translate_y_pt: f32,
    /// Uniform scale applied to the image's native size at `dpi`.
    pub scale: f32,
}

/// Fit an image of `width x height` pixels to the page width.
pub fn layout_on_page(width: u32, height: u32, page: &PdfPageSpec) -> PdfLayout {
    let image_width_mm = page.width_mm;
    let image_height_mm = page.width_mm * height as f32 / width.max(1) as f32;

    let native_width_pt = width.max(1) as f32 / page.dpi * 72.0;
    let image_width_pt = Mm(image_width_mm).into_pt().0;
    let image_height_pt = Mm(image_height_mm).into_pt().0;
    let page_height_pt = Mm(page.height_mm).into_pt().0;

    PdfLayout {
        image_width_mm,
        image_height_mm,
        translate_x_pt: 0.0,
        translate_y_pt: page_height_pt - image_height_pt,
        scale: image_width_pt / native_width_pt,
    }
}

/// Placement of the image XObject for a layout.
fn image_transform(layout: &PdfLayout, page: &PdfPageSpec) -> XObjectTransform {
    XObjectTransform {
        translate_x: Some(Pt(layout.translate_x_pt)),
        translate_y: Some(Pt(layout.translate_y_pt)),
        scale_x: Some(layout.scale),
        scale_y: Some(layout.scale),
        dpi: Some(page.dpi),
        rotate: None,
    }
}

/// Encode an RGBA raster as a one-page PDF.
pub fn encode_pdf(
    image: &RasterImage,
    page: &PdfPageSpec,
    title: &str,
) -> Result<Vec<u8>, EncodeError> {
    validate_raster(image)?;
    if !(page.width_mm > 0.0 && page.height_mm > 0.0 && page.dpi > 0.0) {
        return Err(EncodeError::EncodingFailed {
            format: "PDF",
            message: format!("invalid page geometry {page:?}"),
        });
    }

    let layout = layout_on_page(image.width, image.height, page);

    let raw = RawImage {
        pixels: RawImageData::U8(image.pixels.clone()),
        width: image.width as usize,
        height: image.height as usize,
        data_format: RawImageFormat::RGBA8,
        tag: Vec::new(),
    };

    let mut doc = PdfDocument::new(title);
    let xobject_id = doc.add_image(&raw);

    let ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: image_transform(&layout, page),
    }];

    doc.with_pages(vec![PdfPage::new(
        Mm(page.width_mm),
        Mm(page.height_mm),
        ops,
    )]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

    if !warnings.is_empty() {
        log::debug!("PDF export produced {} warnings", warnings.len());
    }

    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Placed image keeps the raster's aspect ratio.
        #[test]
        fn prop_layout_preserves_aspect_ratio(
            (width, height) in (1u32..=4000, 1u32..=4000),
        ) {
            let layout = layout_on_page(width, height, &PdfPageSpec::A4);
            let placed = layout.image_height_mm / layout.image_width_mm;
            let source = height as f32 / width as f32;
            prop_assert!((placed - source).abs() <= source * 1e-4);
        }

        /// Property: The emitted transform keeps the image on the page, top-anchored.
        #[test]
        fn prop_transform_fits_page_top(
            (width, height) in (1u32..=4000, 1u32..=4000),
        ) {
            let page = PdfPageSpec::A4;
            let transform = image_transform(&layout_on_page(width, height, &page), &page);
            let (Some(scale_x), Some(scale_y), Some(ty)) =
                (transform.scale_x, transform.scale_y, transform.translate_y)
            else {
                return Err(TestCaseError::fail("transform fields missing"));
            };

            let placed_w = width as f32 / page.dpi * 72.0 * scale_x;
            let placed_h = height as f32 / page.dpi * 72.0 * scale_y;
            let page_w = Mm(page.width_mm).into_pt().0;
            let page_h = Mm(page.height_mm).into_pt().0;

            prop_assert!((placed_w - page_w).abs() <= page_w * 1e-4);
            prop_assert!((ty.0 + placed_h - page_h).abs() <= page_h.max(placed_h) * 1e-4);
            let aspect = height as f32 / width as f32;
            prop_assert!((placed_h / placed_w - aspect).abs() <= aspect * 1e-4);
        }
    }
}
