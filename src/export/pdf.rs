//! PDF report drawing (printpdf)
//!
//! Content comes from `fcl_quality_common::export::pdf_core`; this module
//! only places it on A4 pages. The cursor runs top-down in mm from the top
//! edge and is converted to printpdf's bottom-left origin when drawing.

use crate::error::{QcError, Result};
use fcl_quality_common::defects::DEFECT_TABLE_HEADER;
use fcl_quality_common::export::pdf_core::{
    build_defect_rows, build_info_rows, decode_image_data, detail_lines, pdf_safe_text,
    ReportKind, ReportSummary,
};
use fcl_quality_common::layout::*;
use fcl_quality_common::EvaluationRecord;
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::*;
use std::path::Path;

const LAYER_NAME: &str = "Layer 1";
const IMAGE_DPI: f32 = 300.0;
/// Baseline offset of text inside a table row (mm)
const TEXT_INSET_MM: f32 = 1.6;
const CELL_PADDING_MM: f32 = 1.1;

const NO_IMAGES: &str = "No hay imágenes disponibles para este FCL";
const PHOTOS_HEADER: &str = "IMAGENES";

fn pdf_error(context: &str, e: impl std::fmt::Debug) -> QcError {
    QcError::PdfGeneration(format!("{}: {:?}", context, e))
}

fn color((r, g, b): RgbColor) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Current page plus a top-down cursor
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the cursor from the top edge (mm)
    cursor_mm: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error("fuente", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_error("fuente", e))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: MARGIN_MM,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = MARGIN_MM;
        self.pages += 1;
    }

    /// Starts a new page when `height_mm` does not fit below the cursor.
    fn ensure_space(&mut self, height_mm: f32) {
        if self.cursor_mm + height_mm > A4_HEIGHT_MM - MARGIN_MM {
            self.new_page();
        }
    }

    fn advance(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }

    fn text(&self, text: &str, size_pt: f32, x_mm: f32, top_mm: f32, bold: bool, rgb: RgbColor) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(rgb));
        self.layer.use_text(
            pdf_safe_text(text),
            size_pt,
            Mm(x_mm),
            Mm(A4_HEIGHT_MM - top_mm),
            font,
        );
    }

    /// Rectangle with its top-left corner at (`x_mm`, `top_mm`).
    fn rect(&self, x_mm: f32, top_mm: f32, w_mm: f32, h_mm: f32, mode: PaintMode) {
        let bottom = A4_HEIGHT_MM - top_mm - h_mm;
        let rect = Rect::new(
            Mm(x_mm),
            Mm(bottom),
            Mm(x_mm + w_mm),
            Mm(bottom + h_mm),
        )
        .with_mode(mode);
        self.layer.add_rect(rect);
    }

    /// Heading line in the brand colour.
    fn heading(&mut self, text: &str, size_pt: f32) {
        let height = pt_to_mm(size_pt) * 1.4;
        self.ensure_space(height + TABLE_ROW_MM);
        self.advance(height);
        self.text(text, size_pt, MARGIN_MM, self.cursor_mm, true, BRAND_COLOR);
        self.advance(pt_to_mm(size_pt) * 0.6);
    }

    fn small_line(&mut self, text: &str) {
        self.ensure_space(TABLE_ROW_MM);
        self.advance(TABLE_ROW_MM);
        self.text(text, SMALL_FONT_PT, MARGIN_MM, self.cursor_mm - TEXT_INSET_MM, false, BODY_COLOR);
    }

    /// One bordered table row; `header` rows are filled and bold.
    fn table_row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        self.ensure_space(TABLE_ROW_MM);
        let top = self.cursor_mm;
        let mut x = MARGIN_MM;

        self.layer.set_outline_color(color(GRID_COLOR));
        self.layer.set_outline_thickness(0.5);
        for (cell, &width) in cells.iter().zip(widths) {
            if header {
                self.layer.set_fill_color(color(HEADER_FILL));
                self.rect(x, top, width, TABLE_ROW_MM, PaintMode::FillStroke);
            } else {
                self.rect(x, top, width, TABLE_ROW_MM, PaintMode::Stroke);
            }
            let rgb = if header { BRAND_COLOR } else { BODY_COLOR };
            self.text(
                cell,
                BODY_FONT_PT,
                x + CELL_PADDING_MM,
                top + TABLE_ROW_MM - TEXT_INSET_MM,
                header,
                rgb,
            );
            x += width;
        }
        self.advance(TABLE_ROW_MM);
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| pdf_error("error al guardar el PDF", e))
    }
}

fn draw_header(w: &mut PageWriter, kind: ReportKind, summary: &ReportSummary) {
    let title = kind.title();
    // centred by the Helvetica-Bold average advance (~0.55 em)
    let title_width = title.chars().count() as f32 * pt_to_mm(TITLE_FONT_PT) * 0.55;
    let x = (A4_WIDTH_MM - title_width).max(MARGIN_MM * 2.0) / 2.0;
    w.advance(pt_to_mm(TITLE_FONT_PT));
    w.text(title, TITLE_FONT_PT, x, w.cursor_mm, true, BRAND_COLOR);
    w.advance(SECTION_GAP_MM * 1.5);

    for row in build_info_rows(kind, summary) {
        w.ensure_space(TABLE_ROW_MM);
        w.advance(TABLE_ROW_MM);
        let mut x = MARGIN_MM;
        for (i, field) in row.iter().enumerate() {
            let label_width = INFO_COLUMNS_MM[(i * 2) % 4];
            let value_width = INFO_COLUMNS_MM[(i * 2 + 1) % 4];
            w.text(field.label, BODY_FONT_PT, x, w.cursor_mm, true, BODY_COLOR);
            w.text(&field.value, BODY_FONT_PT, x + label_width, w.cursor_mm, false, BODY_COLOR);
            x += label_width + value_width;
        }
    }
    w.advance(SECTION_GAP_MM);
}

fn draw_defect_table(w: &mut PageWriter, first: &EvaluationRecord) {
    w.heading("Resumen de Evaluación de Calidad", SUBHEADER_FONT_PT);
    let header: Vec<String> = DEFECT_TABLE_HEADER.iter().map(|s| s.to_string()).collect();
    w.table_row(&header, &DEFECT_COLUMNS_MM, true);
    for row in build_defect_rows(first) {
        w.table_row(&row, &DEFECT_COLUMNS_MM, false);
    }
    w.advance(SECTION_GAP_MM);
}

fn draw_detail_page(w: &mut PageWriter, record: &EvaluationRecord, index: usize, total: usize) {
    w.new_page();
    w.heading(
        &format!("Registro de evaluación {} de {} - FCL {}", index + 1, total, record.fcl),
        SUBHEADER_FONT_PT,
    );
    let widths = [USABLE_WIDTH_MM * 0.6, USABLE_WIDTH_MM * 0.4];
    w.table_row(&["Campo".to_string(), "Valor".to_string()], &widths, true);
    for (label, value) in detail_lines(record) {
        w.table_row(&[label, value], &widths, false);
    }
}

/// Decoded RGB image, or the label printed in its slot.
fn load_photo(data: &str) -> std::result::Result<DynamicImage, &'static str> {
    let bytes = decode_image_data(data).map_err(|_| "Error: base64 inválido")?;
    let image = image_crate::load_from_memory(&bytes).map_err(|_| "Error: formato inválido")?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

fn draw_photos(w: &mut PageWriter, images: &[String]) {
    w.heading(PHOTOS_HEADER, SUBHEADER_FONT_PT);
    if images.is_empty() {
        w.small_line(NO_IMAGES);
        return;
    }

    let mut row_top = w.cursor_mm;
    for (i, data) in images.iter().enumerate() {
        let slot = photo_slot(i);
        if slot.col == 0 {
            if slot.row > 0 {
                w.advance(PHOTO_HEIGHT_MM + PHOTO_ROW_GAP_MM);
            }
            w.ensure_space(PHOTO_HEIGHT_MM + PHOTO_ROW_GAP_MM);
            row_top = w.cursor_mm;
        }

        match load_photo(data) {
            Ok(image) => {
                let (px_w, px_h) = image.dimensions();
                let (draw_w, draw_h) = fit_photo(px_w, px_h);
                let natural_w = px_w as f32 / IMAGE_DPI * INCH_MM;
                let natural_h = px_h as f32 / IMAGE_DPI * INCH_MM;
                Image::from_dynamic_image(&image).add_to_layer(
                    w.layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(slot.x_mm)),
                        translate_y: Some(Mm(A4_HEIGHT_MM - row_top - draw_h)),
                        scale_x: Some(draw_w / natural_w),
                        scale_y: Some(draw_h / natural_h),
                        dpi: Some(IMAGE_DPI),
                        ..Default::default()
                    },
                );
            }
            Err(label) => {
                tracing::warn!(imagen = i + 1, "{}", label);
                w.text(
                    label,
                    SMALL_FONT_PT,
                    slot.x_mm,
                    row_top + PHOTO_HEIGHT_MM / 2.0,
                    false,
                    BODY_COLOR,
                );
            }
        }
    }
    w.advance(PHOTO_HEIGHT_MM + PHOTO_ROW_GAP_MM);
    w.small_line(&format!("Total de imágenes incluidas: {}", images.len()));
}

/// Builds the FCL report and returns its bytes.
///
/// `details` feeds the defect table (first row) and, with
/// `include_detail_pages`, one page per row. `images` are base64 payloads,
/// with or without a data URI prefix; undecodable ones get an error label
/// in their grid slot. The bytes are also written to `output` when given.
pub fn generate_fcl_pdf_report(
    kind: ReportKind,
    summary: &ReportSummary,
    details: &[EvaluationRecord],
    images: &[String],
    output: Option<&Path>,
    include_detail_pages: bool,
) -> Result<Vec<u8>> {
    let mut w = PageWriter::new(kind.title())?;

    draw_header(&mut w, kind, summary);
    if let Some(first) = details.first() {
        draw_defect_table(&mut w, first);
    }
    if include_detail_pages {
        for (i, record) in details.iter().enumerate() {
            draw_detail_page(&mut w, record, i, details.len());
        }
        if !details.is_empty() {
            w.new_page();
        }
    }
    draw_photos(&mut w, images);

    tracing::debug!(
        paginas = w.pages,
        registros = details.len(),
        imagenes = images.len(),
        "PDF generado"
    );
    let bytes = w.finish()?;

    if let Some(path) = output {
        std::fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), "PDF guardado");
    }
    Ok(bytes)
}
