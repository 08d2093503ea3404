//! Report layout
//!
//! Millimetres are the unit of record; points are derived.

// ============================================
// Page
// ============================================

/// A4 (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Page margin on every side (mm)
pub const MARGIN_MM: f32 = 20.0;

pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 170mm

pub const INCH_MM: f32 = 25.4;

/// mm → pt (1mm = 72/25.4 pt)
pub const MM_TO_PT: f32 = 72.0 / INCH_MM;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

// ============================================
// Typography
// ============================================

pub const TITLE_FONT_PT: f32 = 16.0;
pub const SUBHEADER_FONT_PT: f32 = 12.0;
pub const BODY_FONT_PT: f32 = 8.0;
pub const SMALL_FONT_PT: f32 = 8.0;

/// Height of one table row (mm)
pub const TABLE_ROW_MM: f32 = 5.5;

/// Vertical space after a section (mm)
pub const SECTION_GAP_MM: f32 = 6.0;

/// RGB in 0..=1
pub type RgbColor = (f32, f32, f32);

const fn rgb(r: u8, g: u8, b: u8) -> RgbColor {
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Title and header text (#1e3a8a)
pub const BRAND_COLOR: RgbColor = rgb(0x1e, 0x3a, 0x8a);
/// Table header background (#dbeafe)
pub const HEADER_FILL: RgbColor = rgb(0xdb, 0xea, 0xfe);
/// Grid lines
pub const GRID_COLOR: RgbColor = rgb(0x80, 0x80, 0x80);
/// Body text (#444444)
pub const BODY_COLOR: RgbColor = rgb(0x44, 0x44, 0x44);

// ============================================
// Tables
// ============================================

/// Info grid: label, value, label, value (mm)
pub const INFO_COLUMNS_MM: [f32; 4] = [
    1.0 * INCH_MM,
    2.8 * INCH_MM,
    1.0 * INCH_MM,
    2.8 * INCH_MM,
];

/// Defect table: condition, percentage, condition, percentage (mm)
pub const DEFECT_COLUMNS_MM: [f32; 4] = [
    2.0 * INCH_MM,
    1.0 * INCH_MM,
    2.0 * INCH_MM,
    1.0 * INCH_MM,
];

// ============================================
// Photo grid
// ============================================

pub const PHOTOS_PER_ROW: usize = 3;

/// Horizontal gap between photos (mm)
pub const PHOTO_GAP_MM: f32 = 0.1 * INCH_MM;

/// Photo box height (mm)
pub const PHOTO_HEIGHT_MM: f32 = 1.8 * INCH_MM; // 45.72mm

/// Photo box width: a third of the usable width minus the gap (mm)
pub const PHOTO_WIDTH_MM: f32 = USABLE_WIDTH_MM / PHOTOS_PER_ROW as f32 - PHOTO_GAP_MM;

/// Vertical space after each photo row (mm)
pub const PHOTO_ROW_GAP_MM: f32 = 8.0 * 25.4 / 72.0;

/// Position of one photo inside the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoSlot {
    pub row: usize,
    pub col: usize,
    /// Left edge of the box (mm from page left)
    pub x_mm: f32,
}

/// Slot of the `index`-th photo (row-major, 3 per row).
pub fn photo_slot(index: usize) -> PhotoSlot {
    let row = index / PHOTOS_PER_ROW;
    let col = index % PHOTOS_PER_ROW;
    let cell_width = USABLE_WIDTH_MM / PHOTOS_PER_ROW as f32;
    PhotoSlot {
        row,
        col,
        x_mm: MARGIN_MM + col as f32 * cell_width + PHOTO_GAP_MM / 2.0,
    }
}

/// Number of photo rows needed for `count` photos.
pub fn photo_rows(count: usize) -> usize {
    count.div_ceil(PHOTOS_PER_ROW)
}

/// Fits an image of `width_px` × `height_px` into the photo box keeping its
/// aspect ratio. Returns the drawn size in mm.
pub fn fit_photo(width_px: u32, height_px: u32) -> (f32, f32) {
    if width_px == 0 || height_px == 0 {
        return (PHOTO_WIDTH_MM, PHOTO_HEIGHT_MM);
    }
    let aspect = width_px as f32 / height_px as f32;
    if PHOTO_WIDTH_MM / PHOTO_HEIGHT_MM > aspect {
        (PHOTO_HEIGHT_MM * aspect, PHOTO_HEIGHT_MM)
    } else {
        (PHOTO_WIDTH_MM, PHOTO_WIDTH_MM / aspect)
    }
}
