//! Layout definitions
//!
//! mm-based page geometry plus the fixed column and typography descriptors
//! of the printable report. Only the page geometry depends on orientation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ============================================
// Page geometry (mm)
// ============================================

/// A4 (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Margin on every side (mm)
pub const MARGIN_MM: f32 = 20.0;

/// mm → pt (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Page orientation of the document export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "landscape" | "l" | "wide" => Ok(Orientation::Landscape),
            "portrait" | "p" | "tall" => Ok(Orientation::Portrait),
            _ => Err(Error::InvalidValue(format!(
                "orientation '{}' (allowed: Landscape, Portrait)",
                s
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page size and margins for one orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    /// Page width (mm)
    pub page_width_mm: f32,
    /// Page height (mm)
    pub page_height_mm: f32,
    /// Margin (mm)
    pub margin_mm: f32,
    pub orientation: Orientation,
}

impl PdfLayout {
    /// A4 landscape
    pub fn landscape() -> Self {
        Self {
            page_width_mm: A4_HEIGHT_MM,
            page_height_mm: A4_WIDTH_MM,
            margin_mm: MARGIN_MM,
            orientation: Orientation::Landscape,
        }
    }

    /// A4 portrait
    pub fn portrait() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            orientation: Orientation::Portrait,
        }
    }

    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Landscape => Self::landscape(),
            Orientation::Portrait => Self::portrait(),
        }
    }

    /// Usable width (mm)
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// Usable height (mm)
    pub fn usable_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm * 2.0
    }
}

// ============================================
// Typography / colours
// ============================================

pub const TITLE_FONT_PT: f32 = 24.0;
pub const SUBTITLE_FONT_PT: f32 = 16.0;
pub const SECTION_FONT_PT: f32 = 14.0;
pub const BODY_FONT_PT: f32 = 10.0;
pub const TABLE_FONT_PT: f32 = 9.0;
pub const FOOTER_FONT_PT: f32 = 8.0;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT: f32 = 1.4;

/// Cell padding (pt)
pub const CELL_PADDING_X_PT: f32 = 4.0;
pub const CELL_PADDING_Y_PT: f32 = 6.0;

/// Logo height (pt)
pub const LOGO_HEIGHT_PT: f32 = 60.0;

/// 0xRRGGBB
pub const PRIMARY_COLOR: u32 = 0x1E3A8A;
pub const TEXT_COLOR: u32 = 0x333333;
pub const BORDER_COLOR: u32 = 0x999999;
pub const INFO_BG_COLOR: u32 = 0xF5F5F5;
pub const INFO_BORDER_COLOR: u32 = 0xDDDDDD;
pub const FOOTER_COLOR: u32 = 0x666666;
pub const HEADER_TEXT_COLOR: u32 = 0xFFFFFF;

/// 0xRRGGBB → (r, g, b) in 0.0..=1.0
pub fn rgb_components(color: u32) -> (f32, f32, f32) {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    (r, g, b)
}

// ============================================
// Columns
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

/// One table column: label and relative width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub width: f32,
    pub align: CellAlign,
}

pub const PROJECT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { label: "S/N", width: 3.0, align: CellAlign::Center },
    ColumnSpec { label: "Project", width: 12.0, align: CellAlign::Left },
    ColumnSpec { label: "Approved (₦)", width: 8.0, align: CellAlign::Right },
    ColumnSpec { label: "Contract (₦)", width: 8.0, align: CellAlign::Right },
    ColumnSpec { label: "%Disb", width: 4.0, align: CellAlign::Center },
    ColumnSpec { label: "%Bal", width: 4.0, align: CellAlign::Center },
    ColumnSpec { label: "Quality", width: 6.0, align: CellAlign::Center },
    ColumnSpec { label: "Compl", width: 6.0, align: CellAlign::Center },
    ColumnSpec { label: "Observations", width: 15.0, align: CellAlign::Left },
    ColumnSpec { label: "%Comp", width: 4.0, align: CellAlign::Center },
    ColumnSpec { label: "Docs", width: 6.0, align: CellAlign::Center },
    ColumnSpec { label: "Recommendation", width: 14.0, align: CellAlign::Left },
];

pub const TEAM_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { label: "S/N", width: 10.0, align: CellAlign::Center },
    ColumnSpec { label: "Name", width: 40.0, align: CellAlign::Left },
    ColumnSpec { label: "Designation", width: 30.0, align: CellAlign::Left },
    ColumnSpec { label: "Signature", width: 20.0, align: CellAlign::Center },
];

/// Column widths scaled so they fill `total` exactly
pub fn column_widths(columns: &[ColumnSpec], total: f32) -> Vec<f32> {
    let sum: f32 = columns.iter().map(|c| c.width).sum();
    if sum <= 0.0 {
        return vec![0.0; columns.len()];
    }
    columns.iter().map(|c| c.width / sum * total).collect()
}

/// mm → pt
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_geometry() {
        let landscape = PdfLayout::for_orientation(Orientation::Landscape);
        let portrait = PdfLayout::for_orientation(Orientation::Portrait);
        assert!(landscape.page_width_mm > landscape.page_height_mm);
        assert!(portrait.page_height_mm > portrait.page_width_mm);
        assert_eq!(landscape.margin_mm, portrait.margin_mm);
        assert!((landscape.usable_width_mm() - 257.0).abs() < 0.01);
        assert!((portrait.usable_width_mm() - 170.0).abs() < 0.01);
        assert!((portrait.usable_height_mm() - 257.0).abs() < 0.01);
        assert!((landscape.usable_height_mm() - 170.0).abs() < 0.01);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("Portrait".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert!("diagonal".parse::<Orientation>().is_err());
        assert_eq!(Orientation::default(), Orientation::Landscape);
    }

    #[test]
    fn test_column_widths_fill_total() {
        let widths = column_widths(PROJECT_COLUMNS, 257.0);
        let sum: f32 = widths.iter().sum();
        assert!((sum - 257.0).abs() < 0.01);
        // Observations is the widest column
        let widest = widths.iter().cloned().fold(0.0_f32, f32::max);
        assert!((widest - widths[8]).abs() < f32::EPSILON);
        assert_eq!(PROJECT_COLUMNS.len(), 12);
        assert_eq!(TEAM_COLUMNS.len(), 4);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert_eq!(rgb_components(0xFFFFFF), (1.0, 1.0, 1.0));
    }
}
