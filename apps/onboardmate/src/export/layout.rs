//! Page layout for exported plans: one input line per rendered row, no wrapping.

use serde::Serialize;

/// Geometry of an exported page. All lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    /// Distance from the bottom edge at which a new page starts.
    pub break_margin_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
}

impl Default for PageLayout {
    /// A4 portrait, 10 mm margins, 20 mm break margin, 10 mm rows of 12 pt Helvetica.
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_left_mm: 10.0,
            margin_top_mm: 10.0,
            break_margin_mm: 20.0,
            line_height_mm: 10.0,
            font_size_pt: 12.0,
        }
    }
}

impl PageLayout {
    /// Rows that fit between the top margin and the break margin. Never less than one.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height_mm - self.margin_top_mm - self.break_margin_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }

    /// Baseline of row `row` (0-based) measured from the bottom edge, as PDF expects.
    /// The text sits vertically centred in its row.
    pub fn baseline_from_bottom_mm(&self, row: usize) -> f32 {
        let font_size_mm = self.font_size_pt * 25.4 / 72.0;
        let row_top = self.margin_top_mm + row as f32 * self.line_height_mm;
        self.page_height_mm - (row_top + self.line_height_mm / 2.0 + 0.3 * font_size_mm)
    }
}

/// Splits text on `\n`, dropping a trailing `\r` from each line.
///
/// Always yields `count('\n') + 1` lines, so empty text is one empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Groups lines into pages. A pure function of its inputs.
pub fn paginate(lines: &[String], layout: &PageLayout) -> Vec<Vec<String>> {
    if lines.is_empty() {
        return vec![Vec::new()];
    }
    lines
        .chunks(layout.lines_per_page())
        .map(|page| page.to_vec())
        .collect()
}
