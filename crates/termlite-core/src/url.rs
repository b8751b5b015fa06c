//! Click-to-open support for registered match patterns

use crate::traits::TerminalSurface;

/// Map widget pixel coordinates to a `(col, row)` viewport cell
///
/// Points inside the leading padding, or on a surface without cell metrics,
/// map to no cell.
pub fn cell_at(surface: &dyn TerminalSurface, x: f64, y: f64) -> Option<(usize, usize)> {
    let padding = surface.inner_padding();
    let (cell_w, cell_h) = (surface.cell_width(), surface.cell_height());
    if cell_w <= 0.0 || cell_h <= 0.0 {
        return None;
    }

    let x = x - padding.left;
    let y = y - padding.top;
    if x < 0.0 || y < 0.0 {
        return None;
    }

    Some(((x / cell_w).floor() as usize, (y / cell_h).floor() as usize))
}

/// Text of the registered match under the pointer, if any
pub fn check_match_at_coordinate(surface: &dyn TerminalSurface, x: f64, y: f64) -> Option<String> {
    let (col, row) = cell_at(surface, x, y)?;
    surface
        .match_at_cell(col, row)
        .filter(|text| !text.is_empty())
}
