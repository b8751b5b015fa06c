//! Cairo painting of the visible grid

use cairo::Context;
use termlite_core::constants::SELECTION_BG;
use termlite_core::{Color, TerminalConfig};

use crate::drawing::DrawingCache;
use crate::screen::ScreenState;

/// Foreground, background and palette the cells resolve against
pub struct Palette<'a> {
    pub foreground: Color,
    pub background: Color,
    pub colors: &'a [Color; 16],
}

impl<'a> Palette<'a> {
    pub fn from_config(config: &'a TerminalConfig) -> Self {
        Self {
            foreground: config.foreground,
            background: config.effective_background(),
            colors: &config.palette,
        }
    }

    /// Map an emulator color, `default` standing in for `Color::Default`
    pub fn resolve(&self, color: vt100::Color, default: Color) -> Color {
        match color {
            vt100::Color::Default => default,
            vt100::Color::Idx(i) if i < 16 => self.colors[usize::from(i)],
            vt100::Color::Idx(i) if i < 232 => {
                let i = i - 16;
                let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
                Color::from_rgb8(level(i / 36), level((i / 6) % 6), level(i % 6))
            }
            vt100::Color::Idx(i) => {
                let v = 8 + (i - 232) * 10;
                Color::from_rgb8(v, v, v)
            }
            vt100::Color::Rgb(r, g, b) => Color::from_rgb8(r, g, b),
        }
    }
}

fn set_source(cr: &Context, color: Color) {
    cr.set_source_rgba(color.r, color.g, color.b, color.a);
}

/// Paint the viewport; `top` is the buffer row of the first visible line
pub fn draw(
    cr: &Context,
    state: &ScreenState,
    top: usize,
    cache: &DrawingCache,
    palette: &Palette<'_>,
    flash: bool,
) -> Result<(), cairo::Error> {
    let background = if flash { palette.foreground } else { palette.background };
    cr.save()?;
    cr.set_operator(cairo::Operator::Source);
    set_source(cr, background);
    cr.paint()?;
    cr.restore()?;

    let screen = state.screen();
    let metrics = state.metrics();
    let padding = state.padding();
    let selection = state.selection();
    let (rows, cols) = screen.size();

    for r in 0..rows {
        let y = padding.top + f64::from(r) * metrics.height;
        for c in 0..cols {
            let Some(cell) = screen.cell(r, c) else {
                continue;
            };
            if cell.is_wide_continuation() {
                continue;
            }

            let x = padding.left + f64::from(c) * metrics.width;
            let span = if cell.is_wide() { 2.0 } else { 1.0 };
            let mut fg = palette.resolve(cell.fgcolor(), palette.foreground);
            let mut bg = palette.resolve(cell.bgcolor(), background);
            if cell.inverse() {
                std::mem::swap(&mut fg, &mut bg);
            }

            let selected = selection.is_position_selected(top + usize::from(r), usize::from(c));
            if selected {
                bg = SELECTION_BG;
            }
            if selected || bg != background {
                set_source(cr, bg);
                cr.rectangle(x, y, metrics.width * span, metrics.height);
                cr.fill()?;
            }

            let text: &str = &cell.contents();
            if !text.is_empty() && text != " " {
                if let Some(font) = cache.get_font(cell.bold(), cell.italic()) {
                    cr.set_scaled_font(font);
                    set_source(cr, fg);
                    cr.move_to(x, y + metrics.ascent);
                    cr.show_text(text)?;
                }
            }

            if cell.underline() {
                set_source(cr, fg);
                cr.set_line_width(1.0);
                cr.move_to(x, y + metrics.height - 0.5);
                cr.line_to(x + metrics.width * span, y + metrics.height - 0.5);
                cr.stroke()?;
            }
        }
    }

    if state.scroll_offset() == 0 && !screen.hide_cursor() {
        let (row, col) = screen.cursor_position();
        let x = padding.left + f64::from(col) * metrics.width;
        let y = padding.top + f64::from(row) * metrics.height;
        set_source(cr, palette.foreground);
        cr.set_line_width(1.0);
        cr.rectangle(x + 0.5, y + 0.5, metrics.width - 1.0, metrics.height - 1.0);
        cr.stroke()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termlite_core::constants::COLOR_PALETTE;

    fn palette() -> Palette<'static> {
        Palette {
            foreground: Color::rgb(1.0, 1.0, 1.0),
            background: Color::rgb(0.0, 0.0, 0.0),
            colors: &COLOR_PALETTE,
        }
    }

    #[test]
    fn test_resolve_default_and_ansi() {
        let p = palette();
        let fallback = Color::rgb(0.5, 0.5, 0.5);
        assert_eq!(p.resolve(vt100::Color::Default, fallback), fallback);
        assert_eq!(p.resolve(vt100::Color::Idx(3), fallback), COLOR_PALETTE[3]);
    }

    #[test]
    fn test_resolve_cube_and_grayscale() {
        let p = palette();
        let black = Color::from_rgb8(0, 0, 0);
        assert_eq!(p.resolve(vt100::Color::Idx(16), black), black);
        assert_eq!(
            p.resolve(vt100::Color::Idx(231), black),
            Color::from_rgb8(255, 255, 255)
        );
        assert_eq!(
            p.resolve(vt100::Color::Idx(196), black),
            Color::from_rgb8(255, 0, 0)
        );
        assert_eq!(p.resolve(vt100::Color::Idx(232), black), Color::from_rgb8(8, 8, 8));
        assert_eq!(p.resolve(vt100::Color::Idx(255), black), Color::from_rgb8(238, 238, 238));
    }

    #[test]
    fn test_resolve_truecolor() {
        let p = palette();
        assert_eq!(
            p.resolve(vt100::Color::Rgb(1, 2, 3), Color::default()),
            Color::from_rgb8(1, 2, 3)
        );
    }
}
