//! Scaled font cache and cell metrics

use std::collections::HashMap;

use cairo::{Antialias, Context, FontSlant, FontWeight, Format, HintMetrics, HintStyle, ImageSurface, ScaledFont};

const POINTS_TO_PIXELS: f64 = 96.0 / 72.0;
const FALLBACK_FAMILY: &str = "Monospace";
const FALLBACK_SIZE_PT: f64 = 9.0;

/// Family and pixel size taken from a pango font string such as `"Monospace 9"`
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
}

impl FontSpec {
    pub fn parse(font: &str) -> Self {
        let desc = pango::FontDescription::from_string(font);
        let family = desc
            .family()
            .map(|f| f.to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| FALLBACK_FAMILY.to_string());

        let size = desc.size();
        let size_px = if size <= 0 {
            FALLBACK_SIZE_PT * POINTS_TO_PIXELS
        } else if desc.is_size_absolute() {
            f64::from(size) / f64::from(pango::SCALE)
        } else {
            f64::from(size) / f64::from(pango::SCALE) * POINTS_TO_PIXELS
        };

        Self { family, size_px }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FontKey {
    slant: FontSlant,
    weight: FontWeight,
}

impl std::hash::Hash for FontKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.slant).hash(state);
        std::mem::discriminant(&self.weight).hash(state);
    }
}

pub struct DrawingCache {
    fonts: HashMap<FontKey, ScaledFont>,
    char_width: f64,
    char_height: f64,
    ascent: f64,
}

impl DrawingCache {
    pub fn new(spec: &FontSpec) -> Result<Self, cairo::Error> {
        let surf = ImageSurface::create(Format::ARgb32, 1, 1)?;
        let cr = Context::new(&surf)?;

        let mut fonts = HashMap::new();
        for (slant, weight) in [
            (FontSlant::Normal, FontWeight::Normal),
            (FontSlant::Normal, FontWeight::Bold),
            (FontSlant::Italic, FontWeight::Normal),
            (FontSlant::Italic, FontWeight::Bold),
        ] {
            let font = Self::create_scaled_font(&cr, spec, slant, weight)?;
            fonts.insert(FontKey { slant, weight }, font);
        }

        let normal = fonts
            .get(&FontKey { slant: FontSlant::Normal, weight: FontWeight::Normal })
            .ok_or(cairo::Error::FontTypeMismatch)?;
        let extents = normal.extents();
        let advance = normal.text_extents("M").x_advance();

        Ok(Self {
            fonts,
            char_width: advance.ceil().max(1.0),
            char_height: (extents.ascent() + extents.descent()).ceil().max(1.0),
            ascent: extents.ascent().round(),
        })
    }

    fn create_scaled_font(
        cr: &Context,
        spec: &FontSpec,
        slant: FontSlant,
        weight: FontWeight,
    ) -> Result<ScaledFont, cairo::Error> {
        cr.select_font_face(&spec.family, slant, weight);
        cr.set_font_size(spec.size_px);

        let font_face = cr.font_face();
        let font_matrix = cr.font_matrix();
        let ctm = cr.matrix();

        let mut options = cairo::FontOptions::new()?;
        options.set_antialias(Antialias::Subpixel);
        options.set_hint_style(HintStyle::Slight);
        options.set_hint_metrics(HintMetrics::On);

        ScaledFont::new(&font_face, &font_matrix, &ctm, &options)
    }

    pub fn get_font(&self, bold: bool, italic: bool) -> Option<&ScaledFont> {
        let slant = if italic { FontSlant::Italic } else { FontSlant::Normal };
        let weight = if bold { FontWeight::Bold } else { FontWeight::Normal };
        self.fonts.get(&FontKey { slant, weight })
    }

    pub fn char_width(&self) -> f64 {
        self.char_width
    }

    pub fn char_height(&self) -> f64 {
        self.char_height
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_spec_points_to_pixels() {
        let spec = FontSpec::parse("Monospace 9");
        assert_eq!(spec.family, "Monospace");
        assert!((spec.size_px - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_spec_multi_word_family() {
        let spec = FontSpec::parse("DejaVu Sans Mono 12");
        assert_eq!(spec.family, "DejaVu Sans Mono");
        assert!((spec.size_px - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_spec_without_size_uses_fallback() {
        let spec = FontSpec::parse("Monospace");
        assert!((spec.size_px - FALLBACK_SIZE_PT * POINTS_TO_PIXELS).abs() < 1e-9);
    }
}
