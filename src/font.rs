//! Glyph measurement.
//!
//! The engine never talks to a font stack directly. It asks a
//! [`GlyphMeasurer`] for the outline of a piece of text and works with the
//! returned path. [`BoxMeasurer`] needs no font data; `SkrifaMeasurer`
//! (behind the `skrifa` feature) draws real OpenType outlines.

use kurbo::{Affine, BezPath, Rect, Shape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Em size in font units of the returned outline.
    pub size: f64,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            style: FontStyle::Regular,
        }
    }

    pub fn with_style(self, style: FontStyle) -> Self {
        Self { style, ..self }
    }
}

/// A laid out line of text. The baseline starts at the origin and y points
/// up.
#[derive(Debug, Clone, Default)]
pub struct GlyphRun {
    pub path: BezPath,
    pub bounds: Rect,
    pub advance: f64,
}

impl GlyphRun {
    pub fn from_path(path: BezPath, advance: f64) -> Self {
        let bounds = if path.elements().is_empty() {
            Rect::new(0.0, 0.0, 0.0, 0.0)
        } else {
            path.bounding_box()
        };
        Self {
            path,
            bounds,
            advance,
        }
    }
}

pub trait GlyphMeasurer {
    fn layout(&self, text: &str, font: &FontSpec) -> GlyphRun;
}

impl<T: GlyphMeasurer + ?Sized> GlyphMeasurer for &T {
    fn layout(&self, text: &str, font: &FontSpec) -> GlyphRun {
        (**self).layout(text, font)
    }
}

/// Draws each character as a rectangle sized by its character class.
///
/// Deterministic and font free: good for tests, benchmarks, and callers that
/// only need label extents.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxMeasurer;

/// `(advance, bottom, top)` in ems.
fn box_metrics(ch: char) -> (f64, f64, f64) {
    match ch {
        ' ' => (0.25, 0.0, 0.0),
        '|' | '!' | 'i' | 'l' | 'I' | '1' | '.' | '\u{b7}' => (0.28, 0.0, 0.72),
        '(' | ')' | '[' | ']' => (0.33, -0.2, 0.75),
        '+' | '-' | '\u{2212}' | '=' => (0.58, 0.12, 0.5),
        '\u{2022}' => (0.36, 0.25, 0.45),
        '0'..='9' => (0.56, 0.0, 0.72),
        'A'..='Z' => (0.68, 0.0, 0.72),
        'g' | 'j' | 'p' | 'q' | 'y' => (0.52, -0.2, 0.52),
        'b' | 'd' | 'f' | 'h' | 'k' | 't' => (0.52, 0.0, 0.74),
        _ => (0.52, 0.0, 0.52),
    }
}

impl GlyphMeasurer for BoxMeasurer {
    fn layout(&self, text: &str, font: &FontSpec) -> GlyphRun {
        let weight = if font.style == FontStyle::Bold { 1.1 } else { 1.0 };
        let bearing = 0.04;
        let mut path = BezPath::new();
        let mut pen = 0.0;
        for ch in text.chars() {
            let (advance, bottom, top) = box_metrics(ch);
            let advance = advance * weight;
            if top > bottom {
                let glyph = Rect::new(pen + bearing, bottom, pen + advance - bearing, top);
                path.extend(glyph.path_elements(0.1));
            }
            pen += advance;
        }
        if font.style == FontStyle::Italic {
            path.apply_affine(Affine::skew(0.2, 0.0));
        }
        path.apply_affine(Affine::scale(font.size));
        GlyphRun::from_path(path, pen * font.size)
    }
}

#[cfg(feature = "skrifa")]
pub use self::skrifa_measurer::SkrifaMeasurer;

#[cfg(feature = "skrifa")]
mod skrifa_measurer {
    use kurbo::{Affine, BezPath, Point};
    use skrifa::instance::{LocationRef, Size};
    use skrifa::outline::{DrawSettings, OutlinePen};
    use skrifa::raw::{FontRef, ReadError};
    use skrifa::MetadataProvider;

    use super::{FontSpec, FontStyle, GlyphMeasurer, GlyphRun};

    /// Measures text with OpenType outlines. Bold and italic faces are
    /// optional; without them the regular face is used (slanted for italic).
    #[derive(Debug, Clone)]
    pub struct SkrifaMeasurer {
        regular: Vec<u8>,
        bold: Option<Vec<u8>>,
        italic: Option<Vec<u8>>,
    }

    impl SkrifaMeasurer {
        pub fn new(regular: Vec<u8>) -> Result<Self, ReadError> {
            FontRef::new(&regular)?;
            Ok(Self {
                regular,
                bold: None,
                italic: None,
            })
        }

        pub fn with_bold(mut self, data: Vec<u8>) -> Result<Self, ReadError> {
            FontRef::new(&data)?;
            self.bold = Some(data);
            Ok(self)
        }

        pub fn with_italic(mut self, data: Vec<u8>) -> Result<Self, ReadError> {
            FontRef::new(&data)?;
            self.italic = Some(data);
            Ok(self)
        }

        fn face(&self, style: FontStyle) -> (&[u8], bool) {
            match style {
                FontStyle::Regular => (self.regular.as_slice(), false),
                FontStyle::Bold => (
                    self.bold.as_deref().unwrap_or(self.regular.as_slice()),
                    false,
                ),
                FontStyle::Italic => match &self.italic {
                    Some(data) => (data.as_slice(), false),
                    None => (self.regular.as_slice(), true),
                },
            }
        }
    }

    struct BezPathPen {
        path: BezPath,
        dx: f64,
    }

    impl BezPathPen {
        fn pt(&self, x: f32, y: f32) -> Point {
            Point::new(f64::from(x) + self.dx, f64::from(y))
        }
    }

    impl OutlinePen for BezPathPen {
        fn move_to(&mut self, x: f32, y: f32) {
            let p = self.pt(x, y);
            self.path.move_to(p);
        }

        fn line_to(&mut self, x: f32, y: f32) {
            let p = self.pt(x, y);
            self.path.line_to(p);
        }

        fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
            let (c, p) = (self.pt(cx0, cy0), self.pt(x, y));
            self.path.quad_to(c, p);
        }

        fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
            let (c0, c1, p) = (self.pt(cx0, cy0), self.pt(cx1, cy1), self.pt(x, y));
            self.path.curve_to(c0, c1, p);
        }

        fn close(&mut self) {
            self.path.close_path();
        }
    }

    impl GlyphMeasurer for SkrifaMeasurer {
        fn layout(&self, text: &str, font: &FontSpec) -> GlyphRun {
            let (data, slant) = self.face(font.style);
            let Ok(face) = FontRef::new(data) else {
                log::warn!("font data could not be read, text {text:?} has no outline");
                return GlyphRun::default();
            };
            let size = Size::new(font.size as f32);
            let charmap = face.charmap();
            let outlines = face.outline_glyphs();
            let metrics = face.glyph_metrics(size, LocationRef::default());

            let mut pen = BezPathPen {
                path: BezPath::new(),
                dx: 0.0,
            };
            for ch in text.chars() {
                let gid = charmap.map(ch).unwrap_or_default();
                if let Some(glyph) = outlines.get(gid) {
                    let settings = DrawSettings::unhinted(size, LocationRef::default());
                    if glyph.draw(settings, &mut pen).is_err() {
                        log::debug!("glyph for {ch:?} failed to draw");
                    }
                }
                pen.dx += f64::from(metrics.advance_width(gid).unwrap_or_default());
            }
            let mut path = pen.path;
            if slant {
                path.apply_affine(Affine::skew(0.2, 0.0));
            }
            GlyphRun::from_path(path, pen.dx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_run_grows_with_text() {
        let font = FontSpec::new(10.0);
        let one = BoxMeasurer.layout("C", &font);
        let two = BoxMeasurer.layout("Cl", &font);
        assert!(two.bounds.width() > one.bounds.width());
        assert!(two.advance > one.advance);
        assert!(one.bounds.y0 >= 0.0);
    }

    #[test]
    fn empty_and_blank_text_have_no_outline() {
        let font = FontSpec::new(10.0);
        let run = BoxMeasurer.layout("", &font);
        assert!(run.path.elements().is_empty());
        assert_eq!(run.bounds.area(), 0.0);
        let run = BoxMeasurer.layout(" ", &font);
        assert!(run.path.elements().is_empty());
        assert!(run.advance > 0.0);
    }

    #[test]
    fn bold_is_wider() {
        let font = FontSpec::new(10.0);
        let regular = BoxMeasurer.layout("N", &font);
        let bold = BoxMeasurer.layout("N", &font.with_style(FontStyle::Bold));
        assert!(bold.advance > regular.advance);
    }

    #[test]
    fn pipe_is_narrow() {
        let font = FontSpec::new(10.0);
        let pipe = BoxMeasurer.layout("|", &font);
        let cap = BoxMeasurer.layout("N", &font);
        assert!(pipe.bounds.width() < cap.bounds.width());
    }
}
