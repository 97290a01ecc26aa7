//! Label Imps, ported from `objects/text_imp.cc` / `text_type.cc`:
//! a positioned string, plus the numeric/boolean specializations that
//! back the "numeric label" and "boolean label" object types.

use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::PropertyList;

/// Axis-aligned bounding rectangle, used only as the text's on-screen
/// frame; it does not participate in `equals` (two labels with the same
/// text and anchor are equal regardless of how they last happened to be
/// laid out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect { left, top, width, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextImp {
    pub text: String,
    pub location: Coordinate,
    /// True for labels attached to a containing object's needs-frame flag
    /// (the label tracks its parent rather than floating free).
    pub needs_frame: bool,
    pub frame: Rect,
}

impl TextImp {
    pub fn new(text: String, location: Coordinate, needs_frame: bool, frame: Rect) -> Self {
        TextImp { text, location, needs_frame, frame }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::TEXT
    }

    pub fn transform(&self, t: &Transformation) -> Option<TextImp> {
        let location = t.apply(self.location)?;
        Some(TextImp { location, ..self.clone() })
    }

    pub fn valid(&self) -> bool {
        self.location.valid()
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        Some(self.location)
    }

    pub fn equals(&self, other: &TextImp) -> bool {
        self.text == other.text && self.location.approx_eq(other.location, 1e-9)
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new()
    }
}

/// A label whose displayed string is always the decimal rendering of a
/// double, kept separately from the generic string so property dispatch
/// can require callers to ask for it as `&imp_type::NUMERIC_TEXT`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTextImp {
    pub value: f64,
    pub text: TextImp,
}

impl NumericTextImp {
    pub fn new(value: f64, location: Coordinate) -> Self {
        NumericTextImp {
            value,
            text: TextImp::new(format_number(value), location, false, Rect::new(0.0, 0.0, 0.0, 0.0)),
        }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::NUMERIC_TEXT
    }

    pub fn transform(&self, t: &Transformation) -> Option<NumericTextImp> {
        let text = self.text.transform(t)?;
        Some(NumericTextImp { value: self.value, text })
    }

    pub fn valid(&self) -> bool {
        self.value.is_finite() && self.text.valid()
    }
}

fn format_number(v: f64) -> String {
    format!("{:.3}", v)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolTextImp {
    pub value: bool,
    pub text: TextImp,
}

impl BoolTextImp {
    pub fn new(value: bool, location: Coordinate) -> Self {
        let s = if value { "true" } else { "false" }.to_string();
        BoolTextImp {
            value,
            text: TextImp::new(s, location, false, Rect::new(0.0, 0.0, 0.0, 0.0)),
        }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::BOOL_TEXT
    }

    pub fn transform(&self, t: &Transformation) -> Option<BoolTextImp> {
        let text = self.text.transform(t)?;
        Some(BoolTextImp { value: self.value, text })
    }

    pub fn valid(&self) -> bool {
        self.text.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_equality_ignores_frame() {
        let a = TextImp::new("hi".into(), Coordinate::new(0.0, 0.0), false, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = TextImp::new("hi".into(), Coordinate::new(0.0, 0.0), false, Rect::new(5.0, 5.0, 1.0, 1.0));
        assert!(a.equals(&b));
    }

    #[test]
    fn numeric_text_formats_its_value() {
        let n = NumericTextImp::new(3.14159, Coordinate::new(0.0, 0.0));
        assert_eq!(n.text.text, "3.142");
        assert!(n.valid());
    }

    #[test]
    fn bool_text_renders_true_false() {
        let t = BoolTextImp::new(true, Coordinate::new(0.0, 0.0));
        let f = BoolTextImp::new(false, Coordinate::new(0.0, 0.0));
        assert_eq!(t.text.text, "true");
        assert_eq!(f.text.text, "false");
    }

    #[test]
    fn transform_moves_location() {
        let n = NumericTextImp::new(1.0, Coordinate::new(0.0, 0.0));
        let t = Transformation::translation(Coordinate::new(2.0, 3.0));
        let moved = n.transform(&t).unwrap();
        assert_eq!(moved.text.location, Coordinate::new(2.0, 3.0));
    }
}
