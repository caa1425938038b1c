//! Transform codec for piece `<g>` elements.
//!
//! A piece's position and rotation live in its `transform` attribute as
//! `translate(tx ty) rotate(angle cx cy)`. Parsing never fails: missing or
//! malformed pieces of the attribute degrade to zero defaults, and a missing
//! rotation center falls back to the element's bounding-box center.

use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::JsCast;
use web_sys::{Element, SvgGraphicsElement};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceTransform {
    pub tx: f64,
    pub ty: f64,
    pub angle: f64,
    pub cx: f64,
    pub cy: f64,
}

/// String-level parse result; the rotation center stays optional until the
/// element-level fallback resolves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedTransform {
    pub tx: f64,
    pub ty: f64,
    pub angle: f64,
    pub center: Option<(f64, f64)>,
}

static TRANSLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"translate\(\s*(-?[\d.]+)(?:[\s,]+(-?[\d.]+))?\s*\)")
        .expect("valid translate regex")
});
static ROTATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rotate\(\s*(-?[\d.]+)(?:[\s,]+(-?[\d.]+)[\s,]+(-?[\d.]+))?\s*\)")
        .expect("valid rotate regex")
});

fn num(capture: Option<regex::Match>) -> f64 {
    capture
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn parse_transform_list(attr: &str) -> ParsedTransform {
    let (tx, ty) = TRANSLATE_RE
        .captures(attr)
        .map(|c| (num(c.get(1)), num(c.get(2))))
        .unwrap_or((0.0, 0.0));
    let (angle, center) = ROTATE_RE
        .captures(attr)
        .map(|c| {
            let center = match (c.get(2), c.get(3)) {
                (Some(x), Some(y)) => x
                    .as_str()
                    .parse::<f64>()
                    .ok()
                    .zip(y.as_str().parse::<f64>().ok()),
                _ => None,
            };
            (num(c.get(1)), center)
        })
        .unwrap_or((0.0, None));
    ParsedTransform {
        tx,
        ty,
        angle,
        center,
    }
}

/// A parsed center counts only when it is finite and not exactly (0, 0);
/// anything else defers to the bounding-box fallback.
fn explicit_center(center: Option<(f64, f64)>) -> Option<(f64, f64)> {
    center.filter(|(cx, cy)| cx.is_finite() && cy.is_finite() && (*cx != 0.0 || *cy != 0.0))
}

fn bbox_center(el: &Element) -> (f64, f64) {
    el.dyn_ref::<SvgGraphicsElement>()
        .and_then(|g| g.get_b_box().ok())
        .map(|b| {
            (
                b.x() as f64 + b.width() as f64 / 2.0,
                b.y() as f64 + b.height() as f64 / 2.0,
            )
        })
        .unwrap_or((0.0, 0.0))
}

pub fn read_transform(el: &Element) -> PieceTransform {
    let attr = el.get_attribute("transform").unwrap_or_default();
    let parsed = parse_transform_list(&attr);
    let (cx, cy) = explicit_center(parsed.center).unwrap_or_else(|| bbox_center(el));
    PieceTransform {
        tx: parsed.tx,
        ty: parsed.ty,
        angle: parsed.angle,
        cx,
        cy,
    }
}

pub fn serialize_transform(tx: f64, ty: f64, rotation: Option<(f64, f64, f64)>) -> String {
    match rotation {
        Some((angle, cx, cy)) => format!("translate({tx} {ty}) rotate({angle} {cx} {cy})"),
        None => format!("translate({tx} {ty})"),
    }
}

pub fn write_transform(el: &Element, t: &PieceTransform) {
    let attr = serialize_transform(t.tx, t.ty, Some((t.angle, t.cx, t.cy)));
    let _ = el.set_attribute("transform", &attr);
}

/// Programmatic rotation by a relative angle, for non-gesture callers such
/// as the controls panel and the `__jigsawTouchRotateBy` window global.
pub fn rotate_piece_by(el: &Element, degrees: f64) {
    let mut t = read_transform(el);
    t.angle += degrees;
    write_transform(el, &t);
}
