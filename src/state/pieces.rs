//! Cached index of the piece elements in the scene.
//!
//! Membership is defined by the structural selector: group nodes whose
//! transform begins with a translation. The cache is refreshed at each new
//! primary contact start rather than tracking DOM mutations.

use wasm_bindgen::JsCast;
use web_sys::Element;

pub const PIECE_SELECTOR: &str = r#"g[transform^="translate"]"#;

#[derive(Debug, Default)]
pub struct PieceIndex {
    pieces: Vec<Element>,
}

impl PieceIndex {
    pub fn refresh(&mut self, scene: &Element) {
        self.pieces.clear();
        let Ok(list) = scene.query_selector_all(PIECE_SELECTOR) else {
            return;
        };
        for i in 0..list.length() {
            if let Some(node) = list.item(i) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    self.pieces.push(el);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.pieces.get(index)
    }

    /// Walks from `el` up its ancestor chain and returns the nearest cached
    /// piece, so a hit on a piece's inner path resolves to the piece group.
    pub fn find_containing(&self, el: &Element) -> Option<(usize, Element)> {
        let mut current = Some(el.clone());
        while let Some(node) = current {
            if let Some(index) = self.pieces.iter().position(|piece| *piece == node) {
                return Some((index, node));
            }
            current = node.parent_element();
        }
        None
    }
}
