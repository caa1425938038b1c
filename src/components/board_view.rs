use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Touch, TouchEvent};
use yew::prelude::*;

use crate::model::{self, PieceSpec};
use crate::state::{ContactPoint, GestureSession, PieceIndex};
use crate::transform;
use crate::util::cwarn;

pub const SCENE_ELEMENT_ID: &str = "puzzle-board";
const ROTATE_GLOBAL_NAME: &str = "__jigsawTouchRotateBy";

#[derive(Properties)]
pub struct BoardViewProps {
    pub pieces: Vec<PieceSpec>,
    pub show_outlines: bool,
    /// Most recently grabbed piece, shared with the controls panel so its
    /// rotate buttons have a target.
    pub active_piece: Rc<RefCell<Option<Element>>>,
}

impl PartialEq for BoardViewProps {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.show_outlines == other.show_outlines
            && Rc::ptr_eq(&self.active_piece, &other.active_piece)
    }
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let session = use_mut_ref(GestureSession::default);
    let piece_index = use_mut_ref(PieceIndex::default);

    // Mount effect: resolve the scene root and wire the touch lifecycle.
    {
        let session = session.clone();
        let piece_index = piece_index.clone();
        let active_piece = props.active_piece.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let document = window.document().expect("document");

            let cleanup: Box<dyn FnOnce()> = match find_scene_root(&document) {
                Some(scene) => {
                    // Window-global rotation hook for non-gesture callers.
                    let rotate_global = Closure::wrap(Box::new(|el: Element, degrees: f64| {
                        transform::rotate_piece_by(&el, degrees);
                    })
                        as Box<dyn Fn(Element, f64)>);
                    let _ = js_sys::Reflect::set(
                        window.as_ref(),
                        &JsValue::from_str(ROTATE_GLOBAL_NAME),
                        rotate_global.as_ref(),
                    );

                    let touchstart_cb = {
                        let session = session.clone();
                        let piece_index = piece_index.clone();
                        let active_piece = active_piece.clone();
                        let document = document.clone();
                        let scene = scene.clone();
                        Closure::wrap(Box::new(move |e: TouchEvent| {
                            let mut session = session.borrow_mut();
                            let changed = e.changed_touches();
                            let mut claimed = false;
                            for i in 0..changed.length() {
                                let Some(touch) = changed.item(i) else {
                                    continue;
                                };
                                if !session.dragging() {
                                    let mut index = piece_index.borrow_mut();
                                    index.refresh(&scene);
                                    if index.is_empty() {
                                        continue;
                                    }
                                    let Some(hit) = document.element_from_point(
                                        touch.client_x() as f32,
                                        touch.client_y() as f32,
                                    ) else {
                                        continue;
                                    };
                                    let Some((idx, piece_el)) = index.find_containing(&hit)
                                    else {
                                        continue;
                                    };
                                    let origin = transform::read_transform(&piece_el);
                                    if session.begin_drag(contact_point(&touch), idx, origin) {
                                        *active_piece.borrow_mut() = Some(piece_el);
                                        claimed = true;
                                    }
                                } else if !session.rotating()
                                    && session.begin_rotation(contact_point(&touch))
                                {
                                    claimed = true;
                                }
                            }
                            if claimed {
                                e.prevent_default();
                            }
                        })
                            as Box<dyn FnMut(_)>)
                    };
                    scene
                        .add_event_listener_with_callback(
                            "touchstart",
                            touchstart_cb.as_ref().unchecked_ref(),
                        )
                        .ok();

                    let touchmove_cb = {
                        let session = session.clone();
                        let piece_index = piece_index.clone();
                        Closure::wrap(Box::new(move |e: TouchEvent| {
                            let mut session = session.borrow_mut();
                            if !session.has_contacts() {
                                return;
                            }
                            e.prevent_default();
                            let changed = e.changed_touches();
                            for i in 0..changed.length() {
                                let Some(touch) = changed.item(i) else {
                                    continue;
                                };
                                if let Some(write) = session.contact_move(contact_point(&touch)) {
                                    if let Some(el) = piece_index.borrow().get(write.piece) {
                                        transform::write_transform(el, &write.transform);
                                    }
                                }
                            }
                        }) as Box<dyn FnMut(_)>)
                    };
                    scene
                        .add_event_listener_with_callback(
                            "touchmove",
                            touchmove_cb.as_ref().unchecked_ref(),
                        )
                        .ok();

                    // End and cancel share one handler.
                    let touchend_cb = {
                        let session = session.clone();
                        Closure::wrap(Box::new(move |e: TouchEvent| {
                            let mut session = session.borrow_mut();
                            let changed = e.changed_touches();
                            let mut released = false;
                            for i in 0..changed.length() {
                                if let Some(touch) = changed.item(i) {
                                    if session.contact_end(touch.identifier()).is_some() {
                                        released = true;
                                    }
                                }
                            }
                            if released {
                                e.prevent_default();
                            }
                        }) as Box<dyn FnMut(_)>)
                    };
                    scene
                        .add_event_listener_with_callback(
                            "touchend",
                            touchend_cb.as_ref().unchecked_ref(),
                        )
                        .ok();
                    scene
                        .add_event_listener_with_callback(
                            "touchcancel",
                            touchend_cb.as_ref().unchecked_ref(),
                        )
                        .ok();

                    let window_cleanup = window.clone();
                    Box::new(move || {
                        let _ = scene.remove_event_listener_with_callback(
                            "touchstart",
                            touchstart_cb.as_ref().unchecked_ref(),
                        );
                        let _ = scene.remove_event_listener_with_callback(
                            "touchmove",
                            touchmove_cb.as_ref().unchecked_ref(),
                        );
                        let _ = scene.remove_event_listener_with_callback(
                            "touchend",
                            touchend_cb.as_ref().unchecked_ref(),
                        );
                        let _ = scene.remove_event_listener_with_callback(
                            "touchcancel",
                            touchend_cb.as_ref().unchecked_ref(),
                        );
                        let _ = js_sys::Reflect::delete_property(
                            window_cleanup.unchecked_ref::<js_sys::Object>(),
                            &JsValue::from_str(ROTATE_GLOBAL_NAME),
                        );
                        drop(rotate_global);
                    })
                }
                None => {
                    cwarn("no scene root found (svg or #puzzle-board); touch gestures disabled");
                    Box::new(|| ())
                }
            };
            move || cleanup()
        });
    }

    let viewbox = format!("0 0 {} {}", model::BOARD_WIDTH, model::BOARD_HEIGHT);
    html! {
        <svg
            id={SCENE_ELEMENT_ID}
            viewBox={viewbox}
            width="100%"
            height="100%"
            style="display:block; background:#0e1116;"
        >
            { for props.pieces.iter().map(|p| render_piece(p, props.show_outlines)) }
        </svg>
    }
}

fn render_piece(piece: &PieceSpec, show_outlines: bool) -> Html {
    let stroke = if show_outlines { "#e6edf3" } else { "#0a0d12" };
    html! {
        <g
            key={piece.id}
            class="piece"
            data-piece={format!("{}-{}", piece.col, piece.row)}
            transform={piece.initial_transform()}
        >
            <path
                d={model::piece_outline(model::PIECE_SIZE)}
                fill={piece.fill}
                stroke={stroke}
                stroke-width="1.5"
            />
        </g>
    }
}

fn contact_point(touch: &Touch) -> ContactPoint {
    ContactPoint {
        id: touch.identifier(),
        x: touch.client_x() as f64,
        y: touch.client_y() as f64,
    }
}

/// First SVG element in the document, else the board by id.
fn find_scene_root(document: &Document) -> Option<Element> {
    document
        .query_selector("svg")
        .ok()
        .flatten()
        .or_else(|| document.get_element_by_id(SCENE_ELEMENT_ID))
}
