use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Element;
use yew::prelude::*;

use super::{board_view::BoardView, controls_panel::ControlsPanel};
use crate::model::{self, BoardSettings};
use crate::transform;
use crate::util::clog;

const SETTINGS_KEY: &str = "jt_board_settings";

#[function_component(App)]
pub fn app() -> Html {
    let settings = use_state(load_settings);
    let active_piece = use_mut_ref(|| None::<Element>);
    let pieces = use_memo((), |_| {
        model::board_pieces(model::BOARD_COLS, model::BOARD_ROWS)
    });

    {
        let count = pieces.len();
        use_effect_with((), move |_| {
            clog(&format!("board ready: {count} pieces"));
            || ()
        });
    }

    // Persist settings on change
    {
        let settings = settings.clone();
        use_effect_with((*settings).clone(), move |s| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(store)) = win.local_storage() {
                    if let Ok(raw) = serde_json::to_string(s) {
                        let _ = store.set_item(SETTINGS_KEY, &raw);
                    }
                }
            }
            || ()
        });
    }

    let rotate_active = {
        let active_piece = active_piece.clone();
        Callback::from(move |degrees: f64| {
            let piece = active_piece.borrow();
            if let Some(el) = piece.as_ref() {
                transform::rotate_piece_by(el, degrees);
            }
        })
    };
    let set_rotate_step = {
        let settings = settings.clone();
        Callback::from(move |step: f64| {
            let mut next = (*settings).clone();
            next.rotate_step_deg = step;
            settings.set(next);
        })
    };
    let toggle_outlines = {
        let settings = settings.clone();
        Callback::from(move |_: ()| {
            let mut next = (*settings).clone();
            next.show_outlines = !next.show_outlines;
            settings.set(next);
        })
    };

    html! {
        <div id="root" style="position:relative; width:100vw; height:100vh;">
            <BoardView
                pieces={(*pieces).clone()}
                show_outlines={settings.show_outlines}
                active_piece={active_piece.clone()}
            />
            <ControlsPanel
                rotate_step_deg={settings.rotate_step_deg}
                show_outlines={settings.show_outlines}
                rotate_active={rotate_active}
                set_rotate_step={set_rotate_step}
                toggle_outlines={toggle_outlines}
            />
        </div>
    }
}

fn load_settings() -> BoardSettings {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(raw)) = store.get_item(SETTINGS_KEY) {
                if let Ok(settings) = serde_json::from_str(&raw) {
                    return settings;
                }
            }
        }
    }
    BoardSettings::default()
}
