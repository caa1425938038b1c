use web_sys::{Event, HtmlSelectElement};
use yew::prelude::*;

const ROTATE_STEPS: [f64; 4] = [5.0, 15.0, 45.0, 90.0];

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub rotate_step_deg: f64,
    pub show_outlines: bool,
    pub rotate_active: Callback<f64>,
    pub set_rotate_step: Callback<f64>,
    pub toggle_outlines: Callback<()>,
}

#[function_component(ControlsPanel)]
pub fn controls_panel(props: &ControlsPanelProps) -> Html {
    let step = props.rotate_step_deg;
    let rotate_ccw = {
        let cb = props.rotate_active.clone();
        Callback::from(move |_: yew::events::MouseEvent| cb.emit(-step))
    };
    let rotate_cw = {
        let cb = props.rotate_active.clone();
        Callback::from(move |_: yew::events::MouseEvent| cb.emit(step))
    };
    let on_step_change = {
        let cb = props.set_rotate_step.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(value) = select.value().parse::<f64>() {
                cb.emit(value);
            }
        })
    };
    let toggle = {
        let cb = props.toggle_outlines.clone();
        Callback::from(move |_: yew::events::MouseEvent| cb.emit(()))
    };

    html! {
        <div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
            <button onclick={rotate_ccw}>{ format!("⟲ {step}°") }</button>
            <button onclick={rotate_cw}>{ format!("⟳ {step}°") }</button>
            <select onchange={on_step_change}>
                { for ROTATE_STEPS.iter().map(|s| html! {
                    <option value={s.to_string()} selected={*s == step}>
                        { format!("{s}°") }
                    </option>
                }) }
            </select>
            <span style="width:8px;"></span>
            <button onclick={toggle}>
                { if props.show_outlines { "Hide Outlines" } else { "Show Outlines" } }
            </button>
        </div>
    }
}
