mod components;
mod model;
mod state;
mod transform;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
