mod components;
mod config;
mod dom;
mod engine;
mod error;
mod life;
mod model;
mod render;
mod state;
#[cfg(test)]
mod testing;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
