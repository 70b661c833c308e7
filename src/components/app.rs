use super::grid_view::GridView;
use crate::dom::load_config;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // Read once; a stored override only takes effect on the next page load.
    let config = use_memo((), |_| load_config());
    html! {
        <div style="position:fixed; inset:0; background:#f6f8fa; color:#c9d1d9; font-family:sans-serif; overflow:hidden;">
            <GridView config={(*config).clone()} />
        </div>
    }
}
