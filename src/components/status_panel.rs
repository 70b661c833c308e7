use crate::render::StatusReadout;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub status: StatusReadout,
}

#[function_component]
pub fn StatusPanel(props: &StatusPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // label | value
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let s = &props.status;
    let (state_label, state_color) = if s.running {
        ("Running", "#3fb950")
    } else {
        ("Paused", "#8b949e")
    };
    // Keyed on the frame counter so every redraw swaps in a fresh node.
    html! {
        <div key={s.frame.to_string()} style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:200px; display:flex; flex-direction:column; gap:6px; font-size:13px; pointer-events:none;">
            <div style={row_style}>
                <span style={label_style}>{"Offset"}</span>
                <span style={value_style}>{ format!("{:.1}, {:.1}", s.offset_x, s.offset_y) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Scale"}</span>
                <span style={value_style}>{ format!("{:.3}", s.scale) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Generation"}</span>
                <span style={value_style}>{ s.generation }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Population"}</span>
                <span style={value_style}>{ s.population.to_string() }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:{};", label_style, state_color)}>{ state_label }</span>
            </div>
        </div>
    }
}
