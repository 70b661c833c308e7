use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub running: bool,
    pub on_toggle_run: Callback<()>,
    pub on_step: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_seed: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let run_cb = {
        let cb = props.on_toggle_run.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let step_cb = {
        let cb = props.on_step.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear_cb = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let seed_cb = {
        let cb = props.on_seed.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let run_label = if props.running { "Pause (Space)" } else { "Run (Space)" };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:180px; display:flex; flex-direction:column; gap:6px;">
        <button onclick={run_cb}>{ run_label }</button>
        <button onclick={step_cb} disabled={props.running}>{"Step"}</button>
        <button onclick={seed_cb}>{"Random fill"}</button>
        <button onclick={clear_cb}>{"Clear"}</button>
        <div style="font-size:11px; opacity:0.7; line-height:1.4;">
            {"Click: toggle cell"}<br/>
            {"Shift + drag: pan"}<br/>
            {"Wheel: zoom"}
        </div>
    </div>}
}
