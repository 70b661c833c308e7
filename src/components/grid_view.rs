use super::{camera_controls::CameraControls, controls_panel::ControlsPanel, status_panel::StatusPanel};
use crate::config::EngineConfig;
use crate::dom::GridEngine;
use crate::engine::Command;
use crate::render::StatusReadout;
use crate::util::clog;
use web_sys::HtmlElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GridViewProps {
    pub config: EngineConfig,
}

#[function_component(GridView)]
pub fn grid_view(props: &GridViewProps) -> Html {
    let container_ref = use_node_ref();
    let engine = use_mut_ref(|| None::<GridEngine>);
    let status = use_state(StatusReadout::default);

    // Mount once; dropping the handle on unmount releases listeners, the
    // ticker and both canvases.
    {
        let container_ref = container_ref.clone();
        let engine = engine.clone();
        let status = status.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            if let Some(container) = container_ref.cast::<HtmlElement>() {
                let on_status = Callback::from(move |s: StatusReadout| status.set(s));
                let mut grid = GridEngine::new(config, on_status);
                match grid.init(&container) {
                    Ok(()) => *engine.borrow_mut() = Some(grid),
                    Err(e) => clog(&format!("grid mount failed: {}", e)),
                }
            }
            move || {
                engine.borrow_mut().take();
            }
        });
    }

    let command_cb = |command: Command| {
        let engine = engine.clone();
        Callback::from(move |()| {
            if let Some(grid) = &*engine.borrow() {
                grid.command(command.clone());
            }
        })
    };
    let seed_cb: Callback<()> = {
        let engine = engine.clone();
        Callback::from(move |()| {
            if let Some(grid) = &*engine.borrow() {
                grid.seed();
            }
        })
    };
    let pitch = props.config.cell_pitch;

    html! {
        <div style="position:absolute; inset:0;">
            <div ref={container_ref} style="position:absolute; inset:0; overflow:hidden;"></div>
            <StatusPanel status={(*status).clone()} />
            <ControlsPanel
                running={status.running}
                on_toggle_run={command_cb(Command::ToggleRun)}
                on_step={command_cb(Command::Step)}
                on_clear={command_cb(Command::Clear)}
                on_seed={seed_cb}
            />
            <CameraControls
                on_zoom_in={command_cb(Command::ZoomBy(0.1))}
                on_zoom_out={command_cb(Command::ZoomBy(-0.1))}
                on_pan_left={command_cb(Command::PanBy { dx: pitch, dy: 0.0 })}
                on_pan_right={command_cb(Command::PanBy { dx: -pitch, dy: 0.0 })}
                on_pan_up={command_cb(Command::PanBy { dx: 0.0, dy: pitch })}
                on_pan_down={command_cb(Command::PanBy { dx: 0.0, dy: -pitch })}
                on_reset={command_cb(Command::ResetView)}
            />
        </div>
    }
}
