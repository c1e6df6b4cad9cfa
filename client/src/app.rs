use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlButtonElement, HtmlCanvasElement, PointerEvent, Window};

use sketchboard_shared::Point;

use crate::actions::{
    announce_config, begin_operation, cancel_text, commit_text, end_operation, extend_operation,
    redo, set_color, set_stroke_width, set_tool, undo,
};
use crate::canvas::CanvasSurface;
use crate::dom::{
    download_png, event_to_point, get_element, set_history_buttons, sync_toolbar,
    toolbar_action_from_event, ToolbarAction,
};
use crate::export::export_png;
use crate::net::{dispatch, Transport};
use crate::remote::receive_remote;
use crate::state::{Effect, EngineConfig, State};
use crate::ws::{connect_ws, WsEvent, WsSender};

type SharedState = Rc<RefCell<State<CanvasSurface>>>;
type SenderSlot = Rc<OnceCell<Rc<WsSender>>>;

const TEXT_PROMPT: &str = "Text";

struct Controls {
    toolbar: Element,
    undo: HtmlButtonElement,
    redo: HtmlButtonElement,
}

impl Controls {
    fn refresh(&self, state: &State<CanvasSurface>) {
        sync_toolbar(&self.toolbar, &state.tools);
        set_history_buttons(&self.undo, &self.redo, state.can_undo(), state.can_redo());
    }
}

fn transport(slot: &SenderSlot) -> Option<&dyn Transport> {
    slot.get().map(|sender| &**sender as &dyn Transport)
}

/// Runs `effects` and, when a text placement was requested, asks the user for the text.
fn apply_effects(
    window: &Window,
    state: &SharedState,
    slot: &SenderSlot,
    effects: Vec<Effect>,
) {
    let Some(anchor) = dispatch(transport(slot), effects) else {
        return;
    };
    prompt_text(window, state, anchor);
}

fn prompt_text(window: &Window, state: &SharedState, anchor: Point) {
    let answer = match window.prompt_with_message(TEXT_PROMPT) {
        Ok(answer) => answer,
        Err(error) => {
            log::warn!("text prompt failed: {error:?}");
            None
        }
    };
    let mut state = state.borrow_mut();
    match answer {
        Some(content) => {
            commit_text(&mut *state, &content, anchor);
        }
        None => cancel_text(&mut *state),
    }
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let width = window.inner_width()?.as_f64().unwrap_or(800.0).max(1.0) as u32;
    let height = window.inner_height()?.as_f64().unwrap_or(600.0).max(1.0) as u32;
    let config = EngineConfig::default();
    let surface = CanvasSurface::new(canvas.clone(), width, height, config.background)?;
    let state: SharedState = Rc::new(RefCell::new(State::new(surface, config)));
    log::info!("board ready at {width}x{height}");

    let controls = Rc::new(Controls {
        toolbar: get_element(&document, "toolbar")?,
        undo: get_element(&document, "undo")?,
        redo: get_element(&document, "redo")?,
    });
    controls.refresh(&state.borrow());

    let slot: SenderSlot = Rc::new(OnceCell::new());
    {
        let ws_state = state.clone();
        let ws_slot = slot.clone();
        let connected = connect_ws(&window, move |event| match event {
            WsEvent::Open => {
                log::info!("connected");
                let effects = announce_config(&*ws_state.borrow());
                dispatch(transport(&ws_slot), effects);
            }
            WsEvent::Close => log::warn!("disconnected; drawing stays local"),
            WsEvent::Error => log::warn!("websocket error"),
            WsEvent::Message(message) => {
                receive_remote(&mut *ws_state.borrow_mut(), message);
            }
        });
        match connected {
            Ok(sender) => {
                let _ = slot.set(sender);
            }
            Err(error) => log::warn!("websocket unavailable: {error:?}"),
        }
    }

    {
        let down_state = state.clone();
        let down_slot = slot.clone();
        let down_canvas = canvas.clone();
        let down_window = window.clone();
        let down_controls = controls.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let point = event_to_point(&down_canvas, &event);
            let effects = begin_operation(&mut *down_state.borrow_mut(), point);
            apply_effects(&down_window, &down_state, &down_slot, effects);
            down_controls.refresh(&down_state.borrow());
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_slot = slot.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if !state.is_drawing() {
                return;
            }
            let point = event_to_point(&move_canvas, &event);
            let effects = extend_operation(&mut *state, point);
            drop(state);
            dispatch(transport(&move_slot), effects);
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    for name in ["pointerup", "pointerleave"] {
        let up_state = state.clone();
        let up_slot = slot.clone();
        let up_canvas = canvas.clone();
        let up_controls = controls.clone();
        let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let point = event_to_point(&up_canvas, &event);
            let effects = end_operation(&mut *up_state.borrow_mut(), point);
            dispatch(transport(&up_slot), effects);
            up_controls.refresh(&up_state.borrow());
        });
        canvas.add_event_listener_with_callback(name, onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    {
        let click_state = state.clone();
        let click_slot = slot.clone();
        let click_document = document.clone();
        let click_controls = controls.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(action) = toolbar_action_from_event(&event) else {
                return;
            };
            let effects = {
                let mut state = click_state.borrow_mut();
                match action {
                    ToolbarAction::Tool(tool) => set_tool(&mut *state, tool),
                    ToolbarAction::Color(color) => set_color(&mut *state, color),
                    ToolbarAction::Width(width) => set_stroke_width(&mut *state, width),
                    ToolbarAction::Undo => {
                        undo(&mut *state);
                        Vec::new()
                    }
                    ToolbarAction::Redo => {
                        redo(&mut *state);
                        Vec::new()
                    }
                    ToolbarAction::Download => {
                        match export_png(&state.surface) {
                            Ok(bytes) => {
                                if let Err(error) = download_png(&click_document, &bytes) {
                                    log::error!("download failed: {error:?}");
                                }
                            }
                            Err(error) => log::error!("{error}"),
                        }
                        Vec::new()
                    }
                }
            };
            dispatch(transport(&click_slot), effects);
            click_controls.refresh(&click_state.borrow());
        });
        controls
            .toolbar
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}
