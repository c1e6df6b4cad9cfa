use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Blob, Document, Element, Event, HtmlAnchorElement, HtmlButtonElement, HtmlCanvasElement,
    PointerEvent, Url,
};

use sketchboard_shared::{Color, Point, Tool};

use crate::export::EXPORT_FILE_NAME;
use crate::state::ToolState;

pub enum ToolbarAction {
    Tool(Tool),
    Color(Color),
    Width(u32),
    Undo,
    Redo,
    Download,
}

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Maps a pointer position to surface pixels, accounting for CSS scaling of the canvas.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    let scale_x = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let scale_y = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    Point {
        x: ((event.client_x() as f64 - rect.left()) * scale_x) as f32,
        y: ((event.client_y() as f64 - rect.top()) * scale_y) as f32,
    }
}

/// Walks up from the click target to the first element with a toolbar data attribute.
pub fn toolbar_action_from_event(event: &Event) -> Option<ToolbarAction> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(tool) = element.get_attribute("data-tool") {
            return tool.parse::<Tool>().ok().map(ToolbarAction::Tool);
        }
        if let Some(color) = element.get_attribute("data-color") {
            return match Color::from_hex(&color) {
                Ok(color) => Some(ToolbarAction::Color(color)),
                Err(error) => {
                    log::warn!("bad swatch: {error}");
                    None
                }
            };
        }
        if let Some(width) = element.get_attribute("data-width") {
            return width.parse::<u32>().ok().map(ToolbarAction::Width);
        }
        if let Some(action) = element.get_attribute("data-action") {
            return match action.as_str() {
                "undo" => Some(ToolbarAction::Undo),
                "redo" => Some(ToolbarAction::Redo),
                "download" => Some(ToolbarAction::Download),
                _ => None,
            };
        }
        current = element.parent_element();
    }
    None
}

/// Marks the active tool, color and width buttons with `aria-pressed`.
pub fn sync_toolbar(toolbar: &Element, tools: &ToolState) {
    let Ok(buttons) = toolbar.query_selector_all("[data-tool],[data-color],[data-width]") else {
        return;
    };
    for index in 0..buttons.length() {
        let Some(element) = buttons
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let active = if let Some(tool) = element.get_attribute("data-tool") {
            tool == tools.tool.as_str()
        } else if let Some(color) = element.get_attribute("data-color") {
            Color::from_hex(&color).ok() == Some(tools.color)
        } else {
            element.get_attribute("data-width") == Some(tools.width.to_string())
        };
        let _ = element.set_attribute("aria-pressed", if active { "true" } else { "false" });
    }
}

/// Disabled state is only a hint; undo and redo are safe to call at any time.
pub fn set_history_buttons(
    undo: &HtmlButtonElement,
    redo: &HtmlButtonElement,
    can_undo: bool,
    can_redo: bool,
) {
    undo.set_disabled(!can_undo);
    redo.set_disabled(!can_redo);
}

pub fn download_png(document: &Document, bytes: &[u8]) -> Result<(), JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let blob = Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&array))?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(EXPORT_FILE_NAME);
    anchor.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}
