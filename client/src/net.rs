use sketchboard_shared::{DrawEvent, Point};

use crate::state::Effect;

/// Fire-and-forget outbound channel to peers. Implementations swallow failures.
pub trait Transport {
    fn emit(&self, event: &DrawEvent);
}

/// Carries out `effects`. Without a transport the emits are dropped and drawing stays
/// local. Returns the anchor of a requested text input, if any.
pub fn dispatch(transport: Option<&dyn Transport>, effects: Vec<Effect>) -> Option<Point> {
    let mut text_request = None;
    for effect in effects {
        match effect {
            Effect::Emit(event) => {
                if let Some(transport) = transport {
                    transport.emit(&event);
                }
            }
            Effect::RequestText { anchor } => text_request = Some(anchor),
        }
    }
    text_request
}

#[cfg(target_arch = "wasm32")]
pub fn websocket_url(window: &web_sys::Window) -> Result<String, wasm_bindgen::JsValue> {
    let location = window.location();
    let protocol = location.protocol()?;
    let host = location.host()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Ok(format!("{scheme}://{host}/ws"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<DrawEvent>>,
    }

    impl Transport for Recorder {
        fn emit(&self, event: &DrawEvent) {
            self.sent.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_dispatch_emits_in_order() {
        let recorder = Recorder::default();
        let first = DrawEvent::begin_path(Point::new(1.0, 1.0));
        let second = DrawEvent::draw_line(Point::new(2.0, 2.0), None);
        let anchor = dispatch(
            Some(&recorder),
            vec![Effect::Emit(first.clone()), Effect::Emit(second.clone())],
        );
        assert_eq!(anchor, None);
        assert_eq!(*recorder.sent.borrow(), vec![first, second]);
    }

    #[test]
    fn test_dispatch_without_transport() {
        let anchor = dispatch(
            None,
            vec![
                Effect::RequestText {
                    anchor: Point::new(3.0, 4.0),
                },
                Effect::Emit(DrawEvent::begin_path(Point::new(3.0, 4.0))),
            ],
        );
        assert_eq!(anchor, Some(Point::new(3.0, 4.0)));
    }
}
