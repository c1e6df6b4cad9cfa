use thiserror::Error;

use crate::DrawEvent;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid binary frame: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("failed to encode binary frame: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("binary frame has {0} trailing bytes")]
    TrailingBytes(usize),
}

pub fn encode_text(event: &DrawEvent) -> Result<String, WireError> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_text(text: &str) -> Result<DrawEvent, WireError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode_binary(event: &DrawEvent) -> Result<Vec<u8>, WireError> {
    Ok(bincode::encode_to_vec(event, bincode::config::standard())?)
}

pub fn decode_binary(payload: &[u8]) -> Result<DrawEvent, WireError> {
    let (event, read) = bincode::decode_from_slice(payload, bincode::config::standard())?;
    if read != payload.len() {
        return Err(WireError::TrailingBytes(payload.len() - read));
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Point, ShapeKind, Tool};

    #[test]
    fn test_decode_peer_json() {
        let text = r##"{"type":"drawLine","x":4,"y":5.5,"shape":null}"##;
        let event = decode_text(text).unwrap();
        assert_eq!(event, DrawEvent::draw_line(Point::new(4.0, 5.5), None));

        let text = r##"{"type":"changeConfig","color":"#ff0000","width":10,"tool":"pencil"}"##;
        let event = decode_text(text).unwrap();
        assert_eq!(
            event,
            DrawEvent::ChangeConfig {
                color: Color::rgb(255, 0, 0),
                width: 10.0,
                tool: Tool::Pencil,
            }
        );
    }

    #[test]
    fn test_unknown_shape_still_decodes() {
        let text = r##"{"type":"drawLine","x":1,"y":1,"shape":"hexagon"}"##;
        let event = decode_text(text).unwrap();
        assert!(matches!(event, DrawEvent::DrawLine { shape: Some(ref s), .. } if s == "hexagon"));
    }

    #[test]
    fn test_rejects_bad_frames() {
        assert!(matches!(decode_text("{}"), Err(WireError::Json(_))));
        assert!(decode_text(r##"{"type":"changeConfig","color":"red","width":1,"tool":"pencil"}"##).is_err());
        assert!(decode_binary(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_binary_frame_round_trip() {
        let event = DrawEvent::draw_line(Point::new(3.0, 9.0), Some(ShapeKind::Triangle));
        let mut payload = encode_binary(&event).unwrap();
        assert_eq!(decode_binary(&payload).unwrap(), event);
        payload.push(0);
        assert!(matches!(
            decode_binary(&payload),
            Err(WireError::TrailingBytes(1))
        ));
    }
}
