use std::fmt;
use std::str::FromStr;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod wire;

pub use wire::{decode_binary, decode_text, encode_binary, encode_text, WireError};

pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 60.0;
const FALLBACK_STROKE_WIDTH: f32 = 5.0;

#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamps into `[0, width - 1] x [0, height - 1]`. Non-finite coordinates land on 0.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        Self {
            x: clamp_axis(self.x, width),
            y: clamp_axis(self.y, height),
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn clamp_axis(value: f32, extent: u32) -> f32 {
    let max = extent.saturating_sub(1) as f32;
    if !value.is_finite() {
        return 0.0;
    }
    value.max(0.0).min(max)
}

pub fn sanitize_width(width: f32) -> f32 {
    let width = if width.is_finite() {
        width
    } else {
        FALLBACK_STROKE_WIDTH
    };
    width.max(MIN_STROKE_WIDTH).min(MAX_STROKE_WIDTH)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0:?}")]
    BadDigit(String),
}

/// Opaque RGB color. Travels as a `#rrggbb` string in JSON frames.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const INK: Color = Color::rgb(0x21, 0x21, 0x21);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(value.to_string()))?;
        if !digits.is_ascii() {
            return Err(ColorError::BadDigit(value.to_string()));
        }
        let channel = |text: &str| {
            u8::from_str_radix(text, 16).map_err(|_| ColorError::BadDigit(value.to_string()))
        };
        match digits.len() {
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ColorError::BadLength(value.to_string())),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

/// The active drawing mode. Shapes share the enum with the plain tools so that a shape and
/// pencil/eraser/text can never be selected together.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pencil,
    Eraser,
    Text,
    Line,
    Rectangle,
    Circle,
    Triangle,
}

impl Tool {
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Triangle => Some(ShapeKind::Triangle),
            Tool::Pencil | Tool::Eraser | Tool::Text => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Text => "text",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Triangle => "triangle",
        }
    }
}

impl From<ShapeKind> for Tool {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Line => Tool::Line,
            ShapeKind::Rectangle => Tool::Rectangle,
            ShapeKind::Circle => Tool::Circle,
            ShapeKind::Triangle => Tool::Triangle,
        }
    }
}

impl FromStr for Tool {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pencil" => Ok(Tool::Pencil),
            "eraser" => Ok(Tool::Eraser),
            "text" => Ok(Tool::Text),
            other => other.parse::<ShapeKind>().map(Tool::from),
        }
    }
}

/// A drawing action broadcast to peers. Carries no client or operation identity.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum DrawEvent {
    #[serde(rename = "beginPath")]
    BeginPath {
        x: f32,
        y: f32,
        #[serde(rename = "startPos")]
        start_pos: Point,
    },
    /// `shape` names the active shape kind, or is null for freehand strokes. Kept as a
    /// string so peers can ignore kinds they do not know.
    #[serde(rename = "drawLine")]
    DrawLine {
        x: f32,
        y: f32,
        shape: Option<String>,
    },
    #[serde(rename = "changeConfig")]
    ChangeConfig { color: Color, width: f32, tool: Tool },
}

impl DrawEvent {
    pub fn begin_path(point: Point) -> Self {
        DrawEvent::BeginPath {
            x: point.x,
            y: point.y,
            start_pos: point,
        }
    }

    pub fn draw_line(point: Point, shape: Option<ShapeKind>) -> Self {
        DrawEvent::DrawLine {
            x: point.x,
            y: point.y,
            shape: shape.map(|kind| kind.as_str().to_string()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DrawEvent::BeginPath { .. } => "beginPath",
            DrawEvent::DrawLine { .. } => "drawLine",
            DrawEvent::ChangeConfig { .. } => "changeConfig",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parses_long_and_short_hex() {
        assert_eq!(Color::from_hex("#212121"), Ok(Color::INK));
        assert_eq!(Color::from_hex("#fff"), Ok(Color::WHITE));
        assert_eq!(Color::from_hex(" #FF0000 "), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::INK.to_hex(), "#212121");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(matches!(
            Color::from_hex("212121"),
            Err(ColorError::MissingHash(_))
        ));
        assert!(matches!(
            Color::from_hex("#12345"),
            Err(ColorError::BadLength(_))
        ));
        assert!(matches!(
            Color::from_hex("#zzzzzz"),
            Err(ColorError::BadDigit(_))
        ));
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let point = Point::new(-4.0, 900.0).clamp_to(100, 50);
        assert_eq!(point, Point::new(0.0, 49.0));
        let point = Point::new(f32::NAN, f32::INFINITY).clamp_to(100, 50);
        assert_eq!(point, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_sanitize_width() {
        assert_eq!(sanitize_width(10.0), 10.0);
        assert_eq!(sanitize_width(0.0), MIN_STROKE_WIDTH);
        assert_eq!(sanitize_width(500.0), MAX_STROKE_WIDTH);
        assert_eq!(sanitize_width(f32::NAN), 5.0);
    }

    #[test]
    fn test_tool_shape_exclusivity() {
        assert_eq!(Tool::Rectangle.shape(), Some(ShapeKind::Rectangle));
        assert_eq!(Tool::Pencil.shape(), None);
        assert_eq!(Tool::from(ShapeKind::Triangle), Tool::Triangle);
        assert_eq!("circle".parse::<Tool>(), Ok(Tool::Circle));
        assert_eq!("hexagon".parse::<ShapeKind>(), Err(()));
        for tool in [Tool::Pencil, Tool::Eraser, Tool::Text, Tool::Line] {
            assert_eq!(tool.as_str().parse::<Tool>(), Ok(tool));
        }
    }

    #[test]
    fn test_begin_path_json_shape() {
        let event = DrawEvent::begin_path(Point::new(10.0, 12.0));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "beginPath",
                "x": 10.0,
                "y": 12.0,
                "startPos": { "x": 10.0, "y": 12.0 }
            })
        );
    }

    #[test]
    fn test_draw_line_json_shape() {
        let freehand = DrawEvent::draw_line(Point::new(1.0, 2.0), None);
        let value = serde_json::to_value(&freehand).unwrap();
        assert_eq!(value["shape"], serde_json::Value::Null);

        let shaped = DrawEvent::draw_line(Point::new(1.0, 2.0), Some(ShapeKind::Circle));
        let value = serde_json::to_value(&shaped).unwrap();
        assert_eq!(value["type"], "drawLine");
        assert_eq!(value["shape"], "circle");
    }

    #[test]
    fn test_change_config_uses_hex_color() {
        let event = DrawEvent::ChangeConfig {
            color: Color::rgb(0x12, 0xab, 0xef),
            width: 15.0,
            tool: Tool::Eraser,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["color"], "#12abef");
        assert_eq!(value["tool"], "eraser");
        assert_eq!(event.name(), "changeConfig");
    }
}
