use sketchboard_shared::{Color, DrawEvent, Point, ShapeKind, Tool};

use crate::history::{History, HistoryPolicy};
use crate::render::{Pen, Snapshot, Surface};

pub const STROKE_WIDTHS: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_STROKE_WIDTH: u32 = 5;
pub const ERASER_WIDTH: f32 = 10.0;
pub const TEXT_SIZE: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Initial surface color. The eraser paints with it.
    pub background: Color,
    pub eraser_width: f32,
    pub text_size: f32,
    pub history_policy: HistoryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            eraser_width: ERASER_WIDTH,
            text_size: TEXT_SIZE,
            history_policy: HistoryPolicy::AppendOnly,
        }
    }
}

/// Current tool, color and width as picked in the toolbar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub color: Color,
    pub width: u32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: Color::INK,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl ToolState {
    pub fn shape(&self) -> Option<ShapeKind> {
        self.tool.shape()
    }

    /// The eraser ignores the picked color and width and overpaints with the background.
    pub fn pen(&self, config: &EngineConfig) -> Pen {
        pen_for(self.tool, self.color, self.width as f32, config)
    }

    pub fn config_event(&self) -> DrawEvent {
        DrawEvent::ChangeConfig {
            color: self.color,
            width: self.width as f32,
            tool: self.tool,
        }
    }
}

pub fn pen_for(tool: Tool, color: Color, width: f32, config: &EngineConfig) -> Pen {
    match tool {
        Tool::Eraser => Pen {
            color: config.background,
            width: config.eraser_width,
        },
        _ => Pen { color, width },
    }
}

pub fn snap_stroke_width(width: u32) -> u32 {
    STROKE_WIDTHS
        .into_iter()
        .min_by_key(|allowed| allowed.abs_diff(width))
        .unwrap_or(DEFAULT_STROKE_WIDTH)
}

/// The operation between pointer-down and pointer-up.
pub enum DrawMode {
    Idle,
    /// Pencil or eraser path; `last` is where the next segment starts.
    Stroke { last: Point, pen: Pen },
    /// Shape preview, redrawn over `saved` on every move.
    Shape {
        kind: ShapeKind,
        anchor: Point,
        saved: Snapshot,
        pen: Pen,
    },
    /// Waiting for the host to deliver text for `anchor`.
    Text { anchor: Point },
}

/// How peer strokes are rendered. Peers carry no identity, so there is one pen and one
/// open path for all of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemoteState {
    pub pen: Pen,
    pub last: Option<Point>,
}

/// Work the host has to do after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Emit(DrawEvent),
    /// Open a text input; its result goes to `commit_text`.
    RequestText { anchor: Point },
}

pub struct State<S: Surface> {
    pub surface: S,
    pub config: EngineConfig,
    pub tools: ToolState,
    pub mode: DrawMode,
    pub history: History<Snapshot>,
    pub remote: RemoteState,
}

impl<S: Surface> State<S> {
    /// Takes the blank surface; its current pixels become history entry 0.
    pub fn new(surface: S, config: EngineConfig) -> Self {
        let blank = surface.snapshot();
        let tools = ToolState::default();
        Self {
            history: History::new(blank, config.history_policy),
            remote: RemoteState {
                pen: tools.pen(&config),
                last: None,
            },
            surface,
            config,
            tools,
            mode: DrawMode::Idle,
        }
    }

    pub fn clamp(&self, point: Point) -> Point {
        point.clamp_to(self.surface.width(), self.surface.height())
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, DrawMode::Stroke { .. } | DrawMode::Shape { .. })
    }

    pub fn pending_text(&self) -> Option<Point> {
        match self.mode {
            DrawMode::Text { anchor } => Some(anchor),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.is_drawing() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_drawing() && self.history.can_redo()
    }
}
