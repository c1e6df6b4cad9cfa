use sketchboard_shared::{Color, DrawEvent, Point, ShapeKind, Tool};

use crate::geometry::shape_outline;
use crate::render::Surface;
use crate::state::{snap_stroke_width, DrawMode, Effect, State};

pub fn begin_operation<S: Surface>(state: &mut State<S>, point: Point) -> Vec<Effect> {
    let point = state.clamp(point);
    let mut effects = Vec::new();
    match state.mode {
        DrawMode::Idle => {}
        // A new placement replaces one that never got its text.
        DrawMode::Text { .. } => cancel_text(state),
        // Pointer-down without a pointer-up in between.
        DrawMode::Stroke { .. } | DrawMode::Shape { .. } => {
            effects.extend(end_operation(state, point));
        }
    }

    let pen = state.tools.pen(&state.config);
    state.mode = if let Some(kind) = state.tools.shape() {
        DrawMode::Shape {
            kind,
            anchor: point,
            saved: state.surface.snapshot(),
            pen,
        }
    } else if state.tools.tool == Tool::Text {
        effects.push(Effect::RequestText { anchor: point });
        DrawMode::Text { anchor: point }
    } else {
        DrawMode::Stroke { last: point, pen }
    };
    effects.push(Effect::Emit(DrawEvent::begin_path(point)));
    effects
}

pub fn extend_operation<S: Surface>(state: &mut State<S>, point: Point) -> Vec<Effect> {
    let point = state.clamp(point);
    let shape = match &mut state.mode {
        DrawMode::Idle | DrawMode::Text { .. } => return Vec::new(),
        DrawMode::Stroke { last, pen } => {
            state.surface.stroke_segment(*last, point, pen);
            *last = point;
            None
        }
        DrawMode::Shape {
            kind,
            anchor,
            saved,
            pen,
        } => {
            state.surface.restore(saved);
            let outline = shape_outline(*kind, *anchor, point);
            state.surface.stroke_outline(&outline, pen);
            Some(*kind)
        }
    };
    vec![Effect::Emit(DrawEvent::draw_line(point, shape))]
}

/// Finishes a stroke or shape and records a snapshot. A pending text placement stays
/// open until `commit_text` or `cancel_text`.
pub fn end_operation<S: Surface>(state: &mut State<S>, point: Point) -> Vec<Effect> {
    let mode = std::mem::replace(&mut state.mode, DrawMode::Idle);
    match mode {
        DrawMode::Idle => {}
        DrawMode::Text { anchor } => {
            state.mode = DrawMode::Text { anchor };
        }
        DrawMode::Stroke { .. } | DrawMode::Shape { .. } => {
            log::debug!("operation ended at ({}, {})", point.x, point.y);
            capture_snapshot(state);
        }
    }
    Vec::new()
}

/// Renders text and records a snapshot. Text is not broadcast. Returns whether anything
/// was committed.
pub fn commit_text<S: Surface>(state: &mut State<S>, content: &str, anchor: Point) -> bool {
    if matches!(state.mode, DrawMode::Text { .. }) {
        state.mode = DrawMode::Idle;
    }
    if content.trim().is_empty() {
        return false;
    }
    let anchor = state.clamp(anchor);
    state
        .surface
        .fill_text(anchor, content, state.tools.color, state.config.text_size);
    capture_snapshot(state);
    true
}

pub fn cancel_text<S: Surface>(state: &mut State<S>) {
    if matches!(state.mode, DrawMode::Text { .. }) {
        state.mode = DrawMode::Idle;
    }
}

fn capture_snapshot<S: Surface>(state: &mut State<S>) {
    let snapshot = state.surface.snapshot();
    state.history.push(snapshot);
    log::debug!(
        "history now {} entries, pointer {}",
        state.history.len(),
        state.history.pointer()
    );
}

pub fn undo<S: Surface>(state: &mut State<S>) -> bool {
    if state.is_drawing() {
        return false;
    }
    match state.history.undo() {
        Some(snapshot) => {
            state.surface.restore(snapshot);
            true
        }
        None => false,
    }
}

pub fn redo<S: Surface>(state: &mut State<S>) -> bool {
    if state.is_drawing() {
        return false;
    }
    match state.history.redo() {
        Some(snapshot) => {
            state.surface.restore(snapshot);
            true
        }
        None => false,
    }
}

pub fn set_tool<S: Surface>(state: &mut State<S>, tool: Tool) -> Vec<Effect> {
    state.tools.tool = tool;
    announce_config(state)
}

pub fn set_shape<S: Surface>(state: &mut State<S>, kind: ShapeKind) -> Vec<Effect> {
    set_tool(state, Tool::from(kind))
}

pub fn set_color<S: Surface>(state: &mut State<S>, color: Color) -> Vec<Effect> {
    state.tools.color = color;
    announce_config(state)
}

/// Snaps to the nearest width in `STROKE_WIDTHS`.
pub fn set_stroke_width<S: Surface>(state: &mut State<S>, width: u32) -> Vec<Effect> {
    state.tools.width = snap_stroke_width(width);
    announce_config(state)
}

/// Tells peers how to render this client's strokes. Also sent once on connect.
pub fn announce_config<S: Surface>(state: &State<S>) -> Vec<Effect> {
    vec![Effect::Emit(state.tools.config_event())]
}
