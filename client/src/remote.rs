use sketchboard_shared::{sanitize_width, Color, DrawEvent, Point, ShapeKind, Tool};

use crate::render::Surface;
use crate::state::{pen_for, State};

/// Applies a peer's event to the raster. History is never touched.
pub fn receive_remote<S: Surface>(state: &mut State<S>, event: DrawEvent) {
    match event {
        DrawEvent::BeginPath { x, y, .. } => receive_remote_begin(state, Point::new(x, y)),
        DrawEvent::DrawLine { x, y, shape } => {
            receive_remote_draw(state, Point::new(x, y), shape.as_deref())
        }
        DrawEvent::ChangeConfig { color, width, tool } => {
            receive_remote_config(state, color, width, tool)
        }
    }
}

pub fn receive_remote_begin<S: Surface>(state: &mut State<S>, point: Point) {
    state.remote.last = Some(state.clamp(point));
}

/// Only freehand continuation is mirrored. Shape previews from peers are skipped, and
/// so are shape names this client does not know.
pub fn receive_remote_draw<S: Surface>(state: &mut State<S>, point: Point, shape: Option<&str>) {
    if let Some(name) = shape {
        match name.parse::<ShapeKind>() {
            Ok(kind) => log::debug!("skipping remote {} preview", kind.as_str()),
            Err(()) => log::warn!("ignoring remote draw with unknown shape {name:?}"),
        }
        return;
    }
    let point = state.clamp(point);
    match state.remote.last {
        Some(last) => {
            let pen = state.remote.pen;
            state.surface.stroke_segment(last, point, &pen);
        }
        // A path that was never begun starts here, like a bare lineTo.
        None => log::debug!("remote draw without begin, starting path"),
    }
    state.remote.last = Some(point);
}

pub fn receive_remote_config<S: Surface>(
    state: &mut State<S>,
    color: Color,
    width: f32,
    tool: Tool,
) {
    state.remote.pen = pen_for(tool, color, sanitize_width(width), &state.config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{begin_operation, end_operation, extend_operation, set_shape};
    use crate::render::PixelSurface;
    use crate::state::EngineConfig;

    const GREEN: Color = Color::rgb(0, 200, 0);

    fn engine() -> State<PixelSurface> {
        State::new(
            PixelSurface::new(100, 60, Color::WHITE),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_remote_freehand_is_mirrored() {
        let mut state = engine();
        receive_remote(
            &mut state,
            DrawEvent::ChangeConfig {
                color: GREEN,
                width: 10.0,
                tool: Tool::Pencil,
            },
        );
        receive_remote(&mut state, DrawEvent::begin_path(Point::new(10.0, 20.0)));
        receive_remote(&mut state, DrawEvent::draw_line(Point::new(40.0, 20.0), None));
        receive_remote(&mut state, DrawEvent::draw_line(Point::new(40.0, 50.0), None));

        assert_eq!(state.surface.pixel(25, 20), Some(GREEN));
        assert_eq!(state.surface.pixel(25, 24), Some(GREEN));
        assert_eq!(state.surface.pixel(40, 35), Some(GREEN));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history.pointer(), 0);
    }

    #[test]
    fn test_remote_shapes_are_ignored() {
        let mut state = engine();
        let blank = state.surface.snapshot();
        receive_remote_begin(&mut state, Point::new(0.0, 0.0));
        receive_remote_draw(&mut state, Point::new(40.0, 20.0), Some("rectangle"));
        receive_remote_draw(&mut state, Point::new(40.0, 20.0), Some("hexagon"));
        assert_eq!(state.surface.snapshot(), blank);
        // the open path still starts at the begin point
        assert_eq!(state.remote.last, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_remote_eraser_config() {
        let mut state = engine();
        receive_remote_config(&mut state, GREEN, 5.0, Tool::Eraser);
        assert_eq!(state.remote.pen.color, Color::WHITE);
        assert_eq!(state.remote.pen.width, state.config.eraser_width);
    }

    #[test]
    fn test_remote_width_is_sanitized() {
        let mut state = engine();
        receive_remote_config(&mut state, GREEN, f32::INFINITY, Tool::Pencil);
        assert_eq!(state.remote.pen.width, 5.0);
        receive_remote_config(&mut state, GREEN, 1000.0, Tool::Pencil);
        assert_eq!(state.remote.pen.width, 60.0);
    }

    #[test]
    fn test_remote_draw_without_begin_only_moves() {
        let mut state = engine();
        let blank = state.surface.snapshot();
        receive_remote_draw(&mut state, Point::new(30.0, 30.0), None);
        assert_eq!(state.surface.snapshot(), blank);
        receive_remote_draw(&mut state, Point::new(60.0, 30.0), None);
        assert_eq!(state.surface.pixel(45, 30), Some(Color::INK));
    }

    #[test]
    fn test_remote_config_leaves_local_pen() {
        let mut state = engine();
        receive_remote_config(&mut state, GREEN, 20.0, Tool::Pencil);
        assert_eq!(state.tools.color, Color::INK);
        assert_eq!(state.tools.width, 5);
    }

    #[test]
    fn test_local_shape_preview_overwrites_remote_strokes() {
        let mut state = engine();
        set_shape(&mut state, ShapeKind::Line);
        begin_operation(&mut state, Point::new(5.0, 5.0));
        extend_operation(&mut state, Point::new(20.0, 5.0));

        receive_remote_begin(&mut state, Point::new(10.0, 40.0));
        receive_remote_draw(&mut state, Point::new(90.0, 40.0), None);
        assert_eq!(state.surface.pixel(50, 40), Some(Color::INK));

        // last writer wins: the next preview starts from the pre-operation raster
        extend_operation(&mut state, Point::new(30.0, 5.0));
        assert_eq!(state.surface.pixel(50, 40), Some(Color::WHITE));
        end_operation(&mut state, Point::new(30.0, 5.0));
        assert_eq!(state.history.len(), 2);
    }
}
