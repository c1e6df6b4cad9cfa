use sketchboard_shared::{sanitize_width, DrawEvent, Point};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// Drops events that carry non-finite coordinates and clamps stroke widths. Shape names
/// pass through untouched; receivers decide what they understand.
pub fn sanitize_event(event: DrawEvent) -> Option<DrawEvent> {
    match event {
        DrawEvent::BeginPath { x, y, start_pos } => {
            if !Point::new(x, y).is_finite() || !start_pos.is_finite() {
                return None;
            }
            Some(DrawEvent::BeginPath { x, y, start_pos })
        }
        DrawEvent::DrawLine { x, y, shape } => {
            if !Point::new(x, y).is_finite() {
                return None;
            }
            Some(DrawEvent::DrawLine { x, y, shape })
        }
        DrawEvent::ChangeConfig { color, width, tool } => Some(DrawEvent::ChangeConfig {
            color,
            width: sanitize_width(width),
            tool,
        }),
    }
}

/// A peer whose queue is full misses this event but stays connected.
pub async fn broadcast_except(state: &AppState, sender: Uuid, event: DrawEvent) {
    let mut stale = Vec::new();
    {
        let peers = state.peers.read().await;
        for (id, tx) in peers.iter() {
            if *id == sender {
                continue;
            }
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(conn = %id, event = event.name(), "peer queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => stale.push(*id),
            }
        }
    }

    if !stale.is_empty() {
        let mut peers = state.peers.write().await;
        for id in stale {
            peers.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_shared::{Color, ShapeKind, Tool};
    use tokio::sync::mpsc;

    #[test]
    fn test_sanitize_drops_non_finite_points() {
        let event = DrawEvent::DrawLine {
            x: f32::NAN,
            y: 1.0,
            shape: None,
        };
        assert_eq!(sanitize_event(event), None);

        let event = DrawEvent::BeginPath {
            x: 1.0,
            y: 1.0,
            start_pos: Point::new(f32::INFINITY, 0.0),
        };
        assert_eq!(sanitize_event(event), None);
    }

    #[test]
    fn test_sanitize_keeps_unknown_shapes() {
        let event = DrawEvent::DrawLine {
            x: 4.0,
            y: 5.0,
            shape: Some("hexagon".to_string()),
        };
        assert_eq!(sanitize_event(event.clone()), Some(event));

        let event = DrawEvent::draw_line(Point::new(4.0, 5.0), Some(ShapeKind::Circle));
        assert_eq!(sanitize_event(event.clone()), Some(event));
    }

    #[test]
    fn test_sanitize_clamps_width() {
        let event = DrawEvent::ChangeConfig {
            color: Color::INK,
            width: 500.0,
            tool: Tool::Pencil,
        };
        let Some(DrawEvent::ChangeConfig { width, .. }) = sanitize_event(event) else {
            panic!("config event dropped");
        };
        assert_eq!(width, 60.0);
    }

    #[tokio::test]
    async fn test_broadcast_skips_sender() {
        let state = AppState::default();
        let (sender_id, other_id) = (Uuid::new_v4(), Uuid::new_v4());
        let (sender_tx, mut sender_rx) = mpsc::channel(8);
        let (other_tx, mut other_rx) = mpsc::channel(8);
        state.join(sender_id, sender_tx).await;
        state.join(other_id, other_tx).await;

        let event = DrawEvent::begin_path(Point::new(1.0, 2.0));
        broadcast_except(&state, sender_id, event.clone()).await;

        assert_eq!(other_rx.recv().await, Some(event));
        assert!(sender_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_prunes_closed_peers() {
        let state = AppState::default();
        let sender_id = Uuid::new_v4();
        let (gone_tx, gone_rx) = mpsc::channel(8);
        let (live_tx, mut live_rx) = mpsc::channel(8);
        state.join(Uuid::new_v4(), gone_tx).await;
        let live_id = Uuid::new_v4();
        state.join(live_id, live_tx).await;
        drop(gone_rx);

        let event = DrawEvent::draw_line(Point::new(3.0, 3.0), None);
        broadcast_except(&state, sender_id, event.clone()).await;

        assert_eq!(live_rx.recv().await, Some(event));
        let peers = state.peers.read().await;
        assert_eq!(peers.len(), 1);
        assert!(peers.contains_key(&live_id));
    }

    #[tokio::test]
    async fn test_slow_peer_drops_events_but_stays() {
        let state = AppState::default();
        let sender_id = Uuid::new_v4();
        let slow_id = Uuid::new_v4();
        let (slow_tx, mut slow_rx) = mpsc::channel(2);
        state.join(slow_id, slow_tx).await;

        for step in 0..5 {
            let event = DrawEvent::draw_line(Point::new(step as f32, 0.0), None);
            broadcast_except(&state, sender_id, event).await;
        }

        assert!(state.peers.read().await.contains_key(&slow_id));
        assert_eq!(
            slow_rx.recv().await,
            Some(DrawEvent::draw_line(Point::new(0.0, 0.0), None))
        );
        assert_eq!(
            slow_rx.recv().await,
            Some(DrawEvent::draw_line(Point::new(1.0, 0.0), None))
        );
        assert!(slow_rx.try_recv().is_err());

        // the queue drained, so the next event gets through
        let event = DrawEvent::begin_path(Point::new(9.0, 9.0));
        broadcast_except(&state, sender_id, event.clone()).await;
        assert_eq!(slow_rx.recv().await, Some(event));
    }

    #[tokio::test]
    async fn test_leave_reports_remaining_peers() {
        let state = AppState::default();
        let id = Uuid::new_v4();
        let (tx, _rx) = mpsc::channel(8);
        assert_eq!(state.join(id, tx).await, 1);
        assert_eq!(state.leave(id).await, 0);
    }
}
