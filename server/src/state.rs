use std::collections::HashMap;
use std::sync::Arc;

use sketchboard_shared::DrawEvent;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Events queued per peer before new ones are dropped for that peer.
pub const PEER_QUEUE: usize = 1024;

pub type PeerSender = mpsc::Sender<DrawEvent>;

#[derive(Clone, Default)]
pub struct AppState {
    pub peers: Arc<RwLock<HashMap<Uuid, PeerSender>>>,
}

impl AppState {
    pub async fn join(&self, id: Uuid, tx: PeerSender) -> usize {
        let mut peers = self.peers.write().await;
        peers.insert(id, tx);
        peers.len()
    }

    pub async fn leave(&self, id: Uuid) -> usize {
        let mut peers = self.peers.write().await;
        peers.remove(&id);
        peers.len()
    }
}
