//! Native players, servers and senders of the in-memory host.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

// =============================================================================
// Player
// =============================================================================

#[derive(Debug)]
struct PlayerState {
    name: String,
    unique_id: Uuid,
    permissions: RwLock<HashMap<String, bool>>,
    messages: Mutex<Vec<String>>,
    disconnect_reason: Mutex<Option<String>>,
    server: Mutex<Option<NativeServer>>,
}

/// A native player handle. Clones refer to the same player.
#[derive(Debug, Clone)]
pub struct NativePlayer {
    state: Arc<PlayerState>,
}

impl NativePlayer {
    pub(crate) fn new(name: &str, unique_id: Uuid) -> Self {
        Self {
            state: Arc::new(PlayerState {
                name: name.to_owned(),
                unique_id,
                permissions: RwLock::new(HashMap::new()),
                messages: Mutex::new(Vec::new()),
                disconnect_reason: Mutex::new(None),
                server: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn unique_id(&self) -> Uuid {
        self.state.unique_id
    }

    /// Whether both handles refer to the same native player.
    pub fn same_handle(&self, other: &NativePlayer) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.state
            .permissions
            .read()
            .get(permission)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_permission(&self, permission: &str, value: bool) {
        self.state
            .permissions
            .write()
            .insert(permission.to_owned(), value);
    }

    pub fn send_message(&self, message: &str) {
        self.state.messages.lock().push(message.to_owned());
    }

    /// Every message this player received, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.state.messages.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.disconnect_reason.lock().is_none()
    }

    /// Closes the connection. Later calls keep the first reason.
    pub fn disconnect(&self, reason: &str) {
        let mut current = self.state.disconnect_reason.lock();
        if current.is_none() {
            *current = Some(reason.to_owned());
        }
    }

    pub fn disconnect_reason(&self) -> Option<String> {
        self.state.disconnect_reason.lock().clone()
    }

    /// The backend this player is on. Only set on proxies.
    pub fn server(&self) -> Option<NativeServer> {
        self.state.server.lock().clone()
    }

    pub(crate) fn set_server(&self, server: Option<NativeServer>) -> Option<NativeServer> {
        std::mem::replace(&mut *self.state.server.lock(), server)
    }
}

// =============================================================================
// Server
// =============================================================================

#[derive(Debug)]
struct ServerState {
    name: String,
    address: SocketAddr,
    received: Mutex<Vec<(String, Vec<u8>)>>,
}

/// A native backend server registered with a proxy host.
#[derive(Debug, Clone)]
pub struct NativeServer {
    state: Arc<ServerState>,
}

impl NativeServer {
    pub(crate) fn new(name: &str, address: SocketAddr) -> Self {
        Self {
            state: Arc::new(ServerState {
                name: name.to_owned(),
                address,
                received: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn address(&self) -> SocketAddr {
        self.state.address
    }

    pub fn send_data(&self, channel: &str, data: &[u8]) {
        self.state
            .received
            .lock()
            .push((channel.to_owned(), data.to_vec()));
    }

    /// Plugin messages sent to this server as `(channel, payload)` pairs.
    pub fn received(&self) -> Vec<(String, Vec<u8>)> {
        self.state.received.lock().clone()
    }
}

impl PartialEq for NativeServer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

// =============================================================================
// Sender
// =============================================================================

/// Anything that can run a native command.
#[derive(Debug, Clone)]
pub enum NativeSender {
    Console,
    Player(NativePlayer),
}

impl From<NativePlayer> for NativeSender {
    fn from(player: NativePlayer) -> Self {
        Self::Player(player)
    }
}
