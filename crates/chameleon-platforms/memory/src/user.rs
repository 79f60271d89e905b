//! Unified users over native players.
//!
//! [`MemoryUser`] holds one native player handle and forwards everything to
//! it. Wrappers are built on every call and never cached; two wrappers of the
//! same player compare equal.

use std::net::SocketAddr;
use std::sync::Arc;

use chameleon_core::{
    ChatUser, PlatformKind, PlatformUserManager, ProxyUser, Server, ServerUser, User, UserManager,
};
use tracing::warn;
use uuid::Uuid;

use crate::native::{MemoryHost, NativePlayer, NativeSender, NativeServer};

// =============================================================================
// Players
// =============================================================================

/// A connected player of a [`MemoryHost`].
#[derive(Debug, Clone)]
pub struct MemoryUser {
    player: NativePlayer,
    host: MemoryHost,
}

impl MemoryUser {
    pub fn new(player: NativePlayer, host: MemoryHost) -> Self {
        Self { player, host }
    }

    /// The wrapped native handle.
    pub fn native(&self) -> &NativePlayer {
        &self.player
    }
}

impl PartialEq for MemoryUser {
    fn eq(&self, other: &Self) -> bool {
        self.player.same_handle(&other.player)
    }
}

impl Eq for MemoryUser {}

impl ChatUser for MemoryUser {
    fn name(&self) -> String {
        self.player.name().to_owned()
    }

    fn send_message(&self, message: &str) {
        self.player.send_message(message);
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.player.has_permission(permission)
    }

    fn as_user(&self) -> Option<&dyn User> {
        Some(self)
    }
}

impl User for MemoryUser {
    fn unique_id(&self) -> Uuid {
        self.player.unique_id()
    }

    fn disconnect(&self, reason: &str) {
        self.host.disconnect(&self.player, reason);
    }

    fn as_server_user(&self) -> Option<&dyn ServerUser> {
        (self.host.kind() == PlatformKind::Server).then_some(self as &dyn ServerUser)
    }

    fn as_proxy_user(&self) -> Option<&dyn ProxyUser> {
        self.host.kind().is_proxy().then_some(self as &dyn ProxyUser)
    }
}

impl ServerUser for MemoryUser {
    fn kick(&self, reason: &str) {
        self.host.kick(&self.player, reason);
    }

    fn set_permission(&self, permission: &str, value: bool) {
        self.player.set_permission(permission, value);
    }
}

impl ProxyUser for MemoryUser {
    fn server(&self) -> Option<Arc<dyn Server>> {
        self.player
            .server()
            .map(|server| Arc::new(MemoryServer::new(server, self.host.clone())) as Arc<dyn Server>)
    }

    fn connect(&self, server: &dyn Server) {
        let name = server.name();
        match self.host.server_named(&name) {
            Some(target) => self.host.switch(&self.player, &target),
            None => warn!(player = self.player.name(), server = %name, "Unknown server"),
        }
    }
}

// =============================================================================
// Servers
// =============================================================================

/// A backend server of a proxy [`MemoryHost`].
#[derive(Debug, Clone)]
pub struct MemoryServer {
    server: NativeServer,
    host: MemoryHost,
}

impl MemoryServer {
    pub fn new(server: NativeServer, host: MemoryHost) -> Self {
        Self { server, host }
    }

    pub fn native(&self) -> &NativeServer {
        &self.server
    }
}

impl Server for MemoryServer {
    fn name(&self) -> String {
        self.server.name().to_owned()
    }

    fn socket_address(&self) -> SocketAddr {
        self.server.address()
    }

    fn players(&self) -> Vec<Arc<dyn ProxyUser>> {
        self.host
            .players()
            .into_iter()
            .filter(|p| p.server().as_ref() == Some(&self.server))
            .map(|p| Arc::new(MemoryUser::new(p, self.host.clone())) as Arc<dyn ProxyUser>)
            .collect()
    }

    fn send_data(&self, channel: &str, data: &[u8]) {
        self.server.send_data(channel, data);
    }
}

// =============================================================================
// Console
// =============================================================================

/// The host console. Holds every permission.
#[derive(Debug, Clone)]
pub struct MemoryConsole {
    name: String,
    host: MemoryHost,
}

impl ChatUser for MemoryConsole {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_message(&self, message: &str) {
        self.host.console_send(message);
    }

    fn has_permission(&self, _permission: &str) -> bool {
        true
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Wraps native players and senders of one host.
#[derive(Debug, Clone)]
pub struct MemoryUserManager {
    host: MemoryHost,
    console_name: String,
}

impl MemoryUserManager {
    pub fn new(host: MemoryHost, console_name: impl Into<String>) -> Self {
        Self {
            host,
            console_name: console_name.into(),
        }
    }

    /// Wraps `player` as the concrete user type.
    pub fn user(&self, player: &NativePlayer) -> MemoryUser {
        MemoryUser::new(player.clone(), self.host.clone())
    }

    pub fn server(&self, server: &NativeServer) -> MemoryServer {
        MemoryServer::new(server.clone(), self.host.clone())
    }
}

impl UserManager for MemoryUserManager {
    fn console(&self) -> Arc<dyn ChatUser> {
        Arc::new(MemoryConsole {
            name: self.console_name.clone(),
            host: self.host.clone(),
        })
    }

    fn players(&self) -> Vec<Arc<dyn User>> {
        self.host
            .players()
            .iter()
            .map(|p| self.wrap_player(p))
            .collect()
    }

    fn player(&self, unique_id: Uuid) -> Option<Arc<dyn User>> {
        self.host
            .player(unique_id)
            .map(|p| self.wrap_player(&p))
    }
}

impl PlatformUserManager for MemoryUserManager {
    type Sender = NativeSender;
    type Player = NativePlayer;

    fn wrap_sender(&self, sender: &NativeSender) -> Arc<dyn ChatUser> {
        match sender {
            NativeSender::Console => self.console(),
            NativeSender::Player(player) => Arc::new(self.user(player)),
        }
    }

    fn wrap_player(&self, player: &NativePlayer) -> Arc<dyn User> {
        Arc::new(self.user(player))
    }
}

#[cfg(test)]
mod tests {
    use chameleon_core::same_user;

    use super::*;

    #[test]
    fn test_wraps_are_value_equal() {
        let host = MemoryHost::server();
        let users = MemoryUserManager::new(host.clone(), "CONSOLE");
        let player = host.join("Steve");

        let a = users.user(&player);
        let b = users.user(&player);
        assert_eq!(a, b);
        assert_eq!(a.name(), b.name());
        assert!(same_user(&a, &b));

        player.set_permission("greet.use", true);
        assert!(a.has_permission("greet.use"));
        assert!(b.has_permission("greet.use"));
    }

    #[test]
    fn test_capabilities_follow_host_kind() {
        let server = MemoryHost::server();
        let user = MemoryUserManager::new(server.clone(), "CONSOLE").user(&server.join("Steve"));
        assert!(user.as_server_user().is_some());
        assert!(user.as_proxy_user().is_none());

        let proxy = MemoryHost::proxy();
        let user = MemoryUserManager::new(proxy.clone(), "CONSOLE").user(&proxy.join("Alex"));
        assert!(user.as_server_user().is_none());
        assert!(user.as_proxy_user().is_some());
    }

    #[test]
    fn test_players_reflect_host_state() {
        let host = MemoryHost::server();
        let users = MemoryUserManager::new(host.clone(), "CONSOLE");
        let steve = host.join("Steve");
        host.join("Alex");
        assert_eq!(users.players().len(), 2);

        users.wrap_player(&steve).disconnect("bye");
        assert_eq!(users.players().len(), 1);
        assert!(users.player(steve.unique_id()).is_none());
        assert!(users.player_by_name("alex").is_some());
    }

    #[test]
    fn test_console_sender() {
        let host = MemoryHost::server();
        let users = MemoryUserManager::new(host.clone(), "Terminal");
        let console = users.wrap_sender(&NativeSender::Console);

        assert_eq!(console.name(), "Terminal");
        assert!(console.has_permission("anything"));
        assert!(console.as_user().is_none());
        console.send_message("hello");
        assert_eq!(host.console_messages(), vec!["hello"]);
    }

    #[test]
    fn test_proxy_connect_and_server_players() {
        let host = MemoryHost::proxy();
        let lobby = host.add_server("lobby", "127.0.0.1:25566".parse().unwrap());
        let survival = host.add_server("survival", "127.0.0.1:25567".parse().unwrap());
        let users = MemoryUserManager::new(host.clone(), "CONSOLE");
        let player = host.join("Steve");
        host.switch(&player, &lobby);

        let user = users.user(&player);
        assert_eq!(ProxyUser::server(&user).map(|s| s.name()).as_deref(), Some("lobby"));

        user.connect(&users.server(&survival));
        assert_eq!(player.server(), Some(survival.clone()));
        assert_eq!(users.server(&survival).players().len(), 1);
        assert!(users.server(&lobby).players().is_empty());
    }
}
