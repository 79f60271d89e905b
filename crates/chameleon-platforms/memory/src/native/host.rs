//! The in-memory host.
//!
//! [`MemoryHost`] plays the part of a game server or proxy: it tracks
//! connected players and backend servers, fires native events to registered
//! listeners and routes command lines to registered executors. Listeners and
//! commands run in the calling thread, like on a real host's main thread.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chameleon_core::PlatformKind;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};
use uuid::Uuid;

use super::event::{
    NativeEvent, NativeEventKind, PlayerChat, PlayerJoin, PlayerKick, PlayerQuit, ServerSwitch,
};
use super::player::{NativePlayer, NativeSender, NativeServer};

/// Reason recorded when a player leaves on their own.
pub const QUIT_REASON: &str = "Quit";

/// A native listener callback.
pub type NativeListener = Arc<dyn Fn(&mut NativeEvent) + Send + Sync>;

/// A native command executor.
pub trait NativeCommand: Send + Sync {
    /// Runs the command. The returned flag is the host's success signal.
    fn execute(&self, sender: &NativeSender, args: &str) -> bool;

    /// Completion candidates for the partially typed `args`.
    fn complete(&self, sender: &NativeSender, args: &str) -> Vec<String>;
}

/// Handle identifying one native listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

struct RegisteredListener {
    handle: ListenerHandle,
    owner: String,
    kind: NativeEventKind,
    listener: NativeListener,
}

struct RegisteredCommand {
    owner: String,
    name: String,
    aliases: Vec<String>,
    command: Arc<dyn NativeCommand>,
}

impl RegisteredCommand {
    fn answers_to(&self, label: &str) -> bool {
        self.name.eq_ignore_ascii_case(label)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
    }
}

struct HostState {
    kind: PlatformKind,
    name: String,
    version: String,
    players: RwLock<Vec<NativePlayer>>,
    servers: RwLock<Vec<NativeServer>>,
    listeners: RwLock<Vec<RegisteredListener>>,
    commands: RwLock<Vec<RegisteredCommand>>,
    console: Mutex<Vec<String>>,
    next_listener: AtomicU64,
    closed: AtomicBool,
}

/// An in-process game server or proxy. Clones share the same host.
#[derive(Clone)]
pub struct MemoryHost {
    state: Arc<HostState>,
}

impl MemoryHost {
    fn new(kind: PlatformKind, name: &str) -> Self {
        Self {
            state: Arc::new(HostState {
                kind,
                name: name.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                players: RwLock::new(Vec::new()),
                servers: RwLock::new(Vec::new()),
                listeners: RwLock::new(Vec::new()),
                commands: RwLock::new(Vec::new()),
                console: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// A game server host.
    pub fn server() -> Self {
        Self::new(PlatformKind::Server, "MemoryServer")
    }

    /// A proxy host.
    pub fn proxy() -> Self {
        Self::new(PlatformKind::Proxy, "MemoryProxy")
    }

    pub fn kind(&self) -> PlatformKind {
        self.state.kind
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn version(&self) -> &str {
        &self.state.version
    }

    /// Stops accepting listener and command registrations.
    pub fn shutdown(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Players and servers
    // =========================================================================

    /// Currently connected players.
    pub fn players(&self) -> Vec<NativePlayer> {
        self.state
            .players
            .read()
            .iter()
            .filter(|p| p.is_connected())
            .cloned()
            .collect()
    }

    pub fn player(&self, unique_id: Uuid) -> Option<NativePlayer> {
        self.players()
            .into_iter()
            .find(|p| p.unique_id() == unique_id)
    }

    /// Registers a backend server. Proxies only route players to known servers.
    pub fn add_server(&self, name: &str, address: SocketAddr) -> NativeServer {
        let server = NativeServer::new(name, address);
        self.state.servers.write().push(server.clone());
        server
    }

    pub fn servers(&self) -> Vec<NativeServer> {
        self.state.servers.read().clone()
    }

    pub fn server_named(&self, name: &str) -> Option<NativeServer> {
        self.state
            .servers
            .read()
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Connects a new player and fires [`PlayerJoin`].
    ///
    /// A player disconnected by a join listener is removed again and a
    /// [`PlayerQuit`] follows.
    pub fn join(&self, name: &str) -> NativePlayer {
        let player = NativePlayer::new(name, Uuid::new_v4());
        self.state.players.write().push(player.clone());
        debug!(player = name, "Player joined");

        self.fire(NativeEvent::Join(PlayerJoin {
            player: player.clone(),
        }));

        if !player.is_connected() {
            self.remove(&player);
        }
        player
    }

    /// Fires [`PlayerChat`] and broadcasts the resulting message.
    ///
    /// Returns the delivered text, or `None` when a listener cancelled it.
    pub fn chat(&self, player: &NativePlayer, message: &str) -> Option<String> {
        let event = self.fire(NativeEvent::Chat(PlayerChat {
            player: player.clone(),
            message: message.to_owned(),
            cancelled: false,
        }));
        let NativeEvent::Chat(chat) = event else {
            return None;
        };
        if chat.cancelled {
            trace!(player = player.name(), "Chat cancelled");
            return None;
        }

        let line = format!("<{}> {}", player.name(), chat.message);
        for recipient in self.players() {
            recipient.send_message(&line);
        }
        Some(chat.message)
    }

    /// Disconnects a player on their own request.
    pub fn quit(&self, player: &NativePlayer) {
        self.disconnect(player, QUIT_REASON);
    }

    /// Closes a player's connection from the host side.
    pub fn disconnect(&self, player: &NativePlayer, reason: &str) {
        player.disconnect(reason);
        self.remove(player);
    }

    /// Kicks a player from a server host and fires [`PlayerKick`].
    pub fn kick(&self, player: &NativePlayer, reason: &str) {
        self.fire(NativeEvent::Kick(PlayerKick {
            player: player.clone(),
            reason: reason.to_owned(),
        }));
        player.disconnect(reason);
        self.remove(player);
    }

    /// Moves a player to `server` and fires [`ServerSwitch`].
    pub fn switch(&self, player: &NativePlayer, server: &NativeServer) {
        let from = player.set_server(Some(server.clone()));
        self.fire(NativeEvent::ServerSwitch(ServerSwitch {
            player: player.clone(),
            from,
            to: server.clone(),
        }));
    }

    fn remove(&self, player: &NativePlayer) {
        let removed = {
            let mut players = self.state.players.write();
            let before = players.len();
            players.retain(|p| !p.same_handle(player));
            before != players.len()
        };
        if removed {
            player.set_server(None);
            self.fire(NativeEvent::Quit(PlayerQuit {
                player: player.clone(),
            }));
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Delivers `event` to every listener of its kind, in registration order.
    pub fn fire(&self, mut event: NativeEvent) -> NativeEvent {
        let kind = event.kind();
        let listeners: Vec<NativeListener> = self
            .state
            .listeners
            .read()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Arc::clone(&l.listener))
            .collect();

        trace!(event = kind.name(), listeners = listeners.len(), "Firing native event");
        for listener in listeners {
            listener(&mut event);
        }
        event
    }

    pub fn register_listener(
        &self,
        owner: &str,
        kind: NativeEventKind,
        listener: NativeListener,
    ) -> Result<ListenerHandle, String> {
        if self.is_closed() {
            return Err(format!("{} is shutting down", self.name()));
        }
        let handle = ListenerHandle(self.state.next_listener.fetch_add(1, Ordering::Relaxed));
        self.state.listeners.write().push(RegisteredListener {
            handle,
            owner: owner.to_owned(),
            kind,
            listener,
        });
        Ok(handle)
    }

    pub fn unregister_listener(&self, handle: ListenerHandle) -> bool {
        let mut listeners = self.state.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| l.handle != handle);
        before != listeners.len()
    }

    /// Removes every listener registered by `owner`.
    pub fn unregister_listeners(&self, owner: &str) -> usize {
        let mut listeners = self.state.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| l.owner != owner);
        before - listeners.len()
    }

    pub fn listener_count(&self, kind: NativeEventKind) -> usize {
        self.state
            .listeners
            .read()
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn register_command(
        &self,
        owner: &str,
        name: &str,
        aliases: &[String],
        command: Arc<dyn NativeCommand>,
    ) -> Result<(), String> {
        if self.is_closed() {
            return Err(format!("{} is shutting down", self.name()));
        }
        let mut commands = self.state.commands.write();
        let taken = std::iter::once(name)
            .chain(aliases.iter().map(String::as_str))
            .find(|label| commands.iter().any(|c| c.answers_to(label)));
        if let Some(label) = taken {
            return Err(format!("label '{label}' is already registered"));
        }
        commands.push(RegisteredCommand {
            owner: owner.to_owned(),
            name: name.to_owned(),
            aliases: aliases.to_vec(),
            command,
        });
        Ok(())
    }

    pub fn unregister_command(&self, name: &str) -> bool {
        let mut commands = self.state.commands.write();
        let before = commands.len();
        commands.retain(|c| !c.name.eq_ignore_ascii_case(name));
        before != commands.len()
    }

    /// Names of the commands registered by `owner`.
    pub fn commands_of(&self, owner: &str) -> Vec<String> {
        self.state
            .commands
            .read()
            .iter()
            .filter(|c| c.owner == owner)
            .map(|c| c.name.clone())
            .collect()
    }

    fn lookup(&self, label: &str) -> Option<Arc<dyn NativeCommand>> {
        self.state
            .commands
            .read()
            .iter()
            .find(|c| c.answers_to(label))
            .map(|c| Arc::clone(&c.command))
    }

    /// Runs a command line such as `greet reload now`.
    ///
    /// Returns `None` when no command answers to the label, otherwise the
    /// executor's success signal.
    pub fn dispatch_command(&self, sender: &NativeSender, line: &str) -> Option<bool> {
        let (label, args) = split_label(line);
        let command = self.lookup(label)?;
        Some(command.execute(sender, args.unwrap_or_default()))
    }

    /// Completion candidates for a partially typed command line.
    pub fn complete_command(&self, sender: &NativeSender, line: &str) -> Vec<String> {
        // A bare label is still being typed, so there is nothing to complete.
        match split_label(line) {
            (label, Some(args)) => self
                .lookup(label)
                .map(|command| command.complete(sender, args))
                .unwrap_or_default(),
            (_, None) => Vec::new(),
        }
    }

    // =========================================================================
    // Console
    // =========================================================================

    pub fn console_send(&self, message: &str) {
        self.state.console.lock().push(message.to_owned());
    }

    /// Every message sent to the console, oldest first.
    pub fn console_messages(&self) -> Vec<String> {
        self.state.console.lock().clone()
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("name", &self.state.name)
            .field("kind", &self.state.kind)
            .finish_non_exhaustive()
    }
}

/// Splits a command line into its label and, when anything follows the
/// label, the raw argument string.
fn split_label(line: &str) -> (&str, Option<&str>) {
    let line = line.trim_start().trim_start_matches('/');
    match line.split_once(char::is_whitespace) {
        Some((label, rest)) => (label, Some(rest)),
        None => (line, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("/greet reload now"), ("greet", Some("reload now")));
        assert_eq!(split_label("greet"), ("greet", None));
        assert_eq!(split_label("/greet"), ("greet", None));
        assert_eq!(split_label("greet "), ("greet", Some("")));
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let host = MemoryHost::server();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            host.register_listener(
                "test",
                NativeEventKind::Chat,
                Arc::new(move |_: &mut NativeEvent| order.lock().push(tag)),
            )
            .unwrap();
        }

        let player = host.join("Steve");
        host.chat(&player, "hi");
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_cancelled_chat_not_broadcast() {
        let host = MemoryHost::server();
        host.register_listener(
            "test",
            NativeEventKind::Chat,
            Arc::new(|event: &mut NativeEvent| {
                if let NativeEvent::Chat(chat) = event {
                    chat.cancelled = true;
                }
            }),
        )
        .unwrap();

        let player = host.join("Steve");
        assert_eq!(host.chat(&player, "hi"), None);
        assert!(player.messages().is_empty());
    }

    #[test]
    fn test_disconnect_during_join_removes_player() {
        let host = MemoryHost::server();
        let quits = Arc::new(AtomicU64::new(0));
        host.register_listener(
            "test",
            NativeEventKind::Join,
            Arc::new(|event: &mut NativeEvent| {
                if let NativeEvent::Join(join) = event {
                    join.player.disconnect("nope");
                }
            }),
        )
        .unwrap();
        let counter = Arc::clone(&quits);
        host.register_listener(
            "test",
            NativeEventKind::Quit,
            Arc::new(move |_: &mut NativeEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let player = host.join("Steve");
        assert!(host.players().is_empty());
        assert_eq!(player.disconnect_reason().as_deref(), Some("nope"));
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregister_listeners_by_owner() {
        let host = MemoryHost::server();
        let noop: NativeListener = Arc::new(|_: &mut NativeEvent| {});
        host.register_listener("a", NativeEventKind::Join, Arc::clone(&noop))
            .unwrap();
        host.register_listener("a", NativeEventKind::Chat, Arc::clone(&noop))
            .unwrap();
        let keep = host
            .register_listener("b", NativeEventKind::Join, noop)
            .unwrap();

        assert_eq!(host.unregister_listeners("a"), 2);
        assert_eq!(host.unregister_listeners("a"), 0);
        assert!(host.unregister_listener(keep));
        assert_eq!(host.listener_count(NativeEventKind::Join), 0);
    }

    #[test]
    fn test_shutdown_refuses_registrations() {
        let host = MemoryHost::proxy();
        host.shutdown();
        assert!(
            host.register_listener("a", NativeEventKind::Join, Arc::new(|_: &mut NativeEvent| {}))
                .is_err()
        );
    }

    #[test]
    fn test_switch_tracks_current_server() {
        let host = MemoryHost::proxy();
        let lobby = host.add_server("lobby", "127.0.0.1:25566".parse().unwrap());
        let survival = host.add_server("survival", "127.0.0.1:25567".parse().unwrap());
        let player = host.join("Steve");

        host.switch(&player, &lobby);
        host.switch(&player, &survival);
        assert_eq!(player.server(), Some(survival));
        assert_eq!(host.server_named("LOBBY"), Some(lobby));
    }
}
