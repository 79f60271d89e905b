//! Native event translation for the in-memory host.

use std::sync::Arc;

use chameleon_core::{
    EventBridge, PlatformError, PlatformEventDispatcher, PlatformKind, PlatformResult,
    PlatformUserManager, ProxyUserSwitchEvent, Server, ServerUserKickEvent, TranslationError,
    User, UserChatEvent, UserConnectEvent, UserDisconnectEvent, reconcile_chat, reconcile_connect,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::native::{ListenerHandle, MemoryHost, NativeEvent, NativeEventKind, NativeListener};
use crate::user::MemoryUserManager;

/// Owner tag of the native listeners registered by the dispatcher.
pub const LISTENER_OWNER: &str = "chameleon";

/// Registers one native listener per event kind the host fires.
pub struct MemoryEventDispatcher {
    host: MemoryHost,
    bridge: EventBridge,
    users: Arc<MemoryUserManager>,
    handles: Mutex<Vec<ListenerHandle>>,
}

impl MemoryEventDispatcher {
    pub fn new(host: MemoryHost, bridge: EventBridge, users: Arc<MemoryUserManager>) -> Self {
        Self {
            host,
            bridge,
            users,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Native event kinds translated on this host.
    pub fn kinds(&self) -> [NativeEventKind; 4] {
        let specific = match self.host.kind() {
            PlatformKind::Server => NativeEventKind::Kick,
            PlatformKind::Proxy => NativeEventKind::ServerSwitch,
        };
        [
            NativeEventKind::Join,
            NativeEventKind::Chat,
            NativeEventKind::Quit,
            specific,
        ]
    }

    pub fn is_registered(&self) -> bool {
        !self.handles.lock().is_empty()
    }

    fn listener(&self) -> NativeListener {
        let bridge = self.bridge.clone();
        let users = Arc::clone(&self.users);
        Arc::new(move |event: &mut NativeEvent| translate(&bridge, &users, event))
    }
}

impl PlatformEventDispatcher for MemoryEventDispatcher {
    fn register_listeners(&self) -> PlatformResult<()> {
        let mut handles = self.handles.lock();
        if !handles.is_empty() {
            return Ok(());
        }

        for kind in self.kinds() {
            match self.host.register_listener(LISTENER_OWNER, kind, self.listener()) {
                Ok(handle) => handles.push(handle),
                Err(reason) => {
                    for handle in handles.drain(..) {
                        self.host.unregister_listener(handle);
                    }
                    return Err(PlatformError::ListenerRegistration {
                        event: kind.name(),
                        reason,
                    });
                }
            }
        }

        debug!(host = self.host.name(), listeners = handles.len(), "Registered native listeners");
        Ok(())
    }

    fn unregister_listeners(&self) {
        let handles: Vec<_> = self.handles.lock().drain(..).collect();
        if handles.is_empty() {
            return;
        }
        for handle in &handles {
            self.host.unregister_listener(*handle);
        }
        debug!(host = self.host.name(), listeners = handles.len(), "Unregistered native listeners");
    }
}

fn translate(bridge: &EventBridge, users: &MemoryUserManager, event: &mut NativeEvent) {
    match event {
        NativeEvent::Join(join) => {
            let user = users.wrap_player(&join.player);
            // Joins carry no cancel state on this host; a cancellation only
            // takes effect through the disconnect below.
            let connect = bridge.translate_and_dispatch("PlayerJoin", || {
                Ok(UserConnectEvent::new(user, false))
            });
            if let Some(connect) = connect {
                reconcile_connect(&connect);
            }
        }
        NativeEvent::Chat(chat) => {
            let user = users.wrap_player(&chat.player);
            let original = chat.message.clone();
            let cancelled = chat.cancelled;
            let dispatched = bridge.translate_and_dispatch("PlayerChat", || {
                Ok(UserChatEvent::new(user, original.as_str(), cancelled))
            });
            if let Some(dispatched) = dispatched {
                reconcile_chat(
                    &dispatched,
                    &original,
                    |message| chat.message = message.to_owned(),
                    |cancelled| chat.cancelled = cancelled,
                );
            }
        }
        NativeEvent::Quit(quit) => {
            bridge.translate_and_dispatch("PlayerQuit", || {
                Ok(UserDisconnectEvent::new(users.wrap_player(&quit.player)))
            });
        }
        NativeEvent::Kick(kick) => {
            bridge.translate_and_dispatch("PlayerKick", || {
                let user = users.user(&kick.player);
                if user.as_server_user().is_none() {
                    return Err(TranslationError::UnexpectedParticipant {
                        native: "PlayerKick",
                        expected: "server user",
                    });
                }
                Ok(ServerUserKickEvent::new(Arc::new(user), kick.reason.as_str()))
            });
        }
        NativeEvent::ServerSwitch(switch) => {
            bridge.translate_and_dispatch("ServerSwitch", || {
                let user = users.user(&switch.player);
                if user.as_proxy_user().is_none() {
                    return Err(TranslationError::UnexpectedParticipant {
                        native: "ServerSwitch",
                        expected: "proxy user",
                    });
                }
                let previous = switch
                    .from
                    .as_ref()
                    .map(|server| Arc::new(users.server(server)) as Arc<dyn Server>);
                let current = Arc::new(users.server(&switch.to));
                Ok(ProxyUserSwitchEvent::new(Arc::new(user), previous, current))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use chameleon_core::{ChatUser, EventBus, Priority, UserEvent};

    use super::*;

    fn dispatcher(host: &MemoryHost) -> (Arc<EventBus>, MemoryEventDispatcher) {
        let bus = Arc::new(EventBus::new());
        let bridge = EventBridge::new(Arc::clone(&bus), "memory");
        let users = Arc::new(MemoryUserManager::new(host.clone(), "CONSOLE"));
        (bus, MemoryEventDispatcher::new(host.clone(), bridge, users))
    }

    #[test]
    fn test_registers_one_listener_per_kind() {
        let host = MemoryHost::server();
        let (_, dispatcher) = dispatcher(&host);
        dispatcher.register_listeners().unwrap();
        dispatcher.register_listeners().unwrap();

        for kind in dispatcher.kinds() {
            assert_eq!(host.listener_count(kind), 1, "{kind:?}");
        }
        assert_eq!(host.listener_count(NativeEventKind::ServerSwitch), 0);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let host = MemoryHost::proxy();
        let (_, dispatcher) = dispatcher(&host);
        dispatcher.unregister_listeners();

        dispatcher.register_listeners().unwrap();
        assert!(dispatcher.is_registered());
        dispatcher.unregister_listeners();
        dispatcher.unregister_listeners();
        assert!(!dispatcher.is_registered());
        assert_eq!(host.listener_count(NativeEventKind::Join), 0);
    }

    #[test]
    fn test_refused_registration_rolls_back() {
        let host = MemoryHost::server();
        host.shutdown();
        let (_, dispatcher) = dispatcher(&host);

        let err = dispatcher.register_listeners().unwrap_err();
        assert!(matches!(
            err,
            PlatformError::ListenerRegistration { event: "PlayerJoin", .. }
        ));
        assert!(!dispatcher.is_registered());
    }

    #[test]
    fn test_kick_translated_on_server() {
        let host = MemoryHost::server();
        let (bus, dispatcher) = dispatcher(&host);
        dispatcher.register_listeners().unwrap();

        let reasons = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&reasons);
        bus.subscribe("test", Priority::Normal, move |e: &mut ServerUserKickEvent| {
            seen.lock().push((e.user().name(), e.reason().to_owned()));
        });

        let player = host.join("Steve");
        host.kick(&player, "afk");
        assert_eq!(*reasons.lock(), vec![("Steve".to_owned(), "afk".to_owned())]);
    }

    #[test]
    fn test_switch_translated_on_proxy() {
        let host = MemoryHost::proxy();
        let lobby = host.add_server("lobby", "127.0.0.1:25566".parse().unwrap());
        let games = host.add_server("games", "127.0.0.1:25567".parse().unwrap());
        let (bus, dispatcher) = dispatcher(&host);
        dispatcher.register_listeners().unwrap();

        let moves = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&moves);
        bus.subscribe("test", Priority::Normal, move |e: &mut ProxyUserSwitchEvent| {
            seen.lock()
                .push((e.previous_server().map(|s| s.name()), e.server().name()));
        });

        let player = host.join("Steve");
        host.switch(&player, &lobby);
        host.switch(&player, &games);
        assert_eq!(
            *moves.lock(),
            vec![
                (None, "lobby".to_owned()),
                (Some("lobby".to_owned()), "games".to_owned()),
            ]
        );
    }

    #[test]
    fn test_quit_dispatched_once() {
        let host = MemoryHost::server();
        let (bus, dispatcher) = dispatcher(&host);
        dispatcher.register_listeners().unwrap();

        let quits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&quits);
        bus.subscribe("test", Priority::Normal, move |_: &mut UserDisconnectEvent| {
            *counter.lock() += 1;
        });

        let player = host.join("Steve");
        host.quit(&player);
        host.quit(&player);
        assert_eq!(*quits.lock(), 1);
    }
}
