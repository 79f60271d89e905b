//! User model.
//!
//! The user model is a capability hierarchy rather than a set of concrete
//! classes:
//!
//! ```text
//! ChatUser            can receive messages, has permissions
//! └── User            + identity (name, unique id), can be disconnected
//!     ├── ServerUser  + connected directly to a game server (kick, permission attachments)
//!     └── ProxyUser   + connected through a proxy (current backend, switching)
//! ```
//!
//! Host adapters implement these traits with thin wrappers that hold exactly
//! one native handle and no state of their own. Wrappers are created on demand
//! and never cached, so two wraps of the same native player are distinct
//! values that report identical results.

use std::net::SocketAddr;
use std::sync::Arc;

use uuid::Uuid;

/// Anything that can receive chat messages and run commands.
pub trait ChatUser: Send + Sync {
    /// Display name of this user. The console reports a fixed name.
    fn name(&self) -> String;

    /// Sends a plain-text message.
    fn send_message(&self, message: &str);

    /// Returns whether this user holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;

    /// Returns this user as a connected player, if it is one.
    fn as_user(&self) -> Option<&dyn User> {
        None
    }
}

/// A connected player with an identity.
pub trait User: ChatUser {
    /// Stable unique identifier of this player.
    fn unique_id(&self) -> Uuid;

    /// Disconnects this player, showing `reason`.
    fn disconnect(&self, reason: &str);

    /// Returns this user as a server-side player, if the platform is a server.
    fn as_server_user(&self) -> Option<&dyn ServerUser> {
        None
    }

    /// Returns this user as a proxy-side player, if the platform is a proxy.
    fn as_proxy_user(&self) -> Option<&dyn ProxyUser> {
        None
    }
}

/// A player connected directly to a game server.
pub trait ServerUser: User {
    /// Kicks this player from the server.
    fn kick(&self, reason: &str);

    /// Sets or unsets an in-game permission attachment.
    fn set_permission(&self, permission: &str, value: bool);
}

/// A player connected through a proxy.
pub trait ProxyUser: User {
    /// The backend server this player is currently connected to.
    fn server(&self) -> Option<Arc<dyn Server>>;

    /// Moves this player to another backend server.
    fn connect(&self, server: &dyn Server);
}

/// A backend game server known to a proxy.
pub trait Server: Send + Sync {
    /// Name of the server, unique per proxy.
    fn name(&self) -> String;

    /// Socket address of the server.
    fn socket_address(&self) -> SocketAddr;

    /// Players currently connected to this server.
    ///
    /// This is read from the host on every call and reflects concurrent joins
    /// and leaves.
    fn players(&self) -> Vec<Arc<dyn ProxyUser>>;

    /// Sends a plugin message on `channel`.
    fn send_data(&self, channel: &str, data: &[u8]);
}

/// Host-independent access to the users of a platform.
pub trait UserManager: Send + Sync {
    /// The host console.
    fn console(&self) -> Arc<dyn ChatUser>;

    /// Players connected at call time. Never cached.
    fn players(&self) -> Vec<Arc<dyn User>>;

    /// The connected player with `unique_id`, if any.
    fn player(&self, unique_id: Uuid) -> Option<Arc<dyn User>>;

    /// The connected player named `name` (case-insensitive), if any.
    fn player_by_name(&self, name: &str) -> Option<Arc<dyn User>> {
        self.players()
            .into_iter()
            .find(|user| user.name().eq_ignore_ascii_case(name))
    }
}

/// Wrapping of native handles into unified users.
///
/// Both operations are total over valid handles and return a fresh wrapper
/// on every call.
pub trait PlatformUserManager: UserManager {
    /// Native command sender type (players and the console).
    type Sender: ?Sized;
    /// Native player type.
    type Player: ?Sized;

    /// Wraps any native sender.
    fn wrap_sender(&self, sender: &Self::Sender) -> Arc<dyn ChatUser>;

    /// Wraps a native player.
    fn wrap_player(&self, player: &Self::Player) -> Arc<dyn User>;
}

/// Returns whether two wrappers refer to the same player.
pub fn same_user(a: &dyn User, b: &dyn User) -> bool {
    a.unique_id() == b.unique_id()
}
