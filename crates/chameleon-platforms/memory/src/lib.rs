//! # Chameleon Memory Platform
//!
//! An in-process host and the adapter binding Chameleon to it.
//!
//! The [`native`] module models a host with its own players, servers, events
//! and command map, knowing nothing about Chameleon. The rest of the crate is
//! the adapter a real host integration provides:
//!
//! | Role                 | Type                      |
//! |----------------------|---------------------------|
//! | Platform entry       | [`MemoryPlatform`]        |
//! | Event dispatcher     | [`MemoryEventDispatcher`] |
//! | User manager         | [`MemoryUserManager`]     |
//! | Command manager      | [`MemoryCommandManager`]  |
//!
//! ## Example
//!
//! ```rust,ignore
//! use chameleon_platform_memory::{MemoryHost, MemoryPlatform};
//! use chameleon_runtime::{ChameleonBootstrap, PluginData};
//!
//! let host = MemoryHost::server();
//! let data = PluginData::new("greeter", "Greeter", "1.0.0");
//! let mut core = ChameleonBootstrap::new(MemoryPlatform::new(host.clone()), data)
//!     .load::<Greeter>()?;
//! core.on_enable()?;
//!
//! let steve = host.join("Steve");
//! host.chat(&steve, "hello");
//! ```

pub mod command;
pub mod dispatcher;
pub mod native;
pub mod platform;
pub mod user;

pub use command::MemoryCommandManager;
pub use dispatcher::MemoryEventDispatcher;
pub use native::{MemoryHost, NativePlayer, NativeSender, NativeServer};
pub use platform::{MemoryPlatform, PLATFORM_ID};
pub use user::{MemoryConsole, MemoryServer, MemoryUser, MemoryUserManager};
