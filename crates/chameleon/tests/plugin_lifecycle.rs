//! A plugin running on the in-memory host, driven through the same path a
//! generated entry point takes.

use std::fs;

use chameleon::prelude::*;
use chameleon::runtime::{Chameleon, ChameleonBootstrap, ConfigLoader, LifecycleState};
use chameleon_platform_memory::{MemoryHost, MemoryPlatform, NativeSender};

#[derive(Debug, serde::Deserialize)]
struct GreeterConfig {
    greeting: String,
}

struct Reload {
    info: CommandInfo,
    subs: Vec<SubCommand>,
}

impl Command for Reload {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &Context<'_>) -> CommandResult {
        ctx.reply(format!("greeter {}", ctx.args().join(" ")));
        Ok(())
    }

    fn sub_commands(&self) -> &[SubCommand] {
        &self.subs
    }
}

struct Greeter {
    greeting: String,
}

impl ChameleonPlugin for Greeter {
    fn create(ctx: &PluginContext) -> Result<Self, BoxError> {
        let greeting = ctx
            .config::<GreeterConfig>()
            .map_err(|e| e.to_string())?
            .map(|c| c.greeting)
            .unwrap_or_else(|| "Welcome!".to_owned());
        Ok(Self { greeting })
    }

    fn on_enable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
        let greeting = self.greeting.clone();
        ctx.subscribe(Priority::Low, |event: &mut UserConnectEvent| {
            if event.user().name() == "Griefer" {
                event.cancel_with_reason("banned");
            }
        });
        ctx.subscribe(Priority::Normal, move |event: &mut UserConnectEvent| {
            if !event.is_cancelled() {
                event.user().send_message(&greeting);
            }
        });
        ctx.subscribe(Priority::Normal, |event: &mut UserChatEvent| {
            let shouted = event.message().to_uppercase();
            let _ = event.set_message(shouted);
        });
        ctx.subscribe(Priority::Normal, |event: &mut UserChatEvent| {
            if event.message().contains("SPAM") {
                let _ = event.set_cancelled(true);
            }
        });

        ctx.register_command(Reload {
            info: CommandInfo::new("greeter"),
            subs: vec![SubCommand::new("version", |ctx| {
                ctx.reply("1.0.0");
                Ok(())
            })],
        })?;
        Ok(())
    }
}

fn load(host: &MemoryHost) -> Chameleon {
    let data = PluginData::new("greeter", "Greeter", "1.0.0");
    ChameleonBootstrap::new(MemoryPlatform::new(host.clone()), data)
        .config_loader(ConfigLoader::new().without_env().search_path("does-not-exist"))
        .load::<Greeter>()
        .expect("plugin loads")
}

#[test]
fn test_connect_cancelled_disconnects_with_reason() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    core.on_enable().unwrap();

    let griefer = host.join("Griefer");
    assert!(!griefer.is_connected());
    assert_eq!(griefer.disconnect_reason().as_deref(), Some("banned"));
    assert!(griefer.messages().is_empty());

    let steve = host.join("Steve");
    assert!(steve.is_connected());
    assert_eq!(steve.messages(), vec!["Welcome!"]);
    assert_eq!(host.players().len(), 1);
}

#[test]
fn test_chat_rewrite_written_back() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    core.on_enable().unwrap();

    let steve = host.join("Steve");
    assert_eq!(host.chat(&steve, "hello").as_deref(), Some("HELLO"));
    assert_eq!(host.chat(&steve, "spam spam"), None);
    assert_eq!(steve.messages().last().map(String::as_str), Some("<Steve> HELLO"));
}

#[test]
fn test_unknown_sub_command_falls_back_to_base() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    core.on_enable().unwrap();

    assert_eq!(
        host.dispatch_command(&NativeSender::Console, "greeter reload"),
        Some(true)
    );
    assert_eq!(
        host.dispatch_command(&NativeSender::Console, "greeter version"),
        Some(true)
    );
    assert_eq!(host.console_messages(), vec!["greeter reload", "1.0.0"]);
}

#[test]
fn test_disable_removes_every_registration() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    core.on_enable().unwrap();
    assert_eq!(core.state(), LifecycleState::Enabled);
    assert!(core.context().event_bus().listener_count_for("greeter") > 0);

    core.on_disable().unwrap();
    assert_eq!(core.state(), LifecycleState::Disabled);
    assert_eq!(core.context().event_bus().listener_count_for("greeter"), 0);
    assert!(core.context().commands().registered().is_empty());
    assert_eq!(host.dispatch_command(&NativeSender::Console, "greeter"), None);

    // The host no longer reaches the plugin.
    let steve = host.join("Steve");
    assert!(steve.messages().is_empty());
    assert_eq!(host.chat(&steve, "hello").as_deref(), Some("hello"));
}

#[test]
fn test_enable_fails_when_host_refuses_listeners() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    host.shutdown();

    assert!(core.on_enable().is_err());
    assert_eq!(core.state(), LifecycleState::Loaded);
    assert!(core.on_disable().is_err());
}

#[test]
fn test_plugin_section_read_from_data_folder() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("chameleon.toml"),
        "[plugins.greeter]\ngreeting = \"Hi there\"\n",
    )
    .unwrap();

    let host = MemoryHost::server();
    let platform = MemoryPlatform::new(host.clone()).with_data_folder(dir.path());
    let data = PluginData::new("greeter", "Greeter", "1.0.0");
    let mut core = ChameleonBootstrap::new(platform, data)
        .config_loader(ConfigLoader::new().without_env().search_path(dir.path()))
        .load::<Greeter>()
        .unwrap();
    core.on_enable().unwrap();

    assert_eq!(core.context().data_folder(), Some(dir.path()));
    let steve = host.join("Steve");
    assert_eq!(steve.messages(), vec!["Hi there"]);
}

#[test]
fn test_users_visible_through_context() {
    let host = MemoryHost::server();
    let mut core = load(&host);
    core.on_enable().unwrap();

    let steve = host.join("Steve");
    let users = core.context().users();
    let a = users.player(steve.unique_id()).expect("online");
    let b = users.player_by_name("steve").expect("online");
    assert_eq!(a.unique_id(), b.unique_id());
    assert_eq!(a.name(), b.name());

    steve.set_permission("greeter.admin", true);
    assert!(a.has_permission("greeter.admin"));
    assert!(b.has_permission("greeter.admin"));
    assert!(a.as_server_user().is_some());
}
