//! The generated memory entry point, driven the way a host drives it.

use std::fs;

use chameleon_fixture_greeter::platform::memory::GreeterMemory;
use chameleon_platform_memory::{MemoryHost, MemoryPlatform};
use chameleon_runtime::LifecycleState;
use tempfile::TempDir;

const DESCRIPTOR: &str = include_str!(concat!(
    env!("OUT_DIR"),
    "/chameleon/memory/chameleon-plugin.json"
));

/// An entry point whose data folder holds `config`, if any.
fn entry_point(host: &MemoryHost, config: Option<&str>) -> (GreeterMemory, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    if let Some(config) = config {
        fs::write(dir.path().join("chameleon.toml"), config).unwrap();
    }
    let platform = MemoryPlatform::new(host.clone()).with_data_folder(dir.path());
    (GreeterMemory::new(platform), dir)
}

#[test]
fn test_hooks_reach_plugin() {
    let host = MemoryHost::server();
    let (mut entry, _dir) = entry_point(&host, None);
    assert!(entry.chameleon().is_none());

    entry.on_enable();
    let core = entry.chameleon().expect("core built on enable");
    assert_eq!(core.state(), LifecycleState::Enabled);
    assert_eq!(core.context().plugin_id(), "greeter");
    assert_eq!(core.context().data().name, "Greeter");

    let steve = host.join("Steve");
    assert_eq!(steve.messages(), vec!["Welcome!"]);
    assert_eq!(host.chat(&steve, "hi").as_deref(), Some("HI"));

    entry.on_disable();
    assert_eq!(entry.chameleon().map(|c| c.state()), Some(LifecycleState::Disabled));
    assert_eq!(host.chat(&steve, "hi").as_deref(), Some("hi"));

    // Repeated hooks are logged or ignored, never fatal.
    entry.on_disable();
    entry.on_enable();
    assert_eq!(entry.chameleon().map(|c| c.state()), Some(LifecycleState::Disabled));
    assert_eq!(host.chat(&steve, "hi").as_deref(), Some("hi"));
}

#[test]
fn test_config_read_from_data_folder() {
    let host = MemoryHost::server();
    let (mut entry, _dir) = entry_point(&host, Some("[plugins.greeter]\ngreeting = \"Hi there\"\n"));

    entry.on_enable();
    let alex = host.join("Alex");
    assert_eq!(alex.messages(), vec!["Hi there"]);
}

#[test]
fn test_failed_construction_leaves_host_untouched() {
    let host = MemoryHost::server();
    let (mut entry, _dir) = entry_point(&host, Some("[plugins.greeter]\ngreeting = \"\"\n"));

    entry.on_enable();
    assert!(entry.chameleon().is_none());

    let steve = host.join("Steve");
    assert!(steve.is_connected());
    assert!(steve.messages().is_empty());
    assert_eq!(host.chat(&steve, "hi").as_deref(), Some("hi"));

    entry.on_disable();
    assert!(entry.chameleon().is_none());
}

#[test]
fn test_descriptor_points_at_entry_point() {
    let doc: serde_json::Value = serde_json::from_str(DESCRIPTOR).unwrap();

    assert_eq!(doc["id"], "greeter");
    assert_eq!(doc["name"], "Greeter");
    assert_eq!(doc["main"], "platform::memory::GreeterMemory");
    assert_eq!(doc["dependencies"][0]["id"], "LuckPerms");
    assert_eq!(doc["dependencies"][0]["optional"], true);
}
