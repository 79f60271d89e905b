use std::fs;

use chameleon_codegen::{
    CargoPackage, Dependency, HostPlatform, PluginMetadata, build_in, generate,
};

fn metadata() -> PluginMetadata {
    PluginMetadata {
        id: "greeter".into(),
        name: String::new(),
        version: "1.0.0".into(),
        authors: vec![],
        url: None,
        description: None,
        main: "core::Greeter".into(),
        dependencies: vec![
            Dependency {
                name: "Vault".into(),
                soft: false,
                platforms: vec![HostPlatform::Bukkit],
            },
            Dependency {
                name: "LuckPerms".into(),
                soft: true,
                platforms: vec![],
            },
        ],
        platforms: vec![],
    }
}

#[test]
fn test_restricted_dependency_skipped_on_other_platforms() {
    let plugin = generate(&metadata(), HostPlatform::Nukkit).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&plugin.descriptor.contents).unwrap();

    assert_eq!(doc["depend"].as_sequence().map(Vec::len), Some(0));
    let soft: Vec<_> = doc["softdepend"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(soft, vec!["LuckPerms"]);
    assert!(!plugin.bootstrap.contents.contains("Vault"));
    assert!(plugin.bootstrap.contents.contains("LuckPerms"));
}

#[test]
fn test_bukkit_descriptor_fallbacks() {
    let plugin = generate(&metadata(), HostPlatform::Bukkit).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&plugin.descriptor.contents).unwrap();

    assert_eq!(doc["name"].as_str(), Some("greeter"));
    assert_eq!(doc["author"].as_str(), Some("Unknown"));
    assert_eq!(doc["api-version"].as_str(), Some("1.13"));
    assert_eq!(doc["depend"][0].as_str(), Some("Vault"));
}

#[test]
fn test_failed_write_leaves_nothing_behind() {
    let manifest = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(
        manifest.path().join("Chameleon.toml"),
        "[plugin]\nmain = \"core::Greeter\"\nplatforms = [\"sponge\"]\n",
    )
    .unwrap();
    // A file where the descriptor's directory has to go.
    let platform_dir = out.path().join("chameleon").join("sponge");
    fs::create_dir_all(&platform_dir).unwrap();
    fs::write(platform_dir.join("META-INF"), "").unwrap();

    let package = CargoPackage {
        name: "greeter".into(),
        version: "1.0.0".into(),
        ..CargoPackage::default()
    };
    let err = build_in(manifest.path(), out.path(), &package).unwrap_err();
    assert_eq!(err.artifact(), Some(chameleon_codegen::Artifact::Descriptor));
    assert!(!platform_dir.join("bootstrap.rs").exists());
}
