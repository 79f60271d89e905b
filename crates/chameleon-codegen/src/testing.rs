use crate::metadata::PluginMetadata;

pub(crate) fn sample() -> PluginMetadata {
    PluginMetadata {
        id: "greeter".into(),
        name: "Greeter".into(),
        version: "1.2.0".into(),
        authors: vec!["Alice".into(), "Bob".into()],
        url: Some("https://example.com".into()),
        description: Some("Greets players".into()),
        main: "core::Greeter".into(),
        dependencies: vec![],
        platforms: vec![],
    }
}
