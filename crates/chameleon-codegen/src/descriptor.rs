//! Host descriptor manifests.
//!
//! Each host reads a manifest naming the plugin, its entry point and its
//! dependencies. The manifests are modelled as serde structs and rendered as
//! YAML or JSON depending on the host.

use serde::Serialize;

use crate::error::{Artifact, CodegenError, CodegenResult};
use crate::metadata::PluginMetadata;
use crate::platform::HostPlatform;
use crate::writer::GeneratedFile;

/// Bukkit `api-version` written into `plugin.yml`.
pub const BUKKIT_API_VERSION: &str = "1.13";

/// Nukkit API versions written into `nukkit.yml`.
pub const NUKKIT_API_VERSIONS: [&str; 1] = ["1.0.0"];

/// Serialization format of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Yaml,
    Json,
}

impl DescriptorFormat {
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(|e| e.to_string()),
        }
    }
}

// =============================================================================
// YAML hosts
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct BukkitDescriptor<'a> {
    name: &'a str,
    main: String,
    version: &'a str,
    api_version: &'static str,
    author: String,
    authors: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<&'a str>,
    depend: Vec<String>,
    softdepend: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BungeeDescriptor<'a> {
    name: &'a str,
    main: String,
    version: &'a str,
    author: String,
    depends: Vec<String>,
    soft_depends: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NukkitDescriptor<'a> {
    name: &'a str,
    main: String,
    version: &'a str,
    api: [&'static str; 1],
    author: String,
    authors: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<&'a str>,
    depend: Vec<String>,
    softdepend: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

// =============================================================================
// JSON hosts
// =============================================================================

#[derive(Debug, Serialize)]
struct VelocityDependency {
    id: String,
    optional: bool,
}

#[derive(Debug, Serialize)]
struct VelocityDescriptor<'a> {
    id: &'a str,
    name: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    authors: &'a [String],
    dependencies: Vec<VelocityDependency>,
    main: String,
}

#[derive(Debug, Serialize)]
struct SpongeLinks<'a> {
    homepage: &'a str,
}

#[derive(Debug, Serialize)]
struct SpongeContributor<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct SpongeDependency {
    id: String,
    version: &'static str,
    load_order: &'static str,
    optional: bool,
}

#[derive(Debug, Serialize)]
struct SpongePlugin<'a> {
    id: &'a str,
    name: &'a str,
    version: &'a str,
    entrypoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<SpongeLinks<'a>>,
    contributors: Vec<SpongeContributor<'a>>,
    dependencies: Vec<SpongeDependency>,
}

#[derive(Debug, Serialize)]
struct SpongeDescriptor<'a> {
    plugins: [SpongePlugin<'a>; 1],
}

#[derive(Debug, Serialize)]
struct MinestomDescriptor<'a> {
    entrypoint: String,
    name: &'a str,
    version: &'a str,
    authors: &'a [String],
    dependencies: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MemoryDependency<'a> {
    id: &'a str,
    optional: bool,
}

#[derive(Debug, Serialize)]
struct MemoryDescriptor<'a> {
    id: &'a str,
    name: &'a str,
    version: &'a str,
    main: String,
    authors: &'a [String],
    dependencies: Vec<MemoryDependency<'a>>,
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the descriptor of `metadata` for `platform`.
pub fn render(metadata: &PluginMetadata, platform: HostPlatform) -> CodegenResult<GeneratedFile> {
    let format = platform.descriptor_format();
    let rendered = match platform {
        HostPlatform::Bukkit => format.render(&bukkit(metadata)),
        HostPlatform::BungeeCord => format.render(&bungee(metadata)),
        HostPlatform::Nukkit => format.render(&nukkit(metadata)),
        HostPlatform::Velocity => format.render(&velocity(metadata)),
        HostPlatform::Sponge => format.render(&sponge(metadata)),
        HostPlatform::Minestom => format.render(&minestom(metadata)),
        HostPlatform::Memory => format.render(&memory(metadata)),
    };

    let contents = rendered.map_err(|reason| CodegenError::Render {
        artifact: Artifact::Descriptor,
        platform: platform.id(),
        reason,
    })?;

    Ok(GeneratedFile::new(
        Artifact::Descriptor,
        platform.descriptor_file(),
        contents,
    ))
}

fn bukkit(metadata: &PluginMetadata) -> BukkitDescriptor<'_> {
    let platform = HostPlatform::Bukkit;
    let (depend, softdepend) = metadata.dependencies_for(platform);
    BukkitDescriptor {
        name: metadata.display_name(),
        main: metadata.bootstrap_reference(platform),
        version: &metadata.version,
        api_version: BUKKIT_API_VERSION,
        author: metadata.author_line(),
        authors: &metadata.authors,
        website: metadata.url.as_deref(),
        depend,
        softdepend,
        description: metadata.description.as_deref(),
    }
}

fn bungee(metadata: &PluginMetadata) -> BungeeDescriptor<'_> {
    let platform = HostPlatform::BungeeCord;
    let (depends, soft_depends) = metadata.dependencies_for(platform);
    BungeeDescriptor {
        name: metadata.display_name(),
        main: metadata.bootstrap_reference(platform),
        version: &metadata.version,
        author: metadata.author_line(),
        depends,
        soft_depends,
        description: metadata.description.as_deref(),
    }
}

fn nukkit(metadata: &PluginMetadata) -> NukkitDescriptor<'_> {
    let platform = HostPlatform::Nukkit;
    let (depend, softdepend) = metadata.dependencies_for(platform);
    NukkitDescriptor {
        name: metadata.display_name(),
        main: metadata.bootstrap_reference(platform),
        version: &metadata.version,
        api: NUKKIT_API_VERSIONS,
        author: metadata.author_line(),
        authors: &metadata.authors,
        website: metadata.url.as_deref(),
        depend,
        softdepend,
        description: metadata.description.as_deref(),
    }
}

fn velocity(metadata: &PluginMetadata) -> VelocityDescriptor<'_> {
    let platform = HostPlatform::Velocity;
    let (hard, soft) = metadata.dependencies_for(platform);
    let dependencies = hard
        .into_iter()
        .map(|id| VelocityDependency {
            id: id.to_lowercase(),
            optional: false,
        })
        .chain(soft.into_iter().map(|id| VelocityDependency {
            id: id.to_lowercase(),
            optional: true,
        }))
        .collect();

    VelocityDescriptor {
        id: &metadata.id,
        name: metadata.display_name(),
        version: &metadata.version,
        description: metadata.description.as_deref(),
        url: metadata.url.as_deref(),
        authors: &metadata.authors,
        dependencies,
        main: metadata.bootstrap_reference(platform),
    }
}

fn sponge(metadata: &PluginMetadata) -> SpongeDescriptor<'_> {
    let platform = HostPlatform::Sponge;
    let (hard, soft) = metadata.dependencies_for(platform);
    let dependency = |id: String, optional| SpongeDependency {
        id: id.to_lowercase(),
        version: "*",
        load_order: "after",
        optional,
    };
    let dependencies = hard
        .into_iter()
        .map(|id| dependency(id, false))
        .chain(soft.into_iter().map(|id| dependency(id, true)))
        .collect();

    SpongeDescriptor {
        plugins: [SpongePlugin {
            id: &metadata.id,
            name: metadata.display_name(),
            version: &metadata.version,
            entrypoint: metadata.bootstrap_reference(platform),
            description: metadata.description.as_deref(),
            links: metadata
                .url
                .as_deref()
                .map(|homepage| SpongeLinks { homepage }),
            contributors: metadata
                .authors
                .iter()
                .map(|name| SpongeContributor { name })
                .collect(),
            dependencies,
        }],
    }
}

/// Minestom extensions have no soft dependencies; only hard ones are listed.
fn minestom(metadata: &PluginMetadata) -> MinestomDescriptor<'_> {
    let platform = HostPlatform::Minestom;
    let (dependencies, _) = metadata.dependencies_for(platform);
    MinestomDescriptor {
        entrypoint: metadata.bootstrap_reference(platform),
        name: metadata.display_name(),
        version: &metadata.version,
        authors: &metadata.authors,
        dependencies,
    }
}

fn memory(metadata: &PluginMetadata) -> MemoryDescriptor<'_> {
    let platform = HostPlatform::Memory;
    MemoryDescriptor {
        id: &metadata.id,
        name: metadata.display_name(),
        version: &metadata.version,
        main: metadata.bootstrap_reference(platform),
        authors: &metadata.authors,
        dependencies: metadata
            .dependencies
            .iter()
            .filter(|d| d.applies_to(platform))
            .map(|d| MemoryDependency {
                id: &d.name,
                optional: d.soft,
            })
            .collect(),
    }
}
