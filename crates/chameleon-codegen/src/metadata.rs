//! Declarative plugin metadata.
//!
//! Metadata comes from two sources, merged field by field:
//!
//! 1. The Cargo package (`CARGO_PKG_*` variables seen by the build script)
//! 2. An optional `Chameleon.toml` next to `Cargo.toml`, whose values win
//!
//! ```toml
//! [plugin]
//! id = "greeter"
//! name = "Greeter"
//! main = "core::Greeter"
//! platforms = ["bukkit", "velocity"]
//!
//! [[plugin.dependencies]]
//! name = "LuckPerms"
//! soft = true
//! platforms = ["bukkit"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};
use crate::platform::HostPlatform;

/// Modules stripped from the end of the main module path before the
/// platform module is appended.
const SHARED_MODULES: [&str; 2] = ["core", "common"];

/// Strict and reserved keywords of the 2024 edition.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// =============================================================================
// Metadata model
// =============================================================================

/// A dependency on another plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Soft dependencies only affect load order.
    #[serde(default)]
    pub soft: bool,
    /// Platforms the dependency applies to. Empty means every platform.
    #[serde(default)]
    pub platforms: Vec<HostPlatform>,
}

impl Dependency {
    pub fn applies_to(&self, platform: HostPlatform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }
}

/// Validated plugin metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub id: String,
    /// Display name. Empty falls back to the id.
    #[serde(default)]
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Path of the plugin type relative to the crate root, e.g. `core::Greeter`.
    pub main: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Platforms generated by the build script. Empty means every platform.
    #[serde(default)]
    pub platforms: Vec<HostPlatform>,
}

impl PluginMetadata {
    /// Checks the fields the generator relies on.
    pub fn validate(&self) -> CodegenResult<()> {
        if self.id.is_empty() {
            return Err(CodegenError::invalid("id", "must not be empty"));
        }
        if let Some(c) = self
            .id
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
        {
            return Err(CodegenError::invalid(
                "id",
                format!("'{}' contains '{c}', only [a-z0-9_-] are allowed", self.id),
            ));
        }
        if self.version.trim().is_empty() {
            return Err(CodegenError::invalid("version", "must not be empty"));
        }
        if self.main.is_empty() {
            return Err(CodegenError::invalid("main", "must not be empty"));
        }
        if let Some(segment) = self.main.split("::").find(|s| !is_identifier(s)) {
            return Err(CodegenError::invalid(
                "main",
                format!("'{segment}' in '{}' is not an identifier", self.main),
            ));
        }
        if let Some(dep) = self.dependencies.iter().find(|d| d.name.is_empty()) {
            return Err(CodegenError::invalid(
                "dependencies",
                format!("dependency with empty name (soft = {})", dep.soft),
            ));
        }
        Ok(())
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }

    /// Authors joined for single-author fields, or `Unknown`.
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Names of the hard and soft dependencies applicable to `platform`.
    pub fn dependencies_for(&self, platform: HostPlatform) -> (Vec<String>, Vec<String>) {
        self.dependencies
            .iter()
            .filter(|d| d.applies_to(platform))
            .fold((Vec::new(), Vec::new()), |(mut hard, mut soft), d| {
                if d.soft {
                    soft.push(d.name.clone());
                } else {
                    hard.push(d.name.clone());
                }
                (hard, soft)
            })
    }

    /// Last segment of [`main`](Self::main).
    pub fn main_type(&self) -> &str {
        self.main.rsplit("::").next().unwrap_or(&self.main)
    }

    /// Module segments of [`main`](Self::main), without the type.
    pub fn main_module(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.main.split("::").collect();
        segments.pop();
        segments
    }

    /// Module path the entry point for `platform` lives in.
    ///
    /// A trailing `core` or `common` module is replaced, so
    /// `core::Greeter` yields `platform::bukkit`.
    pub fn bootstrap_module(&self, platform: HostPlatform) -> Vec<String> {
        let mut module = self.main_module();
        if module.last().is_some_and(|last| SHARED_MODULES.contains(last)) {
            module.pop();
        }
        module
            .into_iter()
            .map(str::to_string)
            .chain(["platform".to_string(), platform.id().to_string()])
            .collect()
    }

    /// Name of the generated entry point type, e.g. `GreeterBukkit`.
    pub fn bootstrap_type(&self, platform: HostPlatform) -> String {
        format!("{}{}", self.main_type(), platform.suffix())
    }

    /// Full path of the generated entry point, as written into descriptors.
    pub fn bootstrap_reference(&self, platform: HostPlatform) -> String {
        let mut path = self.bootstrap_module(platform);
        path.push(self.bootstrap_type(platform));
        path.join("::")
    }

    /// Platforms the build script should generate for.
    pub fn target_platforms(&self) -> Vec<HostPlatform> {
        if self.platforms.is_empty() {
            HostPlatform::ALL.to_vec()
        } else {
            self.platforms.clone()
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s != "_" && !KEYWORDS.contains(&s) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// Sources
// =============================================================================

/// Package fields Cargo exposes to build scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoPackage {
    pub name: String,
    pub version: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
}

impl CargoPackage {
    /// Reads `CARGO_PKG_*` from the environment.
    pub fn from_env() -> CodegenResult<Self> {
        let required = |key: &'static str| std::env::var(key).map_err(|_| CodegenError::MissingEnv(key));
        let optional = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Ok(Self {
            name: required("CARGO_PKG_NAME")?,
            version: required("CARGO_PKG_VERSION")?,
            authors: optional("CARGO_PKG_AUTHORS")
                .map(|a| a.split(':').map(str::to_string).collect())
                .unwrap_or_default(),
            description: optional("CARGO_PKG_DESCRIPTION"),
            homepage: optional("CARGO_PKG_HOMEPAGE"),
        })
    }
}

/// `Chameleon.toml` contents. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataFile {
    #[serde(default)]
    pub plugin: PartialMetadata,
}

/// The `[plugin]` table of `Chameleon.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialMetadata {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub authors: Option<Vec<String>>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub main: Option<String>,
    pub dependencies: Option<Vec<Dependency>>,
    pub platforms: Option<Vec<HostPlatform>>,
}

impl MetadataFile {
    pub fn parse(contents: &str, path: &Path) -> CodegenResult<Self> {
        toml::from_str(contents).map_err(|source| CodegenError::MetadataParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> CodegenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CodegenError::MetadataRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }
}

impl PluginMetadata {
    /// Merges the package fields with the file, file values winning, and
    /// validates the result.
    ///
    /// The id defaults to the package name lowercased with `-` kept; `main`
    /// has no package equivalent and must come from the file.
    pub fn from_sources(package: &CargoPackage, file: Option<PartialMetadata>) -> CodegenResult<Self> {
        let file = file.unwrap_or_default();
        let metadata = Self {
            id: file.id.unwrap_or_else(|| package.name.to_ascii_lowercase()),
            name: file.name.unwrap_or_else(|| package.name.clone()),
            version: file.version.unwrap_or_else(|| package.version.clone()),
            authors: file.authors.unwrap_or_else(|| package.authors.clone()),
            url: file.url.or_else(|| package.homepage.clone()),
            description: file.description.or_else(|| package.description.clone()),
            main: file.main.unwrap_or_default(),
            dependencies: file.dependencies.unwrap_or_default(),
            platforms: file.platforms.unwrap_or_default(),
        };
        metadata.validate()?;
        Ok(metadata)
    }
}
