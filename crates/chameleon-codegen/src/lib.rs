//! # Chameleon Codegen
//!
//! Build-time generator for host entry points and descriptor manifests.
//!
//! A plugin crate describes itself once, in its `Cargo.toml` package section
//! and an optional `Chameleon.toml`. From a build script the generator emits,
//! for every target platform, an entry point binding the host adapter to the
//! plugin type and the manifest the host reads:
//!
//! ```text
//! Cargo.toml + Chameleon.toml
//!           │
//!           ▼
//!     PluginMetadata ──► generate(metadata, platform)
//!                              │
//!            ┌─────────────────┴─────────────────┐
//!            ▼                                   ▼
//!   $OUT_DIR/chameleon/bukkit/bootstrap.rs   $OUT_DIR/chameleon/bukkit/plugin.yml
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     if let Err(error) = chameleon_codegen::build() {
//!         panic!("{error}");
//!     }
//! }
//!
//! // src/lib.rs
//! pub mod core;
//! pub mod platform {
//!     pub mod bukkit {
//!         include!(concat!(env!("OUT_DIR"), "/chameleon/bukkit/bootstrap.rs"));
//!     }
//! }
//! ```

pub mod bootstrap;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod platform;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};

use tracing::info;

pub use descriptor::DescriptorFormat;
pub use error::{Artifact, CodegenError, CodegenResult};
pub use metadata::{CargoPackage, Dependency, MetadataFile, PluginMetadata};
pub use platform::HostPlatform;
pub use writer::{GeneratedFile, GeneratedPlugin};

/// Metadata file read next to `Cargo.toml`.
pub const METADATA_FILE: &str = "Chameleon.toml";

/// Directory under `OUT_DIR` receiving generated output.
pub const OUTPUT_DIR: &str = "chameleon";

/// Renders the entry point and descriptor of `metadata` for `platform`.
///
/// Nothing is written; see [`GeneratedPlugin::write_to`].
pub fn generate(metadata: &PluginMetadata, platform: HostPlatform) -> CodegenResult<GeneratedPlugin> {
    metadata.validate()?;
    Ok(GeneratedPlugin {
        platform,
        bootstrap: bootstrap::render(metadata, platform),
        descriptor: descriptor::render(metadata, platform)?,
    })
}

/// Renders output for every platform `metadata` targets.
pub fn generate_all(metadata: &PluginMetadata) -> CodegenResult<Vec<GeneratedPlugin>> {
    metadata
        .target_platforms()
        .into_iter()
        .map(|platform| generate(metadata, platform))
        .collect()
}

/// Loads metadata for the crate at `manifest_dir`.
pub fn load_metadata(manifest_dir: &Path, package: &CargoPackage) -> CodegenResult<PluginMetadata> {
    let path = manifest_dir.join(METADATA_FILE);
    let file = if path.is_file() {
        Some(MetadataFile::read(&path)?.plugin)
    } else {
        None
    };
    PluginMetadata::from_sources(package, file)
}

/// Generates and writes output for the crate at `manifest_dir` into
/// `out_dir/chameleon/<platform>/`. Returns the written paths.
pub fn build_in(
    manifest_dir: &Path,
    out_dir: &Path,
    package: &CargoPackage,
) -> CodegenResult<Vec<PathBuf>> {
    let metadata = load_metadata(manifest_dir, package)?;
    let root = out_dir.join(OUTPUT_DIR);

    let mut written = Vec::new();
    for plugin in generate_all(&metadata)? {
        written.extend(plugin.write_to(&root.join(plugin.platform.id()))?);
    }

    info!(plugin = %metadata.id, files = written.len(), "Generated Chameleon entry points");
    Ok(written)
}

/// Build script entry point.
///
/// Reads `CARGO_MANIFEST_DIR`, `OUT_DIR` and the `CARGO_PKG_*` variables,
/// then runs [`build_in`].
pub fn build() -> CodegenResult<()> {
    let env_path = |key: &'static str| {
        std::env::var_os(key)
            .map(PathBuf::from)
            .ok_or(CodegenError::MissingEnv(key))
    };
    let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
    let out_dir = env_path("OUT_DIR")?;

    println!(
        "cargo:rerun-if-changed={}",
        manifest_dir.join(METADATA_FILE).display()
    );
    println!("cargo:rerun-if-changed=Cargo.toml");

    build_in(&manifest_dir, &out_dir, &CargoPackage::from_env()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::testing::sample;

    fn package() -> CargoPackage {
        CargoPackage {
            name: "greeter".into(),
            version: "0.1.0".into(),
            authors: vec!["Alice".into()],
            description: None,
            homepage: None,
        }
    }

    #[test]
    fn test_generate_rejects_invalid_metadata() {
        let mut metadata = sample();
        metadata.version.clear();
        assert!(matches!(
            generate(&metadata, HostPlatform::Bukkit),
            Err(CodegenError::InvalidMetadata { field: "version", .. })
        ));
    }

    #[test]
    fn test_generate_all_defaults_to_every_platform() {
        let plugins = generate_all(&sample()).unwrap();
        assert_eq!(plugins.len(), HostPlatform::ALL.len());

        let mut metadata = sample();
        metadata.platforms = vec![HostPlatform::Velocity];
        let plugins = generate_all(&metadata).unwrap();
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].descriptor.path.to_str(), Some("velocity-plugin.json"));
    }

    #[test]
    fn test_build_in_writes_per_platform_directories() {
        let manifest = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(
            manifest.path().join(METADATA_FILE),
            "[plugin]\nmain = \"core::Greeter\"\nplatforms = [\"bukkit\", \"sponge\"]\n",
        )
        .unwrap();

        let written = build_in(manifest.path(), out.path(), &package()).unwrap();
        assert_eq!(written.len(), 4);

        let root = out.path().join(OUTPUT_DIR);
        assert!(root.join("bukkit/bootstrap.rs").is_file());
        assert!(root.join("bukkit/plugin.yml").is_file());
        assert!(root.join("sponge/META-INF/sponge_plugins.json").is_file());

        let yml = fs::read_to_string(root.join("bukkit/plugin.yml")).unwrap();
        assert!(yml.contains("name: greeter"));
        assert!(yml.contains("author: Alice"));
    }

    #[test]
    fn test_build_in_without_metadata_file_fails_on_main() {
        let manifest = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let err = build_in(manifest.path(), out.path(), &package()).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidMetadata { field: "main", .. }));
        assert!(!out.path().join(OUTPUT_DIR).exists());
    }
}
