//! Host entry point source.
//!
//! For every platform the generator emits one type that holds the host's
//! adapter until enable, then builds the framework core and forwards the
//! host's enable and disable hooks to it:
//!
//! ```text
//!   host loads plugin ──► GreeterBukkit::new(platform)
//!
//!   host enable
//!         │  ChameleonBootstrap::new(platform, data).load::<Greeter>()
//!         ├── Ok  ──► core.on_enable()
//!         └── Err ──► log, no core (disable becomes a no-op)
//!
//!   host disable ──► core.on_disable()
//! ```

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::error::Artifact;
use crate::metadata::PluginMetadata;
use crate::platform::HostPlatform;
use crate::writer::GeneratedFile;

/// File name of the generated entry point inside the platform directory.
pub const BOOTSTRAP_FILE: &str = "bootstrap.rs";

const HEADER: &str = "// @generated by chameleon-codegen. Do not edit.\n";

/// Renders the entry point for `metadata` on `platform`.
pub fn render(metadata: &PluginMetadata, platform: HostPlatform) -> GeneratedFile {
    let tokens = entry_point(metadata, platform);
    GeneratedFile::new(
        Artifact::Bootstrap,
        BOOTSTRAP_FILE,
        format!("{HEADER}{tokens}\n"),
    )
}

fn entry_point(metadata: &PluginMetadata, platform: HostPlatform) -> TokenStream {
    let type_name = format_ident!("{}", metadata.bootstrap_type(platform));
    let adapter_crate = format_ident!("{}", platform.adapter_crate());
    let adapter_type = format_ident!("{}", platform.adapter_type());
    let main = path(metadata.main.split("::"));
    let data = plugin_data(metadata, platform);

    quote! {
        /// Host entry point owning the Chameleon core.
        pub struct #type_name {
            platform: ::core::option::Option<::#adapter_crate::#adapter_type>,
            core: ::core::option::Option<::chameleon_runtime::Chameleon>,
        }

        impl #type_name {
            pub fn new(platform: ::#adapter_crate::#adapter_type) -> Self {
                Self {
                    platform: ::core::option::Option::Some(platform),
                    core: ::core::option::Option::None,
                }
            }

            /// Builds the core and enables the plugin. Only the first call
            /// does anything.
            pub fn on_enable(&mut self) {
                let ::core::option::Option::Some(platform) = self.platform.take() else {
                    return;
                };
                let data = #data;
                let core = match ::chameleon_runtime::ChameleonBootstrap::new(platform, data)
                    .load::<crate #(:: #main)*>()
                {
                    ::core::result::Result::Ok(core) => self.core.insert(core),
                    ::core::result::Result::Err(error) => {
                        ::chameleon_runtime::tracing::error!(
                            error = %error,
                            "An error occurred while loading Chameleon"
                        );
                        return;
                    }
                };
                if let ::core::result::Result::Err(error) = core.on_enable() {
                    ::chameleon_runtime::tracing::error!(
                        error = %error,
                        "An error occurred while enabling Chameleon"
                    );
                }
            }

            pub fn on_disable(&mut self) {
                if let ::core::option::Option::Some(core) = self.core.as_mut() {
                    if let ::core::result::Result::Err(error) = core.on_disable() {
                        ::chameleon_runtime::tracing::error!(
                            error = %error,
                            "An error occurred while disabling Chameleon"
                        );
                    }
                }
            }

            /// The core, once enable has built it.
            pub fn chameleon(&self) -> ::core::option::Option<&::chameleon_runtime::Chameleon> {
                self.core.as_ref()
            }
        }
    }
}

fn path<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<Ident> {
    segments.map(|s| format_ident!("{}", s)).collect()
}

fn plugin_data(metadata: &PluginMetadata, platform: HostPlatform) -> TokenStream {
    let id = &metadata.id;
    let name = metadata.display_name();
    let version = &metadata.version;
    let authors = &metadata.authors;
    let description = optional(metadata.description.as_deref());
    let url = optional(metadata.url.as_deref());
    let dependencies = metadata
        .dependencies
        .iter()
        .filter(|d| d.applies_to(platform))
        .map(|d| {
            let name = &d.name;
            let soft = d.soft;
            quote! {
                ::chameleon_runtime::PluginDependency {
                    name: ::std::string::String::from(#name),
                    soft: #soft,
                }
            }
        });

    quote! {
        ::chameleon_runtime::PluginData {
            id: ::std::string::String::from(#id),
            name: ::std::string::String::from(#name),
            version: ::std::string::String::from(#version),
            authors: ::std::vec![#(::std::string::String::from(#authors)),*],
            description: #description,
            url: #url,
            dependencies: ::std::vec![#(#dependencies),*],
            data_folder: ::core::option::Option::None,
        }
    }
}

fn optional(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote!(::core::option::Option::Some(::std::string::String::from(#value))),
        None => quote!(::core::option::Option::None),
    }
}
