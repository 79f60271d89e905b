//! A small plugin compiled through `chameleon-codegen`, so that the generated
//! entry points are built and exercised like a real plugin's.

pub mod core;
pub mod platform;
