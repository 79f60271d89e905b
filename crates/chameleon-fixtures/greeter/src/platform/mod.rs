//! Generated host entry points.

pub mod memory {
    include!(concat!(env!("OUT_DIR"), "/chameleon/memory/bootstrap.rs"));
}
