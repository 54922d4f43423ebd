// own crate re-exports
pub use recoil_core::*;
