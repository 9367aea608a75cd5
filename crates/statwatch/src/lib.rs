//! Top-level facade crate for statwatch.
//!
//! Re-exports the metric store core and the server library so users can depend on a single crate.

pub mod core {
    pub use statwatch_core::*;
}

pub mod server {
    pub use statwatch_server::*;
}
