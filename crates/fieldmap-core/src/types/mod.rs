//! Type system utilities and aliases.
//!
//! - [`aliases`]: Shared-ownership lock aliases and callbacks.

pub mod aliases;

pub use aliases::*;
