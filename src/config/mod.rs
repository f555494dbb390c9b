//! Server configuration loaded from the environment.

pub mod server;

pub use server::*;
