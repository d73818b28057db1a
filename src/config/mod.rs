//! Environment configuration for the server.

mod server;

pub use server::*;
