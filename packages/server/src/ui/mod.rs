//! Chat backend server implementation.

mod handler;
mod middleware;
mod server;
mod signal;
pub mod state;

pub use server::Server;
