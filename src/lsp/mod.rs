//! LSP Protocol Implementation
//!
//! Hosts the registered checkers behind a language server.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
