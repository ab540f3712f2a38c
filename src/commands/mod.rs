//! Command handlers.
//!
//! Each submodule backs one group of CLI subcommands. Handlers take the
//! shared [`AppStateManager`](crate::state::AppStateManager) and return
//! `Result<_, String>` so the entry point can print failures uniformly.

pub mod auth;
pub mod browser;
pub mod debug;
pub mod tokens;
pub mod upload;
