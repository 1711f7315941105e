//! HTTP front end for the board.
//!
//! An axum server exposing the board JSON API and serving the static
//! front end.

mod handlers;
mod server;

pub use server::{AppState, ServerHandle, build_router, start_server};
