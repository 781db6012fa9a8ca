// src/reload/mod.rs

//! Live-reload plumbing for the dev loop.
//!
//! - [`channel`] is the process-wide broadcaster: a websocket endpoint any
//!   number of browser clients connect to, and a cheap cloneable handle the
//!   rest of the pipeline calls `notify` on. Fire-and-forget; no acks.
//! - [`server`] is the static dev server for the pages directory.
//!
//! The handle is passed explicitly to whoever completes tasks; nothing in
//! this crate reaches for a global.

pub mod channel;
pub mod server;

pub use channel::{ReloadChannel, ReloadKind};
