// src/watch/mod.rs

//! File watching and change dispatch.
//!
//! This module is responsible for:
//! - Compiling per-binding watch patterns (`bindings`).
//! - Wiring up a cross-platform, debounced filesystem watcher (`watcher`).
//! - Turning coalesced change events into graph executions and reload
//!   notifications.
//!
//! It does **not** know how tasks work internally; it only maps changed
//! paths onto bindings and hands their nodes to the graph runner.

pub mod bindings;
pub mod watcher;

pub use bindings::WatchBinding;
pub use watcher::{spawn_watcher, WatcherHandle};
