//! `planmark-session` library crate.
//!
//! Holds the per-session machinery that sits between a drawing viewer
//! and the stores: the persistence gateway (ephemeral or durable), the
//! session controller with its load/upload/analyze state machine, and
//! the page renderer seam. The demo binary entrypoint lives in
//! `main.rs`.

pub mod config;
pub mod controller;
pub mod gateway;
pub mod identity;
pub mod renderer;
pub mod seed;
