//! planmark-core: domain logic for PDF drawing review.
//!
//! Pure types and functions only; no I/O. The `planmark-db` and
//! `planmark-session` crates build on these.

pub mod analysis;
pub mod counter;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod issue;
pub mod project;
pub mod store;
pub mod types;
