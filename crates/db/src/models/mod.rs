//! Row structs matching the database schema.
//!
//! Each submodule contains a `FromRow` + `Serialize` row struct and a
//! conversion into the corresponding planmark-core entity. Vocabulary
//! columns (status, severity, role) are TEXT in the schema and parsed on
//! the way out.

pub mod drawing;
pub mod issue;
pub mod project;
pub mod project_member;
