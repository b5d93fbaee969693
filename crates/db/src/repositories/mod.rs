//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Entities arrive with
//! caller-generated ids, so inserts take the full domain entity rather
//! than a separate create DTO.

pub mod drawing_repo;
pub mod issue_repo;
pub mod project_member_repo;
pub mod project_repo;

pub use drawing_repo::DrawingRepo;
pub use issue_repo::IssueRepo;
pub use project_member_repo::ProjectMemberRepo;
pub use project_repo::ProjectRepo;
