pub mod clone;
pub mod diff;
pub mod repo;

pub use clone::ClonedRepo;
pub use diff::{FilePatch, Hunk, LineOrigin};
pub use repo::GitRepo;
