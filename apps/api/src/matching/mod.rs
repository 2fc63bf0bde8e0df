// Match Engine: candidate skills vs job requirements, plus the recruiter avatars
// derived from each build. The engine itself is pure; only avatars.rs touches the store.

pub mod avatars;
pub mod engine;
pub mod handlers;
pub mod tree;
