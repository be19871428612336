pub mod projects;
pub mod tasks;

pub use projects::ProjectStore;
pub use tasks::TaskStore;
