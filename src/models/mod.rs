pub mod pagination;
pub mod project;
pub mod task;
pub mod user;

pub use pagination::{page_count, Page, PageRequest, Pagination, PAGE_SIZE};
pub use project::{Project, ProjectInput, ProjectPatch, ProjectStatus};
pub use task::{Task, TaskInput, TaskPatch, TaskStatus};
pub use user::User;
