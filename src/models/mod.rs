pub mod task;
pub mod user;

pub use task::{Task, TaskChanges, TaskInput, TaskPatch};
pub use user::{AuthToken, Credentials, User, AUTH_ACCESS};
