pub mod greeting;
pub mod tasks;

pub use greeting::render_greeting;
pub use tasks::{LocalizedTask, TaskContext, TaskError, TaskRunner};
