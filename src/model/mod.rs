pub mod task;
pub mod trace;

pub use task::{IssueRef, Task, TaskTag};
pub use trace::Trace;
