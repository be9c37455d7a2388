pub mod calendar_loop;
pub mod context;
pub mod scheduler;
pub mod status_loop;
pub mod task_runner;
