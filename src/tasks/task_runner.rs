use std::future::Future;

use tokio::task::JoinHandle;
use tracing::warn;

/// Spawned background loops, kept so they can be awaited on shutdown.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push((name, tokio::spawn(task)));
    }

    pub async fn join_all(&mut self) {
        for (name, handle) in self.tasks.drain(..) {
            if let Err(err) = handle.await {
                warn!(task = name, error = %err, "background task ended abnormally");
            }
        }
    }
}
