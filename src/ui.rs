use tokio::sync::oneshot;

use crate::error::DispatchError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the thread that owns the UI loop. Toasts must be shown from
/// this thread, and the dispatcher marshals full notification construction
/// onto it as well; `run` suspends the caller until the closure has
/// executed there.
///
/// Dropping the last handle closes the job queue and lets the thread exit.
#[derive(Clone)]
pub struct UiContext {
    tx: async_channel::Sender<Job>,
}

impl UiContext {
    /// Spawn the UI-owning thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> Result<Self, DispatchError> {
        let (tx, rx) = async_channel::unbounded::<Job>();
        std::thread::Builder::new()
            .name("ui-loop".to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv_blocking() {
                    job();
                }
            })
            .map_err(|_| DispatchError::UiContextClosed)?;
        Ok(Self { tx })
    }

    /// Run `job` on the UI thread and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the UI thread is gone.
    pub async fn run<T, F>(&self, job: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let wrapped: Job = Box::new(move || {
            let _ = reply_tx.send(job());
        });
        self.tx
            .send(wrapped)
            .await
            .map_err(|_| DispatchError::UiContextClosed)?;
        reply_rx.await.map_err(|_| DispatchError::UiContextClosed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::UiContext;

    #[tokio::test]
    async fn run_executes_on_the_ui_thread_and_returns() {
        let ui = UiContext::spawn().unwrap();
        let caller = std::thread::current().id();
        let (value, ui_thread) = ui
            .run(move || (21 * 2, std::thread::current().id()))
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_ne!(ui_thread, caller);
    }

    #[tokio::test]
    async fn jobs_run_in_submission_order() {
        let ui = UiContext::spawn().unwrap();
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..4 {
            let log = log.clone();
            ui.run(move || log.lock().unwrap().push(i)).await.unwrap();
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
