use tokio::runtime::Handle;

use crate::error::Result;

/// Worker pool for blocking filesystem calls.
///
/// Wraps a tokio runtime handle and runs closures on its blocking pool, so
/// file syscalls never stall the scheduler thread. Pass one through
/// [`StreamOptions::executor`](crate::StreamOptions::executor) to pick the
/// runtime explicitly; otherwise the ambient runtime is used.
#[derive(Debug, Clone)]
pub struct Executor {
    handle: Handle,
}

impl Executor {
    pub fn new(handle: Handle) -> Self { Self { handle } }

    /// The runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self { Self::new(Handle::current()) }

    pub fn try_current() -> Option<Self> { Handle::try_current().ok().map(Self::new) }

    pub fn handle(&self) -> &Handle { &self.handle }

    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        Ok(self.handle.spawn_blocking(f).await?)
    }
}

impl From<Handle> for Executor {
    fn from(handle: Handle) -> Self { Self::new(handle) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_off_thread() {
        let caller = std::thread::current().id();
        let worker = Executor::current().run(|| std::thread::current().id()).await.unwrap();
        assert_ne!(caller, worker);
    }

    #[tokio::test]
    async fn test_run_reports_panics() {
        let result = Executor::current().run(|| -> u8 { panic!("boom") }).await;
        assert!(matches!(result, Err(crate::Error::Worker(_))));
    }

    #[test]
    fn test_try_current_outside_runtime() {
        assert!(Executor::try_current().is_none());
    }
}
