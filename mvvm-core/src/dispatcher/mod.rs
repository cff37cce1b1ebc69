use tokio::sync::oneshot;

use crate::error::{Error, Result};

pub mod thread_dispatcher;

/// A unit of work handed to an [`ExecutionContext`].
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// A place where work runs later, usually the thread that owns the UI.
///
/// Host frameworks adapt their own main loop by implementing this trait, the
/// aggregator only needs to hand work over and, for synchronous publishing,
/// wait until it finished.
pub trait ExecutionContext: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Whether the calling thread is the one this context runs work on.
    fn is_current(&self) -> bool;

    /// Queue `work` and return immediately.
    fn post(&self, work: Work) -> Result<()>;

    /// Run `work` on this context and block until it completed. Runs inline
    /// when called from the context's own thread. Must not panic when the
    /// caller is a thread driving an async runtime.
    fn send(&self, work: Work) -> Result<()>;
}

/// Run `f` on `context` and hand its result back, blocking the calling thread
/// until it completed.
///
/// The completion is awaited with [`futures::executor::block_on`], which parks
/// the current thread and is safe to call from inside a tokio task. Runs
/// inline when the caller already is on the context's thread.
pub fn call<C, F, R>(context: &C, f: F) -> Result<R>
    where
        C: ExecutionContext + ?Sized,
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
{
    if context.is_current() {
        return Ok(f());
    }
    let (tx, rx) = oneshot::channel();
    context.post(Box::new(move || {
        let _ = tx.send(f());
    }))?;
    futures::executor::block_on(rx).map_err(|_| Error::WorkAborted(context.name().to_string()))
}
