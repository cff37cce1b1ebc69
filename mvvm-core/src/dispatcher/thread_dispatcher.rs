use std::fmt::{Debug, Formatter};
use std::ops::Not;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{JoinHandle, ThreadId};

use anyhow::Context;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, trace};

use crate::config::mvvm_config::DispatcherConfig;
use crate::dispatcher::{call, ExecutionContext, Work};
use crate::error::{Error, Result};
use crate::ext::panic_message;

/// An [`ExecutionContext`] backed by one dedicated OS thread that runs work
/// in the order it was posted, the way a UI main loop does.
///
/// Handles are cheap to clone. The thread exits once [`shutdown`](Self::shutdown)
/// is called or every handle is dropped. `send` and `invoke` park the calling
/// thread until the work finished, including when called from an async task.
#[derive(Clone)]
pub struct ThreadDispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    thread_id: ThreadId,
    tx: RwLock<Option<UnboundedSender<Work>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadDispatcher {
    pub fn new(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        let (tx, rx) = unbounded_channel();
        let loop_name = name.clone();
        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || Self::run(loop_name, rx))
            .with_context(|| format!("failed to spawn dispatcher thread {}", name))?;
        let inner = Inner {
            name,
            thread_id: handle.thread().id(),
            tx: RwLock::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    pub fn with_config(config: &DispatcherConfig) -> anyhow::Result<Self> {
        Self::new(config.thread_name.clone())
    }

    fn run(name: String, mut rx: UnboundedReceiver<Work>) {
        debug!("dispatcher {} started", name);
        while let Some(work) = rx.blocking_recv() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(work)) {
                error!("work on dispatcher {} panicked: {}", name, panic_message(payload.as_ref()));
            }
        }
        debug!("dispatcher {} stopped", name);
    }

    /// Run `f` on the dispatcher thread and hand its result back.
    pub fn invoke<F, R>(&self, f: F) -> Result<R>
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
    {
        call(self, f)
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.tx.read().is_none()
    }

    /// Stop accepting work, let the queued work drain and wait for the thread
    /// to finish. Calling it from the dispatcher thread only closes the queue.
    pub fn shutdown(&self) {
        let tx = self.inner.tx.write().take();
        if tx.is_none() {
            return;
        }
        drop(tx);
        if self.is_current().not() {
            if let Some(handle) = self.inner.handle.lock().take() {
                if handle.join().is_err() {
                    error!("dispatcher {} thread panicked", self.inner.name);
                }
            }
        }
        debug!("dispatcher {} shutdown", self.inner.name);
    }
}

impl ExecutionContext for ThreadDispatcher {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn is_current(&self) -> bool {
        std::thread::current().id() == self.inner.thread_id
    }

    fn post(&self, work: Work) -> Result<()> {
        let tx = self.inner.tx.read();
        match tx.as_ref() {
            Some(tx) => {
                tx.send(work).map_err(|_| Error::ContextClosed(self.inner.name.clone()))?;
                trace!("post work to dispatcher {}", self.inner.name);
                Ok(())
            }
            None => Err(Error::ContextClosed(self.inner.name.clone())),
        }
    }

    fn send(&self, work: Work) -> Result<()> {
        call(self, work)
    }
}

impl Debug for ThreadDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadDispatcher")
            .field("name", &self.inner.name)
            .field("thread_id", &self.inner.thread_id)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
