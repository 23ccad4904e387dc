//! Cancellation signal shared between the unload hook and the monitor thread.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// A one-way "stop" flag that can also be slept on.
///
/// Clones share the same flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken
{
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    pub fn cancel(&self)
    {
        let (flag, wakeup) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool
    {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `timeout` or until cancelled, whichever comes first.
    ///
    /// Returns `true` if the token is cancelled on return.
    pub fn wait_timeout(&self, timeout: Duration) -> bool
    {
        let (flag, wakeup) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wakeup
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}
