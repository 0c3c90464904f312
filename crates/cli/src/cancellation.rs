//! Ctrl+C handling for network commands.
//!
//! `main` installs the signal listener and cancels a shared
//! [`CancellationToken`]; each command races its request against
//! [`CancellationToken::cancelled`] and returns [`Cancelled`], which `main`
//! maps to exit code 130. Dropping the request future drops the HTTP call;
//! nothing is aborted on the console side.
//!
//! Once cancelled, a token stays cancelled.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Request cancellation. Repeated calls are no-ops.
    pub fn cancel(&self) {
        self.state.send_if_modified(|cancelled| !std::mem::replace(cancelled, true));
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called, immediately if
    /// it already was.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Error returned by a command interrupted with Ctrl+C.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cancelled")
    }
}

impl std::error::Error for Cancelled {}

pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}
