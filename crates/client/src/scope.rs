//! View-scoped cancellation

use crate::error::{ClientError, ClientResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Ties requests to the view that issued them.
///
/// Once [`leave`](Self::leave) is called, pending and later requests run
/// through the scope resolve to [`ClientError::Cancelled`] instead of their
/// real outcome. Clones share the same scope.
#[derive(Debug, Clone)]
pub struct ViewScope {
    left: Arc<watch::Sender<bool>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (left, _) = watch::channel(false);
        Self {
            left: Arc::new(left),
        }
    }

    pub fn leave(&self) {
        self.left.send_replace(true);
    }

    pub fn is_left(&self) -> bool {
        *self.left.borrow()
    }

    pub async fn run<F, T>(&self, request: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if self.is_left() {
            return Err(ClientError::Cancelled);
        }
        let mut left = self.left.subscribe();
        tokio::select! {
            result = request => {
                if self.is_left() {
                    Err(ClientError::Cancelled)
                } else {
                    result
                }
            }
            _ = left.wait_for(|gone| *gone) => Err(ClientError::Cancelled),
        }
    }
}
