/*!
# Cooperative Cancellation

None of the algorithms in this crate are preemptible. Instead, every loop whose trip count
depends on the instance size polls a shared [`CancelToken`] through a [`Ticker`] and unwinds
with [`Cancelled`] once the token was set (typically by the
[`TaskRunner`](crate::runner::TaskRunner) after the instance deadline elapsed).

```
use mipgraphs::cancel::*;

let token = CancelToken::new();
let mut ticker = token.ticker();
assert!(ticker.tick().is_ok());

token.cancel();
assert_eq!((0..CHECK_STRIDE).map(|_| ticker.tick()).find(|r| r.is_err()), Some(Err(Cancelled)));
```
*/

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// A [`Ticker`] inspects its token every `CHECK_STRIDE` ticks
pub const CHECK_STRIDE: usize = 10;

/// Raised by an algorithm that observed a cancelled token.
/// Not an error in the usual sense: it is the normal termination mode of a timed-out instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("computation was cancelled")]
pub struct Cancelled;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every computation polling this token
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns *true* if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Returns `Err(Cancelled)` if cancellation was requested
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Creates a fresh [`Ticker`] for a single loop
    pub fn ticker(&self) -> Ticker<'_> {
        Ticker {
            token: self,
            count: 0,
        }
    }
}

/// Iteration counter that polls its [`CancelToken`] at a fixed stride.
#[derive(Debug)]
pub struct Ticker<'a> {
    token: &'a CancelToken,
    count: usize,
}

impl Ticker<'_> {
    /// Counts one iteration; every [`CHECK_STRIDE`]-th call inspects the token.
    pub fn tick(&mut self) -> Result<(), Cancelled> {
        self.count += 1;
        if self.count % CHECK_STRIDE == 0 {
            self.token.check()
        } else {
            Ok(())
        }
    }

    /// Number of ticks counted so far
    pub fn count(&self) -> usize {
        self.count
    }
}
