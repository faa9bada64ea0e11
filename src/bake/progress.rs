use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::core::BakePhase;

/// Observer of a running bake.
///
/// `enter_phase` fires on every transition, including the terminal one. `is_cancelled` is polled
/// at each phase boundary; once it returns `true` the bake stops with `Cancelled` and releases
/// whatever it holds.
pub trait BakeProgress {
    /// Called when the bake enters `phase`.
    fn enter_phase(&mut self, phase: BakePhase) {
        let _ = phase;
    }

    /// Whether the requester asked to stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Progress observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl BakeProgress for NoProgress {}

/// Cloneable cancellation flag, shareable across threads.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl BakeProgress for CancelToken {
    fn enter_phase(&mut self, phase: BakePhase) {
        tracing::debug!(%phase, "bake phase");
    }

    fn is_cancelled(&self) -> bool {
        CancelToken::is_cancelled(self)
    }
}
