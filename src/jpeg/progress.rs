// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Block progress and cancellation for a running encode or decode.
//!
//! A [`Progress`] is a cheap-to-clone handle around shared atomics, so a UI
//! thread can poll it or cancel while rayon workers advance it. Progress is
//! counted in 8×8 blocks across all three planes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::error::{CodecError, Result};

#[derive(Debug, Default)]
struct State {
    step: AtomicU64,
    total: AtomicU64,
    cancelled: AtomicBool,
}

/// Shared progress counter with a cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    state: Arc<State>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the step to zero and set the total.
    ///
    /// A pending cancellation is kept: cancelling before the codec starts
    /// aborts it before the first chunk.
    pub fn init(&self, total: u64) {
        self.state.step.store(0, Ordering::Relaxed);
        self.state.total.store(total, Ordering::Relaxed);
    }

    /// Advance by `blocks` finished blocks. The step never passes the total.
    pub fn advance(&self, blocks: u64) {
        let total = self.state.total.load(Ordering::Relaxed);
        let _ = self
            .state
            .step
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                Some(s.saturating_add(blocks).min(total))
            });
    }

    /// Current `(step, total)`.
    pub fn get(&self) -> (u64, u64) {
        (
            self.state.step.load(Ordering::Relaxed),
            self.state.total.load(Ordering::Relaxed),
        )
    }

    /// Request cancellation. Chunks already running finish; no new chunk starts.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Err(CodecError::Cancelled)` once cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(CodecError::Cancelled)
        } else {
            Ok(())
        }
    }
}
