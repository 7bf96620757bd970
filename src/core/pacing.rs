//! Pacing between beats and run cancellation
//!
//! The sequencer never sleeps directly. It hands each pause to a [`Pacer`],
//! so the binary can wait on the tokio clock while tests skip the wait.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay primitive awaited between beats
#[async_trait]
pub trait Pacer: Send {
    async fn wait(&mut self, pause: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn wait(&mut self, pause: Duration) {
        tokio::time::sleep(pause).await;
    }
}

/// Records requested pauses and returns immediately
#[derive(Debug, Clone, Default)]
pub struct InstantPacer {
    pub pauses: Vec<Duration>,
}

impl InstantPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

#[async_trait]
impl Pacer for InstantPacer {
    async fn wait(&mut self, pause: Duration) {
        self.pauses.push(pause);
    }
}

/// Shared stop signal, checked by the sequencer before each beat
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
