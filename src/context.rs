//! Per-run logging context.
//!
//! Stages never reach for a global logger configuration. They receive a
//! `RunContext` and open a child span for their work, so every log line carries
//! the run and stage it came from. The subscriber itself is installed once by
//! the binary (`init_tracing`).

use tracing::Span;
use tracing::span::EnteredSpan;

/// Logging context threaded through every pipeline stage.
#[derive(Debug, Clone)]
pub struct RunContext {
    span: Span,
}

impl RunContext {
    pub fn new(run: &str) -> Self {
        Self {
            span: tracing::info_span!("run", run = %run),
        }
    }

    /// Enter a child span for one stage; dropped when the stage returns.
    pub fn stage(&self, stage: &'static str) -> EnteredSpan {
        tracing::info_span!(parent: &self.span, "stage", stage).entered()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Install the global `tracing` subscriber (`RUST_LOG` overrides the `info` default).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A second init (e.g. library use inside a host that already set one) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
