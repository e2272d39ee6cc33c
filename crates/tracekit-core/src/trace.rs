//! Structured trace sinks.
//!
//! Engine entry points come in a plain form and a `_traced` form. The traced
//! form writes intermediate measurements (radial variation, corner counts,
//! sub-scores, ...) to a caller-supplied [`TraceSink`]. The plain form passes
//! [`NoTrace`], so production callers pay nothing for the trace.

use serde::{Deserialize, Serialize};

/// Receives named intermediate measurements from an evaluation.
pub trait TraceSink {
    /// Records one measurement. `stage` names the algorithm producing it
    /// (`"classifier"`, `"free_copy"`, ...), `key` names the quantity.
    fn record(&mut self, stage: &'static str, key: &'static str, value: f64);

    /// Records a boolean flag as `1.0` / `0.0`.
    fn flag(&mut self, stage: &'static str, key: &'static str, value: bool) {
        self.record(stage, key, if value { 1.0 } else { 0.0 });
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _stage: &'static str, _key: &'static str, _value: f64) {}
}

/// One recorded measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub stage: String,
    pub key: String,
    pub value: f64,
}

/// In-memory accumulator, mainly for tests and offline analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest value recorded for `stage`/`key`, if any.
    pub fn get(&self, stage: &str, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.stage == stage && e.key == key)
            .map(|e| e.value)
    }

    /// All entries recorded by one stage, in recording order.
    pub fn stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.entries.iter().filter(move |e| e.stage == stage)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, stage: &'static str, key: &'static str, value: f64) {
        self.entries.push(TraceEntry {
            stage: stage.to_string(),
            key: key.to_string(),
            value,
        });
    }
}

/// Forwards every measurement to `tracing` at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, stage: &'static str, key: &'static str, value: f64) {
        tracing::trace!(stage, key, value, "evaluation measurement");
    }
}
