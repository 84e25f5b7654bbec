//! Pass telemetry: timing/size aggregation and the tree-shaped report.
//!
//! The aggregator is the one piece of shared mutable state touched by every
//! parallel generation task, so contributions go through `DashMap` entries
//! and atomics; rendering happens once at the end of the pass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::config::Verbosity;

/// Per-interface contribution recorded by one generation task.
#[derive(Clone, Debug, Serialize)]
pub struct InterfaceRecord {
    pub qualified_name: String,
    pub analysis: Duration,
    pub generation: Duration,
    pub generated_lines: usize,
    pub generated_bytes: usize,
    pub cached: bool,
}

/// Thread-safe accumulator for one generation pass.
pub struct TelemetryAggregator {
    prefix: String,
    verbosity: Verbosity,
    records: DashMap<String, InterfaceRecord>,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    started: Instant,
}

impl TelemetryAggregator {
    pub fn new(prefix: impl Into<String>, verbosity: Verbosity) -> Self {
        Self {
            prefix: prefix.into(),
            verbosity,
            records: DashMap::new(),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one freshly analyzed and generated interface.
    pub fn record_generated(&self, record: InterfaceRecord) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        self.records.insert(record.qualified_name.clone(), record);
    }

    /// Record an interface served from the metadata cache.
    pub fn record_cached(&self, qualified_name: &str, generation: Duration, lines: usize) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.records.insert(
            qualified_name.to_string(),
            InterfaceRecord {
                qualified_name: qualified_name.to_string(),
                analysis: Duration::ZERO,
                generation,
                generated_lines: lines,
                generated_bytes: 0,
                cached: true,
            },
        );
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Render the report. A pass where everything came from the cache
    /// collapses to a single summary line with no per-interface sub-tree.
    pub fn render(&self) -> String {
        let total = self.records.len();
        let hits = self.cache_hits.load(Ordering::Relaxed) as usize;

        if total > 0 && hits == total {
            return format!("{}: {} fakes (all cached)", self.prefix, total);
        }

        let mut out = String::new();
        // Records dedupe by qualified name while the hit counter does not,
        // so the difference can go negative on duplicate inputs.
        let generated = total.saturating_sub(hits);
        out.push_str(&format!(
            "{}: {} fakes ({} generated, {} cached) in {}",
            self.prefix,
            total,
            generated,
            hits,
            format_duration(self.started.elapsed())
        ));

        let mut fresh: Vec<InterfaceRecord> = self
            .records
            .iter()
            .filter(|r| !r.value().cached)
            .map(|r| r.value().clone())
            .collect();
        fresh.sort_by(|a, b| b.generation.cmp(&a.generation));

        for (i, record) in fresh.iter().enumerate() {
            let branch = if i + 1 == fresh.len() { "└─" } else { "├─" };
            out.push('\n');
            out.push_str(&format!(
                "{branch} {}: {} lines",
                record.qualified_name, record.generated_lines
            ));
            if self.verbosity >= Verbosity::Debug {
                out.push_str(&format!(
                    " ({} analysis, {} generation",
                    format_duration(record.analysis),
                    format_duration(record.generation)
                ));
                if self.verbosity >= Verbosity::Trace {
                    out.push_str(&format!(", {} bytes", record.generated_bytes));
                }
                out.push(')');
            }
        }

        out
    }

    /// Emit the report through the logger, honoring Quiet.
    pub fn log_report(&self) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        for line in self.render().lines() {
            log::info!("{line}");
        }
    }
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.0}µs", d.as_secs_f64() * 1_000_000.0)
    }
}
