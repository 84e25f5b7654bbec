//! Pass orchestration: cache consult, classification, generation, output.
//!
//! Distinct interfaces are independent, so the pass fans out with rayon;
//! the only shared mutable state is the metadata cache store and the
//! telemetry accumulator. Each interface completes or fails atomically.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rayon::prelude::*;

use crate::analyzer;
use crate::cache::MetadataCache;
use crate::config::{CacheRole, GeneratorConfig};
use crate::core::InterfaceModel;
use crate::errors::Result;
use crate::generator::{self, naming};
use crate::io::OutputWriter;
use crate::telemetry::{InterfaceRecord, TelemetryAggregator};

/// Outcome of one generation pass.
#[derive(Debug)]
pub struct PassSummary {
    pub total: usize,
    pub generated: usize,
    pub cache_hits: usize,
    pub written_files: Vec<PathBuf>,
    pub report: String,
}

pub struct Engine {
    config: GeneratorConfig,
    cache: RwLock<MetadataCache>,
    writer: OutputWriter,
}

impl Engine {
    pub fn new(config: GeneratorConfig) -> Self {
        let cache = MetadataCache::new(
            config.cache_role,
            config.cache_input_path.clone(),
            config.cache_output_path.clone(),
        );
        let writer = OutputWriter::new(&config.output_dir);
        Self {
            config,
            cache: RwLock::new(cache),
            writer,
        }
    }

    /// Run one pass over a batch of interface models.
    pub fn run(&self, models: &[InterfaceModel]) -> Result<PassSummary> {
        self.writer.ensure_output_dir()?;

        if self.config.cache_role == CacheRole::Consumer {
            // All defects inside load() are silent misses.
            self.cache.write().load();
        }

        let telemetry =
            TelemetryAggregator::new(&self.config.report_prefix, self.config.verbosity);

        let written_files: Vec<PathBuf> = models
            .par_iter()
            .map(|model| self.process(model, &telemetry))
            .collect::<Result<Vec<_>>>()?;

        if self.config.cache_role == CacheRole::Producer {
            let mut cache = self.cache.write();
            for model in models {
                cache.record(model);
            }
            cache.write()?;
        }

        telemetry.log_report();

        let total = models.len();
        let cache_hits = telemetry.cache_hits() as usize;
        Ok(PassSummary {
            total,
            generated: total.saturating_sub(cache_hits),
            cache_hits,
            written_files,
            report: telemetry.render(),
        })
    }

    fn process(
        &self,
        model: &InterfaceModel,
        telemetry: &TelemetryAggregator,
    ) -> Result<PathBuf> {
        let restored = if self.config.cache_role == CacheRole::Consumer {
            self.cache
                .read()
                .lookup(&model.qualified_name(), &model.source_signature)
        } else {
            None
        };
        let cached = restored.is_some();
        let model = restored.as_ref().unwrap_or(model);

        let analysis_started = Instant::now();
        let pattern = analyzer::classify(model);
        analyzer::validate(&pattern, model);
        let analysis = analysis_started.elapsed() + Duration::from_nanos(model.analysis_time_nanos);

        let generation_started = Instant::now();
        let artifacts = generator::generate(model, &pattern)?;
        let body = generator::render_file(model, &artifacts);
        let path = self
            .writer
            .write_source_file(&naming::file_name(&model.simple_name), &body)?;
        let generation = generation_started.elapsed();

        if cached {
            telemetry.record_cached(
                &model.qualified_name(),
                generation,
                artifacts.metrics.total_lines,
            );
        } else {
            telemetry.record_generated(InterfaceRecord {
                qualified_name: model.qualified_name(),
                analysis,
                generation,
                generated_lines: artifacts.metrics.total_lines,
                generated_bytes: artifacts.metrics.total_bytes,
                cached: false,
            });
        }

        Ok(path)
    }
}
