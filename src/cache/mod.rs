//! Cross-pass metadata cache.
//!
//! Persists interface models (never generated code) keyed by content
//! signatures. One producer pass writes the file; any number of consumer
//! passes read it back and skip re-analysis while the source is unchanged.
//! Every defect on the read side (absent file, parse failure, version
//! mismatch, missing source, stale signature) is a silent cache miss.

pub mod signature;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::CacheRole;
use crate::core::{
    DeclarationKind, FunctionModel, InterfaceModel, PropertyModel, SourceLocation,
    TypeParameterModel,
};
use crate::errors::{Error, Result};

pub use signature::{combined_signature, content_signature, file_signature};

/// Bumped whenever the serialized shape changes; a mismatch invalidates the
/// whole file.
pub const CACHE_SCHEMA_VERSION: u32 = 2;

/// One persisted interface model plus its source signature.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub qualified_name: String,
    pub simple_name: String,
    pub package_name: String,
    pub type_parameters: Vec<TypeParameterModel>,
    pub properties: Vec<PropertyModel>,
    pub functions: Vec<FunctionModel>,
    pub inherited_properties: Vec<PropertyModel>,
    pub inherited_functions: Vec<FunctionModel>,
    pub source_file_path: PathBuf,
    pub source_file_signature: String,
    pub analysis_time_nanos: u64,
    /// Implied by array placement in the file, not serialized.
    #[serde(skip, default = "default_kind")]
    pub kind: DeclarationKind,
}

fn default_kind() -> DeclarationKind {
    DeclarationKind::Interface
}

impl CacheEntry {
    pub fn from_model(model: &InterfaceModel) -> Self {
        Self {
            qualified_name: model.qualified_name(),
            simple_name: model.simple_name.clone(),
            package_name: model.package_name.clone(),
            type_parameters: model.type_parameters.clone(),
            properties: model.properties.clone(),
            functions: model.functions.clone(),
            inherited_properties: model.inherited_properties.clone(),
            inherited_functions: model.inherited_functions.clone(),
            source_file_path: model.location.file.clone(),
            source_file_signature: model.source_signature.clone(),
            analysis_time_nanos: model.analysis_time_nanos,
            kind: model.kind,
        }
    }

    /// Restore the model. Analysis time resets to 0: a restored model cost
    /// this pass nothing to analyze.
    pub fn into_model(self) -> InterfaceModel {
        InterfaceModel {
            simple_name: self.simple_name,
            package_name: self.package_name,
            kind: self.kind,
            type_parameters: self.type_parameters,
            properties: self.properties,
            functions: self.functions,
            inherited_properties: self.inherited_properties,
            inherited_functions: self.inherited_functions,
            location: SourceLocation::new(self.source_file_path, 0, 0),
            source_signature: self.source_file_signature,
            analysis_time_nanos: 0,
        }
    }
}

/// On-disk shape: `{version, combinedSignature, interfaces[], classes[]}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    version: u32,
    combined_signature: String,
    written_at: DateTime<Utc>,
    interfaces: Vec<CacheEntry>,
    classes: Vec<CacheEntry>,
}

/// Cache hit/miss accounting for one process.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// The metadata cache component. Role is explicit, immutable constructor
/// state, so producer and consumer are unit-testable in one process.
#[derive(Debug)]
pub struct MetadataCache {
    role: CacheRole,
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    store: im::HashMap<String, CacheEntry>,
    loaded: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MetadataCache {
    pub fn new(
        role: CacheRole,
        input_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
    ) -> Self {
        Self {
            role,
            input_path,
            output_path,
            store: im::HashMap::new(),
            loaded: false,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn role(&self) -> CacheRole {
        self.role
    }

    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// Attempt to populate the store from the input file.
    ///
    /// Returns `true` with a populated store on success and `false` with an
    /// empty store on any defect. A successful load is sticky: calling again
    /// returns `true` without re-reading or duplicating entries.
    pub fn load(&mut self) -> bool {
        if self.loaded {
            return true;
        }
        if self.role != CacheRole::Consumer {
            return false;
        }
        let Some(path) = self.input_path.clone() else {
            return false;
        };

        match self.try_load(&path) {
            Some(entries) => {
                self.store = entries
                    .into_iter()
                    .map(|e| (e.qualified_name.clone(), e))
                    .collect();
                self.loaded = true;
                debug!("metadata cache loaded: {} entries", self.store.len());
                true
            }
            None => {
                self.store = im::HashMap::new();
                false
            }
        }
    }

    /// All-or-nothing validation: any single invalid entry rejects the file.
    fn try_load(&self, path: &Path) -> Option<Vec<CacheEntry>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("cache miss: cannot read {}: {e}", path.display());
                return None;
            }
        };

        let file: CacheFile = match serde_json::from_slice(&bytes) {
            Ok(file) => file,
            Err(e) => {
                debug!("cache miss: unparsable {}: {e}", path.display());
                return None;
            }
        };

        if file.version != CACHE_SCHEMA_VERSION {
            debug!(
                "cache miss: schema version {} != {}",
                file.version, CACHE_SCHEMA_VERSION
            );
            return None;
        }

        let mut entries = Vec::with_capacity(file.interfaces.len() + file.classes.len());
        for mut entry in file.interfaces {
            entry.kind = DeclarationKind::Interface;
            entries.push(entry);
        }
        for mut entry in file.classes {
            entry.kind = DeclarationKind::AbstractClass;
            entries.push(entry);
        }

        // Recompute every source signature fresh; recorded values are never
        // trusted blindly.
        let mut signatures = Vec::with_capacity(entries.len());
        for entry in &entries {
            let live = match signature::file_signature(&entry.source_file_path) {
                Ok(live) => live,
                Err(_) => {
                    debug!(
                        "cache miss: source missing for {}",
                        entry.qualified_name
                    );
                    return None;
                }
            };
            if live != entry.source_file_signature {
                debug!("cache miss: stale signature for {}", entry.qualified_name);
                return None;
            }
            signatures.push(entry.source_file_signature.clone());
        }

        let combined = signature::combined_signature(&signatures);
        if combined != file.combined_signature {
            debug!("cache miss: combined signature mismatch");
            return None;
        }

        Some(entries)
    }

    /// Look up a model by qualified name, accepting it only when the live
    /// source signature still matches the recorded one.
    pub fn lookup(&self, qualified_name: &str, live_signature: &str) -> Option<InterfaceModel> {
        match self.store.get(qualified_name) {
            Some(entry) if entry.source_file_signature == live_signature => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.clone().into_model())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Record a model for the producer pass. No-op in any other role.
    pub fn record(&mut self, model: &InterfaceModel) {
        if self.role != CacheRole::Producer {
            return;
        }
        let entry = CacheEntry::from_model(model);
        self.store = self.store.update(entry.qualified_name.clone(), entry);
    }

    /// Serialize the store and atomically replace the output file.
    ///
    /// No-op unless role is producer and the store is non-empty. Writes to
    /// a unique temporary path then renames, so a concurrent reader sees
    /// either the old or the new file, never a partial one.
    pub fn write(&self) -> Result<()> {
        if self.role != CacheRole::Producer || self.store.is_empty() {
            return Ok(());
        }
        let path = self
            .output_path
            .as_ref()
            .ok_or_else(|| Error::cache("producer role requires a cache output path"))?;

        let mut interfaces = Vec::new();
        let mut classes = Vec::new();
        let mut signatures = Vec::with_capacity(self.store.len());
        let mut entries: Vec<&CacheEntry> = self.store.values().collect();
        entries.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        for entry in entries {
            signatures.push(entry.source_file_signature.clone());
            match entry.kind {
                DeclarationKind::Interface => interfaces.push(entry.clone()),
                DeclarationKind::AbstractClass => classes.push(entry.clone()),
            }
        }

        let file = CacheFile {
            version: CACHE_SCHEMA_VERSION,
            combined_signature: signature::combined_signature(&signatures),
            written_at: Utc::now(),
            interfaces,
            classes,
        };

        let data = serde_json::to_vec_pretty(&file)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = create_safe_temp_path(path);
        std::fs::write(&temp_path, &data).map_err(|e| Error::io(&temp_path, e))?;
        std::fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        debug!(
            "metadata cache written: {} entries to {}",
            self.store.len(),
            path.display()
        );
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.store.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Unique temporary path next to the target, so the final rename stays on
/// one filesystem.
fn create_safe_temp_path(target_path: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    let process_id = std::process::id();

    let temp_name = format!(
        "{}.tmp.{}.{}.{}",
        target_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cache"),
        process_id,
        timestamp,
        counter
    );

    target_path.with_file_name(temp_name)
}
