// Export modules for library usage
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod io;
pub mod resolver;
pub mod runtime;
pub mod telemetry;
pub mod testing;

// Re-export commonly used types
pub use crate::core::{
    DeclarationKind, FunctionModel, GeneratedArtifactSet, GenericPattern, InterfaceModel,
    ParameterModel, PropertyModel, SourceLocation, TransformationPair, TypeDescriptor,
    TypeParameterModel,
};

pub use crate::analyzer::{classify, validate};
pub use crate::cache::{MetadataCache, CACHE_SCHEMA_VERSION};
pub use crate::config::{CacheRole, GeneratorConfig, Verbosity};
pub use crate::engine::{Engine, PassSummary};
pub use crate::errors::{Error, Result};
pub use crate::generator::generate;
pub use crate::resolver::{default_expression, resolve, ResolvedDefault, TypeCategory};
pub use crate::runtime::InvocationCounter;
pub use crate::telemetry::TelemetryAggregator;
