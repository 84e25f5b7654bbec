//! Generic shape classification for an interface model.
//!
//! A closed variant set rather than a boolean-flag struct, so generator
//! branching is exhaustiveness-checked by `match`.

use serde::{Deserialize, Serialize};

use super::TypeParameterModel;

/// Where an interface's type parameters are declared. Exclusive variants;
/// derived from an `InterfaceModel` and recomputed if the model changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum GenericPattern {
    NoGenerics,
    ClassLevelGenerics {
        type_parameters: Vec<TypeParameterModel>,
        /// Rendered bound constraints, e.g. `T: Clone`.
        constraints: Vec<String>,
    },
    MethodLevelGenerics {
        /// Names of the functions declaring their own type parameters.
        generic_functions: Vec<String>,
        /// Concrete named types observed in generic signatures, plus seeds.
        detected_types: Vec<String>,
        transformation_pairs: Vec<TransformationPair>,
    },
    MixedGenerics {
        type_parameters: Vec<TypeParameterModel>,
        constraints: Vec<String>,
        generic_functions: Vec<String>,
        detected_types: Vec<String>,
        transformation_pairs: Vec<TransformationPair>,
    },
}

impl GenericPattern {
    pub fn has_method_level(&self) -> bool {
        matches!(
            self,
            Self::MethodLevelGenerics { .. } | Self::MixedGenerics { .. }
        )
    }

    pub fn class_type_parameters(&self) -> &[TypeParameterModel] {
        match self {
            Self::ClassLevelGenerics { type_parameters, .. }
            | Self::MixedGenerics { type_parameters, .. } => type_parameters,
            _ => &[],
        }
    }

    pub fn generic_function_names(&self) -> &[String] {
        match self {
            Self::MethodLevelGenerics { generic_functions, .. }
            | Self::MixedGenerics { generic_functions, .. } => generic_functions,
            _ => &[],
        }
    }

    pub fn detected_types(&self) -> &[String] {
        match self {
            Self::MethodLevelGenerics { detected_types, .. }
            | Self::MixedGenerics { detected_types, .. } => detected_types,
            _ => &[],
        }
    }

    pub fn transformation_pairs(&self) -> &[TransformationPair] {
        match self {
            Self::MethodLevelGenerics { transformation_pairs, .. }
            | Self::MixedGenerics { transformation_pairs, .. } => transformation_pairs,
            _ => &[],
        }
    }
}

impl std::fmt::Display for GenericPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NoGenerics => "NoGenerics",
            Self::ClassLevelGenerics { .. } => "ClassLevelGenerics",
            Self::MethodLevelGenerics { .. } => "MethodLevelGenerics",
            Self::MixedGenerics { .. } => "MixedGenerics",
        };
        write!(f, "{name}")
    }
}

/// An "input uses A, return uses B" shape detected on a function with at
/// least two of its own type parameters. A soft diagnostic hint only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransformationPair {
    pub function_name: String,
    pub input_parameter: String,
    pub output_parameter: String,
}
