//! Generic pattern classification and usage inference.
//!
//! `classify` is the hard contract; `validate` is non-fatal and only logs.
//! Usage inference is best-effort enrichment: method-level type parameters
//! are erased to a common bound during generation, and detections only
//! decide whether a specialized handler is worth emitting.

use std::collections::BTreeSet;

use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::core::{
    FunctionModel, GenericPattern, InterfaceModel, TransformationPair, TypeDescriptor,
};

/// Common primitive and domain-suffix names used to seed detected types.
/// A soft diagnostic hint, never a correctness-critical input.
static SEED_TYPE_NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "String", "Text", "Int", "Long", "Boolean", "Id", "Request", "Response", "Event",
    ]
});

/// Classify where an interface's type parameters are declared.
///
/// With C = interface-level type-parameter count and M = count of functions
/// declaring their own type parameters: C=0 ∧ M=0 → NoGenerics,
/// C>0 ∧ M=0 → ClassLevelGenerics, C=0 ∧ M>0 → MethodLevelGenerics,
/// C>0 ∧ M>0 → MixedGenerics.
pub fn classify(model: &InterfaceModel) -> GenericPattern {
    let class_level = !model.type_parameters.is_empty();
    let generic_functions: Vec<&FunctionModel> =
        model.all_functions().filter(|f| f.is_generic()).collect();
    let method_level = !generic_functions.is_empty();

    let pattern = match (class_level, method_level) {
        (false, false) => GenericPattern::NoGenerics,
        (true, false) => GenericPattern::ClassLevelGenerics {
            type_parameters: model.type_parameters.clone(),
            constraints: render_constraints(model),
        },
        (false, true) => {
            let inference = infer_usage(model, &generic_functions);
            GenericPattern::MethodLevelGenerics {
                generic_functions: function_names(&generic_functions),
                detected_types: inference.detected_types,
                transformation_pairs: inference.transformation_pairs,
            }
        }
        (true, true) => {
            let inference = infer_usage(model, &generic_functions);
            GenericPattern::MixedGenerics {
                type_parameters: model.type_parameters.clone(),
                constraints: render_constraints(model),
                generic_functions: function_names(&generic_functions),
                detected_types: inference.detected_types,
                transformation_pairs: inference.transformation_pairs,
            }
        }
    };

    debug!(
        "classified {} as {} ({} detected types)",
        model.qualified_name(),
        pattern,
        pattern.detected_types().len()
    );

    pattern
}

/// Check structural consistency between a pattern and its model. Never
/// fatal: mismatches are returned and logged as warnings, and processing
/// continues with best-effort classification.
pub fn validate(pattern: &GenericPattern, model: &InterfaceModel) -> Vec<String> {
    let mut warnings = Vec::new();
    let class_count = model.type_parameters.len();
    let method_count = model.generic_function_count();

    match pattern {
        GenericPattern::NoGenerics => {
            if class_count > 0 || method_count > 0 {
                warnings.push(format!(
                    "{}: classified NoGenerics but model declares {} class-level and {} method-level type parameters",
                    model.qualified_name(),
                    class_count,
                    method_count
                ));
            }
        }
        GenericPattern::ClassLevelGenerics { type_parameters, .. } => {
            if type_parameters.is_empty() {
                warnings.push(format!(
                    "{}: ClassLevelGenerics must carry at least one type parameter",
                    model.qualified_name()
                ));
            }
            if method_count > 0 {
                warnings.push(format!(
                    "{}: classified ClassLevelGenerics but {} functions declare their own type parameters",
                    model.qualified_name(),
                    method_count
                ));
            }
        }
        GenericPattern::MethodLevelGenerics { generic_functions, .. } => {
            if generic_functions.is_empty() {
                warnings.push(format!(
                    "{}: MethodLevelGenerics must carry at least one generic function",
                    model.qualified_name()
                ));
            }
            if class_count > 0 {
                warnings.push(format!(
                    "{}: classified MethodLevelGenerics but model declares {} class-level type parameters",
                    model.qualified_name(),
                    class_count
                ));
            }
        }
        GenericPattern::MixedGenerics {
            type_parameters,
            generic_functions,
            ..
        } => {
            if type_parameters.is_empty() || generic_functions.is_empty() {
                warnings.push(format!(
                    "{}: MixedGenerics must carry both class-level and method-level type parameters",
                    model.qualified_name()
                ));
            }
        }
    }

    for warning in &warnings {
        warn!("{warning}");
    }

    warnings
}

fn function_names(functions: &[&FunctionModel]) -> Vec<String> {
    functions.iter().map(|f| f.name.clone()).collect()
}

fn render_constraints(model: &InterfaceModel) -> Vec<String> {
    model
        .type_parameters
        .iter()
        .filter(|tp| !tp.bounds.is_empty())
        .map(|tp| {
            let bounds: Vec<String> = tp.bounds.iter().map(|b| b.render()).collect();
            format!("{}: {}", tp.name, bounds.join(" + "))
        })
        .collect()
}

struct UsageInference {
    detected_types: Vec<String>,
    transformation_pairs: Vec<TransformationPair>,
}

/// Scan generic function signatures for concrete named types and for
/// "input uses A, return uses B" transformation shapes.
fn infer_usage(model: &InterfaceModel, generic_functions: &[&FunctionModel]) -> UsageInference {
    let mut detected: BTreeSet<String> = BTreeSet::new();
    let mut scanned_names: Vec<String> = Vec::new();
    let mut pairs = Vec::new();

    for function in generic_functions {
        let own_params: BTreeSet<&str> = function
            .type_parameters
            .iter()
            .map(|tp| tp.name.as_str())
            .collect();

        for parameter in &function.parameters {
            collect_concrete_names(&parameter.ty, &own_params, model, &mut detected, &mut scanned_names);
        }
        collect_concrete_names(
            &function.return_type,
            &own_params,
            model,
            &mut detected,
            &mut scanned_names,
        );

        if function.type_parameters.len() >= 2 {
            if let Some(pair) = detect_transformation(function) {
                pairs.push(pair);
            }
        }
    }

    // Supplement with seed names that show up as substrings of anything
    // scanned, so e.g. `UserId` also marks `Id` as worth handling.
    for seed in SEED_TYPE_NAMES.iter() {
        if scanned_names.iter().any(|name| name.contains(seed)) {
            detected.insert((*seed).to_string());
        }
    }

    UsageInference {
        detected_types: detected.into_iter().collect(),
        transformation_pairs: pairs,
    }
}

fn collect_concrete_names(
    ty: &TypeDescriptor,
    own_params: &BTreeSet<&str>,
    model: &InterfaceModel,
    detected: &mut BTreeSet<String>,
    scanned: &mut Vec<String>,
) {
    let class_params: BTreeSet<&str> = model
        .type_parameters
        .iter()
        .map(|tp| tp.name.as_str())
        .collect();

    ty.walk(&mut |t| {
        if let TypeDescriptor::Named { name, .. } = t {
            scanned.push(name.clone());
            if !own_params.contains(name.as_str()) && !class_params.contains(name.as_str()) {
                detected.insert(name.clone());
            }
        }
    });
}

/// Detect an "input uses A, return uses B" shape: some parameter mentions
/// one own type parameter, the return type mentions a different one.
fn detect_transformation(function: &FunctionModel) -> Option<TransformationPair> {
    let own: Vec<&str> = function
        .type_parameters
        .iter()
        .map(|tp| tp.name.as_str())
        .collect();

    let input = function
        .parameters
        .iter()
        .find_map(|p| first_parameter_use(&p.ty, &own));
    let output = first_parameter_use(&function.return_type, &own);

    match (input, output) {
        (Some(input), Some(output)) if input != output => Some(TransformationPair {
            function_name: function.name.clone(),
            input_parameter: input,
            output_parameter: output,
        }),
        _ => None,
    }
}

fn first_parameter_use(ty: &TypeDescriptor, own: &[&str]) -> Option<String> {
    let mut found = None;
    ty.walk(&mut |t| {
        if found.is_none() {
            if let TypeDescriptor::Parameter { name } = t {
                if own.contains(&name.as_str()) {
                    found = Some(name.clone());
                }
            }
        }
    });
    found
}
