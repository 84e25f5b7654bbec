//! Rule-based code generation: one interface model in, three artifacts out.
//!
//! Generation never aborts on an unrecognized type (the resolver guarantees
//! a fallback expression); only duplicate member names, which break field
//! derivation in the emitted file, and output I/O are fatal.

pub mod configuration;
pub mod factory;
pub mod implementation;
pub mod naming;
pub mod signatures;

use std::collections::HashSet;

use log::trace;

use crate::core::{ArtifactMetrics, GeneratedArtifactSet, GenericPattern, InterfaceModel};
use crate::errors::{Error, Result};

/// Generate all three artifacts for one interface model.
pub fn generate(model: &InterfaceModel, pattern: &GenericPattern) -> Result<GeneratedArtifactSet> {
    check_member_names(model)?;

    let implementation = implementation::emit(model);
    let configuration = configuration::emit(model, pattern);
    let factory = factory::emit(model);

    let metrics = ArtifactMetrics {
        total_lines: line_count(&implementation) + line_count(&configuration) + line_count(&factory),
        total_bytes: implementation.len() + configuration.len() + factory.len(),
        function_count: model.functions.len() + model.inherited_functions.len(),
        property_count: model.properties.len() + model.inherited_properties.len(),
    };

    trace!(
        "generated {} lines for {}",
        metrics.total_lines,
        model.qualified_name()
    );

    Ok(GeneratedArtifactSet {
        implementation,
        factory,
        configuration,
        metrics,
    })
}

/// Assemble a self-contained source file from a generated artifact set.
pub fn render_file(model: &InterfaceModel, artifacts: &GeneratedArtifactSet) -> String {
    let mut header = String::new();
    header.push_str("// Generated by fakesmith. Do not edit.\n");
    header.push_str(&format!(
        "// Source: {} ({}:{})\n\n",
        model.qualified_name(),
        model.location.file.display(),
        model.location.line
    ));

    let combined = format!(
        "{}{}{}",
        artifacts.implementation, artifacts.configuration, artifacts.factory
    );
    for import in required_imports(&combined) {
        header.push_str(&format!("use {import};\n"));
    }
    header.push('\n');

    artifacts.assemble(&header)
}

/// Derived slot, counter, and setter names collide only if member names do,
/// so uniqueness across all members is the whole collision check.
fn check_member_names(model: &InterfaceModel) -> Result<()> {
    let mut seen = HashSet::new();
    let names = model
        .all_functions()
        .map(|f| f.name.as_str())
        .chain(model.all_properties().map(|p| p.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            return Err(Error::model(format!(
                "{}: duplicate member `{}` would collide in the generated file",
                model.qualified_name(),
                name
            )));
        }
    }
    Ok(())
}

fn line_count(body: &str) -> usize {
    body.lines().count()
}

/// Imports the emitted bodies need to be self-contained. The counter import
/// is unconditional: every fake carries at least the artifact structs that
/// reference it in zero-member form too.
fn required_imports(body: &str) -> Vec<&'static str> {
    static CONDITIONAL: &[(&str, &str)] = &[
        ("HashMap", "std::collections::HashMap"),
        ("HashSet", "std::collections::HashSet"),
        ("BTreeMap", "std::collections::BTreeMap"),
        ("BTreeSet", "std::collections::BTreeSet"),
        ("VecDeque", "std::collections::VecDeque"),
    ];

    let mut imports = vec!["fakesmith::runtime::InvocationCounter"];
    for (token, path) in CONDITIONAL {
        if body.contains(token) {
            imports.push(path);
        }
    }
    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::core::{FunctionModel, ParameterModel, PropertyModel, TypeDescriptor as T};
    use crate::testing;

    fn generate_for(model: &InterfaceModel) -> GeneratedArtifactSet {
        generate(model, &analyzer::classify(model)).unwrap()
    }

    #[test]
    fn zero_member_interface_produces_all_three_artifacts() {
        let model = testing::interface("Empty").build();
        let artifacts = generate_for(&model);
        assert!(artifacts.implementation.contains("pub struct FakeEmpty"));
        assert!(artifacts.configuration.contains("pub struct EmptyConfig"));
        assert!(artifacts.factory.contains("pub fn fake_empty("));
        assert_eq!(artifacts.metrics.function_count, 0);
        assert!(artifacts.metrics.total_lines > 0);
    }

    #[test]
    fn duplicate_member_names_are_a_model_error() {
        let model = testing::interface("Broken")
            .function(FunctionModel::new("value", T::unit()))
            .property(PropertyModel::new("value", T::named("Int")))
            .build();
        let err = generate(&model, &analyzer::classify(&model)).unwrap_err();
        assert!(matches!(err, Error::Model(_)));
        assert!(err.to_string().contains("duplicate member `value`"));
    }

    #[test]
    fn rendered_file_is_self_contained() {
        let mut lookup = FunctionModel::new(
            "lookup",
            T::with_args("Map", vec![T::named("Text"), T::named("User")]),
        );
        lookup.parameters = vec![ParameterModel::new("prefix", T::named("Text"))];
        let model = testing::interface("Directory").function(lookup).build();

        let file = render_file(&model, &generate_for(&model));
        assert!(file.starts_with("// Generated by fakesmith. Do not edit.\n"));
        assert!(file.contains("use fakesmith::runtime::InvocationCounter;"));
        assert!(file.contains("use std::collections::HashMap;"));
        assert!(!file.contains("use std::collections::BTreeMap;"));
    }

    #[test]
    fn metrics_capture_member_counts() {
        let model = testing::interface("Mixed")
            .function(FunctionModel::new("a", T::unit()))
            .inherited_function(FunctionModel::new("b", T::unit()))
            .property(PropertyModel::new("c", T::named("Int")))
            .build();
        let metrics = generate_for(&model).metrics;
        assert_eq!(metrics.function_count, 2);
        assert_eq!(metrics.property_count, 1);
        assert!(metrics.total_bytes > 0);
    }
}
