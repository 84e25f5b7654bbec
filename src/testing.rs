//! Fixture builders for unit and integration tests.
//!
//! Models are hand-built snapshots, never extracted from live source, so
//! tests stay host-independent.

use std::path::Path;

use crate::core::{
    DeclarationKind, FunctionModel, InterfaceModel, ParameterModel, PropertyModel,
    SourceLocation, TypeDescriptor, TypeParameterModel,
};

pub struct InterfaceModelBuilder {
    model: InterfaceModel,
}

/// Start building an interface model with the given simple name.
pub fn interface(simple_name: &str) -> InterfaceModelBuilder {
    InterfaceModelBuilder {
        model: InterfaceModel {
            simple_name: simple_name.to_string(),
            package_name: String::new(),
            kind: DeclarationKind::Interface,
            type_parameters: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            inherited_properties: Vec::new(),
            inherited_functions: Vec::new(),
            location: SourceLocation::default(),
            source_signature: String::new(),
            analysis_time_nanos: 0,
        },
    }
}

impl InterfaceModelBuilder {
    pub fn package(mut self, package: &str) -> Self {
        self.model.package_name = package.to_string();
        self
    }

    pub fn type_parameter(mut self, tp: TypeParameterModel) -> Self {
        self.model.type_parameters.push(tp);
        self
    }

    pub fn function(mut self, function: FunctionModel) -> Self {
        self.model.functions.push(function);
        self
    }

    pub fn inherited_function(mut self, function: FunctionModel) -> Self {
        self.model.inherited_functions.push(function);
        self
    }

    pub fn property(mut self, property: PropertyModel) -> Self {
        self.model.properties.push(property);
        self
    }

    pub fn inherited_property(mut self, property: PropertyModel) -> Self {
        self.model.inherited_properties.push(property);
        self
    }

    pub fn source(mut self, path: &Path, signature: &str) -> Self {
        self.model.location = SourceLocation::new(path, 1, 1);
        self.model.source_signature = signature.to_string();
        self
    }

    pub fn analysis_time(mut self, nanos: u64) -> Self {
        self.model.analysis_time_nanos = nanos;
        self
    }

    pub fn build(self) -> InterfaceModel {
        self.model
    }
}

/// A representative service model: `fetch(id: Text) -> Optional<User>` plus
/// a read-only property, bound to the given source file.
pub fn sample_service_model(source: &Path, signature: &str) -> InterfaceModel {
    let mut fetch = FunctionModel::new(
        "fetch",
        TypeDescriptor::with_args("Optional", vec![TypeDescriptor::named("User")]),
    );
    fetch.parameters = vec![ParameterModel::new("id", TypeDescriptor::named("Text"))];

    interface("UserService")
        .package("app::services")
        .function(fetch)
        .property(PropertyModel::new(
            "endpoint",
            TypeDescriptor::named("Text"),
        ))
        .source(source, signature)
        .analysis_time(1_500)
        .build()
}
