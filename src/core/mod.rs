pub mod pattern;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use pattern::{GenericPattern, TransformationPair};

/// Neutral, host-independent description of one fakeable declaration.
///
/// Built once by the frontend (or restored from the metadata cache) and
/// never mutated afterwards; every downstream stage works from this
/// flattened snapshot rather than a live compiler graph.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InterfaceModel {
    pub simple_name: String,
    pub package_name: String,
    pub kind: DeclarationKind,
    pub type_parameters: Vec<TypeParameterModel>,
    pub properties: Vec<PropertyModel>,
    pub functions: Vec<FunctionModel>,
    pub inherited_properties: Vec<PropertyModel>,
    pub inherited_functions: Vec<FunctionModel>,
    pub location: SourceLocation,
    /// SHA-256 hex digest over the declaring source file's bytes.
    pub source_signature: String,
    /// Frontend analysis cost; 0 when the model was restored from cache.
    pub analysis_time_nanos: u64,
}

impl InterfaceModel {
    pub fn qualified_name(&self) -> String {
        if self.package_name.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}::{}", self.package_name, self.simple_name)
        }
    }

    /// Declared then inherited properties, in declaration order.
    pub fn all_properties(&self) -> impl Iterator<Item = &PropertyModel> {
        self.properties.iter().chain(self.inherited_properties.iter())
    }

    /// Declared then inherited functions, in declaration order.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionModel> {
        self.functions.iter().chain(self.inherited_functions.iter())
    }

    pub fn member_count(&self) -> usize {
        self.properties.len()
            + self.functions.len()
            + self.inherited_properties.len()
            + self.inherited_functions.len()
    }

    /// Number of functions declaring their own type parameters.
    pub fn generic_function_count(&self) -> usize {
        self.all_functions().filter(|f| f.is_generic()).count()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum DeclarationKind {
    Interface,
    AbstractClass,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(DeclarationKind, &str)] = &[
            (DeclarationKind::Interface, "interface"),
            (DeclarationKind::AbstractClass, "abstract class"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(k, _)| k == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown");

        write!(f, "{display_str}")
    }
}

/// Recursive type shape. Nullability is always explicit, never inferred.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Reference to a declared type parameter (class- or method-level).
    Parameter { name: String },
    /// Named type with nested type arguments.
    Named {
        name: String,
        args: Vec<TypeDescriptor>,
        nullable: bool,
    },
}

impl TypeDescriptor {
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::Parameter { name: name.into() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn named_nullable(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
            nullable: true,
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<TypeDescriptor>) -> Self {
        Self::Named {
            name: name.into(),
            args,
            nullable: false,
        }
    }

    pub fn unit() -> Self {
        Self::named("Unit")
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Named { nullable: true, .. })
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Named { name, args, nullable: false }
            if args.is_empty() && matches!(name.as_str(), "Unit" | "Void" | "()"))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Parameter { name } | Self::Named { name, .. } => name,
        }
    }

    pub fn args(&self) -> &[TypeDescriptor] {
        match self {
            Self::Parameter { .. } => &[],
            Self::Named { args, .. } => args,
        }
    }

    /// Render as Rust source text. Neutral frontend names (Text, Optional,
    /// List, ...) map to their Rust spellings; unknown names pass through.
    pub fn render(&self) -> String {
        match self {
            Self::Parameter { name } => name.clone(),
            Self::Named { name, args, nullable } => {
                let base = rust_type_name(name);
                let rendered = if args.is_empty() {
                    base.to_string()
                } else {
                    let inner: Vec<String> = args.iter().map(|a| a.render()).collect();
                    format!("{}<{}>", base, inner.join(", "))
                };
                if *nullable {
                    format!("Option<{rendered}>")
                } else {
                    rendered
                }
            }
        }
    }

    /// Walk this descriptor and every nested argument, depth-first.
    pub fn walk(&self, visit: &mut impl FnMut(&TypeDescriptor)) {
        visit(self);
        for arg in self.args() {
            arg.walk(visit);
        }
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Map a neutral model type name to its Rust spelling.
pub fn rust_type_name(name: &str) -> &str {
    static RENAMES: &[(&str, &str)] = &[
        ("Text", "String"),
        ("Optional", "Option"),
        ("Int", "i32"),
        ("Long", "i64"),
        ("Short", "i16"),
        ("Byte", "i8"),
        ("Float", "f32"),
        ("Double", "f64"),
        ("Boolean", "bool"),
        ("Char", "char"),
        ("Unit", "()"),
        ("Void", "()"),
        ("List", "Vec"),
        ("MutableList", "Vec"),
        ("Set", "HashSet"),
        ("MutableSet", "HashSet"),
        ("Map", "HashMap"),
        ("MutableMap", "HashMap"),
        ("Deque", "VecDeque"),
    ];

    RENAMES
        .iter()
        .find(|(neutral, _)| *neutral == name)
        .map(|(_, rust)| *rust)
        .unwrap_or(name)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TypeParameterModel {
    pub name: String,
    /// Upper bounds; empty means unbounded.
    pub bounds: Vec<TypeDescriptor>,
}

impl TypeParameterModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParameterModel {
    pub name: String,
    pub ty: TypeDescriptor,
    pub has_default: bool,
    pub vararg: bool,
}

impl ParameterModel {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            vararg: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionModel {
    pub name: String,
    pub parameters: Vec<ParameterModel>,
    pub return_type: TypeDescriptor,
    pub is_suspend: bool,
    pub is_inline: bool,
    /// Own type parameters, disjoint from the enclosing interface's.
    pub type_parameters: Vec<TypeParameterModel>,
}

impl FunctionModel {
    pub fn new(name: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            is_suspend: false,
            is_inline: false,
            type_parameters: Vec::new(),
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PropertyModel {
    pub name: String,
    pub ty: TypeDescriptor,
    pub mutable: bool,
}

impl PropertyModel {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// The three emitted code bodies plus capture metrics.
///
/// Transient: exists only within one generation pass and is never cached.
#[derive(Clone, Debug)]
pub struct GeneratedArtifactSet {
    pub implementation: String,
    pub factory: String,
    pub configuration: String,
    pub metrics: ArtifactMetrics,
}

impl GeneratedArtifactSet {
    /// Full file body: header, imports, then the three artifacts.
    pub fn assemble(&self, header: &str) -> String {
        let mut out = String::with_capacity(
            header.len()
                + self.implementation.len()
                + self.factory.len()
                + self.configuration.len()
                + 8,
        );
        out.push_str(header);
        out.push_str(&self.implementation);
        out.push('\n');
        out.push_str(&self.configuration);
        out.push('\n');
        out.push_str(&self.factory);
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactMetrics {
    pub total_lines: usize,
    pub total_bytes: usize,
    pub function_count: usize,
    pub property_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_joins_package_and_simple_name() {
        let model = crate::testing::interface("UserService")
            .package("app::services")
            .build();
        assert_eq!(model.qualified_name(), "app::services::UserService");
    }

    #[test]
    fn qualified_name_without_package_is_simple_name() {
        let model = crate::testing::interface("Bare").build();
        assert_eq!(model.qualified_name(), "Bare");
    }

    #[test]
    fn render_maps_neutral_names_to_rust() {
        let ty = TypeDescriptor::with_args(
            "Map",
            vec![TypeDescriptor::named("Text"), TypeDescriptor::named("Int")],
        );
        assert_eq!(ty.render(), "HashMap<String, i32>");
    }

    #[test]
    fn render_wraps_nullable_in_option() {
        let ty = TypeDescriptor::named_nullable("User");
        assert_eq!(ty.render(), "Option<User>");
    }

    #[test]
    fn render_nested_nullable() {
        let ty = TypeDescriptor::Named {
            name: "List".to_string(),
            args: vec![TypeDescriptor::named_nullable("Text")],
            nullable: true,
        };
        assert_eq!(ty.render(), "Option<Vec<Option<String>>>");
    }

    #[test]
    fn walk_visits_nested_arguments() {
        let ty = TypeDescriptor::with_args(
            "Map",
            vec![
                TypeDescriptor::named("Text"),
                TypeDescriptor::with_args("List", vec![TypeDescriptor::named("User")]),
            ],
        );
        let mut seen = Vec::new();
        ty.walk(&mut |t| seen.push(t.name().to_string()));
        assert_eq!(seen, vec!["Map", "Text", "List", "User"]);
    }

    #[test]
    fn all_functions_orders_declared_before_inherited() {
        let model = crate::testing::interface("Layered")
            .function(FunctionModel::new("own", TypeDescriptor::unit()))
            .inherited_function(FunctionModel::new("base", TypeDescriptor::unit()))
            .build();
        let names: Vec<&str> = model.all_functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["own", "base"]);
        assert_eq!(model.member_count(), 2);
    }

    #[test]
    fn unit_detection_covers_aliases() {
        assert!(TypeDescriptor::named("Unit").is_unit());
        assert!(TypeDescriptor::named("Void").is_unit());
        assert!(TypeDescriptor::named("()").is_unit());
        assert!(!TypeDescriptor::named_nullable("Unit").is_unit());
        assert!(!TypeDescriptor::named("Int").is_unit());
    }
}
