//! Type classification and default-value resolution.
//!
//! A fixed, ordered chain of predicate+producer strategies; first match
//! wins. The chain is a static slice rather than a dynamic registry so the
//! nullable-first ordering stays auditable and test-enumerable. `resolve`
//! is total and pure: every `TypeDescriptor` maps to exactly one
//! expression, and equal inputs yield equal outputs.

use crate::core::TypeDescriptor;
use serde::Serialize;

/// Category assigned by the first matching strategy.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash, Copy)]
pub enum TypeCategory {
    Nullable,
    Scalar,
    Wrapper,
    Callable,
    Collection,
    Fallback,
}

/// A default-value expression in generated-source form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDefault {
    pub category: TypeCategory,
    pub expression: String,
}

struct Strategy {
    category: TypeCategory,
    applies: fn(&TypeDescriptor) -> bool,
    produce: fn(&TypeDescriptor) -> String,
}

/// Ordered resolution chain. Nullability overrides every other rule, so it
/// must stay first; fallback matches everything, so it must stay last.
static STRATEGIES: &[Strategy] = &[
    Strategy {
        category: TypeCategory::Nullable,
        applies: is_nullable,
        produce: produce_null,
    },
    Strategy {
        category: TypeCategory::Scalar,
        applies: is_scalar,
        produce: produce_scalar,
    },
    Strategy {
        category: TypeCategory::Wrapper,
        applies: is_wrapper,
        produce: produce_wrapper,
    },
    Strategy {
        category: TypeCategory::Callable,
        applies: is_void_callable,
        produce: produce_noop_callable,
    },
    Strategy {
        category: TypeCategory::Collection,
        applies: is_collection,
        produce: produce_empty_collection,
    },
    Strategy {
        category: TypeCategory::Fallback,
        applies: always,
        produce: produce_fallback,
    },
];

/// Resolve a type to its default-value expression and category.
pub fn resolve(ty: &TypeDescriptor) -> ResolvedDefault {
    let strategy = STRATEGIES
        .iter()
        .find(|s| (s.applies)(ty))
        .unwrap_or(&STRATEGIES[STRATEGIES.len() - 1]);
    ResolvedDefault {
        category: strategy.category,
        expression: (strategy.produce)(ty),
    }
}

/// Just the expression, for callers that do not care about the category.
pub fn default_expression(ty: &TypeDescriptor) -> String {
    resolve(ty).expression
}

/// Category chain in evaluation order, for auditing and tests.
pub fn strategy_order() -> Vec<TypeCategory> {
    STRATEGIES.iter().map(|s| s.category).collect()
}

fn always(_ty: &TypeDescriptor) -> bool {
    true
}

fn is_nullable(ty: &TypeDescriptor) -> bool {
    ty.is_nullable()
}

fn produce_null(_ty: &TypeDescriptor) -> String {
    "None".to_string()
}

/// Scalar names in both neutral-model and Rust spellings.
static SCALAR_DEFAULTS: &[(&str, &str)] = &[
    ("Text", "String::new()"),
    ("String", "String::new()"),
    ("str", "\"\""),
    ("Byte", "0i8"),
    ("i8", "0i8"),
    ("Short", "0i16"),
    ("i16", "0i16"),
    ("Int", "0i32"),
    ("i32", "0i32"),
    ("Long", "0i64"),
    ("i64", "0i64"),
    ("i128", "0i128"),
    ("isize", "0isize"),
    ("u8", "0u8"),
    ("u16", "0u16"),
    ("u32", "0u32"),
    ("u64", "0u64"),
    ("u128", "0u128"),
    ("usize", "0usize"),
    ("Float", "0.0f32"),
    ("f32", "0.0f32"),
    ("Double", "0.0f64"),
    ("f64", "0.0f64"),
    ("Boolean", "false"),
    ("bool", "false"),
    ("Char", "'\\0'"),
    ("char", "'\\0'"),
    ("Unit", "()"),
    ("Void", "()"),
    ("()", "()"),
];

fn scalar_default(name: &str) -> Option<&'static str> {
    SCALAR_DEFAULTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, expr)| *expr)
}

fn is_scalar(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Named { name, args, .. }
        if args.is_empty() && scalar_default(name).is_some())
}

fn produce_scalar(ty: &TypeDescriptor) -> String {
    scalar_default(ty.name()).unwrap_or("()").to_string()
}

static OPTIONAL_NAMES: &[&str] = &["Option", "Optional", "Maybe"];
static RESULT_NAMES: &[&str] = &["Result", "Try", "Either"];
static REACTIVE_NAMES: &[&str] = &["Future", "BoxFuture", "Deferred", "Single", "Promise"];

fn is_wrapper(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Named { name, .. } => {
            OPTIONAL_NAMES.contains(&name.as_str())
                || RESULT_NAMES.contains(&name.as_str())
                || REACTIVE_NAMES.contains(&name.as_str())
        }
        TypeDescriptor::Parameter { .. } => false,
    }
}

fn produce_wrapper(ty: &TypeDescriptor) -> String {
    let name = ty.name();
    if OPTIONAL_NAMES.contains(&name) {
        return "None".to_string();
    }
    if RESULT_NAMES.contains(&name) {
        // Defaults are syntactic literals only, so the error value is left
        // to type inference rather than naming a concrete error type.
        return "Err(Default::default())".to_string();
    }
    // Reactive single-value container: ready-wrap the inner default.
    let inner = ty
        .args()
        .first()
        .map(default_expression)
        .unwrap_or_else(|| "()".to_string());
    format!("std::future::ready({inner})")
}

static CALLABLE_NAMES: &[&str] = &["Fn", "FnMut", "FnOnce", "Function", "Runnable"];

fn is_void_callable(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Named { name, args, .. } => {
            CALLABLE_NAMES.contains(&name.as_str())
                && args.last().map(|ret| ret.is_unit()).unwrap_or(true)
        }
        TypeDescriptor::Parameter { .. } => false,
    }
}

fn produce_noop_callable(_ty: &TypeDescriptor) -> String {
    "|| {}".to_string()
}

static COLLECTION_DEFAULTS: &[(&str, &str)] = &[
    ("Vec", "Vec::new()"),
    ("List", "Vec::new()"),
    ("MutableList", "Vec::new()"),
    ("VecDeque", "VecDeque::new()"),
    ("Deque", "VecDeque::new()"),
    ("HashSet", "HashSet::new()"),
    ("Set", "HashSet::new()"),
    ("MutableSet", "HashSet::new()"),
    ("BTreeSet", "BTreeSet::new()"),
    ("HashMap", "HashMap::new()"),
    ("Map", "HashMap::new()"),
    ("MutableMap", "HashMap::new()"),
    ("BTreeMap", "BTreeMap::new()"),
];

fn is_collection(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Named { name, .. } => {
            name == "Array"
                || COLLECTION_DEFAULTS.iter().any(|(n, _)| n == name)
        }
        TypeDescriptor::Parameter { .. } => false,
    }
}

fn produce_empty_collection(ty: &TypeDescriptor) -> String {
    if ty.name() == "Array" {
        // Zero-argument arrays get the bare empty-array constructor;
        // element-typed arrays are treated as lists.
        return if ty.args().is_empty() {
            "[]".to_string()
        } else {
            "Vec::new()".to_string()
        };
    }
    COLLECTION_DEFAULTS
        .iter()
        .find(|(n, _)| *n == ty.name())
        .map(|(_, expr)| expr.to_string())
        .unwrap_or_else(|| "Vec::new()".to_string())
}

/// Placeholder for user-defined or unresolved shapes: compiles anywhere an
/// expression is expected, fails loudly only if evaluated.
fn produce_fallback(ty: &TypeDescriptor) -> String {
    format!("unimplemented!(\"{}\")", ty.render())
}
