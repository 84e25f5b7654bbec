//! Signature and behavior-slot type rendering.
//!
//! Class-level type parameters are preserved verbatim. Method-level type
//! parameters stay on the generated signature, but the slot is typed
//! against the common upper bound (`dyn Any` when no bound is declared)
//! with a checked cast back to the parameter at the call site.

use crate::core::{FunctionModel, TypeDescriptor, TypeParameterModel};
use crate::resolver;

pub const ERASED_TYPE: &str = "Box<dyn std::any::Any>";

/// `<T: Clone + 'static, U: 'static>` or empty. Method-level parameters get
/// `'static` appended so the checked downcast in the generated body is
/// well-formed; class-level parameters keep their declared bounds only.
pub fn generics_decl(params: &[TypeParameterModel], add_static: bool) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|tp| {
            let mut bounds: Vec<String> = tp.bounds.iter().map(|b| b.render()).collect();
            if add_static {
                bounds.push("'static".to_string());
            }
            if bounds.is_empty() {
                tp.name.clone()
            } else {
                format!("{}: {}", tp.name, bounds.join(" + "))
            }
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

/// `<T, U>` or empty.
pub fn generics_use(params: &[TypeParameterModel]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().map(|tp| tp.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

/// Does this type mention any of the given type-parameter names?
pub fn mentions_parameter(ty: &TypeDescriptor, names: &[&str]) -> bool {
    let mut found = false;
    ty.walk(&mut |t| {
        if let TypeDescriptor::Parameter { name } = t {
            if names.contains(&name.as_str()) {
                found = true;
            }
        }
    });
    found
}

/// Whether this function's slot must be erased to the common upper bound.
pub fn is_erased(function: &FunctionModel) -> bool {
    function.is_generic()
}

fn own_parameter_names(function: &FunctionModel) -> Vec<&str> {
    function
        .type_parameters
        .iter()
        .map(|tp| tp.name.as_str())
        .collect()
}

/// Parameter type as it appears in the slot's callable signature.
fn slot_param_type(ty: &TypeDescriptor, erased_params: &[&str]) -> String {
    if !erased_params.is_empty() && mentions_parameter(ty, erased_params) {
        ERASED_TYPE.to_string()
    } else {
        ty.render()
    }
}

/// The boxed callable type backing one function's behavior slot.
pub fn slot_type(function: &FunctionModel) -> String {
    let erased: Vec<&str> = if is_erased(function) {
        own_parameter_names(function)
    } else {
        Vec::new()
    };

    let params: Vec<String> = function
        .parameters
        .iter()
        .map(|p| slot_param_type(&p.ty, &erased))
        .collect();
    let ret = slot_param_type(&function.return_type, &erased);

    if function.is_suspend {
        format!(
            "Box<dyn Fn({}) -> std::pin::Pin<Box<dyn std::future::Future<Output = {}> + Send>> + Send + Sync>",
            params.join(", "),
            ret
        )
    } else {
        format!("Box<dyn Fn({}) -> {} + Send + Sync>", params.join(", "), ret)
    }
}

/// The `impl Fn(..)` counterpart accepted by the configuration setter.
pub fn setter_bound(function: &FunctionModel) -> String {
    let boxed = slot_type(function);
    // Box<dyn X + Send + Sync> -> impl X + Send + Sync + 'static
    let inner = boxed
        .strip_prefix("Box<dyn ")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(&boxed);
    format!("impl {inner} + 'static")
}

/// Parameter list for the trait-impl signature, types preserved verbatim.
pub fn signature_params(function: &FunctionModel) -> String {
    function
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.render()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Closure parameter list with unused-warning-proof names: `|_id, _limit|`.
pub fn closure_params(function: &FunctionModel) -> String {
    function
        .parameters
        .iter()
        .map(|p| format!("_{}", p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default slot expression: a boxed closure returning the type-directed
/// default. Suspension wraps the default in a ready future; erased slots
/// fall back to the loud placeholder since the concrete type is unknowable.
pub fn default_slot(function: &FunctionModel) -> String {
    let body = if is_erased(function) {
        format!("unimplemented!(\"{}\")", function.name)
    } else if function.is_suspend {
        format!(
            "Box::pin(std::future::ready({}))",
            resolver::default_expression(&function.return_type)
        )
    } else {
        resolver::default_expression(&function.return_type)
    };

    let params = closure_params(function);
    format!("Box::new(|{params}| {body})")
}

/// Arguments forwarded from the generated body into the slot. Erased
/// parameters are boxed on the way in.
pub fn forwarded_args(function: &FunctionModel) -> String {
    let erased: Vec<&str> = if is_erased(function) {
        own_parameter_names(function)
    } else {
        Vec::new()
    };

    function
        .parameters
        .iter()
        .map(|p| {
            if !erased.is_empty() && mentions_parameter(&p.ty, &erased) {
                format!("Box::new({})", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParameterModel, TypeDescriptor as T, TypeParameterModel};

    fn fetch() -> FunctionModel {
        let mut f = FunctionModel::new("fetch", T::with_args("Optional", vec![T::named("User")]));
        f.parameters = vec![ParameterModel::new("id", T::named("Text"))];
        f
    }

    #[test]
    fn plain_slot_type_matches_signature() {
        assert_eq!(
            slot_type(&fetch()),
            "Box<dyn Fn(String) -> Option<User> + Send + Sync>"
        );
    }

    #[test]
    fn suspend_slot_preserves_suspension_as_boxed_future() {
        let mut f = fetch();
        f.is_suspend = true;
        assert_eq!(
            slot_type(&f),
            "Box<dyn Fn(String) -> std::pin::Pin<Box<dyn std::future::Future<Output = Option<User>> + Send>> + Send + Sync>"
        );
    }

    #[test]
    fn generic_slot_is_erased_to_any() {
        let mut f = FunctionModel::new("identity", T::parameter("T"));
        f.type_parameters = vec![TypeParameterModel::new("T")];
        f.parameters = vec![ParameterModel::new("value", T::parameter("T"))];
        assert_eq!(
            slot_type(&f),
            "Box<dyn Fn(Box<dyn std::any::Any>) -> Box<dyn std::any::Any> + Send + Sync>"
        );
        assert_eq!(forwarded_args(&f), "Box::new(value)");
    }

    #[test]
    fn concrete_params_of_generic_functions_stay_typed() {
        let mut f = FunctionModel::new("tag", T::parameter("T"));
        f.type_parameters = vec![TypeParameterModel::new("T")];
        f.parameters = vec![
            ParameterModel::new("value", T::parameter("T")),
            ParameterModel::new("label", T::named("Text")),
        ];
        assert_eq!(
            slot_type(&f),
            "Box<dyn Fn(Box<dyn std::any::Any>, String) -> Box<dyn std::any::Any> + Send + Sync>"
        );
        assert_eq!(forwarded_args(&f), "Box::new(value), label");
    }

    #[test]
    fn default_slot_uses_resolver_default() {
        assert_eq!(default_slot(&fetch()), "Box::new(|_id| None)");
    }

    #[test]
    fn default_slot_for_suspend_ready_wraps() {
        let mut f = fetch();
        f.is_suspend = true;
        assert_eq!(
            default_slot(&f),
            "Box::new(|_id| Box::pin(std::future::ready(None)))"
        );
    }

    #[test]
    fn generics_decl_appends_static_for_method_level() {
        let params = vec![TypeParameterModel::bounded("T", vec![T::named("Clone")])];
        assert_eq!(generics_decl(&params, true), "<T: Clone + 'static>");
        assert_eq!(generics_decl(&params, false), "<T: Clone>");
        assert_eq!(generics_use(&params), "<T>");
        assert_eq!(generics_decl(&[], true), "");
    }

    #[test]
    fn setter_bound_unboxes_slot_type() {
        assert_eq!(
            setter_bound(&fetch()),
            "impl Fn(String) -> Option<User> + Send + Sync + 'static"
        );
    }
}
