//! Third artifact: the typed configuration surface.
//!
//! One setter per member, each reassigning the member's slot. The factory
//! moves the configured slots into the freshly built instance.

use crate::core::{GenericPattern, InterfaceModel, TypeDescriptor};
use crate::generator::{naming, signatures};
use crate::resolver::{self, TypeCategory};

pub fn emit(model: &InterfaceModel, pattern: &GenericPattern) -> String {
    let name = naming::configuration_name(&model.simple_name);
    let generics = signatures::generics_decl(&model.type_parameters, false);
    let generics_use = signatures::generics_use(&model.type_parameters);

    let mut out = String::new();

    out.push_str(&format!(
        "/// Behavior configuration for [`{}`].\n",
        naming::implementation_name(&model.simple_name)
    ));
    out.push_str(&format!("pub struct {name}{generics} {{\n"));
    for function in model.all_functions() {
        out.push_str(&format!(
            "    pub {}: {},\n",
            naming::behavior_slot(&function.name),
            signatures::slot_type(function)
        ));
    }
    for property in model.all_properties() {
        out.push_str(&format!(
            "    pub {}: Option<{}>,\n",
            naming::value_slot(&property.name),
            property.ty.render()
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "impl{generics} Default for {name}{generics_use} {{\n"
    ));
    out.push_str("    fn default() -> Self {\n");
    out.push_str("        Self {\n");
    for function in model.all_functions() {
        out.push_str(&format!(
            "            {}: {},\n",
            naming::behavior_slot(&function.name),
            signatures::default_slot(function)
        ));
    }
    for property in model.all_properties() {
        out.push_str(&format!(
            "            {}: {},\n",
            naming::value_slot(&property.name),
            default_property_value(&property.ty)
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl{generics} {name}{generics_use} {{\n"));
    for function in model.all_functions() {
        out.push_str(&format!(
            "    /// Replace the behavior backing `{}`.\n",
            function.name
        ));
        if let Some(pair) = pattern
            .transformation_pairs()
            .iter()
            .find(|p| p.function_name == function.name)
        {
            out.push_str(&format!(
                "    /// Detected transformation shape: input uses `{}`, output uses `{}`.\n",
                pair.input_parameter, pair.output_parameter
            ));
        }
        out.push_str(&format!(
            "    pub fn {}(&mut self, behavior: {}) {{\n",
            naming::function_setter(&function.name),
            signatures::setter_bound(function)
        ));
        out.push_str(&format!(
            "        self.{} = Box::new(behavior);\n",
            naming::behavior_slot(&function.name)
        ));
        out.push_str("    }\n\n");
    }
    for property in model.all_properties() {
        out.push_str(&format!(
            "    /// Set the value returned by `{}`.\n",
            property.name
        ));
        out.push_str(&format!(
            "    pub fn {}(&mut self, value: {}) {{\n",
            naming::property_setter(&property.name),
            property.ty.render()
        ));
        out.push_str(&format!(
            "        self.{} = Some(value);\n",
            naming::value_slot(&property.name)
        ));
        out.push_str("    }\n");
    }
    out.push_str("}\n");

    out
}

/// Fallback-categorized types have no safe eager default: the fallback
/// expression panics when evaluated, and `Config::default()` runs before any
/// setter. The slot starts unconfigured and the getter fails on first read.
fn default_property_value(ty: &TypeDescriptor) -> String {
    let resolved = resolver::resolve(ty);
    if resolved.category == TypeCategory::Fallback {
        "None".to_string()
    } else {
        format!("Some({})", resolved.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::core::{FunctionModel, ParameterModel, PropertyModel, TypeDescriptor as T, TypeParameterModel};
    use crate::testing;

    fn emit_for(model: &InterfaceModel) -> String {
        emit(model, &analyzer::classify(model))
    }

    #[test]
    fn setter_reassigns_the_slot() {
        let mut fetch = FunctionModel::new("fetch", T::with_args("Optional", vec![T::named("User")]));
        fetch.parameters = vec![ParameterModel::new("id", T::named("Text"))];
        let model = testing::interface("UserService").function(fetch).build();

        let body = emit_for(&model);
        assert!(body.contains("pub struct UserServiceConfig {"));
        assert!(body.contains(
            "pub fn on_fetch(&mut self, behavior: impl Fn(String) -> Option<User> + Send + Sync + 'static) {"
        ));
        assert!(body.contains("self.fetch_behavior = Box::new(behavior);"));
    }

    #[test]
    fn default_initializes_slots_from_resolver() {
        let mut fetch = FunctionModel::new("fetch", T::with_args("Optional", vec![T::named("User")]));
        fetch.parameters = vec![ParameterModel::new("id", T::named("Text"))];
        let model = testing::interface("UserService")
            .function(fetch)
            .property(PropertyModel::new("endpoint", T::named("Text")))
            .build();

        let body = emit_for(&model);
        assert!(body.contains("fetch_behavior: Box::new(|_id| None),"));
        assert!(body.contains("endpoint_value: Some(String::new()),"));
    }

    #[test]
    fn fallback_typed_property_defaults_to_unconfigured() {
        let model = testing::interface("Checkout")
            .property(PropertyModel::new("gateway", T::named("PaymentGateway")))
            .build();

        // The fallback expression panics when evaluated, so it must never
        // appear as an eager initializer inside `default()`.
        let body = emit_for(&model);
        assert!(body.contains("pub gateway_value: Option<PaymentGateway>,"));
        assert!(body.contains("gateway_value: None,"));
        assert!(!body.contains("unimplemented!"));
    }

    #[test]
    fn transformation_pair_is_noted_on_the_setter() {
        let mut map = FunctionModel::new("map", T::parameter("B"));
        map.type_parameters = vec![TypeParameterModel::new("A"), TypeParameterModel::new("B")];
        map.parameters = vec![ParameterModel::new("input", T::parameter("A"))];
        let model = testing::interface("Transformer").function(map).build();

        let body = emit_for(&model);
        assert!(body.contains("input uses `A`, output uses `B`"));
    }

    #[test]
    fn property_setter_stores_the_value() {
        let model = testing::interface("Client")
            .property(PropertyModel::new("retries", T::named("Int")))
            .build();
        let body = emit_for(&model);
        assert!(body.contains("pub fn retries_returns(&mut self, value: i32) {"));
        assert!(body.contains("self.retries_value = Some(value);"));
    }

    #[test]
    fn zero_member_configuration_is_complete() {
        let model = testing::interface("Empty").build();
        let body = emit_for(&model);
        assert!(body.contains("pub struct EmptyConfig {\n}"));
        assert!(body.contains("impl Default for EmptyConfig {"));
    }
}
