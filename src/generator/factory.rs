//! Second artifact: the construction helper.
//!
//! Takes an optional configuration callback and returns a freshly built
//! instance with the callback applied and all counters at zero.

use crate::core::InterfaceModel;
use crate::generator::{naming, signatures};

pub fn emit(model: &InterfaceModel) -> String {
    let impl_name = naming::implementation_name(&model.simple_name);
    let config_name = naming::configuration_name(&model.simple_name);
    let factory = naming::factory_name(&model.simple_name);
    let generics = signatures::generics_decl(&model.type_parameters, false);
    let generics_use = signatures::generics_use(&model.type_parameters);

    let mut out = String::new();

    out.push_str(&format!(
        "/// Build a [`{impl_name}`], optionally applying a configuration callback.\n"
    ));
    out.push_str(&format!(
        "pub fn {factory}{generics}(configure: Option<Box<dyn FnOnce(&mut {config_name}{generics_use})>>) -> {impl_name}{generics_use} {{\n"
    ));
    out.push_str(&format!(
        "    let mut config = {config_name}::default();\n"
    ));
    out.push_str("    if let Some(configure) = configure {\n");
    out.push_str("        configure(&mut config);\n");
    out.push_str("    }\n");
    out.push_str(&format!("    {impl_name} {{\n"));
    for function in model.all_functions() {
        let slot = naming::behavior_slot(&function.name);
        out.push_str(&format!("        {slot}: config.{slot},\n"));
        out.push_str(&format!(
            "        {}: InvocationCounter::new(),\n",
            naming::counter_field(&function.name)
        ));
    }
    for property in model.all_properties() {
        let slot = naming::value_slot(&property.name);
        out.push_str(&format!("        {slot}: config.{slot},\n"));
        out.push_str(&format!(
            "        {}: InvocationCounter::new(),\n",
            naming::read_counter_field(&property.name)
        ));
    }
    out.push_str("    }\n");
    out.push_str("}\n");

    out
}
