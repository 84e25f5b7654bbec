//! First artifact: the fake implementation struct and its trait impl.

use crate::core::{FunctionModel, InterfaceModel, PropertyModel};
use crate::generator::{naming, signatures};

pub fn emit(model: &InterfaceModel) -> String {
    let name = naming::implementation_name(&model.simple_name);
    let generics = signatures::generics_decl(&model.type_parameters, false);
    let generics_use = signatures::generics_use(&model.type_parameters);

    let mut out = String::new();

    out.push_str(&format!(
        "/// Configurable fake for `{}`.\n",
        model.qualified_name()
    ));
    out.push_str("///\n");
    out.push_str("/// Every member delegates to a behavior slot set up through\n");
    out.push_str(&format!(
        "/// [`{}`] and counts its invocations.\n",
        naming::configuration_name(&model.simple_name)
    ));
    out.push_str(&format!("pub struct {name}{generics} {{\n"));
    for function in model.all_functions() {
        out.push_str(&format!(
            "    {}: {},\n",
            naming::behavior_slot(&function.name),
            signatures::slot_type(function)
        ));
        out.push_str(&format!(
            "    pub {}: InvocationCounter,\n",
            naming::counter_field(&function.name)
        ));
    }
    for property in model.all_properties() {
        out.push_str(&format!(
            "    {}: Option<{}>,\n",
            naming::value_slot(&property.name),
            property.ty.render()
        ));
        out.push_str(&format!(
            "    pub {}: InvocationCounter,\n",
            naming::read_counter_field(&property.name)
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "impl{generics} {}{generics_use} for {name}{generics_use} {{\n",
        model.simple_name
    ));
    for property in model.all_properties() {
        emit_property(&mut out, property);
    }
    for function in model.all_functions() {
        emit_function(&mut out, function);
    }
    out.push_str("}\n");

    out
}

fn emit_property(out: &mut String, property: &PropertyModel) {
    let ty = property.ty.render();
    out.push_str(&format!("    fn {}(&self) -> {} {{\n", property.name, ty));
    out.push_str(&format!(
        "        self.{}.increment();\n",
        naming::read_counter_field(&property.name)
    ));
    out.push_str(&format!(
        "        self.{}\n            .clone()\n            .expect(\"`{}` was read before being configured\")\n",
        naming::value_slot(&property.name),
        property.name
    ));
    out.push_str("    }\n\n");

    if property.mutable {
        out.push_str(&format!(
            "    fn set_{}(&mut self, value: {}) {{\n",
            property.name, ty
        ));
        out.push_str(&format!(
            "        self.{} = Some(value);\n",
            naming::value_slot(&property.name)
        ));
        out.push_str("    }\n\n");
    }
}

fn emit_function(out: &mut String, function: &FunctionModel) {
    let erased = signatures::is_erased(function);
    let own_generics = signatures::generics_decl(&function.type_parameters, true);
    let params = signatures::signature_params(function);
    let ret = function.return_type.render();
    let keyword = if function.is_suspend { "async fn" } else { "fn" };
    let receiver = if params.is_empty() {
        "&self".to_string()
    } else {
        format!("&self, {params}")
    };

    out.push_str(&format!(
        "    {keyword} {}{own_generics}({receiver}) -> {ret} {{\n",
        function.name
    ));
    out.push_str(&format!(
        "        self.{}.increment();\n",
        naming::counter_field(&function.name)
    ));

    let slot = naming::behavior_slot(&function.name);
    let args = signatures::forwarded_args(function);
    let call = if function.is_suspend {
        format!("(self.{slot})({args}).await")
    } else {
        format!("(self.{slot})({args})")
    };

    if erased && erased_return(function) {
        // Checked cast from the erased upper bound back to the declared
        // method-level type parameter.
        out.push_str(&format!("        let result = {call};\n"));
        out.push_str(&format!(
            "        *result\n            .downcast::<{}>()\n            .expect(\"configured `{}` behavior returned the wrong type\")\n",
            function.return_type.render(),
            function.name
        ));
    } else {
        out.push_str(&format!("        {call}\n"));
    }

    out.push_str("    }\n\n");
}

fn erased_return(function: &FunctionModel) -> bool {
    let own: Vec<&str> = function
        .type_parameters
        .iter()
        .map(|tp| tp.name.as_str())
        .collect();
    signatures::mentions_parameter(&function.return_type, &own)
}
