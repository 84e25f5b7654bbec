//! Mechanical name derivation for generated artifacts.
//!
//! All names are derived from the interface's simple name and member names,
//! so they are collision-free within one emitted file as long as member
//! names are unique (enforced by the generator). Cross-file collisions are
//! a build-system concern.

/// `UserService` -> `FakeUserService`
pub fn implementation_name(interface: &str) -> String {
    format!("Fake{interface}")
}

/// `UserService` -> `UserServiceConfig`
pub fn configuration_name(interface: &str) -> String {
    format!("{interface}Config")
}

/// `UserService` -> `fake_user_service`
pub fn factory_name(interface: &str) -> String {
    format!("fake_{}", to_snake_case(interface))
}

/// `UserService` -> `fake_user_service.rs`
pub fn file_name(interface: &str) -> String {
    format!("fake_{}.rs", to_snake_case(interface))
}

/// Behavior slot field for a function member.
pub fn behavior_slot(member: &str) -> String {
    format!("{member}_behavior")
}

/// Invocation counter field for a function member.
pub fn counter_field(member: &str) -> String {
    format!("{member}_calls")
}

/// Backing value slot for a property member.
pub fn value_slot(member: &str) -> String {
    format!("{member}_value")
}

/// Read counter field for a property member.
pub fn read_counter_field(member: &str) -> String {
    format!("{member}_reads")
}

/// Configuration setter for a function member.
pub fn function_setter(member: &str) -> String {
    format!("on_{member}")
}

/// Configuration setter for a property member.
pub fn property_setter(member: &str) -> String {
    format!("{member}_returns")
}

pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            if i > 0 && (prev_lower || (chars[i - 1].is_uppercase() && next_lower)) {
                out.push('_');
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            out.push(c);
        }
    }
    out
}
