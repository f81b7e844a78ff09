//! Printing an introspected schema back to SDL.

use crate::types::{
    DirectiveDef, EnumValueDef, FieldDef, FullType, InputValue, IntrospectionSchema, NamedRef,
    TypeKind,
};

const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Render an introspected schema as SDL.
///
/// Built-in scalars, `__` types and built-in directives are left out, since
/// every schema parser provides them. A `schema { ... }` block is written only
/// when a root type has a non-default name.
#[must_use]
#[tracing::instrument(skip(schema), fields(types = schema.types.len(), directives = schema.directives.len()))]
pub fn introspection_to_sdl(schema: &IntrospectionSchema) -> String {
    let mut blocks = Vec::new();

    if let Some(roots) = schema.custom_roots() {
        let entries: String = roots
            .iter()
            .filter_map(|(keyword, name)| name.map(|name| format!("  {keyword}: {name}\n")))
            .collect();
        blocks.push(format!("schema {{\n{entries}}}"));
    }

    blocks.extend(
        schema
            .directives
            .iter()
            .filter(|directive| !BUILTIN_DIRECTIVES.contains(&directive.name.as_str()))
            .map(directive_definition),
    );

    blocks.extend(
        schema
            .types
            .iter()
            .filter(|ty| !ty.name.starts_with("__") && !BUILTIN_SCALARS.contains(&ty.name.as_str()))
            .filter_map(type_definition),
    );

    tracing::debug!(blocks = blocks.len(), "SDL generated");
    blocks.join("\n\n")
}

fn directive_definition(directive: &DirectiveDef) -> String {
    format!(
        "{}directive @{}{} on {}",
        description(directive.description.as_deref(), ""),
        directive.name,
        arguments(&directive.args),
        directive.locations.join(" | ")
    )
}

fn type_definition(ty: &FullType) -> Option<String> {
    let head = description(ty.description.as_deref(), "");
    let name = &ty.name;
    let definition = match ty.kind {
        TypeKind::Scalar => format!("{head}scalar {name}"),
        TypeKind::Object => format!(
            "{head}type {name}{}{}",
            implements(ty.interfaces()),
            body(ty.fields().iter().map(field))
        ),
        TypeKind::Interface => format!(
            "{head}interface {name}{}{}",
            implements(ty.interfaces()),
            body(ty.fields().iter().map(field))
        ),
        TypeKind::Union => {
            let members: Vec<_> = ty.possible_types().iter().map(|t| t.name.as_str()).collect();
            format!("{head}union {name} = {}", members.join(" | "))
        }
        TypeKind::Enum => format!("{head}enum {name}{}", body(ty.enum_values().iter().map(enum_value))),
        TypeKind::InputObject => format!(
            "{head}input {name}{}",
            body(ty.input_fields().iter().map(input_field))
        ),
        TypeKind::List | TypeKind::NonNull => {
            tracing::warn!(name = %ty.name, kind = ?ty.kind, "Skipping wrapper type in type list");
            return None;
        }
    };
    Some(definition)
}

fn implements(interfaces: &[NamedRef]) -> String {
    if interfaces.is_empty() {
        return String::new();
    }
    let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
    format!(" implements {}", names.join(" & "))
}

/// ` {\n...}` around already indented member lines, or nothing when empty.
fn body(members: impl Iterator<Item = String>) -> String {
    let members: String = members.collect();
    if members.is_empty() {
        String::new()
    } else {
        format!(" {{\n{members}}}")
    }
}

fn field(field: &FieldDef) -> String {
    format!(
        "{}  {}{}: {}{}\n",
        description(field.description.as_deref(), "  "),
        field.name,
        arguments(&field.args),
        field.ty,
        deprecation(field.is_deprecated, field.deprecation_reason.as_deref())
    )
}

fn input_field(value: &InputValue) -> String {
    format!(
        "{}  {}\n",
        description(value.description.as_deref(), "  "),
        input_value(value)
    )
}

fn enum_value(value: &EnumValueDef) -> String {
    format!(
        "{}  {}{}\n",
        description(value.description.as_deref(), "  "),
        value.name,
        deprecation(value.is_deprecated, value.deprecation_reason.as_deref())
    )
}

fn arguments(args: &[InputValue]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let args: Vec<_> = args.iter().map(input_value).collect();
    format!("({})", args.join(", "))
}

fn input_value(value: &InputValue) -> String {
    match &value.default_value {
        Some(default) => format!("{}: {} = {default}", value.name, value.ty),
        None => format!("{}: {}", value.name, value.ty),
    }
}

fn deprecation(is_deprecated: bool, reason: Option<&str>) -> String {
    match (is_deprecated, reason) {
        (false, _) => String::new(),
        (true, Some(reason)) => format!(" @deprecated(reason: \"{}\")", escape_string(reason)),
        (true, None) => " @deprecated".to_string(),
    }
}

/// A description line (or block) ending in a newline, at `indent`.
fn description(text: Option<&str>, indent: &str) -> String {
    match text {
        None => String::new(),
        Some(text) if text.contains('\n') => {
            format!("{indent}\"\"\"\n{}\n{indent}\"\"\"\n", text.replace("\"\"\"", "\\\"\"\""))
        }
        Some(text) => format!("{indent}\"{}\"\n", escape_string(text)),
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
