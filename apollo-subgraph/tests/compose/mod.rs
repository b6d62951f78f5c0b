use apollo_compiler::Schema;
use apollo_compiler::schema::ExtendedType;

mod errors;
mod gateway;
mod properties;

/// The names a client can observe on a type: fields, enum values or union members.
pub(crate) fn observable_members(ty: &ExtendedType) -> Vec<String> {
    let mut members: Vec<String> = match ty {
        ExtendedType::Scalar(_) => Vec::new(),
        ExtendedType::Object(ty) => ty.fields.keys().map(|name| name.to_string()).collect(),
        ExtendedType::Interface(ty) => ty.fields.keys().map(|name| name.to_string()).collect(),
        ExtendedType::Union(ty) => ty.members.iter().map(|m| m.name.to_string()).collect(),
        ExtendedType::Enum(ty) => ty.values.keys().map(|name| name.to_string()).collect(),
        ExtendedType::InputObject(ty) => ty.fields.keys().map(|name| name.to_string()).collect(),
    };
    members.sort();
    members
}

pub(crate) fn field_names(schema: &Schema, type_name: &str) -> Vec<String> {
    let ty = schema
        .types
        .get(type_name)
        .unwrap_or_else(|| panic!("{type_name} is not in the schema"));
    observable_members(ty)
}
