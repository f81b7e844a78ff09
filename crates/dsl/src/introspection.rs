//! Declared-type inspection helpers.
//!
//! Field and argument types in the schema are wrapped in list and non-null
//! layers (`[Episode!]!`). Serialization, deserialization and inflation all
//! peel those layers with [`layer`], so a new wrapper kind only needs a new
//! [`TypeLayer`] variant.

use apollo_compiler::ast::{NamedType, Type};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Schema;

/// One peeled layer of a declared type.
///
/// Non-null wrappers are folded into the layer they wrap: the codec never
/// re-checks nullability, it only needs to know whether a list or a named
/// type sits underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLayer<'a> {
    /// `[T]` or `[T]!`, carrying the item type `T`.
    List(&'a Type),
    /// `T` or `T!`, carrying the named type.
    Named(&'a NamedType),
}

/// Peel the outermost wrapper of a declared type.
#[must_use]
pub fn layer(ty: &Type) -> TypeLayer<'_> {
    match ty {
        Type::Named(name) | Type::NonNullNamed(name) => TypeLayer::Named(name),
        Type::List(item) | Type::NonNullList(item) => TypeLayer::List(item),
    }
}

/// Strip every list and non-null wrapper until a named type remains.
#[must_use]
pub fn base_type(ty: &Type) -> &NamedType {
    match layer(ty) {
        TypeLayer::Named(name) => name,
        TypeLayer::List(item) => base_type(item),
    }
}

/// The broad kind of a named schema type, as far as query building cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Object or interface: has fields and needs a selection set.
    Composite,
    Union,
    Enum,
    Scalar,
    InputObject,
}

impl TypeClass {
    #[must_use]
    pub fn of(extended: &ExtendedType) -> Self {
        match extended {
            ExtendedType::Object(_) | ExtendedType::Interface(_) => Self::Composite,
            ExtendedType::Union(_) => Self::Union,
            ExtendedType::Enum(_) => Self::Enum,
            ExtendedType::Scalar(_) => Self::Scalar,
            ExtendedType::InputObject(_) => Self::InputObject,
        }
    }
}

/// Classify a named type, or `None` if the schema does not define it.
#[must_use]
pub fn classify(schema: &Schema, name: &str) -> Option<TypeClass> {
    schema.types.get(name).map(TypeClass::of)
}

/// True exactly when the named type is an object or interface.
#[must_use]
pub fn has_child_selections(schema: &Schema, name: &str) -> bool {
    classify(schema, name) == Some(TypeClass::Composite)
}
