//! Declaration-time schema descriptions.
//!
//! A variant's payload is written in one of three shorthand shapes, captured
//! by [`FieldSchema`]:
//!
//! - [`FieldSchema::Single`]: one positional field,
//! - [`FieldSchema::Positional`]: N positional fields,
//! - [`FieldSchema::Named`]: explicit field names, used verbatim.
//!
//! The normalizer turns each shape into one canonical, ordered [`Field`]
//! list. Positional fields receive the conventional names `_1`, `_2`, … so
//! that positional construction and structural matching always agree with
//! declaration order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    ident::is_identifier,
};

/// A reference to the type of a field.
///
/// References are metadata: they are never resolved eagerly at declaration
/// time, which is what allows a variant to reference its own family
/// ([`TypeRef::SelfRef`]) before the family is fully declared. [`Named`]
/// references are opaque to this crate and left to downstream tooling.
///
/// [`Named`]: TypeRef::Named
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef {
    /// The family being declared (recursive reference).
    SelfRef,
    /// The unit type.
    Unit,
    /// A boolean.
    Bool,
    /// A signed integer.
    Int,
    /// A floating-point number.
    Float,
    /// A string.
    Str,
    /// Any other type, referenced lazily by name.
    Named(String),
}

impl TypeRef {
    /// Lazy reference to a type by name.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }
}

/// One named, typed field of a variant, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Field name, unique within its variant.
    pub name: String,
    /// Reference to the field's type.
    pub ty: TypeRef,
}

pub(crate) type FieldList = SmallVec<[Field; 4]>;

/// The three accepted shorthand shapes for a variant's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldSchema {
    /// A single positional field, named `_1` by convention.
    Single(TypeRef),
    /// N positional fields, named `_1`, `_2`, … by convention. An empty list
    /// declares a zero-field (constant-like) variant.
    Positional(Vec<TypeRef>),
    /// Explicitly named fields, used verbatim in the given order.
    Named(Vec<(String, TypeRef)>),
}

impl FieldSchema {
    /// Explicitly named fields.
    pub fn named<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeRef)>,
        S: Into<String>,
    {
        FieldSchema::Named(fields.into_iter().map(|(n, t)| (n.into(), t)).collect())
    }

    /// Whether the schema carries explicit field names.
    pub fn is_labelled(&self) -> bool {
        matches!(self, FieldSchema::Named(_))
    }

    /// Resolve this shape into the canonical ordered field list.
    ///
    /// Deterministic and order-preserving. Fails with a declaration error
    /// identifying `family` and `variant` when an explicit field name is
    /// invalid or duplicated.
    pub(crate) fn normalize(&self, family: &str, variant: &str) -> Result<FieldList> {
        match self {
            FieldSchema::Single(ty) => Ok(smallvec::smallvec![Field {
                name: "_1".to_string(),
                ty: ty.clone(),
            }]),
            FieldSchema::Positional(tys) => Ok(tys
                .iter()
                .enumerate()
                .map(|(i, ty)| Field {
                    name: format!("_{}", i + 1),
                    ty: ty.clone(),
                })
                .collect()),
            FieldSchema::Named(pairs) => {
                let mut fields = FieldList::with_capacity(pairs.len());
                for (name, ty) in pairs {
                    if !is_identifier(name) {
                        return Err(Error::InvalidIdentifier {
                            family: family.to_string(),
                            name: name.clone(),
                        });
                    }
                    if fields.iter().any(|f| f.name == *name) {
                        return Err(Error::DuplicateField {
                            family: family.to_string(),
                            variant: variant.to_string(),
                            field: name.clone(),
                        });
                    }
                    fields.push(Field {
                        name: name.clone(),
                        ty: ty.clone(),
                    });
                }
                Ok(fields)
            }
        }
    }
}

impl From<TypeRef> for FieldSchema {
    fn from(ty: TypeRef) -> Self {
        FieldSchema::Single(ty)
    }
}

impl From<Vec<TypeRef>> for FieldSchema {
    fn from(tys: Vec<TypeRef>) -> Self {
        FieldSchema::Positional(tys)
    }
}

impl<const N: usize> From<[TypeRef; N]> for FieldSchema {
    fn from(tys: [TypeRef; N]) -> Self {
        FieldSchema::Positional(tys.into())
    }
}

impl From<Vec<(String, TypeRef)>> for FieldSchema {
    fn from(pairs: Vec<(String, TypeRef)>) -> Self {
        FieldSchema::Named(pairs)
    }
}

/// Capability set applied uniformly to every variant of a family.
///
/// Options are enumerated here rather than forwarded opaquely; an unknown
/// option is unrepresentable by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FamilyConfig {
    /// Reject field reassignment on instances after construction.
    pub immutable: bool,
    /// Export variant bindings at declaration time (`declare_in` only).
    pub export: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_normalizes_to_one_conventional_field() {
        let fields = FieldSchema::Single(TypeRef::Str)
            .normalize("Expr", "Var")
            .unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "_1");
        assert_eq!(fields[0].ty, TypeRef::Str);
    }

    #[test]
    fn positional_names_follow_declaration_order() {
        let fields = FieldSchema::Positional(vec![TypeRef::Str, TypeRef::SelfRef])
            .normalize("Expr", "Abs")
            .unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["_1", "_2"]);
        assert_eq!(fields[1].ty, TypeRef::SelfRef);
    }

    #[test]
    fn named_fields_are_kept_verbatim() {
        let fields = FieldSchema::named([("func", TypeRef::SelfRef), ("arg", TypeRef::SelfRef)])
            .normalize("Expr", "App")
            .unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["func", "arg"]);
    }

    #[test]
    fn duplicate_named_field_is_rejected() {
        let err = FieldSchema::named([("x", TypeRef::Int), ("x", TypeRef::Int)])
            .normalize("Point", "Flat")
            .unwrap_err();
        assert!(err.is_duplicate_field());
    }

    #[test]
    fn invalid_field_name_is_rejected() {
        let err = FieldSchema::named([("1st", TypeRef::Int)])
            .normalize("Point", "Flat")
            .unwrap_err();
        assert!(err.is_invalid_identifier());
    }

    #[test]
    fn empty_positional_is_a_zero_field_variant() {
        let fields = FieldSchema::Positional(vec![])
            .normalize("Color", "Red")
            .unwrap();
        assert!(fields.is_empty());
    }
}
