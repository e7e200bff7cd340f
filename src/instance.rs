//! The runtime value model and variant instances.
//!
//! An [`Instance`] is a record produced by a variant constructor: it carries
//! its variant type, and its field values in declaration order. Equality is
//! structural (same family, same variant, equal field values) and the
//! textual representation renders the variant name with its field values in
//! declaration order, so distinct variants are always distinguishable.

use std::{fmt, sync::Arc};

use either::Either;
use strum::{Display, EnumIs};

use crate::{
    error::{Error, Result},
    family::{FamilyId, VariantType},
};

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The unit value.
    Unit,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An instance of some declared family (recursive values).
    Record(Instance),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Unit,
    Bool,
    Int,
    Float,
    Str,
    Record,
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Borrow the contained instance, if this value is a record.
    pub fn as_record(&self) -> Option<&Instance> {
        match self {
            Value::Record(instance) => Some(instance),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Record(instance) => fmt::Display::fmt(instance, f),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Record(instance)
    }
}

/// A record constructed through one variant of a declared family.
#[derive(Debug, Clone)]
pub struct Instance {
    variant: Arc<VariantType>,
    values: Vec<Value>,
}

impl Instance {
    pub(crate) fn new(variant: Arc<VariantType>, values: Vec<Value>) -> Self {
        Instance { variant, values }
    }

    /// The variant type this instance was constructed through.
    pub fn variant(&self) -> &Arc<VariantType> {
        &self.variant
    }

    /// The variant's declared name.
    pub fn variant_name(&self) -> &str {
        self.variant.name()
    }

    /// Identity of the family this instance belongs to.
    pub fn family_id(&self) -> FamilyId {
        self.variant.family_id()
    }

    pub(crate) fn tag(&self) -> usize {
        self.variant.tag()
    }

    /// Exact-variant check: true only when this instance was constructed
    /// through `variant` itself, never for a sibling of the same family.
    pub fn is_variant(&self, variant: &VariantType) -> bool {
        self.family_id() == variant.family_id() && self.tag() == variant.tag()
    }

    /// Field values in declaration order, for positional decomposition.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Positional field access.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Named field access.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.variant
            .field_index(name)
            .and_then(|i| self.values.get(i))
    }

    /// Structural decomposition view: the variant name and the ordered field
    /// values, for client matching code.
    pub fn destructure(&self) -> (&str, &[Value]) {
        (self.variant.name(), &self.values)
    }

    /// Reassign a field by name.
    ///
    /// Fails when the owning family was declared immutable, or when no such
    /// field exists.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        let index = self
            .variant
            .field_index(field)
            .ok_or_else(|| Error::UnknownField {
                variant: self.variant.name().to_string(),
                field: field.to_string(),
            })?;
        self.set_checked(index, field, value)
    }

    /// Reassign a field by position.
    pub fn set_at(&mut self, index: usize, value: Value) -> Result<()> {
        let field = self
            .variant
            .fields()
            .get(index)
            .map(|f| f.name.clone())
            .ok_or_else(|| Error::IndexOutOfBounds {
                variant: self.variant.name().to_string(),
                index,
                len: self.values.len(),
            })?;
        self.set_checked(index, &field, value)
    }

    fn set_checked(&mut self, index: usize, field: &str, value: Value) -> Result<()> {
        if self.variant.is_immutable() {
            return Err(Error::ImmutableInstance {
                family: self.variant.family_name().to_string(),
                variant: self.variant.name().to_string(),
                field: field.to_string(),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Rendered field parts: `name: value` pairs for labelled variants,
    /// bare values for positional ones.
    fn rendered_fields(&self) -> impl Iterator<Item = String> + '_ {
        if self.variant.is_labelled() {
            Either::Left(
                self.variant
                    .fields()
                    .iter()
                    .zip(&self.values)
                    .map(|(field, value)| format!("{}: {}", field.name, value)),
            )
        } else {
            Either::Right(self.values.iter().map(Value::to_string))
        }
    }
}

/// Structural equality: same family, same variant, equal field values in
/// declaration order. Instances of different variants are never equal, even
/// with coincidentally matching field shapes.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.family_id() == other.family_id()
            && self.tag() == other.tag()
            && self.values == other.values
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.variant.name())?;
        for (i, part) in self.rendered_fields().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{part}")?;
        }
        write!(f, ")")
    }
}
