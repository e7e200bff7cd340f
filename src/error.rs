use strum::EnumIs;
use thiserror::Error;

/// Errors surfaced by declaration, construction, and scope export.
///
/// Declaration errors are fatal to the declaration pass: the builder is
/// consumed and no [`crate::family::Family`] is produced. Construction and
/// scope errors affect only the failing call.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// The same variant name was declared twice within one family.
    #[error("family `{family}` declares variant `{variant}` more than once")]
    DuplicateVariant { family: String, variant: String },

    /// The same field name appears twice within one variant.
    #[error("variant `{variant}` of family `{family}` declares field `{field}` more than once")]
    DuplicateField {
        family: String,
        variant: String,
        field: String,
    },

    /// A variant or field name is empty or not a valid identifier.
    #[error("`{name}` is not a valid identifier (while declaring family `{family}`)")]
    InvalidIdentifier { family: String, name: String },

    /// Two variant names map to the same generated predicate name.
    ///
    /// This happens when variant names differ only by letter case, e.g.
    /// `Foo` and `FOo`.
    #[error(
        "variants `{first}` and `{second}` of family `{family}` both generate the predicate name `{predicate}`"
    )]
    PredicateCollision {
        family: String,
        first: String,
        second: String,
        predicate: String,
    },

    /// An attempt to instantiate a family directly rather than through one
    /// of its variants.
    #[error("family `{family}` is abstract and must be instantiated through one of its variants")]
    AbstractFamily { family: String },

    /// No variant with the given name exists in the family.
    #[error("family `{family}` has no variant named `{variant}`")]
    UnknownVariant { family: String, variant: String },

    /// The number of field values supplied to a variant constructor does not
    /// match its declared field count.
    #[error(
        "variant `{variant}` of family `{family}` takes {expected} field value(s), but {found} were supplied"
    )]
    ArityMismatch {
        family: String,
        variant: String,
        expected: usize,
        found: usize,
    },

    /// No field with the given name exists in the variant.
    #[error("variant `{variant}` has no field named `{field}`")]
    UnknownField { variant: String, field: String },

    /// The same field was supplied more than once to a named constructor.
    #[error("field `{field}` of variant `{variant}` was supplied more than once")]
    DuplicateFieldValue { variant: String, field: String },

    /// A positional field index is out of range for the variant.
    #[error("field index {index} is out of bounds for variant `{variant}` with {len} field(s)")]
    IndexOutOfBounds {
        variant: String,
        index: usize,
        len: usize,
    },

    /// Field reassignment on an instance of a family declared immutable.
    #[error(
        "family `{family}` was declared immutable; field `{field}` of variant `{variant}` cannot be reassigned"
    )]
    ImmutableInstance {
        family: String,
        variant: String,
        field: String,
    },

    /// A scope operation ran against a chain with no frame to bind into.
    #[error("the scope chain has no accessible frame")]
    NoScopeFrame,

    /// A name could not be resolved in any frame of the scope chain.
    #[error("name `{name}` is not bound in any frame of the scope chain")]
    UnboundName { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
