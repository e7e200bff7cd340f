//! Tyfam: runtime algebraic type families.
//!
//! This crate turns a declarative shape of named variants into a closed
//! family of concrete, structurally typed record types sharing one abstract
//! base. A declaration is a single synchronous pass driven by
//! [`FamilyBuilder`]:
//!
//! - each variant's payload is written in one of three shorthand shapes
//!   ([`FieldSchema`]: single type, positional list, or named mapping) and
//!   normalized into one canonical ordered field list;
//! - every variant becomes a [`VariantType`] registered, in declaration
//!   order, in the family's write-once registry;
//! - every variant gets an exact-membership [`Predicate`] named by
//!   UpperCamelCase → lower_snake_case conversion (`AbsExpr` → `is_abs_expr`);
//! - the [`Family`] itself stays abstract: [`Family::instantiate`] fails
//!   unconditionally, instances only come from variant constructors.
//!
//! Fields may reference the family being declared ([`TypeRef::SelfRef`]) or
//! any other type lazily by name; type references are metadata and are never
//! resolved during declaration, so recursive definitions need no forward
//! setup.
//!
//! Variant names can additionally be exported for unqualified use into an
//! explicit [`ScopeChain`] (see [`scope`]) — an opt-in, one-shot mutation of
//! shared namespace state that never runs unless requested.
//!
//! Example
//! ```rust
//! use tyfam::{FamilyBuilder, FieldSchema, TypeRef, Value};
//!
//! let expr = FamilyBuilder::new("Expr")
//!     .variant("Var", TypeRef::Str)
//!     .variant("Abs", [TypeRef::Str, TypeRef::SelfRef])
//!     .variant(
//!         "App",
//!         FieldSchema::named([("func", TypeRef::SelfRef), ("arg", TypeRef::SelfRef)]),
//!     )
//!     .declare()
//!     .unwrap();
//!
//! // Qualified construction and structural matching.
//! let x = expr.construct("Var", [Value::from("x")]).unwrap();
//! let id = expr
//!     .construct("Abs", [Value::from("x"), Value::from(x.clone())])
//!     .unwrap();
//!
//! assert!(expr.predicate("is_abs").unwrap().test(&id));
//! assert!(!expr.predicate("is_var").unwrap().test(&id));
//!
//! let (name, fields) = id.destructure();
//! assert_eq!(name, "Abs");
//! assert_eq!(fields[0], Value::from("x"));
//! ```

pub mod error;
pub mod family;
pub mod ident;
pub mod instance;
pub mod schema;
pub mod scope;

pub use error::{Error, Result};
pub use family::{Family, FamilyBuilder, FamilyId, Predicate, VariantType};
pub use instance::{Instance, Value, ValueKind};
pub use schema::{FamilyConfig, Field, FieldSchema, TypeRef};
pub use scope::{Binding, ScopeChain, ScopeFrame};
