//! Family declaration and the synthesized variant types.
//!
//! A [`FamilyBuilder`] is the *declaring* state: it accumulates variant
//! names and their [`FieldSchema`] shapes. [`FamilyBuilder::declare`] runs
//! the whole declaration pass in one synchronous sweep — normalization,
//! variant synthesis, predicate generation, registry population — and
//! returns the terminal *declared* state, an immutable [`Arc<Family>`].
//! Because the builder is consumed, no client can ever observe a partially
//! populated registry, and there is no transition back.
//!
//! The family itself is abstract: nothing on [`Family`] produces an
//! [`Instance`] of the family directly. [`Family::instantiate`] exists only
//! to make that guarantee observable — it fails unconditionally.

use std::{collections::BTreeMap, sync::Arc};

use log::debug;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    ident::{is_identifier, upper_camel_to_snake},
    instance::{Instance, Value},
    schema::{Field, FieldList, FieldSchema, FamilyConfig},
    scope::ScopeChain,
};

/// A stable identity for a declared family.
///
/// Instances carry the id of the family they belong to; membership tests
/// compare ids rather than pointers, so a family stays recognizable across
/// clones of its `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FamilyId(Uuid);

impl FamilyId {
    fn new() -> Self {
        FamilyId(Uuid::new_v4())
    }
}

/// One concrete, constructible alternative of a family.
///
/// A variant owns its ordered field list and knows the identity of the
/// family that declared it. Variants are only ever created by the
/// declaration pass and handed out as `Arc<VariantType>` through the
/// family's registry.
#[derive(Debug)]
pub struct VariantType {
    name: String,
    tag: usize,
    fields: FieldList,
    labelled: bool,
    family: FamilyId,
    family_name: String,
    immutable: bool,
}

impl VariantType {
    /// The variant's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variant's position in declaration order, used as its tag.
    pub fn tag(&self) -> usize {
        self.tag
    }

    /// The ordered field list.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Identity of the owning family.
    pub fn family_id(&self) -> FamilyId {
        self.family
    }

    /// Name of the owning family.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Whether the variant was declared with explicit field names.
    pub fn is_labelled(&self) -> bool {
        self.labelled
    }

    pub(crate) fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Construct an instance from field values in declaration order.
    ///
    /// Field types are metadata and are not checked here; only the value
    /// count must match the declared field count.
    pub fn construct(
        self: &Arc<Self>,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Instance> {
        let values: Vec<Value> = values.into_iter().collect();
        if values.len() != self.fields.len() {
            return Err(Error::ArityMismatch {
                family: self.family_name.clone(),
                variant: self.name.clone(),
                expected: self.fields.len(),
                found: values.len(),
            });
        }
        Ok(Instance::new(Arc::clone(self), values))
    }

    /// Construct an instance from `(field name, value)` pairs, in any order.
    ///
    /// Every declared field must be supplied exactly once; a repeated field
    /// name is an error rather than last-writer-wins.
    pub fn construct_named<I, S>(self: &Arc<Self>, pairs: I) -> Result<Instance>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut slots: Vec<Option<Value>> = vec![None; self.fields.len()];
        let mut found = 0usize;
        for (name, value) in pairs {
            let idx = self.field_index(name.as_ref()).ok_or_else(|| Error::UnknownField {
                variant: self.name.clone(),
                field: name.as_ref().to_string(),
            })?;
            if slots[idx].replace(value).is_some() {
                return Err(Error::DuplicateFieldValue {
                    variant: self.name.clone(),
                    field: name.as_ref().to_string(),
                });
            }
            found += 1;
        }
        if found != self.fields.len() {
            return Err(Error::ArityMismatch {
                family: self.family_name.clone(),
                variant: self.name.clone(),
                expected: self.fields.len(),
                found,
            });
        }
        // Every slot is filled once `found` matches the field count.
        self.construct(slots.into_iter().flatten())
    }
}

/// A membership query for exactly one variant of a family.
///
/// The test is exact: it holds only for instances whose family identity and
/// variant tag both match, never for a looser "belongs to the family" check.
#[derive(Debug, Clone)]
pub struct Predicate {
    name: String,
    family: FamilyId,
    tag: usize,
}

impl Predicate {
    /// The generated predicate name, e.g. `is_abs_expr` for variant
    /// `AbsExpr`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True exactly when `instance` is of this predicate's variant.
    pub fn test(&self, instance: &Instance) -> bool {
        instance.family_id() == self.family && instance.tag() == self.tag
    }
}

/// The declared, immutable family: registry, predicates, and configuration.
///
/// Obtained from [`FamilyBuilder::declare`]. The registry is populated
/// exactly once, in declaration order, before the `Arc<Family>` is returned;
/// the public API exposes no mutation.
#[derive(Debug)]
pub struct Family {
    name: String,
    id: FamilyId,
    config: FamilyConfig,
    variants: Vec<Arc<VariantType>>,
    index: BTreeMap<String, usize>,
    predicates: BTreeMap<String, usize>,
}

impl Family {
    /// The family's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The family's stable identity.
    pub fn id(&self) -> FamilyId {
        self.id
    }

    /// The capability set the family was declared with.
    pub fn config(&self) -> FamilyConfig {
        self.config
    }

    /// Number of declared variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the family declares no variants.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Qualified access to a variant by name.
    pub fn variant(&self, name: &str) -> Option<&Arc<VariantType>> {
        self.index.get(name).map(|&i| &self.variants[i])
    }

    /// Iterate over variants in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = &Arc<VariantType>> {
        self.variants.iter()
    }

    /// Look up a generated predicate by its snake_case name.
    pub fn predicate(&self, name: &str) -> Option<Predicate> {
        self.predicates.get(name).map(|&tag| Predicate {
            name: name.to_string(),
            family: self.id,
            tag,
        })
    }

    /// Iterate over `(predicate name, variant)` pairs.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, &Arc<VariantType>)> {
        self.predicates
            .iter()
            .map(|(name, &tag)| (name.as_str(), &self.variants[tag]))
    }

    /// Whether `instance` belongs to this family, through any variant.
    pub fn owns(&self, instance: &Instance) -> bool {
        instance.family_id() == self.id
    }

    /// Construct an instance of the named variant from positional values.
    pub fn construct(
        &self,
        variant: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Instance> {
        let variant = self.variant(variant).ok_or_else(|| Error::UnknownVariant {
            family: self.name.clone(),
            variant: variant.to_string(),
        })?;
        variant.construct(values)
    }

    /// The abstract-base guard: direct instantiation of a family always
    /// fails, regardless of the values supplied. Instances can only come
    /// from a variant constructor.
    pub fn instantiate(&self, _values: impl IntoIterator<Item = Value>) -> Result<Instance> {
        Err(Error::AbstractFamily {
            family: self.name.clone(),
        })
    }

    /// Bind every variant name of this family into every frame of `chain`.
    ///
    /// See [`ScopeChain::export`] for the exact semantics and caveats.
    pub fn export_to(self: &Arc<Self>, chain: &ScopeChain) -> Result<()> {
        chain.export(self)
    }
}

/// Accumulates a family declaration; the *declaring* state.
///
/// ```rust
/// use tyfam::{FamilyBuilder, FieldSchema, TypeRef, Value};
///
/// let expr = FamilyBuilder::new("Expr")
///     .variant("Var", TypeRef::Str)
///     .variant("Abs", [TypeRef::Str, TypeRef::SelfRef])
///     .variant(
///         "App",
///         FieldSchema::named([("func", TypeRef::SelfRef), ("arg", TypeRef::SelfRef)]),
///     )
///     .declare()
///     .unwrap();
///
/// let x = expr.construct("Var", [Value::from("x")]).unwrap();
/// assert!(expr.predicate("is_var").unwrap().test(&x));
/// ```
#[derive(Debug, Clone)]
pub struct FamilyBuilder {
    name: String,
    config: FamilyConfig,
    variants: Vec<(String, FieldSchema)>,
}

impl FamilyBuilder {
    /// Start declaring a family with the given name and default
    /// configuration.
    pub fn new(name: impl Into<String>) -> Self {
        FamilyBuilder {
            name: name.into(),
            config: FamilyConfig::default(),
            variants: Vec::new(),
        }
    }

    /// Replace the whole capability set.
    pub fn with_config(mut self, config: FamilyConfig) -> Self {
        self.config = config;
        self
    }

    /// Request that instances reject field reassignment after construction.
    pub fn immutable(mut self, immutable: bool) -> Self {
        self.config.immutable = immutable;
        self
    }

    /// Request scope export at declaration time (effective with
    /// [`FamilyBuilder::declare_in`] only).
    pub fn export(mut self, export: bool) -> Self {
        self.config.export = export;
        self
    }

    /// Add a variant with any of the three schema shapes.
    pub fn variant(mut self, name: impl Into<String>, schema: impl Into<FieldSchema>) -> Self {
        self.variants.push((name.into(), schema.into()));
        self
    }

    /// Run the declaration pass and return the declared family.
    ///
    /// The pass validates names, normalizes every schema shape, synthesizes
    /// the variant types in declaration order, generates the predicates, and
    /// populates the registry. Any error leaves no family behind.
    pub fn declare(self) -> Result<Arc<Family>> {
        let FamilyBuilder {
            name,
            config,
            variants,
        } = self;

        if !is_identifier(&name) {
            return Err(Error::InvalidIdentifier {
                family: name.clone(),
                name,
            });
        }

        let id = FamilyId::new();
        let mut synthesized: Vec<Arc<VariantType>> = Vec::with_capacity(variants.len());
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut predicates: BTreeMap<String, usize> = BTreeMap::new();

        for (tag, (variant_name, schema)) in variants.into_iter().enumerate() {
            if !is_identifier(&variant_name) {
                return Err(Error::InvalidIdentifier {
                    family: name,
                    name: variant_name,
                });
            }
            if index.contains_key(&variant_name) {
                return Err(Error::DuplicateVariant {
                    family: name,
                    variant: variant_name,
                });
            }

            let fields = schema.normalize(&name, &variant_name)?;

            let predicate = format!("is_{}", upper_camel_to_snake(&variant_name));
            if let Some(&prior) = predicates.get(&predicate) {
                return Err(Error::PredicateCollision {
                    family: name,
                    first: synthesized[prior].name.clone(),
                    second: variant_name,
                    predicate,
                });
            }

            debug!(
                "synthesized variant `{}::{}` with {} field(s), predicate `{}`",
                name,
                variant_name,
                fields.len(),
                predicate
            );

            index.insert(variant_name.clone(), tag);
            predicates.insert(predicate, tag);
            synthesized.push(Arc::new(VariantType {
                name: variant_name,
                tag,
                labelled: schema.is_labelled(),
                fields,
                family: id,
                family_name: name.clone(),
                immutable: config.immutable,
            }));
        }

        debug!(
            "declared family `{}` with {} variant(s)",
            name,
            synthesized.len()
        );

        Ok(Arc::new(Family {
            name,
            id,
            config,
            variants: synthesized,
            index,
            predicates,
        }))
    }

    /// Declare as with [`FamilyBuilder::declare`], then bind the family name
    /// in the innermost frame of `chain` and, when the `export` capability
    /// was requested, export every variant name as well.
    pub fn declare_in(self, chain: &ScopeChain) -> Result<Arc<Family>> {
        let family = self.declare()?;
        chain.bind_family(&family)?;
        if family.config.export {
            chain.export(&family)?;
        }
        Ok(family)
    }
}
