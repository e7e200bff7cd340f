//! Explicit scope chains and variant export.
//!
//! The exporter's job is to make variant names usable unqualified at call
//! sites. Rather than inspecting caller frames, the chain of scopes is an
//! explicit value the caller threads through: a stack of [`ScopeFrame`]s,
//! innermost last. [`ScopeChain::export`] binds every variant name of a
//! family into *every* frame of the chain, which is the analogue of binding
//! into each calling scope up the call chain.
//!
//! Export is a deliberate, one-shot mutation of shared namespace state: it
//! has no undo, and re-invocation rebinds the same names to the same values.
//! Collisions with pre-existing bindings are silently overwritten.
//!
//! # A note on concurrency
//! Each frame guards its binding map with a `RwLock`, so a single bind or
//! export is never observed torn through shared `Arc<ScopeFrame>`s. The
//! *ordering* of concurrent exports into overlapping chains is still a race:
//! callers that export from multiple threads must synchronize externally.

use std::{collections::BTreeMap, sync::Arc};

use log::debug;
use parking_lot::RwLock;
use strum::EnumIs;

use crate::{
    error::{Error, Result},
    family::{Family, VariantType},
    instance::{Instance, Value},
};

/// A value bound to a name in a scope frame.
#[derive(Debug, Clone, EnumIs)]
pub enum Binding {
    /// The abstract family itself; constructing through it always fails.
    Family(Arc<Family>),
    /// One concrete variant of a family.
    Variant(Arc<VariantType>),
}

/// One lexical frame: a shared, lock-guarded map from name to binding.
#[derive(Debug, Default)]
pub struct ScopeFrame {
    bindings: RwLock<BTreeMap<String, Binding>>,
}

impl ScopeFrame {
    /// A fresh, empty frame.
    pub fn new() -> Arc<Self> {
        Arc::new(ScopeFrame::default())
    }

    /// Look up a binding in this frame only.
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.read().get(name).cloned()
    }

    /// Whether this frame binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// Bind `name` in this frame, silently overwriting any prior binding.
    pub fn bind(&self, name: impl Into<String>, binding: Binding) {
        self.bindings.write().insert(name.into(), binding);
    }
}

/// A stack of scope frames, innermost last.
///
/// [`ScopeChain::new`] starts with a single root frame (the "module scope");
/// [`ScopeChain::default`] is a detached, frameless chain on which every
/// binding operation fails with [`Error::NoScopeFrame`].
#[derive(Debug, Default)]
pub struct ScopeChain {
    frames: Vec<Arc<ScopeFrame>>,
}

impl ScopeChain {
    /// A chain with a single root frame.
    pub fn new() -> Self {
        ScopeChain {
            frames: vec![ScopeFrame::new()],
        }
    }

    /// Number of frames in the chain.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a fresh innermost frame, as when entering a function body.
    pub fn push_frame(&mut self) -> Arc<ScopeFrame> {
        let frame = ScopeFrame::new();
        self.frames.push(Arc::clone(&frame));
        frame
    }

    /// Pop the innermost frame, as when leaving a function body. Bindings
    /// exported into outer frames survive the pop.
    pub fn pop_frame(&mut self) -> Option<Arc<ScopeFrame>> {
        self.frames.pop()
    }

    /// The innermost frame, if any.
    pub fn innermost(&self) -> Option<&Arc<ScopeFrame>> {
        self.frames.last()
    }

    /// Bind `name` in the innermost frame.
    pub fn bind(&self, name: impl Into<String>, binding: Binding) -> Result<()> {
        let frame = self.innermost().ok_or(Error::NoScopeFrame)?;
        frame.bind(name, binding);
        Ok(())
    }

    /// Resolve `name`, walking frames innermost-out.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Bind every variant name of `family` into every frame of the chain.
    ///
    /// Fails with [`Error::NoScopeFrame`] when the chain is detached. Name
    /// collisions are silently overwritten; callers are responsible for
    /// avoiding ambiguous variant names.
    pub fn export(&self, family: &Arc<Family>) -> Result<()> {
        if self.frames.is_empty() {
            return Err(Error::NoScopeFrame);
        }
        for frame in &self.frames {
            for variant in family.variants() {
                frame.bind(variant.name(), Binding::Variant(Arc::clone(variant)));
            }
        }
        debug!(
            "exported {} variant binding(s) of family `{}` into {} frame(s)",
            family.len(),
            family.name(),
            self.frames.len()
        );
        Ok(())
    }

    /// Bind the family's own name in the innermost frame, for qualified
    /// discovery through the chain.
    pub(crate) fn bind_family(&self, family: &Arc<Family>) -> Result<()> {
        self.bind(family.name(), Binding::Family(Arc::clone(family)))
    }

    /// Construct an instance through an unqualified name.
    ///
    /// Resolving to a variant constructs it; resolving to a family trips the
    /// abstract-base guard and fails with [`Error::AbstractFamily`].
    pub fn construct(
        &self,
        name: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Instance> {
        match self.lookup(name) {
            Some(Binding::Variant(variant)) => variant.construct(values),
            Some(Binding::Family(family)) => family.instantiate(values),
            None => Err(Error::UnboundName {
                name: name.to_string(),
            }),
        }
    }
}
