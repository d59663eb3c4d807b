use ahash::AHasher;
use alloc::{string::String, vec::Vec};
use core::hash::BuildHasherDefault;
use indexmap::{map::Entry, IndexMap};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::{downcast, Instance},
    definition::Definition,
    dependency_resolver::DependencyResolver,
    errors::{DefineErrorKind, InstantiateErrorKind, ResolveErrorKind},
    instances::Instances,
    instantiator::{boxed_instantiator, Instantiator},
    resolver::{DependencyIds, InProgress, ResolutionStack, Value},
    state::State,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety, WeakThreadSafety},
};

pub(crate) type IdHasher = BuildHasherDefault<AHasher>;

pub(crate) struct RegistryInner {
    pub(crate) definitions: Mutex<IndexMap<String, Definition, IdHasher>>,
    pub(crate) instances: Mutex<Instances>,
    pub(crate) in_progress: InProgress,
}

impl RegistryInner {
    /// Value resolution entered from the public API.
    /// Starts from the ids this thread is already resolving, so factories can't request their own ancestors.
    fn require(&self, id: &str, overrides: Option<&mut Instances>) -> Result<Instance, ResolveErrorKind> {
        let stack = self.in_progress.stack();
        stack.ensure_acyclic(id)?;
        self.resolve::<Value>(id, &stack, overrides)
    }
}

/// Module registry: definitions plus the instances built from them so far.
///
/// Cloning gives another handle to the same tables. Use [`Registry::new`] or [`create`] for an independent registry.
///
/// A factory that keeps a `Registry` clone forms a reference cycle through the definition table,
/// and the registry is never freed. Capture a [`WeakRegistry`] from [`Registry::downgrade`] instead.
#[derive(Clone)]
pub struct Registry {
    pub(crate) inner: RcThreadSafety<RegistryInner>,
}

/// Non-owning registry handle
#[derive(Clone)]
pub struct WeakRegistry {
    inner: WeakThreadSafety<RegistryInner>,
}

impl WeakRegistry {
    /// Returns the registry if any [`Registry`] handle to it is still alive
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<Registry> {
        self.inner.upgrade().map(|inner| Registry { inner })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a new registry with empty definition and instance tables
#[inline]
#[must_use]
pub fn create() -> Registry {
    Registry::new()
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RcThreadSafety::new(RegistryInner {
                definitions: Mutex::new(IndexMap::default()),
                instances: Mutex::new(Instances::new()),
                in_progress: InProgress::default(),
            }),
        }
    }

    /// Handle that doesn't keep the registry alive, for factories calling back into it
    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry {
            inner: RcThreadSafety::downgrade(&self.inner),
        }
    }

    /// Defines a module without dependencies
    ///
    /// # Errors
    /// See [`Self::define_with_deps`]
    #[inline]
    pub fn define<Inst, Deps>(&self, id: impl Into<String>, instantiator: Inst) -> Result<(), DefineErrorKind>
    where
        Inst: Instantiator<Deps, Error = InstantiateErrorKind> + SendSafety + SyncSafety,
        Inst::Provides: SendSafety + SyncSafety,
        Deps: DependencyResolver<Error = ResolveErrorKind> + 'static,
    {
        self.define_with_deps(id, Vec::<String>::new(), instantiator)
    }

    /// Defines a module with its dependency ids.
    /// The factory receives the dependency values in the order of `deps`.
    ///
    /// Dependencies aren't checked here, so they can be defined later.
    ///
    /// # Errors
    /// - Returns [`DefineErrorKind::InvalidArgument`] if `id` or one of `deps` is empty,
    ///   or if the factory takes more arguments than `deps` has
    /// - Returns [`DefineErrorKind::DuplicateId`] if `id` is already defined. The existing definition is kept.
    pub fn define_with_deps<Inst, Deps, I>(&self, id: impl Into<String>, deps: I, instantiator: Inst) -> Result<(), DefineErrorKind>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        Inst: Instantiator<Deps, Error = InstantiateErrorKind> + SendSafety + SyncSafety,
        Inst::Provides: SendSafety + SyncSafety,
        Deps: DependencyResolver<Error = ResolveErrorKind> + 'static,
    {
        let id = id.into();
        let span = info_span!("define", id = id.as_str());
        let _guard = span.enter();

        let deps: Vec<String> = deps.into_iter().map(Into::into).collect();

        let reason = if id.is_empty() {
            Some("id must be non-empty")
        } else if deps.iter().any(String::is_empty) {
            Some("dependency ids must be non-empty")
        } else if deps.len() < Deps::ARITY {
            Some("factory takes more arguments than declared dependencies")
        } else {
            None
        };
        if let Some(reason) = reason {
            let err = DefineErrorKind::InvalidArgument { id, reason };
            error!("{}", err);
            return Err(err);
        }

        match self.inner.definitions.lock().entry(id) {
            Entry::Occupied(entry) => {
                let err = DefineErrorKind::DuplicateId { id: entry.key().clone() };
                error!("{}", err);
                Err(err)
            }
            Entry::Vacant(entry) => {
                entry.insert(Definition {
                    deps: deps.into(),
                    instantiator: boxed_instantiator(instantiator),
                });
                debug!("Defined");
                Ok(())
            }
        }
    }

    /// Returns the instance of `id`, building it and its dependencies on first request.
    /// Later requests return the same instance.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::InvalidArgument`] if `id` is empty
    /// - Returns [`ResolveErrorKind::UndefinedId`] if `id` or one of its transitive dependencies isn't defined
    /// - Returns [`ResolveErrorKind::CircularDependency`] if `id` transitively depends on itself,
    ///   or if it's requested from a factory while `id` is still being built on the same thread
    /// - Returns [`ResolveErrorKind::IncorrectType`] or [`ResolveErrorKind::Factory`] if a factory can't build its module
    pub fn require(&self, id: &str) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("require", id);
        let _guard = span.enter();

        self.inner.require(id, None)
    }

    /// Like [`Self::require`], but `fake_instances` stands in for the registry instances during this call.
    ///
    /// Ids present in `fake_instances` resolve to their value there.
    /// Modules built during the call are stored in `fake_instances` only, the registry instances are left untouched.
    ///
    /// # Errors
    /// See [`Self::require`]
    pub fn require_with(&self, id: &str, fake_instances: &mut Instances) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("require_with", id, fakes = fake_instances.len());
        let _guard = span.enter();

        self.inner.require(id, Some(fake_instances))
    }

    /// Typed [`Self::require`]
    ///
    /// # Errors
    /// See [`Self::require`]. Also returns [`ResolveErrorKind::IncorrectType`] if the instance isn't a `T`.
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self, id: &str) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        downcast(id, self.require(id)?)
    }

    /// Typed [`Self::require_with`]
    ///
    /// # Errors
    /// See [`Self::get`]
    pub fn get_with<T: SendSafety + SyncSafety + 'static>(
        &self,
        id: &str,
        fake_instances: &mut Instances,
    ) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        downcast(id, self.require_with(id, fake_instances)?)
    }

    /// Returns the ids `id` transitively depends on, deduplicated in first-seen order. Nothing is built.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::InvalidArgument`], [`ResolveErrorKind::UndefinedId`] or [`ResolveErrorKind::CircularDependency`]
    /// like [`Self::require`]
    pub fn dependency_ids(&self, id: &str) -> Result<Vec<String>, ResolveErrorKind> {
        let span = info_span!("dependency_ids", id);
        let _guard = span.enter();

        self.inner.resolve::<DependencyIds>(id, &ResolutionStack::new(), None)
    }

    /// Direct dependency ids of `id` as declared, `None` if it isn't defined
    #[must_use]
    pub fn dependencies(&self, id: &str) -> Option<Vec<String>> {
        self.inner.definitions.lock().get(id).map(|definition| definition.deps.to_vec())
    }

    /// Defined ids in definition order
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.inner.definitions.lock().keys().cloned().collect()
    }

    #[inline]
    #[must_use]
    pub fn is_defined(&self, id: &str) -> bool {
        self.inner.definitions.lock().contains_key(id)
    }

    /// Returns `true` if `id` has a memoized instance in the registry
    #[inline]
    #[must_use]
    pub fn is_initialized(&self, id: &str) -> bool {
        self.inner.instances.lock().contains(id)
    }

    /// Snapshot of every definition with its dependencies, dependents and initialization flag
    ///
    /// # Errors
    /// Returns the first error met while listing the transitive dependencies of a definition
    pub fn state(&self) -> Result<State, ResolveErrorKind> {
        let span = info_span!("state");
        let _guard = span.enter();

        self.inner.state()
    }

    /// Human-readable dependency report, one line per definition.
    /// Initialized modules are marked with `*`.
    /// Lists transitive dependencies, or dependents if `inverse` is `true`.
    ///
    /// # Errors
    /// See [`Self::state`]
    pub fn log(&self, inverse: bool) -> Result<String, ResolveErrorKind> {
        use alloc::string::ToString as _;

        Ok(self.state()?.report(inverse).to_string())
    }
}
