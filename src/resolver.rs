use alloc::{string::String, vec::Vec};
use parking_lot::Mutex;
use tracing::{debug, debug_span, error};

use crate::{
    any::Instance,
    arguments::Arguments,
    definition::Definition,
    errors::{InstantiatorErrorKind, ResolveErrorKind},
    instances::Instances,
    registry::RegistryInner,
    utils::dedup::uniq,
};

/// Ids of the resolutions in progress, outermost first
#[derive(Clone, Default)]
pub(crate) struct ResolutionStack(Vec<String>);

impl ResolutionStack {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(Vec::new())
    }

    /// Copy of the stack with `id` on top. The receiver is left as is, so sibling dependencies never see each other.
    #[must_use]
    fn descend(&self, id: &str) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id.into());
        Self(ids)
    }

    pub(crate) fn ensure_acyclic(&self, dep_id: &str) -> Result<(), ResolveErrorKind> {
        if self.0.iter().any(|id| id == dep_id) {
            let err = ResolveErrorKind::CircularDependency {
                id: dep_id.into(),
                stack: self.0.clone(),
            };
            error!("{}", err);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
type Owner = std::thread::ThreadId;

/// Without `std` there is no thread identity, so every resolution counts as running on the same thread
#[cfg(not(feature = "std"))]
type Owner = ();

#[cfg(feature = "std")]
#[inline]
fn current_owner() -> Owner {
    std::thread::current().id()
}

#[cfg(not(feature = "std"))]
#[inline]
fn current_owner() -> Owner {}

/// Value resolutions in progress, each tagged with the thread running it.
///
/// A factory calling back into the registry starts from the stack of its own thread,
/// so requesting an id that is still being built is reported as a circular dependency.
#[derive(Default)]
pub(crate) struct InProgress(Mutex<Vec<(Owner, String)>>);

impl InProgress {
    /// Ids being resolved by the current thread, outermost first
    pub(crate) fn stack(&self) -> ResolutionStack {
        let owner = current_owner();
        ResolutionStack(
            self.0
                .lock()
                .iter()
                .filter(|(entry_owner, _)| *entry_owner == owner)
                .map(|(_, id)| id.clone())
                .collect(),
        )
    }

    fn enter(&self, id: &str) -> InProgressGuard<'_> {
        let owner = current_owner();
        self.0.lock().push((owner, id.into()));
        InProgressGuard { in_progress: self, owner }
    }
}

/// Removes the innermost entry of its thread on drop, on success and on error alike
struct InProgressGuard<'a> {
    in_progress: &'a InProgress,
    owner: Owner,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.in_progress.0.lock();
        if let Some(index) = entries.iter().rposition(|(owner, _)| *owner == self.owner) {
            entries.remove(index);
        }
    }
}

/// What a resolution produces: the module value or the ids it transitively requires
pub(crate) trait Mode {
    type Output;
    type Collected: Default;

    const NAME: &'static str;
    /// Whether the frames of this mode are visible to factories calling back into the registry
    const TRACKED: bool;

    fn memoized(inner: &RegistryInner, id: &str, overrides: Option<&Instances>) -> Option<Self::Output>;

    fn collect(collected: &mut Self::Collected, dep_id: &str, output: Self::Output);

    fn complete(
        inner: &RegistryInner,
        id: &str,
        definition: &Definition,
        collected: Self::Collected,
        overrides: Option<&mut Instances>,
    ) -> Result<Self::Output, ResolveErrorKind>;
}

/// Builds and memoizes module values
pub(crate) struct Value;

impl Mode for Value {
    type Output = Instance;
    type Collected = Vec<(String, Instance)>;

    const NAME: &'static str = "value";
    const TRACKED: bool = true;

    fn memoized(inner: &RegistryInner, id: &str, overrides: Option<&Instances>) -> Option<Self::Output> {
        let instance = match overrides {
            Some(overrides) => overrides.get_instance(id).cloned(),
            None => inner.instances.lock().get_instance(id).cloned(),
        };
        if instance.is_some() {
            debug!("Found in instances");
        } else {
            debug!("Not found in instances");
        }
        instance
    }

    #[inline]
    fn collect(collected: &mut Self::Collected, dep_id: &str, output: Self::Output) {
        collected.push((dep_id.into(), output));
    }

    fn complete(
        inner: &RegistryInner,
        id: &str,
        definition: &Definition,
        collected: Self::Collected,
        overrides: Option<&mut Instances>,
    ) -> Result<Self::Output, ResolveErrorKind> {
        let instance = match (definition.instantiator)(Arguments::new(collected)) {
            Ok(instance) => instance,
            Err(InstantiatorErrorKind::Deps(err)) => {
                error!("{}", err);
                return Err(err);
            }
            Err(InstantiatorErrorKind::Factory(source)) => {
                let err = ResolveErrorKind::Factory { id: id.into(), source };
                error!("{}", err);
                return Err(err);
            }
        };

        let instance = match overrides {
            Some(overrides) => overrides.get_or_insert(id, instance),
            None => inner.instances.lock().get_or_insert(id, instance),
        };
        debug!("Memoized");

        Ok(instance)
    }
}

/// Lists transitive dependency ids without building anything
pub(crate) struct DependencyIds;

impl Mode for DependencyIds {
    type Output = Vec<String>;
    type Collected = Vec<String>;

    const NAME: &'static str = "dependency_ids";
    const TRACKED: bool = false;

    #[inline]
    fn memoized(_inner: &RegistryInner, _id: &str, _overrides: Option<&Instances>) -> Option<Self::Output> {
        None
    }

    #[inline]
    fn collect(collected: &mut Self::Collected, dep_id: &str, output: Self::Output) {
        collected.extend(output);
        collected.push(dep_id.into());
    }

    #[inline]
    fn complete(
        _inner: &RegistryInner,
        _id: &str,
        _definition: &Definition,
        collected: Self::Collected,
        _overrides: Option<&mut Instances>,
    ) -> Result<Self::Output, ResolveErrorKind> {
        Ok(uniq(collected))
    }
}

impl RegistryInner {
    /// Depth-first resolution of `id`.
    ///
    /// With `overrides` the memoized values are read from and written to that table instead of the registry one.
    pub(crate) fn resolve<M: Mode>(
        &self,
        id: &str,
        stack: &ResolutionStack,
        mut overrides: Option<&mut Instances>,
    ) -> Result<M::Output, ResolveErrorKind> {
        let span = debug_span!("resolve", id, mode = M::NAME);
        let _guard = span.enter();

        if id.is_empty() {
            let err = ResolveErrorKind::InvalidArgument {
                reason: "id must be non-empty",
            };
            error!("{}", err);
            return Err(err);
        }

        if let Some(output) = M::memoized(self, id, overrides.as_deref()) {
            return Ok(output);
        }

        let Some(definition) = self.definitions.lock().get(id).cloned() else {
            let err = ResolveErrorKind::UndefinedId { id: id.into() };
            error!("{}", err);
            return Err(err);
        };

        let _in_progress = M::TRACKED.then(|| self.in_progress.enter(id));
        let stack = stack.descend(id);
        let mut collected = M::Collected::default();
        for dep_id in definition.deps.iter() {
            stack.ensure_acyclic(dep_id)?;
            let output = self.resolve::<M>(dep_id, &stack, overrides.as_deref_mut())?;
            M::collect(&mut collected, dep_id, output);
        }

        M::complete(self, id, &definition, collected, overrides)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{DependencyIds, ResolutionStack, Value};
    use crate::{instance, Inject, InstantiateErrorKind, Instances, Registry, ResolveErrorKind};

    use alloc::{
        format,
        string::{String, ToString as _},
        vec,
    };
    use tracing_test::traced_test;

    #[test]
    fn test_descend_copies_stack() {
        let root = ResolutionStack::new().descend("a");
        let left = root.descend("b");
        let right = root.descend("c");

        assert_eq!(root.0, vec!["a"]);
        assert_eq!(left.0, vec!["a", "b"]);
        assert_eq!(right.0, vec!["a", "c"]);
        assert!(right.ensure_acyclic("b").is_ok());
        assert!(matches!(
            left.ensure_acyclic("a"),
            Err(ResolveErrorKind::CircularDependency { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_dependency_ids_mode_builds_nothing() {
        let registry = Registry::new();
        registry.define("a", instance(1u8)).unwrap();
        registry
            .define_with_deps("b", ["a", "a"], |Inject(a): Inject<u8>| Ok::<_, InstantiateErrorKind>(*a))
            .unwrap();

        let ids = registry
            .inner
            .resolve::<DependencyIds>("b", &ResolutionStack::new(), None)
            .unwrap();

        assert_eq!(ids, vec!["a"]);
        assert!(registry.inner.instances.lock().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_value_mode_memoizes_into_overrides() {
        let registry = Registry::new();
        registry.define("a", instance(1u8)).unwrap();

        let mut overrides = Instances::new();
        let _ = registry
            .inner
            .resolve::<Value>("a", &ResolutionStack::new(), Some(&mut overrides))
            .unwrap();

        assert!(overrides.contains("a"));
        assert!(registry.inner.instances.lock().is_empty());
        assert!(logs_contain("Memoized"));
    }

    #[test]
    #[traced_test]
    fn test_self_reference() {
        let registry = Registry::new();
        registry
            .define_with_deps("a", ["a"], |Inject(a): Inject<u8>| Ok::<_, InstantiateErrorKind>(*a))
            .unwrap();

        match registry.inner.resolve::<Value>("a", &ResolutionStack::new(), None) {
            Err(ResolveErrorKind::CircularDependency { id, stack }) => {
                assert_eq!(id, "a");
                assert_eq!(stack, vec!["a"]);
            }
            _ => panic!("expected circular dependency"),
        }
    }
}
