use crate::{
    any::Instance,
    arguments::Arguments,
    dependency_resolver::DependencyResolver,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    ResolveErrorKind,
};

/// Shared dependency value.
/// The pointer is the memoized instance itself, so every dependent sees the same value.
pub struct Inject<Dep>(pub RcThreadSafety<Dep>);

impl<Dep: SendSafety + SyncSafety + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    const ARITY: usize = 1;

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        arguments.take().map(Self)
    }
}

/// Owned copy of a dependency value
pub struct InjectCloned<Dep>(pub Dep);

impl<Dep: Clone + SendSafety + SyncSafety + 'static> DependencyResolver for InjectCloned<Dep> {
    type Error = ResolveErrorKind;

    const ARITY: usize = 1;

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        arguments.take::<Dep>().map(|dependency| Self((*dependency).clone()))
    }
}

/// Type-erased dependency value, for factories that inspect it themselves
pub struct InjectInstance(pub Instance);

impl DependencyResolver for InjectInstance {
    type Error = ResolveErrorKind;

    const ARITY: usize = 1;

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        arguments.take_instance().map(|(_, instance)| Self(instance))
    }
}
