use core::any::type_name;
use tracing::debug;

use super::{
    any::Instance,
    arguments::Arguments,
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Module factory: builds the module value from its resolved dependencies.
///
/// Implemented for closures and functions taking up to sixteen [`DependencyResolver`] arguments
/// (e.g. [`crate::Inject`]) and returning `Result<T, E>`.
/// Arguments are taken from the dependency values in the order the dependencies were declared.
pub trait Instantiator<Deps>: Clone + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;

    /// Builds the type-erased instance. Factories that already own their value behind a pointer hand out that pointer.
    #[doc(hidden)]
    fn instantiate_erased(&mut self, dependencies: Deps) -> Result<Instance, Self::Error>
    where
        Self::Provides: SendSafety + SyncSafety,
    {
        self.instantiate(dependencies).map(|provides| RcThreadSafety::new(provides) as Instance)
    }
}

type InstantiatorResultKind = Result<Instance, InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>>;

#[cfg(feature = "thread_safe")]
pub(crate) type BoxedInstantiator = RcThreadSafety<dyn Fn(Arguments) -> InstantiatorResultKind + Send + Sync>;

#[cfg(not(feature = "thread_safe"))]
pub(crate) type BoxedInstantiator = RcThreadSafety<dyn Fn(Arguments) -> InstantiatorResultKind>;

#[must_use]
pub(crate) fn boxed_instantiator<Inst, Deps>(instantiator: Inst) -> BoxedInstantiator
where
    Inst: Instantiator<Deps> + SendSafety + SyncSafety,
    Inst::Provides: SendSafety + SyncSafety,
    Deps: DependencyResolver + 'static,
{
    RcThreadSafety::new(move |mut arguments: Arguments| {
        let dependencies = match Deps::resolve(&mut arguments) {
            Ok(dependencies) => dependencies,
            Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
        };
        let instance = match instantiator.clone().instantiate_erased(dependencies) {
            Ok(instance) => instance,
            Err(err) => return Err(InstantiatorErrorKind::Factory(err.into())),
        };

        debug!(provides = type_name::<Inst::Provides>(), "Instantiated");

        Ok(instance)
    })
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

/// Factory of a value built outside the registry
#[derive(Clone)]
struct InstanceValue<T> {
    value: RcThreadSafety<T>,
}

impl<T: Clone + SendSafety + SyncSafety + 'static> Instantiator<()> for InstanceValue<T> {
    type Provides = T;
    type Error = InstantiateErrorKind;

    fn instantiate(&mut self, (): ()) -> Result<Self::Provides, Self::Error> {
        Ok(T::clone(&self.value))
    }

    fn instantiate_erased(&mut self, (): ()) -> Result<Instance, Self::Error> {
        Ok(self.value.clone() as Instance)
    }
}

/// Wraps a value built outside the registry into a factory without arguments.
/// The module resolves to that same value every time, in the registry instances and in fake instances alike.
#[inline]
#[must_use]
pub fn instance<T: Clone + SendSafety + SyncSafety + 'static>(val: T) -> impl Instantiator<(), Provides = T, Error = InstantiateErrorKind> {
    InstanceValue {
        value: RcThreadSafety::new(val),
    }
}
