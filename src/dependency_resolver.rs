use super::errors::ResolveErrorKind;
use crate::arguments::Arguments;

/// Factory argument that can be built from the resolved dependency values of a module
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    /// Count of positional dependency values the argument consumes
    const ARITY: usize;

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            const ARITY: usize = 0 $( + $ty::ARITY )*;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(arguments).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);
