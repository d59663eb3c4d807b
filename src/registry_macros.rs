/// Builds a [`crate::Registry`] from a list of definitions.
///
/// Each entry is `define(id, factory)` or `define(id, [deps...], factory)`.
/// Evaluates to `Result<Registry, DefineErrorKind>`, failing on the first rejected definition.
///
/// # Examples
/// ```rust
/// use modreg::{instance, registry, InjectCloned};
///
/// let registry = registry! {
///     define("port", instance(8080u16)),
///     define("addr", ["port"], |InjectCloned(port): InjectCloned<u16>| Ok(format!("127.0.0.1:{port}"))),
/// }
/// .unwrap();
///
/// assert_eq!(*registry.get::<String>("addr").unwrap(), "127.0.0.1:8080");
/// ```
#[macro_export]
macro_rules! registry {
    () => {{
        ::core::result::Result::<$crate::Registry, $crate::DefineErrorKind>::Ok($crate::Registry::new())
    }};

    (
        $( define( $($entry:tt)+ ) ),+ $(,)?
    ) => {{
        (|| -> ::core::result::Result<$crate::Registry, $crate::DefineErrorKind> {
            let registry = $crate::Registry::new();
            $(
                $crate::registry_internal! { @define registry, $($entry)+ }
            )+
            ::core::result::Result::Ok(registry)
        })()
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! registry_internal {
    // Example: registry_internal! { @define registry, "a", [], inst }
    (@define $registry:ident, $id:expr, [], $inst:expr $(,)?) => {
        $registry.define($id, $inst)?;
    };

    // Example: registry_internal! { @define registry, "b", ["a"], inst }
    (@define $registry:ident, $id:expr, [ $($dep:expr),+ $(,)? ], $inst:expr $(,)?) => {
        $registry.define_with_deps($id, [$($dep),+], $inst)?;
    };

    // Example: registry_internal! { @define registry, "a", inst }
    (@define $registry:ident, $id:expr, $inst:expr $(,)?) => {
        $registry.define($id, $inst)?;
    };
}

#[cfg(test)]
mod tests {
    extern crate std;

    use crate::{instance, DefineErrorKind, Inject, InjectCloned, InstantiateErrorKind};

    use alloc::{
        format,
        string::{String, ToString as _},
        vec,
    };
    use tracing_test::traced_test;

    #[test]
    fn test_empty_registry() {
        let registry = registry! {}.unwrap();
        assert!(registry.ids().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_registry_macro() {
        let registry = registry! {
            define("a", instance(1u8)),
            define("b", [], || Ok(2u8)),
            define("c", ["a", "b"], |Inject(a): Inject<u8>, InjectCloned(b): InjectCloned<u8>| {
                Ok::<_, InstantiateErrorKind>(*a + b)
            }),
        }
        .unwrap();

        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
        assert_eq!(*registry.get::<u8>("c").unwrap(), 3);
    }

    #[test]
    #[traced_test]
    fn test_registry_macro_duplicate() {
        let result = registry! {
            define("a", instance(1u8)),
            define("a", instance(2u8)),
        };

        assert!(matches!(result, Err(DefineErrorKind::DuplicateId { id }) if id == "a"));
    }
}
