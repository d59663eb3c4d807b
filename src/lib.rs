//! Minimal in-process module registry.
//!
//! Modules are defined by id with the ids of their dependencies and a factory.
//! A module is built on its first request, after its dependencies, and the instance is memoized.
//! Circular dependencies are detected while resolving.
//!
//! ```rust
//! use modreg::{create, instance, Inject, InstantiateErrorKind};
//!
//! #[derive(Clone)]
//! struct Config {
//!     url: &'static str,
//! }
//!
//! struct Db {
//!     url: &'static str,
//! }
//!
//! let registry = create();
//! registry.define("config", instance(Config { url: "postgres://localhost" })).unwrap();
//! registry
//!     .define_with_deps("db", ["config"], |Inject(config): Inject<Config>| {
//!         Ok::<_, InstantiateErrorKind>(Db { url: config.url })
//!     })
//!     .unwrap();
//!
//! assert_eq!(registry.get::<Db>("db").unwrap().url, "postgres://localhost");
//! assert_eq!(registry.log(false).unwrap(), "\n* config -> [  ]\n* db -> [ config ]\n");
//! ```
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod arguments;
pub(crate) mod definition;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod instances;
pub(crate) mod instantiator;
pub(crate) mod registry;
pub(crate) mod registry_macros;
pub(crate) mod resolver;
pub(crate) mod state;

pub mod utils;

pub use any::Instance;
pub use arguments::Arguments;
pub use dependency_resolver::DependencyResolver;
pub use errors::{DefineErrorKind, InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, ResolveErrorKind};
pub use inject::{Inject, InjectCloned, InjectInstance};
pub use instances::Instances;
pub use instantiator::{instance, Instantiator};
pub use registry::{create, Registry, WeakRegistry};
pub use state::{ModuleState, Report, State};
