use alloc::{fmt, string::String, vec::Vec};
use core::{
    fmt::{Display, Formatter},
    ops::Index,
};
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    errors::ResolveErrorKind,
    registry::{IdHasher, RegistryInner},
    resolver::{DependencyIds, ResolutionStack},
};

/// Dependency information of one definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleState {
    /// Direct dependency ids as declared
    pub deps: Vec<String>,
    /// Transitive dependency ids, deduplicated in first-seen order
    pub reqs: Vec<String>,
    /// Whether the registry holds an instance
    pub init: bool,
    /// Ids transitively depending on this one, in definition order
    pub reqd: Vec<String>,
}

/// Snapshot of all definitions of a registry, in definition order.
/// It isn't updated when the registry changes.
#[derive(Debug, Clone, Default)]
pub struct State {
    modules: IndexMap<String, ModuleState, IdHasher>,
}

impl State {
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ModuleState> {
        self.modules.get(id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleState)> {
        self.modules.iter().map(|(id, module)| (id.as_str(), module))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Text rendering of the snapshot, see [`crate::Registry::log`]
    #[inline]
    #[must_use]
    pub const fn report(&self, inverse: bool) -> Report<'_> {
        Report { state: self, inverse }
    }
}

impl Index<&str> for State {
    type Output = ModuleState;

    /// # Panics
    /// Panics if `id` isn't in the snapshot
    fn index(&self, id: &str) -> &Self::Output {
        &self.modules[id]
    }
}

pub struct Report<'a> {
    state: &'a State,
    inverse: bool,
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (id, module) in self.state.iter() {
            let ids = if self.inverse { &module.reqd } else { &module.reqs };

            f.write_str(if module.init { "* " } else { "  " })?;
            write!(f, "{id} -> [ ")?;
            for (index, dep_id) in ids.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(dep_id)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

impl RegistryInner {
    pub(crate) fn state(&self) -> Result<State, ResolveErrorKind> {
        let definitions: Vec<(String, Vec<String>)> = self
            .definitions
            .lock()
            .iter()
            .map(|(id, definition)| (id.clone(), definition.deps.to_vec()))
            .collect();

        let mut modules = IndexMap::with_capacity_and_hasher(definitions.len(), IdHasher::default());
        for (id, deps) in definitions {
            let reqs = self.resolve::<DependencyIds>(&id, &ResolutionStack::new(), None)?;
            let init = self.instances.lock().contains(&id);
            modules.insert(
                id,
                ModuleState {
                    deps,
                    reqs,
                    init,
                    reqd: Vec::new(),
                },
            );
        }

        // Dependents are only known once every `reqs` is
        let reqd: Vec<Vec<String>> = modules
            .keys()
            .map(|id| {
                modules
                    .iter()
                    .filter(|(_, module)| module.reqs.contains(id))
                    .map(|(dependent, _)| dependent.clone())
                    .collect()
            })
            .collect();
        for (module, reqd) in modules.values_mut().zip(reqd) {
            module.reqd = reqd;
        }

        debug!(modules = modules.len(), "State built");

        Ok(State { modules })
    }
}
