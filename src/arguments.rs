use alloc::{string::String, vec, vec::Vec};
use tracing::error;

use crate::{
    any::{downcast, Instance},
    errors::ResolveErrorKind,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Resolved dependency values of a module, handed to its factory in declared order
pub struct Arguments {
    values: vec::IntoIter<(String, Instance)>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<(String, Instance)>) -> Self {
        Self { values: values.into_iter() }
    }

    /// Count of dependency values not taken yet
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Takes the next dependency id with its type-erased value
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::InvalidArgument`] if all dependencies were already taken
    pub fn take_instance(&mut self) -> Result<(String, Instance), ResolveErrorKind> {
        self.values.next().ok_or_else(|| {
            let err = ResolveErrorKind::InvalidArgument {
                reason: "factory takes more arguments than declared dependencies",
            };
            error!("{}", err);
            err
        })
    }

    /// Takes the next dependency value as `T`
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::InvalidArgument`] if all dependencies were already taken
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the value isn't a `T`
    pub fn take<T: SendSafety + SyncSafety + 'static>(&mut self) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        let (id, instance) = self.take_instance()?;
        downcast(&id, instance)
    }
}
