use alloc::{collections::BTreeMap, string::String};
use core::any::type_name;
use tracing::error;

use crate::{
    errors::ResolveErrorKind,
    utils::thread_safety::{AnyValue, RcThreadSafety, SendSafety, SyncSafety},
};

/// Type-erased module instance
pub type Instance = RcThreadSafety<AnyValue>;

pub(crate) type Map = BTreeMap<String, Instance>;

pub(crate) fn downcast<T: SendSafety + SyncSafety + 'static>(id: &str, instance: Instance) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
    instance.downcast().map_err(|_| {
        let err = ResolveErrorKind::IncorrectType {
            id: id.into(),
            expected: type_name::<T>(),
        };
        error!("{}", err);
        err
    })
}
