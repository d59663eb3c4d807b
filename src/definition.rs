use alloc::string::String;

use crate::{instantiator::BoxedInstantiator, utils::thread_safety::RcThreadSafety};

/// Registered module: declared dependency ids and the factory consuming their values
#[derive(Clone)]
pub(crate) struct Definition {
    pub(crate) deps: RcThreadSafety<[String]>,
    pub(crate) instantiator: BoxedInstantiator,
}
