pub(crate) mod dedup;
pub mod thread_safety;
