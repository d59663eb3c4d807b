//! Pointer type and marker traits for module values, switched by the `thread_safe` feature.
//!
//! With the feature, module values live behind [`alloc::sync::Arc`] and must be `Send + Sync`.
//! Without it they live behind [`alloc::rc::Rc`] and any `'static` type is accepted.

use core::any::Any;

#[cfg(feature = "thread_safe")]
pub use alloc::sync::{Arc as RcThreadSafety, Weak as WeakThreadSafety};

#[cfg(not(feature = "thread_safe"))]
pub use alloc::rc::{Rc as RcThreadSafety, Weak as WeakThreadSafety};

#[cfg(feature = "thread_safe")]
pub trait SendSafety: Send {}
#[cfg(feature = "thread_safe")]
impl<T: Send + ?Sized> SendSafety for T {}

#[cfg(feature = "thread_safe")]
pub trait SyncSafety: Sync {}
#[cfg(feature = "thread_safe")]
impl<T: Sync + ?Sized> SyncSafety for T {}

#[cfg(not(feature = "thread_safe"))]
pub trait SendSafety {}
#[cfg(not(feature = "thread_safe"))]
impl<T: ?Sized> SendSafety for T {}

#[cfg(not(feature = "thread_safe"))]
pub trait SyncSafety {}
#[cfg(not(feature = "thread_safe"))]
impl<T: ?Sized> SyncSafety for T {}

/// Unsized type behind a type-erased module value
#[cfg(feature = "thread_safe")]
pub type AnyValue = dyn Any + Send + Sync;

/// Unsized type behind a type-erased module value
#[cfg(not(feature = "thread_safe"))]
pub type AnyValue = dyn Any;
