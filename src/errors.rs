mod define;
mod instantiate;
mod instantiator;
mod resolve;

pub use define::DefineErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use resolve::ResolveErrorKind;

/// Return type of a module factory
pub type InstantiatorResult<T, Err = InstantiateErrorKind> = Result<T, Err>;
