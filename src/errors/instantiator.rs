/// Failure of a type-erased factory call
#[derive(thiserror::Error, Debug)]
pub enum InstantiatorErrorKind<DepsErr, FactoryErr> {
    /// Dependency values couldn't be turned into the factory arguments
    #[error(transparent)]
    Deps(DepsErr),
    /// The factory itself returned an error
    #[error(transparent)]
    Factory(FactoryErr),
}
