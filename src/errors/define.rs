use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum DefineErrorKind {
    #[error("Invalid argument for `{id}`: {reason}")]
    InvalidArgument { id: String, reason: &'static str },
    #[error("Id already defined: {id}")]
    DuplicateId { id: String },
}
