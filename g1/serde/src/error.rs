use snafu::prelude::*;

/// Decode failures detected by the field traversal itself.
///
/// These never reach callers directly; they are raised into the backend's error type through
/// `serde::de::Error::custom`, so that `decode` returns whatever error type the deserializer uses.
#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum Error {
    #[snafu(display("missing field `{name}`"))]
    MissingField { name: String },
    #[snafu(display("duplicate field `{name}`"))]
    DuplicateField { name: String },
    #[snafu(display("unknown field `{name}`"))]
    UnknownField { name: String },

    // This is a caller bug rather than a document error, but it is only detectable when the field
    // set is handed to `decode`.
    #[snafu(display("field `{name}` is bound more than once"))]
    DuplicateBinding { name: String },
}

impl Error {
    pub(crate) fn into_de<E>(self) -> E
    where
        E: serde::de::Error,
    {
        E::custom(self)
    }
}
