use serde::Deserialize;

/// Knobs of the field traversal.
///
/// `Options` is `Deserialize` so that it can be embedded in an application's own configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Reports an unrecognized key as an error instead of skipping it.
    pub deny_unknown_fields: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny_unknown_fields(self, deny_unknown_fields: bool) -> Self {
        Self {
            deny_unknown_fields,
            ..self
        }
    }
}
