use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, MapAccess};
use serde::ser::SerializeMap;

/// A named binding to caller-owned storage.
pub trait Binding {
    fn name(&self) -> &str;
}

/// The decode side of a binding.
///
/// The traversal calls exactly one of the two methods for each binding: `decode_value` when the
/// name is found in the document, and `decode_absent` once the document is exhausted otherwise.
pub trait DecodeBinding<'de>: Binding + Sized {
    /// Decodes the value of the current map entry into the destination.
    fn decode_value<A>(&mut self, map: &mut A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>;

    /// Resolves a binding whose name is absent from the document.
    fn decode_absent<E>(self) -> Result<(), E>
    where
        E: de::Error;
}

/// The encode side of a binding.
pub trait EncodeBinding: Binding {
    fn encode_entry<M>(&self, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap;
}

/// Deserializes a value and stores it in an existing place.
///
/// The place is left untouched when deserialization fails.
pub(crate) struct Place<'a, T>(pub(crate) &'a mut T);

impl<'de, T> DeserializeSeed<'de> for Place<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        *self.0 = T::deserialize(deserializer)?;
        Ok(())
    }
}
