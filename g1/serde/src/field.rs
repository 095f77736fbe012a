use std::borrow::Cow;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use serde::de::{self, Deserialize, MapAccess};
use serde::ser::{Serialize, SerializeMap};

use crate::binding::{Binding, DecodeBinding, EncodeBinding, Place};
use crate::error::MissingFieldSnafu;

/// Binds a required named field to caller-owned storage.
///
/// Decoding a document that lacks the field fails with a "missing field" error.
///
/// The destination `P` is usually `&mut T`.  A binding over `&T` can only be encoded, which is
/// what a `Serialize::serialize(&self, ...)` impl needs.
#[derive(Debug)]
pub struct Field<'a, T, P = &'a mut T> {
    name: Cow<'a, str>,
    destination: P,
    _value: PhantomData<fn() -> T>,
}

/// Binds an optional named field to caller-owned storage.
///
/// When the field is absent from the document, the default value is moved into the destination
/// instead of failing the decode.  When it is present, the default is dropped unused.  Encoding
/// ignores the default and writes the destination's current value.
///
/// `OptionalField` is intentionally neither `Clone` nor `Copy`; it is built right before a decode
/// (or encode) call and consumed by it.
#[derive(Debug)]
pub struct OptionalField<'a, T, D = T, P = &'a mut T> {
    name: Cow<'a, str>,
    destination: P,
    default: D,
    _value: PhantomData<fn() -> T>,
}

impl<'a, T, P> Field<'a, T, P>
where
    P: Deref<Target = T>,
{
    pub fn new<N>(name: N, destination: P) -> Self
    where
        N: Into<Cow<'a, str>>,
    {
        Self {
            name: name.into(),
            destination,
            _value: PhantomData,
        }
    }
}

impl<'a, T, P> OptionalField<'a, T, T, P>
where
    T: Default,
    P: Deref<Target = T>,
{
    /// Creates an optional field that falls back to `T::default()`.
    pub fn new<N>(name: N, destination: P) -> Self
    where
        N: Into<Cow<'a, str>>,
    {
        Self::with_default(name, destination, T::default())
    }
}

impl<'a, T, P> OptionalField<'a, T, T, P>
where
    P: Deref<Target = T>,
{
    /// Creates an optional field that falls back to `default`.
    pub fn with_default<N>(name: N, destination: P, default: T) -> Self
    where
        N: Into<Cow<'a, str>>,
    {
        Self::with_default_into(name, destination, default)
    }
}

impl<'a, T, D, P> OptionalField<'a, T, D, P>
where
    D: Into<T>,
    P: Deref<Target = T>,
{
    /// Creates an optional field whose default is converted into `T` only when it is used.
    pub fn with_default_into<N>(name: N, destination: P, default: D) -> Self
    where
        N: Into<Cow<'a, str>>,
    {
        Self {
            name: name.into(),
            destination,
            default,
            _value: PhantomData,
        }
    }
}

impl<T, D, P> OptionalField<'_, T, D, P> {
    pub fn default_value(&self) -> &D {
        &self.default
    }
}

impl<T, P> Binding for Field<'_, T, P> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, D, P> Binding for OptionalField<'_, T, D, P> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<'de, T, P> DecodeBinding<'de> for Field<'_, T, P>
where
    T: Deserialize<'de>,
    P: DerefMut<Target = T>,
{
    fn decode_value<A>(&mut self, map: &mut A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        map.next_value_seed(Place(&mut *self.destination))
    }

    fn decode_absent<E>(self) -> Result<(), E>
    where
        E: de::Error,
    {
        Err(MissingFieldSnafu { name: self.name }.build().into_de())
    }
}

impl<'de, T, D, P> DecodeBinding<'de> for OptionalField<'_, T, D, P>
where
    T: Deserialize<'de>,
    D: Into<T>,
    P: DerefMut<Target = T>,
{
    fn decode_value<A>(&mut self, map: &mut A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        map.next_value_seed(Place(&mut *self.destination))
    }

    fn decode_absent<E>(mut self) -> Result<(), E>
    where
        E: de::Error,
    {
        tracing::debug!(field = %self.name, "absent; fall back to default");
        *self.destination = self.default.into();
        Ok(())
    }
}

impl<T, P> EncodeBinding for Field<'_, T, P>
where
    T: Serialize,
    P: Deref<Target = T>,
{
    fn encode_entry<M>(&self, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        map.serialize_entry(self.name(), &*self.destination)
    }
}

impl<T, D, P> EncodeBinding for OptionalField<'_, T, D, P>
where
    T: Serialize,
    P: Deref<Target = T>,
{
    fn encode_entry<M>(&self, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        map.serialize_entry(self.name(), &*self.destination)
    }
}
