use serde::de::{self, MapAccess};
use serde::ser::SerializeMap;

use crate::binding::{DecodeBinding, EncodeBinding};

/// A set of bindings that are decoded from one map.
///
/// It is implemented for tuples of up to 16 `DecodeBinding`s, which may be of different types.
/// Bindings are addressed by their position in the tuple.
pub trait DecodeFields<'de> {
    fn num_fields(&self) -> usize;

    fn field_name(&self, index: usize) -> Option<&str>;

    fn decode_value<A>(&mut self, index: usize, map: &mut A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>;

    /// Resolves every binding whose `seen` flag is false or missing.
    fn decode_absent<E>(self, seen: &[bool]) -> Result<(), E>
    where
        E: de::Error;
}

/// A set of bindings that are encoded as one map.
pub trait EncodeFields {
    fn num_fields(&self) -> usize;

    fn encode_entries<M>(&self, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap;
}

macro_rules! impl_fields {
    ($len:literal; $($binding:ident $index:tt),+ $(,)?) => {
        impl<'de, $($binding),+> DecodeFields<'de> for ($($binding,)+)
        where
            $($binding: DecodeBinding<'de>,)+
        {
            fn num_fields(&self) -> usize {
                $len
            }

            fn field_name(&self, index: usize) -> Option<&str> {
                match index {
                    $($index => Some(self.$index.name()),)+
                    _ => None,
                }
            }

            fn decode_value<A>(&mut self, index: usize, map: &mut A) -> Result<(), A::Error>
            where
                A: MapAccess<'de>,
            {
                match index {
                    $($index => self.$index.decode_value(map),)+
                    _ => std::unreachable!("field index out of range: {index}"),
                }
            }

            fn decode_absent<E>(self, seen: &[bool]) -> Result<(), E>
            where
                E: de::Error,
            {
                $(
                    if !seen.get($index).copied().unwrap_or(false) {
                        self.$index.decode_absent::<E>()?;
                    }
                )+
                Ok(())
            }
        }

        impl<$($binding),+> EncodeFields for ($($binding,)+)
        where
            $($binding: EncodeBinding,)+
        {
            fn num_fields(&self) -> usize {
                $len
            }

            fn encode_entries<M>(&self, map: &mut M) -> Result<(), M::Error>
            where
                M: SerializeMap,
            {
                $(self.$index.encode_entry(map)?;)+
                Ok(())
            }
        }
    };
}

impl_fields!(1; B0 0);
impl_fields!(2; B0 0, B1 1);
impl_fields!(3; B0 0, B1 1, B2 2);
impl_fields!(4; B0 0, B1 1, B2 2, B3 3);
impl_fields!(5; B0 0, B1 1, B2 2, B3 3, B4 4);
impl_fields!(6; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5);
impl_fields!(7; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6);
impl_fields!(8; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7);
impl_fields!(9; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8);
impl_fields!(10; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9);
impl_fields!(11; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10);
impl_fields!(12; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10, B11 11);
#[rustfmt::skip]
impl_fields!(13; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10, B11 11, B12 12);
#[rustfmt::skip]
impl_fields!(14; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10, B11 11, B12 12, B13 13);
#[rustfmt::skip]
impl_fields!(15; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10, B11 11, B12 12, B13 13, B14 14);
#[rustfmt::skip]
impl_fields!(16; B0 0, B1 1, B2 2, B3 3, B4 4, B5 5, B6 6, B7 7, B8 8, B9 9, B10 10, B11 11, B12 12, B13 13, B14 14, B15 15);
