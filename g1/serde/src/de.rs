use std::fmt;
use std::mem;
use std::str;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Unexpected, Visitor};

use crate::error::{DuplicateBindingSnafu, DuplicateFieldSnafu, UnknownFieldSnafu};
use crate::fields::DecodeFields;
use crate::options::Options;

/// Decodes a map into a set of bindings.
///
/// Entries whose key matches a binding are decoded into that binding's destination; unknown keys
/// are skipped.  Once the map is exhausted, optional bindings that were not seen take their default
/// values, and required bindings that were not seen fail the decode.
pub fn decode<'de, D, F>(deserializer: D, fields: F) -> Result<(), D::Error>
where
    D: Deserializer<'de>,
    F: DecodeFields<'de>,
{
    decode_with(deserializer, fields, Options::default())
}

pub fn decode_with<'de, D, F>(deserializer: D, fields: F, options: Options) -> Result<(), D::Error>
where
    D: Deserializer<'de>,
    F: DecodeFields<'de>,
{
    Decoder::with_options(fields, options).deserialize(deserializer)
}

/// `DeserializeSeed` form of `decode`, for use inside other seeds and visitors.
#[derive(Debug)]
pub struct Decoder<F> {
    fields: F,
    options: Options,
}

struct KeySeed<'a, F>(&'a F);

enum Key {
    Bound(usize),
    Unknown(String),
}

impl<F> Decoder<F> {
    pub fn new(fields: F) -> Self {
        Self::with_options(fields, Options::default())
    }

    pub fn with_options(fields: F, options: Options) -> Self {
        Self { fields, options }
    }
}

impl<'de, F> Decoder<F>
where
    F: DecodeFields<'de>,
{
    fn ensure_unique_names<E>(&self) -> Result<(), E>
    where
        E: de::Error,
    {
        let num_fields = self.fields.num_fields();
        for i in 0..num_fields {
            let name = self.field_name(i);
            if (i + 1..num_fields).any(|j| self.field_name(j) == name) {
                return Err(DuplicateBindingSnafu { name }.build().into_de());
            }
        }
        Ok(())
    }

    fn field_name(&self, index: usize) -> &str {
        self.fields.field_name(index).unwrap_or_default()
    }
}

impl<'de, F> DeserializeSeed<'de> for Decoder<F>
where
    F: DecodeFields<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.ensure_unique_names::<D::Error>()?;
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for Decoder<F>
where
    F: DecodeFields<'de>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of named fields")
    }

    fn visit_map<A>(mut self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = vec![false; self.fields.num_fields()];
        while let Some(key) = map.next_key_seed(KeySeed(&self.fields))? {
            match key {
                Key::Bound(index) => {
                    if mem::replace(&mut seen[index], true) {
                        let name = self.field_name(index);
                        return Err(DuplicateFieldSnafu { name }.build().into_de());
                    }
                    self.fields.decode_value(index, &mut map)?;
                }
                Key::Unknown(name) => {
                    if self.options.deny_unknown_fields {
                        return Err(UnknownFieldSnafu { name }.build().into_de());
                    }
                    tracing::trace!(field = %name, "skip unknown field");
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        self.fields.decode_absent(&seen)
    }
}

impl<'de, F> KeySeed<'_, F>
where
    F: DecodeFields<'de>,
{
    fn lookup(&self, name: &str) -> Key {
        (0..self.0.num_fields())
            .find(|&i| self.0.field_name(i) == Some(name))
            .map_or_else(|| Key::Unknown(name.to_string()), Key::Bound)
    }
}

impl<'de, F> DeserializeSeed<'de> for KeySeed<'_, F>
where
    F: DecodeFields<'de>,
{
    type Value = Key;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_identifier(self)
    }
}

impl<'de, F> Visitor<'de> for KeySeed<'_, F>
where
    F: DecodeFields<'de>,
{
    type Value = Key;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a field name")
    }

    fn visit_str<E>(self, name: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.lookup(name))
    }

    // Binary formats (e.g., Bencode) encode dictionary keys as byte strings.
    fn visit_bytes<E>(self, name: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match str::from_utf8(name) {
            Ok(name) => Ok(self.lookup(name)),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(name), &self)),
        }
    }

    // Non-string keys never match a binding, but they are still subject to the unknown-key policy.

    fn visit_bool<E>(self, key: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }

    fn visit_i64<E>(self, key: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }

    fn visit_i128<E>(self, key: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }

    fn visit_u64<E>(self, key: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }

    fn visit_u128<E>(self, key: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }

    fn visit_f64<E>(self, key: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Key::Unknown(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::field::{Field, OptionalField};

    use super::*;

    fn decode_str<'de, F>(json: &'de str, fields: F) -> Result<(), serde_json::Error>
    where
        F: DecodeFields<'de>,
    {
        decode(&mut serde_json::Deserializer::from_str(json), fields)
    }

    #[test]
    fn absent() {
        let mut x = 7u32;
        decode_str("{}", (OptionalField::with_default("x", &mut x, 42),)).unwrap();
        assert_eq!(x, 42);

        let mut s = String::from("spam");
        decode_str("{}", (OptionalField::new("s", &mut s),)).unwrap();
        assert_eq!(s, "");

        let (mut i, mut b) = (7i64, true);
        decode_str(
            "{}",
            (OptionalField::new("i", &mut i), OptionalField::new("b", &mut b)),
        )
        .unwrap();
        assert_eq!(i, 0);
        assert!(!b);
    }

    #[test]
    fn present() {
        let mut x = 0u32;
        decode_str(r#"{"x": 7}"#, (OptionalField::with_default("x", &mut x, 42),)).unwrap();
        assert_eq!(x, 7);

        let mut s = String::new();
        decode_str(
            r#"{"s": "spam"}"#,
            (OptionalField::with_default_into("s", &mut s, "egg"),),
        )
        .unwrap();
        assert_eq!(s, "spam");
    }

    #[test]
    fn present_but_malformed() {
        let mut x = 1u32;
        let error = decode_str(
            r#"{"x": "spam"}"#,
            (OptionalField::with_default("x", &mut x, 42),),
        )
        .unwrap_err();
        assert!(error.is_data(), "{error:?}");
        assert_eq!(x, 1);

        let mut x = 1u8;
        assert!(decode_str(r#"{"x": 256}"#, (OptionalField::new("x", &mut x),)).is_err());
        assert_eq!(x, 1);
    }

    #[test]
    fn independence() {
        for (json, expect) in [
            ("{}", (1, 2)),
            (r#"{"x": 10}"#, (10, 2)),
            (r#"{"y": 20}"#, (1, 20)),
            (r#"{"y": 20, "x": 10}"#, (10, 20)),
        ] {
            let (mut x, mut y) = (0u8, 0u8);
            decode_str(
                json,
                (
                    OptionalField::with_default("x", &mut x, 1),
                    OptionalField::with_default("y", &mut y, 2),
                ),
            )
            .unwrap();
            assert_eq!((x, y), expect, "{json}");
        }
    }

    #[test]
    fn required() {
        let (mut x, mut y) = (0u8, 0u8);
        decode_str(
            r#"{"x": 1}"#,
            (Field::new("x", &mut x), OptionalField::new("y", &mut y)),
        )
        .unwrap();
        assert_eq!((x, y), (1, 0));

        let (mut x, mut y) = (0u8, 0u8);
        let error = decode_str(
            r#"{"y": 2}"#,
            (Field::new("x", &mut x), OptionalField::new("y", &mut y)),
        )
        .unwrap_err();
        assert!(error.to_string().starts_with("missing field `x`"), "{error}");
    }

    #[test]
    fn unknown_field() {
        let mut x = 0u8;
        decode_str(
            r#"{"spam": [1, {"egg": null}], "x": 3}"#,
            (OptionalField::new("x", &mut x),),
        )
        .unwrap();
        assert_eq!(x, 3);

        let mut x = 0u8;
        let error = decode_with(
            &mut serde_json::Deserializer::from_str(r#"{"x": 3, "spam": 1}"#),
            (OptionalField::new("x", &mut x),),
            Options::new().deny_unknown_fields(true),
        )
        .unwrap_err();
        assert!(error.to_string().starts_with("unknown field `spam`"), "{error}");
    }

    #[test]
    fn duplicate_field() {
        let mut x = 0u8;
        let error = decode_str(
            r#"{"x": 1, "x": 2}"#,
            (OptionalField::new("x", &mut x),),
        )
        .unwrap_err();
        assert!(error.to_string().starts_with("duplicate field `x`"), "{error}");
    }

    #[test]
    fn duplicate_binding() {
        let (mut x, mut y) = (0u8, 0u8);
        let error = decode_str(
            "{}",
            (OptionalField::new("x", &mut x), OptionalField::new("x", &mut y)),
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "field `x` is bound more than once");
    }

    #[test]
    fn not_a_map() {
        let mut x = 0u8;
        let error = decode_str("[1]", (OptionalField::new("x", &mut x),)).unwrap_err();
        assert!(error.to_string().contains("a map of named fields"), "{error}");
    }

    #[test]
    fn from_value() {
        let mut x = 0u32;
        let mut s = String::new();
        decode(
            json!({"s": "spam"}),
            (
                OptionalField::with_default("x", &mut x, 42),
                Field::new("s", &mut s),
            ),
        )
        .unwrap();
        assert_eq!(x, 42);
        assert_eq!(s, "spam");
    }

    #[test]
    fn bytes_key() {
        struct Bytes<'a>(&'a [u8]);

        impl<'de> de::Deserializer<'de> for Bytes<'_> {
            type Error = serde_json::Error;

            fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                visitor.visit_bytes(self.0)
            }

            serde::forward_to_deserialize_any! {
                bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
                bytes byte_buf option unit unit_struct newtype_struct seq tuple
                tuple_struct map struct enum identifier ignored_any
            }
        }

        let mut x = 0u8;
        let fields = (OptionalField::new("x", &mut x),);
        assert!(matches!(
            KeySeed(&fields).deserialize(Bytes(b"x")).unwrap(),
            Key::Bound(0),
        ));
        assert!(matches!(
            KeySeed(&fields).deserialize(Bytes(b"y")).unwrap(),
            Key::Unknown(name) if name == "y",
        ));
        assert!(KeySeed(&fields).deserialize(Bytes(b"\xff")).is_err());
    }

    #[test]
    fn non_string_key() {
        type MapDeserializer<K> =
            serde::de::value::MapDeserializer<'static, std::vec::IntoIter<(K, u8)>, ValueError>;
        type ValueError = serde::de::value::Error;

        let mut x = 0u8;
        decode(
            MapDeserializer::new(vec![(1u32, 5u8)].into_iter()),
            (OptionalField::with_default("x", &mut x, 9),),
        )
        .unwrap();
        assert_eq!(x, 9);

        let mut x = 0u8;
        decode(
            MapDeserializer::new(vec![(-1i64, 5u8), (2, 6)].into_iter()),
            (OptionalField::with_default("x", &mut x, 9),),
        )
        .unwrap();
        assert_eq!(x, 9);

        let mut x = 0u8;
        decode(
            MapDeserializer::new(vec![(true, 5u8)].into_iter()),
            (OptionalField::with_default("x", &mut x, 9),),
        )
        .unwrap();
        assert_eq!(x, 9);

        let mut x = 0u8;
        let error = decode_with(
            MapDeserializer::new(vec![(1u32, 5u8)].into_iter()),
            (OptionalField::with_default("x", &mut x, 9),),
            Options::new().deny_unknown_fields(true),
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "unknown field `1`");
        assert_eq!(x, 0);
    }

    #[test]
    fn nested_seed() {
        #[derive(Debug, PartialEq)]
        struct Outer {
            inner: u8,
            flag: bool,
        }

        impl<'de> Deserialize<'de> for Outer {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let mut inner = 0;
                let mut flag = false;
                Decoder::new((
                    OptionalField::with_default("inner", &mut inner, 9),
                    OptionalField::new("flag", &mut flag),
                ))
                .deserialize(deserializer)?;
                Ok(Self { inner, flag })
            }
        }

        assert_eq!(
            serde_json::from_str::<Vec<Outer>>(r#"[{}, {"inner": 1, "flag": true}]"#).unwrap(),
            vec![
                Outer {
                    inner: 9,
                    flag: false,
                },
                Outer {
                    inner: 1,
                    flag: true,
                },
            ],
        );
    }
}
