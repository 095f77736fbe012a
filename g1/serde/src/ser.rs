use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::fields::EncodeFields;

/// Encodes a set of bindings as one map, in binding order.
///
/// Optional bindings are encoded exactly like required ones: the destination's current value is
/// written under the binding's name, and the default value plays no role.
pub fn encode<F>(fields: F) -> Encoder<F>
where
    F: EncodeFields,
{
    Encoder(fields)
}

#[derive(Debug)]
pub struct Encoder<F>(F);

impl<F> Serialize for Encoder<F>
where
    F: EncodeFields,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.num_fields()))?;
        self.0.encode_entries(&mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::field::{Field, OptionalField};

    use super::*;

    #[test]
    fn encode_fields() {
        let mut x = 42u32;
        assert_eq!(
            serde_json::to_string(&encode((OptionalField::with_default("x", &mut x, 7),))).unwrap(),
            r#"{"x":42}"#,
        );

        let (mut x, mut s, mut b) = (1u8, String::from("spam"), false);
        assert_eq!(
            serde_json::to_string(&encode((
                Field::new("x", &mut x),
                OptionalField::new("s", &mut s),
                OptionalField::with_default_into("b", &mut b, true),
            )))
            .unwrap(),
            r#"{"x":1,"s":"spam","b":false}"#,
        );
    }
}
