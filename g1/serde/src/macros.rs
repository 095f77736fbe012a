/// Binds a required field to a place, using the place's identifier as the field name.
///
/// ```
/// let mut port = 0u16;
/// let field = g1_serde::field!(port);
/// # let _ = field;
/// ```
///
/// `field!(ref x)` binds a shared reference instead, which can be encoded but not decoded:
///
/// ```compile_fail
/// let port = 0u16;
/// g1_serde::decode(serde_json::json!({}), (g1_serde::field!(ref port),)).unwrap();
/// ```
#[macro_export]
macro_rules! field {
    (ref $base:ident . $field:ident $(,)?) => {
        $crate::Field::new(::core::stringify!($field), &$base.$field)
    };
    (ref $field:ident $(,)?) => {
        $crate::Field::new(::core::stringify!($field), &$field)
    };
    ($base:ident . $field:ident $(,)?) => {
        $crate::Field::new(::core::stringify!($field), &mut $base.$field)
    };
    ($field:ident $(,)?) => {
        $crate::Field::new(::core::stringify!($field), &mut $field)
    };
}

/// Binds an optional field to a place, using the place's identifier as the field name.
///
/// * `optional!(x)` falls back to the default value of `x`'s type.
/// * `optional!(x, default)` falls back to `default`, which must have the same type as `x`.
///
/// The place may also be a field access, as in `optional!(self.x)`, in which case the field name
/// is the last identifier.  Prefixing the place with `ref` binds a shared reference for encoding,
/// as in `optional!(ref self.x, 80)`.
///
/// ```
/// let mut port = 0u16;
/// let mut host = String::new();
/// g1_serde::decode(
///     serde_json::json!({"host": "localhost"}),
///     (g1_serde::optional!(host), g1_serde::optional!(port, 8080)),
/// )
/// .unwrap();
/// assert_eq!(host, "localhost");
/// assert_eq!(port, 8080);
/// ```
///
/// Any other number of arguments is rejected at compile time:
///
/// ```compile_fail
/// let mut x = 0u32;
/// let _ = g1_serde::optional!(x, 1, 2);
/// ```
///
/// ```compile_fail
/// let _ = g1_serde::optional!();
/// ```
///
/// And so is a default of a different type:
///
/// ```compile_fail
/// let mut x = 0u32;
/// let _ = g1_serde::optional!(x, "forty-two");
/// ```
///
/// The one-argument form requires `Default`:
///
/// ```compile_fail
/// struct NoDefault;
/// let mut x = NoDefault;
/// let _ = g1_serde::optional!(x);
/// ```
#[macro_export]
macro_rules! optional {
    (ref $base:ident . $field:ident $(,)?) => {
        $crate::OptionalField::new(::core::stringify!($field), &$base.$field)
    };
    (ref $base:ident . $field:ident, $default:expr $(,)?) => {
        $crate::OptionalField::with_default(::core::stringify!($field), &$base.$field, $default)
    };
    (ref $field:ident $(,)?) => {
        $crate::OptionalField::new(::core::stringify!($field), &$field)
    };
    (ref $field:ident, $default:expr $(,)?) => {
        $crate::OptionalField::with_default(::core::stringify!($field), &$field, $default)
    };
    ($base:ident . $field:ident $(,)?) => {
        $crate::OptionalField::new(::core::stringify!($field), &mut $base.$field)
    };
    ($base:ident . $field:ident, $default:expr $(,)?) => {
        $crate::OptionalField::with_default(
            ::core::stringify!($field),
            &mut $base.$field,
            $default,
        )
    };
    ($field:ident $(,)?) => {
        $crate::OptionalField::new(::core::stringify!($field), &mut $field)
    };
    ($field:ident, $default:expr $(,)?) => {
        $crate::OptionalField::with_default(::core::stringify!($field), &mut $field, $default)
    };
}
