mod optional;

use proc_macro::TokenStream;
use syn::{DeriveInput, Error};

///
/// Rewrites `#[optional]` field attributes into Serde attributes that make the fields optional
/// during deserialization.
///
/// By default, Serde fails to deserialize a struct when one of its fields is absent from the input.
/// Serde offers `serde(default)` and `serde(default = "path")` to override this, but the latter
/// only accepts a path to a function, not an expression.  This attribute fills the gap:
///
/// * `#[optional]`: Falls back to `Default::default()`.  It is rewritten as `serde(default)`.
///
/// * `#[optional(default = <expr>)]`: Falls back to `<expr>`, which must have the field's type.  A
///   private function returning `<expr>` is generated next to the annotated type, and the field is
///   annotated with `serde(default = "<that function>")`.
///
/// Serialization is unaffected: optional fields are always serialized.
///
/// This attribute must be placed before `#[derive(Deserialize)]`.
///
#[proc_macro_attribute]
pub fn optional_fields(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    if !args.is_empty() {
        return Error::new_spanned(args, "`optional_fields` does not take arguments")
            .to_compile_error()
            .into();
    }
    optional::optional_fields(syn::parse_macro_input!(input as DeriveInput))
        .unwrap_or_else(|error| {
            let compile_errors = error.to_compile_error();
            quote::quote!(#compile_errors)
        })
        .into()
}
