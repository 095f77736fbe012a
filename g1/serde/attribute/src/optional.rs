use proc_macro2::{TokenStream, TokenTree};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataEnum, DataStruct, DeriveInput, Error, Expr, Field, Ident, ItemFn, LitStr,
    Meta, Token,
};

macro_rules! ensure {
    ($predicate:expr, $span:expr, $message:expr $(,)?) => {
        if !$predicate {
            return Err(Error::new($span, $message));
        }
    };
}

//
// `DeriveInput`
//

pub(crate) fn optional_fields(mut input: DeriveInput) -> Result<TokenStream, Error> {
    let generic = input.generics.type_params().next().is_some()
        || input.generics.const_params().next().is_some();
    let container = input.ident.clone();

    let mut default_fns = Vec::new();
    match &mut input.data {
        Data::Struct(DataStruct { fields, .. }) => {
            for field in fields {
                default_fns.extend(annotate_field(field, &[&container], generic)?);
            }
        }
        Data::Enum(DataEnum { variants, .. }) => {
            for variant in variants {
                let variant_ident = variant.ident.clone();
                for field in &mut variant.fields {
                    default_fns.extend(annotate_field(
                        field,
                        &[&container, &variant_ident],
                        generic,
                    )?);
                }
            }
        }
        Data::Union(union) => {
            return Err(Error::new(
                union.union_token.span,
                "`optional_fields` does not support union",
            ));
        }
    }
    Ok(quote::quote!(
        #input
        #(#default_fns)*
    ))
}

/// Rewrites the `#[optional]` attribute of a field, and returns the default-value function that
/// the rewritten attribute refers to, if any.
fn annotate_field(
    field: &mut Field,
    path: &[&Ident],
    generic: bool,
) -> Result<Option<ItemFn>, Error> {
    let mut optional = None;
    let mut conflict = None;

    let mut i = 0;
    while i < field.attrs.len() {
        match Attr::try_parse(&field.attrs[i])? {
            Some(Attr(args)) => {
                ensure!(
                    optional.is_none(),
                    field.attrs[i].span(),
                    "duplicated `optional`",
                );
                let mut default = None;
                for arg in args {
                    match arg {
                        AttrArg::Default(ident, expr) => {
                            ensure!(
                                default.is_none(),
                                ident.span(),
                                "duplicated `optional(default = ...)`",
                            );
                            default = Some(expr);
                        }
                    }
                }
                optional = Some(default);
                field.attrs.remove(i);
            }
            None => {
                if let Err(error) = ensure_no_conflict(&field.attrs[i]) {
                    conflict.get_or_insert(error); // Keep the first conflict.
                }
                i += 1;
            }
        }
    }

    let Some(default) = optional else {
        return Ok(None);
    };

    if let Some(error) = conflict {
        return Err(error);
    }

    let Some(ident) = field.ident.as_ref() else {
        return Err(Error::new(
            field.ty.span(),
            "`optional` may only be applied to named fields",
        ));
    };

    let Some(expr) = default else {
        field.attrs.push(syn::parse_quote!(#[serde(default)]));
        return Ok(None);
    };

    ensure!(
        !generic,
        expr.span(),
        "`optional(default = ...)` does not support generic types",
    );

    let name = default_fn_name(path, ident);
    let name_str = LitStr::new(&name.to_string(), ident.span());
    let type_ = &field.ty;
    let default_fn = syn::parse_quote!(
        #[allow(non_snake_case)]
        #[doc(hidden)]
        fn #name() -> #type_ {
            #expr
        }
    );
    field.attrs.push(syn::parse_quote!(#[serde(default = #name_str)]));

    Ok(Some(default_fn))
}

fn default_fn_name(path: &[&Ident], field: &Ident) -> Ident {
    let mut name = String::from("__optional_fields_default");
    for ident in path.iter().copied().chain([field]) {
        name.push('_');
        name.push_str(&ident.unraw().to_string());
    }
    Ident::new(&name, field.span())
}

//
// `Attr`
//

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Attr(AttrArgs);

impl Attr {
    fn try_parse(attr: &Attribute) -> Result<Option<Self>, Error> {
        if !attr.path().is_ident("optional") {
            return Ok(None);
        }
        Ok(Some(Self(match &attr.meta {
            Meta::Path(_) => AttrArgs::new(),
            Meta::List(_) => attr.parse_args_with(AttrArgs::parse_terminated)?,
            Meta::NameValue(meta) => {
                return Err(Error::new(
                    meta.eq_token.span,
                    "expect `optional` or `optional(default = ...)`",
                ));
            }
        })))
    }
}

type AttrArgs = Punctuated<AttrArg, Token![,]>;

#[cfg_attr(test, derive(Debug, PartialEq))]
enum AttrArg {
    Default(Ident, Expr),
}

impl Parse for AttrArg {
    fn parse(input: ParseStream) -> Result<Self, Error> {
        let name = input.parse::<Ident>()?;
        if name == "default" {
            input.parse::<Token![=]>()?;
            Ok(Self::Default(name, input.parse()?))
        } else {
            Err(Error::new(name.span(), "unknown `optional(...)` argument"))
        }
    }
}

//
// `SerdeAttrArg`
//

fn ensure_no_conflict(attr: &Attribute) -> Result<(), Error> {
    if attr.path().is_ident("serde") {
        for arg in attr.parse_args_with(SerdeAttrArgs::parse_terminated)? {
            arg.ensure_no_conflict()?;
        }
    }
    Ok(())
}

type SerdeAttrArgs = Punctuated<SerdeAttrArg, Token![,]>;

#[cfg_attr(test, derive(Debug, PartialEq))]
struct SerdeAttrArg {
    name: Ident,
    // In our use case, the argument value is ignored.
}

impl Parse for SerdeAttrArg {
    fn parse(input: ParseStream) -> Result<Self, Error> {
        let name = input.parse::<Ident>()?;
        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            input.parse::<LitStr>()?;
        } else if input.peek(syn::token::Paren) {
            // For example, `serde(bound(deserialize = "..."))`.
            input.parse::<TokenTree>()?;
        }
        Ok(Self { name })
    }
}

impl SerdeAttrArg {
    fn ensure_no_conflict(&self) -> Result<(), Error> {
        // At the moment, we do not reconcile a `serde(default)` applied by you with the one applied
        // by us; instead, we simply return an error.
        ensure!(
            self.name != "default",
            self.name.span(),
            "`optional` conflicts with `serde(default)`",
        );
        Ok(())
    }
}
