//! Implementation of the `#[derive(Record)]` macro.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Data, DeriveInput, Fields, FieldsNamed, FieldsUnnamed, Generics, Index, LitStr,
    parse_macro_input, parse_quote,
};

/// Main implementation of the Record derive macro.
pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    TokenStream::from(expand(&input))
}

fn expand(input: &DeriveInput) -> TokenStream2 {
    match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => expand_named(input, fields),
            Fields::Unnamed(fields) => expand_unnamed(input, fields),
            Fields::Unit => syn::Error::new_spanned(
                &input.ident,
                "Record cannot be derived for unit structs (structs with no fields).",
            )
            .to_compile_error(),
        },
        Data::Enum(_) => syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs, not enums.",
        )
        .to_compile_error(),
        Data::Union(_) => {
            syn::Error::new_spanned(&input.ident, "Record cannot be derived for unions.")
                .to_compile_error()
        }
    }
}

/// Adds `bound` to every type parameter of `generics`.
fn bounded(generics: &Generics, bound: &TokenStream2) -> Generics {
    let mut generics = generics.clone();
    let parameters: Vec<_> = generics
        .type_params()
        .map(|parameter| parameter.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for parameter in parameters {
        where_clause
            .predicates
            .push(parse_quote!(#parameter: #bound));
    }
    generics
}

fn expand_named(input: &DeriveInput, fields: &FieldsNamed) -> TokenStream2 {
    let name = &input.ident;
    let record_name = LitStr::new(&name.unraw().to_string(), name.span());
    let idents: Vec<_> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .collect();
    let labels: Vec<_> = idents
        .iter()
        .map(|ident| LitStr::new(&ident.unraw().to_string(), ident.span()))
        .collect();

    let into_generics = bounded(&input.generics, &quote!(::core::convert::Into<::optica::value::Value>));
    let (impl_generics, type_generics, where_clause) = into_generics.split_for_impl();
    let from_impl = quote! {
        impl #impl_generics ::core::convert::From<#name #type_generics> for ::optica::value::Value
        #where_clause
        {
            fn from(source: #name #type_generics) -> Self {
                ::optica::value::Value::Record(
                    ::optica::value::Record::builder(#record_name)
                        #(.field(#labels, source.#idents))*
                        .build(),
                )
            }
        }
    };

    let from_value_generics = bounded(&input.generics, &quote!(::optica::value::FromValue));
    let (impl_generics, type_generics, where_clause) = from_value_generics.split_for_impl();
    let from_value_impl = quote! {
        impl #impl_generics ::optica::value::FromValue for #name #type_generics #where_clause {
            fn from_value(value: ::optica::value::Value) -> ::optica::OpticResult<Self> {
                let record = match value {
                    ::optica::value::Value::Record(record) => record,
                    other => {
                        return ::core::result::Result::Err(::optica::OpticError::Conversion {
                            target: #record_name,
                            found: other.kind(),
                        });
                    }
                };
                ::core::result::Result::Ok(Self {
                    #(
                        #idents: ::optica::value::FromValue::from_value(
                            ::core::clone::Clone::clone(record.require(#labels)?),
                        )?,
                    )*
                })
            }
        }
    };

    quote! {
        #from_impl
        #from_value_impl
    }
}

fn expand_unnamed(input: &DeriveInput, fields: &FieldsUnnamed) -> TokenStream2 {
    let name = &input.ident;
    let type_name = LitStr::new(&name.unraw().to_string(), name.span());
    let arity = fields.unnamed.len();
    let positions: Vec<_> = (0..arity)
        .map(|position| Index {
            index: u32::try_from(position).unwrap_or(u32::MAX),
            span: Span::call_site(),
        })
        .collect();
    let offsets = 0..arity;

    let into_generics = bounded(&input.generics, &quote!(::core::convert::Into<::optica::value::Value>));
    let (impl_generics, type_generics, where_clause) = into_generics.split_for_impl();
    let from_impl = quote! {
        impl #impl_generics ::core::convert::From<#name #type_generics> for ::optica::value::Value
        #where_clause
        {
            fn from(source: #name #type_generics) -> Self {
                ::optica::value::Value::tuple([
                    #(::core::convert::Into::<::optica::value::Value>::into(source.#positions)),*
                ])
            }
        }
    };

    let from_value_generics = bounded(&input.generics, &quote!(::optica::value::FromValue));
    let (impl_generics, type_generics, where_clause) = from_value_generics.split_for_impl();
    let from_value_impl = quote! {
        impl #impl_generics ::optica::value::FromValue for #name #type_generics #where_clause {
            fn from_value(value: ::optica::value::Value) -> ::optica::OpticResult<Self> {
                match value {
                    ::optica::value::Value::Tuple(items) if items.len() == #arity => {
                        ::core::result::Result::Ok(Self(
                            #(
                                ::optica::value::FromValue::from_value(
                                    ::core::clone::Clone::clone(&items[#offsets]),
                                )?,
                            )*
                        ))
                    }
                    other => ::core::result::Result::Err(::optica::OpticError::Conversion {
                        target: #type_name,
                        found: other.kind(),
                    }),
                }
            }
        }
    };

    quote! {
        #from_impl
        #from_value_impl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn expand_str(input: DeriveInput) -> String {
        expand(&input).to_string()
    }

    #[rstest]
    #[case(parse_quote!(enum Shape { Circle }), "not enums")]
    #[case(parse_quote!(union Bits { a: u32 }), "unions")]
    #[case(parse_quote!(struct Marker;), "unit structs")]
    fn rejects_unsupported_shapes(#[case] input: DeriveInput, #[case] message: &str) {
        let expanded = expand_str(input);
        assert!(expanded.contains("compile_error"));
        assert!(expanded.contains(message));
    }

    #[test]
    fn named_fields_become_record_fields() {
        let expanded = expand_str(parse_quote!(
            struct Point {
                x: i64,
                r#type: String,
            }
        ));
        assert!(expanded.contains("Record :: builder (\"Point\")"));
        assert!(expanded.contains(". field (\"x\" , source . x)"));
        assert!(expanded.contains(". field (\"type\" , source . r#type)"));
        assert!(expanded.contains("record . require (\"type\")"));
    }

    #[test]
    fn tuple_structs_become_tuples() {
        let expanded = expand_str(parse_quote!(
            struct Pair(i64, i64);
        ));
        assert!(expanded.contains("Value :: tuple"));
        assert!(expanded.contains("items . len () == 2usize"));
    }

    #[test]
    fn generic_parameters_are_bounded() {
        let expanded = expand_str(parse_quote!(
            struct Wrapper<T> {
                inner: T,
            }
        ));
        assert!(expanded.contains("T : :: core :: convert :: Into < :: optica :: value :: Value >"));
        assert!(expanded.contains("T : :: optica :: value :: FromValue"));
    }
}
