//! Procedural macros for `formbind`.
//!
//! Provides `#[derive(Controls)]`, which turns a struct with named fields into
//! a controls record: a key enum naming every field, the runtime-checked
//! `Controls` accessor, and one typed `Field` descriptor per field.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, parse_macro_input};

/// Derives `formbind::Controls` for a struct with named fields.
///
/// For `struct Synth { wave: String, muted: bool }` this generates:
///
/// - `enum SynthKey { Wave, Muted }` implementing `ControlKey`, with the field
///   name as key name and `SynthKey::ALL` listing every key in declaration order;
/// - `impl Controls for Synth` reading each field through `AsFieldValue`;
/// - typed descriptors `Synth::WAVE: Field<Synth, String>` and
///   `Synth::MUTED: Field<Synth, bool>`.
///
/// Field types must implement `AsFieldValue` and `Clone`.
///
/// # Attributes
///
/// | Attribute | Where | Effect |
/// |-----------|-------|--------|
/// | `#[controls(key = "Name")]` | struct | names the generated key enum |
/// | `#[controls(skip)]` | field | leaves the field out of the record |
///
/// Doc comments on fields are copied onto the key variants and descriptors.
#[proc_macro_derive(Controls, attributes(controls))]
pub fn derive_controls(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}

struct BoundField<'a> {
    ident: &'a Ident,
    ty: &'a syn::Type,
    name: String,
    variant: Ident,
    constant: Ident,
    docs: Vec<&'a Attribute>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Controls can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Controls can only be derived for structs",
            ));
        }
    };

    let key_name = key_enum_name(input)?;

    let mut bound = Vec::new();
    for field in fields {
        if is_skipped(&field.attrs)? {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "field should have an identifier"));
        };
        let name = unraw(ident);
        bound.push(BoundField {
            ident,
            ty: &field.ty,
            variant: Ident::new(&snake_to_pascal_case(&name), ident.span()),
            constant: Ident::new(&name.to_uppercase(), ident.span()),
            docs: field
                .attrs
                .iter()
                .filter(|attr| attr.path().is_ident("doc"))
                .collect(),
            name,
        });
    }

    let count = bound.len();
    let key_doc = format!("Names a field of [`{name}`].");

    let variants = bound.iter().map(|field| {
        let variant = &field.variant;
        let docs = doc_attrs(field);
        quote! {
            #(#docs)*
            #variant
        }
    });
    let all = bound.iter().map(|field| {
        let variant = &field.variant;
        quote!(#key_name::#variant)
    });
    let name_arms = bound.iter().map(|field| {
        let variant = &field.variant;
        let field_name = &field.name;
        quote!(Self::#variant => #field_name)
    });
    let field_arms = bound.iter().map(|field| {
        let variant = &field.variant;
        let ident = field.ident;
        quote!(#key_name::#variant => ::formbind::AsFieldValue::as_field_value(&self.#ident))
    });
    let descriptors = bound.iter().map(|field| {
        let variant = &field.variant;
        let constant = &field.constant;
        let ident = field.ident;
        let ty = field.ty;
        let docs = doc_attrs(field);
        quote! {
            #(#docs)*
            #vis const #constant: ::formbind::Field<Self, #ty> = ::formbind::Field::new(
                #key_name::#variant,
                |controls: &Self| ::core::clone::Clone::clone(&controls.#ident),
            );
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #[doc = #key_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #vis enum #key_name {
            #(#variants,)*
        }

        impl #key_name {
            /// Every key, in field declaration order.
            #vis const ALL: [Self; #count] = [#(#all),*];
        }

        impl ::formbind::ControlKey for #key_name {
            fn name(&self) -> &str {
                match *self {
                    #(#name_arms,)*
                }
            }
        }

        impl #impl_generics ::formbind::Controls for #name #ty_generics #where_clause {
            type Key = #key_name;

            fn field(&self, key: &Self::Key) -> ::formbind::FieldValue<'_> {
                match *key {
                    #(#field_arms,)*
                }
            }
        }

        #[allow(clippy::redundant_clone)]
        impl #impl_generics #name #ty_generics #where_clause {
            #(#descriptors)*
        }
    };

    Ok(TokenStream::from(expanded))
}

/// Doc comments of the field, or a generated one naming it.
fn doc_attrs(field: &BoundField<'_>) -> Vec<proc_macro2::TokenStream> {
    if field.docs.is_empty() {
        let doc = format!("The `{}` field.", field.name);
        vec![quote!(#[doc = #doc])]
    } else {
        field.docs.iter().map(|attr| quote!(#attr)).collect()
    }
}

fn key_enum_name(input: &DeriveInput) -> syn::Result<Ident> {
    let mut key = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("controls") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let name: LitStr = meta.value()?.parse()?;
                key = Some(name.parse::<Ident>()?);
                Ok(())
            } else {
                Err(meta.error("expected `key = \"Name\"`"))
            }
        })?;
    }
    Ok(key.unwrap_or_else(|| format_ident!("{}Key", input.ident)))
}

fn is_skipped(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if !attr.path().is_ident("controls") {
            continue;
        }
        if let Meta::List(_) = &attr.meta {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `skip`"))
                }
            })?;
        } else {
            return Err(syn::Error::new_spanned(attr, "expected `#[controls(skip)]`"));
        }
    }
    Ok(skip)
}

/// Field name without the `r#` prefix of raw identifiers.
fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or_else(|| name.clone(), str::to_owned)
}

/// Converts `snake_case` to `PascalCase`.
fn snake_to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::snake_to_pascal_case;

    #[test]
    fn pascal_case() {
        assert_eq!(snake_to_pascal_case("cutoff"), "Cutoff");
        assert_eq!(snake_to_pascal_case("filter_cutoff_hz"), "FilterCutoffHz");
        assert_eq!(snake_to_pascal_case("_private"), "Private");
        assert_eq!(snake_to_pascal_case("lfo2_rate"), "Lfo2Rate");
    }
}
