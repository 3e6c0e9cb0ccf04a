use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// Generates the static field table of `pagesql::BindRecord`.
///
/// Every named field becomes a slot under its own name, unless renamed with
/// `#[bind(rename = "SQL_NAME")]` or left out with `#[bind(skip)]`. Field
/// types must implement `pagesql::FromColumn`.
#[proc_macro_derive(BindRecord, attributes(bind))]
pub fn bind_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields_named) => &fields_named.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "BindRecord only works on structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "BindRecord only works on structs",
            ));
        }
    };

    let mut slots = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(name) = bind_name(field)? else {
            continue;
        };
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };

        slots.push(quote! {
            ::pagesql::FieldSlot {
                name: #name,
                load: |record, row, index| {
                    ::pagesql::FromColumn::load(&mut record.#field_name, row, index)
                },
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::pagesql::BindRecord for #struct_name #ty_generics #where_clause {
            const FIELDS: &'static [::pagesql::FieldSlot<Self>] = &[
                #(#slots),*
            ];
        }
    })
}

/// SQL name of a field, or `None` for `#[bind(skip)]`.
fn bind_name(field: &Field) -> syn::Result<Option<String>> {
    let mut name = field.ident.as_ref().map(|ident| {
        let ident = ident.to_string();
        ident.strip_prefix("r#").map(str::to_owned).unwrap_or(ident)
    });

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let renamed: LitStr = meta.value()?.parse()?;
                if renamed.value().is_empty() {
                    return Err(meta.error("bind name cannot be empty"));
                }
                name = Some(renamed.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                name = None;
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `skip`"))
            }
        })?;
    }

    Ok(name)
}
