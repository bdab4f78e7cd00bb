use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Fields, Ident, LitStr, Type, Visibility,
    ext::IdentExt as _, spanned::Spanned as _,
};

struct ParsedField<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
    exported: bool,
    tags: Vec<(String, String)>,
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    tags: Vec<(String, String)>,
}

impl<'a> ParsedField<'a> {
    fn from_field(field: &'a syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

        let FieldAttrs { skip, tags } = parse_field_attrs(&field.attrs)?;
        if skip && !tags.is_empty() {
            return Err(syn::Error::new(
                field.span(),
                "a skipped field can't also carry tags",
            ));
        }

        Ok(Self {
            ident,
            name: ident.unraw().to_string(),
            ty: &field.ty,
            exported: !skip && !matches!(field.vis, Visibility::Inherited),
            tags,
        })
    }
}

/// Collect `#[tag(key = "value", ...)]` pairs and the bare `#[tag(skip)]`
/// marker. Several attributes may be given; a key may appear only once per
/// field.
fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    let tags = &mut parsed.tags;
    let skip = &mut parsed.skip;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("tag")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") && !meta.input.peek(syn::Token![=]) {
                *skip = true;
                return Ok(());
            }

            let key = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("tag keys must be plain identifiers"))?
                .unraw()
                .to_string();
            let value: LitStr = meta.value()?.parse()?;

            if tags.iter().any(|(known, _)| *known == key) {
                return Err(meta.error(format!("duplicate tag key `{key}`")));
            }
            tags.push((key, value.value()));
            Ok(())
        })?;
    }

    Ok(parsed)
}

fn derive_flags_struct(ident: &Ident, data: &DataStruct) -> syn::Result<TokenStream2> {
    let fields = match data.fields {
        Fields::Named(ref named) => named
            .named
            .iter()
            .map(ParsedField::from_field)
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(ref unnamed) => {
            return Err(syn::Error::new(
                unnamed.span(),
                "can't derive `Flags` on a tuple struct; fields need names",
            ));
        }
    };

    let type_name = ident.unraw().to_string();
    let exported: Vec<&ParsedField> = fields.iter().filter(|field| field.exported).collect();

    let field_entries = exported.iter().map(|field| {
        let ParsedField {
            ident, name, tags, ..
        } = field;
        let tags = tags.iter().map(|(key, value)| quote! { (#key, #value) });
        quote! {
            ::flagbind::Field::new(#name, &[ #(#tags),* ], &self.#ident)
        }
    });

    let field_mut_entries = exported.iter().map(|field| {
        let ParsedField {
            ident, name, tags, ..
        } = field;
        let tags = tags.iter().map(|(key, value)| quote! { (#key, #value) });
        quote! {
            ::flagbind::FieldMut::new(#name, &[ #(#tags),* ], &mut self.#ident)
        }
    });

    let zero = match data.fields {
        Fields::Unit => quote! { Self },
        _ => {
            let inits = fields.iter().map(|field| {
                let ParsedField { ident, ty, .. } = field;
                if field.exported {
                    quote! { #ident: <#ty as ::flagbind::Slot>::zero()? }
                } else {
                    quote! { #ident: ::core::default::Default::default() }
                }
            });
            quote! { Self { #(#inits,)* } }
        }
    };

    Ok(quote! {
        impl ::flagbind::Flags for #ident {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn fields(&self) -> ::std::vec::Vec<::flagbind::Field<'_>> {
                ::std::vec![ #(#field_entries),* ]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::flagbind::FieldMut<'_>> {
                ::std::vec![ #(#field_mut_entries),* ]
            }
        }

        impl ::flagbind::Slot for #ident {
            fn shape() -> ::flagbind::Shape {
                ::flagbind::Shape::Record(#type_name)
            }

            fn zero() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(#zero)
            }

            fn from_dynamic(_value: ::flagbind::Dynamic) -> ::core::option::Option<Self> {
                ::core::option::Option::None
            }

            fn slot_shape(&self) -> ::flagbind::Shape {
                <Self as ::flagbind::Slot>::shape()
            }

            fn to_dynamic(&self) -> ::flagbind::Dynamic {
                ::flagbind::Dynamic::Record(#type_name)
            }

            fn assign(
                &mut self,
                value: ::flagbind::Dynamic,
            ) -> ::core::result::Result<(), ::flagbind::FlagbindError> {
                ::core::result::Result::Err(::flagbind::FlagbindError::TypeMismatch {
                    expected: ::std::string::String::from(#type_name),
                    found: ::std::string::ToString::to_string(&value.shape()),
                })
            }

            fn nested(&self) -> ::core::option::Option<::flagbind::Nested<'_>> {
                ::core::option::Option::Some(::flagbind::Nested::Borrowed(self))
            }

            fn nested_mut(&mut self) -> ::core::option::Option<&mut dyn ::flagbind::Flags> {
                ::core::option::Option::Some(self)
            }

            fn into_nested(
                self: ::std::boxed::Box<Self>,
            ) -> ::core::option::Option<::std::boxed::Box<dyn ::flagbind::Flags>> {
                ::core::option::Option::Some(self)
            }
        }
    })
}

fn derive_flags_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "can't derive `Flags` on a generic type",
        ));
    }

    match input.data {
        Data::Struct(ref data) => derive_flags_struct(&input.ident, data),
        Data::Enum(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Flags` on an enum; declare it with `flagbind::base_type!` instead",
        )),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Flags` on a union",
        )),
    }
}

/// Derive `flagbind::Flags` (and `flagbind::Slot`) for a struct with named
/// fields.
///
/// Only exported (`pub`) fields are listed. Tags are given per field:
///
/// ```ignore
/// #[derive(Flags, Default)]
/// struct Config {
///     #[tag(flag = "port", env = "PORT")]
///     pub port: u16,
///     pub database: Database,
///     cache: Cache,
/// }
/// ```
///
/// Every listed field must implement `flagbind::Slot`, tagged or not. A `pub`
/// field of any other type (a `PathBuf`, a `HashMap`) needs `#[tag(skip)]`,
/// which leaves it out exactly like a private field.
///
/// Private and skipped fields must implement `Default`; it builds them when a
/// zero value of the struct is needed.
#[proc_macro_derive(Flags, attributes(tag))]
pub fn derive_flags(item: TokenStream) -> TokenStream {
    match derive_flags_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
