//! ApiResource derive macro for automatic REST API resource trait implementation.
//!
//! This crate provides the [`ApiResource`](macro@ApiResource) derive macro that automatically
//! implements resource metadata traits for API entities. It handles display naming,
//! collection naming, URL generation and API tagging with sensible defaults and
//! customization options.
//!
//! # Examples
//!
//! Basic usage with automatic pluralization and URL generation:
//!
//! ```ignore
//! use core_proc_macros::ApiResource;
//!
//! #[derive(ApiResource)]
//! pub struct Category {
//!     id: ObjectId,
//!     name: String,
//! }
//!
//! // Auto-generated constants:
//! assert_eq!(Category::NAME, "Category");
//! assert_eq!(Category::COLLECTION, "categories");
//! assert_eq!(Category::URL, "/categories");
//! assert_eq!(Category::TAG, "Categories");
//! ```
//!
//! Customizing resource configuration:
//!
//! ```ignore
//! use core_proc_macros::ApiResource;
//!
//! #[derive(ApiResource)]
//! #[api_resource(name = "Type", collection = "types", tag = "Product Types")]
//! pub struct ProductType {
//!     id: ObjectId,
//! }
//!
//! assert_eq!(ProductType::NAME, "Type");
//! assert_eq!(ProductType::COLLECTION, "types");
//! assert_eq!(ProductType::URL, "/types");
//! assert_eq!(ProductType::TAG, "Product Types");
//! ```

extern crate proc_macro;

use darling::FromDeriveInput;
use pluralizer::pluralize;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(api_resource))]
struct ApiResourceInput {
    ident: syn::Ident,
    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    collection: Option<String>,
    #[darling(default)]
    url: Option<String>,
    #[darling(default)]
    tag: Option<String>,
}

/// Derives the `ApiResource` trait implementation with automatic defaults.
///
/// # Attributes
///
/// - `name`: Override the display name (default: struct name)
/// - `collection`: Override the collection name (default: pluralized lowercase display name)
/// - `url`: Override the URL segment (default: `/<collection>`)
/// - `tag`: Override the API tag (default: capitalized collection name)
///
/// # Requirements
///
/// The struct must be a named struct (not a tuple struct or unit struct).
///
/// # Examples
///
/// ```ignore
/// #[derive(ApiResource)]
/// pub struct Story {
///     id: ObjectId,
/// }
///
/// assert_eq!(Story::COLLECTION, "stories");
/// assert_eq!(Story::URL, "/stories");
/// assert_eq!(Story::TAG, "Stories");
/// ```
#[proc_macro_derive(ApiResource, attributes(api_resource))]
pub fn api_resource_derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = parse_macro_input!(input as DeriveInput);

    if !matches!(
        &ast.data,
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(_),
            ..
        })
    ) {
        return syn::Error::new_spanned(&ast.ident, "ApiResource can only be derived for named structs")
            .to_compile_error()
            .into();
    }

    let receiver = match ApiResourceInput::from_derive_input(&ast) {
        Ok(receiver) => receiver,
        Err(err) => return TokenStream::from(err.write_errors()),
    };
    impl_api_resource(receiver).into()
}

fn capitalize_first_letter(input: &str) -> String {
    if input.is_empty() {
        return input.to_owned();
    }

    input
        .char_indices()
        .fold(String::with_capacity(input.len()), |mut acc, (i, c)| {
            if i == 0 {
                acc.push_str(&c.to_uppercase().to_string());
            } else {
                acc.push(c);
            }
            acc
        })
}

fn impl_api_resource(receiver: ApiResourceInput) -> proc_macro2::TokenStream {
    let ident = &receiver.ident;
    let display_name = receiver.name.unwrap_or_else(|| ident.to_string());
    let lowercase = display_name.to_lowercase();

    let collection = receiver
        .collection
        .unwrap_or_else(|| pluralize(&lowercase, 2, false));

    let url = receiver.url.unwrap_or_else(|| format!("/{}", collection));

    let tag = receiver
        .tag
        .unwrap_or_else(|| capitalize_first_letter(&collection));

    quote! {
        impl core_proc_macros::ApiResource for #ident {
            const NAME: &'static str = #display_name;
            const COLLECTION: &'static str = #collection;
            const URL: &'static str = #url;
            const TAG: &'static str = #tag;
        }
    }
}
