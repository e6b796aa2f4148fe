//! Skeleton source generation from a type definition.
//!
//! Given a list of property and method names, [`synthesize_type`] emits the
//! Rust source of a struct with one field per property, a positional
//! constructor, and an empty method per listed method. The output is a
//! starting point for a human to fill in, not a working type.

use crate::error::{ElementError, ElementResult};
use crate::schema::ClassMetadata;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Struct name used when a definition carries no class name.
pub const DEFAULT_CLASS_NAME: &str = "NewClass";

/// Keywords that cannot be written as raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Input to [`synthesize_type`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl TypeDefinition {
    /// Parses a JSON definition.
    pub fn decode(text: &str) -> ElementResult<Self> {
        serde_json::from_str(text).map_err(|e| ElementError::MetadataDecode(e.to_string()))
    }
}

impl From<ClassMetadata> for TypeDefinition {
    fn from(metadata: ClassMetadata) -> Self {
        Self {
            class_name: Some(metadata.class_name),
            properties: metadata.properties,
            methods: metadata.methods,
        }
    }
}

/// Emits skeleton Rust source for `definition`.
///
/// Fails with [`ElementError::MetadataDecode`] when a name is not a valid
/// identifier, is listed twice, or a method is called `new`.
pub fn synthesize_type(definition: &TypeDefinition) -> ElementResult<String> {
    Ok(generate(definition)?.to_string())
}

/// Token form of [`synthesize_type`].
pub fn generate(definition: &TypeDefinition) -> ElementResult<TokenStream> {
    let class_name = definition
        .class_name
        .as_deref()
        .unwrap_or(DEFAULT_CLASS_NAME);
    let type_ident = ident(class_name)?;
    let properties = idents(&definition.properties, "property")?;
    let methods = idents(&definition.methods, "method")?;
    if definition.methods.iter().any(|m| m == "new") {
        return Err(ElementError::MetadataDecode(
            "method `new` clashes with the generated constructor".to_string(),
        ));
    }

    let camel_allow = (!class_name.starts_with(|c: char| c.is_ascii_uppercase()))
        .then(|| quote!(#[allow(non_camel_case_types)]));
    let snake_allow = (!definition
        .properties
        .iter()
        .chain(&definition.methods)
        .all(|n| is_snake_case(n)))
    .then(|| quote!(#[allow(non_snake_case)]));

    Ok(quote! {
        #camel_allow
        #snake_allow
        #[derive(Debug, Clone, PartialEq)]
        pub struct #type_ident {
            #(pub #properties: serde_json::Value,)*
        }

        #snake_allow
        impl #type_ident {
            pub fn new(#(#properties: serde_json::Value),*) -> Self {
                Self { #(#properties),* }
            }

            #(pub fn #methods(&self) {})*
        }
    })
}

fn idents(names: &[String], kind: &str) -> ElementResult<Vec<Ident>> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            if !seen.insert(name.as_str()) {
                return Err(ElementError::MetadataDecode(format!(
                    "{kind} {name:?} is listed more than once"
                )));
            }
            ident(name)
        })
        .collect()
}

/// Validates `name` and builds its identifier, raw when `name` is a keyword.
fn ident(name: &str) -> ElementResult<Ident> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid || RESERVED.iter().any(|r| *r == name) {
        return Err(ElementError::MetadataDecode(format!(
            "{name:?} is not a valid identifier"
        )));
    }
    // syn refuses keywords as plain identifiers.
    match syn::parse_str::<Ident>(name) {
        Ok(ident) => Ok(ident),
        Err(_) => Ok(Ident::new_raw(name, Span::call_site())),
    }
}

fn is_snake_case(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
