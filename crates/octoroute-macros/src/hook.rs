//! `#[hook(...)]` attribute implementation.
//!
//! ```text
//! #[hook(label, actions(created))]        fn on_label(..) { .. }
//! fn on_label(..) { .. }           ──▶    static ON_LABEL_HOOK: HookDescriptor = HookDescriptor {
//!                                             event: EventType::Label,
//!                                             actions: &[ActionType::Created],
//!                                             handler: |e| into_result(on_label(e)),
//!                                             ..
//!                                         };
//! ```
//!
//! Event and action names are written in their wire form and mapped onto the
//! enum variant, so a misspelt name fails to compile at the variant path.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Ident, ItemFn, LitBool, LitStr, Path, Token, parenthesized};

// ============================================================================
// Attribute arguments
// ============================================================================

#[derive(Default)]
struct HookArgs {
    event: Option<Ident>,
    actions: Vec<Ident>,
    repositories: Vec<LitStr>,
    debug: bool,
    name: Option<LitStr>,
    krate: Option<Path>,
}

impl HookArgs {
    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("actions") {
            meta.parse_nested_meta(|action| {
                let ident = action
                    .path
                    .get_ident()
                    .cloned()
                    .ok_or_else(|| action.error("expected an action name such as `created`"))?;
                self.actions.push(ident);
                Ok(())
            })
        } else if meta.path.is_ident("repositories") {
            let content;
            parenthesized!(content in meta.input);
            for repository in Punctuated::<LitStr, Token![,]>::parse_terminated(&content)? {
                validate_repository(&repository)?;
                self.repositories.push(repository);
            }
            Ok(())
        } else if meta.path.is_ident("debug") {
            self.debug = if meta.input.peek(Token![=]) {
                meta.value()?.parse::<LitBool>()?.value
            } else {
                true
            };
            Ok(())
        } else if meta.path.is_ident("name") {
            let name: LitStr = meta.value()?.parse()?;
            if name.value().trim().is_empty() {
                return Err(syn::Error::new(name.span(), "hook name must not be empty"));
            }
            self.name = Some(name);
            Ok(())
        } else if meta.path.is_ident("crate") {
            let path: LitStr = meta.value()?.parse()?;
            self.krate = Some(path.parse()?);
            Ok(())
        } else if let Some(event) = meta.path.get_ident() {
            if self.event.is_some() {
                return Err(meta.error("unsupported hook argument; the event type is already set"));
            }
            self.event = Some(event.clone());
            Ok(())
        } else {
            Err(meta.error("unsupported hook argument"))
        }
    }
}

/// Compile-time copy of the framework's `validate_repository`, with the same
/// reasons. The registry checks every descriptor again at registration.
fn validate_repository(repository: &LitStr) -> syn::Result<()> {
    let value = repository.value();
    match repository_error(&value) {
        None => Ok(()),
        Some(reason) => Err(syn::Error::new(
            repository.span(),
            format!("invalid repository filter '{value}': {reason}"),
        )),
    }
}

fn repository_error(repository: &str) -> Option<&'static str> {
    if repository.chars().any(char::is_whitespace) {
        return Some("must not contain whitespace");
    }
    let Some((owner, name)) = repository.split_once('/') else {
        return Some("expected 'owner/name'");
    };
    if owner.is_empty() || name.is_empty() {
        return Some("owner and name must both be non-empty");
    }
    if name.contains('/') {
        return Some("expected exactly one '/'");
    }
    None
}

/// `pull_request_review` -> `PullRequestReview`, keeping the original span.
fn variant_ident(wire: &Ident) -> Ident {
    let pascal: String = wire
        .to_string()
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&pascal, wire.span())
}

// ============================================================================
// Expansion
// ============================================================================

pub fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let mut args = HookArgs::default();
    syn::meta::parser(|meta| args.parse_meta(meta)).parse2(attr)?;

    let func: ItemFn = syn::parse2(item)?;
    let sig = &func.sig;

    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(sig.asyncness, "hooks are invoked synchronously; remove `async`"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&sig.generics, "hooks cannot be generic"));
    }
    if sig.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            "hooks take exactly one `&WebhookEvent` argument",
        ));
    }

    let Some(event) = args.event.as_ref() else {
        return Err(syn::Error::new(
            sig.ident.span(),
            "#[hook] requires an event type, e.g. `#[hook(pull_request)]`",
        ));
    };

    let krate = args
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::octoroute_framework));
    let fn_name = &sig.ident;
    let vis = &func.vis;
    let static_name = format_ident!("{}_HOOK", fn_name.to_string().to_uppercase());

    let event_variant = variant_ident(event);
    let action_variants = args.actions.iter().map(variant_ident);
    let repositories = &args.repositories;
    let debug = args.debug;
    let name = match &args.name {
        Some(name) => quote!(#name),
        None => quote!(::core::concat!(::core::module_path!(), "::", ::core::stringify!(#fn_name))),
    };
    let doc = format!("Hook descriptor for [`{fn_name}`].");

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis static #static_name: #krate::HookDescriptor = #krate::HookDescriptor {
            name: #name,
            event: #krate::EventType::#event_variant,
            actions: &[#(#krate::ActionType::#action_variants),*],
            repositories: &[#(#repositories),*],
            debug: #debug,
            handler: |event| #krate::HandlerResponse::into_result(#fn_name(event)),
        };
    })
}
