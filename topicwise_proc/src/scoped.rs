// SPDX-License-Identifier: MIT OR Apache-2.0
use proc_macro::{Delimiter, TokenStream, TokenTree};

use crate::parser::compile_error;

/// Implementation of the `#[scoped]` attribute macro.
///
/// Transforms a function so that it enters a topicwise scope named after itself for the
/// duration of its body.
pub fn scoped_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return compile_error("#[scoped] takes no arguments");
    }
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    // Find the function name and body
    let mut fn_name: Option<String> = None;
    let mut is_async = false;
    let mut body_idx: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            TokenTree::Ident(ident) if fn_name.is_none() && ident.to_string() == "async" => {
                is_async = true;
            }
            TokenTree::Ident(ident) if fn_name.is_none() && ident.to_string() == "fn" => {
                if let Some(TokenTree::Ident(name)) = tokens.get(i + 1) {
                    fn_name = Some(name.to_string());
                }
            }
            TokenTree::Group(g) if fn_name.is_some() && g.delimiter() == Delimiter::Brace => {
                // This is the function body
                body_idx = Some(i);
            }
            _ => {}
        }
    }

    let Some(fn_name) = fn_name else {
        return compile_error("#[scoped] can only be applied to functions");
    };
    if is_async {
        return compile_error(
            "#[scoped] cannot be applied to async functions; scopes are per thread",
        );
    }
    // the body is the last brace group; a where clause or return type comes before it
    let Some(body_idx) = body_idx else {
        return compile_error("#[scoped] requires a function with a body");
    };
    let TokenTree::Group(body) = &tokens[body_idx] else {
        return compile_error("Expected function body");
    };
    let original_body = body.stream();
    let fn_name = fn_name.trim_start_matches("r#");

    let new_body_src = format!(
        r#"{{
            let _topicwise_scope = {{
                fn __topicwise_here() {{}}
                topicwise::hidden::enter_scope(
                    module_path!(),
                    topicwise::hidden::function_path(__topicwise_here),
                    "{fn_name}",
                )
            }};
            {{ {original_body} }}
        }}"#
    );

    let new_body: TokenStream = match new_body_src.parse() {
        Ok(body) => body,
        Err(_) => return compile_error("#[scoped] could not rewrite the function body"),
    };
    let Some(new_body_group) = new_body.into_iter().next() else {
        return compile_error("#[scoped] could not rewrite the function body");
    };

    // Replace the old body with the new one
    tokens[body_idx] = new_body_group;

    tokens.into_iter().collect()
}
