// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expansion of the five logging macros.

use proc_macro::{TokenStream, TokenTree};
use std::collections::VecDeque;

use crate::parser::{at_named_argument, compile_error, lformat_impl, parse_value};

const FORMATTER: &str = "__topicwise_formatter";

/// The optional arguments in front of the format string.
#[derive(Default)]
struct Header {
    logger: Option<TokenStream>,
    topic: Option<TokenStream>,
    template: Option<TokenStream>,
}

fn parse_header(collect: &mut VecDeque<TokenTree>) -> Result<Header, TokenStream> {
    let mut header = Header::default();
    let starts_with_argument =
        at_named_argument(collect, "topic") || at_named_argument(collect, "template");
    match collect.front() {
        None => return Err(compile_error("Expected a format string")),
        Some(TokenTree::Literal(_)) => {}
        Some(_) if starts_with_argument => {}
        Some(_) => {
            let logger = parse_value(collect);
            header.logger = Some(logger);
        }
    }
    loop {
        let slot = if at_named_argument(collect, "topic") {
            &mut header.topic
        } else if at_named_argument(collect, "template") {
            &mut header.template
        } else {
            break;
        };
        if slot.is_some() {
            return Err(compile_error("Argument given twice"));
        }
        //name and '='
        collect.pop_front();
        collect.pop_front();
        let value = parse_value(collect);
        if value.is_empty() {
            return Err(compile_error("Expected an expression after '='"));
        }
        *slot = Some(value);
    }
    Ok(header)
}

fn optional_str(value: Option<TokenStream>) -> String {
    match value {
        Some(value) => format!(
            "::core::option::Option::Some(::core::convert::AsRef::<str>::as_ref(&({value})))"
        ),
        None => "::core::option::Option::None".to_string(),
    }
}

/// Expands `debug!`, `info!`, ... for `severity`, the name of a `topicwise::Severity` variant.
pub fn log_macro(severity: &str, input: TokenStream) -> TokenStream {
    let mut collect: VecDeque<_> = input.into_iter().collect();
    let header = match parse_header(&mut collect) {
        Ok(header) => header,
        Err(e) => return e,
    };
    let body = lformat_impl(&mut collect, FORMATTER);
    if !body.ok {
        return body.output;
    }
    let logger = match header.logger {
        Some(logger) => {
            format!("::core::borrow::Borrow::<topicwise::Logger>::borrow(&({logger}))")
        }
        None => "&*topicwise::hidden::global_logger()".to_string(),
    };
    let topic = optional_str(header.topic);
    let template = optional_str(header.template);
    let formatted = body.output;

    let src = format!(
        r#"{{
            fn __topicwise_here() {{}}
            #[allow(unused_mut)]
            let mut {FORMATTER} = topicwise::hidden::BodyFormatter::new();
            {formatted}
            topicwise::hidden::emit(
                {logger},
                topicwise::Severity::{severity},
                topicwise::CallSite::new(
                    module_path!(),
                    topicwise::hidden::function_path(__topicwise_here),
                    file!(),
                    line!(),
                ),
                {topic},
                {template},
                {FORMATTER}.finish(),
            );
        }}"#
    );
    src.parse()
        .unwrap_or_else(|_| compile_error("topicwise could not expand this log call"))
}
