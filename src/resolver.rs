// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deriving topics from the calling context.
//!
//! When a log call carries no explicit topic, the [`Logger`](crate::Logger) asks its
//! [`TopicResolver`] for one.  The resolver sees the [`CallSite`] of the log call and the
//! thread's [scope stack](crate::scope).  Two strategies ship with the crate:
//!
//! * [`ModuleResolver`]: `<module leaf>.<scope>`, where the scope is `Type.method` inside
//!   a method and the function name otherwise.  `my_crate::net::Server::accept` logs
//!   under `net.Server.accept`.
//! * [`StackResolver`]: the names of the entered [`#[scoped]`](crate::scoped) functions,
//!   outermost first, followed by the calling function when it did not enter a scope
//!   itself.  `main -> serve -> accept` logs under `main.serve.accept`.
//!
//! Both take a number of innermost frames to skip.  The logging macros and the
//! `#[track_caller]` methods on [`Logger`](crate::Logger) capture the call site where the
//! user wrote the call, so the logging machinery contributes [`INTERNAL_FRAMES`] frames,
//! which is zero.

use crate::error::{Error, ModeKind, Result};
use crate::scope::{self, Frame};
use crate::topic::Topic;
use std::fmt::{Debug, Display};
use std::panic::Location;
use std::path::Path;

/// Frames the logging call chain itself adds between the user's code and the resolver.
pub const INTERNAL_FRAMES: usize = 0;

/**
Where a log call was written.

`function` is the full path of the enclosing function as reported by
[`std::any::type_name`], e.g. `my_crate::net::Server::accept`.  It is empty when the call
site was captured through [`Location`] alone.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    module_path: &'static str,
    function: &'static str,
    file: &'static str,
    line: u32,
}

impl CallSite {
    pub const fn new(
        module_path: &'static str,
        function: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            module_path,
            function,
            file,
            line,
        }
    }

    /// The caller's location, without module or function information.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new("", "", location.file(), location.line())
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// The call site as a scope frame, if it knows its function.
    fn frame(&self) -> Option<Frame> {
        if self.function.is_empty() {
            return None;
        }
        let name = path_segments(self.function).pop()?;
        Some(Frame::new(self.module_path, self.function, name))
    }
}

/**
Strategy for deriving a topic.

`skip` is the number of innermost frames to ignore, not counting [`INTERNAL_FRAMES`].
*/
pub trait TopicResolver: Debug + Send + Sync {
    fn resolve(&self, site: &CallSite, skip: usize) -> Topic;
}

/// Topics of the form `<module leaf>.<Type.method | function>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModuleResolver;

/// Topics built from the chain of entered scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StackResolver;

impl TopicResolver for ModuleResolver {
    fn resolve(&self, site: &CallSite, skip: usize) -> Topic {
        let chain = call_chain(site);
        match skip.checked_add(1).and_then(|n| chain.len().checked_sub(n)) {
            Some(i) => module_topic(&chain[i]),
            // a bare Location knows only its file
            None if chain.is_empty() && skip == 0 => {
                file_leaf(site.file).map(Topic::new).unwrap_or_default()
            }
            None => Topic::default(),
        }
    }
}

impl TopicResolver for StackResolver {
    fn resolve(&self, site: &CallSite, skip: usize) -> Topic {
        let chain = call_chain(site);
        let keep = chain.len().saturating_sub(skip);
        Topic::from_keys(chain[..keep].iter().map(|f| f.name()))
    }
}

/**
A derivation strategy selected by name.

```
use topicwise::DerivationMethod;
let method: DerivationMethod = "stack".parse().unwrap();
assert_eq!(method, DerivationMethod::Stack);
assert!("trace".parse::<DerivationMethod>().is_err());
```
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DerivationMethod {
    Stack,
    #[default]
    Module,
}

impl DerivationMethod {
    pub fn name(self) -> &'static str {
        match self {
            DerivationMethod::Stack => "stack",
            DerivationMethod::Module => "module",
        }
    }
}

impl TopicResolver for DerivationMethod {
    fn resolve(&self, site: &CallSite, skip: usize) -> Topic {
        match self {
            DerivationMethod::Stack => StackResolver.resolve(site, skip),
            DerivationMethod::Module => ModuleResolver.resolve(site, skip),
        }
    }
}

impl Display for DerivationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DerivationMethod {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stack" => Ok(DerivationMethod::Stack),
            "module" => Ok(DerivationMethod::Module),
            _ => Err(Error::UnrecognizedMode {
                kind: ModeKind::Derivation,
                value: s.to_string(),
                expected: "stack or module",
            }),
        }
    }
}

/// Entered scopes, outermost first, plus the call site when it is not already the
/// innermost scope.
fn call_chain(site: &CallSite) -> Vec<Frame> {
    let mut chain = scope::current_frames();
    if let Some(frame) = site.frame() {
        let already_entered = chain.last().is_some_and(|inner| {
            path_segments(inner.function()) == path_segments(frame.function())
        });
        if !already_entered {
            chain.push(frame);
        }
    }
    chain
}

fn module_topic(frame: &Frame) -> Topic {
    let module: Vec<&str> = frame.module_path().split("::").collect();
    let function = path_segments(frame.function());
    let mut common = module
        .iter()
        .zip(&function)
        .take_while(|(m, f)| m == f)
        .count();
    // modules declared inside a function body: the function path has extra segments
    // between the crate and the rest of the module path
    let rest = &module[common..];
    let mut within_module = rest.is_empty();
    if !within_module {
        if let Some(at) = function[common..].windows(rest.len()).position(|w| w == rest) {
            common += at + rest.len();
            within_module = true;
        }
    }
    let leaf = module.last().copied().unwrap_or_default();
    let short = [frame.name()];
    let scope = if !within_module {
        // a trait method implemented here for a type defined elsewhere: `Type.method`
        &function[function.len().saturating_sub(2)..]
    } else if common < function.len() {
        &function[common..]
    } else {
        // function path lies inside the module path; keep the short name
        &short[..]
    };
    let scope = if scope.is_empty() { &short[..] } else { scope };
    Topic::from_keys(std::iter::once(leaf).chain(scope.iter().copied()))
}

/// `src/net/tcp.rs` gives `tcp`, `src/net/mod.rs` gives `net`.
fn file_leaf(file: &str) -> Option<&str> {
    let path = Path::new(file);
    let stem = path.file_stem()?.to_str()?;
    if stem == "mod" {
        path.parent()?.file_name()?.to_str()
    } else {
        Some(stem)
    }
}

/**
Splits a [`type_name`](std::any::type_name) path into named segments.

Generic arguments are dropped, `<T as Trait>` contributes the segments of `T`, and
compiler-generated segments such as `{{closure}}` are skipped.
*/
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for segment in split_top_level(path) {
        if let Some(qualified) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            let self_type = qualified.split(" as ").next().unwrap_or(qualified);
            out.extend(path_segments(self_type));
        } else if segment.starts_with("{{") || segment.is_empty() {
            continue;
        } else {
            let name = segment.split('<').next().unwrap_or(segment);
            out.push(name);
        }
    }
    out
}

/// Splits on `::` outside of angle brackets.
fn split_top_level(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` inside generic arguments is not a closing bracket
            b'>' if i == 0 || bytes[i - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    fn site(module_path: &'static str, function: &'static str) -> CallSite {
        CallSite::new(module_path, function, "src/net/server.rs", 10)
    }

    #[test]
    fn segments_strip_generics_and_closures() {
        assert_eq!(
            path_segments("app::net::Server<T>::accept::{{closure}}"),
            ["app", "net", "Server", "accept"]
        );
        assert_eq!(
            path_segments("<app::net::Server as app::Listen>::listen"),
            ["app", "net", "Server", "listen"]
        );
        assert_eq!(
            path_segments("app::Map<alloc::string::String, fn() -> u8>::get"),
            ["app", "Map", "get"]
        );
    }

    #[test]
    fn module_topic_for_function() {
        let topic = ModuleResolver.resolve(&site("app::net", "app::net::connect"), 0);
        assert_eq!(topic, "net.connect");
    }

    #[test]
    fn module_topic_for_method() {
        let topic = ModuleResolver.resolve(&site("app::net", "app::net::Server::accept"), 0);
        assert_eq!(topic, "net.Server.accept");

        let via_trait = ModuleResolver.resolve(
            &site("app::net", "<app::net::Server as app::Listen>::listen"),
            0,
        );
        assert_eq!(via_trait, "net.Server.listen");
    }

    #[test]
    fn module_topic_for_foreign_self_type() {
        let foreign = ModuleResolver.resolve(
            &site("app::net", "<alloc::string::String as app::net::Describe>::describe"),
            0,
        );
        assert_eq!(foreign, "net.String.describe");

        let sibling = ModuleResolver.resolve(
            &site("app::net", "<app::disk::Volume as app::net::Describe>::describe"),
            0,
        );
        assert_eq!(sibling, "net.Volume.describe");

        let closure_path = concat!(
            "<alloc::string::String as app::net::Describe>",
            "::describe::{{closure}}"
        );
        let in_closure = ModuleResolver.resolve(&site("app::net", closure_path), 0);
        assert_eq!(in_closure, "net.String.describe");
    }

    #[test]
    fn huge_skip_is_empty_not_overflow() {
        let call = site("app::net", "app::net::connect");
        assert_eq!(ModuleResolver.resolve(&call, usize::MAX), "");
        assert_eq!(StackResolver.resolve(&call, usize::MAX), "");
    }

    #[test]
    fn module_topic_for_module_inside_function() {
        let topic = ModuleResolver.resolve(&site("app::net", "app::main::net::Server::accept"), 0);
        assert_eq!(topic, "net.Server.accept");
    }

    #[test]
    fn module_topic_for_crate_root() {
        let topic = ModuleResolver.resolve(&site("app", "app::main"), 0);
        assert_eq!(topic, "app.main");
    }

    #[test]
    fn module_topic_from_location_only() {
        let topic = ModuleResolver.resolve(&CallSite::new("", "", "src/net/mod.rs", 3), 0);
        assert_eq!(topic, "net");
        let topic = ModuleResolver.resolve(&CallSite::new("", "", "src/net/tcp.rs", 3), 0);
        assert_eq!(topic, "tcp");
    }

    #[test]
    fn stack_topic_is_call_site_without_scopes() {
        let topic = StackResolver.resolve(&site("app::net", "app::net::Server::accept"), 0);
        assert_eq!(topic, "accept");
    }

    #[test]
    fn stack_topic_walks_scopes_outermost_first() {
        let _main = Scope::enter(Frame::new("app", "app::main", "main"));
        let _serve = Scope::enter(Frame::new("app::net", "app::net::serve", "serve"));
        let call = site("app::net", "app::net::Server::accept");
        assert_eq!(StackResolver.resolve(&call, 0), "main.serve.accept");
        assert_eq!(StackResolver.resolve(&call, 1), "main.serve");
        assert_eq!(StackResolver.resolve(&call, 3), "");
        assert_eq!(StackResolver.resolve(&call, 10), "");
    }

    #[test]
    fn call_site_inside_its_own_scope_is_not_repeated() {
        let _serve = Scope::enter(Frame::new("app::net", "app::net::serve", "serve"));
        let in_closure = site("app::net", "app::net::serve::{{closure}}");
        assert_eq!(StackResolver.resolve(&in_closure, 0), "serve");
        assert_eq!(ModuleResolver.resolve(&in_closure, 0), "net.serve");
    }

    #[test]
    fn module_skip_selects_enclosing_frame() {
        let _serve = Scope::enter(Frame::new("app::net", "app::net::serve", "serve"));
        let call = site("app::net", "app::net::Server::accept");
        assert_eq!(ModuleResolver.resolve(&call, 0), "net.Server.accept");
        assert_eq!(ModuleResolver.resolve(&call, 1), "net.serve");
        assert_eq!(ModuleResolver.resolve(&call, 2), "");
    }

    #[test]
    fn logging_adds_no_frames() {
        assert_eq!(INTERNAL_FRAMES, 0);
    }

    #[test]
    fn derivation_method_by_name() {
        assert_eq!("module".parse::<DerivationMethod>().unwrap(), DerivationMethod::Module);
        assert_eq!(DerivationMethod::default(), DerivationMethod::Module);
        assert!(matches!(
            "frames".parse::<DerivationMethod>(),
            Err(Error::UnrecognizedMode {
                kind: ModeKind::Derivation,
                value,
                ..
            }) if value == "frames"
        ));
        let call = site("app::net", "app::net::connect");
        assert_eq!(DerivationMethod::Stack.resolve(&call, 0), "connect");
        assert_eq!(DerivationMethod::Module.resolve(&call, 0), "net.connect");
    }
}
