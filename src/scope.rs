// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-local stack of entered functions.
//!
//! Rust has no runtime reflection over the call stack, so topicwise keeps its own: a
//! function annotated with [`#[scoped]`](crate::scoped) pushes a [`Frame`] on entry and
//! pops it when it returns (or unwinds).  The stack is per thread; a spawned thread
//! starts with an empty one.
//!
//! ```
//! use topicwise::scope;
//!
//! #[topicwise::scoped]
//! fn outer() -> Vec<&'static str> {
//!     inner()
//! }
//!
//! #[topicwise::scoped]
//! fn inner() -> Vec<&'static str> {
//!     scope::current_frames().iter().map(|f| f.name()).collect()
//! }
//!
//! assert_eq!(outer(), ["outer", "inner"]);
//! assert!(scope::current_frames().is_empty());
//! ```
//!
//! Scopes can also be entered by hand with [`Scope::enter`], e.g. around a closure that
//! deserves its own name in derived topics.

use std::cell::RefCell;
use std::marker::PhantomData;

/// One entry of the scope stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    module_path: &'static str,
    function: &'static str,
    name: &'static str,
}

impl Frame {
    /**
    Creates a frame.

    * `module_path` - as produced by `module_path!()`
    * `function` - the full path of the function, e.g. `my_crate::net::Server::accept`
    * `name` - the short name used by stack-derived topics
    */
    pub const fn new(
        module_path: &'static str,
        function: &'static str,
        name: &'static str,
    ) -> Self {
        Self {
            module_path,
            function,
            name,
        }
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

thread_local! {
    static SCOPES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/**
Guard for an entered scope.  The frame is popped when the guard drops.

Guards must drop in reverse order of creation, which is what lexical scoping gives you.
Dropping an outer guard first also discards every frame above it.
*/
#[derive(Debug)]
#[must_use = "the scope ends when the guard is dropped"]
pub struct Scope {
    depth: usize,
    // frames live in a thread local; the guard must not change threads
    _not_send: PhantomData<*const ()>,
}

impl Scope {
    pub fn enter(frame: Frame) -> Scope {
        let depth = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            scopes.push(frame);
            scopes.len() - 1
        });
        Scope {
            depth,
            _not_send: PhantomData,
        }
    }

    /// Position of this scope's frame, `0` for the outermost.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        // try_with: thread locals may already be gone during thread teardown
        let _ = SCOPES.try_with(|scopes| scopes.borrow_mut().truncate(self.depth));
    }
}

/// Snapshot of the current thread's frames, outermost first.
pub fn current_frames() -> Vec<Frame> {
    SCOPES.with(|scopes| scopes.borrow().clone())
}
