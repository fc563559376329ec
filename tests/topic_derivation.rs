// SPDX-License-Identifier: MIT OR Apache-2.0
use std::sync::Arc;
use topicwise::scope::{self, Frame};
use topicwise::{
    CallSite, DerivationMethod, InMemoryHandler, Logger, Scope, StackResolver, Topic,
    TopicResolver,
};

fn logger(method: DerivationMethod) -> (Arc<InMemoryHandler>, Logger) {
    let memory = Arc::new(InMemoryHandler::default());
    // bodies are empty, so this renders the topic alone
    let logger = Logger::new(vec![memory.clone()])
        .with_derivation(method)
        .with_template("{topic}{body}")
        .unwrap();
    (memory, logger)
}

#[topicwise::scoped]
fn outer(logger: &Logger) {
    middle(logger);
}

#[topicwise::scoped]
fn middle(logger: &Logger) {
    leaf(logger);
}

fn leaf(logger: &Logger) {
    topicwise::info!(logger, "");
}

#[topicwise::scoped]
fn scoped_leaf(logger: &Logger) {
    topicwise::info!(logger, "");
}

#[topicwise::scoped]
fn with_closure(logger: &Logger) {
    let log = || topicwise::info!(logger, "");
    log();
}

#[topicwise::scoped]
fn panics() {
    panic!("unwinding through a scope");
}

struct Worker;

impl Worker {
    #[topicwise::scoped]
    fn run(&self, logger: &Logger) {
        self.step(logger);
    }

    fn step(&self, logger: &Logger) {
        topicwise::info!(logger, "");
    }
}

#[test]
fn stack_lists_scopes_then_call_site() {
    let (memory, logger) = logger(DerivationMethod::Stack);
    outer(&logger);
    assert_eq!(memory.drain_logs(), "outer.middle.leaf");
}

#[test]
fn module_uses_the_call_site() {
    let (memory, logger) = logger(DerivationMethod::Module);
    outer(&logger);
    assert_eq!(memory.drain_logs(), "topic_derivation.leaf");
}

#[test]
fn scoped_call_site_appears_once() {
    let (memory, logger) = logger(DerivationMethod::Stack);
    scoped_leaf(&logger);
    assert_eq!(memory.drain_logs(), "scoped_leaf");
}

#[test]
fn closure_belongs_to_its_function() {
    let (memory, logger) = logger(DerivationMethod::Stack);
    with_closure(&logger);
    assert_eq!(memory.drain_logs(), "with_closure");

    let (memory, logger) = self::logger(DerivationMethod::Module);
    with_closure(&logger);
    assert_eq!(memory.drain_logs(), "topic_derivation.with_closure");
}

#[test]
fn methods() {
    let (memory, logger) = logger(DerivationMethod::Stack);
    Worker.run(&logger);
    assert_eq!(memory.drain_logs(), "run.step");

    let (memory, logger) = self::logger(DerivationMethod::Module);
    Worker.run(&logger);
    assert_eq!(memory.drain_logs(), "topic_derivation.Worker.step");
}

#[test]
fn scopes_end_with_their_function() {
    let (_memory, logger) = logger(DerivationMethod::Stack);
    outer(&logger);
    assert!(scope::current_frames().is_empty());

    let result = std::panic::catch_unwind(panics);
    assert!(result.is_err());
    assert!(scope::current_frames().is_empty());
}

#[test]
fn spawned_threads_start_without_scopes() {
    #[topicwise::scoped]
    fn spawner(logger: Arc<Logger>) {
        let inner = logger.clone();
        std::thread::spawn(move || topicwise::info!(inner, ""))
            .join()
            .unwrap();
        topicwise::info!(logger, "|");
    }

    let (memory, logger) = logger(DerivationMethod::Stack);
    spawner(Arc::new(logger));
    // the spawned thread sees only its call site, which is a closure inside `spawner`
    assert_eq!(memory.drain_logs(), "spawnerspawner|");
}

#[test]
fn explicit_topic_bypasses_derivation() {
    #[topicwise::scoped]
    fn named(logger: &Logger) {
        topicwise::info!(logger, topic = "chosen.topic", "");
    }
    let (memory, logger) = logger(DerivationMethod::Stack);
    named(&logger);
    assert_eq!(memory.drain_logs(), "chosen.topic");
}

#[test]
fn manual_scope() {
    let (memory, logger) = logger(DerivationMethod::Stack);
    {
        let _scope = Scope::enter(Frame::new(module_path!(), "batch", "batch"));
        leaf(&logger);
    }
    leaf(&logger);
    assert_eq!(memory.drain_logs(), "batch.leafleaf");
}

#[test]
fn logger_methods_derive_from_location() {
    let (memory, logger) = logger(DerivationMethod::Module);
    logger.info("", None, None).unwrap();
    assert_eq!(memory.drain_logs(), "topic_derivation");

    let (memory, logger) = self::logger(DerivationMethod::Stack);
    outer_method_call(&logger);
    assert_eq!(memory.drain_logs(), "outer_method_call");
}

#[topicwise::scoped]
fn outer_method_call(logger: &Logger) {
    logger.info("", None, None).unwrap();
}

/// Skips the innermost frame, naming the caller of the logging function.
#[derive(Debug)]
struct Caller;

impl TopicResolver for Caller {
    fn resolve(&self, site: &CallSite, skip: usize) -> Topic {
        StackResolver.resolve(site, skip + 1)
    }
}

#[test]
fn custom_resolver_skips_frames() {
    let memory = Arc::new(InMemoryHandler::default());
    let logger = Logger::new(vec![memory.clone()])
        .with_resolver(Caller)
        .with_template("{topic}{body}")
        .unwrap();
    outer(&logger);
    assert_eq!(memory.drain_logs(), "outer.middle");
}
