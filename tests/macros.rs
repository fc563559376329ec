// SPDX-License-Identifier: MIT OR Apache-2.0
use std::sync::{Arc, Mutex};
use topicwise::global_logger::set_global_logger;
use topicwise::{InMemoryHandler, Logger, Severity, Topic, TopicFilter};

static TEST_LOGGER_GUARD: Mutex<()> = Mutex::new(());

fn memory_logger() -> (Arc<InMemoryHandler>, Logger) {
    let memory = Arc::new(InMemoryHandler::default());
    let logger = Logger::new(vec![memory.clone()]);
    (memory, logger)
}

mod storage {
    use topicwise::Logger;

    pub struct Cache;

    pub trait Describe {
        fn describe(&self, logger: &Logger);
    }

    impl Describe for String {
        fn describe(&self, logger: &Logger) {
            topicwise::info!(logger, template = "{topic}{body}", "");
        }
    }

    impl Cache {
        pub fn evict(&self, logger: &Logger) {
            topicwise::warning!(logger, "evicting {n} entries", n = 4);
        }
    }
}

#[test]
fn explicit_topic_and_values() {
    let (memory, logger) = memory_logger();
    topicwise::info!(
        &logger,
        topic = "jobs",
        "Completed job {id} in {secs}s",
        id = 23,
        secs = 3.5
    );
    assert_eq!(
        memory.drain_logs(),
        "[INFO] jobs\nCompleted job 23 in 3.5s\n\n"
    );
}

#[test]
fn every_severity_macro() {
    let memory = Arc::new(InMemoryHandler::new(Severity::Warning, TopicFilter::all()));
    let logger = Logger::new(vec![memory.clone()]);
    topicwise::debug!(&logger, topic = "t", "d");
    topicwise::info!(&logger, topic = "t", "i");
    topicwise::warning!(&logger, topic = "t", "w");
    topicwise::error!(&logger, topic = "t", "e");
    topicwise::fatal!(&logger, topic = "t", "f");
    assert_eq!(
        memory.take_records(),
        [
            "[WARNING] t\nw\n\n",
            "[ERROR] t\ne\n\n",
            "[FATAL] t\nf\n\n"
        ]
    );
}

#[test]
fn derived_topic_in_function() {
    let (memory, logger) = memory_logger();
    topicwise::debug!(&logger, "hi");
    assert_eq!(
        memory.drain_logs(),
        "[DEBUG] macros.derived_topic_in_function\nhi\n\n"
    );
}

#[test]
fn derived_topic_in_method() {
    let (memory, logger) = memory_logger();
    storage::Cache.evict(&logger);
    assert_eq!(
        memory.drain_logs(),
        "[WARNING] storage.Cache.evict\nevicting 4 entries\n\n"
    );
}

#[test]
fn derived_topic_in_trait_impl_for_foreign_type() {
    use storage::Describe;
    let (memory, logger) = memory_logger();
    String::from("x").describe(&logger);
    assert_eq!(memory.drain_logs(), "storage.String.describe");
}

#[test]
fn derived_topic_in_closure() {
    let (memory, logger) = memory_logger();
    let log = || topicwise::info!(&logger, template = "{topic}{body}", "");
    log();
    assert_eq!(memory.drain_logs(), "macros.derived_topic_in_closure");
}

#[test]
fn template_argument() {
    let (memory, logger) = memory_logger();
    topicwise::error!(
        &logger,
        topic = "disk",
        template = "{level}|{topic}|{body}",
        "read {n} bytes",
        n = 0
    );
    assert_eq!(memory.drain_logs(), "ERROR|disk|read 0 bytes");
}

#[test]
fn invalid_template_is_not_dispatched() {
    let (memory, logger) = memory_logger();
    topicwise::info!(&logger, template = "{level}", "lost");
    assert!(memory.is_empty());
}

#[test]
fn literal_braces() {
    let (memory, logger) = memory_logger();
    topicwise::info!(&logger, template = "{body}", "{{literal}} {x}", x = 1);
    assert_eq!(memory.drain_logs(), "{literal} 1");
}

#[test]
fn logger_expressions() {
    let (memory, logger) = memory_logger();
    topicwise::info!(logger, topic = "owned", "a");
    let shared = Arc::new(logger);
    topicwise::info!(shared, topic = "arc", "b");
    topicwise::info!(shared.clone(), topic = "arc", "c");
    assert_eq!(memory.len(), 3);
}

#[test]
fn topic_expressions() {
    let (memory, logger) = memory_logger();
    let owned = String::from("from.string");
    topicwise::info!(&logger, topic = owned, template = "{topic} ", "");
    topicwise::info!(&logger, topic = Topic::new("from.topic"), template = "{topic} ", "");
    topicwise::info!(&logger, topic = format!("from.{}", "format"), template = "{topic}", "");
    assert_eq!(memory.drain_logs(), "from.string from.topic from.format");
    // borrowed, not moved
    assert_eq!(owned, "from.string");
}

#[test]
fn values_are_borrowed() {
    let (memory, logger) = memory_logger();
    let name = String::from("alice");
    let items = vec![1, 2, 3];
    topicwise::info!(
        &logger,
        topic = "users",
        "{name} has {count} items",
        name = name,
        count = items.len()
    );
    assert_eq!(name, "alice");
    assert_eq!(memory.drain_logs(), "[INFO] users\nalice has 3 items\n\n");
}

#[test]
fn filtering_by_topic() {
    let memory = Arc::new(InMemoryHandler::new(
        Severity::Debug,
        TopicFilter::new("net.#").unwrap(),
    ));
    let logger = Logger::new(vec![memory.clone()]);
    topicwise::info!(&logger, topic = "net.tcp", "kept");
    topicwise::info!(&logger, topic = "disk", "dropped");
    topicwise::info!(&logger, "derived topic macros.filtering_by_topic is dropped too");
    assert_eq!(memory.drain_logs(), "[INFO] net.tcp\nkept\n\n");
}

#[test]
fn global_logger_is_the_default() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap();
    let (memory, logger) = memory_logger();
    set_global_logger(logger);
    topicwise::error!(topic = "g", "boom {code}", code = 500);
    topicwise::warning!(topic = "g", "careful");
    assert_eq!(
        memory.drain_logs(),
        "[ERROR] g\nboom 500\n\n[WARNING] g\ncareful\n\n"
    );
}

#[test]
fn global_logger_without_header() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap();
    let (memory, logger) = memory_logger();
    set_global_logger(logger.with_template("{topic}:{body}").unwrap());
    topicwise::info!("plain");
    assert_eq!(memory.drain_logs(), "macros.global_logger_without_header:plain");
}
