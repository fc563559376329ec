// SPDX-License-Identifier: MIT OR Apache-2.0
use std::io::Write;
use std::sync::{Arc, Mutex};
use topicwise::{ConsoleHandler, Logger, Severity, TopicFilter};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn console(color: bool, use_stderr: bool) -> (Capture, Capture, Logger) {
    let out = Capture::default();
    let err = Capture::default();
    let handler = ConsoleHandler::new(Severity::Debug, TopicFilter::all())
        .with_color(color)
        .with_stderr(use_stderr)
        .with_streams(out.clone(), err.clone());
    (out, err, Logger::new(vec![Arc::new(handler)]))
}

#[test]
fn warnings_and_above_go_to_the_error_stream() {
    let (out, err, logger) = console(false, true);
    topicwise::debug!(&logger, topic = "app", "d");
    topicwise::info!(&logger, topic = "app", "i");
    topicwise::warning!(&logger, topic = "app", "w");
    topicwise::error!(&logger, topic = "app", "e");
    topicwise::fatal!(&logger, topic = "app", "f");
    assert_eq!(out.text(), "[DEBUG] app\nd\n\n[INFO] app\ni\n\n");
    assert_eq!(
        err.text(),
        "[WARNING] app\nw\n\n[ERROR] app\ne\n\n[FATAL] app\nf\n\n"
    );
}

#[test]
fn single_stream_without_routing() {
    let (out, err, logger) = console(false, false);
    topicwise::info!(&logger, topic = "app", "i");
    topicwise::fatal!(&logger, topic = "app", "f");
    assert_eq!(out.text(), "[INFO] app\ni\n\n[FATAL] app\nf\n\n");
    assert_eq!(err.text(), "");
}

#[test]
fn color_wraps_the_whole_message() {
    let (out, err, logger) = console(true, true);
    topicwise::info!(&logger, topic = "app", "ok");
    topicwise::error!(&logger, topic = "app", "bad");
    assert_eq!(out.text(), "\x1b[92m[INFO] app\nok\n\n\x1b[0m");
    assert_eq!(err.text(), "\x1b[91m[ERROR] app\nbad\n\n\x1b[0m");
}

#[test]
fn console_factory_validates_arguments() {
    let logger = Logger::console("info", "net.#", false, true).unwrap();
    assert_eq!(logger.handlers().len(), 1);
    let handler = &logger.handlers()[0];
    assert_eq!(handler.min_severity(), Severity::Info);
    assert_eq!(handler.filter().pattern(), "net.#");

    assert!(matches!(
        Logger::console("loud", "#", false, true),
        Err(topicwise::Error::InvalidSeverity(_))
    ));
    assert!(matches!(
        Logger::console(9, "#", false, true),
        Err(topicwise::Error::InvalidSeverity(found)) if found == "9"
    ));
}
