// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific console streams.
//!
//! On native targets the console handler writes to the process's stdout and stderr.
//! `wasm32` has neither, so there the two streams buffer text and hand it to the browser
//! console (`console.log` and `console.error`) on flush.

use std::io::Write;

pub(crate) type Stream = Box<dyn Write + Send>;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn standard_stream() -> Stream {
    Box::new(std::io::stdout())
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn error_stream() -> Stream {
    Box::new(std::io::stderr())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn standard_stream() -> Stream {
    Box::new(WebConsole {
        error: false,
        pending: Vec::new(),
    })
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn error_stream() -> Stream {
    Box::new(WebConsole {
        error: true,
        pending: Vec::new(),
    })
}

#[cfg(target_arch = "wasm32")]
struct WebConsole {
    error: bool,
    pending: Vec<u8>,
}

#[cfg(target_arch = "wasm32")]
impl Write for WebConsole {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        if self.error {
            web_sys::console::error_1(&text.into());
        } else {
            web_sys::console::log_1(&text.into());
        }
        Ok(())
    }
}
