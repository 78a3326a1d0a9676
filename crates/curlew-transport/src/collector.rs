//! Write handler capturing response bodies.
//!
//! libcurl hands every received chunk to [`Collector::write`]. Bytes go to the
//! output file when one is attached, otherwise they accumulate in memory. The
//! in-memory buffer stays readable after the transfer until the handle is
//! prepared for the next request.

use std::fs::File;
use std::io::Write;

use curl::easy::{Handler, WriteError};

#[derive(Debug, Default)]
pub struct Collector {
    /// Response bytes captured in memory.
    body: Vec<u8>,
    /// Output file receiving the body instead of `body`.
    sink: Option<File>,
}

impl Collector {
    /// Bytes captured by the last transfer.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Route subsequent writes into `file`.
    pub fn attach_file(&mut self, file: File) {
        self.sink = Some(file);
    }

    pub fn has_file(&self) -> bool {
        self.sink.is_some()
    }

    /// Drop captured bytes and any attached file before a new transfer.
    pub fn clear(&mut self) {
        self.body.clear();
        self.sink = None;
    }

    /// Flush and detach the output file at the end of a transfer.
    pub(crate) fn close_file(&mut self) {
        if let Some(mut file) = self.sink.take() {
            if let Err(e) = file.flush() {
                tracing::warn!(error = %e, "failed to flush output file");
            }
        }
    }
}

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        match self.sink.as_mut() {
            Some(file) => match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to write response chunk to file");
                    // A short count makes libcurl abort with a write error.
                    Ok(0)
                }
            },
            None => {
                self.body.extend_from_slice(data);
                Ok(data.len())
            }
        }
    }
}
