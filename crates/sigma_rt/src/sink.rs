//! Diagnostic sink that discards everything.

use std::io::{self, Write};

/// Attached to every context created through the C boundary, so engine
/// diagnostics never reach the host's stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Write for NullSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
