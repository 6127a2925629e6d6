use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing_subscriber::fmt::MakeWriter;

/// An in-memory writer whose clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedBuffer {
    buffer: Arc<Mutex<Vec<u8>>>,
    fail_flush: bool,
}

impl SharedBuffer {
    pub(crate) fn failing_flush() -> Self {
        Self {
            fail_flush: true,
            ..Default::default()
        }
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
    }

    /// The buffer contents, parsed as one JSON object per line.
    pub(crate) fn records(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail_flush {
            Err(io::Error::other("flush failed"))
        } else {
            Ok(())
        }
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
