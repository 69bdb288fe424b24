//! `io::Write` adapter that strips whatever is written through it.

use crate::{CompileOptions, compile};
use std::io::{self, Write};

/// Buffers everything written to it; [`StripFilter::finish`] compiles the
/// whole buffer once and writes the stripped code to the inner writer.
///
/// Nothing reaches the inner writer before `finish`, so a parse error never
/// leaves half a file behind.
pub struct StripFilter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    options: CompileOptions,
}

impl<W: Write> StripFilter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, CompileOptions::default())
    }

    pub fn with_options(inner: W, options: CompileOptions) -> Self {
        StripFilter {
            inner,
            buffer: Vec::new(),
            options,
        }
    }

    /// Compile the buffered input and write the result.
    ///
    /// Invalid UTF-8 and compile failures surface as
    /// `io::ErrorKind::InvalidData`; for the latter the source error is the
    /// [`CompileError`](crate::CompileError).
    pub fn finish(mut self) -> io::Result<W> {
        let source = String::from_utf8(std::mem::take(&mut self.buffer))
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let result = compile(&source, &self.options)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.inner.write_all(result.code.as_bytes())?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for StripFilter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// Output only exists once the input is complete.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
