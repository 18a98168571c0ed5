use std::io;
use std::io::Write;

/// Output is used by the interpreter to emit characters. It should abstract
/// the implementation details, so stdout, a raw terminal or a test buffer
/// all work the same.
pub trait Output {
    /// emit one byte
    fn put_char(&mut self, c: u8) -> Result<(), io::Error>;

    /// push anything buffered out to the device
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

/// buffered STDOUT; flushed whenever the VM waits for input or stops
pub struct StdoutOutput {
    out: io::BufWriter<io::Stdout>,
}

impl StdoutOutput {
    pub fn new() -> Self {
        StdoutOutput {
            out: io::BufWriter::new(io::stdout()),
        }
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for StdoutOutput {
    fn put_char(&mut self, c: u8) -> Result<(), io::Error> {
        self.out.write_all(&[c])
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.out.flush()
    }
}

/// unbuffered STDOUT, for a raw-mode terminal where every key should echo
/// straight away
pub struct TermOutput;

impl TermOutput {
    pub fn new() -> Self {
        TermOutput
    }
}

impl Default for TermOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TermOutput {
    fn put_char(&mut self, c: u8) -> Result<(), io::Error> {
        let mut out = io::stdout().lock();
        out.write_all(&[c])?;
        out.flush()
    }
}

/// useful for testing; keeps everything written
#[derive(Default)]
pub struct DummyOutput {
    pub bytes: Vec<u8>,
}

impl DummyOutput {
    pub fn new() -> Self {
        DummyOutput { bytes: Vec::new() }
    }
}

impl Output for DummyOutput {
    fn put_char(&mut self, c: u8) -> Result<(), io::Error> {
        self.bytes.push(c);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_output_collects() -> Result<(), io::Error> {
        let mut o = DummyOutput::new();
        for c in b"ok" {
            o.put_char(*c)?;
        }
        o.flush()?;
        assert_eq!(o.bytes, b"ok");
        Ok(())
    }
}
