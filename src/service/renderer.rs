use std::io::{self, Write};
use std::sync::Mutex;

/// Line-oriented writer for the status sink. Each line reaches the sink in a
/// single `write_all`, so concurrent loops never interleave partial lines.
pub struct Renderer {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Renderer {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn line(&self, text: &str) -> io::Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("status sink lock poisoned"))?;
        sink.write_all(line.as_bytes())?;
        sink.flush()
    }
}
