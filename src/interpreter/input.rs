use std::io::{self, BufRead, Read};

/// A [`BufRead`] that pulls one line at a time from `fetch`.
///
/// Nothing past the line being consumed is ever requested, so the source can
/// be shared with another reader (the REPL's line editor reads the same
/// standard input between two `read`s).
pub struct LineReader<F> {
    fetch: F,
    line: String,
    pos: usize,
}

impl LineReader<fn(&mut String) -> io::Result<usize>> {
    pub fn stdin() -> Self {
        Self::new(|line| io::stdin().read_line(line))
    }
}

impl<F> LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            line: String::new(),
            pos: 0,
        }
    }
}

impl<F> Read for LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<F> BufRead for LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            (self.fetch)(&mut self.line)?;
        }
        Ok(&self.line.as_bytes()[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}
