use std::io::{self, BufRead};

/// A whitespace/newline-delimited token reader over the command stream.
///
/// Tokens are the atoms of the command language; line boundaries only matter
/// for recovery: a malformed command is abandoned by discarding the rest of
/// its line.
pub struct Tokenizer<R> {
    reader: R,
    /// The current buffered line.
    line: String,
    /// The cursor within the current line.
    position: usize,
}

impl<R: BufRead> Tokenizer<R> {
    /// Creates a new Tokenizer over the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            position: 0,
        }
    }

    /// Returns the next token, pulling further lines as needed.
    /// `Ok(None)` signals end of input.
    ///
    /// # Example
    /// ```
    /// # use std::io::Cursor;
    /// # use rowql::tokenizer::Tokenizer;
    /// let mut t = Tokenizer::new(Cursor::new("print FROM people"));
    /// assert_eq!(t.next_token().unwrap().as_deref(), Some("print"));
    /// assert_eq!(t.next_token().unwrap().as_deref(), Some("FROM"));
    /// ```
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            let rest = &self.line[self.position..];
            if let Some(offset) = rest.find(|c: char| !c.is_whitespace()) {
                let start = self.position + offset;
                let end = self.line[start..]
                    .find(char::is_whitespace)
                    .map_or(self.line.len(), |e| start + e);
                self.position = end;
                return Ok(Some(self.line[start..end].to_string()));
            }

            self.line.clear();
            self.position = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
    }

    /// Drops whatever remains of the current line. The next token comes from
    /// the following line.
    pub fn discard_line(&mut self) {
        self.position = self.line.len();
    }

    /// Drops the rest of the current line and the next `n` whole lines.
    /// Used to step over the row block of an insert that failed up front.
    pub fn skip_lines(&mut self, n: usize) -> io::Result<()> {
        self.discard_line();
        for _ in 0..n {
            self.line.clear();
            self.position = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                break;
            }
            self.position = self.line.len();
        }
        Ok(())
    }
}
