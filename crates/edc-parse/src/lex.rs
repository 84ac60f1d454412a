//! Tokenizer for the block/property grammar.
//!
//! Produces words, quoted strings and the four punctuation marks `{ } : ;`
//! with line numbers, skipping `//` and `/* */` comments. A verbatim mode
//! captures the raw byte run of a script body without tokenizing it; the
//! driver requests it right after an opening brace.

use crate::diag::{Diag, Pos};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    /// Bare word: identifier, number, enum label...
    Word(String),
    /// Double-quoted string, escapes already applied.
    Str(String),
    Colon,
    Semicolon,
    OpenBrace,
    CloseBrace,
    Eof,
}

impl Tok {
    pub fn describe(&self) -> String {
        match self {
            Tok::Word(w) => format!("\"{w}\""),
            Tok::Str(_) => "string".to_string(),
            Tok::Colon => "':'".to_string(),
            Tok::Semicolon => "';'".to_string(),
            Tok::OpenBrace => "'{'".to_string(),
            Tok::CloseBrace => "'}'".to_string(),
            Tok::Eof => "end of file".to_string(),
        }
    }
}

/// A captured verbatim script body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verbatim {
    pub text: String,
    pub line_start: u32,
    pub line_end: u32,
}

pub struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
    line: u32,
    file: Arc<str>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str, file: &str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            file: Arc::from(file),
        }
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    pub fn here(&self) -> Pos {
        Pos::new(&self.file, self.line)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skip whitespace and both comment styles.
    fn skip_trivia(&mut self) -> Result<(), Diag> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.bump() {
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'*') => {
                    let open = self.here();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some(b'*') if self.peek() == Some(b'/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(Diag::syntax(open, "unterminated block comment"));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn quoted_string(&mut self) -> Result<String, Diag> {
        let open = self.here();
        self.bump(); // opening quote
        let mut out: Vec<u8> = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => {
                    // The input arrived as &str and escapes are ASCII, so
                    // the collected bytes are still valid UTF-8.
                    return Ok(String::from_utf8_lossy(&out).into_owned());
                }
                Some(b'\\') => match self.bump() {
                    Some(b'"') => out.push(b'"'),
                    Some(b'\\') => out.push(b'\\'),
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(other) => {
                        // Unknown escape passes through unchanged.
                        out.push(b'\\');
                        out.push(other);
                    }
                    None => return Err(Diag::syntax(open, "unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(Diag::syntax(open, "unterminated string")),
            }
        }
    }

    /// Next token plus the line it started on.
    pub fn next_token(&mut self) -> Result<(Tok, u32), Diag> {
        self.skip_trivia()?;
        let line = self.line;
        let Some(c) = self.peek() else {
            return Ok((Tok::Eof, line));
        };
        let tok = match c {
            b'{' => {
                self.bump();
                Tok::OpenBrace
            }
            b'}' => {
                self.bump();
                Tok::CloseBrace
            }
            b':' => {
                self.bump();
                Tok::Colon
            }
            b';' => {
                self.bump();
                Tok::Semicolon
            }
            b'"' => Tok::Str(self.quoted_string()?),
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_ascii_whitespace() || matches!(c, b'{' | b'}' | b':' | b';' | b'"') {
                        break;
                    }
                    // Comments terminate a word too.
                    if c == b'/' && matches!(self.src.get(self.pos + 1), Some(b'/') | Some(b'*')) {
                        break;
                    }
                    self.bump();
                }
                if self.pos == start {
                    return Err(Diag::syntax(
                        self.here(),
                        format!("unexpected character '{}'", c as char),
                    ));
                }
                Tok::Word(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
            }
        };
        Ok((tok, line))
    }

    /// Capture everything up to the brace matching the one just consumed,
    /// without tokenization. Comments and strings inside the body travel
    /// unchanged. Used for embedded script blocks.
    pub fn capture_verbatim(&mut self) -> Result<Verbatim, Diag> {
        let open = self.here();
        let start = self.pos;
        let line_start = self.line;
        let mut depth = 1u32;
        loop {
            match self.bump() {
                Some(b'{') => depth += 1,
                Some(b'}') => {
                    depth -= 1;
                    if depth == 0 {
                        let text =
                            String::from_utf8_lossy(&self.src[start..self.pos - 1]).into_owned();
                        return Ok(Verbatim {
                            text,
                            line_start,
                            line_end: self.line,
                        });
                    }
                }
                Some(_) => {}
                None => return Err(Diag::syntax(open, "unterminated script block")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tokens(src: &str) -> Vec<Tok> {
        let mut lex = Lexer::new(src, "test.edc");
        let mut out = Vec::new();
        loop {
            let (tok, _) = lex.next_token().unwrap();
            let done = tok == Tok::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn basic_statement() {
        let toks = all_tokens("color: 10 20 30 40;");
        assert_eq!(
            toks,
            vec![
                Tok::Word("color".into()),
                Tok::Colon,
                Tok::Word("10".into()),
                Tok::Word("20".into()),
                Tok::Word("30".into()),
                Tok::Word("40".into()),
                Tok::Semicolon,
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        let toks = all_tokens("a /* x { } */ { // open\n }");
        assert_eq!(
            toks,
            vec![
                Tok::Word("a".into()),
                Tok::OpenBrace,
                Tok::CloseBrace,
                Tok::Eof
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let toks = all_tokens(r#"name: "a\"b\\c";"#);
        assert_eq!(toks[2], Tok::Str("a\"b\\c".into()));
    }

    #[test]
    fn line_numbers_track_newlines() {
        let mut lex = Lexer::new("a\n\nb", "test.edc");
        let (_, l1) = lex.next_token().unwrap();
        let (_, l2) = lex.next_token().unwrap();
        assert_eq!((l1, l2), (1, 3));
    }

    #[test]
    fn verbatim_keeps_nested_braces() {
        let src = "script { public f() { emit(\"go\"); return; }\n } after";
        let mut lex = Lexer::new(src, "t.edc");
        assert_eq!(lex.next_token().unwrap().0, Tok::Word("script".into()));
        assert_eq!(lex.next_token().unwrap().0, Tok::OpenBrace);
        let v = lex.capture_verbatim().unwrap();
        assert!(v.text.contains("public f() { emit(\"go\"); return; }"));
        assert_eq!(v.line_start, 1);
        assert_eq!(lex.next_token().unwrap().0, Tok::Word("after".into()));
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let mut lex = Lexer::new("/* never closed", "t.edc");
        assert!(lex.next_token().is_err());
    }
}
