//! Block/property parser driver.
//!
//! Walks the token stream keeping a stack of entered block names; the
//! joined, dotted stack is the dispatch key handed to the sink. The driver
//! knows nothing about the theme model: structure comes from here, meaning
//! from the handler table behind the [`Dispatch`] implementation.

use crate::args::{Arg, Args};
use crate::diag::{Diag, Pos};
use crate::lex::{Lexer, Tok, Verbatim};
use smallvec::SmallVec;
use tracing::trace;

/// What the sink wants done with a block that just opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Parse the contents normally.
    Container,
    /// Capture the body verbatim and hand it back in one piece.
    Verbatim,
}

/// Receiver of parse events. The compiler's handler table implements this;
/// tests use small local sinks.
pub trait Dispatch {
    /// A block `path { ...` opened. Unknown paths should be errors.
    fn open(&mut self, path: &str, pos: Pos) -> Result<BlockKind, Diag>;

    /// A block closed. `path` is the path that is being left.
    fn close(&mut self, path: &str, pos: Pos) -> Result<(), Diag>;

    /// A property statement `path: args... ;` completed.
    fn statement(&mut self, path: &str, args: Args) -> Result<(), Diag>;

    /// The body of a verbatim block requested via [`BlockKind::Verbatim`].
    fn verbatim(&mut self, path: &str, body: Verbatim) -> Result<(), Diag>;
}

/// Dotted path stack. Pushing appends `.segment`; popping truncates.
struct PathStack {
    joined: String,
    lengths: Vec<usize>,
}

impl PathStack {
    fn new() -> Self {
        Self {
            joined: String::new(),
            lengths: Vec::new(),
        }
    }

    fn push(&mut self, segment: &str) {
        self.lengths.push(self.joined.len());
        if !self.joined.is_empty() {
            self.joined.push('.');
        }
        self.joined.push_str(segment);
    }

    fn pop(&mut self) {
        let len = self.lengths.pop().expect("pop on empty path stack");
        self.joined.truncate(len);
    }

    fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    fn as_str(&self) -> &str {
        &self.joined
    }

    /// Key for a property statement under the current path.
    fn property_key(&self, prop: &str) -> String {
        if self.joined.is_empty() {
            prop.to_string()
        } else {
            format!("{}.{}", self.joined, prop)
        }
    }
}

/// Parse a whole source string, feeding the sink until end of input or the
/// first error.
pub fn parse(src: &str, file: &str, sink: &mut impl Dispatch) -> Result<(), Diag> {
    let mut lex = Lexer::new(src, file);
    let mut path = PathStack::new();

    loop {
        let (tok, line) = lex.next_token()?;
        let pos = Pos::new(lex.file(), line);
        match tok {
            Tok::Eof => {
                if !path.is_empty() {
                    return Err(Diag::syntax(
                        pos,
                        format!("unexpected end of file inside \"{}\"", path.as_str()),
                    ));
                }
                return Ok(());
            }
            Tok::CloseBrace => {
                if path.is_empty() {
                    return Err(Diag::syntax(pos, "unmatched '}'"));
                }
                sink.close(path.as_str(), pos)?;
                path.pop();
            }
            Tok::Word(word) => {
                let (next, next_line) = lex.next_token()?;
                match next {
                    Tok::OpenBrace => {
                        path.push(&word);
                        trace!(path = path.as_str(), line, "block open");
                        match sink.open(path.as_str(), pos)? {
                            BlockKind::Container => {}
                            BlockKind::Verbatim => {
                                let body = lex.capture_verbatim()?;
                                sink.verbatim(path.as_str(), body)?;
                                path.pop();
                            }
                        }
                    }
                    Tok::Colon => {
                        let pos = Pos::new(lex.file(), line);
                        let args = collect_args(&mut lex, pos)?;
                        let key = path.property_key(&word);
                        trace!(key = key.as_str(), line, n = args.len(), "statement");
                        sink.statement(&key, args)?;
                    }
                    other => {
                        return Err(Diag::syntax(
                            Pos::new(lex.file(), next_line),
                            format!(
                                "expected ':' or '{{' after \"{word}\", got {}",
                                other.describe()
                            ),
                        ));
                    }
                }
            }
            other => {
                return Err(Diag::syntax(
                    pos,
                    format!("expected block or property name, got {}", other.describe()),
                ));
            }
        }
    }
}

fn collect_args(lex: &mut Lexer<'_>, pos: Pos) -> Result<Args, Diag> {
    let mut items: SmallVec<[Arg; 6]> = SmallVec::new();
    loop {
        let (tok, line) = lex.next_token()?;
        match tok {
            Tok::Semicolon => return Ok(Args::new(pos, items)),
            Tok::Word(text) => items.push(Arg {
                text,
                quoted: false,
            }),
            Tok::Str(text) => items.push(Arg { text, quoted: true }),
            other => {
                return Err(Diag::syntax(
                    Pos::new(lex.file(), line),
                    format!("expected argument or ';', got {}", other.describe()),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Dispatch for Recorder {
        fn open(&mut self, path: &str, _pos: Pos) -> Result<BlockKind, Diag> {
            self.events.push(format!("open {path}"));
            if path.ends_with("script") {
                return Ok(BlockKind::Verbatim);
            }
            Ok(BlockKind::Container)
        }

        fn close(&mut self, path: &str, _pos: Pos) -> Result<(), Diag> {
            self.events.push(format!("close {path}"));
            Ok(())
        }

        fn statement(&mut self, path: &str, args: Args) -> Result<(), Diag> {
            self.events.push(format!("st {path}/{}", args.len()));
            Ok(())
        }

        fn verbatim(&mut self, path: &str, body: Verbatim) -> Result<(), Diag> {
            self.events
                .push(format!("verbatim {path} [{}]", body.text.trim()));
            Ok(())
        }
    }

    #[test]
    fn paths_nest_and_dispatch() {
        let mut rec = Recorder::default();
        parse(
            "collections { group { name: \"g\"; parts { part { name: \"p\"; } } } }",
            "t.edc",
            &mut rec,
        )
        .unwrap();
        assert_eq!(
            rec.events,
            vec![
                "open collections",
                "open collections.group",
                "st collections.group.name/1",
                "open collections.group.parts",
                "open collections.group.parts.part",
                "st collections.group.parts.part.name/1",
                "close collections.group.parts.part",
                "close collections.group.parts",
                "close collections.group",
                "close collections",
            ]
        );
    }

    #[test]
    fn verbatim_block_is_not_tokenized() {
        let mut rec = Recorder::default();
        parse(
            "group { script { public x() { return 1; } } min: 1 2; }",
            "t.edc",
            &mut rec,
        )
        .unwrap();
        assert_eq!(
            rec.events,
            vec![
                "open group",
                "open group.script",
                "verbatim group.script [public x() { return 1; }]",
                "st group.min/2",
                "close group",
            ]
        );
    }

    #[test]
    fn unmatched_brace_is_reported() {
        let mut rec = Recorder::default();
        let err = parse("group { name: \"x\";", "t.edc", &mut rec).unwrap_err();
        assert!(err.msg.contains("end of file"));
    }

    #[test]
    fn stray_close_is_reported() {
        let mut rec = Recorder::default();
        let err = parse("}", "t.edc", &mut rec).unwrap_err();
        assert!(err.msg.contains("unmatched"));
    }
}
