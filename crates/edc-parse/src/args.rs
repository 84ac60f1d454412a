//! Typed access to the arguments of one property statement.
//!
//! Handlers read a fixed arity through these extractors; any arity, range
//! or label violation becomes a fatal diagnostic carrying the statement's
//! source position.

use crate::diag::{Diag, Pos};
use smallvec::SmallVec;

/// One raw argument token. Quoting is remembered so `flags`-style word
/// lists can reject strings where the original grammar expects labels.
#[derive(Debug, Clone)]
pub struct Arg {
    pub text: String,
    pub quoted: bool,
}

/// All arguments of one `path.property: a b c;` statement.
#[derive(Debug, Clone)]
pub struct Args {
    pub pos: Pos,
    items: SmallVec<[Arg; 6]>,
}

impl Args {
    pub fn new(pos: Pos, items: SmallVec<[Arg; 6]>) -> Self {
        Self { pos, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an argument exists at `i` (the original's `is_param`).
    pub fn has(&self, i: usize) -> bool {
        i < self.items.len()
    }

    fn get(&self, i: usize) -> Result<&Arg, Diag> {
        self.items.get(i).ok_or_else(|| {
            Diag::syntax(
                self.pos.clone(),
                format!("missing argument {} of statement", i + 1),
            )
        })
    }

    pub fn expect(&self, n: usize) -> Result<(), Diag> {
        if self.items.len() != n {
            return Err(Diag::syntax(
                self.pos.clone(),
                format!("expected {} argument(s), got {}", n, self.items.len()),
            ));
        }
        Ok(())
    }

    pub fn expect_min(&self, n: usize) -> Result<(), Diag> {
        if self.items.len() < n {
            return Err(Diag::syntax(
                self.pos.clone(),
                format!("expected at least {} argument(s), got {}", n, self.items.len()),
            ));
        }
        Ok(())
    }

    pub fn str(&self, i: usize) -> Result<&str, Diag> {
        Ok(&self.get(i)?.text)
    }

    pub fn int(&self, i: usize) -> Result<i32, Diag> {
        let arg = self.get(i)?;
        parse_int(&arg.text).ok_or_else(|| {
            Diag::syntax(
                self.pos.clone(),
                format!("\"{}\" is not an integer", arg.text),
            )
        })
    }

    pub fn int_range(&self, i: usize, min: i32, max: i32) -> Result<i32, Diag> {
        let v = self.int(i)?;
        if v < min || v > max {
            return Err(Diag::range(
                self.pos.clone(),
                format!("{v} out of range [{min}, {max}]"),
            ));
        }
        Ok(v)
    }

    pub fn float(&self, i: usize) -> Result<f64, Diag> {
        let arg = self.get(i)?;
        arg.text.parse::<f64>().map_err(|_| {
            Diag::syntax(
                self.pos.clone(),
                format!("\"{}\" is not a number", arg.text),
            )
        })
    }

    pub fn float_range(&self, i: usize, min: f64, max: f64) -> Result<f64, Diag> {
        let v = self.float(i)?;
        if v < min || v > max {
            return Err(Diag::range(
                self.pos.clone(),
                format!("{v} out of range [{min}, {max}]"),
            ));
        }
        Ok(v)
    }

    pub fn bool(&self, i: usize) -> Result<bool, Diag> {
        let arg = self.get(i)?;
        match arg.text.as_str() {
            "1" | "on" | "true" => Ok(true),
            "0" | "off" | "false" => Ok(false),
            other => Err(Diag::syntax(
                self.pos.clone(),
                format!("\"{other}\" is not a boolean (1/0/on/off/true/false)"),
            )),
        }
    }

    /// Map a label to its value; unknown labels list the accepted set.
    pub fn enum_<T: Copy>(&self, i: usize, table: &[(&str, T)]) -> Result<T, Diag> {
        let arg = self.get(i)?;
        for (label, value) in table {
            if arg.text == *label {
                return Ok(*value);
            }
        }
        let labels: Vec<&str> = table.iter().map(|(l, _)| *l).collect();
        Err(Diag::enumeration(
            self.pos.clone(),
            format!(
                "token \"{}\" not one of: {}",
                arg.text,
                labels.join(", ")
            ),
        ))
    }

    /// OR together one flag label per remaining argument, starting at `i`.
    pub fn flags(&self, i: usize, table: &[(&str, u32)]) -> Result<u32, Diag> {
        let mut out = 0;
        for idx in i..self.items.len() {
            out |= self.enum_(idx, table)?;
        }
        Ok(out)
    }

    /// Concatenate every argument from `i` on (the `text.text` rule).
    pub fn concat_from(&self, i: usize) -> String {
        let mut out = String::new();
        for idx in i..self.items.len() {
            out.push_str(&self.items[idx].text);
        }
        out
    }
}

/// Integers in the grammar may be decimal, hex (0x...) or written as a
/// float literal that happens to be integral.
fn parse_int(text: &str) -> Option<i32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i32::from_str_radix(hex, 16).ok();
    }
    if let Ok(v) = text.parse::<i32>() {
        return Some(v);
    }
    // Accept "12.0" style spellings; truncation matches the original's atoi
    // behavior for fractional input.
    text.parse::<f64>().ok().map(|f| f as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn args(items: &[&str]) -> Args {
        let file: Arc<str> = Arc::from("test.edc");
        Args::new(
            Pos::new(&file, 7),
            items
                .iter()
                .map(|t| Arg {
                    text: t.to_string(),
                    quoted: false,
                })
                .collect(),
        )
    }

    #[test]
    fn int_range_enforced() {
        let a = args(&["10", "999"]);
        assert_eq!(a.int_range(0, 0, 255).unwrap(), 10);
        let err = a.int_range(1, 0, 255).unwrap_err();
        assert_eq!(err.kind, crate::diag::DiagKind::Range);
        assert_eq!(err.pos.line, 7);
    }

    #[test]
    fn enum_rejects_unknown_label() {
        let a = args(&["SIDEWAYS"]);
        let err = a
            .enum_(0, &[("RECT", 1), ("IMAGE", 2)])
            .map(|_: i32| ())
            .unwrap_err();
        assert_eq!(err.kind, crate::diag::DiagKind::Enumeration);
        assert!(err.msg.contains("RECT"));
    }

    #[test]
    fn flags_or_together() {
        let a = args(&["NONE", "ON_HOLD"]);
        assert_eq!(a.flags(0, &[("NONE", 0), ("ON_HOLD", 1)]).unwrap(), 1);
    }

    #[test]
    fn arity_check() {
        let a = args(&["x"]);
        assert!(a.expect(1).is_ok());
        assert!(a.expect(2).is_err());
        assert!(a.expect_min(2).is_err());
    }

    #[test]
    fn int_spellings() {
        let a = args(&["0x10", "12.0", "-3"]);
        assert_eq!(a.int(0).unwrap(), 16);
        assert_eq!(a.int(1).unwrap(), 12);
        assert_eq!(a.int(2).unwrap(), -3);
    }
}
