//! Typed little-endian codec for entry payloads.
//!
//! Every model struct serializes itself through these two types. The format
//! is positional; reader and writer must agree field for field, which the
//! round-trip tests in the serializer crate enforce.

use crate::{ContainerError, Result};

#[derive(Default)]
pub struct EntryWriter {
    buf: Vec<u8>,
}

impl EntryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn str(&mut self, v: &str) {
        self.u32(v.len() as u32);
        self.buf.extend_from_slice(v.as_bytes());
    }

    pub fn opt_str(&mut self, v: Option<&str>) {
        match v {
            Some(s) => {
                self.bool(true);
                self.str(s);
            }
            None => self.bool(false),
        }
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.u32(v.len() as u32);
        self.buf.extend_from_slice(v);
    }

    /// Length prefix for a homogeneous sequence; the caller then writes each
    /// element in order.
    pub fn seq(&mut self, len: usize) {
        self.u32(len as u32);
    }

    /// Ids are dense non-negative integers; "unset" travels as -1.
    pub fn id(&mut self, v: Option<u32>) {
        match v {
            Some(id) => self.i32(id as i32),
            None => self.i32(-1),
        }
    }
}

pub struct EntryReader<'a> {
    buf: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> EntryReader<'a> {
    pub fn new(buf: &'a [u8], what: &'static str) -> Self {
        Self { buf, pos: 0, what }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(ContainerError::Truncated(self.what));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn done(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    pub fn str(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| ContainerError::BadUtf8)
    }

    pub fn opt_str(&mut self) -> Result<Option<String>> {
        Ok(if self.bool()? { Some(self.str()?) } else { None })
    }

    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    pub fn seq(&mut self) -> Result<usize> {
        Ok(self.u32()? as usize)
    }

    pub fn id(&mut self) -> Result<Option<u32>> {
        let raw = self.i32()?;
        Ok(if raw < 0 { None } else { Some(raw as u32) })
    }

    /// Decode an enum discriminant through a checked conversion.
    pub fn tag<T>(&mut self, what: &'static str, from: impl Fn(u8) -> Option<T>) -> Result<T> {
        let raw = self.u8()?;
        from(raw).ok_or(ContainerError::BadTag {
            what,
            value: raw as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scalar_round_trip() {
        let mut w = EntryWriter::new();
        w.u8(7);
        w.bool(true);
        w.u32(0xdead_beef);
        w.i32(-42);
        w.f64(0.25);
        w.str("part name");
        w.opt_str(None);
        w.opt_str(Some("clip"));
        w.id(None);
        w.id(Some(3));
        let bytes = w.into_bytes();

        let mut r = EntryReader::new(&bytes, "test");
        assert_eq!(r.u8().unwrap(), 7);
        assert!(r.bool().unwrap());
        assert_eq!(r.u32().unwrap(), 0xdead_beef);
        assert_eq!(r.i32().unwrap(), -42);
        assert_eq!(r.f64().unwrap(), 0.25);
        assert_eq!(r.str().unwrap(), "part name");
        assert_eq!(r.opt_str().unwrap(), None);
        assert_eq!(r.opt_str().unwrap().as_deref(), Some("clip"));
        assert_eq!(r.id().unwrap(), None);
        assert_eq!(r.id().unwrap(), Some(3));
        assert!(r.done());
    }

    #[test]
    fn truncation_is_an_error() {
        let mut w = EntryWriter::new();
        w.str("abcdef");
        let bytes = w.into_bytes();
        let mut r = EntryReader::new(&bytes[..bytes.len() - 1], "test");
        assert!(matches!(r.str(), Err(ContainerError::Truncated("test"))));
    }

    proptest! {
        #[test]
        fn strings_survive(s in "\\PC*", n in any::<i32>(), f in any::<f64>()) {
            let mut w = EntryWriter::new();
            w.str(&s);
            w.i32(n);
            w.f64(f);
            let bytes = w.into_bytes();
            let mut r = EntryReader::new(&bytes, "prop");
            prop_assert_eq!(r.str().unwrap(), s);
            prop_assert_eq!(r.i32().unwrap(), n);
            let back = r.f64().unwrap();
            prop_assert!(back == f || (back.is_nan() && f.is_nan()));
        }
    }
}
