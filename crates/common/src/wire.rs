//! Binary wire primitives for node-to-node transport.
//!
//! Layout conventions:
//! - `string`: u32 little-endian byte length, then UTF-8 bytes
//! - `optional string`: presence byte (0/1), then the string when 1
//! - `bool`: one byte, 0 or 1
//! - `map<string, optional string>`: u32 little-endian entry count, then
//!   per entry a mandatory key and an optional value
//!
//! The protocol version is negotiated by the transport and carried on the
//! writer/reader, never embedded in the payload. Both sides must agree on
//! the version or decoding will misalign.

use std::collections::BTreeMap;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Externally-negotiated protocol version gating optional wire fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion(u32);

impl ProtocolVersion {
    pub const V_2_17_0: Self = Self::new(2, 17, 0);
    pub const V_2_18_0: Self = Self::new(2, 18, 0);

    /// The version this build speaks by default.
    pub const CURRENT: Self = Self::V_2_18_0;

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self((major as u32) * 1_000_000 + (minor as u32) * 10_000 + (patch as u32) * 100)
    }

    /// True when `self` is at least `other`.
    pub fn on_or_after(self, other: Self) -> bool {
        self.0 >= other.0
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / 1_000_000;
        let minor = (self.0 / 10_000) % 100;
        let patch = (self.0 / 100) % 100;
        write!(f, "{}.{}.{}", major, minor, patch)
    }
}

/// Writer for the binary wire form. Writes are infallible; the buffer
/// grows as needed and `finish` hands back the encoded bytes.
pub struct WireWriter {
    buf: BytesMut,
    version: ProtocolVersion,
}

impl WireWriter {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            buf: BytesMut::new(),
            version,
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn write_str(&mut self, value: &str) {
        self.buf.put_u32_le(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
    }

    pub fn write_optional_str(&mut self, value: Option<&str>) {
        match value {
            Some(value) => {
                self.write_bool(true);
                self.write_str(value);
            }
            None => self.write_bool(false),
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(value as u8);
    }

    pub fn write_str_map(&mut self, map: &BTreeMap<String, Option<String>>) {
        self.buf.put_u32_le(map.len() as u32);
        for (key, value) in map {
            self.write_str(key);
            self.write_optional_str(value.as_deref());
        }
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Reader for the binary wire form. Every read checks the remaining
/// length first; truncated or corrupt input fails with `MalformedInput`.
pub struct WireReader<'a> {
    buf: &'a [u8],
    version: ProtocolVersion,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8], version: ProtocolVersion) -> Self {
        Self { buf, version }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            return Err(Error::MalformedInput(format!(
                "truncated stream: need {} bytes, {} remaining",
                len,
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn read_len(&mut self) -> Result<usize> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }

    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::MalformedInput(format!("invalid utf-8 in string: {}", e)))
    }

    pub fn read_optional_str(&mut self) -> Result<Option<String>> {
        if self.read_bool()? {
            Ok(Some(self.read_str()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::MalformedInput(format!(
                "invalid boolean byte: {:#04x}",
                other
            ))),
        }
    }

    pub fn read_str_map(&mut self) -> Result<BTreeMap<String, Option<String>>> {
        let count = self.read_len()?;
        // Each entry is at least a length prefix and a presence byte.
        if count.saturating_mul(5) > self.buf.len() {
            return Err(Error::MalformedInput(format!(
                "map entry count {} exceeds remaining stream",
                count
            )));
        }
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = self.read_str()?;
            let value = self.read_optional_str()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}
