//! Parsing of the `#SYSTEM` object.
//!
//! `#SYSTEM` starts with a 4-byte version tag followed by packed records.
//! Every record is a little-endian `u16` code, a little-endian `u16` length
//! and `length` bytes of data.

use crate::Decoder;
use std::borrow::Cow;

/// Internal path of the `#SYSTEM` object.
pub const SYSTEM_OBJECT_PATH: &str = "/#SYSTEM";

/// Record code holding the default topic, a nul-terminated path.
pub const DEFAULT_TOPIC_CODE: u16 = 2;

const HEADER_LEN: usize = 4;
const RECORD_HEADER_LEN: usize = 4;

/// `SystemRecord` is one record of the `#SYSTEM` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemRecord<'a> {
    pub code: u16,
    pub data: &'a [u8],
}

/// `SystemRecords` iterates over the complete records of a `#SYSTEM` stream.
///
/// The iteration stops for good at the first record whose declared length
/// runs past the end of the buffer.
pub struct SystemRecords<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> SystemRecords<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        // A buffer without a full header yields nothing.
        let cursor = if buffer.len() < HEADER_LEN {
            buffer.len()
        } else {
            HEADER_LEN
        };
        SystemRecords { buffer, cursor }
    }
}

impl<'a> Iterator for SystemRecords<'a> {
    type Item = SystemRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self
            .buffer
            .get(self.cursor..self.cursor.checked_add(RECORD_HEADER_LEN)?)?;
        let code = u16::from_le_bytes([header[0], header[1]]);
        let len = u16::from_le_bytes([header[2], header[3]]) as usize;
        let start = self.cursor + RECORD_HEADER_LEN;
        match self.buffer.get(start..start + len) {
            Some(data) => {
                self.cursor = start + len;
                Some(SystemRecord { code, data })
            }
            None => {
                self.cursor = self.buffer.len();
                None
            }
        }
    }
}

pub(crate) fn decode_lossy(bytes: &[u8]) -> Option<Cow<'_, str>> {
    Some(String::from_utf8_lossy(bytes))
}

/// `parse_default_topic` extracts the default topic from a `#SYSTEM` stream.
///
/// The last byte of the record is dropped as the nul terminator and the topic
/// ends at the first nul left. A `/` is prepended to a non-empty record that
/// does not start with one. A short, truncated or topic-less stream gives `None`.
pub fn parse_default_topic(buffer: &[u8]) -> Option<String> {
    parse_default_topic_with(buffer, decode_lossy)
}

/// `parse_default_topic_with` works like [`parse_default_topic`] but decodes the
/// topic bytes with the given decoder. A failed decoding gives `None`.
pub fn parse_default_topic_with(buffer: &[u8], decode: Decoder) -> Option<String> {
    let record = SystemRecords::new(buffer).find(|record| record.code == DEFAULT_TOPIC_CODE)?;
    let text = &record.data[..record.data.len().saturating_sub(1)];
    // The slash is decided on the whole record, the text ends at the first nul.
    let needs_slash = text.first().is_some_and(|&b| b != b'/');
    let text = text.split(|&b| b == 0).next().unwrap_or_default();
    let topic = decode(text)?;
    if needs_slash {
        Some(format!("/{topic}"))
    } else {
        Some(topic.into_owned())
    }
}
