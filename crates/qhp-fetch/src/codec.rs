//! Binary bar record codec.

use byteorder::{ByteOrder, LittleEndian};
use qhp_types::BarRecord;
use std::iter::FusedIterator;
use std::slice::ChunksExact;
use thiserror::Error;

/// Size in bytes of one encoded bar record.
pub const BAR_RECORD_SIZE: usize = 48;

/// Errors that can occur while decoding bar payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload length is not a whole number of records.
    #[error("Malformed record payload: {len} bytes (expected multiple of {BAR_RECORD_SIZE})")]
    MalformedRecord {
        /// Length of the rejected payload.
        len: usize,
    },
}

/// Encodes one bar into its wire form.
///
/// The record is stored in little-endian order:
/// - `i64`: timestamp, seconds since epoch (bytes 0-7)
/// - `f64`: open (bytes 8-15)
/// - `f64`: high (bytes 16-23)
/// - `f64`: low (bytes 24-31)
/// - `f64`: close (bytes 32-39)
/// - `u64`: volume (bytes 40-47)
#[must_use]
pub fn encode_bar(bar: &BarRecord) -> [u8; BAR_RECORD_SIZE] {
    let mut buf = [0u8; BAR_RECORD_SIZE];
    LittleEndian::write_i64(&mut buf[0..8], bar.timestamp);
    LittleEndian::write_f64(&mut buf[8..16], bar.open);
    LittleEndian::write_f64(&mut buf[16..24], bar.high);
    LittleEndian::write_f64(&mut buf[24..32], bar.low);
    LittleEndian::write_f64(&mut buf[32..40], bar.close);
    LittleEndian::write_u64(&mut buf[40..48], bar.volume);
    buf
}

/// Encodes a run of bars into one contiguous payload.
#[must_use]
pub fn encode_bars(bars: &[BarRecord]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(bars.len() * BAR_RECORD_SIZE);
    for bar in bars {
        payload.extend_from_slice(&encode_bar(bar));
    }
    payload
}

/// Decodes bar records from a payload.
///
/// The returned iterator is lazy and cheap to clone, so a payload can be
/// walked more than once.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedRecord`] if the payload length is not a
/// multiple of [`BAR_RECORD_SIZE`]. Nothing is decoded in that case.
pub fn decode_bars(data: &[u8]) -> Result<Bars<'_>, DecodeError> {
    if !data.len().is_multiple_of(BAR_RECORD_SIZE) {
        return Err(DecodeError::MalformedRecord { len: data.len() });
    }

    Ok(Bars {
        chunks: data.chunks_exact(BAR_RECORD_SIZE),
    })
}

/// Lazy iterator over the records of a validated payload.
#[derive(Debug, Clone)]
pub struct Bars<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl Iterator for Bars<'_> {
    type Item = BarRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(decode_single_bar)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Bars<'_> {}

impl FusedIterator for Bars<'_> {}

/// Decodes a single record from an exact-size chunk.
#[inline]
fn decode_single_bar(data: &[u8]) -> BarRecord {
    BarRecord::new(
        LittleEndian::read_i64(&data[0..8]),
        LittleEndian::read_f64(&data[8..16]),
        LittleEndian::read_f64(&data[16..24]),
        LittleEndian::read_f64(&data[24..32]),
        LittleEndian::read_f64(&data[32..40]),
        LittleEndian::read_u64(&data[40..48]),
    )
}
