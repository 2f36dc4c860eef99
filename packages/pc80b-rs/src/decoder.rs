use crate::error::{Pc80bError, Result};
use crate::types::{Sample, SampleSequence};
use byteorder::{ByteOrder, LittleEndian};

/// Byte-level layout of a decoded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLayout {
    pub total_bytes: usize,
    pub header_bytes: usize,
    pub body_bytes: usize,
    /// An odd trailing byte was present and ignored
    pub dropped_trailing_byte: bool,
}

impl BodyLayout {
    pub fn sample_count(&self) -> usize {
        self.body_bytes / 2
    }
}

/// Work out how `raw` splits into header and sample body.
///
/// Fails with a configuration error when the header runs past the end of the
/// buffer. A header that consumes the whole buffer yields an empty body.
pub fn body_layout(total_bytes: usize, header_size: usize) -> Result<BodyLayout> {
    if header_size > total_bytes {
        return Err(Pc80bError::Configuration(format!(
            "header size {} exceeds buffer length {}",
            header_size, total_bytes
        )));
    }

    let remaining = total_bytes - header_size;
    Ok(BodyLayout {
        total_bytes,
        header_bytes: header_size,
        body_bytes: remaining - remaining % 2,
        dropped_trailing_byte: remaining % 2 != 0,
    })
}

/// Decode a raw recording into packed samples.
///
/// Skips `header_size` bytes, drops an odd trailing byte, and reads the rest
/// as consecutive little-endian u16 values.
pub fn decode(raw: &[u8], header_size: usize) -> Result<SampleSequence> {
    let layout = body_layout(raw.len(), header_size)?;

    if layout.dropped_trailing_byte {
        log::debug!(
            "Body has odd length {}, dropping trailing byte",
            layout.body_bytes + 1
        );
    }

    let body = &raw[header_size..header_size + layout.body_bytes];
    let samples: SampleSequence = body
        .chunks_exact(2)
        .map(|pair| Sample::from_raw(LittleEndian::read_u16(pair)))
        .collect();

    log::debug!(
        "Decoded {} samples ({} header bytes, {} body bytes)",
        samples.len(),
        header_size,
        layout.body_bytes
    );

    Ok(samples)
}

/// Inverse of [`decode`] for the body: LE bytes of every sample, in order.
pub fn encode(samples: &[Sample]) -> Vec<u8> {
    let mut bytes = vec![0u8; samples.len() * 2];
    for (chunk, sample) in bytes.chunks_exact_mut(2).zip(samples) {
        LittleEndian::write_u16(chunk, sample.raw());
    }
    bytes
}
