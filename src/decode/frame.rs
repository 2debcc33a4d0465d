use std::io::{ErrorKind, Read};

use anyhow::Context as _;

use crate::foundation::error::{ShowerError, ShowerResult};

/// Size of one on-disk track frame.
pub const FRAME_LEN: usize = 48;
/// Number of `f32` values carried by a frame.
pub const FIELD_COUNT: usize = 10;

const PAYLOAD_START: usize = 4;
const PAYLOAD_END: usize = PAYLOAD_START + FIELD_COUNT * 4;

/// Byte order of the float payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Order of the machine running the decoder (the producer wrote native floats).
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    fn read_f32(self, b: [u8; 4]) -> f32 {
        match self {
            Self::Native => f32::from_ne_bytes(b),
            Self::Little => f32::from_le_bytes(b),
            Self::Big => f32::from_be_bytes(b),
        }
    }

    fn write_f32(self, v: f32) -> [u8; 4] {
        match self {
            Self::Native => v.to_ne_bytes(),
            Self::Little => v.to_le_bytes(),
            Self::Big => v.to_be_bytes(),
        }
    }
}

/// One decoded track record.
///
/// Field layout (`f` indices):
/// - `0..2`: opaque payload, carried through untouched
/// - `2..5`: start position, `5`: start time
/// - `6..9`: end position, `9`: end time
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackSample {
    pub fields: [f32; FIELD_COUNT],
}

impl TrackSample {
    pub fn new(fields: [f32; FIELD_COUNT]) -> Self {
        Self { fields }
    }

    pub fn payload(&self) -> [f32; 2] {
        [self.fields[0], self.fields[1]]
    }

    pub fn start(&self) -> [f32; 3] {
        [self.fields[2], self.fields[3], self.fields[4]]
    }

    pub fn start_time(&self) -> f32 {
        self.fields[5]
    }

    pub fn end(&self) -> [f32; 3] {
        [self.fields[6], self.fields[7], self.fields[8]]
    }

    pub fn end_time(&self) -> f32 {
        self.fields[9]
    }

    pub fn is_finite(&self) -> bool {
        self.fields.iter().all(|v| v.is_finite())
    }
}

/// A 48-byte frame: opaque header, ten floats, opaque trailer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawFrame {
    pub header: [u8; 4],
    pub sample: TrackSample,
    pub trailer: [u8; 4],
}

impl RawFrame {
    /// Reinterpret exactly one frame's bytes.
    pub fn decode(bytes: &[u8; FRAME_LEN], order: ByteOrder) -> Self {
        let mut fields = [0.0f32; FIELD_COUNT];
        for (i, chunk) in bytes[PAYLOAD_START..PAYLOAD_END]
            .chunks_exact(4)
            .enumerate()
        {
            fields[i] = order.read_f32([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self {
            header: [bytes[0], bytes[1], bytes[2], bytes[3]],
            sample: TrackSample { fields },
            trailer: [bytes[44], bytes[45], bytes[46], bytes[47]],
        }
    }

    /// Lay the frame back out as bytes.
    pub fn encode(&self, order: ByteOrder) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        out[..PAYLOAD_START].copy_from_slice(&self.header);
        for (i, v) in self.sample.fields.iter().enumerate() {
            let at = PAYLOAD_START + i * 4;
            out[at..at + 4].copy_from_slice(&order.write_f32(*v));
        }
        out[PAYLOAD_END..].copy_from_slice(&self.trailer);
        out
    }
}

/// Decode a whole in-memory track file.
///
/// Returns exactly `bytes.len() / 48` samples in file order, or [`ShowerError::Format`] when
/// the length is not a whole number of frames.
pub fn decode_frames(bytes: &[u8], order: ByteOrder) -> ShowerResult<Vec<TrackSample>> {
    let rem = bytes.len() % FRAME_LEN;
    if rem != 0 {
        let offset = (bytes.len() - rem) as u64;
        return Err(ShowerError::format(offset, rem));
    }

    let mut out = Vec::with_capacity(bytes.len() / FRAME_LEN);
    for chunk in bytes.chunks_exact(FRAME_LEN) {
        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(chunk);
        out.push(RawFrame::decode(&frame, order).sample);
    }
    Ok(out)
}

/// Streaming decoder over any reader.
///
/// Yields one sample per whole frame. A stream that ends inside a frame yields a single
/// [`ShowerError::Format`] at that frame's offset and then stops.
pub struct FrameReader<R> {
    inner: R,
    order: ByteOrder,
    offset: u64,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            offset: 0,
            done: false,
        }
    }

    /// Byte offset of the next frame to be read.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fill(&mut self, buf: &mut [u8; FRAME_LEN]) -> ShowerResult<usize> {
        let mut filled = 0usize;
        while filled < FRAME_LEN {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ShowerError::Other(
                        anyhow::Error::new(e)
                            .context(format!("read track frame at offset {}", self.offset)),
                    ));
                }
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = ShowerResult<TrackSample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = [0u8; FRAME_LEN];
        match self.fill(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(FRAME_LEN) => {
                self.offset += FRAME_LEN as u64;
                Some(Ok(RawFrame::decode(&buf, self.order).sample))
            }
            Ok(partial) => {
                self.done = true;
                Some(Err(ShowerError::format(self.offset, partial)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read and decode a track file from disk.
pub fn read_track_file(
    path: &std::path::Path,
    order: ByteOrder,
) -> ShowerResult<Vec<TrackSample>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read track file '{}'", path.display()))?;
    decode_frames(&bytes, order)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/frame.rs"]
mod tests;
