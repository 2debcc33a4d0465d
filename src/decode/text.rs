//! Whitespace-separated text exchange format.
//!
//! One record per line, ten decimal values in `f0..f9` order. Values are written with the
//! shortest representation that reads back to the same `f32`.

use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::{
    decode::frame::{FIELD_COUNT, TrackSample},
    foundation::error::{ShowerError, ShowerResult},
};

/// Result of reading a text stream: kept samples plus the number of skipped lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRecords {
    pub samples: Vec<TrackSample>,
    pub skipped: usize,
}

pub fn format_record(sample: &TrackSample) -> String {
    let parts: Vec<String> = sample.fields.iter().map(|v| v.to_string()).collect();
    parts.join(" ")
}

pub fn write_records<W: Write>(mut w: W, samples: &[TrackSample]) -> ShowerResult<()> {
    for s in samples {
        writeln!(w, "{}", format_record(s)).context("write text record")?;
    }
    w.flush().context("flush text records")?;
    Ok(())
}

/// Parse a single record line.
pub fn parse_record(line: &str) -> ShowerResult<TrackSample> {
    let mut fields = [0.0f32; FIELD_COUNT];
    let mut n = 0usize;
    for tok in line.split_whitespace() {
        if n == FIELD_COUNT {
            return Err(ShowerError::parse(format!(
                "expected {FIELD_COUNT} fields, found more"
            )));
        }
        fields[n] = tok
            .parse::<f32>()
            .map_err(|e| ShowerError::parse(format!("field {n} '{tok}': {e}")))?;
        n += 1;
    }
    if n != FIELD_COUNT {
        return Err(ShowerError::parse(format!(
            "expected {FIELD_COUNT} fields, found {n}"
        )));
    }
    Ok(TrackSample::new(fields))
}

/// Parse every line of `r`, skipping blank and malformed lines with a warning.
///
/// Only IO failures are returned as errors.
pub fn parse_records<R: BufRead>(r: R) -> ShowerResult<ParsedRecords> {
    let mut out = ParsedRecords::default();
    for (lineno, line) in r.lines().enumerate() {
        let line = line.with_context(|| format!("read text record line {}", lineno + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(s) => out.samples.push(s),
            Err(e) => {
                tracing::warn!(line = lineno + 1, error = %e, "skipping malformed track record");
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/text.rs"]
mod tests;
