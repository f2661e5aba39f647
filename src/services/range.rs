//! Parsing of the HTTP `Range` request header.
//!
//! Only the single-range form `bytes=<start>-[<end>]` is understood. A request
//! without a `Range` header is served whole; a ranged request is always capped
//! to the configured chunk size, however much the client asked for.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("malformed Range header")]
    Malformed,
    #[error("requested range not satisfiable")]
    NotSatisfiable,
}

/// An inclusive byte interval within an object of `total` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// What a single GET should send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeRange {
    /// No `Range` header: the entire object, status 200.
    Full { size: u64 },
    /// A capped sub-range, status 206.
    Partial(ByteRange),
}

impl ServeRange {
    /// `(offset, length)` of the bytes to copy.
    pub fn span(&self) -> (u64, u64) {
        match self {
            ServeRange::Full { size } => (0, *size),
            ServeRange::Partial(range) => (range.start, range.length()),
        }
    }
}

/// Work out which bytes to serve for an object of `size` bytes.
pub fn resolve_range(
    header: Option<&str>,
    size: u64,
    chunk_cap: u64,
) -> Result<ServeRange, RangeError> {
    let Some(header) = header else {
        return Ok(ServeRange::Full { size });
    };

    let (start, end) = parse_range_header(header)?;
    if size == 0 {
        return Err(RangeError::NotSatisfiable);
    }

    let last = size - 1;
    let end = end.unwrap_or(last).min(last);
    if start > end {
        return Err(RangeError::NotSatisfiable);
    }

    let chunk_cap = chunk_cap.max(1);
    let end = if end - start + 1 > chunk_cap {
        start + chunk_cap - 1
    } else {
        end
    };

    Ok(ServeRange::Partial(ByteRange {
        start,
        end,
        total: size,
    }))
}

/// Parse `bytes=START-[END]` into `(start, Option<end>)`.
fn parse_range_header(value: &str) -> Result<(u64, Option<u64>), RangeError> {
    let spec = value
        .trim()
        .strip_prefix("bytes=")
        .ok_or(RangeError::Malformed)?;
    if spec.contains(',') {
        return Err(RangeError::Malformed);
    }
    let (start, end) = spec.split_once('-').ok_or(RangeError::Malformed)?;

    let start = parse_offset(start)?;
    let end = match end.trim() {
        "" => None,
        end => Some(parse_offset(end)?),
    };
    Ok((start, end))
}

fn parse_offset(token: &str) -> Result<u64, RangeError> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    token.parse().map_err(|_| RangeError::Malformed)
}
