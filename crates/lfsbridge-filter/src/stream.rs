// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Chunked byte copying that observes a [`CancellationToken`]

use crate::cancel::CancellationToken;
use std::io::{self, ErrorKind, Read, Write};

/// Size of the buffer used for each copy step
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// How a copy loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The reader reached end of stream
    Finished {
        /// Bytes written to the destination
        bytes: u64,
    },

    /// The token was cancelled before the reader was exhausted
    Cancelled {
        /// Bytes written before cancellation was observed
        bytes: u64,
    },
}

impl CopyOutcome {
    /// Bytes written regardless of how the copy ended
    pub fn bytes(self) -> u64 {
        match self {
            CopyOutcome::Finished { bytes } | CopyOutcome::Cancelled { bytes } => bytes,
        }
    }
}

/// Copies `reader` into `writer` until end of stream, checking `cancel`
/// before every chunk. The writer is flushed on normal completion.
pub fn copy_with_cancel<R, W>(
    reader: &mut R,
    writer: &mut W,
    cancel: &CancellationToken,
) -> io::Result<CopyOutcome>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Ok(CopyOutcome::Cancelled { bytes });
        }

        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer[..read])?;
        bytes += read as u64;
    }

    writer.flush()?;
    Ok(CopyOutcome::Finished { bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_copy_all_bytes() {
        let data = vec![7u8; COPY_BUFFER_SIZE * 2 + 13];
        let mut output = Vec::new();

        let outcome = copy_with_cancel(&mut Cursor::new(&data), &mut output, &CancellationToken::new())
            .unwrap();

        assert_eq!(outcome, CopyOutcome::Finished { bytes: data.len() as u64 });
        assert_eq!(output, data);
    }

    #[test]
    fn test_copy_empty_input() {
        let mut output = Vec::new();
        let outcome =
            copy_with_cancel(&mut io::empty(), &mut output, &CancellationToken::new()).unwrap();
        assert_eq!(outcome.bytes(), 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_stops_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut output = Vec::new();

        let outcome = copy_with_cancel(&mut Cursor::new(b"HELLO"), &mut output, &token).unwrap();

        assert_eq!(outcome, CopyOutcome::Cancelled { bytes: 0 });
        assert!(output.is_empty());
    }
}
