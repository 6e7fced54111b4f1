//! Frame structure and the byte-stuffing codec
//!
//! # Frame Structure
//!
//! ```text
//! ┌───────────┬────────────────────┬───────────────────┬──────────┐
//! │ Start     │ stuffed(contents)  │ stuffed(checksum) │ Stop     │
//! │ 0xF1/0xF0 │ N bytes            │ 1–2 bytes         │ 0xF2     │
//! └───────────┴────────────────────┴───────────────────┴──────────┘
//! ```
//!
//! Extended frames carry a stuffed destination and source byte between
//! the start flag and the contents. The checksum is the XOR of the
//! unstuffed contents; addresses are excluded. The four reserved bytes
//! 0xF0–0xF3 never appear raw inside a frame: each is escaped as the
//! pair `0xF3 0x00..=0x03`.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    consts::{BYTE_STUFF, EXT_FRAME_START, FRAME_STOP, MAX_FRAME_LEN, STD_FRAME_START},
    error::{Error, Result},
};

/// XOR checksum over unstuffed frame contents
pub fn checksum(contents: &[u8]) -> u8 {
    contents.iter().fold(0, |acc, b| acc ^ b)
}

/// One wire-level message
///
/// # Examples
///
/// ```
/// use oarlock_csafe::Frame;
///
/// let frame = Frame::standard(vec![0x80]);
/// let encoded = frame.encode().unwrap();
/// assert_eq!(&encoded[..], &[0xF1, 0x80, 0x80, 0xF2]);
///
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(decoded, frame);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Extended frames carry destination and source addresses
    pub extended: bool,

    /// Destination address, meaningful only when extended
    pub destination: u8,

    /// Source address, meaningful only when extended
    pub source: u8,

    /// Unstuffed, unchecksummed command payload
    pub contents: Bytes,
}

impl Frame {
    /// Create a standard (non-addressed) frame
    pub fn standard(contents: impl Into<Bytes>) -> Self {
        Self {
            extended: false,
            destination: 0,
            source: 0,
            contents: contents.into(),
        }
    }

    /// Create an extended frame with destination and source addresses
    pub fn extended(destination: u8, source: u8, contents: impl Into<Bytes>) -> Self {
        Self {
            extended: true,
            destination,
            source,
            contents: contents.into(),
        }
    }

    /// Checksum of this frame's contents
    pub fn checksum(&self) -> u8 {
        checksum(&self.contents)
    }

    /// Encode to wire bytes with stuffing and checksum
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooLong`] when the stuffed encoding,
    /// start and stop flags included, exceeds 120 bytes.
    pub fn encode(&self) -> Result<BytesMut> {
        // Worst case doubles every byte; flags and checksum on top.
        let mut buf = BytesMut::with_capacity(4 + 2 * self.contents.len());

        if self.extended {
            buf.put_u8(EXT_FRAME_START);
            stuff(&mut buf, self.destination);
            stuff(&mut buf, self.source);
        } else {
            buf.put_u8(STD_FRAME_START);
        }

        for &b in self.contents.iter() {
            stuff(&mut buf, b);
        }
        stuff(&mut buf, self.checksum());

        buf.put_u8(FRAME_STOP);

        if buf.len() > MAX_FRAME_LEN {
            return Err(Error::FrameTooLong {
                actual: buf.len(),
                max: MAX_FRAME_LEN,
            });
        }

        Ok(buf)
    }

    /// Decode wire bytes into a frame
    ///
    /// The slice must run from the start flag to the stop flag
    /// inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the slice is shorter than the 3-byte minimum frame
    /// - the first byte is not a start flag, or the last not the stop flag
    /// - an escape pair is truncated or carries an invalid code
    /// - the received checksum does not match the contents
    pub fn decode(data: &[u8]) -> Result<Self> {
        // Minimum wire frame: start + checksum + stop.
        if data.len() < 3 {
            return Err(Error::FrameTooShort {
                expected: 3,
                actual: data.len(),
            });
        }

        let extended = match data[0] {
            EXT_FRAME_START => true,
            STD_FRAME_START => false,
            other => return Err(Error::BadStartFlag(other)),
        };

        let last = data[data.len() - 1];
        if last != FRAME_STOP {
            return Err(Error::BadStopFlag(last));
        }

        let unstuffed = unstuff(&data[1..data.len() - 1])?;

        // Standard: checksum only. Extended: dst + src + checksum.
        let min = if extended { 3 } else { 1 };
        if unstuffed.len() < min {
            return Err(Error::FrameTooShort {
                expected: min,
                actual: unstuffed.len(),
            });
        }

        let (destination, source, offset) = if extended {
            (unstuffed[0], unstuffed[1], 2)
        } else {
            (0, 0, 0)
        };

        let received = unstuffed[unstuffed.len() - 1];
        let contents = &unstuffed[offset..unstuffed.len() - 1];

        let expected = checksum(contents);
        if expected != received {
            return Err(Error::BadChecksum { expected, received });
        }

        trace!(
            extended = extended,
            contents_len = contents.len(),
            checksum = format!("0x{:02X}", received),
            "Decoded frame"
        );

        Ok(Self {
            extended,
            destination,
            source,
            contents: Bytes::copy_from_slice(contents),
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Frame");
        s.field("extended", &self.extended);
        if self.extended {
            s.field("destination", &format_args!("0x{:02X}", self.destination))
                .field("source", &format_args!("0x{:02X}", self.source));
        }
        s.field("contents_len", &self.contents.len())
            .field("checksum", &format_args!("0x{:02X}", self.checksum()))
            .finish()
    }
}

/// Write one byte, escaping the reserved flag values
fn stuff(buf: &mut BytesMut, b: u8) {
    match b {
        EXT_FRAME_START => buf.put_slice(&[BYTE_STUFF, 0x00]),
        STD_FRAME_START => buf.put_slice(&[BYTE_STUFF, 0x01]),
        FRAME_STOP => buf.put_slice(&[BYTE_STUFF, 0x02]),
        BYTE_STUFF => buf.put_slice(&[BYTE_STUFF, 0x03]),
        _ => buf.put_u8(b),
    }
}

/// Undo byte stuffing on the frame interior
fn unstuff(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut iter = data.iter();

    while let Some(&b) = iter.next() {
        if b != BYTE_STUFF {
            out.push(b);
            continue;
        }
        match iter.next() {
            Some(0x00) => out.push(EXT_FRAME_START),
            Some(0x01) => out.push(STD_FRAME_START),
            Some(0x02) => out.push(FRAME_STOP),
            Some(0x03) => out.push(BYTE_STUFF),
            _ => return Err(Error::BadStuffing),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_short_get_status() {
        // Checksum 0x80 is not a reserved byte and is emitted raw.
        let frame = Frame::standard(vec![0x80]);
        let encoded = frame.encode().unwrap();
        assert_eq!(&encoded[..], &[0xF1, 0x80, 0x80, 0xF2]);
    }

    #[test]
    fn test_encode_contents_with_start_flag() {
        // Both the 0xF1 content byte and the 0xF1 checksum get stuffed.
        let frame = Frame::standard(vec![0xF1, 0x00]);
        let encoded = frame.encode().unwrap();
        assert_eq!(&encoded[..], &[0xF1, 0xF3, 0x01, 0x00, 0xF3, 0x01, 0xF2]);
    }

    #[test]
    fn test_encode_minimum_frame() {
        let frame = Frame::standard(Bytes::new());
        let encoded = frame.encode().unwrap();
        assert_eq!(&encoded[..], &[0xF1, 0x00, 0xF2]);
    }

    #[test]
    fn test_encode_all_reserved_bytes() {
        let frame = Frame::standard(vec![0xF0, 0xF1, 0xF2, 0xF3]);
        let encoded = frame.encode().unwrap();
        assert_eq!(
            &encoded[..],
            &[
                0xF1, // start
                0xF3, 0x00, 0xF3, 0x01, 0xF3, 0x02, 0xF3, 0x03, // contents
                0x00, // checksum: the four flags XOR to zero
                0xF2, // stop
            ]
        );
    }

    #[test]
    fn test_no_raw_flags_between_sentinels() {
        let contents: Vec<u8> = (0u8..=255).collect();
        let encoded = Frame::standard(contents).encode();
        // 256 contents bytes overflow the frame; use a window instead.
        assert!(encoded.is_err());

        let contents: Vec<u8> = (0xE8u8..=0xFF).collect();
        let encoded = Frame::standard(contents).encode().unwrap();
        let interior = &encoded[1..encoded.len() - 1];
        let mut i = 0;
        while i < interior.len() {
            if interior[i] == BYTE_STUFF {
                assert!(interior[i + 1] <= 0x03);
                i += 2;
            } else {
                assert!(!matches!(interior[i], 0xF0..=0xF3));
                i += 1;
            }
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let frame = Frame::standard(vec![0x7F, 0x02, 0xB3, 0xC1]);
        let decoded = Frame::decode(&frame.encode().unwrap()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_round_trip_extended() {
        let frame = Frame::extended(0xFD, 0x00, vec![0x80, 0xF2]);
        let decoded = Frame::decode(&frame.encode().unwrap()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_round_trip_stuffed_address() {
        // Addresses pass through stuffing but stay out of the checksum.
        let frame = Frame::extended(0xF0, 0xF3, vec![0x91]);
        let encoded = frame.encode().unwrap();
        assert_eq!(
            &encoded[..],
            &[0xF0, 0xF3, 0x00, 0xF3, 0x03, 0x91, 0x91, 0xF2]
        );
        assert_eq!(Frame::decode(&encoded).unwrap(), frame);
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let result = Frame::decode(&[0xF1, 0x80, 0x00, 0xF2]);
        assert!(matches!(
            result,
            Err(Error::BadChecksum {
                expected: 0x80,
                received: 0x00
            })
        ));
    }

    #[test]
    fn test_decode_bad_start_flag() {
        let result = Frame::decode(&[0x00, 0x80, 0x80, 0xF2]);
        assert!(matches!(result, Err(Error::BadStartFlag(0x00))));
    }

    #[test]
    fn test_decode_bad_stop_flag() {
        let result = Frame::decode(&[0xF1, 0x80, 0x80, 0x00]);
        assert!(matches!(result, Err(Error::BadStopFlag(0x00))));
    }

    #[test]
    fn test_decode_truncated_escape() {
        // Lone escape byte right before the stop flag.
        let result = Frame::decode(&[0xF1, 0x80, 0xF3, 0xF2]);
        assert!(matches!(result, Err(Error::BadStuffing)));
    }

    #[test]
    fn test_decode_invalid_escape_code() {
        let result = Frame::decode(&[0xF1, 0xF3, 0x04, 0x00, 0xF2]);
        assert!(matches!(result, Err(Error::BadStuffing)));
    }

    #[test]
    fn test_decode_too_short() {
        assert!(matches!(
            Frame::decode(&[0xF1, 0xF2]),
            Err(Error::FrameTooShort { .. })
        ));
        // Extended frames need dst + src + checksum inside.
        assert!(matches!(
            Frame::decode(&[0xF0, 0x00, 0xF2]),
            Err(Error::FrameTooShort { .. })
        ));
    }

    #[test]
    fn test_encode_too_long() {
        // 119 plain bytes stuff to 119 and overflow with flags + checksum.
        let frame = Frame::standard(vec![0x01; 119]);
        assert!(matches!(
            frame.encode(),
            Err(Error::FrameTooLong { max: 120, .. })
        ));
    }

    #[test]
    fn test_checksum_law() {
        let contents = [0x30, 0x20, 0x01, 0x18];
        let frame = Frame::standard(contents.to_vec());
        let decoded = Frame::decode(&frame.encode().unwrap()).unwrap();
        assert_eq!(decoded.checksum(), checksum(&contents));
    }
}
