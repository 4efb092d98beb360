// Variable-length quantities.
//
// SMF delta times are stored as big-endian base-128 integers: 7 data bits
// per byte, the high bit set on every byte except the last. Zero is the
// single byte 0x00. The format caps a quantity at four bytes, so the largest
// encodable value is 0x0FFF_FFFF; anything above is `DeltaTooLarge`.
//
// `read_vlq` is the inverse, for callers reading delta times back.

use crate::error::{Result, SmfError};
use std::io::{self, Read, Write};

/// Largest value a 4-byte variable-length quantity can hold.
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Number of bytes `value` occupies once encoded.
pub fn vlq_len(value: u32) -> Result<usize> {
    match value {
        0..=0x7F => Ok(1),
        0x80..=0x3FFF => Ok(2),
        0x4000..=0x1F_FFFF => Ok(3),
        0x20_0000..=MAX_VLQ => Ok(4),
        _ => Err(SmfError::DeltaTooLarge(value)),
    }
}

/// Encode `value` into a fixed buffer, returning the buffer and the number of
/// bytes used.
pub fn encode_vlq(value: u32) -> Result<([u8; 4], usize)> {
    let len = vlq_len(value)?;
    let mut buf = [0u8; 4];
    for (i, slot) in buf.iter_mut().take(len).enumerate() {
        let shift = 7 * (len - 1 - i);
        let mut byte = ((value >> shift) & 0x7F) as u8;
        if i + 1 < len {
            byte |= 0x80;
        }
        *slot = byte;
    }
    Ok((buf, len))
}

/// Write `value` as a variable-length quantity. Returns the byte count.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> Result<usize> {
    let (buf, len) = encode_vlq(value)?;
    writer.write_all(&buf[..len])?;
    Ok(len)
}

/// Read one variable-length quantity.
///
/// Returns `InvalidData` if the fourth byte still has its continuation bit
/// set, and `UnexpectedEof` if the reader runs dry mid-quantity.
pub fn read_vlq<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        value = (value << 7) | u32::from(byte[0] & 0x7F);
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "variable-length quantity longer than 4 bytes",
    ))
}
