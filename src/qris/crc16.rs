//! CRC-16/CCITT-FALSE, the checksum convention of the QRIS trailer field.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Compute the CRC-16/CCITT-FALSE checksum of `input`, formatted as four
/// uppercase hex digits (zero-padded).
///
/// No input/output reflection and no final XOR. Payment terminals reject a
/// payload whose trailer does not match this exact parameterization, so the
/// constants here are not tunable.
pub fn checksum(input: &str) -> String {
    let mut crc = INIT;
    for byte in input.bytes() {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    format!("{:04X}", crc)
}
