//! CRC-16-CCITT as computed by the sensor firmware.

/// CRC-16-CCITT polynomial.
pub const POLYNOMIAL: u16 = 0x1021;

/// Register value before the first byte.
pub const INITIAL: u16 = 0xFFFF;

/// CRC-16-CCITT (poly 0x1021, init 0xFFFF, MSB-first, no final XOR).
///
/// Must stay bit-exact with the transmitter. The empty input yields `0xFFFF`.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
