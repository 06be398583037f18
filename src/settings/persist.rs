//! Checksummed EEPROM block storage
//!
//! Every persisted block is followed by a one-byte rotating checksum. A
//! block that fails the check on read is treated as absent so callers can
//! fall back to defaults.

use crate::platform::error::Result;
use crate::platform::traits::EepromInterface;

/// Rotating checksum over a byte slice
///
/// Rotate left by one, then add the next byte, starting from zero.
pub fn checksum(data: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for &byte in data {
        sum = sum.rotate_left(1).wrapping_add(byte);
    }
    sum
}

/// Write `data` at `addr`, followed by its checksum byte
pub fn write_with_checksum<E: EepromInterface>(
    eeprom: &mut E,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    eeprom.write(addr, data)?;
    eeprom.write(addr + data.len() as u32, &[checksum(data)])
}

/// Read `buf.len()` bytes at `addr` and verify the trailing checksum
///
/// Returns `Ok(false)` when the checksum does not match; `buf` then holds
/// whatever was read.
pub fn read_with_checksum<E: EepromInterface>(
    eeprom: &mut E,
    addr: u32,
    buf: &mut [u8],
) -> Result<bool> {
    eeprom.read(addr, buf)?;
    let mut stored = [0u8; 1];
    eeprom.read(addr + buf.len() as u32, &mut stored)?;
    Ok(stored[0] == checksum(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockEeprom;

    #[test]
    fn test_checksum_rotates() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[1]), 1);
        // 0 -> 1 -> rotl(1)=2, +2=4 -> rotl(4)=8, +3=11
        assert_eq!(checksum(&[1, 2, 3]), 11);
    }

    #[test]
    fn test_round_trip_verifies() {
        let mut eeprom = MockEeprom::new();
        write_with_checksum(&mut eeprom, 16, b"hello").unwrap();

        let mut buf = [0u8; 5];
        assert_eq!(read_with_checksum(&mut eeprom, 16, &mut buf), Ok(true));
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn test_corruption_detected() {
        let mut eeprom = MockEeprom::new();
        write_with_checksum(&mut eeprom, 16, b"hello").unwrap();
        eeprom.inject_corruption(18, 1);

        let mut buf = [0u8; 5];
        assert_eq!(read_with_checksum(&mut eeprom, 16, &mut buf), Ok(false));
    }

    #[test]
    fn test_blank_block_fails_check() {
        let mut eeprom = MockEeprom::new();
        let mut buf = [0u8; 8];
        // All-zero data checksums to zero, so a fully blank block passes;
        // seed one nonzero byte to model a half-written block.
        eeprom.write(40, &[0xFF]).unwrap();
        assert_eq!(read_with_checksum(&mut eeprom, 40, &mut buf), Ok(false));
    }
}
