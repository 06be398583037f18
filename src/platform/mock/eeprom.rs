//! Mock EEPROM implementation for testing
//!
//! Provides in-memory EEPROM simulation for unit tests.

use crate::platform::{error::EepromError, traits::EepromInterface, Result};

/// EEPROM capacity (1 KB, same as the controller board part)
const EEPROM_CAPACITY: u32 = 1024;

/// Mock EEPROM implementation
///
/// Simulates byte-addressed EEPROM storage in memory for testing. Supports
/// corruption injection for exercising checksum recovery paths.
///
/// # Example
///
/// ```
/// use stm_mill::platform::mock::MockEeprom;
/// use stm_mill::platform::traits::EepromInterface;
///
/// let mut eeprom = MockEeprom::new();
/// eeprom.write(0, &[0x0A]).unwrap();
///
/// let mut buf = [0u8; 1];
/// eeprom.read(0, &mut buf).unwrap();
/// assert_eq!(buf[0], 0x0A);
///
/// // Flip a byte to simulate corruption
/// eeprom.inject_corruption(0, 1);
/// eeprom.read(0, &mut buf).unwrap();
/// assert_ne!(buf[0], 0x0A);
/// ```
#[derive(Debug)]
pub struct MockEeprom {
    storage: [u8; EEPROM_CAPACITY as usize],
    write_count: u32,
}

impl MockEeprom {
    /// Create a new mock EEPROM, erased to zero
    pub fn new() -> Self {
        Self {
            storage: [0; EEPROM_CAPACITY as usize],
            write_count: 0,
        }
    }

    /// Get EEPROM contents (for test verification)
    pub fn get_contents(&self, addr: u32, buf: &mut [u8]) {
        buf.copy_from_slice(&self.storage[addr as usize..addr as usize + buf.len()]);
    }

    /// Flip bytes at `addr` to simulate corruption
    pub fn inject_corruption(&mut self, addr: u32, len: usize) {
        for i in 0..len {
            self.storage[addr as usize + i] ^= 0xAA;
        }
    }

    /// Number of write calls issued so far
    pub fn write_count(&self) -> u32 {
        self.write_count
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl EepromInterface for MockEeprom {
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        if addr as usize + buf.len() > EEPROM_CAPACITY as usize {
            return Err(EepromError::InvalidAddress.into());
        }
        buf.copy_from_slice(&self.storage[addr as usize..addr as usize + buf.len()]);
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        if addr as usize + data.len() > EEPROM_CAPACITY as usize {
            return Err(EepromError::InvalidAddress.into());
        }
        self.storage[addr as usize..addr as usize + data.len()].copy_from_slice(data);
        self.write_count += 1;
        Ok(())
    }

    fn capacity(&self) -> u32 {
        EEPROM_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_eeprom_read_write() {
        let mut eeprom = MockEeprom::new();
        eeprom.write(100, &[1, 2, 3, 4]).unwrap();

        let mut buf = [0u8; 4];
        eeprom.read(100, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_mock_eeprom_invalid_address() {
        let mut eeprom = MockEeprom::new();
        assert!(eeprom.write(EEPROM_CAPACITY - 1, &[0, 0]).is_err());

        let mut buf = [0u8; 8];
        assert!(eeprom.read(EEPROM_CAPACITY - 4, &mut buf).is_err());
    }

    #[test]
    fn test_mock_eeprom_corruption() {
        let mut eeprom = MockEeprom::new();
        eeprom.write(10, &[0x55]).unwrap();
        eeprom.inject_corruption(10, 1);

        let mut buf = [0u8; 1];
        eeprom.read(10, &mut buf).unwrap();
        assert_eq!(buf[0], 0x55 ^ 0xAA);
    }
}
