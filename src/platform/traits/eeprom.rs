//! EEPROM interface trait
//!
//! Byte-addressed non-volatile storage. The checksummed block layer in
//! `settings::persist` sits on top of this trait; implementations only move
//! raw bytes. Writes are synchronous: when `write` returns the data is
//! committed to the device.

use crate::platform::Result;

/// EEPROM peripheral interface
///
/// # Example
///
/// ```
/// use stm_mill::platform::mock::MockEeprom;
/// use stm_mill::platform::traits::EepromInterface;
///
/// let mut eeprom = MockEeprom::new();
/// eeprom.write(16, &[0xAB, 0xCD]).unwrap();
///
/// let mut buf = [0u8; 2];
/// eeprom.read(16, &mut buf).unwrap();
/// assert_eq!(buf, [0xAB, 0xCD]);
/// ```
pub trait EepromInterface {
    /// Read `buf.len()` bytes starting at `addr`
    ///
    /// # Errors
    ///
    /// Returns `EepromError::InvalidAddress` if the range exceeds the
    /// device capacity.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `addr`
    ///
    /// # Errors
    ///
    /// Returns `EepromError::InvalidAddress` if the range exceeds the
    /// device capacity, `EepromError::WriteFailed` on a device fault.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()>;

    /// Total device capacity in bytes
    fn capacity(&self) -> u32;
}
