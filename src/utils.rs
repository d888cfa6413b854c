use crate::Error;

pub struct Utils;

impl Utils {
    /// Unsigned bitfield extraction. Reads `len` bits (1..=32) starting
    /// at bit index `start`, MSB first: bit 0 is the MSB of `buf[0]`.
    pub fn get_ubits(buf: &[u8], start: usize, len: usize) -> Result<u32, Error> {
        if len == 0 || len > 32 {
            return Err(Error::NotEnoughBytes);
        }
        if start + len > buf.len() * 8 {
            return Err(Error::NotEnoughBytes);
        }
        let mut value = 0_u32;
        for pos in start..start + len {
            let bit = (buf[pos / 8] >> (7 - pos % 8)) & 1;
            value = (value << 1) | (bit as u32);
        }
        Ok(value)
    }

    /// Signed (two's complement) bitfield extraction, sign extended to i32.
    /// Same addressing convention as [Utils::get_ubits].
    pub fn get_sbits(buf: &[u8], start: usize, len: usize) -> Result<i32, Error> {
        let value = Self::get_ubits(buf, start, len)?;
        if len < 32 && value & (1_u32 << (len - 1)) != 0 {
            Ok((value | (u32::MAX << len)) as i32)
        } else {
            Ok(value as i32)
        }
    }

    /// Unsigned bitfield insertion mirror of [Utils::get_ubits].
    /// `value` is truncated to its `len` least significant bits.
    pub fn set_ubits(buf: &mut [u8], start: usize, len: usize, value: u32) -> Result<(), Error> {
        if len == 0 || len > 32 {
            return Err(Error::NotEnoughBytes);
        }
        if start + len > buf.len() * 8 {
            return Err(Error::NotEnoughBytes);
        }
        for i in 0..len {
            let bit = (value >> (len - 1 - i)) & 1;
            let pos = start + i;
            let mask = 0x80_u8 >> (pos % 8);
            if bit != 0 {
                buf[pos / 8] |= mask;
            } else {
                buf[pos / 8] &= !mask;
            }
        }
        Ok(())
    }

    /// Signed bitfield insertion mirror of [Utils::get_sbits].
    pub fn set_sbits(buf: &mut [u8], start: usize, len: usize, value: i32) -> Result<(), Error> {
        let mask = if len >= 32 {
            u32::MAX
        } else {
            (1_u32 << len) - 1
        };
        Self::set_ubits(buf, start, len, (value as u32) & mask)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ubits() {
        let buf = [0b1010_1100, 0b0101_0011];
        assert_eq!(Utils::get_ubits(&buf, 0, 4).unwrap(), 0b1010);
        assert_eq!(Utils::get_ubits(&buf, 4, 4).unwrap(), 0b1100);
        assert_eq!(Utils::get_ubits(&buf, 6, 4).unwrap(), 0b0001);
        assert_eq!(Utils::get_ubits(&buf, 0, 16).unwrap(), 0xAC53);
        assert!(Utils::get_ubits(&buf, 10, 8).is_err());
        assert!(Utils::get_ubits(&buf, 0, 0).is_err());
    }

    #[test]
    fn sbits() {
        let buf = [0xFF, 0x00];
        assert_eq!(Utils::get_sbits(&buf, 0, 8).unwrap(), -1);
        assert_eq!(Utils::get_sbits(&buf, 4, 8).unwrap(), -16);
        assert_eq!(Utils::get_sbits(&buf, 8, 8).unwrap(), 0);
        let buf = [0x80, 0x00, 0x00, 0x00];
        assert_eq!(Utils::get_sbits(&buf, 0, 32).unwrap(), i32::MIN);
        assert_eq!(Utils::get_sbits(&buf, 0, 2).unwrap(), -2);
    }

    #[test]
    fn set_get_mirror() {
        let mut buf = [0_u8; 8];
        Utils::set_ubits(&mut buf, 3, 11, 0x5A5).unwrap();
        assert_eq!(Utils::get_ubits(&buf, 3, 11).unwrap(), 0x5A5);

        Utils::set_sbits(&mut buf, 20, 14, -1234).unwrap();
        assert_eq!(Utils::get_sbits(&buf, 20, 14).unwrap(), -1234);
        // neighbour field is preserved
        assert_eq!(Utils::get_ubits(&buf, 3, 11).unwrap(), 0x5A5);

        Utils::set_sbits(&mut buf, 34, 24, -8_388_608).unwrap();
        assert_eq!(Utils::get_sbits(&buf, 34, 24).unwrap(), -8_388_608);

        let mut buf = [0xFF_u8; 4];
        Utils::set_ubits(&mut buf, 8, 8, 0).unwrap();
        assert_eq!(buf, [0xFF, 0x00, 0xFF, 0xFF]);
    }
}
