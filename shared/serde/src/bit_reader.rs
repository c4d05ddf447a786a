use crate::error::SerdeErr;

/// Cursor over an incoming byte buffer. Every read is checked, running off
/// the end of the buffer yields `SerdeErr`.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_index: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            bit_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let Some(byte) = self.buffer.get(self.bit_index / 8) else {
            return Err(SerdeErr);
        };
        let bit = (byte >> (self.bit_index % 8)) & 1 != 0;
        self.bit_index += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output: u8 = 0;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    /// Reads `bits` bits, least significant first
    pub fn read_bits(&mut self, bits: u8) -> Result<u64, SerdeErr> {
        if bits > 64 {
            return Err(SerdeErr);
        }
        let mut output: u64 = 0;
        for index in 0..bits {
            if self.read_bit()? {
                output |= 1u64 << index;
            }
        }
        Ok(output)
    }

    pub fn bits_read(&self) -> usize {
        self.bit_index
    }

    /// Bits left in the buffer, including any zero padding of the last byte
    pub fn bits_remaining(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.bit_index)
    }
}
