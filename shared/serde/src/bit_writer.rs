pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);
    fn count_bits(&mut self, bits: u32);
    fn is_counter(&self) -> bool;

    /// Writes the lowest `bits` bits of `value`, least significant first
    fn write_bits(&mut self, value: u64, bits: u8) {
        let mut temp = value;
        for _ in 0..bits {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }
}

/// Growable bit writer. Bits are packed least significant first into each
/// byte, the final partial byte is zero padded by `to_bytes`.
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::with_capacity(64),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            let byte = (self.scratch << (8 - self.scratch_index)).reverse_bits();
            self.buffer.push(byte);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }

    pub fn counter(&self) -> BitCounter {
        BitCounter::new()
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_bits(u64::from(byte), 8);
    }

    fn count_bits(&mut self, _bits: u32) {
        // nothing to reserve, the buffer grows as needed
    }

    fn is_counter(&self) -> bool {
        false
    }
}

/// Counts bits without storing them
pub struct BitCounter {
    bits_needed: u32,
}

impl BitCounter {
    pub fn new() -> Self {
        Self { bits_needed: 0 }
    }

    pub fn bits_needed(&self) -> u32 {
        self.bits_needed
    }
}

impl Default for BitCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for BitCounter {
    fn write_bit(&mut self, _bit: bool) {
        self.bits_needed += 1;
    }

    fn write_byte(&mut self, _byte: u8) {
        self.bits_needed += 8;
    }

    fn count_bits(&mut self, bits: u32) {
        self.bits_needed += bits;
    }

    fn is_counter(&self) -> bool {
        true
    }
}
