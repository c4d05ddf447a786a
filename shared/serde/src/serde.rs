use crate::{bit_reader::BitReader, bit_writer::BitCounter, bit_writer::BitWrite, error::SerdeErr};

/// A value that can be written to and read from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into an outgoing bit stream
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Reads a value from an incoming bit stream
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Number of bits `ser` would write for this value
    fn bit_length(&self) -> u32 {
        let mut counter = BitCounter::new();
        self.ser(&mut counter);
        counter.bits_needed()
    }
}

/// Implemented by types whose encoding always has the same length
pub trait ConstBitLength {
    fn const_bit_length() -> u32;
}
