use std::fmt;

use replistream_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

/// Small integer standing in for a cached key on the wire. Always 16 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacherId(u16);

impl CacherId {
    /// Never assigned to a key, so an unmapped id can be told apart from a
    /// real mapping
    pub const UNMAPPED: CacherId = CacherId(0);

    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn is_unmapped(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for CacherId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for CacherId {
    fn const_bit_length() -> u32 {
        <u16 as ConstBitLength>::const_bit_length()
    }
}
