use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength};

pub trait SerdeIntegerConversion<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    fn from(value: &SerdeInteger<SIGNED, VARIABLE, BITS>) -> Self;
}

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// Integer with a chosen wire width.
///
/// Fixed integers occupy exactly `BITS` bits (plus a sign bit when signed).
/// Variable integers are written in chunks of `BITS` bits, each chunk
/// preceded by a bit saying whether another chunk follows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    value: i128,
}

// Decoding a variable integer stops once this many magnitude bits were read,
// so a peer can't keep us looping on continuation bits.
const MAX_MAGNITUDE_BITS: u32 = 127;

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if the value can't be represented with this encoding
    pub fn new<T: Into<i128>>(value: T) -> Self {
        let value = value.into();
        if let Err(reason) = Self::check(value) {
            panic!("{}", reason);
        }
        Self { value }
    }

    pub fn try_new<T: Into<i128>>(value: T) -> Option<Self> {
        let value = value.into();
        Self::check(value).ok().map(|_| Self { value })
    }

    fn check(value: i128) -> Result<(), String> {
        if BITS == 0 {
            return Err("can't create an integer with 0 bits...".to_string());
        }
        if BITS > 127 {
            return Err("can't create an integer with more than 127 bits...".to_string());
        }
        if !SIGNED && value < 0 {
            return Err("can't encode a negative number with an Unsigned Integer!".to_string());
        }
        if !VARIABLE {
            if value.unsigned_abs() >= (1u128 << BITS) {
                return Err(format!(
                    "with {} bits, can't encode number with magnitude {}",
                    BITS, value
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self) -> i128 {
        self.value
    }

    pub fn set<T: Into<i128>>(&mut self, value: T) {
        *self = Self::new(value);
    }

    /// # Panics
    ///
    /// Panics if the value does not fit in `T`, prefer `try_to` for values
    /// that came off the wire
    pub fn to<T: SerdeIntegerConversion<SIGNED, VARIABLE, BITS>>(&self) -> T {
        T::from(self)
    }

    pub fn try_to<T: TryFrom<i128>>(&self) -> Option<T> {
        T::try_from(self.value).ok()
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<SIGNED, VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        if SIGNED {
            writer.write_bit(self.value < 0);
        }

        let mut magnitude: u128 = self.value.unsigned_abs();

        if VARIABLE {
            loop {
                let proceed = magnitude >= 2_u128.pow(BITS as u32);
                writer.write_bit(proceed);
                for _ in 0..BITS {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..BITS {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let negative = if SIGNED { reader.read_bit()? } else { false };

        let mut magnitude: u128 = 0;
        let mut total_bits: u32 = 0;

        loop {
            let proceed = if VARIABLE { reader.read_bit()? } else { false };

            for _ in 0..BITS {
                if total_bits >= MAX_MAGNITUDE_BITS {
                    return Err(SerdeErr);
                }
                if reader.read_bit()? {
                    magnitude |= 1u128 << total_bits;
                }
                total_bits += 1;
            }

            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
        })
    }

    fn bit_length(&self) -> u32 {
        let mut output: u32 = 0;

        if SIGNED {
            output += 1;
        }

        if VARIABLE {
            let mut magnitude = self.value.unsigned_abs();
            loop {
                let proceed = magnitude >= 2_u128.pow(BITS as u32);
                output += 1 + BITS as u32;
                magnitude >>= BITS;
                if !proceed {
                    break;
                }
            }
        } else {
            output += BITS as u32;
        }

        output
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        let sign_bit = if SIGNED { 1 } else { 0 };
        sign_bit + BITS as u32
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: Into<i128>> From<T> for SerdeInteger<SIGNED, VARIABLE, BITS> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: TryFrom<i128>> SerdeIntegerConversion<SIGNED, VARIABLE, BITS> for T {
    fn from(value: &SerdeInteger<SIGNED, VARIABLE, BITS>) -> Self {
        let Ok(t_value) = T::try_from(value.value) else {
            panic!("SerdeInteger's value is out of range to convert to this type.");
        };
        t_value
    }
}
