use std::{fmt, num::NonZeroU32};

use replistream_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

type WireId = UnsignedVariableInteger<7>;

// Both ids share the same rules: never zero in memory, written as a variable
// width unsigned integer, and a zero coming off the wire is reported to the
// caller instead of being turned into a value.
macro_rules! non_zero_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Returns `None` for zero, which is reserved for "none"
            pub fn new(value: u32) -> Option<Self> {
                NonZeroU32::new(value).map(Self)
            }

            pub fn get(&self) -> u32 {
                self.0.get()
            }

            pub fn ser(&self, writer: &mut dyn BitWrite) {
                WireId::new(self.get()).ser(writer);
            }

            /// `Ok(None)` means the peer wrote the reserved zero id
            pub fn de(reader: &mut BitReader) -> Result<Option<Self>, SerdeErr> {
                let raw: u32 = WireId::de(reader)?.try_to().ok_or(SerdeErr)?;
                Ok(Self::new(raw))
            }

            pub fn bit_length(&self) -> u32 {
                WireId::new(self.get()).bit_length()
            }
        }

        impl From<NonZeroU32> for $name {
            fn from(value: NonZeroU32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

non_zero_id!(
    /// Identifies an already created replica across messages, assigned by
    /// the authoritative owner
    ReplicaId
);

non_zero_id!(
    /// Key used to find a pre-existing local object within an EmplaceContext
    EmplaceId
);
