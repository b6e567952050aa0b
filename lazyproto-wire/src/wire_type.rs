use crate::DecodeError;

/// The wire type portion of a field tag.
///
/// The numeric value matches the on-wire encoding. `lazyproto` schemas only
/// ever emit [`WireType::Varint`], [`WireType::SixtyFourBit`] and
/// [`WireType::LengthDelimited`]; the other two variants exist so that
/// [`decode_tag`](crate::decode_tag) can recognize (and a decode loop can
/// skip over) fields it has no business interpreting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    SixtyFourBit = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    ThirtyTwoBit = 5,
}

impl TryFrom<u64> for WireType {
    type Error = DecodeError;

    #[inline]
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::SixtyFourBit),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::ThirtyTwoBit),
            _ => Err(DecodeError::new(format!("invalid wire type value: {value}"))),
        }
    }
}
