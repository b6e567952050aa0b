use crate::tag::encode_tag;
use crate::varint::{encode_varint, encoded_len_varint};
use crate::WireType;

/// A pre-encoded field tag.
///
/// Computing the tag bytes (field number + wire type, LEB128-encoded) is pure
/// arithmetic, so generated modules compute it once, at module load, and
/// reuse the bytes on every `Marshal` call instead of re-deriving them per
/// field per message.
#[derive(Clone, Debug)]
pub struct PreparedTag {
    bytes: Vec<u8>,
    wire_type: WireType,
}

impl PreparedTag {
    pub fn new(field_number: u32, wire_type: WireType) -> Self {
        let mut bytes = Vec::with_capacity(5);
        encode_tag(field_number, wire_type, &mut bytes);
        PreparedTag { bytes, wire_type }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }
}

/// Marks a length-delimited region opened by [`Writer::begin_embedded`].
///
/// Opaque on purpose: the only legal thing to do with a `Token` is hand it
/// back to [`Writer::end_embedded_prepared`].
#[derive(Debug)]
pub struct Token(usize);

/// An append-only byte sink used by generated `Marshal` methods.
///
/// Embedding a nested message requires knowing its encoded length before its
/// tag+length prefix can be finalized, but the message's own `Marshal` writes
/// its content directly into the same buffer (no separate scratch buffer per
/// level of nesting). `Writer` resolves this with a reserve-then-patch
/// scheme: [`begin_embedded`](Self::begin_embedded) reserves a fixed-width
/// placeholder for the length varint, the child writes into the buffer as
/// normal, and [`end_embedded_prepared`](Self::end_embedded_prepared) patches
/// the placeholder with the real length, shifting the child's bytes left if
/// the length turned out to need fewer bytes than were reserved.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Bytes reserved for an embedded message's length varint. Five bytes
    /// cover lengths up to 2^35 - 1, comfortably larger than any
    /// telemetry-sized nested message.
    const PLACEHOLDER_LEN: usize = 5;

    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Appends `bytes` verbatim, with no tag or length prefix. Used for the
    /// unmodified marshal branch, which re-emits a message's original bytes
    /// byte-for-byte.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_uint32_prepared(&mut self, tag: &PreparedTag, value: u32) {
        debug_assert_eq!(tag.wire_type(), WireType::Varint);
        self.buf.extend_from_slice(tag.bytes());
        encode_varint(u64::from(value), &mut self.buf);
    }

    pub fn write_fixed64_prepared(&mut self, tag: &PreparedTag, value: u64) {
        debug_assert_eq!(tag.wire_type(), WireType::SixtyFourBit);
        self.buf.extend_from_slice(tag.bytes());
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_string_prepared(&mut self, tag: &PreparedTag, value: &str) {
        debug_assert_eq!(tag.wire_type(), WireType::LengthDelimited);
        self.buf.extend_from_slice(tag.bytes());
        encode_varint(value.len() as u64, &mut self.buf);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Writes `tag`, reserves space for the forthcoming length, and returns a
    /// [`Token`] identifying the reservation.
    pub fn begin_embedded(&mut self, tag: &PreparedTag) -> Token {
        debug_assert_eq!(tag.wire_type(), WireType::LengthDelimited);
        self.buf.extend_from_slice(tag.bytes());
        let placeholder_start = self.buf.len();
        self.buf.extend(std::iter::repeat(0u8).take(Self::PLACEHOLDER_LEN));
        Token(placeholder_start)
    }

    /// Closes the region opened by `token`, patching in the real length of
    /// everything written since.
    pub fn end_embedded_prepared(&mut self, token: Token, tag: &PreparedTag) {
        debug_assert_eq!(tag.wire_type(), WireType::LengthDelimited);
        let placeholder_start = token.0;
        let body_start = placeholder_start + Self::PLACEHOLDER_LEN;
        let body_len = self.buf.len() - body_start;
        let len_size = encoded_len_varint(body_len as u64);
        debug_assert!(len_size <= Self::PLACEHOLDER_LEN);

        let gap = Self::PLACEHOLDER_LEN - len_size;
        if gap > 0 {
            self.buf
                .copy_within(body_start..body_start + body_len, placeholder_start + len_size);
            self.buf.truncate(self.buf.len() - gap);
        }

        let mut len_bytes = Vec::with_capacity(len_size);
        encode_varint(body_len as u64, &mut len_bytes);
        self.buf[placeholder_start..placeholder_start + len_size].copy_from_slice(&len_bytes);
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_nested_payload_with_patched_length() {
        let field_tag = PreparedTag::new(1, WireType::Varint);
        let embed_tag = PreparedTag::new(2, WireType::LengthDelimited);

        let mut w = Writer::new();
        let token = w.begin_embedded(&embed_tag);
        w.write_uint32_prepared(&field_tag, 7);
        w.end_embedded_prepared(token, &embed_tag);

        let out = w.into_inner();
        // tag(2, LEN) = 0x12, length = 2 (tag(1,varint)=0x08 + value 7), then the body.
        assert_eq!(out, vec![0x12, 0x02, 0x08, 0x07]);
    }

    #[test]
    fn large_embedded_body_shrinks_placeholder() {
        let embed_tag = PreparedTag::new(1, WireType::LengthDelimited);
        let mut w = Writer::new();
        let token = w.begin_embedded(&embed_tag);
        w.raw(&[0xAB; 10]);
        w.end_embedded_prepared(token, &embed_tag);
        let out = w.into_inner();
        assert_eq!(out[0], 0x0A); // tag
        assert_eq!(out[1], 10); // length, single byte varint
        assert_eq!(&out[2..], &[0xAB; 10]);
    }
}
