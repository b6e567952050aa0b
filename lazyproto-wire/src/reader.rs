use bytes::Bytes;

use crate::tag::decode_tag;
use crate::{DecodeError, Value};

/// Iterates `(field_number, Value)` pairs over a message's original bytes.
///
/// This is the main decode pass: generated `decode` methods dispatch on
/// `field_number` and stash `Value` into the right struct slot. Unrecognized
/// field numbers are simply not matched by the generated `match`, which has
/// the same effect as skipping them - the value was already consumed off
/// the buffer by `next()`.
pub struct FieldIter {
    buf: Bytes,
}

impl FieldIter {
    pub fn new(buf: Bytes) -> Self {
        FieldIter { buf }
    }
}

impl Iterator for FieldIter {
    type Item = Result<(u32, Value), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }
        Some((|| {
            let (field_number, wire_type) = decode_tag(&mut self.buf)?;
            let value = Value::decode(wire_type, &mut self.buf)?;
            Ok((field_number, value))
        })())
    }
}

/// Iterates only the field numbers present on the wire, without retaining
/// the decoded values.
///
/// Used for the repeated-field pre-pass: the planner needs an exact count of
/// how many times each repeated field's tag occurs before it can ask the
/// field's pool for a slice of the right length.
pub struct TagIter {
    inner: FieldIter,
}

impl TagIter {
    pub fn new(buf: Bytes) -> Self {
        TagIter {
            inner: FieldIter::new(buf),
        }
    }
}

impl Iterator for TagIter {
    type Item = Result<u32, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map(|(number, _)| number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_key_value_message() {
        // key="foo" (tag 1), value="bar" (tag 2)
        let bytes = Bytes::from_static(&[
            0x0A, 0x03, b'f', b'o', b'o', 0x12, 0x03, b'b', b'a', b'r',
        ]);
        let fields: Vec<_> = FieldIter::new(bytes.clone())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, 1);
        assert_eq!(fields[1].0, 2);

        let tags: Vec<u32> = TagIter::new(bytes).collect::<Result<_, _>>().unwrap();
        assert_eq!(tags, vec![1, 2]);
    }
}
