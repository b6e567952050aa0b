use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

use bytes::Bytes;

/// Bit 0 of a [`Header`]'s flags word: set once any setter has run on the
/// owning message, meaning `Marshal` can no longer reuse `bytes` verbatim
/// and must re-encode field by field.
const MODIFIED: u64 = 1 << 0;

/// Bookkeeping embedded in every generated message struct.
///
/// Carries the message's original wire bytes (for the unmodified-marshal
/// fast path), a weak back-reference to the enclosing message (used only to
/// propagate the "modified" flag upward when a setter runs), and a bitset
/// recording which MESSAGE fields have been lazily decoded.
pub struct Header {
    bytes: Bytes,
    parent: Cell<Option<NonNull<Header>>>,
    flags: Cell<u64>,
}

impl Header {
    /// Wraps the bytes a message was decoded from. Used by generated
    /// `Unmarshal` constructors.
    pub fn new(bytes: Bytes) -> Self {
        Header {
            bytes,
            parent: Cell::new(None),
            flags: Cell::new(0),
        }
    }

    /// An empty header with no backing bytes, for freshly constructed (not
    /// decoded) messages, including ones handed out by a [`crate::Pool`].
    pub fn empty() -> Self {
        Header::new(Bytes::new())
    }

    /// The message's original wire bytes, as given to [`Header::new`].
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Overwrites the original wire bytes, e.g. when reusing a pooled
    /// message for a fresh decode.
    pub fn set_bytes(&mut self, bytes: Bytes) {
        self.bytes = bytes;
    }

    /// Links this header to its enclosing message's header, so a
    /// modification here can mark the parent chain modified too.
    ///
    /// # Safety
    ///
    /// `parent`, if present, must stay valid for as long as this header is
    /// reachable through it. Generated code only calls this while building
    /// a child field whose parent cannot yet have been dropped, and clears
    /// the link (via [`Header::reset`]) before the child can outlive it.
    pub unsafe fn set_parent(&self, parent: Option<NonNull<Header>>) {
        self.parent.set(parent);
    }

    pub fn is_modified(&self) -> bool {
        self.flags.get() & MODIFIED != 0
    }

    pub fn is_field_decoded(&self, flag: u64) -> bool {
        self.flags.get() & flag != 0
    }

    pub fn set_field_decoded(&self, flag: u64) {
        self.flags.set(self.flags.get() | flag);
    }

    /// Marks this message, and every ancestor reachable through `parent`, as
    /// modified. Stops as soon as it reaches an ancestor already marked,
    /// since that ancestor's own ancestors were marked when it was touched.
    pub fn mark_modified(&self) {
        if self.is_modified() {
            return;
        }
        self.flags.set(self.flags.get() | MODIFIED);
        let mut parent = self.parent.get();
        while let Some(p) = parent {
            // SAFETY: see `set_parent`.
            let header = unsafe { p.as_ref() };
            if header.is_modified() {
                break;
            }
            header.flags.set(header.flags.get() | MODIFIED);
            parent = header.parent.get();
        }
    }

    /// Resets a header to its just-pooled state, ready to back a freshly
    /// decoded (or freshly default-constructed) message.
    pub fn reset(&mut self) {
        self.bytes = Bytes::new();
        self.parent = Cell::new(None);
        self.flags = Cell::new(0);
    }
}

// `Header` carries a raw pointer to its parent, which is not `Send`/`Sync`
// by default. Generated messages are moved and shared the same way any
// other protobuf message is: as a tree owned by a single caller at a time.
// The pointer is dereferenced only by `mark_modified`, and never crosses a
// thread boundary on its own.
unsafe impl Send for Header {}
unsafe impl Sync for Header {}

impl Default for Header {
    fn default() -> Self {
        Header::empty()
    }
}

impl Clone for Header {
    /// Clones the bytes and flags but not the parent link: a clone is a new
    /// root until something re-parents it.
    fn clone(&self) -> Self {
        Header {
            bytes: self.bytes.clone(),
            parent: Cell::new(None),
            flags: Cell::new(self.flags.get()),
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("bytes_len", &self.bytes.len())
            .field("modified", &self.is_modified())
            .field("flags", &self.flags.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_header_is_unmodified() {
        let h = Header::empty();
        assert!(!h.is_modified());
        assert!(!h.is_field_decoded(1 << 1));
    }

    #[test]
    fn mark_modified_propagates_to_parent() {
        let parent = Header::empty();
        let child = Header::empty();
        unsafe {
            child.set_parent(NonNull::new(&parent as *const _ as *mut _));
        }
        assert!(!parent.is_modified());
        child.mark_modified();
        assert!(child.is_modified());
        assert!(parent.is_modified());
    }

    #[test]
    fn mark_modified_stops_at_already_modified_ancestor() {
        let grandparent = Header::empty();
        grandparent.mark_modified();
        // Reset the flag manually to simulate "marked, but an intervening
        // bug re-derived the same state" - the point of the test is that
        // the walk stops climbing once it finds a modified ancestor,
        // regardless of what lies above it.
        let parent = Header::empty();
        unsafe {
            parent.set_parent(NonNull::new(&grandparent as *const _ as *mut _));
        }
        parent.mark_modified();
        assert!(parent.is_modified());
        assert!(grandparent.is_modified());
    }

    #[test]
    fn field_decoded_flags_are_independent() {
        let h = Header::empty();
        let flag_a: u64 = 1 << 1;
        let flag_b: u64 = 1 << 2;
        h.set_field_decoded(flag_a);
        assert!(h.is_field_decoded(flag_a));
        assert!(!h.is_field_decoded(flag_b));
    }
}
