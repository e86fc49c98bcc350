//! Read-only views over an encoded binary document.

use crate::binary::{decode_entry, Decoded};
use crate::buffer::ByteInput;
use crate::{Tag, Value};

/// A read-only view over a binary DTO document.
///
/// The view borrows the caller's bytes and stays valid exactly as long as
/// they do. The slice may be larger than the document it holds — the
/// leading length field bounds the payload.
///
/// # Example
///
/// ```
/// use dtokit::{Dto, Encoder};
///
/// let mut buffer = [0u8; 64];
/// Encoder::new(&mut buffer).key("answer").int32(42).end();
///
/// let dto = Dto::new(&buffer);
/// assert_eq!(dto.entry_count(), 1);
/// assert_eq!(dto.find("answer").unwrap().to_int32(), 42);
/// ```
#[derive(Clone, Copy)]
pub struct Dto<'a> {
    data: &'a [u8],
}

impl<'a> Dto<'a> {
    /// Views `data` as a document.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than the 5-byte empty document.
    pub fn new(data: &'a [u8]) -> Self {
        assert!(data.len() >= 5, "a DTO document is at least 5 bytes");
        Self { data }
    }

    /// The document payload length, including the length field itself and
    /// the terminating End byte.
    pub fn length(&self) -> usize {
        let mut input = ByteInput::new(self.data);
        input.read_i32() as usize
    }

    /// The underlying buffer capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The document's bytes: the buffer prefix of [`length`](Self::length)
    /// bytes.
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[..self.length()]
    }

    /// A cursor over the top-level entries.
    pub fn iter(&self) -> DtoIter<'a> {
        DtoIter::new(&self.data[4..])
    }

    /// Finds a top-level entry by key (byte equality, first match).
    pub fn find(&self, key: &str) -> Option<DtoIter<'a>> {
        let mut iter = self.iter();
        while iter.next() {
            if iter.key() == key.as_bytes() {
                return Some(iter);
            }
        }
        None
    }

    /// Finds a descendant entry by a dot-separated path, descending
    /// through nested objects and sequences; sequence segments are decimal
    /// indices ("items.0"). Returns `None` when a segment is missing or
    /// the path traverses a leaf.
    pub fn find_descendant(&self, path: &str) -> Option<DtoIter<'a>> {
        let mut dto = *self;
        let mut segments = path.split('.').filter(|s| !s.is_empty()).peekable();

        while let Some(segment) = segments.next() {
            let found = dto.find(segment)?;
            if segments.peek().is_none() {
                return Some(found);
            }
            if !found.tag().is_composite() {
                return None;
            }
            dto = found.to_dto();
        }

        None
    }

    /// Number of top-level entries.
    pub fn entry_count(&self) -> usize {
        let mut iter = self.iter();
        let mut count = 0;
        while iter.next() {
            count += 1;
        }
        count
    }
}

/// A cursor over the entries of one composite.
///
/// [`next`](Self::next) advances one sibling at a time; nested composite
/// bodies are skipped in O(1) via their length prefix and exposed through
/// [`to_dto`](Self::to_dto). Before the first `next` call and after the
/// last entry the cursor's tag is [`Tag::End`].
///
/// # Panics
///
/// The typed accessors are preconditioned on the current tag and panic on
/// a mismatch; `to_int32` additionally accepts `Double` with a narrowing
/// cast, the only implicit numeric coercion in the read path.
#[derive(Clone, Copy)]
pub struct DtoIter<'a> {
    input: ByteInput<'a>,
    key: &'a [u8],
    tag: Tag,
    value: Value<'a>,
    subtree: &'a [u8],
    done: bool,
}

impl<'a> DtoIter<'a> {
    fn new(entries: &'a [u8]) -> Self {
        Self {
            input: ByteInput::new(entries),
            key: b"",
            tag: Tag::End,
            value: Value::Null,
            subtree: b"",
            done: false,
        }
    }

    /// Advances to the next sibling entry; false once the composite's End
    /// marker is reached.
    pub fn next(&mut self) -> bool {
        if self.done {
            return false;
        }

        let (key, decoded) = decode_entry(&mut self.input);
        match decoded {
            Decoded::End => {
                self.tag = Tag::End;
                self.done = true;
                false
            }
            Decoded::Leaf(value) => {
                self.key = key;
                self.tag = value.tag();
                self.value = value;
                true
            }
            Decoded::Composite { tag, subtree } => {
                self.key = key;
                self.tag = tag;
                self.subtree = subtree;
                // The decode left the cursor past the length field; the
                // subtree length counts from the field itself.
                self.input.skip(subtree.len() - 4);
                true
            }
        }
    }

    /// Tag of the current entry; `End` outside of iteration.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Key bytes of the current entry.
    pub fn key(&self) -> &'a [u8] {
        self.key
    }

    pub fn to_bool(&self) -> bool {
        match self.value {
            Value::Bool(value) if self.tag == Tag::Bool => value,
            _ => panic!("expected a Bool entry, found {:?}", self.tag),
        }
    }

    pub fn to_int32(&self) -> i32 {
        match self.value {
            Value::Int32(value) if self.tag == Tag::Int32 => value,
            Value::Double(value) if self.tag == Tag::Double => value as i32,
            _ => panic!("expected an Int32 entry, found {:?}", self.tag),
        }
    }

    pub fn to_double(&self) -> f64 {
        match self.value {
            Value::Double(value) if self.tag == Tag::Double => value,
            _ => panic!("expected a Double entry, found {:?}", self.tag),
        }
    }

    /// The current string value.
    ///
    /// # Panics
    ///
    /// Panics if the entry is not a String or its bytes are not UTF-8.
    pub fn to_str(&self) -> &'a str {
        match self.value {
            Value::String(bytes) if self.tag == Tag::String => match std::str::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => panic!("string entry is not valid UTF-8"),
            },
            _ => panic!("expected a String entry, found {:?}", self.tag),
        }
    }

    /// Views the current composite entry as a nested document.
    pub fn to_dto(&self) -> Dto<'a> {
        assert!(
            self.tag.is_composite(),
            "expected a KeyValue or Sequence entry, found {:?}",
            self.tag
        );
        Dto::new(self.subtree)
    }
}
