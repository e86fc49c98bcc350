//! The canonical binary container format.
//!
//! A document is a KeyValue composite with no tag and no key:
//!
//! ```text
//! document  := int32(length) entries 0x00
//! entry     := tag key 0x00 payload          (leaf)
//!            | tag key 0x00 subtree          (composite)
//! subtree   := int32(length) entries 0x00
//! ```
//!
//! Every composite length counts from the start of its own length field
//! through the terminating End byte, so a reader can skip a whole subtree
//! in O(1). Sequence entries store their decimal index as the key, which
//! keeps maps and sequences byte-compatible.
//!
//! Three artifacts work the format: [`Encoder`] builds documents directly,
//! [`BinaryReader`] pulls events out of a document, and [`BinaryWriter`]
//! consumes events back into one.

use crate::buffer::{ByteInput, ByteOutput};
use crate::value::format_index;
use crate::{BinaryBlob, DtoReader, DtoWriter, Event, Key, Tag, Value};

/// A decoded entry: the end marker, a leaf value, or a composite header.
pub(crate) enum Decoded<'a> {
    End,
    Leaf(Value<'a>),
    /// `subtree` spans the composite from its length field through its End
    /// byte; the input cursor is left just past the length field.
    Composite { tag: Tag, subtree: &'a [u8] },
}

/// Decodes one entry at the input cursor.
///
/// For composites only the length prefix is consumed; nesting is the
/// caller's business (the reader pushes a frame, the iterator skips the
/// body).
///
/// # Panics
///
/// Panics on an unassigned tag byte or a truncated entry — malformed
/// binary is an invariant violation.
pub(crate) fn decode_entry<'a>(input: &mut ByteInput<'a>) -> (&'a [u8], Decoded<'a>) {
    let byte = input.read_u8();
    let tag = match Tag::from_u8(byte) {
        Some(tag) => tag,
        None => panic!("invalid DTO tag {byte:#04x}"),
    };

    if tag == Tag::End {
        return (b"", Decoded::End);
    }

    let key = input.read_cstr();

    let decoded = match tag {
        Tag::KeyValue | Tag::Sequence => {
            let start = input.consumed();
            let length = input.read_i32();
            assert!(length >= 5, "composite subtree of {length} bytes is truncated");
            Decoded::Composite { tag, subtree: input.slice(start, length as usize) }
        }
        Tag::Double => Decoded::Leaf(Value::Double(input.read_f64())),
        Tag::String => {
            let length = input.read_i32();
            assert!(length >= 1, "string payload of {length} bytes is truncated");
            let bytes = input.read_bytes(length as usize);
            Decoded::Leaf(Value::String(&bytes[..bytes.len() - 1]))
        }
        Tag::Binary => {
            let length = input.read_i32() as usize;
            let subtype = input.read_u8();
            let data = input.read_bytes(length);
            Decoded::Leaf(Value::Binary(BinaryBlob { subtype, data }))
        }
        Tag::Uuid => {
            let mut id = [0u8; 16];
            id.copy_from_slice(input.read_bytes(16));
            Decoded::Leaf(Value::Uuid(id))
        }
        Tag::Bool => Decoded::Leaf(Value::Bool(input.read_bool())),
        Tag::Date => Decoded::Leaf(Value::Date(input.read_i64())),
        Tag::Null => Decoded::Leaf(Value::Null),
        Tag::RegEx => {
            let pattern = input.read_cstr();
            let options = input.read_cstr();
            Decoded::Leaf(Value::RegEx { pattern, options })
        }
        Tag::Int32 => Decoded::Leaf(Value::Int32(input.read_i32())),
        Tag::Timestamp => Decoded::Leaf(Value::Timestamp(input.read_u64())),
        Tag::Int64 => Decoded::Leaf(Value::Int64(input.read_i64())),
        Tag::Decimal128 => {
            let mut digits = [0u8; 16];
            digits.copy_from_slice(input.read_bytes(16));
            Decoded::Leaf(Value::Decimal128(digits))
        }
        Tag::End => unreachable!(),
    };

    (key, decoded)
}

fn write_key(output: &mut ByteOutput<'_>, key: &Key<'_>) {
    match key {
        Key::Name(bytes) => output.write_bytes(bytes),
        Key::Index(index) => {
            let mut scratch = [0u8; 10];
            output.write_bytes(format_index(&mut scratch, *index));
        }
    }
    output.write_u8(0);
}

fn encode_payload(output: &mut ByteOutput<'_>, value: &Value<'_>) {
    match value {
        Value::Double(v) => output.write_f64(*v),
        Value::String(s) => {
            output.write_i32(s.len() as i32 + 1);
            output.write_bytes(s);
            output.write_u8(0);
        }
        Value::Binary(blob) => {
            output.write_i32(blob.data.len() as i32);
            output.write_u8(blob.subtype);
            output.set_size(blob.data.len());
            output.write_sized(blob.data);
        }
        Value::Uuid(id) => output.write_bytes(id),
        Value::Bool(v) => output.write_bool(*v),
        Value::Date(v) => output.write_i64(*v),
        Value::Null => {}
        Value::RegEx { pattern, options } => {
            output.write_bytes(pattern);
            output.write_u8(0);
            output.write_bytes(options);
            output.write_u8(0);
        }
        Value::Int32(v) => output.write_i32(*v),
        Value::Timestamp(v) => output.write_u64(*v),
        Value::Int64(v) => output.write_i64(*v),
        Value::Decimal128(digits) => output.write_bytes(digits),
    }
}

/// Encodes one leaf entry and returns the number of bytes written.
pub(crate) fn encode_entry(output: &mut ByteOutput<'_>, key: &Key<'_>, value: &Value<'_>) -> usize {
    let before = output.length();
    output.write_tag(value.tag());
    write_key(output, key);
    encode_payload(output, value);
    output.length() - before
}

struct EncoderFrame {
    /// Position of the subtree's length placeholder.
    at: usize,
    /// Next synthesized key for sequence frames, `None` for objects.
    index: Option<u32>,
}

/// A fluent builder producing the canonical binary form directly into the
/// caller's buffer.
///
/// In object context the caller alternates [`key`](Self::key) and value
/// calls; in sequence context values only, with decimal index keys
/// synthesized. The document (and every nested composite) is closed by
/// [`end`](Self::end); the encoder is [`complete`](Self::complete) once the
/// root is closed.
///
/// # Example
///
/// ```
/// use dtokit::{Dto, Encoder};
///
/// let mut buffer = [0u8; 128];
/// Encoder::new(&mut buffer)
///     .key("a").int32(1)
///     .key("items").begin_sequence()
///         .double(1.5)
///         .double(2.5)
///         .end()
///     .end();
///
/// let dto = Dto::new(&buffer);
/// assert_eq!(dto.entry_count(), 2);
/// assert_eq!(dto.find_descendant("items.1").unwrap().to_double(), 2.5);
/// ```
///
/// # Panics
///
/// Emitting a value in object context without a pending key, emitting past
/// the buffer capacity, or touching a complete encoder are precondition
/// violations and panic.
pub struct Encoder<'a> {
    output: ByteOutput<'a>,
    stack: Vec<EncoderFrame>,
    /// Position of the placeholder tag byte written by `key`, patched when
    /// the value's tag is known.
    pending_key: Option<usize>,
}

impl<'a> Encoder<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let mut output = ByteOutput::new(buffer);
        let stack = vec![EncoderFrame { at: 0, index: None }];
        output.write_i32(0);
        Self { output, stack, pending_key: None }
    }

    /// Stashes the key for the next entry. Object context only.
    pub fn key(&mut self, key: &str) -> &mut Self {
        assert!(!self.complete(), "encoder is already complete");
        let frame = match self.stack.last() {
            Some(frame) => frame,
            None => unreachable!(),
        };
        assert!(frame.index.is_none(), "sequence entries synthesize their keys");
        assert!(self.pending_key.is_none(), "entry key is already set");

        self.pending_key = Some(self.output.length());
        self.output.write_u8(0);
        self.output.write_bytes(key.as_bytes());
        self.output.write_u8(0);
        self
    }

    /// Writes the tag and key head of the next entry. In object context
    /// this patches the placeholder tag left by `key`; in sequence context
    /// it synthesizes the index key.
    fn entry_head(&mut self, tag: Tag) {
        assert!(!self.complete(), "encoder is already complete");
        let frame = match self.stack.last_mut() {
            Some(frame) => frame,
            None => unreachable!(),
        };

        match frame.index {
            Some(index) => {
                assert!(self.pending_key.is_none(), "sequence entries synthesize their keys");
                frame.index = Some(index + 1);
                self.output.write_tag(tag);
                let mut scratch = [0u8; 10];
                self.output.write_bytes(format_index(&mut scratch, index));
                self.output.write_u8(0);
            }
            None => {
                let at = match self.pending_key.take() {
                    Some(at) => at,
                    None => panic!("entry key missing"),
                };
                self.output.patch_u8(at, tag as u8);
            }
        }
    }

    fn leaf(&mut self, value: Value<'_>) -> &mut Self {
        self.entry_head(value.tag());
        encode_payload(&mut self.output, &value);
        self
    }

    pub fn double(&mut self, value: f64) -> &mut Self {
        self.leaf(Value::Double(value))
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        self.leaf(Value::String(value.as_bytes()))
    }

    pub fn boolean(&mut self, value: bool) -> &mut Self {
        self.leaf(Value::Bool(value))
    }

    pub fn int32(&mut self, value: i32) -> &mut Self {
        self.leaf(Value::Int32(value))
    }

    pub fn int64(&mut self, value: i64) -> &mut Self {
        self.leaf(Value::Int64(value))
    }

    /// A 64-bit unsigned Unix timestamp.
    pub fn timestamp(&mut self, value: u64) -> &mut Self {
        self.leaf(Value::Timestamp(value))
    }

    /// UTC milliseconds since the Unix epoch.
    pub fn date(&mut self, value: i64) -> &mut Self {
        self.leaf(Value::Date(value))
    }

    pub fn null(&mut self) -> &mut Self {
        self.leaf(Value::Null)
    }

    pub fn uuid(&mut self, value: &[u8; 16]) -> &mut Self {
        self.leaf(Value::Uuid(*value))
    }

    pub fn regex(&mut self, pattern: &str, options: &str) -> &mut Self {
        self.leaf(Value::RegEx {
            pattern: pattern.as_bytes(),
            options: options.as_bytes(),
        })
    }

    pub fn binary(&mut self, subtype: u8, data: &[u8]) -> &mut Self {
        self.leaf(Value::Binary(BinaryBlob { subtype, data }))
    }

    pub fn decimal128(&mut self, digits: &[u8; 16]) -> &mut Self {
        self.leaf(Value::Decimal128(*digits))
    }

    /// Opens a nested key-value object.
    pub fn begin_key_value(&mut self) -> &mut Self {
        self.entry_head(Tag::KeyValue);
        self.stack.push(EncoderFrame { at: self.output.length(), index: None });
        self.output.write_i32(0);
        self
    }

    /// Opens a nested sequence; its entries get synthesized decimal keys.
    pub fn begin_sequence(&mut self) -> &mut Self {
        self.entry_head(Tag::Sequence);
        self.stack.push(EncoderFrame { at: self.output.length(), index: Some(0) });
        self.output.write_i32(0);
        self
    }

    /// Closes the innermost composite, patching its length prefix. Closing
    /// the root completes the encoder.
    pub fn end(&mut self) -> &mut Self {
        assert!(!self.complete(), "encoder is already complete");
        self.output.write_tag(Tag::End);
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => unreachable!(),
        };
        self.output.patch_i32(frame.at, (self.output.length() - frame.at) as i32);
        self
    }

    /// Splices a completed sub-encoder as a nested key-value entry.
    ///
    /// # Panics
    ///
    /// Panics unless `other` is complete.
    pub fn append(&mut self, other: &Encoder<'_>) -> &mut Self {
        assert!(other.complete(), "appended encoder must be complete");
        self.entry_head(Tag::KeyValue);
        self.output.set_size(other.length());
        self.output.write_sized(other.data());
        self
    }

    /// True once the root composite has been closed.
    pub fn complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// Total number of bytes written.
    pub fn length(&self) -> usize {
        self.output.length()
    }

    /// The written document prefix.
    pub fn data(&self) -> &[u8] {
        self.output.bytes()
    }
}

struct ReaderFrame {
    tag: Tag,
}

/// A pull-style reader emitting events from a binary document.
///
/// The first [`next`](DtoReader::next) call reads the document length and
/// emits `StreamStart`; composite entries push a frame and emit their start
/// event without recursing; End bytes pop and emit the matching end event,
/// `StreamEnd` once the root closes.
///
/// # Panics
///
/// Malformed binary (unknown tags, truncated subtrees) panics.
pub struct BinaryReader<'a> {
    input: ByteInput<'a>,
    stack: Vec<ReaderFrame>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input: ByteInput::new(input), stack: Vec::new() }
    }

    fn pop(&mut self) -> Event<'a> {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => panic!("unbalanced End marker in binary document"),
        };
        if self.stack.is_empty() {
            Event::StreamEnd
        } else if frame.tag == Tag::Sequence {
            Event::SequenceEnd
        } else {
            Event::KeyValueEnd
        }
    }
}

impl<'a> DtoReader<'a> for BinaryReader<'a> {
    fn next(&mut self) -> Event<'a> {
        if self.stack.is_empty() {
            let length = self.input.read_i32();
            assert!(
                length >= 5 && length as usize <= self.input.available() + 4,
                "document length {length} does not fit the input buffer"
            );
            self.stack.push(ReaderFrame { tag: Tag::KeyValue });
            return Event::StreamStart;
        }

        let (key, decoded) = decode_entry(&mut self.input);
        match decoded {
            Decoded::End => self.pop(),
            Decoded::Leaf(value) => Event::Entry(Key::Name(key), value),
            Decoded::Composite { tag, .. } => {
                self.stack.push(ReaderFrame { tag });
                if tag == Tag::Sequence {
                    Event::SequenceStart(Key::Name(key))
                } else {
                    Event::KeyValueStart(Key::Name(key))
                }
            }
        }
    }

    fn consumed(&self) -> usize {
        self.input.consumed()
    }
}

/// An event consumer producing the canonical binary form.
///
/// Mirrors [`BinaryReader`]: start events write the entry head plus a
/// length placeholder and push its position; end events write the End byte
/// and patch the placeholder with the measured span.
pub struct BinaryWriter<'a> {
    output: ByteOutput<'a>,
    stack: Vec<usize>,
}

impl<'a> BinaryWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { output: ByteOutput::new(buffer), stack: Vec::new() }
    }

    fn start(&mut self, tag: Tag, key: Option<&Key<'_>>) {
        if let Some(key) = key {
            self.output.write_tag(tag);
            write_key(&mut self.output, key);
        }
        self.stack.push(self.output.length());
        self.output.write_i32(0);
    }

    fn finish(&mut self) {
        let at = match self.stack.pop() {
            Some(at) => at,
            None => panic!("unbalanced end event"),
        };
        self.output.write_tag(Tag::End);
        self.output.patch_i32(at, (self.output.length() - at) as i32);
    }

    /// Total number of bytes written.
    pub fn length(&self) -> usize {
        self.output.length()
    }
}

impl DtoWriter for BinaryWriter<'_> {
    fn consume(&mut self, event: &Event<'_>) -> usize {
        let before = self.output.length();

        match event {
            Event::StreamStart => self.start(Tag::KeyValue, None),
            Event::KeyValueStart(key) => self.start(Tag::KeyValue, Some(key)),
            Event::SequenceStart(key) => self.start(Tag::Sequence, Some(key)),
            Event::Entry(key, value) => {
                encode_entry(&mut self.output, key, value);
            }
            Event::KeyValueEnd | Event::SequenceEnd | Event::StreamEnd => self.finish(),
            Event::Error => panic!("error events cannot be encoded"),
        }

        self.output.length() - before
    }
}
