//! YAML bridge: block-style writer and indentation-driven reader.

use crate::buffer::TextOutput;
use crate::token::{TokenInput, TokenType};
use crate::{DtoReader, DtoWriter, Event, Key, Tag, Value};

/// An event consumer producing block-style YAML.
///
/// Objects emit `key: value` lines, sequences `- value` lines, nested
/// composites a `key: ` (or `- `) line followed by a block indented two
/// spaces deeper. Strings are unquoted. The stream-end event appends a NUL
/// terminator, so the text proper is `written - 1` bytes long.
pub struct YamlWriter<'a> {
    output: TextOutput<'a>,
    stack: Vec<Tag>,
    newline: &'static str,
}

impl<'a> YamlWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_newline(buffer, "\n")
    }

    pub fn with_newline(buffer: &'a mut [u8], newline: &'static str) -> Self {
        Self { output: TextOutput::new(buffer), stack: Vec::new(), newline }
    }

    fn indentation(&mut self, level: usize) {
        for _ in 0..level {
            self.output.raw("  ");
        }
    }

    /// Emits the line lead-in for one entry: indentation plus `key: ` in
    /// object frames, `- ` in sequence frames.
    fn key(&mut self, key: &Key<'_>) {
        self.indentation(self.stack.len() - 1);

        if self.stack.last() == Some(&Tag::Sequence) {
            self.output.raw("- ");
            return;
        }

        match key {
            Key::Name(bytes) => self.output.string(bytes),
            Key::Index(index) => {
                let mut scratch = [0u8; 10];
                let digits = crate::value::format_index(&mut scratch, *index);
                self.output.string(digits);
            }
        }
        self.output.raw(": ");
    }

    /// Total number of bytes written, including the NUL terminator once
    /// the stream has ended.
    pub fn length(&self) -> usize {
        self.output.length()
    }
}

impl DtoWriter for YamlWriter<'_> {
    fn consume(&mut self, event: &Event<'_>) -> usize {
        let before = self.output.length();

        match event {
            Event::StreamStart => self.stack.push(Tag::KeyValue),
            Event::StreamEnd => {
                self.stack.pop();
                self.output.terminate();
            }
            Event::KeyValueStart(key) => {
                self.key(key);
                self.output.raw(self.newline);
                self.stack.push(Tag::KeyValue);
            }
            Event::SequenceStart(key) => {
                self.key(key);
                self.output.raw(self.newline);
                self.stack.push(Tag::Sequence);
            }
            Event::KeyValueEnd | Event::SequenceEnd => {
                self.stack.pop();
            }
            Event::Entry(key, value) => {
                self.key(key);
                self.output.value(value);
                self.output.raw(self.newline);
            }
            Event::Error => panic!("error events cannot be encoded"),
        }

        self.output.length() - before
    }
}

struct YamlFrame {
    /// Indentation column of this frame's own entries.
    indent: u32,
    tag: Tag,
    /// Next synthesized key for sequence frames.
    index: u32,
}

/// A pull-style reader producing events from block-style YAML.
///
/// Composites are entered implicitly: a content line indented deeper than
/// the current frame, after a `key:` (or `- `) line, starts one, and its
/// kind is decided by its first entry — `- ` introduces a sequence, an
/// identifier key an object. Dedenting or the end of input closes one
/// frame per emitted end event. Inline `{}` and `[]` after a key open an
/// empty composite of the corresponding kind.
///
/// Scalars disambiguate as `true`/`false` booleans, optionally negated
/// numbers (always doubles), and otherwise the line's bytes up to the end
/// of the line as a string.
pub struct YamlReader<'a> {
    input: TokenInput<'a>,
    stack: Vec<YamlFrame>,
    /// An end event queued by an inline empty composite.
    pending: Option<Event<'a>>,
    /// Indentation of the current content line.
    line_indent: u32,
    /// True while the cursor sits at the first unparsed token of an entry.
    at_entry: bool,
    started: bool,
}

impl<'a> YamlReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut input = TokenInput::new(input);
        input.next();
        Self {
            input,
            stack: Vec::new(),
            pending: None,
            line_indent: 0,
            at_entry: false,
            started: false,
        }
    }

    /// Skips blank space and newlines up to the next content token,
    /// counting the indentation of the line it lands on.
    fn measure_line(&mut self) {
        let mut count = 0;
        loop {
            match self.input.token().ty {
                TokenType::Space | TokenType::Tab => {
                    count += 1;
                    self.input.next();
                }
                TokenType::NewLine => {
                    count = 0;
                    self.input.next();
                }
                _ => break,
            }
        }
        self.line_indent = count;
    }

    /// Skips spaces and tabs without crossing a newline.
    fn skip_inline(&mut self) {
        while matches!(self.input.token().ty, TokenType::Space | TokenType::Tab) {
            self.input.next();
        }
    }

    fn end_event(tag: Tag) -> Event<'a> {
        if tag == Tag::Sequence {
            Event::SequenceEnd
        } else {
            Event::KeyValueEnd
        }
    }

    /// Parses the value part of an entry whose lead-in (`key:` or `-`) is
    /// already consumed. `entry_indent` is the indentation of the entry's
    /// own line, used to detect a nested block.
    fn parse_value(&mut self, key: Key<'a>, entry_indent: u32) -> Event<'a> {
        self.skip_inline();

        match self.input.token().ty {
            TokenType::BraceOpen => {
                self.input.next();
                self.skip_inline();
                if !self.input.expect(TokenType::BraceClose, false) {
                    return Event::Error;
                }
                self.pending = Some(Event::KeyValueEnd);
                self.at_entry = false;
                Event::KeyValueStart(key)
            }
            TokenType::BracketOpen => {
                self.input.next();
                self.skip_inline();
                if !self.input.expect(TokenType::BracketClose, false) {
                    return Event::Error;
                }
                self.pending = Some(Event::SequenceEnd);
                self.at_entry = false;
                Event::SequenceStart(key)
            }
            TokenType::NewLine | TokenType::End => {
                // Nothing on this line: a nested block, or an empty value.
                self.measure_line();
                if self.input.token().ty != TokenType::End && self.line_indent > entry_indent {
                    let tag = if self.input.check(TokenType::Minus) {
                        Tag::Sequence
                    } else {
                        Tag::KeyValue
                    };
                    self.stack.push(YamlFrame { indent: self.line_indent, tag, index: 0 });
                    self.at_entry = true;
                    if tag == Tag::Sequence {
                        Event::SequenceStart(key)
                    } else {
                        Event::KeyValueStart(key)
                    }
                } else {
                    // Empty block: the sentinel indent makes the very next
                    // line (or the end of input) close it.
                    self.stack.push(YamlFrame {
                        indent: entry_indent + 1,
                        tag: Tag::KeyValue,
                        index: 0,
                    });
                    self.at_entry = true;
                    Event::KeyValueStart(key)
                }
            }
            TokenType::True | TokenType::False => match self.input.consume_boolean(false) {
                Some(value) => self.scalar_line(key, value),
                None => Event::Error,
            },
            TokenType::Minus => {
                let start = self.input.token().start;
                self.input.next();
                self.skip_inline();
                if self.input.check(TokenType::Number) {
                    match self.input.consume_number(-1.0, false) {
                        Some(value) => self.scalar_line(key, value),
                        None => Event::Error,
                    }
                } else {
                    // Not a negative number after all; the dash begins a
                    // string scalar.
                    self.string_scalar(key, start, start + 1)
                }
            }
            TokenType::Number => match self.input.consume_number(1.0, false) {
                Some(value) => self.scalar_line(key, value),
                None => Event::Error,
            },
            TokenType::DoubleQuotedString | TokenType::SingleQuotedString => {
                let value = self.input.consume_string(false);
                self.scalar_line(key, value)
            }
            _ => {
                let start = self.input.token().start;
                self.string_scalar(key, start, start)
            }
        }
    }

    /// Consumes a string scalar spanning from `start` to the end of the
    /// line, trailing blanks trimmed.
    fn string_scalar(&mut self, key: Key<'a>, start: usize, mut end: usize) -> Event<'a> {
        loop {
            match self.input.token().ty {
                TokenType::NewLine | TokenType::End => break,
                TokenType::Space | TokenType::Tab => {
                    self.input.next();
                }
                _ => {
                    end = self.input.pos();
                    self.input.next();
                }
            }
        }
        let text = &self.input.source()[start..end];
        self.at_entry = false;
        Event::Entry(key, Value::String(text))
    }

    fn scalar_line(&mut self, key: Key<'a>, value: Value<'a>) -> Event<'a> {
        self.at_entry = false;
        Event::Entry(key, value)
    }
}

impl<'a> DtoReader<'a> for YamlReader<'a> {
    fn next(&mut self) -> Event<'a> {
        if let Some(event) = self.pending.take() {
            return event;
        }

        if !self.started {
            self.started = true;
            self.measure_line();
            let tag = if self.input.check(TokenType::Minus) {
                Tag::Sequence
            } else {
                Tag::KeyValue
            };
            self.stack.push(YamlFrame { indent: self.line_indent, tag, index: 0 });
            self.at_entry = true;
            return Event::StreamStart;
        }

        if self.stack.is_empty() {
            return Event::StreamEnd;
        }

        if !self.at_entry {
            self.measure_line();
            self.at_entry = true;
        }

        if self.input.check(TokenType::End) {
            let frame = match self.stack.pop() {
                Some(frame) => frame,
                None => unreachable!(),
            };
            return if self.stack.is_empty() {
                Event::StreamEnd
            } else {
                Self::end_event(frame.tag)
            };
        }

        // A shallower line closes the innermost frame; the entry itself is
        // re-examined against the parent on the following call.
        if self.stack.len() > 1 {
            let top_indent = self.stack.last().map(|frame| frame.indent).unwrap_or(0);
            if self.line_indent < top_indent {
                let frame = match self.stack.pop() {
                    Some(frame) => frame,
                    None => unreachable!(),
                };
                return Self::end_event(frame.tag);
            }
        }

        let entry_indent = self.line_indent;
        let top_tag = self.stack.last().map(|frame| frame.tag).unwrap_or(Tag::KeyValue);

        if top_tag == Tag::Sequence {
            let index = match self.stack.last_mut() {
                Some(frame) => {
                    let index = frame.index;
                    frame.index += 1;
                    index
                }
                None => unreachable!(),
            };
            if !self.input.expect(TokenType::Minus, false) {
                return Event::Error;
            }
            self.parse_value(Key::Index(index), entry_indent)
        } else {
            if !self.input.check(TokenType::Identifier) {
                self.input.emit_unexpected();
                return Event::Error;
            }
            let key = self.input.token().text;
            self.input.next();
            self.skip_inline();
            if !self.input.expect(TokenType::Colon, false) {
                return Event::Error;
            }
            self.parse_value(Key::Name(key), entry_indent)
        }
    }

    fn consumed(&self) -> usize {
        self.input.consumed()
    }
}
