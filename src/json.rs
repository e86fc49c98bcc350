//! JSON bridge: compact and styled writers, continuation-stack reader.

use crate::buffer::TextOutput;
use crate::token::{TokenInput, TokenType};
use crate::{DtoReader, DtoWriter, Event, Key, Tag};

/// An event consumer producing compact JSON.
///
/// The output is a single line with no whitespace; string values and keys
/// are double-quoted, byte-transparent. Binary and other non-JSON tags
/// come out as quoted placeholders. The stream-end event appends a NUL
/// terminator after the closing brace, so the text proper is
/// `written - 1` bytes long.
pub struct JsonWriter<'a> {
    output: TextOutput<'a>,
    stack: Vec<Tag>,
    separator: &'static str,
}

impl<'a> JsonWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_separator(buffer, "")
    }

    /// `separator` is emitted between a key's colon and its value.
    pub(crate) fn with_separator(buffer: &'a mut [u8], separator: &'static str) -> Self {
        Self { output: TextOutput::new(buffer), stack: Vec::new(), separator }
    }

    /// Emits the `"key":` prefix in object context; sequences carry no
    /// keys in JSON.
    fn key(&mut self, key: &Key<'_>) {
        if self.stack.last() != Some(&Tag::KeyValue) {
            return;
        }
        self.output.quoted();
        match key {
            Key::Name(bytes) => self.output.string(bytes),
            Key::Index(index) => {
                let mut scratch = [0u8; 10];
                let digits = crate::value::format_index(&mut scratch, *index);
                self.output.string(digits);
            }
        }
        self.output.raw(":");
        self.output.raw(self.separator);
    }

    fn remove_trailing_comma(&mut self) {
        if self.output.last() == Some(b',') {
            self.output.rewind(1);
        }
    }

    /// Total number of bytes written, including the NUL terminator once
    /// the stream has ended.
    pub fn length(&self) -> usize {
        self.output.length()
    }
}

impl DtoWriter for JsonWriter<'_> {
    fn consume(&mut self, event: &Event<'_>) -> usize {
        let before = self.output.length();

        match event {
            Event::StreamStart => {
                self.output.raw("{");
                self.stack.push(Tag::KeyValue);
            }
            Event::StreamEnd => {
                self.stack.pop();
                self.remove_trailing_comma();
                self.output.raw("}");
                self.output.terminate();
            }
            Event::KeyValueStart(key) => {
                self.key(key);
                self.output.raw("{");
                self.stack.push(Tag::KeyValue);
            }
            Event::KeyValueEnd => {
                self.remove_trailing_comma();
                self.output.raw("},");
                self.stack.pop();
            }
            Event::SequenceStart(key) => {
                self.key(key);
                self.output.raw("[");
                self.stack.push(Tag::Sequence);
            }
            Event::SequenceEnd => {
                self.remove_trailing_comma();
                self.output.raw("],");
                self.stack.pop();
            }
            Event::Entry(key, value) => {
                self.key(key);
                self.output.quoted();
                self.output.value(value);
                self.output.raw(",");
            }
            Event::Error => panic!("error events cannot be encoded"),
        }

        self.output.length() - before
    }
}

/// An event consumer producing indented JSON.
///
/// Extends the compact writer with per-depth indentation before each event
/// and a newline after it; composite closers dedent one level.
pub struct JsonStyledWriter<'a> {
    json: JsonWriter<'a>,
    indent: &'static str,
    newline: &'static str,
}

impl<'a> JsonStyledWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_format(buffer, "  ", "\r\n")
    }

    pub fn with_format(
        buffer: &'a mut [u8],
        indent: &'static str,
        newline: &'static str,
    ) -> Self {
        Self {
            json: JsonWriter::with_separator(buffer, " "),
            indent,
            newline,
        }
    }

    fn indentation(&mut self, level: usize) {
        for _ in 0..level {
            self.json.output.raw(self.indent);
        }
    }

    /// Drops the list comma left hanging before the line break once a
    /// closer arrives.
    fn strip_comma_before_newline(&mut self) {
        let newline = self.newline.as_bytes();
        if !self.json.output.ends_with(newline) {
            return;
        }
        let length = self.json.output.length();
        if length > newline.len()
            && self.json.output.bytes()[length - newline.len() - 1] == b','
        {
            self.json.output.rewind(newline.len() + 1);
            self.json.output.raw(self.newline);
        }
    }

    /// Total number of bytes written.
    pub fn length(&self) -> usize {
        self.json.length()
    }
}

impl DtoWriter for JsonStyledWriter<'_> {
    fn consume(&mut self, event: &Event<'_>) -> usize {
        let before = self.json.output.length();

        match event {
            Event::StreamStart => {
                self.json.consume(event);
                self.json.output.raw(self.newline);
            }
            Event::StreamEnd => {
                self.strip_comma_before_newline();
                self.json.consume(event);
            }
            Event::KeyValueStart(_) | Event::SequenceStart(_) => {
                self.indentation(self.json.stack.len());
                self.json.consume(event);
                self.json.output.raw(self.newline);
            }
            Event::KeyValueEnd | Event::SequenceEnd => {
                self.strip_comma_before_newline();
                self.indentation(self.json.stack.len() - 1);
                self.json.consume(event);
                self.json.output.raw(self.newline);
            }
            Event::Entry(..) => {
                self.indentation(self.json.stack.len());
                self.json.consume(event);
                self.json.output.raw(self.newline);
            }
            Event::Error => panic!("error events cannot be encoded"),
        }

        self.json.output.length() - before
    }
}

/// Parser continuations, pushed onto an explicit stack and dispatched one
/// per [`next`](DtoReader::next) call.
enum Continuation {
    Stream,
    KeyValue,
    Item,
    ExpectBraceStreamEnd,
    ExpectBracketStreamEnd,
    ExpectKeyValueEnd,
    ExpectSequenceEnd,
    ContinueKeyValue,
    ContinueSequence,
}

/// A pull-style reader producing events from JSON text.
///
/// Accepts root objects and root arrays; whitespace (including CRLF) is
/// free between tokens. Numbers parse as doubles, with a leading minus
/// combined by the parser; strings are byte-transparent between their
/// double quotes; `null` is reserved but not parsed. Syntax errors are
/// reported through the error handler and terminate the stream with
/// [`Event::Error`].
pub struct JsonReader<'a> {
    input: TokenInput<'a>,
    stack: Vec<Continuation>,
    index: Vec<u32>,
}

impl<'a> JsonReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut input = TokenInput::new(input);
        input.next_non_space();
        Self { input, stack: Vec::new(), index: Vec::new() }
    }

    /// Runs one continuation; `None` means it fell through to the one
    /// below it on the stack.
    fn run(&mut self, continuation: Continuation) -> Option<Event<'a>> {
        match continuation {
            Continuation::Stream => Some(self.parse_stream()),
            Continuation::KeyValue => Some(self.parse_key_value()),
            Continuation::Item => Some(self.parse_item()),
            Continuation::ExpectBraceStreamEnd => {
                if self.input.expect(TokenType::BraceClose, true) {
                    Some(Event::StreamEnd)
                } else {
                    Some(Event::Error)
                }
            }
            Continuation::ExpectBracketStreamEnd => {
                if self.input.expect(TokenType::BracketClose, true) {
                    self.index.pop();
                    Some(Event::StreamEnd)
                } else {
                    Some(Event::Error)
                }
            }
            Continuation::ExpectKeyValueEnd => {
                if self.input.expect(TokenType::BraceClose, true) {
                    Some(Event::KeyValueEnd)
                } else {
                    Some(Event::Error)
                }
            }
            Continuation::ExpectSequenceEnd => {
                if self.input.expect(TokenType::BracketClose, true) {
                    self.index.pop();
                    Some(Event::SequenceEnd)
                } else {
                    Some(Event::Error)
                }
            }
            Continuation::ContinueKeyValue => {
                if self.input.consume(TokenType::Comma, true) {
                    Some(self.parse_key_value())
                } else {
                    None
                }
            }
            Continuation::ContinueSequence => {
                if self.input.consume(TokenType::Comma, true) {
                    Some(self.parse_item())
                } else {
                    None
                }
            }
        }
    }

    fn parse_stream(&mut self) -> Event<'a> {
        if self.input.consume(TokenType::BraceOpen, true) {
            self.stack.push(Continuation::ExpectBraceStreamEnd);
            if !self.input.check(TokenType::BraceClose) {
                self.stack.push(Continuation::KeyValue);
            }
            return Event::StreamStart;
        }

        if self.input.consume(TokenType::BracketOpen, true) {
            self.stack.push(Continuation::ExpectBracketStreamEnd);
            if !self.input.check(TokenType::BracketClose) {
                self.stack.push(Continuation::Item);
            }
            self.index.push(0);
            return Event::StreamStart;
        }

        self.input.emit_unexpected();
        Event::Error
    }

    fn parse_key_value(&mut self) -> Event<'a> {
        let key = self.input.token().text;
        if !self.input.expect(TokenType::DoubleQuotedString, true) {
            return Event::Error;
        }
        if !self.input.expect(TokenType::Colon, true) {
            return Event::Error;
        }
        self.stack.push(Continuation::ContinueKeyValue);
        self.parse_primitive(Key::Name(key))
    }

    fn parse_item(&mut self) -> Event<'a> {
        let index = match self.index.last_mut() {
            Some(index) => index,
            None => panic!("sequence item outside of a sequence frame"),
        };
        let key = Key::Index(*index);
        *index += 1;
        self.stack.push(Continuation::ContinueSequence);
        self.parse_primitive(key)
    }

    fn parse_primitive(&mut self, key: Key<'a>) -> Event<'a> {
        match self.input.token().ty {
            TokenType::BraceOpen => {
                self.input.consume(TokenType::BraceOpen, true);
                self.stack.push(Continuation::ExpectKeyValueEnd);
                if !self.input.check(TokenType::BraceClose) {
                    self.stack.push(Continuation::KeyValue);
                }
                Event::KeyValueStart(key)
            }
            TokenType::BracketOpen => {
                self.input.consume(TokenType::BracketOpen, true);
                self.stack.push(Continuation::ExpectSequenceEnd);
                if !self.input.check(TokenType::BracketClose) {
                    self.stack.push(Continuation::Item);
                }
                self.index.push(0);
                Event::SequenceStart(key)
            }
            TokenType::DoubleQuotedString => {
                let value = self.input.consume_string(true);
                Event::Entry(key, value)
            }
            TokenType::Number => match self.input.consume_number(1.0, true) {
                Some(value) => Event::Entry(key, value),
                None => Event::Error,
            },
            TokenType::Minus => {
                self.input.consume(TokenType::Minus, true);
                match self.input.consume_number(-1.0, true) {
                    Some(value) => Event::Entry(key, value),
                    None => Event::Error,
                }
            }
            TokenType::True | TokenType::False => match self.input.consume_boolean(true) {
                Some(value) => Event::Entry(key, value),
                None => Event::Error,
            },
            _ => {
                self.input.emit_unexpected();
                Event::Error
            }
        }
    }
}

impl<'a> DtoReader<'a> for JsonReader<'a> {
    fn next(&mut self) -> Event<'a> {
        loop {
            let continuation = match self.stack.pop() {
                Some(continuation) => continuation,
                None => Continuation::Stream,
            };
            if let Some(event) = self.run(continuation) {
                return event;
            }
        }
    }

    fn consumed(&self) -> usize {
        self.input.consumed()
    }
}
