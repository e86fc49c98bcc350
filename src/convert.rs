//! The reader → writer conversion pump.

use crate::{Error, Event, Result};

/// A pull-style producer of structural events.
///
/// The lifetime `'a` is the input buffer's: emitted string views borrow
/// from it, not from the reader.
pub trait DtoReader<'a> {
    /// Produces the next event in document order.
    fn next(&mut self) -> Event<'a>;

    /// Total number of input bytes consumed so far.
    fn consumed(&self) -> usize;
}

/// A consumer of structural events.
pub trait DtoWriter {
    /// Consumes one event and returns the number of bytes written for it.
    fn consume(&mut self, event: &Event<'_>) -> usize;
}

/// Pumps events from `reader` into `writer` until the stream ends.
///
/// Returns the total number of bytes written, or [`Error::Syntax`] when the
/// reader emits an error event (the diagnostic has already been routed
/// through the error handler).
///
/// # Example
///
/// ```
/// use dtokit::{convert, BinaryWriter, Dto, JsonReader};
///
/// let mut buffer = [0u8; 128];
/// let mut reader = JsonReader::new(br#"{"answer":42}"#);
/// let mut writer = BinaryWriter::new(&mut buffer);
/// convert(&mut reader, &mut writer).unwrap();
///
/// let dto = Dto::new(&buffer);
/// assert_eq!(dto.find("answer").unwrap().to_int32(), 42);
/// ```
pub fn convert<'a, R, W>(reader: &mut R, writer: &mut W) -> Result<usize>
where
    R: DtoReader<'a>,
    W: DtoWriter,
{
    let mut written = 0;

    loop {
        let event = reader.next();
        match event {
            Event::Error => return Err(Error::Syntax),
            Event::StreamEnd => {
                written += writer.consume(&event);
                return Ok(written);
            }
            _ => written += writer.consume(&event),
        }
    }
}
