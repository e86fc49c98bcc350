//! # dtokit
//!
//! A zero-allocation data-transfer-object codec: one compact,
//! self-describing binary container plus reversible text bridges (JSON and
//! YAML) that convert to and from it.
//!
//! The crate never owns document memory. Encoders, readers, writers and
//! views all borrow caller-supplied byte buffers, and parsed string values
//! are views into the input they came from. Conversion between any two
//! formats is a single pass over a shared event stream with auxiliary
//! state bounded by nesting depth.
//!
//! ## Quick start
//!
//! Build a document with the fluent [`Encoder`] and look entries up
//! through the read-only [`Dto`] view:
//!
//! ```rust
//! use dtokit::{Dto, Encoder, Tag};
//!
//! let mut buffer = [0u8; 256];
//! Encoder::new(&mut buffer)
//!     .key("a").int32(1)
//!     .key("b").double(2.32)
//!     .key("c").string("hello world")
//!     .key("items").begin_sequence()
//!         .int32(10)
//!         .int32(20)
//!         .end()
//!     .end();
//!
//! let dto = Dto::new(&buffer);
//! assert_eq!(dto.find("a").unwrap().to_int32(), 1);
//! assert_eq!(dto.find("c").unwrap().to_str(), "hello world");
//! assert_eq!(dto.find("items").unwrap().tag(), Tag::Sequence);
//! assert_eq!(dto.find_descendant("items.1").unwrap().to_int32(), 20);
//! ```
//!
//! ## Converting between formats
//!
//! Readers pull structural [`Event`]s out of a document; writers consume
//! them. [`convert`] pumps any reader into any writer:
//!
//! ```rust
//! use dtokit::{convert, BinaryReader, BinaryWriter, Dto, JsonReader, JsonWriter};
//!
//! // JSON text -> canonical binary.
//! let mut document = [0u8; 256];
//! let mut reader = JsonReader::new(br#"{"a":[-123,-1],"b":true}"#);
//! let mut writer = BinaryWriter::new(&mut document);
//! convert(&mut reader, &mut writer).unwrap();
//!
//! let dto = Dto::new(&document);
//! assert_eq!(dto.find_descendant("a.0").unwrap().to_int32(), -123);
//! assert!(dto.find("b").unwrap().to_bool());
//!
//! // ...and back out as compact JSON.
//! let mut json = [0u8; 256];
//! let written = convert(
//!     &mut BinaryReader::new(&document),
//!     &mut JsonWriter::new(&mut json),
//! ).unwrap();
//! assert_eq!(&json[..written - 1], br#"{"a":[-123,-1],"b":true}"#);
//! ```
//!
//! ## Wire format
//!
//! A document is a key-value composite with no tag and no key:
//! `[length: i32 LE][entries...][0x00]`, where `length` includes the
//! length field itself and the terminating End byte — the empty document
//! is exactly 5 bytes. Every nested composite repeats that frame, so
//! readers and the [`DtoIter`] cursor skip whole subtrees in O(1).
//! Sequence entries store their zero-based index in decimal as the key,
//! which makes maps and sequences byte-compatible on the wire.
//!
//! ## Errors
//!
//! Buffer overflow, malformed binary and mistyped accessors are
//! programming errors and panic. Syntax errors in JSON or YAML input are
//! recoverable: the reader reports a `error: <line>:<col> : <detail>`
//! diagnostic through the process-wide handler (see
//! [`set_error_handler`]; the default sink is [`log::error!`]) and
//! [`convert`] returns [`Error::Syntax`].

mod binary;
mod buffer;
mod convert;
mod document;
mod error;
mod json;
mod tag;
mod token;
mod value;
mod yaml;

pub use binary::*;
pub use buffer::*;
pub use convert::*;
pub use document::*;
pub use error::*;
pub use json::*;
pub use tag::*;
pub use token::*;
pub use value::*;
pub use yaml::*;
