//! Helpers shared by the integration tests.

#![allow(dead_code)]

use dtokit::{
    convert, BinaryReader, BinaryWriter, Dto, JsonReader, JsonWriter, Result, YamlReader,
    YamlWriter,
};

/// Parses JSON text into a binary document built in `buffer`.
pub fn json_to_dto<'buf>(json: &str, buffer: &'buf mut [u8]) -> Result<Dto<'buf>> {
    let mut reader = JsonReader::new(json.as_bytes());
    let mut writer = BinaryWriter::new(&mut *buffer);
    convert(&mut reader, &mut writer)?;
    Ok(Dto::new(buffer))
}

/// Parses YAML text into a binary document built in `buffer`.
pub fn yaml_to_dto<'buf>(yaml: &str, buffer: &'buf mut [u8]) -> Result<Dto<'buf>> {
    let mut reader = YamlReader::new(yaml.as_bytes());
    let mut writer = BinaryWriter::new(&mut *buffer);
    convert(&mut reader, &mut writer)?;
    Ok(Dto::new(buffer))
}

/// Converts a binary document to compact JSON text.
pub fn dto_to_json<'buf>(document: &[u8], buffer: &'buf mut [u8]) -> Result<&'buf str> {
    let mut reader = BinaryReader::new(document);
    let mut writer = JsonWriter::new(&mut *buffer);
    let written = convert(&mut reader, &mut writer)?;
    Ok(std::str::from_utf8(&buffer[..written - 1]).unwrap())
}

/// Converts a binary document to YAML text.
pub fn dto_to_yaml<'buf>(document: &[u8], buffer: &'buf mut [u8]) -> Result<&'buf str> {
    let mut reader = BinaryReader::new(document);
    let mut writer = YamlWriter::new(&mut *buffer);
    let written = convert(&mut reader, &mut writer)?;
    Ok(std::str::from_utf8(&buffer[..written - 1]).unwrap())
}

/// Copies a binary document through the event stream into `buffer`.
pub fn dto_to_dto<'buf>(document: &[u8], buffer: &'buf mut [u8]) -> Result<Dto<'buf>> {
    let mut reader = BinaryReader::new(document);
    let mut writer = BinaryWriter::new(&mut *buffer);
    convert(&mut reader, &mut writer)?;
    Ok(Dto::new(buffer))
}
