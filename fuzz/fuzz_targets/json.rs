#![no_main]

use dtokit::{convert, BinaryReader, BinaryWriter, JsonReader, JsonWriter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    // Worst-case expansion of one JSON byte into a binary entry is well
    // under 16x; syntax errors must come back as Err, never a panic.
    let mut document = vec![0u8; data.len() * 16 + 64];
    let mut reader = JsonReader::new(data);
    let mut writer = BinaryWriter::new(&mut document);
    let Ok(_) = convert(&mut reader, &mut writer) else {
        return;
    };

    // Anything that parsed must re-emit without tripping an assertion.
    let mut json = vec![0u8; document.len() * 4 + 64];
    let mut reader = BinaryReader::new(&document);
    let mut writer = JsonWriter::new(&mut json);
    let written = convert(&mut reader, &mut writer).unwrap();

    let mut copy = vec![0u8; document.len() + 64];
    let mut reader = JsonReader::new(&json[..written]);
    let mut writer = BinaryWriter::new(&mut copy);
    let _ = convert(&mut reader, &mut writer);
});
