#![no_main]
use jsontap::StreamingParser;
use libfuzzer_sys::fuzz_target;

const HEADER: usize = 4; // 4-byte split seed

fn parser(data: &[u8]) {
    if data.len() <= HEADER {
        return;
    }

    let split_seed = u32::from_le_bytes(data[..HEADER].try_into().unwrap()) as u64;
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();
    if text.is_empty() {
        return;
    }

    // Use the seed to split the input into chunks; the parser must never
    // panic, only return errors, however the text is partitioned.
    let chunks = split_into_safe_chunks(&text, split_seed);
    let mut parser = StreamingParser::new();
    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter().enumerate() {
        for event in parser.write(chunk, i == last) {
            if event.is_err() {
                return;
            }
        }
    }
}

fuzz_target!(|data: &[u8]| parser(data));

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic random
/// value to generate splits.
///
/// * `split_seed` may be any `u64`.
/// * Each chunk is at least one byte.
/// * Every slice ends on a valid UTF-8 boundary, so it can't panic.
fn split_into_safe_chunks(serialized: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = serialized.len();

    while start < len {
        let remaining = len - start;

        // Derive a candidate size from the fixed seed.
        let mut size = (split_seed as usize % remaining) + 1;

        // Bump `size` forward until it lands on a char boundary
        // (or hits the end of the string, which is always a boundary).
        while start + size < len && !serialized.is_char_boundary(start + size) {
            size += 1;
        }

        chunks.push(&serialized[start..start + size]);
        start += size;
    }

    chunks
}
