//! Push-based parsing with arbitrary chunk boundaries
//!
//! Feeds the same input in chunks of different sizes to show that the
//! record output is identical regardless of where the bytes are split.

use csvstream::{CsvParser, Record};
use std::error::Error;

const INPUT: &[u8] = b"id,name,note\n1,alice,\"likes, commas\"\n2,bob,\"says \"\"hi\"\"\"\n3,carol,last line has no newline";

fn parse_in_chunks(chunk_size: usize) -> Result<Vec<Record>, Box<dyn Error>> {
    let mut parser = CsvParser::default();
    let mut records = vec![];

    for chunk in INPUT.chunks(chunk_size) {
        parser.push(chunk, |r| records.push(r))?;
    }
    parser.finish(|r| records.push(r))?;

    Ok(records)
}

fn main() -> Result<(), Box<dyn Error>> {
    let whole = parse_in_chunks(INPUT.len())?;
    println!("Parsed {} records from one chunk:", whole.len());
    for record in &whole {
        println!("  {:?}", record.iter().collect::<Vec<_>>());
    }

    for chunk_size in [1, 3, 7, 16] {
        let split = parse_in_chunks(chunk_size)?;
        let same = split == whole;
        println!("chunk size {:2}: identical output = {}", chunk_size, same);
        assert!(same);
    }

    Ok(())
}
