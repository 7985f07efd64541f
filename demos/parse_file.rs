//! Parse a CSV file and print the records
//!
//! Usage: cargo run --example parse_file -- data.csv

use csvstream::RecordReader;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data.csv".to_string());

    let mut reader = RecordReader::open(&path)?;

    let mut count = 0u64;
    for record in reader.records() {
        let record = record?;
        if count < 5 {
            println!("Row {}: {:?}", count + 1, record.iter().collect::<Vec<_>>());
        }
        count += 1;
    }

    if let Some(headers) = reader.headers() {
        println!("Headers: {:?}", headers);
    }
    println!("Total records: {}", count);

    Ok(())
}
