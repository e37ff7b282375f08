//! Example: Validate a CSV file against a schema descriptor.
//!
//! Usage:
//!   cargo run --example validate_csv -- <schema.json> <data.csv>

use std::env;
use std::process;

use tablecast::{Schema, Table};

fn main() -> tablecast::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example validate_csv -- <schema.json> <data.csv>");
        process::exit(1);
    }

    let schema = Schema::from_source(&args[1])?;
    let table = Table::new(&args[2], schema);

    let errors = table.validate()?;
    if errors.is_empty() {
        println!("OK: every row casts cleanly");
        return Ok(());
    }

    println!("{} validation error(s):", errors.len());
    for error in &errors {
        let field = error.field.as_deref().unwrap_or("<schema>");
        match &error.value {
            Some(value) => println!("  {}: {} (value: {})", field, error.message, value),
            None => println!("  {}: {}", field, error.message),
        }
    }
    process::exit(1);
}
