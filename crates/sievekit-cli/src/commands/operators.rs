use anyhow::Result;
use serde::Serialize;
use sievekit_core::CodecConfig;

use crate::cli::OutputFormat;
use crate::output::{operator_table, print_json};

#[derive(Serialize)]
struct OperatorEntry<'a> {
    name: &'a str,
    token: &'a str,
}

pub fn operators(config: &CodecConfig, format: OutputFormat) -> Result<()> {
    let table = config.operator_table();
    match format {
        OutputFormat::Json => {
            let entries: Vec<OperatorEntry<'_>> = table
                .iter()
                .map(|(name, token)| OperatorEntry { name, token })
                .collect();
            print_json(&entries)?;
        }
        OutputFormat::Table => println!("{}", operator_table(&table)),
    }
    Ok(())
}
