use anyhow::Result;
use sievekit_core::CodecConfig;

use crate::cli::{DecodeArgs, OutputFormat};
use crate::config::codec_for;
use crate::output::{filter_table, print_json};

pub fn decode(config: &CodecConfig, args: &DecodeArgs, format: OutputFormat) -> Result<()> {
    let codec = codec_for(config, args.convention.into())?;
    let filter = codec.decode(&args.input)?;

    match format {
        OutputFormat::Json => print_json(&filter)?,
        OutputFormat::Table => println!("{}", filter_table(&filter)),
    }
    Ok(())
}
