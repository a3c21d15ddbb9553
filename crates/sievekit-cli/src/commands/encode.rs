use anyhow::Result;
use sievekit_core::{CodecConfig, ExtraParameters, Filter};

use crate::cli::EncodeArgs;
use crate::commands::read_json;
use crate::config::codec_for;

pub fn encode(config: &CodecConfig, args: &EncodeArgs) -> Result<()> {
    let filter: Filter = read_json(args.file.as_deref())?;
    println!("{}", encode_filter(config, args, &filter)?);
    Ok(())
}

fn encode_filter(config: &CodecConfig, args: &EncodeArgs, filter: &Filter) -> Result<String> {
    let codec = codec_for(config, args.convention.into())?;
    let extra: ExtraParameters = args
        .extra
        .iter()
        .map(|(key, value)| (key.clone(), Some(value.clone())))
        .collect();

    tracing::debug!(
        convention = %codec.convention(),
        extra = extra.len(),
        "Encoding filter"
    );
    let extra = (!extra.is_empty()).then_some(&extra);
    Ok(codec.encode(filter, extra))
}
