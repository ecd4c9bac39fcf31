use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pbzstream::{PbzReader, protobuf::ProtobufCodec};
use prost_reflect::ReflectMessage as _;

#[derive(Args)]
pub struct TypesArgs {
    /// Path to the pbz file
    input: PathBuf,
}

impl TypesArgs {
    pub fn run(self) -> Result<()> {
        let file = File::open(&self.input)?;
        let reader = PbzReader::from_reader(file, ProtobufCodec::new())?;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for message in reader {
            let message = message?;
            *counts
                .entry(message.descriptor().full_name().to_string())
                .or_default() += 1;
        }

        for (name, count) in counts {
            println!("{count:>8}  {name}");
        }
        Ok(())
    }
}
