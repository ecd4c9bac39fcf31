use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pbzstream::{PbzReader, protobuf::ProtobufCodec};
use prost_reflect::ReflectMessage as _;

#[derive(Args)]
pub struct DumpArgs {
    /// Path to the pbz file
    input: PathBuf,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl DumpArgs {
    pub fn run(self) -> Result<()> {
        let file = File::open(&self.input)?;

        // Progress is measured on compressed bytes consumed.
        let pb = if self.no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(file.metadata()?.len());
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}",
                )?
                .progress_chars("=>-"),
            );
            pb
        };

        let reader = PbzReader::from_reader(pb.wrap_read(file), ProtobufCodec::new())?;
        for message in reader {
            let message = message?;
            pb.println(format!(
                "[{}] {:?}",
                message.descriptor().full_name(),
                message
            ));
        }
        pb.finish_and_clear();
        Ok(())
    }
}
