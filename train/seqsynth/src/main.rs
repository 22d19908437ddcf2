use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Args, SynthCfg},
    generator::DatasetGenerator,
};

mod config;
mod corpus;
mod generator;
mod io;
mod record;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = SynthCfg::try_from(Args::parse())?;
    info!(
        input = %cfg.input_dir.display(),
        output = %cfg.out_dir.display(),
        width = cfg.placement.canvas_width,
        height = cfg.placement.canvas_height,
        max_sequence = cfg.placement.max_sequence_length,
        max_label = cfg.placement.max_label_length,
        retries = cfg.placement.num_retries,
        num_data = cfg.num_data,
        seed = cfg.seed,
        "starting"
    );

    let summary = DatasetGenerator::new(cfg).run()?;
    info!(
        produced = summary.produced,
        dropped = summary.dropped,
        labels = summary.labels,
        short_samples = summary.short_samples,
        "done"
    );
    Ok(())
}
