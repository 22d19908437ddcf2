use std::path::PathBuf;

use anyhow::{Context, ensure};
use clap::Parser;
use placer::PlacementConfig;

#[derive(Parser, Debug)]
#[command(
    name = "seqsynth",
    version,
    about = "Compose labeled word crops into multi-label training images"
)]
pub struct Args {
    /// Root of the labeled crops (`prefix_LABEL_suffix.jpg`), searched recursively.
    #[arg(long = "input_directory")]
    pub input_directory: PathBuf,

    /// Existing directory the generated images are written to.
    #[arg(long = "output_directory")]
    pub output_directory: PathBuf,

    #[arg(long = "image_width", default_value_t = 256)]
    pub image_width: u32,

    #[arg(long = "image_height", default_value_t = 256)]
    pub image_height: u32,

    /// Max labels per image, then max characters per label.
    #[arg(
        long = "sequence_lengths",
        num_args = 2,
        value_names = ["MAX_SEQUENCE", "MAX_LABEL"],
        default_values_t = [4, 10]
    )]
    pub sequence_lengths: Vec<usize>,

    /// Number of images requested. Rounded down to a multiple of the worker count.
    #[arg(long = "num_data", default_value_t = 1_000_000)]
    pub num_data: u64,

    /// Candidate draws per label, and offsets tried per candidate.
    #[arg(long = "num_retries", default_value_t = 100)]
    pub num_retries: usize,

    /// Global seed. Random when omitted; the value used is logged.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to the number of logical CPUs).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Also write `labels.jsonl` with labels and boxes per image.
    #[arg(long, default_value_t = false)]
    pub manifest: bool,

    /// Decode the whole corpus into memory once instead of per draw.
    #[arg(long, default_value_t = false)]
    pub preload: bool,

    #[arg(
        long = "jpeg_quality",
        default_value_t = 75,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct SynthCfg {
    pub input_dir: PathBuf,
    pub out_dir: PathBuf,
    pub placement: PlacementConfig,
    pub num_data: u64,
    pub workers: usize,
    pub seed: u64,
    pub manifest: bool,
    pub preload: bool,
    pub jpeg_quality: u8,
}

impl TryFrom<Args> for SynthCfg {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> anyhow::Result<Self> {
        let [max_sequence_length, max_label_length] = <[usize; 2]>::try_from(args.sequence_lengths)
            .map_err(|v| anyhow::anyhow!("sequence_lengths takes exactly two values, got {v:?}"))?;

        let placement = PlacementConfig {
            canvas_width: args.image_width,
            canvas_height: args.image_height,
            max_sequence_length,
            max_label_length,
            num_retries: args.num_retries,
        };
        placement.validate()?;

        let workers = args.threads.unwrap_or_else(num_cpus::get);
        ensure!(workers >= 1, "threads must be at least 1");

        ensure!(
            args.input_directory.is_dir(),
            "input directory '{}' does not exist or is not a directory",
            args.input_directory.display()
        );
        ensure!(
            args.output_directory.is_dir(),
            "output directory '{}' does not exist or is not a directory",
            args.output_directory.display()
        );
        std::fs::read_dir(&args.input_directory)
            .with_context(|| format!("read input directory '{}'", args.input_directory.display()))?;

        Ok(Self {
            input_dir: args.input_directory,
            out_dir: args.output_directory,
            placement,
            num_data: args.num_data,
            workers,
            seed: args.seed.unwrap_or_else(rand::random),
            manifest: args.manifest,
            preload: args.preload,
            jpeg_quality: args.jpeg_quality,
        })
    }
}
