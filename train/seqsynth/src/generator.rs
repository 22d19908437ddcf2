use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use placer::{CandidateSource, CorpusPicker, PreloadedCorpus, RunSummary, Scheduler};
use tracing::info;

use crate::{config::SynthCfg, corpus, io::OutputWriter};

pub struct DatasetGenerator {
    pub config: SynthCfg,
}

impl DatasetGenerator {
    pub fn new(config: SynthCfg) -> Self {
        Self { config }
    }

    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let paths = corpus::enumerate(&self.config.input_dir);
        info!(
            files = paths.len(),
            root = %self.config.input_dir.display(),
            "corpus indexed"
        );

        let scheduler = Scheduler::new(self.config.workers, self.config.seed)?;
        let mut output = OutputWriter::init(
            &self.config.out_dir,
            self.config.jpeg_quality,
            self.config.manifest,
        )?;
        let progress = progress_bar(scheduler.planned(self.config.num_data))?;

        let summary = if self.config.preload {
            let corpus = PreloadedCorpus::load(&paths).context("preload corpus")?;
            info!(usable = corpus.len(), "corpus preloaded");
            self.generate(&scheduler, &corpus, &output, &progress)?
        } else {
            let corpus = CorpusPicker::new(paths)
                .with_context(|| format!("index '{}'", self.config.input_dir.display()))?;
            self.generate(&scheduler, &corpus, &output, &progress)?
        };

        progress.finish();
        output.finalize()?;
        Ok(summary)
    }

    fn generate<S: CandidateSource>(
        &self,
        scheduler: &Scheduler,
        source: &S,
        output: &OutputWriter,
        progress: &ProgressBar,
    ) -> anyhow::Result<RunSummary> {
        scheduler.run(
            source,
            &self.config.placement,
            self.config.num_data,
            |sample| output.write_sample(sample),
            || progress.inc(1),
        )
    }
}

fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} images ({percent}%) eta {eta}")?
            .progress_chars("█▓░"),
    );
    Ok(bar)
}
