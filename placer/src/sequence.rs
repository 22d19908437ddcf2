use rand::{Rng, rngs::SmallRng};
use serde::Serialize;
use tracing::debug;

use crate::canvas::Canvas;
use crate::config::PlacementConfig;
use crate::engine::PlacementEngine;
use crate::error::PlacerResult;
use crate::geom::Placement;
use crate::picker::CandidateSource;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommittedEntry {
    pub label: String,
    pub placement: Placement,
}

/// A finalized sample: entries are already in reading order.
#[derive(Debug)]
pub struct OutputSample {
    pub index: u64,
    pub target: usize,
    pub entries: Vec<CommittedEntry>,
    pub canvas: Canvas,
}

impl OutputSample {
    /// `<index>_<label_1>_..._<label_k>`, or just `<index>` when nothing was placed.
    pub fn stem(&self) -> String {
        self.entries
            .iter()
            .fold(self.index.to_string(), |mut acc, e| {
                acc.push('_');
                acc.push_str(&e.label);
                acc
            })
    }

    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.stem())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Finalized early because an acquisition round was exhausted.
    pub fn is_short(&self) -> bool {
        self.entries.len() < self.target
    }
}

/// Top-to-bottom, then left-to-right.
pub fn sort_reading_order(entries: &mut [CommittedEntry]) {
    entries.sort_by_key(|e| (e.placement.y_min, e.placement.x_min));
}

pub struct SequenceBuilder<'a, S> {
    engine: PlacementEngine<'a, S>,
    cfg: PlacementConfig,
}

impl<'a, S: CandidateSource> SequenceBuilder<'a, S> {
    pub fn new(source: &'a S, cfg: &PlacementConfig) -> PlacerResult<Self> {
        cfg.validate()?;
        Ok(Self {
            engine: PlacementEngine::new(source, cfg),
            cfg: *cfg,
        })
    }

    pub fn build(&self, index: u64, rng: &mut SmallRng) -> OutputSample {
        let target = rng.random_range(1..=self.cfg.max_sequence_length);
        self.build_with_target(index, target, rng)
    }

    /// Acquire labels until `target` are placed or a round comes back empty,
    /// in which case the sample keeps whatever it has so far.
    pub fn build_with_target(&self, index: u64, target: usize, rng: &mut SmallRng) -> OutputSample {
        let mut canvas = Canvas::new(self.cfg.canvas_width, self.cfg.canvas_height);
        let mut entries: Vec<CommittedEntry> = Vec::with_capacity(target);

        while entries.len() < target {
            let Some((candidate, placement)) = self.engine.acquire(rng, &entries) else {
                debug!(index, placed = entries.len(), target, "acquisition round exhausted");
                break;
            };
            canvas.commit(&candidate, &placement);
            entries.push(CommittedEntry {
                label: candidate.label.clone(),
                placement,
            });
        }

        sort_reading_order(&mut entries);
        OutputSample {
            index,
            target,
            entries,
            canvas,
        }
    }
}
