use std::borrow::Cow;

use rand::{Rng, rngs::SmallRng};
use tracing::trace;

use crate::config::PlacementConfig;
use crate::geom::Placement;
use crate::picker::{Candidate, CandidateSource, Limits};
use crate::sequence::CommittedEntry;

/// Random first-fit search for free canvas space.
///
/// One acquisition round draws up to `retries` candidates from the source and
/// tries up to `retries` offsets for each, so a round costs at most
/// `retries * retries` trials before it gives up.
pub struct PlacementEngine<'a, S> {
    source: &'a S,
    limits: Limits,
    retries: usize,
}

impl<'a, S: CandidateSource> PlacementEngine<'a, S> {
    pub fn new(source: &'a S, cfg: &PlacementConfig) -> Self {
        Self {
            source,
            limits: cfg.limits(),
            retries: cfg.num_retries,
        }
    }

    /// Try uniform offsets for a `width x height` block and return the first
    /// one disjoint from everything already committed.
    pub fn find_offset(
        &self,
        rng: &mut SmallRng,
        width: u32,
        height: u32,
        committed: &[CommittedEntry],
    ) -> Option<Placement> {
        // a block larger than the canvas has no offset at all
        let max_dx = self.limits.canvas_width.checked_sub(width)?;
        let max_dy = self.limits.canvas_height.checked_sub(height)?;
        for _ in 0..self.retries {
            let dx = rng.random_range(0..=max_dx);
            let dy = rng.random_range(0..=max_dy);
            let rect = Placement::new(dx, dy, width, height);
            if committed.iter().all(|e| e.placement.is_disjoint(&rect)) {
                return Some(rect);
            }
        }
        None
    }

    /// One label-acquisition round. `None` means the round is exhausted.
    pub fn acquire(
        &self,
        rng: &mut SmallRng,
        committed: &[CommittedEntry],
    ) -> Option<(Cow<'a, Candidate>, Placement)> {
        for _ in 0..self.retries {
            let candidate = match self.source.draw(rng, &self.limits) {
                Ok(c) => c,
                Err(reason) => {
                    trace!(%reason, "candidate rejected");
                    continue;
                }
            };
            match self.find_offset(rng, candidate.width(), candidate.height(), committed) {
                Some(placement) => return Some((candidate, placement)),
                None => trace!(label = %candidate.label, "no free offset"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::PreloadedCorpus;
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;

    fn corpus(items: &[(&str, u32, u32)]) -> PreloadedCorpus {
        let items = items
            .iter()
            .map(|&(label, w, h)| Candidate::new(label, RgbImage::from_pixel(w, h, Rgb([1, 2, 3]))))
            .collect();
        PreloadedCorpus::from_candidates(items).unwrap()
    }

    fn cfg(w: u32, h: u32, retries: usize) -> PlacementConfig {
        PlacementConfig {
            canvas_width: w,
            canvas_height: h,
            max_sequence_length: 4,
            max_label_length: 10,
            num_retries: retries,
        }
    }

    fn entry(label: &str, p: Placement) -> CommittedEntry {
        CommittedEntry {
            label: label.to_string(),
            placement: p,
        }
    }

    #[test]
    fn offset_stays_inside_canvas() {
        let src = corpus(&[("A", 3, 2)]);
        let engine = PlacementEngine::new(&src, &cfg(10, 7, 5));
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = engine.find_offset(&mut rng, 3, 2, &[]).unwrap();
            assert!(p.fits_within(10, 7));
            assert_eq!((p.width(), p.height()), (3, 2));
        }
    }

    #[test]
    fn exact_fit_has_single_offset() {
        let src = corpus(&[("A", 10, 10)]);
        let engine = PlacementEngine::new(&src, &cfg(10, 10, 1));
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            engine.find_offset(&mut rng, 10, 10, &[]),
            Some(Placement::new(0, 0, 10, 10))
        );
    }

    #[test]
    fn oversized_block_has_no_offset() {
        let src = corpus(&[("A", 1, 1)]);
        let engine = PlacementEngine::new(&src, &cfg(10, 10, 3));
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(engine.find_offset(&mut rng, 11, 1, &[]), None);
        assert_eq!(engine.find_offset(&mut rng, 1, 11, &[]), None);
    }

    #[test]
    fn full_canvas_leaves_no_room() {
        let src = corpus(&[("A", 4, 4)]);
        let engine = PlacementEngine::new(&src, &cfg(4, 4, 20));
        let taken = [entry("A", Placement::new(0, 0, 4, 4))];
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(engine.find_offset(&mut rng, 1, 1, &taken), None);
        assert!(engine.acquire(&mut rng, &taken).is_none());
    }

    #[test]
    fn result_avoids_committed_rects() {
        let src = corpus(&[("A", 2, 2)]);
        let engine = PlacementEngine::new(&src, &cfg(6, 2, 50));
        let taken = [entry("L", Placement::new(0, 0, 2, 2)), entry("R", Placement::new(4, 0, 2, 2))];
        let mut rng = SmallRng::seed_from_u64(9);
        let (candidate, p) = engine.acquire(&mut rng, &taken).unwrap();
        assert_eq!(candidate.label, "A");
        assert!(taken.iter().all(|e| e.placement.is_disjoint(&p)));
    }

    #[test]
    fn oversized_corpus_exhausts_round() {
        let src = corpus(&[("A", 11, 1)]);
        let engine = PlacementEngine::new(&src, &cfg(10, 10, 8));
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(engine.acquire(&mut rng, &[]).is_none());
    }
}
