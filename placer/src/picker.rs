use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use rand::{Rng, rngs::SmallRng};
use tracing::{debug, trace};

use crate::error::{PlacerError, PlacerResult};
use crate::label::extract_label;

/// A labeled crop drawn from the corpus, alive for one selection attempt.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub label: String,
    pub pixels: RgbImage,
}

impl Candidate {
    pub fn new(label: impl Into<String>, pixels: RgbImage) -> Self {
        Self {
            label: label.into(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Why a drawn corpus entry was not usable. Never surfaced past the retry loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Undecodable,
    NoLabel,
    LabelTooLong,
    TooLarge,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Undecodable => "undecodable image",
            Rejection::NoLabel => "stem has no label",
            Rejection::LabelTooLong => "label too long",
            Rejection::TooLarge => "image larger than canvas",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_label_length: usize,
}

impl Limits {
    pub fn check_label(&self, label: &str) -> Result<(), Rejection> {
        if label.len() > self.max_label_length {
            return Err(Rejection::LabelTooLong);
        }
        Ok(())
    }

    pub fn check_size(&self, width: u32, height: u32) -> Result<(), Rejection> {
        if width > self.canvas_width || height > self.canvas_height {
            return Err(Rejection::TooLarge);
        }
        Ok(())
    }

    pub fn check(&self, candidate: &Candidate) -> Result<(), Rejection> {
        self.check_label(&candidate.label)?;
        self.check_size(candidate.width(), candidate.height())
    }
}

/// Anything a worker can draw random candidates from.
///
/// Shared read-only between workers; all mutable state lives in the caller's rng.
pub trait CandidateSource: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn draw(&self, rng: &mut SmallRng, limits: &Limits) -> Result<Cow<'_, Candidate>, Rejection>;
}

pub fn label_of(path: &Path) -> Option<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(extract_label)
}

pub fn decode(path: &Path) -> PlacerResult<RgbImage> {
    let load = || -> image::ImageResult<RgbImage> {
        Ok(ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgb8())
    };
    load().map_err(|source| PlacerError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Draws paths from the corpus index and decodes them on demand.
pub struct CorpusPicker {
    paths: Vec<PathBuf>,
}

impl CorpusPicker {
    pub fn new(paths: Vec<PathBuf>) -> PlacerResult<Self> {
        if paths.is_empty() {
            return Err(PlacerError::EmptyCorpus);
        }
        Ok(Self { paths })
    }
}

impl CandidateSource for CorpusPicker {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn draw(&self, rng: &mut SmallRng, limits: &Limits) -> Result<Cow<'_, Candidate>, Rejection> {
        let path = &self.paths[rng.random_range(0..self.paths.len())];

        // label first, so rejected stems never pay for a decode
        let label = label_of(path).ok_or(Rejection::NoLabel)?;
        limits.check_label(label)?;

        let pixels = decode(path).map_err(|e| {
            trace!(error = %e, "candidate rejected");
            Rejection::Undecodable
        })?;
        limits.check_size(pixels.width(), pixels.height())?;

        Ok(Cow::Owned(Candidate::new(label, pixels)))
    }
}

/// Corpus decoded once up front. Entries without a label or that fail to
/// decode are dropped while loading; length and size limits still apply per draw.
pub struct PreloadedCorpus {
    items: Vec<Candidate>,
}

impl PreloadedCorpus {
    pub fn from_candidates(items: Vec<Candidate>) -> PlacerResult<Self> {
        if items.is_empty() {
            return Err(PlacerError::EmptyCorpus);
        }
        Ok(Self { items })
    }

    pub fn load(paths: &[PathBuf]) -> PlacerResult<Self> {
        let items = paths
            .iter()
            .filter_map(|path| {
                let Some(label) = label_of(path) else {
                    debug!(path = %path.display(), "skipping file without label");
                    return None;
                };
                match decode(path) {
                    Ok(pixels) => Some(Candidate::new(label, pixels)),
                    Err(e) => {
                        debug!(error = %e, "skipping undecodable file");
                        None
                    }
                }
            })
            .collect();
        Self::from_candidates(items)
    }
}

impl CandidateSource for PreloadedCorpus {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn draw(&self, rng: &mut SmallRng, limits: &Limits) -> Result<Cow<'_, Candidate>, Rejection> {
        let candidate = &self.items[rng.random_range(0..self.items.len())];
        limits.check(candidate)?;
        Ok(Cow::Borrowed(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    fn limits() -> Limits {
        Limits {
            canvas_width: 8,
            canvas_height: 8,
            max_label_length: 3,
        }
    }

    fn tile(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([200, 10, 10]))
    }

    #[test]
    fn limits_reject_long_labels_and_large_images() {
        let l = limits();
        assert_eq!(l.check_label("ABC"), Ok(()));
        assert_eq!(l.check_label("ABCD"), Err(Rejection::LabelTooLong));
        assert_eq!(l.check_size(8, 8), Ok(()));
        assert_eq!(l.check_size(9, 1), Err(Rejection::TooLarge));
        assert_eq!(l.check_size(1, 9), Err(Rejection::TooLarge));
    }

    #[test]
    fn empty_sources_are_refused() {
        assert!(matches!(
            CorpusPicker::new(Vec::new()),
            Err(PlacerError::EmptyCorpus)
        ));
        assert!(matches!(
            PreloadedCorpus::from_candidates(Vec::new()),
            Err(PlacerError::EmptyCorpus)
        ));
    }

    #[test]
    fn preloaded_draw_applies_limits() {
        let corpus = PreloadedCorpus::from_candidates(vec![Candidate::new("AB", tile(4, 4))])
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let got = corpus.draw(&mut rng, &limits()).unwrap();
        assert_eq!(got.label, "AB");
        assert!(matches!(got, Cow::Borrowed(_)));

        let big = PreloadedCorpus::from_candidates(vec![Candidate::new("AB", tile(9, 4))])
            .unwrap();
        assert_eq!(big.draw(&mut rng, &limits()).err(), Some(Rejection::TooLarge));
    }

    #[test]
    fn corpus_picker_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let unlabeled = dir.path().join("plain.png");
        tile(2, 2).save(&unlabeled).unwrap();
        let garbage = dir.path().join("1_XY_2.jpg");
        std::fs::write(&garbage, b"not an image").unwrap();

        let mut rng = SmallRng::seed_from_u64(7);
        let picker = CorpusPicker::new(vec![unlabeled]).unwrap();
        assert_eq!(picker.draw(&mut rng, &limits()).err(), Some(Rejection::NoLabel));

        let picker = CorpusPicker::new(vec![garbage]).unwrap();
        assert_eq!(picker.draw(&mut rng, &limits()).err(), Some(Rejection::Undecodable));
    }

    #[test]
    fn corpus_picker_decodes_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0_AB_1.png");
        tile(3, 2).save(&path).unwrap();

        let picker = CorpusPicker::new(vec![path]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let got = picker.draw(&mut rng, &limits()).unwrap();
        assert_eq!(got.label, "AB");
        assert_eq!((got.width(), got.height()), (3, 2));
        assert_eq!(got.pixels.get_pixel(0, 0), &Rgb([200, 10, 10]));
    }
}
