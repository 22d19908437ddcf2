//! Random non-overlapping placement of labeled crops onto fixed-size canvases,
//! used to synthesize sequence-recognition training images.

pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod geom;
pub mod label;
pub mod picker;
pub mod scheduler;
pub mod sequence;

pub use canvas::Canvas;
pub use config::PlacementConfig;
pub use error::{PlacerError, PlacerResult};
pub use geom::Placement;
pub use picker::{Candidate, CandidateSource, CorpusPicker, Limits, PreloadedCorpus, Rejection};
pub use scheduler::{RunSummary, Scheduler};
pub use sequence::{CommittedEntry, OutputSample, SequenceBuilder};
