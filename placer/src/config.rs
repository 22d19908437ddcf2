use crate::error::{PlacerError, PlacerResult};
use crate::picker::Limits;

/// Per-sample placement parameters shared by every worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_sequence_length: usize,
    pub max_label_length: usize,
    /// Budget for both the candidate draws and the offsets tried per candidate.
    pub num_retries: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
            max_sequence_length: 4,
            max_label_length: 10,
            num_retries: 100,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> PlacerResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PlacerError::invalid_config(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.max_sequence_length == 0 {
            return Err(PlacerError::invalid_config(
                "max sequence length must be at least 1",
            ));
        }
        if self.max_label_length == 0 {
            return Err(PlacerError::invalid_config(
                "max label length must be at least 1",
            ));
        }
        if self.num_retries == 0 {
            return Err(PlacerError::invalid_config("num_retries must be at least 1"));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            max_label_length: self.max_label_length,
        }
    }
}
