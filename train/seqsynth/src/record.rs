use placer::{OutputSample, Placement};
use serde::Serialize;

/// One line of `labels.jsonl`.
#[derive(Serialize, Debug)]
pub struct JsonRecord<'a> {
    pub schema: &'static str,
    pub image: &'a str,
    pub index: u64,
    pub target: usize,
    pub labels: Vec<&'a str>,
    pub boxes: Vec<Placement>,
}

impl<'a> JsonRecord<'a> {
    pub fn new(sample: &'a OutputSample, image: &'a str) -> Self {
        Self {
            schema: "v1",
            image,
            index: sample.index,
            target: sample.target,
            labels: sample.labels().collect(),
            boxes: sample.entries.iter().map(|e| e.placement).collect(),
        }
    }
}
