use std::{
    fs::File,
    io::{BufWriter, IntoInnerError, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, anyhow};
use image::{RgbImage, codecs::jpeg::JpegEncoder};
use placer::OutputSample;

use crate::record::JsonRecord;

pub const MANIFEST_FILE: &str = "labels.jsonl";

/// Writes finished samples into the output directory. Shared by all workers.
pub struct OutputWriter {
    out_dir: PathBuf,
    jpeg_quality: u8,
    manifest: Option<Mutex<BufWriter<File>>>,
}

impl OutputWriter {
    pub fn init(out_dir: &Path, jpeg_quality: u8, with_manifest: bool) -> anyhow::Result<Self> {
        let manifest = if with_manifest {
            let path = out_dir.join(MANIFEST_FILE);
            let file = File::create(&path)
                .with_context(|| format!("create manifest '{}'", path.display()))?;
            Some(Mutex::new(BufWriter::with_capacity(8 << 20, file)))
        } else {
            None
        };
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            jpeg_quality,
            manifest,
        })
    }

    pub fn write_sample(&self, sample: OutputSample) -> anyhow::Result<()> {
        let file_name = sample.file_name();
        self.save_jpeg(sample.canvas.as_image(), &file_name)?;

        if let Some(manifest) = &self.manifest {
            let json = serde_json::to_string(&JsonRecord::new(&sample, &file_name))?;
            let mut writer = manifest
                .lock()
                .map_err(|_| anyhow!("manifest writer poisoned"))?;
            writeln!(writer, "{json}").context("append to manifest")?;
        }
        Ok(())
    }

    fn save_jpeg(&self, img: &RgbImage, file_name: &str) -> anyhow::Result<()> {
        let path = self.out_dir.join(file_name);
        let file = File::create(&path).with_context(|| format!("create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality)
            .encode_image(img)
            .with_context(|| format!("encode '{}'", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("write '{}'", path.display()))
    }

    pub fn finalize(&mut self) -> anyhow::Result<()> {
        if let Some(manifest) = self.manifest.take() {
            let writer = manifest
                .into_inner()
                .map_err(|_| anyhow!("manifest writer poisoned"))?;
            writer
                .into_inner()
                .map_err(IntoInnerError::into_error)?
                .sync_all()
                .context("sync manifest")?;
        }
        Ok(())
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}
