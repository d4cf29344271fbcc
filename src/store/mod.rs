//! Writes fetched rate responses to JSON artifacts on disk.

use crate::core::{Period, RateRequest, RateResponse};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ArtifactStore {
    data_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File name for a request: `<FROM>_<TO>_<date>.json`, or
    /// `<FROM>_<TO>_<start>_<end>.json` for a range.
    pub fn artifact_name(request: &RateRequest) -> String {
        match request.period {
            Period::Single(date) => format!(
                "{}_{}_{}.json",
                request.from_currency, request.to_currency, date
            ),
            Period::Range { start, end } => format!(
                "{}_{}_{}_{}.json",
                request.from_currency, request.to_currency, start, end
            ),
        }
    }

    /// Saves the responses for a request, replacing any earlier artifact.
    ///
    /// A single date is written as the bare response object, a range as an
    /// array in date order.
    pub fn persist(&self, request: &RateRequest, responses: &[RateResponse]) -> Result<PathBuf> {
        if responses.len() != request.dates.len() {
            bail!(
                "Expected {} responses for {}, got {}",
                request.dates.len(),
                request.period,
                responses.len()
            );
        }

        let destination = self.data_dir.join(Self::artifact_name(request));
        match (request.period, responses) {
            (Period::Single(_), [response]) => self.write_json(&destination, response)?,
            _ => self.write_json(&destination, &responses)?,
        }

        debug!(path = %destination.display(), "Saved artifact");
        Ok(destination)
    }

    fn write_json<T: Serialize + ?Sized>(&self, destination: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create directory: {}", self.data_dir.display())
        })?;

        let file = File::create(destination)
            .with_context(|| format!("Failed to create artifact: {}", destination.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("Failed to write artifact: {}", destination.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write artifact: {}", destination.display()))
    }
}
