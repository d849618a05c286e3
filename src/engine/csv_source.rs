use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error};

use crate::models::RawRow;

/// Reads an exported sales CSV into raw rows for the coordinator.
pub struct CsvSource {
    backpressure: usize
}

impl CsvSource {
    pub fn new() -> Self {
        Self {
            backpressure: 256
        }
    }

    /// Streams the file's records off a blocking reader task and collects them in order.
    ///
    /// Records the CSV parser cannot read are logged and skipped; judging the content of a row
    /// is left to the validator.
    pub async fn read(&self, path: &str) -> anyhow::Result<Vec<RawRow>> {
        let (sender, mut receiver) = mpsc::channel::<RawRow>(self.backpressure);
        let reader_handle = self.spawn_csv_reader(path.to_string(), sender);

        let mut rows = Vec::new();

        while let Some(row) = receiver.recv().await {
            rows.push(row);
        }

        reader_handle.await.context("CSV reader task did not finish")??;

        debug!("Read {} rows from {path}", rows.len());

        Ok(rows)
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<RawRow>) -> JoinHandle<anyhow::Result<()>> {
        spawn_blocking(move || {
            let file = File::open(&path).with_context(|| format!("Error opening CSV at path: {path}"))?;

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            let headers = reader.headers()
                .with_context(|| format!("Error reading CSV header at path: {path}"))?
                .clone();

            //NOTE: Short rows keep only the columns they have so the validator can name what is missing.
            for (index, result) in reader.records().enumerate() {
                match result {
                    Ok(record) => {
                        let row: RawRow = headers.iter().zip(record.iter()).collect();

                        if sender.blocking_send(row).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV record {} could not be read: {error}", index + 1);
                    }
                }
            }

            Ok(())
        })
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}
