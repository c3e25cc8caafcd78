//! Issued-identifier history backed by a newline-delimited file.
//!
//! One identifier per line. Blank lines and surrounding whitespace are
//! ignored, so an append-only log written by the link store can be pointed at
//! directly. A line that is not valid UTF-8 is counted but streamed as an
//! error, so warm-up skips it and keeps reading.

use burrow_tonic_core::burrow::{Error, HistorySource, Result};
use futures::stream::{BoxStream, StreamExt};
use core::fmt;
use std::path::{Path, PathBuf};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};
use tokio_stream::wrappers::SplitStream;

#[derive(Clone, Debug)]
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn lines(&self) -> Result<SplitStream<BufReader<File>>> {
        let file = File::open(&self.path).await.map_err(|e| self.query_error(e))?;
        Ok(SplitStream::new(BufReader::new(file).split(b'\n')))
    }

    fn query_error(&self, e: impl fmt::Display) -> Error {
        Error::WarmupQuery {
            reason: format!("{}: {e}", self.path.display()),
        }
    }
}

impl HistorySource for FileHistory {
    async fn count(&self) -> Result<u64> {
        let mut lines = self.lines().await?;
        let mut count = 0;
        while let Some(line) = lines.next().await {
            if !line.map_err(|e| self.query_error(e))?.trim_ascii().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn stream(&self) -> Result<BoxStream<'_, Result<String>>> {
        let lines = self.lines().await?;
        Ok(lines
            .filter_map(move |line| async move {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => return Some(Err(self.query_error(e))),
                };
                let id = line.trim_ascii();
                if id.is_empty() {
                    return None;
                }
                Some(
                    core::str::from_utf8(id)
                        .map(str::to_string)
                        .map_err(|e| self.query_error(e)),
                )
            })
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_tonic_core::burrow::{Factory, FactoryConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn history_file(contents: impl AsRef<[u8]>) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_ref()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn counts_and_streams_non_blank_lines() {
        let file = history_file("aZ3_x9Q\n\n  0-0-0-0  \nQQQQQQQ\n");
        let history = FileHistory::new(file.path());

        assert_eq!(history.count().await.unwrap(), 3);
        let ids: Vec<String> = history
            .stream()
            .await
            .unwrap()
            .map(|row| row.unwrap())
            .collect()
            .await;
        assert_eq!(ids, ["aZ3_x9Q", "0-0-0-0", "QQQQQQQ"]);
    }

    #[tokio::test]
    async fn undecodable_lines_do_not_hide_the_rest() {
        let file = history_file(b"abcdefg\n\xff\xfe\nhijklmn\n");
        let history = FileHistory::new(file.path());

        assert_eq!(history.count().await.unwrap(), 3);
        let rows: Vec<Result<String>> = history.stream().await.unwrap().collect().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].as_deref(), Ok("abcdefg"));
        assert!(matches!(rows[1], Err(Error::WarmupQuery { .. })));
        assert_eq!(rows[2].as_deref(), Ok("hijklmn"));

        let factory = small_factory();
        let report = factory.prepare(&history).await;
        assert_eq!(report.expected, 3);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 1);
        assert!(!report.degraded);
        assert!(factory.filter().exists("abcdefg"));
        assert!(factory.filter().exists("hijklmn"));
    }

    #[tokio::test]
    async fn missing_file_is_a_query_error() {
        let history = FileHistory::new("/nonexistent/burrow/history.txt");
        assert!(matches!(
            history.count().await,
            Err(Error::WarmupQuery { .. })
        ));
        assert!(history.stream().await.is_err());
    }

    fn small_factory() -> Factory {
        Factory::new(FactoryConfig {
            filter_capacity: 1_000,
            ..FactoryConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn seeds_a_factory() {
        let file = history_file("abcdefg\nhijklmn\n");
        let factory = small_factory();

        let report = factory.prepare(&FileHistory::new(file.path())).await;
        assert_eq!(report.expected, 2);
        assert_eq!(report.loaded, 2);
        assert!(!report.degraded);
        assert!(factory.filter().exists("abcdefg"));
        assert!(factory.filter().exists("hijklmn"));
    }

    #[tokio::test]
    async fn missing_file_degrades_warmup() {
        let factory = small_factory();
        let report = factory
            .prepare(&FileHistory::new("/nonexistent/burrow/history.txt"))
            .await;
        assert!(report.degraded);
        assert!(factory.filter().is_empty());
    }
}
