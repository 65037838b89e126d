use crate::invoker::Table;
use hammer_report::sample_record::{SampleRecord, SAMPLE_HEADER};
use hammer_report::summary::RunSummary;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::{self, AsyncWrite, AsyncWriteExt, BufWriter};

/// Append-only, tab-separated log of a run: preamble, one row per sample,
/// final summary and optional diagnostics.
#[derive(Debug)]
pub struct TimeSeriesLog<W> {
    writer: BufWriter<W>,
}

impl TimeSeriesLog<File> {
    /// Creates (or truncates) the log file at `path`.
    pub async fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;
        Ok(Self::new(file))
    }
}

impl<W: AsyncWrite + Unpin + Send> TimeSeriesLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub async fn write_preamble(&mut self, started_at: &str, settings: &str) -> io::Result<()> {
        let preamble = format!("Run started {started_at}\n\nSettings:\n{settings}\n");
        self.writer.write_all(preamble.as_bytes()).await?;
        self.flush().await
    }

    pub async fn write_header(&mut self) -> io::Result<()> {
        self.write_line(SAMPLE_HEADER).await?;
        self.flush().await
    }

    pub async fn append_sample(&mut self, record: &SampleRecord) -> io::Result<()> {
        self.write_line(&record.to_string()).await?;
        self.flush().await
    }

    pub async fn write_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.writer.write_all(b"\n").await?;
        self.writer.write_all(summary.to_string().as_bytes()).await?;
        self.flush().await
    }

    pub async fn write_diagnostics(&mut self, title: &str, table: &Table) -> io::Result<()> {
        let mut rendered = Vec::new();
        table.dump(&mut rendered)?;
        self.writer
            .write_all(format!("\n{title}:\n").as_bytes())
            .await?;
        self.writer.write_all(&rendered).await?;
        self.flush().await
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_should_contain_header_rows_and_summary_in_order() {
        let mut log = TimeSeriesLog::new(Vec::new());

        log.write_header().await.unwrap();
        log.append_sample(&SampleRecord::new(1.0, 10, 0.001, 0.01, 2, 0.002, 0.004, 0))
            .await
            .unwrap();
        log.write_summary(&RunSummary::new(1.5, 10, 0.001, 2, 0.002, 0))
            .await
            .unwrap();

        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], SAMPLE_HEADER);
        assert_eq!(
            lines[1],
            "1.00\t10\t0.00100000\t0.010000\t2\t0.002000\t0.004000\t0"
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "  Elapsed sec: 1.50");
        assert!(text.ends_with("  Timeouts: 0\n\n"));
    }

    #[tokio::test]
    async fn diagnostics_should_follow_a_titled_blank_line() {
        let mut log = TimeSeriesLog::new(Vec::new());
        let table = Table {
            columns: vec!["a".to_owned(), "b".to_owned()],
            rows: vec![vec!["1".to_owned(), "2".to_owned()]],
        };

        log.write_diagnostics("Diagnostics", &table).await.unwrap();

        assert_eq!(
            String::from_utf8(log.into_inner()).unwrap(),
            "\nDiagnostics:\na\tb\n1\t2\n"
        );
    }

    #[tokio::test]
    async fn created_file_should_be_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.log");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "stale content\n").await.unwrap();

        let mut log = TimeSeriesLog::create(&path).await.unwrap();
        log.write_header().await.unwrap();
        drop(log);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, format!("{SAMPLE_HEADER}\n"));
    }
}
