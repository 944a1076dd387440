//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, Write};
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use tracing::debug;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, replacing it in one step.
    ///
    /// Readers never observe a half-written file.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command feeding `stdin`, capturing stdout and stderr.
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &[u8]) -> io::Result<Output>;
}

/// Remote text retrieval abstraction.
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body as text.
    ///
    /// Any transport failure or non-success status is an error message.
    fn fetch_text(&self, url: &str) -> Result<String, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &[u8]) -> io::Result<Output> {
        use std::process::Stdio;

        let mut child = std::process::Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // the child may exit, or fill its output pipes, before reading all input;
        // dropping the handle signals EOF
        let writer = child.stdin.take().map(|mut child_stdin| {
            let input = stdin.to_vec();
            std::thread::spawn(move || match child_stdin.write_all(&input) {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("run_with_stdin: child closed stdin early");
                    Ok(())
                }
                other => other,
            })
        });

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            handle
                .join()
                .map_err(|_| io::Error::other("stdin writer panicked"))??;
        }
        Ok(output)
    }
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, String> {
        debug!("fetch_text: url={}, timeout={:?}", url, self.timeout);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("build http client: {e}"))?;

        let response = client.get(url).send().map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }
        response.text().map_err(|e| format!("read body: {e}"))
    }
}
