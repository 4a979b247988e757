//! PDF compilation with an external `pdflatex`-compatible binary.
//!
//! Each run gets its own temporary directory, removed when the run ends
//! whichever way it ends. The child is killed if the timeout fires.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AppError;

const JOB_NAME: &str = "resume";
/// Compiler log lines carried in a `Render` error.
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    bin: String,
    timeout: Duration,
}

impl LatexCompiler {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    /// Compiles `latex` and returns the PDF bytes.
    pub async fn compile_pdf(&self, latex: &str) -> Result<Vec<u8>, AppError> {
        let workdir = tempfile::Builder::new()
            .prefix("resume-render-")
            .tempdir()
            .map_err(|e| AppError::Render(format!("could not create work directory: {e}")))?;
        let tex_path = workdir.path().join(format!("{JOB_NAME}.tex"));

        tokio::fs::write(&tex_path, latex)
            .await
            .map_err(|e| AppError::Render(format!("could not write {}: {e}", tex_path.display())))?;

        let child = Command::new(&self.bin)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(format!("-jobname={JOB_NAME}"))
            .arg(&tex_path)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Render(format!("could not start '{}': {e}", self.bin)))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| AppError::Render(format!("'{}' failed to run: {e}", self.bin)))?
            }
            Err(_) => {
                warn!("LaTeX compilation exceeded {:?}; compiler killed", self.timeout);
                return Err(AppError::Render(format!(
                    "compilation timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let tail = log_tail(workdir.path(), &output.stdout).await;
            return Err(AppError::Render(format!(
                "'{}' exited with {}:\n{tail}",
                self.bin, output.status
            )));
        }

        let pdf_path = workdir.path().join(format!("{JOB_NAME}.pdf"));
        let pdf = tokio::fs::read(&pdf_path).await.map_err(|_| {
            AppError::Render(format!("'{}' succeeded but produced no PDF", self.bin))
        })?;

        info!("Compiled PDF ({} bytes)", pdf.len());
        debug!("render work directory {} removed", workdir.path().display());
        Ok(pdf)
    }
}

/// Last lines of the compiler's log file, or of its stdout when there is no log.
async fn log_tail(workdir: &Path, stdout: &[u8]) -> String {
    let log = tokio::fs::read(workdir.join(format!("{JOB_NAME}.log")))
        .await
        .unwrap_or_else(|_| stdout.to_vec());
    tail_lines(&String::from_utf8_lossy(&log), LOG_TAIL_LINES)
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_lines_keeps_last_n() {
        let text = (1..=30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let tail = tail_lines(&text, 3);
        assert_eq!(tail, "line 28\nline 29\nline 30");
        assert_eq!(tail_lines("only", 5), "only");
    }

    #[tokio::test]
    async fn test_missing_compiler_is_render_error() {
        let compiler = LatexCompiler::new("definitely-not-a-latex-binary", Duration::from_secs(5));
        let err = compiler.compile_pdf(r"\documentclass{article}").await.unwrap_err();
        assert!(matches!(err, AppError::Render(msg) if msg.contains("could not start")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_compiler_is_reported() {
        let compiler = LatexCompiler::new("false", Duration::from_secs(5));
        let err = compiler.compile_pdf(r"\documentclass{article}").await.unwrap_err();
        assert!(matches!(err, AppError::Render(msg) if msg.contains("exited with")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_pdf_is_reported() {
        let compiler = LatexCompiler::new("true", Duration::from_secs(5));
        let err = compiler.compile_pdf(r"\documentclass{article}").await.unwrap_err();
        assert!(matches!(err, AppError::Render(msg) if msg.contains("produced no PDF")));
    }
}
