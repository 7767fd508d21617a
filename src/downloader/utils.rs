// Child process helpers shared by extractor implementations

use std::process::{ExitStatus, Output, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use crate::downloader::errors::DownloadError;

/// Exit status and captured stderr of a streamed run
#[derive(Debug)]
pub struct StreamedOutput {
    pub status: ExitStatus,
    pub stderr: String,
}

fn spawn_piped(program: &str, args: &[String]) -> Result<tokio::process::Child, DownloadError> {
    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DownloadError::ToolNotFound(program.to_string()),
            _ => DownloadError::ExecutionError(format!("Failed to start {}: {}", program, e)),
        })
}

fn collect_stderr(
    child: &mut tokio::process::Child,
    program: &str,
) -> Result<tokio::task::JoinHandle<Vec<u8>>, DownloadError> {
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::ExecutionError(format!("Failed to capture stderr from {}", program)))?;

    Ok(tokio::spawn(async move {
        let mut buf = Vec::new();
        // A truncated stderr is still useful for the error message
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    }))
}

/// Run a command to completion, capturing both pipes.
pub async fn run_output(program: &str, args: &[String]) -> Result<Output, DownloadError> {
    let mut child = spawn_piped(program, args)?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::ExecutionError(format!("Failed to capture stdout from {}", program)))?;
    let stderr_task = collect_stderr(&mut child, program)?;

    let mut stdout = Vec::new();
    stdout_pipe
        .read_to_end(&mut stdout)
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stdout: {}", e)))?;

    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to wait for {}: {}", program, e)))?;
    let stderr = stderr_task
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("stderr task failed: {}", e)))?;

    Ok(Output { status, stdout, stderr })
}

/// Run a command, handing each stdout line to `on_line` as it arrives.
pub async fn run_streaming<F>(
    program: &str,
    args: &[String],
    mut on_line: F,
) -> Result<StreamedOutput, DownloadError>
where
    F: FnMut(&str),
{
    let mut child = spawn_piped(program, args)?;

    let stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::ExecutionError(format!("Failed to capture stdout from {}", program)))?;
    let stderr_task = collect_stderr(&mut child, program)?;

    let mut lines = BufReader::new(stdout_pipe).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stdout: {}", e)))?
    {
        on_line(&line);
    }

    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Process error: {}", e)))?;
    let stderr = stderr_task
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("stderr task failed: {}", e)))?;

    Ok(StreamedOutput {
        status,
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Lines yt-dlp prefixes with `ERROR:`
pub fn error_lines(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .map(str::to_string)
        .collect()
}

/// Short, single-line preview of a failure for log messages.
pub fn stderr_preview(stderr: &str) -> String {
    let errors = error_lines(stderr);
    if !errors.is_empty() {
        return errors.into_iter().take(2).collect::<Vec<_>>().join(" | ");
    }
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("Unknown error")
        .chars()
        .take(200)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_preview_prefers_error_lines() {
        let stderr = "WARNING: something\nERROR: [youtube] abc: Video unavailable\nmore\nERROR: second\nERROR: third";
        assert_eq!(
            stderr_preview(stderr),
            "ERROR: [youtube] abc: Video unavailable | ERROR: second"
        );
    }

    #[test]
    fn test_stderr_preview_falls_back_to_last_line() {
        assert_eq!(stderr_preview("first\nlast line\n\n"), "last line");
        assert_eq!(stderr_preview(""), "Unknown error");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_streaming_collects_lines_and_stderr() {
        let args = vec!["-c".to_string(), "echo one; echo two; echo oops >&2; exit 3".to_string()];
        let mut seen = Vec::new();
        let out = run_streaming("sh", &args, |line| seen.push(line.to_string()))
            .await
            .unwrap();
        assert_eq!(seen, vec!["one", "two"]);
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_missing_program_is_tool_not_found() {
        let err = run_output("definitely-not-a-real-binary-4711", &[]).await.unwrap_err();
        assert!(matches!(err, DownloadError::ToolNotFound(_)));
    }
}
