//! # Command Execution Module / 命令执行模块
//!
//! Spawns an engine process, optionally feeds it stdin, and captures stdout
//! and stderr separately so expectations can be checked per stream.
//!
//! 派生引擎进程，可选地向其写入 stdin，并分别捕获 stdout 和 stderr，
//! 以便按流检查期望。

use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Everything observed from one finished process.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// stdout followed by stderr, for logs and reports.
    pub fn combined(&self) -> String {
        let mut output = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&self.stderr);
        }
        output
    }
}

/// Spawns a command, writes `stdin` to it and captures its stdout and stderr.
/// The output streams are read concurrently and in full.
///
/// The command is configured with `kill_on_drop`, so dropping the returned
/// future (for example on timeout) kills the child.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `stdin` - Text written to the child's stdin; `None` connects it to null.
///
/// # Returns
/// The exit status and both captured streams, or the spawn / wait error.
///
/// 派生一个命令，向其写入 `stdin` 并捕获其 stdout 和 stderr。
/// 输出流被并发且完整地读取。
pub async fn spawn_and_capture(
    mut cmd: Command,
    stdin: Option<&str>,
) -> std::io::Result<CapturedOutput> {
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let mut child = cmd.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

    let stdout_handle = read_output(stdout);
    let stderr_handle = read_output(stderr);

    if let (Some(text), Some(mut pipe)) = (stdin, child.stdin.take()) {
        let text = text.to_owned();
        // The child may exit without reading all of its input.
        tokio::spawn(async move {
            if let Err(e) = pipe.write_all(text.as_bytes()).await {
                tracing::debug!(error = %e, "child closed stdin early");
            }
        });
    }

    let status = child.wait().await?;

    let stdout = join_output(stdout_handle).await;
    let stderr = join_output(stderr_handle).await;

    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
    })
}

/// Drains `stream` to its end. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD instead of cutting the output short.
fn read_output<R>(mut stream: R) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut bytes = Vec::new();
        if let Err(e) = stream.read_to_end(&mut bytes).await {
            tracing::debug!(error = %e, "output stream closed with an error");
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

async fn join_output(handle: JoinHandle<String>) -> String {
    match handle.await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "failed to join output reader");
            String::new()
        }
    }
}
