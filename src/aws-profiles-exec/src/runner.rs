//! Spawning the rendered command and capturing what it prints.

use crate::error::InvocationError;
use crate::template::Invocation;
use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, ChildStdout, Command};
use tokio::time;

const READ_CHUNK: usize = 8192;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// stdout and stderr interleaved in the order the chunks arrived.
    pub output: String,
}

/// Runs one rendered invocation to completion.
pub trait CommandRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CommandOutput, InvocationError>>;
}

/// Runs invocations as real child processes.
///
/// The environment from the invocation is applied to the child only, so the
/// parent's `AWS_PROFILE` is never touched.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills the child and reports [`InvocationError::TimedOut`] once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, InvocationError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InvocationError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

        let finish = async {
            let combined = read_combined(stdout, stderr).await?;
            let status = child.wait().await?;
            Ok::<_, io::Error>((status, combined))
        };

        let (status, combined) = match self.timeout {
            Some(after) => match time::timeout(after, finish).await {
                Ok(result) => result?,
                // Dropping the child kills it.
                Err(_) => return Err(InvocationError::TimedOut { after }),
            },
            None => finish.await?,
        };

        let output = String::from_utf8_lossy(&combined).into_owned();
        if status.success() {
            Ok(CommandOutput { status, output })
        } else {
            Err(InvocationError::Failed { status, output })
        }
    }
}

/// Drains both pipes into a single buffer until each reaches EOF.
async fn read_combined(mut stdout: ChildStdout, mut stderr: ChildStderr) -> io::Result<Vec<u8>> {
    let mut combined = Vec::new();
    let mut out_buf = [0_u8; READ_CHUNK];
    let mut err_buf = [0_u8; READ_CHUNK];
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => {
                match read? {
                    0 => out_open = false,
                    n => combined.extend_from_slice(&out_buf[..n]),
                }
            }
            read = stderr.read(&mut err_buf), if err_open => {
                match read? {
                    0 => err_open = false,
                    n => combined.extend_from_slice(&err_buf[..n]),
                }
            }
        }
    }

    Ok(combined)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn shell(script: &str, env: &[(&str, &str)]) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let result = ProcessRunner::new()
            .run(&shell("echo out; echo err 1>&2", &[]))
            .await
            .unwrap();
        assert!(result.status.success());
        assert!(result.output.contains("out\n"));
        assert!(result.output.contains("err\n"));
    }

    #[tokio::test]
    async fn test_env_is_scoped_to_child() {
        let marker = "aws-profiles-exec-runner-test";
        let result = ProcessRunner::new()
            .run(&shell("printf %s \"$AWS_PROFILE\"", &[("AWS_PROFILE", marker)]))
            .await
            .unwrap();
        assert_eq!(result.output, marker);
        assert_ne!(std::env::var("AWS_PROFILE").ok().as_deref(), Some(marker));
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let err = ProcessRunner::new()
            .run(&shell("echo boom; exit 3", &[]))
            .await
            .unwrap_err();
        match err {
            InvocationError::Failed { status, ref output } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "boom\n");
                assert_eq!(err.output(), Some("boom\n"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let invocation = Invocation {
            program: "aws-profiles-exec-no-such-binary".to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
        };
        let err = ProcessRunner::new().run(&invocation).await.unwrap_err();
        assert!(matches!(err, InvocationError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_child() {
        let err = ProcessRunner::new()
            .with_timeout(Some(Duration::from_millis(200)))
            .run(&shell("sleep 10", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, InvocationError::TimedOut { .. }));
    }
}
