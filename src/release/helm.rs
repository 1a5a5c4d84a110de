// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm subprocess invocation

use crate::error::Result;
use crate::release::{ReleaseOutput, ReleaseParams, ReleaseRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Runs `helm upgrade --install`, which upgrades an existing release in place
#[derive(Debug, Clone)]
pub struct HelmRunner {
    binary: String,
}

impl HelmRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl ReleaseRunner for HelmRunner {
    #[instrument(skip(self, params), fields(release = %params.release_name, chart = %params.chart))]
    async fn run(&self, namespace: &str, params: &ReleaseParams) -> Result<ReleaseOutput> {
        info!("Running {} for release {}", self.binary, params.release_name);
        run_process(&self.binary, &helm_args(namespace, params)).await
    }
}

pub fn helm_args(namespace: &str, params: &ReleaseParams) -> Vec<String> {
    let mut args = vec![
        "upgrade".to_string(),
        "--install".to_string(),
        params.release_name.clone(),
        params.chart.clone(),
        "--namespace".to_string(),
        namespace.to_string(),
    ];
    for (key, value) in &params.values {
        args.push("--set".to_string());
        args.push(format!("{}={}", key, value));
    }
    args
}

enum Line {
    Out(String),
    Err(String),
}

/// Spawn `program`, log its stdout/stderr line by line as they arrive and wait for it.
///
/// The child is killed if this future is dropped before it exits.
pub async fn run_process(program: &str, args: &[String]) -> Result<ReleaseOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stdout_task = tokio::spawn(forward_lines(child.stdout.take(), tx.clone(), Line::Out));
    let stderr_task = tokio::spawn(forward_lines(child.stderr.take(), tx, Line::Err));

    let mut output_lines = Vec::new();
    while let Some(line) = rx.recv().await {
        match line {
            Line::Out(l) => {
                info!(target: "release", "{}", l);
                output_lines.push(l);
            }
            Line::Err(l) => {
                warn!(target: "release", "{}", l);
                output_lines.push(l);
            }
        }
    }

    for (stream, task) in [("stdout", stdout_task), ("stderr", stderr_task)] {
        if let Err(e) = task.await {
            warn!("Forwarding {} of {} failed: {}", stream, program, e);
        }
    }

    let status = child.wait().await?;
    // No code when the child was terminated by a signal
    let exit_code = status.code().unwrap_or(-1);

    Ok(ReleaseOutput {
        exit_code,
        output_lines,
    })
}

async fn forward_lines<R>(
    stream: Option<R>,
    tx: mpsc::UnboundedSender<Line>,
    wrap: fn(String) -> Line,
) where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return;
    };
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(wrap(line)).is_err() {
            break;
        }
    }
}
