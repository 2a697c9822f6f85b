//! kubectl CLI wrapper
//!
//! Wraps the kubectl commands podflow issues against the cluster. Every call
//! runs with a timeout so a hung control plane cannot stall the caller
//! indefinitely.

use crate::error::{ControlPlaneError, Result};
use crate::{ControlPlane, DPROCTYPE_LABEL, PodInfo};
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// kubectl CLI wrapper
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: String,
    timeout: Duration,
}

impl Kubectl {
    /// Uses the `KUBECTL_BINARY` environment variable when set, otherwise
    /// plain `kubectl` resolved via PATH.
    pub fn new() -> Self {
        let binary = std::env::var("KUBECTL_BINARY").unwrap_or_else(|_| "kubectl".to_string());
        Self::with_binary(binary)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a kubectl command and return stdout.
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.binary, args.join(" "));

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ControlPlaneError::Timeout(self.timeout))?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ControlPlaneError::KubectlNotFound,
                _ => ControlPlaneError::IoError(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ControlPlaneError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

// `kubectl get po -o json` にそのまま載る形。startTime は Pending 中の pod
// には存在しないので Option で受ける。
#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    metadata: PodMetadata,
    #[serde(default)]
    status: PodStatus,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct PodStatus {
    #[serde(rename = "startTime")]
    start_time: Option<String>,
}

fn parse_pod_list(raw: &str) -> Result<Vec<PodInfo>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: PodList = serde_json::from_str(raw)?;
    Ok(list
        .items
        .into_iter()
        .map(|pod| PodInfo {
            name: pod.metadata.name,
            start_time: pod.status.start_time,
        })
        .collect())
}

#[async_trait::async_trait]
impl ControlPlane for Kubectl {
    async fn current_context(&self) -> Result<String> {
        let out = self.run_command(&["config", "current-context"]).await?;
        Ok(out.trim().to_string())
    }

    async fn use_context(&self, context: &str) -> Result<String> {
        self.run_command(&["config", "use-context", context]).await
    }

    async fn get_contexts(&self) -> Result<String> {
        self.run_command(&["config", "get-contexts"]).await
    }

    async fn run_deployment(
        &self,
        id: &str,
        image: &str,
        dproctype: &str,
        command: &[String],
    ) -> Result<()> {
        let image_arg = format!("--image={image}");
        let labels_arg = format!("--labels={DPROCTYPE_LABEL}={dproctype}");
        let mut args: Vec<&str> = vec![
            "run",
            id,
            image_arg.as_str(),
            labels_arg.as_str(),
            "--restart=Always",
            "--command",
            "--",
        ];
        args.extend(command.iter().map(String::as_str));
        self.run_command(&args).await?;
        Ok(())
    }

    async fn expose_deployment(&self, id: &str, name: &str, port: u16) -> Result<()> {
        let name_arg = format!("--name={name}");
        let port_arg = format!("--port={port}");
        self.run_command(&["expose", "deployment", id, name_arg.as_str(), port_arg.as_str()])
            .await?;
        Ok(())
    }

    async fn scale_deployment(&self, id: &str, replicas: u32) -> Result<()> {
        let replicas_arg = format!("--replicas={replicas}");
        self.run_command(&["scale", replicas_arg.as_str(), "deployment", id])
            .await?;
        Ok(())
    }

    async fn delete_deployment(&self, id: &str) -> Result<()> {
        self.run_command(&["delete", "deployment", id]).await?;
        Ok(())
    }

    async fn delete_service(&self, name: &str) -> Result<()> {
        self.run_command(&["delete", "service", name]).await?;
        Ok(())
    }

    async fn list_terminating_running_pods(&self) -> Result<Vec<PodInfo>> {
        let selector_arg = format!("--selector={DPROCTYPE_LABEL}=terminating");
        let out = self
            .run_command(&[
                "get",
                "po",
                selector_arg.as_str(),
                "--field-selector=status.phase=Running",
                "-o",
                "json",
            ])
            .await?;
        parse_pod_list(&out)
    }

    async fn delete_pod(&self, name: &str) -> Result<()> {
        match self.run_command(&["delete", "pod", name]).await {
            Ok(_) => Ok(()),
            // 既に消えている pod の削除は成功扱い (冪等)
            Err(ControlPlaneError::CommandFailed(stderr)) if stderr.contains("NotFound") => {
                tracing::debug!("pod {} already gone", name);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn raw(&self, args: &[String]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_command(&args).await
    }
}
