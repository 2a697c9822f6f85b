//! Control plane client for podflow.
//!
//! Wraps the cluster operations podflow consumes (context handling, workload
//! mutations, pod queries) behind the [`ControlPlane`] trait. The production
//! implementation is [`Kubectl`], which shells out to the kubectl CLI; tests
//! use the `test-utils` mock instead.

pub mod error;
pub mod kubectl;
#[cfg(feature = "test-utils")]
pub mod mock;

pub use error::{ControlPlaneError, Result};
pub use kubectl::Kubectl;

/// Pod label carrying the declared lifecycle state of a launched workload.
pub const DPROCTYPE_LABEL: &str = "dproctype";

/// A pod returned by the orphan candidate query.
///
/// `start_time` stays a raw wire string (`YYYY-MM-DDTHH:MM:SSZ`); parsing it
/// is the caller's concern so that a malformed timestamp on one pod cannot
/// fail the whole query.
#[derive(Debug, Clone, PartialEq)]
pub struct PodInfo {
    pub name: String,
    pub start_time: Option<String>,
}

/// Cluster operations consumed by the lifecycle controller and the reaper.
///
/// `async_trait` keeps the futures `Send` so implementations can be driven
/// from spawned background tasks (the reaper lives in one).
#[async_trait::async_trait]
pub trait ControlPlane: Send + Sync {
    /// Currently active cluster context.
    async fn current_context(&self) -> Result<String>;

    /// Switch the active context, returning the CLI's confirmation output.
    async fn use_context(&self, context: &str) -> Result<String>;

    /// Human-readable listing of the known contexts.
    async fn get_contexts(&self) -> Result<String>;

    /// Create a deployment running `command` under `image`, labelled with
    /// the declared lifecycle state.
    async fn run_deployment(
        &self,
        id: &str,
        image: &str,
        dproctype: &str,
        command: &[String],
    ) -> Result<()>;

    /// Expose a deployment as a service named `name` on `port`.
    async fn expose_deployment(&self, id: &str, name: &str, port: u16) -> Result<()>;

    async fn scale_deployment(&self, id: &str, replicas: u32) -> Result<()>;

    async fn delete_deployment(&self, id: &str) -> Result<()>;

    async fn delete_service(&self, name: &str) -> Result<()>;

    /// Pods declared `Terminating` that the cluster still observes as
    /// `Running` — the orphan candidates.
    async fn list_terminating_running_pods(&self) -> Result<Vec<PodInfo>>;

    /// Delete a pod. Deleting a pod that is already gone is not an error.
    async fn delete_pod(&self, name: &str) -> Result<()>;

    /// Raw passthrough for arbitrary control plane commands.
    async fn raw(&self, args: &[String]) -> Result<String>;
}
