//! Scripted control plane for tests (`test-utils` feature).
//!
//! Records every issued operation in order and can be told to fail specific
//! operations, so callers can assert both the sequence of cluster mutations
//! and their own behavior under control plane errors.

use crate::error::{ControlPlaneError, Result};
use crate::{ControlPlane, DPROCTYPE_LABEL, PodInfo};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockControlPlane {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    context: Mutex<String>,
    pods: Mutex<Vec<PodInfo>>,
    fail_ops: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockControlPlane {
    pub fn new(context: impl Into<String>) -> Self {
        let mock = Self::default();
        *mock.inner.context.lock().unwrap() = context.into();
        mock
    }

    /// Replace the pods the orphan candidate query returns.
    pub fn set_pods(&self, pods: Vec<PodInfo>) {
        *self.inner.pods.lock().unwrap() = pods;
    }

    pub fn pods(&self) -> Vec<PodInfo> {
        self.inner.pods.lock().unwrap().clone()
    }

    /// Fail every operation whose canonical form starts with `op`
    /// (e.g. `"delete pod"` or `"scale"`).
    pub fn fail_on(&self, op: impl Into<String>) {
        self.inner.fail_ops.lock().unwrap().push(op.into());
    }

    pub fn clear_failures(&self) {
        self.inner.fail_ops.lock().unwrap().clear();
    }

    /// Operations issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    // 呼び出しを記録してから失敗判定する。失敗した操作も順序検証の対象。
    fn record(&self, call: String) -> Result<()> {
        self.inner.calls.lock().unwrap().push(call.clone());
        let fail_ops = self.inner.fail_ops.lock().unwrap();
        if fail_ops.iter().any(|op| call.starts_with(op.as_str())) {
            return Err(ControlPlaneError::CommandFailed(format!(
                "mock failure: {call}"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ControlPlane for MockControlPlane {
    async fn current_context(&self) -> Result<String> {
        self.record("config current-context".to_string())?;
        Ok(self.inner.context.lock().unwrap().clone())
    }

    async fn use_context(&self, context: &str) -> Result<String> {
        self.record(format!("config use-context {context}"))?;
        *self.inner.context.lock().unwrap() = context.to_string();
        Ok(format!("Switched to context \"{context}\"."))
    }

    async fn get_contexts(&self) -> Result<String> {
        self.record("config get-contexts".to_string())?;
        Ok(format!("* {}", self.inner.context.lock().unwrap()))
    }

    async fn run_deployment(
        &self,
        id: &str,
        image: &str,
        dproctype: &str,
        command: &[String],
    ) -> Result<()> {
        self.record(format!(
            "run {id} --image={image} --labels={DPROCTYPE_LABEL}={dproctype} -- {}",
            command.join(" ")
        ))
    }

    async fn expose_deployment(&self, id: &str, name: &str, port: u16) -> Result<()> {
        self.record(format!("expose deployment {id} --name={name} --port={port}"))
    }

    async fn scale_deployment(&self, id: &str, replicas: u32) -> Result<()> {
        self.record(format!("scale --replicas={replicas} deployment {id}"))
    }

    async fn delete_deployment(&self, id: &str) -> Result<()> {
        self.record(format!("delete deployment {id}"))
    }

    async fn delete_service(&self, name: &str) -> Result<()> {
        self.record(format!("delete service {name}"))
    }

    async fn list_terminating_running_pods(&self) -> Result<Vec<PodInfo>> {
        self.record(format!(
            "get po --selector={DPROCTYPE_LABEL}=terminating --field-selector=status.phase=Running"
        ))?;
        Ok(self.pods())
    }

    async fn delete_pod(&self, name: &str) -> Result<()> {
        self.record(format!("delete pod {name}"))?;
        // 成功した削除は次回の選択対象から外れる
        self.inner
            .pods
            .lock()
            .unwrap()
            .retain(|pod| pod.name != name);
        Ok(())
    }

    async fn raw(&self, args: &[String]) -> Result<String> {
        self.record(args.join(" "))?;
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let mock = MockControlPlane::new("prod");

        mock.scale_deployment("app-1", 0).await.unwrap();
        mock.delete_deployment("app-1").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "scale --replicas=0 deployment app-1".to_string(),
                "delete deployment app-1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fail_on_matches_by_prefix_and_records_the_call() {
        let mock = MockControlPlane::new("prod");
        mock.fail_on("delete service");

        assert!(mock.delete_service("web").await.is_err());
        // 失敗した操作も記録される
        assert_eq!(mock.calls(), vec!["delete service web".to_string()]);

        mock.clear_failures();
        assert!(mock.delete_service("web").await.is_ok());
    }

    #[tokio::test]
    async fn test_successful_pod_delete_leaves_the_selector() {
        let mock = MockControlPlane::new("prod");
        mock.set_pods(vec![PodInfo {
            name: "orphan-1".to_string(),
            start_time: Some("2018-02-01T10:00:00Z".to_string()),
        }]);

        mock.delete_pod("orphan-1").await.unwrap();

        assert!(mock.list_terminating_running_pods().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_use_context_switches_current_context() {
        let mock = MockControlPlane::new("prod");

        mock.use_context("staging").await.unwrap();

        assert_eq!(mock.current_context().await.unwrap(), "staging");
    }
}
