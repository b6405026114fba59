use crate::errors::ServiceError;
use crate::storage::Instance;
use async_trait::async_trait;

/// Trait abstraction for active instance storage.
/// Implementations can be file-backed or remote; binaries only see this trait.
#[async_trait]
pub trait InstanceRegistry: Send + Sync {
    async fn add(&self, repo: &str, branch: &str) -> Result<(), ServiceError>;
    async fn remove(&self, repo: &str, branch: &str) -> Result<(), ServiceError>;
    fn list(&self) -> Result<String, ServiceError>;
    fn exists(&self, args: &[&str]) -> Result<bool, ServiceError>;
    fn branches(&self, repo: &str) -> Result<Vec<String>, ServiceError>;
    fn instances(&self, repo: Option<&str>) -> Result<Vec<Instance>, ServiceError>;
}
