use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::registry::InstanceRegistry;
use crate::storage::completion::notify;
use crate::storage::mapping::{Instance, Mapping};
use crate::storage::yaml_format;

/// YAML file-backed store of active `{repo, branch}` instances.
///
/// Every call reads the whole file, applies at most one change and writes
/// the whole file back. Nothing is cached between calls and there is no
/// locking: two writers that interleave their load and save will lose one
/// of the updates.
#[derive(Debug, Clone)]
pub struct YamlDb {
    path: PathBuf,
}

impl YamlDb {
    /// Bind the store to `path`. The file is not touched until the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Raw file contents, `None` when the file does not exist yet.
    fn read_raw(&self) -> Result<Option<String>, ServiceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the full mapping. A missing or empty file is an empty mapping.
    pub fn load(&self) -> Result<Mapping, ServiceError> {
        let Some(contents) = self.read_raw()? else {
            debug!(path = %self.path.display(), "instance file missing, starting empty");
            return Ok(Mapping::new());
        };
        if contents.trim().is_empty() {
            return Ok(Mapping::new());
        }
        let mapping: Mapping = serde_yaml::from_str(&contents)?;
        debug!(path = %self.path.display(), repos = mapping.len(), "instance mapping loaded");
        Ok(mapping)
    }

    /// Overwrite the file with `mapping`.
    pub async fn save(&self, mapping: &Mapping) -> Result<(), ServiceError> {
        let dump = yaml_format::to_yaml_string(mapping)?;
        fs::write(&self.path, dump).await?;
        debug!(path = %self.path.display(), repos = mapping.len(), "instance mapping saved");
        Ok(())
    }

    /// Append `branch` to `repo`, creating the repo if needed. Duplicates are kept.
    pub async fn add(&self, repo: &str, branch: &str) -> Result<(), ServiceError> {
        let mut mapping = self.load()?;
        mapping.branches_mut(repo).push(branch.to_string());
        debug!(repo, branch, "instance added");
        self.save(&mapping).await
    }

    /// Drop every occurrence of `branch` from `repo`; an emptied repo is deleted.
    pub async fn remove(&self, repo: &str, branch: &str) -> Result<(), ServiceError> {
        let mut mapping = self.load()?;
        let Some(branches) = mapping.get_mut(repo) else {
            warn!(repo, branch, "remove requested for unknown repo");
            return Err(ServiceError::not_found(&format!("repo `{repo}`")));
        };
        branches.retain(|b| b != branch);
        if branches.is_empty() {
            mapping.remove(repo);
        }
        debug!(repo, branch, "instance removed");
        self.save(&mapping).await
    }

    /// Callback flavour of [`YamlDb::add`].
    pub async fn add_with<C>(&self, repo: &str, branch: &str, callback: C)
    where
        C: FnOnce(Option<ServiceError>),
    {
        notify(self.add(repo, branch), callback).await
    }

    /// Callback flavour of [`YamlDb::remove`].
    pub async fn remove_with<C>(&self, repo: &str, branch: &str, callback: C)
    where
        C: FnOnce(Option<ServiceError>),
    {
        notify(self.remove(repo, branch), callback).await
    }

    /// Raw file text, empty when the file does not exist.
    #[deprecated(note = "use `load` and serialize the mapping instead")]
    pub fn list(&self) -> Result<String, ServiceError> {
        Ok(self.read_raw()?.unwrap_or_default())
    }

    /// `[repo]` checks for the repo, `[repo, branch]` for the branch under it.
    /// Any other argument count is rejected before the file is read.
    pub fn exists(&self, args: &[&str]) -> Result<bool, ServiceError> {
        match args {
            [repo] => self.has_repo(repo),
            [repo, branch] => self.has_branch(repo, branch),
            _ => Err(ServiceError::InvalidParameters("db|exists")),
        }
    }

    pub fn has_repo(&self, repo: &str) -> Result<bool, ServiceError> {
        Ok(self.load()?.contains_repo(repo))
    }

    pub fn has_branch(&self, repo: &str, branch: &str) -> Result<bool, ServiceError> {
        let mapping = self.load()?;
        Ok(mapping.get(repo).is_some_and(|branches| branches.iter().any(|b| b == branch)))
    }

    /// Branches of `repo` in stored order; empty for an unknown repo.
    pub fn branches(&self, repo: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.load()?.get(repo).map(<[String]>::to_vec).unwrap_or_default())
    }

    /// Flat `{repo, branch}` list, for one repo or for all repos in key order.
    pub fn instances(&self, repo: Option<&str>) -> Result<Vec<Instance>, ServiceError> {
        let mapping = self.load()?;
        let instances = match repo {
            Some(repo) => mapping
                .get(repo)
                .unwrap_or_default()
                .iter()
                .map(|b| Instance::new(repo, b.as_str()))
                .collect(),
            None => mapping.instances(),
        };
        Ok(instances)
    }
}

#[async_trait::async_trait]
impl InstanceRegistry for YamlDb {
    async fn add(&self, repo: &str, branch: &str) -> Result<(), ServiceError> { self.add(repo, branch).await }
    async fn remove(&self, repo: &str, branch: &str) -> Result<(), ServiceError> { self.remove(repo, branch).await }
    #[allow(deprecated)]
    fn list(&self) -> Result<String, ServiceError> { self.list() }
    fn exists(&self, args: &[&str]) -> Result<bool, ServiceError> { self.exists(args) }
    fn branches(&self, repo: &str) -> Result<Vec<String>, ServiceError> { self.branches(repo) }
    fn instances(&self, repo: Option<&str>) -> Result<Vec<Instance>, ServiceError> { self.instances(repo) }
}
