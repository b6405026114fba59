use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single `{repo, branch}` pair tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub repo: String,
    pub branch: String,
}

impl Instance {
    pub fn new(repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self { repo: repo.into(), branch: branch.into() }
    }
}

/// Repo name to branch list, in insertion order.
///
/// Keys are unique; branch lists may hold duplicates. The number of repos
/// tracked is small, so lookups are linear scans over the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, Vec<String>)>,
}

impl Mapping {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn position(&self, repo: &str) -> Option<usize> {
        self.entries.iter().position(|(r, _)| r == repo)
    }

    pub fn contains_repo(&self, repo: &str) -> bool { self.position(repo).is_some() }

    pub fn get(&self, repo: &str) -> Option<&[String]> {
        self.position(repo).map(|i| self.entries[i].1.as_slice())
    }

    pub fn get_mut(&mut self, repo: &str) -> Option<&mut Vec<String>> {
        let i = self.position(repo)?;
        Some(&mut self.entries[i].1)
    }

    /// Branch list for `repo`, appending an empty one at the end if absent.
    pub fn branches_mut(&mut self, repo: &str) -> &mut Vec<String> {
        let i = match self.position(repo) {
            Some(i) => i,
            None => {
                self.entries.push((repo.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// Replace the branch list of `repo` in place, or append a new entry.
    pub fn insert(&mut self, repo: impl Into<String>, branches: Vec<String>) -> Option<Vec<String>> {
        let repo = repo.into();
        match self.position(&repo) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, branches)),
            None => {
                self.entries.push((repo, branches));
                None
            }
        }
    }

    /// Remove `repo`, keeping the order of the remaining entries.
    pub fn remove(&mut self, repo: &str) -> Option<Vec<String>> {
        let i = self.position(repo)?;
        Some(self.entries.remove(i).1)
    }

    pub fn repos(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(r, b)| (r.as_str(), b.as_slice()))
    }

    /// Flatten into `{repo, branch}` pairs, repos in key order.
    pub fn instances(&self) -> Vec<Instance> {
        self.iter()
            .flat_map(|(repo, branches)| branches.iter().map(move |b| Instance::new(repo, b.as_str())))
            .collect()
    }
}

impl<R, B> FromIterator<(R, Vec<B>)> for Mapping
where
    R: Into<String>,
    B: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (R, Vec<B>)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (repo, branches) in iter {
            mapping.insert(repo, branches.into_iter().map(Into::into).collect());
        }
        mapping
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (repo, branches) in &self.entries {
            map.serialize_entry(repo, branches)?;
        }
        map.end()
    }
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
    type Value = Mapping;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of repo names to branch lists")
    }

    // an empty or `null` document is an empty store
    fn visit_unit<E: de::Error>(self) -> Result<Mapping, E> { Ok(Mapping::new()) }

    fn visit_none<E: de::Error>(self) -> Result<Mapping, E> { Ok(Mapping::new()) }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Mapping, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((repo, branches)) = access.next_entry::<String, Option<Vec<String>>>()? {
            if mapping.contains_repo(&repo) {
                return Err(de::Error::custom(format!("duplicate repo `{repo}`")));
            }
            mapping.entries.push((repo, branches.unwrap_or_default()));
        }
        Ok(mapping)
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MappingVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Mapping {
        Mapping::from_iter([("foo", vec!["bar1", "baz1"]), ("quux", vec!["baz2", "bar2"])])
    }

    #[test]
    fn branches_mut_appends_new_repo_last() {
        let mut m = seeded();
        m.branches_mut("alpha").push("main".into());
        assert_eq!(m.repos().collect::<Vec<_>>(), vec!["foo", "quux", "alpha"]);

        m.branches_mut("foo").push("bar1".into());
        assert_eq!(m.get("foo").unwrap(), ["bar1", "baz1", "bar1"]);
    }

    #[test]
    fn remove_keeps_order_of_remaining_repos() {
        let mut m = seeded();
        m.insert("zed", vec!["z".into()]);
        assert_eq!(m.remove("foo"), Some(vec!["bar1".to_string(), "baz1".to_string()]));
        assert_eq!(m.repos().collect::<Vec<_>>(), vec!["quux", "zed"]);
        assert_eq!(m.remove("foo"), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut m = seeded();
        let old = m.insert("foo", vec!["x".into()]);
        assert_eq!(old.unwrap().len(), 2);
        assert_eq!(m.repos().next(), Some("foo"));
        assert_eq!(m.get("foo").unwrap(), ["x"]);
    }

    #[test]
    fn instances_flatten_in_key_order() {
        let got = seeded().instances();
        assert_eq!(
            got,
            vec![
                Instance::new("foo", "bar1"),
                Instance::new("foo", "baz1"),
                Instance::new("quux", "baz2"),
                Instance::new("quux", "bar2"),
            ]
        );
    }

    #[test]
    fn deserialize_preserves_document_order() {
        let m: Mapping = serde_yaml::from_str("zeta:\n  - a\nalpha:\n  - b\n  - c\n").unwrap();
        assert_eq!(m.repos().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(m.get("alpha").unwrap(), ["b", "c"]);
    }

    #[test]
    fn deserialize_null_document_and_null_value() {
        let m: Mapping = serde_yaml::from_str("~").unwrap();
        assert!(m.is_empty());

        let m: Mapping = serde_yaml::from_str("foo:\n").unwrap();
        assert_eq!(m.get("foo").unwrap().len(), 0);
    }

    #[test]
    fn deserialize_rejects_non_mapping_and_duplicates() {
        assert!(serde_yaml::from_str::<Mapping>("- a\n- b\n").is_err());
        assert!(serde_yaml::from_str::<Mapping>("foo: bar\n").is_err());
        assert!(serde_yaml::from_str::<Mapping>("foo: [a]\nfoo: [b]\n").is_err());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let json = serde_json::to_string(&seeded()).unwrap();
        assert_eq!(json, r#"{"foo":["bar1","baz1"],"quux":["baz2","bar2"]}"#);
    }
}
