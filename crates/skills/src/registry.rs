use async_trait::async_trait;

use crate::{
    discover::SkillDiscoverer,
    error::{Error, Result},
    resource,
    types::{SkillContent, SkillMetadata},
};

/// Caller-owned view over a discovery pass.
///
/// The loading engine itself is stateless and re-entrant; hosts that
/// want memoized discovery hold a registry and pick their own
/// invalidation policy (e.g. re-scan when the root's mtime changes).
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    /// List metadata for all known skills, in discovery order.
    async fn list_skills(&self) -> Result<Vec<SkillMetadata>>;

    /// Look up one skill's metadata by name.
    async fn get(&self, name: &str) -> Result<SkillMetadata>;

    /// Phase 2: load the full content of a skill by name.
    async fn load_skill(&self, name: &str) -> Result<SkillContent>;
}

/// In-memory registry snapshotting one discovery pass. Order is
/// preserved from discovery; names are unique (first wins).
pub struct InMemoryRegistry {
    skills: Vec<SkillMetadata>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { skills: Vec::new() }
    }

    /// Populate the registry from a discoverer.
    pub async fn from_discoverer(discoverer: &dyn SkillDiscoverer) -> Result<Self> {
        let discovered = discoverer.discover().await?;
        Ok(Self::from_skills(discovered))
    }

    /// Wrap an already-discovered metadata set.
    pub fn from_skills(skills: Vec<SkillMetadata>) -> Self {
        let mut registry = Self::new();
        for meta in skills {
            registry.insert(meta);
        }
        registry
    }

    /// Add a skill, replacing any existing entry with the same name.
    pub fn insert(&mut self, meta: SkillMetadata) {
        if let Some(existing) = self.skills.iter_mut().find(|s| s.name == meta.name) {
            *existing = meta;
        } else {
            self.skills.push(meta);
        }
    }

    fn find(&self, name: &str) -> Option<&SkillMetadata> {
        self.skills.iter().find(|s| s.name == name)
    }

    fn available(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkillRegistry for InMemoryRegistry {
    async fn list_skills(&self) -> Result<Vec<SkillMetadata>> {
        Ok(self.skills.clone())
    }

    async fn get(&self, name: &str) -> Result<SkillMetadata> {
        self.find(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name, self.available()))
    }

    async fn load_skill(&self, name: &str) -> Result<SkillContent> {
        let meta = self
            .find(name)
            .ok_or_else(|| Error::not_found(name, self.available()))?;

        let body =
            resource::load_instructions(&meta.skill_dir).map_err(|e| Error::activation(name, e))?;
        tracing::info!(skill = %name, "loaded skill content");
        Ok(SkillContent {
            metadata: meta.clone(),
            body,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::discover::FsSkillDiscoverer,
        std::{fs, path::Path},
    };

    fn write_skill(root: &Path, name: &str, body: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: test\n---\n{body}\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "my-skill", "# Instructions\nDo things.");

        let discoverer = FsSkillDiscoverer::new(tmp.path());
        let registry = InMemoryRegistry::from_discoverer(&discoverer).await.unwrap();

        let skills = registry.list_skills().await.unwrap();
        assert_eq!(skills.len(), 1);

        let content = registry.load_skill("my-skill").await.unwrap();
        assert!(content.body.contains("Do things"));
        assert_eq!(content.metadata.name, "my-skill");
    }

    #[tokio::test]
    async fn test_unknown_name_lists_available() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "web-research", "body");

        let discoverer = FsSkillDiscoverer::new(tmp.path());
        let registry = InMemoryRegistry::from_discoverer(&discoverer).await.unwrap();

        let err = registry.load_skill("nope").await.unwrap_err();
        match err {
            Error::SkillNotFound { name, available } => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["web-research"]);
            },
            other => panic!("expected SkillNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_discovery_order_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "zeta", "z");
        write_skill(tmp.path(), "alpha", "a");

        let discoverer = FsSkillDiscoverer::new(tmp.path());
        let registry = InMemoryRegistry::from_discoverer(&discoverer).await.unwrap();
        let names: Vec<String> = registry
            .list_skills()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_load_failure_wrapped_as_activation() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "doomed", "body");
        let discoverer = FsSkillDiscoverer::new(tmp.path());
        let registry = InMemoryRegistry::from_discoverer(&discoverer).await.unwrap();

        // Break the skill between discovery and activation.
        fs::remove_dir_all(tmp.path().join("doomed")).unwrap();

        let err = registry.load_skill("doomed").await.unwrap_err();
        assert!(matches!(err, Error::Activation { .. }));
    }
}
