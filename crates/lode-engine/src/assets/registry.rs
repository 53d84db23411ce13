use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::components::sprite::AtlasId;

/// Texture paths the host must load, each with a stable `AtlasId`.
/// Ids are assigned in registration order; registering a path twice returns the first id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasRegistry {
    paths: Vec<PathBuf>,
    #[serde(skip)]
    index: HashMap<PathBuf, AtlasId>,
}

impl AtlasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl AsRef<Path>) -> AtlasId {
        let path = path.as_ref();
        if let Some(&id) = self.index.get(path) {
            return id;
        }
        let id = AtlasId(self.paths.len() as u32);
        self.paths.push(path.to_path_buf());
        self.index.insert(path.to_path_buf(), id);
        log::debug!("atlas {} -> {}", id.0, path.display());
        id
    }

    /// Id of an already registered path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<AtlasId> {
        self.index.get(path.as_ref()).copied()
    }

    pub fn path(&self, id: AtlasId) -> Option<&Path> {
        self.paths.get(id.0 as usize).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AtlasId, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (AtlasId(i as u32), p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path list for the host, ordered by id.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut registry: Self = serde_json::from_str(json)?;
        // A repeated path keeps its first id, as `register` would.
        for (i, path) in registry.paths.iter().enumerate() {
            registry.index.entry(path.clone()).or_insert(AtlasId(i as u32));
        }
        Ok(registry)
    }
}
