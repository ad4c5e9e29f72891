//! Model plugin resolution.
//!
//! A model plugin on disk is a JSON manifest naming a registered factory
//! kind, an optional default display name, and default parameters. The
//! loader scans a manifest file or a directory of manifests, filters the
//! candidates against the caller's [`ModelRegistry`], and resolves to a
//! scoped [`ModelHandle`].
//!
//! Resolution is deterministic: exactly one candidate wins regardless of
//! directory order. Two candidates without an explicit entry name are an
//! ambiguity error naming both; the explicit entry name is the supported
//! disambiguation path. Dropping the handle is the unload — the engine
//! holds at most one handle at a time, so plugin lifetimes never overlap
//! between models.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Map;
use tracing::debug;

use crate::domain::error::ResolutionError;
use crate::model::{CognitiveModel, ModelFactory};
use crate::registry::ModelRegistry;

/// Parsed plugin manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    /// Factory kind to instantiate.
    pub model: String,

    /// Default display name; overridable from the benchmark spec.
    #[serde(default)]
    pub name: Option<String>,

    /// Default constructor parameters; benchmark args merge over these.
    #[serde(default)]
    pub params: Map<String, serde_json::Value>,
}

/// Resolves plugin paths against a model registry.
pub struct ModelLoader<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> ModelLoader<'a> {
    pub fn new(registry: &'a ModelRegistry) -> ModelLoader<'a> {
        ModelLoader { registry }
    }

    /// Resolve a manifest file or directory to exactly one model.
    ///
    /// A scanned file is a candidate iff it parses as a manifest and its
    /// factory kind is registered; with an explicit `entry` name it must
    /// additionally match the factory kind, the manifest name, or the
    /// file stem.
    pub fn resolve(
        &self,
        path: &Path,
        entry: Option<&str>,
    ) -> Result<ModelHandle, ResolutionError> {
        let files = manifest_files(path)?;
        let mut candidates: Vec<(PathBuf, ModelManifest)> = Vec::new();

        for file in files {
            let manifest = match read_manifest(&file) {
                Some(manifest) => manifest,
                None => continue,
            };
            if !self.registry.contains(&manifest.model) {
                debug!(
                    file = %file.display(),
                    kind = %manifest.model,
                    "manifest names an unregistered factory, skipping"
                );
                continue;
            }
            if let Some(entry) = entry {
                let stem = file_stem(&file);
                let named = manifest.name.as_deref() == Some(entry);
                if manifest.model != entry && !named && stem != entry {
                    continue;
                }
            }
            candidates.push((file, manifest));
        }

        match candidates.len() {
            0 => Err(ResolutionError::NoCandidate {
                path: path.to_path_buf(),
            }),
            1 => {
                let (source, manifest) = candidates.pop().unwrap();
                let factory = self
                    .registry
                    .get(&manifest.model)
                    .expect("candidate factory is registered");
                debug!(
                    source = %source.display(),
                    kind = %manifest.model,
                    "resolved model plugin"
                );
                Ok(ModelHandle {
                    manifest,
                    factory,
                    source,
                })
            }
            _ => Err(ResolutionError::AmbiguousCandidates {
                path: path.to_path_buf(),
                candidates: candidates
                    .iter()
                    .map(|(file, manifest)| format!("{} ({})", file_stem(file), manifest.model))
                    .collect(),
            }),
        }
    }
}

/// A resolved model plugin; the scoped load/use/dispose unit.
pub struct ModelHandle {
    manifest: ModelManifest,
    factory: Arc<dyn ModelFactory>,
    source: PathBuf,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("manifest", &self.manifest)
            .field("factory", &self.factory.kind())
            .field("source", &self.source)
            .finish()
    }
}

impl ModelHandle {
    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Instantiate the model, merging `args` over the manifest's default
    /// parameters. Constructor failures surface as instantiation errors
    /// wrapping the unchanged source error.
    pub fn instantiate(
        &self,
        args: &Map<String, serde_json::Value>,
    ) -> Result<Box<dyn CognitiveModel>, ResolutionError> {
        let mut params = self.manifest.params.clone();
        for (key, value) in args {
            params.insert(key.clone(), value.clone());
        }
        self.factory
            .create(&params)
            .map_err(|source| ResolutionError::Instantiation {
                kind: self.manifest.model.clone(),
                source,
            })
    }
}

fn manifest_files(path: &Path) -> Result<Vec<PathBuf>, ResolutionError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|_| ResolutionError::NoCandidate {
        path: path.to_path_buf(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            !name.starts_with('.') && !name.starts_with('_')
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_manifest(path: &Path) -> Option<ModelManifest> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(file = %path.display(), %err, "unreadable manifest, skipping");
            return None;
        }
    };
    match serde_json::from_str::<ModelManifest>(&raw) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            debug!(file = %path.display(), %err, "not a model manifest, skipping");
            None
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{Item, ResponseType};
    use crate::domain::value::Value;
    use crate::model::Aux;
    use std::io::Write;

    #[derive(Clone)]
    struct Probe {
        name: String,
    }

    impl CognitiveModel for Probe {
        fn name(&self) -> &str {
            &self.name
        }
        fn supported_domains(&self) -> &[String] {
            &[]
        }
        fn supported_response_types(&self) -> &[ResponseType] {
            &[]
        }
        fn clone_model(&self) -> Box<dyn CognitiveModel> {
            Box::new(self.clone())
        }
        fn predict(&mut self, _item: &Item, _aux: &Aux) -> anyhow::Result<Value> {
            Ok(Value::terms(&["NVC"]))
        }
    }

    struct ProbeFactory {
        kind: &'static str,
        fail: bool,
    }

    impl ModelFactory for ProbeFactory {
        fn kind(&self) -> &str {
            self.kind
        }
        fn create(
            &self,
            params: &Map<String, serde_json::Value>,
        ) -> anyhow::Result<Box<dyn CognitiveModel>> {
            if self.fail {
                anyhow::bail!("constructor exploded");
            }
            let name = params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(self.kind)
                .to_string();
            Ok(Box::new(Probe { name }))
        }
    }

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register(Arc::new(ProbeFactory {
            kind: "alpha",
            fail: false,
        }));
        registry.register(Arc::new(ProbeFactory {
            kind: "beta",
            fail: false,
        }));
        registry.register(Arc::new(ProbeFactory {
            kind: "broken",
            fail: true,
        }));
        registry
    }

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).expect("create");
        file.write_all(content.as_bytes()).expect("write");
    }

    #[test]
    fn test_single_candidate_resolves() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "model.json", r#"{"model": "alpha"}"#);
        write_file(dir.path(), "readme.json", r#"{"notes": "not a manifest"}"#);

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(dir.path(), None)
            .expect("resolve");
        assert_eq!(handle.manifest().model, "alpha");
    }

    #[test]
    fn test_direct_file_path_resolves() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "model.json", r#"{"model": "beta"}"#);

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(&dir.path().join("model.json"), None)
            .expect("resolve");
        assert_eq!(handle.manifest().model, "beta");
    }

    #[test]
    fn test_two_candidates_without_entry_is_ambiguous() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "a.json", r#"{"model": "alpha"}"#);
        write_file(dir.path(), "b.json", r#"{"model": "beta"}"#);

        let registry = registry();
        let err = ModelLoader::new(&registry)
            .resolve(dir.path(), None)
            .unwrap_err();
        match err {
            ResolutionError::AmbiguousCandidates { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates.iter().any(|c| c.contains("alpha")));
                assert!(candidates.iter().any(|c| c.contains("beta")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_entry_disambiguates() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "a.json", r#"{"model": "alpha"}"#);
        write_file(dir.path(), "b.json", r#"{"model": "beta"}"#);

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(dir.path(), Some("beta"))
            .expect("resolve");
        assert_eq!(handle.manifest().model, "beta");
    }

    #[test]
    fn test_entry_matches_file_stem() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "first.json", r#"{"model": "alpha"}"#);
        write_file(dir.path(), "second.json", r#"{"model": "alpha"}"#);

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(dir.path(), Some("second"))
            .expect("resolve");
        assert_eq!(file_stem(handle.source()), "second");
    }

    #[test]
    fn test_hidden_and_underscore_files_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), ".hidden.json", r#"{"model": "alpha"}"#);
        write_file(dir.path(), "_draft.json", r#"{"model": "beta"}"#);

        let registry = registry();
        let err = ModelLoader::new(&registry)
            .resolve(dir.path(), None)
            .unwrap_err();
        assert!(matches!(err, ResolutionError::NoCandidate { .. }));
    }

    #[test]
    fn test_instantiation_error_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "model.json", r#"{"model": "broken"}"#);

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(dir.path(), None)
            .expect("resolve");
        let err = handle.instantiate(&Map::new()).unwrap_err();
        match err {
            ResolutionError::Instantiation { kind, source } => {
                assert_eq!(kind, "broken");
                assert!(source.to_string().contains("constructor exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_args_merge_over_manifest_params() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "model.json",
            r#"{"model": "alpha", "params": {"name": "FromManifest"}}"#,
        );

        let registry = registry();
        let handle = ModelLoader::new(&registry)
            .resolve(dir.path(), None)
            .expect("resolve");

        let model = handle.instantiate(&Map::new()).expect("instantiate");
        assert_eq!(model.name(), "FromManifest");

        let mut args = Map::new();
        args.insert(
            "name".to_string(),
            serde_json::Value::String("FromArgs".to_string()),
        );
        let model = handle.instantiate(&args).expect("instantiate");
        assert_eq!(model.name(), "FromArgs");
    }
}
