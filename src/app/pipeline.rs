//! Shared setup used by every subcommand.
//!
//! schema source → `PriorSchemaStore` → `EngineConfig` → `PriorResolutionEngine`
//!
//! Subcommands then only deal with presentation (printing vs exporting).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::{EngineConfig, MeanOutsideSupport};
use crate::engine::PriorResolutionEngine;
use crate::error::PriorError;
use crate::io::read_schema_json;
use crate::schema::PriorSchemaStore;

/// Environment variable naming a schema file to use instead of the bundled one.
pub const SCHEMA_ENV: &str = "PRIORS_SCHEMA";

/// Where the loaded schema came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Bundled,
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaSource::File(path) => write!(f, "{}", path.display()),
            SchemaSource::Bundled => f.write_str("<bundled>"),
        }
    }
}

/// A ready-to-use engine plus the schema it was built from.
#[derive(Debug, Clone)]
pub struct Session {
    pub engine: PriorResolutionEngine,
    pub source: SchemaSource,
}

/// Pick the schema source: explicit flag, then `$PRIORS_SCHEMA`, then bundled.
pub fn schema_source(flag: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> SchemaSource {
    if let Some(path) = flag {
        return SchemaSource::File(path.to_path_buf());
    }
    match lookup(SCHEMA_ENV) {
        Some(raw) if !raw.trim().is_empty() => SchemaSource::File(PathBuf::from(raw.trim())),
        _ => SchemaSource::Bundled,
    }
}

pub fn load_store(source: &SchemaSource) -> Result<PriorSchemaStore, PriorError> {
    match source {
        SchemaSource::File(path) => read_schema_json(path),
        SchemaSource::Bundled => PriorSchemaStore::bundled(),
    }
}

/// Build the session from CLI overrides and the process environment.
pub fn open_session(
    schema: Option<&Path>,
    policy: Option<MeanOutsideSupport>,
) -> Result<Session, PriorError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(policy) = policy {
        config.mean_outside_support = policy;
    }

    let source = schema_source(schema, |name| std::env::var(name).ok());
    let store = load_store(&source)?;
    info!(source = %source, policy = ?config.mean_outside_support, "engine ready");

    Ok(Session {
        engine: PriorResolutionEngine::new(Arc::new(store), config),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment_beats_bundled() {
        let env = |name: &str| (name == SCHEMA_ENV).then(|| "/etc/priors.json".to_string());

        assert_eq!(
            schema_source(Some(Path::new("local.json")), env),
            SchemaSource::File(PathBuf::from("local.json"))
        );
        assert_eq!(
            schema_source(None, env),
            SchemaSource::File(PathBuf::from("/etc/priors.json"))
        );
        assert_eq!(schema_source(None, |_| None), SchemaSource::Bundled);
        assert_eq!(schema_source(None, |_| Some("  ".to_string())), SchemaSource::Bundled);
    }

    #[test]
    fn load_store_reads_files_and_bundled() {
        let bundled = load_store(&SchemaSource::Bundled).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priors.json");
        crate::io::write_schema_json(&path, &bundled).unwrap();
        assert_eq!(load_store(&SchemaSource::File(path)).unwrap(), bundled);

        let missing = SchemaSource::File(dir.path().join("missing.json"));
        assert!(matches!(load_store(&missing), Err(PriorError::Io { .. })));
    }
}
