//! Catalog assembly at startup.
//!
//! The served catalog starts from the built-in schemas and layers any
//! `*.json` files found in the configured `SCHEMAS_DIR` on top. Overlay
//! files are parsed and validated individually; a file that fails either
//! step is logged and skipped so one bad schema cannot take the service
//! down. An overlay sharing an id with a built-in replaces it.

use std::path::Path;

use atelier_core::catalog::SchemaCatalog;
use atelier_core::error::CoreError;
use atelier_core::schema::FormSchema;

/// Build the catalog served by the API.
pub fn load_catalog(schemas_dir: Option<&Path>) -> Result<SchemaCatalog, CoreError> {
    let mut catalog = SchemaCatalog::builtin()?;

    if let Some(dir) = schemas_dir {
        overlay_dir(&mut catalog, dir);
    }

    Ok(catalog)
}

fn overlay_dir(catalog: &mut SchemaCatalog, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot read SCHEMAS_DIR, serving built-in forms only");
            return;
        }
    };

    // Directory order is platform-dependent; sort so replacement among
    // overlay files themselves is deterministic.
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    paths.sort();

    for path in paths {
        match load_schema_file(&path) {
            Ok(schema) => {
                let id = schema.id.clone();
                match catalog.insert(schema) {
                    Ok(()) => tracing::info!(id = %id, path = %path.display(), "Loaded schema overlay"),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping invalid schema file")
                    }
                }
            }
            Err(msg) => {
                tracing::warn!(path = %path.display(), error = %msg, "Skipping unreadable schema file")
            }
        }
    }
}

fn load_schema_file(path: &Path) -> Result<FormSchema, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
