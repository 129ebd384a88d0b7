use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::Entity;

pub fn parse_catalog(raw: &str) -> Result<Vec<Entity>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid catalog JSON")?;

    let list = match &parsed {
        Value::Array(_) => parsed,
        Value::Object(object) => object
            .get("assets")
            .or_else(|| object.get("dataAssets"))
            .cloned()
            .ok_or_else(|| anyhow!("catalog object has no \"assets\" array"))?,
        _ => return Err(anyhow!("unexpected JSON type for catalog")),
    };

    let entities: Vec<Entity> =
        serde_json::from_value(list).context("invalid asset entry in catalog")?;

    if let Some(blank) = entities.iter().position(|entity| entity.name.trim().is_empty()) {
        return Err(anyhow!("asset #{} has an empty name", blank + 1));
    }

    Ok(entities)
}

pub fn load_catalog(path: &Path) -> Result<Vec<Entity>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let entities =
        parse_catalog(&raw).with_context(|| format!("failed to parse catalog {}", path.display()))?;
    tracing::info!(path = %path.display(), assets = entities.len(), "catalog loaded");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array_with_optional_fields() {
        let raw = r#"[
            {"name": "orders", "description": "raw orders"},
            {"name": "revenue", "relationships": [{"name": "orders", "description": ""}]}
        ]"#;

        let entities = parse_catalog(raw).expect("parse");
        assert_eq!(entities.len(), 2);
        assert!(entities[0].relationships.is_empty());
        assert_eq!(entities[1].description, "");
        assert!(entities[1].uses("orders"));
    }

    #[test]
    fn parses_wrapped_object() {
        let raw = r#"{"assets": [{"name": "a", "description": "x", "relationships": []}]}"#;
        let entities = parse_catalog(raw).expect("parse");
        assert_eq!(entities[0].name, "a");
    }

    #[test]
    fn rejects_blank_names_and_bad_shapes() {
        assert!(parse_catalog(r#"[{"name": "  "}]"#).is_err());
        assert!(parse_catalog("42").is_err());
        assert!(parse_catalog(r#"{"other": []}"#).is_err());
        assert!(parse_catalog("not json").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = load_catalog(&dir.path().join("missing.json")).expect_err("missing file");
        assert!(format!("{error:#}").contains("failed to read catalog"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"[{"name": "a"}, {"name": "b", "relationships": [{"name": "a"}]}]"#)
            .expect("write");

        let entities = load_catalog(&path).expect("load");
        assert_eq!(entities.len(), 2);
    }
}
