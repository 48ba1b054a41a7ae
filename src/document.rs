//! # Game Data Documents
//!
//! Event command lists live at different depths depending on the data file:
//!
//! - map files: `{"events": [null, {"pages": [{"list": [...]}]}]}`
//! - common events: `[null, {"list": [...]}]`
//! - troops: `[null, {"pages": [{"list": [...]}]}]`
//! - a bare command list: `[{"code": 401, ...}, ...]`
//!
//! The document is handled as a [`serde_json::Value`] so everything outside
//! the command lists survives untouched. A list that does not deserialize as
//! commands is skipped with a warning.

use crate::engine::{ReflowEngine, ReflowReport};
use crate::error::ReflowError;
use crate::model::Command;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

const BOM: char = '\u{feff}';

/// The shape a document was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Map,
    CommonEvents,
    Troops,
    CommandList,
    Unknown,
}

/// Classify a document by its structure.
pub fn detect_kind(doc: &Value) -> DocumentKind {
    match doc {
        Value::Object(map) if map.contains_key("events") => DocumentKind::Map,
        Value::Array(items) => {
            let first = items.iter().find_map(Value::as_object);
            match first {
                Some(obj) if obj.contains_key("list") => DocumentKind::CommonEvents,
                Some(obj) if obj.contains_key("pages") => DocumentKind::Troops,
                Some(obj) if obj.contains_key("code") => DocumentKind::CommandList,
                None if items.is_empty() => DocumentKind::CommandList,
                _ => DocumentKind::Unknown,
            }
        }
        _ => DocumentKind::Unknown,
    }
}

/// Reflow every command list found in `doc`.
pub fn reflow_document(
    doc: &mut Value,
    engine: &ReflowEngine<'_>,
) -> Result<ReflowReport, ReflowError> {
    let mut report = ReflowReport::default();
    match detect_kind(doc) {
        DocumentKind::Map => {
            if let Some(events) = doc.get_mut("events").and_then(Value::as_array_mut) {
                for event in events.iter_mut() {
                    reflow_pages(event, engine, &mut report)?;
                }
            }
        }
        DocumentKind::CommonEvents => {
            if let Some(items) = doc.as_array_mut() {
                for item in items.iter_mut() {
                    if let Some(list) = item.get_mut("list") {
                        reflow_list(list, engine, &mut report)?;
                    }
                }
            }
        }
        DocumentKind::Troops => {
            if let Some(items) = doc.as_array_mut() {
                for item in items.iter_mut() {
                    reflow_pages(item, engine, &mut report)?;
                }
            }
        }
        DocumentKind::CommandList => reflow_list(doc, engine, &mut report)?,
        DocumentKind::Unknown => warn!("document has no recognisable command lists"),
    }
    Ok(report)
}

/// Parse JSON text, reflow it, and return the new text if anything changed.
///
/// A leading byte-order mark is tolerated and written back.
pub fn reflow_json(
    json: &str,
    engine: &ReflowEngine<'_>,
) -> Result<(Option<String>, ReflowReport), ReflowError> {
    let has_bom = json.starts_with(BOM);
    let mut doc: Value = serde_json::from_str(json.trim_start_matches(BOM))?;
    let report = reflow_document(&mut doc, engine)?;
    if !report.is_modified() {
        return Ok((None, report));
    }
    let mut out = String::new();
    if has_bom {
        out.push(BOM);
    }
    out.push_str(&serde_json::to_string(&doc)?);
    info!(
        windows = report.windows_rewritten,
        removed = report.lines_removed,
        added = report.lines_added,
        "reflowed document"
    );
    Ok((Some(out), report))
}

fn reflow_pages(
    holder: &mut Value,
    engine: &ReflowEngine<'_>,
    report: &mut ReflowReport,
) -> Result<(), ReflowError> {
    let Some(pages) = holder.get_mut("pages").and_then(Value::as_array_mut) else {
        return Ok(());
    };
    for page in pages.iter_mut() {
        if let Some(list) = page.get_mut("list") {
            reflow_list(list, engine, report)?;
        }
    }
    Ok(())
}

fn reflow_list(
    list: &mut Value,
    engine: &ReflowEngine<'_>,
    report: &mut ReflowReport,
) -> Result<(), ReflowError> {
    let mut commands = match Vec::<Command>::deserialize(&*list) {
        Ok(commands) => commands,
        Err(e) => {
            warn!("skipping command list that does not parse: {e}");
            return Ok(());
        }
    };
    let pass = engine.reflow(&mut commands);
    if pass.is_modified() {
        *list = serde_json::to_value(&commands)?;
    }
    report.absorb(pass);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReflowConfig;
    use crate::detect::PatternBoundary;
    use serde_json::json;

    fn with_engine<T>(f: impl FnOnce(&ReflowEngine<'_>) -> T) -> T {
        let cfg = ReflowConfig::default();
        let boundary = PatternBoundary::from_config(&cfg).unwrap();
        let engine = ReflowEngine::new(&cfg, &boundary, None);
        f(&engine)
    }

    fn two_line_list() -> Value {
        json!([
            {"code": 401, "indent": 0, "parameters": ["Hello there,"]},
            {"code": 401, "indent": 0, "parameters": ["friend."]},
            {"code": 0, "indent": 0, "parameters": []}
        ])
    }

    #[test]
    fn test_detect_kinds() {
        assert_eq!(detect_kind(&json!({"events": []})), DocumentKind::Map);
        assert_eq!(detect_kind(&json!([null, {"list": []}])), DocumentKind::CommonEvents);
        assert_eq!(detect_kind(&json!([null, {"pages": []}])), DocumentKind::Troops);
        assert_eq!(detect_kind(&two_line_list()), DocumentKind::CommandList);
        assert_eq!(detect_kind(&json!({"name": "x"})), DocumentKind::Unknown);
    }

    #[test]
    fn test_map_document() {
        let mut doc = json!({
            "displayName": "Town",
            "events": [null, {"id": 1, "pages": [null, {"list": two_line_list()}]}]
        });
        let report = with_engine(|e| reflow_document(&mut doc, e)).unwrap();
        assert_eq!(report.windows_rewritten, 1);
        let list = &doc["events"][1]["pages"][1]["list"];
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert_eq!(list[0]["parameters"][0], "Hello there, friend.");
        assert_eq!(doc["displayName"], "Town");
    }

    #[test]
    fn test_common_events_document() {
        let mut doc = json!([null, {"id": 1, "list": two_line_list()}]);
        let report = with_engine(|e| reflow_document(&mut doc, e)).unwrap();
        assert!(report.is_modified());
        assert_eq!(doc[1]["list"][0]["parameters"][0], "Hello there, friend.");
    }

    #[test]
    fn test_unparseable_list_skipped() {
        let mut doc = json!([null, {"list": "not a list"}]);
        let report = with_engine(|e| reflow_document(&mut doc, e)).unwrap();
        assert!(!report.is_modified());
        assert_eq!(doc[1]["list"], "not a list");
    }

    #[test]
    fn test_reflow_json_keeps_bom() {
        let input = format!("{BOM}{}", two_line_list());
        let (out, _) = with_engine(|e| reflow_json(&input, e)).unwrap();
        let out = out.unwrap();
        assert!(out.starts_with(BOM));
        assert!(out.contains("Hello there, friend."));
    }

    #[test]
    fn test_reflow_json_unchanged_returns_none() {
        let input = json!([{"code": 401, "indent": 0, "parameters": ["Short."]}]).to_string();
        let (out, report) = with_engine(|e| reflow_json(&input, e)).unwrap();
        assert!(out.is_none());
        assert!(!report.is_modified());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = with_engine(|e| reflow_json("{\"events\": [", e)).unwrap_err();
        assert!(matches!(err, ReflowError::Parse { .. }));
    }
}
