//! Conversion of the listing document into [`FileNode`]s.
//!
//! The canonical shape is `{ "files": [ ... ] }`; a bare top-level array is accepted
//! too. Entries must be objects carrying a string `name`; everything else about an
//! entry is optional and normalised here so that the in-memory tree always satisfies
//! "directory iff it has children".

use crate::core::errors::{Error, Result};
use crate::models::{FileKind, FileNode, TreePath};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    name: String,
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<String>,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    last_modified: Option<Value>,
    #[serde(default)]
    size: Option<Value>,
}

pub(crate) fn parse_document(document: Value) -> Result<Vec<FileNode>> {
    let files = match document {
        Value::Object(mut map) => map
            .remove("files")
            .ok_or_else(|| Error::MalformedTree("missing top-level `files`".into()))?,
        Value::Array(items) => Value::Array(items),
        other => {
            return Err(Error::MalformedTree(format!(
                "expected an object with `files`, found {}",
                describe(&other)
            )))
        }
    };
    if !files.is_array() {
        return Err(Error::MalformedTree(format!(
            "`files` must be an array, found {}",
            describe(&files)
        )));
    }

    let raw: Vec<RawNode> =
        serde_json::from_value(files).map_err(|e| Error::MalformedTree(e.to_string()))?;
    Ok(convert_level(raw, &TreePath::root()))
}

fn convert_level(raw: Vec<RawNode>, parent: &TreePath) -> Vec<FileNode> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|node| {
            if !seen.insert(node.name.clone()) {
                tracing::warn!(
                    "duplicate entry '{}' under /{}; lookups use the first one",
                    node.name,
                    parent
                );
            }
            convert(node, parent)
        })
        .collect()
}

fn convert(raw: RawNode, parent: &TreePath) -> FileNode {
    let RawNode {
        name,
        kind,
        children,
        url,
        last_modified,
        size,
    } = raw;
    let path = parent.child(name.as_str());

    let kind = match (kind, &children) {
        (Some(tag), _) => FileKind::from_tag(&tag).unwrap_or_else(|| {
            tracing::debug!("unknown type '{}' for /{}, treating as file", tag, path);
            FileKind::File
        }),
        (None, Some(_)) => FileKind::Directory,
        (None, None) => FileKind::from_name(&name),
    };

    let children = match (kind, children) {
        (FileKind::Directory, Some(children)) => convert_level(children, &path),
        (_, Some(children)) if !children.is_empty() => {
            tracing::warn!("dropping {} children of non-directory /{}", children.len(), path);
            Vec::new()
        }
        _ => Vec::new(),
    };

    let url = if kind == FileKind::Link { url } else { None };
    let size = if kind.is_sized() {
        size.and_then(|value| value.as_u64())
    } else {
        None
    };
    let last_modified = last_modified.and_then(|value| {
        let parsed = parse_timestamp(&value);
        if parsed.is_none() {
            tracing::debug!("ignoring unparseable lastModified {} on /{}", value, path);
        }
        parsed
    });

    FileNode {
        name,
        kind,
        children,
        url,
        last_modified,
        size,
    }
}

/// Numbers are epoch milliseconds; strings are RFC 3339 or ISO-8601, with offset-less
/// values taken as UTC.
fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.trunc() as i64))?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        }
        Value::String(text) => parse_text_timestamp(text.trim()),
        _ => None,
    }
}

fn parse_text_timestamp(text: &str) -> Option<OffsetDateTime> {
    if let Ok(at) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(at);
    }
    if let Ok(at) = OffsetDateTime::parse(text, &Iso8601::DEFAULT) {
        return Some(at);
    }
    if let Ok(at) = PrimitiveDateTime::parse(text, &Iso8601::DEFAULT) {
        return Some(at.assume_utc());
    }
    if let Ok(at) = PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(at.assume_utc());
    }
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn accepts_wrapped_and_bare_documents() {
        let wrapped = parse_document(json!({ "files": [{ "name": "a.txt" }] })).unwrap();
        let bare = parse_document(json!([{ "name": "a.txt" }])).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped[0].kind(), FileKind::File);
    }

    #[test]
    fn rejects_documents_of_the_wrong_shape() {
        for document in [
            json!("files"),
            json!({ "entries": [] }),
            json!({ "files": { "name": "a" } }),
            json!({ "files": [42] }),
            json!({ "files": [{ "title": "no name" }] }),
            json!({ "files": [{ "name": 7 }] }),
            json!({ "files": [{ "name": "d", "children": [{ "type": "file" }] }] }),
        ] {
            let err = parse_document(document.clone()).unwrap_err();
            assert!(
                matches!(err, Error::MalformedTree(_)),
                "expected MalformedTree for {document}"
            );
        }
    }

    #[test]
    fn children_make_a_directory() {
        let nodes = parse_document(json!({
            "files": [
                { "name": "implicit", "children": [{ "name": "x.gif" }] },
                { "name": "explicit", "type": "directory" }
            ]
        }))
        .unwrap();
        assert_eq!(nodes[0].kind(), FileKind::Directory);
        assert_eq!(nodes[0].children()[0].kind(), FileKind::Image);
        assert_eq!(nodes[1].kind(), FileKind::Directory);
        assert!(nodes[1].children().is_empty());
    }

    #[test]
    fn explicit_leaf_kinds_drop_children_and_foreign_fields() {
        let nodes = parse_document(json!({
            "files": [
                { "name": "snake", "type": "game", "children": [{ "name": "index.html" }], "url": "x" },
                { "name": "blog", "type": "link", "url": "https://example.com", "size": 10 },
                { "name": "notes", "type": "mystery" }
            ]
        }))
        .unwrap();
        assert_eq!(nodes[0].kind(), FileKind::Game);
        assert!(nodes[0].children().is_empty());
        assert_eq!(nodes[0].url(), None);
        assert_eq!(nodes[1].url(), Some("https://example.com"));
        assert_eq!(nodes[1].size(), None);
        assert_eq!(nodes[2].kind(), FileKind::File);
    }

    #[test]
    fn numeric_sizes_in_the_document_count_as_resolved() {
        let nodes = parse_document(json!([
            { "name": "a.zip", "size": 2048 },
            { "name": "b.zip", "size": "2 KB" },
            { "name": "c.zip", "size": -1 }
        ]))
        .unwrap();
        assert_eq!(nodes[0].size(), Some(2048));
        assert_eq!(nodes[1].size(), None);
        assert_eq!(nodes[2].size(), None);
    }

    #[test]
    fn duplicate_names_load_in_order() {
        let nodes = parse_document(json!([{ "name": "a" }, { "name": "a", "type": "image" }])).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].kind(), FileKind::Image);
    }

    #[test]
    fn parses_timestamps() {
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T12:30:00Z")),
            Some(datetime!(2024-03-01 12:30:00 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T12:30:00")),
            Some(datetime!(2024-03-01 12:30:00 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01")),
            Some(datetime!(2024-03-01 00:00:00 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!(1_700_000_000_000i64)),
            Some(datetime!(2023-11-14 22:13:20 UTC))
        );
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
    }
}
