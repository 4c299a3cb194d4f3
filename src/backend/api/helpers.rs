use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, RecordType};

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Http(e.to_string())
    }
}

/// A zone as listed by `GET /servers/{server}/zones`. Only the fields we use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiZone {
    pub id: String,
    pub name: String,
}

/// One result object from `GET /servers/{server}/search-data`. The endpoint
/// mixes zones, records and comments; record-only fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub object_type: String,
    #[serde(rename = "type")]
    pub rtype: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Body of a `PATCH /zones/{id}` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RrsetChangeset {
    pub rrsets: Vec<Rrset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rrset {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub changetype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub records: Vec<ApiRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiRecord {
    pub content: String,
    pub disabled: bool,
}

impl Rrset {
    /// Changeset entry replacing the rrset at `name` with a single record.
    pub fn replace(name: String, rtype: RecordType, ttl: u32, content: String) -> Rrset {
        Rrset {
            name,
            rtype: rtype.to_string(),
            changetype: "REPLACE".to_string(),
            ttl: Some(ttl),
            records: vec![ApiRecord {
                content,
                disabled: false,
            }],
        }
    }

    /// Changeset entry deleting the whole rrset at `name`.
    pub fn delete(name: String, rtype: RecordType) -> Rrset {
        Rrset {
            name,
            rtype: rtype.to_string(),
            changetype: "DELETE".to_string(),
            ttl: None,
            records: Vec::new(),
        }
    }
}

/// The API form of a name: always with a trailing root dot.
pub fn canonical(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

/// The caller-facing form of a name: trailing root dot trimmed.
pub fn displayed(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Record contents that are themselves domain names (PTR targets) must be
/// canonical on the wire; address contents pass through untouched.
pub fn canonical_content(rtype: RecordType, content: &str) -> String {
    match rtype {
        RecordType::Ptr => canonical(content),
        RecordType::A | RecordType::Aaaa => content.to_string(),
    }
}

/// Inverse of [`canonical_content`] for values read back from the API.
pub fn displayed_content(rtype: RecordType, content: &str) -> String {
    match rtype {
        RecordType::Ptr => displayed(content),
        RecordType::A | RecordType::Aaaa => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_canonicalize_names() {
        assert_eq!(canonical("example.com"), "example.com.");
        assert_eq!(canonical("example.com."), "example.com.");
        assert_eq!(displayed("example.com."), "example.com");
        assert_eq!(displayed("example.com"), "example.com");
    }

    #[test]
    fn should_canonicalize_ptr_contents_only() {
        assert_eq!(
            canonical_content(RecordType::Ptr, "test.example.com"),
            "test.example.com."
        );
        assert_eq!(canonical_content(RecordType::A, "10.1.1.1"), "10.1.1.1");
        assert_eq!(
            canonical_content(RecordType::Aaaa, "2001:db8::1"),
            "2001:db8::1"
        );
        assert_eq!(
            displayed_content(RecordType::Ptr, "test.example.com."),
            "test.example.com"
        );
    }

    #[test]
    fn should_serialize_replace_changeset() {
        let change = RrsetChangeset {
            rrsets: vec![Rrset::replace(
                "test.example.com.".to_string(),
                RecordType::A,
                86400,
                "10.1.1.1".to_string(),
            )],
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({
                "rrsets": [{
                    "name": "test.example.com.",
                    "type": "A",
                    "changetype": "REPLACE",
                    "ttl": 86400,
                    "records": [{"content": "10.1.1.1", "disabled": false}]
                }]
            })
        );
    }

    #[test]
    fn should_serialize_delete_changeset_without_ttl_or_records() {
        let change = RrsetChangeset {
            rrsets: vec![Rrset::delete(
                "test.example.com.".to_string(),
                RecordType::A,
            )],
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({
                "rrsets": [{
                    "name": "test.example.com.",
                    "type": "A",
                    "changetype": "DELETE",
                    "records": []
                }]
            })
        );
    }

    #[test]
    fn should_deserialize_search_hits_with_missing_record_fields() {
        // Zone hits carry no type/content/disabled
        let hits: Vec<SearchHit> = serde_json::from_str(
            r#"[
                {"name": "test.example.com.", "object_type": "record", "type": "A",
                 "content": "10.1.1.1", "disabled": false, "zone": "example.com.", "ttl": 86400},
                {"name": "example.com.", "object_type": "zone", "zone_id": "example.com."}
            ]"#,
        )
        .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].rtype.as_deref(), Some("A"));
        assert_eq!(hits[0].content.as_deref(), Some("10.1.1.1"));
        assert_eq!(hits[1].object_type, "zone");
        assert_eq!(hits[1].content, None);
        assert!(!hits[1].disabled);
    }
}
