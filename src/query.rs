//! Query options: request-shaping flags mapped to query parameters.
//!
//! Boolean flags become `name=true` when set and are omitted otherwise. The two
//! list flags take a comma-separated value and are re-encoded as a compact JSON
//! array of strings, e.g. `foo,bar,baz` becomes `["foo","bar","baz"]`.

use std::collections::BTreeMap;

use serde_json::Value;

/// Query parameters, ordered by name. Each name may carry several values.
pub type Query = BTreeMap<String, Vec<String>>;

/// The fixed set of query-shaping flags accepted by `get` operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFlags {
    pub include_attachments: bool,
    pub include_att_encoding: bool,
    pub include_conflicts: bool,
    pub include_deleted_conflicts: bool,
    pub force_latest: bool,
    pub include_local_seq: bool,
    pub meta: bool,
    pub revs: bool,
    pub revs_info: bool,
    /// Comma-separated revisions.
    pub attachments_since: Option<String>,
    /// Comma-separated revisions.
    pub open_revs: Option<String>,
}

impl QueryFlags {
    /// Query parameter names paired with their flag values.
    fn booleans(&self) -> [(&'static str, bool); 9] {
        [
            ("attachments", self.include_attachments),
            ("att_encoding_info", self.include_att_encoding),
            ("conflicts", self.include_conflicts),
            ("deleted_conflicts", self.include_deleted_conflicts),
            ("latest", self.force_latest),
            ("local_seq", self.include_local_seq),
            ("meta", self.meta),
            ("revs", self.revs),
            ("revs_info", self.revs_info),
        ]
    }

    /// Build the query parameters these flags describe.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        for (name, set) in self.booleans() {
            if set {
                query.insert(name.to_string(), vec!["true".to_string()]);
            }
        }
        let lists = [
            ("atts_since", &self.attachments_since),
            ("open_revs", &self.open_revs),
        ];
        for (name, value) in lists {
            if let Some(value) = value {
                query.insert(name.to_string(), vec![json_list(value)]);
            }
        }
        query
    }
}

/// Re-encode a comma-separated list as a compact JSON array of strings.
///
/// Empty entries (from `a,,b` or a trailing comma) are dropped.
pub fn json_list(value: &str) -> String {
    let items: Vec<String> = value
        .split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    Value::from(items).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn no_flags_no_query() {
        assert!(QueryFlags::default().to_query().is_empty());
    }

    #[rstest]
    #[case::attachments(QueryFlags { include_attachments: true, ..Default::default() }, "attachments")]
    #[case::att_encoding(QueryFlags { include_att_encoding: true, ..Default::default() }, "att_encoding_info")]
    #[case::conflicts(QueryFlags { include_conflicts: true, ..Default::default() }, "conflicts")]
    #[case::deleted_conflicts(QueryFlags { include_deleted_conflicts: true, ..Default::default() }, "deleted_conflicts")]
    #[case::latest(QueryFlags { force_latest: true, ..Default::default() }, "latest")]
    #[case::local_seq(QueryFlags { include_local_seq: true, ..Default::default() }, "local_seq")]
    #[case::meta(QueryFlags { meta: true, ..Default::default() }, "meta")]
    #[case::revs(QueryFlags { revs: true, ..Default::default() }, "revs")]
    #[case::revs_info(QueryFlags { revs_info: true, ..Default::default() }, "revs_info")]
    fn boolean_flag_sets_exactly_one_param(#[case] flags: QueryFlags, #[case] param: &str) {
        let query = flags.to_query();
        assert_eq!(query.len(), 1);
        assert_eq!(query[param], vec!["true".to_string()]);
    }

    #[test]
    fn attachments_since_is_json_array() {
        let flags = QueryFlags {
            attachments_since: Some("foo,bar,baz".into()),
            ..Default::default()
        };
        let query = flags.to_query();
        assert_eq!(query["atts_since"], vec![r#"["foo","bar","baz"]"#.to_string()]);
    }

    #[test]
    fn open_revs_is_json_array() {
        let flags = QueryFlags {
            open_revs: Some("1-abc".into()),
            ..Default::default()
        };
        assert_eq!(flags.to_query()["open_revs"], vec![r#"["1-abc"]"#.to_string()]);
    }

    #[rstest]
    #[case("foo,bar,baz", r#"["foo","bar","baz"]"#)]
    #[case("a,,b,", r#"["a","b"]"#)]
    #[case("", "[]")]
    #[case(r#"say"hi""#, r#"["say\"hi\""]"#)]
    fn json_list_encoding(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(json_list(input), expected);
    }

    #[test]
    fn keys_are_sorted() {
        let flags = QueryFlags {
            revs_info: true,
            include_attachments: true,
            meta: true,
            ..Default::default()
        };
        let query = flags.to_query();
        let keys: Vec<&str> = query.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["attachments", "meta", "revs_info"]);
    }
}
