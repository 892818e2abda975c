//! Resource references and routing
//!
//! A reference has the form `<scheme>://<authority>/<table>[/<id>]`. Routing
//! is a fixed table of path patterns, where `#` matches one numeric segment.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::contract::{tables, AUTHORITY, SCHEME};
use crate::error::PolicyError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

/// What a reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The whole rule table
    Table,
    /// One rule by `_id`
    Row(i64),
}

#[derive(Clone, Copy)]
enum RouteKind {
    Table,
    Row,
}

const ROUTES: &[(&[&str], RouteKind)] = &[
    (&[tables::IP_PORT_TABLE], RouteKind::Table),
    (&[tables::IP_PORT_TABLE, "#"], RouteKind::Row),
];

impl ResourceRef {
    pub fn new<I, S>(scheme: &str, authority: &str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;

        let mut authority = url.host_str().unwrap_or_default().to_string();
        if let Some(port) = url.port() {
            authority.push_str(&format!(":{}", port));
        }

        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
            segments,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Reference to row `id` under this reference.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut appended = self.clone();
        appended.segments.push(id.to_string());
        appended
    }

    /// Match this reference against the route table.
    pub fn route(&self) -> Option<Route> {
        if self.scheme != SCHEME || !self.authority.eq_ignore_ascii_case(AUTHORITY) {
            return None;
        }

        ROUTES.iter().find_map(|(pattern, kind)| {
            if pattern.len() != self.segments.len() {
                return None;
            }

            let mut id = None;
            for (expected, actual) in pattern.iter().zip(&self.segments) {
                if *expected == "#" {
                    if actual.is_empty() || !actual.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    id = Some(actual.parse::<i64>().ok()?);
                } else if *expected != actual.as_str() {
                    return None;
                }
            }

            match (kind, id) {
                (RouteKind::Table, _) => Some(Route::Table),
                (RouteKind::Row, Some(id)) => Some(Route::Row(id)),
                (RouteKind::Row, None) => None,
            }
        })
    }

    /// Like [`ResourceRef::route`], but an unknown reference is an error.
    pub fn require_route(&self) -> Result<Route> {
        self.route()
            .ok_or_else(|| PolicyError::UnsupportedUri(self.to_string()))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceRef {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::uris;

    #[test]
    fn test_table_reference() {
        let table = uris::ip_port_table();
        assert_eq!(
            table.to_string(),
            "content://com.norootfw.db.PolicyDataProvider/ip_port_table"
        );
        assert_eq!(table.route(), Some(Route::Table));
    }

    #[test]
    fn test_row_reference() {
        let row = uris::ip_port_table().with_appended_id(42);
        assert_eq!(
            row.to_string(),
            "content://com.norootfw.db.PolicyDataProvider/ip_port_table/42"
        );
        assert_eq!(row.route(), Some(Route::Row(42)));
    }

    #[test]
    fn test_parse_matches_built_reference() {
        let parsed: ResourceRef = "content://com.norootfw.db.PolicyDataProvider/ip_port_table/7"
            .parse()
            .unwrap();
        assert_eq!(parsed, uris::ip_port_table().with_appended_id(7));
        assert_eq!(parsed.authority(), AUTHORITY);
    }

    #[test]
    fn test_unknown_references_do_not_route() {
        let cases = [
            "content://com.norootfw.db.PolicyDataProvider/app_table",
            "content://com.norootfw.db.PolicyDataProvider/ip_port_table/abc",
            "content://com.norootfw.db.PolicyDataProvider/ip_port_table/1/2",
            "content://com.norootfw.db.PolicyDataProvider",
            "content://other.authority/ip_port_table",
            "file://com.norootfw.db.PolicyDataProvider/ip_port_table",
        ];

        for case in cases {
            let reference = ResourceRef::parse(case).unwrap();
            assert_eq!(reference.route(), None, "{} should not route", case);
            assert!(matches!(
                reference.require_route(),
                Err(PolicyError::UnsupportedUri(_))
            ));
        }
    }

    #[test]
    fn test_malformed_reference() {
        assert!(matches!(
            ResourceRef::parse("not a reference"),
            Err(PolicyError::InvalidReference(_))
        ));
    }
}
