//! Path queries locating a sub-node inside a component instance.
//!
//! Grammar: segments separated by `>`; each segment is `$`, `TYPE` or
//! `TYPE[name="VALUE"]`. `$` stays on the current node. Every other segment
//! moves to the first pre-order descendant (the current node included) of
//! that type, optionally with that name. `$activity` inside a name is
//! replaced with the activity being extracted.

use crate::types::{Node, NodeKind};

use super::predicates::{find_first_descendant_of_type, find_first_descendant_of_type_and_name};

const ACTIVITY_PLACEHOLDER: &str = "$activity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `$`: stay on the current node.
    Root,
    /// `TYPE`
    Type(NodeKind),
    /// `TYPE[name="VALUE"]`
    TypeAndName(NodeKind, String),
    /// A segment without a valid type token; resolution skips it.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    segments: Vec<Segment>,
}

impl PathQuery {
    pub fn parse(query: &str) -> PathQuery {
        PathQuery {
            segments: split_segments(query)
                .into_iter()
                .map(|raw| parse_segment(&raw))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walks the query from `root`. `None` when any segment finds no match.
    pub fn resolve<'a>(&self, root: &'a Node, activity: Option<&str>) -> Option<&'a Node> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                Segment::Root | Segment::Invalid(_) => current,
                Segment::Type(kind) => find_first_descendant_of_type(current, *kind)?,
                Segment::TypeAndName(kind, name) => {
                    let name = name.replace(ACTIVITY_PLACEHOLDER, activity.unwrap_or(""));
                    find_first_descendant_of_type_and_name(current, *kind, &name)?
                }
            };
        }
        Some(current)
    }
}

/// Splits on `>` outside of double quotes.
fn split_segments(query: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in query.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '>' if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_segment(raw: &str) -> Segment {
    if raw == "$" {
        return Segment::Root;
    }
    let (type_token, selector) = match raw.find('[') {
        Some(open) => (&raw[..open], Some(&raw[open..])),
        None => (raw, None),
    };
    let Some(kind) = NodeKind::from_name(type_token.trim()) else {
        return Segment::Invalid(raw.to_string());
    };
    match selector {
        None => Segment::Type(kind),
        Some(selector) => match parse_name_selector(selector) {
            Some(name) => Segment::TypeAndName(kind, name),
            None => Segment::Invalid(raw.to_string()),
        },
    }
}

/// `[name="VALUE"]` → `VALUE`; quotes are optional.
fn parse_name_selector(selector: &str) -> Option<String> {
    let inner = selector.strip_prefix('[')?.strip_suffix(']')?;
    let (attr, value) = inner.split_once('=')?;
    if attr.trim() != "name" {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Node {
        Node::new("root", "Button", NodeKind::Instance).with_children(vec![
            Node::new("c", "Container", NodeKind::Frame).with_children(vec![
                Node::new("t", "Label", NodeKind::Text),
            ]),
            Node::new("h", "Hover Layer", NodeKind::Frame),
        ])
    }

    #[test]
    fn parses_segments() {
        let query = PathQuery::parse(r#"$ > FRAME[name="A > B"] > TEXT > banana"#);
        assert_eq!(
            query.segments(),
            &[
                Segment::Root,
                Segment::TypeAndName(NodeKind::Frame, "A > B".into()),
                Segment::Type(NodeKind::Text),
                Segment::Invalid("banana".into()),
            ]
        );
    }

    #[test]
    fn malformed_selector_is_invalid() {
        let query = PathQuery::parse(r#"FRAME[id="x"]"#);
        assert!(matches!(query.segments()[0], Segment::Invalid(_)));
    }

    #[test]
    fn resolves_named_frame_then_text() {
        let root = instance();
        let query = PathQuery::parse(r#"$ > FRAME[name="Container"] > TEXT"#);
        assert_eq!(query.resolve(&root, None).map(|n| n.id.as_str()), Some("t"));
    }

    #[test]
    fn missing_named_frame_fails() {
        let root = Node::new("root", "Button", NodeKind::Instance)
            .with_children(vec![Node::new("t", "Label", NodeKind::Text)]);
        let query = PathQuery::parse(r#"$ > FRAME[name="Container"] > TEXT"#);
        assert!(query.resolve(&root, None).is_none());
    }

    #[test]
    fn root_query_returns_root() {
        let root = instance();
        assert_eq!(
            PathQuery::parse("$").resolve(&root, None).map(|n| n.id.as_str()),
            Some("root")
        );
    }

    #[test]
    fn invalid_segments_are_skipped() {
        let root = instance();
        let query = PathQuery::parse("$ > NOPE > TEXT");
        assert_eq!(query.resolve(&root, None).map(|n| n.id.as_str()), Some("t"));
    }

    #[test]
    fn substitutes_activity() {
        let root = instance();
        let query = PathQuery::parse(r#"$ > FRAME[name="$activity Layer"]"#);
        assert_eq!(
            query.resolve(&root, Some("hover")).map(|n| n.id.as_str()),
            Some("h")
        );
        assert!(query.resolve(&root, None).is_none());
    }
}
