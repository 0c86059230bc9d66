//! XML decoding utilities.
//!
//! Sonos payloads mix several namespaces (`dc:`, `upnp:`, `r:`) and the
//! serde structs in this crate are written against local names only, so every
//! document is passed through [`strip_namespaces`] before quick-xml sees it.

use crate::error::{ParseError, ParseResult};
use serde::de::DeserializeOwned;

/// Parse XML into a deserializable type after stripping namespace prefixes.
pub fn parse<T: DeserializeOwned>(xml: &str) -> ParseResult<T> {
    if xml.trim().is_empty() {
        return Err(ParseError::EmptyDocument(std::any::type_name::<T>().to_string()));
    }
    let stripped = strip_namespaces(xml);
    quick_xml::de::from_str(&stripped)
        .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))
}

/// Remove namespace prefixes from element and attribute names and drop
/// `xmlns` declarations. Text content and attribute values are untouched.
///
/// Input: `<e:propertyset><dc:title>Song</dc:title></e:propertyset>`
/// Output: `<propertyset><title>Song</title></propertyset>`
pub fn strip_namespaces(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let markup = &rest[open + 1..];

        let end = if markup.starts_with('!') {
            markup.find('>')
        } else {
            tag_end(markup)
        };
        let Some(end) = end else {
            // unterminated tag, leave it for the deserializer to reject
            out.push_str(&rest[open..]);
            return out;
        };

        out.push('<');
        out.push_str(&strip_tag(&markup[..end]));
        out.push('>');
        rest = &markup[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Position of the `>` closing a tag, ignoring any inside quoted values.
fn tag_end(markup: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in markup.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn strip_tag(tag: &str) -> String {
    if tag.starts_with('?') || tag.starts_with('!') {
        return tag.to_string();
    }
    if let Some(name) = tag.strip_prefix('/') {
        return format!("/{}", local_name(name.trim()));
    }

    let self_closing = tag.ends_with('/');
    let body = tag.strip_suffix('/').unwrap_or(tag);
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());

    let mut out = local_name(&body[..name_end]).to_string();
    let mut rest = body[name_end..].trim_start();

    while let Some(eq) = rest.find('=') {
        let attr = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            break;
        };
        let Some(close) = after[1..].find(quote) else {
            break;
        };

        if attr != "xmlns" && !attr.starts_with("xmlns:") {
            out.push(' ');
            out.push_str(local_name(attr));
            out.push('=');
            out.push_str(&after[..close + 2]);
        }
        rest = after[close + 2..].trim_start();
    }

    if self_closing {
        out.push('/');
    }
    out
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[rstest]
    #[case(
        r#"<e:propertyset><e:property>test</e:property></e:propertyset>"#,
        r#"<propertyset><property>test</property></propertyset>"#
    )]
    #[case(r#"<dc:title id="1">Song</dc:title>"#, r#"<title id="1">Song</title>"#)]
    #[case(
        r#"<dc:title>Song</dc:title><upnp:album>Album</upnp:album>"#,
        r#"<title>Song</title><album>Album</album>"#
    )]
    #[case(
        r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"><item id="Q:0/1"/></DIDL-Lite>"#,
        r#"<DIDL-Lite><item id="Q:0/1"/></DIDL-Lite>"#
    )]
    #[case(
        r#"<?xml version="1.0"?><r:streamContent>a > b</r:streamContent>"#,
        r#"<?xml version="1.0"?><streamContent>a > b</streamContent>"#
    )]
    fn test_strip_namespaces(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_namespaces(input), expected);
    }

    #[test]
    fn test_strip_namespaces_keeps_attribute_values_with_colons_and_gt() {
        let input = r#"<res protocolInfo="x-rincon-queue:*:*:*" note="a>b">x-rincon-queue:RINCON_1#0</res>"#;
        assert_eq!(strip_namespaces(input), input);
    }

    #[test]
    fn test_parse_with_namespaces() {
        let xml = r#"<e:propertyset xmlns:e="urn:test"><e:property><Value val="test"/></e:property></e:propertyset>"#;

        #[derive(Debug, Deserialize)]
        struct PropertySet {
            property: Property,
        }

        #[derive(Debug, Deserialize)]
        struct Property {
            #[serde(rename = "Value")]
            value: Value,
        }

        #[derive(Debug, Deserialize)]
        struct Value {
            #[serde(rename = "@val")]
            val: String,
        }

        let result: PropertySet = parse(xml).unwrap();
        assert_eq!(result.property.value.val, "test");
    }

    #[test]
    fn test_parse_empty_document() {
        #[derive(Debug, Deserialize)]
        struct Anything {}

        let result: ParseResult<Anything> = parse("   ");
        assert!(matches!(result, Err(ParseError::EmptyDocument(_))));
    }
}
