//! Minimal element tree built from quick-xml events
//!
//! The e-KYC document is small (a few KB plus the photograph), so it is
//! read into memory whole and then navigated by direct-child lookups.
//! Namespace declarations are dropped and elements are keyed by local name.
//! General entities declared in an internal DTD subset are expanded once;
//! their replacement text is inserted as-is, without further expansion.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::{ExtractionError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One XML element with its attributes, direct text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name (prefix stripped)
    pub name: String,
    /// Attributes in document order, namespace declarations excluded
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA directly inside this element, unescaped
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the attribute `key`, if present
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Names of all direct children, in document order
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name.clone()).collect()
    }
}

/// Parse `bytes` as a single well-formed XML document and return its root.
pub fn parse_tree(bytes: &[u8]) -> Result<Element> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(&reader, e))?
        {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ExtractionError::MalformedDocument(
                        "content after the root element".to_string(),
                    ));
                }
                stack.push(open_element(&reader, &e, &entities)?);
            }
            Event::Empty(e) => {
                let element = open_element(&reader, &e, &entities)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                // quick-xml has already matched the end tag against the open one
                let element = stack.pop().ok_or_else(|| {
                    ExtractionError::MalformedDocument("unmatched end tag".to_string())
                })?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e
                    .unescape_with(|name: &str| resolve_entity(&entities, name))
                    .map_err(|e| malformed(&reader, e))?;
                push_text(&text, &mut stack)?;
            }
            Event::CData(e) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|e| malformed(&reader, e))?;
                push_text(&text, &mut stack)?;
            }
            Event::DocType(e) => {
                let doctype = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|e| malformed(&reader, e))?;
                entities = internal_entities(&doctype);
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ExtractionError::MalformedDocument(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ExtractionError::MalformedDocument("no root element".to_string()))
}

fn open_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    entities: &HashMap<String, String>,
) -> Result<Element> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(start.local_name().as_ref())
        .map_err(|e| malformed(reader, e))?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        if is_namespace_declaration(attr.key) {
            continue;
        }
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| malformed(reader, e))?
            .into_owned();
        let value = attr
            .decode_and_unescape_value_with(decoder, |name: &str| {
                resolve_entity(entities, name)
            })
            .map_err(|e| malformed(reader, e))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn resolve_entity<'a>(entities: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    resolve_predefined_entity(name).or_else(|| entities.get(name).map(String::as_str))
}

/// General entities with literal values from the internal subset of a doctype.
///
/// Parameter and external entities are skipped, so references to them stay
/// unresolved. The first declaration of a name wins.
fn internal_entities(doctype: &str) -> HashMap<String, String> {
    const DECLARATION: &str = "<!ENTITY";

    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(start) = rest.find(DECLARATION) {
        rest = rest[start + DECLARATION.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_end);
        let after = after.trim_start();
        rest = after;

        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &after[1..];
        let Some(end) = body.find(quote) else {
            break;
        };
        entities
            .entry(name.to_string())
            .or_insert_with(|| body[..end].to_string());
        rest = &body[end + 1..];
    }
    entities
}

fn is_namespace_declaration(key: QName<'_>) -> bool {
    let key = key.as_ref();
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(ExtractionError::MalformedDocument(
            "content after the root element".to_string(),
        ));
    }
    Ok(())
}

fn push_text(text: &Cow<'_, str>, stack: &mut [Element]) -> Result<()> {
    match stack.last_mut() {
        Some(current) => current.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(ExtractionError::MalformedDocument(
                "text outside the root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn malformed(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::MalformedDocument(format!(
        "{} (near byte {})",
        err,
        reader.buffer_position()
    ))
}
