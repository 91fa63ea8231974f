//! Multistatus parsing for PROPFIND listings.

use quick_xml::{Reader, events::Event};

use crate::Res;

/// One `<response>` of a multistatus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub href: String,
    pub is_collection: bool,
}

/// Extracts the href and collection flag of every response element.
///
/// Namespace prefixes are ignored; only local names are matched.
pub fn parse_multistatus(xml: &str) -> Res<Vec<Entry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<Entry> = None;
    let mut in_href = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"response" => {
                    current = Some(Entry {
                        href: String::new(),
                        is_collection: false,
                    });
                }
                b"href" => in_href = current.as_ref().is_some_and(|c| c.href.is_empty()),
                b"collection" => {
                    if let Some(entry) = current.as_mut() {
                        entry.is_collection = true;
                    }
                }
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"collection" => {
                if let Some(entry) = current.as_mut() {
                    entry.is_collection = true;
                }
            }
            Event::Text(ref text) if in_href => {
                if let Some(entry) = current.as_mut() {
                    entry.href = text.unescape()?.trim().to_string();
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"href" => in_href = false,
                b"response" => {
                    if let Some(entry) = current.take().filter(|e| !e.href.is_empty()) {
                        entries.push(entry);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}
