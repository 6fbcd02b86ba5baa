//! XML rendering for `urlset` and `sitemapindex` documents
//!
//! Documents are rendered as UTF-8 and then encoded into the configured output
//! encoding. Characters the output encoding cannot represent are written as
//! decimal character references (`&#20013;`).

use crate::sitemap::OutputEntry;
use crate::{ConfigError, ConfigResult};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io;

/// Namespace declared on both root elements
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Resolves a configured encoding label to the encoding files are written in
///
/// Labels are matched the way browsers match them ("latin1", "utf8" and
/// "Shift_JIS" are all known). Encodings that can only be decoded, such as
/// UTF-16, resolve to UTF-8.
pub fn resolve_encoding(label: &str) -> ConfigResult<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .map(Encoding::output_encoding)
        .ok_or_else(|| ConfigError::Validation(format!("unknown file_encoding '{}'", label)))
}

/// Renders a `urlset` document holding `entries` in order
pub fn render_urlset(entries: &[OutputEntry], encoding: &'static Encoding) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_prolog(&mut writer, encoding)?;
    writer.write_event(Event::Start(root_element("urlset")))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.location)?;
        write_text_element(&mut writer, "lastmod", &entry.last_modified)?;
        write_text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    encode_document(writer.into_inner(), encoding)
}

/// Renders a `sitemapindex` document with one `sitemap` per location, all sharing `last_modified`
pub fn render_sitemap_index(
    locations: &[String],
    last_modified: &str,
    encoding: &'static Encoding,
) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_prolog(&mut writer, encoding)?;
    writer.write_event(Event::Start(root_element("sitemapindex")))?;

    for location in locations {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", location)?;
        write_text_element(&mut writer, "lastmod", last_modified)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    encode_document(writer.into_inner(), encoding)
}

fn write_prolog(writer: &mut Writer<Vec<u8>>, encoding: &'static Encoding) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding.name()), None)))
}

fn root_element(name: &str) -> BytesStart<'_> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    element
}

/// Writes `<tag>text</tag>`, escaping the text
fn write_text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))
}

fn encode_document(rendered: Vec<u8>, encoding: &'static Encoding) -> io::Result<Vec<u8>> {
    if encoding == UTF_8 {
        return Ok(rendered);
    }

    let xml =
        String::from_utf8(rendered).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let (bytes, _, _) = encoding.encode(&xml);
    Ok(bytes.into_owned())
}

/// Text content of every `tag` element in a UTF-8 document, in document order
#[cfg(test)]
pub(crate) fn element_texts(xml: &str, tag: &str) -> Vec<String> {
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => inside = e.name().as_ref() == tag.as_bytes(),
            Event::Text(text) if inside => texts.push(text.unescape().unwrap().into_owned()),
            Event::End(_) => inside = false,
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}

/// Number of `tag` elements in a UTF-8 document
#[cfg(test)]
pub(crate) fn element_count(xml: &str, tag: &str) -> usize {
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == tag.as_bytes() => count += 1,
            Event::Eof => break,
            _ => {}
        }
    }
    count
}
