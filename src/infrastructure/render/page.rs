//! Fetched-page model over raw HTML
//!
//! Deliberately naive, ASCII-case-insensitive string scanning - just enough
//! structure for the extraction pipeline. Retail pages are far too
//! inconsistent to reward anything fancier.

use super::RenderedPage;

/// One `<meta>` tag, reduced to its identifying keys and content
#[derive(Debug)]
struct MetaTag {
    /// Lowercased values of `property`, `name` and `itemprop`
    keys: Vec<String>,
    content: String,
}

/// A page materialized from an HTML body
pub struct FetchedPage {
    title: Option<String>,
    metas: Vec<MetaTag>,
    structured: Vec<String>,
    text: String,
    capture: Option<String>,
}

impl FetchedPage {
    pub fn from_html(html: &str) -> Self {
        Self::with_capture(html, None)
    }

    pub fn with_capture(html: &str, capture: Option<String>) -> Self {
        let lower = ascii_lower(html);
        Self {
            title: extract_title(html, &lower),
            metas: collect_metas(html, &lower),
            structured: collect_ld_json(html, &lower),
            text: extract_visible_text(html, &lower),
            capture,
        }
    }
}

impl RenderedPage for FetchedPage {
    fn meta_content(&self, field: &str) -> Option<&str> {
        let field = field.to_ascii_lowercase();
        self.metas
            .iter()
            .find(|meta| !meta.content.is_empty() && meta.keys.iter().any(|k| *k == field))
            .map(|meta| meta.content.as_str())
    }

    fn structured_data_blocks(&self) -> &[String] {
        &self.structured
    }

    fn visible_text(&self) -> &str {
        &self.text
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn capture_reference(&self) -> Option<&str> {
        self.capture.as_deref()
    }
}

// ASCII-only lowering is length-preserving, so offsets found in the lowered
// copy are valid in the original.
fn ascii_lower(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}

fn extract_title(html: &str, lower: &str) -> Option<String> {
    let open = lower.find("<title")?;
    let content_start = lower[open..].find('>')? + open + 1;
    let close = lower[content_start..].find("</title")? + content_start;
    let title = normalize_ws(&decode_entities(&html[content_start..close]));
    (!title.is_empty()).then_some(title)
}

fn collect_metas(html: &str, lower: &str) -> Vec<MetaTag> {
    let mut metas = Vec::new();
    let mut from = 0;
    while let Some(start) = lower[from..].find("<meta").map(|i| i + from) {
        let Some(tag_end) = lower[start..].find('>').map(|i| i + start) else {
            break;
        };
        let attrs = parse_attributes(&html[start + "<meta".len()..tag_end]);
        let keys: Vec<String> = attrs
            .iter()
            .filter(|(name, _)| matches!(name.as_str(), "property" | "name" | "itemprop"))
            .map(|(_, value)| value.to_ascii_lowercase())
            .collect();
        let content = attrs
            .iter()
            .find(|(name, _)| name == "content")
            .map(|(_, value)| decode_entities(value).trim().to_string())
            .unwrap_or_default();
        if !keys.is_empty() {
            metas.push(MetaTag { keys, content });
        }
        from = tag_end + 1;
    }
    metas
}

fn collect_ld_json(html: &str, lower: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut from = 0;
    while let Some(start) = lower[from..].find("<script").map(|i| i + from) {
        let Some(tag_end) = lower[start..].find('>').map(|i| i + start) else {
            break;
        };
        let is_ld_json = parse_attributes(&html[start + "<script".len()..tag_end])
            .iter()
            .any(|(name, value)| {
                name == "type" && value.trim().eq_ignore_ascii_case("application/ld+json")
            });
        let Some(close) = lower[tag_end..].find("</script").map(|i| i + tag_end) else {
            break;
        };
        if is_ld_json {
            let block = html[tag_end + 1..close].trim();
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
        }
        from = close + "</script".len();
    }
    blocks
}

// Drop script/style subtrees, strip the remaining tags, decode the handful
// of entities that matter and collapse whitespace.
fn extract_visible_text(html: &str, lower: &str) -> String {
    let mut kept = String::with_capacity(html.len());
    let mut pos = 0;
    loop {
        let next_script = lower[pos..].find("<script").map(|i| i + pos);
        let next_style = lower[pos..].find("<style").map(|i| i + pos);
        let (start, close_tag) = match (next_script, next_style) {
            (Some(s), Some(t)) if s < t => (s, "</script"),
            (Some(s), None) => (s, "</script"),
            (_, Some(t)) => (t, "</style"),
            (None, None) => break,
        };
        kept.push_str(&html[pos..start]);
        pos = match lower[start..].find(close_tag).map(|i| i + start) {
            Some(close) => lower[close..]
                .find('>')
                .map(|i| i + close + 1)
                .unwrap_or(lower.len()),
            None => lower.len(),
        };
    }
    kept.push_str(&html[pos..]);
    normalize_ws(&decode_entities(&strip_tags(&kept)))
}

/// Attribute scanner for a single tag body; tolerates unquoted values and
/// either quote style
fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = tag.trim_start();
    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = rest[..name_end].trim_matches('/').to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            if let Some(quote) = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let inner = &after_eq[1..];
                let end = inner.find(quote).unwrap_or(inner.len());
                value = inner[..end].to_string();
                rest = inner[end..].strip_prefix(quote).unwrap_or(&inner[end..]);
            } else {
                let end = after_eq
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(after_eq.len());
                value = after_eq[..end].to_string();
                rest = &after_eq[end..];
            }
        }

        if !name.is_empty() {
            attrs.push((name, value));
        }
        rest = rest.trim_start();
    }
    attrs
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                // tag boundaries separate words
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
