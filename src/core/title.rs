use crate::domain::model::ResolvedPost;
use regex::Regex;
use scraper::{Html, Selector};

/// 預設分隔符，依優先順序嘗試。前後帶空白，避免切到 "e-mail" 這類字中的連字號
pub const DEFAULT_SEPARATORS: [&str; 3] = [" |", " : ", " - "];

pub fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect()
}

/// Text of the first `<title>` element, trying an HTML5 parse first and a
/// plain tag scan if that finds nothing.
pub fn extract_title(html: &str) -> Option<String> {
    extract_title_strict(html).or_else(|| {
        tracing::debug!("Strict parser found no <title>, falling back to lenient scan");
        extract_title_lenient(html)
    })
}

pub fn extract_title_strict(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Tag scan over the markup with comments, `<script>` and `<style>` removed,
/// so a title inside them is never picked up.
pub fn extract_title_lenient(html: &str) -> Option<String> {
    let markup = strip_non_content(html)?;
    let re = Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").ok()?;
    re.captures(&markup)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_basic_entities(m.as_str()))
}

fn strip_non_content(html: &str) -> Option<String> {
    let patterns = [
        r"(?s)<!--.*?(-->|\z)",
        r"(?is)<script\b[^>]*>.*?(</script\s*>|\z)",
        r"(?is)<style\b[^>]*>.*?(</style\s*>|\z)",
    ];
    let mut markup = html.to_string();
    for pattern in patterns {
        let re = Regex::new(pattern).ok()?;
        markup = re.replace_all(&markup, "").into_owned();
    }
    Some(markup)
}

fn decode_basic_entities(text: &str) -> String {
    // &amp; 最後處理，避免 "&amp;lt;" 被解成 "<"
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Splits a page title into thread title and site name.
///
/// Separators are tried in order and the first one that occurs in the title
/// wins. The last segment becomes the site name; everything before it is
/// joined back with the same separator. With no match the whole title is the
/// thread title.
pub fn split_title(title: &str, separators: &[String]) -> ResolvedPost {
    for separator in separators.iter().filter(|s| !s.is_empty()) {
        let components: Vec<&str> = title.split(separator.as_str()).collect();
        if let Some((last, rest)) = components.split_last() {
            if !rest.is_empty() {
                return ResolvedPost {
                    thread_title: Some(rest.join(separator).trim().to_string()),
                    site_name: Some(last.trim().to_string()),
                };
            }
        }
    }

    ResolvedPost {
        thread_title: Some(title.trim().to_string()),
        site_name: None,
    }
}
