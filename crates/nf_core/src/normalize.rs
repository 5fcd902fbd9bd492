//! Text and URL normalization used for comparison and fingerprinting.

use url::Url;

/// Wire-service prefixes that outlets prepend to otherwise identical titles.
const TITLE_PREFIXES: &[&str] = &[
    "breaking:", "exclusive:", "update:", "news:", "latest:", "urgent:", "live:", "developing:",
    "alert:", "report:", "analysis:",
];

/// Outlet suffixes appended to syndicated titles.
const TITLE_SUFFIXES: &[&str] = &[
    "- live updates",
    "- breaking news",
    "- latest news",
    "- report",
    "| reuters",
    "| bbc",
    "| cnn",
    "| times",
    "| news",
];

/// Canonical form of a link: lower-cased scheme, host, and path with the
/// query string, fragment, trailing slash, and any `www.` host prefix
/// removed.
///
/// Links that do not parse as absolute URLs fall back to a trimmed,
/// lower-cased string with query and fragment cut off manually.
pub fn canonicalize_url(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(parsed) = Url::parse(trimmed) {
        if let Some(host) = parsed.host_str() {
            let scheme = parsed.scheme().to_ascii_lowercase();
            let host = host.to_ascii_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(host.as_str());
            let path = parsed.path().to_lowercase();
            let path = path.trim_end_matches('/');
            return match parsed.port() {
                Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
                None => format!("{}://{}{}", scheme, host, path),
            };
        }
    }

    let lowered = trimmed.to_lowercase();
    let cut = lowered
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    cut.trim_end_matches('/').to_string()
}

/// Light normalization for fuzzy title comparison: lower-case, trim, and
/// collapse runs of whitespace.
pub fn normalize_title_for_match(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Aggressive normalization for title fingerprints: strip wire prefixes and
/// outlet suffixes, then keep only alphanumeric words.
pub fn normalize_title_for_hash(title: &str) -> String {
    let mut text = title.to_lowercase().trim().to_string();

    for prefix in TITLE_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim().to_string();
            break;
        }
    }

    for suffix in TITLE_SUFFIXES {
        if let Some(rest) = text.strip_suffix(suffix) {
            text = rest.trim().to_string();
            break;
        }
    }

    keep_word_chars(&text)
}

/// Normalization for content fingerprints: drop markup, links, and mail
/// addresses, then keep only alphanumeric words.
pub fn normalize_content(content: &str) -> String {
    let stripped = strip_tags(&content.to_lowercase());
    let without_links: Vec<&str> = stripped
        .split_whitespace()
        .filter(|token| {
            !token.starts_with("http://") && !token.starts_with("https://") && !token.contains('@')
        })
        .collect();
    keep_word_chars(&without_links.join(" "))
}

/// Replace every non-alphanumeric char with a space and collapse the result.
fn keep_word_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `<...>` spans. Unterminated tags swallow the remainder, matching
/// how feed fragments with broken markup should be treated: as noise.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
