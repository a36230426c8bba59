use std::sync::OnceLock;

use regex::Regex;

// ============== Text Helpers ==============

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============== List Helpers ==============

pub const DEFAULT_TRIM_LEN: usize = 10;

/// Keep the first `max_len` items and summarise the rest as `"N more..."`.
pub fn trim_list(items: &[String], max_len: usize) -> Vec<String> {
    if items.len() <= max_len {
        return items.to_vec();
    }
    let hidden = items.len() - max_len;
    let mut out = items[..max_len].to_vec();
    out.push(format!("{hidden} more..."));
    out
}

// ============== Size Helpers ==============

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable byte count in powers of 1024, at most two decimals.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0usize;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

// ============== Attachment Helpers ==============

static MEDIA_URL: OnceLock<Regex> = OnceLock::new();

fn media_url() -> &'static Regex {
    MEDIA_URL.get_or_init(|| {
        Regex::new(r"(?i)\.(?:gif|png|jpe?g|mp4|mp3|pdf|psd)(?:[?#].*)?$")
            .expect("valid regex")
    })
}

/// Attachment URLs whose path ends in a known media extension, in order.
pub fn media_attachments<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .map(|url| url.as_ref())
        .filter(|url| media_url().is_match(url))
        .map(str::to_string)
        .collect()
}
