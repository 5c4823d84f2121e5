//! Query string rewriting.

use regex::Regex;

/// Set `key=value` in `url`'s query string.
///
/// Existing occurrences of the key are overwritten in place; otherwise the
/// pair is appended with `&` or `?` as appropriate. An empty url or key
/// returns the url untouched.
pub fn replace_param(url: &str, key: &str, value: &str) -> String {
    if url.is_empty() || key.is_empty() {
        return url.to_string();
    }

    let pattern = format!(r"([?&]){}=[^&#]*", regex::escape(key));
    let Ok(re) = Regex::new(&pattern) else {
        return url.to_string();
    };

    if re.is_match(url) {
        return re
            .replace_all(url, |caps: &regex::Captures| {
                format!("{}{}={}", &caps[1], key, value)
            })
            .into_owned();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, key, value)
}
