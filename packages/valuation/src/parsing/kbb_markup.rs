//! KBB page markup parsing.
//!
//! The KBB valuation page embeds a link to a "price advisor" SVG served from
//! `upa.syndication.kbb.com`. The SVG renders the private party value as a
//! text node right after its label, which is more precise than the figure
//! the structured extraction picks up from the page.

use std::sync::LazyLock;

use regex::Regex;

use super::currency::parse_currency;

static RE_ADVISOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""href"\s*:\s*"((?:https?:)?(?://)?upa\.syndication\.kbb\.com/usedcar/[^"]+)""#)
        .unwrap()
});

static RE_ADVISOR_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://)?upa\.syndication\.kbb\.com/usedcar/[^"'\s<>]+"#).unwrap()
});

static RE_PRIVATE_PARTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Private Party Value</text>\s*<text[^>]*>\s*(\$[0-9,]+)").unwrap()
});

/// Find the price advisor URL in a KBB page.
///
/// Prefers a JSON `"href": "..."` field and falls back to any bare mention.
/// Escaped ampersands are decoded and the result always carries a scheme.
pub fn find_advisor_url(markup: &str) -> Option<String> {
    if markup.is_empty() {
        return None;
    }

    let href = RE_ADVISOR_HREF
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .or_else(|| RE_ADVISOR_BARE.find(markup))?
        .as_str();

    let href = href.replace("\\u0026", "&").replace("&amp;", "&");

    if href.starts_with("http") {
        Some(href)
    } else if let Some(rest) = href.strip_prefix("//") {
        Some(format!("https://{}", rest))
    } else {
        Some(format!("https://{}", href))
    }
}

/// Read the private party value out of a price advisor SVG.
pub fn parse_private_party_value(svg: &str) -> Option<f64> {
    let amount = RE_PRIVATE_PARTY.captures(svg)?.get(1)?.as_str();
    parse_currency(Some(amount)).ok().filter(|v| *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_url_from_href_field() {
        let raw = r#"some stuff "href" : "upa.syndication.kbb.com/usedcar/test?param=1" more stuff"#;
        assert_eq!(
            find_advisor_url(raw),
            Some("https://upa.syndication.kbb.com/usedcar/test?param=1".to_string())
        );
    }

    #[test]
    fn test_advisor_url_bare() {
        let raw = "some stuff upa.syndication.kbb.com/usedcar/test?param=1 more stuff";
        assert_eq!(
            find_advisor_url(raw),
            Some("https://upa.syndication.kbb.com/usedcar/test?param=1".to_string())
        );
    }

    #[test]
    fn test_advisor_url_decodes_ampersands() {
        let raw = r#"{"href":"upa.syndication.kbb.com/usedcar/honda/odyssey/2016?a=1\u0026zipcode=10001\u0026b=2"}"#;
        assert_eq!(
            find_advisor_url(raw),
            Some(
                "https://upa.syndication.kbb.com/usedcar/honda/odyssey/2016?a=1&zipcode=10001&b=2"
                    .to_string()
            )
        );

        let html = r#"<object data="https://upa.syndication.kbb.com/usedcar/x?a=1&amp;b=2"></object>"#;
        assert_eq!(
            find_advisor_url(html),
            Some("https://upa.syndication.kbb.com/usedcar/x?a=1&b=2".to_string())
        );
    }

    #[test]
    fn test_advisor_url_keeps_scheme() {
        let raw = r#""href":"//upa.syndication.kbb.com/usedcar/x""#;
        assert_eq!(
            find_advisor_url(raw),
            Some("https://upa.syndication.kbb.com/usedcar/x".to_string())
        );
    }

    #[test]
    fn test_advisor_url_absent() {
        assert_eq!(find_advisor_url(""), None);
        assert_eq!(find_advisor_url("<html>no advisor here</html>"), None);
    }

    #[test]
    fn test_private_party_value() {
        let svg = r#"<svg><text x="1">Private Party Value</text>
            <text class="price" y="4"> $15,500</text>
            <text>Trade-In Value</text><text>$12,000</text></svg>"#;
        assert_eq!(parse_private_party_value(svg), Some(15500.0));
    }

    #[test]
    fn test_private_party_value_case_insensitive() {
        let svg = "<text>PRIVATE PARTY VALUE</text><text>$9,999</text>";
        assert_eq!(parse_private_party_value(svg), Some(9999.0));
    }

    #[test]
    fn test_private_party_value_missing() {
        assert_eq!(parse_private_party_value(""), None);
        assert_eq!(
            parse_private_party_value("<text>Trade-In Value</text><text>$12,000</text>"),
            None
        );
    }
}
