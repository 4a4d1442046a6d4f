use regex::Regex;
use std::sync::OnceLock;

fn non_alnum() -> &'static Regex {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug regex is valid"))
}

/// 根据名称生成 URL slug，例如 "Acme Shoes & Co." -> "acme-shoes-co"
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    non_alnum()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// 取客户端提供的 slug，缺省时由名称生成；两者都为空时返回 None
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Option<String> {
    let slug = match explicit {
        Some(s) if !s.trim().is_empty() => slugify(s),
        _ => slugify(name),
    };
    if slug.is_empty() { None } else { Some(slug) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme Shoes & Co."), "acme-shoes-co");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("Ünïcode"), "n-code");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(Some("Custom Slug"), "Name"), Some("custom-slug".into()));
        assert_eq!(resolve_slug(Some("  "), "Fallback Name"), Some("fallback-name".into()));
        assert_eq!(resolve_slug(None, "!!!"), None);
    }
}
