//! Query string assembly for request URLs.
//!
//! URLs here are often templates with `{placeholders}`, so they are handled
//! as plain strings rather than parsed.

/// Ordered query parameters. Absent values are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn push_opt<V: Into<String>>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `key=value` pairs joined with `&`.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append to `url`, joining with `?` or `&` as the URL requires.
    pub fn append_to(&self, url: &str) -> String {
        if self.is_empty() {
            return url.to_string();
        }
        let separator = if !url.contains('?') {
            "?"
        } else if url.ends_with('?') || url.ends_with('&') {
            ""
        } else {
            "&"
        };
        format!("{}{}{}", url, separator, self.to_query_string())
    }
}

/// Value of query parameter `name` (case-sensitive) in `url`.
pub fn query_value<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `url` without its query string.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map(|(path, _)| path).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_separator() {
        let mut params = QueryParams::new();
        params.push("transparent", "false");
        assert_eq!(params.append_to("https://a/b"), "https://a/b?transparent=false");
        assert_eq!(params.append_to("https://a/b?f=png"), "https://a/b?f=png&transparent=false");
        assert_eq!(params.append_to("https://a/b?"), "https://a/b?transparent=false");
    }

    #[test]
    fn test_empty_params_leave_url() {
        let mut params = QueryParams::new();
        params.push_opt::<String>("bgcolor", None);
        assert!(params.is_empty());
        assert_eq!(params.append_to("https://a/{tileMatrix}"), "https://a/{tileMatrix}");
    }

    #[test]
    fn test_query_value() {
        let url = "https://a/map?SERVICE=WMS&BBOX=1,2,3,4&bbox=9";
        assert_eq!(query_value(url, "BBOX"), Some("1,2,3,4"));
        assert_eq!(query_value(url, "bbox"), Some("9"));
        assert_eq!(query_value(url, "WIDTH"), None);
        assert_eq!(query_value("https://a/map", "BBOX"), None);
        assert_eq!(strip_query(url), "https://a/map");
    }
}
