//! Deterministic construction of endpoint URLs.

use std::fmt::Write;

/// Joins a relative endpoint path onto the base URI and appends
/// percent-encoded query parameters in insertion order.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    path: String,
    parameters: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(base_uri: &str, relative_path: &str) -> Self {
        Self {
            path: format!(
                "{}/{}",
                base_uri.trim_end_matches('/'),
                relative_path.trim_start_matches('/')
            ),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameter(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.parameters
            .push((name.to_string(), value.as_ref().to_string()));
        self
    }

    /// Appends the parameter only when a value is present.
    pub fn add_optional_parameter<V: AsRef<str>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.add_parameter(name, value),
            None => self,
        }
    }

    pub fn build(&self) -> String {
        let mut url = self.path.clone();
        for (index, (name, value)) in self.parameters.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            // Writing into a String cannot fail.
            let _ = write!(
                url,
                "{separator}{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            );
        }
        url
    }
}
