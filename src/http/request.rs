use std::collections::HashMap;
use url::Url;

pub struct HttpRequest {
    http_version: String,
    headers: HashMap<String, String>,
    pub method: String,
    pub url: Url,
}

impl HttpRequest {
    pub fn render(&self) -> String {
        let mut headers = self
            .headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}\r\n"))
            .collect::<Vec<String>>();
        headers.sort();
        let headers = headers.join("");
        let path_with_query = match self.url.query() {
            Some(query) => self.url.path().to_string() + "?" + query,
            None => self.url.path().to_string(),
        };
        // Servers reject a POST without a length even when the body is empty.
        let content_length = if self.method == "POST" {
            "content-length: 0\r\n"
        } else {
            ""
        };
        let optional_port = self
            .url
            .port()
            .map(|port| format!(":{port}"))
            .unwrap_or_default();
        format!(
            "{method} {path_with_query} HTTP/{version}\r\n\
            host: {hostname}{optional_port}\r\n\
            {headers}{content_length}\r\n",
            version = self.http_version,
            method = self.method,
            hostname = self.url.host_str().unwrap_or_default(),
        )
    }

    pub fn new(http_version: &str, method: &str, url: Url) -> Self {
        let mut request = Self {
            http_version: http_version.to_string(),
            headers: HashMap::new(),
            method: method.to_uppercase(),
            url,
        };
        request.headers.insert("accept".into(), "*/*".into());
        request.headers.insert("accept-encoding".into(), "identity".into());
        request.headers.insert("connection".into(), "close".into());
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_carries_zero_length() {
        let url = Url::parse("http://127.0.0.1:8090/authentication/logout").unwrap();
        let payload = HttpRequest::new("1.1", "post", url).render();
        assert!(payload.starts_with("POST /authentication/logout HTTP/1.1\r\nhost: 127.0.0.1:8090\r\n"));
        assert!(payload.contains("content-length: 0\r\n"));
        assert!(payload.contains("connection: close\r\n"));
        assert!(payload.ends_with("\r\n\r\n"));
    }

    #[test]
    fn get_keeps_query_and_skips_length() {
        let url = Url::parse("https://example.org/articles/tech/456?x=1").unwrap();
        let payload = HttpRequest::new("1.1", "GET", url).render();
        assert!(payload.starts_with("GET /articles/tech/456?x=1 HTTP/1.1\r\nhost: example.org\r\n"));
        assert!(!payload.contains("content-length"));
        assert!(payload.ends_with("\r\n\r\n"));
    }
}
