use crate::SmokebenchError;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Result<Value, SmokebenchError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| SmokebenchError::new(format!("response body is not json: {e}")))
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn head_end(payload: &[u8]) -> Option<usize> {
    payload.windows(4).position(|w| w == b"\r\n\r\n")
}

/// True once `payload` holds the full head and a `content-length` body. Other framings complete at EOF.
pub fn is_complete(payload: &[u8]) -> bool {
    let Some(end) = head_end(payload) else {
        return false;
    };
    let head = String::from_utf8_lossy(&payload[..end]);
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .is_some_and(|length| payload.len() >= end + 4 + length)
}

fn decode_chunked(mut raw: &[u8]) -> Result<Vec<u8>, SmokebenchError> {
    let mut body = vec![];
    loop {
        let line_end = raw
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| SmokebenchError::new("truncated chunked body"))?;
        let size_line = String::from_utf8_lossy(&raw[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| SmokebenchError::new(format!("invalid chunk size {size_hex:?}")))?;
        raw = &raw[line_end + 2..];
        if size == 0 {
            return Ok(body);
        }
        if raw.len() < size {
            return Err(SmokebenchError::new("truncated chunked body"));
        }
        body.extend_from_slice(&raw[..size]);
        raw = raw.get(size + 2..).unwrap_or_default();
    }
}

impl TryFrom<&[u8]> for HttpResponse {
    type Error = SmokebenchError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let body_start_index = head_end(value)
            .ok_or_else(|| SmokebenchError::new("could not parse http response"))?;
        let head = String::from_utf8_lossy(&value[..body_start_index]);
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap_or_default();
        let mut parts = status_line.splitn(3, ' ');
        let status = parts
            .nth(1)
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or_else(|| SmokebenchError::new(format!("invalid status line {status_line:?}")))?;
        let reason = parts.next().unwrap_or_default().to_string();

        let mut response = HttpResponse {
            status,
            reason,
            headers: vec![],
            body: vec![],
        };
        for entry in lines {
            if let Some((k, v)) = entry.split_once(':') {
                response.headers.push((k.trim().to_lowercase(), v.trim().to_string()));
            }
        }

        let raw_body = &value[body_start_index + 4..];
        let chunked = response
            .header("transfer-encoding")
            .is_some_and(|v| v.to_lowercase().contains("chunked"));
        response.body = if chunked {
            decode_chunked(raw_body)?
        } else if let Some(length) = response
            .header("content-length")
            .and_then(|v| v.parse::<usize>().ok())
        {
            raw_body[..length.min(raw_body.len())].to_vec()
        } else {
            raw_body.to_vec()
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_headers_and_sized_body() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 21\r\n\r\n{\"sessionId\":\"abc12\"}";
        let response = HttpResponse::try_from(&raw[..]).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.json().unwrap()["sessionId"], "abc12");
    }

    #[test]
    fn decodes_chunked_body() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nplain\r\n5\r\n text\r\n0\r\n\r\n";
        let response = HttpResponse::try_from(&raw[..]).unwrap();
        assert_eq!(response.text(), "plain text");
        assert!(response.json().is_err());
    }

    #[test]
    fn body_without_framing_runs_to_end() {
        let raw = b"HTTP/1.0 404 Not Found\r\n\r\nmissing";
        let response = HttpResponse::try_from(&raw[..]).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.reason, "Not Found");
        assert_eq!(response.text(), "missing");
    }

    #[test]
    fn rejects_payload_without_head() {
        let err = HttpResponse::try_from(&b"HTTP/1.1 200 OK\r\n"[..]).unwrap_err();
        assert_eq!(err.reason, "could not parse http response");
    }

    #[test]
    fn completeness_follows_content_length() {
        assert!(!is_complete(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\no"));
        assert!(is_complete(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok"));
        assert!(!is_complete(b"HTTP/1.1 200 OK\r\n\r\nok"));
    }
}
