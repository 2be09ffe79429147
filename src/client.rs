//! Named wrappers over the test service endpoints.
//!
//! Path parameters are pasted into the URL as given unless `encode_path` is set,
//! so a `/`, `?` or `#` inside a parameter changes which resource is hit.

use crate::{
    configuration::{Configuration, ReportStyle, ResponseField},
    http::{request::HttpRequest, response::HttpResponse, Transport},
    SmokebenchError,
};
use serde_json::Value;
use std::io::{self, Write};
use url::Url;

pub struct ApiClient<W: Write = io::Stdout> {
    base_url: Url,
    http_version: String,
    transport: Transport,
    encode_path: bool,
    response_field: ResponseField,
    report: ReportStyle,
    out: W,
}

impl ApiClient<io::Stdout> {
    pub fn new(config: &Configuration) -> Result<Self, SmokebenchError> {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> ApiClient<W> {
    pub fn with_output(config: &Configuration, out: W) -> Result<Self, SmokebenchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SmokebenchError::new(format!("invalid base url {}: {e}", config.base_url)))?;
        Ok(Self {
            base_url,
            http_version: config.http_version.clone(),
            transport: Transport {
                timeout: config.timeout(),
                insecure: config.insecure,
            },
            encode_path: config.encode_path,
            response_field: config.response_field,
            report: config.report,
            out,
        })
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<HttpResponse, SmokebenchError> {
        let url = self.endpoint("/authentication/login", &[username, password])?;
        let response = self.call("POST", url)?;
        writeln!(self.out, "* AUTH: <Response [{}]>", response.status).map_err(write_failed)?;
        Ok(response)
    }

    pub fn logout(&mut self) -> Result<HttpResponse, SmokebenchError> {
        let url = self.endpoint("/authentication/logout", &[])?;
        self.call_and_report("POST", url)
    }

    pub fn get_survey_result(&mut self, accept_no: &str) -> Result<HttpResponse, SmokebenchError> {
        let url = self.endpoint("/meters/setting-result", &[accept_no])?;
        self.call_and_report("GET", url)
    }

    pub fn get_article(&mut self, category: &str, id: &str) -> Result<HttpResponse, SmokebenchError> {
        let url = self.endpoint("/articles", &[category, id])?;
        self.call_and_report("GET", url)
    }

    pub fn post_article(&mut self, session_id: &str, content: &str) -> Result<HttpResponse, SmokebenchError> {
        let url = self.endpoint("/post/article", &[session_id, content])?;
        self.call_and_report("POST", url)
    }

    fn call(&self, method: &str, url: Url) -> Result<HttpResponse, SmokebenchError> {
        let request = HttpRequest::new(&self.http_version, method, url);
        self.transport.send(&request)
    }

    fn call_and_report(&mut self, method: &str, url: Url) -> Result<HttpResponse, SmokebenchError> {
        let response = self.call(method, url.clone())?;
        match self.report {
            ReportStyle::ReturnValue => write_return_value(&mut self.out, &response, self.response_field)?,
            ReportStyle::Summary => write_summary(&mut self.out, method, &url, &response).map_err(write_failed)?,
        }
        Ok(response)
    }

    fn endpoint(&self, prefix: &str, params: &[&str]) -> Result<Url, SmokebenchError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        if !self.encode_path {
            let raw = params.iter().fold(format!("{base}{prefix}"), |url, p| format!("{url}/{p}"));
            return Url::parse(&raw).map_err(|e| SmokebenchError::new(format!("invalid url {raw}: {e}")));
        }
        let mut url = Url::parse(&format!("{base}{prefix}"))
            .map_err(|e| SmokebenchError::new(format!("invalid url {base}{prefix}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SmokebenchError::new(format!("{base} cannot carry a path")))?
            .extend(params);
        Ok(url)
    }
}

pub(crate) fn write_failed(e: io::Error) -> SmokebenchError {
    SmokebenchError::new(format!("cannot write to the console: {e}"))
}

/// Separator, request line, status, then the JSON body or the raw text when it does not parse.
pub fn write_summary(out: &mut impl Write, method: &str, url: &Url, response: &HttpResponse) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "{method} {url}")?;
    writeln!(out, "Status Code: {}", response.status)?;
    match response.json() {
        Ok(json) => {
            writeln!(out, "Response JSON:")?;
            writeln!(out, "{json}")
        }
        Err(_) => {
            writeln!(out, "Response Content:")?;
            writeln!(out, "{}", response.text())
        }
    }
}

/// Print only the service's return field. A body without it is an error.
pub fn write_return_value(
    out: &mut impl Write,
    response: &HttpResponse,
    field: ResponseField,
) -> Result<(), SmokebenchError> {
    let json = response.json()?;
    let value = json
        .get(field.key())
        .ok_or_else(|| SmokebenchError::new(format!("missing {} in response", field.key())))?;
    writeln!(out, "<return> {}", display_value(value)).map_err(write_failed)
}

/// Session token from a login response.
pub fn session_id(response: &HttpResponse) -> Result<String, SmokebenchError> {
    let json = response
        .json()
        .map_err(|e| SmokebenchError::new(format!("login failed with status {}: {}", response.status, e.reason)))?;
    json.get("sessionId")
        .map(display_value)
        .ok_or_else(|| SmokebenchError::new("missing sessionId in login response"))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
