pub mod request;
pub mod response;

use crate::SmokebenchError;
use native_tls::TlsConnector;
use request::HttpRequest;
use response::HttpResponse;
use std::{
    io::{Read, Write},
    net::{IpAddr, SocketAddr, TcpStream},
    str::FromStr,
    time::{Duration, Instant},
};
use trust_dns_resolver::Resolver as DnsResolver;
use url::Url;

trait ReadAndWrite: Write + Read {}
impl<T: Write + Read> ReadAndWrite for T {}

/// Connection options shared by every exchange of a client.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    pub timeout: Option<Duration>,
    pub insecure: bool,
}

impl Transport {
    /// One request over a fresh connection, read until the server closes it or the body is complete.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SmokebenchError> {
        let url = &request.url;
        let start = Instant::now();
        let addr = dns_resolve(url)?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| SmokebenchError::new(format!("no port known for {url}")))?;
        let stream = self.tcp_connect(addr, port)?;
        let mut stream = self.tls_handshake(stream, url)?;

        if stream.write_all(request.render().as_bytes()).is_err() {
            return Err(SmokebenchError::new("cannot send request to the server"));
        };
        if stream.flush().is_err() {
            return Err(SmokebenchError::new(format!(
                "unexpected I/O errors while sending request to {url}"
            )));
        };

        let mut payload: Vec<u8> = vec![];
        let mut chunk = [0u8; 4096];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(size) => {
                    payload.extend_from_slice(&chunk[..size]);
                    if response::is_complete(&payload) {
                        break;
                    }
                }
                Err(_) => {
                    return Err(SmokebenchError::new("could not read the server's response"))
                }
            }
        }
        let response = HttpResponse::try_from(payload.as_slice())?;
        tracing::debug!(
            method = %request.method,
            %url,
            status = response.status,
            elapsed_us = start.elapsed().as_micros() as u64,
            "exchange done"
        );
        Ok(response)
    }

    fn tcp_connect(&self, addr: IpAddr, port: u16) -> Result<TcpStream, SmokebenchError> {
        let socket = SocketAddr::new(addr, port);
        let connected = match self.timeout {
            Some(timeout) => TcpStream::connect_timeout(&socket, timeout),
            None => TcpStream::connect(socket),
        };
        let stream = connected
            .map_err(|_| SmokebenchError::new(format!("cannot connect to {addr}:{port}")))?;
        if stream.set_read_timeout(self.timeout).is_err()
            || stream.set_write_timeout(self.timeout).is_err()
        {
            return Err(SmokebenchError::new(format!(
                "cannot configure timeouts for {addr}:{port}"
            )));
        }
        Ok(stream)
    }

    fn tls_handshake(
        &self,
        stream: TcpStream,
        url: &Url,
    ) -> Result<Box<dyn ReadAndWrite>, SmokebenchError> {
        if url.scheme() != "https" {
            return Ok(Box::new(stream));
        }
        let tls_connector = TlsConnector::builder()
            .danger_accept_invalid_hostnames(self.insecure)
            .danger_accept_invalid_certs(self.insecure)
            .build()
            .map_err(|e| SmokebenchError::new(format!("cannot build tls connector: {e}")))?;
        let domain = url.host_str().unwrap_or_default();
        match tls_connector.connect(domain, stream) {
            Ok(stream) => Ok(Box::new(stream)),
            Err(_) => Err(SmokebenchError::new(format!(
                "cannot establish a tls handshake to {domain}"
            ))),
        }
    }
}

fn dns_resolve(url: &Url) -> Result<IpAddr, SmokebenchError> {
    let host = url
        .host_str()
        .ok_or_else(|| SmokebenchError::new(format!("{url} has no host")))?;
    if url.domain().is_none() {
        let ip_str = host.trim_start_matches('[').trim_end_matches(']');
        return IpAddr::from_str(ip_str).map_err(|e| SmokebenchError::new(e.to_string()));
    }
    let resolver = DnsResolver::from_system_conf()
        .map_err(|e| SmokebenchError::new(format!("cannot read system resolver configuration: {e}")))?;
    let response = resolver
        .lookup_ip(host)
        .map_err(|e| SmokebenchError::new(e.to_string()))?;
    response
        .iter()
        .next()
        .ok_or_else(|| SmokebenchError::new("unresolved hostname"))
}
