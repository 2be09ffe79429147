use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::{Arc, Mutex},
    thread,
};

pub struct Route {
    pub method: &'static str,
    pub prefix: &'static str,
    pub status: u16,
    pub body: &'static str,
}

pub fn route(method: &'static str, prefix: &'static str, body: &'static str) -> Route {
    Route {
        method,
        prefix,
        status: 200,
        body,
    }
}

/// Canned-response HTTP service on an ephemeral port; remembers every request line it saw.
pub struct StubService {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubService {
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(vec![]));
        let seen = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => continue,
                };
                let mut head = vec![];
                let mut byte = [0u8; 1];
                while !head.ends_with(b"\r\n\r\n") {
                    match stream.read(&mut byte) {
                        Ok(1) => head.push(byte[0]),
                        _ => break,
                    }
                }
                let head = String::from_utf8_lossy(&head).to_string();
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let mut parts = request_line.split(' ');
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(format!("{method} {path}"));

                let (status, body) = routes
                    .iter()
                    .find(|r| r.method == method && path.starts_with(r.prefix))
                    .map(|r| (r.status, r.body))
                    .unwrap_or((404, "not found"));
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });
        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
