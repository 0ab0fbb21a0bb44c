use anyhow::{Context, Result, bail};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Request as seen by [`MockCatalog`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One-shot HTTP endpoint: accepts a single request, answers with a canned
/// status and body, then closes the connection.
pub struct MockCatalog {
    addr: SocketAddr,
    handle: JoinHandle<Result<CapturedRequest>>,
}

impl MockCatalog {
    pub fn start(status: u16, body: &str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("binding mock catalog")?;
        let addr = listener.local_addr()?;
        let reply = body.to_string();
        let handle = thread::spawn(move || serve_once(listener, status, &reply));
        Ok(Self { addr, handle })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait for the exchange to finish and return what the client sent.
    pub fn finish(self) -> Result<CapturedRequest> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => bail!("mock catalog thread panicked"),
        }
    }
}

/// Address that refuses connections: bound once, then released.
pub fn closed_port_url(path: &str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}{path}"))
}

fn serve_once(listener: TcpListener, status: u16, reply: &str) -> Result<CapturedRequest> {
    let (stream, _) = listener.accept().context("accepting catalog request")?;
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.parse::<usize>())
        .transpose()
        .context("parsing content-length")?
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reason(status),
        reply.len()
    )?;
    stream.flush()?;

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8(body).context("request body is not UTF-8")?,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
