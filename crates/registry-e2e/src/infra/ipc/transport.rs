//! Tool server transports.
//!
//! Every transport yields a line-oriented duplex [`ClientConnection`]; the
//! JSON-RPC client on top does not care whether the bytes travel over a
//! child process's stdio or a socket.

use std::io::BufRead;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::net::Shutdown;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::infra::ipc::error::ClientError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

enum StreamControl {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
    Child(Child),
}

/// One open line-delimited conversation with a tool server.
pub struct ClientConnection {
    reader: BufReader<Box<dyn Read + Send>>,
    writer: Box<dyn Write + Send>,
    control: StreamControl,
}

impl ClientConnection {
    fn new(
        reader: Box<dyn Read + Send>,
        writer: Box<dyn Write + Send>,
        control: StreamControl,
    ) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            control,
        }
    }

    pub fn send_message(&mut self, message: &str) -> Result<(), ClientError> {
        trace!(bytes = message.len(), "Sending message");
        self.writer.write_all(message.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Next non-blank line, or `None` once the peer has closed its side.
    pub fn read_message(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if !line.trim().is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }

    /// Applies to sockets only; child process pipes have no read timeout.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), ClientError> {
        match &self.control {
            StreamControl::Tcp(stream) => stream.set_read_timeout(timeout)?,
            #[cfg(unix)]
            StreamControl::Unix(stream) => stream.set_read_timeout(timeout)?,
            StreamControl::Child(_) => {}
        }
        Ok(())
    }

    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<(), ClientError> {
        match &self.control {
            StreamControl::Tcp(stream) => stream.set_write_timeout(timeout)?,
            #[cfg(unix)]
            StreamControl::Unix(stream) => stream.set_write_timeout(timeout)?,
            StreamControl::Child(_) => {}
        }
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<(), ClientError> {
        match &mut self.control {
            StreamControl::Tcp(stream) => stream.shutdown(Shutdown::Both)?,
            #[cfg(unix)]
            StreamControl::Unix(stream) => stream.shutdown(Shutdown::Both)?,
            StreamControl::Child(child) => terminate_child(child),
        }
        Ok(())
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        if let StreamControl::Child(child) = &mut self.control {
            terminate_child(child);
        }
    }
}

fn terminate_child(child: &mut Child) {
    if let Ok(Some(_status)) = child.try_wait() {
        return;
    }
    if let Err(err) = child.kill() {
        warn!(error = %err, "Failed to terminate tool server process");
    }
    if let Err(err) = child.wait() {
        warn!(error = %err, "Failed to reap tool server process");
    }
}

pub trait IpcTransport: Send + Sync {
    fn connect(&self) -> Result<ClientConnection, ClientError>;

    /// Human-readable target for logs and error messages.
    fn describe(&self) -> String;
}

/// Spawns the tool server and speaks JSON-RPC over its stdin/stdout.
#[derive(Debug, Clone)]
pub struct StdioTransport {
    command: String,
    program: String,
    args: Vec<String>,
}

impl StdioTransport {
    /// Splits `command` with shell quoting rules.
    pub fn parse(command: &str) -> Result<Self, ClientError> {
        let mut words = shell_words::split(command).map_err(|err| ClientError::InvalidTarget {
            target: command.to_string(),
            reason: err.to_string(),
        })?;
        if words.is_empty() {
            return Err(ClientError::InvalidTarget {
                target: command.to_string(),
                reason: "empty command".to_string(),
            });
        }
        let program = words.remove(0);
        Ok(Self {
            command: command.to_string(),
            program,
            args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl IpcTransport for StdioTransport {
    fn connect(&self) -> Result<ClientConnection, ClientError> {
        debug!(command = %self.command, "Spawning tool server");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    ClientError::ServerUnavailable(format!("{}: {}", self.program, err))
                }
                _ => ClientError::ConnectionFailed(err),
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            terminate_child(&mut child);
            return Err(ClientError::ServerUnavailable(format!(
                "{}: stdio not captured",
                self.program
            )));
        };
        Ok(ClientConnection::new(
            Box::new(stdout),
            Box::new(stdin),
            StreamControl::Child(child),
        ))
    }

    fn describe(&self) -> String {
        format!("stdio:{}", self.command)
    }
}

/// Connects to a tool server listening on a TCP address.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl IpcTransport for TcpTransport {
    fn connect(&self) -> Result<ClientConnection, ClientError> {
        let addr = self
            .addr
            .to_socket_addrs()
            .map_err(|err| ClientError::InvalidTarget {
                target: self.addr.clone(),
                reason: err.to_string(),
            })?
            .next()
            .ok_or_else(|| ClientError::InvalidTarget {
                target: self.addr.clone(),
                reason: "address did not resolve".to_string(),
            })?;

        debug!(addr = %addr, "Connecting to tool server");
        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout).map_err(|err| {
            match err.kind() {
                ErrorKind::ConnectionRefused | ErrorKind::TimedOut => {
                    ClientError::ServerUnavailable(format!("{}: {}", self.addr, err))
                }
                _ => ClientError::ConnectionFailed(err),
            }
        })?;
        let _ = stream.set_nodelay(true);
        let reader = stream.try_clone()?;
        let writer = stream.try_clone()?;
        Ok(ClientConnection::new(
            Box::new(reader),
            Box::new(writer),
            StreamControl::Tcp(stream),
        ))
    }

    fn describe(&self) -> String {
        format!("tcp:{}", self.addr)
    }
}

#[cfg(unix)]
type LineHandler = dyn Fn(String) -> Option<String> + Send + Sync;

/// Serves each request line with a closure on a background thread.
///
/// Returning `None` from the handler sends nothing, which is how tests model
/// notifications and dropped requests.
#[cfg(unix)]
pub struct InMemoryTransport {
    handler: std::sync::Arc<LineHandler>,
}

#[cfg(unix)]
impl InMemoryTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(String) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            handler: std::sync::Arc::new(handler),
        }
    }
}

#[cfg(unix)]
impl IpcTransport for InMemoryTransport {
    fn connect(&self) -> Result<ClientConnection, ClientError> {
        let (client, mut server) = UnixStream::pair()?;
        let handler = std::sync::Arc::clone(&self.handler);

        let span = tracing::debug_span!("ipc_in_memory");
        std::thread::Builder::new()
            .name("ipc-in-memory".to_string())
            .spawn(move || {
                let _guard = span.enter();
                let reader_stream = match server.try_clone() {
                    Ok(stream) => stream,
                    Err(_) => return,
                };
                let mut reader = BufReader::new(reader_stream);

                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }

                    let request = line.trim_end_matches(['\r', '\n']).to_string();
                    let Some(mut response) = (handler)(request) else {
                        continue;
                    };
                    if !response.ends_with('\n') {
                        response.push('\n');
                    }
                    if server.write_all(response.as_bytes()).is_err() {
                        break;
                    }
                    let _ = server.flush();
                }
            })
            .map_err(|err| ClientError::ConnectionFailed(std::io::Error::other(err.to_string())))?;

        let reader = client.try_clone()?;
        let writer = client.try_clone()?;
        Ok(ClientConnection::new(
            Box::new(reader),
            Box::new(writer),
            StreamControl::Unix(client),
        ))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
