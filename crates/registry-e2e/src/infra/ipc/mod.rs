pub mod client;
pub mod error;
pub mod transport;

pub use client::{JsonRpcClient, MCP_PROTOCOL_VERSION, RpcClient, RpcClientConfig};
pub use error::ClientError;
#[cfg(unix)]
pub use transport::InMemoryTransport;
pub use transport::{ClientConnection, IpcTransport, StdioTransport, TcpTransport};

pub type Result<T> = std::result::Result<T, ClientError>;
