pub mod presenter;
pub mod stub_server;
pub mod tool_server;

pub use presenter::OutputFormat;
pub use presenter::Presenter;
pub use presenter::create_presenter;
pub use stub_server::StubToolServer;
pub use tool_server::ToolServerSystem;
