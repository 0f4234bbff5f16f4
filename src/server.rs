use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::protocol::{ByteStore, CommandFactory, Parser, Value};

/// Initial per-connection read buffer size
const READ_BUFFER_SIZE: usize = 8192;

/// Default cap on bytes buffered for one connection's unparsed input
pub const DEFAULT_QUERY_BUFFER_LIMIT: usize = 1024 * 1024 * 1024;

/// TCP server speaking RESP in front of a shared store
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    cmd_factory: Arc<CommandFactory>,
    store: Arc<ByteStore>,
    query_buffer_limit: usize,
}

impl Server {
    /// Create and bind TCP server to specified address
    pub async fn bind(addr: &str, store: Arc<ByteStore>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("TCP server bound to {}", local_addr);

        let cmd_factory = Arc::new(CommandFactory::init());

        Ok(Self {
            listener,
            local_addr,
            cmd_factory,
            store,
            query_buffer_limit: DEFAULT_QUERY_BUFFER_LIMIT,
        })
    }

    /// Set the cap on unparsed bytes held per connection
    pub fn with_query_buffer_limit(mut self, limit: usize) -> Self {
        self.query_buffer_limit = limit;
        self
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Process a RESP command and return the response
    async fn process_command(&self, value: Value) -> Value {
        self.cmd_factory.execute(value, self.store.as_ref()).await
    }

    /// Handle a single client connection
    async fn handle_connection(
        self: Arc<Self>,
        mut stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> std::io::Result<()> {
        // Bytes received but not yet parsed into a complete command
        let mut pending = BytesMut::with_capacity(READ_BUFFER_SIZE);

        loop {
            match stream.read_buf(&mut pending).await {
                Ok(0) => {
                    info!("Connection closed by client: {}", peer_addr);
                    break;
                }
                Ok(_) => loop {
                    if pending.len() > self.query_buffer_limit {
                        warn!(
                            "Query buffer of {} bytes from {} exceeds limit",
                            pending.len(),
                            peer_addr
                        );
                        let reply =
                            Value::error("ERR Protocol error: query buffer limit exceeded");
                        stream.write_all(&reply.encode()).await?;
                        return Ok(());
                    }
                    match Parser::parse(&pending) {
                        Ok(Some((value, consumed))) => {
                            pending.advance(consumed);
                            debug!("Received command from {}: {:?}", peer_addr, value);

                            let response = self.process_command(value).await;
                            stream.write_all(&response.encode()).await?;
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!("Protocol error from {}: {}", peer_addr, e);
                            let reply = Value::error(format!("ERR Protocol error: {}", e));
                            stream.write_all(&reply.encode()).await?;
                            return Ok(());
                        }
                    }
                },
                Err(e) => {
                    error!("Error reading from {}: {}", peer_addr, e);
                    break;
                }
            }
        }

        info!("Connection handler ended for {}", peer_addr);
        Ok(())
    }

    /// Accept and process connections until `shutdown` resolves
    ///
    /// Open connections are aborted before this returns.
    pub async fn run(self: Arc<Self>, shutdown: impl Future<Output = ()>) {
        info!("Server started, listening on {}", self.local_addr);
        tokio::pin!(shutdown);

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection task failed: {}", e);
                    }
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        info!("New connection accepted from {}", peer_addr);

                        let server = Arc::clone(&self);

                        connections.spawn(async move {
                            if let Err(e) = server.handle_connection(stream, peer_addr).await {
                                warn!("Error handling connection from {}: {}", peer_addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        info!("Closing {} open connections", connections.len());
        connections.shutdown().await;
    }
}
