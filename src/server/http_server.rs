//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use log::{debug, error, info, warn};

use crate::parser::{frame, parse_headers, parse_request};
use crate::server::config::ServerConfig;
use crate::server::encoding::EncodingNegotiator;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::router::Router;
use crate::server::store::{DirectoryStore, FileStore};

/// Bounds applied while reading one request off a connection.
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    /// Size of each socket read.
    pub read_buffer_size: usize,
    /// Largest message accepted, head and body together.
    pub max_message_size: usize,
    /// Largest request line plus header block accepted.
    pub max_head_size: usize,
    /// Time allowed for the whole message to arrive.
    pub read_timeout: Duration,
}

impl From<&ServerConfig> for ReadLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            read_buffer_size: config.read_buffer_size,
            max_message_size: config.max_message_size,
            max_head_size: config.max_head_size,
            read_timeout: config.read_timeout,
        }
    }
}

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    router: Arc<Router>,
    negotiator: Arc<EncodingNegotiator>,
}

impl HttpServer {
    /// Create a new HTTP server serving files from `config.directory`.
    pub fn new(config: ServerConfig) -> Self {
        let store = DirectoryStore::new(config.directory.clone());
        Self::with_store(config, Arc::new(store))
    }

    /// Create a new HTTP server with a custom file store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn FileStore>) -> Self {
        let negotiator = EncodingNegotiator::new(config.encodings.clone());
        Self {
            config,
            router: Arc::new(Router::new(store)),
            negotiator: Arc::new(negotiator),
        }
    }

    /// The router shared by all connections.
    pub fn router(&self) -> Arc<Router> {
        self.router.clone()
    }

    /// The encoding negotiator shared by all connections.
    pub fn negotiator(&self) -> Arc<EncodingNegotiator> {
        self.negotiator.clone()
    }

    /// Log the configuration and registered endpoints.
    fn display_server_info(&self) {
        info!("Serving files from {dir}", dir = self.config.directory.display());
        let encodings = self
            .config
            .encodings
            .iter()
            .map(|e| e.token())
            .collect::<Vec<_>>()
            .join(", ");
        info!("Supported encodings: [{encodings}]");
        info!("Registered endpoints:");
        for route in Router::describe() {
            info!("  {route}");
        }
    }

    /// Bind the TCP listener.
    pub async fn bind(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(listener)
    }

    /// Resolves on Ctrl+C. If the handler cannot be installed it never resolves.
    async fn ctrl_c() {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                error!("Error setting up Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    }

    /// Handle a new connection.
    fn handle_new_connection(
        &self,
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: &Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        let limits = ReadLimits::from(&self.config);
        let router = self.router.clone();
        let negotiator = self.negotiator.clone();

        // Try to acquire a permit from the semaphore
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                tasks.spawn(async move { Self::reject_connection(&mut socket, addr).await });
                return;
            }
        };

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            debug!("Accepted connection from {addr}");
            match Self::handle_connection(&mut socket, &router, &negotiator, limits).await {
                Ok(Some(status)) => debug!("Answered {addr} with {code}", code = status.as_u16()),
                Ok(None) => debug!("{addr} closed without sending a request"),
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
        });
    }

    /// Answer 503 on a connection that has no permit, then close it.
    ///
    /// Whatever the client already sent is drained after our side is shut
    /// down, so unread request bytes do not turn the close into a reset.
    async fn reject_connection(socket: &mut (impl AsyncRead + AsyncWrite + Unpin), addr: SocketAddr) {
        let response = HttpResponse::new(StatusCode::ServiceUnavailable)
            .with_content_type("text/plain")
            .with_body_string("Server is at capacity, please try again later");
        if let Err(e) = response.write_to(socket).await {
            debug!("Failed to send 503 to {addr}: {e}");
            return;
        }
        if let Err(e) = socket.shutdown().await {
            debug!("Failed to shut down rejected connection from {addr}: {e}");
            return;
        }

        let deadline = Instant::now() + REJECT_DRAIN_TIMEOUT;
        let mut scratch = [0u8; 1024];
        while let Ok(Ok(n)) = tokio::time::timeout_at(deadline, socket.read(&mut scratch)).await {
            if n == 0 {
                break;
            }
        }
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        // If there's a critical error, signal to break the loop
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        info!("Server shutdown complete");
    }

    /// Bind to the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Accept connections on `listener` until Ctrl+C.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        self.serve_with_shutdown(listener, Self::ctrl_c()).await
    }

    /// Accept connections on `listener` until `shutdown` resolves, then wait
    /// for the connections in flight.
    pub async fn serve_with_shutdown(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        self.display_server_info();

        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));
        tokio::pin!(shutdown);

        // Connection tasks only; the set is what shutdown waits on.
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            self.handle_new_connection(socket, addr, &semaphore, &mut tasks);
                        },
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }

            // Reap finished connection tasks so the set does not grow unbounded.
            while let Some(res) = tasks.try_join_next() {
                if let Err(e) = res {
                    error!("Connection task failed: {e}");
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Handle a single connection: read one request, answer it, close.
    ///
    /// Returns the status that was sent, or `None` when the peer closed the
    /// connection without sending anything. Errors are socket failures only;
    /// everything else is turned into a response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: &Router,
        negotiator: &EncodingNegotiator,
        limits: ReadLimits,
    ) -> Result<Option<StatusCode>, Error> {
        let response = match Self::read_message(socket, limits).await {
            Ok(raw) if raw.is_empty() => return Ok(None),
            Ok(raw) => Self::respond(&raw, router, negotiator),
            Err(Error::IoError(e)) => return Err(Error::IoError(e)),
            Err(e) => Self::error_response(&e),
        };

        response.write_to(socket).await?;
        socket.shutdown().await?;
        Ok(Some(response.status))
    }

    /// Read the first message from `socket`.
    ///
    /// Reading stops once the header block is complete and, if the head
    /// declares `Content-Length`, that many body bytes are buffered. It also
    /// stops at end of stream; the parser then reports whatever is missing.
    ///
    /// Each read is scanned once for the end of the head, and the head is
    /// parsed once, so the cost stays linear in the bytes received.
    pub async fn read_message(
        socket: &mut (impl AsyncRead + Unpin),
        limits: ReadLimits,
    ) -> Result<Vec<u8>, Error> {
        let deadline = Instant::now() + limits.read_timeout;
        let mut buf = Vec::with_capacity(limits.read_buffer_size);
        let mut chunk = vec![0; limits.read_buffer_size.max(1)];
        // Bytes before this offset cannot start the head terminator.
        let mut scanned = 0;
        let mut expected: Option<usize> = None;

        loop {
            match expected {
                Some(len) if buf.len() >= len => return Ok(buf),
                Some(_) => {}
                None => match find_head_end(&buf, scanned) {
                    Some(head_len) if head_len > limits.max_head_size => {
                        return Err(Error::HeaderTooLarge(limits.max_head_size));
                    }
                    Some(head_len) => {
                        let len = head_len.saturating_add(declared_content_length(&buf[..head_len]));
                        if len > limits.max_message_size {
                            return Err(Error::MessageTooLarge(limits.max_message_size));
                        }
                        if buf.len() >= len {
                            return Ok(buf);
                        }
                        expected = Some(len);
                    }
                    None if buf.len() > limits.max_head_size => {
                        return Err(Error::HeaderTooLarge(limits.max_head_size));
                    }
                    None => scanned = buf.len().saturating_sub(HEAD_END.len() - 1),
                },
            }

            let n = match tokio::time::timeout_at(deadline, socket.read(&mut chunk)).await {
                Ok(read) => read?,
                // A complete head with a short body is still answered.
                Err(_) if expected.is_some() => return Ok(buf),
                Err(_) => return Err(Error::Timeout),
            };
            if n == 0 {
                return Ok(buf);
            }
            if buf.len() + n > limits.max_message_size {
                return Err(Error::MessageTooLarge(limits.max_message_size));
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Turn raw request bytes into the response to send.
    ///
    /// This is the single place where errors become responses.
    pub fn respond(raw: &[u8], router: &Router, negotiator: &EncodingNegotiator) -> HttpResponse {
        let request = match parse_request(raw) {
            Ok(request) => request,
            Err(e) => return Self::error_response(&Error::ParseError(e)),
        };
        debug!("{method} {path} {version}", method = request.method, path = request.path, version = request.version);

        let mut response = HttpResponse::new(StatusCode::Ok);
        let response = match router.route(&request, &mut response) {
            Ok(()) => response,
            Err(e) => Self::error_response(&e),
        };

        negotiator
            .negotiate(response, &request.headers)
            .unwrap_or_else(|e| Self::error_response(&e))
    }

    /// Build the response for an error.
    ///
    /// 404s carry no body; other errors explain themselves in plain text.
    fn error_response(err: &Error) -> HttpResponse {
        let status = err.status();
        match status {
            StatusCode::InternalServerError => error!("{err}"),
            _ => warn!("{err}"),
        }

        let response = HttpResponse::new(status);
        match err {
            Error::NotFound(_) => response,
            Error::MethodNotAllowed(..) => response
                .with_header("Allow", "GET, POST")
                .with_content_type("text/plain")
                .with_body_string(err.to_string()),
            _ => response
                .with_content_type("text/plain")
                .with_body_string(err.to_string()),
        }
    }
}

/// Blank line that closes the request head.
const HEAD_END: &[u8] = b"\r\n\r\n";

/// How long a rejected client gets to finish sending before the socket drops.
const REJECT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Length of the head, terminator included, searching from `from` onwards.
fn find_head_end(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(HEAD_END.len())
        .position(|window| window == HEAD_END)
        .map(|pos| from + pos + HEAD_END.len())
}

/// Body length declared by a complete head; 0 when absent or unparseable.
fn declared_content_length(head: &[u8]) -> usize {
    frame(head)
        .ok()
        .and_then(|frame| std::str::from_utf8(frame.header_block).ok())
        .and_then(|block| parse_headers(block).ok())
        .and_then(|headers| headers.get_ignore_case("Content-Length")?.parse::<usize>().ok())
        .unwrap_or(0)
}
