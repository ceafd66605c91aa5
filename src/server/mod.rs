//! Server module
//!
//! Handles TCP connections and manages the accept loop.
//! Each client gets its own task; all of them share one interpreter
//! and one persistence strategy.

mod connection;

use crate::interpreter::Interpreter;
use crate::persistence::{Persistence, PersistenceError};
use crate::protocol::DEFAULT_MAX_FRAME_BYTES;
use anyhow::Context;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Pause after a failed accept, e.g. while out of file descriptors
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub use connection::Connection;

#[derive(Clone)]
pub struct Server {
    interpreter: Arc<Interpreter>,
    persistence: Arc<dyn Persistence>,
    max_frame_bytes: usize,
}

impl Server {
    /// Create a server and rebuild its state from `persistence`
    pub fn new(persistence: Arc<dyn Persistence>) -> Result<Self, PersistenceError> {
        let interpreter = Interpreter::new();
        let replayed = persistence.read(&interpreter)?;
        info!("Restored {} requests from persistence", replayed);

        Ok(Server {
            interpreter: Arc::new(interpreter),
            persistence,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    pub fn interpreter(&self) -> &Arc<Interpreter> {
        &self.interpreter
    }

    /// Bind `addr` and serve clients until an accept error
    pub async fn run(&self, addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("RESP server listening on {}", addr);

        self.serve(listener).await
    }

    /// Serve clients on an already bound listener
    ///
    /// Accept failures are logged and retried; this only returns if the task
    /// is cancelled.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (socket, addr) = next_connection(|| listener.accept()).await;
            info!("New RESP connection from {}", addr);

            let interpreter = Arc::clone(&self.interpreter);
            let persistence = Arc::clone(&self.persistence);
            let max_frame_bytes = self.max_frame_bytes;

            tokio::spawn(async move {
                let mut connection = Connection::new(socket, addr, max_frame_bytes);

                if let Err(e) = connection.handle(interpreter, persistence).await {
                    error!("Connection error from {}: {}", addr, e);
                }

                info!("Connection closed: {}", addr);
            });
        }
    }

    /// Flush and close persistence; later writes are no longer recorded
    pub fn shutdown(&self) -> Result<(), PersistenceError> {
        info!("Shutting down");
        self.persistence.close()
    }
}

/// Keep calling `accept` until it yields a connection
async fn next_connection<T, F, Fut>(mut accept: F) -> (T, SocketAddr)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<(T, SocketAddr)>>,
{
    loop {
        match accept().await {
            Ok(connection) => return connection,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}
