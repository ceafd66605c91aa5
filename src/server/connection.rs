//! Connection handling
//!
//! Manages individual client connections, decoding RESP requests
//! and sending responses.

use crate::interpreter::{Interpreter, Request};
use crate::persistence::Persistence;
use crate::protocol::{RespCodec, RespEncoder, RespError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, error, warn};

/// Connection handler
pub struct Connection<T> {
    framed: Framed<T, RespCodec>,
    peer: SocketAddr,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: T, peer: SocketAddr, max_frame_bytes: usize) -> Self {
        Connection {
            framed: Framed::new(stream, RespCodec::new(max_frame_bytes)),
            peer,
        }
    }

    /// Handle the connection
    ///
    /// Requests are answered in arrival order. Successful writes are recorded
    /// in `persistence` before their response goes out. Malformed input closes
    /// the connection without a reply.
    pub async fn handle(
        &mut self,
        interpreter: Arc<Interpreter>,
        persistence: Arc<dyn Persistence>,
    ) -> anyhow::Result<()> {
        while let Some(frame) = self.framed.next().await {
            let value = match frame {
                Ok(value) => value,
                Err(RespError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    warn!("Protocol error from {}: {}", self.peer, e);
                    return Ok(());
                }
            };

            debug!("Parsed request: {}", value);

            let request = match Request::from_value(&value) {
                Ok(request) => request,
                Err(e) => {
                    error!(
                        "Invalid request from {}: {} (raw: {})",
                        self.peer,
                        e,
                        STANDARD.encode(RespEncoder::encode(&value))
                    );
                    continue;
                }
            };

            let response = interpreter.execute(&request);

            if !response.is_error() && interpreter.is_write_command(&request.name) {
                if let Err(e) = persistence.write(&value) {
                    error!("Failed to persist {} from {}: {}", request.name, self.peer, e);
                }
            }

            debug!("Response: {}", response);
            self.framed.send(response).await?;
        }

        Ok(())
    }
}
