//! Discord local IPC transport
//!
//! Frames are an 8 byte header (opcode, payload length; both little-endian
//! u32) followed by a JSON payload.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::activity::Activity;
use super::transport::{PresenceTransport, TransportError};

const IPC_VERSION: u32 = 1;
const MAX_PIPE_INDEX: usize = 10;
const MAX_FRAME_BYTES: usize = 64 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl Opcode {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Opcode::Handshake),
            1 => Some(Opcode::Frame),
            2 => Some(Opcode::Close),
            3 => Some(Opcode::Ping),
            4 => Some(Opcode::Pong),
            _ => None,
        }
    }
}

/// Write one frame
pub async fn write_frame<W>(writer: &mut W, opcode: Opcode, payload: &Value) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let body = serde_json::to_vec(payload)?;
    if body.len() > MAX_FRAME_BYTES {
        return Err(TransportError::Protocol(format!(
            "frame of {} bytes exceeds limit",
            body.len()
        )));
    }

    let mut frame = Vec::with_capacity(8 + body.len());
    frame.extend_from_slice(&(opcode as u32).to_le_bytes());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame
pub async fn read_frame<R>(reader: &mut R) -> Result<(Opcode, Value), TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; 8];
    reader.read_exact(&mut header).await?;

    let raw_opcode = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

    let opcode = Opcode::from_u32(raw_opcode)
        .ok_or_else(|| TransportError::Protocol(format!("unknown opcode {}", raw_opcode)))?;
    if len > MAX_FRAME_BYTES {
        return Err(TransportError::Protocol(format!(
            "frame of {} bytes exceeds limit",
            len
        )));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };

    Ok((opcode, payload))
}

trait IpcIo: AsyncRead + AsyncWrite + Unpin + Send + Sync {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send + Sync> IpcIo for T {}

/// Rich presence over the desktop client's IPC socket
pub struct DiscordIpc {
    stream: Option<Box<dyn IpcIo>>,
    pid: u32,
    request_timeout: Duration,
    #[cfg(unix)]
    socket_override: Option<std::path::PathBuf>,
}

impl Default for DiscordIpc {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordIpc {
    pub fn new() -> Self {
        Self {
            stream: None,
            pid: std::process::id(),
            request_timeout: REQUEST_TIMEOUT,
            #[cfg(unix)]
            socket_override: None,
        }
    }

    /// Use a fixed socket instead of searching the usual locations
    #[cfg(unix)]
    pub fn with_socket(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            socket_override: Some(path.into()),
            ..Self::new()
        }
    }

    /// Bound for the handshake and for each request/response exchange
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    #[cfg(unix)]
    async fn open_endpoint(&self) -> Result<Box<dyn IpcIo>, TransportError> {
        use tokio::net::UnixStream;

        let candidates = match &self.socket_override {
            Some(path) => vec![path.clone()],
            None => socket_candidates(),
        };

        for path in candidates {
            match UnixStream::connect(&path).await {
                Ok(stream) => {
                    debug!("Connected to Discord IPC at {:?}", path);
                    return Ok(Box::new(stream));
                }
                Err(_) => continue,
            }
        }
        Err(TransportError::EndpointNotFound)
    }

    #[cfg(windows)]
    async fn open_endpoint(&self) -> Result<Box<dyn IpcIo>, TransportError> {
        use tokio::net::windows::named_pipe::ClientOptions;

        for index in 0..MAX_PIPE_INDEX {
            let name = format!(r"\\?\pipe\discord-ipc-{}", index);
            if let Ok(pipe) = ClientOptions::new().open(&name) {
                debug!("Connected to Discord IPC at {}", name);
                return Ok(Box::new(pipe));
            }
        }
        Err(TransportError::EndpointNotFound)
    }

    /// Read until a command frame arrives, answering pings on the way
    async fn next_message(stream: &mut dyn IpcIo) -> Result<Value, TransportError> {
        loop {
            let (opcode, payload) = read_frame(stream).await?;
            match opcode {
                Opcode::Frame => return Ok(payload),
                Opcode::Ping => write_frame(stream, Opcode::Pong, &payload).await?,
                Opcode::Pong => continue,
                Opcode::Close => return Err(close_error(&payload)),
                Opcode::Handshake => {
                    return Err(TransportError::Protocol(
                        "unexpected handshake frame".to_string(),
                    ))
                }
            }
        }
    }

    async fn handshake(stream: &mut dyn IpcIo, app_id: &str) -> Result<(), TransportError> {
        let hello = json!({ "v": IPC_VERSION, "client_id": app_id });
        write_frame(stream, Opcode::Handshake, &hello).await?;

        let ready = Self::next_message(stream).await?;
        match ready.get("evt").and_then(Value::as_str) {
            Some("READY") => Ok(()),
            Some("ERROR") => Err(rejection(&ready)),
            other => Err(TransportError::Protocol(format!(
                "expected READY, got {:?}",
                other
            ))),
        }
    }

    async fn request(&mut self, payload: Value) -> Result<Value, TransportError> {
        let stream = self.stream.as_deref_mut().ok_or(TransportError::NotOpen)?;

        let exchange = async move {
            write_frame(stream, Opcode::Frame, &payload).await?;
            Self::next_message(stream).await
        };

        let response = match tokio::time::timeout(self.request_timeout, exchange).await {
            Ok(response) => response,
            Err(_) => {
                // A frame may be half-read, the stream cannot be reused
                self.stream = None;
                return Err(TransportError::Timeout);
            }
        };

        match response {
            Ok(response) if response.get("evt").and_then(Value::as_str) == Some("ERROR") => {
                Err(rejection(&response))
            }
            Ok(response) => Ok(response),
            Err(e) => {
                if e.is_disconnect() {
                    self.stream = None;
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl PresenceTransport for DiscordIpc {
    async fn login(&mut self, app_id: &str) -> Result<(), TransportError> {
        self.logout().await;

        let mut stream = self.open_endpoint().await?;
        tokio::time::timeout(self.request_timeout, Self::handshake(&mut *stream, app_id))
            .await
            .map_err(|_| TransportError::Timeout)??;

        info!("Discord IPC handshake complete");
        self.stream = Some(stream);
        Ok(())
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<(), TransportError> {
        let payload = json!({
            "cmd": "SET_ACTIVITY",
            "args": {
                "pid": self.pid,
                "activity": activity,
            },
            "nonce": Uuid::new_v4().to_string(),
        });

        self.request(payload).await?;
        Ok(())
    }

    async fn logout(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = write_frame(&mut *stream, Opcode::Close, &json!({})).await {
                debug!("Close frame not delivered: {}", e);
            }
            if let Err(e) = stream.shutdown().await {
                warn!("Failed to shut down Discord IPC stream: {}", e);
            }
        }
    }
}

fn rejection(payload: &Value) -> TransportError {
    let data = payload.get("data").unwrap_or(payload);
    TransportError::Rejected {
        code: data.get("code").and_then(Value::as_i64).unwrap_or_default(),
        message: data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
    }
}

fn close_error(payload: &Value) -> TransportError {
    TransportError::Closed {
        code: payload.get("code").and_then(Value::as_i64).unwrap_or_default(),
        message: payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("connection closed")
            .to_string(),
    }
}

/// Socket paths tried in order, including Flatpak and Snap sandboxes
#[cfg(unix)]
pub fn socket_candidates() -> Vec<std::path::PathBuf> {
    use std::path::PathBuf;

    let mut bases: Vec<PathBuf> = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .filter_map(|key| std::env::var_os(key))
        .map(PathBuf::from)
        .collect();
    bases.push(PathBuf::from("/tmp"));
    bases.dedup();

    let mut candidates = Vec::new();
    for base in &bases {
        for dir in [
            base.clone(),
            base.join("app").join("com.discordapp.Discord"),
            base.join("snap.discord"),
        ] {
            for index in 0..MAX_PIPE_INDEX {
                candidates.push(dir.join(format!("discord-ipc-{}", index)));
            }
        }
    }
    candidates
}
