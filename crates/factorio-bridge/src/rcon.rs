//! Source RCON protocol client for Factorio
//!
//! Implements the Valve Source RCON protocol used by Factorio's headless server.
//! Protocol spec: https://developer.valvesoftware.com/wiki/Source_RCON_Protocol
//!
//! Factorio answers every command with a single packet, even when the body
//! is far larger than the 4 KiB the Valve spec allows, so responses are read
//! as one packet bounded by [`MAX_PACKET_SIZE`].

use connect_core::{ConnectError, Result};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Largest packet accepted from the server (entity snapshots can be big)
pub const MAX_PACKET_SIZE: usize = 4 * 1024 * 1024;

/// RCON packet type constants
pub mod packet_type {
    /// Command output
    pub const RESPONSE_VALUE: i32 = 0;
    /// Execute command (client) / authentication result (server)
    pub const EXEC_COMMAND: i32 = 2;
    /// Authenticate with password
    pub const AUTH: i32 = 3;
}

/// A single RCON packet
#[derive(Debug, Clone, PartialEq)]
pub struct RconPacket {
    pub id: i32,
    pub packet_type: i32,
    pub body: String,
}

impl RconPacket {
    pub fn exec(id: i32, command: impl Into<String>) -> Self {
        Self {
            id,
            packet_type: packet_type::EXEC_COMMAND,
            body: command.into(),
        }
    }

    pub fn auth(id: i32, password: impl Into<String>) -> Self {
        Self {
            id,
            packet_type: packet_type::AUTH,
            body: password.into(),
        }
    }

    /// Encode with the little-endian size prefix
    pub fn encode(&self) -> Vec<u8> {
        let body = self.body.as_bytes();
        // id + type + body + two null terminators
        let size = 4 + 4 + body.len() + 2;

        let mut buf = Vec::with_capacity(4 + size);
        buf.extend_from_slice(&(size as i32).to_le_bytes());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&self.packet_type.to_le_bytes());
        buf.extend_from_slice(body);
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    /// Decode a packet payload (everything after the size prefix)
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 10 {
            return Err(ConnectError::ProtocolError(format!(
                "RCON packet too short: {} bytes",
                data.len()
            )));
        }

        let id = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let packet_type = i32::from_le_bytes([data[4], data[5], data[6], data[7]]);

        let body = &data[8..];
        let body_end = body.iter().position(|&b| b == 0).unwrap_or(body.len());

        Ok(Self {
            id,
            packet_type,
            body: String::from_utf8_lossy(&body[..body_end]).into_owned(),
        })
    }
}

/// Write one packet to a stream
pub async fn write_packet<W: AsyncWrite + Unpin>(writer: &mut W, packet: &RconPacket) -> Result<()> {
    writer
        .write_all(&packet.encode())
        .await
        .map_err(|e| ConnectError::IpcError(format!("RCON send failed: {}", e)))?;
    writer
        .flush()
        .await
        .map_err(|e| ConnectError::IpcError(format!("RCON flush failed: {}", e)))
}

/// Read one packet from a stream
pub async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R) -> Result<RconPacket> {
    let mut size_buf = [0u8; 4];
    reader
        .read_exact(&mut size_buf)
        .await
        .map_err(|e| ConnectError::IpcError(format!("RCON recv size failed: {}", e)))?;
    let size = i32::from_le_bytes(size_buf);

    if size < 10 || size as usize > MAX_PACKET_SIZE {
        return Err(ConnectError::ProtocolError(format!(
            "RCON packet size out of range: {} bytes",
            size
        )));
    }

    let mut data = vec![0u8; size as usize];
    reader
        .read_exact(&mut data)
        .await
        .map_err(|e| ConnectError::IpcError(format!("RCON recv body failed: {}", e)))?;

    RconPacket::decode(&data)
}

/// RCON client for communicating with a Factorio server
pub struct RconClient {
    /// TCP stream to RCON server
    stream: Mutex<Option<TcpStream>>,
    /// Server address
    address: String,
    /// Authentication password
    password: String,
    /// Next packet ID
    next_id: AtomicI32,
    /// Whether authenticated
    authenticated: AtomicBool,
}

impl RconClient {
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            stream: Mutex::new(None),
            address: address.into(),
            password: password.into(),
            next_id: AtomicI32::new(1),
            authenticated: AtomicBool::new(false),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Connect and authenticate with the RCON server
    pub async fn connect(&self) -> Result<()> {
        info!("Connecting to RCON at {}", self.address);

        let mut stream = TcpStream::connect(&self.address)
            .await
            .map_err(|e| ConnectError::IpcError(format!("RCON connect failed: {}", e)))?;

        let auth_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        write_packet(&mut stream, &RconPacket::auth(auth_id, &self.password)).await?;

        // Valve servers send an empty RESPONSE_VALUE ahead of the auth result
        let mut response = read_packet(&mut stream).await?;
        if response.packet_type == packet_type::RESPONSE_VALUE {
            response = read_packet(&mut stream).await?;
        }

        if response.id == -1 {
            self.authenticated.store(false, Ordering::SeqCst);
            return Err(ConnectError::IpcError(
                "RCON authentication failed".to_string(),
            ));
        }
        if response.id != auth_id {
            warn!(
                "RCON auth response ID mismatch: expected {}, got {}",
                auth_id, response.id
            );
        }

        *self.stream.lock().await = Some(stream);
        self.authenticated.store(true, Ordering::SeqCst);
        info!("RCON authenticated successfully");

        Ok(())
    }

    /// Check if connected and authenticated
    pub fn is_connected(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Execute a command, reconnecting once if the connection dropped
    pub async fn execute(&self, command: &str) -> Result<String> {
        match self.execute_inner(command).await {
            Err(ConnectError::IpcError(reason)) => {
                warn!("RCON connection lost ({}), reconnecting...", reason);
                self.authenticated.store(false, Ordering::SeqCst);
                self.connect().await?;
                self.execute_inner(command).await
            }
            other => other,
        }
    }

    async fn execute_inner(&self, command: &str) -> Result<String> {
        if !self.is_connected() {
            return Err(ConnectError::IpcError("RCON not authenticated".to_string()));
        }

        let mut guard = self.stream.lock().await;
        let stream = guard
            .as_mut()
            .ok_or_else(|| ConnectError::IpcError("RCON not connected".to_string()))?;

        let cmd_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!("RCON exec: {}", command.get(..200).unwrap_or(command));
        write_packet(stream, &RconPacket::exec(cmd_id, command)).await?;

        let response = read_packet(stream).await?;
        if response.id != cmd_id {
            debug!(
                "Response ID mismatch: expected {}, got {}",
                cmd_id, response.id
            );
        }

        debug!("RCON response: {} bytes", response.body.len());
        Ok(response.body)
    }

    /// Execute a Lua chunk via `/sc` (silent, output only through `rcon.print`)
    pub async fn lua(&self, lua_code: &str) -> Result<String> {
        self.execute(&format!("/sc {}", lua_code)).await
    }

    /// Disconnect from the server
    pub async fn disconnect(&self) {
        if let Some(mut stream) = self.stream.lock().await.take() {
            let _ = stream.shutdown().await;
        }
        self.authenticated.store(false, Ordering::SeqCst);
        info!("RCON disconnected");
    }
}
