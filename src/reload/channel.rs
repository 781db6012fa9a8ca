// src/reload/channel.rs

use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tungstenite::WebSocket;

/// What connected clients should do after a task completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Reload the whole page.
    FullReload,
    /// Patch stylesheets in place without a navigation.
    StyleInject,
}

impl ReloadKind {
    fn as_message(self) -> &'static str {
        match self {
            ReloadKind::FullReload => "reload",
            ReloadKind::StyleInject => "inject-css",
        }
    }
}

/// Handle to the process-wide reload broadcaster.
///
/// Cloneable and cheap; `notify` never blocks and never fails — a reload
/// nobody hears is not an error.
#[derive(Debug, Clone)]
pub struct ReloadChannel {
    tx: mpsc::UnboundedSender<ReloadKind>,
}

impl ReloadChannel {
    /// Bind the websocket endpoint and spawn the accept + broadcast
    /// threads. Falls back to an ephemeral port when the preferred one is
    /// taken. Returns the handle and the actual port.
    pub fn start(preferred_port: u16) -> Result<(Self, u16)> {
        let listener = match TcpListener::bind(("127.0.0.1", preferred_port)) {
            Ok(sock) => sock,
            Err(_) => TcpListener::bind("127.0.0.1:0").context("binding reload socket")?,
        };
        let port = listener
            .local_addr()
            .context("reading reload socket address")?
            .port();

        let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::unbounded_channel();

        spawn_accept_thread(listener, Arc::clone(&clients));
        spawn_broadcast_thread(rx, clients);

        info!(port, "reload channel listening");
        Ok((Self { tx }, port))
    }

    /// Fire-and-forget broadcast to whoever is currently connected.
    pub fn notify(&self, kind: ReloadKind) {
        debug!(?kind, "reload notify");
        let _ = self.tx.send(kind);
    }
}

fn spawn_accept_thread(listener: TcpListener, clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>) {
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(err) => {
                    warn!(error = %err, "reload accept failed");
                    continue;
                }
            };
            match tungstenite::accept(stream) {
                Ok(socket) => {
                    debug!("reload client connected");
                    if let Ok(mut guard) = clients.lock() {
                        guard.push(socket);
                    }
                }
                Err(err) => warn!(error = %err, "websocket handshake failed"),
            }
        }
    });
}

fn spawn_broadcast_thread(
    mut rx: mpsc::UnboundedReceiver<ReloadKind>,
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
) {
    std::thread::spawn(move || {
        while let Some(kind) = rx.blocking_recv() {
            let Ok(mut clients) = clients.lock() else {
                warn!("reload client list poisoned; dropping notification");
                continue;
            };

            let mut broken = Vec::new();
            for (i, socket) in clients.iter_mut().enumerate() {
                match socket.send(kind.as_message().into()) {
                    Ok(()) => {}
                    Err(tungstenite::error::Error::Io(err))
                        if err.kind() == std::io::ErrorKind::BrokenPipe =>
                    {
                        broken.push(i);
                    }
                    Err(err) => warn!(error = %err, "reload send failed"),
                }
            }

            for i in broken.into_iter().rev() {
                clients.remove(i);
            }

            // Keep only the most recent connections; stale tabs pile up.
            let len = clients.len();
            if len > 10 {
                for mut socket in clients.drain(0..len - 10) {
                    socket.close(None).ok();
                }
            }
        }
    });
}
