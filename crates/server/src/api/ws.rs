//! Live search sessions over WebSocket.
//!
//! Each connection owns its view state: a debounce gate for the search box,
//! the current search list and a `DetailView`. State changes are pushed to
//! the client as they are applied.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use marquee_core::{DebounceGate, DetailState, DetailView, SearchPipeline, SearchState};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_MESSAGES_RECEIVED, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// Interval between server heartbeats.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Raw search box value; debounced before it triggers a fetch.
    Search { term: String },
    /// Re-run the last search cycle with the same term.
    Retry,
    /// Open the detail view for a catalog id or title.
    OpenDetail { id: String },
    CloseDetail,
}

impl ClientMessage {
    fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Search { .. } => "search",
            ClientMessage::Retry => "retry",
            ClientMessage::OpenDetail { .. } => "open_detail",
            ClientMessage::CloseDetail => "close_detail",
        }
    }
}

/// Messages pushed to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Search list state for `term`.
    SearchState {
        term: String,
        #[serde(flatten)]
        state: SearchState,
    },
    DetailState {
        #[serde(flatten)]
        state: DetailState,
    },
    /// Server heartbeat (sent periodically to keep connection alive).
    Heartbeat { timestamp: i64 },
}

impl ServerMessage {
    fn kind(&self) -> &'static str {
        match self {
            ServerMessage::SearchState { .. } => "search_state",
            ServerMessage::DetailState { .. } => "detail_state",
            ServerMessage::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// Search list of one session. A newer cycle supersedes an older one, so a
/// slow response never overwrites a faster, later one.
struct SearchSession {
    pipeline: SearchPipeline,
    outbox: mpsc::UnboundedSender<ServerMessage>,
    state: Arc<Mutex<SearchState>>,
    current: Option<CancellationToken>,
    last_term: Option<String>,
}

impl SearchSession {
    fn new(pipeline: SearchPipeline, outbox: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            pipeline,
            outbox,
            state: Arc::new(Mutex::new(SearchState::default())),
            current: None,
            last_term: None,
        }
    }

    fn run(&mut self, term: String) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        self.last_term = Some(term.clone());

        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.begin_loading();
            let _ = self.outbox.send(ServerMessage::SearchState {
                term: term.clone(),
                state: state.clone(),
            });
        }

        let pipeline = self.pipeline.clone();
        let outbox = self.outbox.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = pipeline.run(&term).await;

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if token.is_cancelled() {
                debug!(term = %term, "Discarding superseded search results");
                return;
            }
            state.apply(outcome);
            let _ = outbox.send(ServerMessage::SearchState {
                term,
                state: state.clone(),
            });
        });
    }

    fn retry(&mut self) {
        if let Some(term) = self.last_term.clone() {
            self.run(term);
        }
    }

    fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Track connection metrics
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client connected");

    // Spawn task to forward session updates and heartbeats to this client
    let send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;

        loop {
            let msg = tokio::select! {
                msg = outbox_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                _ = heartbeat.tick() => ServerMessage::Heartbeat {
                    timestamp: chrono::Utc::now().timestamp(),
                },
            };

            WS_MESSAGES_SENT.with_label_values(&[msg.kind()]).inc();

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize ServerMessage: {}", e);
                }
            }
        }
    });

    let detail_outbox = outbox.clone();
    let detail_view = Arc::new(DetailView::with_listener(Arc::new(
        move |detail: &DetailState| {
            let _ = detail_outbox.send(ServerMessage::DetailState {
                state: detail.clone(),
            });
        },
    )));

    let (mut gate, mut terms) = DebounceGate::new(state.debounce_window());
    let mut search = SearchSession::new(state.pipeline().clone(), outbox);

    // The empty term browses; show something before the first keystroke.
    gate.push(String::new());

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(msg) => {
                            WS_MESSAGES_RECEIVED.with_label_values(&[msg.kind()]).inc();
                            match msg {
                                ClientMessage::Search { term } => gate.push(term),
                                ClientMessage::Retry => search.retry(),
                                ClientMessage::OpenDetail { id } => {
                                    let view = Arc::clone(&detail_view);
                                    let resolver = state.resolver().clone();
                                    tokio::spawn(async move {
                                        view.load(&resolver, &id).await;
                                    });
                                }
                                ClientMessage::CloseDetail => detail_view.unmount(),
                            }
                        }
                        Err(e) => {
                            WS_MESSAGES_RECEIVED.with_label_values(&["invalid"]).inc();
                            warn!("Ignoring invalid client message: {}", e);
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket client requested close");
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong is handled by axum; binary frames are ignored
                }
                Some(Err(e)) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
            },
            Some(term) = terms.recv() => search.run(term),
        }
    }

    // Clean up
    gate.cancel();
    search.cancel();
    detail_view.unmount();
    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}
