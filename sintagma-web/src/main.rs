//! Servidor web Axum com WebSocket para visualização do chunking em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sintagma_core::{
    corpus::{get_corpus, sentence_tokens},
    pipeline::{ChunkerPipeline, PipelineEvent},
    Chunk, ChunkerModel, LabeledToken, ModelRegistry, Token,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Estado compartilhado da aplicação
struct AppState {
    /// Pipeline com o modelo padrão embutido
    pipeline: ChunkerPipeline,
    /// Registro de modelos carregáveis por chave (caminho de arquivo JSON)
    registry: ModelRegistry,
}

impl AppState {
    /// Resolve o pipeline para a requisição: modelo padrão, ou um modelo
    /// carregado (e cacheado) pelo registro quando a chave for informada.
    fn pipeline_for(&self, model_key: Option<&str>) -> Result<ChunkerPipeline, String> {
        match model_key {
            None => Ok(ChunkerPipeline::with_model(Arc::clone(&self.pipeline.model))),
            Some(key) => {
                let model = self
                    .registry
                    .get_or_load(key, ChunkerModel::from_file)
                    .map_err(|e| e.to_string())?;
                Ok(ChunkerPipeline::with_model(model))
            }
        }
    }
}

#[derive(Deserialize)]
struct ChunkRequest {
    tokens: Vec<Token>,
    /// Chave opcional de modelo (caminho de um JSON); ausente usa o padrão
    #[serde(default)]
    model: Option<String>,
}

#[derive(Serialize)]
struct ChunkResponse {
    chunks: Vec<Chunk>,
    labeled_tokens: Vec<LabeledToken>,
    total_tokens: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let state = Arc::new(AppState {
        pipeline: ChunkerPipeline::new(),
        registry: ModelRegistry::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/chunk", post(chunk_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("🚀 Servidor de chunking iniciado em http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Chunking via HTTP POST (sem streaming)
async fn chunk_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChunkRequest>,
) -> impl IntoResponse {
    if req.tokens.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Sentença vazia"})),
        )
            .into_response();
    }

    let pipeline = match state.pipeline_for(req.model.as_deref()) {
        Ok(p) => p,
        Err(message) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": message})),
            )
                .into_response();
        }
    };

    let tokens = reindex(req.tokens);
    match pipeline.analyze(&tokens) {
        Ok((labeled, chunks)) => Json(ChunkResponse {
            total_tokens: labeled.len(),
            chunks,
            labeled_tokens: labeled,
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Retorna sentenças de demonstração já etiquetadas com POS
async fn demo_texts_handler() -> impl IntoResponse {
    let sentences: Vec<serde_json::Value> = get_corpus()
        .iter()
        .map(|s| {
            serde_json::json!({
                "domain": s.domain,
                "text": s.text,
                "tokens": sentence_tokens(s),
            })
        })
        .collect();
    Json(sentences)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    tokens: Vec<Token>,
    #[serde(default)]
    model: Option<String>,
}

/// Lógica do WebSocket: recebe tokens etiquetados, executa o pipeline e
/// envia os eventos passo a passo para animação no cliente
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let req: WsRequest = match serde_json::from_str(&text) {
                    Ok(req) => req,
                    Err(e) => {
                        let err = PipelineEvent::Error {
                            message: format!("requisição inválida: {e}"),
                        };
                        if let Ok(json) = serde_json::to_string(&err) {
                            let _ = socket.send(Message::Text(json)).await;
                        }
                        continue;
                    }
                };

                let pipeline = match state.pipeline_for(req.model.as_deref()) {
                    Ok(p) => p,
                    Err(message) => {
                        let err = PipelineEvent::Error { message };
                        if let Ok(json) = serde_json::to_string(&err) {
                            let _ = socket.send(Message::Text(json)).await;
                        }
                        continue;
                    }
                };

                let tokens = reindex(req.tokens);
                info!("Segmentando via WebSocket: {} tokens", tokens.len());

                // Roda o pipeline (síncrono) fora do runtime e coleta os eventos
                let (tx_std, rx_std) = std::sync::mpsc::channel::<PipelineEvent>();
                let handle = tokio::task::spawn_blocking(move || {
                    pipeline.analyze_streaming(&tokens, tx_std);
                });
                handle.await.ok();
                let events: Vec<PipelineEvent> = rx_std.try_iter().collect();

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Garante índices sequenciais nos tokens recebidos via JSON (o cliente pode
/// omiti-los)
fn reindex(mut tokens: Vec<Token>) -> Vec<Token> {
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}
