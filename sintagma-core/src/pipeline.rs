//! # Pipeline de Chunking — Orquestrador com Eventos Observáveis
//!
//! O pipeline coordena os módulos (features, modelo, decodificação greedy,
//! conversão BIO→sintagmas) e emite eventos em cada passo via um canal Rust
//! (`mpsc`), permitindo que o servidor WebSocket transmita o "raciocínio" do
//! decodificador em tempo real para o cliente.

use std::sync::mpsc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ChunkerError;
use crate::features::extract_for_token;
use crate::model::ChunkerModel;
use crate::tagger::{tags_to_chunks, Chunk, LabeledToken, Tag};
use crate::token::Token;

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Cada variante carrega os dados necessários para renderizar uma etapa da
/// visualização passo-a-passo no frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: Sentença recebida e validada.
    SentenceReceived { tokens: Vec<Token>, total: usize },
    /// **Passo 2**: Features extraídas para um token específico.
    /// Mostra quais atributos (ex: "pos=N", "prev_tag=B-NP") foram ativados.
    FeaturesComputed {
        token_index: usize,
        token_text: String,
        /// As 10 features mais relevantes para visualização.
        top_features: Vec<(String, f64)>,
    },
    /// **Passo 3**: Tag BIO decidida para um token (decisão greedy).
    LabelAssigned {
        token_index: usize,
        token_text: String,
        label: String,
        score: f64,
    },
    /// **Conclusão**: sintagmas estruturados e estatísticas de tempo.
    Done {
        chunks: Vec<Chunk>,
        labeled_tokens: Vec<LabeledToken>,
        total_tokens: usize,
        processing_ms: u64,
    },
    /// **Falha**: entrada inválida ou erro irrecuperável.
    Error { message: String },
}

/// O pipeline de chunking principal.
///
/// Atua como o **controlador** do sistema, orquestrando:
/// 1. Extração de features token a token (com histórico de tags).
/// 2. Decisão greedy da tag BIO de cada token.
/// 3. Conversão da sequência de tags em sintagmas.
///
/// # Modos de Uso
/// - **Sync**: método `analyze` para chamadas diretas.
/// - **Streaming**: método `analyze_streaming` para UIs reativas (WebSocket).
pub struct ChunkerPipeline {
    pub model: Arc<ChunkerModel>,
}

impl ChunkerPipeline {
    /// Cria o pipeline com o modelo padrão de pesos heurísticos.
    pub fn new() -> Self {
        Self {
            model: Arc::new(ChunkerModel::build()),
        }
    }

    /// Cria o pipeline com um modelo já carregado (ex: vindo do
    /// [`crate::registry::ModelRegistry`]).
    pub fn with_model(model: Arc<ChunkerModel>) -> Self {
        Self { model }
    }

    /// Processa a sentença de forma síncrona e retorna o resultado final.
    pub fn analyze(&self, tokens: &[Token]) -> Result<(Vec<LabeledToken>, Vec<Chunk>), ChunkerError> {
        let (tx, rx) = mpsc::channel();
        self.analyze_streaming(tokens, tx);

        let mut result = Err(ChunkerError::EmptyInput);
        while let Ok(event) = rx.recv() {
            match event {
                PipelineEvent::Done {
                    labeled_tokens,
                    chunks,
                    ..
                } => result = Ok((labeled_tokens, chunks)),
                PipelineEvent::Error { .. } => result = Err(ChunkerError::EmptyInput),
                _ => {}
            }
        }
        result
    }

    /// Executa o pipeline enviando eventos de progresso em tempo real.
    ///
    /// Este método é o coração da interface visual. Ele não retorna valores
    /// diretamente, mas "empurra" [`PipelineEvent`]s pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `SentenceReceived`: tokens validados.
    /// 2. `FeaturesComputed` (loop): features de cada token.
    /// 3. `LabelAssigned` (loop): decisão greedy para cada token.
    /// 4. `Done`: sintagmas finais consolidados.
    pub fn analyze_streaming(&self, tokens: &[Token], tx: mpsc::Sender<PipelineEvent>) {
        let start = std::time::Instant::now();

        if tokens.is_empty() {
            let _ = tx.send(PipelineEvent::Error {
                message: ChunkerError::EmptyInput.to_string(),
            });
            return;
        }

        let _ = tx.send(PipelineEvent::SentenceReceived {
            tokens: tokens.to_vec(),
            total: tokens.len(),
        });

        // Decodificação greedy, um evento de features e um de tag por token
        let window = self.model.history();
        let mut history: Vec<Tag> = Vec::with_capacity(tokens.len());
        let mut labeled: Vec<LabeledToken> = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let fv = extract_for_token(tokens, i, &history, window);

            let mut sorted: Vec<(String, f64)> =
                fv.features.iter().map(|(k, v)| (k.clone(), *v)).collect();
            sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
            sorted.truncate(10);
            let _ = tx.send(PipelineEvent::FeaturesComputed {
                token_index: i,
                token_text: token.text.clone(),
                top_features: sorted,
            });

            let (tag, score) = self.model.predict(&fv);
            let _ = tx.send(PipelineEvent::LabelAssigned {
                token_index: i,
                token_text: token.text.clone(),
                label: tag.label(),
                score,
            });

            history.push(tag);
            labeled.push(LabeledToken {
                token: token.clone(),
                tag,
                score,
            });
        }

        let chunks = tags_to_chunks(&labeled);
        let _ = tx.send(PipelineEvent::Done {
            chunks,
            labeled_tokens: labeled,
            total_tokens: tokens.len(),
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}

impl Default for ChunkerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::ChunkType;

    fn sentence() -> Vec<Token> {
        vec![
            Token::tagged("O", "ART", 0),
            Token::tagged("cachorro", "N", 1),
            Token::tagged("late", "V", 2),
            Token::tagged(".", "PONT", 3),
        ]
    }

    #[test]
    fn test_pipeline_basic() {
        let pipeline = ChunkerPipeline::new();
        let (labeled, chunks) = pipeline.analyze(&sentence()).unwrap();
        assert_eq!(labeled.len(), 4);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::Np);
    }

    #[test]
    fn test_pipeline_empty_is_error() {
        let pipeline = ChunkerPipeline::new();
        assert!(pipeline.analyze(&[]).is_err());
    }

    #[test]
    fn test_pipeline_events_streaming() {
        let pipeline = ChunkerPipeline::new();
        let (tx, rx) = mpsc::channel();
        pipeline.analyze_streaming(&sentence(), tx);

        let events: Vec<PipelineEvent> = rx.try_iter().collect();
        assert!(!events.is_empty());

        assert!(
            matches!(&events[0], PipelineEvent::SentenceReceived { total: 4, .. }),
            "primeiro evento deve ser SentenceReceived"
        );
        assert!(
            matches!(events.last().unwrap(), PipelineEvent::Done { .. }),
            "último evento deve ser Done"
        );

        // Um LabelAssigned por token
        let labels = events
            .iter()
            .filter(|e| matches!(e, PipelineEvent::LabelAssigned { .. }))
            .count();
        assert_eq!(labels, 4);
    }

    #[test]
    fn test_pipeline_matches_sequencer_output() {
        let pipeline = ChunkerPipeline::new();
        let tokens = sentence();
        let (_, via_pipeline) = pipeline.analyze(&tokens).unwrap();
        let via_sequencer = crate::sequencer::chunk(&pipeline.model, &tokens).unwrap();

        assert_eq!(via_pipeline.len(), via_sequencer.len());
        for (a, b) in via_pipeline.iter().zip(via_sequencer.iter()) {
            assert_eq!(a.chunk_type, b.chunk_type);
            assert_eq!((a.start_token, a.end_token), (b.start_token, b.end_token));
        }
    }
}
