//! # sintagma-core — Chunking Sintático (Shallow Parsing) em Português Brasileiro
//!
//! Este crate transforma uma sequência de tokens etiquetados com POS em
//! **sintagmas** (chunks): trechos contíguos rotulados como sintagma nominal,
//! verbal, preposicional, adjetival ou adverbial. Ele foi projetado para ser
//! didático, modular e determinístico.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui e é transformado passo a passo:
//!
//! 1.  **Entrada**: Tokens já etiquetados por um POS-tagger externo ([`token`]).
//! 2.  **Extração de Features** ([`features`]): cada token vira um vetor esparso
//!     de características (POS, contexto, histórico de tags previstas).
//! 3.  **Decodificação Greedy** ([`sequencer`]): o modelo log-linear ([`model`])
//!     escolhe a melhor tag BIO para cada token, da esquerda para a direita.
//! 4.  **Conversão** ([`tagger`]): a sequência BIO vira uma lista de [`Chunk`]s
//!     disjuntos e ordenados.
//!
//! O [`registry`] mantém modelos carregados em cache com coalescência de
//! cargas concorrentes (singleflight); o [`pipeline`] expõe o processo como
//! uma sequência de eventos observáveis para a interface web.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sintagma_core::{sequencer, ChunkerModel, ChunkType, Token};
//!
//! // 1. Modelo padrão com pesos heurísticos PT-BR
//! let model = ChunkerModel::build();
//!
//! // 2. Sentença já etiquetada com POS (por um tagger externo)
//! let tokens = vec![
//!     Token::tagged("O", "ART", 0),
//!     Token::tagged("cachorro", "N", 1),
//!     Token::tagged("late", "V", 2),
//! ];
//!
//! // 3. Segmenta em sintagmas
//! let chunks = sequencer::chunk(&model, &tokens).unwrap();
//! assert_eq!(chunks[0].chunk_type, ChunkType::Np);
//! assert_eq!(chunks[0].text, "O cachorro");
//! ```
//!
//! ## Módulos Principais
//!
//! - [`sequencer`]: decodificação greedy e operação principal de chunking.
//! - [`registry`]: cache de modelos com carregamento coalescido.
//! - [`model`]: o modelo log-linear imutável e seu carregamento via JSON.
//! - [`corpus`]: sentenças PT-BR anotadas (POS + chunk-BIO).

pub mod corpus;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod sequencer;
pub mod tagger;
pub mod token;

pub use error::ChunkerError;
pub use model::ChunkerModel;
pub use pipeline::{ChunkerPipeline, PipelineEvent};
pub use registry::ModelRegistry;
pub use tagger::{tags_to_chunks, Chunk, ChunkType, LabeledToken, Tag};
pub use token::Token;
