//! # Esquema de Tags BIO e Tipos de Sintagma
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! para rotular tokens no chunking sintático (shallow parsing).
//!
//! ## Tipos de Sintagma
//!
//! | Tipo  | Significado            | Exemplos                     |
//! |-------|------------------------|------------------------------|
//! | NP    | Sintagma Nominal       | "o cachorro", "energia limpa"|
//! | VP    | Sintagma Verbal        | "late", "foi eleito"         |
//! | PP    | Sintagma Preposicional | "de", "em" (só a preposição) |
//! | ADJP  | Sintagma Adjetival     | "feliz" (predicativo)        |
//! | ADVP  | Sintagma Adverbial     | "ontem", "muito bem"         |
//! | O     | Fora de sintagma       | pontuação, conjunções        |
//!
//! ## Esquema BIO
//!
//! - `B-TIPO`: Begin — primeiro token de um sintagma
//! - `I-TIPO`: Inside — tokens subsequentes do mesmo sintagma
//! - `O`: Outside — não pertence a nenhum sintagma
//!
//! Seguimos a convenção CoNLL-2000: o PP contém apenas a preposição e o
//! sintagma nominal que a segue é um NP separado ("em [o Brasil]" → PP + NP).

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Tipos de sintagma reconhecidos pelo chunker.
///
/// É um conjunto fechado: adicionar um novo tipo exige novos pesos no modelo
/// e novas anotações no corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkType {
    /// **Sintagma Nominal**: núcleo substantivo com determinantes e modificadores. Ex: "a usina solar".
    Np,
    /// **Sintagma Verbal**: verbo principal e auxiliares. Ex: "foi inaugurada".
    Vp,
    /// **Sintagma Preposicional**: a preposição que liga sintagmas. Ex: "de", "em".
    Pp,
    /// **Sintagma Adjetival**: adjetivo predicativo fora de um NP. Ex: "é [bonita]".
    Adjp,
    /// **Sintagma Adverbial**: advérbios e locuções adverbiais. Ex: "ontem", "muito bem".
    Advp,
}

impl ChunkType {
    /// Nome do tipo como string (para serialização e UI)
    pub fn name(&self) -> &'static str {
        match self {
            ChunkType::Np => "NP",
            ChunkType::Vp => "VP",
            ChunkType::Pp => "PP",
            ChunkType::Adjp => "ADJP",
            ChunkType::Advp => "ADVP",
        }
    }

    /// Cor CSS para highlight na UI
    pub fn color(&self) -> &'static str {
        match self {
            ChunkType::Np => "#3b82f6",   // azul
            ChunkType::Vp => "#10b981",   // verde esmeralda
            ChunkType::Pp => "#f59e0b",   // âmbar
            ChunkType::Adjp => "#8b5cf6", // violeta
            ChunkType::Advp => "#ec4899", // rosa
        }
    }

    /// Tenta parsear a partir de string (ex: "NP" → Some(Np))
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NP" => Some(ChunkType::Np),
            "VP" => Some(ChunkType::Vp),
            "PP" => Some(ChunkType::Pp),
            "ADJP" => Some(ChunkType::Adjp),
            "ADVP" => Some(ChunkType::Advp),
            _ => None,
        }
    }
}

/// Tag BIO aplicada a um token.
///
/// O esquema BIO permite representar sintagmas de múltiplos tokens.
/// O decodificador prevê uma dessas tags para cada token, da esquerda
/// para a direita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: marca o INÍCIO de um sintagma. Ex: **o** (B-NP) cachorro.
    Begin(ChunkType),
    /// **Inside**: marca a CONTINUAÇÃO de um sintagma. Ex: o **cachorro** (I-NP).
    Inside(ChunkType),
    /// **Outside**: o token não faz parte de nenhum sintagma.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-NP", "I-VP", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(t) => format!("B-{}", t.name()),
            Tag::Inside(t) => format!("I-{}", t.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Índice numérico da tag (0..11), usado para matrizes e ordenação estável.
    pub fn index(&self) -> usize {
        match self {
            Tag::Outside => 0,
            Tag::Begin(ChunkType::Np) => 1,
            Tag::Inside(ChunkType::Np) => 2,
            Tag::Begin(ChunkType::Vp) => 3,
            Tag::Inside(ChunkType::Vp) => 4,
            Tag::Begin(ChunkType::Pp) => 5,
            Tag::Inside(ChunkType::Pp) => 6,
            Tag::Begin(ChunkType::Adjp) => 7,
            Tag::Inside(ChunkType::Adjp) => 8,
            Tag::Begin(ChunkType::Advp) => 9,
            Tag::Inside(ChunkType::Advp) => 10,
        }
    }

    /// Número total de tags possíveis
    pub const COUNT: usize = 11;

    /// Todas as tags em ordem de índice (para iteração determinística).
    ///
    /// A ordem importa: em caso de empate de score, o decodificador greedy
    /// escolhe a primeira tag desta lista, garantindo saída determinística.
    pub fn all() -> [Tag; 11] {
        [
            Tag::Outside,
            Tag::Begin(ChunkType::Np),
            Tag::Inside(ChunkType::Np),
            Tag::Begin(ChunkType::Vp),
            Tag::Inside(ChunkType::Vp),
            Tag::Begin(ChunkType::Pp),
            Tag::Inside(ChunkType::Pp),
            Tag::Begin(ChunkType::Adjp),
            Tag::Inside(ChunkType::Adjp),
            Tag::Begin(ChunkType::Advp),
            Tag::Inside(ChunkType::Advp),
        ]
    }

    /// Retorna o tipo de sintagma desta tag (se for B- ou I-)
    pub fn chunk_type(&self) -> Option<ChunkType> {
        match self {
            Tag::Begin(t) | Tag::Inside(t) => Some(*t),
            Tag::Outside => None,
        }
    }

    /// Verifica se a transição tag_prev → self é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesmo tipo)
    /// - `B-X` pode seguir qualquer tag
    /// - `O` pode seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(t) => match prev {
                Tag::Begin(prev_t) | Tag::Inside(prev_t) => prev_t == t,
                _ => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-NP" → Begin(Np))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let parts: Vec<&str> = s.splitn(2, '-').collect();
        if parts.len() != 2 {
            return None;
        }
        let t = ChunkType::from_str(parts[1])?;
        match parts[0] {
            "B" => Some(Tag::Begin(t)),
            "I" => Some(Tag::Inside(t)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com sua tag BIO prevista e o score bruto da decisão
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledToken {
    pub token: Token,
    pub tag: Tag,
    /// Score log-linear da tag escolhida (quanto maior, mais confiante)
    pub score: f64,
}

/// Um sintagma identificado na sentença (span contíguo de tokens)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Texto do sintagma (tokens unidos por espaço)
    pub text: String,
    /// Tipo do sintagma
    pub chunk_type: ChunkType,
    /// Índice do primeiro token (inclusivo)
    pub start_token: usize,
    /// Índice após o último token (exclusivo)
    pub end_token: usize,
    /// Posição de byte inicial no texto original
    pub start: usize,
    /// Posição de byte final no texto original
    pub end: usize,
    /// Tokens que compõem o sintagma, em ordem
    pub tokens: Vec<Token>,
    /// Média dos scores dos tokens
    pub score: f64,
}

/// Converte uma sequência de tokens rotulados (BIO) em sintagmas.
///
/// Implementa a máquina de estados do esquema BIO com dois estados:
/// *nenhum sintagma aberto* e *sintagma aberto de tipo T*:
/// - `B-X` abre um novo sintagma (fechando o anterior, se houver).
/// - `I-X` estende o sintagma aberto **se** o tipo coincidir; caso contrário
///   é tratado como `B-X` (reparo de sequência malformada — o modelo não
///   deveria emitir um I "solto", mas a conversão nunca falha se emitir).
/// - `O` fecha o sintagma aberto e não pertence a nenhum.
/// - O fim da sentença fecha qualquer sintagma aberto.
///
/// # Exemplo
/// `[B-NP, I-NP, B-VP, O]` → `[Chunk(NP, 0..2), Chunk(VP, 2..3)]`
pub fn tags_to_chunks(labeled: &[LabeledToken]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    // Sintagma em construção: (tipo, índice do primeiro token)
    let mut open: Option<(ChunkType, usize)> = None;

    for (i, lt) in labeled.iter().enumerate() {
        match lt.tag {
            Tag::Begin(t) => {
                if let Some((open_t, start)) = open.take() {
                    chunks.push(build_chunk(labeled, open_t, start, i));
                }
                open = Some((t, i));
            }
            Tag::Inside(t) => match open {
                Some((open_t, _)) if open_t == t => {} // estende
                _ => {
                    // I sem B correspondente: reparo — abre novo sintagma aqui
                    if let Some((open_t, start)) = open.take() {
                        chunks.push(build_chunk(labeled, open_t, start, i));
                    }
                    open = Some((t, i));
                }
            },
            Tag::Outside => {
                if let Some((open_t, start)) = open.take() {
                    chunks.push(build_chunk(labeled, open_t, start, i));
                }
            }
        }
    }

    // Fecha o último sintagma se ainda aberto
    if let Some((open_t, start)) = open.take() {
        chunks.push(build_chunk(labeled, open_t, start, labeled.len()));
    }

    chunks
}

/// Materializa um `Chunk` a partir do intervalo de tokens `start..end`
fn build_chunk(labeled: &[LabeledToken], chunk_type: ChunkType, start: usize, end: usize) -> Chunk {
    let slice = &labeled[start..end];
    let tokens: Vec<Token> = slice.iter().map(|lt| lt.token.clone()).collect();
    let text = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let score = slice.iter().map(|lt| lt.score).sum::<f64>() / slice.len() as f64;

    Chunk {
        text,
        chunk_type,
        start_token: start,
        end_token: end,
        start: tokens.first().map(|t| t.start).unwrap_or(0),
        end: tokens.last().map(|t| t.end).unwrap_or(0),
        tokens,
        score,
    }
}
