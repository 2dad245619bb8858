//! # Decodificador Greedy de Sequências
//!
//! Percorre a sentença da esquerda para a direita e, para cada token, escolhe
//! a tag BIO de maior score dado o contexto e o histórico das K tags já
//! previstas (beam de largura 1, puramente greedy).
//!
//! ## Intuição
//!
//! Uma busca exaustiva sobre as 11 tags teria custo `O(11^N)`. O greedy paga
//! apenas `O(N × 11)` aceitando nunca revisitar decisões passadas: a tag
//! escolhida para o token `i` entra no histórico e influencia o token `i+1`
//! via features de conjunção (`prev_tag=B-NP|pos=N`).
//!
//! A decodificação é uma computação pura: sem I/O, sem estado compartilhado,
//! determinística para o mesmo modelo e a mesma sentença.

use rayon::prelude::*;

use crate::error::ChunkerError;
use crate::features::extract_for_token;
use crate::model::ChunkerModel;
use crate::tagger::{tags_to_chunks, Chunk, LabeledToken, Tag};
use crate::token::Token;

/// Atribui uma tag BIO a cada token da sentença (decodificação greedy).
///
/// # Erros
/// [`ChunkerError::EmptyInput`] se a sentença for vazia. Nenhum outro caso
/// falha: tokens e etiquetas desconhecidos são absorvidos pelas features.
pub fn decode(model: &ChunkerModel, tokens: &[Token]) -> Result<Vec<LabeledToken>, ChunkerError> {
    if tokens.is_empty() {
        return Err(ChunkerError::EmptyInput);
    }

    let window = model.history();
    let mut history: Vec<Tag> = Vec::with_capacity(tokens.len());
    let mut labeled = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        let fv = extract_for_token(tokens, i, &history, window);
        let (tag, score) = model.predict(&fv);
        history.push(tag);
        labeled.push(LabeledToken {
            token: token.clone(),
            tag,
            score,
        });
    }

    Ok(labeled)
}

/// Segmenta uma sentença em sintagmas: decodifica as tags BIO e as converte
/// em [`Chunk`]s contíguos, disjuntos e ordenados.
///
/// É a operação principal do crate. Tudo-ou-nada: em caso de erro nenhum
/// resultado parcial é retornado.
///
/// # Exemplo
/// ```rust
/// use sintagma_core::{sequencer, ChunkerModel, Token};
///
/// let model = ChunkerModel::build();
/// let tokens = vec![
///     Token::tagged("o", "ART", 0),
///     Token::tagged("cachorro", "N", 1),
///     Token::tagged("late", "V", 2),
/// ];
/// let chunks = sequencer::chunk(&model, &tokens).unwrap();
/// assert_eq!(chunks[0].text, "o cachorro");
/// ```
pub fn chunk(model: &ChunkerModel, tokens: &[Token]) -> Result<Vec<Chunk>, ChunkerError> {
    let labeled = decode(model, tokens)?;
    Ok(tags_to_chunks(&labeled))
}

/// Segmenta várias sentenças em paralelo com rayon.
///
/// O modelo é somente leitura, então as sentenças são independentes e o
/// paralelismo é trivial. O resultado preserva a ordem de entrada; uma
/// sentença vazia falha o lote inteiro (mesma política tudo-ou-nada).
pub fn chunk_batch(model: &ChunkerModel, sentences: &[Vec<Token>]) -> Result<Vec<Vec<Chunk>>, ChunkerError> {
    sentences
        .par_iter()
        .map(|tokens| chunk(model, tokens))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::ChunkType;

    fn sentence(words: &[(&str, &str)]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, (text, pos))| Token::tagged(*text, *pos, i))
            .collect()
    }

    /// Modelo sintético que rotula o primeiro token como I-NP (sequência
    /// malformada de propósito), o segundo como I-NP e o resto como O.
    fn dangling_inside_model() -> ChunkerModel {
        let mut m = ChunkerModel::new();
        m.set_weight("BOS", &Tag::Inside(ChunkType::Np), 5.0);
        m.set_weight("prev_tag=I-NP|pos=N", &Tag::Inside(ChunkType::Np), 5.0);
        m.set_weight("pos=V", &Tag::Outside, 5.0);
        m
    }

    #[test]
    fn test_empty_sentence_is_invalid_input() {
        let model = ChunkerModel::build();
        assert_eq!(chunk(&model, &[]).unwrap_err(), ChunkerError::EmptyInput);
    }

    #[test]
    fn test_end_to_end_np_then_vp() {
        // A sentença canônica: "O cachorro late" → [NP: o cachorro] [VP: late]
        let model = ChunkerModel::build();
        let tokens = sentence(&[("O", "ART"), ("cachorro", "N"), ("late", "V"), (".", "PONT")]);
        let chunks = chunk(&model, &tokens).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::Np);
        assert_eq!((chunks[0].start_token, chunks[0].end_token), (0, 2));
        assert_eq!(chunks[0].text, "O cachorro");
        assert_eq!(chunks[1].chunk_type, ChunkType::Vp);
        assert_eq!((chunks[1].start_token, chunks[1].end_token), (2, 3));
        // "." não pertence a nenhum sintagma
        assert!(chunks.iter().all(|c| !(c.start_token..c.end_token).contains(&3)));
    }

    #[test]
    fn test_pp_is_single_preposition() {
        // "em a capital" → [PP: em] [NP: a capital] (convenção CoNLL-2000)
        let model = ChunkerModel::build();
        let tokens = sentence(&[("em", "PREP"), ("a", "ART"), ("capital", "N")]);
        let chunks = chunk(&model, &tokens).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::Pp);
        assert_eq!((chunks[0].start_token, chunks[0].end_token), (0, 1));
        assert_eq!(chunks[1].chunk_type, ChunkType::Np);
        assert_eq!((chunks[1].start_token, chunks[1].end_token), (1, 3));
    }

    #[test]
    fn test_compound_verb_is_one_vp() {
        // "foi eleito" → um único VP de dois tokens
        let model = ChunkerModel::build();
        let tokens = sentence(&[("Lula", "NPROP"), ("foi", "V"), ("eleito", "PCP")]);
        let chunks = chunk(&model, &tokens).unwrap();

        let vp = chunks.iter().find(|c| c.chunk_type == ChunkType::Vp).unwrap();
        assert_eq!((vp.start_token, vp.end_token), (1, 3));
        assert_eq!(vp.text, "foi eleito");
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let model = ChunkerModel::build();
        let tokens = sentence(&[
            ("A", "ART"),
            ("nova", "ADJ"),
            ("usina", "N"),
            ("de", "PREP"),
            ("energia", "N"),
            ("solar", "ADJ"),
            ("foi", "V"),
            ("inaugurada", "PCP"),
            ("ontem", "ADV"),
            (".", "PONT"),
        ]);
        let first = chunk(&model, &tokens).unwrap();
        let second = chunk(&model, &tokens).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.chunk_type, b.chunk_type);
            assert_eq!((a.start_token, a.end_token), (b.start_token, b.end_token));
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_chunk_type_consistency() {
        // Todo token dentro de um chunk carrega o tipo do chunk
        let model = ChunkerModel::build();
        let tokens = sentence(&[
            ("O", "ART"),
            ("presidente", "N"),
            ("visitou", "V"),
            ("a", "ART"),
            ("capital", "N"),
        ]);
        let labeled = decode(&model, &tokens).unwrap();
        let chunks = tags_to_chunks(&labeled);

        for c in &chunks {
            assert!(!c.tokens.is_empty(), "sintagma sem tokens");
            for idx in c.start_token..c.end_token {
                assert_eq!(labeled[idx].tag.chunk_type(), Some(c.chunk_type));
            }
        }
    }

    #[test]
    fn test_dangling_inside_becomes_chunk_at_zero() {
        let model = dangling_inside_model();
        let tokens = sentence(&[("cachorro", "N"), ("grande", "N"), ("late", "V")]);

        let labeled = decode(&model, &tokens).unwrap();
        assert_eq!(labeled[0].tag, Tag::Inside(ChunkType::Np));

        let chunks = tags_to_chunks(&labeled);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_type, ChunkType::Np);
        assert_eq!((chunks[0].start_token, chunks[0].end_token), (0, 2));
    }

    #[test]
    fn test_custom_model_with_english_tagset() {
        // O tagset não é fixo: um modelo com pesos para etiquetas Penn
        // Treebank produz [B-NP, I-NP, O] para "The dog barks"
        let mut m = ChunkerModel::new();
        m.set_weight("pos=DT", &Tag::Begin(ChunkType::Np), 3.0);
        m.set_weight("prev_tag=B-NP|pos=NN", &Tag::Inside(ChunkType::Np), 3.0);
        m.set_weight("pos=VBZ", &Tag::Outside, 3.0);

        let tokens = sentence(&[("The", "DT"), ("dog", "NN"), ("barks", "VBZ")]);
        let chunks = chunk(&m, &tokens).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_type, ChunkType::Np);
        assert_eq!((chunks[0].start_token, chunks[0].end_token), (0, 2));
        assert_eq!(chunks[0].text, "The dog");
    }

    #[test]
    fn test_chunk_batch_preserves_order() {
        let model = ChunkerModel::build();
        let sentences = vec![
            sentence(&[("O", "ART"), ("cachorro", "N"), ("late", "V")]),
            sentence(&[("em", "PREP"), ("a", "ART"), ("capital", "N")]),
        ];
        let results = chunk_batch(&model, &sentences).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0][0].text, "O cachorro");
        assert_eq!(results[1][0].chunk_type, ChunkType::Pp);
    }

    #[test]
    fn test_chunk_batch_fails_on_empty_sentence() {
        let model = ChunkerModel::build();
        let sentences = vec![sentence(&[("late", "V")]), vec![]];
        assert_eq!(chunk_batch(&model, &sentences).unwrap_err(), ChunkerError::EmptyInput);
    }
}
