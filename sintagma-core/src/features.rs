//! # Engenharia de Features para Chunking
//!
//! Para cada token, extrai um vetor de features binárias que o modelo
//! log-linear utiliza para pontuar as tags BIO candidatas. Diferente do
//! NER clássico, a feature dominante aqui é a **etiqueta POS** — a forma da
//! palavra importa menos do que sua classe gramatical.
//!
//! ## Features Implementadas
//!
//! ### Features do token atual
//! - Etiqueta POS (`pos=ART`)
//! - Forma da palavra em minúsculas (`word=o`)
//! - Posição na sentença (início/fim)
//! - Padrões simples: só dígitos, pontuação
//!
//! ### Features de contexto (janela de 1 token)
//! - POS e palavra anterior e posterior
//!
//! ### Features de histórico (janela de K tags previstas)
//! - Tag prevista anterior (`prev_tag=B-NP`)
//! - Conjunção tag anterior × POS atual (`prev_tag=B-NP|pos=N`) — é ela que
//!   permite ao decodificador greedy "continuar" um sintagma aberto
//! - Tag duas posições atrás (`prev2_tag=...`), quando K ≥ 2
//!
//! Palavras ou etiquetas nunca vistas apenas não ativam pesos: a extração
//! jamais falha por vocabulário desconhecido.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tagger::Tag;
use crate::token::Token;

/// Vetor esparso de features de um token.
///
/// Utilizamos um mapa esparso (`HashMap<String, f64>`) porque o espaço de
/// features é potencialmente infinito (ex: "word=abacaxi"), mas cada token
/// ativa apenas um pequeno subconjunto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// O mapa de features ativas. Ex: `{"pos=N": 1.0, "prev_tag=B-NP": 1.0}`.
    pub features: HashMap<String, f64>,
    /// Índice do token original na sentença.
    pub token_index: usize,
}

impl FeatureVector {
    pub fn new(token_index: usize) -> Self {
        Self {
            features: HashMap::new(),
            token_index,
        }
    }

    /// Adiciona uma feature ao vetor com valor 1.0 (binária) ou customizado.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }
}

/// Extrai as features de um token dado o contexto da sentença e o histórico
/// de tags já previstas.
///
/// # Parâmetros
/// - `tokens`: a sentença completa.
/// - `i`: índice do token alvo.
/// - `history`: tags já atribuídas aos tokens `0..i`, em ordem. Apenas as
///   últimas `window` entradas são consultadas (janela K do modelo).
/// - `window`: tamanho K da janela de histórico (tipicamente 2).
///
/// # Exemplo
/// Para "o cachorro late" no índice 1 ("cachorro", N) com histórico `[B-NP]`:
/// - `pos=N`, `word=cachorro`
/// - `prev_pos=ART`, `prev_word=o`, `next_pos=V`
/// - `prev_tag=B-NP`, `prev_tag=B-NP|pos=N`
pub fn extract_for_token(tokens: &[Token], i: usize, history: &[Tag], window: usize) -> FeatureVector {
    let mut fv = FeatureVector::new(i);
    let token = &tokens[i];
    let word = token.text.to_lowercase();

    // === Features do token atual ===
    fv.insert("bias", 1.0);
    fv.insert(format!("pos={}", token.pos), 1.0);
    fv.insert(format!("word={word}"), 1.0);

    if token.text.chars().all(char::is_numeric) && !token.text.is_empty() {
        fv.insert("is_digit", 1.0);
    }
    if token.text.len() == 1 && !token.text.chars().next().map(char::is_alphanumeric).unwrap_or(false) {
        fv.insert("is_punct", 1.0);
    }

    // Posição na sequência
    if i == 0 {
        fv.insert("BOS", 1.0); // Beginning Of Sentence
    }
    if i == tokens.len() - 1 {
        fv.insert("EOS", 1.0); // End Of Sentence
    }

    // === Features de contexto ===
    if i > 0 {
        let prev = &tokens[i - 1];
        fv.insert(format!("prev_pos={}", prev.pos), 1.0);
        fv.insert(format!("prev_word={}", prev.text.to_lowercase()), 1.0);
    }
    if i + 1 < tokens.len() {
        let next = &tokens[i + 1];
        fv.insert(format!("next_pos={}", next.pos), 1.0);
        fv.insert(format!("next_word={}", next.text.to_lowercase()), 1.0);
    }

    // === Features de histórico (tags já decididas) ===
    let hist_window = window.min(history.len());
    if hist_window == 0 {
        fv.insert("prev_tag=BOS", 1.0);
    } else {
        let prev_tag = &history[history.len() - 1];
        fv.insert(format!("prev_tag={}", prev_tag.label()), 1.0);
        // Conjunção: é a feature que carrega o "estado" do sintagma aberto
        fv.insert(format!("prev_tag={}|pos={}", prev_tag.label(), token.pos), 1.0);

        if hist_window >= 2 {
            let prev2_tag = &history[history.len() - 2];
            fv.insert(format!("prev2_tag={}", prev2_tag.label()), 1.0);
        }
    }

    fv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::ChunkType;

    fn sentence() -> Vec<Token> {
        vec![
            Token::tagged("o", "ART", 0),
            Token::tagged("cachorro", "N", 1),
            Token::tagged("late", "V", 2),
        ]
    }

    #[test]
    fn test_pos_and_word_features() {
        let tokens = sentence();
        let fv = extract_for_token(&tokens, 1, &[Tag::Begin(ChunkType::Np)], 2);
        assert_eq!(fv.features.get("pos=N"), Some(&1.0));
        assert_eq!(fv.features.get("word=cachorro"), Some(&1.0));
        assert_eq!(fv.features.get("prev_pos=ART"), Some(&1.0));
        assert_eq!(fv.features.get("next_pos=V"), Some(&1.0));
    }

    #[test]
    fn test_history_conjunction_feature() {
        let tokens = sentence();
        let fv = extract_for_token(&tokens, 1, &[Tag::Begin(ChunkType::Np)], 2);
        assert_eq!(fv.features.get("prev_tag=B-NP"), Some(&1.0));
        assert_eq!(fv.features.get("prev_tag=B-NP|pos=N"), Some(&1.0));
    }

    #[test]
    fn test_first_token_has_bos_history() {
        let tokens = sentence();
        let fv = extract_for_token(&tokens, 0, &[], 2);
        assert_eq!(fv.features.get("BOS"), Some(&1.0));
        assert_eq!(fv.features.get("prev_tag=BOS"), Some(&1.0));
        assert!(fv.features.keys().all(|k| !k.starts_with("prev2_tag")));
    }

    #[test]
    fn test_history_window_is_bounded() {
        let tokens = vec![
            Token::tagged("a", "ART", 0),
            Token::tagged("b", "N", 1),
            Token::tagged("c", "N", 2),
            Token::tagged("d", "V", 3),
        ];
        let history = vec![
            Tag::Begin(ChunkType::Np),
            Tag::Inside(ChunkType::Np),
            Tag::Inside(ChunkType::Np),
        ];
        // Janela K=1: só a última tag entra, sem prev2_tag
        let fv = extract_for_token(&tokens, 3, &history, 1);
        assert_eq!(fv.features.get("prev_tag=I-NP"), Some(&1.0));
        assert!(fv.features.keys().all(|k| !k.starts_with("prev2_tag")));
    }

    #[test]
    fn test_punctuation_feature() {
        let tokens = vec![Token::tagged(".", "PONT", 0)];
        let fv = extract_for_token(&tokens, 0, &[], 2);
        assert_eq!(fv.features.get("is_punct"), Some(&1.0));
    }
}
