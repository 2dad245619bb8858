//! # Token Etiquetado (POS)
//!
//! A unidade de entrada do chunker é um token já etiquetado morfossintaticamente
//! por um tagger externo (ex: etiquetas do Mac-Morpho simplificado: N, V, ART, PREP...).
//! Este crate **não** tokeniza nem etiqueta: ele consome a saída de um pipeline
//! anterior e preserva os offsets originais para permitir destacar os sintagmas
//! no texto de origem.

use serde::{Deserialize, Serialize};

/// Um token de entrada com sua etiqueta POS.
///
/// O `Token` mantém a referência exata de sua posição no texto original
/// (`start` e `end`, em bytes), o que é crucial para:
/// 1. Reconstruir o texto de cada sintagma encontrado.
/// 2. Destacar os chunks na interface gráfica sem alterar a formatação original.
///
/// Tokens são valores imutáveis: o decodificador apenas os lê.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "cachorro", ",", "late").
    pub text: String,
    /// Etiqueta POS atribuída pelo tagger externo (ex: "N", "V", "ART").
    /// Etiquetas fora do vocabulário do modelo são tratadas como desconhecidas,
    /// nunca como erro.
    pub pos: String,
    /// Índice de byte inicial no texto original (inclusive).
    #[serde(default)]
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    #[serde(default)]
    pub end: usize,
    /// Índice sequencial do token na sentença (0, 1, 2...).
    #[serde(default)]
    pub index: usize,
}

impl Token {
    /// Cria um token com offsets explícitos.
    pub fn new(text: impl Into<String>, pos: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            pos: pos.into(),
            start,
            end,
            index,
        }
    }

    /// Cria um token sem offsets (útil em testes e quando o texto original
    /// não está disponível, ex: entrada via API JSON).
    pub fn tagged(text: impl Into<String>, pos: impl Into<String>, index: usize) -> Self {
        Self::new(text, pos, 0, 0, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_construction() {
        let t = Token::new("Brasil", "NPROP", 10, 16, 2);
        assert_eq!(t.text, "Brasil");
        assert_eq!(t.pos, "NPROP");
        assert_eq!(t.end - t.start, 6);
    }

    #[test]
    fn test_token_deserialize_without_offsets() {
        let t: Token = serde_json::from_str(r#"{"text":"late","pos":"V"}"#).unwrap();
        assert_eq!(t.pos, "V");
        assert_eq!(t.start, 0);
        assert_eq!(t.index, 0);
    }
}
