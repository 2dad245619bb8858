//! # Erros do Chunker
//!
//! Taxonomia mínima: falha de carregamento de modelo (recurso ausente ou
//! corrompido), timeout de carregamento (local ao chamador) e entrada
//! inválida (sentença vazia). A decodificação em si não tem caminho de erro:
//! tokens ou etiquetas desconhecidos são tratados via features ausentes,
//! nunca como falha.

use thiserror::Error;

/// Erros possíveis das operações públicas do crate.
///
/// `Clone` é necessário porque um mesmo erro de carregamento é propagado
/// para todos os chamadores que aguardavam aquele modelo.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChunkerError {
    /// O recurso do modelo está ausente ou malformado. O registro **não**
    /// memoriza esta falha: uma chamada posterior com a mesma chave tenta
    /// carregar de novo.
    #[error("falha ao carregar o modelo '{key}': {reason}")]
    ModelLoad { key: String, reason: String },

    /// O chamador desistiu de esperar o carregamento. Afeta apenas quem
    /// expirou; os demais continuam aguardando normalmente.
    #[error("timeout ao aguardar o carregamento do modelo '{key}'")]
    ModelLoadTimeout { key: String },

    /// Sentença vazia: erro de uso do chamador, não faz sentido repetir.
    #[error("sentença vazia: nada para segmentar")]
    EmptyInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ChunkerError::ModelLoad {
            key: "pt-br.json".into(),
            reason: "arquivo não encontrado".into(),
        };
        assert!(e.to_string().contains("pt-br.json"));
        assert!(ChunkerError::EmptyInput.to_string().contains("vazia"));
    }
}
