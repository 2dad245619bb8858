//! # Modelo de Chunking Log-Linear
//!
//! O modelo pontua cada tag BIO candidata para um token dado seu vetor de
//! features (que inclui o histórico de tags previstas). É a peça "opaca" do
//! sistema: imutável após a construção, segura para leitura concorrente e
//! compartilhada via `Arc` entre todas as decodificações.
//!
//! ## Como os pesos foram derivados
//!
//! Os pesos do modelo padrão foram estimados de forma heurística a partir
//! das regularidades do corpus PT-BR anotado (ex: artigo quase sempre abre
//! um NP; substantivo após B-NP quase sempre o continua). Em um sistema
//! real, seriam treinados por máxima verossimilhança; o treinamento está
//! fora do escopo deste crate e os pesos aqui são escritos à mão para fins
//! didáticos.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChunkerError;
use crate::features::FeatureVector;
use crate::tagger::{ChunkType, Tag};

/// Janela de histórico padrão (K): o decodificador consulta as duas últimas
/// tags previstas, a convenção usual de chunkers de sequência.
const DEFAULT_HISTORY: usize = 2;

/// Modelo de chunking: pesos log-lineares feature×tag.
///
/// Contém:
/// - `weights`: mapa `feature_name + "|" + tag_label` → peso
/// - `history`: tamanho K da janela de tags anteriores usada como feature
///
/// O modelo é um valor imutável após carregado; todos os métodos de consulta
/// recebem `&self` e não há mutabilidade interior — leitores concorrentes
/// não precisam de lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerModel {
    /// Pesos: `"pos=ART|B-NP"` → 4.0
    weights: HashMap<String, f64>,
    /// Janela K de histórico de tags
    #[serde(default = "default_history")]
    history: usize,
}

fn default_history() -> usize {
    DEFAULT_HISTORY
}

impl ChunkerModel {
    /// Cria um modelo vazio (todos os scores zero). Útil em testes.
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
            history: DEFAULT_HISTORY,
        }
    }

    /// Tamanho K da janela de histórico que o decodificador deve manter.
    pub fn history(&self) -> usize {
        self.history
    }

    /// Define o peso de uma feature para uma tag.
    pub fn set_weight(&mut self, feature: &str, tag: &Tag, weight: f64) {
        self.weights.insert(format!("{feature}|{}", tag.label()), weight);
    }

    /// Score log-linear de uma tag dado o vetor de features:
    /// `score = Σ_k w_{k, tag} * f_k`
    ///
    /// Features sem peso registrado (palavras/etiquetas desconhecidas)
    /// contribuem zero — nunca há erro por vocabulário não visto.
    pub fn score(&self, fv: &FeatureVector, tag: &Tag) -> f64 {
        let label = tag.label();
        fv.features
            .iter()
            .map(|(name, value)| {
                self.weights
                    .get(&format!("{name}|{label}"))
                    .map(|w| w * value)
                    .unwrap_or(0.0)
            })
            .sum()
    }

    /// Escolhe a melhor tag para o vetor de features (decisão greedy local).
    ///
    /// Empates são resolvidos pela ordem fixa de [`Tag::all`], garantindo
    /// decodificação determinística.
    pub fn predict(&self, fv: &FeatureVector) -> (Tag, f64) {
        let mut best_tag = Tag::Outside;
        let mut best_score = f64::NEG_INFINITY;
        for tag in Tag::all() {
            let s = self.score(fv, &tag);
            if s > best_score {
                best_score = s;
                best_tag = tag;
            }
        }
        (best_tag, best_score)
    }

    /// Carrega um modelo serializado em JSON a partir do caminho dado.
    ///
    /// É a função de carregamento canônica para o [`crate::registry::ModelRegistry`]:
    /// a assinatura `&str -> Result<ChunkerModel, ChunkerError>` encaixa
    /// diretamente como `loader`. Arquivo ausente ou JSON malformado viram
    /// [`ChunkerError::ModelLoad`].
    pub fn from_file(path: &str) -> Result<Self, ChunkerError> {
        let bytes = std::fs::read(Path::new(path)).map_err(|e| ChunkerError::ModelLoad {
            key: path.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ChunkerError::ModelLoad {
            key: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Constrói o modelo padrão PT-BR com pesos heurísticos.
    ///
    /// # Intuições codificadas
    /// - Artigo (`ART`) praticamente sempre abre um sintagma nominal (+4.0 para B-NP).
    /// - Substantivo (`N`) logo após `B-NP`/`I-NP` continua o sintagma (+5.0 para I-NP);
    ///   isolado, abre um NP novo (+2.5 para B-NP).
    /// - Verbo (`V`) abre um VP; verbo ou particípio após VP continua o VP
    ///   (tempos compostos: "foi eleito").
    /// - Preposição (`PREP`) forma um PP de um token só (convenção CoNLL-2000);
    ///   o NP que a segue é um sintagma separado.
    /// - Pontuação e conjunções ficam fora de qualquer sintagma.
    pub fn build() -> Self {
        let mut m = ChunkerModel::new();

        let b = |t: ChunkType| Tag::Begin(t);
        let i = |t: ChunkType| Tag::Inside(t);

        // --- Sintagma Nominal (NP) ---
        m.set_weight("pos=ART", &b(ChunkType::Np), 4.0);
        m.set_weight("pos=PRON", &b(ChunkType::Np), 3.0);
        m.set_weight("pos=N", &b(ChunkType::Np), 2.5);
        m.set_weight("pos=NPROP", &b(ChunkType::Np), 2.5);
        m.set_weight("pos=NUM", &b(ChunkType::Np), 1.5);

        // Continuação do NP: núcleo e modificadores após o início
        for pos in ["N", "NPROP", "ADJ"] {
            m.set_weight(&format!("prev_tag=B-NP|pos={pos}"), &i(ChunkType::Np), 5.0);
            m.set_weight(&format!("prev_tag=I-NP|pos={pos}"), &i(ChunkType::Np), 5.0);
        }
        m.set_weight("prev_tag=B-NP|pos=NUM", &i(ChunkType::Np), 4.5);
        m.set_weight("prev_tag=I-NP|pos=NUM", &i(ChunkType::Np), 4.5);

        // --- Sintagma Verbal (VP) ---
        m.set_weight("pos=V", &b(ChunkType::Vp), 4.0);
        // Tempos compostos e locuções verbais: "foi eleito", "vai continuar"
        for pos in ["V", "PCP"] {
            m.set_weight(&format!("prev_tag=B-VP|pos={pos}"), &i(ChunkType::Vp), 5.5);
            m.set_weight(&format!("prev_tag=I-VP|pos={pos}"), &i(ChunkType::Vp), 5.5);
        }

        // --- Sintagma Preposicional (PP) ---
        m.set_weight("pos=PREP", &b(ChunkType::Pp), 4.0);

        // --- Sintagma Adjetival (ADJP) ---
        // Adjetivo predicativo, fora de um NP: "a usina é [moderna]"
        m.set_weight("pos=ADJ", &b(ChunkType::Adjp), 2.0);
        m.set_weight("pos=PCP", &b(ChunkType::Adjp), 1.5);

        // --- Sintagma Adverbial (ADVP) ---
        m.set_weight("pos=ADV", &b(ChunkType::Advp), 3.0);
        m.set_weight("prev_tag=B-ADVP|pos=ADV", &i(ChunkType::Advp), 4.0);
        m.set_weight("prev_tag=I-ADVP|pos=ADV", &i(ChunkType::Advp), 4.0);

        // --- Fora de sintagma (O) ---
        m.set_weight("pos=PONT", &Tag::Outside, 6.0);
        m.set_weight("is_punct", &Tag::Outside, 2.0);
        m.set_weight("pos=KC", &Tag::Outside, 3.0);
        m.set_weight("pos=KS", &Tag::Outside, 3.0);
        // Fallback para etiquetas desconhecidas: tudo zero, exceto este viés
        m.set_weight("bias", &Tag::Outside, 0.5);

        m
    }
}

impl Default for ChunkerModel {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_for_token;
    use crate::token::Token;

    #[test]
    fn test_article_opens_np() {
        let model = ChunkerModel::build();
        let tokens = vec![Token::tagged("o", "ART", 0), Token::tagged("cachorro", "N", 1)];
        let fv = extract_for_token(&tokens, 0, &[], model.history());
        let (tag, _) = model.predict(&fv);
        assert_eq!(tag, Tag::Begin(ChunkType::Np));
    }

    #[test]
    fn test_noun_continues_open_np() {
        let model = ChunkerModel::build();
        let tokens = vec![Token::tagged("o", "ART", 0), Token::tagged("cachorro", "N", 1)];
        let fv = extract_for_token(&tokens, 1, &[Tag::Begin(ChunkType::Np)], model.history());
        let (tag, _) = model.predict(&fv);
        assert_eq!(tag, Tag::Inside(ChunkType::Np));
    }

    #[test]
    fn test_unknown_pos_falls_back_to_outside() {
        let model = ChunkerModel::build();
        let tokens = vec![Token::tagged("???", "ETIQUETA_INEXISTENTE", 0)];
        let fv = extract_for_token(&tokens, 0, &[], model.history());
        let (tag, score) = model.predict(&fv);
        // Só o viés de O ativa: decide Outside, sem erro
        assert_eq!(tag, Tag::Outside);
        assert!(score > 0.0);
    }

    #[test]
    fn test_empty_model_is_deterministic_on_ties() {
        let model = ChunkerModel::new();
        let tokens = vec![Token::tagged("x", "X", 0)];
        let fv = extract_for_token(&tokens, 0, &[], model.history());
        // Todos os scores são zero: vence a primeira tag da ordem fixa (O)
        let (tag, score) = model.predict(&fv);
        assert_eq!(tag, Tag::Outside);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_from_file_missing_is_model_load_error() {
        let err = ChunkerModel::from_file("/caminho/inexistente/modelo.json").unwrap_err();
        assert!(matches!(err, ChunkerError::ModelLoad { .. }));
    }

    #[test]
    fn test_from_file_roundtrip_and_malformed() {
        let dir = std::env::temp_dir();
        let good = dir.join("sintagma_model_ok.json");
        let bad = dir.join("sintagma_model_bad.json");

        std::fs::write(&good, serde_json::to_string(&ChunkerModel::build()).unwrap()).unwrap();
        std::fs::write(&bad, b"{ isto nao e json").unwrap();

        let loaded = ChunkerModel::from_file(good.to_str().unwrap()).unwrap();
        assert_eq!(loaded.history(), DEFAULT_HISTORY);

        let err = ChunkerModel::from_file(bad.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ChunkerError::ModelLoad { .. }));
    }
}
