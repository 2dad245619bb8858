//! # Corpus PT-BR Anotado para Chunking
//!
//! Sentenças em Português Brasileiro anotadas manualmente com etiquetas POS
//! (Mac-Morpho simplificado) e tags de chunk no formato BIO. O corpus serve
//! três propósitos:
//! - origem das intuições codificadas nos pesos do modelo padrão;
//! - material de demonstração para a interface web;
//! - verdade-terreno nos testes de regressão do decodificador.
//!
//! ## Convenções de Anotação
//! - Convenção CoNLL-2000: o PP contém apenas a preposição; o NP seguinte é
//!   um sintagma separado ("de [energia solar]" → PP + NP).
//! - Contrações ("da", "na") são anotadas como PREP.
//! - Pontuação e conjunções coordenativas ficam fora de qualquer sintagma.

use crate::tagger::Tag;
use crate::token::Token;

/// Uma sentença anotada para chunking.
///
/// Cada anotação é um triplo `(palavra, etiqueta_POS, tag_BIO)`.
/// Exemplo: `("cachorro", "N", "I-NP")`.
pub struct AnnotatedSentence {
    /// O texto completo da sentença.
    pub text: &'static str,
    /// Domínio temático (para demonstrações e análises por área).
    pub domain: &'static str,
    /// Triplos (palavra, POS, chunk-BIO), em ordem.
    pub annotations: &'static [(&'static str, &'static str, &'static str)],
}

/// Retorna o corpus completo anotado
pub fn get_corpus() -> Vec<AnnotatedSentence> {
    vec![
        AnnotatedSentence {
            text: "O cachorro late.",
            domain: "exemplo",
            annotations: &[
                ("O", "ART", "B-NP"),
                ("cachorro", "N", "I-NP"),
                ("late", "V", "B-VP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "A nova usina de energia solar foi inaugurada ontem.",
            domain: "energia",
            annotations: &[
                ("A", "ART", "B-NP"),
                ("nova", "ADJ", "I-NP"),
                ("usina", "N", "I-NP"),
                ("de", "PREP", "B-PP"),
                ("energia", "N", "B-NP"),
                ("solar", "ADJ", "I-NP"),
                ("foi", "V", "B-VP"),
                ("inaugurada", "PCP", "I-VP"),
                ("ontem", "ADV", "B-ADVP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Lula visitou a capital em 2023.",
            domain: "política",
            annotations: &[
                ("Lula", "NPROP", "B-NP"),
                ("visitou", "V", "B-VP"),
                ("a", "ART", "B-NP"),
                ("capital", "N", "I-NP"),
                ("em", "PREP", "B-PP"),
                ("2023", "NUM", "B-NP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "O presidente da República discursou rapidamente.",
            domain: "política",
            annotations: &[
                ("O", "ART", "B-NP"),
                ("presidente", "N", "I-NP"),
                ("da", "PREP", "B-PP"),
                ("República", "NPROP", "B-NP"),
                ("discursou", "V", "B-VP"),
                ("rapidamente", "ADV", "B-ADVP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "A Petrobras anunciou lucro recorde ontem.",
            domain: "economia",
            annotations: &[
                ("A", "ART", "B-NP"),
                ("Petrobras", "NPROP", "I-NP"),
                ("anunciou", "V", "B-VP"),
                ("lucro", "N", "B-NP"),
                ("recorde", "N", "I-NP"),
                ("ontem", "ADV", "B-ADVP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Ela comprou dois livros e uma revista.",
            domain: "cotidiano",
            annotations: &[
                ("Ela", "PRON", "B-NP"),
                ("comprou", "V", "B-VP"),
                ("dois", "NUM", "B-NP"),
                ("livros", "N", "I-NP"),
                ("e", "KC", "O"),
                ("uma", "ART", "B-NP"),
                ("revista", "N", "I-NP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "O time jogou muito bem.",
            domain: "esportes",
            annotations: &[
                ("O", "ART", "B-NP"),
                ("time", "N", "I-NP"),
                ("jogou", "V", "B-VP"),
                ("muito", "ADV", "B-ADVP"),
                ("bem", "ADV", "I-ADVP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "A floresta amazônica é importante.",
            domain: "meio ambiente",
            annotations: &[
                ("A", "ART", "B-NP"),
                ("floresta", "N", "I-NP"),
                ("amazônica", "ADJ", "I-NP"),
                ("é", "V", "B-VP"),
                ("importante", "ADJ", "B-ADJP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Cientistas brasileiros desenvolveram uma vacina contra a dengue.",
            domain: "ciência",
            annotations: &[
                ("Cientistas", "N", "B-NP"),
                ("brasileiros", "ADJ", "I-NP"),
                ("desenvolveram", "V", "B-VP"),
                ("uma", "ART", "B-NP"),
                ("vacina", "N", "I-NP"),
                ("contra", "PREP", "B-PP"),
                ("a", "ART", "B-NP"),
                ("dengue", "N", "I-NP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "O rio Tietê atravessa a cidade de São Paulo.",
            domain: "geografia",
            annotations: &[
                ("O", "ART", "B-NP"),
                ("rio", "N", "I-NP"),
                ("Tietê", "NPROP", "I-NP"),
                ("atravessa", "V", "B-VP"),
                ("a", "ART", "B-NP"),
                ("cidade", "N", "I-NP"),
                ("de", "PREP", "B-PP"),
                ("São", "NPROP", "B-NP"),
                ("Paulo", "NPROP", "I-NP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Eles foram recebidos calorosamente em Brasília.",
            domain: "política",
            annotations: &[
                ("Eles", "PRON", "B-NP"),
                ("foram", "V", "B-VP"),
                ("recebidos", "PCP", "I-VP"),
                ("calorosamente", "ADV", "B-ADVP"),
                ("em", "PREP", "B-PP"),
                ("Brasília", "NPROP", "B-NP"),
                (".", "PONT", "O"),
            ],
        },
        AnnotatedSentence {
            text: "A inflação caiu e o mercado reagiu bem.",
            domain: "economia",
            annotations: &[
                ("A", "ART", "B-NP"),
                ("inflação", "N", "I-NP"),
                ("caiu", "V", "B-VP"),
                ("e", "KC", "O"),
                ("o", "ART", "B-NP"),
                ("mercado", "N", "I-NP"),
                ("reagiu", "V", "B-VP"),
                ("bem", "ADV", "B-ADVP"),
                (".", "PONT", "O"),
            ],
        },
    ]
}

/// Constrói os [`Token`]s de uma sentença anotada, localizando cada palavra
/// no texto original para preencher os offsets de byte.
pub fn sentence_tokens(sentence: &AnnotatedSentence) -> Vec<Token> {
    let mut cursor = 0usize;
    sentence
        .annotations
        .iter()
        .enumerate()
        .map(|(i, (word, pos, _))| {
            let start = sentence.text[cursor..]
                .find(word)
                .map(|p| cursor + p)
                .unwrap_or(cursor);
            let end = start + word.len();
            cursor = end;
            Token::new(*word, *pos, start, end, i)
        })
        .collect()
}

/// Tags BIO de referência (gold) de uma sentença anotada
pub fn gold_tags(sentence: &AnnotatedSentence) -> Vec<Tag> {
    sentence
        .annotations
        .iter()
        .map(|(_, _, chunk)| Tag::from_label(chunk).unwrap_or(Tag::Outside))
        .collect()
}

/// Textos de demonstração para a interface web: (domínio, texto)
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    get_corpus().iter().map(|s| (s.domain, s.text)).collect()
}
