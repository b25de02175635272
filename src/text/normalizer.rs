// Text normalizer: raw sample -> stemmed unigram/bigram/trigram sequences.
//
// Pipeline per sample:
//   1. lowercase the whole sample, then split it into sentences
//   2. per sentence: word tokens, drop stopwords / punctuation / quote
//      artifacts, Porter-stem the survivors
//   3. unigrams = all stems in document order
//   4. bigrams and trigrams are formed inside each sentence only

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

use super::{stemmer, tokenizer};
use crate::ngrams::table::Arity;

/// ASCII punctuation, one token per character.
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Tokenizer artifacts that carry no lexical content.
const ARTIFACTS: [&str; 9] = ["'s", "``", "\u{2019}", "''", "--", "\u{2014}", "\u{2013}", "\u{201c}", "\u{201d}"];

/// The three n-gram sequences derived from one text sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTokens {
    pub unigrams: Vec<String>,
    pub bigrams: Vec<String>,
    pub trigrams: Vec<String>,
}

impl NormalizedTokens {
    pub fn get(&self, arity: Arity) -> &[String] {
        match arity {
            Arity::Unigram => &self.unigrams,
            Arity::Bigram => &self.bigrams,
            Arity::Trigram => &self.trigrams,
        }
    }

    /// Unigrams joined by single spaces, the document form fed to TF-IDF.
    pub fn joined_unigrams(&self) -> String {
        self.unigrams.join(" ")
    }
}

/// English normalizer. Build once and reuse; it holds the stop set.
pub struct Normalizer {
    stops: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Normalizer {
    /// English stopwords plus punctuation and quote artifacts.
    pub fn english() -> Self {
        let mut stops: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stops.extend(PUNCTUATION.chars().map(String::from));
        stops.extend(ARTIFACTS.iter().map(|s| s.to_string()));

        Self { stops }
    }

    pub fn is_stop(&self, token: &str) -> bool {
        self.stops.contains(token)
    }

    /// Normalize one raw text sample.
    pub fn normalize(&self, text: &str) -> NormalizedTokens {
        let mut out = NormalizedTokens::default();
        let lowered = text.to_lowercase();

        for sentence in tokenizer::sentences(&lowered) {
            let stems: Vec<String> = tokenizer::word_tokens(sentence)
                .into_iter()
                .filter(|token| !self.is_stop(token))
                .map(|token| stemmer::stem(&token))
                .collect();

            out.bigrams.extend(stems.windows(2).map(|w| w.join(" ")));
            out.trigrams.extend(stems.windows(3).map(|w| w.join(" ")));
            out.unigrams.extend(stems);
        }

        out
    }

    /// Normalized keywords of a topic name, used to exclude the topic's own
    /// vocabulary from its statistics.
    pub fn keywords(&self, topic: &str) -> Vec<String> {
        self.normalize(topic).unigrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems_and_drops_stopwords() {
        let n = Normalizer::english();
        let tokens = n.normalize("Cats are great pets.");
        assert_eq!(tokens.unigrams, vec!["cat", "great", "pet"]);
        assert_eq!(tokens.bigrams, vec!["cat great", "great pet"]);
        assert_eq!(tokens.trigrams, vec!["cat great pet"]);
    }

    #[test]
    fn test_ngrams_do_not_cross_sentences() {
        let n = Normalizer::english();
        let tokens = n.normalize("Dogs bark loudly. Birds sing.");
        assert_eq!(tokens.unigrams, vec!["dog", "bark", "loudli", "bird", "sing"]);
        assert!(!tokens.bigrams.contains(&"loudli bird".to_string()));
        assert_eq!(tokens.bigrams, vec!["dog bark", "bark loudli", "bird sing"]);
        assert_eq!(tokens.trigrams, vec!["dog bark loudli"]);
    }

    #[test]
    fn test_lowercase_sentence_start_is_a_boundary() {
        let n = Normalizer::english();
        let tokens = n.normalize("the dog ran. the cat sat.");
        assert_eq!(tokens.unigrams, vec!["dog", "ran", "cat", "sat"]);
        assert_eq!(tokens.bigrams, vec!["dog ran", "cat sat"]);
    }

    #[test]
    fn test_empty_text_yields_empty_sequences() {
        let n = Normalizer::english();
        assert_eq!(n.normalize(""), NormalizedTokens::default());
        assert_eq!(n.normalize("   "), NormalizedTokens::default());
    }

    #[test]
    fn test_quote_artifacts_removed() {
        let n = Normalizer::english();
        let tokens = n.normalize("\u{201c}Peace\u{201d} \u{2014} the president's plan.");
        assert_eq!(tokens.unigrams, vec!["peac", "presid", "plan"]);
    }

    #[test]
    fn test_keywords_are_normalized() {
        let n = Normalizer::english();
        assert_eq!(n.keywords("Donald Trump"), vec!["donald", "trump"]);
        assert_eq!(n.keywords("The Elections"), vec!["elect"]);
    }

    #[test]
    fn test_joined_unigrams() {
        let n = Normalizer::english();
        assert_eq!(n.normalize("Cats are great pets.").joined_unigrams(), "cat great pet");
    }
}
