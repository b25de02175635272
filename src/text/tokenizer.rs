// Sentence and word segmentation for the normalizer.
//
// Sentences end at ".", "!" or "?" (plus any closing quotes or brackets)
// followed by whitespace. A single "." after an abbreviation or an initial
// does not end a sentence, and neither does an ellipsis. A line break alone
// is not a boundary. Text is expected lowercased, so the case of the next
// word plays no part.
//
// Words are built from UAX #29 word-boundary segments, then adjusted to
// Treebank conventions:
//   - punctuation marks are separate tokens
//   - hyphenated compounds stay whole ("covid-19", "jong-un")
//   - clitics split off the word they attach to ("cat's" -> "cat", "'s",
//     "don't" -> "do", "n't"), with curly apostrophes folded to "'"

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Suffixes split off into their own token.
const CLITICS: [&str; 7] = ["n't", "'s", "'m", "'d", "'ll", "'re", "'ve"];

/// Terminator run (group 1), closing quotes or brackets, then whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("([.!?]+)[\"')\\]\u{201d}\u{2019}]*\\s+").expect("valid sentence pattern")
});

/// Words that keep a following "." inside the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "inc", "ltd", "co",
    "corp", "dept", "gov", "sen", "rep", "gen", "col", "lt", "sgt", "capt", "jan", "feb", "apr",
    "aug", "sept", "oct", "nov", "dec", "approx",
];

/// Split text into sentences, trimmed. Segments without alphanumeric
/// content are skipped.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut start = 0;

    for caps in SENTENCE_END.captures_iter(text) {
        let (Some(whole), Some(marks)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !ends_sentence(&text[start..marks.start()], marks.as_str()) {
            continue;
        }
        push_sentence(&mut found, &text[start..whole.end()]);
        start = whole.end();
    }
    push_sentence(&mut found, &text[start..]);
    found
}

fn push_sentence<'a>(found: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if is_wordlike(segment) {
        found.push(segment);
    }
}

/// Whether `marks` closes the sentence whose text so far is `before`.
fn ends_sentence(before: &str, marks: &str) -> bool {
    if marks.len() > 1 && marks.chars().all(|c| c == '.') {
        return false;
    }
    if marks != "." {
        return true;
    }
    let last_word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    !is_abbreviation(last_word)
}

/// Known abbreviations, single-letter initials and dotted initialisms
/// ("u.s", "e.g").
fn is_abbreviation(word: &str) -> bool {
    let initials = word.split('.').all(|part| {
        let mut chars = part.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    });
    initials || ABBREVIATIONS.iter().any(|abbr| word.eq_ignore_ascii_case(abbr))
}

/// Split one sentence into word and punctuation tokens.
pub fn word_tokens(sentence: &str) -> Vec<String> {
    let segments: Vec<&str> = sentence.split_word_bounds().collect();
    let mut raw: Vec<String> = Vec::with_capacity(segments.len());

    // True when the last raw token is word-like and nothing separates it
    // from the current segment.
    let mut joined_to_word = false;
    // True when the last raw token ends in a hyphen waiting for its right half.
    let mut pending_hyphen = false;

    for (i, seg) in segments.iter().enumerate() {
        if seg.chars().all(char::is_whitespace) {
            joined_to_word = false;
            continue;
        }

        if pending_hyphen {
            if let Some(last) = raw.last_mut() {
                last.push_str(seg);
            }
            pending_hyphen = false;
            joined_to_word = true;
            continue;
        }

        let next_is_word = segments.get(i + 1).is_some_and(|next| is_wordlike(next));
        if *seg == "-" && joined_to_word && next_is_word {
            if let Some(last) = raw.last_mut() {
                last.push('-');
            }
            pending_hyphen = true;
            continue;
        }

        raw.push((*seg).to_string());
        joined_to_word = is_wordlike(seg);
    }

    let mut tokens = Vec::with_capacity(raw.len());
    for token in raw {
        split_clitic(token, &mut tokens);
    }
    tokens
}

fn is_wordlike(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

fn split_clitic(token: String, out: &mut Vec<String>) {
    if !is_wordlike(&token) {
        out.push(token);
        return;
    }

    let folded = token.replace('\u{2019}', "'");
    for clitic in CLITICS {
        if folded.len() > clitic.len() && folded.ends_with(clitic) {
            let head = &folded[..folded.len() - clitic.len()];
            if is_wordlike(head) {
                out.push(head.to_string());
                out.push(clitic.to_string());
                return;
            }
        }
    }
    out.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_separate() {
        assert_eq!(word_tokens("cats are great pets."), vec!["cats", "are", "great", "pets", "."]);
    }

    #[test]
    fn test_hyphenated_compound_kept_whole() {
        assert_eq!(word_tokens("the covid-19 wave"), vec!["the", "covid-19", "wave"]);
        assert_eq!(word_tokens("kim jong-un spoke"), vec!["kim", "jong-un", "spoke"]);
    }

    #[test]
    fn test_spaced_hyphen_is_punctuation() {
        assert_eq!(word_tokens("this - that"), vec!["this", "-", "that"]);
    }

    #[test]
    fn test_possessive_split() {
        assert_eq!(word_tokens("the cat's toy"), vec!["the", "cat", "'s", "toy"]);
        assert_eq!(word_tokens("the cat\u{2019}s toy"), vec!["the", "cat", "'s", "toy"]);
    }

    #[test]
    fn test_negation_split() {
        assert_eq!(word_tokens("i don't know"), vec!["i", "do", "n't", "know"]);
    }

    #[test]
    fn test_sentences_split() {
        assert_eq!(
            sentences("first one. second one! third?"),
            vec!["first one.", "second one!", "third?"]
        );
    }

    #[test]
    fn test_lowercase_and_digit_starts_split() {
        assert_eq!(sentences("the dog ran. the cat sat."), vec!["the dog ran.", "the cat sat."]);
        assert_eq!(sentences("the dog ran. 5 cats sat."), vec!["the dog ran.", "5 cats sat."]);
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        assert_eq!(
            sentences("he said \"stop.\" they left."),
            vec!["he said \"stop.\"", "they left."]
        );
    }

    #[test]
    fn test_abbreviations_and_initials_do_not_split() {
        assert_eq!(sentences("dr. smith arrived. we left."), vec!["dr. smith arrived.", "we left."]);
        assert_eq!(sentences("j. r. tolkien wrote it."), vec!["j. r. tolkien wrote it."]);
        assert_eq!(sentences("the u.s. economy grew."), vec!["the u.s. economy grew."]);
    }

    #[test]
    fn test_ellipsis_and_line_break_do_not_split() {
        assert_eq!(sentences("wait... what happened"), vec!["wait... what happened"]);
        assert_eq!(sentences("first line\nsecond line"), vec!["first line\nsecond line"]);
        assert_eq!(sentences("ends here.\nnext one"), vec!["ends here.", "next one"]);
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        assert_eq!(sentences("growth was 3.5 percent."), vec!["growth was 3.5 percent."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(word_tokens("").is_empty());
        assert!(sentences("").is_empty());
        assert!(sentences(" ... !? ").is_empty());
    }
}
