// Porter suffix-stripping stemmer (1980), with the NLTK extensions:
//   - a small table of irregular forms ("dying" -> "die", "skies" -> "sky")
//   - words of one or two letters come back unchanged
//   - four-letter "ies"/"ied" words keep their "e" ("ties" -> "tie")
//   - final "y" becomes "i" only after a consonant that is not the first letter
//   - step 2 also rewrites "fulli" and "logi", and handles "alli" first
//
// Words are processed as char slices. Vowels are a, e, i, o, u, plus "y"
// when it follows a consonant.

/// Irregular forms mapped straight to their stem.
const IRREGULAR: [(&str, &str); 16] = [
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

type Condition = fn(&[char]) -> bool;

/// Replace `suffix` with `replacement` when `condition` holds for the stem
/// left after removing the suffix.
struct Rule {
    suffix: &'static str,
    replacement: &'static str,
    condition: Condition,
}

const fn rule(suffix: &'static str, replacement: &'static str, condition: Condition) -> Rule {
    Rule {
        suffix,
        replacement,
        condition,
    }
}

const STEP1A: [Rule; 4] = [
    rule("sses", "ss", always),
    rule("ies", "i", always),
    rule("ss", "ss", always),
    rule("s", "", always),
];

const STEP2: [Rule; 21] = [
    rule("ational", "ate", positive_measure),
    rule("tional", "tion", positive_measure),
    rule("enci", "ence", positive_measure),
    rule("anci", "ance", positive_measure),
    rule("izer", "ize", positive_measure),
    rule("bli", "ble", positive_measure),
    rule("alli", "al", positive_measure),
    rule("entli", "ent", positive_measure),
    rule("eli", "e", positive_measure),
    rule("ousli", "ous", positive_measure),
    rule("ization", "ize", positive_measure),
    rule("ation", "ate", positive_measure),
    rule("ator", "ate", positive_measure),
    rule("alism", "al", positive_measure),
    rule("iveness", "ive", positive_measure),
    rule("fulness", "ful", positive_measure),
    rule("ousness", "ous", positive_measure),
    rule("aliti", "al", positive_measure),
    rule("iviti", "ive", positive_measure),
    rule("biliti", "ble", positive_measure),
    rule("fulli", "ful", positive_measure),
];

const STEP3: [Rule; 7] = [
    rule("icate", "ic", positive_measure),
    rule("ative", "", positive_measure),
    rule("alize", "al", positive_measure),
    rule("iciti", "ic", positive_measure),
    rule("ical", "ic", positive_measure),
    rule("ful", "", positive_measure),
    rule("ness", "", positive_measure),
];

const STEP4: [Rule; 19] = [
    rule("al", "", measure_above_one),
    rule("ance", "", measure_above_one),
    rule("ence", "", measure_above_one),
    rule("er", "", measure_above_one),
    rule("ic", "", measure_above_one),
    rule("able", "", measure_above_one),
    rule("ible", "", measure_above_one),
    rule("ant", "", measure_above_one),
    rule("ement", "", measure_above_one),
    rule("ment", "", measure_above_one),
    rule("ent", "", measure_above_one),
    rule("ion", "", ion_stem),
    rule("ou", "", measure_above_one),
    rule("ism", "", measure_above_one),
    rule("ate", "", measure_above_one),
    rule("iti", "", measure_above_one),
    rule("ous", "", measure_above_one),
    rule("ive", "", measure_above_one),
    rule("ize", "", measure_above_one),
];

/// Stem one word. The word is lowercased first.
pub fn stem(word: &str) -> String {
    let lowered = word.to_lowercase();
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == lowered) {
        return (*base).to_string();
    }

    let chars: Vec<char> = lowered.chars().collect();
    if chars.len() <= 2 {
        return lowered;
    }

    let chars = step1a(chars);
    let chars = step1b(chars);
    let chars = step1c(chars);
    let chars = step2(chars);
    let chars = apply_rules(chars, &STEP3);
    let chars = apply_rules(chars, &STEP4);
    let chars = step5a(chars);
    let chars = step5b(chars);
    chars.into_iter().collect()
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 && ends_with(&word, "ies") {
        return replace_suffix(&word, "ies", "ie");
    }
    apply_rules(word, &STEP1A)
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return replace_suffix(&word, "ied", replacement);
    }

    if ends_with(&word, "eed") {
        return if measure(strip(&word, "eed")) > 0 {
            replace_suffix(&word, "eed", "ee")
        } else {
            word
        };
    }

    let Some(stem) = ["ed", "ing"]
        .into_iter()
        .find(|suffix| ends_with(&word, suffix))
        .map(|suffix| strip(&word, suffix))
        .filter(|stem| contains_vowel(stem))
    else {
        return word;
    };

    let mut stem = stem.to_vec();
    if ["at", "bl", "iz"].iter().any(|suffix| ends_with(&stem, suffix)) {
        stem.push('e');
    } else if ends_double_consonant(&stem) {
        if !matches!(stem.last(), Some(&('l' | 's' | 'z'))) {
            stem.pop();
        }
    } else if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }
    stem
}

fn step1c(mut word: Vec<char>) -> Vec<char> {
    let n = word.len();
    if word.last() == Some(&'y') && n > 2 && is_consonant(&word, n - 2) {
        word[n - 1] = 'i';
    }
    word
}

fn step2(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "alli") && positive_measure(strip(&word, "alli")) {
        return step2(replace_suffix(&word, "alli", "al"));
    }
    // The "l" of "logi" stays with the stem when measuring, so "geologi"
    // and "theologi" reduce like "archaeologi".
    if ends_with(&word, "logi") {
        return if positive_measure(&word[..word.len() - 3]) {
            replace_suffix(&word, "logi", "log")
        } else {
            word
        };
    }
    apply_rules(word, &STEP2)
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "e") {
        let stem = strip(&word, "e");
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    word
}

fn step5b(mut word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ll") && measure(&word[..word.len() - 1]) > 1 {
        word.pop();
    }
    word
}

/// The first rule whose suffix matches decides; when its condition fails
/// the word is returned unchanged.
fn apply_rules(word: Vec<char>, rules: &[Rule]) -> Vec<char> {
    match rules.iter().find(|r| ends_with(&word, r.suffix)) {
        Some(r) if (r.condition)(strip(&word, r.suffix)) => {
            replace_suffix(&word, r.suffix, r.replacement)
        }
        _ => word,
    }
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    let n = suffix.chars().count();
    word.len() >= n && word[word.len() - n..].iter().copied().eq(suffix.chars())
}

/// `word` without `suffix`. Callers check `ends_with` first.
fn strip<'a>(word: &'a [char], suffix: &str) -> &'a [char] {
    &word[..word.len() - suffix.chars().count()]
}

fn replace_suffix(word: &[char], suffix: &str, replacement: &str) -> Vec<char> {
    let mut out = strip(word, suffix).to_vec();
    out.extend(replacement.chars());
    out
}

fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-to-consonant transitions, the "m" of [C](VC)^m[V].
fn measure(word: &[char]) -> usize {
    let mut m = 0;
    let mut after_vowel = false;
    for i in 0..word.len() {
        let consonant = is_consonant(word, i);
        if consonant && after_vowel {
            m += 1;
        }
        after_vowel = !consonant;
    }
    m
}

fn contains_vowel(word: &[char]) -> bool {
    (0..word.len()).any(|i| !is_consonant(word, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant-vowel-consonant ending where the last consonant is not w, x or y.
/// A two-letter vowel-consonant word also counts.
fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    if n == 2 {
        return !is_consonant(word, 0) && is_consonant(word, 1);
    }
    n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], 'w' | 'x' | 'y')
}

fn always(_: &[char]) -> bool {
    true
}

fn positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn ion_stem(stem: &[char]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some(&('s' | 't')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_stems(cases: &[(&str, &str)]) {
        for (word, expected) in cases {
            assert_eq!(stem(word), *expected, "stem({word:?})");
        }
    }

    #[test]
    fn test_plurals_and_participles() {
        assert_stems(&[
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("ties", "tie"),
            ("cats", "cat"),
            ("agreed", "agre"),
            ("feed", "feed"),
            ("plastered", "plaster"),
            ("motoring", "motor"),
            ("sing", "sing"),
            ("conflated", "conflat"),
            ("hopping", "hop"),
            ("falling", "fall"),
            ("hissing", "hiss"),
            ("filing", "file"),
            ("running", "run"),
            ("rising", "rise"),
        ]);
    }

    #[test]
    fn test_adverbs_keep_porter_stems() {
        assert_stems(&[
            ("fairly", "fairli"),
            ("generously", "gener"),
            ("loudly", "loudli"),
            ("happy", "happi"),
        ]);
    }

    #[test]
    fn test_derivational_suffixes() {
        assert_stems(&[
            ("relational", "relat"),
            ("hopeful", "hope"),
            ("goodness", "good"),
            ("adjustable", "adjust"),
            ("elections", "elect"),
            ("president", "presid"),
            ("negotiate", "negoti"),
            ("inflation", "inflat"),
            ("coastal", "coastal"),
        ]);
    }

    #[test]
    fn test_irregular_and_short_words() {
        assert_stems(&[
            ("dying", "die"),
            ("skies", "sky"),
            ("news", "news"),
            ("is", "is"),
            ("a", "a"),
        ]);
    }

    #[test]
    fn test_non_alphabetic_tokens_pass_through() {
        assert_stems(&[("covid-19", "covid-19"), ("2024", "2024")]);
    }

    #[test]
    fn test_uppercase_is_folded() {
        assert_eq!(stem("Running"), "run");
    }
}
