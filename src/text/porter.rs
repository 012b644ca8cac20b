// Porter stemmer in the NLTK-extensions variant.
//
// The exported vocabulary was stemmed with this variant, so it has to be
// reproduced exactly: the irregular-form table, the short-word cutoff, and
// the extra 1a/1b/1c/2 rules all differ from both the 1980 paper and
// Snowball English. Input is expected to be lowercase ASCII, which is all
// TextNormalizer ever produces.

/// Stateless Porter stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    pub fn stem(&self, word: &str) -> String {
        if let Some(base) = irregular_form(word) {
            return base.to_string();
        }
        // One- and two-letter words are left alone.
        if word.len() <= 2 {
            return word.to_string();
        }

        let word = step1a(word);
        let word = step1b(&word);
        let word = step1c(&word);
        let word = step2(&word);
        let word = step3(&word);
        let word = step4(&word);
        let word = step5a(&word);
        step5b(&word)
    }
}

fn irregular_form(word: &str) -> Option<&'static str> {
    let base = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "innings" | "inning" => "inning",
        "outings" | "outing" => "outing",
        "cannings" | "canning" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(base)
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-run → consonant-run transitions ("m" in the paper).
fn measure(stem: &str) -> usize {
    let w = stem.as_bytes();
    (1..w.len())
        .filter(|&i| !is_consonant(w, i - 1) && is_consonant(w, i))
        .count()
}

fn contains_vowel(stem: &str) -> bool {
    let w = stem.as_bytes();
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let w = word.as_bytes();
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant ending, last letter not w/x/y. A bare
/// vowel-consonant pair also counts.
fn ends_cvc(word: &str) -> bool {
    let w = word.as_bytes();
    let n = w.len();
    (n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y'))
        || (n == 2 && !is_consonant(w, 0) && is_consonant(w, 1))
}

/// The first rule whose suffix matches decides the outcome: its
/// replacement is applied if `condition(suffix, stem)` holds, otherwise
/// the word comes back unchanged and no later rule is tried.
fn apply_rules(
    word: &str,
    rules: &[(&str, &str)],
    condition: impl Fn(&str, &str) -> bool,
) -> String {
    for &(suffix, replacement) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            return if condition(suffix, stem) {
                format!("{stem}{replacement}")
            } else {
                word.to_string()
            };
        }
    }
    word.to_string()
}

fn step1a(word: &str) -> String {
    if word.len() == 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}ie");
        }
    }
    apply_rules(
        word,
        &[("sses", "ss"), ("ies", "i"), ("ss", "ss"), ("s", "")],
        |_, _| true,
    )
}

fn step1b(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return if word.len() == 4 {
            format!("{stem}ie")
        } else {
            format!("{stem}i")
        };
    }

    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{stem}ee")
        } else {
            word.to_string()
        };
    }

    let Some(stem) = ["ed", "ing"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
        .filter(|stem| contains_vowel(stem))
    else {
        return word.to_string();
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = stem.strip_suffix(suffix) {
            return format!("{base}{replacement}");
        }
    }

    if ends_double_consonant(stem) {
        return if stem.ends_with(['l', 's', 'z']) {
            stem.to_string()
        } else {
            stem[..stem.len() - 1].to_string()
        };
    }

    if measure(stem) == 1 && ends_cvc(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn step1c(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1) {
            return format!("{stem}i");
        }
    }
    word.to_string()
}

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("fulli", "ful"),
    ("logi", "log"),
];

fn step2(word: &str) -> String {
    // alli → al runs first and feeds its result back through step 2
    if let Some(stem) = word.strip_suffix("alli") {
        if measure(stem) > 0 {
            return step2(&format!("{stem}al"));
        }
    }

    apply_rules(word, STEP2_RULES, |suffix, stem| {
        if suffix == "logi" {
            // the "l" stays with the stem, so "geologi" still qualifies
            measure(&format!("{stem}l")) > 0
        } else {
            measure(stem) > 0
        }
    })
}

fn step3(word: &str) -> String {
    apply_rules(
        word,
        &[
            ("icate", "ic"),
            ("ative", ""),
            ("alize", "al"),
            ("iciti", "ic"),
            ("ical", "ic"),
            ("ful", ""),
            ("ness", ""),
        ],
        |_, stem| measure(stem) > 0,
    )
}

fn step4(word: &str) -> String {
    apply_rules(
        word,
        &[
            ("al", ""),
            ("ance", ""),
            ("ence", ""),
            ("er", ""),
            ("ic", ""),
            ("able", ""),
            ("ible", ""),
            ("ant", ""),
            ("ement", ""),
            ("ment", ""),
            ("ent", ""),
            ("ion", ""),
            ("ou", ""),
            ("ism", ""),
            ("ate", ""),
            ("iti", ""),
            ("ous", ""),
            ("ive", ""),
            ("ize", ""),
        ],
        |suffix, stem| {
            measure(stem) > 1 && (suffix != "ion" || stem.ends_with(['s', 't']))
        },
    )
}

fn step5a(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn step5b(word: &str) -> String {
    if word.ends_with("ll") && measure(&word[..word.len() - 1]) > 1 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
