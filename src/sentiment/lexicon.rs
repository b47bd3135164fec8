//! Sentiment lexicon for message polarity scoring.
//!
//! Word-level lexicon mapping terms to scores in `[-1, 1]`, with negation
//! flipping and intensity modifiers over a short preceding-token window.
//! Matching is case-insensitive.

use rustc_hash::FxHashMap;

/// How many preceding tokens are inspected for negators and intensity
/// modifiers.
const CONTEXT_WINDOW: usize = 2;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nor", "neither", "without", "hardly", "cannot", "cant", "dont", "don",
    "doesnt", "doesn", "didnt", "didn", "isnt", "isn", "wasnt", "wasn", "arent", "aren", "wont",
    "couldnt", "couldn", "shouldnt", "shouldn", "wouldnt", "wouldn",
];

const AMPLIFIERS: &[&str] = &[
    "very", "extremely", "really", "highly", "truly", "deeply", "seriously", "absolutely",
];

const DIMINISHERS: &[&str] = &["slightly", "somewhat", "barely", "marginally", "mildly", "fairly"];

/// A sentiment lexicon for analyzing text polarity.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    words: FxHashMap<String, f64>,
}

impl SentimentLexicon {
    /// Create a new empty sentiment lexicon.
    pub fn new() -> Self {
        Self {
            words: FxHashMap::default(),
        }
    }

    /// Add a positive sentiment word; intensity is clamped to `[0, 1]`.
    pub fn add_positive(&mut self, word: &str, intensity: f64) {
        self.words
            .insert(word.to_lowercase(), intensity.clamp(0.0, 1.0));
    }

    /// Add a negative sentiment word; intensity is clamped to `[0, 1]` and
    /// stored as a negative score.
    pub fn add_negative(&mut self, word: &str, intensity: f64) {
        self.words
            .insert(word.to_lowercase(), -intensity.clamp(0.0, 1.0));
    }

    /// Sentiment value for a word, `None` when it is not in the lexicon.
    pub fn get_sentiment(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Polarity of a text in `[-1, 1]`; 0 when nothing matches.
    ///
    /// Matched word scores are averaged over the matched count. A negator
    /// within the context window flips a match's sign; amplifiers and
    /// diminishers scale its magnitude.
    pub fn polarity(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let mut sum = 0.0;
        let mut matched = 0u64;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&score) = self.words.get(token) else {
                continue;
            };

            let window_start = i.saturating_sub(CONTEXT_WINDOW);
            let context = &tokens[window_start..i];

            let mut value = score;
            if context.iter().any(|t| NEGATORS.contains(&t.as_str())) {
                value = -value;
            }
            if context.iter().any(|t| AMPLIFIERS.contains(&t.as_str())) {
                value *= 1.5;
            } else if context.iter().any(|t| DIMINISHERS.contains(&t.as_str())) {
                value *= 0.5;
            }

            sum += value.clamp(-1.0, 1.0);
            matched += 1;
        }

        if matched == 0 {
            return 0.0;
        }
        (sum / matched as f64).clamp(-1.0, 1.0)
    }
}

impl Default for SentimentLexicon {
    /// Lexicon tuned for workplace correspondence.
    fn default() -> Self {
        let mut lexicon = Self::new();

        // Strongly positive (0.9)
        for word in [
            "excellent",
            "outstanding",
            "fantastic",
            "wonderful",
            "superb",
            "exceptional",
            "terrific",
            "perfect",
            "brilliant",
        ] {
            lexicon.add_positive(word, 0.9);
        }

        // Moderately positive (0.6)
        for word in [
            "good",
            "great",
            "thanks",
            "thank",
            "appreciate",
            "appreciated",
            "pleased",
            "happy",
            "glad",
            "helpful",
            "congratulations",
            "congrats",
            "success",
            "successful",
            "excited",
            "impressive",
            "valuable",
            "enjoyed",
            "win",
        ] {
            lexicon.add_positive(word, 0.6);
        }

        // Mildly positive (0.3)
        for word in [
            "fine",
            "okay",
            "agreed",
            "agree",
            "confirm",
            "confirmed",
            "hope",
            "hopeful",
            "interesting",
            "useful",
            "positive",
            "favorable",
            "promising",
            "reasonable",
        ] {
            lexicon.add_positive(word, 0.3);
        }

        // Strongly negative (0.9)
        for word in [
            "terrible",
            "awful",
            "horrible",
            "disaster",
            "disastrous",
            "catastrophic",
            "unacceptable",
            "outraged",
            "furious",
            "lawsuit",
            "fraud",
        ] {
            lexicon.add_negative(word, 0.9);
        }

        // Moderately negative (0.6)
        for word in [
            "bad",
            "problem",
            "problems",
            "issue",
            "issues",
            "fail",
            "failed",
            "failure",
            "wrong",
            "concern",
            "concerns",
            "concerned",
            "angry",
            "upset",
            "frustrated",
            "frustrating",
            "complaint",
            "dispute",
            "error",
            "errors",
            "risk",
            "urgent",
        ] {
            lexicon.add_negative(word, 0.6);
        }

        // Mildly negative (0.3)
        for word in [
            "unfortunately",
            "delay",
            "delayed",
            "difficult",
            "confusion",
            "confused",
            "unclear",
            "worry",
            "worried",
            "missing",
            "late",
            "sorry",
            "doubt",
            "mediocre",
            "lacking",
            "insufficient",
        ] {
            lexicon.add_negative(word, 0.3);
        }

        lexicon
    }
}
