//! Approximate full-text matching over the weighted record fields.
//!
//! Every whitespace-separated query token must match at least one field
//! (AND across tokens, OR across fields). A field matches a token when the
//! smallest edit distance between the token and any substring of the field,
//! divided by the token length, is within the configured threshold. An exact
//! case-insensitive substring has distance zero and therefore always matches.

use crate::models::SearchRecord;
use crate::search::config::{FieldWeights, SearchConfig};

/// A matched record and its relevance (higher is better)
#[derive(Debug, Clone, Copy)]
pub struct MatchHit<'a> {
    pub record: &'a SearchRecord,
    pub score: f64,
}

/// Weighted fuzzy matcher
#[derive(Debug, Clone)]
pub struct Matcher {
    threshold: f64,
    weights: FieldWeights,
}

impl Matcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            threshold: config.threshold,
            weights: config.weights,
        }
    }

    /// Match `records` against `query`.
    ///
    /// An empty or whitespace-only query returns every record in input order
    /// with a zero score. Otherwise hits are ordered by relevance, ties keep
    /// input order.
    pub fn search<'a>(&self, records: &'a [SearchRecord], query: &str) -> Vec<MatchHit<'a>> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return records
                .iter()
                .map(|record| MatchHit { record, score: 0.0 })
                .collect();
        }

        let mut hits: Vec<MatchHit<'a>> = records
            .iter()
            .filter_map(|record| {
                self.score_tokens(record, &tokens)
                    .map(|score| MatchHit { record, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    /// Whether a single record satisfies every token of `query`
    pub fn matches(&self, record: &SearchRecord, query: &str) -> bool {
        let tokens = tokenize(query);
        tokens.is_empty() || self.score_tokens(record, &tokens).is_some()
    }

    fn score_tokens(&self, record: &SearchRecord, tokens: &[Vec<char>]) -> Option<f64> {
        let fields = self.weighted_fields(record);
        let mut total = 0.0;
        for token in tokens {
            total += self.score_token(&fields, token)?;
        }
        Some(total)
    }

    fn score_token(&self, fields: &[(f64, String)], token: &[char]) -> Option<f64> {
        let needle: String = token.iter().collect();

        fields
            .iter()
            .filter_map(|(weight, text)| {
                let distance = if text.contains(&needle) {
                    0
                } else {
                    let haystack: Vec<char> = text.chars().collect();
                    approximate_distance(token, &haystack)
                };
                let normalized = distance as f64 / token.len() as f64;
                (normalized <= self.threshold).then(|| weight * (1.0 - normalized))
            })
            .max_by(|a, b| a.total_cmp(b))
    }

    fn weighted_fields(&self, record: &SearchRecord) -> Vec<(f64, String)> {
        let mut fields = Vec::with_capacity(3 + record.tags.len());
        let mut push = |weight: f64, text: &str| {
            if weight > 0.0 && !text.is_empty() {
                fields.push((weight, normalize(text)));
            }
        };

        push(self.weights.title, &record.title);
        push(self.weights.author, &record.author_name);
        push(self.weights.circle, &record.circle_name);
        for tag in &record.tags {
            push(self.weights.tag, tag);
        }
        fields
    }
}

/// Lowercase and fold full-width ASCII (and the ideographic space) to half-width
pub fn normalize(text: &str) -> String {
    text.chars().flat_map(|c| fold_width(c).to_lowercase()).collect()
}

/// Split a query into normalized tokens
pub fn tokenize(query: &str) -> Vec<Vec<char>> {
    normalize(query)
        .split_whitespace()
        .map(|token| token.chars().collect())
        .collect()
}

fn fold_width(c: char) -> char {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{3000}' => ' ',
        _ => c,
    }
}

/// Minimum edit distance between `pattern` and any substring of `text`.
pub fn approximate_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    // prev[i]: cheapest alignment of pattern[..i] ending at the previous text position;
    // row 0 is always free so a match may start anywhere.
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut cur = vec![0usize; m + 1];
    let mut best = m;

    for &tc in text {
        cur[0] = 0;
        for i in 1..=m {
            let substitution = prev[i - 1] + usize::from(pattern[i - 1] != tc);
            cur[i] = substitution.min(prev[i] + 1).min(cur[i - 1] + 1);
        }
        best = best.min(cur[m]);
        if best == 0 {
            break;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}
