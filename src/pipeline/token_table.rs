//! Term-topic token table.
//!
//! When a term is hovered, the front end resizes every topic circle by the
//! share of that term's tokens the topic holds. This table carries those
//! shares for every term that can appear in any bar chart.

use super::term_stats::TermStatistics;
use super::reorder::TopicOrdering;
use crate::prepared::{TokenTableRow, TopicInfoRow};
use crate::types::TOKEN_TABLE_MIN_FREQ;

/// Build the token table for the terms attested in `topic_info`.
///
/// Pairs holding fewer than [`TOKEN_TABLE_MIN_FREQ`] tokens are dropped.
/// Surviving counts are rounded (half to even) and divided by the term's
/// total frequency, capped at 1. Rows are sorted by term text, then topic
/// number.
pub fn token_table(
    topic_info: &[TopicInfoRow],
    stats: &TermStatistics,
    vocab: &[String],
    start_index: usize,
) -> Vec<TokenTableRow> {
    let mut term_ids: Vec<usize> = topic_info.iter().map(|row| row.term_id).collect();
    term_ids.sort_unstable();
    term_ids.dedup();

    let mut rows = Vec::new();
    for &term in &term_ids {
        for (position, freqs) in stats.term_topic_freq.iter().enumerate() {
            let freq = freqs[term];
            if freq < TOKEN_TABLE_MIN_FREQ {
                continue;
            }
            rows.push(TokenTableRow {
                term: vocab[term].clone(),
                topic: TopicOrdering::client_topic(position, start_index),
                freq: (freq.round_ties_even() / stats.term_frequency[term]).min(1.0),
                term_id: term,
            });
        }
    }

    rows.sort_by(|a, b| a.term.cmp(&b.term).then(a.topic.cmp(&b.topic)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> TermStatistics {
        TermStatistics {
            term_topic_freq: vec![vec![9.6, 0.4, 2.5], vec![0.4, 3.6, 2.5]],
            term_frequency: vec![10.0, 4.0, 5.0],
            term_proportion: vec![10.0 / 19.0, 4.0 / 19.0, 5.0 / 19.0],
            saliency: vec![0.0; 3],
        }
    }

    fn vocab() -> Vec<String> {
        vec!["zeta".into(), "alpha".into(), "mid".into()]
    }

    fn row(term_id: usize) -> TopicInfoRow {
        TopicInfoRow {
            term: vocab()[term_id].clone(),
            freq: 1.0,
            total: 1.0,
            category: "Default".into(),
            logprob: 1.0,
            loglift: 1.0,
            term_id,
        }
    }

    #[test]
    fn test_threshold_rounding_and_order() {
        let info = vec![row(0), row(1), row(2), row(0)];
        let table = token_table(&info, &stats(), &vocab(), 1);
        let summary: Vec<(&str, usize, f64)> = table
            .iter()
            .map(|r| (r.term.as_str(), r.topic, r.freq))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("alpha", 2, 1.0),
                ("mid", 1, 0.4),
                ("mid", 2, 0.4),
                ("zeta", 1, 1.0),
            ]
        );
    }

    #[test]
    fn test_only_attested_terms() {
        let table = token_table(&[row(2)], &stats(), &vocab(), 0);
        assert!(table.iter().all(|r| r.term == "mid"));
        assert_eq!(table.iter().map(|r| r.topic).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_share_capped_for_fractional_totals() {
        let stats = TermStatistics {
            term_topic_freq: vec![vec![0.7], vec![0.0]],
            term_frequency: vec![0.7],
            term_proportion: vec![1.0],
            saliency: vec![0.0],
        };
        let table = token_table(&[row(0)], &stats, &vocab(), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].freq, 1.0);
    }

    #[test]
    fn test_frequencies_bounded() {
        let table = token_table(&[row(0), row(1), row(2)], &stats(), &vocab(), 1);
        assert!(table.iter().all(|r| r.freq > 0.0 && r.freq <= 1.0));
    }
}
