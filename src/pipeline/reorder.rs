//! Topic reordering by corpus mass.
//!
//! A topic's mass is the number of tokens the model attributes to it:
//! `Σ_d doc_topic[d, t] · doc_length[d]`. With sorting enabled the topics
//! are permuted by descending share of that mass, and every topic-indexed
//! structure downstream uses the permuted positions.

/// Topics after the permutation, plus the permutation itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicOrdering {
    /// `order[p]` is the input index of the topic now at position `p`.
    pub order: Vec<usize>,
    /// Token mass per topic, in permuted order.
    pub mass: Vec<f64>,
    /// Share of total mass per topic, in permuted order.
    pub proportion: Vec<f64>,
    /// Topic-term rows, in permuted order.
    pub topic_term: Vec<Vec<f64>>,
}

impl TopicOrdering {
    /// Number of topics.
    pub fn n_topics(&self) -> usize {
        self.order.len()
    }

    /// Client-facing number of the topic at internal position `position`.
    ///
    /// [`crate::prepare_model`] rejects a `start_index` that would overflow.
    pub fn client_topic(position: usize, start_index: usize) -> usize {
        position + start_index
    }

    /// Input topic numbers in permuted order, shifted by `start_index`.
    pub fn client_order(&self, start_index: usize) -> Vec<usize> {
        self.order.iter().map(|&t| t + start_index).collect()
    }
}

/// Weighted column sums of the doc-topic matrix.
pub fn topic_mass(doc_topic: &[Vec<f64>], doc_lengths: &[f64], n_topics: usize) -> Vec<f64> {
    let mut mass = vec![0.0; n_topics];
    for (row, &len) in doc_topic.iter().zip(doc_lengths) {
        for (m, &p) in mass.iter_mut().zip(row) {
            *m += p * len;
        }
    }
    mass
}

/// Compute topic mass and proportion and permute the topic-term rows.
///
/// Sorting is stable: topics with exactly equal mass keep their
/// input order, so repeated runs on the same input agree.
pub fn reorder_topics(
    topic_term: &[Vec<f64>],
    doc_topic: &[Vec<f64>],
    doc_lengths: &[f64],
    sort_topics: bool,
) -> TopicOrdering {
    let n_topics = topic_term.len();
    let mass = topic_mass(doc_topic, doc_lengths, n_topics);

    let mut order: Vec<usize> = (0..n_topics).collect();
    if sort_topics {
        order.sort_by(|&a, &b| mass[b].total_cmp(&mass[a]));
    }

    // Summed in display order so a permuted input gives bit-identical shares.
    let mass: Vec<f64> = order.iter().map(|&t| mass[t]).collect();
    let total: f64 = mass.iter().sum();

    TopicOrdering {
        proportion: mass.iter().map(|m| m / total).collect(),
        mass,
        topic_term: order.iter().map(|&t| topic_term[t].clone()).collect(),
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_term() -> Vec<Vec<f64>> {
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]]
    }

    fn doc_topic() -> Vec<Vec<f64>> {
        vec![vec![0.2, 0.7, 0.1], vec![0.1, 0.3, 0.6]]
    }

    #[test]
    fn test_topic_mass_weighted_by_length() {
        let mass = topic_mass(&doc_topic(), &[10.0, 20.0], 3);
        assert!((mass[0] - 4.0).abs() < 1e-12);
        assert!((mass[1] - 13.0).abs() < 1e-12);
        assert!((mass[2] - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_by_descending_proportion() {
        let ordering = reorder_topics(&topic_term(), &doc_topic(), &[10.0, 20.0], true);
        // Topics 1 and 2 tie at 13 tokens; the stable sort keeps 1 before 2.
        assert_eq!(ordering.order, vec![1, 2, 0]);
        assert_eq!(ordering.topic_term[0], vec![0.0, 1.0]);
        let sum: f64 = ordering.proportion.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(ordering.proportion[0] >= ordering.proportion[2]);
        assert_eq!(ordering.client_order(1), vec![2, 3, 1]);
    }

    #[test]
    fn test_identity_when_unsorted() {
        let ordering = reorder_topics(&topic_term(), &doc_topic(), &[10.0, 20.0], false);
        assert_eq!(ordering.order, vec![0, 1, 2]);
        assert_eq!(ordering.topic_term, topic_term());
        assert_eq!(ordering.client_order(0), vec![0, 1, 2]);
    }

    #[test]
    fn test_tie_order_is_repeatable() {
        let tt = vec![vec![1.0], vec![1.0], vec![1.0]];
        let dt = vec![vec![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]];
        let first = reorder_topics(&tt, &dt, &[9.0], true);
        let second = reorder_topics(&tt, &dt, &[9.0], true);
        assert_eq!(first, second);
        assert_eq!(first.order, vec![0, 1, 2]);
    }

    #[test]
    fn test_client_topic_numbering() {
        assert_eq!(TopicOrdering::client_topic(0, 1), 1);
        assert_eq!(TopicOrdering::client_topic(4, 0), 4);
    }
}
