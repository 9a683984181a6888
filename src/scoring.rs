use serde::{Deserialize, Serialize};

/// Derive a bounded confidence score from extraction volume.
///
/// Breadth of extracted fields and breadth of productive queries are
/// capped at 1.0 independently, then averaged and rounded to two decimals.
/// Every field counts equally; there is no per-field weighting.
pub fn confidence_score(fields_found: usize, queries_with_results: usize) -> f64 {
    let data_score = (fields_found as f64 * 0.2).min(1.0);
    let search_score = (queries_with_results as f64 * 0.1).min(1.0);

    round2((data_score + search_score) / 2.0)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ordinal quality buckets over the overall score. Boundaries are
/// inclusive on the lower bound of each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Excellent,
    Good,
    Sufficient,
    Limited,
}

impl QualityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            QualityLabel::Excellent
        } else if score >= 0.6 {
            QualityLabel::Good
        } else if score >= 0.4 {
            QualityLabel::Sufficient
        } else {
            QualityLabel::Limited
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Good => "Good",
            QualityLabel::Sufficient => "Sufficient",
            QualityLabel::Limited => "Limited",
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_formula() {
        // 3 fields -> 0.6 data, 4 productive queries -> 0.4 search.
        assert_eq!(confidence_score(3, 4), 0.5);
        // 2 fields, 2 productive queries (Ferrero scenario shape).
        assert_eq!(confidence_score(2, 2), 0.3);
    }

    #[test]
    fn test_sub_scores_cap_independently() {
        // 10 fields saturate data_score at 1.0 before averaging.
        assert_eq!(confidence_score(10, 0), 0.5);
        // 30 productive queries saturate search_score at 1.0.
        assert_eq!(confidence_score(0, 30), 0.5);
        assert_eq!(confidence_score(50, 50), 1.0);
    }

    #[test]
    fn test_zero_everything_scores_zero() {
        assert_eq!(confidence_score(0, 0), 0.0);
    }

    #[test]
    fn test_monotone_in_fields_found() {
        let mut previous = 0.0;
        for fields in 0..12 {
            let score = confidence_score(fields, 3);
            assert!(score >= previous, "score regressed at {} fields", fields);
            previous = score;
        }
    }

    #[test]
    fn test_quality_buckets_lower_bound_inclusive() {
        assert_eq!(QualityLabel::from_score(1.0), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(0.8), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(0.79), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(0.6), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(0.59), QualityLabel::Sufficient);
        assert_eq!(QualityLabel::from_score(0.4), QualityLabel::Sufficient);
        assert_eq!(QualityLabel::from_score(0.39), QualityLabel::Limited);
        assert_eq!(QualityLabel::from_score(0.0), QualityLabel::Limited);
    }
}
