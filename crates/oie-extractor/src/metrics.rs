//! Quality Metrics module
//!
//! Evaluates extracted triplets against a gold standard (precision,
//! recall, F1) and compares the output of two extractors.

use std::collections::{BTreeMap, BTreeSet};

use oie_core::Triplet;
use serde::{Deserialize, Serialize};

use crate::ExtractionMethod;

// ============================================================================
// Triplet Metrics
// ============================================================================

/// Metrics for triplet extraction evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripletMetrics {
    /// Predicted triplets matched to a gold triplet
    pub true_positives: usize,
    /// Predicted triplets with no gold match
    pub false_positives: usize,
    /// Gold triplets never matched
    pub false_negatives: usize,
    /// Total triplets in gold standard
    pub gold_total: usize,
    /// Total triplets predicted
    pub predicted_total: usize,
}

impl TripletMetrics {
    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Accumulate another evaluation
    pub fn add(&mut self, other: &TripletMetrics) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.gold_total += other.gold_total;
        self.predicted_total += other.predicted_total;
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Evaluator for triplet extraction quality
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    /// Compare strings ignoring ASCII case
    ignore_case: bool,
}

impl Evaluator {
    /// Create a new evaluator (exact surface match)
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore case when comparing strings
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    fn triplets_match(&self, predicted: &Triplet, gold: &Triplet) -> bool {
        if self.ignore_case {
            predicted.subject.eq_ignore_ascii_case(&gold.subject)
                && predicted.relation.eq_ignore_ascii_case(&gold.relation)
                && predicted.object.eq_ignore_ascii_case(&gold.object)
        } else {
            predicted == gold
        }
    }

    /// Evaluate predictions against gold triplets.
    ///
    /// Each gold triplet can be matched once, so duplicated predictions
    /// beyond the gold multiplicity count as false positives.
    pub fn evaluate(&self, predicted: &[Triplet], gold: &[Triplet]) -> TripletMetrics {
        let mut matched_gold = vec![false; gold.len()];
        let mut true_positives = 0;

        for pred in predicted {
            let hit = gold
                .iter()
                .enumerate()
                .find(|(idx, g)| !matched_gold[*idx] && self.triplets_match(pred, g));
            if let Some((idx, _)) = hit {
                matched_gold[idx] = true;
                true_positives += 1;
            }
        }

        TripletMetrics {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: gold.len() - true_positives,
            gold_total: gold.len(),
            predicted_total: predicted.len(),
        }
    }
}

// ============================================================================
// Aggregate Metrics
// ============================================================================

/// Per-method metrics accumulated over several documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub by_method: BTreeMap<String, TripletMetrics>,
    pub num_documents: usize,
}

impl AggregateMetrics {
    /// Add one document's metrics for a method
    pub fn add(&mut self, method: ExtractionMethod, metrics: &TripletMetrics) {
        self.by_method
            .entry(method.as_str().to_string())
            .or_default()
            .add(metrics);
    }

    /// Print a summary report
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Extraction Quality Report ===\n\nDocuments evaluated: {}\n",
            self.num_documents
        );
        for (method, m) in &self.by_method {
            out.push_str(&format!(
                "\n{} triplets:\n  \
                 Precision: {:.1}%\n  \
                 Recall:    {:.1}%\n  \
                 F1 Score:  {:.1}%\n  \
                 Gold: {} | Predicted: {} | TP: {} | FP: {} | FN: {}\n",
                method,
                m.precision() * 100.0,
                m.recall() * 100.0,
                m.f1_score() * 100.0,
                m.gold_total,
                m.predicted_total,
                m.true_positives,
                m.false_positives,
                m.false_negatives,
            ));
        }
        out
    }
}

// ============================================================================
// Extractor Comparison
// ============================================================================

/// Overlap between the POS and dependency extractors (distinct triplets)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorComparison {
    pub shared: Vec<Triplet>,
    pub pos_only: Vec<Triplet>,
    pub dependency_only: Vec<Triplet>,
}

impl ExtractorComparison {
    pub fn compare(pos: &[Triplet], dependency: &[Triplet]) -> Self {
        let pos: BTreeSet<&Triplet> = pos.iter().collect();
        let dependency: BTreeSet<&Triplet> = dependency.iter().collect();

        Self {
            shared: pos.intersection(&dependency).map(|t| (*t).clone()).collect(),
            pos_only: pos.difference(&dependency).map(|t| (*t).clone()).collect(),
            dependency_only: dependency.difference(&pos).map(|t| (*t).clone()).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
