//! Filtering and auditing of ledger entries

use crate::error::Result;
use crate::store::{LedgerStore, TimeRange};
use mishap_core::{CharacterId, DefId, Interpretation, LedgerEntry, Outcome};
use std::collections::BTreeMap;
use std::fmt;

/// Criteria for selecting ledger entries
#[derive(Debug, Clone, Default)]
pub struct LedgerQuery {
    /// Filter by character
    pub character: Option<CharacterId>,
    /// Time window (inclusive)
    pub range: TimeRange,
    /// Filter by outcome
    pub outcome: Option<Outcome>,
    /// Filter by action type
    pub action: Option<DefId>,
}

impl LedgerQuery {
    /// Create an empty query (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_character(mut self, character: CharacterId) -> Self {
        self.character = Some(character);
        self
    }

    pub fn in_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn by_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn by_action(mut self, action: impl Into<DefId>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Check a single entry against every criterion
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.character.map_or(true, |c| entry.character() == c)
            && self.range.contains(entry.timestamp())
            && self.outcome.map_or(true, |o| entry.outcome() == o)
            && self
                .action
                .as_ref()
                .map_or(true, |a| &entry.record.action == a)
    }

    /// Run against a store
    ///
    /// A character filter goes through the store's own per-character query;
    /// anything else scans every entry.
    pub fn run(&self, store: &dyn LedgerStore) -> Result<Vec<LedgerEntry>> {
        let candidates = match self.character {
            Some(character) => store.query(character, &self.range)?,
            None => store.entries()?,
        };
        Ok(candidates.into_iter().filter(|e| self.matches(e)).collect())
    }
}

/// Summary statistics over a set of entries
pub struct Auditor<'a> {
    entries: &'a [LedgerEntry],
}

impl<'a> Auditor<'a> {
    pub fn new(entries: &'a [LedgerEntry]) -> Self {
        Self { entries }
    }

    /// Generate an audit report
    pub fn generate_report(&self) -> AuditReport {
        let mut report = AuditReport {
            total_entries: self.entries.len(),
            ..AuditReport::default()
        };
        let mut blame_sum = 0.0;

        for entry in self.entries {
            *report.outcomes.entry(entry.outcome().as_str()).or_insert(0) += 1;
            *report
                .interpretations
                .entry(entry.interpretation().as_str())
                .or_insert(0) += 1;
            for factor in entry.contributing_factors() {
                *report.factor_frequency.entry(factor.clone()).or_insert(0) += 1;
            }
            if entry.record.supersedes.is_some() {
                report.retries += 1;
            }
            if entry.record.unarmed {
                report.unarmed += 1;
            }
            blame_sum += entry.blame_weight();
        }

        if !self.entries.is_empty() {
            report.mean_blame = blame_sum / self.entries.len() as f64;
        }
        report
    }

    /// How often a given factor contributed
    pub fn count_factor(&self, factor: &DefId) -> usize {
        self.entries
            .iter()
            .filter(|e| e.contributing_factors().contains(factor))
            .count()
    }

    /// Entries the character could reasonably be blamed for
    pub fn avoidable(&self) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.interpretation() == Interpretation::Avoidable)
            .collect()
    }
}

/// Aggregate view of a slice of the ledger
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub total_entries: usize,
    /// Count per outcome name
    pub outcomes: BTreeMap<&'static str, usize>,
    /// Count per interpretation name
    pub interpretations: BTreeMap<&'static str, usize>,
    /// Mean blame weight, 0.0 for an empty set
    pub mean_blame: f64,
    /// How often each factor appeared
    pub factor_frequency: BTreeMap<DefId, usize>,
    /// Entries that supersede an earlier one
    pub retries: usize,
    /// Entries resolved without usable items
    pub unarmed: usize,
}

impl AuditReport {
    pub fn outcome_count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(outcome.as_str()).copied().unwrap_or(0)
    }

    pub fn interpretation_count(&self, interpretation: Interpretation) -> usize {
        self.interpretations
            .get(interpretation.as_str())
            .copied()
            .unwrap_or(0)
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Ledger Audit ===")?;
        writeln!(f, "Total entries: {}", self.total_entries)?;
        writeln!(f, "Mean blame: {:.3}", self.mean_blame)?;
        writeln!(f, "Retries: {}", self.retries)?;
        writeln!(f, "Unarmed: {}", self.unarmed)?;

        if !self.outcomes.is_empty() {
            writeln!(f, "\nOutcomes:")?;
            for (outcome, count) in &self.outcomes {
                writeln!(f, "  {}: {}", outcome, count)?;
            }
        }

        if !self.interpretations.is_empty() {
            writeln!(f, "\nInterpretations:")?;
            for (interpretation, count) in &self.interpretations {
                writeln!(f, "  {}: {}", interpretation, count)?;
            }
        }

        if !self.factor_frequency.is_empty() {
            writeln!(f, "\nFactors:")?;
            let mut sorted: Vec<_> = self.factor_frequency.iter().collect();
            sorted.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
            for (factor, count) in sorted {
                writeln!(f, "  {}: {}", factor, count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLedger;
    use crate::test_support::record;

    fn populated() -> MemoryLedger {
        let ledger = MemoryLedger::new();

        let mut failed = record(1, 1);
        failed.outcome = Outcome::Failure;
        failed.interpretation = Interpretation::Avoidable;
        failed.blame_weight = 1.0;
        failed.contributing_factors = vec![DefId::new("butterfingers")];
        ledger.append(failed).unwrap();

        let mut ok = record(1, 2);
        ok.outcome = Outcome::Success;
        ok.action = DefId::new("sneak");
        ok.contributing_factors = vec![DefId::new("butterfingers"), DefId::new("strong_current")];
        ok.blame_weight = 0.5;
        ledger.append(ok).unwrap();

        ledger.append(record(2, 3)).unwrap();
        ledger
    }

    #[test]
    fn test_query_filters() {
        let ledger = populated();

        let all = LedgerQuery::new().run(&ledger).unwrap();
        assert_eq!(all.len(), 3);

        let failures = LedgerQuery::new()
            .by_character(CharacterId(1))
            .by_outcome(Outcome::Failure)
            .run(&ledger)
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].record.derived_seed, 1);

        let sneaks = LedgerQuery::new().by_action("sneak").run(&ledger).unwrap();
        assert_eq!(sneaks.len(), 1);
    }

    #[test]
    fn test_generate_report() {
        let ledger = populated();
        let entries = ledger.entries().unwrap();
        let report = Auditor::new(&entries).generate_report();

        assert_eq!(report.total_entries, 3);
        assert_eq!(report.outcome_count(Outcome::Failure), 1);
        assert_eq!(report.outcome_count(Outcome::Success), 1);
        assert_eq!(report.outcome_count(Outcome::PartialSuccess), 1);
        assert_eq!(report.interpretation_count(Interpretation::Avoidable), 1);
        assert_eq!(report.factor_frequency[&DefId::new("butterfingers")], 2);
        assert!((report.mean_blame - 0.5).abs() < 1e-9);

        let text = report.to_string();
        assert!(text.contains("Ledger Audit"));
        assert!(text.contains("butterfingers: 2"));
    }

    #[test]
    fn test_empty_report() {
        let report = Auditor::new(&[]).generate_report();
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.mean_blame, 0.0);
    }

    #[test]
    fn test_factor_counts_and_avoidable() {
        let ledger = populated();
        let entries = ledger.entries().unwrap();
        let auditor = Auditor::new(&entries);

        assert_eq!(auditor.count_factor(&DefId::new("strong_current")), 1);
        assert_eq!(auditor.avoidable().len(), 1);
    }
}
