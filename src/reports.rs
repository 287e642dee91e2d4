use crate::score::AggregationReport;
use crate::types::{
    DistributionRow, EmployeeSummary, ScoredKpi, SummaryStats, TalentCategory, TalentSummaryRow,
    TrendRow,
};
use crate::util::{average, format_number};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Target percentage per talent tier for the quota simulation. The five
/// values are expected to sum to 100; the caller surfaces a warning when
/// they do not, and the simulation runs with the values as given either
/// way. No employee is ever moved between tiers here.
#[derive(Debug, Clone, Copy)]
pub struct QuotaConfig {
    pub istimewa: u32,
    pub sangat_baik: u32,
    pub baik: u32,
    pub cukup: u32,
    pub kurang: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            istimewa: 10,
            sangat_baik: 15,
            baik: 50,
            cukup: 15,
            kurang: 10,
        }
    }
}

impl QuotaConfig {
    pub fn total(&self) -> u32 {
        self.istimewa + self.sangat_baik + self.baik + self.cukup + self.kurang
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == 100
    }

    pub fn pct_for(&self, category: TalentCategory) -> u32 {
        match category {
            TalentCategory::Istimewa => self.istimewa,
            TalentCategory::SangatBaik => self.sangat_baik,
            TalentCategory::Baik => self.baik,
            TalentCategory::Cukup => self.cukup,
            TalentCategory::Kurang => self.kurang,
        }
    }
}

/// Caller-side company filter over the produced summaries. A blank filter
/// keeps everything; otherwise the match is exact on the company string.
pub fn filter_by_company(summaries: Vec<EmployeeSummary>, company: &str) -> Vec<EmployeeSummary> {
    let company = company.trim();
    if company.is_empty() {
        return summaries;
    }
    summaries
        .into_iter()
        .filter(|s| s.company == company)
        .collect()
}

fn render_row(s: &EmployeeSummary) -> TalentSummaryRow {
    TalentSummaryRow {
        employee_id: s.employee_id.clone(),
        position: s.position.clone(),
        company: s.company.clone(),
        total_weighted_score: format_number(s.total_weighted_score, 2),
        total_weight: format_number(s.total_weight, 2),
        final_score: format_number(s.final_score, 2),
        category: s.category.label().to_string(),
    }
}

/// Render the full summary table in the core's (group key) order.
pub fn summary_rows(summaries: &[EmployeeSummary]) -> Vec<TalentSummaryRow> {
    summaries.iter().map(render_row).collect()
}

/// Top `n` summaries by final score, descending. Ties fall back to the
/// group key so the ranking is stable across runs.
pub fn top_performers(summaries: &[EmployeeSummary], n: usize) -> Vec<TalentSummaryRow> {
    let mut ranked: Vec<&EmployeeSummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                (&a.employee_id, &a.position, &a.company).cmp(&(
                    &b.employee_id,
                    &b.position,
                    &b.company,
                ))
            })
    });
    ranked.into_iter().take(n).map(render_row).collect()
}

/// Per-tier employee counts and shares next to the quota targets. Every
/// tier gets a row, zero-count tiers included, best tier first.
pub fn talent_distribution(
    summaries: &[EmployeeSummary],
    quota: &QuotaConfig,
) -> Vec<DistributionRow> {
    let total = summaries.len();
    TalentCategory::ALL
        .iter()
        .map(|cat| {
            let count = summaries.iter().filter(|s| s.category == *cat).count();
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            let quota_pct = quota.pct_for(*cat);
            let quota_slots = (quota_pct as f64 / 100.0 * total as f64).round() as usize;
            DistributionRow {
                category: cat.label().to_string(),
                employees: count,
                share_pct: format_number(share, 2),
                quota_pct: format_number(quota_pct as f64, 0),
                quota_slots,
            }
        })
        .collect()
}

/// Mean KPI score per (position, period), for datasets that carry the
/// period column. Records without a period or without a score are left out
/// of the mean; groups are emitted in key order.
pub fn position_trends(records: &[ScoredKpi]) -> Vec<TrendRow> {
    #[derive(Default)]
    struct Acc {
        scores: Vec<f64>,
        records: usize,
    }

    let mut map: BTreeMap<(String, String), Acc> = BTreeMap::new();
    for r in records {
        let Some(period) = r.period.as_ref() else {
            continue;
        };
        let acc = map
            .entry((r.position.clone(), period.clone()))
            .or_default();
        acc.records += 1;
        if let Some(score) = r.weighted_score {
            acc.scores.push(score);
        }
    }

    map.into_iter()
        .map(|((position, period), acc)| TrendRow {
            position,
            period,
            records: acc.records,
            avg_kpi_score: format_number(average(&acc.scores), 2),
        })
        .collect()
}

/// Headline numbers for the JSON export.
pub fn generate_summary(
    records: &[ScoredKpi],
    summaries: &[EmployeeSummary],
    agg: &AggregationReport,
) -> SummaryStats {
    let scored_records = records.iter().filter(|r| r.weighted_score.is_some()).count();
    let companies: HashSet<&str> = summaries.iter().map(|s| s.company.as_str()).collect();
    let avg_final_score = average(
        &summaries
            .iter()
            .map(|s| s.final_score)
            .collect::<Vec<_>>(),
    );
    SummaryStats {
        total_records: records.len(),
        scored_records,
        total_employees: summaries.len(),
        dropped_groups: agg.dropped_groups,
        total_companies: companies.len(),
        avg_final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{compute_achievements, summarize_and_classify};
    use crate::types::{KpiRecord, Polarity};

    fn summary(id: &str, company: &str, final_score: f64) -> EmployeeSummary {
        EmployeeSummary {
            employee_id: id.to_string(),
            position: "Analyst".to_string(),
            company: company.to_string(),
            total_weighted_score: final_score,
            total_weight: 100.0,
            final_score,
            category: TalentCategory::from_final_score(final_score),
        }
    }

    #[test]
    fn default_quota_is_balanced() {
        let quota = QuotaConfig::default();
        assert_eq!(quota.total(), 100);
        assert!(quota.is_balanced());
    }

    #[test]
    fn skewed_quota_is_flagged_not_rejected() {
        let quota = QuotaConfig {
            istimewa: 40,
            ..QuotaConfig::default()
        };
        assert_eq!(quota.total(), 130);
        assert!(!quota.is_balanced());
        // The distribution still renders with the values as given.
        let rows = talent_distribution(&[summary("1", "PT A", 95.0)], &quota);
        assert_eq!(rows[0].quota_pct, "40");
    }

    #[test]
    fn distribution_covers_every_tier_and_counts_match() {
        let summaries = vec![
            summary("1", "PT A", 120.0),
            summary("2", "PT A", 95.0),
            summary("3", "PT A", 95.0),
            summary("4", "PT A", 70.0),
        ];
        let rows = talent_distribution(&summaries, &QuotaConfig::default());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].category, "Istimewa");
        assert_eq!(rows[0].employees, 1);
        assert_eq!(rows[1].employees, 0); // Sangat Baik
        assert_eq!(rows[2].employees, 2); // Baik
        assert_eq!(rows[2].share_pct, "50.00");
        assert_eq!(rows[4].employees, 1); // Kurang
        // 50% quota of 4 employees -> 2 slots.
        assert_eq!(rows[2].quota_slots, 2);
        let counted: usize = rows.iter().map(|r| r.employees).sum();
        assert_eq!(counted, summaries.len());
    }

    #[test]
    fn top_performers_sorts_descending_and_caps() {
        let summaries = vec![
            summary("1", "PT A", 95.0),
            summary("2", "PT A", 120.0),
            summary("3", "PT A", 88.0),
            summary("4", "PT A", 103.0),
        ];
        let top = top_performers(&summaries, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].employee_id, "2");
        assert_eq!(top[1].employee_id, "4");
    }

    #[test]
    fn company_filter_is_exact_and_blank_means_all() {
        let summaries = vec![
            summary("1", "PT A", 95.0),
            summary("2", "PT B", 95.0),
        ];
        assert_eq!(filter_by_company(summaries.clone(), "").len(), 2);
        assert_eq!(filter_by_company(summaries.clone(), "  ").len(), 2);
        let only_b = filter_by_company(summaries, "PT B");
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].employee_id, "2");
    }

    #[test]
    fn trend_means_skip_null_scores_but_count_all_records() {
        let records = compute_achievements(vec![
            KpiRecord {
                employee_id: "1".into(),
                position: "Analyst".into(),
                company: "PT A".into(),
                realized: Some(120.0),
                target: Some(100.0),
                weight: Some(50.0),
                polarity: Some(Polarity::Positive),
                period: Some("2024-Q1".into()),
            },
            // Null achievement: counted in the group, absent from the mean.
            KpiRecord {
                employee_id: "2".into(),
                position: "Analyst".into(),
                company: "PT A".into(),
                realized: None,
                target: Some(100.0),
                weight: Some(50.0),
                polarity: Some(Polarity::Positive),
                period: Some("2024-Q1".into()),
            },
            // No period: never enters the trend.
            KpiRecord {
                employee_id: "3".into(),
                position: "Analyst".into(),
                company: "PT A".into(),
                realized: Some(100.0),
                target: Some(100.0),
                weight: Some(50.0),
                polarity: Some(Polarity::Positive),
                period: None,
            },
        ]);
        let rows = position_trends(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].records, 2);
        // Only the 60.0 weighted score participates in the mean.
        assert_eq!(rows[0].avg_kpi_score, "60.00");
    }

    #[test]
    fn summary_stats_count_records_groups_and_companies() {
        let records = compute_achievements(vec![
            KpiRecord {
                employee_id: "1".into(),
                position: "Analyst".into(),
                company: "PT A".into(),
                realized: Some(100.0),
                target: Some(100.0),
                weight: Some(100.0),
                polarity: Some(Polarity::Positive),
                period: None,
            },
            KpiRecord {
                employee_id: "2".into(),
                position: "Analyst".into(),
                company: "PT B".into(),
                realized: None,
                target: None,
                weight: None,
                polarity: None,
                period: None,
            },
        ]);
        let (summaries, agg) = summarize_and_classify(&records);
        let stats = generate_summary(&records, &summaries, &agg);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.scored_records, 1);
        assert_eq!(stats.total_employees, 1);
        assert_eq!(stats.dropped_groups, 1);
        assert_eq!(stats.total_companies, 1);
        assert_eq!(stats.avg_final_score, 100.0);
    }
}
