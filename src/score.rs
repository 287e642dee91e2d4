// The scoring core: row-level achievement computation and per-employee
// aggregation/classification. Everything here is a pure function of its
// input; I/O, filtering and formatting belong to the callers.
use crate::types::{EmployeeSummary, KpiRecord, Polarity, ScoredKpi, TalentCategory};
use std::collections::BTreeMap;

/// How achievement relates realized to target:
/// positive KPIs reward exceeding the target (`realized / target`),
/// negative KPIs reward staying under it (`target / realized`).
///
/// Returns `None` when either operand is missing or zero, or when the
/// polarity is unrecognized; the null flows through to the weighted score
/// and drops out of the aggregation sums.
pub fn achievement_pct(
    realized: Option<f64>,
    target: Option<f64>,
    polarity: Option<Polarity>,
) -> Option<f64> {
    let realized = realized?;
    let target = target?;
    if target == 0.0 || realized == 0.0 {
        return None;
    }
    match polarity? {
        Polarity::Positive => Some(realized / target * 100.0),
        Polarity::Negative => Some(target / realized * 100.0),
    }
}

/// Derive achievement and weighted score for every record.
///
/// `weighted_score = achievement_pct * weight / 100`, defined only when
/// both the achievement and the weight are present.
pub fn compute_achievements(records: Vec<KpiRecord>) -> Vec<ScoredKpi> {
    records
        .into_iter()
        .map(|r| {
            let achievement = achievement_pct(r.realized, r.target, r.polarity);
            let weighted_score = match (achievement, r.weight) {
                (Some(a), Some(w)) => Some(a * w / 100.0),
                _ => None,
            };
            ScoredKpi {
                employee_id: r.employee_id,
                position: r.position,
                company: r.company,
                realized: r.realized,
                target: r.target,
                weight: r.weight,
                polarity: r.polarity,
                period: r.period,
                achievement_pct: achievement,
                weighted_score,
            }
        })
        .collect()
}

/// Group accounting emitted alongside the summaries so callers can report
/// how many employees fell out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationReport {
    pub total_groups: usize,
    /// Groups dropped because their total weight summed to zero.
    pub dropped_groups: usize,
}

/// Produce one summary per distinct (employee, position, company) group.
///
/// Null weighted scores and null weights contribute nothing to their sums;
/// a record with a real weight but no achievement still adds its weight to
/// the denominator. Groups whose total weight is zero are dropped (and
/// counted), everything else gets `final_score = total_weighted_score /
/// total_weight * 100` and a talent category.
///
/// Groups accumulate in a `BTreeMap`, so output order is the group-key
/// order and identical input always yields identical output.
pub fn summarize_and_classify(records: &[ScoredKpi]) -> (Vec<EmployeeSummary>, AggregationReport) {
    #[derive(Default)]
    struct Acc {
        total_weighted_score: f64,
        total_weight: f64,
    }

    let mut groups: BTreeMap<(String, String, String), Acc> = BTreeMap::new();
    for r in records {
        let key = (r.employee_id.clone(), r.position.clone(), r.company.clone());
        let acc = groups.entry(key).or_default();
        acc.total_weighted_score += r.weighted_score.unwrap_or(0.0);
        acc.total_weight += r.weight.unwrap_or(0.0);
    }

    let total_groups = groups.len();
    let mut dropped_groups = 0usize;
    let mut summaries: Vec<EmployeeSummary> = Vec::with_capacity(total_groups);
    for ((employee_id, position, company), acc) in groups {
        if acc.total_weight == 0.0 {
            dropped_groups += 1;
            continue;
        }
        let final_score = acc.total_weighted_score / acc.total_weight * 100.0;
        summaries.push(EmployeeSummary {
            employee_id,
            position,
            company,
            total_weighted_score: acc.total_weighted_score,
            total_weight: acc.total_weight,
            final_score,
            category: TalentCategory::from_final_score(final_score),
        });
    }

    let report = AggregationReport {
        total_groups,
        dropped_groups,
    };
    (summaries, report)
}
