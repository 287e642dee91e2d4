use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row exactly as it appears in the source export. Every field is an
/// optional string; typing and coercion happen in the loader.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "NIPP PEKERJA")]
    pub employee_id: Option<String>,
    #[serde(rename = "POSISI PEKERJA")]
    pub position: Option<String>,
    #[serde(rename = "PERUSAHAAN")]
    pub company: Option<String>,
    #[serde(rename = "REALISASI TW TERKAIT")]
    pub realized: Option<String>,
    #[serde(rename = "TARGET TW TERKAIT")]
    pub target: Option<String>,
    #[serde(rename = "BOBOT")]
    pub weight: Option<String>,
    #[serde(rename = "POLARITAS")]
    pub polarity: Option<String>,
    // Optional column; older exports do not carry it.
    #[serde(rename = "PERIODE", default)]
    pub period: Option<String>,
}

/// Direction of a KPI: whether beating the target from above or below counts
/// as good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Parse a raw polarity cell. Matching is case- and whitespace-
    /// insensitive and accepts both the English and the source data's
    /// Indonesian spellings; anything else is unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "positif" => Some(Self::Positive),
            "negative" | "negatif" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// One cleaned KPI record. Numeric fields that failed coercion and
/// unrecognized polarities arrive here as `None` and flow through the
/// null-propagation rules in `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiRecord {
    pub employee_id: String,
    pub position: String,
    pub company: String,
    pub realized: Option<f64>,
    pub target: Option<f64>,
    pub weight: Option<f64>,
    pub polarity: Option<Polarity>,
    pub period: Option<String>,
}

/// A KPI record with its derived achievement percentage and weighted score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredKpi {
    pub employee_id: String,
    pub position: String,
    pub company: String,
    pub realized: Option<f64>,
    pub target: Option<f64>,
    pub weight: Option<f64>,
    pub polarity: Option<Polarity>,
    pub period: Option<String>,
    pub achievement_pct: Option<f64>,
    pub weighted_score: Option<f64>,
}

/// Talent tier derived from an employee's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalentCategory {
    Istimewa,
    SangatBaik,
    Baik,
    Cukup,
    Kurang,
}

impl TalentCategory {
    /// All tiers, best first. Distribution tables iterate this so every
    /// category gets a row even at zero employees.
    pub const ALL: [Self; 5] = [
        Self::Istimewa,
        Self::SangatBaik,
        Self::Baik,
        Self::Cukup,
        Self::Kurang,
    ];

    /// Map a final score to its tier. The bands are closed and ordered;
    /// the first matching test wins, so exactly 110 lands in Sangat Baik
    /// and exactly 105 falls through to Baik.
    pub fn from_final_score(score: f64) -> Self {
        if score > 110.0 {
            Self::Istimewa
        } else if score > 105.0 {
            Self::SangatBaik
        } else if score >= 90.0 {
            Self::Baik
        } else if score >= 80.0 {
            Self::Cukup
        } else {
            Self::Kurang
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Istimewa => "Istimewa",
            Self::SangatBaik => "Sangat Baik",
            Self::Baik => "Baik",
            Self::Cukup => "Cukup",
            Self::Kurang => "Kurang",
        }
    }
}

/// Aggregated result for one (employee, position, company) group.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub position: String,
    pub company: String,
    pub total_weighted_score: f64,
    pub total_weight: f64,
    pub final_score: f64,
    pub category: TalentCategory,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TalentSummaryRow {
    #[serde(rename = "NIPP PEKERJA")]
    #[tabled(rename = "NIPP PEKERJA")]
    pub employee_id: String,
    #[serde(rename = "POSISI PEKERJA")]
    #[tabled(rename = "POSISI PEKERJA")]
    pub position: String,
    #[serde(rename = "PERUSAHAAN")]
    #[tabled(rename = "PERUSAHAAN")]
    pub company: String,
    #[serde(rename = "TOTAL_SKOR")]
    #[tabled(rename = "TOTAL_SKOR")]
    pub total_weighted_score: String,
    #[serde(rename = "TOTAL_BOBOT")]
    #[tabled(rename = "TOTAL_BOBOT")]
    pub total_weight: String,
    #[serde(rename = "SKOR AKHIR")]
    #[tabled(rename = "SKOR AKHIR")]
    pub final_score: String,
    #[serde(rename = "KATEGORI TALENT")]
    #[tabled(rename = "KATEGORI TALENT")]
    pub category: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DistributionRow {
    #[serde(rename = "KATEGORI TALENT")]
    #[tabled(rename = "KATEGORI TALENT")]
    pub category: String,
    #[serde(rename = "Employees")]
    #[tabled(rename = "Employees")]
    pub employees: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share_pct: String,
    #[serde(rename = "Quota")]
    #[tabled(rename = "Quota")]
    pub quota_pct: String,
    #[serde(rename = "QuotaSlots")]
    #[tabled(rename = "QuotaSlots")]
    pub quota_slots: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "POSISI PEKERJA")]
    #[tabled(rename = "POSISI PEKERJA")]
    pub position: String,
    #[serde(rename = "PERIODE")]
    #[tabled(rename = "PERIODE")]
    pub period: String,
    #[serde(rename = "Records")]
    #[tabled(rename = "Records")]
    pub records: usize,
    #[serde(rename = "Skor_Akhir")]
    #[tabled(rename = "Skor_Akhir")]
    pub avg_kpi_score: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub scored_records: usize,
    pub total_employees: usize,
    pub dropped_groups: usize,
    pub total_companies: usize,
    pub avg_final_score: f64,
}
