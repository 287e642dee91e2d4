use crate::types::{KpiRecord, Polarity, RawRow};
use crate::util::parse_f64_safe;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use thiserror::Error;

/// Columns the pipeline cannot run without. Matching is exact, including
/// case and spacing; the header is the data contract.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "NIPP PEKERJA",
    "POSISI PEKERJA",
    "PERUSAHAAN",
    "REALISASI TW TERKAIT",
    "TARGET TW TERKAIT",
    "BOBOT",
    "POLARITAS",
];

/// Optional column; when absent the period trend report is disabled but
/// scoring proceeds unaffected.
pub const PERIOD_COLUMN: &str = "PERIODE";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required column '{0}' is missing from the input header")]
    MissingColumn(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open input file: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened during a load, for the console diagnostics.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows dropped entirely: malformed records plus rows with a blank
    /// grouping key (employee id, position or company).
    pub skipped_rows: usize,
    /// Non-empty numeric cells that did not parse and were coerced to null.
    pub coerced_cells: usize,
    pub has_period: bool,
}

/// Load and clean the KPI CSV at `path`.
pub fn load_and_clean(path: &str) -> Result<(Vec<KpiRecord>, LoadReport), LoadError> {
    let file = File::open(path)?;
    load_from_reader(file)
}

/// Reader-generic loader so tests can feed in-memory CSV data.
///
/// The header is validated once, up front: a missing required column fails
/// the whole batch with a diagnostic naming the column. After that no row
/// is fatal — malformed rows are skipped and counted, malformed numeric
/// cells are coerced to null and counted.
pub fn load_from_reader<R: Read>(input: R) -> Result<(Vec<KpiRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }
    let has_period = headers.iter().any(|h| h == PERIOD_COLUMN);

    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut coerced_cells = 0usize;
    let mut records: Vec<KpiRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        // Rows missing any grouping key cannot land in a summary group;
        // dropping them here keeps the drop visible in the report instead
        // of silent at aggregation time.
        let employee_id = trimmed(&row.employee_id);
        let position = trimmed(&row.position);
        let company = trimmed(&row.company);
        let (Some(employee_id), Some(position), Some(company)) = (employee_id, position, company)
        else {
            skipped_rows += 1;
            continue;
        };

        let realized = coerce_numeric(row.realized.as_deref(), &mut coerced_cells);
        let target = coerce_numeric(row.target.as_deref(), &mut coerced_cells);
        let weight = coerce_numeric(row.weight.as_deref(), &mut coerced_cells);
        let polarity = row.polarity.as_deref().and_then(Polarity::parse);
        let period = row
            .period
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        records.push(KpiRecord {
            employee_id,
            position,
            company,
            realized,
            target,
            weight,
            polarity,
            period,
        });
    }

    let loaded_rows = records.len();
    let report = LoadReport {
        total_rows,
        loaded_rows,
        skipped_rows,
        coerced_cells,
        has_period,
    };
    Ok((records, report))
}

fn trimmed(cell: &Option<String>) -> Option<String> {
    cell.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coerce_numeric(raw: Option<&str>, coerced: &mut usize) -> Option<f64> {
    let parsed = parse_f64_safe(raw);
    if parsed.is_none() {
        if let Some(s) = raw {
            if !s.trim().is_empty() {
                *coerced += 1;
            }
        }
    }
    parsed
}
