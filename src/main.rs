// Entry point and high-level CLI flow.
//
// - Option [1] loads the KPI CSV, computes per-record achievements, and
//   prints load diagnostics.
// - Option [2] prompts for the quota percentages and an optional company
//   filter, then generates the talent reports and a JSON summary.
// - After generating reports, the user can go back to the menu or exit.
mod loader;
mod output;
mod reports;
mod score;
mod types;
mod util;

use once_cell::sync::Lazy;
use reports::QuotaConfig;
use std::io::{self, Write};
use std::sync::Mutex;
use types::ScoredKpi;

// In-memory app state: the CSV is loaded and scored once, and reports can
// be regenerated with different quota/filter inputs in the same run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        has_period: false,
    })
});

struct AppState {
    data: Option<Vec<ScoredKpi>>,
    has_period: bool,
}

/// Print a prompt and read one trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read a single menu choice after the common "Enter choice:" prompt.
fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Read a quota percentage; an empty line keeps the default, anything
/// unparseable falls back to it with a note.
fn read_percent(label: &str, default: u32) -> u32 {
    let raw = read_line(&format!("Quota {} % [{}]: ", label, default));
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            println!("Invalid percentage, keeping {}.", default);
            default
        }
    }
}

/// Prompt for the five tier quotas, defaulting to 10/15/50/15/10.
fn prompt_quota() -> QuotaConfig {
    let defaults = QuotaConfig::default();
    QuotaConfig {
        istimewa: read_percent("Istimewa", defaults.istimewa),
        sangat_baik: read_percent("Sangat Baik", defaults.sangat_baik),
        baik: read_percent("Baik", defaults.baik),
        cukup: read_percent("Cukup", defaults.cukup),
        kurang: read_percent("Kurang", defaults.kurang),
    }
}

/// Ask whether to return to the report menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the KPI CSV, score each record, print what
/// happened.
fn handle_load() {
    let path = "kpi_cleaned.csv";
    match loader::load_and_clean(path) {
        Ok((records, load_report)) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                util::format_int(load_report.total_rows as i64),
                util::format_int(load_report.loaded_rows as i64)
            );
            println!(
                "Note: {} rows skipped, {} numeric cells coerced to null.",
                util::format_int(load_report.skipped_rows as i64),
                util::format_int(load_report.coerced_cells as i64)
            );
            if !load_report.has_period {
                println!("Info: no 'PERIODE' column found; the period trend report is disabled.");
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(score::compute_achievements(records));
            state.has_period = load_report.has_period;
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: aggregate, classify, and emit the talent reports.
fn handle_generate_reports() {
    let (data, has_period) = {
        let state = APP_STATE.lock().unwrap();
        (state.data.clone(), state.has_period)
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let quota = prompt_quota();
    if !quota.is_balanced() {
        println!(
            "Warning: quota percentages sum to {}% (expected 100%).",
            quota.total()
        );
    }
    let company = read_line("Filter by company (blank for all): ");

    let (summaries, agg_report) = score::summarize_and_classify(&data);
    let summaries = reports::filter_by_company(summaries, &company);
    if agg_report.dropped_groups > 0 {
        println!(
            "Note: {} employee group(s) excluded (zero total weight).",
            util::format_int(agg_report.dropped_groups as i64)
        );
    }

    println!("\nGenerating reports...");
    println!("Outputs saved to individual files...\n");

    let summary_rows = reports::summary_rows(&summaries);
    let file1 = "talent_summary.csv";
    if let Err(e) = output::write_csv(file1, &summary_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Talent Pool Summary\n");
    println!("Talent Pool Summary");
    println!("(One row per employee, position and company)\n");
    output::preview_table(&summary_rows, 5);
    println!("(Full table exported to {})\n", file1);

    let top = reports::top_performers(&summaries, 10);
    println!("Report 2: Top 10 Performers by Final Score\n");
    println!("Top 10 Performers by Final Score\n");
    output::preview_table(&top, 10);

    let distribution = reports::talent_distribution(&summaries, &quota);
    let file2 = "talent_distribution.csv";
    if let Err(e) = output::write_csv(file2, &distribution) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Talent Distribution & Quota Simulation\n");
    println!("Talent Distribution & Quota Simulation");
    println!("(Counts and labels only; no quota rebalancing)\n");
    output::preview_table(&distribution, 5);
    println!("(Full table exported to {})\n", file2);

    if has_period {
        let trend = reports::position_trends(&data);
        let file3 = "position_trend.csv";
        if let Err(e) = output::write_csv(file3, &trend) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 4: Average KPI Score per Position and Period\n");
        println!("Average KPI Score per Position and Period\n");
        output::preview_table(&trend, 5);
        println!("(Full table exported to {})\n", file3);
    } else {
        println!("Info: add a 'PERIODE' column to the data for the per-position trend report.\n");
    }

    let stats = reports::generate_summary(&data, &summaries, &agg_report);
    if let Err(e) = output::write_json("summary.json", &stats) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"total_employees\": {}, \"avg_final_score\": {}}}\n",
        util::format_int(stats.total_employees as i64),
        util::format_number(stats.avg_final_score, 2)
    );
}

fn main() {
    loop {
        println!("Select an option:");
        println!("[1] Load the KPI file");
        println!("[2] Generate Talent Reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
