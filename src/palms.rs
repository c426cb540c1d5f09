use log::{debug, error, info, warn};

use palms_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::palms::config_reader::*;
use crate::palms::io_common::{simplify_file_name, validate_input_file, InputKind};
use crate::palms::snapshot::{load_snapshot, restore_counters, save_snapshot};

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod snapshot;

/// The name of the state file, in the output directory.
const STATE_FILE_NAME: &str = "palms_state.json";
const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";
const DEFAULT_TOP: usize = 10;

#[derive(Debug, Snafu)]
pub enum PalmsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error reading file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Cannot find worksheet {name} in the Excel file"))]
    MissingWorksheet { name: String },
    #[snafu(display("The file {path} does not contain any data"))]
    EmptySpreadsheet { path: String },
    #[snafu(display("Invalid file {path}: {reason}"))]
    InvalidFile { path: String, reason: String },
    #[snafu(display("{message}"))]
    Scoring {
        source: ScoringErrors,
        message: String,
    },
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PalmsResult<T> = Result<T, PalmsError>;

pub type BPalmsResult<T> = Result<T, Box<PalmsError>>;

/// One report to upload, with how to read it.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ReportSource {
    path: String,
    kind: Option<InputKind>,
    excel_worksheet_name: Option<String>,
}

fn read_report(source: &ReportSource) -> BPalmsResult<Vec<Row>> {
    let detected = validate_input_file(&source.path)?;
    let kind = source.kind.unwrap_or(detected);
    info!("read_report: reading {:?} as {:?}", source.path, kind);
    let rows = match kind {
        InputKind::Csv => io_csv::read_csv_report(&source.path)?,
        InputKind::Excel => {
            io_excel::read_excel_report(&source.path, source.excel_worksheet_name.as_deref())?
        }
    };
    if rows.is_empty() {
        return Err(Box::new(PalmsError::EmptySpreadsheet {
            path: source.path.clone(),
        }));
    }
    Ok(rows)
}

fn report_sources(
    args: &Args,
    config: &PalmsConfig,
    root: &Path,
) -> BPalmsResult<Vec<ReportSource>> {
    let input_kind = match args.input_type.as_deref() {
        Some(s) => Some(InputKind::from_provider(s)?),
        None => None,
    };
    if !args.input.is_empty() {
        return Ok(args
            .input
            .iter()
            .map(|p| ReportSource {
                path: p.clone(),
                kind: input_kind,
                excel_worksheet_name: args.excel_worksheet_name.clone(),
            })
            .collect());
    }
    let mut res: Vec<ReportSource> = Vec::new();
    for cfs in config.file_sources.iter().flatten() {
        let p: PathBuf = root.join(&cfs.file_path);
        res.push(ReportSource {
            path: p.display().to_string(),
            kind: Some(InputKind::from_provider(&cfs.provider)?),
            excel_worksheet_name: args
                .excel_worksheet_name
                .clone()
                .or_else(|| cfs.excel_worksheet_name.clone()),
        });
    }
    Ok(res)
}

fn parse_category(name: Option<&str>) -> PalmsResult<Category> {
    match name {
        None => Ok(Category::Total),
        Some(s) => match Category::parse(s) {
            Some(c) => Ok(c),
            None => whatever!("Unknown category {:?}", s),
        },
    }
}

fn summary_to_json(file_name: &str, summary: &ProcessingSummary) -> JSValue {
    json!({
        "file": file_name,
        "rowsProcessed": summary.rows_processed,
        "rowsMatched": summary.rows_matched,
        "rowsSkipped": summary.rows_skipped,
        "unmatched": summary.unmatched,
        "errors": summary.errors,
    })
}

fn team_scores_to_json(scores: &[TeamScore]) -> Vec<JSValue> {
    scores
        .iter()
        .enumerate()
        .map(|(idx, ts)| {
            json!({
                "rank": idx + 1,
                "key": ts.team_key,
                "name": ts.name,
                "captain": ts.captain,
                "color": ts.color,
                "individualPoints": ts.individual_points,
                "bonusPoints": ts.bonus_points,
                "totalScore": ts.total_score,
                "bonuses": ts.bonuses,
                "stats": {
                    "totalPresent": ts.stats.total_present,
                    "totalReferralsGiven": ts.stats.total_referrals_given,
                    "totalVisitors": ts.stats.total_visitors,
                    "totalOneToOnes": ts.stats.total_one_to_ones,
                    "totalTyfcb": ts.stats.total_tyfcb,
                }
            })
        })
        .collect()
}

fn individual_scores_to_json(scores: &[IndividualScore]) -> Vec<JSValue> {
    scores
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            json!({
                "rank": idx + 1,
                "member": s.member,
                "team": s.team,
                "color": s.color,
                "points": s.points,
                "rawCount": s.raw_count,
                "total": s.total,
            })
        })
        .collect()
}

fn build_leaderboard_js(
    config: &PalmsConfig,
    roster: &Roster,
    rules: &CompetitionRules,
    category: Category,
    top: usize,
    uploads: &[JSValue],
) -> JSValue {
    let teams = team_leaderboard(roster, rules);
    let individuals = individual_leaderboard(roster, category, &rules.weights, Some(top));
    let latecomers: Vec<JSValue> = roster
        .latecomers()
        .iter()
        .map(|l| json!({"member": l.member, "team": l.team_key, "late": l.late}))
        .collect();
    json!({
        "competition": config.output_settings.competition_name,
        "version": roster.version(),
        "category": category.name(),
        "uploads": uploads,
        "teams": team_scores_to_json(&teams),
        "individuals": individual_scores_to_json(&individuals),
        "latecomers": latecomers,
    })
}

fn check_reference(reference_path: &str, pretty_js: &str) -> PalmsResult<()> {
    let summary_ref = read_reference(reference_path)?;
    let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        whatever!(
            "Difference detected between the computed leaderboard and the reference {}",
            reference_path
        )
    }
    Ok(())
}

fn write_output(out: &str, pretty_js: &str) -> BPalmsResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("write_output: writing leaderboard to {:?}", out);
        fs::write(out, pretty_js).context(WritingFileSnafu { path: out })?;
    }
    Ok(())
}

fn persist(state_path: Option<&str>, roster: &Roster) -> BPalmsResult<()> {
    match state_path {
        Some(p) => save_snapshot(p, roster),
        None => Ok(()),
    }
}

/// Runs one session of the competition: restores the counters, uploads the
/// reports, records the late arrivals and writes the leaderboards.
///
/// The counters are saved after every change that succeeds. A failed upload
/// leaves the state of the previous uploads in place.
pub fn run_competition(args: &Args) -> BPalmsResult<()> {
    let config = read_config(&args.config)?;
    info!("config: {:?}", config);
    let rules = config.rules()?;
    let category = parse_category(args.category.as_deref())?;
    let top = args.top.unwrap_or(DEFAULT_TOP);

    let config_p = Path::new(args.config.as_str());
    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let output_dir: Option<PathBuf> = config
        .output_settings
        .output_directory
        .as_ref()
        .map(|d| root_p.join(d));

    let state_path: Option<String> = args.state.clone().or_else(|| {
        output_dir
            .as_ref()
            .map(|d| d.join(STATE_FILE_NAME).display().to_string())
    });

    let mut roster = config.build_roster()?;
    if let Some(p) = state_path.as_ref() {
        if let Some(saved) = load_snapshot(p)? {
            roster = restore_counters(&roster, &saved)?;
        }
    }

    if args.reset {
        roster.clear_counters();
        persist(state_path.as_deref(), &roster)?;
    }

    let mut uploads: Vec<JSValue> = Vec::new();
    for source in report_sources(args, &config, root_p)? {
        let file_name = simplify_file_name(&source.path);
        let rows = match read_report(&source) {
            Ok(rows) => rows,
            Err(e) => {
                error!("{}: upload failed: {}", file_name, e);
                return Err(e);
            }
        };
        debug!("run_competition: {} rows in {}", rows.len(), file_name);
        let outcome = process_batch(&roster, &rows, &rules.name_columns)
            .map_err(|e| {
                error!("{}: upload failed: {}", file_name, e);
                e
            })
            .context(ScoringSnafu {
                message: format!("Upload of {} failed", file_name),
            })?;
        info!("{}: {}", file_name, outcome.summary.status_message());
        uploads.push(summary_to_json(&file_name, &outcome.summary));
        roster = outcome.roster;
        persist(state_path.as_deref(), &roster)?;
    }

    for name in args.mark_late.iter() {
        let late = roster.record_late(name).context(ScoringSnafu {
            message: format!("Cannot mark {} as late", name),
        })?;
        info!("{} marked late ({} total)", name, late);
        persist(state_path.as_deref(), &roster)?;
    }

    let result_js = build_leaderboard_js(&config, &roster, &rules, category, top, &uploads);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out: Option<String> = args.out.clone().or_else(|| {
        output_dir
            .as_ref()
            .map(|d| d.join(LEADERBOARD_FILE_NAME).display().to_string())
    });
    write_output(out.as_deref().unwrap_or("stdout"), &pretty_js)?;

    if let Some(reference_path) = args.reference.as_ref() {
        check_reference(reference_path, &pretty_js)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> String {
        format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
    }

    fn tmp_path(name: &str) -> String {
        let p = std::env::temp_dir().join(format!("palmsboard-{}-{}", std::process::id(), name));
        p.display().to_string()
    }

    fn args(config: &str) -> Args {
        Args {
            config: format!("{}/{}", test_dir(), config),
            input: vec![],
            input_type: None,
            excel_worksheet_name: None,
            state: None,
            out: None,
            reference: None,
            category: None,
            top: None,
            mark_late: vec![],
            reset: false,
            verbose: false,
        }
    }

    fn read_out(path: &str) -> JSValue {
        let s = fs::read_to_string(path).unwrap();
        serde_json::from_str(&s).unwrap()
    }

    #[test]
    fn sample_competition() {
        let _ = env_logger::builder().is_test(true).try_init();
        let out = tmp_path("sample.json");
        let state = tmp_path("sample_state.json");
        let _ = fs::remove_file(&state);
        let a = Args {
            out: Some(out.clone()),
            state: Some(state.clone()),
            reference: Some(format!("{}/sample_expected_leaderboard.json", test_dir())),
            ..args("sample_config.json")
        };
        run_competition(&a).unwrap();
        let js = read_out(&out);
        assert_eq!(js["teams"][0]["key"], json!("teamA"));
        assert_eq!(js["uploads"][0]["unmatched"], json!(["Himanshu Sharma"]));
        let _ = fs::remove_file(&state);
        let _ = fs::remove_file(&out);
    }

    #[test]
    fn counters_persist_between_runs() {
        let out = tmp_path("persist.json");
        let state = tmp_path("persist_state.json");
        let _ = fs::remove_file(&state);
        let a = Args {
            out: Some(out.clone()),
            state: Some(state.clone()),
            ..args("sample_config.json")
        };
        run_competition(&a).unwrap();
        let first = read_out(&out);
        run_competition(&a).unwrap();
        let second = read_out(&out);
        let total =
            |js: &JSValue, idx: usize| js["teams"][idx]["individualPoints"].as_i64().unwrap();
        assert_eq!(total(&second, 0), 2 * total(&first, 0));
        assert_eq!(second["version"], json!(2));

        let reset = Args {
            reset: true,
            input: vec![format!("{}/semicolon_palms.csv", test_dir())],
            mark_late: vec!["prannav khanna".to_string()],
            ..a.clone()
        };
        run_competition(&reset).unwrap();
        let third = read_out(&out);
        assert_eq!(third["latecomers"][0]["member"], json!("Prannav Khanna"));
        assert_eq!(third["latecomers"][0]["late"], json!(1));
        let _ = fs::remove_file(&state);
        let _ = fs::remove_file(&out);
    }

    #[test]
    fn failed_upload_keeps_earlier_uploads() {
        let out = tmp_path("failed.json");
        let state = tmp_path("failed_state.json");
        let _ = fs::remove_file(&state);
        let a = Args {
            out: Some(out.clone()),
            state: Some(state.clone()),
            input: vec![
                format!("{}/sample_palms.csv", test_dir()),
                format!("{}/header_only.csv", test_dir()),
            ],
            ..args("sample_config.json")
        };
        let err = run_competition(&a).unwrap_err();
        assert!(matches!(*err, PalmsError::EmptySpreadsheet { .. }));

        let saved = load_snapshot(&state).unwrap().unwrap();
        assert_eq!(saved.version(), 1);
        let sajid = saved.find_member("Sajid Hasan").unwrap();
        assert_eq!(saved.member(sajid).unwrap().counters.present, 4);
        assert_eq!(saved.member(sajid).unwrap().counters.late, 1);
        let _ = fs::remove_file(&state);
    }

    #[test]
    fn unknown_member_cannot_be_marked_late() {
        let a = Args {
            out: Some(tmp_path("late.json")),
            input: vec![format!("{}/sample_palms.csv", test_dir())],
            mark_late: vec!["Nobody Here".to_string()],
            ..args("sample_config.json")
        };
        let err = run_competition(&a).unwrap_err();
        assert!(matches!(
            *err,
            PalmsError::Scoring {
                source: ScoringErrors::UnknownMember(_),
                ..
            }
        ));
    }

    #[test]
    fn categories() {
        assert_eq!(parse_category(None).unwrap(), Category::Total);
        assert_eq!(parse_category(Some("1-2-1")).unwrap(), Category::OneToOnes);
        assert!(parse_category(Some("bananas")).is_err());
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let err = check_reference(
            &format!("{}/sample_expected_leaderboard.json", test_dir()),
            "{}",
        )
        .unwrap_err();
        assert!(matches!(err, PalmsError::Whatever { .. }));
    }
}
