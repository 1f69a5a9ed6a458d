//! Integration tests for the stockta CLI.
//!
//! These tests run the built binary from CSV input through computation to
//! CSV or JSON output.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the path to the test fixtures directory.
fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stockta-cli-{}-{name}", std::process::id()))
}

/// Run the CLI with given arguments and return the output.
fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stockta"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(output.status.success(), "CLI failed: {}", stderr(output));
}

fn assert_failure(output: &Output, needle: &str) {
    assert_eq!(output.status.code(), Some(1), "expected exit status 1");
    let err = stderr(output);
    assert!(err.contains(needle), "stderr {err:?} does not mention {needle:?}");
}

// =============================================================================
// Single indicators
// =============================================================================

#[test]
fn test_sma_to_stdout_keeps_warmup_rows() {
    let output = run_cli(&["sma", &fixture("daily_ohlcv.csv"), "5"]);
    assert_success(&output);

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,sma_5");
    assert_eq!(lines.len(), 61);
    assert_eq!(lines[1], "2024-01-01,");
    assert_eq!(lines[4], "2024-01-04,");
    assert!(!lines[5].ends_with(','), "fifth bar should be defined: {}", lines[5]);
}

#[test]
fn test_rsi_json_uses_null_for_warmup() {
    let output = run_cli(&["rsi", &fixture("daily_ohlcv.csv"), "14", "-f", "json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rsi = json["rsi_14"].as_array().unwrap();
    assert_eq!(rsi.len(), 60);
    assert!(rsi[..14].iter().all(serde_json::Value::is_null));
    for value in &rsi[14..] {
        let v = value.as_f64().unwrap();
        assert!((0.0..=100.0).contains(&v));
    }
    assert_eq!(json["date"][0], "2024-01-01T00:00:00Z");
}

#[test]
fn test_macd_to_file() {
    let path = temp_output("macd.csv");
    let output = run_cli(&[
        "macd",
        &fixture("daily_ohlcv.csv"),
        "12,26,9",
        "-o",
        path.to_str().unwrap(),
    ]);
    assert_success(&output);
    assert!(stdout(&output).is_empty());

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "date,macd,signal,histogram");
    // EMA-based: defined from the first bar
    assert_eq!(lines[1], "2024-01-01,0,0,0");
    assert_eq!(lines.len(), 61);
    fs::remove_file(&path).ok();
}

#[test]
fn test_macd_bad_params() {
    let output = run_cli(&["macd", &fixture("daily_ohlcv.csv"), "12,26"]);
    assert_failure(&output, "MACD requires 3 parameters");

    let output = run_cli(&["macd", &fixture("daily_ohlcv.csv"), "26,12,9"]);
    assert_failure(&output, "Indicator computation error");
}

#[test]
fn test_bbwidth_close_only_file() {
    let output = run_cli(&["bbwidth", &fixture("close_only.csv"), "5,2.0", "--population"]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,upper,middle,lower,bb_width");
    assert_eq!(lines.len(), 31);
    assert_eq!(lines[4], "2024-03-04,,,,");
}

#[test]
fn test_range_commands_require_ohlc() {
    let output = run_cli(&["atr", &fixture("close_only.csv")]);
    assert_failure(&output, "no 'open' column found");
}

#[test]
fn test_adx_columns() {
    let output = run_cli(&["adx", &fixture("daily_ohlcv.csv"), "5", "--independent"]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,plus_di,minus_di,adx");
    // ADX needs 2 * period - 1 bars of warm-up
    assert!(lines[9].ends_with(','));
    assert!(!lines[10].ends_with(','));
}

// =============================================================================
// Engine
// =============================================================================

#[test]
fn test_analyze_default_rejects_short_file() {
    let output = run_cli(&["analyze", &fixture("daily_ohlcv.csv")]);
    assert_failure(&output, "insufficient data for moving_averages");
}

#[test]
fn test_analyze_lenient_json_report() {
    let path = temp_output("report.json");
    let output = run_cli(&[
        "analyze",
        &fixture("daily_ohlcv.csv"),
        "--lenient",
        "--horizon",
        "10",
        "--drop-unmatched",
        "-f",
        "json",
        "-o",
        path.to_str().unwrap(),
    ]);
    assert_success(&output);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let indicators = json["indicators"].as_object().unwrap();
    assert_eq!(indicators.len(), 13);
    assert!(json["indicators"]["Long MA"][0].is_number());
    assert!(json["indicators"]["ADX"][0].is_null());
    // weekday file spanning 12 weeks
    assert_eq!(json["range_breaks"].as_array().unwrap().len(), 11);
    assert_eq!(json["trend"]["forecast"].as_array().unwrap().len(), 10);
    assert!(json["matched_patterns"].is_object());
    assert!(json["price_change"]["direction"].is_string());
    assert!(json["period_return"]["percent"].is_number());
    fs::remove_file(&path).ok();
}

#[test]
fn test_analyze_with_config_file() {
    let output = run_cli(&[
        "analyze",
        &fixture("daily_ohlcv.csv"),
        "--config",
        &fixture("engine.toml"),
    ]);
    assert_success(&output);

    let text = stdout(&output);
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("date,RSI,MACD,Signal,Histogram,Plus DI,Minus DI,ADX,"));
    assert!(header.contains("CDLDOJI"));
    assert!(header.contains("CDLENGULFING"));
    assert!(!header.contains("CDLHAMMER"));
    assert!(header.ends_with("trend,trend_upper,trend_lower"));
}

#[test]
fn test_analyze_missing_config() {
    let output = run_cli(&[
        "analyze",
        &fixture("daily_ohlcv.csv"),
        "--config",
        "/nonexistent/engine.toml",
    ]);
    assert_failure(&output, "failed to parse configuration");
}

// =============================================================================
// Patterns, gaps, trend
// =============================================================================

#[test]
fn test_pattern_catalog() {
    let output = run_cli(&["patterns", &fixture("daily_ohlcv.csv"), "--list"]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "key,id,name,description");
    assert_eq!(lines.len(), 8);
    assert!(lines.iter().any(|l| l.starts_with("CDLENGULFING,engulfing,Engulfing Pattern,")));
}

#[test]
fn test_patterns_drop_unmatched() {
    let output = run_cli(&[
        "patterns",
        &fixture("daily_ohlcv.csv"),
        "--only",
        "CDLENGULFING,doji",
        "--drop-unmatched",
    ]);
    assert_success(&output);
    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("date,CDLENGULFING,CDLDOJI"));
    for line in lines {
        let cells: Vec<&str> = line.split(',').collect();
        assert!(cells[1..].iter().any(|c| !c.is_empty()), "unmatched row kept: {line}");
    }
}

#[test]
fn test_patterns_json_events() {
    let output = run_cli(&["patterns", &fixture("daily_ohlcv.csv"), "-f", "json"]);
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    for event in json.as_array().unwrap() {
        let strength = event["strength"].as_i64().unwrap();
        assert!(strength == 100 || strength == -100);
        assert!(event["timestamp"].is_string());
    }
}

#[test]
fn test_unknown_pattern() {
    let output = run_cli(&["patterns", &fixture("daily_ohlcv.csv"), "--only", "bogus"]);
    assert_failure(&output, "unknown candlestick pattern 'bogus'");
}

#[test]
fn test_gaps_over_weekends() {
    let output = run_cli(&["gaps", &fixture("daily_ohlcv.csv")]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "start,end");
    assert_eq!(lines[1], "2024-01-06,2024-01-08");
    assert_eq!(lines.len(), 12);
}

#[test]
fn test_gaps_rejects_zero_threshold() {
    let output = run_cli(&["gaps", &fixture("daily_ohlcv.csv"), "--threshold-hours", "0"]);
    assert_failure(&output, "must be positive");
}

#[test]
fn test_trend_appends_forecast_rows() {
    let output = run_cli(&["trend", &fixture("close_only.csv"), "10"]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,close,trend,upper,lower");
    assert_eq!(lines.len(), 41);

    let last: Vec<&str> = lines[40].split(',').collect();
    assert_eq!(last[0], "2024-04-09");
    assert!(last[1].is_empty());
    let forecast: f64 = last[2].parse().unwrap();
    assert!((forecast - 29.5).abs() < 1e-9);
}

#[test]
fn test_quote_period_return() {
    let output = run_cli(&["quote", &fixture("close_only.csv"), "-f", "json"]);
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    // closes rise from 10.0 to 24.5 over the file
    let period = &json["period_return"];
    assert_eq!(period["first_close"], 10.0);
    assert_eq!(period["last_close"], 24.5);
    assert!((period["percent"].as_f64().unwrap() - 145.0).abs() < 1e-9);
    assert_eq!(period["direction"], "up");

    let last = &json["price_change"];
    assert_eq!(last["previous_close"], 24.0);
    assert!((last["change"].as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn test_quote_csv_rows() {
    let output = run_cli(&["quote", &fixture("close_only.csv")]);
    assert_success(&output);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("last_bar,"));
    assert!(lines[2].starts_with("period,"));
    assert!(lines[2].ends_with(",up"));
}

// =============================================================================
// Input errors and logging
// =============================================================================

#[test]
fn test_invalid_number_reports_line() {
    let output = run_cli(&["sma", &fixture("invalid_number.csv"), "2"]);
    assert_failure(&output, "line 3");
}

#[test]
fn test_bad_date_reports_value() {
    let output = run_cli(&["ema", &fixture("bad_date.csv")]);
    assert_failure(&output, "'02/01/2024'");
}

#[test]
fn test_missing_input_file() {
    let output = run_cli(&["roc", "/nonexistent/prices.csv"]);
    assert_failure(&output, "I/O error");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let output = run_cli(&["-v", "roc", &fixture("close_only.csv"), "3"]);
    assert_success(&output);
    assert!(stderr(&output).contains("loaded series"));
    assert!(stdout(&output).starts_with("date,roc_3\n"));
}
