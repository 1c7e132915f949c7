//! End-to-end tests for the `folio` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PORTFOLIO: &str = r#"{
    "holdings": [
        { "symbol": "AAPL", "quantity": 10, "averageCost": 150, "currentPrice": 180, "sector": "Technology" },
        { "symbol": "VTI", "quantity": 5, "averageCost": 200, "currentPrice": 220, "isEtf": true }
    ],
    "transactions": [
        { "date": "2024-01-02", "symbol": "AAPL", "type": "BUY", "quantity": 10, "price": 150 },
        { "date": "2024-02-01", "symbol": "VTI", "type": "BUY", "quantity": 5, "price": 200 },
        { "date": "2024-03-01", "symbol": "AAPL", "type": "SPLIT", "quantity": 1, "price": 1 }
    ],
    "benchmarkSymbol": "SPY",
    "benchmarkPrices": { "2024-01-02": 100, "2024-02-01": 100, "2024-12-31": 100 }
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "benchmark_symbol = \"^GSPC\"\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn folio(&self) -> Command {
        let mut cmd = Command::cargo_bin("folio").unwrap();
        cmd.env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.path("config.toml"));
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("folio")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("metrics"))
        .stdout(predicate::str::contains("xirr"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_metrics_json() {
    let fx = Fixture::new();
    let input = fx.write("portfolio.json", PORTFOLIO);

    let output = fx
        .folio()
        .args(["metrics", "--format", "json", "--as-of", "2024-12-31", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["asOf"], "2024-12-31");
    assert_eq!(json["benchmark"]["symbol"], "SPY");
    assert_eq!(json["holdings"].as_array().unwrap().len(), 2);
    // the SPLIT row is dropped with a warning
    let warnings = json["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w.as_str().unwrap().contains("SPLIT")));
}

#[test]
fn test_metrics_table() {
    let fx = Fixture::new();
    let input = fx.write("portfolio.json", PORTFOLIO);

    fx.folio()
        .args(["metrics", "--as-of", "2024-12-31", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Portfolio Summary (2024-12-31)"))
        .stdout(predicate::str::contains("Total Value"))
        .stdout(predicate::str::contains("2900.00"))
        .stdout(predicate::str::contains("Technology"));
}

#[test]
fn test_metrics_missing_holdings_fails() {
    let fx = Fixture::new();
    let input = fx.write("bad.json", r#"{ "transactions": [] }"#);

    fx.folio()
        .args(["metrics", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("holdings"));
}

#[test]
fn test_metrics_rejects_bad_as_of() {
    let fx = Fixture::new();
    let input = fx.write("portfolio.json", PORTFOLIO);

    fx.folio()
        .args(["metrics", "--as-of", "31/12/2024", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn test_xirr_table() {
    let fx = Fixture::new();
    let flows = fx.write("flows.csv", "date,amount\n2023-01-01,-1000\n2024-01-01,2000\n");

    fx.folio()
        .args(["xirr", "--input"])
        .arg(&flows)
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00%"));
}

#[test]
fn test_xirr_indeterminate_is_na() {
    let fx = Fixture::new();
    let flows = fx.write("flows.csv", "date,amount\n2023-01-01,-1000\n2024-01-01,-500\n");

    let output = fx
        .folio()
        .args(["xirr", "--format", "json", "--input"])
        .arg(&flows)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["xirr"], "N/A");
    assert_eq!(json["flows"], 2);
}

#[test]
fn test_missing_explicit_config_fails() {
    let fx = Fixture::new();
    let flows = fx.write("flows.csv", "date,amount\n2023-01-01,-1000\n2024-01-01,2000\n");

    Command::cargo_bin("folio")
        .unwrap()
        .arg("--config")
        .arg(fx.path("nope.toml"))
        .args(["xirr", "--input"])
        .arg(&flows)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_config_init_then_show() {
    let fx = Fixture::new();
    let target = fx.path("nested/folio.toml");

    fx.folio()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .success();
    assert!(read(&target).contains("history_interval_days = 7"));

    // refuses to clobber
    fx.folio()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Command::cargo_bin("folio")
        .unwrap()
        .arg("--config")
        .arg(&target)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"benchmark_symbol\": \"^GSPC\""));
}

#[test]
fn test_config_from_env() {
    let fx = Fixture::new();
    let path = fx.write("env.toml", "benchmark_symbol = \"QQQ\"\n");

    Command::cargo_bin("folio")
        .unwrap()
        .env("FOLIO_CONFIG", &path)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QQQ"));
}
