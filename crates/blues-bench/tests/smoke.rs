use std::fs;

use blues_bench::config::BenchmarkConfig;
use blues_bench::runner::GameRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, seed: u64) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: {seed}
  count: 3
  rotate_seats: true
seats:
  - name: "memory"
    strategy: "winprob-mem"
    params:
      reliability: 90
  - name: "winprob"
    strategy: "winprob"
    params:
      avoid_double_blue: true
  - name: "pursuer"
    strategy: "pursue:cheapest"
  - name: "random"
    strategy: "approach:random"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("games.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run(seed: u64) -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), seed);
    let outputs = config.resolved_outputs();
    let runner = GameRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("games complete");
    assert_eq!(summary.games_played, 3);
    assert_eq!(summary.rows_written, 12);
    assert!(summary.summary_path.exists(), "summary markdown missing");
    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    (dir, jsonl)
}

#[test]
fn bench_smoke_test_writes_one_row_per_seat() {
    let (_dir, jsonl) = run(4242);

    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 12);

    for game in rows.chunks(4) {
        let winners = game
            .iter()
            .filter(|row| row["won"].as_bool() == Some(true))
            .count();
        assert_eq!(winners, 1, "exactly one winner per game");

        let combined: i64 = game.iter().map(|row| row["total"].as_i64().expect("total")).sum();
        assert!(combined >= 400, "games run until combined totals reach 400");

        let seats: Vec<&str> = game.iter().map(|row| row["seat"].as_str().expect("seat")).collect();
        assert_eq!(seats, ["P1", "P2", "P3", "P4"]);
    }

    assert_eq!(rows[0]["bot"], "memory");
    assert_eq!(rows[4]["bot"], "winprob");
}

#[test]
fn bench_output_is_deterministic_for_a_seed() {
    let (_first_dir, first) = run(99);
    let (_second_dir, second) = run(99);
    assert_eq!(first, second);
}
