//! End-to-end: build a repository, run the binary, check what it prints.

use std::path::Path;
use std::process::{Command, Output};

use git2::{Repository, Signature, Time};

const DAY: i64 = 86_400;
const EPOCH: i64 = 1_700_000_000;

fn commit(repo: &Repository, name: &str, email: &str, day: i64) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new(name, email, &Time::new(EPOCH + day * DAY, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parents)
        .unwrap();
}

fn numbered_lines(range: std::ops::Range<usize>) -> String {
    range.map(|i| format!("line {i}\n")).collect()
}

/// alice writes 8 lines of `owned.rs`, bob appends 2; bob also commits
/// once more elsewhere in the file history.
fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    std::fs::write(dir.path().join("owned.rs"), numbered_lines(0..8)).unwrap();
    commit(&repo, "Alice", "alice@example.com", 0);

    std::fs::write(dir.path().join("owned.rs"), numbered_lines(0..10)).unwrap();
    commit(&repo, "Bob", "bob@example.com", 1);

    std::fs::write(dir.path().join("shared.rs"), "x\n").unwrap();
    commit(&repo, "Bob", "bob@example.com", 2);

    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-owner"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "git-owner failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn ranks_owners_with_percentages() {
    let dir = fixture();
    let out = stdout(&run(dir.path(), &["owned.rs"]));

    // alice: 0.7 * 0.8 + 0.3 * 0.5 = 0.71, bob: 0.29
    assert_eq!(
        out,
        "# 1  alice@example.com  (71.0%)\n# 2  bob@example.com  (29.0%)\n"
    );
}

#[test]
fn most_likely_prints_only_the_owner() {
    let dir = fixture();
    let out = stdout(&run(dir.path(), &["-m", "--names", "owned.rs"]));
    assert_eq!(out, "Alice\n");
}

#[test]
fn multiple_files_get_headers() {
    let dir = fixture();
    let out = stdout(&run(dir.path(), &["owned.rs", "shared.rs"]));
    assert!(out.contains("-- owned.rs --"));
    assert!(out.contains("-- shared.rs --\n# 1  bob@example.com  (100.0%)"));
}

#[test]
fn only_log_uses_commit_counts() {
    let dir = fixture();
    let out = stdout(&run(dir.path(), &["--only-log", "owned.rs"]));
    // One commit each: tie broken by identity.
    assert_eq!(
        out,
        "# 1  alice@example.com  (50.0%)\n# 2  bob@example.com  (50.0%)\n"
    );
}

#[test]
fn max_commits_limits_the_log_signal() {
    let dir = fixture();
    let out = stdout(&run(
        dir.path(),
        &["--only-log", "--max-commits", "1", "--no-follow", "owned.rs"],
    ));

    assert_eq!(out, "# 1  bob@example.com  (100.0%)\n");
}

#[test]
fn json_output_is_structured() {
    let dir = fixture();
    let out = stdout(&run(dir.path(), &["--format", "json", "--blame-weight", "1", "owned.rs"]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    let report = &json[0]["report"];
    assert_eq!(json[0]["path"], "owned.rs");
    assert_eq!(report["estimatedOwner"], "alice@example.com");
    assert_eq!(report["totalLines"], 10);
    assert_eq!(report["totalCommits"], 2);
    assert_eq!(report["authors"][0]["blameLines"], 8);
}

#[test]
fn untracked_file_fails_with_no_history() {
    let dir = fixture();
    std::fs::write(dir.path().join("scratch.rs"), "wip\n").unwrap();

    let output = run(dir.path(), &["scratch.rs"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no history"), "unexpected stderr: {stderr}");
}

#[test]
fn config_file_sets_weights() {
    let dir = fixture();
    std::fs::write(
        dir.path().join(".git-owner.toml"),
        "[weights]\nblame_weight_coefficient = 0.0\ntop_n = 1\n",
    )
    .unwrap();

    let out = stdout(&run(dir.path(), &["owned.rs"]));
    assert_eq!(out, "# 1  alice@example.com  (50.0%)\n");
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = fixture();
    let output = run(dir.path(), &["-v", "owned.rs"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("contributor share"), "missing debug logs: {stderr}");
}
