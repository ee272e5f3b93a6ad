use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    config: PathBuf,
    todo: PathBuf,
    done: PathBuf,
}

fn workspace(todo_content: &str) -> Workspace {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    let todo = dir.path().join("todo.txt");
    let done = dir.path().join("done.txt");

    fs::write(&todo, todo_content).unwrap();
    fs::write(
        &config,
        format!(
            "[files]\ntodo = \"{}\"\ndone = \"{}\"\n",
            todo.to_string_lossy(),
            done.to_string_lossy()
        ),
    )
    .unwrap();

    Workspace {
        _dir: dir,
        config,
        todo,
        done,
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

#[test]
fn test_help_command() {
    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("roundtrip"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("archive"));
}

#[test]
fn test_roundtrip_file() {
    let ws = workspace("(A) 2023-01-01 Call mom +family\n\nx 2023-02-01 Pay rent\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("roundtrip").arg(&ws.todo).arg("--config").arg(&ws.config);

    cmd.assert().success().stdout(predicate::str::diff(format!(
        "Parse of {}:\n(A) 2023-01-01 Call mom +family\n\nx 2023-02-01 Pay rent\n\n",
        ws.todo.display()
    )));
}

#[test]
fn test_roundtrip_stdin() {
    let ws = workspace("");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("roundtrip")
        .arg("--config")
        .arg(&ws.config)
        .write_stdin("Buy milk +errands @shop\n");

    cmd.assert()
        .success()
        .stdout("Parse of <stdin>:\nBuy milk +errands @shop\n\n");
}

#[test]
fn test_roundtrip_rejects_bad_date() {
    let ws = workspace("");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("roundtrip")
        .arg("--config")
        .arg(&ws.config)
        .write_stdin("fine\n(A) 2023-13-01 Bad month\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2: invalid date '2023-13-01'"));
}

#[test]
fn test_add_command() {
    let ws = workspace("Existing task\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("add")
        .arg("Buy")
        .arg("milk")
        .arg("-p")
        .arg("A")
        .arg("--project")
        .arg("errands")
        .arg("--context")
        .arg("shop")
        .arg("--config")
        .arg(&ws.config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Added line 2"));

    assert_eq!(
        fs::read_to_string(&ws.todo).unwrap(),
        format!("Existing task\n(A) {} Buy milk +errands @shop\n", today())
    );
}

#[test]
fn test_add_rejects_bad_priority() {
    let ws = workspace("");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("add")
        .arg("Task")
        .arg("-p")
        .arg("7")
        .arg("--config")
        .arg(&ws.config);

    cmd.assert().failure();
}

#[test]
fn test_list_sorted_by_priority() {
    let ws = workspace("b\n(B) c\nx 2023-01-01 done\n(A) e\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("list").arg("--config").arg(&ws.config);

    cmd.assert()
        .success()
        .stdout("  4 (A) e\n  2 (B) c\n  1 b\n");
}

#[test]
fn test_list_done() {
    let ws = workspace("b\nx 2023-01-01 done\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("list").arg("--done").arg("--config").arg(&ws.config);

    cmd.assert().success().stdout("  2 x 2023-01-01 done\n");
}

#[test]
fn test_list_empty() {
    let ws = workspace("");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("list").arg("--config").arg(&ws.config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn test_list_json_format() {
    let ws = workspace("(A) Test task +proj\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("list")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&ws.config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"incomplete\""))
        .stdout(predicate::str::contains("\"description\": \"Test task\""))
        .stdout(predicate::str::contains("\"priority\": \"A\""));
}

#[test]
fn test_do_command() {
    let ws = workspace("(A) 2023-01-01 Call mom\nOther\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("do").arg("1").arg("--config").arg(&ws.config);

    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(&ws.todo).unwrap(),
        format!("x {} 2023-01-01 Call mom\nOther\n", today())
    );
}

#[test]
fn test_do_on_complete_task_fails() {
    let ws = workspace("x 2023-01-01 Done already\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("do").arg("1").arg("--config").arg(&ws.config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Line 1 has no incomplete task"));
    assert_eq!(
        fs::read_to_string(&ws.todo).unwrap(),
        "x 2023-01-01 Done already\n"
    );
}

#[test]
fn test_edit_command() {
    let ws = workspace("x 2023-02-01 2023-01-01 Pay rent\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("edit")
        .arg("1")
        .arg("Pay rent early")
        .arg("--project")
        .arg("home")
        .arg("--config")
        .arg(&ws.config);

    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(&ws.todo).unwrap(),
        "2023-01-01 Pay rent early +home\n"
    );
}

#[test]
fn test_rm_command() {
    let ws = workspace("one\n\nthree\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("rm").arg("2").arg("--config").arg(&ws.config);

    cmd.assert().success();
    assert_eq!(fs::read_to_string(&ws.todo).unwrap(), "one\nthree\n");
}

#[test]
fn test_rm_out_of_range() {
    let ws = workspace("one\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("rm").arg("5").arg("--config").arg(&ws.config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Line 5 not found"));
}

#[test]
fn test_mv_command() {
    let ws = workspace("stay\nleave +away\n");
    let other = ws.todo.with_file_name("someday.txt");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("mv")
        .arg("2")
        .arg(&other)
        .arg("--config")
        .arg(&ws.config);

    cmd.assert().success();
    assert_eq!(fs::read_to_string(&ws.todo).unwrap(), "stay\n");
    assert_eq!(fs::read_to_string(&other).unwrap(), "leave +away\n");
}

#[test]
fn test_mv_to_same_file_is_refused() {
    let ws = workspace("one\ntwo\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("mv")
        .arg("1")
        .arg(&ws.todo)
        .arg("--config")
        .arg(&ws.config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Destination is the source file"));
    assert_eq!(fs::read_to_string(&ws.todo).unwrap(), "one\ntwo\n");
}

#[test]
fn test_archive_into_todo_file_is_refused() {
    let ws = workspace("x 2023-01-01 a\nopen\n");
    fs::write(
        &ws.config,
        format!(
            "[files]\ntodo = \"{0}\"\ndone = \"{0}\"\n",
            ws.todo.to_string_lossy()
        ),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("archive").arg("--config").arg(&ws.config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Destination is the source file"));
    assert_eq!(
        fs::read_to_string(&ws.todo).unwrap(),
        "x 2023-01-01 a\nopen\n"
    );
}

#[test]
fn test_archive_all() {
    let ws = workspace("x 2023-01-01 a\nopen\nx 2023-01-03 c\n");
    fs::write(&ws.done, "x 2022-12-01 old\n").unwrap();

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("archive").arg("--config").arg(&ws.config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Archived 2 task(s)"));
    assert_eq!(fs::read_to_string(&ws.todo).unwrap(), "open\n");
    assert_eq!(
        fs::read_to_string(&ws.done).unwrap(),
        "x 2022-12-01 old\nx 2023-01-01 a\nx 2023-01-03 c\n"
    );
}

#[test]
fn test_archive_single_requires_complete() {
    let ws = workspace("open\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("archive").arg("1").arg("--config").arg(&ws.config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no complete task"));
    assert!(!ws.done.exists());
}

#[test]
fn test_projects_and_contexts() {
    let ws = workspace("a +zeta @home\nx 2023-01-01 b +alpha @work\nc +zeta\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("projects").arg("--config").arg(&ws.config);
    cmd.assert().success().stdout("+alpha\n+zeta\n");

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("contexts").arg("--config").arg(&ws.config);
    cmd.assert().success().stdout("@home\n@work\n");
}

#[test]
fn test_file_flag_overrides_config() {
    let ws = workspace("from config\n");
    let other = ws.todo.with_file_name("other.txt");
    fs::write(&other, "from flag\n").unwrap();

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("list")
        .arg("--file")
        .arg(&other)
        .arg("--config")
        .arg(&ws.config);

    cmd.assert().success().stdout("  1 from flag\n");
}

#[test]
fn test_config_command() {
    let ws = workspace("");
    fs::write(&ws.config, "[list]\nsort = \"start\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("todofile");
    cmd.arg("config").arg("--config").arg(&ws.config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sort = \"start\""))
        .stdout(predicate::str::contains("done = \"~/.todo/done.txt\""));
}
