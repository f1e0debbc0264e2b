//! End-to-end tests of the mk binary against fake `make` and `go` executables

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATE: &str = include_str!("../templates/makefile-mkgo.mk");
const SCRATCH: &str = ".makefile-mkgo.mk";

/// A project directory plus a bin directory holding fake tools
struct Sandbox {
    project: TempDir,
    bin: TempDir,
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self {
            project: TempDir::new().unwrap(),
            bin: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        };
        sandbox.install_fake("make");
        sandbox.install_fake("go");
        sandbox
    }

    /// Fake tool that records its arguments, GOFLAGS, and whether the
    /// scratch makefile existed while it ran. `FAKE_EXIT` sets its exit
    /// code and `FAKE_SIGNAL` makes it kill itself with SIGKILL.
    fn install_fake(&self, name: &str) {
        let log = self.log_prefix(name);
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{log}.args'\n\
             printf '%s' \"$GOFLAGS\" > '{log}.env'\n\
             if [ -f {SCRATCH} ]; then cp {SCRATCH} '{log}.script'; fi\n\
             if [ -n \"$FAKE_SIGNAL\" ]; then kill -9 $$; fi\n\
             exit ${{FAKE_EXIT:-0}}\n",
            log = log.display(),
        );
        let path = self.bin.path().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn log_prefix(&self, name: &str) -> PathBuf {
        self.home.path().join(format!("{name}-log"))
    }

    fn mk(&self) -> Command {
        let path = format!(
            "{}:{}",
            self.bin.path().display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::cargo_bin("mk").unwrap();
        cmd.current_dir(self.project.path())
            .env("PATH", path)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join("config"))
            .env_remove("GOFLAGS")
            .env_remove("MK_COMPILER")
            .env_remove("FAKE_EXIT")
            .env_remove("FAKE_SIGNAL")
            .env_remove("CLICOLOR_FORCE");
        cmd
    }

    fn recorded(&self, tool: &str, kind: &str) -> Option<String> {
        fs::read_to_string(format!("{}.{kind}", self.log_prefix(tool).display())).ok()
    }

    fn project_file(&self, name: &str) -> PathBuf {
        self.project.path().join(name)
    }
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_show_default_prints_template_without_side_effects() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .arg("-show-default")
        .assert()
        .success()
        .stdout(TEMPLATE);

    assert!(fs::read_dir(sandbox.project.path()).unwrap().next().is_none());
    assert!(sandbox.recorded("make", "args").is_none());
}

#[test]
fn test_version() {
    Sandbox::new()
        .mk()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("mk version: {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_verbose_race_compiler_test_target() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .args(["-v", "-race", "-compiler=gc", "test"])
        .assert()
        .success();

    let args = sandbox.recorded("make", "args").unwrap();
    assert_eq!(lines(&args), vec!["-f", SCRATCH, "test"]);
    assert_eq!(
        sandbox.recorded("make", "env").unwrap(),
        " -v -race -compiler=gc"
    );
    assert_eq!(sandbox.recorded("make", "script").unwrap(), TEMPLATE);
    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_failing_child_reports_single_line_and_exits_one() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .mk()
        .args(["-v", "-race", "-compiler=gc", "test"])
        .env("FAKE_EXIT", "2")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = String::from_utf8(output.stderr).unwrap();
    let errors: Vec<&str> = stderr.lines().filter(|l| l.starts_with("error")).collect();
    assert_eq!(
        errors,
        vec!["error: running make -f .makefile-mkgo.mk test: exit status: 2"]
    );
    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_failure_without_verbose_prints_only_the_diagnostic() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .arg("build")
        .env("FAKE_EXIT", "1")
        .assert()
        .code(1)
        .stderr("error: running make -f .makefile-mkgo.mk build: exit status: 1\n");
}

#[test]
fn test_killed_child_reports_single_line_and_exits_one() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .mk()
        .arg("test")
        .env("FAKE_SIGNAL", "1")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = String::from_utf8(output.stderr).unwrap();
    let stderr_lines = lines(&stderr);
    assert_eq!(stderr_lines.len(), 1, "unexpected stderr: {stderr:?}");
    assert!(stderr_lines[0].starts_with("error: running make -f .makefile-mkgo.mk test: signal: 9"));
    assert_eq!(sandbox.recorded("make", "script").unwrap(), TEMPLATE);
    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_existing_makefile_is_used_and_kept() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("Makefile"), "all:\n\t@true\n").unwrap();

    sandbox.mk().assert().success();

    let args = sandbox.recorded("make", "args").unwrap();
    assert_eq!(lines(&args), vec!["-f", "Makefile"]);
    assert!(sandbox.recorded("make", "script").is_none());
    assert_eq!(
        fs::read_to_string(sandbox.project_file("Makefile")).unwrap(),
        "all:\n\t@true\n"
    );
    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_explicit_makefile_writes_no_template() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("Makefile"), "all:\n").unwrap();

    sandbox
        .mk()
        .args(["-f", "Makefile-my.mk", "install"])
        .assert()
        .success();

    let args = sandbox.recorded("make", "args").unwrap();
    assert_eq!(lines(&args), vec!["-f", "Makefile-my.mk", "install"]);
    assert!(sandbox.recorded("make", "script").is_none());
    assert!(!sandbox.project_file("Makefile-my.mk").exists());
}

#[test]
fn test_preexisting_scratch_makefile_is_not_overwritten_or_removed() {
    let sandbox = Sandbox::new();
    let user_content = "all:\n\t@echo user-owned\n";
    fs::write(sandbox.project_file(SCRATCH), user_content).unwrap();

    sandbox.mk().args(["-f", SCRATCH]).assert().success();

    assert_eq!(sandbox.recorded("make", "script").unwrap(), user_content);
    assert_eq!(
        fs::read_to_string(sandbox.project_file(SCRATCH)).unwrap(),
        user_content
    );
}

#[test]
fn test_prior_goflags_kept_as_prefix() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .env("GOFLAGS", "-mod=vendor")
        .arg("build")
        .assert()
        .success();

    assert_eq!(
        sandbox.recorded("make", "env").unwrap(),
        "-mod=vendor -compiler=gc"
    );
}

#[test]
fn test_compiler_from_environment() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .env("MK_COMPILER", "gccgo")
        .assert()
        .success();

    assert_eq!(sandbox.recorded("make", "env").unwrap(), " -compiler=gccgo");
}

#[test]
fn test_missing_make_is_a_launch_error() {
    let sandbox = Sandbox::new();
    let empty_bin = TempDir::new().unwrap();

    sandbox
        .mk()
        .env("PATH", empty_bin.path())
        .arg("test")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with(
            "error: running make -f .makefile-mkgo.mk test: ",
        ));

    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_direct_mode_defaults_to_fetching_dependencies() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("mk.toml"), "mode = \"direct\"\n").unwrap();

    sandbox.mk().arg("-race").assert().success();

    let args = sandbox.recorded("go", "args").unwrap();
    assert_eq!(lines(&args), vec!["get", "./..."]);
    assert_eq!(sandbox.recorded("go", "env").unwrap(), " -race -compiler=gc");
    assert!(sandbox.recorded("make", "args").is_none());
    assert!(!sandbox.project_file(SCRATCH).exists());
}

#[test]
fn test_direct_mode_passes_targets_through() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("mk.toml"), "mode = \"direct\"\n").unwrap();

    sandbox
        .mk()
        .args(["--", "test", "-run", "TestParse", "./..."])
        .assert()
        .success();

    let args = sandbox.recorded("go", "args").unwrap();
    assert_eq!(lines(&args), vec!["test", "-run", "TestParse", "./..."]);
}

#[test]
fn test_project_config_sets_compiler_and_makefile() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.project_file("mk.toml"),
        "compiler = \"llgo\"\nmakefile = \"build.mk\"\n",
    )
    .unwrap();

    sandbox.mk().arg("bench").assert().success();

    let args = sandbox.recorded("make", "args").unwrap();
    assert_eq!(lines(&args), vec!["-f", "build.mk", "bench"]);
    assert_eq!(sandbox.recorded("make", "env").unwrap(), " -compiler=llgo");
}

#[test]
fn test_invalid_config_fails() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("mk.toml"), "mode = \"sideways\"\n").unwrap();

    sandbox
        .mk()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration error in [mk.toml]"));

    assert!(sandbox.recorded("make", "args").is_none());
}

#[test]
fn test_show_prints_generated_template_and_cleans_up() {
    let sandbox = Sandbox::new();

    sandbox.mk().arg("-show").assert().success().stdout(TEMPLATE);

    assert!(!sandbox.project_file(SCRATCH).exists());
    assert!(sandbox.recorded("make", "args").is_none());
}

#[test]
fn test_show_prints_discovered_makefile() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project_file("Makefile"), "all:\n\t@echo mine\n").unwrap();

    sandbox
        .mk()
        .arg("--show")
        .assert()
        .success()
        .stdout("all:\n\t@echo mine\n");
}

#[test]
fn test_show_missing_explicit_makefile_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .mk()
        .args(["-show", "-f", "nope.mk"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: opening file [nope.mk]: "));
}

#[test]
fn test_unwritable_directory_is_a_write_error() {
    let sandbox = Sandbox::new();
    let project = sandbox.project.path();
    fs::set_permissions(project, fs::Permissions::from_mode(0o555)).unwrap();

    // root ignores directory permissions
    let probe = project.join("probe");
    if fs::write(&probe, "").is_ok() {
        fs::remove_file(&probe).unwrap();
        fs::set_permissions(project, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    sandbox
        .mk()
        .arg("test")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with(
            "error: creating file [.makefile-mkgo.mk]: ",
        ));

    fs::set_permissions(project, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(sandbox.recorded("make", "args").is_none());
    assert!(!Path::new(&project.join(SCRATCH)).exists());
}
