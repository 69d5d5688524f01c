use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{create_dir_all, read_to_string, write};
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Creates a working dir with a nextjs docs cache and a config pointing at it.
fn create_project(format: &str) -> TempDir {
    let dir = tempdir().expect("Creating temp dir failed");
    let docs = dir.path().join(".agent-docs/nextjs/01-getting-started");
    create_dir_all(&docs).unwrap();
    write(docs.join("installation.mdx"), "# Installation\n\nInstall it.").unwrap();
    write(docs.join("setup.mdx"), "# Setup").unwrap();
    write(
        dir.path().join("agent-docs.yaml"),
        format!(
            "compress:\n  working_dir: .\n  format: {format}\n  target_bytes: 8192\nskills:\n  - id: nextjs\n    version: 16.0.0\n"
        ),
    )
    .expect("Writing temp config failed");
    dir
}

fn config_path(dir: &Path) -> std::path::PathBuf {
    dir.join("agent-docs.yaml")
}

#[test]
fn compress_cli_prints_v1_index() {
    let project = create_project("v1");
    let mut cmd = Command::cargo_bin("agent-docs").expect("Binary exists");

    cmd.arg("compress")
        .arg("--config")
        .arg(config_path(project.path()))
        .env_remove("AGENT_DOCS_FORMAT")
        .env_remove("AGENT_DOCS_TARGET_BYTES");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "[Next.js Docs Index]|root: ./.agent-docs/nextjs",
        ))
        .stdout(predicate::str::contains(
            "|01-getting-started:{installation.mdx,setup.mdx}",
        ));
}

#[test]
fn compress_cli_injects_into_manifest() {
    let project = create_project("v2");
    let manifest = project.path().join("AGENTS.md");
    write(&manifest, "# Project rules\n").unwrap();

    let mut cmd = Command::cargo_bin("agent-docs").expect("Binary exists");
    cmd.arg("compress")
        .arg("--config")
        .arg(config_path(project.path()))
        .arg("--inject")
        .env_remove("AGENT_DOCS_FORMAT")
        .env_remove("AGENT_DOCS_TARGET_BYTES");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Injected 1 index(es)"));

    let content = read_to_string(&manifest).unwrap();
    assert!(content.starts_with("# Project rules\n"));
    assert!(content.contains("<!-- AGENT-DOCS-START -->"));
    assert!(content.contains("|BREAKING: cookies()/headers() are now async"));
    assert!(content.contains("|01-getting-started:{installation,setup}"));
}

#[test]
fn stats_cli_prints_json() {
    let project = create_project("v1");
    let mut cmd = Command::cargo_bin("agent-docs").expect("Binary exists");
    cmd.arg("stats")
        .arg("--config")
        .arg(config_path(project.path()))
        .arg("--json")
        .env_remove("AGENT_DOCS_FORMAT")
        .env_remove("AGENT_DOCS_TARGET_BYTES");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"nextjs\""))
        .stdout(predicate::str::contains("\"reduction_percent\""));
}

#[test]
fn compress_cli_fails_for_unknown_skill() {
    let project = create_project("v1");
    let mut cmd = Command::cargo_bin("agent-docs").expect("Binary exists");
    cmd.arg("compress")
        .arg("--config")
        .arg(config_path(project.path()))
        .arg("--skill")
        .arg("rails");
    cmd.assert().failure();
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let msg = format!("{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use agent_docs::cli::{run, Cli, Commands};

    // A missing config still emits the initial event before failing.
    let cli = Cli {
        command: Commands::Compress {
            config: std::path::PathBuf::from("dummy.yaml"),
            skill: None,
            inject: false,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
