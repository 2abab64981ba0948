//! Report phase end to end: persisted state on disk, real HTTP client,
//! local mock of the grading service.

use std::time::Duration;

use httptest::matchers::{contains, json_decoded, request};
use httptest::responders::status_code;
use httptest::{Expectation, Server, all_of};
use serde_json::Value;

use hexlet_check::config::Config;
use hexlet_check::course::FilesData;
use hexlet_check::docker::DockerCli;
use hexlet_check::pipeline::{CheckData, CheckTaskResult, Pipeline, ReportOutcome};
use hexlet_check::remote::HttpTransport;
use hexlet_check::state::{self, FileStateStore, StateKey, StateStore};
use hexlet_check::CheckError;

fn transport() -> HttpTransport {
    HttpTransport::new("token", "c2VjcmV0", Duration::from_secs(5)).unwrap()
}

fn seed(store: &FileStateStore, url: &str, assignment: &std::path::Path) {
    store.save(StateKey::CheckCreatePath, url).unwrap();
    store.save(StateKey::CheckState, "success").unwrap();
    state::save_json(
        store,
        StateKey::FilesData,
        &FilesData {
            source_files: vec!["solution.py".into()],
            test_files: vec!["test_solution.py".into()],
        },
    )
    .unwrap();
    store
        .save(StateKey::AssignmentPath, assignment.to_str().unwrap())
        .unwrap();
    state::save_json(
        store,
        StateKey::CheckData,
        &CheckData {
            test_data: CheckTaskResult::passed("3 passed\n".into()),
            lint_data: CheckTaskResult::passed(String::new()),
        },
    )
    .unwrap();
}

#[test]
fn report_posts_check_to_saved_route() {
    let dir = tempfile::tempdir().unwrap();
    let assignment = dir.path().join("assignment");
    std::fs::create_dir_all(&assignment).unwrap();
    std::fs::write(assignment.join("solution.py"), "print('hi')\n").unwrap();

    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api_internal/courses/c/lessons/l/assignment/check"),
            request::headers(contains(("x-auth-key", "token"))),
            request::body(json_decoded(|body: &Value| {
                let check = &body["check"];
                check["state"] == "success"
                    && check["testData"]["passed"] == true
                    && check["sourceContents"]["solution.py"] == "print('hi')\n"
                    && check["testContents"]["test_solution.py"] == ""
            })),
        ])
        .respond_with(status_code(201)),
    );

    let store = FileStateStore::new(dir.path().join("state"), "1");
    let url = server
        .url("/api_internal/courses/c/lessons/l/assignment/check")
        .to_string();
    seed(&store, &url, &assignment);

    let runner = DockerCli::new();
    let transport = transport();
    let cfg = Config::default();
    let outcome = Pipeline::new(&runner, &transport, &store, &cfg)
        .report()
        .unwrap();

    assert_eq!(outcome, ReportOutcome::Submitted);
}

#[test]
fn report_surfaces_rejection_body() {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method("POST"))
            .respond_with(status_code(500).body(r#"{"error":"internal"}"#)),
    );

    let store = FileStateStore::new(dir.path(), "1");
    seed(&store, &server.url("/check").to_string(), dir.path());

    let runner = DockerCli::new();
    let transport = transport();
    let cfg = Config::default();
    let err = Pipeline::new(&runner, &transport, &store, &cfg)
        .report()
        .unwrap_err();

    match err {
        CheckError::UnrecognizedResponse { details } => assert!(details.contains("internal")),
        other => panic!("expected UnrecognizedResponse, got {other:?}"),
    }
}

#[test]
fn report_without_state_makes_no_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path(), "never-ran");

    let runner = DockerCli::new();
    let transport = transport();
    let cfg = Config::default();
    let outcome = Pipeline::new(&runner, &transport, &store, &cfg)
        .report()
        .unwrap();

    assert_eq!(outcome, ReportOutcome::NothingToReport);
}
