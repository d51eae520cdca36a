use mockall::mock;
use rollout_core::{ImageTag, ReleaseTarget, ToolsConfig};
use rollout_runner::client::ToolClient;
use rollout_runner::executor::ToolExecutor;
use rollout_runner::tool::{Invocation, ToolError};
use std::path::{Path, PathBuf};

mock! {
    Executor {}

    impl ToolExecutor for Executor {
        async fn exec_streaming(&self, invocation: &Invocation) -> Result<(), ToolError>;
    }
}

fn client(mock: MockExecutor) -> ToolClient<MockExecutor> {
    ToolClient::with_executor(mock, ToolsConfig::default())
}

fn failed(program: &str) -> ToolError {
    ToolError::CommandFailed {
        invocation: Invocation::new(program),
        status: "exit status: 1".to_owned(),
    }
}

// ── git ──

#[tokio::test]
async fn clone_passes_url_and_target_dir() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| {
            inv.program == "git"
                && inv.args == ["clone", "https://github.com/org/app", "./app"]
                && inv.cwd.is_none()
        })
        .times(1)
        .returning(|_| Ok(()));

    let result = client(mock)
        .clone_repo("https://github.com/org/app", Path::new("./app"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn reset_tree_resets_then_cleans_inside_work_dir() {
    let mut mock = MockExecutor::new();
    let mut seq = mockall::Sequence::new();

    mock.expect_exec_streaming()
        .withf(|inv| {
            inv.args == ["reset", "--hard"] && inv.cwd.as_deref() == Some(Path::new("./app"))
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    mock.expect_exec_streaming()
        .withf(|inv| inv.args == ["clean", "-fdx"] && inv.cwd.as_deref() == Some(Path::new("./app")))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let result = client(mock).reset_tree(Path::new("./app")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn reset_failure_skips_clean() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| inv.has_arg("reset"))
        .times(1)
        .returning(|_| Err(failed("git")));

    // No expectation for `git clean`: a second call would panic.
    let result = client(mock).reset_tree(Path::new("./app")).await;

    assert!(matches!(result, Err(ToolError::CommandFailed { .. })));
}

#[tokio::test]
async fn checkout_runs_in_work_dir() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| {
            inv.program == "git"
                && inv.args == ["checkout", "abc123"]
                && inv.cwd.as_deref() == Some(Path::new("./app"))
        })
        .times(1)
        .returning(|_| Ok(()));

    let result = client(mock).checkout("abc123", Path::new("./app")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn checkout_unknown_commit_fails() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_| Err(failed("git")));

    let result = client(mock).checkout("nope", Path::new("./app")).await;

    assert!(matches!(result, Err(ToolError::CommandFailed { .. })));
}

// ── Build tool ──

#[tokio::test]
async fn clean_and_test_use_the_build_wrapper() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| inv.program == "./gradlew" && inv.args == ["clean"])
        .times(1)
        .returning(|_| Ok(()));

    mock.expect_exec_streaming()
        .withf(|inv| inv.program == "./gradlew" && inv.args == ["test"])
        .times(1)
        .returning(|_| Ok(()));

    let client = client(mock);
    assert!(client.clean_build(Path::new("./app")).await.is_ok());
    assert!(client.run_tests(Path::new("./app")).await.is_ok());
}

#[tokio::test]
async fn build_image_passes_full_tag() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| inv.args == ["bootBuildImage", "--imageName=demo:abc123"])
        .times(1)
        .returning(|_| Ok(()));

    let result = client(mock)
        .build_image(&ImageTag::new("demo", "abc123"), Path::new("./app"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn configured_build_tool_is_used() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| inv.program == "./mvnw" && inv.has_arg("clean"))
        .times(1)
        .returning(|_| Ok(()));

    let tools = ToolsConfig {
        build: "./mvnw".to_owned(),
        ..ToolsConfig::default()
    };
    let client = ToolClient::with_executor(mock, tools);

    assert!(client.clean_build(Path::new(".")).await.is_ok());
}

#[tokio::test]
async fn missing_wrapper_is_reported_as_spawn_error() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming().returning(|inv| {
        Err(ToolError::Spawn {
            program: inv.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let err = client(mock)
        .clean_build(Path::new("./app"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("./gradlew"), "got: {err}");
}

// ── helm ──

#[tokio::test]
async fn upgrade_sets_image_version_and_namespace() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|inv| {
            inv.program == "helm"
                && inv.args
                    == [
                        "upgrade",
                        "--install",
                        "rel1",
                        "./helm",
                        "--set",
                        "deployment.image.version=abc123",
                        "--namespace",
                        "default",
                    ]
                && inv.cwd == Some(PathBuf::from("./app"))
        })
        .times(1)
        .returning(|_| Ok(()));

    let release = ReleaseTarget {
        name: "rel1".to_owned(),
        chart_dir: "./helm".to_owned(),
        namespace: "default".to_owned(),
        image_version: "abc123".to_owned(),
    };
    let result = client(mock)
        .upgrade_release(&release, Path::new("./app"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn upgrade_failure_propagates() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_| Err(failed("helm")));

    let release = ReleaseTarget {
        name: "rel1".to_owned(),
        chart_dir: "./helm".to_owned(),
        namespace: "default".to_owned(),
        image_version: "abc123".to_owned(),
    };
    let result = client(mock)
        .upgrade_release(&release, Path::new("./app"))
        .await;

    assert!(matches!(result, Err(ToolError::CommandFailed { .. })));
}
