use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

/// Every stage failure must reach the exit code, so library and CLI code may
/// neither swallow errors (AL003) nor drop results silently (AL013).
/// Test code is excluded.
#[test]
fn stage_errors_are_never_swallowed() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");

    let analyzer = Analyzer::builder()
        .root(root)
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .exclude("examples/**")
        .rule(NoErrorSwallowing::new())
        .rule(NoSilentResultDrop::new())
        .build()
        .expect("build analyzer");

    let result = analyzer.analyze().expect("analyze");

    if result.has_violations_at(Severity::Warning) {
        let report = result.format_test_report(Severity::Warning);
        panic!("{report}");
    }
}
