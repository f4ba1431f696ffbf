// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::FakeProject;
use hdltest_runner::{
    backend::{BackendRegistry, SearchPath},
    errors::OrchestratorError,
    orchestrator::{OrchestratorOpts, RunStage},
};
use indoc::indoc;
use pretty_assertions::assert_eq;

const VLIB: &str = indoc! {r#"
    #!/bin/sh
    echo "vlib $*" >> calls.log
    mkdir -p "$1"
    echo "** Note: (vlib-47) Library $1 created."
"#};

const VCOM: &str = indoc! {r#"
    #!/bin/sh
    echo "vcom $*" >> calls.log
    for arg in "$@"; do
        case "$arg" in
            *bad.vhd) echo "** Error: $arg(3): near \"end\": syntax error"; exit 2 ;;
            *warn.vhd) echo "** Warning: $arg(7): (vcom-1246) Range is empty." ;;
        esac
    done
    echo "-- Compiling done"
"#};

// vsim exits 0 even when an assertion fires; only the output tells.
const VSIM: &str = indoc! {r##"
    #!/bin/sh
    for last in "$@"; do :; done
    echo "vsim $last" >> calls.log
    case "$last" in
        *_fail) echo "# ** Error: Assertion violation."; echo "#    Time: 20 ns" ;;
        *_warn) echo "# ** Warning: NUMERIC_STD.\"=\": metavalue detected" ;;
        *_crash) kill -9 $$ ;;
        *) echo "# ** Note: done" ;;
    esac
    exit 0
"##};

fn modelsim_project() -> FakeProject {
    let project = FakeProject::new();
    project.install("vlib", VLIB);
    project.install("vcom", VCOM);
    project.install("vsim", VSIM);
    project
}

#[test]
fn auto_detects_modelsim() {
    let project = modelsim_project();
    let registry = BackendRegistry::new(SearchPath::new([project.bin_dir()]));
    let backend = registry.create_backend("").expect("modelsim is installed");
    assert_eq!(backend.name(), "modelsim");
    assert_eq!(backend.install_path(), project.bin_dir());
}

#[test]
fn mixed_results() {
    let project = modelsim_project();
    let config = project.config(
        &["src/a.vhd", "tb/tb.vhd"],
        &["tb_ok", "tb_fail", "tb_warn", "tb_crash"],
    );
    let junit_path = project.root().join("target/junit.xml");

    let out = project.run(
        &config,
        OrchestratorOpts {
            junit_path: Some(junit_path.clone()),
            ..Default::default()
        },
    );
    assert_eq!(out.result.unwrap(), 1, "output: {}", out.output);
    assert_eq!(out.state.stage(), RunStage::Done);
    assert_eq!(out.state.passed(), 2);
    assert_eq!(out.state.failed(), 2);

    let results = out.state.test_results();
    assert!(!results["tb_ok"].error());
    assert!(results["tb_fail"].error());
    assert!(!results["tb_fail"].failure());
    assert!(results["tb_warn"].warning());
    assert!(!results["tb_warn"].error());
    assert!(results["tb_crash"].error());
    assert!(results["tb_crash"].failure());

    // Sources compile in order into the library, in the build directory.
    let src = project.root().canonicalize_utf8().unwrap();
    assert_eq!(
        project.calls(&config),
        [
            "vlib work".to_owned(),
            format!("vcom -2008 -work work {src}/src/a.vhd {src}/tb/tb.vhd"),
            "vsim work.tb_ok".to_owned(),
            "vsim work.tb_fail".to_owned(),
            "vsim work.tb_warn".to_owned(),
            "vsim work.tb_crash".to_owned(),
        ]
    );
    assert!(config.build_dir().join("work").is_dir());

    assert!(out.output.contains("# ** Error: Assertion violation."));
    assert!(out.output.contains("metavalue detected"));
    assert!(!out.output.contains("# ** Note: done"));

    let xml = std::fs::read_to_string(&junit_path).unwrap();
    assert!(xml.contains("could not run test"), "xml: {xml}");
    assert!(xml.contains("test failed"), "xml: {xml}");
}

#[test]
fn compile_error_is_fatal() {
    let project = modelsim_project();
    let config = project.config(&["a.vhd", "bad.vhd"], &["tb_ok"]);

    let out = project.run(
        &config,
        OrchestratorOpts {
            exit_zero: true,
            ..Default::default()
        },
    );
    let err = out.result.unwrap_err();
    assert!(matches!(err, OrchestratorError::CompileFailed), "{err:?}");
    assert_eq!(err.process_exit_code(), 1);
    assert_eq!(out.state.stage(), RunStage::CompileFailed);
    assert!(out.state.test_results().is_empty());
    assert!(
        project
            .calls(&config)
            .iter()
            .all(|call| !call.starts_with("vsim")),
        "no test-bench ran"
    );
    assert!(out.output.contains("syntax error"), "output: {}", out.output);
}

#[test]
fn compile_warning_shows_output() {
    let project = modelsim_project();
    let config = project.config(&["warn.vhd"], &["tb_ok"]);

    let out = project.run(&config, OrchestratorOpts::default());
    assert_eq!(out.result.unwrap(), 0);
    let compile = out.state.compile_result().expect("compiled");
    assert!(compile.warning());
    assert!(!compile.error());
    assert!(out.output.contains("Range is empty."), "output: {}", out.output);
    assert!(out.output.contains("Library work created."), "output: {}", out.output);
}

#[test]
fn simulator_removed_after_compile() {
    let project = modelsim_project();
    // Compiling removes vsim, so no test-bench can be started.
    project.install(
        "vcom",
        &format!("#!/bin/sh\nrm -f '{}'\necho compiled\n", project.bin_dir().join("vsim")),
    );
    let config = project.config(&["a.vhd"], &["tb_a", "tb_b"]);

    let out = project.run(&config, OrchestratorOpts::default());
    assert_eq!(out.result.unwrap(), 1);
    assert_eq!(out.state.failed(), 2);
    for result in out.state.test_results().values() {
        assert!(result.failure());
        assert!(
            result.output().starts_with("failed to execute"),
            "output: {}",
            result.output()
        );
    }
}
