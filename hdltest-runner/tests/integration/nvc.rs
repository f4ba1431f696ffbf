// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::FakeProject;
use hdltest_runner::orchestrator::{OrchestratorOpts, RunStage};
use indoc::indoc;
use pretty_assertions::assert_eq;

const NVC: &str = indoc! {r#"
    #!/bin/sh
    echo "nvc $*" >> calls.log
    while [ "$#" -gt 0 ]; do
        case "$1" in
            -a) exit 0 ;;
            -e)
                case "$2" in
                    *_fail) echo "** Failure: $2: counter mismatch"; exit 1 ;;
                    *) echo "** Note: 100ns+0: finished $2"; exit 0 ;;
                esac
                ;;
        esac
        shift
    done
    exit 2
"#};

#[test]
fn nvc_runs_each_test_bench() {
    let project = FakeProject::new();
    project.install("nvc", NVC);
    let config = project.config(&["a.vhd"], &["tb_a", "tb_fail"]);

    let out = project.run(
        &config,
        OrchestratorOpts {
            simulator: "NVC".to_owned(),
            verbose: true,
            ..Default::default()
        },
    );
    assert_eq!(out.result.unwrap(), 1, "output: {}", out.output);
    assert_eq!(out.state.stage(), RunStage::Done);
    assert_eq!(out.state.passed(), 1);
    assert_eq!(out.state.failed(), 1);

    let src = project.root().canonicalize_utf8().unwrap();
    assert_eq!(
        project.calls(&config),
        [
            format!("nvc --work=work --std=2008 -a {src}/a.vhd"),
            "nvc --work=work --std=2008 -e tb_a -r".to_owned(),
            "nvc --work=work --std=2008 -e tb_fail -r".to_owned(),
        ]
    );

    // Verbose mode shows clean output too.
    assert!(out.output.contains("finished tb_a"), "output: {}", out.output);
    assert!(out.output.contains("fail tb_fail ("), "output: {}", out.output);
}

#[test]
fn exit_0_with_failures() {
    let project = FakeProject::new();
    project.install("nvc", NVC);
    let config = project.config(&["a.vhd"], &["tb_fail"]);

    let out = project.run(
        &config,
        OrchestratorOpts {
            exit_zero: true,
            ..Default::default()
        },
    );
    assert_eq!(out.result.unwrap(), 0);
    assert_eq!(out.state.failed(), 1);
    assert!(out.output.contains("Some failed!"));
}
