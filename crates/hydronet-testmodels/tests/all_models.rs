// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::panic)]

use hydronet_core::{NetworkError, Violation};
use hydronet_io::{read_model, write_model};
use hydronet_testmodels::{constructors, invalid_constructors};

#[test]
fn every_valid_model_validates() {
    for (name, build) in constructors() {
        let model = build().unwrap_or_else(|e| panic!("{name}: {e:#}"));
        model
            .validate()
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn every_invalid_model_is_rejected_by_the_validator() {
    for (name, build) in invalid_constructors() {
        let model = build().unwrap_or_else(|e| panic!("{name}: {e:#}"));
        let Err(NetworkError::Validation(report)) = model.validate() else {
            panic!("{name} validated");
        };
        assert!(
            report
                .violations()
                .iter()
                .all(|v| matches!(v, Violation::DegreeBelowMinimum { .. })),
            "{name}: {report}"
        );
    }
}

#[test]
fn every_valid_model_survives_a_write_read_cycle() {
    let dir = tempfile::tempdir().unwrap();
    for (name, build) in constructors() {
        let model = build().unwrap();
        let path = dir.path().join(name).join("hydronet.toml");
        write_model(&model, &path).unwrap_or_else(|e| panic!("{name}: {e}"));
        let back = read_model(&path).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(back.config, model.config, "{name}");
        assert_eq!(
            back.graph().content_hash().unwrap(),
            model.graph().content_hash().unwrap(),
            "{name}"
        );
    }
}
