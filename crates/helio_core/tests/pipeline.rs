//! End-to-end snapshot tests against stub sources and synthetic kernels.

mod common;

use common::{EPOCH_JD, FixedSource, SyntheticFetcher, expected_max_abs};
use helio_core::{
    Body, EphemerisSource, KernelStatus, PLANETS, SnapshotConfig, SnapshotError, StateVector,
    build_document, round_to, run,
};

fn config_in(dir: &std::path::Path) -> SnapshotConfig {
    SnapshotConfig {
        kernel_url: "https://example.invalid/de440.bsp".into(),
        kernel_path: dir.join("data").join("de440.bsp"),
        output_path: dir.join("data").join("planets.json"),
        ..SnapshotConfig::default()
    }
}

#[test]
fn every_planet_has_two_component_vectors() {
    let doc = build_document(&FixedSource, &SnapshotConfig::default()).expect("document");
    assert_eq!(doc.planets.len(), 8);
    let value = serde_json::to_value(&doc).expect("to value");
    for body in PLANETS {
        let planet = &value["planets"][body.name()];
        assert_eq!(planet["pos"].as_array().map(Vec::len), Some(2), "{body}");
        assert_eq!(planet["vel"].as_array().map(Vec::len), Some(2), "{body}");
    }
}

#[test]
fn farthest_coordinate_lands_on_the_bound() {
    let doc = build_document(&FixedSource, &SnapshotConfig::default()).expect("document");
    let max_scaled = doc
        .planets
        .iter()
        .flat_map(|(_, r)| r.pos)
        .fold(0.0, |m: f64, c| m.max(c.abs()));
    assert!((max_scaled - 10.0).abs() <= 1e-5, "max scaled {max_scaled}");
    assert_eq!(doc.scale_factor, 10.0 / expected_max_abs());
}

#[test]
fn outputs_have_at_most_five_decimals() {
    let doc = build_document(&FixedSource, &SnapshotConfig::default()).expect("document");
    for (body, record) in doc.planets.iter() {
        for c in record.pos.into_iter().chain(record.vel) {
            assert_eq!(round_to(c, 5), c, "{body} component {c}");
        }
    }
}

/// Fractional digits a JSON number token carries, counting exponent shifts
/// (`1e-5` and `0.00001` both have five).
fn fractional_digits(token: &str) -> i32 {
    let (mantissa, exponent) = match token.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().expect("exponent")),
        None => (token, 0),
    };
    let fraction = match mantissa.split_once('.') {
        Some((_, f)) => f.len() as i32,
        None => 0,
    };
    (fraction - exponent).max(0)
}

fn number_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .collect()
}

#[test]
fn fractional_digit_counting() {
    assert_eq!(fractional_digits("10.0"), 1);
    assert_eq!(fractional_digits("-4.07859"), 5);
    assert_eq!(fractional_digits("1e-5"), 5);
    assert_eq!(fractional_digits("1.5e-6"), 7);
    assert_eq!(fractional_digits("2.5E3"), 0);
    assert_eq!(
        number_tokens(r#""pos": [-0.5, 1e-5]"#),
        vec!["-0.5", "1e-5"]
    );
}

#[test]
fn written_planet_numbers_have_at_most_five_decimals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    run(&config, &SyntheticFetcher::new()).expect("run");

    let text = std::fs::read_to_string(&config.output_path).expect("read output");
    let start = text.find("\"planets\"").expect("planets key");
    let end = text.find("\"scale_factor\"").expect("scale_factor key");
    let tokens = number_tokens(&text[start..end]);
    assert_eq!(tokens.len(), 8 * 4);
    for token in tokens {
        assert!(
            fractional_digits(token) <= 5,
            "{token} has too many decimals"
        );
    }
}

#[test]
fn smallest_rounded_values_serialise_within_five_decimals() {
    struct Tiny;
    impl EphemerisSource for Tiny {
        fn state(&self, target: Body, _: Body, _: f64) -> Result<StateVector, SnapshotError> {
            let (position_au, velocity_au_day) = match target {
                Body::Sun => ([0.0; 3], [0.0; 3]),
                Body::Neptune => ([10.0, 0.0, 0.0], [0.000_01, -0.000_014, 0.0]),
                _ => ([0.000_006, 0.000_004, 0.0], [0.000_005, 0.0, 0.0]),
            };
            Ok(StateVector {
                position_au,
                velocity_au_day,
            })
        }
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("planets.json");
    let doc = build_document(&Tiny, &SnapshotConfig::default()).expect("document");
    assert_eq!(doc.scale_factor, 1.0);
    doc.write(&path).expect("write");

    let text = std::fs::read_to_string(&path).expect("read");
    let start = text.find("\"planets\"").expect("planets key");
    for token in number_tokens(&text[start..]) {
        assert!(
            fractional_digits(token) <= 5,
            "{token} has too many decimals"
        );
    }
    let neptune = doc.planets.get(Body::Neptune).expect("neptune");
    assert_eq!(neptune.vel, [0.000_01, -0.000_01]);
}

#[test]
fn single_planet_matches_hand_computation() {
    let config = SnapshotConfig {
        planets: vec![Body::Mars],
        ..SnapshotConfig::default()
    };
    let doc = build_document(&FixedSource, &config).expect("document");
    let mars = doc.planets.get(Body::Mars).expect("mars");

    // Mars - Sun = (-0.602, 1.476) AU; scale = 10 / 1.476.
    assert_eq!(doc.scale_factor, 10.0 / 1.476);
    assert_eq!(mars.pos, [-4.07859, 10.0]);
    // (-0.012495, -0.003693) AU/day scaled by the same factor.
    assert_eq!(mars.vel, [-0.08465, -0.02502]);
}

#[test]
fn all_zero_positions_give_zero_scale() {
    struct Origin;
    impl EphemerisSource for Origin {
        fn state(&self, _: Body, _: Body, _: f64) -> Result<StateVector, SnapshotError> {
            Ok(StateVector {
                position_au: [0.0; 3],
                velocity_au_day: [0.3, -0.2, 0.1],
            })
        }
    }
    let doc = build_document(&Origin, &SnapshotConfig::default()).expect("document");
    assert_eq!(doc.scale_factor, 0.0);
    for (_, record) in doc.planets.iter() {
        assert_eq!(record.pos, [0.0; 2]);
        assert_eq!(record.vel, [0.0; 2]);
    }
}

#[test]
fn invalid_config_is_rejected_before_querying() {
    let config = SnapshotConfig {
        planets: vec![],
        ..SnapshotConfig::default()
    };
    assert!(matches!(
        build_document(&FixedSource, &config),
        Err(SnapshotError::InvalidConfig(_))
    ));
}

#[test]
fn first_run_downloads_once_and_reruns_are_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    let fetcher = SyntheticFetcher::new();

    let first = run(&config, &fetcher).expect("first run");
    assert!(matches!(first.kernel, KernelStatus::Downloaded { .. }));
    assert_eq!(fetcher.calls.get(), 1);
    assert!(config.kernel_path.exists());
    let first_bytes = std::fs::read(&config.output_path).expect("output written");

    let second = run(&config, &fetcher).expect("second run");
    assert_eq!(second.kernel, KernelStatus::AlreadyPresent);
    assert_eq!(fetcher.calls.get(), 1);
    let second_bytes = std::fs::read(&config.output_path).expect("output rewritten");
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.scale_factor, second.scale_factor);
    assert_eq!(second.planet_count, 8);
}

#[test]
fn kernel_run_agrees_with_stub_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    run(&config, &SyntheticFetcher::new()).expect("run");

    let text = std::fs::read_to_string(&config.output_path).expect("read");
    let written: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    let expected = build_document(&FixedSource, &config).expect("stub document");

    assert_eq!(written["epoch_jd"], EPOCH_JD);
    assert_eq!(written["frame"], "heliocentric ecliptic");
    assert_eq!(written["units"]["position"], "AU");
    assert_eq!(written["units"]["velocity"], "AU/day");
    let scale = written["scale_factor"].as_f64().expect("scale factor");
    assert!((scale - expected.scale_factor).abs() < 1e-9);

    for (body, record) in expected.planets.iter() {
        let planet = &written["planets"][body.name()];
        for (key, values) in [("pos", record.pos), ("vel", record.vel)] {
            for (k, want) in values.into_iter().enumerate() {
                let got = planet[key][k].as_f64().expect("number");
                assert!(
                    (got - want).abs() <= 1.1e-5,
                    "{body}.{key}[{k}]: {got} vs {want}"
                );
            }
        }
    }
}

#[test]
fn planet_keys_keep_solar_order() {
    let doc = build_document(&FixedSource, &SnapshotConfig::default()).expect("document");
    let json = doc.to_json_pretty().expect("json");
    let offsets: Vec<usize> = PLANETS
        .iter()
        .filter_map(|b| json.find(&format!("\"{}\"", b.name())))
        .collect();
    assert_eq!(offsets.len(), PLANETS.len());
    assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{offsets:?}");
    // Top-level keys follow the document layout.
    let epoch = json.find("\"epoch_jd\"").expect("epoch");
    let scale = json.find("\"scale_factor\"").expect("scale");
    assert!(epoch < offsets[0] && offsets[7] < scale);
}

#[test]
fn failed_download_stops_the_run() {
    struct Offline;
    impl helio_core::KernelFetcher for Offline {
        fn fetch(&self, url: &str, _: &std::path::Path) -> Result<u64, SnapshotError> {
            Err(SnapshotError::Http {
                url: url.to_string(),
                message: "connection refused".into(),
            })
        }
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    assert!(matches!(run(&config, &Offline), Err(SnapshotError::Http { .. })));
    assert!(!config.output_path.exists());
    assert!(!config.kernel_path.exists());
}

#[test]
fn corrupt_kernel_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::create_dir_all(config.kernel_path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&config.kernel_path, b"not a kernel").expect("seed");

    let err = run(&config, &SyntheticFetcher::new()).unwrap_err();
    assert!(matches!(err, SnapshotError::Kernel(_)));
    assert!(std::error::Error::source(&err).is_some());
}
