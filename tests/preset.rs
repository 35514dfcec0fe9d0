//! Integration tests for running the preset scenarios.
use std::fs;
use strawberry_sim::cli::RunOpts;
use strawberry_sim::cli::preset::{handle_preset_run_command, preset_names};
use strawberry_sim::settings::Settings;
use tempfile::tempdir;

/// Run every preset twice with the same seed and check the results match.
#[test]
fn test_presets_reproducible() {
    unsafe { std::env::set_var("STRAWBERRY_SIM_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    for name in preset_names() {
        let results: Vec<String> = ["first", "second"]
            .iter()
            .map(|attempt| {
                let output_dir = tempdir.path().join(name).join(attempt);
                let opts = RunOpts {
                    output_dir: Some(output_dir.clone()),
                    seed: Some(2024),
                    iterations: Some(3),
                    ..Default::default()
                };
                handle_preset_run_command(name, &opts, Some(Settings::default())).unwrap();
                fs::read_to_string(output_dir.join("results.csv")).unwrap()
            })
            .collect();

        assert_eq!(results[0], results[1], "Preset {name} is not reproducible");
    }

    // An unknown preset name
    let opts = RunOpts {
        output_dir: Some(tempdir.path().join("unknown")),
        ..Default::default()
    };
    assert!(handle_preset_run_command("greenhouse", &opts, Some(Settings::default())).is_err());
}
