// gavel-cli/src/commands/validate.rs
//
// The validate subcommand: runs the file-level precondition gate over a
// list of media paths and reports per-file verdicts.

use std::path::Path;

use anyhow::Result;
use log::info;
use serde_json::json;

use gavel_core::probe::AUDIO_EXTENSIONS;
use gavel_core::{FileCheck, QualityValidator};

use crate::cli::ValidateArgs;
use crate::logging::get_timestamp;
use crate::output::{print_check, print_heading, print_summary};

/// Execute the validate command. Returns whether every file passed.
pub fn execute_validate(args: ValidateArgs) -> Result<bool> {
    let validator = QualityValidator::default();
    info!(
        "validation run {} over {} file(s)",
        get_timestamp(),
        args.paths.len()
    );

    let results: Vec<(&Path, FileCheck)> = args
        .paths
        .iter()
        .map(|path| {
            let check = if is_audio_path(path) {
                validator.validate_audio_file(path)
            } else {
                validator.validate_video_file(path)
            };
            (path.as_path(), check)
        })
        .collect();

    let passed = results.iter().filter(|(_, c)| c.is_valid).count();
    let failed = results.len() - passed;

    if args.json {
        let report: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, check)| {
                json!({
                    "path": path.display().to_string(),
                    "is_valid": check.is_valid,
                    "message": check.message,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(report));
    } else {
        print_heading("Media Validation");
        for (path, check) in &results {
            print_check(path, check);
        }
        print_summary(passed, failed);
    }

    Ok(failed == 0)
}

/// Audio files are routed to the audio validator; everything else goes to
/// the video validator, which rejects unknown extensions with a clear
/// message.
fn is_audio_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.as_str()))
}
