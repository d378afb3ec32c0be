//! Remediation suggestions
//!
//! Maps detected issues onto concrete corrective actions. One suggestion
//! is produced per issue type present, referencing every issue of that
//! type it addresses.

use serde_json::json;

use crate::issue::{ImprovementSuggestion, QualityIssue, Severity};

/// Build suggestions for a set of detected issues.
pub fn suggestions_for(issues: &[QualityIssue]) -> Vec<ImprovementSuggestion> {
    let mut suggestions = Vec::new();

    if let Some(s) = for_type(issues, "missing_frames", |related, _| {
        ImprovementSuggestion::new("rerender-shot", 1, "Re-render the shot; no frames were produced", 40.0)
            .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "low_sharpness", |related, _| {
        ImprovementSuggestion::new(
            "increase-render-samples",
            2,
            "Re-render at higher sampling or apply an unsharp mask",
            15.0,
        )
        .with_parameter("render_scale", json!(1.5))
        .with_parameter("unsharp_amount", json!(0.6))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "unnatural_movement", |related, worst| {
        let priority = if worst >= Severity::High { 1 } else { 2 };
        ImprovementSuggestion::new(
            "smooth-camera-motion",
            priority,
            "Smooth the camera motion curve or re-time the offending segment",
            12.0,
        )
        .with_parameter("smoothing_window_frames", json!(9))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "sudden_change", |related, _| {
        ImprovementSuggestion::new(
            "stabilize-exposure",
            3,
            "Stabilize exposure and lighting to remove brightness pops",
            8.0,
        )
        .with_parameter("max_brightness_step", json!(25))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "metallic_voice", |related, worst| {
        let priority = if worst >= Severity::High { 1 } else { 2 };
        ImprovementSuggestion::new(
            "resynthesize-voice",
            priority,
            "Re-synthesize the voice take with a higher-band vocoder setting",
            18.0,
        )
        .with_parameter("vocoder_bands", json!(48))
        .with_parameter("breathiness", json!(0.2))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "problematic_silence", |related, _| {
        ImprovementSuggestion::new(
            "fill-audio-gap",
            2,
            "Fill or trim the silent stretch; crossfade the edit points",
            10.0,
        )
        .with_parameter("crossfade_ms", json!(120))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    if let Some(s) = for_type(issues, "potential_low_contrast", |related, _| {
        ImprovementSuggestion::new(
            "boost-contrast",
            4,
            "Raise scene contrast or re-light the shot",
            5.0,
        )
        .with_parameter("contrast_gain", json!(1.2))
        .for_issues(related)
    }) {
        suggestions.push(s);
    }

    suggestions
}

fn for_type(
    issues: &[QualityIssue],
    issue_type: &str,
    build: impl FnOnce(&[&QualityIssue], Severity) -> ImprovementSuggestion,
) -> Option<ImprovementSuggestion> {
    let related: Vec<&QualityIssue> = issues
        .iter()
        .filter(|i| i.issue_type == issue_type)
        .collect();
    let worst = related.iter().map(|i| i.severity).max()?;
    Some(build(&related, worst))
}
