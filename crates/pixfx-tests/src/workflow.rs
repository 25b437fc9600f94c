//! Load -> edit -> render -> save workflows across crates.

use crate::fixtures::scene;
use pixfx_color::{GradientStop, Rgb8};
use pixfx_ops::GradientMapSettings;
use pixfx_pipeline::{
    EffectKind, EffectSettings, EffectStack, RenderSession, SessionConfig, StepOutcome, project,
    render, render_with_report,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn edited_stack() -> EffectStack {
    let mut stack = EffectStack::with_kinds([
        EffectKind::Adjust,
        EffectKind::Pixelate,
        EffectKind::GradientMap,
        EffectKind::Glitch,
    ]);
    let ids: Vec<_> = stack.instances().iter().map(|i| i.id.clone()).collect();
    stack
        .patch_settings(&ids[0], &json!({"contrast": 25, "hue": 40}))
        .unwrap();
    stack
        .patch_settings(&ids[1], &json!({"mode": "voronoi", "voronoiPoints": 30, "seed": 5}))
        .unwrap();
    stack
        .patch_settings(
            &ids[2],
            &json!({"stops": [
                {"position": 0, "color": "#101040"},
                {"position": 100, "color": "#ffd080"}
            ], "blendMode": "overlay", "opacity": 0.8}),
        )
        .unwrap();
    stack.set_enabled(&ids[3], false).unwrap();
    stack.duplicate(&ids[1]).unwrap();
    stack.reorder(2, 0).unwrap();
    stack
}

#[test]
fn test_project_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("look.json");
    let stack = edited_stack();

    project::save(&stack, &path).unwrap();
    let loaded = project::load(&path).unwrap();
    assert_eq!(loaded, stack);

    let img = scene(40, 30);
    assert_eq!(render(&img, &loaded), render(&img, &stack));
}

#[test]
fn test_png_render_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");

    pixfx_io::write(&input, &scene(33, 21)).unwrap();
    let src = pixfx_io::read(&input).unwrap();
    let stack = edited_stack();
    let rendered = render(&src, &stack);
    pixfx_io::write(&output, &rendered).unwrap();

    assert_eq!(pixfx_io::read(&output).unwrap(), rendered);
}

#[test]
fn test_bad_step_does_not_stop_the_stack() {
    let img = scene(24, 24);
    let mut stack = EffectStack::new();
    stack.add_with(EffectSettings::GradientMap(GradientMapSettings {
        stops: vec![GradientStop::new(50.0, Rgb8::WHITE)],
        ..Default::default()
    }));
    let invert = stack.add(EffectKind::Adjust);
    stack.patch_settings(&invert, &json!({"invert": true})).unwrap();

    let (out, report) = render_with_report(&img, &stack);
    assert!(matches!(report.steps[0].outcome, StepOutcome::Failed(_)));
    assert_eq!(report.steps[1].outcome, StepOutcome::Applied);

    let expected = stack.resolve(&invert).unwrap().apply(&img).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn test_failed_project_load_keeps_stack() {
    let mut stack = edited_stack();
    let before = stack.clone();
    let broken = r#"{"version": 1, "effectInstances": [{"id": "x", "type": "blur"}],
                     "instanceSettings": {"x": {"type": "blur", "radius": "wide"}}}"#;
    assert!(stack.load_json(broken).is_err());
    assert_eq!(stack, before);
}

#[test]
fn test_session_publishes_latest_request() {
    let session = RenderSession::new(SessionConfig {
        debounce: Duration::from_millis(30),
    });
    let src = Arc::new(scene(32, 32));

    let mut stack = EffectStack::with_kinds([EffectKind::Posterize]);
    session.request(Arc::clone(&src), stack.clone());
    stack.add(EffectKind::Vignette);
    let last = session.request(Arc::clone(&src), stack.clone());

    let frame = session.wait_for(last, Duration::from_secs(10)).unwrap();
    assert_eq!(frame.generation, last);
    assert_eq!(*frame.raster, render(&src, &stack));
}
