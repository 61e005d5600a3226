//! Tests for the attention-viz crate: the full pipeline from a decoded
//! backend response through state transitions to assembled scenes.

use attention::{clean_tokens, AnalyzeResponse, AttentionTensor};

use crate::layout::{FixedLayout, LayoutProvider};
use crate::scene::{connection_scene, heatmap_scene, OPACITY_FLOOR};
use crate::state::{AppState, HoverState};

#[test]
fn test_response_to_connection_scene() {
    // A wire payload with raw tokenizer markers and an identity matrix.
    let json = r#"{"tokens": ["The", "Ġcat"], "attention": [[[1.0, 0.0], [0.0, 1.0]]]}"#;
    let response: AnalyzeResponse = serde_json::from_str(json).unwrap();

    let mut state = AppState::new();
    state.install_analysis(clean_tokens(&response.tokens), response.attention);
    assert_eq!(state.tokens, vec!["The".to_string(), "cat".to_string()]);

    state.pointer_enter(0);
    let layout = FixedLayout::new(vec![10.0, 30.0]);
    let scene = connection_scene(&state, &layout);

    assert_eq!(scene.lines.len(), 2);
    assert_eq!(scene.lines[0].opacity, 1.0);
    assert_eq!(scene.lines[1].opacity, OPACITY_FLOOR);
    assert_eq!(scene.lines[1].from_y, 10.0);
    assert_eq!(scene.lines[1].to_y, 30.0);
}

#[test]
fn test_idle_scene_is_empty_whatever_the_tensor_holds() {
    let mut state = AppState::new();
    state.install_analysis(
        vec!["a".to_string(), "b".to_string()],
        AttentionTensor::new(vec![vec![vec![0.9, 0.1], vec![0.4, 0.6]]]),
    );
    let layout = FixedLayout::uniform(2, 24.0);
    assert!(connection_scene(&state, &layout).lines.is_empty());
}

#[test]
fn test_absent_layer_renders_floor_lines_without_crashing() {
    let mut state = AppState::new();
    state.install_analysis(
        vec!["a".to_string(), "b".to_string()],
        AttentionTensor::default(),
    );
    state.pointer_enter(1);

    assert_eq!(state.active_row(), Some(vec![0.0, 0.0]));

    let layout = FixedLayout::uniform(2, 24.0);
    let scene = connection_scene(&state, &layout);
    assert_eq!(scene.lines.len(), 2);
    assert!(scene.lines.iter().all(|line| line.opacity == OPACITY_FLOOR));
}

#[test]
fn test_layer_switch_while_hovering_updates_opacities() {
    let mut state = AppState::new();
    state.install_analysis(
        vec!["a".to_string(), "b".to_string()],
        AttentionTensor::new(vec![
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        ]),
    );
    state.pointer_enter(0);

    let layout = FixedLayout::uniform(2, 24.0);
    let first = connection_scene(&state, &layout);
    assert_eq!(first.lines[0].opacity, 1.0);

    state.select_layer(1);
    assert_eq!(state.hover, HoverState::Hovering(0));
    let second = connection_scene(&state, &layout);
    assert_eq!(second.lines[0].opacity, OPACITY_FLOOR);
    assert_eq!(second.lines[1].opacity, 1.0);
}

#[test]
fn test_heatmap_scene_tracks_the_selected_layer() {
    let mut state = AppState::new();
    state.install_analysis(
        vec!["a".to_string(), "b".to_string()],
        AttentionTensor::new(vec![
            vec![vec![0.6, 0.4], vec![0.4, 0.6]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        ]),
    );

    let scene = heatmap_scene(&state);
    assert_eq!(scene.cells[0].label, "0.60");
    assert_eq!(scene.cells[0].label_color, "black");
    assert_eq!(scene.cells[1].label_color, "white");

    state.next_layer();
    let scene = heatmap_scene(&state);
    assert_eq!(scene.cells[0].label, "0.00");
    assert_eq!(scene.cells[1].label, "1.00");
}

#[test]
fn test_layout_snapshot_is_stable_between_reflows() {
    let layout = FixedLayout::uniform(5, 32.0);
    let before: Vec<f64> = (0..5).map(|index| layout.center_of(index)).collect();
    let after: Vec<f64> = (0..5).map(|index| layout.center_of(index)).collect();
    assert_eq!(before, after);
}
