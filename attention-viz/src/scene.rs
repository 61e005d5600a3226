//! Scene assembly for the two visual modes.
//!
//! Builders here are pure: state plus geometry in, drawable primitives out.
//! The canvas code in `viz` only walks the returned structs, which keeps the
//! whole pipeline testable without a DOM.

use attention::{scale_color, weight_color, Rgb};

use crate::layout::LayoutProvider;
use crate::state::{AppState, HoverState};

/// Minimum opacity for a connection line. Keeps every target faintly
/// visible so the column structure stays readable under near-zero weights.
pub const OPACITY_FLOOR: f64 = 0.1;

/// Above this value a heatmap label flips to black; the scale's high end is
/// too light for white text.
pub const LABEL_FLIP_THRESHOLD: f32 = 0.5;

/// One source-to-target connection line. Coordinates are vertical centers
/// in the overlay frame; horizontal extents belong to the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionLine {
    pub target: usize,
    pub from_y: f64,
    pub to_y: f64,
    pub opacity: f64,
}

/// Connection-diagram scene: empty unless a source token is hovered.
#[derive(Debug, Default)]
pub struct ConnectionScene {
    pub lines: Vec<ConnectionLine>,
}

/// Build the connection scene for the current hover and selection.
pub fn connection_scene(state: &AppState, layout: &dyn LayoutProvider) -> ConnectionScene {
    let source = match state.hover {
        HoverState::Hovering(source) => source,
        HoverState::Idle => return ConnectionScene::default(),
    };
    let row = state
        .tensor
        .row(state.selected_layer, source, state.token_count());
    let from_y = layout.center_of(source);
    let lines = row
        .iter()
        .enumerate()
        .map(|(target, weight)| ConnectionLine {
            target,
            from_y,
            to_y: layout.center_of(target),
            opacity: (*weight as f64).max(OPACITY_FLOOR),
        })
        .collect();
    ConnectionScene { lines }
}

/// One heatmap cell with its formatted label.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub value: f32,
    pub fill: Rgb,
    pub label: String,
    pub label_color: &'static str,
}

/// Heatmap scene: N x N cells plus shared axis labels for the selected
/// layer.
#[derive(Debug, Default)]
pub struct HeatmapScene {
    pub size: usize,
    pub cells: Vec<HeatmapCell>,
    pub labels: Vec<String>,
}

/// Build the heatmap scene for the selected layer. A missing layer falls
/// through the accessor's zero default and renders as an all-white grid.
pub fn heatmap_scene(state: &AppState) -> HeatmapScene {
    let n = state.token_count();
    let mut cells = Vec::with_capacity(n * n);
    for i in 0..n {
        let row = state.tensor.row(state.selected_layer, i, n);
        for (j, value) in row.iter().enumerate() {
            cells.push(heatmap_cell(i, j, *value));
        }
    }
    HeatmapScene {
        size: n,
        cells,
        labels: state.tokens.clone(),
    }
}

fn heatmap_cell(row: usize, col: usize, value: f32) -> HeatmapCell {
    HeatmapCell {
        row,
        col,
        value,
        fill: weight_color(value),
        label: format!("{:.2}", value),
        label_color: if value > LABEL_FLIP_THRESHOLD {
            "black"
        } else {
            "white"
        },
    }
}

/// Uniform legend ramp: linear samples of the anchor scale, no gamma. The
/// legend communicates the palette itself, not the contrast-boosted mapping
/// applied to data cells.
pub fn legend_stops(count: usize) -> Vec<Rgb> {
    let last = count.saturating_sub(1).max(1);
    (0..count)
        .map(|index| scale_color(index as f64 / last as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedLayout;
    use attention::{AttentionTensor, SCALE_ANCHORS, ZERO_COLOR};

    fn identity_state() -> AppState {
        let mut state = AppState::new();
        state.install_analysis(
            vec!["a".to_string(), "b".to_string()],
            AttentionTensor::new(vec![vec![vec![1.0, 0.0], vec![0.0, 1.0]]]),
        );
        state
    }

    #[test]
    fn test_hovered_token_draws_one_line_per_target() {
        let mut state = identity_state();
        state.pointer_enter(0);
        let layout = FixedLayout::new(vec![10.0, 30.0]);
        let scene = connection_scene(&state, &layout);

        assert_eq!(scene.lines.len(), 2);
        assert_eq!(scene.lines[0].from_y, 10.0);
        assert_eq!(scene.lines[0].to_y, 10.0);
        assert_eq!(scene.lines[0].opacity, 1.0);
        assert_eq!(scene.lines[1].to_y, 30.0);
        assert_eq!(scene.lines[1].opacity, OPACITY_FLOOR);
    }

    #[test]
    fn test_idle_hover_draws_nothing() {
        let state = identity_state();
        let layout = FixedLayout::uniform(2, 20.0);
        assert!(connection_scene(&state, &layout).lines.is_empty());
    }

    #[test]
    fn test_missing_layer_floors_every_line() {
        let mut state = identity_state();
        state.pointer_enter(1);
        state.selected_layer = 7;
        let layout = FixedLayout::uniform(2, 20.0);
        let scene = connection_scene(&state, &layout);

        assert_eq!(scene.lines.len(), 2);
        assert!(scene.lines.iter().all(|line| line.opacity == OPACITY_FLOOR));
    }

    #[test]
    fn test_heatmap_labels_flip_at_threshold() {
        let above = heatmap_cell(0, 0, 0.6);
        assert_eq!(above.label_color, "black");
        assert_eq!(above.label, "0.60");

        let below = heatmap_cell(0, 1, 0.4);
        assert_eq!(below.label_color, "white");
        assert_eq!(below.label, "0.40");
    }

    #[test]
    fn test_heatmap_scene_covers_the_grid() {
        let state = identity_state();
        let scene = heatmap_scene(&state);
        assert_eq!(scene.size, 2);
        assert_eq!(scene.cells.len(), 4);
        assert_eq!(scene.labels, vec!["a".to_string(), "b".to_string()]);
        // Zero-weight cells carry the sentinel fill.
        assert_eq!(scene.cells[1].fill, ZERO_COLOR);
    }

    #[test]
    fn test_legend_is_gamma_free() {
        let stops = legend_stops(20);
        assert_eq!(stops.len(), 20);
        assert_eq!(stops[0], SCALE_ANCHORS[0]);
        assert_eq!(stops[19], SCALE_ANCHORS[4]);
    }
}
