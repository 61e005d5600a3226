//! Engine state and transitions.
//!
//! A single owned container for everything the renderer reads: the current
//! analysis (tokens + tensor), the layer/head selection, the hover state,
//! and the fetch flags. Mutation happens only through the transition methods
//! here; each caller follows a transition with a render pass.

use attention::AttentionTensor;

/// Pointer interaction over the source-token column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Hovering(usize),
}

/// The two fixed visual modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Diagram,
    Heatmap,
}

/// All session state owned by the engine instance.
pub struct AppState {
    pub tokens: Vec<String>,
    pub tensor: AttentionTensor,
    pub selected_layer: usize,
    pub selected_head: usize,
    pub hover: HoverState,
    pub view: ViewMode,
    pub loading: bool,
    pub error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            tensor: AttentionTensor::default(),
            selected_layer: 0,
            selected_head: 0,
            hover: HoverState::Idle,
            view: ViewMode::Diagram,
            loading: false,
            error: None,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Marks a fetch in flight. Returns false when one already is, so the
    /// submitting control cannot overlap its own requests.
    pub fn begin_fetch(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Install a successful analysis. Tokens and tensor swap together;
    /// selections and hover survive, clamped to the new shape.
    pub fn install_analysis(&mut self, tokens: Vec<String>, tensor: AttentionTensor) {
        self.tokens = tokens;
        self.tensor = tensor;
        self.loading = false;
        self.error = None;
        self.clamp_to_shape();
    }

    /// A failed fetch only surfaces a message; the previous analysis stays.
    pub fn fail_fetch(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn pointer_enter(&mut self, index: usize) {
        if index < self.token_count() {
            self.hover = HoverState::Hovering(index);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover = HoverState::Idle;
    }

    pub fn select_layer(&mut self, layer: usize) {
        self.selected_layer = layer;
        self.clamp_to_shape();
    }

    pub fn select_head(&mut self, head: usize) {
        self.selected_head = head;
        self.clamp_to_shape();
    }

    /// One-step layer navigation for the heatmap view.
    pub fn prev_layer(&mut self) {
        if self.selected_layer > 0 {
            self.selected_layer -= 1;
        }
    }

    pub fn next_layer(&mut self) {
        if self.selected_layer + 1 < self.tensor.layer_count() {
            self.selected_layer += 1;
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            ViewMode::Diagram => ViewMode::Heatmap,
            ViewMode::Heatmap => ViewMode::Diagram,
        };
    }

    /// Attention row for the hovered token under the current selection, or
    /// `None` while idle. Re-derived on every read, so a layer change while
    /// hovering picks up the new row without touching the hover itself.
    pub fn active_row(&self) -> Option<Vec<f32>> {
        match self.hover {
            HoverState::Idle => None,
            HoverState::Hovering(source) => {
                Some(self.tensor.row(self.selected_layer, source, self.token_count()))
            }
        }
    }

    /// Clamp selections and hover to the current tensor/token shape. Runs on
    /// every selection change and tensor swap; a smaller replacement tensor
    /// must never leave an index pointing past the end.
    fn clamp_to_shape(&mut self) {
        let layers = self.tensor.layer_count();
        if self.selected_layer >= layers {
            self.selected_layer = layers.saturating_sub(1);
        }
        let heads = self.tensor.head_count(self.selected_layer);
        if self.selected_head >= heads {
            self.selected_head = heads.saturating_sub(1);
        }
        if let HoverState::Hovering(index) = self.hover {
            let count = self.token_count();
            if count == 0 {
                self.hover = HoverState::Idle;
            } else if index >= count {
                self.hover = HoverState::Hovering(count - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed_state() -> AppState {
        let mut state = AppState::new();
        state.install_analysis(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            AttentionTensor::new(vec![
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                vec![
                    vec![0.2, 0.3, 0.5],
                    vec![0.5, 0.3, 0.2],
                    vec![0.1, 0.8, 0.1],
                ],
            ]),
        );
        state
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = AppState::new();
        assert_eq!(state.hover, HoverState::Idle);
        assert_eq!(state.selected_layer, 0);
        assert_eq!(state.selected_head, 0);
        assert!(state.active_row().is_none());
    }

    #[test]
    fn test_hover_transitions() {
        let mut state = analyzed_state();
        state.pointer_enter(1);
        assert_eq!(state.hover, HoverState::Hovering(1));
        state.pointer_leave();
        assert_eq!(state.hover, HoverState::Idle);
    }

    #[test]
    fn test_pointer_enter_past_end_is_ignored() {
        let mut state = analyzed_state();
        state.pointer_enter(10);
        assert_eq!(state.hover, HoverState::Idle);
    }

    #[test]
    fn test_selection_change_keeps_hover_and_rederives_row() {
        let mut state = analyzed_state();
        state.pointer_enter(0);
        assert_eq!(state.active_row(), Some(vec![1.0, 0.0, 0.0]));
        state.select_layer(1);
        assert_eq!(state.hover, HoverState::Hovering(0));
        assert_eq!(state.active_row(), Some(vec![0.2, 0.3, 0.5]));
    }

    #[test]
    fn test_smaller_tensor_swap_clamps_everything() {
        let mut state = analyzed_state();
        state.select_layer(1);
        state.pointer_enter(2);
        state.install_analysis(
            vec!["x".to_string()],
            AttentionTensor::new(vec![vec![vec![1.0]]]),
        );
        assert_eq!(state.selected_layer, 0);
        assert_eq!(state.hover, HoverState::Hovering(0));
    }

    #[test]
    fn test_loading_blocks_resubmission() {
        let mut state = AppState::new();
        assert!(state.begin_fetch());
        assert!(!state.begin_fetch());
        state.fail_fetch("backend unreachable".to_string());
        assert!(state.begin_fetch());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_analysis() {
        let mut state = analyzed_state();
        state.begin_fetch();
        state.fail_fetch("scoring request failed: 500".to_string());
        assert_eq!(state.token_count(), 3);
        assert_eq!(state.tensor.layer_count(), 2);
        assert_eq!(
            state.error.as_deref(),
            Some("scoring request failed: 500")
        );
        assert!(!state.loading);
    }

    #[test]
    fn test_layer_navigation_stops_at_bounds() {
        let mut state = analyzed_state();
        state.prev_layer();
        assert_eq!(state.selected_layer, 0);
        state.next_layer();
        assert_eq!(state.selected_layer, 1);
        state.next_layer();
        assert_eq!(state.selected_layer, 1);
    }

    #[test]
    fn test_view_toggle() {
        let mut state = AppState::new();
        assert_eq!(state.view, ViewMode::Diagram);
        state.toggle_view();
        assert_eq!(state.view, ViewMode::Heatmap);
        state.toggle_view();
        assert_eq!(state.view, ViewMode::Diagram);
    }
}
