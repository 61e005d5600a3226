//! Main visualization module for the attention app.
//!
//! Builds the DOM chrome, owns the global state cell, wires pointer and
//! control events to state transitions, and draws the assembled scenes onto
//! the overlay and heatmap canvases.

use attention::{clean_tokens, ZERO_COLOR};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
    HtmlInputElement, HtmlSelectElement, KeyboardEvent,
};

use crate::fetch::fetch_attention;
use crate::layout::DomLayout;
use crate::scene::{connection_scene, heatmap_scene, legend_stops};
use crate::state::{AppState, HoverState, ViewMode};

// Color palette
const BG_COLOR: &str = "#1a1a1a";
const CONTROL_BG: &str = "#333333";
const CONTROL_BORDER: &str = "#666666";
const TEXT_COLOR: &str = "#ffffff";
const TOKEN_COLOR: &str = "#c8c8c8";
const TOKEN_HOVER_BG: &str = "rgba(255, 255, 255, 0.1)";
const LINE_COLOR: &str = "#ffa500";
const GRID_STROKE: &str = "#333333";
const ERROR_COLOR: &str = "#ff4444";

// Layout constants
const TOKEN_COLUMN_WIDTH: f64 = 150.0;
const LINE_WIDTH: f64 = 5.0;
const CELL_SIZE: f64 = 80.0;
const HEATMAP_MARGIN: f64 = 100.0;
const LEGEND_WIDTH: f64 = 300.0;
const LEGEND_HEIGHT: f64 = 30.0;
const LEGEND_STOPS: usize = 20;

const DEFAULT_TEXT: &str = "The quick brown fox jumped over the lazy cat";

// Global state (needed for WASM callbacks)
thread_local! {
    static STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
}

/// Initialize the visualization
pub fn init() -> Result<(), JsValue> {
    log("Initializing attention visualization");

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    STATE.with(|state| *state.borrow_mut() = Some(AppState::new()));

    create_ui(&document)?;
    setup_window_handlers(&window)?;
    render();

    // Analyze the default text on startup
    run_analysis();

    Ok(())
}

/// Create the page chrome: header controls, the two token columns with the
/// connection overlay, the heatmap panel, and the error toast.
fn create_ui(document: &Document) -> Result<(), JsValue> {
    let body = document.body().ok_or("No body")?;
    body.set_attribute(
        "style",
        &format!(
            "margin: 0; background: {}; color: {}; font-family: monospace;",
            BG_COLOR, TEXT_COLOR
        ),
    )?;

    // Header
    let header: HtmlElement = document.create_element("div")?.dyn_into()?;
    header.set_attribute(
        "style",
        "padding: 20px; border-bottom: 1px solid #333; display: flex; \
        flex-direction: column; gap: 12px;",
    )?;

    let title: HtmlElement = document.create_element("h1")?.dyn_into()?;
    title.set_inner_text("Attention Visualization");
    title.set_attribute("style", "margin: 0; font-size: 24px;")?;
    header.append_child(&title)?;

    let controls: HtmlElement = document.create_element("div")?.dyn_into()?;
    controls.set_attribute(
        "style",
        "display: flex; align-items: center; gap: 12px; flex-wrap: wrap;",
    )?;

    // Layer / head selectors (diagram mode)
    let selector_row: HtmlElement = document.create_element("div")?.dyn_into()?;
    selector_row.set_id("selector-controls");
    selector_row.set_attribute("style", "display: flex; gap: 8px; align-items: center;")?;

    let layer_select = create_select(document, "layer-select")?;
    let layer_closure = Closure::wrap(Box::new(move || {
        on_layer_select();
    }) as Box<dyn Fn()>);
    layer_select
        .add_event_listener_with_callback("change", layer_closure.as_ref().unchecked_ref())?;
    layer_closure.forget();
    selector_row.append_child(&layer_select)?;

    let head_select = create_select(document, "head-select")?;
    let head_closure = Closure::wrap(Box::new(move || {
        on_head_select();
    }) as Box<dyn Fn()>);
    head_select
        .add_event_listener_with_callback("change", head_closure.as_ref().unchecked_ref())?;
    head_closure.forget();
    selector_row.append_child(&head_select)?;

    controls.append_child(&selector_row)?;

    // Analysis text input
    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_id("analysis-input");
    input.set_type("text");
    input.set_value(DEFAULT_TEXT);
    input.set_placeholder("Enter text to analyze...");
    input.set_attribute(
        "style",
        &format!(
            "flex: 1; max-width: 600px; padding: 6px 12px; background: {}; \
            border: 1px solid {}; color: {}; border-radius: 4px; font-size: 16px;",
            CONTROL_BG, CONTROL_BORDER, TEXT_COLOR
        ),
    )?;

    let submit_closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.key() == "Enter" {
            run_analysis();
        }
    }) as Box<dyn Fn(KeyboardEvent)>);
    input.add_event_listener_with_callback("keydown", submit_closure.as_ref().unchecked_ref())?;
    submit_closure.forget();
    controls.append_child(&input)?;

    // Analyze button
    let analyze_btn = create_button(document, "Analyze", "analyze-btn")?;
    let analyze_closure = Closure::wrap(Box::new(move || {
        run_analysis();
    }) as Box<dyn Fn()>);
    analyze_btn.set_onclick(Some(analyze_closure.as_ref().unchecked_ref()));
    analyze_closure.forget();
    controls.append_child(&analyze_btn)?;

    // View toggle
    let view_btn = create_button(document, "Heatmap", "view-btn")?;
    let view_closure = Closure::wrap(Box::new(move || {
        toggle_view_mode();
    }) as Box<dyn Fn()>);
    view_btn.set_onclick(Some(view_closure.as_ref().unchecked_ref()));
    view_closure.forget();
    controls.append_child(&view_btn)?;

    // Loading indicator
    let status: HtmlElement = document.create_element("span")?.dyn_into()?;
    status.set_id("status-label");
    status.set_attribute("style", "color: #999; font-size: 14px;")?;
    controls.append_child(&status)?;

    header.append_child(&controls)?;
    body.append_child(&header)?;

    // Connection diagram: source column, overlay canvas, target column
    let diagram: HtmlElement = document.create_element("div")?.dyn_into()?;
    diagram.set_id("diagram-view");
    diagram.set_attribute(
        "style",
        "display: flex; justify-content: space-between; position: relative; \
        max-width: 800px; margin: 0 auto; padding: 40px 20px;",
    )?;

    let source_column: HtmlElement = document.create_element("div")?.dyn_into()?;
    source_column.set_id("source-column");
    source_column.set_attribute(
        "style",
        &format!(
            "display: flex; flex-direction: column; align-items: flex-end; \
            gap: 4px; width: {}px; position: relative; z-index: 1;",
            TOKEN_COLUMN_WIDTH as i32
        ),
    )?;
    diagram.append_child(&source_column)?;

    // Decorative overlay; pointer events stay on the token labels beneath.
    let overlay: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    overlay.set_id("connection-overlay");
    overlay.set_attribute(
        "style",
        "position: absolute; left: 0; top: 0; width: 100%; height: 100%; \
        pointer-events: none; z-index: 0;",
    )?;
    diagram.append_child(&overlay)?;

    let target_column: HtmlElement = document.create_element("div")?.dyn_into()?;
    target_column.set_id("target-column");
    target_column.set_attribute(
        "style",
        &format!(
            "display: flex; flex-direction: column; align-items: flex-start; \
            gap: 4px; width: {}px; position: relative; z-index: 1;",
            TOKEN_COLUMN_WIDTH as i32
        ),
    )?;
    diagram.append_child(&target_column)?;
    body.append_child(&diagram)?;

    // Heatmap panel
    let heatmap: HtmlElement = document.create_element("div")?.dyn_into()?;
    heatmap.set_id("heatmap-view");
    heatmap.set_attribute("style", "display: none; padding: 20px;")?;

    let nav: HtmlElement = document.create_element("div")?.dyn_into()?;
    nav.set_attribute(
        "style",
        "display: flex; align-items: center; gap: 16px; margin-bottom: 20px;",
    )?;

    let prev_btn = create_button(document, "Previous Layer", "prev-layer-btn")?;
    let prev_closure = Closure::wrap(Box::new(move || {
        step_layer(-1);
    }) as Box<dyn Fn()>);
    prev_btn.set_onclick(Some(prev_closure.as_ref().unchecked_ref()));
    prev_closure.forget();
    nav.append_child(&prev_btn)?;

    let caption: HtmlElement = document.create_element("span")?.dyn_into()?;
    caption.set_id("layer-caption");
    caption.set_attribute("style", "font-size: 16px;")?;
    nav.append_child(&caption)?;

    let next_btn = create_button(document, "Next Layer", "next-layer-btn")?;
    let next_closure = Closure::wrap(Box::new(move || {
        step_layer(1);
    }) as Box<dyn Fn()>);
    next_btn.set_onclick(Some(next_closure.as_ref().unchecked_ref()));
    next_closure.forget();
    nav.append_child(&next_btn)?;
    heatmap.append_child(&nav)?;

    let heatmap_canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    heatmap_canvas.set_id("heatmap-canvas");
    heatmap_canvas.set_attribute("style", "max-width: 100%; height: auto; display: block;")?;
    heatmap.append_child(&heatmap_canvas)?;

    let legend_canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    legend_canvas.set_id("legend-canvas");
    legend_canvas.set_width(LEGEND_WIDTH as u32);
    legend_canvas.set_height((LEGEND_HEIGHT + 40.0) as u32);
    legend_canvas.set_attribute("style", "margin-top: 16px; display: block;")?;
    heatmap.append_child(&legend_canvas)?;
    body.append_child(&heatmap)?;

    // Error toast
    let toast: HtmlElement = document.create_element("div")?.dyn_into()?;
    toast.set_id("error-toast");
    toast.set_attribute(
        "style",
        &format!(
            "display: none; position: fixed; bottom: 20px; left: 50%; \
            transform: translateX(-50%); background: rgba(255, 68, 68, 0.1); \
            color: {}; border: 1px solid {}; border-radius: 4px; padding: 8px 16px;",
            ERROR_COLOR, ERROR_COLOR
        ),
    )?;
    body.append_child(&toast)?;

    Ok(())
}

/// Create a styled control button
fn create_button(document: &Document, text: &str, id: &str) -> Result<HtmlElement, JsValue> {
    let button: HtmlElement = document.create_element("button")?.dyn_into()?;
    button.set_id(id);
    button.set_inner_text(text);

    let style = button.style();
    style.set_property("padding", "6px 16px")?;
    style.set_property("background", CONTROL_BG)?;
    style.set_property("border", &format!("1px solid {}", CONTROL_BORDER))?;
    style.set_property("color", TEXT_COLOR)?;
    style.set_property("border-radius", "4px")?;
    style.set_property("cursor", "pointer")?;

    Ok(button)
}

fn create_select(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    let select: HtmlElement = document.create_element("select")?.dyn_into()?;
    select.set_id(id);
    select.set_attribute(
        "style",
        &format!(
            "padding: 4px 8px; background: {}; border: 1px solid {}; \
            color: {}; border-radius: 4px;",
            CONTROL_BG, CONTROL_BORDER, TEXT_COLOR
        ),
    )?;
    Ok(select)
}

/// Window-level handlers: a reflow invalidates every cached token center,
/// so re-render (and recapture layout) on resize.
fn setup_window_handlers(window: &web_sys::Window) -> Result<(), JsValue> {
    let resize_closure = Closure::wrap(Box::new(move || {
        render();
    }) as Box<dyn Fn()>);
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();
    Ok(())
}

// ==================== EVENT HANDLERS ====================

fn on_token_enter(index: usize) {
    STATE.with(|state| {
        if let Some(state) = state.borrow_mut().as_mut() {
            state.pointer_enter(index);
        }
    });
    render();
}

fn on_token_leave() {
    STATE.with(|state| {
        if let Some(state) = state.borrow_mut().as_mut() {
            state.pointer_leave();
        }
    });
    render();
}

fn on_layer_select() {
    if let Some(value) = read_select_value("layer-select") {
        STATE.with(|state| {
            if let Some(state) = state.borrow_mut().as_mut() {
                state.select_layer(value);
            }
        });
        render();
    }
}

fn on_head_select() {
    if let Some(value) = read_select_value("head-select") {
        STATE.with(|state| {
            if let Some(state) = state.borrow_mut().as_mut() {
                state.select_head(value);
            }
        });
        render();
    }
}

fn read_select_value(id: &str) -> Option<usize> {
    let document = web_sys::window()?.document()?;
    let select: HtmlSelectElement = document.get_element_by_id(id)?.dyn_into().ok()?;
    select.value().parse().ok()
}

fn step_layer(direction: i32) {
    STATE.with(|state| {
        if let Some(state) = state.borrow_mut().as_mut() {
            if direction < 0 {
                state.prev_layer();
            } else {
                state.next_layer();
            }
        }
    });
    render();
}

fn toggle_view_mode() {
    STATE.with(|state| {
        if let Some(state) = state.borrow_mut().as_mut() {
            state.toggle_view();
        }
    });
    render();
}

/// Kick off an analysis of the current input text. The loading flag blocks
/// a second submission while one is in flight; a superseding response from
/// another path would simply overwrite (last-resolved-wins).
fn run_analysis() {
    let text = read_input_text();
    if text.trim().is_empty() {
        return;
    }

    let started = STATE.with(|state| {
        state
            .borrow_mut()
            .as_mut()
            .map(|state| state.begin_fetch())
            .unwrap_or(false)
    });
    if !started {
        return;
    }

    log("Fetching attention data");
    render();

    wasm_bindgen_futures::spawn_local(async move {
        match fetch_attention(&text).await {
            Ok(response) => {
                let tokens = clean_tokens(&response.tokens);
                log(&format!(
                    "Received {} tokens, {} layers",
                    tokens.len(),
                    response.attention.layer_count()
                ));
                STATE.with(|state| {
                    if let Some(state) = state.borrow_mut().as_mut() {
                        state.install_analysis(tokens, response.attention);
                    }
                });
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    let _ = rebuild_token_columns(&document);
                    let _ = rebuild_selector_options(&document);
                }
            }
            Err(message) => {
                log(&format!("Fetch failed: {}", message));
                STATE.with(|state| {
                    if let Some(state) = state.borrow_mut().as_mut() {
                        state.fail_fetch(message);
                    }
                });
            }
        }
        render();
    });
}

fn read_input_text() -> String {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("analysis-input"))
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

// ==================== DOM REBUILDS ====================

/// Rebuild both token columns for the current sequence. Runs only when the
/// token list changes; per-token hover listeners go on the source column.
fn rebuild_token_columns(document: &Document) -> Result<(), JsValue> {
    let source_column = document.get_element_by_id("source-column").ok_or("no source column")?;
    let target_column = document.get_element_by_id("target-column").ok_or("no target column")?;
    source_column.set_inner_html("");
    target_column.set_inner_html("");

    let tokens = STATE.with(|state| {
        state
            .borrow()
            .as_ref()
            .map(|state| state.tokens.clone())
            .unwrap_or_default()
    });

    for (index, token) in tokens.iter().enumerate() {
        let source: HtmlElement = document.create_element("div")?.dyn_into()?;
        source.set_id(&format!("source-token-{}", index));
        source.set_inner_text(token);
        source.set_attribute(
            "style",
            &format!(
                "cursor: pointer; padding: 4px 8px; color: {}; font-size: 20px; \
                width: fit-content;",
                TOKEN_COLOR
            ),
        )?;

        let enter_closure = Closure::wrap(Box::new(move || {
            on_token_enter(index);
        }) as Box<dyn Fn()>);
        source.add_event_listener_with_callback(
            "mouseenter",
            enter_closure.as_ref().unchecked_ref(),
        )?;
        enter_closure.forget();

        let leave_closure = Closure::wrap(Box::new(move || {
            on_token_leave();
        }) as Box<dyn Fn()>);
        source.add_event_listener_with_callback(
            "mouseleave",
            leave_closure.as_ref().unchecked_ref(),
        )?;
        leave_closure.forget();
        source_column.append_child(&source)?;

        let target: HtmlElement = document.create_element("div")?.dyn_into()?;
        target.set_id(&format!("target-token-{}", index));
        target.set_inner_text(token);
        target.set_attribute(
            "style",
            &format!(
                "padding: 4px 8px; color: {}; font-size: 20px; width: fit-content;",
                TOKEN_COLOR
            ),
        )?;
        target_column.append_child(&target)?;
    }

    Ok(())
}

/// Repopulate the layer/head selectors from the current tensor shape, so an
/// out-of-range selection cannot be constructed through the UI.
fn rebuild_selector_options(document: &Document) -> Result<(), JsValue> {
    let (layers, heads, selected_layer, selected_head) = STATE.with(|state| {
        let state = state.borrow();
        let state = match state.as_ref() {
            Some(state) => state,
            None => return (0, 0, 0, 0),
        };
        (
            state.tensor.layer_count(),
            state.tensor.head_count(state.selected_layer),
            state.selected_layer,
            state.selected_head,
        )
    });

    fill_select(document, "layer-select", "Layer", layers, selected_layer)?;
    fill_select(document, "head-select", "Head", heads, selected_head)?;
    Ok(())
}

fn fill_select(
    document: &Document,
    id: &str,
    label: &str,
    count: usize,
    selected: usize,
) -> Result<(), JsValue> {
    let select: HtmlSelectElement = document
        .get_element_by_id(id)
        .ok_or("no select")?
        .dyn_into()?;
    select.set_inner_html("");
    for index in 0..count {
        let option: Element = document.create_element("option")?;
        option.set_attribute("value", &index.to_string())?;
        option.set_text_content(Some(&format!("{} {}", label, index + 1)));
        select.append_child(&option)?;
    }
    select.set_value(&selected.to_string());
    Ok(())
}

// ==================== RENDERING ====================

/// Render the current state: control chrome, then whichever view is active.
pub fn render() {
    let document = match web_sys::window().and_then(|window| window.document()) {
        Some(document) => document,
        None => return,
    };

    STATE.with(|state| {
        let state = state.borrow();
        let state = match state.as_ref() {
            Some(state) => state,
            None => return,
        };

        update_chrome(&document, state);
        match state.view {
            ViewMode::Diagram => {
                update_hover_highlight(&document, state);
                draw_connections(&document, state);
            }
            ViewMode::Heatmap => {
                draw_heatmap(&document, state);
                draw_legend(&document);
            }
        }
    });
}

/// Sync the header controls, view visibility, and error toast.
fn update_chrome(document: &Document, state: &AppState) {
    if let Some(status) = document.get_element_by_id("status-label") {
        status.set_text_content(Some(if state.loading { "Loading..." } else { "" }));
    }

    if let Some(button) = document.get_element_by_id("analyze-btn") {
        if state.loading {
            let _ = button.set_attribute("disabled", "true");
        } else {
            let _ = button.remove_attribute("disabled");
        }
        button.set_text_content(Some(if state.loading { "Loading..." } else { "Analyze" }));
    }

    if let Some(toast) = document.get_element_by_id("error-toast") {
        if let Some(toast) = toast.dyn_ref::<HtmlElement>() {
            match &state.error {
                Some(message) => {
                    toast.set_inner_text(message);
                    let _ = toast.style().set_property("display", "block");
                }
                None => {
                    let _ = toast.style().set_property("display", "none");
                }
            }
        }
    }

    let diagram_display = if state.view == ViewMode::Diagram { "flex" } else { "none" };
    if let Some(diagram) = document.get_element_by_id("diagram-view") {
        if let Some(diagram) = diagram.dyn_ref::<HtmlElement>() {
            let _ = diagram.style().set_property("display", diagram_display);
        }
    }
    if let Some(selectors) = document.get_element_by_id("selector-controls") {
        if let Some(selectors) = selectors.dyn_ref::<HtmlElement>() {
            let _ = selectors.style().set_property("display", diagram_display);
        }
    }
    if let Some(heatmap) = document.get_element_by_id("heatmap-view") {
        if let Some(heatmap) = heatmap.dyn_ref::<HtmlElement>() {
            let display = if state.view == ViewMode::Heatmap { "block" } else { "none" };
            let _ = heatmap.style().set_property("display", display);
        }
    }

    if let Some(button) = document.get_element_by_id("view-btn") {
        button.set_text_content(Some(match state.view {
            ViewMode::Diagram => "Heatmap",
            ViewMode::Heatmap => "Diagram",
        }));
    }

    // Heatmap navigation
    let layers = state.tensor.layer_count();
    if let Some(caption) = document.get_element_by_id("layer-caption") {
        let text = if layers == 0 {
            String::new()
        } else {
            format!("Layer {} of {}", state.selected_layer + 1, layers)
        };
        caption.set_text_content(Some(&text));
    }
    set_disabled(document, "prev-layer-btn", state.selected_layer == 0);
    set_disabled(
        document,
        "next-layer-btn",
        layers == 0 || state.selected_layer + 1 >= layers,
    );

    // Keep the selectors on the clamped selection after a tensor swap.
    if let Some(select) = document.get_element_by_id("layer-select") {
        if let Some(select) = select.dyn_ref::<HtmlSelectElement>() {
            select.set_value(&state.selected_layer.to_string());
        }
    }
    if let Some(select) = document.get_element_by_id("head-select") {
        if let Some(select) = select.dyn_ref::<HtmlSelectElement>() {
            select.set_value(&state.selected_head.to_string());
        }
    }
}

fn set_disabled(document: &Document, id: &str, disabled: bool) {
    if let Some(button) = document.get_element_by_id(id) {
        if disabled {
            let _ = button.set_attribute("disabled", "true");
        } else {
            let _ = button.remove_attribute("disabled");
        }
    }
}

/// Highlight the hovered source token the way the reference UI does.
fn update_hover_highlight(document: &Document, state: &AppState) {
    for index in 0..state.token_count() {
        if let Some(token) = document.get_element_by_id(&format!("source-token-{}", index)) {
            if let Some(token) = token.dyn_ref::<HtmlElement>() {
                let background = match state.hover {
                    HoverState::Hovering(hovered) if hovered == index => TOKEN_HOVER_BG,
                    _ => "transparent",
                };
                let _ = token.style().set_property("background", background);
            }
        }
    }
}

/// Draw the hover-driven connection lines onto the overlay canvas.
fn draw_connections(document: &Document, state: &AppState) {
    let overlay = match document.get_element_by_id("connection-overlay") {
        Some(element) => element,
        None => return,
    };
    let canvas: HtmlCanvasElement = match overlay.clone().dyn_into() {
        Ok(canvas) => canvas,
        Err(_) => return,
    };

    // Match the backing store to the rendered size before drawing; the
    // overlay stretches with the diagram container.
    let rect = overlay.get_bounding_client_rect();
    let width = rect.width();
    let height = rect.height();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let ctx = match context_2d(&canvas) {
        Some(ctx) => ctx,
        None => return,
    };
    ctx.clear_rect(0.0, 0.0, width, height);

    if matches!(state.hover, HoverState::Hovering(_))
        && state.selected_layer >= state.tensor.layer_count()
    {
        log("Selected layer missing from tensor; drawing zero-weight lines");
    }

    let layout = DomLayout::capture(document, &overlay, state.token_count());
    let scene = connection_scene(state, &layout);

    ctx.set_stroke_style_str(LINE_COLOR);
    ctx.set_line_width(LINE_WIDTH);
    for line in &scene.lines {
        ctx.set_global_alpha(line.opacity);
        ctx.begin_path();
        ctx.move_to(TOKEN_COLUMN_WIDTH, line.from_y);
        ctx.line_to(width - TOKEN_COLUMN_WIDTH, line.to_y);
        ctx.stroke();
    }
    ctx.set_global_alpha(1.0);
}

/// Draw the N x N heatmap grid with value labels and rotated column labels.
fn draw_heatmap(document: &Document, state: &AppState) {
    let canvas: HtmlCanvasElement = match document
        .get_element_by_id("heatmap-canvas")
        .and_then(|element| element.dyn_into().ok())
    {
        Some(canvas) => canvas,
        None => return,
    };

    let scene = heatmap_scene(state);
    let side = scene.size as f64 * CELL_SIZE + 2.0 * HEATMAP_MARGIN;
    canvas.set_width(side as u32);
    canvas.set_height(side as u32);

    let ctx = match context_2d(&canvas) {
        Some(ctx) => ctx,
        None => return,
    };

    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(0.0, 0.0, side, side);

    ctx.save();
    let _ = ctx.translate(HEATMAP_MARGIN, HEATMAP_MARGIN);

    for cell in &scene.cells {
        let x = cell.col as f64 * CELL_SIZE;
        let y = cell.row as f64 * CELL_SIZE;
        ctx.set_fill_style_str(&cell.fill.css());
        ctx.fill_rect(x, y, CELL_SIZE, CELL_SIZE);
        ctx.set_stroke_style_str(GRID_STROKE);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(x, y, CELL_SIZE, CELL_SIZE);

        ctx.set_fill_style_str(cell.label_color);
        ctx.set_font("14px monospace");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(&cell.label, x + CELL_SIZE / 2.0, y + CELL_SIZE / 2.0);
    }

    ctx.set_fill_style_str(TEXT_COLOR);
    ctx.set_font("16px monospace");
    for (index, label) in scene.labels.iter().enumerate() {
        let center = index as f64 * CELL_SIZE + CELL_SIZE / 2.0;

        // Row labels sit to the left of each row
        ctx.set_text_align("right");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(label, -10.0, center);

        // Column labels are rotated 45 degrees to avoid overlap
        ctx.save();
        let _ = ctx.translate(center, -10.0);
        let _ = ctx.rotate(-std::f64::consts::FRAC_PI_4);
        ctx.set_text_align("left");
        ctx.set_text_baseline("bottom");
        let _ = ctx.fill_text(label, 0.0, 0.0);
        ctx.restore();
    }

    ctx.restore();
}

/// Draw the legend: the linear reference ramp plus a distinguished white
/// swatch for exact zero.
fn draw_legend(document: &Document) {
    let canvas: HtmlCanvasElement = match document
        .get_element_by_id("legend-canvas")
        .and_then(|element| element.dyn_into().ok())
    {
        Some(canvas) => canvas,
        None => return,
    };
    let ctx = match context_2d(&canvas) {
        Some(ctx) => ctx,
        None => return,
    };

    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(0.0, 0.0, LEGEND_WIDTH, LEGEND_HEIGHT + 40.0);

    let stops = legend_stops(LEGEND_STOPS);
    let stop_width = LEGEND_WIDTH / stops.len() as f64;
    for (index, stop) in stops.iter().enumerate() {
        ctx.set_fill_style_str(&stop.css());
        // Overlap slightly so rounding never leaves seams between stops.
        ctx.fill_rect(index as f64 * stop_width, 0.0, stop_width + 1.0, LEGEND_HEIGHT);
    }

    ctx.set_fill_style_str(&ZERO_COLOR.css());
    ctx.fill_rect(0.0, 0.0, 30.0, LEGEND_HEIGHT);
    ctx.set_stroke_style_str("black");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(0.0, 0.0, 30.0, LEGEND_HEIGHT);

    ctx.set_fill_style_str(TEXT_COLOR);
    ctx.set_font("14px monospace");
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    let _ = ctx.fill_text("Zero", 0.0, LEGEND_HEIGHT + 25.0);
    let _ = ctx.fill_text("Low", 34.0, LEGEND_HEIGHT + 25.0);
    ctx.set_text_align("right");
    let _ = ctx.fill_text("High", LEGEND_WIDTH, LEGEND_HEIGHT + 25.0);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into().ok())
}

/// Log to browser console
pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
