#![cfg(target_arch = "wasm32")]

use sierpinski_canvas::web::{bootstrap, WebSketch};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{window, Document, Event, HtmlCanvasElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    window().expect("window").document().expect("document")
}

fn mount(prefix: &str) -> (String, String, HtmlInputElement) {
    let document = document();
    let body = document.body().expect("body");

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .expect("canvas element")
        .dyn_into()
        .expect("canvas type");
    canvas.set_id(&format!("{prefix}-canvas"));
    canvas.set_width(300);
    canvas.set_height(300);
    body.append_child(&canvas).expect("mount canvas");

    let slider: HtmlInputElement = document
        .create_element("input")
        .expect("input element")
        .dyn_into()
        .expect("input type");
    slider.set_id(&format!("{prefix}-slider"));
    slider.set_type("range");
    slider.set_min("0");
    slider.set_max("6");
    slider.set_value("1");
    body.append_child(&slider).expect("mount slider");

    (canvas.id(), slider.id(), slider)
}

fn slide_to(slider: &HtmlInputElement, value: &str) {
    slider.set_value(value);
    let event = Event::new("input").expect("input event");
    slider.dispatch_event(&event).expect("dispatch input");
}

#[wasm_bindgen_test]
fn bootstrap_installs_a_console_logger() {
    bootstrap();
    assert!(log::max_level() >= log::LevelFilter::Info);
    log::info!("logger reachable from the browser build");
}

#[wasm_bindgen_test]
fn slider_input_redraws_at_the_new_depth() {
    let (canvas_id, slider_id, slider) = mount("live");
    let sketch = WebSketch::new(canvas_id, slider_id, None).expect("sketch attaches");
    assert_eq!(sketch.depth(), 1);

    slide_to(&slider, "4");
    assert_eq!(sketch.depth(), 4);
}

#[wasm_bindgen_test]
fn dropped_sketch_stops_listening_to_the_slider() {
    let (canvas_id, slider_id, slider) = mount("dropped");
    let first = WebSketch::new(canvas_id.clone(), slider_id.clone(), None).expect("first sketch");
    drop(first);

    // Only the replacement may react; a stale listener would invoke a freed closure.
    let second = WebSketch::new(canvas_id, slider_id, None).expect("second sketch");
    slide_to(&slider, "3");
    assert_eq!(second.depth(), 3);
}

#[wasm_bindgen_test]
fn missing_canvas_is_a_fatal_error() {
    let (_, slider_id, _) = mount("missing");
    assert!(WebSketch::new("no-such-canvas".into(), slider_id, None).is_err());
}
