#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{error, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Event, HtmlCanvasElement, HtmlElement, HtmlInputElement};

use crate::app::{CanvasViewport, Sketch};
use crate::fractal::MAX_DEPTH;
use crate::render::CanvasSurface;
use crate::settings::DrawSettings;

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Sierpinski drawing bound to a canvas and a range input.
#[wasm_bindgen]
pub struct WebSketch {
    inner: Rc<RefCell<WebState>>,
    on_input: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
impl WebSketch {
    /// Binds to the canvas `canvas_id` and the range input `slider_id`.
    /// When `label_id` is given, that element mirrors the slider value.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: String,
        slider_id: String,
        label_id: Option<String>,
    ) -> Result<WebSketch, JsValue> {
        Self::attach(&canvas_id, &slider_id, label_id.as_deref()).map_err(|err| {
            let message = format!("failed to start sierpinski canvas: {err:?}");
            error!("{message}");
            JsValue::from_str(&message)
        })
    }

    pub fn depth(&self) -> u32 {
        self.inner.borrow().sketch.slider().value()
    }

    /// Sets the depth programmatically, keeping the slider in sync.
    pub fn set_depth(&self, depth: i32) -> Result<(), JsValue> {
        let mut state = self.inner.borrow_mut();
        state.sketch.slider_mut().set(i64::from(depth));
        let value = state.sketch.slider().value().to_string();
        state.slider.set_value(&value);
        state
            .redraw()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl WebSketch {
    fn attach(canvas_id: &str, slider_id: &str, label_id: Option<&str>) -> Result<Self> {
        let document = window()
            .ok_or_else(|| anyhow!("window not available"))?
            .document()
            .ok_or_else(|| anyhow!("document not available"))?;
        let canvas: HtmlCanvasElement = element_by_id(&document, canvas_id)?;
        let slider: HtmlInputElement = element_by_id(&document, slider_id)?;
        let label = match label_id {
            Some(id) => Some(element_by_id::<HtmlElement>(&document, id)?),
            None => None,
        };

        let max_depth = slider
            .max()
            .parse::<u32>()
            .map(|max| max.min(MAX_DEPTH))
            .unwrap_or_else(|_| DrawSettings::default().max_depth);
        let settings = DrawSettings {
            depth: slider.value().parse().unwrap_or(0),
            max_depth,
            width: canvas.width(),
            height: canvas.height(),
            ..DrawSettings::default()
        }
        .validate()?;

        let viewport = Arc::new(CanvasViewport::new(settings.width, settings.height));
        let state = Rc::new(RefCell::new(WebState {
            sketch: Sketch::new(settings, viewport),
            surface: CanvasSurface::new(canvas)?,
            slider: slider.clone(),
            label,
        }));
        state.borrow_mut().redraw()?;

        let handler_state = Rc::clone(&state);
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            if let Err(err) = handler_state.borrow_mut().handle_input() {
                error!("slider input rejected: {err}");
            }
        }) as Box<dyn FnMut(Event)>);
        slider
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("failed to listen for slider input: {err:?}"))?;

        info!(
            "sierpinski canvas ready (depth {} of {})",
            state.borrow().sketch.slider().value(),
            max_depth
        );

        Ok(Self {
            inner: state,
            on_input,
        })
    }
}

impl Drop for WebSketch {
    fn drop(&mut self) {
        let state = self.inner.borrow();
        if let Err(err) = state
            .slider
            .remove_event_listener_with_callback("input", self.on_input.as_ref().unchecked_ref())
        {
            error!("failed to detach slider listener: {err:?}");
        }
    }
}

struct WebState {
    sketch: Sketch,
    surface: CanvasSurface,
    slider: HtmlInputElement,
    label: Option<HtmlElement>,
}

impl WebState {
    fn handle_input(&mut self) -> Result<()> {
        let text = self.slider.value();
        let changed = self.sketch.slider_mut().set_from_str(&text)?;
        if changed {
            self.redraw()?;
        } else {
            self.update_label();
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let (width, height) = self.surface.size();
        self.sketch.viewport().update(width, height);
        self.sketch.redraw(&mut self.surface)?;
        self.update_label();
        Ok(())
    }

    fn update_label(&self) {
        if let Some(label) = &self.label {
            label.set_inner_text(&self.sketch.slider().value().to_string());
        }
    }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("element #{id} not found"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("element #{id} has an unexpected type"))
}
