#![cfg_attr(target_arch = "wasm32", allow(dead_code, unused_imports))]

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use sierpinski_canvas::app::print_summary;
use sierpinski_canvas::{CanvasViewport, DrawSettings, Emission, Rgba, Sketch};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let settings = options.settings()?;
    let viewport = Arc::new(CanvasViewport::new(settings.width, settings.height));
    let mut sketch = Sketch::new(settings, viewport);

    if options.summary_only {
        return print_summary(&sketch, options.list);
    }

    match viewer::run(&mut sketch) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<viewer::WindowInitError>().is_some() => {
            eprintln!("{err}. Falling back to --summary-only mode.");
            print_summary(&sketch, options.list)
        }
        Err(err) => Err(err),
    }
}

const USAGE: &str = "Usage: sierpinski [--depth N] [--max-depth N] [--emission unique|replayed] \
[--fill COLOR] [--background COLOR] [--size WxH] [--settings FILE] [--summary-only] [--list]";

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    settings_path: Option<String>,
    depth: Option<u32>,
    max_depth: Option<u32>,
    emission: Option<Emission>,
    fill: Option<Rgba>,
    background: Option<Rgba>,
    size: Option<(u32, u32)>,
    summary_only: bool,
    list: bool,
}

impl CliOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{name} expects a value. {USAGE}"))
            };
            match arg.as_str() {
                "--settings" => options.settings_path = Some(value("--settings")?),
                "--depth" => {
                    let text = value("--depth")?;
                    options.depth = Some(
                        text.parse()
                            .with_context(|| format!("invalid depth {text:?}"))?,
                    );
                }
                "--max-depth" => {
                    let text = value("--max-depth")?;
                    options.max_depth = Some(
                        text.parse()
                            .with_context(|| format!("invalid max depth {text:?}"))?,
                    );
                }
                "--emission" => options.emission = Some(value("--emission")?.parse()?),
                "--fill" => options.fill = Some(value("--fill")?.parse()?),
                "--background" => options.background = Some(value("--background")?.parse()?),
                "--size" => options.size = Some(parse_size(&value("--size")?)?),
                "--summary-only" => options.summary_only = true,
                "--list" => options.list = true,
                "--help" | "-h" => return Err(anyhow!(USAGE)),
                other => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
            }
        }
        Ok(options)
    }

    /// Defaults, then the settings document, then command line overrides.
    fn settings(&self) -> Result<DrawSettings> {
        let mut settings = match &self.settings_path {
            Some(path) => DrawSettings::load(path)?,
            None => DrawSettings::default(),
        };
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(depth) = self.depth {
            if depth > settings.max_depth {
                return Err(anyhow!(
                    "depth {depth} is outside the range 0..={}",
                    settings.max_depth
                ));
            }
            settings.depth = depth;
        }
        if let Some(emission) = self.emission {
            settings.emission = emission;
        }
        if let Some(fill) = self.fill {
            settings.fill = fill;
        }
        if let Some(background) = self.background {
            settings.background = background;
        }
        if let Some((width, height)) = self.size {
            settings.width = width;
            settings.height = height;
        }
        settings.validate()
    }
}

fn parse_size(text: &str) -> Result<(u32, u32)> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("invalid size {text:?}: expected WIDTHxHEIGHT"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .with_context(|| format!("invalid size {text:?}: expected WIDTHxHEIGHT"))
    };
    Ok((parse(width)?, parse(height)?))
}

#[cfg(not(target_arch = "wasm32"))]
mod viewer {
    use std::any::Any;
    use std::fmt;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use log::{error, info, warn};
    use pollster::block_on;
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, KeyEvent, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{Key, NamedKey as WinitNamedKey};
    use winit::window::{Window, WindowId};

    use sierpinski_canvas::render::Renderer;
    use sierpinski_canvas::{KeyCode, NamedKey, SliderAction, Sketch};

    /// Opens a window and redraws whenever the depth changes.
    pub fn run(sketch: &mut Sketch) -> Result<()> {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
        panic::set_hook(default_hook);
        let event_loop = event_loop
            .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
            .map_err(|err| WindowInitError::from_error("event loop", err))?;

        info!("Controls: Up/Down or +/- change depth, 0-9 jump to a depth, Escape quits");
        let mut viewer = Viewer {
            sketch,
            renderer: None,
            last_error: None,
        };
        event_loop.run_app(&mut viewer)?;

        match viewer.last_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    struct Viewer<'a> {
        sketch: &'a mut Sketch,
        renderer: Option<Renderer>,
        last_error: Option<anyhow::Error>,
    }

    impl Viewer<'_> {
        fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
            let settings = self.sketch.settings();
            let window = Arc::new(
                event_loop
                    .create_window(
                        Window::default_attributes()
                            .with_title(window_title(&*self.sketch))
                            .with_inner_size(LogicalSize::new(settings.width, settings.height)),
                    )
                    .map_err(|err| WindowInitError::from_error("window", err))?,
            );
            let mut renderer = block_on(Renderer::new(window, settings.background))
                .map_err(|err| WindowInitError::from_error("renderer", format!("{err:#}")))?;
            let (width, height) = renderer.size();
            self.sketch.viewport().update(width, height);
            self.sketch.redraw(&mut renderer)?;
            Ok(renderer)
        }

        fn redraw(&mut self) -> Result<()> {
            let Some(renderer) = self.renderer.as_mut() else {
                return Ok(());
            };
            self.sketch.redraw(renderer)?;
            renderer.window().set_title(&window_title(&*self.sketch));
            renderer.window().request_redraw();
            Ok(())
        }

        fn process_event(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) -> Result<()> {
            let Some(renderer) = self.renderer.as_mut() else {
                return Ok(());
            };
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => {
                    renderer.resize(size);
                    let (width, height) = renderer.size();
                    self.sketch.viewport().update(width, height);
                    self.redraw()?;
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let Some(action) = slider_action(&event) else {
                        return Ok(());
                    };
                    if action == SliderAction::Quit {
                        event_loop.exit();
                    } else if self.sketch.apply(action) {
                        self.redraw()?;
                    }
                }
                WindowEvent::RedrawRequested => match renderer.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure();
                        self.redraw()?;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        return Err(anyhow!("GPU is out of memory"));
                    }
                    Err(err) => warn!("Surface error {err}; retrying next frame"),
                },
                _ => {}
            }
            Ok(())
        }
    }

    impl ApplicationHandler for Viewer<'_> {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.renderer.is_some() {
                return;
            }
            match self.init(event_loop) {
                Ok(renderer) => {
                    renderer.window().request_redraw();
                    self.renderer = Some(renderer);
                }
                Err(err) => {
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            window_id: WindowId,
            event: WindowEvent,
        ) {
            if self
                .renderer
                .as_ref()
                .is_none_or(|renderer| renderer.window_id() != window_id)
            {
                return;
            }
            if let Err(err) = self.process_event(event_loop, event) {
                error!("application error: {err:?}");
                self.last_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_title(sketch: &Sketch) -> String {
        format!(
            "Sierpinski - depth {} of {}",
            sketch.slider().value(),
            sketch.slider().max()
        )
    }

    fn slider_action(event: &KeyEvent) -> Option<SliderAction> {
        if event.state != ElementState::Pressed {
            return None;
        }
        map_key(&event.logical_key).map(SliderAction::from_key)
    }

    fn map_key(key: &Key) -> Option<KeyCode> {
        match key {
            Key::Named(named) => Some(KeyCode::Named(match named {
                WinitNamedKey::ArrowLeft => NamedKey::Left,
                WinitNamedKey::ArrowRight => NamedKey::Right,
                WinitNamedKey::ArrowUp => NamedKey::Up,
                WinitNamedKey::ArrowDown => NamedKey::Down,
                WinitNamedKey::Escape => NamedKey::Escape,
                _ => return None,
            })),
            Key::Character(text) => KeyCode::from_name(text.as_str()),
            _ => None,
        }
    }

    #[derive(Debug)]
    pub struct WindowInitError {
        message: String,
    }

    impl WindowInitError {
        fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {}", panic_message(panic)),
            }
        }

        fn from_error(stage: &str, err: impl fmt::Display) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {err}"),
            }
        }
    }

    impl fmt::Display for WindowInitError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl std::error::Error for WindowInitError {}

    fn panic_message(panic: Box<dyn Any + Send>) -> String {
        match panic.downcast::<String>() {
            Ok(msg) => *msg,
            Err(panic) => match panic.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "unknown panic".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_flags_and_values() {
        let options = parse(&[
            "--depth",
            "3",
            "--emission",
            "replayed",
            "--size",
            "800x400",
            "--summary-only",
        ])
        .unwrap();
        assert_eq!(options.depth, Some(3));
        assert_eq!(options.emission, Some(Emission::Replayed));
        assert_eq!(options.size, Some((800, 400)));
        assert!(options.summary_only);
        assert!(!options.list);
    }

    #[test]
    fn command_line_overrides_defaults() {
        let settings = parse(&["--max-depth", "10", "--depth", "9", "--fill", "#ff0000"])
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.depth, 9);
        assert_eq!(settings.max_depth, 10);
        assert_eq!(settings.fill, Rgba::from_rgb8(255, 0, 0));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&["--depth"]).is_err());
        assert!(parse(&["--depth", "-2"]).is_err());
        assert!(parse(&["--size", "800"]).is_err());
        assert!(parse(&["--wat"]).is_err());
        assert!(parse(&["--depth", "9"]).unwrap().settings().is_err());
    }
}
