//! Repel Grid entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use repel_grid::platform::Viewport;
    use repel_grid::renderer::{MarkerLayer, RenderState};
    use repel_grid::{App, Settings};

    /// Everything the frame loop touches
    struct Runner {
        app: App,
        layer: MarkerLayer,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Viewport the canvas was last sized for
        sized_for: Viewport,
    }

    impl Runner {
        fn frame(&mut self) {
            let now = js_sys::Date::now();
            if let Some(stats) = self.app.frame(now, &mut self.layer) {
                log::trace!("{:?}", stats);
            }
            if self.app.viewport != self.sized_for {
                self.size_canvas();
            }
            self.render();
        }

        /// Match the canvas to the area the grid covers
        fn size_canvas(&mut self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (w, h) = self.app.viewport.grid_pixels();
            let width = (w as f64 * dpr) as u32;
            let height = (h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.scale = dpr as f32;
                render_state.resize(width, height);
            }
            self.sized_for = self.app.viewport;
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.layer) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn window_size() -> (f64, f64) {
        let window = web_sys::window().expect("no window");
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w, h)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Repel Grid starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let (width_px, height_px) = window_size();

        let mut layer = MarkerLayer::default();
        let app = match App::new(settings, width_px, height_px, seed, js_sys::Date::now(), &mut layer) {
            Ok(app) => app,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        let dpr = window.device_pixel_ratio();
        let (grid_w, grid_h) = app.viewport.grid_pixels();
        let width = (grid_w as f64 * dpr) as u32;
        let height = (grid_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let marker_size = app.settings.marker_size;
        let render_state =
            RenderState::new(surface, &adapter, width, height, dpr as f32, marker_size).await;

        let runner = Rc::new(RefCell::new(Runner {
            sized_for: app.viewport,
            app,
            layer,
            render_state: Some(render_state),
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, runner.clone());
        request_animation_frame(runner);

        log::info!("Repel Grid running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, runner: Rc<RefCell<Runner>>) {
        // Pointer drives the exclusion window
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let px = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                runner.borrow_mut().app.pointer_moved(px);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let runner = runner.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    runner.borrow_mut().app.pointer_moved(Vec2::new(x, y));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize (debounced inside the app)
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (w, h) = window_size();
                runner.borrow_mut().app.resized(w, h, js_sys::Date::now());
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(runner: Rc<RefCell<Runner>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(runner);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(runner: Rc<RefCell<Runner>>) {
        runner.borrow_mut().frame();
        request_animation_frame(runner);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Repel Grid (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(e) = headless::run(clap::Parser::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use glam::Vec2;
    use repel_grid::renderer::MarkerLayer;
    use repel_grid::{App, Error, Result, Settings};

    /// Synthetic refresh rate for the headless clock
    const REFRESH_MS: f64 = 5.0;
    const VIEWPORT: (f64, f64) = (1280.0, 720.0);

    /// Run the simulation headless on a synthetic clock and log what it does
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Settings file (JSON); defaults are used when omitted
        #[arg(long, value_name = "PATH")]
        pub config: Option<PathBuf>,
        /// Simulated seconds to run
        #[arg(long, value_name = "SECONDS", default_value_t = 10.0)]
        pub seconds: f64,
    }

    pub fn run(args: Args) -> Result<()> {
        let Args { config, seconds } = args;
        if !(seconds.is_finite() && seconds >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "--seconds must be a non-negative number, got {}",
                seconds
            )));
        }

        let settings = Settings::load(config.as_deref())?;
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut layer = MarkerLayer::default();
        let mut app = App::new(settings, VIEWPORT.0, VIEWPORT.1, seed, 0.0, &mut layer)?;
        let dims = app.viewport.grid_dimensions();
        log::info!(
            "{}x{} grid, {} squares",
            dims.x,
            dims.y,
            app.state.squares.len()
        );

        // Sweep the pointer across the middle so the exclusion window moves
        let frames = (seconds * 1000.0 / REFRESH_MS) as u64;
        let mut steps = 0u64;
        let mut moved = 0usize;
        for frame in 1..=frames {
            let now = frame as f64 * REFRESH_MS;
            let t = (frame as f64 / frames as f64) as f32;
            app.pointer_moved(Vec2::new(t * VIEWPORT.0 as f32, VIEWPORT.1 as f32 / 2.0));

            if let Some(stats) = app.frame(now, &mut layer) {
                steps += 1;
                moved += stats.moved;
                if steps % 20 == 0 {
                    log::info!("step {}: {:?}", steps, stats);
                }
            }
        }

        log::info!(
            "Ran {} steps in {:.1} simulated seconds, {} moves, consistent: {}",
            steps,
            seconds,
            moved,
            app.state.is_consistent()
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["repel-grid"]).expect("no args");
            assert_eq!(args.config, None);
            assert_eq!(args.seconds, 10.0);
        }

        #[test]
        fn test_args_parse() {
            let args = Args::try_parse_from(["repel-grid", "--config", "grid.json", "--seconds", "2.5"])
                .expect("valid args");
            assert_eq!(args.config, Some(PathBuf::from("grid.json")));
            assert_eq!(args.seconds, 2.5);
        }

        #[test]
        fn test_config_without_path_is_rejected() {
            assert!(Args::try_parse_from(["repel-grid", "--config"]).is_err());
            assert!(Args::try_parse_from(["repel-grid", "--seconds", "soon"]).is_err());
        }

        #[test]
        fn test_run_short() {
            let args = Args {
                config: None,
                seconds: 0.5,
            };
            assert!(run(args).is_ok());
            let args = Args {
                config: None,
                seconds: f64::NAN,
            };
            assert!(matches!(run(args), Err(Error::InvalidSettings(_))));
        }
    }
}
