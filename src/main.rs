//! Quicksilver entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use quicksilver::consts::*;
    use quicksilver::renderer::MetaballRenderState;
    use quicksilver::sim::{FixedStep, Simulator, TickInput, tick};
    use quicksilver::{FpsCounter, Settings, pixel_to_normalized};

    /// App instance holding all state
    struct App {
        sim: Simulator,
        render_state: Option<MetaballRenderState>,
        clock: FixedStep,
        last_time: f64,
        input: TickInput,
        fps: FpsCounter,
        show_fps: bool,
    }

    impl App {
        fn new(sim: Simulator, show_fps: bool) -> Self {
            Self {
                sim,
                render_state: None,
                clock: FixedStep::new(),
                last_time: 0.0,
                input: TickInput::default(),
                fps: FpsCounter::new(),
                show_fps,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let ticks = self.clock.advance(dt);
            // Latest pointer value, fixed for every tick this frame
            let input = self.input;
            for _ in 0..ticks {
                tick(&mut self.sim, &input);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.sim) {
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

        /// Update FPS text in DOM
        fn update_hud(&mut self, time: f64) {
            let fps = self.fps.tick(time);
            if !self.show_fps {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("fps") {
                el.set_text_content(Some(&format!("FPS: {}", fps)));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Quicksilver starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No global window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let settings = Settings::load();

        // Set canvas size
        let scale = window.device_pixel_ratio() * settings.quality.render_scale() as f64;
        let width = ((canvas.client_width() as f64 * scale) as u32).max(1);
        let height = ((canvas.client_height() as f64 * scale) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let sim = match Simulator::new(
            settings.sim_config(),
            settings.effective_blob_count(),
            MAX_BLOBS,
            seed,
        ) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Invalid simulation config: {}", e);
                return;
            }
        };
        let app = Rc::new(RefCell::new(App::new(sim, settings.show_fps)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match MetaballRenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Quicksilver running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse move anywhere on the page
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
                let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
                app.borrow_mut().input.target = pixel_to_normalized(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    w as f32,
                    h as f32,
                );
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move / start
        for event_name in ["touchmove", "touchstart"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    app.borrow_mut().input.target =
                        pixel_to_normalized(x, y, rect.width() as f32, rect.height() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud(time);
        }

        request_animation_frame(app);
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
    log::info!("Quicksilver (native) starting...");
    log::info!("Native mode renders headless on the CPU - run with `trunk serve` for the web version");

    if let Err(e) = native::run_headless() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;

    use quicksilver::consts::*;
    use quicksilver::raster::{Raster, covered_fraction};
    use quicksilver::sim::{TickInput, tick};
    use quicksilver::{Settings, Simulator, in_unit_square};

    const TICKS: usize = 600;
    const PREVIEW_WIDTH: u32 = 72;
    const PREVIEW_HEIGHT: u32 = 24;

    /// Run the simulation with an orbiting target and print an ASCII frame
    pub fn run_headless() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::load();
        let mut sim = Simulator::new(
            settings.sim_config(),
            settings.effective_blob_count(),
            MAX_BLOBS,
            0x5eed,
        )?;

        for i in 0..TICKS {
            let t = i as f32 * SIM_DT;
            let input = TickInput {
                target: Vec2::new(0.5 + 0.3 * t.cos(), 0.5 + 0.3 * t.sin()),
            };
            tick(&mut sim, &input);
        }

        let outside = sim
            .blobs()
            .iter()
            .filter(|b| !in_unit_square(b.position()))
            .count();
        let max_speed = sim
            .blobs()
            .iter()
            .map(|b| b.velocity().length())
            .fold(0.0_f32, f32::max);
        log::info!(
            "{} ticks: {} blobs, {} outside the unit square, top speed {:.5}",
            TICKS,
            sim.len(),
            outside,
            max_speed
        );

        // Terminal cells are about twice as tall as wide
        let raster = Raster::new(PREVIEW_WIDTH, PREVIEW_HEIGHT)?;
        let mut params = raster.field_params();
        params.aspect *= 0.5;
        let coverage = raster.coverage(&sim.snapshot(), &params);
        log::info!("Coverage: {:.1}%", covered_fraction(&coverage) * 100.0);

        for row in coverage.chunks(PREVIEW_WIDTH as usize) {
            let line: String = row
                .iter()
                .map(|&c| match c {
                    c if c >= 0.75 => '#',
                    c if c >= 0.25 => '+',
                    c if c > 0.0 => '.',
                    _ => ' ',
                })
                .collect();
            println!("{}", line);
        }

        Ok(())
    }
}
