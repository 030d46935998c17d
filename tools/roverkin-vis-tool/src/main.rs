//! roverkin-vis-tool: side-view rig viewer (winit 0.28 + pixels 0.13)
//!
//! Keys: Space pause, Right single-step while paused, Q/E zoom, Escape quit.
//! Env: RVK_CONFIG (JSON SimConfig), RVK_SCALE, RVK_MAX_DT, RVK_LOG_EVERY.

mod canvas;
mod sink;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use roverkin_world::{RoverBuilder, Session, SessionError, SimConfig};
use sink::PixelsSink;

/* ---------------- env helpers ---------------- */
fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}
fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn load_config() -> Result<SimConfig> {
    let mut cfg = match std::env::var_os("RVK_CONFIG") {
        Some(p) => {
            let p = PathBuf::from(p);
            roverkin_io::load_config(&p).with_context(|| format!("RVK_CONFIG={}", p.display()))?
        }
        None => SimConfig::default(),
    };
    // Interactive frames stall far more often than headless runs; keep steps short.
    cfg.tick.max_dt = env_f32("RVK_MAX_DT", 0.1);
    cfg.debug.log_every = env_u32("RVK_LOG_EVERY", cfg.debug.log_every);
    Ok(cfg)
}

/* ---------------- main ---------------- */
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config()?;
    let scale = env_f32("RVK_SCALE", 60.0);
    let step_dt = 1.0 / 60.0;
    let rover = RoverBuilder::new().with_config(cfg).build_procedural();

    let el = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("roverkin-vis-tool")
        .with_inner_size(LogicalSize::new(1280.0, 720.0))
        .build(&el);
    let window = match window {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "window creation failed");
            None
        }
    };

    let mut session = Session::start(rover, |rover| {
        let w = window
            .as_ref()
            .ok_or_else(|| SessionError::SurfaceUnavailable("no window".into()))?;
        PixelsSink::new(w, rover, scale)
    });

    let Some(window) = window.filter(|_| session.is_running()) else {
        session.teardown();
        info!("no render surface; exiting");
        return Ok(());
    };

    let mut last = Instant::now();
    let mut paused = false;

    el.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    session.teardown();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Some(s) = session.sink_mut() { s.resize(size.width, size.height); }
                }
                WindowEvent::KeyboardInput {
                    input: KeyboardInput { state, virtual_keycode: Some(key), .. }, ..
                } => {
                    let down = state == ElementState::Pressed;
                    match key {
                        VirtualKeyCode::Escape => if down {
                            session.teardown();
                            *control_flow = ControlFlow::Exit;
                        }
                        VirtualKeyCode::Space  => if down { paused = !paused; }
                        VirtualKeyCode::Right  => if down && paused { session.tick(step_dt); }
                        VirtualKeyCode::Q      => if down { if let Some(s) = session.sink_mut() { s.zoom(0.9); } }
                        VirtualKeyCode::E      => if down { if let Some(s) = session.sink_mut() { s.zoom(1.1); } }
                        _ => {}
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                // Instant is monotonic; the rover's tick policy caps stalls.
                let now = Instant::now();
                let dt = (now - last).as_secs_f32();
                last = now;

                if !paused && session.tick(dt).is_none() {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                if let Some(s) = session.sink_mut() { s.redraw(); }
            }
            Event::LoopDestroyed => session.teardown(),
            _ => {}
        }
    })
}
