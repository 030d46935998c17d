//! Pixels-backed render adapter: the only place that owns a framebuffer.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use pixels::{Pixels, SurfaceTexture};
use roverkin_terrain::{HeightField, Terrain};
use roverkin_world::{JointName, MissionPhase, RenderSink, Rover, SessionError, SimConfig, Snapshot};
use tracing::warn;
use winit::window::Window;

use crate::canvas::{Cam, Canvas, Rgba};

const BG: Rgba = [12, 12, 16, 255];
const GROUND_MID: Rgba = [90, 80, 70, 255];
const GROUND_TRACK: Rgba = [170, 120, 70, 255];
const CHASSIS: Rgba = [220, 220, 230, 255];
const ROCKER_L: Rgba = [100, 200, 255, 255];
const ROCKER_R: Rgba = [80, 140, 200, 255];
const MAST: Rgba = [240, 210, 90, 255];
const ARM: Rgba = [170, 120, 240, 255];
const GAUGE: Rgba = [200, 200, 200, 255];

fn phase_color(p: MissionPhase) -> Rgba {
    match p {
        MissionPhase::Traverse => [90, 200, 110, 255],
        MissionPhase::Scan     => [90, 150, 240, 255],
        MissionPhase::Sample   => [240, 150, 60, 255],
        MissionPhase::Return   => [190, 110, 220, 255],
    }
}

pub struct PixelsSink {
    pixels: Option<Pixels>,
    width: u32,
    height: u32,
    ground: HeightField,
    config: SimConfig,
    cam: Cam,
    last: Option<Snapshot>,
    render_failed: bool,
}

impl PixelsSink {
    pub fn new<T: Terrain>(window: &Window, rover: &Rover<T>, ppm: f32) -> Result<Self, SessionError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let surface = SurfaceTexture::new(width, height, window);
        let pixels = Pixels::new(width, height, surface)
            .map_err(|e| SessionError::SurfaceUnavailable(e.to_string()))?;

        // Same height function the solver samples; lane and wheel tracks sit on grid rows.
        let config = *rover.config();
        let ground = rover.bake_ground(Vec2::new(0.1, 0.25), 2.0);

        let pos = rover.snapshot().pose.position;
        Ok(Self {
            pixels: Some(pixels),
            width, height,
            ground,
            config,
            cam: Cam { center: Vec2::new(pos.x, pos.y), ppm },
            last: Some(*rover.snapshot()),
            render_failed: false,
        })
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        if w == 0 || h == 0 { return; }
        let Some(px) = self.pixels.as_mut() else { return };
        if let Err(e) = px.resize_surface(w, h) {
            warn!(error = %e, "resize_surface failed");
            return;
        }
        if let Err(e) = px.resize_buffer(w, h) {
            warn!(error = %e, "resize_buffer failed");
            return;
        }
        self.width = w;
        self.height = h;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.cam.ppm = (self.cam.ppm * factor).clamp(8.0, 400.0);
    }

    pub fn redraw(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else { return };
        {
            let mut c = Canvas::new(pixels.frame_mut(), self.width, self.height);
            c.clear(BG);
            let lane = self.config.rover.lane_z;
            draw_profile(&mut c, &self.cam, &self.ground, lane, GROUND_MID);
            draw_profile(&mut c, &self.cam, &self.ground, lane + self.config.rover.track_offset, GROUND_TRACK);
            if let Some(s) = &self.last {
                draw_rover(&mut c, &self.cam, &self.config, s);
                let dwell = self.config.mission.dwell.of(s.phase).max(1e-3);
                let frac = (s.phase_timer / dwell).clamp(0.0, 1.0);
                let w = c.w as f32;
                c.fill_rect(0, 0, (w * frac) as i32, 6, phase_color(s.phase));
                let ground_y = s.pose.position.y - self.config.rover.ground_clearance();
                draw_elevation_gauge(&mut c, &self.ground, ground_y);
            }
        }
        if let Err(e) = pixels.render() {
            if !self.render_failed {
                warn!(error = %e, "pixels render failed");
                self.render_failed = true;
            }
        }
    }
}

impl RenderSink for PixelsSink {
    fn present(&mut self, snap: &Snapshot) {
        // Camera tracks the emitted position.
        self.cam.center = Vec2::new(snap.pose.position.x, snap.pose.position.y);
        self.last = Some(*snap);
    }

    fn release(&mut self) {
        self.pixels = None;
        self.last = None;
    }
}

/// Ground line at lateral offset `z`, lit from the upper left by the baked normals.
fn draw_profile(c: &mut Canvas<'_>, cam: &Cam, ground: &HeightField, z: f32, rgba: Rgba) {
    let light = Vec3::new(-0.6, 0.8, 0.0).normalize();
    let mut prev: Option<(i32, i32)> = None;
    for sx in (0..c.w as i32).step_by(2) {
        let x = cam.screen_to_world_x(sx, c.w);
        let y = ground.sample_height(x, z);
        let p = cam.world_to_screen(Vec2::new(x, y), c.w, c.h);
        if let Some((x0, y0)) = prev {
            let lit = ground.sample_normal(x, z).dot(light).clamp(0.35, 1.0);
            c.line(x0, y0, p.0, p.1, shade(rgba, lit));
        }
        prev = Some(p);
    }
}

fn shade(rgba: Rgba, k: f32) -> Rgba {
    let f = |v: u8| (v as f32 * k).round().clamp(0.0, 255.0) as u8;
    [f(rgba[0]), f(rgba[1]), f(rgba[2]), rgba[3]]
}

/// Right-edge bar: where the ground under the rover sits in the strip's elevation range.
fn draw_elevation_gauge(c: &mut Canvas<'_>, ground: &HeightField, y: f32) {
    let (w, h) = (c.w as i32, c.h as i32);
    let (x0, x1, top, bottom) = (w - 18, w - 8, 16, (h - 16).max(17));
    let span = (ground.max_y - ground.min_y).max(1e-3);
    let frac = ((y - ground.min_y) / span).clamp(0.0, 1.0);
    let level = bottom - ((bottom - top) as f32 * frac) as i32;
    c.line(x0, top, x0, bottom, GAUGE);
    c.line(x1, top, x1, bottom, GAUGE);
    c.fill_rect(x0, level, x1, bottom, GROUND_TRACK);
}

/// Shrink the forward component to fake a yaw seen from the side.
#[inline]
fn foreshorten(d: Vec2, yaw: f32) -> Vec2 { Vec2::new(d.x * yaw.cos(), d.y) }

fn draw_rover(c: &mut Canvas<'_>, cam: &Cam, cfg: &SimConfig, s: &Snapshot) {
    let p = &cfg.rover;
    let center = Vec2::new(s.pose.position.x, s.pose.position.y);
    let fwd = Vec2::from_angle(s.pose.pitch);
    let up = fwd.perp();

    // chassis
    let (hl, hh) = (0.8, 0.15);
    let corners = [
        center + fwd * hl + up * hh,
        center - fwd * hl + up * hh,
        center - fwd * hl - up * hh,
        center + fwd * hl - up * hh,
    ];
    for i in 0..4 {
        c.seg(cam, corners[i], corners[(i + 1) % 4], CHASSIS);
    }

    // rockers, far side first so the near side paints over it
    let pivot = center - up * p.rocker_pivot_drop;
    let r_px = (p.wheel_radius * cam.ppm).round() as i32;
    for (angle, rgba) in [(s.suspension.right, ROCKER_R), (s.suspension.left, ROCKER_L)] {
        let dir = Vec2::from_angle(s.pose.pitch + angle);
        let drop = dir.perp() * p.wheel_pivot_drop;
        for axle in [pivot + dir * p.half_wheelbase - drop, pivot - dir * p.half_wheelbase - drop] {
            c.seg(cam, pivot, axle, rgba);
            let (ax, ay) = cam.world_to_screen(axle, c.w, c.h);
            c.circle(ax, ay, r_px, rgba);
        }
    }

    // mast
    let j = &s.joints;
    let mast_base = center + fwd * 0.45 + up * hh;
    let mast_mid = mast_base + up * 0.55;
    let upper = Vec2::from_angle(s.pose.pitch + FRAC_PI_2 - j.get(JointName::MastTilt));
    let head = mast_mid + upper * 0.35;
    c.seg(cam, mast_base, mast_mid, MAST);
    c.seg(cam, mast_mid, head, MAST);
    c.seg(cam, head, head + foreshorten(fwd * 0.2, j.get(JointName::MastYaw)), MAST);

    // manipulator
    let yaw = j.get(JointName::ArmBase);
    let arm_base = center + fwd * hl;
    let shoulder = s.pose.pitch + j.get(JointName::ArmShoulder);
    let elbow = arm_base + foreshorten(Vec2::from_angle(shoulder) * 0.6, yaw);
    let wrist = elbow + foreshorten(Vec2::from_angle(shoulder + j.get(JointName::ArmForearm)) * 0.5, yaw);
    c.seg(cam, arm_base, elbow, ARM);
    c.seg(cam, elbow, wrist, ARM);
}
