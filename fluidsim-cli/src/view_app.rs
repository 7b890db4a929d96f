//! Interactive viewer for the fluid simulation
//!
//! Steps the simulation at a fixed rate independent of the frame rate, draws
//! particles coloured by density, and reloads the config file when it changes.

use crate::load_config;
use eframe::egui;
use fluidsim_core::{Bounds, Simulation};
use glam::Vec2;
use notify::{Event, RecommendedWatcher, Watcher};
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{info, warn};

/// Physics tick length in seconds.
const FIXED_DT: f32 = 1.0 / 60.0;
/// Upper bound on catch-up ticks per frame.
const MAX_TICKS_PER_FRAME: usize = 8;

/// Open the viewer window and block until it is closed.
pub fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "fluidsim",
        options,
        Box::new(move |cc| Ok(Box::new(ViewApp::new(config_path, cc)))),
    )
    .map_err(|e| format!("viewer failed: {e}"))?;
    Ok(())
}

/// World-to-screen mapping that keeps the bounds' aspect ratio.
#[derive(Debug, Clone, Copy)]
struct ViewTransform {
    origin: egui::Pos2,
    scale: f32,
    bounds: Bounds,
}

impl ViewTransform {
    fn fit(rect: egui::Rect, bounds: Bounds) -> Self {
        let scale = (rect.width() / bounds.width()).min(rect.height() / bounds.height()) * 0.95;
        let used = egui::vec2(bounds.width() * scale, bounds.height() * scale);
        let origin = rect.center() - used * 0.5;
        Self {
            origin,
            scale,
            bounds,
        }
    }

    // World y already grows downward, like screen y.
    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin
            + egui::vec2(
                (p.x - self.bounds.left) * self.scale,
                (p.y - self.bounds.top) * self.scale,
            )
    }

    fn to_world(&self, p: egui::Pos2) -> Vec2 {
        let local = p - self.origin;
        Vec2::new(
            self.bounds.left + local.x / self.scale,
            self.bounds.top + local.y / self.scale,
        )
    }
}

/// Viewer state
pub struct ViewApp {
    config_path: Option<PathBuf>,
    sim: Option<Simulation>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    accumulator: f32,
    gravity: f32,
    smoothing_radius: f32,
    interaction_radius: f32,
    interaction_strength: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
    needs_reload: bool,
}

impl ViewApp {
    pub fn new(config_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            // The receiver is gone during shutdown; nothing to do then.
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), config_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                warn!(error = %e, path = %path.display(), "config file will not be watched");
            }
        }

        let mut app = Self {
            config_path,
            sim: None,
            last_load_error: None,
            playing: true,
            speed_multiplier: 1.0,
            accumulator: 0.0,
            gravity: 0.0,
            smoothing_radius: 1.0,
            interaction_radius: 8.0,
            interaction_strength: 200.0,
            file_watcher: watcher,
            file_receiver: rx,
            needs_reload: false,
        };

        app.reload_simulation();
        app
    }

    fn reload_simulation(&mut self) {
        let loaded = load_config(self.config_path.as_deref())
            .and_then(|config| Simulation::new(config).map_err(Into::into));
        match loaded {
            Ok(sim) => {
                self.gravity = sim.gravity();
                self.smoothing_radius = sim.smoothing_radius();
                let bounds = sim.config().bounds;
                self.interaction_radius = bounds.width().min(bounds.height()) * 0.2;
                self.accumulator = 0.0;
                self.sim = Some(sim);
                self.last_load_error = None;
                info!("simulation loaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to load simulation");
                self.last_load_error = Some(format!("{}", e));
                self.sim = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if let Some(path) = &self.config_path {
                        if paths.iter().any(|p| p.ends_with(path) || p == path) {
                            self.needs_reload = true;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "file watcher error");
                }
            }
        }

        if self.needs_reload {
            self.reload_simulation();
            self.needs_reload = false;
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                self.playing = !self.playing;
            }

            if ui.button("⏮ Reset").clicked() {
                if let Some(sim) = self.sim.as_mut() {
                    sim.reset();
                }
                self.accumulator = 0.0;
            }

            if ui.button("⏭ Step").clicked() {
                if let Some(sim) = self.sim.as_mut() {
                    sim.step(FIXED_DT);
                }
            }

            ui.separator();
            ui.label("Speed:");
            ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=4.0));

            ui.separator();
            let gravity = ui.add(egui::Slider::new(&mut self.gravity, -50.0..=50.0).text("gravity"));
            let radius = ui.add(
                egui::Slider::new(&mut self.smoothing_radius, 0.1..=10.0).text("smoothing radius"),
            );
            if let Some(sim) = self.sim.as_mut() {
                if gravity.changed() {
                    sim.set_gravity(self.gravity);
                }
                if radius.changed() {
                    if let Err(e) = sim.set_smoothing_radius(self.smoothing_radius) {
                        warn!(error = %e, "smoothing radius rejected");
                        self.smoothing_radius = sim.smoothing_radius();
                    }
                }
            }
        });

        ui.horizontal(|ui| {
            ui.add(
                egui::Slider::new(&mut self.interaction_radius, 0.5..=50.0).text("interaction radius"),
            );
            ui.add(
                egui::Slider::new(&mut self.interaction_strength, 0.0..=2000.0)
                    .text("interaction strength"),
            );
            ui.separator();
            if let Some(sim) = &self.sim {
                let stats = sim.stats();
                ui.label(format!(
                    "Step: {}  particles: {}  ke: {:.2}  density: {:.3}",
                    sim.steps(),
                    stats.particles,
                    stats.kinetic_energy,
                    stats.density_mean
                ));
            }
        });
    }

    /// Run the ticks owed for this frame. Primary button pushes, secondary pulls.
    fn advance(&mut self, frame_dt: f32, pointer: Option<Vec2>, push: bool, pull: bool) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        if !self.playing {
            return;
        }

        self.accumulator += frame_dt * self.speed_multiplier;
        let mut ticks = 0;
        while self.accumulator >= FIXED_DT && ticks < MAX_TICKS_PER_FRAME {
            if let Some(center) = pointer {
                let strength = match (push, pull) {
                    (true, _) => self.interaction_strength,
                    (false, true) => -self.interaction_strength,
                    _ => 0.0,
                };
                if strength != 0.0 {
                    sim.apply_interaction(center, self.interaction_radius, strength, FIXED_DT);
                }
            }
            sim.step(FIXED_DT);
            self.accumulator -= FIXED_DT;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            // Drop the backlog rather than spiral.
            self.accumulator = 0.0;
        }
    }

    fn draw(&self, painter: &egui::Painter, view: &ViewTransform) {
        let Some(sim) = &self.sim else {
            return;
        };
        let bounds = sim.config().bounds;
        painter.rect_stroke(
            egui::Rect::from_two_pos(
                view.to_screen(Vec2::new(bounds.left, bounds.top)),
                view.to_screen(Vec2::new(bounds.right, bounds.bottom)),
            ),
            0.0,
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
        );

        let densities = sim.densities();
        let (lo, hi) = densities
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| (lo.min(d), hi.max(d)));
        let span = (hi - lo).max(f32::EPSILON);
        let radius = (sim.config().particle_size * 0.5 * view.scale).clamp(1.5, 12.0);

        for (p, d) in sim.positions().iter().zip(densities) {
            let t = ((d - lo) / span).clamp(0.0, 1.0);
            let shade = (t * 200.0) as u8;
            let color = egui::Color32::from_rgb(40 + shade, 110 + shade / 2, 255);
            painter.circle_filled(view.to_screen(*p), radius, color);
        }
    }
}

impl eframe::App for ViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.controls(ui);
        });

        if let Some(ref error) = self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(100.0);
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

            let Some(bounds) = self.sim.as_ref().map(|s| s.config().bounds) else {
                return;
            };
            let view = ViewTransform::fit(response.rect, bounds);

            let (frame_dt, push, pull) = ctx.input(|i| {
                (i.stable_dt, i.pointer.primary_down(), i.pointer.secondary_down())
            });
            let pointer = response.hover_pos().map(|p| view.to_world(p));

            self.advance(frame_dt, pointer, push, pull);
            self.draw(&painter, &view);

            if let (Some(p), true) = (response.hover_pos(), push || pull) {
                painter.circle_stroke(
                    p,
                    self.interaction_radius * view.scale,
                    egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY),
                );
            }
        });

        if self.playing {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_round_trips_points() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(800.0, 600.0));
        let view = ViewTransform::fit(rect, Bounds::new(-5.0, 15.0, 0.0, 40.0));
        let p = Vec2::new(12.5, 3.0);
        let back = view.to_world(view.to_screen(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn transform_keeps_bounds_inside_rect() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0));
        let b = Bounds::new(0.0, 10.0, 0.0, 40.0);
        let view = ViewTransform::fit(rect, b);
        assert!(rect.contains(view.to_screen(Vec2::new(b.left, b.top))));
        assert!(rect.contains(view.to_screen(Vec2::new(b.right, b.bottom))));
    }
}
