//! The player window: control panel, frame view and tick driving.

use crate::controls::{self, KeyMap};
use crate::sink::EguiSink;
use eframe::egui;
use loopview_core::{LoopviewError, ViewportSize};
use loopview_playback::{CommandOutcome, PlaybackScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct LoopviewApp {
    scheduler: PlaybackScheduler,
    sink: EguiSink,
    keys: KeyMap,
    next_tick: Instant,
    viewport_synced: bool,
    closing: bool,
    /// Handed back to `main` when the session dies on an error.
    fatal: Rc<RefCell<Option<LoopviewError>>>,
}

impl LoopviewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        scheduler: PlaybackScheduler,
        fatal: Rc<RefCell<Option<LoopviewError>>>,
    ) -> Self {
        let mut sink = EguiSink::new(cc.egui_ctx.clone());
        if let Err(e) = scheduler.show_current(&mut sink) {
            warn!("First frame could not be shown: {}", e);
        }
        Self {
            next_tick: Instant::now() + scheduler.target_interval(),
            scheduler,
            sink,
            keys: KeyMap::new(),
            viewport_synced: false,
            closing: false,
            fatal,
        }
    }

    fn close(&mut self, ctx: &egui::Context) {
        if !self.closing {
            self.closing = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Crop against the monitor once its size is known.
    fn sync_viewport(&mut self, ctx: &egui::Context) {
        if self.viewport_synced {
            return;
        }
        let (monitor, native_ppp) = ctx.input(|i| {
            let info = i.viewport();
            (info.monitor_size, info.native_pixels_per_point)
        });
        if let Some(size) = monitor {
            let ppp = native_ppp.unwrap_or_else(|| ctx.pixels_per_point());
            let viewport = monitor_pixels(size, ppp);
            info!("Monitor is {}x{}", viewport.width, viewport.height);
            self.scheduler.pipeline_mut().set_viewport(viewport);
            self.viewport_synced = true;
        }
    }

    fn run_due_tick(&mut self) -> Result<(), LoopviewError> {
        let now = Instant::now();
        if now < self.next_tick {
            return Ok(());
        }
        let report = self.scheduler.tick(&mut self.sink)?;
        self.next_tick = now + report.delay;
        Ok(())
    }
}

/// egui reports the monitor in points; crop bounds are in image pixels.
fn monitor_pixels(size: egui::Vec2, pixels_per_point: f32) -> ViewportSize {
    ViewportSize {
        width: (size.x * pixels_per_point).round() as u32,
        height: (size.y * pixels_per_point).round() as u32,
    }
}

impl eframe::App for LoopviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closing {
            return;
        }
        self.sync_viewport(ctx);

        let mut commands = self.keys.pressed(ctx);
        let status = self.scheduler.status();
        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                commands.extend(controls::show_panel(ui, &status));
            });

        for cmd in commands {
            if self.scheduler.apply(cmd) == CommandOutcome::Quit {
                info!("Quit requested");
                self.close(ctx);
                return;
            }
        }

        match self.run_due_tick() {
            Ok(()) => {}
            Err(LoopviewError::StreamEnded) => {
                info!("Stream ended at {}", self.scheduler.status());
                self.close(ctx);
                return;
            }
            Err(e) => {
                error!("Playback failed: {}", e);
                *self.fatal.borrow_mut() = Some(e);
                self.close(ctx);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| {
                    if let Some(texture) = self.sink.texture() {
                        ui.add(egui::Image::new(texture).fit_to_original_size(1.0));
                    }
                });
            });

        ctx.request_repaint_after(self.next_tick.saturating_duration_since(Instant::now()));
    }
}
