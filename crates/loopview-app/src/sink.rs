//! egui-backed frame sink.

use eframe::egui;
use loopview_core::{LoopviewError, PixelFormat, Result, SharedFrameBuffer};
use loopview_playback::FrameSink;

/// Uploads each presented frame into a single reused texture and mirrors
/// the status line into the window title.
pub struct EguiSink {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
    title: String,
}

impl EguiSink {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            texture: None,
            title: String::new(),
        }
    }

    /// Texture holding the image on screen, once one was presented.
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }
}

impl FrameSink for EguiSink {
    fn present(&mut self, frame: &SharedFrameBuffer) -> Result<()> {
        if frame.is_empty() {
            return Err(LoopviewError::Display(format!(
                "cannot show a {}x{} frame",
                frame.width, frame.height
            )));
        }

        let size = [frame.width as usize, frame.height as usize];
        let image = match frame.format {
            PixelFormat::Rgb8 => egui::ColorImage::from_rgb(size, frame.data()),
            PixelFormat::Rgba8 => egui::ColorImage::from_rgba_unmultiplied(size, frame.data()),
            PixelFormat::Gray8 => egui::ColorImage::from_gray(size, frame.data()),
        };

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(self.ctx.load_texture(
                    "loopview-frame",
                    image,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        if self.title != status {
            self.title = status.to_string();
            self.ctx
                .send_viewport_cmd(egui::ViewportCommand::Title(self.title.clone()));
        }
    }
}
