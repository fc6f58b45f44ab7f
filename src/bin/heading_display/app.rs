//! Heading display application

use crate::arrow::{self, SceneTransform, SCENE_RECT};
use eframe::egui;
use eframe::egui::load::SizedTexture;
use serial_imu_heading::{ConnectionParameters, HeadingSession, SerialImu};

/// Main application struct
pub struct HeadingApp {
    /// Port typed by the user
    port_input: String,
    /// Baud rate and mode used for every connect
    defaults: ConnectionParameters,
    session: HeadingSession,
    arrow: Option<egui::TextureHandle>,
    image_error: Option<String>,
}

impl HeadingApp {
    pub fn new(cc: &eframe::CreationContext<'_>, defaults: ConnectionParameters) -> Self {
        let (arrow, image_error) = match arrow::load_arrow_image() {
            Ok(image) => {
                let texture =
                    cc.egui_ctx
                        .load_texture("red_arrow", image, egui::TextureOptions::LINEAR);
                (Some(texture), None)
            }
            Err(e) => {
                log::error!("Cannot load arrow image: {}", e);
                (None, Some(e))
            }
        };

        Self {
            port_input: defaults.port.clone(),
            defaults,
            session: HeadingSession::new(),
            arrow,
            image_error,
        }
    }

    /// Connect to the port in the input field
    fn connect_imu(&mut self) {
        let params = ConnectionParameters::new(
            self.port_input.trim(),
            self.defaults.baudrate,
            self.defaults.mode,
        );
        if let Err(e) = self.session.connect(SerialImu::new(), params) {
            log::debug!("Connect refused: {}", e);
        }
    }

    /// Render the port field, connect button and status
    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            let connected = self.session.is_connected();

            ui.add_enabled(
                !connected,
                egui::TextEdit::singleline(&mut self.port_input)
                    .hint_text("Port")
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                if connected {
                    if ui.button("⏹ Disconnect").clicked() {
                        self.session.disconnect();
                    }
                } else if ui.button("▶ Connect").clicked() {
                    self.connect_imu();
                }

                let status = self.session.status();
                if status.is_error() {
                    ui.colored_label(egui::Color32::RED, status.to_string());
                } else {
                    ui.label(status.to_string());
                }
            });

            ui.horizontal(|ui| {
                match self.session.rotation() {
                    Some(rotation) => ui.label(format!("Heading: {:.1}°", rotation)),
                    None => ui.label("Heading: --"),
                };
                if self.session.is_connected() {
                    ui.label(format!("| {} samples", self.session.received()));
                }
            });
            ui.add_space(4.0);
        });
    }

    /// Render the scene with the rotating arrow
    fn render_scene(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let transform = SceneTransform::fit(SCENE_RECT, response.rect);

            let scene_screen = egui::Rect::from_min_max(
                transform.to_screen(SCENE_RECT.min),
                transform.to_screen(SCENE_RECT.max),
            );
            painter.rect_filled(scene_screen, 0.0, ui.visuals().extreme_bg_color);

            match &self.arrow {
                Some(texture) => {
                    let rect = transform.arrow_rect(texture.size_vec2());
                    let angle = self.session.rotation().unwrap_or(0.0).to_radians() as f32;
                    egui::Image::new(SizedTexture::from_handle(texture))
                        .rotate(angle, egui::Vec2::splat(0.5))
                        .paint_at(ui, rect);
                }
                None => {
                    let message = self.image_error.as_deref().unwrap_or("No arrow image");
                    painter.text(
                        scene_screen.center(),
                        egui::Align2::CENTER_CENTER,
                        message,
                        egui::FontId::proportional(12.0),
                        egui::Color32::RED,
                    );
                }
            }
        });
    }
}

impl eframe::App for HeadingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll for headings from the acquisition thread
        self.session.pump();

        // Request repaint for live updates
        if self.session.is_connected() {
            ctx.request_repaint();
        }

        self.render_toolbar(ctx);
        self.render_scene(ctx);
    }
}
