//! Monitor window: menu, log pane and heading trend

use crate::log_pane::LogPane;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use serial_imu_heading::{Connection, ConnectionParameters, SensorBinding, SerialImu};
use std::collections::VecDeque;

/// Heading points kept for the trend plot
const HISTORY_LEN: usize = 1000;

/// Main application struct
pub struct MonitorApp {
    params: ConnectionParameters,
    connection: Option<Connection>,
    /// Connect once the window has been shown
    connect_pending: bool,
    show_log: bool,
    log: LogPane,
    /// (seconds since connect, heading)
    history: VecDeque<[f64; 2]>,
    latest: Option<f64>,
}

impl MonitorApp {
    pub fn new(params: ConnectionParameters) -> Self {
        Self {
            params,
            connection: None,
            connect_pending: true,
            show_log: true,
            log: LogPane::default(),
            history: VecDeque::with_capacity(HISTORY_LEN),
            latest: None,
        }
    }

    /// Open the IMU link with the configured parameters
    fn connect_imu(&mut self) {
        self.connect_with(SerialImu::new());
    }

    fn connect_with<B: SensorBinding + 'static>(&mut self, binding: B) {
        match Connection::open(binding, self.params.clone()) {
            Ok(connection) => {
                self.log.push(format!("Connected to {}", self.params));
                self.history.clear();
                self.connection = Some(connection);
            }
            Err(e) => {
                log::error!("IMU connection to {} failed: {}", self.params.port, e);
                self.log.push(format!("IMU connection failed: {}", e));
            }
        }
    }

    /// Log every heading received since the last frame
    fn poll_headings(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };

        let elapsed = connection.start_time().elapsed().as_secs_f64();
        for heading in connection.drain() {
            println!("IMU direction: {}", heading);
            self.log.push(format!("IMU direction: {:.3}", heading));

            if self.history.len() >= HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back([elapsed, heading]);
            self.latest = Some(heading);
        }

        if !connection.is_running() {
            let port = connection.params().port.clone();
            log::warn!("IMU stream from {} ended", port);
            self.log.push(format!("Connection lost: {}", port));
            self.connection = None;
        }
    }

    /// Render the File menu
    fn render_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.toggle_value(&mut self.show_log, "Log").clicked() {
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    /// Render the read-only log pane, at most a third of the window wide
    fn render_log(&mut self, ctx: &egui::Context) {
        let max_width = ctx.screen_rect().width() / 3.0;
        egui::SidePanel::right("log")
            .resizable(true)
            .default_width(max_width)
            .max_width(max_width)
            .show_animated(ctx, self.show_log, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Log");
                    if ui.small_button("Clear").clicked() {
                        self.log.clear();
                    }
                });
                ui.separator();

                let text = self.log.text();
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text.as_str())
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                    });
            });
    }

    /// Render the central content area
    fn render_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.1);
                ui.heading("Main Content Area");

                match self.latest {
                    Some(heading) => ui.label(format!("Heading: {:.2}°", heading)),
                    None => ui.label("Heading: --"),
                };
                match &self.connection {
                    Some(connection) => ui.label(format!("🟢 {}", connection.params())),
                    None => ui.label("⚪ Not connected"),
                };
            });
            ui.separator();

            let points: PlotPoints = self.history.iter().copied().collect();
            Plot::new("heading_trend")
                .include_y(-180.0)
                .include_y(180.0)
                .x_axis_label("Time (s)")
                .y_axis_label("Heading (°)")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(points).name("Heading"));
                });
        });
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.connect_pending {
            self.connect_pending = false;
            self.connect_imu();
        }

        self.poll_headings();

        if self.connection.is_some() {
            ctx.request_repaint();
        }

        self.render_menu(ctx);
        self.render_log(ctx);
        self.render_content(ctx);
    }
}
