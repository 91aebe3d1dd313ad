//! egui windows for comparison plots and inspected samples.
//!
//! See [`show_comparison`] and [`show_samples`] for usage.

use eframe::egui;
use egui_plot::{Line, LineStyle, Plot, PlotPoints, Polygon};
use lenseval_analysis::{
    compare::{ComparisonPlot, X_LABEL, Y_LABEL},
    inspect::SampleReport,
};

use crate::{colormap::count_color, image::grayscale};

/// Configuration for rendering a window.
///
/// Construct with [`ShowConfig::new`] and chain builder methods as needed.
///
/// # Example
///
/// ```ignore
/// show_comparison(&plot, ShowConfig::new().title("theta_E").image_scale(4.0))?;
/// ```
pub struct ShowConfig {
    title: Option<String>,
    image_scale: f32,
}

impl ShowConfig {
    /// Creates a new `ShowConfig` with defaults: no title, images drawn at 3x.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            image_scale: 3.0,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets how many screen points each image pixel covers.
    #[must_use]
    pub fn image_scale(mut self, scale: f32) -> Self {
        self.image_scale = scale;
        self
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens a blocking window with the hexbin density of prediction against
/// truth.
///
/// Both axes share the plot's extent and are drawn at equal aspect, with the
/// perfect-prediction diagonal dashed over the hexagons.
///
/// # Errors
///
/// Returns an error if the native window cannot be created.
pub fn show_comparison(plot: &ComparisonPlot, config: ShowConfig) -> Result<(), eframe::Error> {
    let title = config.title.unwrap_or_else(|| plot.title.clone());
    let app = ComparisonApp {
        heading: plot.title.clone(),
        hexagons: hexagons(plot),
        diagonal: plot.diagonal,
    };

    eframe::run_native(
        &title,
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}

/// Opens a blocking window listing inspected samples with their images.
///
/// # Errors
///
/// Returns an error if the native window cannot be created.
pub fn show_samples(reports: Vec<SampleReport>, config: ShowConfig) -> Result<(), eframe::Error> {
    let title = config.title.unwrap_or_else(|| "Samples".to_owned());
    let app = SamplesApp {
        reports,
        textures: Vec::new(),
        scale: config.image_scale,
    };

    eframe::run_native(
        &title,
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}

/// Outlines and fill colors of every occupied cell.
fn hexagons(plot: &ComparisonPlot) -> Vec<([[f64; 2]; 6], [u8; 3])> {
    let max = plot.bins.max_count();
    plot.bins
        .cells()
        .iter()
        .map(|cell| (plot.bins.vertices(cell), count_color(cell.count, max)))
        .collect()
}

struct ComparisonApp {
    heading: String,
    hexagons: Vec<([[f64; 2]; 6], [u8; 3])>,
    diagonal: [[f64; 2]; 2],
}

impl eframe::App for ComparisonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.heading);
            Plot::new("comparison")
                .data_aspect(1.0)
                .x_axis_label(X_LABEL)
                .y_axis_label(Y_LABEL)
                .show(ui, |plot_ui| {
                    for (vertices, [r, g, b]) in &self.hexagons {
                        let fill = egui::Color32::from_rgb(*r, *g, *b);
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(vertices.to_vec()))
                                .fill_color(fill)
                                .stroke(egui::Stroke::new(0.5, fill)),
                        );
                    }
                    plot_ui.line(
                        Line::new(PlotPoints::from(self.diagonal.to_vec()))
                            .color(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128))
                            .style(LineStyle::dashed_dense()),
                    );
                });
        });
    }
}

struct SamplesApp {
    reports: Vec<SampleReport>,
    textures: Vec<egui::TextureHandle>,
    scale: f32,
}

impl eframe::App for SamplesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.textures.len() != self.reports.len() {
            self.textures = self
                .reports
                .iter()
                .map(|report| {
                    let gray = grayscale(&report.image);
                    ctx.load_texture(
                        format!("sample-{}-{}", report.batch, report.sample),
                        egui::ColorImage::from_gray(gray.size, &gray.pixels),
                        egui::TextureOptions::NEAREST,
                    )
                })
                .collect();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (report, texture) in self.reports.iter().zip(&self.textures) {
                    ui.horizontal(|ui| {
                        ui.add(egui::Image::from_texture((
                            texture.id(),
                            texture.size_vec2() * self.scale,
                        )));
                        ui.vertical(|ui| {
                            ui.strong(format!("batch {}, sample {}", report.batch, report.sample));
                            for line in &report.lines {
                                ui.monospace(line.to_string());
                            }
                        });
                    });
                    ui.separator();
                }
            });
        });
    }
}
