use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

use crate::config::DashboardConfig;
use crate::state::{AppState, StatusMessage};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GradePandaApp {
    pub state: AppState,
}

impl GradePandaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = state.config.cjk_font_path.clone() {
            if let Err(e) = install_cjk_font(&cc.egui_ctx, &path) {
                log::error!("Failed to load font: {e:#}");
                state.status_message = Some(StatusMessage::Error(format!("Error: {e:#}")));
            }
        }
        Self { state }
    }
}

/// Append a font with CJK glyphs as fallback to both font families.
fn install_cjk_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading font {}", path.display()))?;
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
    log::info!("Installed CJK font from {}", path.display());
    Ok(())
}

impl eframe::App for GradePandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: export, min score, bulk delete ----
        egui::SidePanel::left("advanced_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: fixed roster queries ----
        egui::TopBottomPanel::bottom("answers_panel")
            .resizable(true)
            .default_height(240.0)
            .show(ctx, |ui| {
                panels::answers_panel(ui, &self.state);
            });

        // ---- Central panel: data / analysis / class comparison ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(3, |cols| {
                    panels::data_column(&mut cols[0], &mut self.state);

                    panels::metrics(&mut cols[1], &self.state);
                    plot::score_histogram(&mut cols[1], &self.state);

                    panels::class_column(&mut cols[2], &mut self.state);
                    plot::class_box_plot(&mut cols[2], &self.state);
                });
            });
        });
    }
}
