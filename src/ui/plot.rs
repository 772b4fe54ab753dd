use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, MarkerShape, Plot,
    PlotPoints, Points, VLine,
};

use crate::data::model::PASS_THRESHOLD;
use crate::data::stats::{box_summaries, histogram, kde_curve};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 260.0;
const KDE_SAMPLES: usize = 200;

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.weak("无数据");
    });
}

// ---------------------------------------------------------------------------
// Score histogram
// ---------------------------------------------------------------------------

/// Histogram of visible scores with a density curve and a dashed pass line.
pub fn score_histogram(ui: &mut Ui, state: &AppState) {
    ui.strong("分数分布直方图");
    let bins = histogram(
        &state.roster,
        &state.visible_indices,
        state.config.histogram_bins,
    );
    if bins.is_empty() {
        ui.allocate_ui(placeholder_size(ui), no_data);
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect();
    let chart = BarChart::new(bars)
        .name("人数")
        .color(Color32::from_rgb(100, 149, 237));

    // Density rescaled to counts per bin so it overlays the bars.
    let scale = state.visible_indices.len() as f64 * bins[0].width();
    let kde: PlotPoints = kde_curve(&state.roster, &state.visible_indices, KDE_SAMPLES)
        .into_iter()
        .map(|[x, y]| [x, y * scale])
        .collect();

    Plot::new("score_histogram")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("分数")
        .y_axis_label("人数")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.line(
                Line::new(kde)
                    .name("KDE")
                    .color(Color32::from_rgb(25, 70, 160))
                    .width(2.0),
            );
            plot_ui.vline(
                VLine::new(f64::from(PASS_THRESHOLD))
                    .name("及格线")
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

// ---------------------------------------------------------------------------
// Per-class box plot
// ---------------------------------------------------------------------------

/// One box per visible class; scores beyond the whiskers drawn as points.
pub fn class_box_plot(ui: &mut Ui, state: &AppState) {
    ui.strong("班级成绩对比");
    let summaries = box_summaries(&state.roster, &state.visible_indices);
    if summaries.is_empty() {
        ui.allocate_ui(placeholder_size(ui), no_data);
        return;
    }

    let mut outliers: Vec<[f64; 2]> = Vec::new();
    let boxes: Vec<BoxElem> = summaries
        .iter()
        .map(|s| {
            let x = f64::from(s.class_id.get());
            let color = state.class_colors.color_for(s.class_id);
            outliers.extend(s.outliers.iter().map(|&y| [x, y]));
            BoxElem::new(
                x,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(format!("{} 班", s.class_id))
            .box_width(0.5)
            .fill(color.gamma_multiply(0.6))
            .stroke(Stroke::new(1.5, color))
        })
        .collect();

    Plot::new("class_box_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("班级")
        .y_axis_label("分数")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("分数"));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(outliers)
                        .name("离群值")
                        .shape(MarkerShape::Diamond)
                        .radius(3.0)
                        .color(Color32::DARK_GRAY),
                );
            }
        });
}

fn placeholder_size(ui: &Ui) -> eframe::egui::Vec2 {
    eframe::egui::vec2(ui.available_width(), PLOT_HEIGHT)
}
