//! Interactive track brush built with eframe/egui.
//!
//! This module defines [`Viewer`], which captures pointer strokes, hands
//! them to the growth core and paints the resulting branch drawings.
//! Canvas coordinates double as world coordinates: `(0, 0)` is the top-left
//! corner of the drawing area.

use std::path::{Path, PathBuf};

use brush_core::{
    BranchNode, Color, Config, ConstructionStats, MAX_LEVELS, Primitive, RngSource, TreeBrush, svg,
    track,
};
use eframe::App;
use glam::Vec2;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Marker drawn for every terminal branch tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leaf {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Primitives grown from one finished stroke.
#[derive(Debug, Default)]
struct Drawing {
    primitives: Vec<Primitive<Leaf>>,
}

/// Main application state for the brush.
///
/// ### Fields
/// - `cfg` - Growth configuration handed to every construction.
/// - `seed` - Seed the random source was created from (shown in the UI).
/// - `rnd` - Random source shared by all strokes of this session.
///
/// - `stroke` - Positions of the stroke being drawn, in capture order.
/// - `min_points` - Strokes shorter than this are discarded on release.
/// - `drawings` - One entry per grown stroke, painted every frame.
///
/// - `leaf_radius` / `leaf_color` - Style of the leaf markers.
/// - `canvas_size` - Size of the drawing area, used for SVG export.
/// - `last_stats` / `last_message` - Status bar contents.
pub struct Viewer {
    cfg: Config,
    seed: u64,
    rnd: RngSource<StdRng>,

    stroke: Vec<Vec2>,
    min_points: usize,
    drawings: Vec<Drawing>,

    leaf_radius: f32,
    leaf_color: Color,
    canvas_size: Vec2,
    export_path: PathBuf,

    last_stats: Option<ConstructionStats>,
    last_message: Option<String>,
}

impl Viewer {
    /// Creates an empty canvas using `cfg` and a random source seeded with `seed`.
    pub fn new(cfg: Config, seed: u64) -> Self {
        Self {
            cfg,
            seed,
            rnd: RngSource::seeded(seed),
            stroke: Vec::with_capacity(256),
            min_points: 10,
            drawings: Vec::new(),
            leaf_radius: 3.0,
            leaf_color: Color::rgb(46, 139, 87),
            canvas_size: Vec2::new(800.0, 600.0),
            export_path: PathBuf::from("track_brush.svg"),
            last_stats: None,
            last_message: None,
        }
    }

    /// Starts a fresh random source from a new seed.
    fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rnd = RngSource::seeded(seed);
    }

    /// Removes every drawing and any stroke in progress.
    fn clear(&mut self) {
        self.stroke.clear();
        self.drawings.clear();
        self.last_stats = None;
        self.last_message = None;
    }

    /// Records a pointer position for the current stroke.
    ///
    /// Consecutive duplicates are skipped so a resting pointer does not
    /// feed zero-length moves into the growth.
    fn track_point(&mut self, pos: Vec2) {
        if self.stroke.last() != Some(&pos) {
            self.stroke.push(pos);
        }
    }

    /// Grows a drawing from the stroke in progress and clears the stroke.
    ///
    /// ### Returns
    /// `true` if a drawing was added, `false` if the stroke was too short
    /// or the construction failed.
    fn finish_stroke(&mut self) -> bool {
        let positions = std::mem::take(&mut self.stroke);
        if positions.len() < self.min_points {
            debug!(points = positions.len(), "stroke too short, discarded");
            return false;
        }

        let points = track(&positions);
        let (radius, color) = (self.leaf_radius, self.leaf_color);
        let result = TreeBrush::new(self.cfg.clone())
            .leaf_fn(move |n: &BranchNode| Leaf {
                center: n.tip,
                radius,
                color,
            })
            .construct(&points, &mut self.rnd);

        match result {
            Ok(built) => {
                info!(
                    points = points.len(),
                    primitives = built.primitives.len(),
                    forks = built.stats.forced_forks,
                    "stroke grown"
                );
                self.last_stats = Some(built.stats);
                self.last_message = None;
                self.drawings.push(Drawing {
                    primitives: built.primitives,
                });
                true
            }
            Err(e) => {
                warn!(error = %e, "stroke rejected");
                self.last_message = Some(e.to_string());
                false
            }
        }
    }

    fn primitive_count(&self) -> usize {
        self.drawings.iter().map(|d| d.primitives.len()).sum()
    }

    /// Serializes every drawing into one SVG document.
    fn svg_document(&self) -> String {
        let all: Vec<Primitive<Leaf>> = self
            .drawings
            .iter()
            .flat_map(|d| d.primitives.iter().cloned())
            .collect();
        svg::render(&all, self.canvas_size, |leaf| {
            format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                leaf.center.x,
                leaf.center.y,
                leaf.radius,
                leaf.color.to_hex()
            )
        })
    }

    fn export_svg(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.svg_document())
    }

    /// Converts a canvas position to screen-space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    /// Converts a screen-space position back to canvas coordinates.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    fn color32(c: Color) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }

    /// Helper to draw a labeled numeric [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: std::ops::RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (clear, export, reseed).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    self.clear();
                }

                if ui.button("Export SVG").clicked() {
                    let path = self.export_path.clone();
                    match self.export_svg(&path) {
                        Ok(()) => {
                            info!(path = %path.display(), "exported svg");
                            self.last_message = Some(format!("saved {}", path.display()));
                        }
                        Err(e) => {
                            warn!(error = %e, "svg export failed");
                            self.last_message = Some(format!("export failed: {e}"));
                        }
                    }
                }

                ui.separator();
                if ui.button("Reseed").clicked() {
                    self.reseed(rand::random());
                }
                ui.label(format!("seed = {}", self.seed));
            });
        });
    }

    /// Builds the bottom status bar (drawings, primitives, last construction).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("drawings = {}", self.drawings.len()));
                ui.label(format!("primitives = {}", self.primitive_count()));
                if let Some(s) = &self.last_stats {
                    ui.separator();
                    ui.label(format!(
                        "last: forks = {}, splits = {}, prunes = {}, nodes = {}",
                        s.forced_forks, s.splits, s.prunes, s.active_nodes
                    ));
                }
                if let Some(msg) = &self.last_message {
                    ui.separator();
                    ui.label(msg.as_str());
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Branches");
                Self::labeled_drag(
                    ui,
                    "max_levels:",
                    &mut self.cfg.max_levels,
                    1..=MAX_LEVELS,
                    0.1,
                );
                Self::labeled_drag(ui, "branch_size:", &mut self.cfg.branch_size, 0.0..=10.0, 0.1);
                Self::labeled_drag(ui, "speed:", &mut self.cfg.speed, 0.0..=40.0, 0.2);
                Self::labeled_drag(ui, "angle_jitter:", &mut self.cfg.angle_jitter, 0.0..=3.0, 0.01);
                Self::labeled_drag(ui, "trunk_life:", &mut self.cfg.trunk_life, 1..=100, 0.2);

                let c = self.cfg.branch_color;
                let mut rgb = [c.r, c.g, c.b];
                ui.horizontal(|ui| {
                    ui.label("branch_color:");
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        self.cfg.branch_color = Color::rgb(rgb[0], rgb[1], rgb[2]);
                    }
                });

                ui.separator();
                ui.label("Forking");
                Self::labeled_drag(ui, "max_distance:", &mut self.cfg.max_distance, 0.0..=500.0, 0.5);
                Self::labeled_drag(ui, "fork_threshold:", &mut self.cfg.fork_threshold, 0.0..=1.0, 0.01);
                Self::labeled_drag(
                    ui,
                    "sibling_threshold:",
                    &mut self.cfg.sibling_threshold,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag(ui, "max_branches:", &mut self.cfg.max_branches, 0..=2000, 1.0);

                ui.separator();
                ui.label("Stroke");
                Self::labeled_drag(ui, "min_points:", &mut self.min_points, 3..=200, 1.0);
                Self::labeled_drag(ui, "leaf_radius:", &mut self.leaf_radius, 0.5..=20.0, 0.1);

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    fn paint_drawing(&self, painter: &egui::Painter, rect: egui::Rect, drawing: &Drawing) {
        for p in &drawing.primitives {
            match p {
                Primitive::Segment(s) => {
                    let pts: Vec<egui::Pos2> = s
                        .sample(8)
                        .into_iter()
                        .map(|q| self.world_to_screen(q, rect))
                        .collect();
                    let stroke =
                        egui::Stroke::new(s.style.width.max(0.0), Self::color32(s.style.color));
                    painter.add(egui::Shape::line(pts, stroke));
                }
                Primitive::Leaf(leaf) => {
                    painter.circle_filled(
                        self.world_to_screen(leaf.center, rect),
                        leaf.radius,
                        Self::color32(leaf.color),
                    );
                }
            }
        }
    }

    /// Builds the central canvas: captures strokes and paints drawings.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);
            self.canvas_size = Vec2::new(rect.width(), rect.height());

            painter.rect_filled(rect, 0.0, egui::Color32::WHITE);

            if response.drag_started() {
                self.stroke.clear();
            }
            if response.dragged()
                && let Some(p) = response.interact_pointer_pos()
            {
                let world = self.screen_to_world(p, rect);
                self.track_point(world);
            }
            if response.drag_stopped() {
                self.finish_stroke();
            }

            for drawing in &self.drawings {
                self.paint_drawing(&painter, rect, drawing);
            }

            // Stroke in progress.
            for &p in &self.stroke {
                painter.circle_filled(self.world_to_screen(p, rect), 2.0, egui::Color32::GRAY);
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(40.0, 30.0), egui::vec2(800.0, 600.0))
    }

    fn draw_stroke(viewer: &mut Viewer, n: usize) {
        for i in 0..n {
            let t = i as f32;
            viewer.track_point(Vec2::new(100.0 + t * 4.0, 300.0 - t * 2.0));
        }
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let viewer = Viewer::new(Config::default(), 1);
        let rect = test_rect();

        for p in [Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0), Vec2::new(3.5, 8.25)] {
            let back = viewer.screen_to_world(viewer.world_to_screen(p, rect), rect);
            assert!((back - p).length() < 1e-5, "p={p:?}, back={back:?}");
        }
    }

    #[test]
    fn duplicate_pointer_positions_are_skipped() {
        let mut viewer = Viewer::new(Config::default(), 1);
        viewer.track_point(Vec2::new(1.0, 1.0));
        viewer.track_point(Vec2::new(1.0, 1.0));
        viewer.track_point(Vec2::new(2.0, 1.0));
        assert_eq!(viewer.stroke.len(), 2);
    }

    #[test]
    fn short_strokes_are_discarded() {
        let mut viewer = Viewer::new(Config::default(), 1);
        let n = viewer.min_points - 1;
        draw_stroke(&mut viewer, n);

        assert!(!viewer.finish_stroke());
        assert!(viewer.drawings.is_empty());
        assert!(viewer.stroke.is_empty());
    }

    #[test]
    fn finished_stroke_becomes_a_drawing() {
        let mut viewer = Viewer::new(Config::default(), 7);
        draw_stroke(&mut viewer, 60);

        assert!(viewer.finish_stroke());
        assert_eq!(viewer.drawings.len(), 1);
        assert!(viewer.primitive_count() > 0);
        assert_eq!(viewer.last_stats.map(|s| s.ticks), Some(59));
        assert!(viewer.stroke.is_empty());
    }

    #[test]
    fn invalid_config_reports_an_error() {
        let cfg = Config {
            fork_threshold: 2.0,
            ..Config::default()
        };
        let mut viewer = Viewer::new(cfg, 1);
        draw_stroke(&mut viewer, 20);

        assert!(!viewer.finish_stroke());
        assert!(viewer.drawings.is_empty());
        assert!(viewer.last_message.is_some());
    }

    #[test]
    fn same_seed_grows_same_drawing() {
        let mut a = Viewer::new(Config::default(), 99);
        let mut b = Viewer::new(Config::default(), 99);
        draw_stroke(&mut a, 80);
        draw_stroke(&mut b, 80);
        a.finish_stroke();
        b.finish_stroke();

        assert_eq!(a.drawings[0].primitives, b.drawings[0].primitives);
    }

    #[test]
    fn svg_document_contains_every_drawing() {
        let mut viewer = Viewer::new(Config::default(), 5);
        draw_stroke(&mut viewer, 60);
        viewer.finish_stroke();

        let doc = viewer.svg_document();
        let elements = doc.lines().filter(|l| l.starts_with("  <")).count();
        assert_eq!(elements, viewer.primitive_count());
        assert!(doc.contains("<path"));
    }

    #[test]
    fn clear_removes_all_content() {
        let mut viewer = Viewer::new(Config::default(), 3);
        draw_stroke(&mut viewer, 30);
        viewer.finish_stroke();
        viewer.track_point(Vec2::new(1.0, 2.0));

        viewer.clear();

        assert!(viewer.drawings.is_empty());
        assert!(viewer.stroke.is_empty());
        assert!(viewer.last_stats.is_none());
    }
}
