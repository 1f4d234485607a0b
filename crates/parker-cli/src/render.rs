//! SVG rendering of animation frames
//!
//! Plots use HEE axes the way the heliospheric plots do: HEE Y runs along the
//! horizontal axis and HEE X points down the page, so Earth sits below the Sun.

use nalgebra::Vector2;
use parker_core::coordinates::CartesianPosition;
use parker_sim::{FrameSink, FrameState, SimError, SimResult, SpiralBranch};
use std::path::{Path, PathBuf};
use svg::node::element::{Circle, Line, Path as SvgPath, Text};
use svg::node::Text as TextNode;
use svg::{Document, Node};

/// Canvas size in pixels
const CANVAS: f64 = 800.0;

/// A spacecraft marker with its Sun line
#[derive(Clone, Debug, PartialEq)]
struct Craft {
    label: String,
    /// Plot axes (AU)
    plot: Vector2<f64>,
    color: String,
}

/// Writes one `frame_NNNN.svg` per recorded frame
pub struct SvgSink {
    dir: PathBuf,
    /// Half-width of the plotted area (AU)
    extent_au: f64,
    /// Observer orbit in plot axes (AU)
    orbit: Vec<Vector2<f64>>,
    observer: Vector2<f64>,
    craft: Vec<Craft>,
}

impl SvgSink {
    pub fn new(dir: impl Into<PathBuf>, extent_au: f64) -> SimResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        if !(extent_au > 0.0) {
            return Err(SimError::Sink(format!("plot extent must be positive, got {}", extent_au)));
        }
        Ok(Self {
            dir,
            extent_au,
            orbit: Vec::new(),
            observer: Vector2::new(0.0, 1.0),
            craft: Vec::new(),
        })
    }

    /// Dashed observer orbit drawn under every frame
    pub fn with_orbit(mut self, track: &[CartesianPosition]) -> Self {
        self.orbit = track.iter().map(|p| p.to_plot_xy()).collect();
        self
    }

    /// Observer marker position (HEE, AU)
    pub fn with_observer(mut self, observer_hee: Vector2<f64>) -> Self {
        self.observer = Vector2::new(observer_hee.y, observer_hee.x);
        self
    }

    /// Spacecraft marker joined to the Sun by a dotted line (HEE position)
    pub fn with_spacecraft(mut self, label: &str, position: &CartesianPosition, color: &str) -> Self {
        self.craft.push(Craft {
            label: label.to_string(),
            plot: position.to_plot_xy(),
            color: color.to_string(),
        });
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, frame_index: u32) -> PathBuf {
        self.dir.join(format!("frame_{:04}.svg", frame_index))
    }

    /// Plot coordinates (AU) to canvas pixels
    fn to_canvas(&self, plot: Vector2<f64>) -> (f64, f64) {
        let scale = CANVAS / (2.0 * self.extent_au);
        (CANVAS / 2.0 + plot.x * scale, CANVAS / 2.0 + plot.y * scale)
    }

    fn polyline(&self, points: impl Iterator<Item = Vector2<f64>>) -> Option<String> {
        let mut d = String::new();
        for (i, p) in points.enumerate() {
            let (x, y) = self.to_canvas(p);
            let cmd = if i == 0 { 'M' } else { 'L' };
            d.push_str(&format!("{} {:.2} {:.2} ", cmd, x, y));
        }
        if d.is_empty() {
            None
        } else {
            Some(d.trim_end().to_string())
        }
    }

    fn marker(&self, plot: Vector2<f64>, radius: f64, color: &str) -> Circle {
        let (cx, cy) = self.to_canvas(plot);
        Circle::new()
            .set("cx", cx)
            .set("cy", cy)
            .set("r", radius)
            .set("fill", color)
    }

    /// Dotted line from the Sun to `plot`
    fn sun_line(&self, plot: Vector2<f64>, color: &str) -> Line {
        let (sx, sy) = self.to_canvas(Vector2::zeros());
        let (x, y) = self.to_canvas(plot);
        Line::new()
            .set("x1", sx)
            .set("y1", sy)
            .set("x2", x)
            .set("y2", y)
            .set("stroke", color)
            .set("stroke-dasharray", "2 4")
    }

    fn label(&self, plot: Vector2<f64>, text: &str, color: &str) -> Text {
        let (x, y) = self.to_canvas(plot);
        let mut node = Text::new()
            .set("x", x + 8.0)
            .set("y", y - 8.0)
            .set("fill", color)
            .set("font-size", 14);
        node.append(TextNode::new(text));
        node
    }

    /// Build the document for one frame
    pub fn document(&self, frame: &FrameState) -> Document {
        let mut document = Document::new()
            .set("viewBox", (0.0, 0.0, CANVAS, CANVAS))
            .set("width", CANVAS)
            .set("height", CANVAS);

        document.append(
            svg::node::element::Rectangle::new()
                .set("width", CANVAS)
                .set("height", CANVAS)
                .set("fill", "white"),
        );

        // Sun-Earth line
        document.append(self.sun_line(self.observer, "gray"));
        for craft in &self.craft {
            document.append(self.sun_line(craft.plot, &craft.color));
        }

        if let Some(d) = self.polyline(self.orbit.iter().copied()) {
            document.append(
                SvgPath::new()
                    .set("d", d)
                    .set("fill", "none")
                    .set("stroke", "gray")
                    .set("stroke-dasharray", "8 6"),
            );
        }

        for branch in SpiralBranch::all() {
            let positions = &frame.branch(*branch).positions;
            let plot = positions.iter().map(|p| Vector2::new(p.y, p.x));
            if let Some(d) = self.polyline(plot) {
                document.append(
                    SvgPath::new()
                        .set("d", d)
                        .set("fill", "none")
                        .set("stroke", branch.color())
                        .set("stroke-width", 2),
                );
            }
        }

        document.append(self.marker(Vector2::zeros(), 12.0, "orange"));
        document.append(self.label(Vector2::zeros(), "Sun", "orange"));
        document.append(self.marker(self.observer, 7.0, "lime"));
        document.append(self.label(self.observer, "Earth", "lime"));
        for craft in &self.craft {
            document.append(self.marker(craft.plot, 5.0, &craft.color));
            document.append(self.label(craft.plot, &craft.label, &craft.color));
        }

        let mut title = Text::new()
            .set("x", 20)
            .set("y", 30)
            .set("fill", "black")
            .set("font-size", 18);
        title.append(TextNode::new(frame.timestamp_text.as_str()));
        document.append(title);

        document
    }
}

impl FrameSink for SvgSink {
    fn record(&mut self, frame: &FrameState) -> SimResult<()> {
        let path = self.frame_path(frame.frame_index);
        svg::save(&path, &self.document(frame))?;
        tracing::trace!("Rendered {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifitime::Epoch;
    use parker_sim::{FrameAdvanceEngine, FrameClock, PhysicalParameters, SpiralGeometry};
    use tempfile::tempdir;

    fn engine() -> FrameAdvanceEngine {
        let geometry = SpiralGeometry::build(&PhysicalParameters::default());
        let start = Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0);
        FrameAdvanceEngine::new(geometry, FrameClock::at_epoch(start))
    }

    #[test]
    fn test_one_file_per_frame() {
        let dir = tempdir().unwrap();
        let mut sink = SvgSink::new(dir.path().join("frames"), 2.75).unwrap();
        let mut engine = engine();

        engine.advance(0, &mut sink).unwrap();
        engine.advance(1, &mut sink).unwrap();
        engine.advance(1, &mut sink).unwrap();

        let count = std::fs::read_dir(sink.dir()).unwrap().count();
        assert_eq!(count, 2);

        let text = std::fs::read_to_string(sink.frame_path(1)).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("stroke=\"red\""));
        assert!(text.contains("stroke=\"blue\""));
        assert!(text.contains("23-Jan-2008 18:35 UT"));
    }

    #[test]
    fn test_earth_below_sun() {
        let dir = tempdir().unwrap();
        let sink = SvgSink::new(dir.path(), 2.0).unwrap();
        let (sun_x, sun_y) = sink.to_canvas(Vector2::zeros());
        let (earth_x, earth_y) = sink.to_canvas(sink.observer);
        assert_eq!(sun_x, earth_x);
        assert!(earth_y > sun_y);
    }

    #[test]
    fn test_spacecraft_markers_and_sun_lines() {
        let dir = tempdir().unwrap();
        let a = CartesianPosition::from_au(0.9, 0.35, 0.0);
        let sink = SvgSink::new(dir.path(), 2.0).unwrap().with_spacecraft("A", &a, "red");

        let state = engine().compute(0);
        let text = sink.document(&state).to_string();

        let (x, y) = sink.to_canvas(a.to_plot_xy());
        assert!(text.contains(&format!("cx=\"{}\"", x)));
        assert!(text.contains(&format!("cy=\"{}\"", y)));
        assert!(text.contains(&format!("x2=\"{}\"", x)));
        assert!(text.contains(">A<") || text.contains(">\nA\n<"));
        // Earth line plus one per craft
        assert_eq!(text.matches("stroke-dasharray=\"2 4\"").count(), 2);
    }

    #[test]
    fn test_invalid_extent() {
        let dir = tempdir().unwrap();
        assert!(SvgSink::new(dir.path(), 0.0).is_err());
    }
}
