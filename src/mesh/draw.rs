use super::{Mesh, PackGeometry};
use crate::base::{BACKGROUND_MARKER, BATTERY_BOUNDARY_MARKER};
use crate::StrError;
use plotpy::{Canvas, Plot, Text};
use std::ffi::OsStr;

/// Defines the colors used to fill the battery sub-domains
const BATTERY_COLORS: [&str; 8] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
];

/// Defines the color of the background (copper)
const BACKGROUND_COLOR: &str = "#e8c9a0";

/// Holds options to draw the mesh
pub struct Figure {
    /// Draws the edges of the triangles
    pub cell_edges: bool,

    /// Fills the triangles with the color of their sub-domain
    pub subdomains: bool,

    /// Draws the battery boundary facets with a thick line
    pub battery_boundary: bool,

    /// Writes the battery tags at the center of each battery
    pub battery_tags: bool,

    /// Title of the figure (empty means no title)
    pub title: String,

    /// Figure size in points
    pub figure_size: Option<(f64, f64)>,
}

impl Figure {
    /// Allocates a new instance with the cell edges only
    pub fn new() -> Self {
        Figure {
            cell_edges: true,
            subdomains: false,
            battery_boundary: false,
            battery_tags: false,
            title: String::new(),
            figure_size: Some((600.0, 600.0)),
        }
    }

    /// Allocates a new instance to illustrate the sub-domains
    pub fn new_subdomains() -> Self {
        Figure {
            cell_edges: false,
            subdomains: true,
            battery_boundary: true,
            battery_tags: true,
            title: "sub-domains".to_string(),
            figure_size: Some((600.0, 600.0)),
        }
    }
}

impl Mesh {
    /// Draws the mesh
    ///
    /// # Input
    ///
    /// * `fig` -- the drawing options (None means `Figure::new()`)
    /// * `geometry` -- the pack geometry; required by `battery_tags`
    /// * `filepath` -- may be a String, &str, or Path
    /// * `extra` -- is a function `|plot, before| {}` to perform some {pre,post}-drawing on the plot area.
    ///   `before` is true if the function is being called before all other drawing functions.
    pub fn draw<P, F>(
        &self,
        fig: Option<Figure>,
        geometry: Option<&PackGeometry>,
        filepath: &P,
        mut extra: F,
    ) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
        F: FnMut(&mut Plot, bool),
    {
        let fig = fig.unwrap_or(Figure::new());
        let mut plot = Plot::new();
        extra(&mut plot, true);

        // cells
        let mut canvas = Canvas::new();
        canvas.set_line_width(0.3);
        for cell in &self.cells {
            let face = if fig.subdomains {
                subdomain_color(cell.marker)
            } else {
                "None"
            };
            let edge = if fig.cell_edges { "#2e2e2e" } else { face };
            canvas.set_face_color(face).set_edge_color(edge);
            canvas.draw_polyline(&self.triangle_coords(cell.id), true);
        }
        plot.add(&canvas);

        // battery boundaries
        if fig.battery_boundary {
            let mut lines = Canvas::new();
            lines.set_edge_color("black").set_line_width(1.5);
            for facet in self.facets_with_marker(BATTERY_BOUNDARY_MARKER) {
                let a = self.points[facet.points[0]].coords;
                let b = self.points[facet.points[1]].coords;
                lines.draw_polyline(&[a, b], false);
            }
            plot.add(&lines);
        }

        // tags
        if fig.battery_tags {
            if let Some(geo) = geometry {
                let mut text = Text::new();
                text.set_color("black").set_fontsize(12.0);
                for (tag, battery) in &geo.batteries {
                    text.draw(battery.center[0], battery.center[1], &format!("{}", tag));
                }
                plot.add(&text);
            }
        }

        // finalize
        extra(&mut plot, false);
        if fig.title.len() > 0 {
            plot.set_title(&fig.title);
        }
        if let Some((width, height)) = fig.figure_size {
            plot.set_figure_size_points(width, height);
        }
        plot.set_equal_axes(true).set_hide_axes(true).save(filepath)
    }

    /// Draws a nodal field (e.g., temperature) by filling each triangle with the color of its average value
    ///
    /// # Input
    ///
    /// * `values` -- the nodal values (npoint)
    /// * `title` -- the title of the figure; the range of values is appended to it
    /// * `filepath` -- may be a String, &str, or Path
    /// * `with_edges` -- also draws the edges of the triangles (the mesh)
    pub fn draw_field<P>(&self, values: &[f64], title: &str, filepath: &P, with_edges: bool) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        if values.len() != self.points.len() {
            return Err("the number of values must be equal to the number of points");
        }
        let (vmin, vmax) = values
            .iter()
            .fold((f64::MAX, f64::MIN), |(a, b), v| (f64::min(a, *v), f64::max(b, *v)));
        let mut canvas = Canvas::new();
        canvas.set_line_width(0.2);
        for cell in &self.cells {
            let mean = cell.points.iter().map(|p| values[*p]).sum::<f64>() / 3.0;
            let color = coolwarm(normalize(mean, vmin, vmax));
            let edge = if with_edges { "#2e2e2e".to_string() } else { color.clone() };
            canvas.set_face_color(&color).set_edge_color(&edge);
            canvas.draw_polyline(&self.triangle_coords(cell.id), true);
        }
        let mut plot = Plot::new();
        plot.add(&canvas)
            .set_title(&format!("{} (min = {:.3}, max = {:.3})", title, vmin, vmax))
            .set_figure_size_points(600.0, 600.0)
            .set_equal_axes(true)
            .set_hide_axes(true)
            .save(filepath)
    }

    /// Draws a nodal vector field (e.g., the projected heat flux) with arrows at the points
    ///
    /// The arrows are colored by the magnitude and scaled such that the largest one has
    /// the length of the average triangle edge.
    ///
    /// # Input
    ///
    /// * `vectors` -- the vectors at the points (npoint)
    /// * `title` -- the title of the figure
    /// * `filepath` -- may be a String, &str, or Path
    pub fn draw_vectors<P>(&self, vectors: &[[f64; 2]], title: &str, filepath: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        if vectors.len() != self.points.len() {
            return Err("the number of vectors must be equal to the number of points");
        }
        let magnitude = |v: &[f64; 2]| f64::sqrt(v[0] * v[0] + v[1] * v[1]);
        let max = vectors.iter().fold(0.0, |acc, v| f64::max(acc, magnitude(v)));
        let h = f64::sqrt(self.area() / (self.cells.len() as f64));
        let scale = if max > 0.0 { h / max } else { 0.0 };
        let mut outline = Canvas::new();
        outline.set_face_color("None").set_edge_color("#cccccc").set_line_width(0.2);
        let mut arrows = Canvas::new();
        arrows.set_arrow_scale(6.0);
        for cell in &self.cells {
            outline.draw_polyline(&self.triangle_coords(cell.id), true);
        }
        for point in &self.points {
            let v = &vectors[point.id];
            let m = magnitude(v);
            if m <= 0.0 {
                continue;
            }
            let [x, y] = point.coords;
            let color = coolwarm(normalize(m, 0.0, max));
            arrows.set_face_color(&color).set_edge_color(&color);
            arrows.draw_arrow(x, y, x + scale * v[0], y + scale * v[1]);
        }
        let mut plot = Plot::new();
        plot.add(&outline)
            .add(&arrows)
            .set_title(&format!("{} (max magnitude = {:.3})", title, max))
            .set_figure_size_points(600.0, 600.0)
            .set_equal_axes(true)
            .set_hide_axes(true)
            .save(filepath)
    }

    /// Returns the coordinates of the points of a triangle
    fn triangle_coords(&self, cell_id: usize) -> [[f64; 2]; 3] {
        let [a, b, c] = self.cells[cell_id].points;
        [self.points[a].coords, self.points[b].coords, self.points[c].coords]
    }
}

/// Returns the fill color of a sub-domain
fn subdomain_color(marker: usize) -> &'static str {
    if marker == BACKGROUND_MARKER {
        BACKGROUND_COLOR
    } else {
        BATTERY_COLORS[(marker - 1) % BATTERY_COLORS.len()]
    }
}

/// Maps a value into [0, 1]
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max - min <= f64::EPSILON * f64::max(1.0, f64::abs(max)) {
        0.5
    } else {
        f64::min(1.0, f64::max(0.0, (value - min) / (max - min)))
    }
}

/// Returns the hex color of the "coolwarm" diverging colormap for t in [0, 1]
///
/// Interpolates linearly between blue (t = 0), light gray (t = 0.5), and red (t = 1).
pub fn coolwarm(t: f64) -> String {
    const COOL: [f64; 3] = [59.0, 76.0, 192.0];
    const MID: [f64; 3] = [221.0, 221.0, 221.0];
    const WARM: [f64; 3] = [180.0, 4.0, 38.0];
    let t = f64::min(1.0, f64::max(0.0, t));
    let (a, b, s) = if t < 0.5 { (COOL, MID, 2.0 * t) } else { (MID, WARM, 2.0 * t - 1.0) };
    let c: Vec<u8> = (0..3).map(|i| f64::round(a[i] + s * (b[i] - a[i])) as u8).collect();
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{coolwarm, normalize, subdomain_color, Figure};
    use crate::base::{ParamPack, DEFAULT_TEST_DIR};
    use crate::mesh::Generator;

    const SAVE_FIGURE: bool = false;

    #[test]
    fn coolwarm_works() {
        assert_eq!(coolwarm(0.0), "#3b4cc0");
        assert_eq!(coolwarm(0.5), "#dddddd");
        assert_eq!(coolwarm(1.0), "#b40426");
        assert_eq!(coolwarm(-1.0), "#3b4cc0");
        assert_eq!(coolwarm(2.0), "#b40426");
    }

    #[test]
    fn normalize_works() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(15.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(298.0, 298.0, 298.0), 0.5);
    }

    #[test]
    fn subdomain_color_works() {
        assert_eq!(subdomain_color(0), "#e8c9a0");
        assert_eq!(subdomain_color(1), "#e6194b");
        assert_eq!(subdomain_color(9), "#e6194b");
    }

    #[test]
    fn draw_captures_errors() {
        let mut param = ParamPack::new();
        param.n_cells = 1;
        param.resolution = 5;
        let (_, mesh) = Generator::pack(&param).unwrap();
        assert_eq!(
            mesh.draw_field(&[0.0], "T", "/tmp/boring/test/none.svg", false).err(),
            Some("the number of values must be equal to the number of points")
        );
        assert_eq!(
            mesh.draw_vectors(&[[0.0, 0.0]], "q", "/tmp/boring/test/none.svg").err(),
            Some("the number of vectors must be equal to the number of points")
        );
    }

    #[test]
    fn draw_works() {
        let mut param = ParamPack::new();
        param.resolution = 12;
        let (geo, mesh) = Generator::pack(&param).unwrap();
        if SAVE_FIGURE {
            let path = format!("{}/draw_mesh_works.svg", DEFAULT_TEST_DIR);
            mesh.draw(None, None, &path, |_, _| {}).unwrap();
            let path = format!("{}/draw_subdomains_works.svg", DEFAULT_TEST_DIR);
            mesh.draw(Some(Figure::new_subdomains()), Some(&geo), &path, |_, _| {})
                .unwrap();
            let values: Vec<_> = mesh.points.iter().map(|p| p.coords[0]).collect();
            let path = format!("{}/draw_field_works.svg", DEFAULT_TEST_DIR);
            mesh.draw_field(&values, "x", &path, true).unwrap();
            let vectors: Vec<_> = mesh.points.iter().map(|p| p.coords).collect();
            let path = format!("{}/draw_vectors_works.svg", DEFAULT_TEST_DIR);
            mesh.draw_vectors(&vectors, "x", &path).unwrap();
        }
    }
}
