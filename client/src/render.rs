use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use polymesh_shared::{Edge, Point};

pub struct Pen {
    pub color: &'static str,
    pub width: f64,
}

pub const POLYGON_PEN: Pen = Pen {
    color: "red",
    width: 2.0,
};
pub const MESH_PEN: Pen = Pen {
    color: "blue",
    width: 1.0,
};
pub const POINT_RADIUS: f64 = 3.0;

/// Where the editor draws. Drawing is additive; only `clear` erases.
pub trait Surface {
    fn clear(&self);
    fn draw_dot(&self, point: Point, radius: f64, color: &str);
    fn draw_segment(&self, from: Point, to: Point, pen: &Pen);
}

pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_dot(&self, point: Point, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(point.x, point.y, radius, 0.0, std::f64::consts::PI * 2.0);
        self.ctx.fill();
    }

    fn draw_segment(&self, from: Point, to: Point, pen: &Pen) {
        self.ctx.set_stroke_style_str(pen.color);
        self.ctx.set_line_width(pen.width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}

pub fn draw_mesh(surface: &impl Surface, edges: &[Edge]) {
    surface.clear();
    for Edge(from, to) in edges {
        surface.draw_segment(*from, *to, &MESH_PEN);
    }
}
