use crate::core::{DrawTarget, Rgb, SurfaceConfig, Wash};
use crate::dom;
use glam::Vec2;
use std::f64::consts::TAU;
use web_sys as web;

/// `DrawTarget` over a 2D canvas context. Canvas calls that can throw
/// (gradients, arcs) are ignored on failure so one bad element never kills
/// the frame.
pub struct Canvas2d {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl Canvas2d {
    pub fn new(canvas: web::HtmlCanvasElement, ctx: web::CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    fn fill_disc(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}

impl DrawTarget for Canvas2d {
    fn resize(&mut self, surface: &SurfaceConfig) {
        dom::sync_canvas_backing_size(&self.canvas, surface);
    }

    fn fill_background(&mut self, wash: &Wash, width: f64, height: f64) {
        match wash {
            Wash::Gradient(stops) => {
                let g = self.ctx.create_linear_gradient(0.0, 0.0, width, height);
                for (offset, color) in stops {
                    _ = g.add_color_stop(*offset, &color.hex());
                }
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
            Wash::Fade(color, alpha) => {
                self.ctx.set_fill_style_str(&color.css(*alpha));
            }
            Wash::Clear => {
                self.ctx.clear_rect(0.0, 0.0, width, height);
                return;
            }
        }
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(g) = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, radius.max(0.0) as f64)
        else {
            return;
        };
        _ = g.add_color_stop(0.0, &color.css(alpha));
        _ = g.add_color_stop(1.0, &color.css(0.0));
        self.ctx.set_fill_style_canvas_gradient(&g);
        self.fill_disc(center, radius);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f64, color: Rgb, alpha: f32) {
        self.ctx.set_stroke_style_str(&color.css(alpha));
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&color.css(alpha));
        self.fill_disc(center, radius);
    }
}
