use std::io;

use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

use crate::core::{CameraFrame, Color, Scene};
use crate::pipeline::buffer::Buffer;

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4; // 45 degrees
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 500.0;
/// Clip-space w below which a point counts as behind the eye.
const W_EPS: f32 = 1e-4;

/// Wireframe renderer: walks every body's mesh edges, transforms them to
/// clip space, clips against the eye plane and draws depth-tested lines.
pub struct Pipeline<B: Buffer> {
    pub width: usize,
    pub height: usize,
    buffer: B,
    projection: Mat4,
}

impl<B: Buffer> Pipeline<B> {
    /// `aspect` is passed separately from width/height so terminal targets
    /// can correct for non-square character cells.
    pub fn new(width: usize, height: usize, aspect: f32) -> Self {
        Self {
            width,
            height,
            buffer: B::new(width, height),
            projection: Mat4::perspective_rh(FOV_Y, aspect, Z_NEAR, Z_FAR),
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Rasterize one frame: every registered drawable at its body's pose,
    /// plus an optional world-space overlay line.
    pub fn draw(&mut self, scene: &Scene, camera: &CameraFrame, overlay: Option<(Vec3, Vec3, Color)>) {
        self.buffer.clear();
        let view_proj = self.projection * camera.view_matrix();

        for body in &scene.bodies {
            let Some(handle) = body.drawable else { continue };
            let Some(mesh) = scene.store.get(handle) else { continue };
            let mvp = view_proj * body.model_matrix();
            // Resolve material colors once per mesh, not per edge.
            let palette: Vec<Color> = mesh.materials.iter().map(|m| m.base_color()).collect();
            for edge in &mesh.edges {
                let color = edge
                    .material
                    .and_then(|i| palette.get(i).copied())
                    .unwrap_or_default();
                let a = mvp * mesh.vertices[edge.a as usize].pos.extend(1.0);
                let b = mvp * mesh.vertices[edge.b as usize].pos.extend(1.0);
                self.draw_clip_line(a, b, color);
            }
        }

        if let Some((from, to, color)) = overlay {
            let a = view_proj * from.extend(1.0);
            let b = view_proj * to.extend(1.0);
            self.draw_clip_line(a, b, color);
        }
    }

    pub fn present(&self, target: &mut B::Target) -> io::Result<()> {
        self.buffer.present(target)
    }

    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &CameraFrame,
        overlay: Option<(Vec3, Vec3, Color)>,
        target: &mut B::Target,
    ) -> io::Result<()> {
        self.draw(scene, camera, overlay);
        self.present(target)
    }

    /// Clip a line against the w = W_EPS plane and the screen rectangle,
    /// then rasterize it. An endpoint grazing the eye plane projects
    /// millions of pixels offscreen; the screen clip keeps the DDA step
    /// count bounded by the viewport.
    fn draw_clip_line(&mut self, mut a: Vec4, mut b: Vec4, color: Color) {
        if a.w < W_EPS && b.w < W_EPS {
            return;
        }
        if a.w < W_EPS {
            let t = (W_EPS - a.w) / (b.w - a.w);
            a = a.lerp(b, t);
        } else if b.w < W_EPS {
            let t = (W_EPS - b.w) / (a.w - b.w);
            b = b.lerp(a, t);
        }

        let half_w = self.width as f32 * 0.5;
        let half_h = self.height as f32 * 0.5;
        let ndc_a = a.xyz() / a.w;
        let ndc_b = b.xyz() / b.w;
        let ax = (ndc_a.x + 1.0) * half_w;
        let ay = (1.0 - ndc_a.y) * half_h;
        let bx = (ndc_b.x + 1.0) * half_w;
        let by = (1.0 - ndc_b.y) * half_h;

        // Liang-Barsky against the viewport.
        let (dx, dy) = (bx - ax, by - ay);
        let (mut t0, mut t1) = (0.0f32, 1.0f32);
        if !(clip_span(-dx, ax, &mut t0, &mut t1)
            && clip_span(dx, self.width as f32 - ax, &mut t0, &mut t1)
            && clip_span(-dy, ay, &mut t0, &mut t1)
            && clip_span(dy, self.height as f32 - ay, &mut t0, &mut t1))
        {
            return;
        }
        let (sax, say) = (ax + dx * t0, ay + dy * t0);
        let (sbx, sby) = (ax + dx * t1, ay + dy * t1);
        let za = ndc_a.z + (ndc_b.z - ndc_a.z) * t0;
        let zb = ndc_a.z + (ndc_b.z - ndc_a.z) * t1;

        // DDA over the dominant axis, interpolating depth.
        let steps = (sbx - sax).abs().max((sby - say).abs()).ceil().max(1.0);
        let inv = 1.0 / steps;
        for i in 0..=steps as u32 {
            let t = i as f32 * inv;
            let x = sax + (sbx - sax) * t;
            let y = say + (sby - say) * t;
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let depth = za + (zb - za) * t;
            self.buffer.set_pixel(x as usize, y as usize, depth, color);
        }
    }
}

/// One Liang-Barsky span test: shrinks `[t0, t1]` to the portion of the
/// segment satisfying `p * t <= q`. False once the span is empty.
fn clip_span(p: f32, q: f32, t0: &mut f32, t1: &mut f32) -> bool {
    if p == 0.0 {
        return q >= 0.0;
    }
    let r = q / p;
    if p < 0.0 {
        if r > *t1 {
            return false;
        }
        if r > *t0 {
            *t0 = r;
        }
    } else {
        if r < *t0 {
            return false;
        }
        if r < *t1 {
            *t1 = r;
        }
    }
    true
}
