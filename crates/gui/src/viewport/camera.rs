use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// World <-> screen mapping for the active viewport.
///
/// Screen coordinates are pixels, origin top-left, y down. Every method
/// returns `None` instead of failing when the camera state is degenerate.
pub trait ScreenProjection {
    /// Project a world point to pixels. None if behind the camera.
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2>;

    /// Ray from the eye through a pixel
    fn screen_ray(&self, pixel: Vec2) -> Option<Ray>;

    /// Unit vector the camera looks along
    fn view_direction(&self) -> Vec3;

    /// Point under `pixel` on the view-aligned plane through `depth`.
    fn screen_to_world(&self, pixel: Vec2, depth: Vec3) -> Option<Vec3> {
        let ray = self.screen_ray(pixel)?;
        let normal = self.view_direction();
        let denom = ray.direction.dot(normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (depth - ray.origin).dot(normal) / denom;
        let p = ray.at(t);
        p.is_finite().then_some(p)
    }
}

/// Pixel rectangle of the 3D viewport inside the host window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl ViewportRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.min + self.size).all()
    }

    pub fn aspect(&self) -> Option<f32> {
        (self.size.x > 0.0 && self.size.y > 0.0).then(|| self.size.x / self.size.y)
    }
}

/// Arc-ball camera for 3D viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.5,
            distance: 8.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    /// Camera position in world space (Z up)
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                -self.distance * cp * cy,
                self.distance * sp,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Z)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Snapshot the camera for one viewport rectangle.
    /// None when the viewport has no area.
    pub fn view(&self, rect: ViewportRect) -> Option<PerspectiveView> {
        let aspect = rect.aspect()?;
        let view_proj = self.projection_matrix(aspect) * self.view_matrix();
        Some(PerspectiveView {
            view_proj,
            inv_view_proj: view_proj.inverse(),
            eye: self.eye_position(),
            forward: (self.target - self.eye_position()).normalize_or_zero(),
            rect,
        })
    }
}

/// Frozen perspective camera state for one frame
#[derive(Debug, Clone)]
pub struct PerspectiveView {
    view_proj: Mat4,
    inv_view_proj: Mat4,
    eye: Vec3,
    forward: Vec3,
    rect: ViewportRect,
}

impl PerspectiveView {
    pub fn rect(&self) -> ViewportRect {
        self.rect
    }
}

impl ScreenProjection for PerspectiveView {
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let p = self.view_proj * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 1e-6 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let center = self.rect.center();
        Some(Vec2::new(
            center.x + ndc.x * self.rect.size.x * 0.5,
            center.y - ndc.y * self.rect.size.y * 0.5,
        ))
    }

    fn screen_ray(&self, pixel: Vec2) -> Option<Ray> {
        let center = self.rect.center();

        // Screen → NDC
        let ndc_x = (pixel.x - center.x) / (self.rect.size.x * 0.5);
        let ndc_y = -(pixel.y - center.y) / (self.rect.size.y * 0.5);

        let far_world = self.inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if far_world.w.abs() < 1e-12 {
            return None;
        }
        let far = far_world.truncate() / far_world.w;
        let direction = (far - self.eye).normalize_or_zero();
        if direction == Vec3::ZERO || !direction.is_finite() {
            return None;
        }

        Some(Ray {
            origin: self.eye,
            direction,
        })
    }

    fn view_direction(&self) -> Vec3 {
        self.forward
    }
}

/// Top-down orthographic view looking along -Z.
///
/// World X maps to screen right and world Y to screen up, with a fixed
/// number of pixels per world unit. Used by the headless harness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoView {
    /// Pixel the world origin projects to
    pub origin_px: Vec2,
    pub pixels_per_unit: f32,
    /// Height of the eye plane above the scene
    pub eye_height: f32,
}

impl OrthoView {
    pub fn new(origin_px: Vec2, pixels_per_unit: f32) -> Self {
        Self {
            origin_px,
            pixels_per_unit,
            eye_height: 1000.0,
        }
    }

    fn pixel_to_plane(&self, pixel: Vec2) -> Option<Vec2> {
        if self.pixels_per_unit.abs() < 1e-9 {
            return None;
        }
        let d = pixel - self.origin_px;
        Some(Vec2::new(d.x, -d.y) / self.pixels_per_unit)
    }
}

impl ScreenProjection for OrthoView {
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        if point.z > self.eye_height {
            return None;
        }
        Some(self.origin_px + Vec2::new(point.x, -point.y) * self.pixels_per_unit)
    }

    fn screen_ray(&self, pixel: Vec2) -> Option<Ray> {
        let xy = self.pixel_to_plane(pixel)?;
        Some(Ray {
            origin: xy.extend(self.eye_height),
            direction: Vec3::NEG_Z,
        })
    }

    fn view_direction(&self) -> Vec3 {
        Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ViewportRect {
        ViewportRect::new(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_target_projects_to_center() {
        let cam = ArcBallCamera::new();
        let view = cam.view(rect()).unwrap();
        let p = view.world_to_screen(cam.target).unwrap();
        assert!(p.abs_diff_eq(Vec2::new(400.0, 300.0), 1e-2));
    }

    #[test]
    fn test_screen_ray_round_trip() {
        let cam = ArcBallCamera::new();
        let view = cam.view(rect()).unwrap();
        let world = Vec3::new(0.5, -0.3, 0.2);
        let px = view.world_to_screen(world).unwrap();
        let back = view.screen_to_world(px, world).unwrap();
        assert!(back.abs_diff_eq(world, 1e-3), "{back:?}");
    }

    #[test]
    fn test_point_behind_camera_does_not_project() {
        let cam = ArcBallCamera::new();
        let view = cam.view(rect()).unwrap();
        let behind = cam.eye_position() + (cam.eye_position() - cam.target);
        assert!(view.world_to_screen(behind).is_none());
    }

    #[test]
    fn test_zero_size_viewport_has_no_view() {
        let cam = ArcBallCamera::new();
        assert!(cam.view(ViewportRect::new(Vec2::ZERO, Vec2::new(0.0, 10.0))).is_none());
    }

    #[test]
    fn test_ortho_mapping() {
        let view = OrthoView::new(Vec2::new(100.0, 100.0), 50.0);
        assert_eq!(view.world_to_screen(Vec3::ZERO), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(view.world_to_screen(Vec3::new(1.0, 1.0, 7.0)), Some(Vec2::new(150.0, 50.0)));
        let p = view.screen_to_world(Vec2::new(150.0, 50.0), Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 3.0), 1e-5));
    }
}
