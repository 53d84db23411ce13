use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::core::rng::Rng;
use crate::tilemap::Map;

/// Default fraction of the remaining distance covered per update.
pub const DEFAULT_CAMERA_SPEED: f32 = 0.2;

/// 2D follow camera with shake, zoom and rotation.
/// `position` is the world point shown at the viewport center.
pub struct Camera {
    /// Current center in world space.
    pub position: Vec2,
    /// Where the camera is heading.
    pub target: Vec2,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// World size the view is kept inside, if any.
    pub bounds: Option<Vec2>,
    pub zoom: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Lerp factor toward the target per update (0.0 = frozen, 1.0 = snap).
    pub speed: f32,
    shake_time: f32,
    shake_amount: f32,
    shake_offset: Vec2,
    matrix: Mat4,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
}

impl Camera {
    /// Unbounded camera centered on the viewport's own area.
    pub fn new(width: u32, height: u32) -> Self {
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        let mut camera = Self {
            position: center,
            target: center,
            width,
            height,
            bounds: None,
            zoom: 1.0,
            rotation: 0.0,
            speed: DEFAULT_CAMERA_SPEED,
            shake_time: 0.0,
            shake_amount: 0.0,
            shake_offset: Vec2::ZERO,
            matrix: Mat4::IDENTITY,
        };
        camera.rebuild_matrix();
        camera
    }

    /// Camera kept inside a `bounds_width` x `bounds_height` world, starting at its top-left.
    pub fn with_bounds(width: u32, height: u32, bounds_width: f32, bounds_height: f32) -> Self {
        let mut camera = Self::new(width, height);
        camera.bounds = Some(Vec2::new(bounds_width, bounds_height));
        camera.position = camera.clamp(camera.position);
        camera.target = camera.position;
        camera.rebuild_matrix();
        camera
    }

    /// Camera bounded by a map's pixel size.
    pub fn for_map(width: u32, height: u32, map: &Map) -> Self {
        let size = map.pixel_size();
        Self::with_bounds(width, height, size.x, size.y)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(0.0, 1.0);
        self
    }

    /// Snap position and target to a point, respecting bounds.
    pub fn look_at(&mut self, point: Vec2) {
        self.position = self.clamp(point);
        self.target = self.position;
        self.rebuild_matrix();
    }

    /// Start (or restart) a shake lasting `duration` seconds of up to `amount` pixels.
    pub fn shake(&mut self, duration: f32, amount: f32) {
        self.shake_time = duration;
        self.shake_amount = amount.abs();
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_time > 0.0
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn update(&mut self, dt: f32, rng: &mut Rng) {
        self.target = self.clamp(self.target);
        self.position = self.clamp(self.position);

        if self.shake_time > 0.0 {
            self.shake_time -= dt;
            let a = self.shake_amount;
            self.shake_offset = Vec2::new(rng.range_f32(-a, a).trunc(), rng.range_f32(-a, a).trunc());
        } else {
            self.shake_offset = Vec2::ZERO;
        }

        self.position = self.position.lerp(self.target, self.speed);
        self.rebuild_matrix();
    }

    /// Keep the viewport inside the bounds. An axis smaller than the viewport centers on the bounds.
    fn clamp(&self, point: Vec2) -> Vec2 {
        let Some(bounds) = self.bounds else {
            return point;
        };
        let half = Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        let axis = |v: f32, half: f32, bound: f32| {
            if bound <= half * 2.0 {
                bound / 2.0
            } else {
                v.clamp(half, bound - half)
            }
        };
        Vec2::new(axis(point.x, half.x, bounds.x), axis(point.y, half.y, bounds.y))
    }

    fn rebuild_matrix(&mut self) {
        let origin = -self.position + self.shake_offset;
        let center = Vec3::new(self.width as f32 / 2.0, self.height as f32 / 2.0, 0.0);
        self.matrix = Mat4::from_translation(center)
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation(origin.extend(0.0));
    }

    /// World to screen transform as of the last update.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.matrix.to_cols_array_2d(),
        }
    }

    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point3(point.extend(0.0)).truncate()
    }

    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        self.matrix.inverse().transform_point3(point.extend(0.0)).truncate()
    }

    /// Check if a world-space point is inside the unzoomed view.
    pub fn is_visible(&self, point: Vec2) -> bool {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        point.x >= self.position.x - half_w
            && point.x <= self.position.x + half_w
            && point.y >= self.position.y - half_h
            && point.y <= self.position.y + half_h
    }

    /// Check if a world-space rectangle overlaps the unzoomed view.
    pub fn is_rect_visible(&self, rect_center: Vec2, rect_half_size: Vec2) -> bool {
        let half = Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        let delta = (rect_center - self.position).abs();
        delta.x <= half.x + rect_half_size.x && delta.y <= half.y + rect_half_size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn bounded_camera_starts_at_clamp_min() {
        let cam = Camera::with_bounds(100, 80, 1000.0, 800.0);
        assert_eq!(cam.position, Vec2::new(50.0, 40.0));
    }

    #[test]
    fn target_is_clamped_before_lerp() {
        let mut cam = Camera::with_bounds(100, 100, 500.0, 400.0).with_speed(1.0);
        let mut rng = Rng::new(1);
        cam.target = Vec2::new(10_000.0, -50.0);
        cam.update(1.0 / 60.0, &mut rng);
        assert_eq!(cam.position, Vec2::new(450.0, 50.0));
    }

    #[test]
    fn small_world_centers_axis() {
        let mut cam = Camera::with_bounds(320, 180, 200.0, 1000.0);
        let mut rng = Rng::new(1);
        cam.target = Vec2::new(0.0, 500.0);
        cam.update(0.016, &mut rng);
        assert_eq!(cam.position.x, 100.0);
    }

    #[test]
    fn lerps_by_speed() {
        let mut cam = Camera::new(100, 100);
        let mut rng = Rng::new(1);
        cam.position = Vec2::ZERO;
        cam.target = Vec2::new(100.0, 0.0);
        cam.update(0.016, &mut rng);
        assert!((cam.position.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn shake_jitter_is_whole_pixels_and_bounded() {
        let mut cam = Camera::new(100, 100);
        let mut rng = Rng::new(7);
        cam.shake(0.5, 4.0);
        for _ in 0..10 {
            cam.update(0.016, &mut rng);
            let off = cam.shake_offset();
            assert_eq!(off.x, off.x.trunc());
            assert!(off.x.abs() <= 4.0 && off.y.abs() <= 4.0);
        }
        assert!(cam.is_shaking());
    }

    #[test]
    fn shake_ends_after_duration() {
        let mut cam = Camera::new(100, 100);
        let mut rng = Rng::new(7);
        cam.shake(0.1, 10.0);
        for _ in 0..4 {
            cam.update(0.05, &mut rng);
        }
        assert!(!cam.is_shaking());
        assert_eq!(cam.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn position_maps_to_viewport_center() {
        let mut cam = Camera::new(320, 180);
        cam.look_at(Vec2::new(500.0, 300.0));
        assert!(approx(cam.world_to_screen(Vec2::new(500.0, 300.0)), Vec2::new(160.0, 90.0)));
        assert!(approx(cam.world_to_screen(Vec2::new(510.0, 300.0)), Vec2::new(170.0, 90.0)));
    }

    #[test]
    fn zoom_and_rotation_round_trip() {
        let mut cam = Camera::new(320, 180);
        cam.look_at(Vec2::new(40.0, 60.0));
        cam.zoom = 2.0;
        cam.rotation = std::f32::consts::FRAC_PI_2;
        cam.speed = 0.0;
        cam.update(0.016, &mut Rng::new(1));

        // One world unit right of center lands two pixels below center after a quarter turn.
        let screen = cam.world_to_screen(Vec2::new(41.0, 60.0));
        assert!(approx(screen, Vec2::new(160.0, 92.0)), "got {:?}", screen);
        let world = cam.screen_to_world(screen);
        assert!(approx(world, Vec2::new(41.0, 60.0)));
    }

    #[test]
    fn visibility_uses_unzoomed_view() {
        let mut cam = Camera::new(100, 100);
        cam.look_at(Vec2::new(50.0, 50.0));
        assert!(cam.is_visible(Vec2::new(0.0, 0.0)));
        assert!(!cam.is_visible(Vec2::new(101.0, 50.0)));
        assert!(cam.is_rect_visible(Vec2::new(-5.0, 50.0), Vec2::new(10.0, 10.0)));
        assert!(!cam.is_rect_visible(Vec2::new(-50.0, 50.0), Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn uniform_matches_matrix() {
        let cam = Camera::new(64, 64);
        let u = cam.uniform();
        assert_eq!(u.view, cam.matrix().to_cols_array_2d());
    }
}
