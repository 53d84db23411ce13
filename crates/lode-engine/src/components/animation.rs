//! Sprite-sheet row animation.
//!
//! Frames are laid out left to right on one row of a sheet, each cell the
//! same size. The animation only advances while playing.

use glam::Vec2;

use crate::components::sprite::{AtlasId, SpriteComponent};
use crate::core::geometry::Rect;
use crate::core::time::reached;
use crate::renderer::instance::RenderBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationDirection {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    pub atlas: AtlasId,
    /// Sheet row holding the frames.
    pub row: u32,
    pub frame_count: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Seconds each frame is shown.
    pub frame_time: f32,
    /// Pivot in cell pixels. Defaults to the cell center.
    pub origin: Vec2,
    pub looping: bool,
    pub ping_pong: bool,
    pub frame: u32,
    pub direction: AnimationDirection,
    frame_timer: f32,
    playing: bool,
}

impl SpriteAnimation {
    /// A looping forward animation, paused on frame 0.
    pub fn new(atlas: AtlasId, row: u32, frame_count: u32, cell: (u32, u32), frame_time: f32) -> Self {
        Self {
            atlas,
            row,
            frame_count,
            cell_width: cell.0,
            cell_height: cell.1,
            frame_time,
            origin: Vec2::new(cell.0 as f32 / 2.0, cell.1 as f32 / 2.0),
            looping: true,
            ping_pong: false,
            frame: 0,
            direction: AnimationDirection::Forward,
            frame_timer: 0.0,
            playing: false,
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }

    pub fn with_start_frame(mut self, frame: u32) -> Self {
        self.frame = frame.min(self.frame_count.saturating_sub(1));
        self
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Back to frame 0 going forward. Play state is unchanged.
    pub fn reset(&mut self) {
        self.direction = AnimationDirection::Forward;
        self.frame = 0;
        self.frame_timer = 0.0;
    }

    /// Advance by `dt` seconds. At most one frame step per call; returns true on a step.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.playing || self.frame_count == 0 {
            return false;
        }
        self.frame_timer += dt;
        if !reached(self.frame_timer, self.frame_time) {
            return false;
        }
        self.frame_timer = 0.0;

        let last = self.frame_count - 1;
        let bounce = self.ping_pong && self.frame_count > 1;
        match self.direction {
            AnimationDirection::Forward => {
                if self.frame < last {
                    self.frame += 1;
                } else if bounce {
                    self.direction = AnimationDirection::Reverse;
                    self.frame = last - 1;
                } else if self.looping {
                    self.frame = 0;
                } else {
                    self.playing = false;
                    return false;
                }
            }
            AnimationDirection::Reverse => {
                if self.frame > 0 {
                    self.frame -= 1;
                } else if bounce {
                    self.direction = AnimationDirection::Forward;
                    self.frame = 1;
                } else if self.looping {
                    self.frame = last;
                } else {
                    self.playing = false;
                    return false;
                }
            }
        }
        true
    }

    /// Sheet cell of the current frame.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            (self.frame * self.cell_width) as i32,
            (self.row * self.cell_height) as i32,
            self.cell_width as i32,
            self.cell_height as i32,
        )
    }

    /// Sprite for the current frame.
    pub fn sprite(&self) -> SpriteComponent {
        let mut sprite = SpriteComponent::new(self.atlas, self.source_rect());
        sprite.origin = self.origin;
        sprite
    }

    pub fn draw(&self, buffer: &mut RenderBuffer, position: Vec2, rotation: f32) -> bool {
        buffer.push_sprite(&self.sprite(), position, rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anim(frames: u32) -> SpriteAnimation {
        SpriteAnimation::new(AtlasId(1), 2, frames, (16, 8), 0.1)
    }

    fn step(a: &mut SpriteAnimation, n: usize) -> Vec<u32> {
        (0..n)
            .map(|_| {
                a.update(0.1);
                a.frame
            })
            .collect()
    }

    #[test]
    fn starts_paused() {
        let mut a = anim(4);
        assert!(!a.is_playing());
        assert!(!a.update(1.0));
        assert_eq!(a.frame, 0);
    }

    #[test]
    fn loops_forward() {
        let mut a = anim(3);
        a.play();
        assert_eq!(step(&mut a, 4), vec![1, 2, 0, 1]);
    }

    #[test]
    fn waits_for_full_frame_time() {
        let mut a = anim(3);
        a.play();
        assert!(!a.update(0.05));
        assert!(a.update(0.05));
        assert_eq!(a.frame, 1);
    }

    #[test]
    fn ping_pong_bounces_at_both_ends() {
        let mut a = anim(3).with_ping_pong(true);
        a.play();
        assert_eq!(step(&mut a, 6), vec![1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn single_frame_ping_pong_stays_put() {
        let mut a = anim(1).with_ping_pong(true);
        a.play();
        assert_eq!(step(&mut a, 3), vec![0, 0, 0]);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let mut a = anim(3).with_looping(false);
        a.play();
        assert_eq!(step(&mut a, 4), vec![1, 2, 2, 2]);
        assert!(!a.is_playing());
    }

    #[test]
    fn source_rect_uses_row_and_frame() {
        let mut a = anim(4).with_start_frame(3);
        assert_eq!(a.source_rect(), Rect::new(48, 16, 16, 8));
        a.reset();
        assert_eq!(a.source_rect(), Rect::new(0, 16, 16, 8));
    }

    #[test]
    fn draw_pushes_current_cell() {
        let a = anim(2);
        let mut buf = RenderBuffer::new();
        assert!(a.draw(&mut buf, Vec2::new(5.0, 5.0), 0.0));
        assert_eq!(buf.instances[0].src, [0.0, 16.0, 16.0, 8.0]);
        assert_eq!(buf.instances[0].origin, [8.0, 4.0]);
    }
}
