//! Transient success feedback shown after an export.
//!
//! [`Acknowledgment`] is the timer that says whether the effect is still
//! showing. [`ConfettiBurst`] is an optional particle simulation a host can
//! draw while it is; it advances one frame per [`ConfettiBurst::step`] call.
//! Neither touches editor state.

use std::f32::consts::{FRAC_PI_2, PI};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::style::Color;

/// How long the acknowledgment stays visible.
pub const ACKNOWLEDGMENT_DURATION: Duration = Duration::from_millis(2000);

/// Fraction of the duration after which particles start fading.
pub const FADE_START: f32 = 0.7;

/// Opacity lost per frame once fading.
pub const FADE_PER_FRAME: f32 = 0.02;

/// Particles further than this outside the viewport are dropped.
const OFFSCREEN_MARGIN: f32 = 50.0;

pub const CONFETTI_COLORS: [Color; 12] = [
    Color::new(0xFF, 0x14, 0x61),
    Color::new(0x18, 0xFF, 0x92),
    Color::new(0x5A, 0x87, 0xFF),
    Color::new(0xFB, 0xF3, 0x8C),
    Color::new(0xFF, 0x85, 0xFF),
    Color::new(0xFF, 0x43, 0x2E),
    Color::new(0x00, 0xE4, 0xFF),
    Color::new(0x90, 0xFF, 0x00),
    Color::new(0xFF, 0xB8, 0x00),
    Color::new(0xFF, 0x5E, 0x00),
    Color::new(0xFF, 0x00, 0xE4),
    Color::new(0x00, 0xFF, 0xA8),
];

// ============================================================================
// Acknowledgment
// ============================================================================

/// A short-lived "export succeeded" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    started: Instant,
    duration: Duration,
}

impl Acknowledgment {
    pub fn start(now: Instant) -> Self {
        Self {
            started: now,
            duration: ACKNOWLEDGMENT_DURATION,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.elapsed(now) < self.duration
    }

    /// `0.0` at start, `1.0` once expired.
    pub fn progress(&self, now: Instant) -> f32 {
        (self.elapsed(now).as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

// ============================================================================
// Confetti
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Circle,
    Square,
    Triangle,
}

/// Viewport edge a particle is launched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Emitter positions as fractions of the viewport, and particles per emitter.
    fn emitters(self) -> (&'static [(f32, f32)], usize) {
        match self {
            Self::Bottom => (&[(0.2, 1.0), (0.4, 1.0), (0.6, 1.0), (0.8, 1.0)], 30),
            Self::Top => (&[(0.3, 0.0), (0.5, 0.0), (0.7, 0.0)], 20),
            Self::Left => (&[(0.0, 0.3), (0.0, 0.6)], 15),
            Self::Right => (&[(1.0, 0.4), (1.0, 0.7)], 15),
        }
    }

    /// Launch angle range start; every range spans half a turn.
    fn base_angle(self) -> f32 {
        match self {
            Self::Top => PI,
            Self::Bottom => 0.0,
            Self::Left => -FRAC_PI_2,
            Self::Right => FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub shape: ParticleShape,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub gravity: f32,
    /// Degrees.
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
    pub edge: Edge,
}

impl Particle {
    fn launch<R: Rng + ?Sized>(x: f32, y: f32, edge: Edge, rng: &mut R) -> Self {
        let size: f32 = rng.gen_range(6.0..14.0);
        let mut speed: f32 = rng.gen_range(4.0..12.0);
        if edge == Edge::Top {
            speed *= 0.7;
        }
        let angle = edge.base_angle() + rng.gen_range(0.0..PI);
        let lift = if edge == Edge::Bottom { -10.0 } else { 0.0 };
        let shape = match rng.gen_range(0..3) {
            0 => ParticleShape::Circle,
            1 => ParticleShape::Square,
            _ => ParticleShape::Triangle,
        };

        Self {
            x,
            y,
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            shape,
            size,
            speed_x: angle.cos() * speed,
            speed_y: angle.sin() * speed + lift,
            gravity: if edge == Edge::Top { 0.3 } else { 0.5 },
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: rng.gen_range(-7.5..7.5),
            opacity: 1.0,
            edge,
        }
    }

    fn is_visible(&self, width: f32, height: f32) -> bool {
        self.opacity > 0.0
            && self.x > -OFFSCREEN_MARGIN
            && self.x < width + OFFSCREEN_MARGIN
            && self.y > -OFFSCREEN_MARGIN
            && self.y < height + OFFSCREEN_MARGIN
    }
}

/// A burst of confetti over a `width` × `height` viewport.
#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    width: f32,
    height: f32,
    duration: Duration,
    particles: Vec<Particle>,
    frames: u32,
}

impl ConfettiBurst {
    /// Launches 190 particles from the four viewport edges.
    pub fn spawn<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let mut particles = Vec::new();
        for edge in [Edge::Bottom, Edge::Top, Edge::Left, Edge::Right] {
            let (points, per_point) = edge.emitters();
            for &(fx, fy) in points {
                for _ in 0..per_point {
                    particles.push(Particle::launch(fx * width, fy * height, edge, rng));
                }
            }
        }
        Self {
            width,
            height,
            duration: ACKNOWLEDGMENT_DURATION,
            particles,
            frames: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Advances one frame, `elapsed` being the time since the burst started.
    ///
    /// Off-screen and fully faded particles are dropped before moving the
    /// rest. Returns `false` once the burst is over.
    pub fn step<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) -> bool {
        let (width, height) = (self.width, self.height);
        self.particles.retain(|p| p.is_visible(width, height));

        let fading = elapsed.as_secs_f32() > self.duration.as_secs_f32() * FADE_START;
        let t = elapsed.as_secs_f32();
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;
            p.speed_y += p.gravity;
            p.speed_x += rng.gen_range(-0.05f32..0.05);
            p.rotation += p.rotation_speed;
            if fading {
                p.opacity = (p.opacity - FADE_PER_FRAME).max(0.0);
            }
            p.x += (t + p.rotation).sin() * 0.3;
        }
        self.frames += 1;

        !self.is_finished(elapsed)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration || self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn acknowledgment_lasts_two_seconds() {
        let start = Instant::now();
        let ack = Acknowledgment::start(start);
        assert!(ack.is_active(start));
        assert!(ack.is_active(start + Duration::from_millis(1999)));
        assert!(!ack.is_active(start + Duration::from_millis(2000)));
        assert_eq!(ack.progress(start + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn spawn_counts_per_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let burst = ConfettiBurst::spawn(800.0, 600.0, &mut rng);
        let count = |edge| burst.particles().iter().filter(|p| p.edge == edge).count();

        assert_eq!(burst.particles().len(), 190);
        assert_eq!(count(Edge::Bottom), 120);
        assert_eq!(count(Edge::Top), 60);
        assert_eq!(count(Edge::Left), 30);
        assert_eq!(count(Edge::Right), 30);
    }

    #[test]
    fn launch_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let burst = ConfettiBurst::spawn(800.0, 600.0, &mut rng);
        for p in burst.particles() {
            assert!((6.0..14.0).contains(&p.size));
            assert!((0.0..360.0).contains(&p.rotation));
            assert!(CONFETTI_COLORS.contains(&p.color));
            match p.edge {
                Edge::Top => assert_eq!(p.gravity, 0.3),
                Edge::Bottom => {
                    assert_eq!(p.gravity, 0.5);
                    assert!((-10.0..=2.0).contains(&p.speed_y));
                }
                _ => assert_eq!(p.gravity, 0.5),
            }
        }
    }

    #[test]
    fn particles_fade_late_and_burst_ends() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut burst = ConfettiBurst::spawn(800.0, 600.0, &mut rng);

        burst.step(Duration::from_millis(16), &mut rng);
        assert!(burst.particles().iter().all(|p| p.opacity == 1.0));

        burst.step(Duration::from_millis(1500), &mut rng);
        assert!(burst.particles().iter().all(|p| p.opacity < 1.0));

        assert!(!burst.step(Duration::from_millis(2000), &mut rng));
        assert_eq!(burst.frames(), 3);
    }
}
