//! Decorative particles: twinkling stars, falling petals, floating hearts.
//!
//! Particles are cosmetic. A set is generated wholesale from a
//! [`RandomSource`], optionally regenerated on a fixed interval, and only
//! ever read by the renderer.

use std::time::Duration;

use rand::Rng;

use crate::lifecycle::Interval;

/// Uniform numbers in `[0, 1)`.
///
/// Every [`rand::Rng`] is a source; tests can plug in [`SequenceSource`].
pub trait RandomSource {
    fn unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    /// Values are clamped into `[0, 1)`. An empty list always yields 0.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, next: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next = (self.next + 1) % self.values.len();
        value
    }
}

/// Half-open range `[lo, hi)`; `lo == hi` is a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lo: f64,
    pub hi: f64,
}

impl Bounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    fn sample(&self, source: &mut dyn RandomSource) -> f64 {
        if self.lo == self.hi {
            return self.lo;
        }
        let value = self.lo + source.unit() * (self.hi - self.lo);
        // Rounding can land exactly on `hi` for draws just under 1.0.
        if value < self.hi {
            value
        } else {
            f64::from_bits(self.hi.to_bits() - 1).max(self.lo)
        }
    }

    /// Sample a time in seconds, truncated to whole nanoseconds and kept
    /// strictly below `hi`.
    fn sample_duration(&self, source: &mut dyn RandomSource) -> Duration {
        let nanos = (self.sample(source) * 1e9) as u64;
        if self.lo == self.hi {
            return Duration::from_nanos(nanos);
        }
        let ceiling = (self.hi * 1e9) as u64;
        Duration::from_nanos(nanos.min(ceiling.saturating_sub(1)))
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.lo == self.hi {
            return value == self.lo;
        }
        value >= self.lo && value < self.hi
    }
}

/// The particle families the cards use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Star,
    Petal,
    Heart,
}

/// Value ranges for one particle kind. Positions are percentages of the
/// card area, times are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRanges {
    pub left: Bounds,
    pub top: Bounds,
    pub size: Bounds,
    pub delay: Bounds,
    pub duration: Bounds,
}

impl ParticleKind {
    pub fn ranges(self) -> ParticleRanges {
        match self {
            ParticleKind::Star => ParticleRanges {
                left: Bounds::new(0.0, 100.0),
                top: Bounds::new(0.0, 100.0),
                size: Bounds::new(1.0, 4.0),
                delay: Bounds::fixed(0.0),
                duration: Bounds::new(2.0, 5.0),
            },
            // Petals fall from the top edge.
            ParticleKind::Petal => ParticleRanges {
                left: Bounds::new(0.0, 100.0),
                top: Bounds::fixed(0.0),
                size: Bounds::fixed(1.0),
                delay: Bounds::new(0.0, 10.0),
                duration: Bounds::new(10.0, 20.0),
            },
            ParticleKind::Heart => ParticleRanges {
                left: Bounds::new(0.0, 100.0),
                top: Bounds::new(0.0, 100.0),
                size: Bounds::fixed(1.0),
                delay: Bounds::new(0.0, 5.0),
                duration: Bounds::new(5.0, 10.0),
            },
        }
    }
}

/// One ephemeral visual element.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position, percent of width
    pub left: f64,
    /// Vertical start position, percent of height
    pub top: f64,
    pub size: f64,
    pub delay: Duration,
    pub duration: Duration,
}

impl Particle {
    /// Loop position in `[0, 1)` at `age` since the set was generated, or
    /// `None` while still waiting out the start delay.
    pub fn phase(&self, age: Duration) -> Option<f64> {
        let running = age.checked_sub(self.delay)?;
        let cycle = self.duration.as_secs_f64();
        if cycle <= 0.0 {
            return Some(0.0);
        }
        Some((running.as_secs_f64() % cycle) / cycle)
    }
}

/// Generate `count` particles of `kind`.
pub fn generate(kind: ParticleKind, count: usize, source: &mut dyn RandomSource) -> Vec<Particle> {
    let ranges = kind.ranges();
    (0..count)
        .map(|_| Particle {
            left: ranges.left.sample(source),
            top: ranges.top.sample(source),
            size: ranges.size.sample(source),
            delay: ranges.delay.sample_duration(source),
            duration: ranges.duration.sample_duration(source),
        })
        .collect()
}

/// A generated set plus the clock reading it was generated at.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    pub kind: ParticleKind,
    pub particles: Vec<Particle>,
    /// Field clock at generation time
    pub born: Duration,
    /// Number of times this set has been regenerated
    pub generation: u64,
}

impl ParticleSet {
    /// Time since this set was generated, given the field clock.
    pub fn age(&self, clock: Duration) -> Duration {
        clock.saturating_sub(self.born)
    }
}

/// All particle sets of one widget.
pub struct ParticleField {
    sets: Vec<(ParticleSet, usize)>,
    refresh: Option<(ParticleKind, Interval)>,
    source: Box<dyn RandomSource>,
    clock: Duration,
}

impl ParticleField {
    pub fn new(source: Box<dyn RandomSource>) -> Self {
        Self {
            sets: Vec::new(),
            refresh: None,
            source,
            clock: Duration::ZERO,
        }
    }

    /// Add a set of `count` particles, generated immediately.
    pub fn with_set(mut self, kind: ParticleKind, count: usize) -> Self {
        let particles = generate(kind, count, self.source.as_mut());
        self.sets.push((
            ParticleSet {
                kind,
                particles,
                born: self.clock,
                generation: 0,
            },
            count,
        ));
        self
    }

    /// Regenerate the `kind` set wholesale every `period`.
    pub fn refreshing(mut self, kind: ParticleKind, period: Duration) -> Self {
        self.refresh = Some((kind, Interval::new(period)));
        self
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn set(&self, kind: ParticleKind) -> Option<&ParticleSet> {
        self.sets.iter().map(|(set, _)| set).find(|set| set.kind == kind)
    }

    pub fn sets(&self) -> impl Iterator<Item = &ParticleSet> {
        self.sets.iter().map(|(set, _)| set)
    }

    /// Advance the animation clock; regenerate the refreshing set when its
    /// interval elapses. Returns true if a set was regenerated.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.clock += dt;

        let Some((kind, interval)) = self.refresh.as_mut() else {
            return false;
        };
        if interval.advance(dt) == 0 {
            return false;
        }
        let kind = *kind;
        self.regenerate(kind)
    }

    /// Stop the periodic regeneration. The current sets stay on screen.
    pub fn stop_refresh(&mut self) {
        self.refresh = None;
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_some()
    }

    fn regenerate(&mut self, kind: ParticleKind) -> bool {
        let clock = self.clock;
        let Some((set, count)) = self.sets.iter_mut().find(|(set, _)| set.kind == kind) else {
            return false;
        };
        set.particles = generate(kind, *count, self.source.as_mut());
        set.born = clock;
        set.generation += 1;
        tracing::debug!(?kind, generation = set.generation, "Particles regenerated");
        true
    }
}
