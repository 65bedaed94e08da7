//! Electricity particles flowing along live wires.

use serde::Serialize;

/// Particles are dropped once their progress reaches this value.
pub const PARTICLE_CUTOFF: f64 = 1.1;

/// Timing of a particle stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSpec {
    /// Minimum time between two spawns on the same lane
    pub spawn_interval_ms: f64,
    /// Progress added to every particle per frame
    pub step: f64,
}

/// A single particle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub id: u64,
    /// Index of the path this particle travels
    pub lane: usize,
    pub progress: f64,
}

impl Particle {
    /// Fade in over the first tenth of the path, fade out over the last.
    pub fn opacity(&self) -> f64 {
        opacity(self.progress)
    }
}

/// Opacity for a progress value.
pub fn opacity(progress: f64) -> f64 {
    if progress < 0.1 {
        progress * 10.0
    } else if progress > 0.9 {
        ((1.0 - progress) * 10.0).max(0.0)
    } else {
        1.0
    }
}

/// The set of live particles for one widget.
#[derive(Debug, Clone)]
pub struct ParticleField {
    spec: ParticleSpec,
    particles: Vec<Particle>,
    next_id: u64,
    last_spawn: Vec<Option<f64>>,
}

impl ParticleField {
    /// Create a field with `lanes` independent spawn timers.
    pub fn new(spec: ParticleSpec, lanes: usize) -> Self {
        Self {
            spec,
            particles: Vec::new(),
            next_id: 0,
            last_spawn: vec![None; lanes],
        }
    }

    pub fn spec(&self) -> ParticleSpec {
        self.spec
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance one frame.
    ///
    /// Existing particles move by one step and expire at the cutoff. Each
    /// active lane then spawns a particle if its interval has elapsed.
    /// Particles of lanes that went inactive keep flowing until they expire.
    pub fn tick(&mut self, now_ms: f64, active_lanes: &[usize]) {
        let step = self.spec.step;
        for particle in &mut self.particles {
            particle.progress += step;
        }
        self.particles.retain(|p| p.progress < PARTICLE_CUTOFF);

        for &lane in active_lanes {
            let Some(last) = self.last_spawn.get_mut(lane) else {
                continue;
            };
            let due = match *last {
                None => true,
                Some(t) => now_ms - t > self.spec.spawn_interval_ms,
            };
            if due {
                *last = Some(now_ms);
                self.next_id += 1;
                self.particles.push(Particle {
                    id: self.next_id,
                    lane,
                    progress: 0.0,
                });
            }
        }
    }

    /// Drop every particle and reset spawn timers. Ids keep increasing.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.last_spawn.iter_mut().for_each(|t| *t = None);
    }
}
