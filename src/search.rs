//! Parameter spaces and a derivative-free search driver.
//!
//! The search side only ever sees parameter vectors and scalar fitness
//! values. `Optimizer` is the ask/tell seam; `DifferentialEvolution` is the
//! bundled implementation (rand/1/bin).

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::GeometryError;

// ---------------------------------------------------------------------------
// Parameter space
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParamBound {
    Float { lo: f64, hi: f64 },
    /// Inclusive integer range.
    Int { lo: i64, hi: i64 },
}

impl ParamBound {
    /// Rejects empty or NaN ranges.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let ok = match *self {
            ParamBound::Float { lo, hi } => lo <= hi,
            ParamBound::Int { lo, hi } => lo <= hi,
        };
        if ok {
            Ok(())
        } else {
            Err(GeometryError::InvalidParameters(format!("empty parameter bound {self:?}")))
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        match *self {
            ParamBound::Float { lo, hi } => value.max(lo).min(hi),
            ParamBound::Int { lo, hi } => value.round().max(lo as f64).min(hi as f64),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        match *self {
            ParamBound::Float { lo, hi } => (lo..=hi).contains(&value),
            ParamBound::Int { lo, hi } => {
                value.fract() == 0.0 && (lo as f64..=hi as f64).contains(&value)
            }
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            ParamBound::Float { lo, hi } if hi > lo => rng.gen_range(lo..=hi),
            ParamBound::Float { lo, .. } => lo,
            ParamBound::Int { lo, hi } if hi > lo => rng.gen_range(lo..=hi) as f64,
            ParamBound::Int { lo, .. } => lo as f64,
        }
    }
}

/// One candidate. Integer parameters are stored as integral values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector(pub Vec<f64>);

impl ParameterVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for ParameterVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    bounds: Vec<ParamBound>,
}

impl ParameterSpace {
    pub fn new(bounds: Vec<ParamBound>) -> Result<Self, GeometryError> {
        for bound in &bounds {
            bound.validate()?;
        }
        Ok(Self { bounds })
    }

    /// `n` parameters sharing one bound.
    pub fn uniform(n: usize, bound: ParamBound) -> Result<Self, GeometryError> {
        Self::new(vec![bound; n])
    }

    pub fn bounds(&self) -> &[ParamBound] {
        &self.bounds
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn contains(&self, params: &ParameterVector) -> bool {
        params.len() == self.bounds.len()
            && self.bounds.iter().zip(params.values()).all(|(b, &v)| b.contains(v))
    }

    pub fn clamp(&self, values: Vec<f64>) -> ParameterVector {
        ParameterVector(self.bounds.iter().zip(values).map(|(b, v)| b.clamp(v)).collect())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParameterVector {
        ParameterVector(self.bounds.iter().map(|b| b.sample(rng)).collect())
    }
}

// ---------------------------------------------------------------------------
// Optimizer seam
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Whether `candidate` is at least as good as `incumbent`.
    pub fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Minimize => candidate <= incumbent,
            Direction::Maximize => candidate >= incumbent,
        }
    }
}

pub trait Optimizer {
    /// Candidates to evaluate next.
    fn ask(&mut self) -> Vec<ParameterVector>;

    /// Fitness of the candidates from the last `ask`, in the same order.
    fn tell(&mut self, fitness: &[f64]);

    fn best(&self) -> Option<(&ParameterVector, f64)>;

    fn direction(&self) -> Direction;
}

// ---------------------------------------------------------------------------
// Differential evolution
// ---------------------------------------------------------------------------

pub struct DifferentialEvolution {
    space: ParameterSpace,
    direction: Direction,
    population_size: usize,
    f: f64,
    cr: f64,
    rng: StdRng,
    population: Vec<ParameterVector>,
    fitness: Vec<f64>,
    trials: Vec<ParameterVector>,
}

impl DifferentialEvolution {
    /// Populations smaller than four are raised to four, the minimum for
    /// picking three donors distinct from the target.
    pub fn new(space: ParameterSpace, direction: Direction, config: &SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            space,
            direction,
            population_size: config.population.max(4),
            f: config.f,
            cr: config.cr,
            rng,
            population: Vec::new(),
            fitness: Vec::new(),
            trials: Vec::new(),
        }
    }

    pub fn population(&self) -> &[ParameterVector] {
        &self.population
    }

    fn distinct_donors(&mut self, target: usize) -> [usize; 3] {
        let n = self.population.len();
        let mut picked = [target; 3];
        for slot in 0..3 {
            loop {
                let candidate = self.rng.gen_range(0..n);
                if candidate != target && !picked[..slot].contains(&candidate) {
                    picked[slot] = candidate;
                    break;
                }
            }
        }
        picked
    }

    fn trial_for(&mut self, target: usize) -> ParameterVector {
        let [r1, r2, r3] = self.distinct_donors(target);
        let dim = self.space.dimension();
        let forced = self.rng.gen_range(0..dim.max(1));

        let mut values = Vec::with_capacity(dim);
        for j in 0..dim {
            let base = self.population[target].0[j];
            let crossover = j == forced || self.rng.gen::<f64>() < self.cr;
            values.push(if crossover {
                let a = self.population[r1].0[j];
                let b = self.population[r2].0[j];
                let c = self.population[r3].0[j];
                a + self.f * (b - c)
            } else {
                base
            });
        }
        self.space.clamp(values)
    }
}

impl Optimizer for DifferentialEvolution {
    fn ask(&mut self) -> Vec<ParameterVector> {
        self.trials = if self.population.is_empty() {
            (0..self.population_size).map(|_| self.space.sample(&mut self.rng)).collect()
        } else {
            (0..self.population.len()).map(|i| self.trial_for(i)).collect()
        };
        self.trials.clone()
    }

    fn tell(&mut self, fitness: &[f64]) {
        let trials = std::mem::take(&mut self.trials);
        if self.population.is_empty() {
            self.population = trials;
            self.fitness = fitness.to_vec();
            return;
        }
        for (i, (trial, &score)) in trials.into_iter().zip(fitness).enumerate() {
            if self.direction.prefers(score, self.fitness[i]) {
                self.population[i] = trial;
                self.fitness[i] = score;
            }
        }
    }

    fn best(&self) -> Option<(&ParameterVector, f64)> {
        let direction = self.direction;
        self.population
            .iter()
            .zip(self.fitness.iter().copied())
            .reduce(|best, next| if direction.prefers(best.1, next.1) { best } else { next })
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: Option<(ParameterVector, f64)>,
    pub history: Vec<GenerationRecord>,
}

/// Run `generations` ask/evaluate/tell rounds.
pub fn run_search<O, F, E>(optimizer: &mut O, generations: usize, mut evaluate: F) -> Result<SearchOutcome, E>
where
    O: Optimizer + ?Sized,
    F: FnMut(&[ParameterVector]) -> Result<Vec<f64>, E>,
{
    let mut history = Vec::with_capacity(generations);
    for generation in 0..generations {
        let candidates = optimizer.ask();
        let fitness = evaluate(&candidates)?;
        optimizer.tell(&fitness);

        let mean_fitness = fitness.iter().sum::<f64>() / fitness.len().max(1) as f64;
        let best_fitness = optimizer.best().map_or(f64::NAN, |(_, f)| f);
        info!("generation {}: best {:.6}, mean {:.6}", generation, best_fitness, mean_fitness);
        history.push(GenerationRecord { generation, best_fitness, mean_fitness });
    }

    Ok(SearchOutcome {
        best: optimizer.best().map(|(p, f)| (p.clone(), f)),
        history,
    })
}
