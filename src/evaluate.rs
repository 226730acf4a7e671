//! Evaluation boundary between the geometry builders and a transport solver.
//!
//! An `Evaluator` turns one parameter vector into one scalar fitness:
//! build the model, hand it to the solver inside a private scratch
//! directory, score the returned k-effective. Solver trouble never aborts a
//! search; it turns into the objective's sentinel fitness. Construction
//! errors do propagate, since they mean the builder itself is wrong.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EvaluationConfig;
use crate::error::GeometryError;
use crate::export::{write_model, ModelDocument};
use crate::search::{Direction, ParameterVector};

/// Estimated multiplication factor with its one-sigma uncertainty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeffEstimate {
    pub nominal: f64,
    pub std_dev: f64,
}

impl KeffEstimate {
    pub fn new(nominal: f64, std_dev: f64) -> Self {
        Self { nominal, std_dev }
    }

    pub fn is_finite(&self) -> bool {
        self.nominal.is_finite() && self.std_dev.is_finite()
    }
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("solver did not converge: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("model construction failed: {0}")]
    Construction(#[from] GeometryError),
}

/// External transport code. Implementations must tolerate concurrent
/// calls with distinct working directories.
pub trait TransportSolver: Send + Sync {
    fn run(&self, model: &ModelDocument, workdir: &Path) -> Result<KeffEstimate, SolverError>;
}

/// A model built from one parameter vector.
#[derive(Clone, Debug)]
pub struct BuiltModel {
    pub document: ModelDocument,
    /// Count of the constrained quantity the penalty looks at, e.g. fuel
    /// pins placed.
    pub constrained_count: usize,
}

pub trait ModelBuilder: Send + Sync {
    fn build(&self, params: &ParameterVector) -> Result<BuiltModel, GeometryError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Minimize `|k - target|`.
    TargetKeff { target: f64 },
    MaximizeKeff,
}

impl Objective {
    pub fn direction(&self) -> Direction {
        match self {
            Objective::TargetKeff { .. } => Direction::Minimize,
            Objective::MaximizeKeff => Direction::Maximize,
        }
    }

    pub fn score(&self, keff: &KeffEstimate) -> f64 {
        match *self {
            Objective::TargetKeff { target } => (keff.nominal - target).abs(),
            Objective::MaximizeKeff => keff.nominal,
        }
    }

    /// Fitness used when no estimate is available: the worst plausible
    /// value in the objective's direction.
    pub fn default_failure_fitness(&self) -> f64 {
        match self.direction() {
            Direction::Maximize => 0.0,
            Direction::Minimize => 1.0e5,
        }
    }
}

/// Additive penalty applied when `constrained_count` exceeds `limit`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub limit: usize,
    /// Positive magnitude; the sign follows the objective direction.
    pub weight: f64,
}

impl Penalty {
    pub fn apply(&self, fitness: f64, count: usize, direction: Direction) -> f64 {
        if count <= self.limit {
            return fitness;
        }
        match direction {
            Direction::Maximize => fitness - self.weight,
            Direction::Minimize => fitness + self.weight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub fitness: f64,
    /// `None` when the solver failed or returned a non-finite estimate.
    pub keff: Option<KeffEstimate>,
    pub constrained_count: usize,
}

// ---------------------------------------------------------------------------
// Scratch directories
// ---------------------------------------------------------------------------

/// Per-evaluation working directory, removed on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh randomly named directory under `root`, retrying with a
    /// new name on collision.
    pub fn create(root: &Path, attempts: usize) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let mut rng = rand::thread_rng();
        for attempt in 0..attempts.max(1) {
            let path = root.join(format!("eval-{:016x}", rng.gen::<u64>()));
            match std::fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!("scratch directory {} exists (attempt {}), retrying", path.display(), attempt + 1);
                }
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free scratch directory under {} after {} attempts", root.display(), attempts),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!("failed to remove scratch directory {}: {}", self.path.display(), e);
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

pub struct Evaluator<B, S> {
    builder: B,
    solver: S,
    objective: Objective,
    penalty: Option<Penalty>,
    config: EvaluationConfig,
}

impl<B: ModelBuilder, S: TransportSolver> Evaluator<B, S> {
    pub fn new(builder: B, solver: S, objective: Objective) -> Self {
        Self {
            builder,
            solver,
            objective,
            penalty: None,
            config: EvaluationConfig::default(),
        }
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = Some(penalty);
        self
    }

    pub fn with_config(mut self, config: EvaluationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn direction(&self) -> Direction {
        self.objective.direction()
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn failure_fitness(&self) -> f64 {
        self.config
            .failure_fitness
            .unwrap_or_else(|| self.objective.default_failure_fitness())
    }

    pub fn evaluate(&self, params: &ParameterVector) -> Result<Evaluation, EvaluationError> {
        let built = self.builder.build(params)?;
        let keff = self.run_solver(&built.document);

        let fitness = match keff {
            Some(k) => {
                let raw = self.objective.score(&k);
                match &self.penalty {
                    Some(p) => p.apply(raw, built.constrained_count, self.direction()),
                    None => raw,
                }
            }
            None => self.failure_fitness(),
        };
        info!(
            "evaluated {:?}: keff {:?}, fitness {:.6}",
            params.values(),
            keff.map(|k| k.nominal),
            fitness
        );

        Ok(Evaluation { fitness, keff, constrained_count: built.constrained_count })
    }

    /// Evaluate every candidate in parallel, preserving order.
    pub fn evaluate_population(
        &self,
        population: &[ParameterVector],
    ) -> Result<Vec<Evaluation>, EvaluationError> {
        population.par_iter().map(|p| self.evaluate(p)).collect()
    }

    /// Fitness values only, shaped for `search::run_search`.
    pub fn fitness_batch(&self, population: &[ParameterVector]) -> Result<Vec<f64>, EvaluationError> {
        Ok(self
            .evaluate_population(population)?
            .into_iter()
            .map(|e| e.fitness)
            .collect())
    }

    // Every failure on this path maps to `None`; the scratch guard cleans
    // up on all of them.
    fn run_solver(&self, document: &ModelDocument) -> Option<KeffEstimate> {
        let scratch = match ScratchDir::create(&self.config.scratch_root, self.config.scratch_attempts) {
            Ok(s) => s,
            Err(e) => {
                warn!("could not create scratch directory: {}", e);
                return None;
            }
        };
        debug!("evaluating in {}", scratch.path().display());

        if let Err(e) = write_model_file(document, &scratch.path().join("model.json")) {
            warn!("could not write model to {}: {}", scratch.path().display(), e);
            return None;
        }

        match self.solver.run(document, scratch.path()) {
            Ok(k) if k.is_finite() => Some(k),
            Ok(k) => {
                warn!("solver returned a non-finite estimate {:?}", k);
                None
            }
            Err(e) => {
                warn!("solver failed: {}", e);
                None
            }
        }
    }
}

fn write_model_file(document: &ModelDocument, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_model(document, &mut writer).map_err(io::Error::from)?;
    writer.flush()
}
