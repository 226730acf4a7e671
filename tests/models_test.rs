use std::path::Path;

use reactor_csg::config::{EvaluationConfig, SearchConfig};
use reactor_csg::evaluate::{Evaluator, KeffEstimate, ModelBuilder, SolverError, TransportSolver};
use reactor_csg::export::ModelDocument;
use reactor_csg::material::Constituent;
use reactor_csg::models::masked_assembly::{FUEL_LIMIT, PINS_PER_SIDE};
use reactor_csg::models::{MaskedAssemblyModel, PinCellModel};
use reactor_csg::search::{run_search, DifferentialEvolution, ParameterVector};
use reactor_csg::surface::BoundaryCondition;

fn scratch(tag: &str) -> EvaluationConfig {
    EvaluationConfig {
        scratch_root: std::env::temp_dir().join(format!("reactor-csg-models-{tag}-{}", std::process::id())),
        ..EvaluationConfig::default()
    }
}

/// k grows linearly with the uranium enrichment found in the document.
struct EnrichmentResponse;

impl TransportSolver for EnrichmentResponse {
    fn run(&self, model: &ModelDocument, _: &Path) -> Result<KeffEstimate, SolverError> {
        let enrichment = model
            .materials
            .iter()
            .flat_map(|(_, m)| &m.constituents)
            .find_map(|c| match c {
                Constituent::Element { enrichment: Some(e), .. } => Some(*e),
                _ => None,
            })
            .ok_or_else(|| SolverError::Failed("no fuel".to_string()))?;
        Ok(KeffEstimate::new(0.8 + 0.1 * enrichment, 1e-4))
    }
}

/// k grows with the number of lattice positions holding the fuel pin.
struct FuelCount;

impl TransportSolver for FuelCount {
    fn run(&self, model: &ModelDocument, _: &Path) -> Result<KeffEstimate, SolverError> {
        let (_, lattice) = &model.lattices[0];
        let fuel = lattice
            .universes()
            .iter()
            .filter(|&&u| model.universe(u).is_some_and(|u| u.name == "Fuel Pin"))
            .count();
        Ok(KeffEstimate::new(fuel as f64 / 100.0, 1e-4))
    }
}

#[test]
fn pin_cell_document_is_reflective_box() {
    let built = PinCellModel::default().build(&ParameterVector(vec![3.0])).unwrap();
    let doc = &built.document;
    assert_eq!(doc.materials.len(), 3);
    assert!(doc.lattices.is_empty());
    let reflective = doc
        .surfaces
        .iter()
        .filter(|(_, s)| s.boundary == BoundaryCondition::Reflective)
        .count();
    assert_eq!(reflective, 4);
    assert_eq!(doc.settings.batches, 150);
}

#[test]
fn pin_cell_search_finds_target_enrichment() {
    let evaluator = Evaluator::new(PinCellModel::default(), EnrichmentResponse, PinCellModel::objective())
        .with_config(scratch("pin"));
    let config = SearchConfig { population: 8, generations: 40, ..SearchConfig::default() };
    let mut de = DifferentialEvolution::new(PinCellModel::parameter_space().unwrap(), evaluator.direction(), &config);

    let outcome = run_search(&mut de, config.generations, |pop| evaluator.fitness_batch(pop)).unwrap();
    let (best, fitness) = outcome.best.unwrap();
    assert!(fitness < 1e-2, "fitness {fitness}");
    assert!((best.0[0] - 3.0).abs() < 0.1, "enrichment {:?}", best);
}

#[test]
fn masked_assembly_penalises_excess_fuel() {
    let evaluator = Evaluator::new(MaskedAssemblyModel::default(), FuelCount, MaskedAssemblyModel::objective())
        .with_penalty(MaskedAssemblyModel::penalty())
        .with_config(scratch("mask"));
    let n = PINS_PER_SIDE * PINS_PER_SIDE;

    let full = evaluator.evaluate(&ParameterVector(vec![1.0; n])).unwrap();
    assert_eq!(full.constrained_count, n);
    assert!(full.fitness < 0.0);

    let mut bits = vec![0.0; n];
    bits[..FUEL_LIMIT].iter_mut().for_each(|b| *b = 1.0);
    let at_limit = evaluator.evaluate(&ParameterVector(bits)).unwrap();
    assert_eq!(at_limit.constrained_count, FUEL_LIMIT);
    assert!((at_limit.fitness - FUEL_LIMIT as f64 / 100.0).abs() < 1e-12);
}

#[test]
fn masked_assembly_search_stays_within_fuel_limit() {
    let evaluator = Evaluator::new(MaskedAssemblyModel::default(), FuelCount, MaskedAssemblyModel::objective())
        .with_penalty(MaskedAssemblyModel::penalty())
        .with_config(scratch("mask-search"));
    let config = SearchConfig { generations: 10, ..SearchConfig::default() };
    let mut de = DifferentialEvolution::new(MaskedAssemblyModel::parameter_space().unwrap(), evaluator.direction(), &config);

    let outcome = run_search(&mut de, config.generations, |pop| evaluator.fitness_batch(pop)).unwrap();
    let (best, fitness) = outcome.best.unwrap();
    let fuel = best.0.iter().filter(|b| b.round() == 1.0).count();
    assert!(fuel <= FUEL_LIMIT, "{fuel} fuel pins");
    assert!(fitness > 0.0);
    assert!((fitness - fuel as f64 / 100.0).abs() < 1e-12);
}
