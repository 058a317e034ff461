use approx::assert_relative_eq;
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sitekmeans_rs::io::{load_inputs, load_population, write_result};
use sitekmeans_rs::{
    initialize_centers, planar_distance, points_to_arrays, reduce_sample, refine_centers,
    refine_step, Candidate, Competitor, CompetitorIndex, OptimizationResult, OptimizerConfig,
    OptimizerError, PopulationPoint, SamplingConfig, SiteOptimizer, NO_COMPETITOR_DISTANCE,
};
use std::fs;

/// Generate population areas scattered around a few dense cores
fn generate_clustered_points(
    n_points: usize,
    cores: &[(f64, f64)],
    spread: f64,
    seed: u64,
) -> Vec<PopulationPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let offsets = Array2::random_using((n_points, 2), Uniform::new(-spread, spread), &mut rng);

    (0..n_points)
        .map(|i| {
            let (lat, long) = cores[i % cores.len()];
            PopulationPoint::new(
                format!("oa{i}"),
                rng.gen_range(50..2_000),
                lat + offsets[[i, 0]],
                long + offsets[[i, 1]],
            )
        })
        .collect()
}

fn total_population(points: &[PopulationPoint]) -> u64 {
    points.iter().map(|p| p.population).sum()
}

const CORES: [(f64, f64); 4] = [(51.5, -0.1), (52.5, -1.9), (53.5, -2.2), (53.8, -1.5)];

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_single_center_converges_on_weighted_centroid() {
    let points = vec![
        PopulationPoint::new("A", 1000, 0.0, 0.0),
        PopulationPoint::new("B", 500, 1.0, 0.0),
    ];
    let competitors = CompetitorIndex::new(vec![Competitor::new(100.0, 100.0)]);
    let config = OptimizerConfig::new(1);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let initial = initialize_centers(1, &points, &competitors, &config, &mut rng);
    assert_eq!(initial.len(), 1);
    assert_eq!((initial[0].lat, initial[0].long), (0.0, 0.0));
    assert_relative_eq!(
        initial[0].nearest_competitor_distance,
        (2.0f64 * 100.0 * 100.0).sqrt(),
        epsilon = 1e-9
    );

    let result = refine_centers(&initial, &points, &competitors, &config);
    let center = result.centers[0];
    let expected_lat = 500.0 / 1500.0;
    let expected_distance = planar_distance(expected_lat, 0.0, 100.0, 100.0);

    assert_relative_eq!(center.lat, expected_lat, epsilon = 1e-12);
    assert_eq!(center.long, 0.0);
    assert_eq!(center.population_captured, 1500);
    assert_relative_eq!(center.nearest_competitor_distance, expected_distance, epsilon = 1e-12);
    assert_relative_eq!(
        center.score,
        1500.0 * (1.0 + expected_distance * 5.0),
        epsilon = 1e-6
    );

    assert!(result.converged);
    assert_eq!(result.n_iterations, 2);
    assert_eq!(result.max_movement, 0.0);
}

#[test]
fn test_competitor_avoidance_moves_center_off_competitor() {
    let points = vec![
        PopulationPoint::new("A", 1000, 0.0, 0.0),
        PopulationPoint::new("B", 1000, 0.002, 0.0),
    ];
    // Competitor right next to the weighted centroid at (0.001, 0)
    let competitors = CompetitorIndex::new(vec![Competitor::new(0.001, -0.004)]);
    let config = OptimizerConfig::new(1).with_max_iters(1);

    let initial = vec![Candidate::seeded(0.0, 0.0, 0.0)];
    let result = refine_centers(&initial, &points, &competitors, &config);
    let center = result.centers[0];

    assert_relative_eq!(center.lat, 0.001 + 0.015, epsilon = 1e-12);
    assert_relative_eq!(center.long, 0.0, epsilon = 1e-12);
    assert!(center.nearest_competitor_distance > 0.004);
}

// ============================================================================
// Property Tests
// ============================================================================

#[test]
fn test_partition_of_sampled_population() {
    let points = generate_clustered_points(2_000, &CORES, 0.3, 7);
    let config = OptimizerConfig::new(4).with_seed(Some(7));
    let optimizer = SiteOptimizer::with_config(config);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let run = optimizer
        .run_with_rng(&points, &[Competitor::new(51.5, -0.1)], &mut rng)
        .unwrap();

    // Every sampled point has exactly one label in range
    assert_eq!(run.refinement.labels.len(), run.sample.len());
    assert!(run.refinement.labels.iter().all(|&l| l < run.refinement.centers.len()));

    let captured: u64 = run
        .refinement
        .centers
        .iter()
        .map(|c| c.population_captured)
        .sum();
    assert_eq!(captured, total_population(&run.sample));
    assert_eq!(run.result.summary.total_population_captured, captured);
}

#[test]
fn test_cardinality_never_exceeds_k() {
    for k in [1, 3, 8, 20] {
        let points = generate_clustered_points(300, &CORES, 0.2, k as u64);
        let optimizer =
            SiteOptimizer::with_config(OptimizerConfig::new(k).with_seed(Some(k as u64)));
        let result = optimizer.optimize(&points, &[]).unwrap();
        assert!(result.locations.len() <= k);
        assert_eq!(result.metadata.optimized_locations, result.locations.len());
    }

    // Fewer distinct points than k: seeding stops early
    let duplicates: Vec<PopulationPoint> = (0..5)
        .map(|i| PopulationPoint::new(format!("d{i}"), 500, 1.0, 1.0))
        .collect();
    let optimizer = SiteOptimizer::with_config(OptimizerConfig::new(3).with_seed(Some(1)));
    let result = optimizer.optimize(&duplicates, &[]).unwrap();
    assert_eq!(result.locations.len(), 1);
}

#[test]
fn test_ranks_form_permutation_with_non_increasing_scores() {
    let points = generate_clustered_points(1_500, &CORES, 0.4, 21);
    let competitors = vec![Competitor::new(52.5, -1.9), Competitor::new(53.6, -2.0)];
    let optimizer = SiteOptimizer::with_config(OptimizerConfig::new(8).with_seed(Some(21)));
    let result = optimizer.optimize(&points, &competitors).unwrap();

    let ranks: Vec<usize> = result.locations.iter().map(|l| l.rank).collect();
    let expected: Vec<usize> = (1..=result.locations.len()).collect();
    assert_eq!(ranks, expected);

    for pair in result.locations.windows(2) {
        assert!(pair[0].metrics.optimization_score >= pair[1].metrics.optimization_score);
    }
}

#[test]
fn test_converged_centers_are_a_fixed_point() {
    // Well separated cores so the final assignment is stable
    let cores = [(0.0, 0.0), (10.0, 10.0), (-10.0, 5.0)];
    let points = generate_clustered_points(600, &cores, 0.5, 3);
    let competitors = CompetitorIndex::default();
    let config = OptimizerConfig::new(3);
    let initial = vec![
        Candidate::seeded(0.1, 0.1, NO_COMPETITOR_DISTANCE),
        Candidate::seeded(9.9, 9.9, NO_COMPETITOR_DISTANCE),
        Candidate::seeded(-9.9, 5.1, NO_COMPETITOR_DISTANCE),
    ];

    let result = refine_centers(&initial, &points, &competitors, &config);
    assert!(result.converged);

    let (coords, population) = points_to_arrays(&points);
    let (again, _) = refine_step(
        &result.centers,
        &coords.view(),
        &population.view(),
        &competitors,
        &config,
    );

    for (before, after) in result.centers.iter().zip(&again) {
        assert_relative_eq!(before.lat, after.lat, epsilon = 1e-12);
        assert_relative_eq!(before.long, after.long, epsilon = 1e-12);
        assert_eq!(before.population_captured, after.population_captured);
    }
}

#[test]
fn test_no_competitors_uses_sentinel_everywhere() {
    let points = generate_clustered_points(800, &CORES, 0.3, 4);
    let optimizer = SiteOptimizer::with_config(OptimizerConfig::new(5).with_seed(Some(4)));
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let run = optimizer.run_with_rng(&points, &[], &mut rng).unwrap();

    assert!(!run.refinement.centers.is_empty());
    for center in run.initial_centers.iter().chain(&run.refinement.centers) {
        assert_eq!(center.nearest_competitor_distance, NO_COMPETITOR_DISTANCE);
    }
    for location in &run.result.locations {
        assert_eq!(location.metrics.competitor_distance, 1.0);
    }
    assert_eq!(run.result.summary.average_competitor_distance, 1.0);
}

#[test]
fn test_sampling_keeps_all_high_points_within_cap() {
    let mut points = Vec::with_capacity(25_000);
    for i in 0..25_000u64 {
        let population = if i % 5 == 0 { 400 + i % 600 } else { i % 400 };
        points.push(PopulationPoint::new(format!("oa{i}"), population, 0.0, i as f64));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let (sample, stats) = reduce_sample(&points, &SamplingConfig::default(), &mut rng);

    assert_eq!(stats.high, 5_000);
    assert_eq!(sample.iter().filter(|p| p.population >= 400).count(), 5_000);
    assert!(stats.regular_kept <= 15_000);
    assert!(sample.len() <= 20_000);
    // Roughly 5% of the 20,000 regular points survive the draw
    assert!(stats.regular_drawn > 800 && stats.regular_drawn < 1_200);
}

#[test]
fn test_seeding_probability_follows_squared_distance() {
    // Equal populations: the first point is the first center, then B at
    // distance 1 and C at distance 2 should be drawn 1:4.
    let points = vec![
        PopulationPoint::new("A", 100, 0.0, 0.0),
        PopulationPoint::new("B", 100, 1.0, 0.0),
        PopulationPoint::new("C", 100, 2.0, 0.0),
    ];
    let competitors = CompetitorIndex::default();
    let config = OptimizerConfig::new(2);
    let mut rng = ChaCha8Rng::seed_from_u64(12345);

    let trials = 5_000;
    let mut far = 0;
    for _ in 0..trials {
        let centers = initialize_centers(2, &points, &competitors, &config, &mut rng);
        assert_eq!((centers[0].lat, centers[0].long), (0.0, 0.0));
        if centers[1].lat == 2.0 {
            far += 1;
        }
    }

    let fraction = far as f64 / trials as f64;
    assert!((fraction - 0.8).abs() < 0.03, "far fraction was {fraction}");
}

#[test]
fn test_empty_population_gives_empty_pipeline() {
    let config = OptimizerConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let competitors = CompetitorIndex::new(vec![Competitor::new(1.0, 1.0)]);

    let (sample, _) = reduce_sample(&[], &config.sampling, &mut rng);
    let initial = initialize_centers(config.k, &sample, &competitors, &config, &mut rng);
    let result = refine_centers(&initial, &sample, &competitors, &config);

    assert!(sample.is_empty());
    assert!(initial.is_empty());
    assert!(result.centers.is_empty());
}

// ============================================================================
// File Round Trip Tests
// ============================================================================

#[test]
fn test_end_to_end_with_files() {
    let dir = tempfile::tempdir().unwrap();
    let population_path = dir.path().join("population.csv");
    let competitor_path = dir.path().join("week1.csv");
    let output_path = dir.path().join("public").join("optimization_results.json");

    let mut population_csv = String::from("oa_id,population,lat,long\n");
    for point in generate_clustered_points(500, &CORES, 0.2, 9) {
        population_csv.push_str(&format!(
            "{},{},{},{}\n",
            point.id, point.population, point.lat, point.long
        ));
    }
    fs::write(&population_path, population_csv).unwrap();
    fs::write(&competitor_path, "id,lat,long\nc1,51.5,-0.1\nc2,53.5,-2.2\n").unwrap();

    let (populations, competitors) = load_inputs(&population_path, &competitor_path).unwrap();
    assert_eq!(populations.len(), 500);
    assert_eq!(competitors.len(), 2);

    let optimizer = SiteOptimizer::with_config(OptimizerConfig::new(4).with_seed(Some(9)));
    let result = optimizer.optimize(&populations, &competitors).unwrap();
    write_result(&output_path, &result).unwrap();

    let written = fs::read_to_string(&output_path).unwrap();
    let parsed: OptimizationResult = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.metadata, result.metadata);
    assert_eq!(parsed.locations.len(), result.locations.len());
    for (read, original) in parsed.locations.iter().zip(&result.locations) {
        assert_eq!(read.rank, original.rank);
        assert_eq!(read.metrics.population_captured, original.metrics.population_captured);
        assert_eq!(read.metrics.optimization_score, original.metrics.optimization_score);
        assert_eq!(read.business_insights, original.business_insights);
        assert_relative_eq!(
            read.coordinates.latitude,
            original.coordinates.latitude,
            epsilon = 1e-9
        );
    }

    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    for key in ["metadata", "summary", "locations", "algorithm"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["metadata"]["totalCompetitors"], 2);
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    let err = load_population(&missing).unwrap_err();
    assert!(matches!(err, OptimizerError::Io { .. }));
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn test_malformed_row_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let population_path = dir.path().join("population.csv");
    let competitor_path = dir.path().join("week1.csv");
    fs::write(&population_path, "oa_id,population,lat,long\nE1,10,51.0,-1.0\nE2,ten,51.0,-1.0\n")
        .unwrap();
    fs::write(&competitor_path, "id,lat,long\n").unwrap();

    let err = load_inputs(&population_path, &competitor_path).unwrap_err();
    assert!(matches!(err, OptimizerError::InvalidData(_)));
    assert!(err.to_string().contains("line 3"));
}
