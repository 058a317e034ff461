use std::fmt::Write;

use crate::result::OptimizationResult;

/// Render the console report for a finished run
pub fn format_report(result: &OptimizationResult) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== OPTIMIZED LOCATIONS ===");
    for location in &result.locations {
        let _ = writeln!(out);
        let _ = writeln!(out, "Location {}:", location.rank);
        let _ = writeln!(
            out,
            "  Coordinates: {:.6}, {:.6}",
            location.coordinates.latitude, location.coordinates.longitude
        );
        let _ = writeln!(
            out,
            "  Population: {}",
            group_thousands(location.metrics.population_captured)
        );
        let _ = writeln!(
            out,
            "  Competitor Distance: {:.4}",
            location.metrics.competitor_distance
        );
        let _ = writeln!(out, "  Score: {}", location.metrics.optimization_score);
    }

    let summary = &result.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "=== SUMMARY ===");
    let _ = writeln!(
        out,
        "Total Population: {}",
        group_thousands(summary.total_population_captured)
    );
    let _ = writeln!(
        out,
        "Average Competitor Distance: {:.4}",
        summary.average_competitor_distance
    );
    let _ = writeln!(out, "Total Score: {}", summary.total_optimization_score);
    let _ = writeln!(
        out,
        "Estimated Annual Revenue: £{}",
        group_thousands(summary.estimated_annual_revenue)
    );

    out
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::ranking::{build_result, RunContext};
    use crate::types::Candidate;
    use chrono::Utc;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(12_345_678_901), "12,345,678,901");
    }

    #[test]
    fn test_format_report() {
        let centers = vec![Candidate {
            lat: 51.5,
            long: -0.125,
            score: 1_250_000.4,
            population_captured: 1_234_567,
            nearest_competitor_distance: 0.0123,
        }];
        let context = RunContext {
            timestamp: Utc::now(),
            total_competitors: 2,
            total_population_areas: 10,
        };
        let result = build_result(&centers, &context, &OptimizerConfig::default());
        let report = format_report(&result);

        assert!(report.contains("Location 1:"));
        assert!(report.contains("Coordinates: 51.500000, -0.125000"));
        assert!(report.contains("Population: 1,234,567"));
        assert!(report.contains("Competitor Distance: 0.0123"));
        assert!(report.contains("Score: 1250000"));
        assert!(report.contains("Estimated Annual Revenue: £61,728,350"));
    }
}
