use std::num::NonZeroUsize;

use approx::{assert_relative_eq, relative_eq};
use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_estimate::{
    EstimationError, Estimator, EstimatorConfig, OilRecord, Outcome, RejectionReason, SaraType,
    estimate, estimate_batch, estimate_batch_parallel,
};
use oilprops_record::selection::bounding_temperatures;
use oilprops_record::{ImportedRecord, Measurement, Scalar};

fn records() -> Vec<ImportedRecord> {
    vec![
        ImportedRecord::new("AD00201")
            .with_product_type("Crude")
            .with_api(30.0)
            .with_kvis(1e-5, 288.15),
        ImportedRecord::new("AD00202")
            .with_product_type("Crude")
            .with_api(32.0)
            .with_kvis(1e-5, 288.15)
            .with_scalar(Scalar::Resins, 0.05)
            .with_scalar(Scalar::Asphaltenes, 0.01)
            .with_cut(350.0, 0.1)
            .with_cut(450.0, 0.3)
            .with_cut(550.0, 0.5)
            .with_cut(650.0, 0.7),
        ImportedRecord::new("AD00203")
            .with_product_type("Refined")
            .with_api(40.0)
            .with_kvis(2e-6, 288.15)
            .with_cut(350.0, 0.1)
            .with_cut(400.0, 0.3)
            .with_cut(450.0, 0.6),
        ImportedRecord::new("AD00204")
            .with_product_type("Crude")
            .with_density(870.0, 288.15)
            .with_density(860.0, 303.15)
            .with_kvis(2e-5, 288.15)
            .with_scalar(Scalar::PourPointMaxK, 250.0),
    ]
}

fn accepted(record: &ImportedRecord, config: &EstimatorConfig) -> OilRecord {
    match estimate(record, config) {
        Ok(Outcome::Accepted(oil)) => oil,
        other => panic!("{:?} not accepted: {other:?}", record.oil_id),
    }
}

#[test]
fn estimation_is_deterministic() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();

    for record in records() {
        assert_eq!(estimate(&record, &config)?, estimate(&record, &config)?);
    }

    Ok(())
}

#[test]
fn component_mass_fractions_close() {
    let config = EstimatorConfig::default();

    for record in records() {
        let oil = accepted(&record, &config);
        let total: f64 = oil.components.iter().map(|c| c.mass_fraction).sum();

        assert_relative_eq!(total, 1.0, max_relative = 1e-6);
        assert!(oil.components.iter().all(|c| c.mass_fraction >= 0.0));

        let sara = oil.saturates_fraction
            + oil.aromatics_fraction
            + oil.resins_fraction
            + oil.asphaltenes_fraction;
        assert_relative_eq!(sara, 1.0, max_relative = 1e-6);
    }
}

#[test]
fn cuts_ascend_without_duplicates() {
    let config = EstimatorConfig::default();

    for record in records() {
        let oil = accepted(&record, &config);

        assert!(!oil.cuts.is_empty());
        for pair in oil.cuts.windows(2) {
            assert!(pair[1].vapor_temp_k > pair[0].vapor_temp_k);
            assert!(pair[1].fraction >= pair[0].fraction);
        }
    }
}

#[test]
fn inert_fractions_above_one_are_rejected() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();
    let record = ImportedRecord::new("AD00205")
        .with_product_type("Crude")
        .with_api(30.0)
        .with_kvis(1e-5, 288.15)
        .with_scalar(Scalar::Resins, 0.7)
        .with_scalar(Scalar::Asphaltenes, 0.5);

    let Outcome::Rejected(rejection) = estimate(&record, &config)? else {
        panic!("record should be rejected");
    };

    assert_eq!(rejection.record_id.as_deref(), Some("AD00205"));
    assert!(rejection.has(&RejectionReason::NonMonotonicCuts));
    assert!(rejection.reasons.iter().any(|r| matches!(
        r,
        RejectionReason::NegativeMassFraction { mass_fraction, .. } if *mass_fraction < 0.0
    )));

    Ok(())
}

#[test]
fn density_agrees_with_api() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();

    for record in records() {
        let oil = accepted(&record, &config);

        let density = Estimator::new(&oil, &config).density_at_temp(REFERENCE_TEMP_K, 0.0)?;
        let api = config.correlations.density.api_from_density(density);
        assert!(relative_eq!(api, oil.api, max_relative = config.validation.api_rtol));
    }

    Ok(())
}

#[test]
fn api_is_derived_from_measured_density() {
    let config = EstimatorConfig::default();
    let records = records();
    let oil = accepted(&records[3], &config);

    assert!(oil.estimated.api);
    assert_relative_eq!(
        oil.api,
        config.correlations.density.api_from_density(870.0),
        epsilon = 1e-9
    );

    // A measured pour point is kept as is.
    assert_eq!(oil.pour_point.max_k, Some(250.0));
    assert!(!oil.estimated.pour_point);
}

#[test]
fn inert_components_come_last() {
    let config = EstimatorConfig::default();
    let records = records();
    let oil = accepted(&records[1], &config);

    let types: Vec<SaraType> = oil.components.iter().map(|c| c.sara_type).collect();
    assert_eq!(&types[types.len() - 2..], &[SaraType::Resins, SaraType::Asphaltenes]);
    assert!(types[..types.len() - 2].iter().all(|t| t.is_distillable()));

    assert_relative_eq!(oil.resins_fraction, 0.05);
    assert_relative_eq!(oil.asphaltenes_fraction, 0.01);
    assert!(!oil.estimated.inert_fractions);
}

#[test]
fn bounding_temperatures_at_series_edges() {
    let single = [Measurement::new(880.0, 288.15, 0.0)];
    let (lower, upper) = bounding_temperatures(&single, 350.0).unwrap();
    assert_eq!(lower, upper);
    assert_relative_eq!(lower.ref_temp_k, 288.15);

    let series = [
        Measurement::new(880.0, 288.15, 0.0),
        Measurement::new(870.0, 303.15, 0.0),
        Measurement::new(860.0, 318.15, 0.0),
    ];

    let (lower, upper) = bounding_temperatures(&series, 400.0).unwrap();
    assert_relative_eq!(lower.ref_temp_k, 318.15);
    assert_relative_eq!(upper.ref_temp_k, 318.15);

    let (lower, upper) = bounding_temperatures(&series, 250.0).unwrap();
    assert_relative_eq!(lower.ref_temp_k, 288.15);
    assert_relative_eq!(upper.ref_temp_k, 288.15);

    let empty: [Measurement; 0] = [];
    assert!(bounding_temperatures(&empty, 300.0).is_none());
}

#[test]
fn batch_results_follow_input_order() {
    let config = EstimatorConfig::default();
    let mut records = records();
    records.insert(2, ImportedRecord::new("AD00299"));

    let results = estimate_batch(&records, &config);
    assert_eq!(results.len(), 5);
    assert!(matches!(results[2], Ok(Outcome::Rejected(_))));

    let ids: Vec<Option<String>> = results
        .iter()
        .map(|r| match r {
            Ok(Outcome::Accepted(oil)) => Some(oil.record_id.clone()),
            Ok(Outcome::Rejected(rejection)) => rejection.record_id.clone(),
            Err(_) => None,
        })
        .collect();
    let expected: Vec<Option<String>> = records.iter().map(|r| r.oil_id.clone()).collect();
    assert_eq!(ids, expected);

    let threads = NonZeroUsize::new(2).unwrap();
    assert_eq!(estimate_batch_parallel(&records, &config, threads), results);
}
