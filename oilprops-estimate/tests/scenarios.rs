use approx::assert_relative_eq;
use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_estimate::{
    EstimationError, Estimator, EstimatorConfig, Outcome, RejectionReason, estimate,
};
use oilprops_record::{ImportedRecord, JsonRecord, RecordSource, Scalar};
use serde_json::json;

#[test]
fn api_and_one_viscosity_is_enough() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();
    let record = ImportedRecord::new("AD00101")
        .with_product_type("Crude")
        .with_api(30.0)
        .with_kvis(1e-5, 288.15);

    let estimator = Estimator::new(&record, &config);
    let (from_api, _) = config.correlations.density.density_from_api(30.0);
    assert_relative_eq!(estimator.density_at_temp(REFERENCE_TEMP_K, 0.0)?, from_api);

    let cuts = estimator.normalized_cuts()?;
    assert!(!cuts.is_empty());
    assert!(cuts.len() <= config.cut_count);

    let Outcome::Accepted(oil) = estimate(&record, &config)? else {
        panic!("record should be accepted");
    };

    assert_relative_eq!(oil.api, 30.0);
    assert_eq!(oil.densities.len(), 1);
    assert!(!oil.estimated.api);
    assert!(oil.estimated.cuts);
    assert!(oil.estimated.inert_fractions);
    assert!(oil.estimated.pour_point);
    assert!(oil.estimated.flash_point);
    assert!(!oil.estimated.viscosities);

    // Two components per cut plus resins and asphaltenes.
    assert_eq!(oil.components.len(), 2 * oil.cuts.len() + 2);
    assert_relative_eq!(oil.k0y, 2.02e-6);
    assert_relative_eq!(oil.emulsion_water_fraction_max, 0.9);
    assert!(oil.quality_index > 0.0 && oil.quality_index < 1.0);

    Ok(())
}

#[test]
fn decreasing_cut_fraction_is_culled() {
    let record = ImportedRecord::new("AD00102")
        .with_cut(310.15, 0.3)
        .with_cut(400.0, 0.2);

    let culled = record.culled_cuts();
    assert_eq!(culled.len(), 1);
    assert_relative_eq!(culled[0].vapor_temp_k, 310.15);
}

#[test]
fn refined_products_do_not_emulsify() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();
    let record = ImportedRecord::new("AD00103")
        .with_product_type("Refined")
        .with_api(38.0)
        .with_kvis(2e-6, 288.15);

    let bullwinkle = Estimator::new(&record, &config).bullwinkle_fraction()?;
    assert_eq!(bullwinkle.value, 1.0);
    assert!(bullwinkle.estimated);

    Ok(())
}

#[test]
fn missing_density_information_is_rejected() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();
    let record = ImportedRecord::new("AD00104")
        .with_product_type("Crude")
        .with_scalar(Scalar::Resins, 0.1)
        .with_scalar(Scalar::Asphaltenes, 0.05)
        .with_kvis(1e-4, 288.15);

    let Outcome::Rejected(rejection) = estimate(&record, &config)? else {
        panic!("record should be rejected");
    };

    assert_eq!(rejection.record_id.as_deref(), Some("AD00104"));
    assert!(rejection.has(&RejectionReason::NoDensityInformation));
    assert!(rejection.to_string().contains("no density information"));

    Ok(())
}

#[test]
fn measured_kvis_shadows_dvis_at_same_temperature() -> Result<(), EstimationError> {
    let config = EstimatorConfig::default();
    let record = ImportedRecord::new("AD00105")
        .with_product_type("Crude")
        .with_api(30.0)
        .with_kvis(1e-5, 300.0)
        .with_dvis(0.02, 300.0)
        .with_dvis(0.05, 280.0);

    let estimator = Estimator::new(&record, &config);
    let kvis = estimator.aggregate_kvis()?;

    assert_eq!(kvis.len(), 2);
    assert_eq!(kvis.iter().filter(|k| k.ref_temp_k == 300.0).count(), 1);

    let at_300 = kvis.iter().find(|k| k.ref_temp_k == 300.0).unwrap();
    assert_relative_eq!(at_300.m_2_s, 1e-5);
    assert!(!at_300.estimated);

    let at_280 = kvis.iter().find(|k| k.ref_temp_k == 280.0).unwrap();
    assert!(at_280.estimated);
    assert!(at_280.m_2_s > 0.0);

    Ok(())
}

#[test]
fn json_records_estimate_like_imported_ones() -> Result<(), Box<dyn std::error::Error>> {
    let record: JsonRecord = json!({
        "oil_id": "AD00106",
        "name": "Test Crude",
        "product_type": "crude",
        "api": "31.5",
        "kvis": [{"cst": 10.0, "ref_temp_c": 15.0}],
        "pour_point_c": "<-20",
        "cuts": [
            {"vapor_temp_c": 100.0, "fraction": 0.2},
            {"vapor_temp_c": 200.0, "fraction": 0.5},
            {"vapor_temp_c": 300.0, "fraction": 0.8},
        ],
    })
    .try_into()?;

    let config = EstimatorConfig::default();
    let Outcome::Accepted(oil) = estimate(&record, &config)? else {
        panic!("record should be accepted");
    };

    assert_eq!(oil.name.as_deref(), Some("Test Crude"));
    assert_relative_eq!(oil.kvis[0].m_2_s, 1e-5, epsilon = 1e-15);

    assert_eq!(oil.pour_point.min_k, None);
    assert_relative_eq!(oil.pour_point.max_k.unwrap(), 253.15, epsilon = 1e-9);
    assert!(!oil.estimated.pour_point);
    assert!(!oil.estimated.cuts);

    Ok(())
}

#[test]
fn invalid_configuration_is_an_error() {
    let mut config = EstimatorConfig::default();
    config.cut_count = 0;

    let record = ImportedRecord::new("AD00107");
    assert!(matches!(estimate(&record, &config), Err(EstimationError::Config(_))));
}
