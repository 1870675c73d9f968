//! Quality scoring of oil records.
//!
//! A record's quality index measures how completely it was measured, as a
//! weighted mean of per-category scores in `[0, 1]`. Scoring reads only
//! what a record carries, so it applies equally to raw input records and to
//! finished [`OilRecord`](crate::OilRecord)s.

use oilprops_record::{RawMeasurement, RecordSource, Scalar, Series, Text};

/// Category scores of a record, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScore {
    pub densities: f64,
    pub viscosities: f64,
    pub sara: f64,
    pub cuts: f64,
    pub interfacial_tensions: f64,
    pub pour_point: f64,
    pub demographics: f64,
    pub flash_point: f64,
    pub emulsion: f64,
}

impl QualityScore {
    /// Scores every category of `record`.
    #[must_use]
    pub fn of<S: RecordSource + ?Sized>(record: &S) -> Self {
        Self {
            densities: densities(record),
            viscosities: viscosities(record),
            sara: sara(record),
            cuts: cuts(record),
            interfacial_tensions: interfacial_tensions(record),
            pour_point: pour_point(record),
            demographics: demographics(record),
            flash_point: flash_point(record),
            emulsion: emulsion(record),
        }
    }

    /// Weighted mean of the category scores.
    ///
    /// Distillation cuts weigh the most, followed by densities, viscosities,
    /// and SARA fractions.
    #[must_use]
    pub fn total(&self) -> f64 {
        weighted_mean(&[
            (self.densities, 5.0),
            (self.viscosities, 5.0),
            (self.sara, 5.0),
            (self.cuts, 10.0),
            (self.interfacial_tensions, 3.0),
            (self.pour_point, 2.0),
            (self.demographics, 1.0),
            (self.flash_point, 1.0),
            (self.emulsion, 1.0),
        ])
    }
}

/// The quality index of a record, in `[0, 1]`.
#[must_use]
pub fn score<S: RecordSource + ?Sized>(record: &S) -> f64 {
    QualityScore::of(record).total()
}

fn densities<S: RecordSource + ?Sized>(record: &S) -> f64 {
    let densities = record.measurements(Series::Densities);

    let mut scores: Vec<f64> = densities.iter().map(complete).collect();

    let at_reference = densities
        .iter()
        .filter_map(|d| d.ref_temp_k)
        .any(|t| is_close(t, 288.0) || is_close(t, 288.15));

    if !at_reference {
        scores.push(present(record.scalar(Scalar::Api)));
    }

    decaying_mean(scores, 4)
}

fn viscosities<S: RecordSource + ?Sized>(record: &S) -> f64 {
    let kvis = record.measurements(Series::KinematicViscosities);
    let dvis = record.measurements(Series::DynamicViscosities);

    let mut seen: Vec<Option<f64>> = Vec::new();
    let mut scores = Vec::new();

    for v in kvis.iter().chain(dvis.iter()) {
        if !seen.contains(&v.ref_temp_k) {
            seen.push(v.ref_temp_k);
            scores.push(complete(v));
        }
    }

    decaying_mean(scores, 4)
}

fn sara<S: RecordSource + ?Sized>(record: &S) -> f64 {
    mean(&[
        present(record.scalar(Scalar::Saturates)),
        present(record.scalar(Scalar::Aromatics)),
        present(record.scalar(Scalar::Resins)),
        present(record.scalar(Scalar::Asphaltenes)),
    ])
}

fn cuts<S: RecordSource + ?Sized>(record: &S) -> f64 {
    let scores = record
        .cuts()
        .iter()
        .map(|c| match (c.fraction, c.vapor_temp_k, c.liquid_temp_k) {
            (Some(_), Some(_), _) => 1.0,
            (Some(_), None, Some(_)) => 0.8,
            _ => 0.0,
        })
        .collect();

    decaying_mean(scores, 10)
}

fn interfacial_tensions<S: RecordSource + ?Sized>(record: &S) -> f64 {
    let both = |value: Scalar, ref_temp: Scalar| {
        present(record.scalar(value).and(record.scalar(ref_temp)))
    };

    mean(&[
        both(Scalar::OilWaterTension, Scalar::OilWaterTensionRefTempK),
        both(Scalar::OilSeawaterTension, Scalar::OilSeawaterTensionRefTempK),
    ])
}

fn pour_point<S: RecordSource + ?Sized>(record: &S) -> f64 {
    weighted_mean(&[
        (present(record.scalar(Scalar::PourPointMaxK)), 2.0),
        (present(record.scalar(Scalar::PourPointMinK)), 1.0),
    ])
}

fn demographics<S: RecordSource + ?Sized>(record: &S) -> f64 {
    present(record.text(Text::Reference))
}

fn flash_point<S: RecordSource + ?Sized>(record: &S) -> f64 {
    present(
        record
            .scalar(Scalar::FlashPointMinK)
            .or(record.scalar(Scalar::FlashPointMaxK)),
    )
}

fn emulsion<S: RecordSource + ?Sized>(record: &S) -> f64 {
    weighted_mean(&[
        (present(record.scalar(Scalar::WaterContentEmulsion)), 2.0),
        (present(record.scalar(Scalar::EmulsConstantMin)), 3.0),
    ])
}

fn present<T>(value: Option<T>) -> f64 {
    if value.is_some() { 1.0 } else { 0.0 }
}

fn complete(m: &RawMeasurement) -> f64 {
    present(m.value.and(m.ref_temp_k))
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

fn mean(scores: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = scores.len() as f64;

    scores.iter().sum::<f64>() / n
}

fn weighted_mean(scores: &[(f64, f64)]) -> f64 {
    let total: f64 = scores.iter().map(|(score, weight)| score * weight).sum();
    let weights: f64 = scores.iter().map(|(_, weight)| weight).sum();

    total / weights
}

/// Weighted mean favoring the first entries, padded with zeros to `min_len`.
///
/// Entry `i` weighs `1/2^(i+1)`, except the last, which repeats the weight
/// before it so the weights sum to one.
fn decaying_mean(mut scores: Vec<f64>, min_len: usize) -> f64 {
    if scores.len() < min_len {
        scores.resize(min_len, 0.0);
    }

    let mut weights: Vec<f64> = std::iter::successors(Some(0.5), |w| Some(w / 2.0))
        .take(scores.len())
        .collect();
    if let [.., second_last, last] = weights.as_mut_slice() {
        *last = *second_last;
    }

    let pairs: Vec<(f64, f64)> = scores.into_iter().zip(weights).collect();
    weighted_mean(&pairs)
}
