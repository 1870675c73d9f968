//! Selecting measurements by reference temperature.
//!
//! Series are not assumed to be sorted; each function orders candidates by
//! reference temperature itself, keeping series order among equal temperatures.

use crate::measurement::Measurement;

/// Anything measured at a reference temperature.
pub trait ReferenceTemperature {
    /// Reference temperature in kelvin.
    fn ref_temp_k(&self) -> f64;
}

impl ReferenceTemperature for Measurement {
    fn ref_temp_k(&self) -> f64 {
        self.ref_temp_k
    }
}

impl<T: ReferenceTemperature> ReferenceTemperature for &T {
    fn ref_temp_k(&self) -> f64 {
        (**self).ref_temp_k()
    }
}

fn sorted_by_temperature<T: ReferenceTemperature>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| a.ref_temp_k().total_cmp(&b.ref_temp_k()));
    sorted
}

/// The entry with the lowest reference temperature.
#[must_use]
pub fn lowest_temperature<T: ReferenceTemperature>(items: &[T]) -> Option<&T> {
    sorted_by_temperature(items).into_iter().next()
}

/// The entry whose reference temperature is nearest `temp_k`.
///
/// Ties go to the colder entry, since entries are compared in order of
/// ascending temperature and the first of equally near entries is kept.
#[must_use]
pub fn closest_to_temperature<T: ReferenceTemperature>(items: &[T], temp_k: f64) -> Option<&T> {
    sorted_by_temperature(items)
        .into_iter()
        .fold(None, |best: Option<&T>, item| match best {
            Some(b) if (b.ref_temp_k() - temp_k).abs() <= (item.ref_temp_k() - temp_k).abs() => {
                Some(b)
            }
            _ => Some(item),
        })
}

/// [`closest_to_temperature`] for each of several target temperatures.
///
/// Returns `None` if the series is empty.
#[must_use]
pub fn closest_to_temperatures<'a, T: ReferenceTemperature>(
    items: &'a [T],
    temps_k: &[f64],
) -> Option<Vec<&'a T>> {
    temps_k
        .iter()
        .map(|&t| closest_to_temperature(items, t))
        .collect()
}

/// The pair of entries whose reference temperatures bracket `temp_k`.
///
/// Returns `(lower, upper)` where `lower` is the warmest entry at or below
/// `temp_k` and `upper` the next entry above it. A target colder than every
/// entry gives the coldest entry twice, one warmer than every entry gives the
/// warmest twice, and a single-entry series gives that entry twice.
/// Returns `None` if the series is empty.
#[must_use]
pub fn bounding_temperatures<T: ReferenceTemperature>(items: &[T], temp_k: f64) -> Option<(&T, &T)> {
    let sorted = sorted_by_temperature(items);
    let last = sorted.len().checked_sub(1)?;

    let at_or_below = sorted.iter().take_while(|item| item.ref_temp_k() <= temp_k).count();

    let (lower, upper) = match at_or_below {
        0 => (0, 0),
        n if n > last => (last, last),
        n => (n - 1, n),
    };

    Some((sorted[lower], sorted[upper]))
}

/// [`bounding_temperatures`] for each of several target temperatures.
///
/// Returns `None` if the series is empty.
#[must_use]
pub fn bounding_temperatures_many<'a, T: ReferenceTemperature>(
    items: &'a [T],
    temps_k: &[f64],
) -> Option<Vec<(&'a T, &'a T)>> {
    temps_k
        .iter()
        .map(|&t| bounding_temperatures(items, t))
        .collect()
}
