use std::num::NonZeroUsize;
use std::thread;

use oilprops_record::{RecordSource, Text};
use tracing::warn;

use crate::{EstimationError, EstimatorConfig, Outcome, estimate};

/// Estimates each record in turn.
///
/// Results are returned in input order. Rejections and errors are logged and
/// returned, never propagated, so one bad record does not stop the batch.
pub fn estimate_batch<S: RecordSource>(
    records: &[S],
    config: &EstimatorConfig,
) -> Vec<Result<Outcome, EstimationError>> {
    records.iter().map(|record| estimate_logged(record, config)).collect()
}

/// Estimates records on up to `threads` scoped threads.
///
/// Records share nothing but the configuration, so the results are exactly
/// those of [`estimate_batch`], in input order.
pub fn estimate_batch_parallel<S: RecordSource + Sync>(
    records: &[S],
    config: &EstimatorConfig,
    threads: NonZeroUsize,
) -> Vec<Result<Outcome, EstimationError>> {
    if records.is_empty() {
        return Vec::new();
    }

    let chunk_size = records.len().div_ceil(threads.get());

    thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || estimate_batch(chunk, config)))
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

fn estimate_logged<S: RecordSource>(
    record: &S,
    config: &EstimatorConfig,
) -> Result<Outcome, EstimationError> {
    let result = estimate(record, config);

    match &result {
        Ok(Outcome::Rejected(rejection)) => {
            warn!(record = ?rejection.record_id, reasons = %rejection, "record rejected");
        }
        Err(e) => {
            let id = record.text(Text::RecordId);
            warn!(record = ?id, error = %e, "estimation failed");
        }
        Ok(Outcome::Accepted(_)) => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use oilprops_record::ImportedRecord;

    fn records() -> Vec<ImportedRecord> {
        (0..7)
            .map(|i| {
                let record = ImportedRecord::new(format!("AD{i:04}"))
                    .with_product_type("Crude")
                    .with_kvis(1e-5, 288.15);

                // Every third record lacks density information.
                if i % 3 == 0 {
                    record
                } else {
                    record.with_api(30.0 + f64::from(i))
                }
            })
            .collect()
    }

    #[test]
    fn rejections_do_not_stop_the_batch() {
        let config = EstimatorConfig::default();
        let results = estimate_batch(&records(), &config);

        assert_eq!(results.len(), 7);
        for (i, result) in results.iter().enumerate() {
            let accepted = matches!(result, Ok(Outcome::Accepted(_)));
            assert_eq!(accepted, i % 3 != 0, "record {i}");
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let config = EstimatorConfig::default();
        let records = records();

        let sequential = estimate_batch(&records, &config);
        for threads in [1, 3, 16] {
            let threads = NonZeroUsize::new(threads).unwrap();
            assert_eq!(estimate_batch_parallel(&records, &config, threads), sequential);
        }

        let empty: [ImportedRecord; 0] = [];
        let one = NonZeroUsize::new(1).unwrap();
        assert!(estimate_batch_parallel(&empty, &config, one).is_empty());
    }
}
