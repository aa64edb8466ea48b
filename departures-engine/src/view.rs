use crate::flight::Flight;

/// The only slice of the schedule external consumers ever see.
///
/// Keeps flights whose minutes until departure are strictly above
/// `filter_start` (flights never annotated are skipped), then truncates to the
/// first `max_results` in schedule order.
pub fn current_view(flights: &[Flight], filter_start: i64, max_results: usize) -> Vec<Flight> {
    flights
        .iter()
        .filter(|flight| {
            flight
                .minutes_until_departure
                .map_or(false, |minutes| minutes > filter_start)
        })
        .take(max_results)
        .cloned()
        .collect()
}
