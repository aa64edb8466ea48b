use colored::*;
use departures_core::{Airport, ReferenceData};
use departures_engine::{Flight, Remarks};

/// One printable line of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub time: String,
    pub flight: String,
    pub destination: String,
    pub gate: String,
    pub remarks: String,
    pub status: Option<Remarks>,
}

pub fn board_rows(flights: &[Flight], reference: &ReferenceData) -> Vec<BoardRow> {
    flights
        .iter()
        .map(|flight| BoardRow {
            time: flight.time.format("%H:%M").to_string(),
            flight: format!("{}{}", flight.airline_code, flight.flight_number),
            destination: reference
                .airport(&flight.airport_code)
                .map(destination_name)
                .unwrap_or_else(|| flight.airport_code.clone()),
            gate: flight.gate.clone(),
            remarks: remarks_text(flight),
            status: flight.remarks,
        })
        .collect()
}

/// English name from the airport's `names` map, falling back to the code.
pub fn destination_name(airport: &Airport) -> String {
    airport
        .extra
        .get("names")
        .and_then(|names| names.get("en"))
        .and_then(|name| name.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| airport.code.clone())
}

/// Remarks label, with the re-timed departure appended for delayed flights.
pub fn remarks_text(flight: &Flight) -> String {
    match flight.remarks {
        Some(Remarks::Delayed) => format!(
            "{} {}",
            remarks_label(Remarks::Delayed),
            flight.expected_departure().format("%H:%M")
        ),
        Some(remarks) => remarks_label(remarks).to_string(),
        None => String::new(),
    }
}

fn remarks_label(remarks: Remarks) -> &'static str {
    match remarks {
        Remarks::Done | Remarks::Departed => "Departed",
        Remarks::Closed => "Gate closed",
        Remarks::FinalCall => "Final call",
        Remarks::Boarding => "Boarding",
        Remarks::GoGate => "Go to gate",
        Remarks::Delayed => "Delayed",
        Remarks::CheckIn => "Check-in",
        Remarks::OnTime => "On time",
        Remarks::Cancelled => "Cancelled",
    }
}

fn paint(text: &str, status: Option<Remarks>) -> ColoredString {
    match status {
        Some(Remarks::Cancelled) => text.red().bold(),
        Some(Remarks::Delayed) => text.yellow(),
        Some(Remarks::FinalCall) | Some(Remarks::Boarding) => text.green().bold(),
        Some(Remarks::GoGate) => text.green(),
        Some(Remarks::Departed) | Some(Remarks::Closed) | Some(Remarks::Done) => text.dimmed(),
        _ => text.normal(),
    }
}

pub fn print_board(rows: &[BoardRow]) {
    let width = rows
        .iter()
        .map(|row| row.destination.chars().count())
        .max()
        .unwrap_or(0)
        .max("DESTINATION".len());

    println!(
        "{}",
        format!(
            "{:<6} {:<8} {:<width$} {:<5} {}",
            "TIME", "FLIGHT", "DESTINATION", "GATE", "REMARKS"
        )
        .bold()
    );
    for row in rows {
        println!(
            "{:<6} {:<8} {:<width$} {:<5} {}",
            row.time,
            row.flight,
            row.destination,
            row.gate,
            paint(&row.remarks, row.status)
        );
    }

    if rows.is_empty() {
        println!("{}", "No departures to show".dimmed());
    }
}
