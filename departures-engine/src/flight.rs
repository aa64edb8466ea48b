use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle label shown in the remarks column of the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Remarks {
    /// Departed long enough ago to be hidden from the board.
    Done,
    Departed,
    Closed,
    FinalCall,
    Boarding,
    GoGate,
    Delayed,
    CheckIn,
    OnTime,
    Cancelled,
}

impl Remarks {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remarks::Done => "done",
            Remarks::Departed => "departed",
            Remarks::Closed => "closed",
            Remarks::FinalCall => "finalcall",
            Remarks::Boarding => "boarding",
            Remarks::GoGate => "gogate",
            Remarks::Delayed => "delayed",
            Remarks::CheckIn => "checkin",
            Remarks::OnTime => "ontime",
            Remarks::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for Remarks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic departure.
///
/// Everything except `minutes_until_departure` and `remarks` is fixed at
/// generation time. The two derived fields stay `None` until the first
/// remarks refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub time: DateTime<Utc>,
    #[serde(rename = "airline")]
    pub airline_code: String,
    #[serde(rename = "flight")]
    pub flight_number: String,
    #[serde(rename = "airport")]
    pub airport_code: String,
    pub gate: String,
    #[serde(rename = "delay")]
    pub delay_minutes: u32,
    pub cancelled: bool,
    #[serde(rename = "minutes", default, skip_serializing_if = "Option::is_none")]
    pub minutes_until_departure: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Remarks>,
}

impl Flight {
    pub fn builder(
        airline_code: impl Into<String>,
        flight_number: impl Into<String>,
        airport_code: impl Into<String>,
        time: DateTime<Utc>,
    ) -> FlightBuilder {
        FlightBuilder {
            airline_code: airline_code.into(),
            flight_number: flight_number.into(),
            airport_code: airport_code.into(),
            time,
            gate: String::new(),
            delay_minutes: 0,
            cancelled: false,
        }
    }

    /// Departure time once the delay is applied.
    pub fn expected_departure(&self) -> DateTime<Utc> {
        self.time + chrono::Duration::minutes(i64::from(self.delay_minutes))
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_minutes > 0
    }
}

pub struct FlightBuilder {
    airline_code: String,
    flight_number: String,
    airport_code: String,
    time: DateTime<Utc>,
    gate: String,
    delay_minutes: u32,
    cancelled: bool,
}

impl FlightBuilder {
    pub fn gate(mut self, gate: impl Into<String>) -> Self {
        self.gate = gate.into();
        self
    }

    pub fn delay(mut self, minutes: u32) -> Self {
        self.delay_minutes = minutes;
        self
    }

    pub fn cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn build(self) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            time: self.time,
            airline_code: self.airline_code,
            flight_number: self.flight_number,
            airport_code: self.airport_code,
            gate: self.gate,
            delay_minutes: self.delay_minutes,
            cancelled: self.cancelled,
            minutes_until_departure: None,
            remarks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_board_field_names() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 14, 35, 0).unwrap();
        let mut flight = Flight::builder("AC", "0871", "YUL", time)
            .gate("B07")
            .delay(15)
            .build();
        flight.minutes_until_departure = Some(42);
        flight.remarks = Some(Remarks::FinalCall);

        let json = serde_json::to_value(&flight).expect("serialize");
        assert_eq!(json["airline"], "AC");
        assert_eq!(json["flight"], "0871");
        assert_eq!(json["airport"], "YUL");
        assert_eq!(json["gate"], "B07");
        assert_eq!(json["delay"], 15);
        assert_eq!(json["cancelled"], false);
        assert_eq!(json["minutes"], 42);
        assert_eq!(json["remarks"], "finalcall");
        assert_eq!(json["time"], "2024-05-01T14:35:00Z");
    }

    #[test]
    fn unannotated_flight_omits_derived_fields() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let flight = Flight::builder("LH", "0420", "FRA", time).build();

        let json = serde_json::to_value(&flight).expect("serialize");
        assert!(json.get("minutes").is_none());
        assert!(json.get("remarks").is_none());
    }

    #[test]
    fn expected_departure_adds_delay() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 23, 50, 0).unwrap();
        let flight = Flight::builder("AF", "1234", "CDG", time).delay(20).build();
        assert_eq!(
            flight.expected_departure(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 10, 0).unwrap()
        );
        assert!(flight.is_delayed());
    }
}
