use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

/// Local-zone renderings of one source instant. Converting the zone
/// changes the wall-clock strings only, never the instant itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTime {
    /// Machine-sortable `YYYY-MM-DD HH:MM` in the target zone.
    pub machine: String,
    /// Long form shown to readers, e.g. `28 de agosto de 2026, 14:05`.
    pub display: String,
}

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Convert a UTC instant to the target zone. Pure; every record in a run
/// must be rendered with the same zone.
pub fn normalize(instant: DateTime<Utc>, tz: Tz) -> LocalTime {
    let local = instant.with_timezone(&tz);
    let month = MONTHS[local.month0() as usize];
    LocalTime {
        machine: local.format("%Y-%m-%d %H:%M").to_string(),
        display: format!(
            "{} de {} de {}, {:02}:{:02}",
            local.day(),
            month,
            local.year(),
            local.hour(),
            local.minute()
        ),
    }
}

/// UTC rendering kept alongside the local one in persisted records.
pub fn utc_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}
