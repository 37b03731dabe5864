//! Printable appointment record.
//!
//! The record view and the PDF export both work from an
//! [`AppointmentRecord`]: every field is a ready-to-print string.

use serde::Serialize;

use crate::models::AppointmentDraft;

/// Printed for vital signs that were not taken.
pub const MISSING_VALUE: &str = "--";

pub const NOTES_PLACEHOLDER: &str = "El registro detallado de las observaciones médicas para esta cita \
     estará disponible una vez que el especialista finalice la carga de datos en el sistema central.";

/// Display fields of a finalized appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub health_center: String,
    pub appointment_type: String,
    pub week: String,
    pub doctor: String,
    pub date_time: String,
    pub weight: String,
    pub blood_pressure: String,
    pub fetal_heart_rate: String,
    pub notes: String,
}

fn or_missing(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_VALUE)
        .to_string()
}

impl AppointmentRecord {
    pub fn from_appointment(appointment: &AppointmentDraft) -> Self {
        AppointmentRecord {
            id: or_missing(&appointment.id),
            health_center: or_missing(&appointment.health_center),
            appointment_type: appointment
                .appointment_type
                .map(|t| t.name())
                .unwrap_or(MISSING_VALUE)
                .to_string(),
            week: or_missing(&appointment.week),
            doctor: or_missing(&appointment.selected_doctor),
            date_time: or_missing(&appointment.selected_date_time),
            weight: or_missing(&appointment.weight),
            blood_pressure: or_missing(&appointment.blood_pressure),
            fetal_heart_rate: or_missing(&appointment.fetal_heart_rate),
            notes: appointment
                .notes
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(NOTES_PLACEHOLDER)
                .to_string(),
        }
    }

    /// JSON handed to the document export.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for AppointmentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Registro de Cita")?;
        writeln!(f, "  Centro de salud:  {}", self.health_center)?;
        writeln!(f, "  Tipo de cita:     {}", self.appointment_type)?;
        writeln!(f, "  Semana:           {}", self.week)?;
        writeln!(f, "  Obstetra:         Dr. {}", self.doctor)?;
        writeln!(f, "  Fecha y hora:     {}", self.date_time)?;
        writeln!(f, "  Peso:             {}", self.weight)?;
        writeln!(f, "  Presión:          {}", self.blood_pressure)?;
        writeln!(f, "  FCF (Fetal):      {}", self.fetal_heart_rate)?;
        write!(f, "  Notas:            {}", self.notes)
    }
}

/// Directions text for the map screen, naming the doctor by surname.
pub fn directions_hint(appointment: &AppointmentDraft) -> String {
    let surname = appointment
        .selected_doctor
        .as_deref()
        .and_then(|doctor| doctor.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("especialista");

    format!(
        "Al ingresar, dirígete al pabellón de Obstetricia. El consultorio del Dr. {} está en el segundo nivel.",
        surname
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;

    #[test]
    fn record_from_seed_entry() {
        let history = History::seeded();
        let record = AppointmentRecord::from_appointment(&history.entries()[0]);

        assert_eq!(record.id, "pre-1");
        assert_eq!(record.appointment_type, "REGULAR");
        assert_eq!(record.doctor, "Mendoza, L.");
        assert_eq!(record.blood_pressure, "110/70");
        assert!(record.notes.starts_with("Paciente presenta buen progreso"));
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let record = AppointmentRecord::from_appointment(&AppointmentDraft::default());
        assert_eq!(record.weight, MISSING_VALUE);
        assert_eq!(record.appointment_type, MISSING_VALUE);
        assert_eq!(record.notes, NOTES_PLACEHOLDER);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let history = History::seeded();
        let record = AppointmentRecord::from_appointment(&history.entries()[1]);
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["fetalHeartRate"], "152 lpm");
        assert_eq!(value["appointmentType"], "ULTRASOUND");
    }

    #[test]
    fn display_lists_every_field() {
        let record = AppointmentRecord::from_appointment(&History::seeded().entries()[0]);
        let text = record.to_string();
        assert!(text.contains("Dr. Mendoza, L."));
        assert!(text.contains("62.5 kg"));
    }

    #[test]
    fn directions_use_surname() {
        let history = History::seeded();
        assert!(directions_hint(&history.entries()[0]).contains("Dr. Mendoza está"));
        assert!(directions_hint(&AppointmentDraft::default()).contains("Dr. especialista está"));
    }
}
