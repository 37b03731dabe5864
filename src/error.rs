/// Error types for the booking flow.
use thiserror::Error;

/// Reasons a tentative date is refused by the schedule form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRejection {
    #[error("No atendemos los fines de semana (sábados o domingos).")]
    Weekend,
    #[error("La fecha seleccionada es un día feriado.")]
    Holiday,
    #[error("Fecha no válida '{0}': use el formato AAAA-MM-DD")]
    InvalidFormat(String),
}

/// Stage of the booking flow a draft is trying to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Availability,
    Review,
}

impl std::fmt::Display for BookingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStage::Availability => write!(f, "disponibilidad"),
            BookingStage::Review => write!(f, "confirmación"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Primero seleccione un centro de salud")]
    CenterRequired,
    #[error("Primero seleccione un especialista")]
    DoctorRequired,
    #[error("Primero seleccione una fecha válida")]
    DateRequired,
    #[error("'{doctor}' no atiende en '{center}'")]
    UnknownSpecialist { center: String, doctor: String },
    #[error("Horario no disponible: '{0}'")]
    UnknownTimeSlot(String),
    #[error("Faltan datos obligatorios para la etapa de {0}")]
    IncompleteDraft(BookingStage),
    #[error("Tipo de cita no válido: '{0}'. Use regular, high_risk o ultrasound")]
    InvalidAppointmentType(String),
    #[error("El día {day} no existe en {month:02}/{year}")]
    InvalidDay { day: u32, month: u32, year: i32 },
    #[error("Mes no válido: {0}")]
    InvalidMonth(u32),
    #[error("La fecha de la cita no es un día de atención: {0}")]
    UnavailableDate(DateRejection),
}
