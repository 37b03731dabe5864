//! Static directory of obstetric specialists per health center.

use tracing::debug;

static CENTER_SPECIALISTS: [(&str, [&str; 3]); 7] = [
    (
        "Hospital Nacional Edgardo Rebagliati Martins",
        ["Garay, P.", "Mendoza, L.", "Rojas, J."],
    ),
    ("Clínica Milagros", ["Sánchez, M.", "Vargas, R.", "Castillo, K."]),
    (
        "Policlínico Pablo Bermúdez",
        ["Torres, F.", "Quispe, G.", "Ramírez, A."],
    ),
    (
        "Hospital Nacional Alberto Sabogal Sologuren",
        ["Zegarra, B.", "Huamán, A.", "Pérez, C."],
    ),
    (
        "Instituto Nacional Materno Perinatal (Maternidad de Lima)",
        ["Soto, M.", "Vega, L.", "López, D."],
    ),
    (
        "Hospital María Auxiliadora",
        ["Díaz, F.", "Ruiz, G.", "García, P."],
    ),
    (
        "Hospital San Bartolomé",
        ["Morales, J.", "Blanco, K.", "Flores, N."],
    ),
];

/// Offered when a center has no dedicated list.
pub static DEFAULT_POOL: [&str; 3] = ["Especialista A", "Especialista B", "Especialista C"];

/// Specialists attending at `center`, in display order.
///
/// Lookup is an exact string match. Unknown or empty names get the
/// generic pool, so the result is never empty.
pub fn specialists_for(center: &str) -> &'static [&'static str; 3] {
    match CENTER_SPECIALISTS.iter().find(|(name, _)| *name == center) {
        Some((_, doctors)) => doctors,
        None => {
            debug!("No specialist list for '{}', using default pool", center);
            &DEFAULT_POOL
        }
    }
}

pub fn has_specialist(center: &str, doctor: &str) -> bool {
    specialists_for(center).contains(&doctor)
}

/// Centers with a dedicated specialist list.
pub fn listed_centers() -> impl Iterator<Item = &'static str> {
    CENTER_SPECIALISTS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_center_returns_its_doctors_in_order() {
        assert_eq!(
            specialists_for("Clínica Milagros"),
            &["Sánchez, M.", "Vargas, R.", "Castillo, K."]
        );
        assert_eq!(
            specialists_for("Hospital Nacional Edgardo Rebagliati Martins"),
            &["Garay, P.", "Mendoza, L.", "Rojas, J."]
        );
    }

    #[test]
    fn every_listed_center_has_three_distinct_doctors() {
        assert_eq!(listed_centers().count(), 7);
        for center in listed_centers() {
            let doctors = specialists_for(center);
            assert_ne!(doctors, &DEFAULT_POOL);
            assert!(doctors[0] != doctors[1] && doctors[1] != doctors[2] && doctors[0] != doctors[2]);
        }
    }

    #[test]
    fn unknown_or_empty_center_falls_back() {
        assert_eq!(specialists_for(""), &DEFAULT_POOL);
        assert_eq!(specialists_for("Centro de Salud Surco"), &DEFAULT_POOL);
        // Lookup is exact, not case-insensitive
        assert_eq!(specialists_for("clínica milagros"), &DEFAULT_POOL);
    }

    #[test]
    fn membership_follows_the_center() {
        assert!(has_specialist("Hospital San Bartolomé", "Blanco, K."));
        assert!(!has_specialist("Hospital San Bartolomé", "Mendoza, L."));
        assert!(has_specialist("Unknown clinic", "Especialista B"));
    }
}
