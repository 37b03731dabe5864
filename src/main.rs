//! Command-line interface for the prenatal appointment booking flow.
//!
//! This module provides an interactive CLI that walks a patient through
//! the schedule form, slot selection and review, and browses the
//! appointment history as a calendar.

use std::io::{self, Write};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidamaterna::availability::{
    doctor_options, format_date, select_doctor, select_time, selected_time, TIME_SLOTS,
};
use vidamaterna::calendar::{past, upcoming, CalendarView, WEEKDAY_HEADERS};
use vidamaterna::config::AppConfig;
use vidamaterna::models::{gestational_weeks, search_health_centers};
use vidamaterna::report::{directions_hint, AppointmentRecord};
use vidamaterna::{
    AppointmentScheduler, AppointmentType, ConflictResolution, History, ReviewState,
};

struct BookingCLI {
    config: AppConfig,
    scheduler: AppointmentScheduler,
    logged_in: bool,
    running: bool,
}

impl BookingCLI {
    fn new(config: AppConfig) -> Self {
        let history = if config.seed_history {
            History::seeded()
        } else {
            History::new()
        };
        let scheduler = AppointmentScheduler::new(history, config.id_generator());

        BookingCLI {
            config,
            scheduler,
            logged_in: false,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       VIDAMATERNA - CITAS PRENATALES");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Menú principal ---");
        println!("1. Nueva cita");
        println!("2. Registro de cita (tipo, semana, centro, fecha)");
        println!("3. Disponibilidad (especialista y horario)");
        println!("4. Verificar y confirmar");
        println!("5. Mis citas (calendario)");
        println!("6. Ver registro de una cita");
        println!("7. Ejecutar demo");
        println!("8. Salir");
        println!("{}", "-".repeat(20));
    }

    /// Read a trimmed line. Returns `None` once stdin is closed.
    fn read_line(&self) -> Option<String> {
        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }

    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        let _ = io::stdout().flush();

        let input = match self.read_line() {
            Some(input) => input,
            None => {
                self.running = false;
                String::new()
            }
        };

        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            if !self.running {
                return default.unwrap_or(0);
            }
            println!("Ingrese un número válido");
        }
    }

    /// Pick one of `options` by number; 0 or an invalid number picks nothing.
    fn choose<'a>(&mut self, title: &str, options: &[&'a str]) -> Option<&'a str> {
        println!("\n{}:", title);
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        let choice = self.get_int_input("Seleccione (0 para omitir)", Some(0));
        if choice <= 0 {
            return None;
        }
        options.get(choice as usize - 1).copied()
    }

    fn login(&mut self) {
        println!("\n--- Iniciar sesión ---");
        let _user = self.get_input("DNI o correo", Some("paciente"));
        let _password = self.get_input("Contraseña", Some("****"));
        self.logged_in = true;
        info!("Patient session started");
        println!("\nBienvenida a VidaMaterna");
    }

    fn new_appointment(&mut self) {
        self.scheduler.new_appointment();
        println!("\nNueva cita iniciada");
    }

    fn schedule_form(&mut self) {
        println!("\n--- Registro de Cita ---");

        let weeks = gestational_weeks();
        let week_refs: Vec<&str> = weeks.iter().map(String::as_str).collect();
        if let Some(week) = self.choose("Semana de gestación", &week_refs) {
            self.scheduler.draft_mut().set_week(week);
        }

        let type_labels: Vec<String> = AppointmentType::ALL
            .iter()
            .map(|t| format!("{} ({})", t.title(), t.description()))
            .collect();
        let type_refs: Vec<&str> = type_labels.iter().map(String::as_str).collect();
        if let Some(label) = self.choose("Tipo de cita", &type_refs) {
            if let Some(index) = type_refs.iter().position(|l| *l == label) {
                self.scheduler.draft_mut().set_type(AppointmentType::ALL[index]);
            }
        }

        let current_center = self.scheduler.draft().health_center.clone();
        let query = self.get_input("Centro de salud (buscar)", current_center.as_deref());
        let suggestions = search_health_centers(&query);
        let center = if suggestions.is_empty() {
            query
        } else {
            self.choose("Sugerencias", &suggestions)
                .map(str::to_string)
                .unwrap_or(query)
        };
        self.scheduler.draft_mut().set_health_center(&center);

        let date = self.get_input("Fecha tentativa (AAAA-MM-DD)", None);
        if let Err(rejection) = self.scheduler.draft_mut().apply_date(&date) {
            println!("\n{}", rejection);
        }

        match self.scheduler.proceed_to_availability() {
            Ok(()) => println!("\nListo para buscar horarios disponibles"),
            Err(e) => println!("\nAún no puede continuar: {}", e),
        }
    }

    fn availability(&mut self) {
        if let Err(e) = self.scheduler.proceed_to_availability() {
            println!("\nComplete el registro primero: {}", e);
            return;
        }

        println!("\n--- Disponibilidad ---");
        let draft = self.scheduler.draft();
        println!(
            "Establecimiento: {}",
            draft.health_center.as_deref().unwrap_or("No seleccionado")
        );
        println!("Fecha: {}", format_date(draft.tentative_date));

        let doctors = doctor_options(draft);
        if let Some(doctor) = self.choose("Especialista", &doctors) {
            if let Err(e) = select_doctor(self.scheduler.draft_mut(), doctor) {
                println!("\n{}", e);
            }
        }

        if self.scheduler.draft().selected_doctor.is_some() {
            if let Some(time) = self.choose("Horario", &TIME_SLOTS) {
                if let Err(e) = select_time(self.scheduler.draft_mut(), time) {
                    println!("\n{}", e);
                }
            }
        }

        println!(
            "\nEspecialista: {}  Hora: {}",
            self.scheduler
                .draft()
                .selected_doctor
                .as_deref()
                .unwrap_or("Elegir especialista"),
            selected_time(self.scheduler.draft()).unwrap_or("Elegir hora")
        );
    }

    fn review_and_confirm(&mut self) {
        if let Err(e) = self.scheduler.proceed_to_review() {
            println!("\nSeleccione especialista y horario primero: {}", e);
            return;
        }

        println!("\n--- Confirmación de Cita ---");
        let draft = self.scheduler.draft();
        println!("  Fecha y Hora:      {}", draft.selected_date_time.as_deref().unwrap_or(""));
        println!("  Centro de salud:   {}", draft.health_center.as_deref().unwrap_or(""));
        println!(
            "  Tipo de cita:      {}",
            draft
                .appointment_type
                .map(|t| t.review_label())
                .unwrap_or("Control prenatal")
        );
        println!("  Obstetra a cargo:  {}", draft.selected_doctor.as_deref().unwrap_or(""));

        let answer = self.get_input("¿Confirmar cita? (s/n)", Some("s"));
        if !answer.eq_ignore_ascii_case("s") {
            return;
        }

        match self.scheduler.confirm() {
            Ok(ReviewState::Confirmed { id }) => {
                println!("\n¡Todo listo! Tu cita ha sido programada ({})", id);
                println!("{}", directions_hint(self.scheduler.draft()));
            }
            Ok(ReviewState::Conflicted { date_time, .. }) => {
                println!("\n--- Conflicto de Cita ---");
                println!("Ya tienes programada una cita prenatal para: {}", date_time);
                println!("1. Cambiar horario");
                println!("2. Cancelar y volver al inicio");
                let choice = self.get_int_input("Seleccione", Some(1));
                let resolution = if choice == 2 {
                    ConflictResolution::Abandon
                } else {
                    ConflictResolution::ChangeTime
                };
                self.scheduler.resolve_conflict(resolution);
            }
            Ok(ReviewState::Reviewing) => {}
            Err(e) => println!("\nNo se pudo confirmar: {}", e),
        }
    }

    fn print_month(&self, view: &CalendarView) {
        let history = self.scheduler.history();
        let markers = view.markers(history);

        println!("\n{}", view.title());
        println!(" {}", WEEKDAY_HEADERS.map(|h| format!("{:>3}", h)).join(" "));

        let cells: Vec<String> = view
            .grid()
            .iter()
            .map(|cell| match cell {
                None => "   ".to_string(),
                Some(day) if *day == view.selected_day() => format!("[{:>2}", day),
                Some(day) if markers.contains_key(day) => format!("{:>2}*", day),
                Some(day) => format!("{:>3}", day),
            })
            .collect();
        for week in cells.chunks(7) {
            println!(" {}", week.join(" "));
        }

        println!("\n{}", view.day_heading());
        let entries = view.selected_entries(history);
        if entries.is_empty() {
            println!("  Sin citas para este día");
        }
        for entry in entries {
            println!(
                "  [{}] {} - {} ({})",
                entry.id.as_deref().unwrap_or("-"),
                entry.appointment_type.map(|t| t.chip_label()).unwrap_or("-"),
                entry.selected_date_time.as_deref().unwrap_or(""),
                entry.health_center.as_deref().unwrap_or("")
            );
        }

        let others = view.other_entries(history);
        if !others.is_empty() {
            println!("\nHistorial reciente:");
            for entry in others {
                println!(
                    "  [{}] {}",
                    entry.id.as_deref().unwrap_or("-"),
                    entry.selected_date_time.as_deref().unwrap_or("")
                );
            }
        }
    }

    fn calendar(&mut self) {
        let today = self.config.today();
        let mut view = CalendarView::new(today);

        let history = self.scheduler.history();
        println!(
            "\nPróximas citas: {}  Citas pasadas: {}",
            upcoming(history, today).len(),
            past(history, today).len()
        );

        loop {
            self.print_month(&view);
            println!("\n(a) mes anterior  (s) mes siguiente  (número) elegir día  (q) volver");
            let input = self.get_input("Opción", Some("q"));
            match input.as_str() {
                "a" => view.previous_month(),
                "s" => view.next_month(),
                "q" => break,
                other => match other.parse::<u32>() {
                    Ok(day) => {
                        if let Err(e) = view.select_day(day) {
                            println!("\n{}", e);
                        }
                    }
                    Err(_) => println!("Opción no válida"),
                },
            }
            if !self.running {
                break;
            }
        }
    }

    fn view_record(&mut self) {
        let id = self.get_input("Id de la cita", Some("pre-1"));
        match self.scheduler.history().get(&id) {
            Some(appointment) => {
                let record = AppointmentRecord::from_appointment(appointment);
                println!("\n{}", record);
                match record.to_json() {
                    Ok(json) => println!("\nExportación:\n{}", json),
                    Err(e) => println!("\nNo se pudo exportar: {}", e),
                }
            }
            None => println!("\nNo se encontró la cita {}", id),
        }
    }

    fn run_demo(&mut self) {
        println!("\n--- Ejecutando demo ---");

        self.scheduler.new_appointment();
        {
            let draft = self.scheduler.draft_mut();
            draft.set_week("12 semanas");
            draft.set_type(AppointmentType::Regular);
            draft.set_health_center("Clínica Milagros");
        }

        for date in ["2024-12-08", "2024-12-14", "2024-12-11"] {
            match self.scheduler.draft_mut().apply_date(date) {
                Ok(()) => println!("  {} aceptada", date),
                Err(rejection) => println!("  {} rechazada: {}", date, rejection),
            }
        }

        let Some(doctor) = doctor_options(self.scheduler.draft()).first().copied() else {
            return;
        };
        let steps = select_doctor(self.scheduler.draft_mut(), doctor)
            .and_then(|()| select_time(self.scheduler.draft_mut(), TIME_SLOTS[0]));
        if let Err(e) = steps {
            println!("  Error en la selección: {}", e);
            return;
        }

        for attempt in 1..=2 {
            match self.scheduler.confirm() {
                Ok(state) => println!("  Intento {}: {:?}", attempt, state),
                Err(e) => println!("  Intento {}: {}", attempt, e),
            }
        }

        println!(
            "\nHistorial: {} citas. El segundo intento repite el mismo horario y entra en conflicto.",
            self.scheduler.history().len()
        );
    }

    fn run(&mut self) {
        self.print_header();

        while self.running && !self.logged_in {
            self.login();
        }

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Opción", Some(8));

            match choice {
                1 => self.new_appointment(),
                2 => self.schedule_form(),
                3 => self.availability(),
                4 => self.review_and_confirm(),
                5 => self.calendar(),
                6 => self.view_record(),
                7 => self.run_demo(),
                8 => {
                    self.running = false;
                    println!("\n¡Hasta pronto!");
                }
                _ => println!("Opción no válida"),
            }
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AppConfig::from_env();
    info!("Starting VidaMaterna booking CLI with {:?}", config);

    let mut cli = BookingCLI::new(config);
    cli.run();
}
