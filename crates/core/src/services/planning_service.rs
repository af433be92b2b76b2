use chrono::NaiveDate;

use crate::models::planning::Appointment;

/// Number of appointments exported to the dashboard.
pub const MAX_PLANNING: usize = 10;

/// Keeps the upcoming part of the appointment book.
pub struct PlanningService;

impl PlanningService {
    pub fn new() -> Self {
        Self
    }

    /// Appointments dated `today` or later, soonest first, at most
    /// [`MAX_PLANNING`].
    pub fn upcoming(&self, mut appointments: Vec<Appointment>, today: NaiveDate) -> Vec<Appointment> {
        appointments.retain(|a| a.date >= today);
        appointments.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.time.cmp(&b.time))
                .then_with(|| a.id.cmp(&b.id))
        });
        appointments.truncate(MAX_PLANNING);
        appointments
    }
}

impl Default for PlanningService {
    fn default() -> Self {
        Self::new()
    }
}
