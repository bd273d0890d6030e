use egui::Color32;

use crate::models::appointment::{Appointment, AppointmentStatus};

/// Fill for appointments without a usable color.
pub const DEFAULT_APPOINTMENT_COLOR: Color32 = Color32::from_rgb(59, 130, 246);

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

pub fn appointment_color(appointment: &Appointment) -> Color32 {
    appointment
        .color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or(DEFAULT_APPOINTMENT_COLOR)
}

/// Small status dot shown next to the label.
pub fn status_color(status: AppointmentStatus) -> Color32 {
    match status {
        AppointmentStatus::Scheduled => Color32::from_rgb(148, 163, 184),
        AppointmentStatus::InProgress => Color32::from_rgb(234, 179, 8),
        AppointmentStatus::Completed => Color32::from_rgb(34, 197, 94),
        AppointmentStatus::Cancelled | AppointmentStatus::NoShow => Color32::from_rgb(239, 68, 68),
        AppointmentStatus::Rescheduled => Color32::from_rgb(168, 85, 247),
        AppointmentStatus::Waitlist => Color32::from_rgb(249, 115, 22),
    }
}

pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[derive(Clone, Copy)]
pub(crate) struct DayGridPalette {
    pub background: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub label_text: Color32,
    pub now_line: Color32,
    pub create_highlight: Color32,
    pub drop_highlight: Color32,
    pub band_bg: Color32,
    pub header_border: Color32,
    pub badge_bg: Color32,
}

impl DayGridPalette {
    pub fn from_ui(ui: &egui::Ui) -> Self {
        let visuals = ui.visuals();
        let is_dark = visuals.dark_mode;
        let accent = visuals.selection.bg_fill;

        Self {
            background: visuals.extreme_bg_color,
            hour_line: visuals.widgets.noninteractive.bg_stroke.color,
            slot_line: with_alpha(
                visuals.widgets.noninteractive.bg_stroke.color,
                if is_dark { 60 } else { 90 },
            ),
            label_text: visuals.weak_text_color(),
            now_line: Color32::from_rgb(239, 68, 68),
            create_highlight: with_alpha(accent, 70),
            drop_highlight: with_alpha(accent, 40),
            band_bg: visuals.faint_bg_color,
            header_border: visuals.widgets.noninteractive.bg_stroke.color,
            badge_bg: accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#FF8800", Some(Color32::from_rgb(255, 136, 0)) ; "with hash")]
    #[test_case("3b82f6", Some(Color32::from_rgb(59, 130, 246)) ; "without hash")]
    #[test_case("#fff", None ; "short form")]
    #[test_case("#gg0000", None ; "not hex")]
    #[test_case("", None ; "empty")]
    #[test_case("#ééé", None ; "non ascii")]
    fn test_parse_color(input: &str, expected: Option<Color32>) {
        assert_eq!(parse_color(input), expected);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let start = chrono::Local::now();
        let mut appointment =
            Appointment::new("a", start, start + chrono::Duration::minutes(30)).unwrap();
        assert_eq!(appointment_color(&appointment), DEFAULT_APPOINTMENT_COLOR);

        appointment.color = Some("red".to_string());
        assert_eq!(appointment_color(&appointment), DEFAULT_APPOINTMENT_COLOR);

        appointment.color = Some("#102030".to_string());
        assert_eq!(appointment_color(&appointment), Color32::from_rgb(16, 32, 48));
    }
}
