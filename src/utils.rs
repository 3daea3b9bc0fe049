/// Body-mass index from kilograms and centimeters, rounded to one decimal.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    (raw * 10.0).round() / 10.0
}

/// Estimated calories burned for an exercise's per-minute rate.
pub fn calories_burned(calories_per_minute: f64, minutes: f64) -> f64 {
    calories_per_minute * minutes
}

/// `completed` out of `total` as a rounded percentage; 0 when total is 0.
pub fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_matches_profile_formula() {
        // 70 kg at 175 cm is 22.9 after rounding to one decimal.
        assert_eq!(bmi(70.0, 175.0), 22.9);
        assert_eq!(bmi(90.0, 180.0), 27.8);
    }

    #[test]
    fn percentage_handles_empty_programs() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 20), 25);
        assert_eq!(percentage(20, 20), 100);
    }

    #[test]
    fn calories_scale_with_minutes() {
        assert_eq!(calories_burned(5.0, 30.0), 150.0);
    }

    #[test]
    fn durations_render_compactly() {
        assert_eq!(format_duration(chrono::Duration::minutes(42)), "42m");
        assert_eq!(format_duration(chrono::Duration::minutes(135)), "2h 15m");
    }
}
