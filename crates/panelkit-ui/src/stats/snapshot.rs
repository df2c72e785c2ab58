use std::borrow::Cow;

/// Row keys every snapshot carries, in display order.
pub const FIXED_KEYS: [&str; 3] = ["Health", "Physical Power", "Spell Power"];

const UNKNOWN_NAME: &str = "Unknown Familiar";

/// One sample of familiar stats. Superseded wholesale by the next one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatSnapshot {
    pub name: String,
    pub level: u32,
    pub prestige_level: u32,
    pub max_health: i64,
    pub physical_power: i64,
    pub spell_power: i64,
    pub experience_value: i64,
    /// Whole percent in `[0, 100]`.
    pub experience_percent: u32,
    pub school: String,
    /// Extra stats in the order the source sent them; keys are unique.
    pub dynamic_stats: Vec<(String, String)>,
}

impl StatSnapshot {
    /// Fixed rows first, then the dynamic rows in their given order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        let fixed = [self.max_health, self.physical_power, self.spell_power];
        FIXED_KEYS
            .into_iter()
            .zip(fixed)
            .map(|(key, value)| (key, Cow::Owned(value.to_string())))
            .chain(
                self.dynamic_stats
                    .iter()
                    .map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str()))),
            )
    }

    pub fn name_line(&self) -> String {
        let name = if self.name.is_empty() {
            UNKNOWN_NAME
        } else {
            &self.name
        };
        if self.school.is_empty() {
            name.to_string()
        } else {
            format!("{} - {}", name, self.school)
        }
    }

    pub fn level_line(&self) -> String {
        format!("Level: {}   Prestige: {}", self.level, self.prestige_level)
    }

    pub fn progress_label(&self) -> String {
        format!("XP: {} ({}%)", self.experience_value, self.experience_percent)
    }

    pub fn progress_fraction(&self) -> f32 {
        (self.experience_percent as f32 / 100.0).clamp(0.0, 1.0)
    }
}

/// Remembers the last experience percent so the progress bar only flashes
/// when it actually moves. The baseline starts at 0%.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressTracker {
    last_percent: u32,
}

impl ProgressTracker {
    /// Records `percent` and returns whether it differs from the previous
    /// sample.
    pub fn observe(&mut self, percent: u32) -> bool {
        let flash = self.last_percent != percent;
        self.last_percent = percent;
        flash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wolf() -> StatSnapshot {
        StatSnapshot {
            name: "Dire Wolf".into(),
            level: 42,
            prestige_level: 2,
            max_health: 1800,
            physical_power: 95,
            spell_power: 40,
            experience_value: 12345,
            experience_percent: 67,
            school: "Blood".into(),
            dynamic_stats: vec![("Attack Speed".into(), "12%".into())],
        }
    }

    #[test]
    fn header_text() {
        let s = wolf();
        assert_eq!(s.name_line(), "Dire Wolf - Blood");
        assert_eq!(s.level_line(), "Level: 42   Prestige: 2");
        assert_eq!(s.progress_label(), "XP: 12345 (67%)");
        assert!((s.progress_fraction() - 0.67).abs() < 1e-6);
    }

    #[test]
    fn unnamed_familiar_without_school() {
        let s = StatSnapshot::default();
        assert_eq!(s.name_line(), "Unknown Familiar");
    }

    #[test]
    fn fixed_rows_come_first() {
        let s = wolf();
        let rows: Vec<(&str, String)> = s.rows().map(|(k, v)| (k, v.into_owned())).collect();
        assert_eq!(
            rows,
            vec![
                ("Health", "1800".to_string()),
                ("Physical Power", "95".to_string()),
                ("Spell Power", "40".to_string()),
                ("Attack Speed", "12%".to_string()),
            ]
        );
    }

    #[test]
    fn flash_only_on_change() {
        let mut t = ProgressTracker::default();
        assert!(t.observe(10));
        assert!(!t.observe(10));
        assert!(t.observe(11));
    }

    #[test]
    fn first_sample_flashes_unless_it_is_zero() {
        assert!(ProgressTracker::default().observe(42));
        assert!(!ProgressTracker::default().observe(0));
    }
}
