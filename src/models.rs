use serde::{Deserialize, Serialize};

/// Who a habit belongs to. `Both` means each person tracks their own
/// completion independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    Martin,
    Elise,
    Both,
}

/// One of the two concrete people. Used wherever "both" makes no sense:
/// toggling a flag, computing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Individual {
    Martin,
    Elise,
}

impl Person {
    pub fn applies_to(self, who: Individual) -> bool {
        match self {
            Person::Both => true,
            Person::Martin => who == Individual::Martin,
            Person::Elise => who == Individual::Elise,
        }
    }
}

/// Both flags always exist on the record, even when the habit's person
/// tag covers only one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub martin: bool,
    pub elise: bool,
}

impl Completion {
    pub fn get(&self, who: Individual) -> bool {
        match who {
            Individual::Martin => self.martin,
            Individual::Elise => self.elise,
        }
    }

    pub fn toggle(&mut self, who: Individual) {
        match who {
            Individual::Martin => self.martin = !self.martin,
            Individual::Elise => self.elise = !self.elise,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub person: Person,
    pub completed: Completion,
}

/// The ordered habit set in effect for exactly one calendar date. The
/// persisted blob carries its own date-key, so staleness is
/// self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHabits {
    pub date: String,
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
    pub person: Person,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: String,
    pub person: Person,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub person: Individual,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitsResponse {
    pub date: String,
    pub habits: Vec<Habit>,
    pub loading: bool,
    pub online: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersonStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub martin: PersonStats,
    pub elise: PersonStats,
}

fn template_habit(id: &str, name: &str) -> Habit {
    Habit {
        id: id.to_string(),
        name: name.to_string(),
        person: Person::Both,
        completed: Completion::default(),
    }
}

/// The built-in template every fresh day starts from. Customizations do
/// not carry over between dates.
pub fn default_habits() -> Vec<Habit> {
    vec![
        template_habit("1", "Brush teeth (morning)"),
        template_habit("2", "Brush teeth (evening)"),
        template_habit("3", "Drink 8 glasses of water"),
        template_habit("4", "Exercise"),
        template_habit("5", "Read for 20 minutes"),
        template_habit("6", "Make the bed"),
        template_habit("7", "No phone before bed"),
        template_habit("8", "Healthy breakfast"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_tags_cover_the_right_individuals() {
        assert!(Person::Both.applies_to(Individual::Martin));
        assert!(Person::Both.applies_to(Individual::Elise));
        assert!(Person::Martin.applies_to(Individual::Martin));
        assert!(!Person::Martin.applies_to(Individual::Elise));
        assert!(!Person::Elise.applies_to(Individual::Martin));
    }

    #[test]
    fn person_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Person::Both).unwrap(), "\"both\"");
        let person: Person = serde_json::from_str("\"martin\"").unwrap();
        assert_eq!(person, Person::Martin);
    }

    #[test]
    fn default_template_has_all_flags_clear() {
        let habits = default_habits();
        assert_eq!(habits.len(), 8);
        assert!(habits
            .iter()
            .all(|h| !h.completed.martin && !h.completed.elise));
        assert!(habits.iter().all(|h| h.person == Person::Both));
    }
}
