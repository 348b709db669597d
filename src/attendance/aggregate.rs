//! Fan valid visits out into the three dashboard tables.

use super::dedup::ValidVisit;
use super::ordering;
use crate::models::{DayPeopleCount, MonthPersonDays, PersonDayCount};
use std::collections::{HashMap, HashSet};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MONTH_FORMAT: &str = "%Y-%m";

/// The three sorted aggregate views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceTables {
    pub person_day: Vec<PersonDayCount>,
    pub day_people: Vec<DayPeopleCount>,
    pub month_person: Vec<MonthPersonDays>,
}

/// Build all three views in one pass over the visits.
///
/// Dates and months are formatted in each instant's own offset.
pub fn aggregate(visits: &[ValidVisit]) -> AttendanceTables {
    // (person, date) -> visits
    let mut person_day: HashMap<(&str, String), usize> = HashMap::new();
    // date -> people
    let mut day_people: HashMap<String, HashSet<&str>> = HashMap::new();
    // (month, person) -> dates
    let mut month_person: HashMap<(String, &str), HashSet<String>> = HashMap::new();

    for visit in visits {
        let person = visit.identity.as_str();
        let date = visit.at.format(DATE_FORMAT).to_string();
        let month = visit.at.format(MONTH_FORMAT).to_string();

        *person_day.entry((person, date.clone())).or_insert(0) += 1;
        day_people.entry(date.clone()).or_default().insert(person);
        month_person.entry((month, person)).or_default().insert(date);
    }

    let mut tables = AttendanceTables {
        person_day: person_day
            .into_iter()
            .map(|((person, date), count)| PersonDayCount {
                person: person.to_string(),
                date,
                count,
            })
            .collect(),
        day_people: day_people
            .into_iter()
            .map(|(date, people)| DayPeopleCount {
                date,
                people: people.len(),
            })
            .collect(),
        month_person: month_person
            .into_iter()
            .map(|((month, person), dates)| MonthPersonDays {
                month,
                person: person.to_string(),
                days: dates.len(),
            })
            .collect(),
    };

    ordering::sort_tables(&mut tables);
    tables
}
