//! Total ordering for emitted tables.
//!
//! Grouping uses hash maps, so every table is sorted here before it leaves
//! the engine. Dates and months are zero-padded, so lexicographic order is
//! chronological order.

use super::aggregate::AttendanceTables;
use crate::models::{DayPeopleCount, MonthPersonDays, PersonDayCount};

pub fn sort_person_day(rows: &mut [PersonDayCount]) {
    rows.sort_by(|a, b| a.person.cmp(&b.person).then_with(|| a.date.cmp(&b.date)));
}

pub fn sort_day_people(rows: &mut [DayPeopleCount]) {
    rows.sort_by(|a, b| a.date.cmp(&b.date));
}

pub fn sort_month_person(rows: &mut [MonthPersonDays]) {
    rows.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.person.cmp(&b.person)));
}

pub fn sort_tables(tables: &mut AttendanceTables) {
    sort_person_day(&mut tables.person_day);
    sort_day_people(&mut tables.day_people);
    sort_month_person(&mut tables.month_person);
}
