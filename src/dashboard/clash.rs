use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::SessionRecord;

/// Which fields two sessions must share to count as a clash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashKey {
    /// Same date and time range.
    #[default]
    DateAndTime,
    /// Same date, time range and mentor.
    DateTimeAndMentor,
}

/// Sessions sharing one clash key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashGroup<'a> {
    pub date: Option<NaiveDate>,
    pub session_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<String>,
    pub records: Vec<&'a SessionRecord>,
}

type GroupKey = (Option<NaiveDate>, String, Option<String>);

fn group_key(record: &SessionRecord, key: ClashKey) -> GroupKey {
    let mentor = match key {
        ClashKey::DateAndTime => None,
        ClashKey::DateTimeAndMentor => Some(record.mentor.clone()),
    };
    (record.date, record.session_time.clone(), mentor)
}

/// Groups of two or more records sharing `key`, ordered by the position of
/// their first member. Records keep their input order within a group.
pub fn find_clashes<'a, I>(records: I, key: ClashKey) -> Vec<ClashGroup<'a>>
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ClashGroup<'a>> = Vec::new();

    for record in records {
        let group = group_key(record, key);
        match index.get(&group) {
            Some(&position) => groups[position].records.push(record),
            None => {
                index.insert(group.clone(), groups.len());
                let (date, session_time, mentor) = group;
                groups.push(ClashGroup {
                    date,
                    session_time,
                    mentor,
                    records: vec![record],
                });
            }
        }
    }

    groups.retain(|group| group.records.len() > 1);
    groups
}
