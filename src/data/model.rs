use std::fmt;
use std::ops::RangeInclusive;

use super::error::{Result, RosterError};

/// Valid class numbers.
pub const CLASS_RANGE: RangeInclusive<i64> = 1..=5;

/// Valid scores.
pub const SCORE_RANGE: RangeInclusive<i64> = 0..=100;

/// Scores at or above this mark pass.
pub const PASS_THRESHOLD: u8 = 60;

/// Header labels of the exported table, in column order.
pub const COLUMN_HEADERS: [&str; 4] = ["姓名", "班级", "分数", "状态"];

// ---------------------------------------------------------------------------
// ClassId / Score – range-checked scalars
// ---------------------------------------------------------------------------

/// Class number in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u8);

impl ClassId {
    pub fn new(raw: i64) -> Result<Self> {
        if CLASS_RANGE.contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(RosterError::ClassOutOfRange(raw))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub fn new(raw: i64) -> Result<Self> {
        if SCORE_RANGE.contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(RosterError::ScoreOutOfRange(raw))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn status(self) -> Status {
        if self.0 >= PASS_THRESHOLD {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Pass => "✅ 及格",
            Status::Fail => "❌ 不及格",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub class_id: ClassId,
    pub score: Score,
}

impl StudentRecord {
    /// Validate raw form input into a record. Surrounding whitespace is
    /// dropped from the name before the emptiness check.
    pub fn new(name: &str, class_id: i64, score: i64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            class_id: ClassId::new(class_id)?,
            score: Score::new(score)?,
        })
    }

    /// Pass/fail, always derived from the current score.
    pub fn status(&self) -> Status {
        self.score.status()
    }
}

// ---------------------------------------------------------------------------
// Roster – the session's table of students
// ---------------------------------------------------------------------------

const SEED: [(&str, i64, i64); 10] = [
    ("丁一", 1, 87),
    ("刘二", 2, 68),
    ("张三", 3, 72),
    ("李四", 3, 55),
    ("王五", 3, 93),
    ("赵六", 2, 81),
    ("孙七", 1, 75),
    ("周八", 1, 88),
    ("吴九", 2, 64),
    ("郑十", 2, 49),
];

/// Ordered collection of records. Insertion order is preserved and
/// duplicate names are allowed.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<StudentRecord>,
}

impl Roster {
    /// The fixed starting roster of a new session.
    pub fn seeded() -> Self {
        let records = SEED
            .iter()
            .map(|&(name, class_id, score)| StudentRecord {
                name: name.to_string(),
                class_id: ClassId(class_id as u8),
                score: Score(score as u8),
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&StudentRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate and append a new student.
    pub fn add(&mut self, name: &str, class_id: i64, score: i64) -> Result<&StudentRecord> {
        let record = StudentRecord::new(name, class_id, score)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Remove every record whose name is in `names`, regardless of any
    /// active view. Returns how many records were removed.
    pub fn delete<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !names.iter().any(|n| n.as_ref() == r.name));
        before - self.records.len()
    }
}
