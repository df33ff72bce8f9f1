use serde::{Deserialize, Serialize};

/// One derived value at a bar's time coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudyPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Line,
}

/// A named series produced by one study computation (e.g. `bb.upper`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyOutput {
    pub id: String,
    pub kind: OutputKind,
    pub points: Vec<StudyPoint>,
}

impl StudyOutput {
    pub fn line(id: impl Into<String>, points: Vec<StudyPoint>) -> Self {
        Self {
            id: id.into(),
            kind: OutputKind::Line,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&StudyPoint> {
        self.points.last()
    }
}
