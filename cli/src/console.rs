use std::collections::BTreeMap;
use std::sync::Arc;

use corelib::{StudyOutput, StudyPoint};
use engine::study::{LineStudyInstance, StudyInstance};
use parking_lot::Mutex;
use tracing::info;

/// Handle to one line series on a [`ConsoleChart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(u64);

#[derive(Debug)]
struct LineSeries {
    name: String,
    points: Vec<StudyPoint>,
}

#[derive(Debug, Default)]
struct Lines {
    next_id: u64,
    series: BTreeMap<SeriesId, LineSeries>,
}

/// Text-mode render target. Studies add named line series to it; removing a
/// study instance takes its series off again.
///
/// Clones share the same series table.
#[derive(Debug, Clone, Default)]
pub struct ConsoleChart {
    lines: Arc<Mutex<Lines>>,
}

impl ConsoleChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&self, name: impl Into<String>, points: Vec<StudyPoint>) -> SeriesId {
        let mut lines = self.lines.lock();
        let id = SeriesId(lines.next_id);
        lines.next_id += 1;
        lines.series.insert(
            id,
            LineSeries {
                name: name.into(),
                points,
            },
        );
        id
    }

    /// False if the series was already gone.
    pub fn remove_line(&self, id: SeriesId) -> bool {
        self.lines.lock().series.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().series.is_empty()
    }

    /// Last point of the first series named `name`.
    pub fn latest(&self, name: &str) -> Option<StudyPoint> {
        self.lines
            .lock()
            .series
            .values()
            .find(|s| s.name == name)
            .and_then(|s| s.points.last().copied())
    }

    /// Logs the last value of every series for the frame at `cursor`.
    pub fn report(&self, cursor: usize, len: usize) {
        let lines = self.lines.lock();
        let latest: Vec<String> = lines
            .series
            .values()
            .filter_map(|s| s.points.last().map(|p| format!("{}={:.2}", s.name, p.value)))
            .collect();

        if latest.is_empty() {
            info!(cursor, len, "warming up");
        } else {
            info!(cursor, len, values = %latest.join(" "), "frame");
        }
    }
}

/// Render hook drawing every study output as one line series.
///
/// The returned instance owns the series handles and removes them on `remove()`.
pub fn line_renderer(
    study_id: &'static str,
) -> impl Fn(&mut ConsoleChart, Vec<StudyOutput>) -> Box<dyn StudyInstance> + Send + Sync + 'static {
    move |chart: &mut ConsoleChart, outputs: Vec<StudyOutput>| -> Box<dyn StudyInstance> {
        let handles: Vec<SeriesId> = outputs
            .into_iter()
            .map(|o| chart.add_line(o.id, o.points))
            .collect();

        let owner = chart.clone();
        Box::new(LineStudyInstance::new(study_id, handles, move |handles| {
            for id in handles {
                owner.remove_line(id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: i64, value: f64) -> StudyPoint {
        StudyPoint { time, value }
    }

    #[test]
    fn remove_only_drops_own_series() {
        let chart = ConsoleChart::new();
        let a = chart.add_line("a", vec![point(1, 1.0)]);
        let b = chart.add_line("b", vec![point(1, 2.0)]);

        assert!(chart.remove_line(a));
        assert!(!chart.remove_line(a));
        assert_eq!(chart.len(), 1);
        assert_eq!(chart.latest("b"), Some(point(1, 2.0)));
        assert!(chart.remove_line(b));
        assert!(chart.is_empty());
    }

    #[test]
    fn renderer_instance_cleans_up_its_lines() {
        let mut chart = ConsoleChart::new();
        let render = line_renderer("bollinger");

        let inst = render(
            &mut chart,
            vec![
                StudyOutput::line("bb.upper", vec![point(60, 3.0)]),
                StudyOutput::line("bb.middle", vec![point(60, 2.0)]),
                StudyOutput::line("bb.lower", vec![]),
            ],
        );

        assert_eq!(inst.id(), "bollinger");
        assert_eq!(chart.len(), 3);
        assert_eq!(chart.latest("bb.middle"), Some(point(60, 2.0)));
        assert_eq!(chart.latest("bb.lower"), None);

        inst.remove();
        assert!(chart.is_empty());
    }
}
