use corelib::Bar;
use engine::StudyError;
use engine::study::{StudyInstance, StudyRegistry};
use serde_json::Value;
use tracing::debug;

use crate::console::ConsoleChart;

/// Keeps one study attached to a chart in step with the replay window.
///
/// Every refresh detaches the previous instance before attaching a new one,
/// so the chart never holds outputs computed over a stale window.
pub struct StudyHost {
    registry: StudyRegistry<ConsoleChart>,
    study_id: String,
    params: Option<Value>,
    current: Option<Box<dyn StudyInstance>>,
}

impl StudyHost {
    pub fn new(
        registry: StudyRegistry<ConsoleChart>,
        study_id: impl Into<String>,
        params: Option<Value>,
    ) -> Self {
        Self {
            registry,
            study_id: study_id.into(),
            params,
            current: None,
        }
    }

    /// Recomputes the study over `bars`.
    ///
    /// On error the previous instance is already gone and nothing is attached.
    pub fn refresh(&mut self, chart: &mut ConsoleChart, bars: &[Bar]) -> Result<(), StudyError> {
        self.detach();

        let instance = self
            .registry
            .attach(chart, bars, &self.study_id, self.params.as_ref())?;
        debug!(study_id = %self.study_id, bars = bars.len(), "study re-attached");

        self.current = Some(instance);
        Ok(())
    }

    pub fn detach(&mut self) {
        if let Some(instance) = self.current.take() {
            instance.remove();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.current.is_some()
    }
}

impl Drop for StudyHost {
    fn drop(&mut self) {
        self.detach();
    }
}
