use std::fmt;

/// Handle to whatever a study's render hook allocated on its target.
///
/// `remove` consumes the handle, so it can run at most once. The registry keeps
/// no reference to instances; the caller of `attach` owns them.
pub trait StudyInstance: Send {
    fn id(&self) -> &str;

    fn remove(self: Box<Self>);
}

impl fmt::Debug for dyn StudyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyInstance").field("id", &self.id()).finish()
    }
}

type Release<S> = Box<dyn FnOnce(Vec<S>) + Send + 'static>;

/// Instance backed by one line series handle per output.
pub struct LineStudyInstance<S> {
    id: String,
    series: Vec<S>,
    release: Release<S>,
}

impl<S: Send + 'static> LineStudyInstance<S> {
    pub fn new<F>(id: impl Into<String>, series: Vec<S>, release: F) -> Self
    where
        F: FnOnce(Vec<S>) + Send + 'static,
    {
        Self {
            id: id.into(),
            series,
            release: Box::new(release),
        }
    }

    pub fn series(&self) -> &[S] {
        &self.series
    }
}

impl<S: Send + 'static> StudyInstance for LineStudyInstance<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn remove(self: Box<Self>) {
        let Self {
            id,
            series,
            release,
        } = *self;

        tracing::debug!(study_id = %id, series = series.len(), "removing study instance");
        release(series);
    }
}
