//! Fetch lifecycle shared by every dashboard view.
//!
//! A [`ViewController`] holds the query snapshot the view is currently
//! showing and a monotonically increasing generation. Every
//! [`ViewController::replace`] bumps the generation, aborts the fetch in
//! flight and spawns a new one whose [`FetchOutcome`] is tagged with the
//! new generation. [`ViewController::commit`] only applies outcomes whose
//! generation is still current, so a slow response to an old snapshot can
//! never overwrite a newer one.

use std::sync::Arc;

use accident_map_api::ApiError;
use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};

/// Shown when a fetch task ends without a result.
const FETCH_INTERRUPTED: &str = "Loading was interrupted. Please try again.";

/// Something a view can fetch its data from.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Snapshot the fetch depends on.
    type Query: Send + Sync + 'static;
    /// Decoded response.
    type Data: Send + Sync + 'static;

    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Fetches the data for `query`.
    async fn fetch(&self, query: &Self::Query) -> Result<Self::Data, ApiError>;

    /// Returns `true` if `data` has nothing to show.
    fn is_empty(data: &Self::Data) -> bool;
}

/// What the view should currently render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// No query has been issued.
    Idle,
    /// A fetch for the current query is in flight.
    Loading,
    /// The current query returned data.
    Ready,
    /// The current query matched nothing ("no data for this selection").
    Empty,
    /// The current query failed. Previously loaded data is kept.
    Failed {
        /// User-visible error text.
        message: String,
    },
}

/// Completion of one spawned fetch.
#[derive(Debug)]
pub struct FetchOutcome<D> {
    /// Generation the fetch was issued for.
    pub generation: u64,
    /// Fetch result.
    pub result: Result<D, ApiError>,
}

/// Owns one view's query snapshot and fetch lifecycle.
pub struct ViewController<S: DataSource> {
    source: Arc<S>,
    query: Option<Arc<S::Query>>,
    generation: u64,
    status: ViewStatus,
    data: Option<S::Data>,
    in_flight: Option<JoinHandle<()>>,
    closed: bool,
    tx: mpsc::UnboundedSender<FetchOutcome<S::Data>>,
    rx: mpsc::UnboundedReceiver<FetchOutcome<S::Data>>,
}

impl<S: DataSource> ViewController<S> {
    /// Creates an idle controller over `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::shared(Arc::new(source))
    }

    /// Creates an idle controller over a source shared with other views.
    #[must_use]
    pub fn shared(source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            query: None,
            generation: 0,
            status: ViewStatus::Idle,
            data: None,
            in_flight: None,
            closed: false,
            tx,
            rx,
        }
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The query snapshot currently shown (or being loaded).
    #[must_use]
    pub fn query(&self) -> Option<&S::Query> {
        self.query.as_deref()
    }

    /// Current generation. Increases with every issued fetch.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Most recent successfully loaded data.
    #[must_use]
    pub const fn data(&self) -> Option<&S::Data> {
        self.data.as_ref()
    }

    /// User-visible error text of the last failed fetch, if the view is
    /// currently failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` while a fetch for the current query is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, ViewStatus::Loading)
    }

    /// Returns `true` once [`Self::close`] has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Replaces the query snapshot and starts fetching it.
    ///
    /// Returns the generation of the new fetch, or `None` if the view is
    /// closed.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn replace(&mut self, query: S::Query) -> Option<u64> {
        if self.closed {
            log::debug!("{}: ignoring query on closed view", self.source.name());
            return None;
        }
        self.query = Some(Arc::new(query));
        Some(self.issue())
    }

    /// Re-issues the current query after a failure.
    ///
    /// Returns `None` if there is no query or the view is closed.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn retry(&mut self) -> Option<u64> {
        if self.closed || self.query.is_none() {
            return None;
        }
        log::info!("{}: retrying", self.source.name());
        Some(self.issue())
    }

    fn issue(&mut self) -> u64 {
        self.abort_in_flight();
        self.generation += 1;
        self.status = ViewStatus::Loading;

        let generation = self.generation;
        let Some(query) = self.query.clone() else {
            return generation;
        };
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        log::debug!("{}: fetching generation {generation}", source.name());
        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch(&query).await;
            if tx.send(FetchOutcome { generation, result }).is_err() {
                log::trace!(
                    "{}: view dropped before generation {generation} finished",
                    source.name()
                );
            }
        }));
        generation
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Waits for the next fetch completion, or returns `None` immediately
    /// when nothing is loading or the view is closed.
    ///
    /// If the fetch task dies without reporting (it panicked), the view is
    /// marked failed and `None` is returned.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome<S::Data>> {
        if self.closed || !self.is_loading() {
            return None;
        }
        let handle = self.in_flight.as_mut()?;
        let joined = tokio::select! {
            biased;
            outcome = self.rx.recv() => return outcome,
            joined = handle => joined,
        };
        self.in_flight = None;

        // A task that finished normally has already queued its outcome.
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation == self.generation {
                return Some(outcome);
            }
        }

        let name = self.source.name();
        match joined {
            Err(e) => log::error!("{name}: fetch for generation {} died: {e}", self.generation),
            Ok(()) => log::error!(
                "{name}: fetch for generation {} finished without a result",
                self.generation
            ),
        }
        self.status = ViewStatus::Failed {
            message: FETCH_INTERRUPTED.to_string(),
        };
        None
    }

    /// Applies `outcome` if it belongs to the current generation.
    ///
    /// Returns whether the outcome was committed.
    pub fn commit(&mut self, outcome: FetchOutcome<S::Data>) -> bool {
        let name = self.source.name();
        if self.closed {
            log::debug!("{name}: dropping generation {} on closed view", outcome.generation);
            return false;
        }
        if outcome.generation != self.generation {
            log::warn!(
                "{name}: discarding stale result for generation {} (current {})",
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(data) => {
                self.status = if S::is_empty(&data) {
                    ViewStatus::Empty
                } else {
                    ViewStatus::Ready
                };
                log::debug!(
                    "{name}: committed generation {} ({:?})",
                    outcome.generation,
                    self.status
                );
                self.data = Some(data);
            }
            Err(e) => {
                log::warn!("{name}: fetch failed: {e}");
                self.status = ViewStatus::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    /// Receives and commits outcomes until the current generation has
    /// settled, then returns the resulting status.
    pub async fn settle(&mut self) -> &ViewStatus {
        while let Some(outcome) = self.next_outcome().await {
            self.commit(outcome);
        }
        &self.status
    }

    /// Hides the view: aborts any fetch and forgets the query and data.
    /// The controller can be reused with [`Self::replace`].
    pub fn clear(&mut self) {
        self.abort_in_flight();
        self.generation += 1;
        self.query = None;
        self.data = None;
        self.status = ViewStatus::Idle;
    }

    /// Closes the view: aborts any fetch and refuses later commits.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        log::info!("{}: closing view", self.source.name());
        self.abort_in_flight();
        self.closed = true;
    }
}

impl<S: DataSource> Drop for ViewController<S> {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

impl<S: DataSource> std::fmt::Debug for ViewController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("source", &self.source.name())
            .field("generation", &self.generation)
            .field("status", &self.status)
            .field("has_data", &self.data.is_some())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use accident_map_filter::{FieldUpdate, FilterModel, ViewScope};

    use super::*;

    /// Resolves each query after a delay chosen by its first selected year.
    struct ScriptedSource {
        delays: Vec<(u16, Duration)>,
        failing_year: Option<u16>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(delays: &[(u16, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|&(year, ms)| (year, Duration::from_millis(ms)))
                    .collect(),
                failing_year: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        type Query = FilterModel;
        type Data = Vec<u16>;

        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch(&self, query: &FilterModel) -> Result<Vec<u16>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let year = query.selected_years().iter().next().copied().unwrap_or(0);
            let delay = self
                .delays
                .iter()
                .find(|(y, _)| *y == year)
                .map_or(Duration::from_millis(10), |(_, d)| *d);
            tokio::time::sleep(delay).await;
            if self.failing_year == Some(year) {
                return Err(ApiError::Status {
                    endpoint: "/spatial/map-data".to_string(),
                    status: 500,
                    message: "relation \"accidents\" does not exist".to_string(),
                });
            }
            if year == 0 {
                return Ok(Vec::new());
            }
            Ok(vec![year])
        }

        fn is_empty(data: &Vec<u16>) -> bool {
            data.is_empty()
        }
    }

    fn year(y: u16) -> FilterModel {
        FilterModel::with_year(ViewScope::National, y).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_fetch_never_overwrites_newer() {
        let mut view = ViewController::new(ScriptedSource::new(&[(2016, 200), (2020, 100)]));

        let first = view.replace(year(2016)).unwrap();
        let second = view.replace(year(2020)).unwrap();
        assert!(second > first);

        assert_eq!(view.settle().await, &ViewStatus::Ready);
        assert_eq!(view.data(), Some(&vec![2020]));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(view.rx.try_recv().is_err());
        assert_eq!(view.data(), Some(&vec![2020]));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_outcome_is_rejected() {
        let mut view = ViewController::new(ScriptedSource::new(&[]));
        let first = view.replace(year(2016)).unwrap();
        view.replace(year(2020)).unwrap();

        let committed = view.commit(FetchOutcome {
            generation: first,
            result: Ok(vec![2016]),
        });
        assert!(!committed);
        assert!(view.data().is_none());
        assert!(view.is_loading());

        view.settle().await;
        assert_eq!(view.data(), Some(&vec![2020]));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_data_and_retry_recovers() {
        let mut source = ScriptedSource::new(&[]);
        source.failing_year = Some(2017);
        let mut view = ViewController::new(source);

        view.replace(year(2016)).unwrap();
        view.settle().await;
        assert_eq!(view.data(), Some(&vec![2016]));

        view.replace(year(2017)).unwrap();
        view.settle().await;
        assert_eq!(view.error(), Some("relation \"accidents\" does not exist"));
        assert_eq!(view.data(), Some(&vec![2016]));

        view.retry().unwrap();
        assert!(view.is_loading());
        view.settle().await;
        assert!(view.error().is_some());
        assert_eq!(view.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_reported() {
        let mut view = ViewController::new(ScriptedSource::new(&[]));
        view.replace(FilterModel::unconstrained(ViewScope::National))
            .unwrap();
        assert_eq!(view.settle().await, &ViewStatus::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_view_ignores_fetches() {
        let mut view = ViewController::new(ScriptedSource::new(&[(2018, 50)]));
        let generation = view.replace(year(2018)).unwrap();
        view.close();

        assert!(view.replace(year(2019)).is_none());
        assert!(view.retry().is_none());
        assert!(!view.commit(FetchOutcome {
            generation,
            result: Ok(vec![2018]),
        }));
        assert!(view.data().is_none());
        assert!(view.next_outcome().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_hides_data_and_allows_reuse() {
        let mut view = ViewController::new(ScriptedSource::new(&[]));
        view.replace(year(2021)).unwrap();
        view.settle().await;
        view.clear();
        assert_eq!(view.status(), &ViewStatus::Idle);
        assert!(view.data().is_none());
        assert!(view.next_outcome().await.is_none());

        let next = year(2021)
            .set_field(FieldUpdate::Years([2022].into_iter().collect()))
            .unwrap();
        view.replace(next).unwrap();
        view.settle().await;
        assert_eq!(view.data(), Some(&vec![2022]));
    }

    /// Panics on queries of 10 or more.
    struct PanickingSource;

    #[async_trait]
    impl DataSource for PanickingSource {
        type Query = u8;
        type Data = Vec<u16>;

        fn name(&self) -> &str {
            "panicking"
        }

        async fn fetch(&self, query: &u8) -> Result<Vec<u16>, ApiError> {
            assert!(*query < 10, "query {query} out of range");
            Ok(vec![u16::from(*query)])
        }

        fn is_empty(data: &Vec<u16>) -> bool {
            data.is_empty()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_fetch_fails_instead_of_hanging() {
        let mut view = ViewController::new(PanickingSource);
        view.replace(1).unwrap();
        view.settle().await;
        assert_eq!(view.data(), Some(&vec![1]));

        view.replace(42).unwrap();
        assert_eq!(
            view.settle().await,
            &ViewStatus::Failed {
                message: FETCH_INTERRUPTED.to_string()
            }
        );
        assert_eq!(view.data(), Some(&vec![1]));
        assert!(view.next_outcome().await.is_none());

        view.replace(2).unwrap();
        view.settle().await;
        assert_eq!(view.data(), Some(&vec![2]));
    }

    #[test]
    fn retry_without_query_does_nothing() {
        let mut view = ViewController::new(ScriptedSource::new(&[]));
        assert!(view.retry().is_none());
        assert_eq!(view.status(), &ViewStatus::Idle);
    }
}
