use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use popcorn_sources::{MovieSource, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

pub type SearchReply = Result<Vec<SearchResultItem>, SourceError>;
pub type DetailReply = Result<MovieDetail, SourceError>;

/// In-memory `MovieSource` whose calls can be held open until the test
/// releases them, so completion order is under test control.
pub struct ScriptedSource {
    calls: Mutex<Vec<String>>,
    search_gates: Mutex<HashMap<String, oneshot::Receiver<SearchReply>>>,
    detail_gates: Mutex<HashMap<String, oneshot::Receiver<DetailReply>>>,
    details: Mutex<HashMap<String, MovieDetail>>,
    started_tx: mpsc::UnboundedSender<String>,
    started_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        Self {
            calls: Mutex::new(Vec::new()),
            search_gates: Mutex::new(HashMap::new()),
            detail_gates: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            started_tx,
            started_rx: tokio::sync::Mutex::new(started_rx),
        }
    }

    /// Hold the search for `query` until the returned sender fires.
    pub fn gate_search(&self, query: &str) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn gate_detail(&self, id: &str) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    pub fn add_detail(&self, detail: MovieDetail) {
        self.details.lock().unwrap().insert(detail.id.clone(), detail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until a call (e.g. `"search:inception"`) has reached the source.
    pub async fn wait_started(&self) -> String {
        self.started_rx.lock().await.recv().await.unwrap()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call.clone());
        let _ = self.started_tx.send(call);
    }
}

pub fn results_for(query: &str) -> Vec<SearchResultItem> {
    (1..=2)
        .map(|n| SearchResultItem {
            id: format!("tt-{}-{}", query, n),
            title: format!("{} {}", query, n),
            year: "2010".to_string(),
            poster_url: "N/A".to_string(),
        })
        .collect()
}

pub fn detail(id: &str, title: &str, runtime: &str, imdb_rating: &str) -> MovieDetail {
    MovieDetail {
        id: id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        runtime: runtime.to_string(),
        imdb_rating: imdb_rating.to_string(),
        ..MovieDetail::default()
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SourceError> {
        self.record(format!("search:{}", query));
        let gate = self.search_gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(SourceError::Status(499))),
            None => Ok(results_for(query)),
        }
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, SourceError> {
        self.record(format!("detail:{}", id));
        let gate = self.detail_gates.lock().unwrap().remove(id);
        if let Some(rx) = gate {
            return rx.await.unwrap_or_else(|_| Err(SourceError::Status(499)));
        }
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound("Incorrect IMDb ID.".to_string()))
    }
}
