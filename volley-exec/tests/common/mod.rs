#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use volley_core::{FetchError, FetchId, Item};
use volley_exec::orchestrator::{Event, EventSink};
use volley_exec::Fetcher;

#[derive(Debug, Clone)]
enum ScriptStep {
    Ok(Item),
    OkAfter(Duration, Item),
    Fail(FetchError),
}

/// In-memory fetcher replaying a per-identifier script.
///
/// Each fetch pops the next step for that identifier; the last step repeats
/// once the script is exhausted, so single-step scripts behave like a
/// deterministic remote.
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<FetchId, VecDeque<ScriptStep>>>,
    collection: Vec<Item>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            collection: Vec::new(),
        }
    }

    fn push(self, id: impl Into<FetchId>, step: ScriptStep) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(id.into())
            .or_default()
            .push_back(step);
        self
    }

    pub fn ok(self, id: impl Into<FetchId>, item: Item) -> Self {
        self.push(id, ScriptStep::Ok(item))
    }

    pub fn ok_after(self, id: impl Into<FetchId>, delay: Duration, item: Item) -> Self {
        self.push(id, ScriptStep::OkAfter(delay, item))
    }

    pub fn fail(self, id: impl Into<FetchId>, error: FetchError) -> Self {
        self.push(id, ScriptStep::Fail(error))
    }

    pub fn fail_times(mut self, id: impl Into<FetchId>, times: usize, error: FetchError) -> Self {
        let id = id.into();
        for _ in 0..times {
            self = self.push(id.clone(), ScriptStep::Fail(error.clone()));
        }
        self
    }

    pub fn collection(mut self, items: Vec<Item>) -> Self {
        self.collection = items;
        self
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, id: &FetchId) -> Result<Item, FetchError> {
        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .get_mut(id)
                .ok_or_else(|| FetchError::Permanent(format!("no script for {id}")))?;
            match queue.len() {
                0 => return Err(FetchError::Permanent(format!("empty script for {id}"))),
                1 => queue.front().cloned().unwrap(),
                _ => queue.pop_front().unwrap(),
            }
        };
        match step {
            ScriptStep::Ok(item) => Ok(item),
            ScriptStep::OkAfter(delay, item) => {
                tokio::time::sleep(delay).await;
                Ok(item)
            }
            ScriptStep::Fail(error) => Err(error),
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        Ok(self.collection.clone())
    }
}

/// Event sink that appends everything it sees.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn item(id: i64) -> Item {
    Item::new(id, format!("title{id}"), format!("body{id}"), id)
}

pub fn fallback() -> Item {
    Item::new(22, "fallback22", "body22", 22)
}

pub fn transient(msg: &str) -> FetchError {
    FetchError::Transient(msg.to_string())
}

pub fn permanent(msg: &str) -> FetchError {
    FetchError::Permanent(msg.to_string())
}

pub fn ids(keys: &[i64]) -> Vec<FetchId> {
    keys.iter().map(|k| FetchId::from(*k)).collect()
}
