use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use shlink_core::{Effect, Msg, VisitCategory};
use shlink_logging::shlink_info;
use tokio_util::sync::CancellationToken;

use crate::loader::{load_visits, CancelSignal, LoadRequest, LoaderSettings};
use crate::store::{Store, StoreCancelSignal, StoreSink};
use crate::{LoadOutcome, VisitsApi};

enum EngineCommand {
    Load { request: LoadRequest, generation: u64 },
    Cancel(VisitCategory),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    LoadCompleted {
        category: VisitCategory,
        outcome: LoadOutcome,
    },
}

/// Runs effects returned by `update` on a background tokio runtime.
pub struct EngineHandle {
    store: Store,
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

struct RunningLoad {
    /// Cancelled when a newer load of the same category starts.
    superseded: CancellationToken,
    /// Child of `superseded`, cancelled on user request.
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn VisitsApi>, settings: LoaderSettings, store: Store) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let task_store = store.clone();

        thread::spawn(move || {
            let mut running: HashMap<VisitCategory, RunningLoad> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Load {
                        request,
                        generation,
                    } => {
                        let category = request.category;
                        if let Some(previous) = running.remove(&category) {
                            previous.superseded.cancel();
                        }
                        let superseded = CancellationToken::new();
                        let cancel = superseded.child_token();
                        running.insert(
                            category,
                            RunningLoad {
                                superseded,
                                cancel: cancel.clone(),
                            },
                        );

                        let api = api.clone();
                        let store = task_store.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let sink = StoreSink::new(store.clone(), category, generation);
                            let signal = LoadCancelSignal {
                                token: cancel,
                                store: StoreCancelSignal::new(store, category),
                            };
                            let outcome =
                                load_visits(api.as_ref(), &settings, &request, &sink, &signal)
                                    .await;
                            let _ = event_tx.send(EngineEvent::LoadCompleted { category, outcome });
                        });
                    }
                    EngineCommand::Cancel(category) => {
                        if let Some(load) = running.get(&category) {
                            load.cancel.cancel();
                        }
                    }
                }
            }
        });

        Ok(Self {
            store,
            cmd_tx,
            event_rx,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Applies `msg` to the store and runs the resulting effects.
    pub fn dispatch(&self, msg: Msg) {
        let effects = self.store.dispatch(msg);
        self.run(effects);
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadVisits {
                    category,
                    query,
                    orphan_type,
                    generation,
                } => {
                    shlink_info!(
                        "LoadVisits #{} category={} start={:?} end={:?} type={:?}",
                        generation,
                        category,
                        query.start_date,
                        query.end_date,
                        orphan_type
                    );
                    let _ = self.cmd_tx.send(EngineCommand::Load {
                        request: LoadRequest {
                            category,
                            query,
                            orphan_type,
                        },
                        generation,
                    });
                }
                Effect::CancelLoad { category } => {
                    shlink_info!("CancelLoad category={}", category);
                    let _ = self.cmd_tx.send(EngineCommand::Cancel(category));
                }
            }
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct LoadCancelSignal {
    token: CancellationToken,
    store: StoreCancelSignal,
}

impl CancelSignal for LoadCancelSignal {
    fn cancel_requested(&self) -> bool {
        self.token.is_cancelled() || self.store.cancel_requested()
    }
}
