use crate::connectivity::Connectivity;
use crate::models::{default_habits, Completion, DailyHabits, Habit, Individual, Person, PersonStats};
use crate::remote::RemoteStore;
use crate::storage::{load_day, persist_day};
use crate::summary::person_stats;
use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

pub fn today_key() -> String {
    Local::now().date_naive().to_string()
}

fn fresh_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

struct ManagerState {
    day: DailyHabits,
    loading: bool,
}

/// Owns the in-memory habit set for the current date. Mutations update
/// memory synchronously and enqueue a snapshot for the persistence
/// writer; the in-memory state stays authoritative for the session no
/// matter what the stores do.
pub struct HabitManager {
    state: Mutex<ManagerState>,
    online: Connectivity,
    persist_tx: mpsc::UnboundedSender<DailyHabits>,
}

impl HabitManager {
    /// Spawns the persistence writer, then runs the startup protocol:
    /// remote read-through for today when online, local blob override
    /// when it carries today's date-key, default template otherwise.
    pub async fn start(
        data_path: PathBuf,
        remote: Option<RemoteStore>,
        online: Connectivity,
    ) -> Arc<Self> {
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let manager = Arc::new(Self {
            state: Mutex::new(ManagerState {
                day: DailyHabits {
                    date: today_key(),
                    habits: Vec::new(),
                },
                loading: true,
            }),
            online: online.clone(),
            persist_tx,
        });

        tokio::spawn(persistence_writer(
            persist_rx,
            data_path.clone(),
            remote.clone(),
            online,
        ));

        manager.load(&data_path, remote.as_ref()).await;
        manager
    }

    async fn load(&self, data_path: &Path, remote: Option<&RemoteStore>) {
        let today = today_key();

        let mut candidate = default_habits();
        if self.online.get() {
            if let Some(remote) = remote {
                match remote.select_day(&today).await {
                    Ok(Some(habits)) if !habits.is_empty() => {
                        info!("adopted {} habits from remote store", habits.len());
                        candidate = habits;
                    }
                    Ok(_) => {}
                    Err(err) => warn!("remote read-through failed: {err}"),
                }
            }
        }

        // Local wins over remote when both are for today: the local blob
        // is the cache of what the user already confirmed on this device.
        // A stale or absent blob is discarded in favor of the candidate.
        let habits = match load_day(data_path).await {
            Some(stored) if stored.date == today => stored.habits,
            _ => candidate,
        };

        let day = DailyHabits {
            date: today,
            habits,
        };
        {
            let mut state = self.state.lock().await;
            state.day = day.clone();
            state.loading = false;
        }
        self.enqueue(day);
    }

    fn enqueue(&self, snapshot: DailyHabits) {
        if self.persist_tx.send(snapshot).is_err() {
            error!("persistence writer is gone; dropping snapshot");
        }
    }

    /// Runs one mutation under the lock, resetting to a fresh default
    /// set first if the calendar day has rolled over since the current
    /// set was created.
    async fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut DailyHabits),
    {
        let snapshot = {
            let mut state = self.state.lock().await;
            roll_over_if_new_day(&mut state, &today_key());
            apply(&mut state.day);
            state.day.clone()
        };
        self.enqueue(snapshot);
    }

    /// Reads also roll the day over, so a client that only polls after
    /// midnight sees the fresh template instead of yesterday's set. A
    /// rollover seeds the new day's cache like any other change.
    async fn current_day_at(&self, today: &str) -> DailyHabits {
        let (day, rolled) = {
            let mut state = self.state.lock().await;
            let rolled = roll_over_if_new_day(&mut state, today);
            (state.day.clone(), rolled)
        };
        if rolled {
            self.enqueue(day.clone());
        }
        day
    }

    /// Flips one person's flag on the matching habit. Unknown ids are a
    /// no-op.
    pub async fn toggle_completion(&self, id: &str, who: Individual) {
        self.mutate(|day| {
            if let Some(habit) = day.habits.iter_mut().find(|h| h.id == id) {
                habit.completed.toggle(who);
            }
        })
        .await;
    }

    /// Appends a habit with a fresh id and both flags clear. The name is
    /// trimmed and non-empty by caller convention.
    pub async fn add_habit(&self, name: String, person: Person) {
        self.mutate(|day| {
            day.habits.push(Habit {
                id: fresh_id(),
                name,
                person,
                completed: Completion::default(),
            });
        })
        .await;
    }

    /// Replaces name and person tag in place; completion flags are left
    /// untouched. Unknown ids are a no-op.
    pub async fn update_habit(&self, id: &str, name: String, person: Person) {
        self.mutate(|day| {
            if let Some(habit) = day.habits.iter_mut().find(|h| h.id == id) {
                habit.name = name;
                habit.person = person;
            }
        })
        .await;
    }

    pub async fn delete_habit(&self, id: &str) {
        self.mutate(|day| {
            day.habits.retain(|h| h.id != id);
        })
        .await;
    }

    /// Moves the element at `from` to position `to`. Indices are
    /// validated by the HTTP surface; anything out of range here is
    /// ignored.
    pub async fn reorder_habits(&self, from: usize, to: usize) {
        self.mutate(|day| {
            if from < day.habits.len() && to < day.habits.len() {
                let habit = day.habits.remove(from);
                day.habits.insert(to, habit);
            }
        })
        .await;
    }

    /// Manual reset, distinct from the date-rollover reset: replaces the
    /// whole set with a fresh copy of the template.
    pub async fn reset_daily(&self) {
        self.mutate(|day| {
            day.habits = default_habits();
        })
        .await;
    }

    pub async fn snapshot(&self) -> DailyHabits {
        self.current_day_at(&today_key()).await
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    pub async fn progress(&self, who: Individual) -> PersonStats {
        let day = self.snapshot().await;
        person_stats(&day.habits, who)
    }
}

fn roll_over_if_new_day(state: &mut ManagerState, today: &str) -> bool {
    if state.day.date == today {
        return false;
    }
    info!("new day {today}, resetting to the default template");
    state.day = DailyHabits {
        date: today.to_string(),
        habits: default_habits(),
    };
    true
}

/// Single writer for all persistence: snapshots land in issue order, so
/// a rapid burst of edits cannot interleave into last-write-wins
/// corruption. Local write always; remote mirror when a store is
/// configured, with the outcome feeding the connectivity signal.
async fn persistence_writer(
    mut rx: mpsc::UnboundedReceiver<DailyHabits>,
    data_path: PathBuf,
    remote: Option<RemoteStore>,
    online: Connectivity,
) {
    while let Some(day) = rx.recv().await {
        if let Err(err) = persist_day(&data_path, &day).await {
            error!("failed to persist habits locally: {err}");
        }

        if let Some(remote) = remote.as_ref() {
            match remote.upsert_day(&day).await {
                Ok(()) => online.set(true),
                Err(err) => {
                    warn!("failed to mirror habits to remote store: {err}");
                    online.set(false);
                }
            }
        }
    }
}
