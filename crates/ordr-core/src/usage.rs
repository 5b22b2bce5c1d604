//! Monthly OCR call counter persisted to a JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::models::config::UsageConfig;

/// Usage snapshot for the current month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    pub year_month: String,
    pub call_count: u32,
    pub free_limit: u32,
    pub free_remaining: u32,
    pub estimated_cost: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UsageFile {
    year_month: String,
    call_count: u32,
    last_updated: String,
}

#[derive(Debug)]
struct UsageState {
    year_month: String,
    call_count: u32,
}

/// State shared with background writers.
struct UsageStore {
    path: PathBuf,
    state: Mutex<UsageState>,
    // Serializes file writes so a later snapshot is never overwritten.
    write: Mutex<()>,
}

impl UsageStore {
    fn lock(&self) -> MutexGuard<'_, UsageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write the latest count, whichever call triggered it.
    fn save(&self) -> u32 {
        let _write = self.write.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let data = {
            let state = self.lock();
            UsageFile {
                year_month: state.year_month.clone(),
                call_count: state.call_count,
                last_updated: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            }
        };
        if let Err(e) = write_file(&self.path, &data) {
            warn!("Failed to save OCR usage to {}: {}", self.path.display(), e);
        }
        data.call_count
    }
}

/// Process-wide OCR call counter.
///
/// The count resets when the calendar month changes. Changes are written to
/// the file off the async workers when a tokio runtime is running, inline
/// otherwise; `flush` always writes before returning. Write failures are
/// logged and otherwise ignored.
pub struct UsageTracker {
    free_limit: u32,
    cost_per_call: f64,
    store: Arc<UsageStore>,
}

impl UsageTracker {
    /// Load the counter, keeping the saved count only if it is for this month.
    pub fn load(config: &UsageConfig) -> Self {
        let month = current_month();
        let call_count = match read_file(&config.file) {
            Some(saved) if saved.year_month == month => {
                info!("Loaded OCR usage: {} calls ({})", saved.call_count, saved.year_month);
                saved.call_count
            }
            Some(saved) => {
                info!("Usage file is from {}, starting a new month", saved.year_month);
                0
            }
            None => 0,
        };

        Self {
            free_limit: config.free_limit,
            cost_per_call: config.cost_per_call,
            store: Arc::new(UsageStore {
                path: config.file.clone(),
                state: Mutex::new(UsageState {
                    year_month: month,
                    call_count,
                }),
                write: Mutex::new(()),
            }),
        }
    }

    /// Count one successful provider call and persist it.
    pub fn increment(&self) -> u32 {
        self.increment_in(&current_month())
    }

    /// Current month's usage.
    pub fn usage(&self) -> UsageInfo {
        self.usage_in(&current_month())
    }

    /// Persist the current count before returning.
    pub fn flush(&self) {
        let count = self.store.save();
        info!("OCR usage saved: {} calls", count);
    }

    fn increment_in(&self, month: &str) -> u32 {
        let count = {
            let mut state = self.store.lock();
            roll_over(&mut state, month);
            state.call_count += 1;
            info!("OCR call count: {} ({})", state.call_count, state.year_month);
            state.call_count
        };
        self.persist();
        count
    }

    fn usage_in(&self, month: &str) -> UsageInfo {
        let (info, rolled) = {
            let mut state = self.store.lock();
            let rolled = roll_over(&mut state, month);

            let count = state.call_count;
            let estimated_cost = if count <= self.free_limit {
                0.0
            } else {
                f64::from(count - self.free_limit) * self.cost_per_call
            };

            let info = UsageInfo {
                year_month: state.year_month.clone(),
                call_count: count,
                free_limit: self.free_limit,
                free_remaining: self.free_limit.saturating_sub(count),
                estimated_cost,
            };
            (info, rolled)
        };
        if rolled {
            self.persist();
        }
        info
    }

    fn persist(&self) {
        match Handle::try_current() {
            Ok(handle) => {
                let store = Arc::clone(&self.store);
                handle.spawn_blocking(move || {
                    store.save();
                });
            }
            Err(_) => {
                self.store.save();
            }
        }
    }
}

/// Reset the counter when `month` differs from the stored one.
fn roll_over(state: &mut UsageState, month: &str) -> bool {
    if state.year_month == month {
        return false;
    }
    info!("Month changed {} -> {}, resetting OCR usage", state.year_month, month);
    state.year_month = month.to_string();
    state.call_count = 0;
    true
}

fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

fn read_file(path: &Path) -> Option<UsageFile> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("Unreadable usage file {}, starting from 0: {}", path.display(), e);
            None
        }
    }
}

fn write_file(path: &Path, data: &UsageFile) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(data)?;
    // Readers only ever see a complete file.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}
