use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

use omp_qstatus::db::{CatalogMsb, DailyWindow};
use omp_qstatus::models::Msb;

/// JCMT catalog entry observable during UT hours `[start, end)`.
pub fn catalog_msb(projectid: &str, checksum: &str, priority: f64, hours: (u32, u32)) -> CatalogMsb {
    CatalogMsb {
        msb: Msb {
            checksum: checksum.to_string(),
            projectid: projectid.to_string(),
            priority,
            instrument: "HARP".to_string(),
            msbid: None,
            title: format!("{} {}", projectid, checksum),
            remaining: 1,
            time_estimate: 1800.0,
        },
        telescope: "JCMT".to_string(),
        country: Some("UK".to_string()),
        semester: Some("24A".to_string()),
        tau_min: None,
        tau_max: None,
        windows: Vec::new(),
        daily: Some(DailyWindow {
            start_hour: hours.0,
            end_hour: hours.1,
        }),
    }
}

/// Small catalog covering three projects over one JCMT night.
pub const SAMPLE_CATALOG: &str = r#"{
  "msbs": [
    {"checksum": "0a1", "projectid": "M24AU01", "priority": 10.0, "instrument": "HARP",
     "telescope": "JCMT", "country": "UK", "semester": "24A", "tau_max": 0.12,
     "daily": {"start_hour": 5, "end_hour": 9}},
    {"checksum": "0b2", "projectid": "M24AU01", "priority": 12.0, "instrument": "SCUBA-2/POL-2",
     "telescope": "JCMT", "country": "UK", "semester": "24A",
     "daily": {"start_hour": 8, "end_hour": 12}},
    {"checksum": "0c3", "projectid": "M24AN02", "priority": 5.0, "instrument": "SCUBA-2",
     "telescope": "JCMT", "country": "CN", "semester": "24A",
     "daily": {"start_hour": 3, "end_hour": 17}},
    {"checksum": "0d4", "projectid": "M24AC03", "priority": 20.0, "instrument": "HARP",
     "telescope": "JCMT", "country": "CA", "semester": "24A", "tau_min": 0.2,
     "daily": {"start_hour": 10, "end_hour": 14}},
    {"checksum": "0e5", "projectid": "U/24A/1", "priority": 1.0, "instrument": "WFCAM",
     "telescope": "UKIRT", "country": "UK", "semester": "24A"}
  ],
  "affiliations": {
    "M24AU01": {"uk": 1.0},
    "M24AN02": {"cn": 0.7, "uk": 0.3},
    "M24AC03": {"ca": 1.0}
  },
  "projects": [
    {"projectid": "M24AU01", "primary_queue": "UK", "tag_adjustments": {"UK": -6.0}},
    {"projectid": "M24AN02", "primary_queue": "CN", "tag_adjustments": {"CN": 0.0}}
  ]
}"#;
