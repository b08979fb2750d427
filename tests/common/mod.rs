// Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ableton_presence::monitor::{ProcessProbe, TitleProbe};
use ableton_presence::presence::{Activity, PresenceTransport, TransportError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
}

pub fn broken_pipe() -> TransportError {
    TransportError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
}

pub fn rejected() -> TransportError {
    TransportError::Rejected {
        code: 4000,
        message: "invalid payload".to_string(),
    }
}

/// Scripted transport; unscripted calls succeed
#[derive(Default)]
pub struct FakeTransport {
    pub login_results: VecDeque<Result<(), TransportError>>,
    pub activity_results: VecDeque<Result<(), TransportError>>,
    pub logins: usize,
    pub logouts: usize,
    pub app_ids: Vec<String>,
    pub activities: Vec<Activity>,
}

impl FakeTransport {
    pub fn fail_next_login(&mut self, error: TransportError) {
        self.login_results.push_back(Err(error));
    }

    pub fn fail_next_activity(&mut self, error: TransportError) {
        self.activity_results.push_back(Err(error));
    }
}

#[async_trait]
impl PresenceTransport for FakeTransport {
    async fn login(&mut self, app_id: &str) -> Result<(), TransportError> {
        self.logins += 1;
        self.app_ids.push(app_id.to_string());
        self.login_results.pop_front().unwrap_or(Ok(()))
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<(), TransportError> {
        let result = self.activity_results.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.activities.push(activity.clone());
        }
        result
    }

    async fn logout(&mut self) {
        self.logouts += 1;
    }
}

/// Process probe toggled from the test
#[derive(Clone, Default)]
pub struct FakeProcess {
    running: Arc<AtomicBool>,
}

impl FakeProcess {
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProcessProbe for FakeProcess {
    async fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Title probe returning whatever the test last set
#[derive(Clone, Default)]
pub struct FakeTitle {
    title: Arc<Mutex<Option<String>>>,
}

impl FakeTitle {
    pub fn set(&self, title: Option<&str>) {
        *self.title.lock().unwrap() = title.map(str::to_string);
    }
}

#[async_trait]
impl TitleProbe for FakeTitle {
    async fn current_title(&self) -> Option<String> {
        self.title.lock().unwrap().clone()
    }
}

/// Process probe that never answers
pub struct HangingProcess;

#[async_trait]
impl ProcessProbe for HangingProcess {
    async fn is_running(&self) -> bool {
        std::future::pending::<bool>().await
    }
}
