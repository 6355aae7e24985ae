#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pennyfox_backup::{
    BackupCoordinator, BackupSession, BackupTransport, BroadcastNotifier, Clock, Connectivity,
    FileStore, TransportError, BACKUP_NAME, DATABASE_NAME,
};
use pennyfox_config::{BackupOptions, BackupSettings};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

pub struct FakeNetwork {
    online: AtomicBool,
}

impl FakeNetwork {
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for FakeNetwork {
    fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub login_error: Mutex<Option<TransportError>>,
    pub logout_error: Mutex<Option<TransportError>>,
    pub list_error: Mutex<Option<TransportError>>,
    pub remote_files: Mutex<HashMap<String, Vec<u8>>>,
    pub upload_script: Mutex<VecDeque<Result<bool, TransportError>>>,
    pub upload_delay: Mutex<Duration>,
    pub uploaded: Mutex<Vec<Vec<u8>>>,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeTransport {
    pub fn with_remote_backup(self, blob: &[u8]) -> Self {
        self.remote_files
            .lock()
            .unwrap()
            .insert(BACKUP_NAME.to_string(), blob.to_vec());
        self
    }

    pub fn script_uploads(&self, results: Vec<Result<bool, TransportError>>) {
        *self.upload_script.lock().unwrap() = results.into();
    }

    pub fn set_upload_delay(&self, delay: Duration) {
        *self.upload_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl BackupTransport for FakeTransport {
    async fn login(&self) -> Result<(), TransportError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match self.login_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn logout(&self) -> Result<(), TransportError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        match self.logout_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn list_file_names(&self) -> Result<Vec<String>, TransportError> {
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut names: Vec<String> = self.remote_files.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn backup_timestamp(&self) -> Result<DateTime<Utc>, TransportError> {
        Ok(Utc.with_ymd_and_hms(2025, 5, 30, 9, 15, 0).unwrap())
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>, TransportError> {
        self.remote_files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| TransportError::Service(format!("{name} missing")))
    }

    async fn upload(&self, snapshot: Vec<u8>) -> Result<bool, TransportError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.upload_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .upload_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(true));
        if matches!(outcome, Ok(true)) {
            self.uploaded.lock().unwrap().push(snapshot);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

#[derive(Default)]
pub struct FakeFiles {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub writes: AtomicUsize,
    pub fail_move: AtomicBool,
}

impl FakeFiles {
    pub fn with_database(self, bytes: &[u8]) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(DATABASE_NAME.to_string(), bytes.to_vec());
        self
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }
}

impl FileStore for FakeFiles {
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn open_read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn move_replacing(&self, source: &str, destination: &str) -> bool {
        if self.fail_move.load(Ordering::SeqCst) {
            return false;
        }
        let mut files = self.files.lock().unwrap();
        match files.remove(source) {
            Some(bytes) => {
                files.insert(destination.to_string(), bytes);
                true
            }
            None => false,
        }
    }
}

pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub files: Arc<FakeFiles>,
    pub network: Arc<FakeNetwork>,
    pub notifier: Arc<BroadcastNotifier>,
    pub coordinator: Arc<BackupCoordinator>,
}

pub fn options() -> BackupOptions {
    BackupOptions {
        lock_timeout_ms: 1_000,
        retry_delay_ms: 50,
        max_retries: 3,
    }
}

pub fn logged_in() -> BackupSettings {
    BackupSettings {
        is_logged_in: true,
        is_autoupload_enabled: true,
        last_update: None,
    }
}

pub fn harness(settings: BackupSettings) -> Harness {
    harness_with(
        FakeTransport::default(),
        FakeFiles::default().with_database(b"local-db"),
        settings,
        options(),
    )
}

pub fn harness_with(
    transport: FakeTransport,
    files: FakeFiles,
    settings: BackupSettings,
    options: BackupOptions,
) -> Harness {
    let transport = Arc::new(transport);
    let files = Arc::new(files);
    let network = Arc::new(FakeNetwork {
        online: AtomicBool::new(true),
    });
    let notifier = Arc::new(BroadcastNotifier::default());
    let coordinator = BackupCoordinator::new(
        transport.clone(),
        files.clone(),
        network.clone(),
        notifier.clone(),
        BackupSession::in_memory(settings),
        options,
    )
    .with_clock(Arc::new(FixedClock));

    Harness {
        transport,
        files,
        network,
        notifier,
        coordinator: Arc::new(coordinator),
    }
}
