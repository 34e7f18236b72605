//! Shared test support: a scripted in-memory service boundary, receipt
//! factories, and state-waiting helpers.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use receipt_core::api::ReceiptService;
use receipt_core::config::StoreConfig;
use receipt_core::error::{StoreError, StoreResult};
use receipt_core::models::query::{ReceiptFilters, SortSpec};
use receipt_core::models::receipt::{
    ExtractedField, Receipt, ReceiptPage, ReceiptPatch, StatusResponse, SubmitResponse,
    UploadPayload,
};
use receipt_core::models::statistics::ReceiptStatistics;
use receipt_core::models::status::{JobPhase, ReceiptStatus};
use receipt_core::store::state::StoreState;
use receipt_core::store::ReceiptStore;

type ScriptedStatus = Result<(ReceiptStatus, Option<String>), String>;

/// Scripted boundary double. Each field programs one operation; counters
/// record traffic so tests can assert which calls happened (and which were
/// guarded away).
pub struct MockReceiptService {
    pub submit_result: Mutex<Result<String, String>>,
    /// Consumed one entry per status check
    pub status_script: Mutex<VecDeque<ScriptedStatus>>,
    /// Served once the script is exhausted
    pub fallback_status: Mutex<Option<ReceiptStatus>>,
    pub records: Mutex<HashMap<String, Receipt>>,
    pub retry_result: Mutex<Result<(), String>>,
    pub delete_result: Mutex<Result<(), String>>,
    pub list_error: Mutex<Option<String>>,
    pub list_script: Mutex<VecDeque<ReceiptPage>>,
    pub search_script: Mutex<VecDeque<ReceiptPage>>,
    pub statistics: Mutex<ReceiptStatistics>,
    /// When set, `list` blocks until notified (for in-flight guard tests)
    pub list_gate: Mutex<Option<Arc<Notify>>>,
    /// When set, `delete_one` blocks until notified
    pub delete_gate: Mutex<Option<Arc<Notify>>>,
    pub status_calls: AtomicU32,
    pub list_calls: AtomicU32,
    pub search_calls: AtomicU32,
    pub delete_calls: AtomicU32,
    pub statistics_calls: AtomicU32,
    pub last_list_query: Mutex<Option<(ReceiptFilters, SortSpec, u32, u32)>>,
    pub last_search_query: Mutex<Option<(String, u32, u32)>>,
}

impl MockReceiptService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            submit_result: Mutex::new(Ok("rcpt-1".to_string())),
            status_script: Mutex::new(VecDeque::new()),
            fallback_status: Mutex::new(None),
            records: Mutex::new(HashMap::new()),
            retry_result: Mutex::new(Ok(())),
            delete_result: Mutex::new(Ok(())),
            list_error: Mutex::new(None),
            list_script: Mutex::new(VecDeque::new()),
            search_script: Mutex::new(VecDeque::new()),
            statistics: Mutex::new(statistics_snapshot(0)),
            list_gate: Mutex::new(None),
            delete_gate: Mutex::new(None),
            status_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
            search_calls: AtomicU32::new(0),
            delete_calls: AtomicU32::new(0),
            statistics_calls: AtomicU32::new(0),
            last_list_query: Mutex::new(None),
            last_search_query: Mutex::new(None),
        })
    }

    pub fn script_statuses(&self, statuses: impl IntoIterator<Item = ReceiptStatus>) {
        let mut script = self.status_script.lock();
        for status in statuses {
            script.push_back(Ok((status, None)));
        }
    }

    pub fn script_status_failure(&self, status: ReceiptStatus, message: &str) {
        self.status_script
            .lock()
            .push_back(Ok((status, Some(message.to_string()))));
    }

    pub fn script_status_error(&self, message: &str) {
        self.status_script.lock().push_back(Err(message.to_string()));
    }

    /// Report `processing` forever once the script runs dry
    pub fn keep_processing(&self) {
        *self.fallback_status.lock() = Some(ReceiptStatus::Processing);
    }

    pub fn insert_record(&self, receipt: Receipt) {
        self.records
            .lock()
            .insert(receipt.receipt_id.clone(), receipt);
    }

    pub fn push_list_page(&self, page: ReceiptPage) {
        self.list_script.lock().push_back(page);
    }

    pub fn push_search_page(&self, page: ReceiptPage) {
        self.search_script.lock().push_back(page);
    }
}

fn apply_patch(receipt: &mut Receipt, patch: &ReceiptPatch) {
    if let Some(ref vendor) = patch.vendor {
        receipt.vendor = Some(ExtractedField::new(vendor.clone()));
    }
    if let Some(purchased_on) = patch.purchased_on {
        receipt.purchased_on = Some(ExtractedField::new(purchased_on));
    }
    if let Some(total_amount) = patch.total_amount {
        receipt.total_amount = Some(ExtractedField::new(total_amount));
    }
    if let Some(ref category) = patch.category {
        receipt.category = Some(ExtractedField::new(category.clone()));
    }
}

#[async_trait]
impl ReceiptService for MockReceiptService {
    async fn submit(&self, _payload: UploadPayload) -> StoreResult<SubmitResponse> {
        match self.submit_result.lock().clone() {
            Ok(receipt_id) => Ok(SubmitResponse { receipt_id }),
            Err(reason) => Err(StoreError::UploadRejected(reason)),
        }
    }

    async fn get_status(&self, receipt_id: &str) -> StoreResult<StatusResponse> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.status_script.lock().pop_front();
        match next {
            Some(Ok((status, message))) => Ok(StatusResponse {
                receipt_id: receipt_id.to_string(),
                status,
                message,
            }),
            Some(Err(reason)) => Err(StoreError::FetchFailed(reason)),
            None => match *self.fallback_status.lock() {
                Some(status) => Ok(StatusResponse {
                    receipt_id: receipt_id.to_string(),
                    status,
                    message: None,
                }),
                None => Err(StoreError::FetchFailed(
                    "status script exhausted".to_string(),
                )),
            },
        }
    }

    async fn get_one(&self, receipt_id: &str) -> StoreResult<Receipt> {
        self.records
            .lock()
            .get(receipt_id)
            .cloned()
            .ok_or_else(|| StoreError::FetchFailed(format!("no receipt {receipt_id}")))
    }

    async fn retry(&self, _receipt_id: &str) -> StoreResult<()> {
        self.retry_result
            .lock()
            .clone()
            .map_err(|reason| StoreError::mutation_failed("retry", reason))
    }

    async fn update_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        let mut records = self.records.lock();
        let mut receipt = records.get(receipt_id).cloned().ok_or_else(|| {
            StoreError::mutation_failed("update", format!("no receipt {receipt_id}"))
        })?;
        apply_patch(&mut receipt, patch);
        receipt.updated_at = Utc::now();
        records.insert(receipt_id.to_string(), receipt.clone());
        Ok(receipt)
    }

    async fn approve_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        let mut records = self.records.lock();
        let mut receipt = records.get(receipt_id).cloned().ok_or_else(|| {
            StoreError::mutation_failed("approve", format!("no receipt {receipt_id}"))
        })?;
        apply_patch(&mut receipt, patch);
        receipt.status = ReceiptStatus::Approved;
        receipt.updated_at = Utc::now();
        records.insert(receipt_id.to_string(), receipt.clone());
        Ok(receipt)
    }

    async fn delete_one(&self, _receipt_id: &str) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.delete_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.delete_result
            .lock()
            .clone()
            .map_err(|reason| StoreError::mutation_failed("delete", reason))
    }

    async fn list(
        &self,
        filters: &ReceiptFilters,
        sort: &SortSpec,
        page: u32,
        per_page: u32,
    ) -> StoreResult<ReceiptPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_list_query.lock() = Some((filters.clone(), *sort, page, per_page));
        let gate = self.list_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(reason) = self.list_error.lock().clone() {
            return Err(StoreError::FetchFailed(reason));
        }
        Ok(self.list_script.lock().pop_front().unwrap_or(ReceiptPage {
            receipts: Vec::new(),
            total: 0,
            has_more: false,
        }))
    }

    async fn search(&self, query: &str, page: u32, per_page: u32) -> StoreResult<ReceiptPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search_query.lock() = Some((query.to_string(), page, per_page));
        Ok(self.search_script.lock().pop_front().unwrap_or(ReceiptPage {
            receipts: Vec::new(),
            total: 0,
            has_more: false,
        }))
    }

    async fn get_statistics(&self) -> StoreResult<ReceiptStatistics> {
        self.statistics_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.statistics.lock().clone())
    }
}

/// A review-ready receipt with confidence-scored fields
pub fn receipt(id: &str) -> Receipt {
    let now = Utc::now();
    Receipt {
        receipt_id: id.to_string(),
        status: ReceiptStatus::Review,
        vendor: Some(ExtractedField::with_confidence(
            "Blue Bottle Coffee".to_string(),
            0.93,
        )),
        purchased_on: Some(ExtractedField::with_confidence(
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            0.88,
        )),
        total_amount: Some(ExtractedField::with_confidence(Decimal::new(1850, 2), 0.97)),
        category: Some(ExtractedField::new("meals".to_string())),
        image_url: format!("https://cdn.example.com/receipts/{id}.jpg"),
        created_at: now,
        updated_at: now,
    }
}

/// `count` receipts identified `prefix-1` through `prefix-count`
pub fn receipts(prefix: &str, count: usize) -> Vec<Receipt> {
    (1..=count)
        .map(|i| receipt(&format!("{prefix}-{i}")))
        .collect()
}

pub fn page_of(receipts: Vec<Receipt>, total: u64, has_more: bool) -> ReceiptPage {
    ReceiptPage {
        receipts,
        total,
        has_more,
    }
}

pub fn statistics_snapshot(receipt_count: u64) -> ReceiptStatistics {
    ReceiptStatistics {
        receipt_count,
        total_amount: Decimal::ZERO,
        average_amount: Decimal::ZERO,
        by_category: Vec::new(),
        by_month: Vec::new(),
        generated_at: Utc::now(),
    }
}

pub fn payload() -> UploadPayload {
    UploadPayload::new("receipt.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Server-style opaque identifier
pub fn fresh_id() -> String {
    format!("rcpt-{}", uuid::Uuid::new_v4())
}

pub fn store_with(service: &Arc<MockReceiptService>) -> ReceiptStore {
    ReceiptStore::new(service.clone(), StoreConfig::default())
}

/// Wait until the published state satisfies the predicate
pub async fn wait_for(store: &ReceiptStore, predicate: impl Fn(&StoreState) -> bool) {
    let mut rx = store.subscribe();
    tokio::time::timeout(Duration::from_secs(300), async {
        loop {
            if predicate(&store.snapshot()) {
                return;
            }
            rx.changed().await.expect("store state channel closed");
        }
    })
    .await
    .expect("condition not reached before timeout");
}

pub async fn wait_for_phase(store: &ReceiptStore, phase: JobPhase) {
    wait_for(store, |s| s.job.phase == phase).await;
}
