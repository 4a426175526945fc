//! PostgREST-style remote store (Supabase `movimientos` table).
//!
//! Rows use the legacy Spanish column names and are scoped by `family_id`.

use anyhow::{Context, anyhow, bail};
use cuentas_core::{CoreError, HouseholdId, Result, StoredRecord, Transaction, TransactionStore};
use cuentas_finance::{CategoryRules, canonicalize_stored};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info, warn};

use crate::config::RemoteSection;

/// Rows per POST.
const BATCH_SIZE: usize = 100;

pub struct RemoteStore {
    endpoint: String,
    api_key: String,
    rules: CategoryRules,
    client: reqwest::Client,
}

/// Wire shape of one row.
#[derive(Debug, Serialize, PartialEq)]
struct RemoteRow<'a> {
    fecha: String,
    tipo: &'static str,
    valor: f64,
    categoria: &'a str,
    detalle: &'a str,
    banco: &'a str,
    producto: &'a str,
    numero_producto: &'a str,
    miembro: &'a str,
    family_id: &'a str,
}

impl<'a> From<&'a Transaction> for RemoteRow<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            fecha: t.date.format("%Y-%m-%d").to_string(),
            tipo: t.kind.as_str(),
            valor: t.amount,
            categoria: &t.category,
            detalle: &t.detail,
            banco: &t.bank,
            producto: &t.product,
            numero_producto: &t.product_number,
            miembro: &t.owner,
            family_id: t.household.as_str(),
        }
    }
}

/// Run a future to completion from sync code, inside or outside a runtime.
fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        Ok(tokio::task::block_in_place(|| handle.block_on(fut)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        Ok(rt.block_on(fut))
    }
}

fn store_err(e: anyhow::Error) -> CoreError {
    CoreError::Store(format!("{e:#}"))
}

impl RemoteStore {
    pub fn from_config(section: &RemoteSection, rules: CategoryRules) -> anyhow::Result<Self> {
        let api_key = std::env::var(&section.api_key_env)
            .with_context(|| format!("remote store needs ${} to be set", section.api_key_env))?;
        Ok(Self::new(&section.url, &section.table, api_key, rules))
    }

    pub fn new(base_url: &str, table: &str, api_key: String, rules: CategoryRules) -> Self {
        Self {
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key,
            rules,
            client: reqwest::Client::new(),
        }
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("prefer", HeaderValue::from_static("return=representation"));
        Ok(headers)
    }

    /// Canonicalise rows returned by the server, skipping the unusable ones.
    fn to_transactions(&self, rows: Vec<Value>, household: &HouseholdId) -> Vec<Transaction> {
        let total = rows.len();
        let txns: Vec<Transaction> = rows
            .into_iter()
            .map(|v| StoredRecord::from_value(v).and_then(|r| canonicalize_stored(r, household, &self.rules)))
            .filter_map(|r| match r {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(error = %e, "skipping unusable remote row");
                    None
                }
            })
            .collect();
        debug!(total, kept = txns.len(), "remote rows canonicalised");
        txns
    }

    async fn fetch_async(&self, household: &HouseholdId) -> anyhow::Result<Vec<Value>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .headers(self.headers()?)
            .query(&[("select", "*".to_string()), ("family_id", format!("eq.{household}"))])
            .send()
            .await
            .context("remote fetch")?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("remote fetch failed: {status} {txt}");
        }
        resp.json().await.context("decode remote rows")
    }

    async fn insert_async(&self, txns: &[Transaction]) -> anyhow::Result<Vec<Value>> {
        let mut inserted = Vec::with_capacity(txns.len());
        for (n, chunk) in txns.chunks(BATCH_SIZE).enumerate() {
            let rows: Vec<RemoteRow<'_>> = chunk.iter().map(RemoteRow::from).collect();
            let resp = self
                .client
                .post(&self.endpoint)
                .headers(self.headers()?)
                .json(&rows)
                .send()
                .await
                .with_context(|| format!("remote insert batch {}", n + 1))?;
            let status = resp.status();
            if !status.is_success() {
                let txt = resp.text().await.unwrap_or_default();
                bail!("remote insert batch {} failed: {status} {txt}", n + 1);
            }
            let mut back: Vec<Value> = resp.json().await.context("decode inserted rows")?;
            info!(batch = n + 1, rows = back.len(), "remote batch inserted");
            inserted.append(&mut back);
        }
        Ok(inserted)
    }

    async fn update_category_async(&self, household: &HouseholdId, id: &str, category: &str) -> anyhow::Result<usize> {
        let resp = self
            .client
            .patch(&self.endpoint)
            .headers(self.headers()?)
            .query(&[("id", format!("eq.{id}")), ("family_id", format!("eq.{household}"))])
            .json(&serde_json::json!({ "categoria": category }))
            .send()
            .await
            .context("remote category update")?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("remote category update failed: {status} {txt}");
        }
        let rows: Vec<Value> = resp.json().await.context("decode updated rows")?;
        Ok(rows.len())
    }
}

impl TransactionStore for RemoteStore {
    fn fetch(&self, household: &HouseholdId) -> Result<Vec<Transaction>> {
        let rows = block_on(self.fetch_async(household)).and_then(|r| r).map_err(store_err)?;
        Ok(self.to_transactions(rows, household))
    }

    fn insert(&self, household: &HouseholdId, txns: &[Transaction]) -> Result<Vec<Transaction>> {
        if let Some(t) = txns.iter().find(|t| !t.belongs_to(household)) {
            return Err(CoreError::ForeignHousehold {
                expected: household.to_string(),
                found: t.household.to_string(),
            });
        }
        let rows = block_on(self.insert_async(txns)).and_then(|r| r).map_err(store_err)?;
        Ok(self.to_transactions(rows, household))
    }

    fn update_category(&self, household: &HouseholdId, id: &str, category: &str) -> Result<()> {
        let updated = block_on(self.update_category_async(household, id, category))
            .and_then(|r| r)
            .map_err(store_err)?;
        if updated == 0 {
            return Err(CoreError::UnknownTransaction(id.to_string()));
        }
        Ok(())
    }
}

/// Surface a missing remote section as a readable error.
pub fn require_remote(section: Option<&RemoteSection>) -> anyhow::Result<&RemoteSection> {
    section.ok_or_else(|| anyhow!("no [remote] section in config.toml"))
}
