//! Primitive per-kind operators and the navigation half of the URL batch.
//!
//! Every operator is one browser RPC. Failures are caught here, logged with
//! the setting they concern, and reported as `false`; nothing below this
//! layer throws across the engine's public boundary.

use url::Url;

use crate::browser::{BrowserError, CookieTarget, PageScript, SetCookieParams, TabId};
use crate::preset::Setting;
use crate::sync::engine::SyncEngine;
use crate::sync::url_batch::{rewrite_query, QueryMutation};

fn log_failure(op: &'static str, tab: TabId, setting: &Setting, error: &BrowserError) {
    tracing::warn!(
        op,
        tab = %tab,
        kind = %setting.kind,
        key = %setting.key,
        error = %error,
        "setting operation failed"
    );
}

impl SyncEngine {
    /// The tab's current URL, parsed.
    pub(crate) async fn current_url(&self, tab: TabId) -> Result<Url, BrowserError> {
        let snapshot = self.tabs.get(tab).await?;
        let raw = snapshot.url.ok_or(BrowserError::MissingUrl(tab))?;
        Ok(Url::parse(&raw)?)
    }

    /// Origin the tab's cookies are scoped to, e.g. `https://x.com`.
    pub(crate) async fn origin_for(&self, tab: TabId) -> Result<String, BrowserError> {
        let url = self.current_url(tab).await?;
        Ok(url.origin().ascii_serialization())
    }

    /// Batched URL mutator: read the URL once, fold every mutation into one
    /// rewrite, issue at most one navigation, then wait out the settle delay
    /// so later cookie/storage calls target the new document.
    pub(crate) async fn batch_navigate(
        &self,
        tab: TabId,
        mutations: &[QueryMutation<'_>],
    ) -> bool {
        let url = match self.current_url(tab).await {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!(tab = %tab, error = %error, "cannot read tab url for query batch");
                return false;
            }
        };

        let Some(rewritten) = rewrite_query(&url, mutations) else {
            tracing::debug!(tab = %tab, "query batch left url unchanged, skipping navigation");
            return true;
        };

        if let Err(error) = self.tabs.navigate(tab, rewritten.as_str()).await {
            tracing::warn!(tab = %tab, error = %error, "batched navigation failed");
            return false;
        }
        tokio::time::sleep(self.config.settle_delay).await;
        true
    }

    pub(crate) async fn apply_cookie(&self, tab: TabId, setting: &Setting) -> bool {
        let result = async {
            let origin = self.origin_for(tab).await?;
            self.cookies
                .set(SetCookieParams::scoped(origin, &setting.key, &setting.value))
                .await
        }
        .await;

        match result {
            Ok(()) => true,
            Err(error) => {
                log_failure("apply-cookie", tab, setting, &error);
                false
            }
        }
    }

    pub(crate) async fn remove_cookie(&self, tab: TabId, setting: &Setting) -> bool {
        let result = async {
            let origin = self.origin_for(tab).await?;
            self.cookies
                .remove(CookieTarget::new(origin, &setting.key))
                .await
        }
        .await;

        match result {
            Ok(()) => true,
            Err(error) => {
                log_failure("remove-cookie", tab, setting, &error);
                false
            }
        }
    }

    pub(crate) async fn apply_local_entry(&self, tab: TabId, setting: &Setting) -> bool {
        let script = PageScript::StorageSet {
            key: setting.key.clone(),
            value: setting.value.clone(),
        };
        match self.scripts.execute(tab, script).await {
            Ok(_) => true,
            Err(error) => {
                log_failure("apply-local-entry", tab, setting, &error);
                false
            }
        }
    }

    pub(crate) async fn remove_local_entry(&self, tab: TabId, setting: &Setting) -> bool {
        let script = PageScript::StorageRemove {
            key: setting.key.clone(),
        };
        match self.scripts.execute(tab, script).await {
            Ok(_) => true,
            Err(error) => {
                log_failure("remove-local-entry", tab, setting, &error);
                false
            }
        }
    }

    /// Read back a query parameter's current value from the tab URL.
    pub(crate) async fn read_query_param(
        &self,
        tab: TabId,
        key: &str,
    ) -> Result<Option<String>, BrowserError> {
        let url = self.current_url(tab).await?;
        Ok(url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned()))
    }

    /// Read back a cookie's current value at the tab's origin.
    pub(crate) async fn read_cookie(
        &self,
        tab: TabId,
        key: &str,
    ) -> Result<Option<String>, BrowserError> {
        let origin = self.origin_for(tab).await?;
        let cookie = self.cookies.get(CookieTarget::new(origin, key)).await?;
        Ok(cookie.map(|c| c.value))
    }

    /// Read back a local storage entry from the tab's page.
    pub(crate) async fn read_local_entry(
        &self,
        tab: TabId,
        key: &str,
    ) -> Result<Option<String>, BrowserError> {
        self.scripts
            .execute(tab, PageScript::StorageGet { key: key.to_string() })
            .await
    }
}
