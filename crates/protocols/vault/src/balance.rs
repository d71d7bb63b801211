//! Displayed balance for the selected panel tab
//!
//! Refreshes are idempotent reads and may overlap with a mint. The most
//! recently completed refresh wins; a result for a tab that is no longer
//! selected is dropped.

use std::sync::Arc;

use aptos_client::BalanceQuery;
use legato_core::units::to_display_units;
use legato_core::{Address, AssetType, LedgerError, VaultConfig};
use tokio::sync::RwLock;

use crate::state::PanelTab;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DisplayedBalance {
    tab: PanelTab,
    amount: f64,
}

pub struct BalanceTracker {
    query: Arc<dyn BalanceQuery>,
    base_asset: AssetType,
    receipt_asset: AssetType,
    selected: RwLock<PanelTab>,
    displayed: RwLock<DisplayedBalance>,
}

impl BalanceTracker {
    pub fn new(query: Arc<dyn BalanceQuery>, config: &VaultConfig) -> Self {
        Self {
            query,
            base_asset: config.base_asset.clone(),
            receipt_asset: config.receipt_asset.clone(),
            selected: RwLock::new(PanelTab::default()),
            displayed: RwLock::new(DisplayedBalance {
                tab: PanelTab::default(),
                amount: 0.0,
            }),
        }
    }

    pub fn asset_for(&self, tab: PanelTab) -> &AssetType {
        match tab {
            PanelTab::Deposit => &self.base_asset,
            PanelTab::Withdraw => &self.receipt_asset,
        }
    }

    pub async fn select(&self, tab: PanelTab) {
        *self.selected.write().await = tab;
    }

    pub async fn selected(&self) -> PanelTab {
        *self.selected.read().await
    }

    /// Last known balance of the selected tab's asset, 0 until one is known
    pub async fn displayed(&self) -> f64 {
        let selected = self.selected().await;
        let displayed = *self.displayed.read().await;
        if displayed.tab == selected {
            displayed.amount
        } else {
            0.0
        }
    }

    /// Re-read the selected tab's balance for `address`.
    ///
    /// A missing CoinStore reads as 0. Any other failure leaves the displayed
    /// value untouched and is handed back to the caller.
    pub async fn refresh(&self, address: &Address) -> Result<f64, LedgerError> {
        let tab = self.selected().await;
        let asset = self.asset_for(tab);

        let amount = match self.query.query_balance(address, asset).await {
            Ok(base) => to_display_units(base),
            Err(e) if e.is_resource_not_found() => {
                tracing::debug!(%address, %asset, "No coin store yet, showing 0");
                0.0
            }
            Err(e) => {
                tracing::warn!(%address, %asset, error = %e, "Balance refresh failed");
                return Err(e);
            }
        };

        if self.selected().await != tab {
            tracing::debug!(?tab, "Dropping balance for deselected tab");
            return Ok(amount);
        }

        *self.displayed.write().await = DisplayedBalance { tab, amount };
        Ok(amount)
    }
}
