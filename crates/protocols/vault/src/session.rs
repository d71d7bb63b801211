//! Vault panel session
//!
//! Everything the staking panel needs between keystrokes: the typed amount,
//! the live payout projection, the selected tab and its balance, and the one
//! status message currently shown. Wallet, submitter, watcher, and balance
//! source are passed in; nothing is global.

use std::sync::Arc;

use aptos_client::{AccountProvider, BalanceQuery, ConfirmationWatcher, TransactionSubmitter};
use legato_core::units::{format_display, parse_display};
use legato_core::{Clock, Error, ProtocolError, VaultConfig};
use tokio::sync::RwLock;

use crate::balance::BalanceTracker;
use crate::calculator::project;
use crate::constants::{BASE_SYMBOL, DISPLAY_PLACES, MATURITY_DATE_FORMAT};
use crate::state::{MaturityTerm, MintReceipt, MintRequest, PanelTab, PanelView, Projection};
use crate::workflow::MintWorkflow;

/// External collaborators of a session
pub struct SessionDeps {
    pub clock: Arc<dyn Clock>,
    pub account: Arc<dyn AccountProvider>,
    pub submitter: Arc<dyn TransactionSubmitter>,
    pub watcher: Arc<dyn ConfirmationWatcher>,
    pub balances: Arc<dyn BalanceQuery>,
}

/// The amount field as last typed
#[derive(Debug, Clone)]
struct Input {
    amount: Result<f64, ProtocolError>,
    projection: Option<Projection>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            amount: Ok(0.0),
            projection: None,
        }
    }
}

pub struct VaultSession {
    config: VaultConfig,
    term: MaturityTerm,
    clock: Arc<dyn Clock>,
    account: Arc<dyn AccountProvider>,
    balances: Arc<BalanceTracker>,
    workflow: MintWorkflow,
    input: RwLock<Input>,
    status: RwLock<Option<String>>,
}

impl VaultSession {
    pub fn new(config: VaultConfig, deps: SessionDeps) -> Self {
        let balances = Arc::new(BalanceTracker::new(deps.balances, &config));
        let workflow = MintWorkflow::new(
            config.clone(),
            deps.account.clone(),
            deps.submitter,
            deps.watcher,
            balances.clone(),
        );

        Self {
            term: MaturityTerm::from_config(&config),
            config,
            clock: deps.clock,
            account: deps.account,
            balances,
            workflow,
            input: RwLock::new(Input::default()),
            status: RwLock::new(None),
        }
    }

    pub fn workflow(&self) -> &MintWorkflow {
        &self.workflow
    }

    pub fn term(&self) -> MaturityTerm {
        self.term
    }

    /// Initial balance load
    pub async fn start(&self) {
        tracing::info!(
            module = %self.config.module_address,
            maturity = self.config.maturity_timestamp,
            "Vault session started"
        );
        self.refresh_balance().await;
    }

    /// Re-read the selected tab's balance. Failures are logged by the
    /// tracker and never interrupt the session.
    pub async fn refresh_balance(&self) {
        let Some(address) = self.account.current_account() else {
            tracing::debug!("No wallet connected, skipping balance refresh");
            return;
        };
        if let Err(e) = self.balances.refresh(&address).await {
            tracing::debug!(error = %e, "Keeping last known balance");
        }
    }

    pub async fn select_tab(&self, tab: PanelTab) {
        self.balances.select(tab).await;
        self.refresh_balance().await;
    }

    /// Store the typed amount and recompute the projection.
    ///
    /// Unparseable input is remembered as such, so a later Next is rejected
    /// instead of minting whatever was typed before.
    pub async fn on_amount_input(&self, raw: &str) -> Result<Projection, ProtocolError> {
        let parsed = parse_display(raw).and_then(|amount| {
            project(amount, &self.term, self.clock.now()).map(|projection| (amount, projection))
        });
        let (amount, projection) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                *self.input.write().await = Input {
                    amount: Err(e.clone()),
                    projection: None,
                };
                return Err(e);
            }
        };

        if projection.expired {
            tracing::warn!(
                days_remaining = projection.days_remaining,
                "Vault term has matured, projection is below principal"
            );
        }

        *self.input.write().await = Input {
            amount: Ok(amount),
            projection: Some(projection),
        };
        Ok(projection)
    }

    /// The "Next" button: mint the typed amount
    pub async fn on_next(&self) -> Result<MintReceipt, Error> {
        if self.workflow.state().is_in_flight() {
            return Err(ProtocolError::WorkflowBusy.into());
        }

        *self.status.write().await = None;

        let amount = self.input.read().await.amount.clone();
        let amount = match amount {
            Ok(amount) => amount,
            Err(reason) => {
                self.workflow.reject(reason.clone())?;
                *self.status.write().await = self.workflow.state().status_message();
                return Err(reason.into());
            }
        };

        let request = MintRequest {
            raw_input_amount: amount,
            current_available_balance: self.balances.displayed().await,
        };

        let result = self.workflow.submit(request).await;
        if result.is_err() {
            // Rejected or Failed; a lost race for the guard leaves no message
            *self.status.write().await = self.workflow.state().status_message();
        }
        result
    }

    pub async fn view(&self) -> PanelView {
        let tab = self.balances.selected().await;
        let input = self.input.read().await.clone();
        let symbol = match tab {
            PanelTab::Deposit => BASE_SYMBOL.to_string(),
            PanelTab::Withdraw => self.config.receipt_symbol.clone(),
        };

        PanelView {
            tab,
            symbol,
            available: format_display(self.balances.displayed().await, DISPLAY_PLACES),
            fixed_apy: format_rate(self.term.annual_rate),
            estimate: format_display(
                input.projection.map(|p| p.payout).unwrap_or(0.0),
                DISPLAY_PLACES,
            ),
            maturity_date: maturity_label(self.term.maturity_timestamp),
            expired: input.projection.is_some_and(|p| p.expired),
            loading: self.workflow.state().is_in_flight(),
            status_message: self.status.read().await.clone(),
            account: self.account.current_account().map(|a| a.short()),
        }
    }
}

/// `0.05` -> `5%`
fn format_rate(rate: f64) -> String {
    let pct = format!("{:.2}", rate * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", pct)
}

fn maturity_label(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format(MATURITY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use aptos_client::mock::{MockAccount, MockBalanceQuery, MockSubmitter, MockWatcher};
    use legato_core::{Address, FixedClock, LedgerError};

    use crate::state::WorkflowState;

    use super::*;

    const MATURITY: i64 = 1_714_483_013;
    const DAY: i64 = 86_400;

    struct Fixture {
        session: VaultSession,
        account: Arc<MockAccount>,
        submitter: Arc<MockSubmitter>,
        query: Arc<MockBalanceQuery>,
    }

    fn fixture(now: i64, submitter: MockSubmitter) -> Fixture {
        let config = VaultConfig::default();
        let account = Arc::new(MockAccount::connected(Address::new(
            "0x7bf8c83deaef80763a95c2727e36815cb66282024814df39c6170ee6f04bdd37",
        )));
        let submitter = Arc::new(submitter);
        let query = Arc::new(
            MockBalanceQuery::new()
                .with_balance(&config.base_asset, 500_000_000)
                .with_balance(&config.receipt_asset, 210_000_000),
        );

        let session = VaultSession::new(
            config,
            SessionDeps {
                clock: Arc::new(FixedClock(now)),
                account: account.clone(),
                submitter: submitter.clone(),
                watcher: Arc::new(MockWatcher::new_success()),
                balances: query.clone(),
            },
        );

        Fixture {
            session,
            account,
            submitter,
            query,
        }
    }

    #[tokio::test]
    async fn test_start_loads_balance() {
        let f = fixture(MATURITY - 365 * DAY, MockSubmitter::new_success("0x1"));
        f.session.start().await;

        let view = f.session.view().await;
        assert_eq!(view.tab, PanelTab::Deposit);
        assert_eq!(view.symbol, "APT");
        assert_eq!(view.available, "5.000");
        assert_eq!(view.fixed_apy, "5%");
        assert_eq!(view.maturity_date, "April 30, 2024");
        assert_eq!(view.account.as_deref(), Some("0x7bf8...dd37"));
        assert!(!view.loading);
        assert_eq!(view.status_message, None);
    }

    #[tokio::test]
    async fn test_live_estimate() {
        let f = fixture(MATURITY - 365 * DAY, MockSubmitter::new_success("0x1"));

        let projection = f.session.on_amount_input("100").await.unwrap();
        assert!((projection.payout - 105.0).abs() < 1e-9);
        assert_eq!(f.session.view().await.estimate, "105.000");

        f.session.on_amount_input("").await.unwrap();
        assert_eq!(f.session.view().await.estimate, "0.000");

        assert!(f.session.on_amount_input("abc").await.is_err());
        assert_eq!(f.session.view().await.estimate, "0.000");
    }

    #[tokio::test]
    async fn test_expired_term_flagged() {
        let f = fixture(MATURITY + 73 * DAY, MockSubmitter::new_success("0x1"));

        let projection = f.session.on_amount_input("100").await.unwrap();
        assert!(projection.expired);

        let view = f.session.view().await;
        assert!(view.expired);
        assert_eq!(view.estimate, "99.000");
    }

    #[tokio::test]
    async fn test_tab_switch_refreshes_receipt_balance() {
        let f = fixture(MATURITY, MockSubmitter::new_success("0x1"));
        f.session.start().await;

        f.session.select_tab(PanelTab::Withdraw).await;
        let view = f.session.view().await;
        assert_eq!(view.symbol, "PT-APR24");
        assert_eq!(view.available, "2.100");
        assert_eq!(f.query.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_below_minimum_message_then_cleared() {
        let f = fixture(MATURITY - DAY, MockSubmitter::new_success("0xabc"));

        f.session.on_amount_input("1").await.unwrap();
        assert!(f.session.on_next().await.is_err());
        assert_eq!(
            f.session.view().await.status_message.as_deref(),
            Some("Amount must be > 1")
        );

        f.session.on_amount_input("2.5").await.unwrap();
        f.session.on_next().await.unwrap();
        assert_eq!(f.session.view().await.status_message, None);
        assert_eq!(
            f.submitter.get_last_payload().unwrap().function_arguments,
            vec!["250000000".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unreadable_amount_is_not_minted() {
        let f = fixture(MATURITY - DAY, MockSubmitter::new_success("0xabc"));

        f.session.on_amount_input("5").await.unwrap();
        assert!(f.session.on_amount_input("abc").await.is_err());

        let err = f.session.on_next().await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_amount");
        assert_eq!(f.submitter.get_call_count(), 0);
        assert!(matches!(
            f.session.workflow().state(),
            WorkflowState::Rejected {
                reason: ProtocolError::InvalidAmount { .. }
            }
        ));

        let view = f.session.view().await;
        assert_eq!(
            view.status_message.as_deref(),
            Some("Invalid amount: 'abc' is not a number")
        );
        assert_eq!(view.estimate, "0.000");

        // Fixing the field makes Next work again
        f.session.on_amount_input("5").await.unwrap();
        f.session.on_next().await.unwrap();
        assert_eq!(f.session.view().await.status_message, None);
        assert_eq!(
            f.submitter.get_last_payload().unwrap().function_arguments,
            vec!["500000000".to_string()]
        );
    }

    #[tokio::test]
    async fn test_balance_query_error_keeps_session_running() {
        let config = VaultConfig::default();
        let account = Arc::new(MockAccount::connected(Address::new("0xa11ce")));
        let query = Arc::new(MockBalanceQuery::new().with_error(
            &config.base_asset,
            LedgerError::Query {
                reason: "fullnode unavailable".into(),
            },
        ));
        let session = VaultSession::new(
            config,
            SessionDeps {
                clock: Arc::new(FixedClock(MATURITY)),
                account,
                submitter: Arc::new(MockSubmitter::new_success("0x1")),
                watcher: Arc::new(MockWatcher::new_success()),
                balances: query.clone(),
            },
        );

        session.start().await;
        assert_eq!(query.get_call_count(), 1);
        let view = session.view().await;
        assert_eq!(view.available, "0.000");
        assert_eq!(view.status_message, None);
    }

    #[tokio::test]
    async fn test_wallet_error_shown_verbatim() {
        let f = fixture(
            MATURITY - DAY,
            MockSubmitter::new_failure("The user rejected the request"),
        );

        f.session.on_amount_input("3").await.unwrap();
        let err = f.session.on_next().await.unwrap_err();
        assert_eq!(err.error_code(), "submission_error");
        assert_eq!(
            f.session.view().await.status_message.as_deref(),
            Some("The user rejected the request")
        );
    }

    #[tokio::test]
    async fn test_success_refreshes_balance() {
        let f = fixture(MATURITY - DAY, MockSubmitter::new_success("0xabc"));
        f.session.start().await;
        assert_eq!(f.query.get_call_count(), 1);

        f.session.on_amount_input("2").await.unwrap();
        f.query
            .set_balance(&VaultConfig::default().base_asset, 300_000_000);
        f.session.on_next().await.unwrap();

        assert_eq!(f.query.get_call_count(), 2);
        assert_eq!(f.session.view().await.available, "3.000");
        assert!(matches!(
            f.session.workflow().state(),
            WorkflowState::Succeeded { .. }
        ));
    }

    #[tokio::test]
    async fn test_disconnected_wallet() {
        let f = fixture(MATURITY - DAY, MockSubmitter::new_success("0xabc"));
        f.account.set(None);

        f.session.start().await;
        assert_eq!(f.query.get_call_count(), 0);

        f.session.on_amount_input("5").await.unwrap();
        let err = f.session.on_next().await.unwrap_err();
        assert_eq!(err.error_code(), "wallet_not_connected");
        assert_eq!(
            f.session.view().await.status_message.as_deref(),
            Some("No wallet connected")
        );
        assert_eq!(f.submitter.get_call_count(), 0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.05), "5%");
        assert_eq!(format_rate(0.07), "7%");
        assert_eq!(format_rate(0.0525), "5.25%");
        assert_eq!(format_rate(0.125), "12.5%");
    }

    #[test]
    fn test_maturity_label() {
        assert_eq!(maturity_label(MATURITY), "April 30, 2024");
    }
}
