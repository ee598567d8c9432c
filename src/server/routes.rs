use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router
};
use serde::{Serialize, Deserialize};

use teller::{Account, AccountNumber, Amount, Bank, BankStatus, LedgerResult};
use crate::error::ServerError;

pub(crate) type SharedBank = Arc<Bank>;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenRequest {
    first_name: String,
    last_name: String,
    initial_balance: Amount
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AmountRequest {
    amount: Amount
}

pub(crate) fn router(bank: SharedBank) -> Router {
    Router::new()
        .route("/accounts", get(list_accounts).post(open_account))
        .route("/accounts/:number", get(balance_enquiry).delete(close_account))
        .route("/accounts/:number/deposit", post(deposit))
        .route("/accounts/:number/withdraw", post(withdraw))
        .route("/status", get(status))
        .route("/flush", post(flush))
        .with_state(bank)
}

/// Run a ledger operation off the async runtime, since every
/// mutation waits on the accounts file being written.
async fn with_bank<T, F>(bank: SharedBank, op: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&Bank) -> LedgerResult<T> + Send + 'static
{
    let result = tokio::task::spawn_blocking(move || op(bank.as_ref())).await?;
    return result.map_err(ServerError::from);
}

async fn list_accounts(State(bank): State<SharedBank>) -> Result<Json<Vec<Account>>, ServerError> {
    let accounts = with_bank(bank, |bank| Ok(bank.list_all())).await?;
    return Ok(Json(accounts));
}

fn opening_balance(balance: Amount) -> Result<Amount, ServerError> {
    if !balance.is_finite() {
        return Err(ServerError::BadRequest(format!("opening balance must be a finite number, got {}", balance)));
    }
    return Ok(balance);
}

async fn open_account(State(bank): State<SharedBank>, Json(req): Json<OpenRequest>)
    -> Result<(StatusCode, Json<Account>), ServerError>
{
    let balance = opening_balance(req.initial_balance)?;
    let account = with_bank(bank, move |bank| {
        bank.open(&req.first_name, &req.last_name, balance)
    }).await?;
    return Ok((StatusCode::CREATED, Json(account)));
}

async fn balance_enquiry(State(bank): State<SharedBank>, Path(number): Path<AccountNumber>)
    -> Result<Json<Account>, ServerError>
{
    let account = with_bank(bank, move |bank| bank.balance_enquiry(number)).await?;
    return Ok(Json(account));
}

async fn deposit(State(bank): State<SharedBank>, Path(number): Path<AccountNumber>, Json(req): Json<AmountRequest>)
    -> Result<Json<Account>, ServerError>
{
    let account = with_bank(bank, move |bank| bank.deposit(number, req.amount)).await?;
    return Ok(Json(account));
}

async fn withdraw(State(bank): State<SharedBank>, Path(number): Path<AccountNumber>, Json(req): Json<AmountRequest>)
    -> Result<Json<Account>, ServerError>
{
    let account = with_bank(bank, move |bank| bank.withdraw(number, req.amount)).await?;
    return Ok(Json(account));
}

async fn close_account(State(bank): State<SharedBank>, Path(number): Path<AccountNumber>)
    -> Result<Json<Account>, ServerError>
{
    let account = with_bank(bank, move |bank| bank.close(number)).await?;
    return Ok(Json(account));
}

async fn status(State(bank): State<SharedBank>) -> Result<Json<BankStatus>, ServerError> {
    let status = with_bank(bank, |bank| Ok(bank.status())).await?;
    return Ok(Json(status));
}

async fn flush(State(bank): State<SharedBank>) -> Result<StatusCode, ServerError> {
    with_bank(bank, |bank| bank.flush()).await?;
    return Ok(StatusCode::NO_CONTENT);
}
