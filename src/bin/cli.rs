use teller::{Account, AccountNumber, Amount, Bank, LedgerResult, MIN_BALANCE,
    backend::JsonStore};

use std::path::PathBuf;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to the accounts file to operate on
    #[clap(value_parser)]
    path: PathBuf,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Open a new account
    Open(Open),
    /// Show one account and its balance
    Balance(Number),
    /// Pay money into an account
    Deposit(Movement),
    /// Take money out of an account
    Withdraw(Movement),
    /// Close an account
    Close(Number),
    /// List all accounts
    List
}

#[derive(Args, Debug)]
struct Open {
    #[clap(value_parser)]
    first_name: String,

    #[clap(value_parser)]
    last_name: String,

    /// Opening balance
    #[clap(value_parser = parse_balance, allow_negative_numbers = true)]
    balance: Amount
}

fn parse_balance(arg: &str) -> Result<Amount, String> {
    let balance: Amount = arg.parse().map_err(|err| format!("{}", err))?;
    if !balance.is_finite() {
        return Err(format!("{} is not a finite number", arg));
    }
    return Ok(balance);
}

#[derive(Args, Debug)]
struct Number {
    /// Account number
    #[clap(value_parser)]
    number: AccountNumber
}

#[derive(Args, Debug)]
struct Movement {
    /// Account number
    #[clap(value_parser)]
    number: AccountNumber,

    #[clap(value_parser, allow_negative_numbers = true)]
    amount: Amount
}

fn print_account(account: &Account) {
    let balance = format!("{:.2}", account.balance());
    let balance = if account.balance() < MIN_BALANCE {
        balance.bright_red()
    } else {
        balance.green()
    };
    println!("{} {} {}: {}",
        format!("#{}", account.number()).bold(), account.first_name(), account.last_name(), balance);
}

fn run(bank: &Bank, action: Subcommands) -> LedgerResult<()> {
    match action {
        Subcommands::Open(open) => {
            let account = bank.open(&open.first_name, &open.last_name, open.balance)?;
            println!("{}", "Account created successfully!".green());
            print_account(&account);
        },
        Subcommands::Balance(Number { number }) => {
            print_account(&bank.balance_enquiry(number)?);
        },
        Subcommands::Deposit(Movement { number, amount }) => {
            let account = bank.deposit(number, amount)?;
            println!("{}", "Amount deposited successfully!".green());
            print_account(&account);
        },
        Subcommands::Withdraw(Movement { number, amount }) => {
            let account = bank.withdraw(number, amount)?;
            println!("{}", "Amount withdrawn successfully!".green());
            print_account(&account);
        },
        Subcommands::Close(Number { number }) => {
            let account = bank.close(number)?;
            println!("{}", "Account closed successfully.".green());
            print_account(&account);
        },
        Subcommands::List => {
            for account in bank.list_all() {
                print_account(&account);
            }
        }
    }
    return Ok(());
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let bank = Bank::start(JsonStore::new(&args.path));
    let result = run(&bank, args.action);

    if bank.is_dirty() {
        eprintln!("{} changes could not be saved to {}",
            "Warning:".yellow().bold(), args.path.display());
    }
    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}
