use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use expense_tracker::{
    AppState, Summary, TransactionId, TransactionStore,
    logging::setup_logging,
    summary::{amount_label, recent_transactions},
    transaction::{Category, Transaction, TransactionType, parse_amount},
};

/// Record income and expenses and view their totals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created with sample
    /// transactions if it does not exist.
    #[arg(long, default_value = "transactions.db")]
    db_path: PathBuf,

    /// Canonical name of the local timezone, used to date new transactions.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// File path to write the debug log to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction dated today.
    Add {
        title: String,

        /// Amounts that are not a number are recorded as 0.00.
        amount: String,

        /// One of Food, Shopping, Entertainment, Transportation, Education or
        /// Other. Any other text is kept as is.
        #[arg(long, default_value = "Other")]
        category: String,

        /// Income or Expense.
        #[arg(long = "type", default_value = "Expense")]
        kind: String,
    },

    /// List transactions in the order they were created.
    List {
        /// Show at most this many transactions.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the transactions as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the balance, income and expense totals.
    Summary {
        /// Print the totals as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Change the fields of a transaction.
    Update {
        id: TransactionId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Delete a transaction.
    Delete { id: TransactionId },

    /// Start an interactive session that redraws the totals and recent
    /// transactions after every change.
    Shell,
}

/// The number of transactions shown in the shell's recent list.
const RECENT_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let state = AppState::open(&args.db_path, &args.timezone)?;
    let result = run(args.command, &state).await;

    if !state.close()? {
        tracing::warn!("database connection is still in use and was left open");
    }

    result
}

async fn run(command: Command, state: &AppState) -> Result<(), Box<dyn Error>> {
    let store = &state.transaction_store;

    match command {
        Command::Add {
            title,
            amount,
            category,
            kind,
        } => {
            let builder = state.new_transaction(
                &title,
                parse_amount(&amount),
                Category::from(category),
                TransactionType::from(kind),
            )?;
            let transaction = store.create(builder).await?;
            println!("Added {}", format_row(&transaction));
        }
        Command::List { limit, json } => {
            let transactions = store.get_all().await?;
            let recent = recent_transactions(&transactions, limit.unwrap_or(usize::MAX));

            if json {
                println!("{}", serde_json::to_string_pretty(&recent)?);
            } else {
                for transaction in recent {
                    println!("{}", format_row(transaction));
                }
            }
        }
        Command::Summary { json } => {
            let summary = Summary::from_transactions(&store.get_all().await?);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Command::Update {
            id,
            title,
            amount,
            category,
            kind,
        } => {
            let mut transaction = store.get(id).await?;

            if let Some(title) = title {
                transaction.title = title;
            }
            if let Some(amount) = amount {
                transaction.amount = parse_amount(&amount);
            }
            if let Some(category) = category {
                transaction.category = Category::from(category);
            }
            if let Some(kind) = kind {
                transaction.kind = TransactionType::from(kind);
            }

            store.update(&transaction).await?;
            println!("Updated {}", format_row(&transaction));
        }
        Command::Delete { id } => {
            let transaction = store.get(id).await?;
            store.delete(&transaction).await?;
            println!("Deleted {}", format_row(&transaction));
        }
        Command::Shell => shell(state).await?,
    }

    Ok(())
}

/// Read commands from stdin while a background task redraws the home view
/// whenever the list of transactions changes.
async fn shell(state: &AppState) -> Result<(), Box<dyn Error>> {
    let store = &state.transaction_store;
    let mut subscription = store.subscribe();

    let renderer = tokio::spawn(async move {
        while let Some(transactions) = subscription.next().await {
            print_home(&transactions);
        }
    });

    println!("Commands: add <amount> <Income|Expense> <category> <title>, delete <id>, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();

        let result = match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["add", amount, kind, category, title @ ..] => {
                match state.new_transaction(
                    &title.join(" "),
                    parse_amount(amount),
                    Category::from(*category),
                    TransactionType::from(*kind),
                ) {
                    Ok(builder) => store.create(builder).await.map(|_| ()),
                    Err(error) => Err(error),
                }
            }
            ["delete", id] => match id.parse::<TransactionId>() {
                Ok(id) => match store.get(id).await {
                    Ok(transaction) => store.delete(&transaction).await,
                    Err(error) => Err(error),
                },
                Err(_) => {
                    println!("Not a transaction ID: {id}");
                    continue;
                }
            },
            _ => {
                println!("Unknown command: {line}");
                continue;
            }
        };

        if let Err(error) = result {
            tracing::warn!("command {line:?} failed: {error}");
            println!("Could not save the change: {error}");
        }
    }

    renderer.abort();

    Ok(())
}

fn print_home(transactions: &[Transaction]) {
    println!();
    print_summary(&Summary::from_transactions(transactions));
    println!();
    println!("Recent Transactions");

    for transaction in recent_transactions(transactions, RECENT_LIMIT) {
        println!("  {}", format_row(transaction));
    }
}

fn print_summary(summary: &Summary) {
    println!("Balance  {}", summary.balance);
    println!("Income   {}", summary.income);
    println!("Expense  {}", summary.expense);
}

fn format_row(transaction: &Transaction) -> String {
    format!(
        "#{} {} {} [{}] {}",
        transaction.id,
        transaction.date,
        transaction.title,
        transaction.category,
        amount_label(transaction)
    )
}
