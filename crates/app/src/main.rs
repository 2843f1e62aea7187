//! `patungan` — split group bills from the command line.
//!
//! A thin presentation layer: every subcommand forwards one user intent to
//! the engine, which mutates the session snapshot, recomputes balances and
//! persists through the file store. All the interesting rules live in the
//! engine crate.

use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::Engine;
use store::FileSessionStore;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "patungan")]
#[command(about = "Split group bills and settle who owes whom")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Participant(Participant),
    Bill(Bill),
    Item(Item),
    /// Print the session, its bills and the settlement summary.
    Show,
}

#[derive(Args, Debug)]
struct Participant {
    #[command(subcommand)]
    command: ParticipantCommand,
}

#[derive(Subcommand, Debug)]
enum ParticipantCommand {
    /// Add a participant to the session.
    Add {
        #[arg(long)]
        name: String,
    },
    /// Remove a participant; their shares and payer role go with them.
    Remove {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Args, Debug)]
struct Bill {
    #[command(subcommand)]
    command: BillCommand,
}

#[derive(Subcommand, Debug)]
enum BillCommand {
    /// Create an empty bill with a default name.
    Add,
    /// Remove a bill together with its items.
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Update a bill's header; omitted fields keep their current value.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Tax percentage applied to every item on the bill.
        #[arg(long)]
        tax: Option<f64>,
        /// Participant who fronted the money.
        #[arg(long, conflicts_with = "no_payer")]
        payer: Option<i64>,
        /// Clear the payer.
        #[arg(long)]
        no_payer: bool,
        /// Amount the payer actually paid.
        #[arg(long)]
        paid: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// Add an item to a bill, split among everyone by default.
    Add {
        #[arg(long)]
        bill: i64,
        #[arg(long)]
        name: String,
        /// Unit price, must be > 0.
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove an item and its shares.
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Replace who splits an item, e.g. `--participants 1,3`.
    Share {
        #[arg(long)]
        id: i64,
        #[arg(long, value_delimiter = ',')]
        participants: Vec<i64>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let settings = settings::Settings::new()?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "patungan={level},engine={level},store={level}",
            level = settings.level
        ))
        .init();

    let cli = Cli::parse();
    let store = FileSessionStore::new(&settings.data_file);
    let mut engine = Engine::builder().store(Box::new(store)).build();
    tracing::debug!("session \"{}\" ready from {}", engine.session_name(), settings.data_file);

    match cli.command {
        Command::Participant(participant) => match participant.command {
            ParticipantCommand::Add { name } => {
                let id = engine.add_participant(&name)?;
                println!("added participant [{id}] {name}");
            }
            ParticipantCommand::Remove { id } => {
                if engine.remove_participant(id) {
                    println!("removed participant [{id}]");
                } else {
                    println!("no participant with id {id}");
                }
            }
        },
        Command::Bill(bill) => match bill.command {
            BillCommand::Add => {
                let id = engine.add_bill();
                println!("added bill [{id}]");
            }
            BillCommand::Remove { id } => {
                if engine.remove_bill(id) {
                    println!("removed bill [{id}]");
                } else {
                    println!("no bill with id {id}");
                }
            }
            BillCommand::Update {
                id,
                name,
                tax,
                payer,
                no_payer,
                paid,
            } => {
                let Some(current) = engine.bills().iter().find(|b| b.id == id).cloned() else {
                    println!("no bill with id {id}");
                    return Ok(());
                };
                let payer_id = if no_payer { None } else { payer.or(current.payer_id) };
                engine.update_bill_header(
                    id,
                    name.as_deref().unwrap_or(&current.name),
                    tax.unwrap_or(current.tax_percentage),
                    payer_id,
                    paid.unwrap_or(current.total_paid),
                )?;
                println!("updated bill [{id}]");
            }
        },
        Command::Item(item) => match item.command {
            ItemCommand::Add {
                bill,
                name,
                price,
                quantity,
            } => {
                let id = engine.add_item(bill, &name, price, quantity)?;
                println!("added item [{id}] {name} to bill [{bill}]");
            }
            ItemCommand::Remove { id } => {
                if engine.remove_item(id) {
                    println!("removed item [{id}]");
                } else {
                    println!("no item with id {id}");
                }
            }
            ItemCommand::Share { id, participants } => {
                engine.replace_item_shares(id, &participants)?;
                let count = engine.shares_for_item(id).count();
                println!("item [{id}] now split {count} ways");
            }
        },
        Command::Show => show(&engine),
    }

    Ok(())
}

/// Renders the snapshot and the settlement summary. Rounding to two
/// decimals happens here and only here.
fn show(engine: &Engine) {
    println!("Session: {}", engine.session_name());

    println!("Participants:");
    for participant in engine.participants() {
        println!("  [{}] {}", participant.id, participant.name);
    }

    println!("Bills:");
    for bill in engine.bills() {
        let payer = bill
            .payer_id
            .and_then(|id| engine.participants().iter().find(|p| p.id == id))
            .map_or_else(|| String::from("-"), |p| p.name.clone());
        println!(
            "  [{}] {} (tax {}%, payer {}, paid {:.2})",
            bill.id, bill.name, bill.tax_percentage, payer, bill.total_paid
        );
        for item in engine.items_for_bill(bill.id) {
            let sharers = engine.shares_for_item(item.id).count();
            println!(
                "      - [{}] {} x{} @ {:.2}, split {} ways",
                item.id, item.name, item.quantity, item.price, sharers
            );
        }
    }

    println!("Summary:");
    let summary = engine.summary();
    for participant in engine.participants() {
        if let Some(balance) = summary.get(&participant.id) {
            println!(
                "  {}: billed {:.2}, paid {:.2}, balance {:+.2}",
                participant.name,
                balance.total_billed,
                balance.total_paid,
                balance.final_balance()
            );
        }
    }
}
