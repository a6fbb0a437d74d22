mod args;

pub use args::{Args, Commands, ConfirmArgs, ExportArgs, TransactionsArgs};
use clap::Parser;
use common::{BillingConfig, BillingService};

/// Runs the CLI command parser and executes the selected command.
/// Returns true if a CLI command was handled, false otherwise.
pub async fn run_cli() -> bool {
    let args = Args::parse();
    let Some(command) = args.command else {
        return false;
    };

    let config = BillingConfig::from_env();
    let billing = match config.create_billing_service().await {
        Ok(billing) => billing,
        Err(e) => {
            eprintln!("Failed to open billing database: {e:#}");
            return true;
        }
    };

    if let Err(e) = run_command(&billing, &command).await {
        eprintln!("Command failed: {e:#}");
    }
    billing.store().close().await;
    true
}

async fn run_command(billing: &BillingService, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Packages => {
            for package in billing.catalog().packages() {
                println!(
                    "{:<6} {:<12} {:>6}  {}",
                    package.id, package.name, package.price, package.validity
                );
            }
        }
        Commands::Transactions(args) => {
            for t in billing.recent_transactions(args.limit).await? {
                println!(
                    "{:>5} {} {:<8} {:<6} {:>5} {:<14} {:<7} expires {}",
                    t.id, t.created_at, t.code, t.package, t.amount, t.phone, t.status, t.expires_at
                );
            }
        }
        Commands::Confirm(args) => {
            let granted = billing
                .confirm_payment(Some(&args.code), args.mpesa_ref.as_deref())
                .await?;
            println!(
                "Payment confirmed. Username: {} Password: {}",
                granted.username, granted.password
            );
        }
        Commands::Export(args) => {
            let written = billing.store().export_csv(&args.out, args.limit).await?;
            println!("Exported {} transactions to {}", written, args.out);
        }
    }
    Ok(())
}
