use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "WiFi Billing - captive portal billing server and operator tools"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the packages on offer
    Packages,

    /// Print the most recent transactions, newest first
    Transactions(TransactionsArgs),

    /// Confirm a payment by hand and issue the WiFi credentials
    ///
    /// Runs the same confirmation as `POST /api/confirm-payment`, including
    /// the SMS with the login details.
    Confirm(ConfirmArgs),

    /// Export the most recent transactions to a CSV file
    Export(ExportArgs),
}

#[derive(ClapArgs, Debug)]
pub struct TransactionsArgs {
    #[arg(short, long, default_value_t = 100, help = "Maximum number of transactions")]
    pub limit: i64,
}

#[derive(ClapArgs, Debug)]
pub struct ConfirmArgs {
    #[arg(short, long, help = "Payment code sent to the customer")]
    pub code: String,

    #[arg(short, long, help = "M-Pesa reference of the payment")]
    pub mpesa_ref: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ExportArgs {
    #[arg(short, long, help = "Output CSV file path")]
    pub out: String,

    #[arg(short, long, default_value_t = 100, help = "Maximum number of transactions")]
    pub limit: i64,
}
