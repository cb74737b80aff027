use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "voucherbox")]
#[command(about = "Accounting voucher ledger", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $VOUCHERBOX_CONFIG or config/voucherbox.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a voucher document and store it
    Submit(SubmitArgs),
    /// List stored vouchers with the grand total
    List(ListArgs),
    /// Print the stored document of a voucher
    Show(ShowArgs),
    /// Print store statistics
    Stats,
    /// Print the effective configuration
    Config,
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Document to read; stdin when omitted or "-"
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Emit the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("key").required(true).args(["date", "row"])))]
pub struct ShowArgs {
    /// Voucher date, as shown by `list`
    #[arg(long, requires = "id")]
    pub date: Option<String>,

    /// Voucher id, as shown by `list`
    #[arg(long, requires = "date")]
    pub id: Option<String>,

    /// Row id, as shown by `list`
    #[arg(long)]
    pub row: Option<u64>,

    /// Print every voucher stored under the date and id
    #[arg(long, requires = "date")]
    pub all: bool,
}
