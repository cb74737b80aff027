use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::info;
use voucherbox::Engine;
use voucherbox::ledger::{ListItem, Listing, RowId};

use crate::cli::{Commands, ListArgs, ShowArgs, SubmitArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub fn run(engine: &Engine, command: Commands) -> Result<(), AnyError> {
    match command {
        Commands::Submit(args) => submit(engine, args),
        Commands::List(args) => list(engine, args),
        Commands::Show(args) => show(engine, args),
        Commands::Stats => stats(engine),
        // Handled before the store is opened
        Commands::Config => Ok(()),
    }
}

fn submit(engine: &Engine, args: SubmitArgs) -> Result<(), AnyError> {
    let text = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let row_id = engine.submit(&text)?;
    info!(%row_id, "Voucher submitted");
    println!("Stored voucher as row {row_id}");
    Ok(())
}

fn list(engine: &Engine, args: ListArgs) -> Result<(), AnyError> {
    let listing = engine.refresh()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", render_table(&listing));
    }
    Ok(())
}

fn render_table(listing: &Listing) -> String {
    let mut out = format!(
        "{:>6}  {:<12}  {:<16}  {:>14}  {:>14}\n",
        "ROW", "DATE", "ID", "DEBIT", "CREDIT"
    );
    for item in listing.items() {
        let line = match item {
            ListItem::Summary(row) => format!(
                "{:>6}  {:<12}  {:<16}  {:>14.2}  {:>14.2}\n",
                row.row_id, row.date, row.id, row.debit_total, row.credit_total
            ),
            ListItem::GrandTotal(totals) => format!(
                "{:>6}  {:<12}  {:<16}  {:>14.2}  {:>14.2}\n",
                "", "TOTAL", "", totals.debit, totals.credit
            ),
        };
        out.push_str(&line);
    }
    out
}

fn show(engine: &Engine, args: ShowArgs) -> Result<(), AnyError> {
    let mut stdout = io::stdout().lock();

    match (args.row, args.date, args.id) {
        (Some(row), _, _) => {
            stdout.write_all(engine.open_row(RowId(row))?.as_bytes())?;
        }
        (None, Some(date), Some(id)) if args.all => {
            for record in engine.open_all(&date, &id)? {
                writeln!(stdout, "# row {}", record.summary.row_id)?;
                stdout.write_all(record.raw_text.as_bytes())?;
                writeln!(stdout)?;
            }
        }
        (None, Some(date), Some(id)) => {
            stdout.write_all(engine.open(&date, &id)?.as_bytes())?;
        }
        _ => return Err("either --row or both --date and --id are required".into()),
    }

    stdout.flush()?;
    Ok(())
}

fn stats(engine: &Engine) -> Result<(), AnyError> {
    let stats = engine.stats()?;
    println!("vouchers:       {}", stats.voucher_count);
    println!("index entries:  {}", stats.key_count);
    println!("document bytes: {}", stats.document_bytes);
    println!("next row id:    {}", stats.next_row_id);
    Ok(())
}
