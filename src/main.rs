use std::io::{self, BufRead, Write};

use minisql::db::{Database, ResultSet};

/// Renders a result set as an aligned ASCII table with a header row, a
/// separator rule, and a row-count footer.
fn print_result(result: &ResultSet) {
    let Some(schema) = result.schema() else {
        println!("(no rows)");
        return;
    };

    let rendered: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| row.fields().iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = schema.columns().iter().map(|c| c.name.len()).collect();
    for row in &rendered {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for (i, column) in schema.columns().iter().enumerate() {
        if i > 0 {
            print!(" | ");
        }
        print!("{:>width$}", column.name, width = widths[i]);
    }
    println!();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            print!("-+-");
        }
        print!("{}", "-".repeat(*width));
    }
    println!();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                print!(" | ");
            }
            print!("{:>width$}", cell, width = widths[i]);
        }
        println!();
    }
    println!("{} row(s).", result.len());
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut db = Database::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("minisql interactive shell");
    println!("Type EXIT or QUIT to stop.");
    println!();

    loop {
        print!("sql> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            println!("Bye!");
            break;
        }

        match db.execute(query) {
            Ok(result) if result.is_empty() => println!("(no rows)"),
            Ok(result) => print_result(&result),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
