use async_datamuse::error::Result;
use async_datamuse::query_builder::QueryBuilder;

use tabular::{Row, Table};

/// Example looking up synonyms for a word given on the command line and
/// printing them as a table with their scores and part-of-speech tags.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let word = std::env::args().nth(1).unwrap_or_else(|| "bright".to_string());

    let mut builder = QueryBuilder::from_env()?;
    builder
        .synonyms(&word)
        .num_results(15)?
        .parts_of_speech()
        .syllable_count();

    println!("Looking up synonyms for: {word}");
    let entries = builder.execute_words().await?;

    if entries.is_empty() {
        println!("No synonyms found for {word}");
        return Ok(());
    }

    let mut table = Table::new("{:<}  {:>}  {:>}  {:<}");
    table.add_row(
        Row::new()
            .with_cell("word")
            .with_cell("score")
            .with_cell("syllables")
            .with_cell("tags"),
    );
    for entry in &entries {
        table.add_row(
            Row::new()
                .with_cell(&entry.word)
                .with_cell(entry.score.map_or(String::new(), |s| s.to_string()))
                .with_cell(entry.num_syllables.map_or(String::new(), |n| n.to_string()))
                .with_cell(entry.tags.as_deref().unwrap_or_default().join(", ")),
        );
    }
    print!("{table}");

    Ok(())
}
