use async_datamuse::error::Result;
use async_datamuse::file_handler::{FileFormat, FileHandler};
use async_datamuse::query_builder::QueryBuilder;

use dotenv::dotenv;
use futures::future::join_all;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    println!("Building synonym query");
    let mut builder = QueryBuilder::from_env()?;
    builder.synonyms("happy").num_results(10)?.definitions();
    println!("Query URL: {}", builder.build_url()?);

    println!("Sending request");
    let words = builder.execute_words().await?;
    println!("Fetched {} words", words.len());
    for entry in &words {
        println!("  {} (score: {:?})", entry.word, entry.score);
    }

    println!("Saving results");
    let filename = FileHandler::save(&words, FileFormat::Json, "synonyms_happy")?;
    println!("Saved to {filename}");

    // Each builder owns its session, so independent queries run concurrently.
    println!("Fetching sound-alike sets concurrently");
    let seeds = ["ocean", "mountain", "forest"];
    let mut sessions = Vec::new();
    for _ in seeds {
        sessions.push(QueryBuilder::from_env()?);
    }

    let fetches: Vec<_> = sessions
        .into_iter()
        .zip(seeds)
        .map(|(mut builder, seed)| async move {
            builder.sounds_like(seed).num_results(5)?;
            builder.execute_words().await
        })
        .collect();

    for (seed, result) in seeds.iter().zip(join_all(fetches).await) {
        match result {
            Ok(words) => println!("  {seed}: {} sound-alike words", words.len()),
            Err(e) => eprintln!("  {seed}: request failed: {e}"),
        }
    }

    Ok(())
}
