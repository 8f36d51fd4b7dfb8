use std::time::Duration;

use kaska_client::{KaskaClient, Record};

use crate::config::{Cli, Commands};
use crate::error::CliError;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let conn = &cli.conn;
    let mut client = KaskaClient::connect_named(&conn.host, conn.port, &conn.service_name).await?;
    tracing::debug!(host = %conn.host, port = conn.port, "connected");

    match cli.command {
        Commands::Create { topics } => {
            let created = client.create_topics(topics).await?;
            println!("created {created}");
        }
        Commands::List => {
            let mut topics = client.topic_list().await?;
            topics.sort();
            for topic in topics {
                println!("{topic}");
            }
        }
        Commands::Send { topic, text } => {
            if !client.send_bytes(&topic, text.into_bytes()).await? {
                return Err(CliError::NoSuchTopic(topic));
            }
        }
        Commands::Get { topic, offset } => match client.get(&topic, offset).await? {
            Some(record) => print_record(&record),
            None => println!("{topic}@{offset}: absent"),
        },
        Commands::EndOffsets { topics } => {
            for end in client.end_offsets(topics).await? {
                println!("{}\t{}", end.topic, end.offset);
            }
        }
        Commands::Consume { topics, interval_ms, from, once } => {
            client.subscribe(topics.iter().cloned());
            if let Some(offset) = from {
                for topic in &topics {
                    client.seek(topic, offset);
                }
            }
            consume(&mut client, Duration::from_millis(interval_ms), once).await?;
        }
    }
    Ok(())
}

/// Re-poll on a fixed interval until Ctrl+C. The broker never pushes.
async fn consume(client: &mut KaskaClient, interval: Duration, once: bool) -> Result<(), CliError> {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for record in client.poll().await? {
                    print_record(&record);
                }
                if once {
                    return Ok(());
                }
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                return Ok(());
            }
        }
    }
}

fn print_record(record: &Record) {
    println!(
        "{}@{}: {}",
        record.topic,
        record.offset,
        String::from_utf8_lossy(record.payload.as_bytes())
    );
}
