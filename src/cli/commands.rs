use super::args::{Commands, JobArgs};
use anyhow::{Context, Result};
use lighthouse_aggregator::{AggregatorQueue, StateStorage};
use tracing::warn;

/// Run one subcommand against the state file: load, apply, save
pub async fn run_command(command: &Commands, storage: &StateStorage) -> Result<()> {
    match command {
        Commands::Enqueue(args) => handle_enqueue(args, storage).await,
        Commands::Dequeue(args) => handle_dequeue(args, storage).await,
        Commands::List => handle_list(storage).await,
        Commands::Path => {
            println!("{}", storage.path().display());
            Ok(())
        }
        Commands::Clear => handle_clear(storage).await,
    }
}

async fn restore(storage: &StateStorage) -> Result<AggregatorQueue> {
    let mut queue = AggregatorQueue::new();
    queue
        .restore_state(storage)
        .await
        .with_context(|| "Failed to load queue state")?;
    Ok(queue)
}

async fn handle_enqueue(args: &JobArgs, storage: &StateStorage) -> Result<()> {
    storage
        .init()
        .await
        .with_context(|| "Failed to prepare state directory")?;

    let mut queue = restore(storage).await?;
    queue.enqueue_job(args.cid.as_str(), args.tx_id.as_str());
    queue
        .save_state(storage)
        .await
        .with_context(|| "Failed to save queue state")?;

    println!(
        "📦 Enqueued {}/{} ({} pending)",
        args.cid,
        args.tx_id,
        queue.len()
    );
    Ok(())
}

async fn handle_dequeue(args: &JobArgs, storage: &StateStorage) -> Result<()> {
    let mut queue = restore(storage).await?;

    if !queue.dequeue_job(&args.cid, &args.tx_id) {
        warn!("No job matches cid={} txID={}", args.cid, args.tx_id);
        println!("ℹ️ No job matches {}/{}", args.cid, args.tx_id);
        return Ok(());
    }

    queue
        .save_state(storage)
        .await
        .with_context(|| "Failed to save queue state")?;
    println!(
        "✅ Dequeued {}/{} ({} pending)",
        args.cid,
        args.tx_id,
        queue.len()
    );
    Ok(())
}

async fn handle_list(storage: &StateStorage) -> Result<()> {
    let queue = restore(storage).await?;

    if queue.is_empty() {
        println!("Queue is empty");
        return Ok(());
    }

    for (i, job) in queue.jobs().iter().enumerate() {
        println!("  {}: cid={} txID={}", i + 1, job.cid, job.tx_id);
    }
    Ok(())
}

async fn handle_clear(storage: &StateStorage) -> Result<()> {
    let queue = restore(storage).await?;
    if queue.is_empty() && !storage.exists() {
        return Ok(());
    }

    storage
        .save(&[])
        .await
        .with_context(|| "Failed to save queue state")?;
    println!("🧹 Cleared {} jobs", queue.len());
    Ok(())
}
