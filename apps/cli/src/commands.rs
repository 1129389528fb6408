//! Subcommand handlers.

use std::path::Path;

use anyhow::Context;
use mesh_client::{Client, Transport};
use mesh_service::{InboxPoller, MessageSender, PollConfig};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::cli::Commands;

pub async fn run<T: Transport>(
    client: &Client<T>,
    command: Commands,
    workflow_id: &str,
) -> anyhow::Result<()> {
    match command {
        Commands::Handshake => {
            client.handshake().await?;
            println!("handshake ok: {}", client.mailbox_id());
        }
        Commands::Inbox => {
            let inbox = client.inbox().await?;
            println!("{}", serde_json::to_string_pretty(&inbox)?);
        }
        Commands::Send {
            to,
            file,
            workflow_id: override_id,
        } => {
            let workflow_id = override_id.as_deref().unwrap_or(workflow_id);
            let message_id = MessageSender::new(client, workflow_id)
                .send_file(&to, &file)
                .await
                .with_context(|| format!("sending {}", file.display()))?;
            println!("{message_id}");
        }
        Commands::Read { id, output, ack } => {
            read(client, &id, output.as_deref()).await?;
            if ack {
                client.acknowledge(&id).await?;
                info!(message_id = %id, "acknowledged");
            }
        }
        Commands::Ack { id } => {
            client.acknowledge(&id).await?;
            println!("acknowledged {id}");
        }
        Commands::Poll {
            dir,
            batch_size,
            concurrency,
            extension,
        } => {
            let config = PollConfig {
                output_dir: dir,
                extension,
                batch_size,
                concurrency,
            };
            let poller = InboxPoller::new(client, config)?;

            let cancel = poller.cancel_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, stopping after the current batch");
                    cancel.cancel();
                }
            });

            let report = poller.poll().await?;
            for (id, path) in &report.received {
                println!("{id}\t{}", path.display());
            }
            for failed in report.failed.iter().chain(&report.unacknowledged) {
                eprintln!("{}\t{}", failed.message_id, failed.error);
            }
            if !report.failed.is_empty() || !report.unacknowledged.is_empty() {
                anyhow::bail!(
                    "{} message(s) not received",
                    report.failed.len() + report.unacknowledged.len()
                );
            }
        }
    }
    Ok(())
}

async fn read<T: Transport>(
    client: &Client<T>,
    id: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let outcome = match output {
        Some(path) => client.download_to_file(id, path).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            let outcome = client.download(id, &mut stdout).await?;
            stdout.flush().await?;
            outcome
        }
    };
    info!(
        message_id = %id,
        chunks = outcome.chunk_count,
        bytes = outcome.bytes,
        "message read"
    );
    Ok(())
}
