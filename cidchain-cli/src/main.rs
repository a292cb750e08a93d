//! `cidchain` - load documents from IPFS and move vector stores through it.

use std::time::Duration;

use anyhow::{Context, Result};
use cidchain_core::{Document, Embedding};
use cidchain_embeddings::HashEmbedder;
use cidchain_ipfs::{
    IpfsClient, IpfsConfig, IpfsDirectoryLoader, IpfsFileLoader, IpfsVectorStoreTransfer,
};
use cidchain_store::FlatVectorStore;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIMENSION: usize = 256;

#[derive(Debug, Parser)]
#[command(name = "cidchain", version, about = "IPFS document loaders and vector store transfer")]
struct Cli {
    #[command(flatten)]
    node: NodeArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct NodeArgs {
    /// Use the Infura gateway instead of a local daemon
    #[arg(
        long,
        global = true,
        env = "IPFS_USE_INFURA",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    infura: bool,

    #[arg(long, global = true, env = "INFURA_API_KEY", hide_env_values = true)]
    infura_api_key: Option<String>,

    #[arg(long, global = true, env = "INFURA_API_SECRET", hide_env_values = true)]
    infura_api_secret: Option<String>,

    /// Override the node API base URL
    #[arg(long, global = true, env = "IPFS_API_URL")]
    api_url: Option<String>,

    #[arg(long, global = true, default_value_t = 5)]
    max_retries: usize,

    #[arg(long, global = true, default_value_t = 1000)]
    retry_delay_ms: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the node is reachable and print its version
    Check,
    /// Load a single file CID and print its documents as JSON
    LoadFile { cid: String },
    /// Load every file under a directory CID and print the documents as JSON
    LoadDir { cid: String },
    /// List the files reachable from a directory CID
    ListDir { cid: String },
    /// Embed a directory with the hash embedder and upload the resulting vector store
    IndexDir {
        cid: String,
        #[arg(long, default_value_t = DEFAULT_DIMENSION)]
        dimension: usize,
    },
    /// Restore an uploaded vector store and print what it holds
    InspectStore {
        cid: String,
        #[arg(long, default_value_t = DEFAULT_DIMENSION)]
        dimension: usize,
        /// Run a similarity search against the restored store
        #[arg(long)]
        query: Option<String>,
        #[arg(short, long, default_value_t = 4)]
        k: usize,
    },
}

impl NodeArgs {
    fn config(&self) -> Result<IpfsConfig> {
        let mut builder = IpfsConfig::builder()
            .use_infura(self.infura)
            .max_retries(self.max_retries)
            .retry_delay(Duration::from_millis(self.retry_delay_ms));
        if let Some(url) = &self.api_url {
            builder = builder.api_url(url);
        }
        if let Some(key) = &self.infura_api_key {
            builder = builder.infura_api_key(key);
        }
        if let Some(secret) = &self.infura_api_secret {
            builder = builder.infura_api_secret(secret);
        }
        builder.build().context("invalid IPFS configuration")
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn print_documents(docs: &[Document]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(docs)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.node.config()?;
    tracing::debug!(?config, "resolved IPFS configuration");

    match cli.command {
        Command::Check => {
            let client = IpfsClient::new(config);
            let version = client.version().await?;
            println!("IPFS daemon {} ({})", version.version, version.system);
        }
        Command::LoadFile { cid } => {
            let loader = IpfsFileLoader::connect(config).await?;
            let docs = loader.load(&cid).await?;
            print_documents(&docs)?;
        }
        Command::LoadDir { cid } => {
            let loader = IpfsDirectoryLoader::connect(config).await?;
            let docs = loader.load(&cid).await?;
            print_documents(&docs)?;
        }
        Command::ListDir { cid } => {
            let loader = IpfsDirectoryLoader::connect(config).await?;
            for entry in loader.list_files(&cid).await? {
                println!("{}\t{}", entry.cid, entry.name);
            }
        }
        Command::IndexDir { cid, dimension } => {
            let client = IpfsClient::new(config);
            client.check_daemon_running().await?;
            let docs = IpfsDirectoryLoader::with_client(client.clone())
                .load(&cid)
                .await?;
            if docs.is_empty() {
                anyhow::bail!("no documents could be loaded from {cid}");
            }
            let store = FlatVectorStore::from_documents(HashEmbedder::new(dimension), docs).await?;
            let store_cid = IpfsVectorStoreTransfer::with_client(client)
                .send_vectorstore(&store)
                .await?;
            println!("{store_cid}");
        }
        Command::InspectStore {
            cid,
            dimension,
            query,
            k,
        } => {
            let transfer = IpfsVectorStoreTransfer::connect(config).await?;
            let store = transfer
                .get_vectorstore(&cid, HashEmbedder::new(dimension))
                .await?;
            let stored_dimension = store.dimension().await;
            println!("vectors: {}", store.ntotal().await);
            println!("dimension: {stored_dimension}");
            for id in store.document_ids().await {
                println!("  {id}");
            }

            if let Some(query) = query {
                let embedding = HashEmbedder::new(stored_dimension).embed(&query).await?;
                let hits = store.similarity_search_by_vector(&embedding, k, None).await?;
                for (doc, distance) in hits {
                    println!("{distance:.4}\t{}", doc.id);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    run(Cli::parse()).await
}
