use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use module_proxy::proto::{
    ModuleProcessRequest, ModuleProcessResponse, PipeDoc, PipeStepProcessorClient,
    ProcessMetadata, RegistrationRequest,
};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the module proxy", long_about = None)]
struct Cli {
    /// gRPC address of the proxy (or of a backend module).
    #[arg(short, long, default_value = "http://localhost:9090")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the module's registration metadata
    Describe,
    /// Send a document through ProcessData
    Process(DocArgs),
    /// Send a document through TestProcessData
    TestProcess(DocArgs),
    /// Query the ops readiness endpoint
    Health {
        #[arg(long, default_value = "http://localhost:8080")]
        ops_url: String,
    },
}

#[derive(clap::Args)]
struct DocArgs {
    /// Document id; a random UUID when omitted.
    #[arg(long)]
    doc_id: Option<String>,

    /// Document body text.
    #[arg(long, default_value = "")]
    body: String,

    #[arg(long, default_value = "")]
    index: String,

    #[arg(long, default_value = "")]
    collection: String,
}

impl DocArgs {
    fn into_request(self) -> ModuleProcessRequest {
        ModuleProcessRequest {
            document: Some(PipeDoc {
                doc_id: self
                    .doc_id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                body: self.body,
                ..Default::default()
            }),
            metadata: Some(ProcessMetadata {
                index_name: self.index,
                collection_name: self.collection,
                ..Default::default()
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Describe => {
            let mut client = PipeStepProcessorClient::connect(cli.addr).await?;
            let registration = client
                .get_service_registration(RegistrationRequest {})
                .await?
                .into_inner();
            json!({
                "module_name": registration.module_name,
                "version": registration.version,
                "health_check_passed": registration.health_check_passed,
                "health_check_message": registration.health_check_message,
                "json_config_schema": registration.json_config_schema,
                "metadata": registration.metadata,
            })
        }
        Commands::Process(doc) => {
            let mut client = PipeStepProcessorClient::connect(cli.addr).await?;
            let response = client.process_data(doc.into_request()).await?.into_inner();
            response_json(response)
        }
        Commands::TestProcess(doc) => {
            let mut client = PipeStepProcessorClient::connect(cli.addr).await?;
            let response = client
                .test_process_data(doc.into_request())
                .await?
                .into_inner();
            response_json(response)
        }
        Commands::Health { ops_url } => {
            let res = reqwest::get(format!("{ops_url}/health/ready")).await?;
            let status = res.status();
            let body: Value = res.json().await?;
            if !status.is_success() {
                eprintln!("Error: readiness returned status {status}");
            }
            body
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn response_json(response: ModuleProcessResponse) -> Value {
    json!({
        "success": response.success,
        "output_doc": response.output_doc.map(|doc| json!({
            "doc_id": doc.doc_id,
            "title": doc.title,
            "body": doc.body,
            "fields": doc.fields,
        })),
        "processor_logs": response.processor_logs,
    })
}
